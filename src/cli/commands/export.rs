//! Export command implementation
//!
//! This module implements the `export` command: every repository of one space
//! listed in the manifest is exported to the configured remote account.

use crate::adapters::crypto::AesGcmEncrypter;
use crate::adapters::events::BroadcastPublisher;
use crate::adapters::git::GitCliPusher;
use crate::adapters::jobs::{EngineSettings, InMemoryJobEngine};
use crate::adapters::remote::HttpRemoteClientFactory;
use crate::adapters::store::{InMemoryRepositoryStore, RepositoryStore};
use crate::config::{load_config, GitportConfig};
use crate::core::export::{summarize, ExporterCollaborators, ProgressSummary, RepositoryExporter};
use crate::domain::{JobProgress, JobStatus, Repository, SpaceId};
use clap::Args;
use std::path::PathBuf;
use std::sync::Arc;
use std::time::{Duration, Instant};
use tokio::sync::watch;

/// Arguments for the export command
#[derive(Args, Debug)]
pub struct ExportArgs {
    /// Space whose repositories are exported
    #[arg(short, long)]
    pub space: i64,

    /// Repository manifest (TOML with [[repositories]] entries)
    #[arg(
        short,
        long,
        default_value = "repositories.toml",
        env = "GITPORT_MANIFEST"
    )]
    pub manifest: PathBuf,

    /// Only export these repository ids (comma-separated)
    #[arg(long, value_delimiter = ',')]
    pub repo: Vec<i64>,

    /// Skip confirmation prompt
    #[arg(short, long)]
    pub yes: bool,
}

impl ExportArgs {
    /// Execute the export command
    pub async fn execute(
        &self,
        config_path: &str,
        mut shutdown_signal: watch::Receiver<bool>,
    ) -> anyhow::Result<i32> {
        tracing::info!(space_id = self.space, "Starting export command");
        let space_id = SpaceId::new(self.space);

        let config = match load_config(config_path) {
            Ok(c) => c,
            Err(e) => {
                tracing::error!(error = %e, "Failed to load configuration");
                eprintln!("Failed to load configuration: {e}");
                return Ok(2);
            }
        };

        let store = match InMemoryRepositoryStore::from_manifest(&self.manifest) {
            Ok(store) => Arc::new(store),
            Err(e) => {
                tracing::error!(error = %e, "Failed to load repository manifest");
                eprintln!("Failed to load repository manifest: {e}");
                return Ok(2);
            }
        };

        let repositories = select_repositories(store.list_by_space(space_id).await?, &self.repo);
        if repositories.is_empty() {
            println!("ℹ️  No repositories to export in space {space_id}");
            return Ok(0);
        }

        let (engine, collaborators) = match build_collaborators(&config, Arc::clone(&store)) {
            Ok(parts) => parts,
            Err(e) => {
                tracing::error!(error = %e, "Failed to initialize exporter");
                eprintln!("Failed to initialize export: {e}");
                return Ok(2);
            }
        };

        if !self.yes {
            println!("Export Configuration:");
            println!("  Space: {space_id}");
            println!("  Repositories: {}", repositories.len());
            println!("  Remote: {}", config.remote.base_url);
            println!(
                "  Target: {}/{}/{}",
                config.target.account_id,
                config.target.org_identifier,
                config.target.project_identifier
            );
            println!();
            print!("Proceed with export? [y/N]: ");
            use std::io::{self, Write};
            io::stdout().flush()?;

            let mut input = String::new();
            io::stdin().read_line(&mut input)?;

            if !input.trim().eq_ignore_ascii_case("y") {
                println!("Export cancelled.");
                return Ok(0);
            }
        }

        let exporter = RepositoryExporter::new(collaborators);
        exporter.register(&engine).await?;

        let started = Instant::now();
        println!("🚀 Exporting {} repositories...", repositories.len());
        println!();

        let group = match exporter
            .run_many(space_id, &config.target.to_account(), &repositories)
            .await
        {
            Ok(group) => group,
            Err(e) => {
                tracing::error!(error = %e, "Failed to submit export batch");
                eprintln!("Failed to submit export batch: {e}");
                return Ok(5);
            }
        };
        tracing::info!(group = %group, jobs = repositories.len(), "Export batch submitted");

        let poll_interval = Duration::from_millis(config.jobs.poll_interval_ms);
        let mut last_summary = ProgressSummary::default();
        let interrupted = loop {
            tokio::select! {
                _ = tokio::time::sleep(poll_interval) => {}
                _ = shutdown_requested(&mut shutdown_signal) => break true,
            }

            let summary = summarize(&exporter.progress(space_id).await?);
            if summary != last_summary {
                println!(
                    "⏳ {}/{} finished ({} running, {} failed)",
                    summary.succeeded + summary.failed,
                    summary.total,
                    summary.running,
                    summary.failed
                );
                last_summary = summary;
            }
            if summary.is_complete() {
                break false;
            }
        };

        if interrupted {
            engine.shutdown().await;
        } else {
            engine.wait_idle().await;
        }

        let progress = exporter.progress(space_id).await?;
        let summary = summarize(&progress);
        print_summary(&progress, &summary, started.elapsed());

        let exit_code = if interrupted {
            println!("⚠️  Export interrupted. Running jobs were cancelled.");
            tracing::info!("Export interrupted by user signal");
            130
        } else {
            let code = exit_code_for(&summary);
            if code == 0 {
                println!("✅ Export completed successfully!");
            } else {
                println!("⚠️  Export completed with failures");
            }
            code
        };

        Ok(exit_code)
    }
}

fn build_collaborators(
    config: &GitportConfig,
    store: Arc<InMemoryRepositoryStore>,
) -> crate::domain::Result<(InMemoryJobEngine, ExporterCollaborators)> {
    let encrypter = AesGcmEncrypter::from_base64(&config.encryption.key)?;
    let engine = InMemoryJobEngine::new(EngineSettings::from(&config.jobs));

    let collaborators = ExporterCollaborators {
        encrypter: Arc::new(encrypter),
        scheduler: Arc::new(engine.clone()),
        store,
        remotes: Arc::new(HttpRemoteClientFactory::new(config.remote.clone())),
        git: Arc::new(GitCliPusher::from_config(&config.git)),
        events: Arc::new(BroadcastPublisher::default()),
    };

    Ok((engine, collaborators))
}

/// Keeps repositories whose id is in `filter`; an empty filter keeps all
fn select_repositories(repositories: Vec<Repository>, filter: &[i64]) -> Vec<Repository> {
    if filter.is_empty() {
        return repositories;
    }
    repositories
        .into_iter()
        .filter(|repo| filter.contains(&repo.id.get()))
        .collect()
}

fn exit_code_for(summary: &ProgressSummary) -> i32 {
    if summary.all_succeeded() {
        0
    } else {
        1
    }
}

async fn shutdown_requested(rx: &mut watch::Receiver<bool>) {
    loop {
        if *rx.borrow() {
            return;
        }
        if rx.changed().await.is_err() {
            std::future::pending::<()>().await;
        }
    }
}

fn print_summary(progress: &[JobProgress], summary: &ProgressSummary, elapsed: Duration) {
    println!();
    println!("📊 Export Summary:");
    println!("  Total: {}", summary.total);
    println!("  Succeeded: {}", summary.succeeded);
    println!("  Failed: {}", summary.failed);
    if summary.queued + summary.running > 0 {
        println!("  Unfinished: {}", summary.queued + summary.running);
    }
    println!("  Duration: {:.2}s", elapsed.as_secs_f64());
    println!();

    let failures: Vec<_> = progress
        .iter()
        .filter(|p| p.state == JobStatus::Failed)
        .collect();
    if !failures.is_empty() {
        println!("⚠️  Failed jobs:");
        for entry in failures.iter().take(10) {
            println!(
                "  - {}: {}",
                entry.uid,
                entry.failure.as_deref().unwrap_or("unknown error")
            );
        }
        if failures.len() > 10 {
            println!("  ... and {} more", failures.len() - 10);
        }
        println!();
    }
}
