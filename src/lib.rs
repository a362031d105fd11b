// Gitport - Repository export orchestrator
// Copyright (c) 2025 Gitport Contributors
// Licensed under the MIT License

//! # Gitport - Repository export orchestrator
//!
//! Gitport copies git repositories from a local hosting service to a remote
//! one. Each repository becomes one background job that creates an empty
//! remote repository, mirrors every ref into it, and deletes it again when the
//! push fails.
//!
//! ## Architecture
//!
//! - [`cli`] - Command-line interface and argument parsing
//! - [`core`] - Export orchestration (codec, saga, executor, progress)
//! - [`adapters`] - Job engine, remote API client, git, encryption, store, events
//! - [`domain`] - Core domain types and errors
//! - [`config`] - Configuration management
//! - [`logging`] - Structured logging
//!
//! ## Quick Start
//!
//! ```rust,no_run
//! use gitport::adapters::crypto::AesGcmEncrypter;
//! use gitport::adapters::events::BroadcastPublisher;
//! use gitport::adapters::git::GitCliPusher;
//! use gitport::adapters::jobs::{EngineSettings, InMemoryJobEngine};
//! use gitport::adapters::remote::HttpRemoteClientFactory;
//! use gitport::adapters::store::{InMemoryRepositoryStore, RepositoryStore};
//! use gitport::config::load_config;
//! use gitport::core::export::{ExporterCollaborators, RepositoryExporter};
//! use gitport::domain::SpaceId;
//! use std::sync::Arc;
//!
//! #[tokio::main]
//! async fn main() -> Result<(), Box<dyn std::error::Error>> {
//!     let config = load_config("gitport.toml")?;
//!     let store = Arc::new(InMemoryRepositoryStore::from_manifest("repositories.toml")?);
//!     let engine = InMemoryJobEngine::new(EngineSettings::from(&config.jobs));
//!
//!     let exporter = RepositoryExporter::new(ExporterCollaborators {
//!         encrypter: Arc::new(AesGcmEncrypter::from_base64(&config.encryption.key)?),
//!         scheduler: Arc::new(engine.clone()),
//!         store: store.clone(),
//!         remotes: Arc::new(HttpRemoteClientFactory::new(config.remote.clone())),
//!         git: Arc::new(GitCliPusher::from_config(&config.git)),
//!         events: Arc::new(BroadcastPublisher::default()),
//!     });
//!     exporter.register(&engine).await?;
//!
//!     let space = SpaceId::new(7);
//!     let repos = store.list_by_space(space).await?;
//!     exporter.run_many(space, &config.target.to_account(), &repos).await?;
//!
//!     engine.wait_idle().await;
//!     for job in exporter.progress(space).await? {
//!         println!("{}: {}", job.uid, job.state);
//!     }
//!     Ok(())
//! }
//! ```
//!
//! ## Error Handling
//!
//! Library code returns [`domain::Result`], an alias over
//! [`domain::GitportError`]. `anyhow` is only used by the CLI.

pub mod adapters;
pub mod cli;
pub mod config;
pub mod core;
pub mod domain;
pub mod logging;
