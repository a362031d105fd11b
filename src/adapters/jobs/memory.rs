//! In-process job engine
//!
//! Every accepted job runs on its own tokio task. An attempt that exceeds the
//! job timeout, or that is running when the engine shuts down, is asked to stop
//! through its [`ExecutionContext`] and given a grace period to unwind before
//! it is abandoned.

use super::{ExecutionContext, JobHandler, JobRegistry, JobScheduler, ProgressReporter};
use crate::config::JobsConfig;
use crate::domain::{
    GitportError, JobDefinition, JobGroupId, JobProgress, JobStatus, JobUid, Result,
};
use async_trait::async_trait;
use std::collections::{HashMap, HashSet};
use std::sync::Arc;
use std::time::Duration;
use tokio::sync::{watch, Mutex, RwLock};
use tokio::task::JoinHandle;

/// Timing knobs of the engine
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct EngineSettings {
    /// Pause between a failed attempt and the next one
    pub retry_delay: Duration,

    /// Time a cancelled attempt gets to finish compensating
    pub cancel_grace: Duration,
}

impl Default for EngineSettings {
    fn default() -> Self {
        Self {
            retry_delay: Duration::from_millis(1000),
            cancel_grace: Duration::from_secs(30),
        }
    }
}

impl From<&JobsConfig> for EngineSettings {
    fn from(config: &JobsConfig) -> Self {
        Self {
            retry_delay: Duration::from_millis(config.retry_delay_ms),
            cancel_grace: Duration::from_secs(config.cancel_grace_seconds),
        }
    }
}

#[derive(Debug)]
struct JobRecord {
    group: JobGroupId,
    progress: JobProgress,
}

struct EngineState {
    settings: EngineSettings,
    handlers: RwLock<HashMap<String, Arc<dyn JobHandler>>>,
    records: RwLock<HashMap<JobUid, JobRecord>>,
    groups: RwLock<HashMap<JobGroupId, Vec<JobUid>>>,
    shutdown_tx: watch::Sender<bool>,
}

impl EngineState {
    async fn update<F>(&self, uid: &JobUid, f: F)
    where
        F: FnOnce(&mut JobProgress),
    {
        if let Some(record) = self.records.write().await.get_mut(uid) {
            f(&mut record.progress);
        }
    }

    fn is_shutting_down(&self) -> bool {
        *self.shutdown_tx.borrow()
    }
}

/// In-memory implementation of [`JobRegistry`] and [`JobScheduler`]
///
/// Cloning is cheap; clones share the same state.
///
/// # Examples
///
/// ```no_run
/// use gitport::adapters::jobs::{EngineSettings, InMemoryJobEngine};
///
/// # async fn example() {
/// let engine = InMemoryJobEngine::new(EngineSettings::default());
/// // register handlers, submit jobs...
/// engine.shutdown().await;
/// # }
/// ```
#[derive(Clone)]
pub struct InMemoryJobEngine {
    state: Arc<EngineState>,
    tasks: Arc<Mutex<Vec<JoinHandle<()>>>>,
}

impl InMemoryJobEngine {
    /// Create a new engine
    pub fn new(settings: EngineSettings) -> Self {
        let (shutdown_tx, _) = watch::channel(false);
        Self {
            state: Arc::new(EngineState {
                settings,
                handlers: RwLock::new(HashMap::new()),
                records: RwLock::new(HashMap::new()),
                groups: RwLock::new(HashMap::new()),
                shutdown_tx,
            }),
            tasks: Arc::new(Mutex::new(Vec::new())),
        }
    }

    /// Cancels running attempts and waits for every job task to finish
    ///
    /// Jobs still queued or waiting for a retry are marked failed.
    pub async fn shutdown(&self) {
        tracing::info!("Shutting down job engine");
        self.state.shutdown_tx.send_replace(true);

        let handles: Vec<_> = self.tasks.lock().await.drain(..).collect();
        for handle in handles {
            if let Err(e) = handle.await {
                tracing::warn!(error = %e, "Job task ended abnormally");
            }
        }

        tracing::info!("Job engine shut down");
    }

    /// Waits until every job task spawned so far has finished
    pub async fn wait_idle(&self) {
        let handles: Vec<_> = self.tasks.lock().await.drain(..).collect();
        for handle in handles {
            if let Err(e) = handle.await {
                tracing::warn!(error = %e, "Job task ended abnormally");
            }
        }
    }
}

#[async_trait]
impl JobRegistry for InMemoryJobEngine {
    async fn register(&self, job_type: &str, handler: Arc<dyn JobHandler>) -> Result<()> {
        let mut handlers = self.state.handlers.write().await;
        if handlers.contains_key(job_type) {
            return Err(GitportError::Scheduler(format!(
                "handler already registered for job type '{job_type}'"
            )));
        }

        handlers.insert(job_type.to_string(), handler);
        tracing::debug!(job_type = %job_type, "Registered job handler");
        Ok(())
    }
}

#[async_trait]
impl JobScheduler for InMemoryJobEngine {
    async fn run_jobs(&self, group: &JobGroupId, jobs: Vec<JobDefinition>) -> Result<()> {
        if self.state.is_shutting_down() {
            return Err(GitportError::Scheduler(
                "job engine is shutting down".to_string(),
            ));
        }

        let mut resolved = Vec::with_capacity(jobs.len());
        {
            let handlers = self.state.handlers.read().await;
            for def in jobs {
                let handler = handlers.get(&def.job_type).cloned().ok_or_else(|| {
                    GitportError::Scheduler(format!(
                        "no handler registered for job type '{}'",
                        def.job_type
                    ))
                })?;
                resolved.push((def, handler));
            }
        }

        {
            let mut records = self.state.records.write().await;
            let mut groups = self.state.groups.write().await;

            let mut seen = HashSet::new();
            for (def, _) in &resolved {
                if !seen.insert(&def.uid) {
                    return Err(GitportError::Scheduler(format!(
                        "job '{}' appears twice in the batch",
                        def.uid
                    )));
                }
                if let Some(existing) = records.get(&def.uid) {
                    if !existing.progress.state.is_terminal() {
                        return Err(GitportError::Scheduler(format!(
                            "job '{}' is already {}",
                            def.uid, existing.progress.state
                        )));
                    }
                }
            }

            for (def, _) in &resolved {
                let previous = records.insert(
                    def.uid.clone(),
                    JobRecord {
                        group: group.clone(),
                        progress: JobProgress::queued(&def.uid),
                    },
                );

                if let Some(previous) = previous {
                    if let Some(members) = groups.get_mut(&previous.group) {
                        members.retain(|uid| uid != &def.uid);
                    }
                }
                groups.entry(group.clone()).or_default().push(def.uid.clone());
            }
        }

        tracing::info!(group = %group, jobs = resolved.len(), "Accepted job batch");

        let mut tasks = self.tasks.lock().await;
        tasks.retain(|handle| !handle.is_finished());
        for (def, handler) in resolved {
            let state = Arc::clone(&self.state);
            tasks.push(tokio::spawn(run_job(state, def, handler)));
        }

        Ok(())
    }

    async fn group_progress(&self, group: &JobGroupId) -> Result<Vec<JobProgress>> {
        // same lock order as run_jobs: records before groups
        let records = self.state.records.read().await;
        let groups = self.state.groups.read().await;
        let Some(members) = groups.get(group) else {
            return Ok(Vec::new());
        };

        Ok(members
            .iter()
            .filter_map(|uid| records.get(uid).map(|r| r.progress.clone()))
            .collect())
    }
}

struct RecordReporter {
    state: Arc<EngineState>,
    uid: JobUid,
}

#[async_trait]
impl ProgressReporter for RecordReporter {
    async fn report(&self, percent: u8) {
        let percent = percent.min(100);
        self.state
            .update(&self.uid, |p| {
                if p.state == JobStatus::Running {
                    p.progress = percent;
                }
            })
            .await;
    }
}

async fn wait_for_shutdown(rx: &mut watch::Receiver<bool>) {
    loop {
        if *rx.borrow_and_update() {
            return;
        }
        if rx.changed().await.is_err() {
            std::future::pending::<()>().await;
        }
    }
}

async fn run_job(state: Arc<EngineState>, def: JobDefinition, handler: Arc<dyn JobHandler>) {
    let max_attempts = def.max_attempts();
    let mut shutdown_rx = state.shutdown_tx.subscribe();
    let mut last_error = String::from("job did not run");

    for attempt in 1..=max_attempts {
        if state.is_shutting_down() {
            last_error = "job engine shut down".to_string();
            break;
        }

        state
            .update(&def.uid, |p| {
                p.state = JobStatus::Running;
                p.progress = 0;
            })
            .await;

        tracing::debug!(job_uid = %def.uid, attempt, max_attempts, "Starting job attempt");

        match run_attempt(&state, &def, handler.as_ref(), attempt).await {
            Ok(result) => {
                tracing::info!(job_uid = %def.uid, attempt, "Job succeeded");
                state
                    .update(&def.uid, |p| {
                        p.state = JobStatus::Succeeded;
                        p.progress = 100;
                        p.result = Some(result);
                        p.failure = None;
                    })
                    .await;
                return;
            }
            Err(e) => {
                last_error = e.to_string();

                if attempt < max_attempts && !state.is_shutting_down() {
                    crate::log_retry_attempt!(attempt + 1, max_attempts, last_error.as_str());
                    tokio::select! {
                        _ = tokio::time::sleep(state.settings.retry_delay) => {}
                        _ = wait_for_shutdown(&mut shutdown_rx) => {}
                    }
                }
            }
        }
    }

    tracing::warn!(job_uid = %def.uid, error = %last_error, "Job failed");
    state
        .update(&def.uid, |p| {
            p.state = JobStatus::Failed;
            p.result = None;
            p.failure = Some(last_error);
        })
        .await;
}

async fn run_attempt(
    state: &Arc<EngineState>,
    def: &JobDefinition,
    handler: &dyn JobHandler,
    attempt: u32,
) -> Result<String> {
    let (cancel_tx, cancel_rx) = watch::channel(false);
    let ctx = ExecutionContext::new(def.uid.clone(), attempt, cancel_rx);
    let reporter = RecordReporter {
        state: Arc::clone(state),
        uid: def.uid.clone(),
    };
    let mut shutdown_rx = state.shutdown_tx.subscribe();

    let execution = handler.handle(&ctx, &def.data, &reporter);
    tokio::pin!(execution);

    let timed_out = tokio::select! {
        result = &mut execution => return result,
        _ = tokio::time::sleep(def.timeout) => true,
        _ = wait_for_shutdown(&mut shutdown_rx) => false,
    };

    if timed_out {
        tracing::warn!(job_uid = %def.uid, attempt, "Job attempt timed out, cancelling");
    } else {
        tracing::warn!(job_uid = %def.uid, attempt, "Cancelling job attempt for shutdown");
    }
    cancel_tx.send_replace(true);

    match tokio::time::timeout(state.settings.cancel_grace, &mut execution).await {
        Ok(Err(GitportError::Cancelled)) if timed_out => {
            Err(GitportError::Timeout(def.timeout.as_millis() as u64))
        }
        Ok(result) => result,
        Err(_) => {
            tracing::warn!(
                job_uid = %def.uid,
                grace_ms = state.settings.cancel_grace.as_millis() as u64,
                "Job attempt did not stop within grace period, abandoning"
            );
            if timed_out {
                Err(GitportError::Timeout(def.timeout.as_millis() as u64))
            } else {
                Err(GitportError::Cancelled)
            }
        }
    }
}
