//! Sequential saga with compensation
//!
//! A [`Saga`] runs its steps in order against a shared context. When a step
//! fails, the compensations of the steps that already completed run in reverse
//! order, then the original failure is returned.

use crate::domain::{GitportError, Result};
use async_trait::async_trait;
use std::fmt;

/// One forward action of a saga and the action undoing it
#[async_trait]
pub trait SagaStep<C: Send>: Send + Sync {
    /// Step name used in logs and failures
    fn name(&self) -> &'static str;

    /// Performs the step
    async fn execute(&self, ctx: &mut C) -> Result<()>;

    /// Reverses a completed [`SagaStep::execute`]
    async fn compensate(&self, _ctx: &mut C) -> Result<()> {
        Ok(())
    }
}

/// A compensation that itself failed
#[derive(Debug)]
pub struct CompensationFailure {
    /// Step whose compensation failed
    pub step: &'static str,

    /// Compensation error
    pub error: GitportError,
}

/// Failure of a saga run
#[derive(Debug)]
pub struct SagaFailure {
    /// Step that failed
    pub step: &'static str,

    /// Error returned by the failing step
    pub error: GitportError,

    /// Number of completed steps that were compensated
    pub compensated: usize,

    /// Compensations that failed, in execution order
    pub compensation_failures: Vec<CompensationFailure>,
}

impl fmt::Display for SagaFailure {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "step '{}' failed: {}", self.step, self.error)?;
        if !self.compensation_failures.is_empty() {
            write!(
                f,
                " ({} compensation(s) failed)",
                self.compensation_failures.len()
            )?;
        }
        Ok(())
    }
}

/// Ordered list of saga steps
pub struct Saga<C: Send> {
    steps: Vec<Box<dyn SagaStep<C>>>,
}

impl<C: Send> Default for Saga<C> {
    fn default() -> Self {
        Self { steps: Vec::new() }
    }
}

impl<C: Send> Saga<C> {
    /// Create an empty saga
    pub fn new() -> Self {
        Self::default()
    }

    /// Appends a step
    pub fn step(mut self, step: impl SagaStep<C> + 'static) -> Self {
        self.steps.push(Box::new(step));
        self
    }

    /// Number of steps
    pub fn len(&self) -> usize {
        self.steps.len()
    }

    /// Whether the saga has no steps
    pub fn is_empty(&self) -> bool {
        self.steps.is_empty()
    }

    /// Runs every step in order
    ///
    /// # Errors
    ///
    /// Returns a [`SagaFailure`] carrying the first step error after the
    /// completed steps have been compensated
    pub async fn run(&self, ctx: &mut C) -> std::result::Result<(), SagaFailure> {
        for (index, step) in self.steps.iter().enumerate() {
            tracing::debug!(step = step.name(), "Executing saga step");

            if let Err(error) = step.execute(ctx).await {
                tracing::debug!(step = step.name(), error = %error, "Saga step failed");

                let mut compensation_failures = Vec::new();
                for done in self.steps[..index].iter().rev() {
                    tracing::debug!(step = done.name(), "Compensating saga step");
                    if let Err(e) = done.compensate(ctx).await {
                        tracing::warn!(
                            step = done.name(),
                            error = %e,
                            "Saga compensation failed"
                        );
                        compensation_failures.push(CompensationFailure {
                            step: done.name(),
                            error: e,
                        });
                    }
                }

                return Err(SagaFailure {
                    step: step.name(),
                    error,
                    compensated: index,
                    compensation_failures,
                });
            }
        }

        Ok(())
    }
}
