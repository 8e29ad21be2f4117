//! Checker contract and the context shared across one aggregation pass

use crate::error::{AppError, Result};
use async_trait::async_trait;
use std::future::Future;
use std::time::Duration;
use tokio_util::sync::CancellationToken;

/// Cancellation and deadline handle threaded through every check in a pass.
///
/// Supplied once when the aggregator is built and shared by all of its
/// checkers; cancelling the underlying token aborts in-flight probes on the
/// next await point.
#[derive(Clone, Default)]
pub struct CheckContext {
    token: CancellationToken,
    limit: Option<Duration>,
}

impl CheckContext {
    pub fn new() -> Self {
        Self::default()
    }

    /// Builds a context over an externally-owned token, so shutdown
    /// machinery can cancel in-flight passes.
    pub fn with_token(token: CancellationToken) -> Self {
        Self { token, limit: None }
    }

    /// Caps every bounded probe at `limit`.
    pub fn with_limit(mut self, limit: Duration) -> Self {
        self.limit = Some(limit);
        self
    }

    pub fn cancel(&self) {
        self.token.cancel();
    }

    pub fn is_cancelled(&self) -> bool {
        self.token.is_cancelled()
    }

    /// Races `probe` against cancellation and the configured time limit.
    ///
    /// Checker implementations route their I/O through this so a cancelled
    /// or expired context makes the probe return promptly instead of
    /// hanging the pass.
    pub async fn bounded<F>(&self, probe: F) -> Result<F::Output>
    where
        F: Future,
    {
        let limited = async {
            match self.limit {
                Some(limit) => tokio::time::timeout(limit, probe)
                    .await
                    .map_err(|_| AppError::Timeout),
                None => Ok(probe.await),
            }
        };

        tokio::select! {
            biased;
            _ = self.token.cancelled() => Err(AppError::Cancelled),
            out = limited => out,
        }
    }
}

/// A unit that can report whether the dependency it monitors is currently
/// healthy.
///
/// `check` returns `Ok(())` to signal healthy and a descriptive error
/// otherwise. Implementations must honor the context, normally by routing
/// probe I/O through [`CheckContext::bounded`]. A single invocation performs
/// one probe with no retries; retries, if desired, belong inside an
/// implementation, never in the aggregator.
#[async_trait]
pub trait Checker: Send + Sync {
    async fn check(&self, ctx: &CheckContext) -> Result<()>;

    /// Diagnostic text attached to failure logs. Must not fail and must not
    /// block; should distinguish instances of the same kind, e.g. "primary"
    /// vs "replica".
    fn describe(&self, ctx: &CheckContext) -> String;

    /// Static kind tag used in log output in place of a runtime type name.
    fn kind(&self) -> &'static str;
}

/// One failing checker observed during a pass.
#[derive(Debug)]
pub struct CheckFailure {
    pub kind: &'static str,
    pub detail: String,
    pub error: AppError,
}

/// Outcome of one aggregation pass. Recomputed on every invocation, never
/// persisted.
#[derive(Debug)]
pub enum Verdict {
    Healthy,
    Unhealthy(Vec<CheckFailure>),
}

impl Verdict {
    pub fn is_healthy(&self) -> bool {
        matches!(self, Verdict::Healthy)
    }

    pub fn failures(&self) -> &[CheckFailure] {
        match self {
            Verdict::Healthy => &[],
            Verdict::Unhealthy(failures) => failures,
        }
    }
}

/// Closure-backed checker for ad-hoc internal invariants that do not
/// warrant a dedicated type.
pub struct FnChecker {
    name: String,
    check_fn: Box<dyn Fn() -> Result<()> + Send + Sync>,
}

impl FnChecker {
    pub fn new<F>(name: impl Into<String>, check_fn: F) -> Self
    where
        F: Fn() -> Result<()> + Send + Sync + 'static,
    {
        Self {
            name: name.into(),
            check_fn: Box::new(check_fn),
        }
    }
}

#[async_trait]
impl Checker for FnChecker {
    async fn check(&self, ctx: &CheckContext) -> Result<()> {
        if ctx.is_cancelled() {
            return Err(AppError::Cancelled);
        }
        (self.check_fn)()
    }

    fn describe(&self, _ctx: &CheckContext) -> String {
        self.name.clone()
    }

    fn kind(&self) -> &'static str {
        "function"
    }
}
