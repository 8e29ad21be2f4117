//! Check aggregation: one sequential pass over an ordered set of checkers

use crate::error::AppError;
use crate::health::checker::{CheckContext, CheckFailure, Checker, Verdict};
use serde::{Deserialize, Serialize};
use std::fmt;
use std::panic::{catch_unwind, AssertUnwindSafe};

/// Diagnostic sink invoked once per failing checker per pass.
pub type LogFn = Box<dyn Fn(fmt::Arguments<'_>) + Send + Sync>;

/// What the aggregator does once a checker fails.
///
/// `CollectAll` evaluates every checker regardless of earlier failures and
/// records each one in evaluation order. `FailFast` stops at the first
/// failure, so later checkers are neither evaluated nor logged; the policy
/// therefore changes which failures ever reach the diagnostic sink.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum FailurePolicy {
    FailFast,
    CollectAll,
}

impl Default for FailurePolicy {
    fn default() -> Self {
        FailurePolicy::CollectAll
    }
}

/// An ordered group of checkers sharing one context and diagnostic sink.
///
/// Constructed once at service startup and reused for every inbound
/// request. The aggregator never mutates its checkers and holds no
/// cross-request state, so concurrent passes are independent; checkers are
/// evaluated sequentially within a pass, in insertion order.
pub struct Checks {
    checkers: Vec<Box<dyn Checker>>,
    ctx: CheckContext,
    logger: Option<LogFn>,
    policy: FailurePolicy,
}

impl Checks {
    pub fn new(ctx: CheckContext) -> Self {
        Self {
            checkers: Vec::new(),
            ctx,
            logger: None,
            policy: FailurePolicy::default(),
        }
    }

    pub fn with_policy(mut self, policy: FailurePolicy) -> Self {
        self.policy = policy;
        self
    }

    /// Installs the diagnostic sink. Absence of a sink is tolerated
    /// silently; failures are still captured into the verdict.
    pub fn with_logger<F>(mut self, logger: F) -> Self
    where
        F: Fn(fmt::Arguments<'_>) + Send + Sync + 'static,
    {
        self.logger = Some(Box::new(logger));
        self
    }

    pub fn add_check<T: Checker + 'static>(mut self, check: T) -> Self {
        self.checkers.push(Box::new(check));
        self
    }

    pub fn policy(&self) -> FailurePolicy {
        self.policy
    }

    pub fn len(&self) -> usize {
        self.checkers.len()
    }

    pub fn is_empty(&self) -> bool {
        self.checkers.is_empty()
    }

    /// Runs one pass over the checkers in insertion order.
    ///
    /// Checker errors are captured into the verdict and reported to the
    /// diagnostic sink; the pass itself never fails and never panics.
    pub async fn run(&self) -> Verdict {
        let mut failures = Vec::new();

        for checker in &self.checkers {
            if let Err(error) = checker.check(&self.ctx).await {
                let detail = checker.describe(&self.ctx);
                self.log_failure(checker.kind(), &detail, &error);
                failures.push(CheckFailure {
                    kind: checker.kind(),
                    detail,
                    error,
                });
                if self.policy == FailurePolicy::FailFast {
                    break;
                }
            }
        }

        if failures.is_empty() {
            Verdict::Healthy
        } else {
            Verdict::Unhealthy(failures)
        }
    }

    // A sink that panics must not abort the pass or change the verdict.
    fn log_failure(&self, kind: &str, detail: &str, error: &AppError) {
        if let Some(logger) = &self.logger {
            let _ = catch_unwind(AssertUnwindSafe(|| {
                logger(format_args!(
                    "health check failed for {} ({}): {}",
                    kind, detail, error
                ));
            }));
        }
    }
}
