//! Health check aggregation for monitoring service dependencies

pub mod checker;
pub mod checks;
pub mod sql;


pub use checker::{CheckContext, CheckFailure, Checker, FnChecker, Verdict};
pub use checks::{Checks, FailurePolicy, LogFn};
pub use sql::{CheckDepth, SqlChecker};
