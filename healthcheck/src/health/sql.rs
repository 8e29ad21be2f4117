//! Datastore checker backed by a sqlx connection pool

use crate::error::{AppError, Result};
use crate::health::checker::{CheckContext, Checker};
use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use sqlx::{Row, SqlitePool};

const DEFAULT_PROBE_QUERY: &str = "SELECT 1 AS probe";

/// How deep the datastore probe goes.
///
/// `Connect` only verifies the pool can hand out a live connection. `Query`
/// additionally round-trips a trivial read, catching a datastore that
/// accepts connections while its query engine is wedged. `Query` subsumes
/// `Connect` and is the default.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum CheckDepth {
    Connect,
    Query,
}

impl Default for CheckDepth {
    fn default() -> Self {
        CheckDepth::Query
    }
}

/// Checker for a relational datastore reached through an externally-owned
/// connection pool.
///
/// The pool handle is shared, not owned: this checker never closes or
/// reconfigures it. `id` is free-form diagnostic text returned verbatim by
/// `describe`; use something that disambiguates instances when several
/// datastore checkers are configured, e.g. "primary" vs "replica".
pub struct SqlChecker {
    pool: SqlitePool,
    id: String,
    depth: CheckDepth,
    probe_query: String,
}

impl SqlChecker {
    pub fn new(pool: SqlitePool, id: impl Into<String>) -> Self {
        Self {
            pool,
            id: id.into(),
            depth: CheckDepth::default(),
            probe_query: DEFAULT_PROBE_QUERY.to_string(),
        }
    }

    pub fn with_depth(mut self, depth: CheckDepth) -> Self {
        self.depth = depth;
        self
    }

    /// Overrides the round-trip probe used at `Query` depth. The query must
    /// yield at least one row whose first column decodes as the integer 1.
    pub fn with_probe_query(mut self, query: impl Into<String>) -> Self {
        self.probe_query = query.into();
        self
    }
}

#[async_trait]
impl Checker for SqlChecker {
    async fn check(&self, ctx: &CheckContext) -> Result<()> {
        match self.depth {
            CheckDepth::Connect => {
                ctx.bounded(self.pool.acquire()).await??;
                Ok(())
            }
            CheckDepth::Query => {
                let row = ctx
                    .bounded(sqlx::query(&self.probe_query).fetch_one(&self.pool))
                    .await??;
                let probe: i64 = row.try_get(0)?;
                if probe == 1 {
                    Ok(())
                } else {
                    Err(AppError::Unhealthy(format!(
                        "probe query returned {}, expected 1",
                        probe
                    )))
                }
            }
        }
    }

    fn describe(&self, _ctx: &CheckContext) -> String {
        self.id.clone()
    }

    fn kind(&self) -> &'static str {
        "sql"
    }
}
