//! Breach oracle boundary.
//!
//! The engine never talks to the breach service itself; callers supply an
//! implementation of [`BreachOracle`] (an HTTP range-query client, a local
//! corpus, a stub). This is the only suspending operation in an analysis,
//! and it is always wrapped in a timeout: unavailable or slow oracles
//! degrade to "unknown, assume clean" evidence and never block a verdict.

use std::future::Future;
use std::time::Duration;

use thiserror::Error;

use crate::types::HibpResult;

/// Default budget for one oracle lookup.
pub const DEFAULT_ORACLE_TIMEOUT: Duration = Duration::from_secs(2);

#[derive(Error, Debug)]
pub enum OracleError {
    #[error("breach oracle unavailable: {0}")]
    Unavailable(String),
    #[error("breach oracle returned a malformed response: {0}")]
    Malformed(String),
}

/// Supplies pwned-status and occurrence count for a raw password.
pub trait BreachOracle: Send + Sync {
    fn lookup(
        &self,
        password: &str,
    ) -> impl Future<Output = Result<HibpResult, OracleError>> + Send;
}

/// Oracle that never reports a breach; used when the check is disabled.
#[derive(Debug, Clone, Copy, Default)]
pub struct DisabledOracle;

impl BreachOracle for DisabledOracle {
    async fn lookup(&self, _password: &str) -> Result<HibpResult, OracleError> {
        Ok(HibpResult::default())
    }
}

/// Resolves breach evidence with a timeout, degrading every failure mode
/// to the default clean result.
pub(crate) async fn resolve<O: BreachOracle>(
    oracle: &O,
    password: &str,
    timeout: Duration,
) -> HibpResult {
    match tokio::time::timeout(timeout, oracle.lookup(password)).await {
        Ok(Ok(result)) => result,
        Ok(Err(_error)) => {
            #[cfg(feature = "tracing")]
            tracing::warn!("breach oracle failed, degrading to clean: {}", _error);
            HibpResult::default()
        }
        Err(_) => {
            #[cfg(feature = "tracing")]
            tracing::warn!("breach oracle timed out, degrading to clean");
            HibpResult::default()
        }
    }
}
