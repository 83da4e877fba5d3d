//! Bounded external call policy: max attempts, per-attempt timeout, fallback hook.
//!
//! Shared by the Intent Interpreter (model calls) and the Hybrid Retriever
//! (store queries) so retry and timeout behavior lives in one place.

use std::future::Future;
use std::time::Duration;

use tracing::{debug, warn};

use crate::errors::ForgeError;

/// Exhausted call: every attempt failed or timed out.
#[derive(Debug, thiserror::Error)]
#[error("{label} failed after {attempts} attempt(s): {last_error}")]
pub struct CallFailure {
    pub label: String,
    pub attempts: u32,
    #[source]
    pub last_error: ForgeError,
}

impl CallFailure {
    /// Whether the last attempt ended by timeout rather than an error.
    pub fn timed_out(&self) -> bool {
        matches!(self.last_error, ForgeError::Timeout { .. })
    }
}

/// Retry/timeout policy for one kind of external call.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct BoundedCall {
    max_attempts: u32,
    timeout: Duration,
}

impl BoundedCall {
    /// At least one attempt is always made.
    pub fn new(max_attempts: u32, timeout: Duration) -> Self {
        Self {
            max_attempts: max_attempts.max(1),
            timeout,
        }
    }

    /// A single attempt with the given timeout.
    pub fn single(timeout: Duration) -> Self {
        Self::new(1, timeout)
    }

    pub fn max_attempts(&self) -> u32 {
        self.max_attempts
    }

    pub fn timeout(&self) -> Duration {
        self.timeout
    }

    /// Run `op` up to `max_attempts` times. `op` receives the 1-based attempt
    /// number so callers can vary the request between attempts.
    pub async fn run<T, F, Fut>(&self, label: &str, mut op: F) -> Result<T, CallFailure>
    where
        F: FnMut(u32) -> Fut,
        Fut: Future<Output = Result<T, ForgeError>>,
    {
        let after_ms = u64::try_from(self.timeout.as_millis()).unwrap_or(u64::MAX);
        let mut last_error = None;

        for attempt in 1..=self.max_attempts {
            match tokio::time::timeout(self.timeout, op(attempt)).await {
                Ok(Ok(value)) => {
                    if attempt > 1 {
                        debug!(label, attempt, "call succeeded after retry");
                    }
                    return Ok(value);
                }
                Ok(Err(e)) => {
                    debug!(label, attempt, error = %e, "call attempt failed");
                    last_error = Some(e);
                }
                Err(_) => {
                    warn!(label, attempt, after_ms, "call attempt timed out");
                    last_error = Some(ForgeError::Timeout {
                        operation: label.to_string(),
                        after_ms,
                    });
                }
            }
        }

        Err(CallFailure {
            label: label.to_string(),
            attempts: self.max_attempts,
            last_error: last_error.unwrap_or(ForgeError::Timeout {
                operation: label.to_string(),
                after_ms,
            }),
        })
    }

    /// Like [`run`](Self::run) but never fails: on exhaustion the fallback
    /// hook turns the failure into a value.
    pub async fn run_or_else<T, F, Fut, G>(&self, label: &str, op: F, fallback: G) -> T
    where
        F: FnMut(u32) -> Fut,
        Fut: Future<Output = Result<T, ForgeError>>,
        G: FnOnce(CallFailure) -> T,
    {
        match self.run(label, op).await {
            Ok(value) => value,
            Err(failure) => fallback(failure),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::errors::IntentError;
    use std::sync::atomic::{AtomicU32, Ordering};

    fn schema_err() -> ForgeError {
        IntentError::SchemaViolation {
            reason: "bad".into(),
        }
        .into()
    }

    #[tokio::test]
    async fn retries_until_success() {
        let calls = AtomicU32::new(0);
        let policy = BoundedCall::new(2, Duration::from_secs(1));
        let result = policy
            .run("test", |attempt| {
                calls.fetch_add(1, Ordering::SeqCst);
                async move {
                    if attempt == 1 {
                        Err(schema_err())
                    } else {
                        Ok(attempt)
                    }
                }
            })
            .await;
        assert_eq!(result.unwrap(), 2);
        assert_eq!(calls.load(Ordering::SeqCst), 2);
    }

    #[tokio::test]
    async fn exhausts_and_reports_last_error() {
        let policy = BoundedCall::new(2, Duration::from_secs(1));
        let failure = policy
            .run("test", |_| async { Err::<(), _>(schema_err()) })
            .await
            .unwrap_err();
        assert_eq!(failure.attempts, 2);
        assert!(!failure.timed_out());
    }

    #[tokio::test]
    async fn timeout_counts_as_failed_attempt() {
        let policy = BoundedCall::single(Duration::from_millis(10));
        let failure = policy
            .run("slow", |_| async {
                tokio::time::sleep(Duration::from_secs(5)).await;
                Ok::<_, ForgeError>(())
            })
            .await
            .unwrap_err();
        assert!(failure.timed_out());
    }

    #[tokio::test]
    async fn fallback_hook_supplies_value() {
        let policy = BoundedCall::new(3, Duration::from_secs(1));
        let value = policy
            .run_or_else("test", |_| async { Err(schema_err()) }, |f| f.attempts)
            .await;
        assert_eq!(value, 3);
    }

    #[test]
    fn zero_attempts_becomes_one() {
        assert_eq!(BoundedCall::new(0, Duration::from_secs(1)).max_attempts(), 1);
    }
}
