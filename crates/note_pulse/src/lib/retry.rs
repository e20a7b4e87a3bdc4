//! Bounded retry of provider calls across key-pool draws.
//!
//! Call sites get a tagged success/failure result rather than a raised
//! provider error; each attempt draws a fresh key from the pool and the
//! draw counts against that key's usage even when the attempt fails.

use std::{fmt::Debug, future::Future, time::Duration};

use crate::keypool::{ApiKey, ApiKeyPool};

/// Attempt budget and per-attempt timeout for one external dependency.
#[derive(Debug, Clone)]
pub struct RetryPolicy {
    pub max_attempts: u32,
    pub attempt_timeout: Duration,
}

impl RetryPolicy {
    /// Transcript fetches fail transiently more often than completions,
    /// so they carry a larger attempt budget.
    pub fn transcript() -> Self {
        Self {
            max_attempts: 5,
            attempt_timeout: Duration::from_secs(30),
        }
    }

    /// Completions are slow to generate but rarely flake, hence the
    /// longer timeout and smaller budget.
    pub fn notes() -> Self {
        Self {
            max_attempts: 3,
            attempt_timeout: Duration::from_secs(120),
        }
    }

    pub fn max_attempts(mut self, max_attempts: u32) -> Self {
        self.max_attempts = max_attempts;
        self
    }

    pub fn attempt_timeout(mut self, attempt_timeout: Duration) -> Self {
        self.attempt_timeout = attempt_timeout;
        self
    }
}

/// The last failure observed before the attempt budget ran out.
#[derive(Debug)]
pub enum AttemptFailure<E> {
    TimedOut(Duration),
    Failed(E),
}

#[derive(Debug, thiserror::Error)]
#[error("all {attempts} attempts failed, last failure: {last:?}")]
pub struct RetriesExhausted<E: Debug> {
    pub attempts: u32,
    pub last: AttemptFailure<E>,
}

/// Runs `op` against keys drawn from `pool` until it succeeds or the
/// attempt budget is spent.
///
/// A drawn key may repeat across attempts when it is still the least
/// used; permanently broken keys are not excluded from rotation.
pub async fn invoke<T, E, F, Fut>(
    pool: &ApiKeyPool,
    policy: &RetryPolicy,
    op: F,
) -> Result<T, RetriesExhausted<E>>
where
    E: Debug,
    F: Fn(ApiKey) -> Fut,
    Fut: Future<Output = Result<T, E>>,
{
    let max_attempts = policy.max_attempts.max(1);
    let mut last = None;

    for attempt in 1..=max_attempts {
        let key = pool.next_key();

        match tokio::time::timeout(policy.attempt_timeout, op(key)).await {
            Ok(Ok(value)) => return Ok(value),
            Ok(Err(e)) => {
                tracing::warn!(attempt, max_attempts, error = ?e, "Attempt failed");
                last = Some(AttemptFailure::Failed(e));
            }
            Err(_) => {
                tracing::warn!(
                    attempt,
                    max_attempts,
                    timeout = ?policy.attempt_timeout,
                    "Attempt timed out"
                );
                last = Some(AttemptFailure::TimedOut(policy.attempt_timeout));
            }
        }
    }

    Err(RetriesExhausted {
        attempts: max_attempts,
        last: last.expect("at least one attempt ran"),
    })
}
