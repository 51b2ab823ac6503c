//! Bounded retry with delay for store operations.
//!
//! SQLite reports write contention ("database is locked" / busy) as a
//! routine condition when another writer holds the lock, so every store
//! write in the repair path goes through [`retry_db`] with a policy from
//! config. The retryability predicate keeps constraint violations and other
//! hard errors out of the retry loop — those return immediately.

use std::future::Future;
use std::time::Duration;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Backoff {
    /// Same delay before every retry.
    Fixed,
    /// Delay grows linearly: base, 2x base, 3x base, ...
    Linear,
}

/// How many times to attempt an operation and how long to wait in between.
#[derive(Debug, Clone, Copy)]
pub struct RetryPolicy {
    pub attempts: u32,
    pub delay: Duration,
    pub backoff: Backoff,
}

impl RetryPolicy {
    pub fn fixed(attempts: u32, delay: Duration) -> Self {
        Self {
            attempts,
            delay,
            backoff: Backoff::Fixed,
        }
    }

    pub fn linear(attempts: u32, delay: Duration) -> Self {
        Self {
            attempts,
            delay,
            backoff: Backoff::Linear,
        }
    }

    /// Delay to sleep after the given failed attempt (1-based).
    fn delay_after(&self, attempt: u32) -> Duration {
        match self.backoff {
            Backoff::Fixed => self.delay,
            Backoff::Linear => self.delay * attempt,
        }
    }
}

/// Run `op` up to `policy.attempts` times, sleeping between attempts.
///
/// Errors for which `retryable` returns false are returned immediately;
/// exhausting the attempt bound returns the last error.
pub async fn retry_db<T, F, Fut, P>(
    policy: &RetryPolicy,
    retryable: P,
    mut op: F,
) -> Result<T, sqlx::Error>
where
    F: FnMut() -> Fut,
    Fut: Future<Output = Result<T, sqlx::Error>>,
    P: Fn(&sqlx::Error) -> bool,
{
    let mut attempt = 0u32;
    loop {
        attempt += 1;
        match op().await {
            Ok(value) => return Ok(value),
            Err(err) if attempt < policy.attempts && retryable(&err) => {
                tokio::time::sleep(policy.delay_after(attempt)).await;
            }
            Err(err) => return Err(err),
        }
    }
}

/// True for SQLITE_BUSY / SQLITE_LOCKED (including extended codes).
pub fn is_busy(err: &sqlx::Error) -> bool {
    if let sqlx::Error::Database(db) = err {
        if let Some(code) = db.code() {
            if let Ok(n) = code.parse::<i64>() {
                let primary = n & 0xff;
                if primary == 5 || primary == 6 {
                    return true;
                }
            }
        }
        let msg = db.message();
        return msg.contains("locked") || msg.contains("busy");
    }
    false
}

/// True when the store rejected an insert on the unit key's unique index.
pub fn is_unique_violation(err: &sqlx::Error) -> bool {
    if let sqlx::Error::Database(db) = err {
        return matches!(db.kind(), sqlx::error::ErrorKind::UniqueViolation);
    }
    false
}

#[cfg(test)]
mod tests {
    use super::*;

    fn zero_delay(attempts: u32) -> RetryPolicy {
        RetryPolicy::fixed(attempts, Duration::from_millis(0))
    }

    #[tokio::test]
    async fn test_succeeds_after_retryable_failures() {
        let mut calls = 0u32;
        let result = retry_db(
            &zero_delay(3),
            |e| matches!(e, sqlx::Error::PoolTimedOut),
            || {
                calls += 1;
                let n = calls;
                async move {
                    if n < 3 {
                        Err(sqlx::Error::PoolTimedOut)
                    } else {
                        Ok(n)
                    }
                }
            },
        )
        .await;
        assert_eq!(result.unwrap(), 3);
        assert_eq!(calls, 3);
    }

    #[tokio::test]
    async fn test_exhausts_bound_and_returns_last_error() {
        let mut calls = 0u32;
        let result: Result<(), _> = retry_db(
            &zero_delay(3),
            |e| matches!(e, sqlx::Error::PoolTimedOut),
            || {
                calls += 1;
                async { Err(sqlx::Error::PoolTimedOut) }
            },
        )
        .await;
        assert!(result.is_err());
        assert_eq!(calls, 3);
    }

    #[tokio::test]
    async fn test_non_retryable_error_fails_immediately() {
        let mut calls = 0u32;
        let result: Result<(), _> = retry_db(
            &zero_delay(5),
            |e| matches!(e, sqlx::Error::PoolTimedOut),
            || {
                calls += 1;
                async { Err(sqlx::Error::RowNotFound) }
            },
        )
        .await;
        assert!(result.is_err());
        assert_eq!(calls, 1);
    }

    #[test]
    fn test_linear_backoff_schedule() {
        let policy = RetryPolicy::linear(5, Duration::from_secs(2));
        assert_eq!(policy.delay_after(1), Duration::from_secs(2));
        assert_eq!(policy.delay_after(2), Duration::from_secs(4));
        assert_eq!(policy.delay_after(3), Duration::from_secs(6));
    }

    #[test]
    fn test_fixed_backoff_schedule() {
        let policy = RetryPolicy::fixed(3, Duration::from_secs(1));
        assert_eq!(policy.delay_after(1), Duration::from_secs(1));
        assert_eq!(policy.delay_after(2), Duration::from_secs(1));
    }

    #[test]
    fn test_is_busy_ignores_non_database_errors() {
        assert!(!is_busy(&sqlx::Error::RowNotFound));
        assert!(!is_unique_violation(&sqlx::Error::PoolTimedOut));
    }
}
