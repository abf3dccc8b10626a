//! Lazily established, shared database connection.
//!
//! [`ConnectionCache`] owns at most one live handle per process. The first
//! caller of [`ConnectionCache::get`] establishes it; callers arriving while
//! that attempt is in flight wait for it and share its outcome, success or
//! failure, instead of opening their own (single-flight). Each attempt is
//! bounded by a timeout and transient failures are retried with exponential
//! backoff. A failed establishment leaves the cache empty so the next call
//! that arrives after it starts over.

use std::fmt;
use std::sync::atomic::{AtomicU64, Ordering};
use std::time::Duration;

use async_trait::async_trait;
use tokio::sync::{Mutex, OnceCell};

use crate::config::DatabaseConfig;
use crate::error::AppError;

/// Opens a new connection handle.
#[async_trait]
pub trait Connector: Send + Sync + fmt::Debug {
    /// Cheaply clonable live handle.
    type Handle: Clone + Send + Sync + fmt::Debug + 'static;

    /// Performs one connection attempt.
    async fn connect(&self) -> Result<Self::Handle, AppError>;
}

/// Timeout and retry settings for connection establishment.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RetryPolicy {
    /// Upper bound on one attempt.
    pub attempt_timeout: Duration,
    /// Extra attempts after a transient failure.
    pub retries: u32,
    /// Delay before the first retry; doubled for each later one.
    pub backoff: Duration,
}

impl From<&DatabaseConfig> for RetryPolicy {
    fn from(config: &DatabaseConfig) -> Self {
        Self {
            attempt_timeout: config.connect_timeout,
            retries: config.connect_retries,
            backoff: config.retry_backoff,
        }
    }
}

/// Single-flight cache around a [`Connector`].
///
/// `handle` is the lock-free fast path once connected. `in_flight` is held
/// for the whole of an establishment and keeps the error of the last failed
/// one; `failures` counts failed establishments so a waiter can tell that
/// the attempt it queued behind has already failed.
#[derive(Debug)]
pub struct ConnectionCache<C: Connector> {
    connector: C,
    policy: RetryPolicy,
    handle: OnceCell<C::Handle>,
    in_flight: Mutex<Option<AppError>>,
    failures: AtomicU64,
}

impl<C: Connector> ConnectionCache<C> {
    /// Creates an empty cache; nothing connects until [`Self::get`].
    #[must_use]
    pub fn new(connector: C, policy: RetryPolicy) -> Self {
        Self {
            connector,
            policy,
            handle: OnceCell::new(),
            in_flight: Mutex::new(None),
            failures: AtomicU64::new(0),
        }
    }

    /// Returns the shared handle, establishing it on first use.
    ///
    /// Callers that arrive while an establishment is running receive its
    /// result; a failed establishment is not repeated for them.
    ///
    /// # Errors
    ///
    /// Returns the last establishment error once retries are exhausted,
    /// or immediately for a non-transient error such as
    /// [`AppError::Configuration`].
    pub async fn get(&self) -> Result<C::Handle, AppError> {
        if let Some(handle) = self.handle.get() {
            return Ok(handle.clone());
        }

        let observed = self.failures.load(Ordering::Acquire);
        let mut last_error = self.in_flight.lock().await;

        if let Some(handle) = self.handle.get() {
            return Ok(handle.clone());
        }
        if self.failures.load(Ordering::Acquire) != observed {
            if let Some(err) = last_error.as_ref() {
                return Err(err.clone());
            }
        }

        match self.establish().await {
            Ok(handle) => {
                *last_error = None;
                Ok(self.handle.get_or_init(|| async move { handle }).await.clone())
            }
            Err(err) => {
                *last_error = Some(err.clone());
                self.failures.fetch_add(1, Ordering::Release);
                Err(err)
            }
        }
    }

    /// Returns `true` once a handle has been established.
    #[must_use]
    pub fn is_connected(&self) -> bool {
        self.handle.initialized()
    }

    async fn establish(&self) -> Result<C::Handle, AppError> {
        let mut backoff = self.policy.backoff;
        let mut attempt: u32 = 0;
        loop {
            attempt = attempt.saturating_add(1);
            let result =
                match tokio::time::timeout(self.policy.attempt_timeout, self.connector.connect())
                    .await
                {
                    Ok(result) => result,
                    Err(_) => Err(AppError::Connectivity(format!(
                        "connection attempt timed out after {:?}",
                        self.policy.attempt_timeout
                    ))),
                };

            match result {
                Ok(handle) => {
                    tracing::info!(attempt, "database connection established");
                    return Ok(handle);
                }
                Err(err) if err.is_transient() && attempt <= self.policy.retries => {
                    tracing::warn!(attempt, error = %err, ?backoff, "connection attempt failed; retrying");
                    tokio::time::sleep(backoff).await;
                    backoff = backoff.saturating_mul(2);
                }
                Err(err) => {
                    tracing::error!(attempt, error = %err, "database connection failed");
                    return Err(err);
                }
            }
        }
    }
}

#[cfg(test)]
#[allow(clippy::panic)]
mod tests {
    use std::sync::Arc;
    use std::sync::atomic::{AtomicU32, Ordering};

    use super::*;

    /// Connector that fails `failures` times, then hands out its attempt
    /// number as the handle.
    #[derive(Debug)]
    struct CountingConnector {
        attempts: Arc<AtomicU32>,
        failures: u32,
        failure: fn() -> AppError,
        delay: Duration,
    }

    impl CountingConnector {
        fn ok(delay: Duration) -> Self {
            Self {
                attempts: Arc::new(AtomicU32::new(0)),
                failures: 0,
                failure: || AppError::Connectivity("refused".to_string()),
                delay,
            }
        }
    }

    #[async_trait]
    impl Connector for CountingConnector {
        type Handle = u32;

        async fn connect(&self) -> Result<u32, AppError> {
            let n = self.attempts.fetch_add(1, Ordering::SeqCst) + 1;
            tokio::time::sleep(self.delay).await;
            if n <= self.failures {
                return Err((self.failure)());
            }
            Ok(n)
        }
    }

    fn policy(retries: u32) -> RetryPolicy {
        RetryPolicy {
            attempt_timeout: Duration::from_millis(500),
            retries,
            backoff: Duration::from_millis(1),
        }
    }

    #[tokio::test]
    async fn concurrent_first_use_connects_once() {
        let connector = CountingConnector::ok(Duration::from_millis(50));
        let attempts = Arc::clone(&connector.attempts);
        let cache = Arc::new(ConnectionCache::new(connector, policy(0)));

        let mut tasks = Vec::new();
        for _ in 0..16 {
            let cache = Arc::clone(&cache);
            tasks.push(tokio::spawn(async move { cache.get().await }));
        }
        for task in tasks {
            let Ok(Ok(handle)) = task.await else {
                panic!("every caller should get the handle");
            };
            assert_eq!(handle, 1);
        }
        assert_eq!(attempts.load(Ordering::SeqCst), 1);
        assert!(cache.is_connected());
    }

    #[tokio::test]
    async fn handle_is_memoized() {
        let connector = CountingConnector::ok(Duration::ZERO);
        let attempts = Arc::clone(&connector.attempts);
        let cache = ConnectionCache::new(connector, policy(0));

        assert!(!cache.is_connected());
        tokio_test::assert_ok!(cache.get().await);
        tokio_test::assert_ok!(cache.get().await);
        assert_eq!(attempts.load(Ordering::SeqCst), 1);
    }

    #[tokio::test]
    async fn transient_failures_are_retried() {
        let connector = CountingConnector {
            failures: 2,
            ..CountingConnector::ok(Duration::ZERO)
        };
        let attempts = Arc::clone(&connector.attempts);
        let cache = ConnectionCache::new(connector, policy(3));

        assert_eq!(cache.get().await.ok(), Some(3));
        assert_eq!(attempts.load(Ordering::SeqCst), 3);
    }

    #[tokio::test]
    async fn gives_up_after_retries_and_allows_a_later_attempt() {
        let connector = CountingConnector {
            failures: 3,
            ..CountingConnector::ok(Duration::ZERO)
        };
        let attempts = Arc::clone(&connector.attempts);
        let cache = ConnectionCache::new(connector, policy(1));

        let err = tokio_test::assert_err!(cache.get().await);
        assert!(matches!(err, AppError::Connectivity(_)));
        assert_eq!(attempts.load(Ordering::SeqCst), 2);
        assert!(!cache.is_connected());

        // The next call starts over: attempt 3 fails and is retried as 4.
        assert_eq!(cache.get().await.ok(), Some(4));
        assert_eq!(attempts.load(Ordering::SeqCst), 4);
    }

    #[tokio::test]
    async fn concurrent_callers_share_one_failed_establishment() {
        let connector = CountingConnector {
            failures: u32::MAX,
            ..CountingConnector::ok(Duration::from_millis(40))
        };
        let attempts = Arc::clone(&connector.attempts);
        let cache = Arc::new(ConnectionCache::new(connector, policy(2)));

        let mut tasks = Vec::new();
        for _ in 0..8 {
            let cache = Arc::clone(&cache);
            tasks.push(tokio::spawn(async move { cache.get().await }));
        }
        for task in tasks {
            let Ok(Err(err)) = task.await else {
                panic!("every caller should see the failure");
            };
            assert!(matches!(err, AppError::Connectivity(_)));
        }
        assert_eq!(attempts.load(Ordering::SeqCst), 3);
        assert!(!cache.is_connected());

        // A caller arriving after the failure starts a fresh establishment.
        tokio_test::assert_err!(cache.get().await);
        assert_eq!(attempts.load(Ordering::SeqCst), 6);
    }

    #[tokio::test]
    async fn configuration_errors_are_not_retried() {
        let connector = CountingConnector {
            failures: 1,
            failure: || AppError::Configuration("missing MONGODB_URI".to_string()),
            ..CountingConnector::ok(Duration::ZERO)
        };
        let attempts = Arc::clone(&connector.attempts);
        let cache = ConnectionCache::new(connector, policy(5));

        let err = tokio_test::assert_err!(cache.get().await);
        assert!(matches!(err, AppError::Configuration(_)));
        assert_eq!(attempts.load(Ordering::SeqCst), 1);
    }

    #[tokio::test]
    async fn slow_attempts_time_out() {
        let connector = CountingConnector::ok(Duration::from_secs(5));
        let cache = ConnectionCache::new(
            connector,
            RetryPolicy {
                attempt_timeout: Duration::from_millis(20),
                retries: 1,
                backoff: Duration::from_millis(1),
            },
        );

        let err = tokio_test::assert_err!(cache.get().await);
        assert!(matches!(err, AppError::Connectivity(_)));
        assert!(err.to_string().contains("timed out"));
    }
}
