//! Farescout Query Queues
//! Copyright (c) 2026 Mamy Ratsimbazafy
//! Licensed and distributed under either of
//!   * MIT license (license terms at the root of the package or at http://opensource.org/licenses/MIT).
//!   * Apache v2 license (license terms at the root of the package or at http://www.apache.org/licenses/LICENSE-2.0).
//! at your option. This file may not be copied, modified, or distributed except according to those terms.

//! farescout-internals/query-queues
//! A small work queue that bounds how hard we hit an external provider,
//! with an ordered operating-mode fallback instead of blind retries.

use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::Arc;
use std::time::{Duration, Instant};

use thiserror::Error;
use tokio::sync::Semaphore;
use tokio::sync::{Mutex, Notify};
use tokio::time;

/// Custom error for the work queue
#[derive(Debug, Error)]
pub enum QueryQueueError {
    #[error("query failed after {attempts} attempt(s): {source}")]
    Failed {
        attempts: usize,
        #[source]
        source: anyhow::Error,
    },
    #[error("no operating modes configured")]
    NoModes,
    #[error("queue is closed")]
    QueueClosed,
}

/// Rate limiting mode
#[derive(Clone, Debug)]
enum RateLimit {
    ConcurrencyOnly,
    Qps {
        limit: u64,
        tokens: Arc<AtomicU64>,
        last_refill: Arc<Mutex<Instant>>,
        refill_interval: Duration,
        notify: Arc<Notify>,
    },
}

/// Limits concurrent (and optionally per-second) requests to an external service.
///
/// A query runs exactly once per operating mode. `run_with_fallback` walks an
/// ordered list of modes and only moves on when the caller says the error
/// warrants it.
///
/// # Examples
///
/// Concurrency only (4 concurrent requests):
/// ```ignore
/// let queue = QueryQueue::with_concurrency_limit(4);
/// ```
///
/// QPS limit (4 requests per second):
/// ```ignore
/// let queue = QueryQueue::with_qps_limit(4);
/// ```
#[derive(Clone, Debug)]
pub struct QueryQueue {
    semaphore: Arc<Semaphore>,
    rate_limit: RateLimit,
}

impl Default for QueryQueue {
    fn default() -> Self {
        Self::with_concurrency_limit(4)
    }
}

impl QueryQueue {
    /// Create a new work queue with max concurrent requests
    pub fn with_concurrency_limit(max_concurrent: u64) -> Self {
        let max_concurrent = max_concurrent.max(1);
        Self {
            semaphore: Arc::new(Semaphore::new(max_concurrent as usize)),
            rate_limit: RateLimit::ConcurrencyOnly,
        }
    }

    /// Create a new work queue with QPS limit
    pub fn with_qps_limit(qps_limit: u64) -> Self {
        let qps_limit = qps_limit.max(1);
        Self {
            semaphore: Arc::new(Semaphore::new(qps_limit as usize)),
            rate_limit: RateLimit::Qps {
                limit: qps_limit,
                tokens: Arc::new(AtomicU64::new(qps_limit)),
                last_refill: Arc::new(Mutex::new(Instant::now())),
                refill_interval: Duration::from_secs(1),
                notify: Arc::new(Notify::new()),
            },
        }
    }

    /// Number of requests that may start right now.
    pub fn available_permits(&self) -> usize {
        self.semaphore.available_permits()
    }

    async fn refill_tokens(&self) {
        if let RateLimit::Qps {
            limit,
            tokens,
            last_refill,
            refill_interval,
            notify,
        } = &self.rate_limit
        {
            let mut last = last_refill.lock().await;
            let elapsed = last.elapsed();
            if elapsed < *refill_interval {
                return;
            }
            let new_tokens = (elapsed.as_secs_f64() * *limit as f64) as u64;
            if new_tokens > 0 {
                let _ = tokens.fetch_update(Ordering::SeqCst, Ordering::SeqCst, |cur| {
                    Some(cur.saturating_add(new_tokens).min(*limit))
                });
                notify.notify_waiters();
            }
            *last = Instant::now();
        }
    }

    async fn acquire_token(&self) {
        let RateLimit::Qps { tokens, notify, .. } = &self.rate_limit else {
            return;
        };
        loop {
            self.refill_tokens().await;
            let available = tokens.load(Ordering::SeqCst);
            if available > 0 {
                if tokens
                    .compare_exchange(available, available - 1, Ordering::SeqCst, Ordering::SeqCst)
                    .is_ok()
                {
                    return;
                }
            } else {
                let _ = time::timeout(Duration::from_millis(100), notify.notified()).await;
            }
        }
    }

    /// Execute `f` once, under the queue's concurrency and QPS limits.
    pub async fn run<T, F, Fut>(&self, f: F) -> Result<T, QueryQueueError>
    where
        F: FnOnce() -> Fut + Send,
        Fut: std::future::Future<Output = Result<T, anyhow::Error>> + Send,
    {
        let _permit = self
            .semaphore
            .acquire()
            .await
            .map_err(|_| QueryQueueError::QueueClosed)?;
        self.acquire_token().await;

        f().await
            .map_err(|source| QueryQueueError::Failed { attempts: 1, source })
    }

    /// Execute `f` once per mode, in order, until one succeeds.
    ///
    /// After a failure the next mode is tried only if `can_fall_back` accepts
    /// the error; otherwise that error is returned immediately. When every mode
    /// has failed the last error is returned.
    pub async fn run_with_fallback<M, T, F, Fut, P>(
        &self,
        modes: &[M],
        mut f: F,
        can_fall_back: P,
    ) -> Result<T, QueryQueueError>
    where
        M: Copy + Send + Sync,
        F: FnMut(M) -> Fut + Send,
        Fut: std::future::Future<Output = Result<T, anyhow::Error>> + Send,
        P: Fn(&anyhow::Error) -> bool + Send,
    {
        if modes.is_empty() {
            return Err(QueryQueueError::NoModes);
        }

        let _permit = self
            .semaphore
            .acquire()
            .await
            .map_err(|_| QueryQueueError::QueueClosed)?;

        let mut attempts = 0;
        let mut modes = modes.iter().copied().peekable();
        while let Some(mode) = modes.next() {
            self.acquire_token().await;
            attempts += 1;
            match f(mode).await {
                Ok(result) => return Ok(result),
                Err(source) if modes.peek().is_some() && can_fall_back(&source) => continue,
                Err(source) => return Err(QueryQueueError::Failed { attempts, source }),
            }
        }
        Err(QueryQueueError::NoModes)
    }
}
