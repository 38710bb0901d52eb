//! HTTP concurrency limiter.
//!
//! A semaphore-based limiter that constrains the number of concurrent HTTP
//! requests issued while a panorama is processed. Probes and downloads of all
//! faces and all fallback levels share it, so a face with a wide grid cannot
//! open an unbounded number of connections to the tile server.
//!
//! ```ignore
//! let limiter = Arc::new(HttpConcurrencyLimiter::new(16));
//!
//! let _permit = limiter.acquire().await?;
//! // HTTP request happens here, permit is released on drop
//! ```

use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Arc;
use tokio::sync::{AcquireError, OwnedSemaphorePermit, Semaphore};

/// Limiter for HTTP request concurrency.
#[derive(Debug)]
pub struct HttpConcurrencyLimiter {
    semaphore: Arc<Semaphore>,
    max_permits: usize,
    /// Current number of in-flight requests
    in_flight: AtomicUsize,
    /// Peak concurrent requests observed
    peak_in_flight: AtomicUsize,
}

impl HttpConcurrencyLimiter {
    /// Creates a limiter allowing `max_concurrent` requests (at least 1).
    pub fn new(max_concurrent: usize) -> Self {
        let max_concurrent = max_concurrent.max(1);
        Self {
            semaphore: Arc::new(Semaphore::new(max_concurrent)),
            max_permits: max_concurrent,
            in_flight: AtomicUsize::new(0),
            peak_in_flight: AtomicUsize::new(0),
        }
    }

    /// Acquires a permit for an HTTP request, waiting if the limit has been
    /// reached. The permit is released when dropped.
    ///
    /// Fails only once the limiter has been [closed](Self::close).
    pub async fn acquire(&self) -> Result<HttpPermit<'_>, AcquireError> {
        let permit = self.semaphore.clone().acquire_owned().await?;

        let current = self.in_flight.fetch_add(1, Ordering::Relaxed) + 1;
        self.peak_in_flight.fetch_max(current, Ordering::Relaxed);

        Ok(HttpPermit {
            _permit: permit,
            in_flight: &self.in_flight,
        })
    }

    /// Closes the limiter; pending and future acquisitions fail.
    pub fn close(&self) {
        self.semaphore.close();
    }

    /// Returns the maximum number of concurrent requests allowed.
    pub fn max_concurrent(&self) -> usize {
        self.max_permits
    }

    /// Returns the current number of in-flight HTTP requests.
    pub fn in_flight(&self) -> usize {
        self.in_flight.load(Ordering::Relaxed)
    }

    /// Returns the peak number of concurrent requests observed.
    pub fn peak_in_flight(&self) -> usize {
        self.peak_in_flight.load(Ordering::Relaxed)
    }

    /// Returns the number of available permits.
    pub fn available_permits(&self) -> usize {
        self.semaphore.available_permits()
    }
}

/// A permit for making an HTTP request.
pub struct HttpPermit<'a> {
    _permit: OwnedSemaphorePermit,
    in_flight: &'a AtomicUsize,
}

impl Drop for HttpPermit<'_> {
    fn drop(&mut self) {
        self.in_flight.fetch_sub(1, Ordering::Relaxed);
    }
}
