//! Request rate limiting.
//!
//! A sliding-window limiter shared by the check endpoints. Timestamps of
//! recent requests are kept in a window; a request is admitted only while
//! the window has room. Thread-safe via interior mutability so handlers
//! only need a shared reference.

use std::collections::VecDeque;
use std::sync::Mutex;
use std::time::{Duration, Instant};

/// A sliding-window rate limiter.
#[derive(Debug)]
pub struct RateLimiter {
    /// Timestamps of admitted requests within the current window.
    requests: Mutex<VecDeque<Instant>>,
    /// Maximum number of requests allowed per window.
    max_requests: usize,
    /// Duration of the sliding window.
    window: Duration,
}

impl RateLimiter {
    /// Create a new rate limiter allowing `max_requests` per `window`.
    pub fn new(max_requests: usize, window: Duration) -> Self {
        Self {
            requests: Mutex::new(VecDeque::new()),
            max_requests,
            window,
        }
    }

    /// Try to admit one request; returns false when the window is full.
    pub fn try_acquire(&self) -> bool {
        let now = Instant::now();
        let mut requests = self.requests.lock().unwrap();

        // Evict requests that have fallen outside the window
        while let Some(&oldest) = requests.front() {
            if now.duration_since(oldest) >= self.window {
                requests.pop_front();
            } else {
                break;
            }
        }

        if requests.len() >= self.max_requests {
            return false;
        }

        requests.push_back(now);
        true
    }

    /// Number of requests currently counted against the window.
    pub fn in_flight(&self) -> usize {
        let now = Instant::now();
        let requests = self.requests.lock().unwrap();
        requests
            .iter()
            .filter(|&&t| now.duration_since(t) < self.window)
            .count()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn admits_up_to_the_limit() {
        let limiter = RateLimiter::new(3, Duration::from_secs(60));
        assert!(limiter.try_acquire());
        assert!(limiter.try_acquire());
        assert!(limiter.try_acquire());
        assert!(!limiter.try_acquire());
        assert_eq!(limiter.in_flight(), 3);
    }

    #[test]
    fn window_expiry_frees_capacity() {
        let limiter = RateLimiter::new(1, Duration::from_millis(10));
        assert!(limiter.try_acquire());
        assert!(!limiter.try_acquire());

        std::thread::sleep(Duration::from_millis(20));
        assert!(limiter.try_acquire());
    }

    #[test]
    fn is_shareable_across_threads() {
        let limiter = std::sync::Arc::new(RateLimiter::new(1000, Duration::from_secs(60)));
        let handles: Vec<_> = (0..4)
            .map(|_| {
                let limiter = std::sync::Arc::clone(&limiter);
                std::thread::spawn(move || (0..10).filter(|_| limiter.try_acquire()).count())
            })
            .collect();
        let admitted: usize = handles.into_iter().map(|h| h.join().unwrap()).sum();
        assert_eq!(admitted, 40);
    }
}
