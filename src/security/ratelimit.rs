//! Per-client rate limiting
//!
//! Fixed-window counters keyed by client IP. The map is an explicit component
//! owned by `AppState` and guarded by a mutex; it is bounded, with
//! oldest-window entries evicted once the configured capacity is exceeded.

use crate::config::RateLimitConfig;
use std::collections::HashMap;
use std::net::IpAddr;
use std::sync::Mutex;
use std::time::{Duration, Instant};

/// Outcome of a rate-limit check
#[derive(Debug, PartialEq, Eq)]
pub enum RateLimitDecision {
    Allowed,
    Limited { retry_after_secs: u64 },
}

struct WindowRecord {
    window_start: Instant,
    count: u32,
}

/// Bounded fixed-window request counter
pub struct RateLimiter {
    config: RateLimitConfig,
    records: Mutex<HashMap<IpAddr, WindowRecord>>,
}

impl RateLimiter {
    pub fn new(config: RateLimitConfig) -> Self {
        Self {
            config,
            records: Mutex::new(HashMap::new()),
        }
    }

    /// Count one request from `client` and decide whether to serve it
    pub fn check(&self, client: IpAddr) -> RateLimitDecision {
        self.check_at(client, Instant::now())
    }

    fn check_at(&self, client: IpAddr, now: Instant) -> RateLimitDecision {
        if !self.config.enabled {
            return RateLimitDecision::Allowed;
        }

        let window = Duration::from_secs(self.config.window_secs);
        let mut records = self.records.lock().unwrap();

        if let Some(record) = records.get_mut(&client) {
            if now.duration_since(record.window_start) <= window {
                if record.count >= self.config.max_requests {
                    let remaining = (record.window_start + window).saturating_duration_since(now);
                    return RateLimitDecision::Limited {
                        retry_after_secs: ceil_secs(remaining),
                    };
                }
                record.count += 1;
                return RateLimitDecision::Allowed;
            }
            // expired window: reset the counter instead of accumulating
            record.window_start = now;
            record.count = 1;
            return RateLimitDecision::Allowed;
        }

        if records.len() >= self.config.cache_size {
            evict(&mut records, window, now, self.config.cache_size);
        }
        records.insert(
            client,
            WindowRecord {
                window_start: now,
                count: 1,
            },
        );
        RateLimitDecision::Allowed
    }
}

/// Drop expired records, then oldest-window records until below capacity
fn evict(
    records: &mut HashMap<IpAddr, WindowRecord>,
    window: Duration,
    now: Instant,
    capacity: usize,
) {
    records.retain(|_, record| now.duration_since(record.window_start) <= window);

    while records.len() >= capacity {
        let oldest = records
            .iter()
            .min_by_key(|(_, record)| record.window_start)
            .map(|(ip, _)| *ip);
        match oldest {
            Some(ip) => {
                records.remove(&ip);
            }
            None => break,
        }
    }
}

fn ceil_secs(duration: Duration) -> u64 {
    let secs = duration.as_secs();
    if duration.subsec_nanos() > 0 {
        secs + 1
    } else {
        secs.max(1)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn limiter(max_requests: u32, cache_size: usize) -> RateLimiter {
        RateLimiter::new(RateLimitConfig {
            enabled: true,
            window_secs: 60,
            max_requests,
            cache_size,
        })
    }

    fn ip(last: u8) -> IpAddr {
        IpAddr::from([10, 0, 0, last])
    }

    #[test]
    fn test_allows_up_to_limit() {
        let limiter = limiter(3, 100);
        let start = Instant::now();
        for _ in 0..3 {
            assert_eq!(limiter.check_at(ip(1), start), RateLimitDecision::Allowed);
        }
        assert!(matches!(
            limiter.check_at(ip(1), start),
            RateLimitDecision::Limited { .. }
        ));
    }

    #[test]
    fn test_retry_after_is_bounded_by_window() {
        let limiter = limiter(1, 100);
        let start = Instant::now();
        limiter.check_at(ip(1), start);
        let decision = limiter.check_at(ip(1), start + Duration::from_secs(10));
        match decision {
            RateLimitDecision::Limited { retry_after_secs } => {
                assert!(retry_after_secs >= 1);
                assert!(retry_after_secs <= 60);
            }
            RateLimitDecision::Allowed => panic!("expected limited"),
        }
    }

    #[test]
    fn test_expired_window_resets_counter() {
        let limiter = limiter(2, 100);
        let start = Instant::now();
        limiter.check_at(ip(1), start);
        limiter.check_at(ip(1), start);
        // past the window the counter starts over rather than accumulating
        let later = start + Duration::from_secs(61);
        assert_eq!(limiter.check_at(ip(1), later), RateLimitDecision::Allowed);
        assert_eq!(limiter.check_at(ip(1), later), RateLimitDecision::Allowed);
    }

    #[test]
    fn test_clients_are_counted_independently() {
        let limiter = limiter(1, 100);
        let start = Instant::now();
        limiter.check_at(ip(1), start);
        assert_eq!(limiter.check_at(ip(2), start), RateLimitDecision::Allowed);
    }

    #[test]
    fn test_capacity_evicts_oldest_window() {
        let limiter = limiter(100, 2);
        let start = Instant::now();
        limiter.check_at(ip(1), start);
        limiter.check_at(ip(2), start + Duration::from_secs(5));
        limiter.check_at(ip(3), start + Duration::from_secs(10));

        let records = limiter.records.lock().unwrap();
        assert!(records.len() <= 2);
        assert!(!records.contains_key(&ip(1)), "oldest window evicted first");
        assert!(records.contains_key(&ip(3)));
    }

    #[test]
    fn test_disabled_limiter_always_allows() {
        let limiter = RateLimiter::new(RateLimitConfig {
            enabled: false,
            window_secs: 60,
            max_requests: 1,
            cache_size: 10,
        });
        for _ in 0..10 {
            assert_eq!(limiter.check(ip(1)), RateLimitDecision::Allowed);
        }
    }
}
