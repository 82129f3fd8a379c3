//! Request pacing, kept separate from the retry policy.
//!
//! The controller asks a [`Pacer`] before each symbol of the initial load;
//! the fetch client never sees it.

use std::future::Future;
use std::num::NonZeroU32;
use std::pin::Pin;
use std::sync::Arc;
use std::time::Duration;

use governor::clock::DefaultClock;
use governor::state::direct::NotKeyed;
use governor::state::InMemoryState;
use governor::{Quota, RateLimiter};
use tokio::sync::Mutex;
use tokio::time::Instant;

/// Gate that decides when the next request may start.
pub trait Pacer: Send + Sync {
    fn ready<'a>(&'a self) -> Pin<Box<dyn Future<Output = ()> + Send + 'a>>;
}

/// Spaces passes at least `interval` apart; the first pass is immediate.
///
/// Runs on the tokio clock, so paused-time tests can advance through it.
#[derive(Debug)]
pub struct FixedIntervalGate {
    interval: Duration,
    last_pass: Mutex<Option<Instant>>,
}

impl FixedIntervalGate {
    pub fn new(interval: Duration) -> Self {
        Self {
            interval,
            last_pass: Mutex::new(None),
        }
    }

    pub fn interval(&self) -> Duration {
        self.interval
    }
}

impl Pacer for FixedIntervalGate {
    fn ready<'a>(&'a self) -> Pin<Box<dyn Future<Output = ()> + Send + 'a>> {
        Box::pin(async move {
            let deadline = {
                let mut last_pass = self.last_pass.lock().await;
                let now = Instant::now();
                let next = match *last_pass {
                    Some(previous) => (previous + self.interval).max(now),
                    None => now,
                };
                *last_pass = Some(next);
                next
            };
            tokio::time::sleep_until(deadline).await;
        })
    }
}

/// Which [`Pacer`] the controller builds for the initial load.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum PacingMode {
    /// [`FixedIntervalGate`] at the configured spacing.
    #[default]
    FixedInterval,
    /// [`TokenBucketPacer::alphavantage_free_tier`]; the spacing is ignored.
    FreeTierBucket,
}

impl PacingMode {
    /// `interval` or `token-bucket`, case-insensitive.
    pub fn parse(raw: &str) -> Option<Self> {
        match raw.trim().to_ascii_lowercase().as_str() {
            "interval" => Some(Self::FixedInterval),
            "token-bucket" => Some(Self::FreeTierBucket),
            _ => None,
        }
    }

    pub fn pacer(self, spacing: Duration) -> Arc<dyn Pacer> {
        match self {
            Self::FixedInterval => Arc::new(FixedIntervalGate::new(spacing)),
            Self::FreeTierBucket => Arc::new(TokenBucketPacer::alphavantage_free_tier()),
        }
    }
}

type DirectRateLimiter = RateLimiter<NotKeyed, InMemoryState, DefaultClock>;

/// Token bucket allowing `quota_limit` passes per `quota_window`.
#[derive(Clone)]
pub struct TokenBucketPacer {
    limiter: Arc<DirectRateLimiter>,
}

impl TokenBucketPacer {
    pub fn new(quota_window: Duration, quota_limit: u32) -> Self {
        Self {
            limiter: Arc::new(RateLimiter::direct(quota_from_window(
                quota_window,
                quota_limit,
            ))),
        }
    }

    /// Alpha Vantage free tier: five requests per minute.
    pub fn alphavantage_free_tier() -> Self {
        Self::new(Duration::from_secs(60), 5)
    }

    /// Take a token if one is available right now.
    pub fn try_acquire(&self) -> bool {
        self.limiter.check().is_ok()
    }
}

impl Pacer for TokenBucketPacer {
    fn ready<'a>(&'a self) -> Pin<Box<dyn Future<Output = ()> + Send + 'a>> {
        Box::pin(self.limiter.until_ready())
    }
}

fn quota_from_window(quota_window: Duration, quota_limit: u32) -> Quota {
    let burst = NonZeroU32::new(quota_limit).unwrap_or(NonZeroU32::MIN);

    let seconds_per_cell = (quota_window.as_secs_f64() / f64::from(burst.get())).max(0.001);
    let period = Duration::from_secs_f64(seconds_per_cell);

    Quota::with_period(period)
        .unwrap_or_else(|| Quota::per_second(burst))
        .allow_burst(burst)
}
