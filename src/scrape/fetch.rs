//! Page fetching with bounded retry and courtesy pacing.

use crate::error::{Error, Result};
use rand::Rng;
use serde::{Deserialize, Serialize};
use std::thread;
use std::time::Duration;
use tracing::{debug, warn};

/// Source of page bodies.
///
/// The crawlers only depend on this trait so that tests can serve fixture
/// HTML without touching the network.
pub trait Fetcher {
    /// Returns the body of the page at `url`.
    fn fetch(&self, url: &str) -> Result<String>;
}

/// [`Fetcher`] backed by a blocking `reqwest` client.
pub struct HttpFetcher {
    client: reqwest::blocking::Client,
}

impl HttpFetcher {
    pub const DEFAULT_TIMEOUT: Duration = Duration::from_secs(30);

    pub fn new() -> Result<Self> {
        Self::with_timeout(Self::DEFAULT_TIMEOUT)
    }

    pub fn with_timeout(timeout: Duration) -> Result<Self> {
        let client = reqwest::blocking::Client::builder()
            .timeout(timeout)
            .user_agent(concat!("dcsite/", env!("CARGO_PKG_VERSION")))
            .build()?;
        Ok(Self { client })
    }
}

impl Fetcher for HttpFetcher {
    fn fetch(&self, url: &str) -> Result<String> {
        debug!(url, "GET");
        let body = self
            .client
            .get(url)
            .send()?
            .error_for_status()?
            .text()?;
        Ok(body)
    }
}

/// Bounded retry with a fixed back-off after each failed attempt.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct RetryPolicy {
    pub max_attempts: usize,
    #[serde(with = "secs")]
    pub backoff: Duration,
}

impl Default for RetryPolicy {
    fn default() -> Self {
        Self {
            max_attempts: 3,
            backoff: Duration::from_secs(3),
        }
    }
}

impl RetryPolicy {
    /// Policy that retries immediately; meant for tests.
    pub fn immediate(max_attempts: usize) -> Self {
        Self {
            max_attempts,
            backoff: Duration::ZERO,
        }
    }

    /// Fetches `url`, retrying up to `max_attempts` times in total.
    ///
    /// # Errors
    ///
    /// [`Error::RetriesExhausted`] when every attempt failed.
    pub fn fetch_with_retry<F: Fetcher + ?Sized>(&self, fetcher: &F, url: &str) -> Result<String> {
        for attempt in 1..=self.max_attempts {
            match fetcher.fetch(url) {
                Ok(body) => return Ok(body),
                Err(e) => {
                    warn!(url, attempt, error = %e, "fetch failed");
                    if !self.backoff.is_zero() {
                        thread::sleep(self.backoff);
                    }
                }
            }
        }
        Err(Error::RetriesExhausted {
            url: url.to_string(),
            attempts: self.max_attempts,
        })
    }
}

/// Random courtesy delay drawn uniformly from `min..=max`.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Pacing {
    #[serde(with = "secs")]
    pub min: Duration,
    #[serde(with = "secs")]
    pub max: Duration,
}

impl Pacing {
    pub fn new(min: Duration, max: Duration) -> Self {
        if min <= max {
            Self { min, max }
        } else {
            Self { min: max, max: min }
        }
    }

    /// After loading a city page.
    pub fn city_page() -> Self {
        Self::new(Duration::from_secs(2), Duration::from_secs(4))
    }

    /// After loading a specs page.
    pub fn specs_page() -> Self {
        Self::new(Duration::from_secs(3), Duration::from_secs(6))
    }

    /// Between two specs items.
    pub fn between_items() -> Self {
        Self::new(Duration::from_secs(8), Duration::from_secs(9))
    }

    pub fn none() -> Self {
        Self::new(Duration::ZERO, Duration::ZERO)
    }

    /// Draws a delay without sleeping.
    pub fn delay<R: Rng>(&self, rng: &mut R) -> Duration {
        if self.min == self.max {
            return self.min;
        }
        let secs = rng.random_range(self.min.as_secs_f64()..=self.max.as_secs_f64());
        Duration::from_secs_f64(secs)
    }

    /// Sleeps for a freshly drawn delay.
    pub fn pause<R: Rng>(&self, rng: &mut R) {
        let delay = self.delay(rng);
        if !delay.is_zero() {
            debug!(secs = delay.as_secs_f64(), "pacing");
            thread::sleep(delay);
        }
    }
}

/// Durations as fractional seconds in config files.
mod secs {
    use serde::{Deserialize, Deserializer, Serializer};
    use std::time::Duration;

    pub fn serialize<S: Serializer>(d: &Duration, s: S) -> Result<S::Ok, S::Error> {
        s.serialize_f64(d.as_secs_f64())
    }

    pub fn deserialize<'de, D: Deserializer<'de>>(d: D) -> Result<Duration, D::Error> {
        let secs = f64::deserialize(d)?;
        Duration::try_from_secs_f64(secs).map_err(serde::de::Error::custom)
    }
}
