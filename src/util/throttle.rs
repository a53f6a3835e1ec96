use std::time::Duration;

use rand::Rng;

/// Random pause taken after every page fetch.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct Throttle {
    min: Duration,
    max: Duration,
}

impl Throttle {
    pub fn new(min: Duration, max: Duration) -> Self {
        if min <= max { Throttle { min, max } } else { Throttle { min: max, max: min } }
    }

    pub fn from_millis(min_ms: u64, max_ms: u64) -> Self {
        Self::new(Duration::from_millis(min_ms), Duration::from_millis(max_ms))
    }

    pub fn next_delay(&self) -> Duration {
        if self.min == self.max { return self.min; }
        let lo = self.min.as_millis() as u64;
        let hi = self.max.as_millis() as u64;
        Duration::from_millis(rand::rng().random_range(lo..=hi))
    }

    pub async fn pause(&self) {
        let d = self.next_delay();
        if !d.is_zero() { tokio::time::sleep(d).await; }
    }
}

impl Default for Throttle {
    fn default() -> Self { Self::from_millis(DEFAULT_MIN_DELAY_MS, DEFAULT_MAX_DELAY_MS) }
}

pub const DEFAULT_MIN_DELAY_MS: u64 = 1000;
pub const DEFAULT_MAX_DELAY_MS: u64 = 2000;

/// Pause bounds shared by every command that fetches pages.
#[derive(clap::Args, Debug, Clone, Copy)]
pub struct DelayArgs {
    #[arg(long, default_value_t = DEFAULT_MIN_DELAY_MS)] pub min_delay_ms: u64,
    #[arg(long, default_value_t = DEFAULT_MAX_DELAY_MS)] pub max_delay_ms: u64,
}

impl Default for DelayArgs {
    fn default() -> Self { DelayArgs { min_delay_ms: DEFAULT_MIN_DELAY_MS, max_delay_ms: DEFAULT_MAX_DELAY_MS } }
}

impl DelayArgs {
    pub fn throttle(&self) -> Throttle { Throttle::from_millis(self.min_delay_ms, self.max_delay_ms) }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn delays_stay_within_bounds() {
        let t = Throttle::from_millis(1000, 2000);
        for _ in 0..200 {
            let d = t.next_delay();
            assert!(d >= Duration::from_millis(1000) && d <= Duration::from_millis(2000));
        }
    }

    #[test]
    fn reversed_bounds_are_swapped() {
        assert_eq!(Throttle::from_millis(500, 100), Throttle::from_millis(100, 500));
    }

    #[test]
    fn default_flags_match_default_throttle() {
        assert_eq!(DelayArgs::default().throttle(), Throttle::default());
    }

    #[tokio::test]
    async fn zero_throttle_returns_immediately() {
        let started = std::time::Instant::now();
        Throttle::from_millis(0, 0).pause().await;
        assert!(started.elapsed() < Duration::from_millis(50));
    }
}
