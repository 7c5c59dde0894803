use wp_config::ReconnectConfig;

use std::time::Duration;

/// Jittered exponential reconnect delay, capped at `max_delay`
#[derive(Debug, Clone)]
pub struct Backoff {
    initial_delay: Duration,
    max_delay: Duration,
    multiplier: f64,
    jitter: bool,
    current: Duration,
    attempts: u32,
}

impl Backoff {
    pub fn new(initial_delay: Duration, max_delay: Duration, multiplier: f64, jitter: bool) -> Self {
        Self {
            initial_delay,
            max_delay,
            multiplier: multiplier.max(1.0),
            jitter,
            current: initial_delay,
            attempts: 0,
        }
    }

    /// Delay to wait before the next attempt
    pub fn next_delay(&mut self) -> Duration {
        self.attempts += 1;

        let delay = if self.jitter {
            let jitter_factor = 0.5 + rand::random::<f64>(); // 0.5 to 1.5
            Duration::from_secs_f64(self.current.as_secs_f64() * jitter_factor)
        } else {
            self.current
        };

        self.current = Duration::from_secs_f64(
            (self.current.as_secs_f64() * self.multiplier).min(self.max_delay.as_secs_f64()),
        );

        delay.min(self.max_delay)
    }

    /// Start over after a successful connection
    pub fn reset(&mut self) {
        self.current = self.initial_delay;
        self.attempts = 0;
    }

    pub fn attempts(&self) -> u32 {
        self.attempts
    }
}

impl Default for Backoff {
    fn default() -> Self {
        Self::from(&ReconnectConfig::default())
    }
}

impl From<&ReconnectConfig> for Backoff {
    fn from(config: &ReconnectConfig) -> Self {
        Self::new(
            config.initial_delay(),
            config.max_delay(),
            config.backoff_multiplier,
            config.jitter,
        )
    }
}
