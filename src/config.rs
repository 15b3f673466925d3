use std::env;
use std::time::Duration;

use crate::constants::{DATA_ENDPOINT, DEFAULT_WINDOW_SIZE, TICK_RATE_MS};

/// Runtime settings, fixed once at startup.
#[derive(Debug, Clone)]
pub struct Config {
    pub endpoint: String,
    pub window_size: usize,
    pub tick_rate: Duration,
}

impl Default for Config {
    fn default() -> Self {
        let endpoint = env::var("WHEEL_MONITOR_ENDPOINT")
            .unwrap_or_else(|_| DATA_ENDPOINT.to_string());
        let window_size = env::var("WHEEL_MONITOR_WINDOW")
            .ok()
            .and_then(|v| v.parse().ok())
            .filter(|&n| n > 0)
            .unwrap_or(DEFAULT_WINDOW_SIZE);
        Self {
            endpoint,
            window_size,
            tick_rate: Duration::from_millis(TICK_RATE_MS),
        }
    }
}
