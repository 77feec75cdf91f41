use std::{env, fmt::Display, str::FromStr, time::Duration};

use tracing::{info, warn};

pub struct Config {
    pub port: u16,
    pub redis_url: String,
    /// Simulated payment/signup processing time.
    pub processing_delay: Duration,
    /// Pause between a successful donation and the dialog closing.
    pub close_delay: Duration,
    /// Pause between a successful signup and the redirect.
    pub redirect_delay: Duration,
    /// Single-donation ceiling; the simulated gateway declines above this.
    pub max_donation: u64,
    pub redirect_location: String,
}

impl Config {
    pub fn load() -> Self {
        Self {
            port: try_load("RUST_PORT", "8080"),
            redis_url: try_load("REDIS_URL", "redis://127.0.0.1:6379"),
            processing_delay: millis("PROCESSING_DELAY_MS", "2000"),
            close_delay: millis("CLOSE_DELAY_MS", "2000"),
            redirect_delay: millis("REDIRECT_DELAY_MS", "3000"),
            max_donation: try_load("MAX_DONATION", "1000000"),
            redirect_location: try_load("REDIRECT_LOCATION", "/"),
        }
    }
}

fn millis(key: &str, default: &str) -> Duration {
    Duration::from_millis(try_load(key, default))
}

fn var(key: &str) -> Result<String, ()> {
    env::var(key).map_err(|_| {
        warn!("Environment variable {key} not found, using default");
    })
}

fn try_load<T: FromStr>(key: &str, default: &str) -> T
where
    T::Err: Display,
{
    var(key)
        .unwrap_or_else(|_| {
            info!("{key} not set, using default: {default}");
            default.to_string()
        })
        .parse()
        .map_err(|e| {
            warn!("Invalid {key} value: {e}");
        })
        .expect("Environment misconfigured!")
}
