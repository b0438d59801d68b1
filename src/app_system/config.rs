use std::time::Duration;

/// Runtime settings for the booking system.
///
/// | Variable | Default | Meaning |
/// |----------|---------|---------|
/// | BOOKING_CHANNEL_BUFFER | 32 | Mailbox size of every actor |
/// | BOOKING_CHECK_TIMEOUT_MS | 2000 | Deadline for a single table check |
/// | BOOKING_LOG | info | Fallback filter when `RUST_LOG` is unset |
#[derive(Debug, Clone, PartialEq)]
pub struct BookingConfig {
    pub channel_buffer: usize,
    pub check_timeout: Duration,
    pub log_filter: String,
}

impl Default for BookingConfig {
    fn default() -> Self {
        Self {
            channel_buffer: 32,
            check_timeout: Duration::from_millis(2000),
            log_filter: "info".to_string(),
        }
    }
}

impl BookingConfig {
    /// Reads the environment; unset or unparsable values keep their defaults.
    pub fn from_env() -> Self {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Self {
        let defaults = Self::default();
        Self {
            channel_buffer: lookup("BOOKING_CHANNEL_BUFFER")
                .and_then(|v| v.parse().ok())
                .filter(|size: &usize| *size > 0)
                .unwrap_or(defaults.channel_buffer),
            check_timeout: lookup("BOOKING_CHECK_TIMEOUT_MS")
                .and_then(|v| v.parse().ok())
                .map(Duration::from_millis)
                .unwrap_or(defaults.check_timeout),
            log_filter: lookup("BOOKING_LOG").unwrap_or(defaults.log_filter),
        }
    }
}
