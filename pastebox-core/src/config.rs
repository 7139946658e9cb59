use std::time::Duration;

/// Default interval between sweeps (24 hours)
pub const DEFAULT_SWEEP_INTERVAL: Duration = Duration::from_secs(24 * 60 * 60);

/// Default length of identifiers produced by [`RandomIdGenerator`](crate::RandomIdGenerator)
pub const DEFAULT_ID_LENGTH: usize = 8;

/// Configuration for a [`Store`](crate::Store)
///
/// # Example
///
/// ```rust
/// use pastebox_core::StoreConfig;
/// use std::time::Duration;
///
/// let config = StoreConfig::default()
///     .with_sweep_interval(Duration::from_secs(3600))
///     .with_id_length(12);
/// ```
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct StoreConfig {
    /// Interval between background sweeps (default: 24 hours)
    pub sweep_interval: Duration,
    /// Length of generated identifiers when the default generator is used (default: 8)
    pub id_length: usize,
}

impl Default for StoreConfig {
    fn default() -> Self {
        Self {
            sweep_interval: DEFAULT_SWEEP_INTERVAL,
            id_length: DEFAULT_ID_LENGTH,
        }
    }
}

impl StoreConfig {
    /// Creates a new configuration with default values
    pub fn new() -> Self {
        Self::default()
    }

    /// Sets how often the background task reclaims expired items.
    ///
    /// The first sweep fires one full interval after the store is created.
    /// A zero interval is not accepted by Tokio's timer and is raised to one
    /// millisecond.
    pub fn with_sweep_interval(mut self, interval: Duration) -> Self {
        self.sweep_interval = interval.max(Duration::from_millis(1));
        self
    }

    /// Sets the identifier length used by the default random generator.
    ///
    /// Has no effect when the store is built with a custom
    /// [`IdGenerator`](crate::IdGenerator).
    pub fn with_id_length(mut self, length: usize) -> Self {
        self.id_length = length;
        self
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_config() {
        let config = StoreConfig::default();
        assert_eq!(config.sweep_interval, Duration::from_secs(86_400));
        assert_eq!(config.id_length, 8);
    }

    #[test]
    fn test_builder_pattern_chaining() {
        let config = StoreConfig::new()
            .with_sweep_interval(Duration::from_secs(120))
            .with_id_length(16);
        assert_eq!(config.sweep_interval, Duration::from_secs(120));
        assert_eq!(config.id_length, 16);
    }

    #[test]
    fn test_zero_sweep_interval_is_clamped() {
        let config = StoreConfig::default().with_sweep_interval(Duration::ZERO);
        assert_eq!(config.sweep_interval, Duration::from_millis(1));
    }
}
