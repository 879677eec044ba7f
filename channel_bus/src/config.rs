//! Bus configuration

use std::env;
use std::time::Duration;

/// Environment variable holding the debug toggle
pub const DEBUG_ENV: &str = "CHANNEL_BUS_DEBUG";

/// Default grace window for late handler registration
pub const DEFAULT_GRACE_WINDOW: Duration = Duration::from_secs(3);

/// Configuration for one bus instance
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct BusConfig {
    /// Emit verbose registration diagnostics
    pub debug: bool,
    /// How long a delivery waits for a not-yet-registered handler
    pub grace_window: Duration,
}

impl BusConfig {
    /// Creates a config with defaults (debug off, 3 second grace window)
    pub fn new() -> Self {
        Self {
            debug: false,
            grace_window: DEFAULT_GRACE_WINDOW,
        }
    }

    /// Reads the debug toggle from the environment, once
    ///
    /// `CHANNEL_BUS_DEBUG=1` or `=true` turns diagnostics on; anything
    /// else, or an unset variable, leaves them off.
    pub fn from_env() -> Self {
        let debug = env::var(DEBUG_ENV)
            .map(|value| {
                let value = value.trim().to_ascii_lowercase();
                value == "1" || value == "true"
            })
            .unwrap_or(false);
        Self::new().with_debug(debug)
    }

    /// Sets the debug toggle
    pub fn with_debug(mut self, debug: bool) -> Self {
        self.debug = debug;
        self
    }

    /// Sets the grace window
    pub fn with_grace_window(mut self, grace_window: Duration) -> Self {
        self.grace_window = grace_window;
        self
    }
}

impl Default for BusConfig {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults() {
        let config = BusConfig::new();
        assert!(!config.debug);
        assert_eq!(config.grace_window, DEFAULT_GRACE_WINDOW);
    }

    #[test]
    fn test_builders() {
        let config = BusConfig::new()
            .with_debug(true)
            .with_grace_window(Duration::from_millis(50));
        assert!(config.debug);
        assert_eq!(config.grace_window, Duration::from_millis(50));
    }

    #[test]
    fn test_from_env_parses_toggle() {
        env::set_var(DEBUG_ENV, "true");
        assert!(BusConfig::from_env().debug);
        env::set_var(DEBUG_ENV, "0");
        assert!(!BusConfig::from_env().debug);
        env::remove_var(DEBUG_ENV);
        assert!(!BusConfig::from_env().debug);
    }
}
