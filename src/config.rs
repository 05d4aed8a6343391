//! Runtime configuration: development vs production mode.

use std::fmt;
use std::str::FromStr;

/// Errors from reading configuration values.
#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("unknown mode '{0}', expected 'development' or 'production'")]
    UnknownMode(String),
}

/// Whether development-only diagnostics run.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Mode {
    #[default]
    Development,
    Production,
}

impl Mode {
    pub fn is_production(self) -> bool {
        self == Mode::Production
    }
}

impl FromStr for Mode {
    type Err = ConfigError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "development" | "dev" | "test" => Ok(Mode::Development),
            "production" | "prod" => Ok(Mode::Production),
            _ => Err(ConfigError::UnknownMode(s.to_owned())),
        }
    }
}

impl fmt::Display for Mode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Mode::Development => f.write_str("development"),
            Mode::Production => f.write_str("production"),
        }
    }
}

// ---------------------------------------------------------------------------
// StyleConfig
// ---------------------------------------------------------------------------

/// Configuration for a [`StyleContext`](crate::context::StyleContext).
#[derive(Debug, Clone, Default)]
pub struct StyleConfig {
    /// Development or production mode.
    pub mode: Mode,
}

impl StyleConfig {
    /// Create a new default config (development mode).
    pub fn new() -> Self {
        Self::default()
    }

    pub fn development() -> Self {
        Self::new().with_mode(Mode::Development)
    }

    pub fn production() -> Self {
        Self::new().with_mode(Mode::Production)
    }

    /// Set the mode (builder).
    pub fn with_mode(mut self, mode: Mode) -> Self {
        self.mode = mode;
        self
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn default_is_development() {
        assert_eq!(StyleConfig::default().mode, Mode::Development);
        assert!(!Mode::default().is_production());
    }

    #[test]
    fn builder_sets_mode() {
        let config = StyleConfig::new().with_mode(Mode::Production);
        assert!(config.mode.is_production());
        assert!(StyleConfig::production().mode.is_production());
        assert!(!StyleConfig::development().mode.is_production());
    }

    #[test]
    fn parse_mode() {
        assert_eq!("production".parse::<Mode>().unwrap(), Mode::Production);
        assert_eq!("PROD".parse::<Mode>().unwrap(), Mode::Production);
        assert_eq!(" development ".parse::<Mode>().unwrap(), Mode::Development);
        assert_eq!("test".parse::<Mode>().unwrap(), Mode::Development);
    }

    #[test]
    fn parse_unknown_mode() {
        let err = "staging".parse::<Mode>().unwrap_err();
        assert!(matches!(err, ConfigError::UnknownMode(ref s) if s == "staging"));
        assert!(err.to_string().contains("staging"));
    }

    #[test]
    fn display_round_trips() {
        for mode in [Mode::Development, Mode::Production] {
            assert_eq!(mode.to_string().parse::<Mode>().unwrap(), mode);
        }
    }
}
