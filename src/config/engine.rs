//! Lifecycle engine configuration

use serde::Deserialize;

use super::error::ValidationError;

/// Upper bound on optimistic write attempts.
pub const MAX_WRITE_ATTEMPTS_LIMIT: u32 = 50;

/// Write path tuning
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct EngineConfig {
    /// Attempts per command before a version conflict is surfaced
    #[serde(default = "default_max_write_attempts")]
    pub max_write_attempts: u32,
}

impl EngineConfig {
    /// Validate engine configuration
    pub fn validate(&self) -> Result<(), ValidationError> {
        if self.max_write_attempts == 0 || self.max_write_attempts > MAX_WRITE_ATTEMPTS_LIMIT {
            return Err(ValidationError::InvalidWriteAttempts {
                max: MAX_WRITE_ATTEMPTS_LIMIT,
                actual: self.max_write_attempts,
            });
        }
        Ok(())
    }
}

impl Default for EngineConfig {
    fn default() -> Self {
        Self {
            max_write_attempts: default_max_write_attempts(),
        }
    }
}

fn default_max_write_attempts() -> u32 {
    5
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_allows_five_attempts() {
        let config = EngineConfig::default();
        assert_eq!(config.max_write_attempts, 5);
        assert!(config.validate().is_ok());
    }

    #[test]
    fn test_zero_attempts_is_invalid() {
        let config = EngineConfig {
            max_write_attempts: 0,
        };
        assert_eq!(
            config.validate(),
            Err(ValidationError::InvalidWriteAttempts { max: 50, actual: 0 })
        );
    }

    #[test]
    fn test_attempts_above_limit_are_invalid() {
        let config = EngineConfig {
            max_write_attempts: 51,
        };
        assert!(config.validate().is_err());
    }
}
