//! Strategy parameters.

use super::error::SentraderError;

/// Immutable parameters of the sentiment strategy, fixed at engine construction.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct StrategyConfig {
    /// Buy when sentiment falls below `-entry_threshold`.
    pub entry_threshold: f64,
    /// Sell when sentiment rises above `exit_threshold`.
    pub exit_threshold: f64,
    /// Contracts held while long.
    pub position_size: u32,
}

impl Default for StrategyConfig {
    fn default() -> Self {
        StrategyConfig {
            entry_threshold: 0.0,
            exit_threshold: 0.0,
            position_size: 1,
        }
    }
}

impl StrategyConfig {
    pub fn validate(&self) -> Result<(), SentraderError> {
        if !self.entry_threshold.is_finite() {
            return Err(invalid("entry_threshold", "entry_threshold must be finite"));
        }
        if !self.exit_threshold.is_finite() {
            return Err(invalid("exit_threshold", "exit_threshold must be finite"));
        }
        if self.position_size < 1 {
            return Err(invalid("position_size", "position_size must be at least 1"));
        }
        Ok(())
    }

    /// True when a single sentiment value can satisfy both the buy and the sell condition.
    pub fn thresholds_overlap(&self) -> bool {
        -self.entry_threshold > self.exit_threshold
    }
}

fn invalid(key: &str, reason: &str) -> SentraderError {
    SentraderError::ConfigInvalid {
        section: "strategy".to_string(),
        key: key.to_string(),
        reason: reason.to_string(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn default_config() {
        let c = StrategyConfig::default();
        assert_eq!(c.entry_threshold, 0.0);
        assert_eq!(c.exit_threshold, 0.0);
        assert_eq!(c.position_size, 1);
        assert!(c.validate().is_ok());
    }

    #[test]
    fn zero_position_size_invalid() {
        let c = StrategyConfig {
            position_size: 0,
            ..StrategyConfig::default()
        };
        let err = c.validate().unwrap_err();
        assert!(matches!(err, SentraderError::ConfigInvalid { key, .. } if key == "position_size"));
    }

    #[test]
    fn nan_threshold_invalid() {
        let c = StrategyConfig {
            entry_threshold: f64::NAN,
            ..StrategyConfig::default()
        };
        assert!(c.validate().is_err());

        let c = StrategyConfig {
            exit_threshold: f64::INFINITY,
            ..StrategyConfig::default()
        };
        assert!(c.validate().is_err());
    }

    #[test]
    fn overlap_detection() {
        let disjoint = StrategyConfig {
            entry_threshold: 0.05,
            exit_threshold: 0.05,
            position_size: 1,
        };
        assert!(!disjoint.thresholds_overlap());

        let overlapping = StrategyConfig {
            entry_threshold: 0.0,
            exit_threshold: -0.2,
            position_size: 1,
        };
        assert!(overlapping.thresholds_overlap());
    }
}
