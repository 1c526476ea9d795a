use crate::errors::{ConfigError, ConfigResult};
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::Path;
use std::time::Duration;

/// Timing knobs for a battle. Every field has a default, so a RON file only
/// needs to list the values it changes.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct BattleConfig {
    /// Countdown length for every turn after the first.
    pub turn_seconds: u32,
    /// Countdown length for the opening turn of a battle.
    pub first_turn_seconds: u32,
    /// Real-time length of one countdown unit.
    pub tick_millis: u64,
    /// Pause before an AI player's decision is computed.
    pub ai_think_millis: u64,
    /// Pause between a move resolving and the turn passing.
    pub turn_end_delay_millis: u64,
}

impl Default for BattleConfig {
    fn default() -> Self {
        Self {
            turn_seconds: 20,
            first_turn_seconds: 30,
            tick_millis: 1000,
            ai_think_millis: 1500,
            turn_end_delay_millis: 1000,
        }
    }
}

impl BattleConfig {
    pub fn from_ron_str(content: &str) -> ConfigResult<Self> {
        let config: BattleConfig = ron::from_str(content).map_err(|e| ConfigError::ConfigFile {
            path: "<inline>".into(),
            reason: e.to_string(),
        })?;
        config.validated()
    }

    /// Load a config from a RON file.
    pub fn load(path: &Path) -> ConfigResult<Self> {
        let content = fs::read_to_string(path).map_err(|e| ConfigError::ConfigFile {
            path: path.to_path_buf(),
            reason: e.to_string(),
        })?;
        Self::from_ron_str(&content).map_err(|err| match err {
            ConfigError::ConfigFile { reason, .. } => ConfigError::ConfigFile {
                path: path.to_path_buf(),
                reason,
            },
            other => other,
        })
    }

    /// Countdown for a turn, in units.
    pub fn turn_limit(&self, first_turn: bool) -> u32 {
        if first_turn {
            self.first_turn_seconds
        } else {
            self.turn_seconds
        }
    }

    pub fn tick_interval(&self) -> Duration {
        Duration::from_millis(self.tick_millis)
    }

    pub fn ai_think_delay(&self) -> Duration {
        Duration::from_millis(self.ai_think_millis)
    }

    pub fn turn_end_delay(&self) -> Duration {
        Duration::from_millis(self.turn_end_delay_millis)
    }

    fn validated(self) -> ConfigResult<Self> {
        if self.turn_seconds == 0 || self.first_turn_seconds == 0 {
            return Err(ConfigError::ConfigFile {
                path: "<inline>".into(),
                reason: "turn lengths must be at least one unit".to_string(),
            });
        }
        if self.tick_millis == 0 {
            return Err(ConfigError::ConfigFile {
                path: "<inline>".into(),
                reason: "tick_millis must be positive".to_string(),
            });
        }
        Ok(self)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;
    use std::path::PathBuf;

    #[test]
    fn test_bundled_config_matches_default() {
        let bundled = BattleConfig::from_ron_str(include_str!("../data/battle_config.ron")).unwrap();
        assert_eq!(bundled, BattleConfig::default());
    }

    #[test]
    fn test_partial_config_keeps_defaults() {
        let config = BattleConfig::from_ron_str("(turn_seconds: 5)").unwrap();
        assert_eq!(config.turn_seconds, 5);
        assert_eq!(config.first_turn_seconds, 30);
        assert_eq!(config.turn_limit(true), 30);
        assert_eq!(config.turn_limit(false), 5);
    }

    #[test]
    fn test_zero_length_turns_are_rejected() {
        let err = BattleConfig::from_ron_str("(turn_seconds: 0)").unwrap_err();
        assert!(matches!(err, ConfigError::ConfigFile { .. }));
    }

    #[test]
    fn test_missing_file_reports_path() {
        let path = PathBuf::from("does/not/exist.ron");
        match BattleConfig::load(&path) {
            Err(ConfigError::ConfigFile { path: reported, .. }) => assert_eq!(reported, path),
            other => panic!("expected ConfigFile error, got {:?}", other),
        }
    }

    #[test]
    fn test_garbage_is_a_config_error() {
        assert!(BattleConfig::from_ron_str("turn_seconds = 5").is_err());
    }
}
