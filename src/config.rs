//! Tunable timings and game constants.
//!
//! Every field has a default, so a JSON file only needs the values it
//! changes:
//!
//! ```json
//! { "germ_buster": { "round_seconds": 60 } }
//! ```

use std::fs;
use std::path::Path;
use std::time::Duration;

use crate::grid::Level;

#[derive(Debug, Clone, PartialEq, Default, serde::Serialize, serde::Deserialize)]
#[serde(default)]
pub struct GameConfig {
    pub dispatcher: DispatcherConfig,
    pub math: MathGameConfig,
    pub germ_buster: GermBusterConfig,
    pub quiz: QuizConfig,
}

#[derive(Debug, Clone, PartialEq, serde::Serialize, serde::Deserialize)]
#[serde(default)]
pub struct DispatcherConfig {
    /// Pause between two playback steps.
    pub step_delay_ms: u64,
    /// Pause between a cleared level and the certificate capture.
    pub capture_delay_ms: u64,
    /// Replaces the built-in levels when present.
    pub levels: Option<Vec<Level>>,
}

impl Default for DispatcherConfig {
    fn default() -> Self {
        Self {
            step_delay_ms: 600,
            capture_delay_ms: 1500,
            levels: None,
        }
    }
}

impl DispatcherConfig {
    pub fn step_delay(&self) -> Duration {
        Duration::from_millis(self.step_delay_ms)
    }

    pub fn capture_delay(&self) -> Duration {
        Duration::from_millis(self.capture_delay_ms)
    }
}

#[derive(Debug, Clone, PartialEq, serde::Serialize, serde::Deserialize)]
#[serde(default)]
pub struct MathGameConfig {
    pub max_operand: u32,
    pub option_count: usize,
    /// Distractors are drawn from `1..=max_option`.
    pub max_option: u32,
    pub reveal_delay_ms: u64,
    pub next_round_delay_ms: u64,
    pub feedback_clear_ms: u64,
}

impl Default for MathGameConfig {
    fn default() -> Self {
        Self {
            max_operand: 5,
            option_count: 3,
            max_option: 10,
            reveal_delay_ms: 500,
            next_round_delay_ms: 3000,
            feedback_clear_ms: 1000,
        }
    }
}

#[derive(Debug, Clone, PartialEq, serde::Serialize, serde::Deserialize)]
#[serde(default)]
pub struct GermBusterConfig {
    pub round_seconds: u32,
    pub spawn_interval_ms: u64,
    pub max_targets: usize,
    /// Chance that a new target carries the answer while one already does.
    pub correct_spawn_chance: f64,
    pub max_operand: u32,
    pub correct_points: u32,
    pub wrong_penalty: u32,
}

impl Default for GermBusterConfig {
    fn default() -> Self {
        Self {
            round_seconds: 45,
            spawn_interval_ms: 1200,
            max_targets: 4,
            correct_spawn_chance: 0.4,
            max_operand: 9,
            correct_points: 10,
            wrong_penalty: 5,
        }
    }
}

impl GermBusterConfig {
    pub fn spawn_interval(&self) -> Duration {
        Duration::from_millis(self.spawn_interval_ms)
    }
}

#[derive(Debug, Clone, PartialEq, serde::Serialize, serde::Deserialize)]
#[serde(default)]
pub struct QuizConfig {
    pub question_count: usize,
    pub feedback_delay_ms: u64,
}

impl Default for QuizConfig {
    fn default() -> Self {
        Self {
            question_count: 5,
            feedback_delay_ms: 1500,
        }
    }
}

#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("failed to read config file at {path}: {source}")]
    ReadError {
        path: String,
        source: std::io::Error,
    },
    #[error("failed to parse config: {source}")]
    ParseError { source: serde_json::Error },
    #[error("invalid config value for {field}: {reason}")]
    Invalid {
        field: &'static str,
        reason: &'static str,
    },
}

impl GameConfig {
    pub fn from_json(json: &str) -> Result<Self, ConfigError> {
        let config: GameConfig =
            serde_json::from_str(json).map_err(|source| ConfigError::ParseError { source })?;
        config.validate()?;
        Ok(config)
    }

    pub fn from_path(path: impl AsRef<Path>) -> Result<Self, ConfigError> {
        let path = path.as_ref();
        let data = fs::read_to_string(path).map_err(|source| ConfigError::ReadError {
            path: path.display().to_string(),
            source,
        })?;

        Self::from_json(&data)
    }

    pub fn validate(&self) -> Result<(), ConfigError> {
        let invalid = |field, reason| Err(ConfigError::Invalid { field, reason });

        if matches!(&self.dispatcher.levels, Some(levels) if levels.is_empty()) {
            return invalid("dispatcher.levels", "must contain at least one level");
        }
        if self.math.max_operand == 0 {
            return invalid("math.max_operand", "must be at least 1");
        }
        if self.math.option_count < 2 {
            return invalid("math.option_count", "must be at least 2");
        }
        if (self.math.max_option as usize) < self.math.option_count {
            return invalid("math.max_option", "must leave room for distinct options");
        }
        if self.germ_buster.max_targets == 0 {
            return invalid("germ_buster.max_targets", "must be at least 1");
        }
        if self.germ_buster.max_operand == 0 {
            return invalid("germ_buster.max_operand", "must be at least 1");
        }
        if !(0.0..=1.0).contains(&self.germ_buster.correct_spawn_chance) {
            return invalid("germ_buster.correct_spawn_chance", "must lie in [0, 1]");
        }
        if self.quiz.question_count == 0 {
            return invalid("quiz.question_count", "must be at least 1");
        }

        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn empty_object_yields_defaults() {
        let config = GameConfig::from_json("{}").expect("empty config should parse");
        assert_eq!(config, GameConfig::default());
        assert_eq!(config.dispatcher.step_delay(), Duration::from_millis(600));
        assert_eq!(config.germ_buster.round_seconds, 45);
    }

    #[test]
    fn partial_override_keeps_other_defaults() {
        let config = GameConfig::from_json(r#"{ "germ_buster": { "round_seconds": 60 } }"#)
            .expect("partial config should parse");

        assert_eq!(config.germ_buster.round_seconds, 60);
        assert_eq!(config.germ_buster.max_targets, 4);
        assert_eq!(config.quiz.question_count, 5);
    }

    #[test]
    fn custom_levels_are_validated() {
        let json = r#"{ "dispatcher": { "levels": [
            { "id": 1, "size": 2, "start": [0, 0], "end": [1, 1], "obstacles": [[1, 1]] }
        ] } }"#;

        assert!(matches!(
            GameConfig::from_json(json),
            Err(ConfigError::ParseError { .. })
        ));
    }

    #[test]
    fn rejects_probability_outside_unit_range() {
        let error =
            GameConfig::from_json(r#"{ "germ_buster": { "correct_spawn_chance": 1.5 } }"#)
                .expect_err("out of range chance should be rejected");

        assert!(matches!(
            error,
            ConfigError::Invalid {
                field: "germ_buster.correct_spawn_chance",
                ..
            }
        ));
    }

    #[test]
    fn loads_from_file() {
        let dir = tempfile::tempdir().expect("temporary directory should be created");
        let path = dir.path().join("healthhub.json");
        fs::write(&path, r#"{ "dispatcher": { "step_delay_ms": 10 } }"#)
            .expect("config should be written");

        let config = GameConfig::from_path(&path).expect("config should load");
        assert_eq!(config.dispatcher.step_delay(), Duration::from_millis(10));
    }

    #[test]
    fn missing_file_reports_path() {
        let error = GameConfig::from_path("/nonexistent/healthhub.json")
            .expect_err("missing file should error");
        assert!(error.to_string().contains("/nonexistent/healthhub.json"));
    }
}
