//! langscore-core
//!
//! Character bigram and unigram model that scores how "language-like" a
//! byte buffer is relative to a training corpus.
//!
//! Public API:
//! - `Model` - fixed-width transition and character frequency tables
//! - `Trainer` / `train` - build a `Model` from lines of text
//! - `score_transitions`, `score_frequencies`, `score_as_language` - scoring
//! - `ScoringContext` - per-line aggregation for whole-file scoring
//! - `DiagnosticSink` - where skipped out-of-alphabet symbols are reported
//! - `Config` - alphabet width, weights and training options
use serde::{Deserialize, Serialize};

pub mod error;
pub use error::{ClassifierError, Result};

pub mod model;
pub use model::{index_2d, Model, MAX_ALPHABET_WIDTH};

pub mod diagnostics;
pub use diagnostics::{DiagnosticSink, Discard, SkipEvent, TracingSink};

pub mod trainer;
pub use trainer::{train, train_with, Trainer};

pub mod scorer;
pub use scorer::{
    diff_frequencies, score_all, score_all_with, score_as_language, score_as_language_custom,
    score_as_language_custom_with, score_frequencies, score_frequencies_with, score_transitions,
    score_transitions_with, Scores, Weights,
};

pub mod context;
pub use context::{LineScore, ScoringContext};

pub mod lines;
pub use lines::{open_lines, score_file, train_from_file, train_from_file_with, LineReader};

/// Model and scoring configuration.
///
/// Every field has a default, so a TOML file only needs the keys it changes.
#[derive(Debug, Clone, PartialEq, Deserialize, Serialize)]
#[serde(default)]
pub struct Config {
    /// Number of byte values tracked, `1..=256`. Bytes at or above it are skipped.
    pub alphabet_width: usize,

    /// Weight of the transition score in the combined score.
    pub transition_weight: f32,

    /// Weight of the frequency score in the combined score.
    pub frequency_weight: f32,

    /// Drop one trailing `\n` from each training line before counting.
    pub strip_line_terminator: bool,

    /// Count the symbol of one-symbol training lines. Off by default: such
    /// lines contribute nothing, matching the established metric.
    pub count_single_symbol_lines: bool,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            alphabet_width: MAX_ALPHABET_WIDTH,
            transition_weight: 1.0,
            frequency_weight: 1.0,
            strip_line_terminator: true,
            count_single_symbol_lines: false,
        }
    }
}

impl Config {
    /// Load configuration from a TOML file.
    pub fn load_toml<P: AsRef<std::path::Path>>(path: P) -> Result<Self> {
        let path = path.as_ref();
        let content = std::fs::read_to_string(path).map_err(|source| ClassifierError::Open {
            path: path.to_path_buf(),
            source,
        })?;
        let config =
            Self::from_toml_str(&content).map_err(|e| ClassifierError::Config(e.to_string()))?;
        config.validate()?;
        Ok(config)
    }

    /// Save configuration to a TOML file.
    pub fn save_toml<P: AsRef<std::path::Path>>(&self, path: P) -> Result<()> {
        let path = path.as_ref();
        let content = self
            .to_toml_string()
            .map_err(|e| ClassifierError::Config(e.to_string()))?;
        std::fs::write(path, content).map_err(|source| ClassifierError::Write {
            path: path.to_path_buf(),
            source,
        })
    }

    /// Load configuration from TOML string.
    pub fn from_toml_str(content: &str) -> std::result::Result<Self, toml::de::Error> {
        toml::from_str(content)
    }

    /// Serialize configuration to TOML string.
    pub fn to_toml_string(&self) -> std::result::Result<String, toml::ser::Error> {
        toml::to_string_pretty(self)
    }

    /// Reject an alphabet width the model cannot hold.
    pub fn validate(&self) -> Result<()> {
        model::validate_width(self.alphabet_width)
    }

    /// Combined-score weights.
    pub fn weights(&self) -> Weights {
        Weights {
            transition: self.transition_weight,
            frequency: self.frequency_weight,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn partial_toml_falls_back_to_defaults() {
        let cfg = Config::from_toml_str("alphabet_width = 128\nfrequency_weight = 0.5\n").unwrap();
        assert_eq!(cfg.alphabet_width, 128);
        assert_eq!(cfg.frequency_weight, 0.5);
        assert_eq!(cfg.transition_weight, 1.0);
        assert!(cfg.strip_line_terminator);
        assert!(!cfg.count_single_symbol_lines);
    }

    #[test]
    fn toml_round_trip() {
        let cfg = Config {
            alphabet_width: 64,
            transition_weight: 2.0,
            frequency_weight: 0.75,
            count_single_symbol_lines: true,
            ..Config::default()
        };
        let text = cfg.to_toml_string().unwrap();
        assert_eq!(Config::from_toml_str(&text).unwrap(), cfg);
    }

    #[test]
    fn validate_rejects_bad_widths() {
        for w in [0usize, 257, 1000] {
            let cfg = Config {
                alphabet_width: w,
                ..Config::default()
            };
            assert!(matches!(
                cfg.validate(),
                Err(ClassifierError::InvalidAlphabetWidth { width }) if width == w
            ));
        }
        assert!(Config::default().validate().is_ok());
    }

    #[test]
    fn save_and_load_file() {
        let stamp = std::time::SystemTime::now()
            .duration_since(std::time::UNIX_EPOCH)
            .unwrap()
            .as_nanos();
        let mut path = std::env::temp_dir();
        path.push(format!("langscore_test_config_{}.toml", stamp));

        let cfg = Config {
            frequency_weight: 0.25,
            ..Config::default()
        };
        cfg.save_toml(&path).unwrap();
        assert_eq!(Config::load_toml(&path).unwrap(), cfg);

        std::fs::write(&path, "alphabet_width = 0\n").unwrap();
        assert!(matches!(
            Config::load_toml(&path),
            Err(ClassifierError::InvalidAlphabetWidth { width: 0 })
        ));
        std::fs::write(&path, "alphabet_width = \"wide\"\n").unwrap();
        assert!(matches!(Config::load_toml(&path), Err(ClassifierError::Config(_))));

        let _ = std::fs::remove_file(&path);
    }

    #[test]
    fn save_into_missing_directory_is_a_write_error() {
        let mut path = std::env::temp_dir();
        path.push(format!("langscore_no_such_dir_{}", std::process::id()));
        path.push("config.toml");
        match Config::default().save_toml(&path) {
            Err(ClassifierError::Write { path: p, .. }) => assert_eq!(p, path),
            other => panic!("expected Write error, got {:?}", other),
        }
    }
}
