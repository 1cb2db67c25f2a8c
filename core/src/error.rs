use std::path::PathBuf;
use thiserror::Error;

/// Errors surfaced by model construction, training and the line source.
///
/// Out-of-alphabet symbols are not errors; they are reported through
/// [`crate::DiagnosticSink`] and skipped.
#[derive(Error, Debug)]
pub enum ClassifierError {
    /// Alphabet width must be in `1..=256`.
    #[error("invalid alphabet width: {width} (expected 1..={max})", max = crate::model::MAX_ALPHABET_WIDTH)]
    InvalidAlphabetWidth { width: usize },
    /// Training finished without a single countable symbol.
    #[error("training corpus contains no countable symbols")]
    EmptyCorpus,
    /// The line source could not be opened.
    #[error("cannot open {}: {source}", .path.display())]
    Open {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
    /// Reading failed partway through the line source.
    #[error("read error in {}: {source}", .path.display())]
    Read {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
    /// Writing an output file failed.
    #[error("cannot write {}: {source}", .path.display())]
    Write {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
    /// Configuration could not be loaded or parsed.
    #[error("config error: {0}")]
    Config(String),
}

pub type Result<T> = std::result::Result<T, ClassifierError>;
