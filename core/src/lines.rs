//! Line source: reads a file as raw byte lines, terminators included.
use std::fs::File;
use std::io::{self, BufRead, BufReader};
use std::path::Path;

use crate::context::{LineScore, ScoringContext};
use crate::diagnostics::{DiagnosticSink, TracingSink};
use crate::error::{ClassifierError, Result};
use crate::model::Model;
use crate::trainer::Trainer;
use crate::Config;

/// Iterator over the byte lines of a reader.
///
/// Each item keeps its trailing `\n` when the input had one; the last line
/// of a file without a final newline comes back as-is.
#[derive(Debug)]
pub struct LineReader<R> {
    reader: R,
}

impl<R: BufRead> LineReader<R> {
    pub fn new(reader: R) -> Self {
        Self { reader }
    }
}

impl<R: BufRead> Iterator for LineReader<R> {
    type Item = io::Result<Vec<u8>>;

    fn next(&mut self) -> Option<Self::Item> {
        let mut line = Vec::new();
        match self.reader.read_until(b'\n', &mut line) {
            Ok(0) => None,
            Ok(_) => Some(Ok(line)),
            Err(e) => Some(Err(e)),
        }
    }
}

/// Open `path` for line-by-line reading.
pub fn open_lines<P: AsRef<Path>>(path: P) -> Result<LineReader<BufReader<File>>> {
    let path = path.as_ref();
    let file = File::open(path).map_err(|source| ClassifierError::Open {
        path: path.to_path_buf(),
        source,
    })?;
    Ok(LineReader::new(BufReader::new(file)))
}

fn read_error(path: &Path, source: io::Error) -> ClassifierError {
    ClassifierError::Read {
        path: path.to_path_buf(),
        source,
    }
}

/// Train a model from the lines of a file (one text unit per line).
pub fn train_from_file<P: AsRef<Path>>(path: P, config: &Config) -> Result<Model> {
    train_from_file_with(path, config, TracingSink)
}

/// [`train_from_file`], handing skipped pairs (with their line numbers) to `sink`.
pub fn train_from_file_with<P: AsRef<Path>, S: DiagnosticSink>(
    path: P,
    config: &Config,
    mut sink: S,
) -> Result<Model> {
    let path = path.as_ref();
    let mut trainer = Trainer::new(config)?;
    for line in open_lines(path)? {
        let line = line.map_err(|e| read_error(path, e))?;
        trainer.add_line_with(&line, &mut sink);
    }
    tracing::info!(
        path = %path.display(),
        lines = trainer.lines(),
        skipped = trainer.skipped_count(),
        "training source read"
    );
    trainer.finish()
}

/// Score every line of a file against `model`, terminators included.
pub fn score_file<P: AsRef<Path>>(
    model: &Model,
    path: P,
) -> Result<(Vec<(Vec<u8>, LineScore)>, ScoringContext)> {
    let path = path.as_ref();
    let mut ctx = ScoringContext::new();
    let mut scored = Vec::new();
    for line in open_lines(path)? {
        let line = line.map_err(|e| read_error(path, e))?;
        let score = ctx.record(model, &line);
        scored.push((line, score));
    }
    Ok((scored, ctx))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::diagnostics::SkipEvent;
    use std::io::Cursor;
    use std::path::PathBuf;

    fn temp_path(tag: &str) -> PathBuf {
        let stamp = std::time::SystemTime::now()
            .duration_since(std::time::UNIX_EPOCH)
            .unwrap()
            .as_nanos();
        let mut p = std::env::temp_dir();
        p.push(format!("langscore_test_{}_{}_{}", tag, std::process::id(), stamp));
        p
    }

    #[test]
    fn reader_keeps_terminators() {
        let lines: Vec<Vec<u8>> = LineReader::new(Cursor::new(b"one\ntwo\nthree".to_vec()))
            .collect::<io::Result<_>>()
            .unwrap();
        assert_eq!(lines, vec![b"one\n".to_vec(), b"two\n".to_vec(), b"three".to_vec()]);
    }

    #[test]
    fn reader_passes_high_bytes_through() {
        let lines: Vec<Vec<u8>> = LineReader::new(Cursor::new(vec![0xFF, b'a', b'\n']))
            .collect::<io::Result<_>>()
            .unwrap();
        assert_eq!(lines, vec![vec![0xFF, b'a', b'\n']]);
    }

    #[test]
    fn missing_file_is_an_open_error() {
        let p = temp_path("missing");
        match train_from_file(&p, &Config::default()) {
            Err(ClassifierError::Open { path, .. }) => assert_eq!(path, p),
            other => panic!("expected Open error, got {:?}", other),
        }
    }

    #[test]
    fn train_and_score_from_files() {
        let words = temp_path("words");
        let target = temp_path("target");
        std::fs::write(&words, b"hello\nworld\n").unwrap();
        std::fs::write(&target, b"hello\nolleh\n").unwrap();

        let model = train_from_file(&words, &Config::default()).unwrap();
        assert_eq!(model.character_count(b'l'), Some(3));

        let (scored, ctx) = score_file(&model, &target).unwrap();
        assert_eq!(scored.len(), 2);
        assert_eq!(scored[0].0, b"hello\n".to_vec());
        assert_eq!(ctx.num_lines, 2);
        assert!(scored[0].1.transition > scored[1].1.transition);

        let _ = std::fs::remove_file(&words);
        let _ = std::fs::remove_file(&target);
    }

    #[test]
    fn file_training_reports_skip_lines() {
        let words = temp_path("skips");
        std::fs::write(&words, b"ab\ncd\nc\xC3\xA9\n").unwrap();
        let cfg = Config {
            alphabet_width: 128,
            ..Config::default()
        };
        let mut events: Vec<SkipEvent> = Vec::new();
        let model = train_from_file_with(&words, &cfg, &mut events).unwrap();
        assert_eq!(model.transition_count(b'c', b'd'), Some(1));
        assert_eq!(events.len(), 2);
        assert!(events.iter().all(|e| e.line() == Some(3)));
        assert_eq!(events[1].offset(), 1);

        let _ = std::fs::remove_file(&words);
    }
}
