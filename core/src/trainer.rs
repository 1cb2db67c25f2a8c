//! Trainer — accumulates bigram and unigram counts from lines of text and
//! produces a normalized [`Model`].
use crate::diagnostics::{DiagnosticSink, SkipEvent, TracingSink};
use crate::error::Result;
use crate::model::Model;
use crate::Config;

/// Builds a [`Model`] one line at a time.
///
/// ```
/// use langscore_core::{Config, Trainer};
///
/// let mut trainer = Trainer::new(&Config::default()).unwrap();
/// trainer.add_line(b"hello\n");
/// trainer.add_line(b"world\n");
/// let model = trainer.finish().unwrap();
/// assert_eq!(model.character_count(b'l'), Some(3));
/// ```
#[derive(Debug, Clone)]
pub struct Trainer {
    model: Model,
    strip_line_terminator: bool,
    count_single_symbol_lines: bool,
    skipped_count: usize,
    lines: usize,
}

impl Trainer {
    /// Create a trainer for `config.alphabet_width`; fails on an invalid width.
    pub fn new(config: &Config) -> Result<Self> {
        Ok(Self {
            model: Model::empty(config.alphabet_width)?,
            strip_line_terminator: config.strip_line_terminator,
            count_single_symbol_lines: config.count_single_symbol_lines,
            skipped_count: 0,
            lines: 0,
        })
    }

    /// Create a trainer with default options and the given alphabet width.
    pub fn with_width(alphabet_width: usize) -> Result<Self> {
        Self::new(&Config {
            alphabet_width,
            ..Config::default()
        })
    }

    /// [`Trainer::add_line_with`], logging skips through [`TracingSink`].
    pub fn add_line(&mut self, line: &[u8]) {
        self.add_line_with(line, TracingSink);
    }

    /// Count every adjacent symbol pair of `line`.
    ///
    /// A pair `(x, y)` in range adds one to `transitions[x][y]` and one to
    /// `characters[x]`. The final symbol of the line is counted once more
    /// on its own, so each symbol of a multi-symbol line is counted exactly
    /// once. A line of a single symbol contributes nothing unless
    /// `count_single_symbol_lines` is set.
    ///
    /// Pairs outside the alphabet go to `sink`, tagged with the 1-based line
    /// number; the trainer itself only keeps their count.
    pub fn add_line_with<S: DiagnosticSink>(&mut self, line: &[u8], mut sink: S) {
        self.lines += 1;
        let line_no = Some(self.lines);

        let word = match line.split_last() {
            Some((b'\n', rest)) if self.strip_line_terminator => rest,
            _ => line,
        };

        if word.len() == 1 && self.count_single_symbol_lines {
            match self.model.symbol_index(word[0]) {
                Some(i) => self.model.bump_character(i),
                None => {
                    self.skipped_count += 1;
                    sink.record(SkipEvent::Symbol {
                        line: line_no,
                        offset: 0,
                        symbol: word[0],
                    });
                }
            }
            return;
        }

        let last_pair = word.len().saturating_sub(2);
        for (i, pair) in word.windows(2).enumerate() {
            let (x, y) = (pair[0], pair[1]);
            match self.model.pair_index(x, y) {
                Some(idx) => {
                    self.model.bump_transition(idx);
                    self.model.bump_character(x as usize);
                }
                None => {
                    self.skipped_count += 1;
                    sink.record(SkipEvent::Pair {
                        line: line_no,
                        offset: i,
                        predecessor: x,
                        successor: y,
                    });
                }
            }
            // tail symbol, counted independently of its pair
            if i == last_pair {
                if let Some(yi) = self.model.symbol_index(y) {
                    self.model.bump_character(yi);
                }
            }
        }
    }

    /// Number of lines fed so far.
    pub fn lines(&self) -> usize {
        self.lines
    }

    /// Pairs (and lone symbols) skipped so far because they fell outside the alphabet.
    pub fn skipped_count(&self) -> usize {
        self.skipped_count
    }

    /// Normalize the counts and hand back the finished model.
    ///
    /// Fails with `EmptyCorpus` if nothing countable was seen.
    pub fn finish(mut self) -> Result<Model> {
        if self.skipped_count > 0 {
            tracing::warn!(
                skipped = self.skipped_count,
                lines = self.lines,
                "training skipped symbols outside the alphabet"
            );
        }
        self.model.normalize()?;
        tracing::debug!(
            lines = self.lines,
            characters = self.model.total_characters(),
            alphabet_width = self.model.alphabet_width(),
            "model trained"
        );
        Ok(self.model)
    }
}

/// Train a model from an in-memory sequence of lines.
pub fn train<I, L>(lines: I, config: &Config) -> Result<Model>
where
    I: IntoIterator<Item = L>,
    L: AsRef<[u8]>,
{
    train_with(lines, config, TracingSink)
}

/// [`train`], handing skipped pairs to `sink`.
pub fn train_with<I, L, S>(lines: I, config: &Config, mut sink: S) -> Result<Model>
where
    I: IntoIterator<Item = L>,
    L: AsRef<[u8]>,
    S: DiagnosticSink,
{
    let mut trainer = Trainer::new(config)?;
    for line in lines {
        trainer.add_line_with(line.as_ref(), &mut sink);
    }
    trainer.finish()
}
