//! Structured reporting of skipped (out-of-alphabet) symbols.
//!
//! Training and scoring never print. Anything they skip is handed to a
//! [`DiagnosticSink`]; the caller decides whether to collect, log or drop it.
use std::fmt;

/// A symbol or pair that fell outside the model's alphabet and was skipped.
///
/// `line` is the 1-based line of the training source; scoring works on a
/// single buffer and leaves it `None`.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SkipEvent {
    /// Adjacent pair at `offset`, `offset + 1` with at least one symbol out of range.
    Pair {
        line: Option<usize>,
        offset: usize,
        predecessor: u8,
        successor: u8,
    },
    /// Single symbol at `offset` out of range.
    Symbol {
        line: Option<usize>,
        offset: usize,
        symbol: u8,
    },
}

impl SkipEvent {
    pub fn offset(&self) -> usize {
        match *self {
            SkipEvent::Pair { offset, .. } | SkipEvent::Symbol { offset, .. } => offset,
        }
    }

    pub fn line(&self) -> Option<usize> {
        match *self {
            SkipEvent::Pair { line, .. } | SkipEvent::Symbol { line, .. } => line,
        }
    }
}

impl fmt::Display for SkipEvent {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            SkipEvent::Pair { .. } => f.write_str("chars out of range at ")?,
            SkipEvent::Symbol { .. } => f.write_str("char out of range at ")?,
        }
        if let Some(line) = self.line() {
            write!(f, "line {}, ", line)?;
        }
        write!(f, "offset {}: ", self.offset())?;
        match *self {
            SkipEvent::Pair {
                predecessor,
                successor,
                ..
            } => write!(
                f,
                "'{}' -> '{}'",
                predecessor.escape_ascii(),
                successor.escape_ascii()
            ),
            SkipEvent::Symbol { symbol, .. } => write!(f, "'{}'", symbol.escape_ascii()),
        }
    }
}

/// Receiver for skip events.
pub trait DiagnosticSink {
    fn record(&mut self, event: SkipEvent);
}

impl DiagnosticSink for Vec<SkipEvent> {
    fn record(&mut self, event: SkipEvent) {
        self.push(event);
    }
}

impl<S: DiagnosticSink + ?Sized> DiagnosticSink for &mut S {
    fn record(&mut self, event: SkipEvent) {
        (**self).record(event);
    }
}

/// Forwards every event to `tracing` at WARN level.
#[derive(Debug, Clone, Copy, Default)]
pub struct TracingSink;

impl DiagnosticSink for TracingSink {
    fn record(&mut self, event: SkipEvent) {
        tracing::warn!(line = event.line(), offset = event.offset(), "skipping {}", event);
    }
}

/// Drops every event.
#[derive(Debug, Clone, Copy, Default)]
pub struct Discard;

impl DiagnosticSink for Discard {
    fn record(&mut self, _event: SkipEvent) {}
}
