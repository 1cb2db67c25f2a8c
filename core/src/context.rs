//! Per-line score aggregation for callers scoring a whole file.
//!
//! `ScoringContext` is a plain accumulator: it holds no reference to the
//! model, so one context can be fed from any number of scoring calls.
use serde::{Deserialize, Serialize};

use crate::diagnostics::{DiagnosticSink, TracingSink};
use crate::model::Model;
use crate::scorer::{score_frequencies_with, score_transitions_with};

/// Scores of one line as reported by the line-by-line driver.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct LineScore {
    pub transition: f32,
    pub frequency: f32,
    /// `(transition + frequency) / line length`
    pub normalized: f32,
}

/// Running total of normalized line scores.
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
pub struct ScoringContext {
    pub total_score: f32,
    pub num_lines: usize,
}

impl ScoringContext {
    pub fn new() -> Self {
        Self::default()
    }

    /// Score `line` (terminator included, if any) and add it to the total.
    pub fn record(&mut self, model: &Model, line: &[u8]) -> LineScore {
        self.record_with(model, line, TracingSink)
    }

    pub fn record_with<S: DiagnosticSink>(
        &mut self,
        model: &Model,
        line: &[u8],
        mut sink: S,
    ) -> LineScore {
        let transition = score_transitions_with(model, line, &mut sink);
        let frequency = score_frequencies_with(model, line, &mut sink);
        let normalized = if line.is_empty() {
            0.0
        } else {
            (transition + frequency) / line.len() as f32
        };
        self.total_score += normalized;
        self.num_lines += 1;
        LineScore {
            transition,
            frequency,
            normalized,
        }
    }

    /// Mean normalized score, or `None` before any line was recorded.
    pub fn mean(&self) -> Option<f32> {
        (self.num_lines > 0).then(|| self.total_score / self.num_lines as f32)
    }

    /// Reset to an empty context.
    pub fn clear(&mut self) {
        *self = Self::default();
    }
}
