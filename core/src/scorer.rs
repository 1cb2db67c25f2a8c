//! Scoring of byte buffers against a trained [`Model`].
//!
//! Two independent metrics:
//!
//! - transition score: mean bigram likelihood (scaled by 100) over the
//!   buffer. Higher means more language-like.
//! - frequency score: L1 distance between the buffer's unigram distribution
//!   and the model's, over symbols present on both sides. Lower means closer.
//!
//! Every function has a `*_with` form taking a [`DiagnosticSink`] for
//! skipped symbols; the plain form reports them through [`TracingSink`].
use serde::{Deserialize, Serialize};

use crate::diagnostics::{DiagnosticSink, SkipEvent, TracingSink};
use crate::model::Model;

/// Scale applied to each transition probability.
const TRANSITION_SCALE: f64 = 100.0;

/// Weights for [`score_as_language_custom`].
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Weights {
    pub transition: f32,
    pub frequency: f32,
}

impl Default for Weights {
    fn default() -> Self {
        Self {
            transition: 1.0,
            frequency: 1.0,
        }
    }
}

/// All three scores for one buffer.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Scores {
    pub transition: f32,
    pub frequency: f32,
    pub combined: f32,
}

pub fn score_transitions(model: &Model, buf: &[u8]) -> f32 {
    score_transitions_with(model, buf, TracingSink)
}

/// Sum of `100 * P(b | a)` over adjacent pairs, divided by `buf.len()`.
///
/// The divisor is the whole buffer length, not the number of pairs.
/// Buffers shorter than two bytes score 0.0. Each scaled term is formed in
/// `f64` and rounded once as it is added to the `f32` running sum.
pub fn score_transitions_with<S: DiagnosticSink>(model: &Model, buf: &[u8], mut sink: S) -> f32 {
    if buf.is_empty() {
        return 0.0;
    }
    let mut score = 0.0f32;
    for (i, pair) in buf.windows(2).enumerate() {
        let (a, b) = (pair[0], pair[1]);
        match model.transition_frequency(a, b) {
            Some(freq) => score = (score as f64 + TRANSITION_SCALE * freq as f64) as f32,
            None => sink.record(SkipEvent::Pair {
                line: None,
                offset: i,
                predecessor: a,
                successor: b,
            }),
        }
    }
    score / buf.len() as f32
}

pub fn score_frequencies(model: &Model, buf: &[u8]) -> f32 {
    score_frequencies_with(model, buf, TracingSink)
}

/// Distance between the buffer's unigram distribution and the model's.
///
/// Each byte adds `1 / buf.len()` (taken in `f64`) to its `f32` slot. Bytes
/// outside the alphabet are reported and left out. See [`diff_frequencies`] for the distance.
pub fn score_frequencies_with<S: DiagnosticSink>(model: &Model, buf: &[u8], mut sink: S) -> f32 {
    if buf.is_empty() {
        return 0.0;
    }
    let step = 1.0 / buf.len() as f64;
    let mut buf_freqs = vec![0.0f32; model.alphabet_width()];
    for (i, &symbol) in buf.iter().enumerate() {
        match model.symbol_index(symbol) {
            Some(idx) => buf_freqs[idx] = (buf_freqs[idx] as f64 + step) as f32,
            None => sink.record(SkipEvent::Symbol {
                line: None,
                offset: i,
                symbol,
            }),
        }
    }
    diff_frequencies(model.character_frequencies(), &buf_freqs)
}

/// Sum of `|a[i] - b[i]|` over indices where both sides are positive.
///
/// Symbols missing from either distribution are ignored rather than
/// penalized.
pub fn diff_frequencies(a: &[f32], b: &[f32]) -> f32 {
    a.iter()
        .zip(b)
        .filter(|&(&x, &y)| x > 0.0 && y > 0.0)
        .map(|(&x, &y)| (x - y).abs())
        .sum()
}

pub fn score_as_language_custom(model: &Model, buf: &[u8], weights: Weights) -> f32 {
    score_as_language_custom_with(model, buf, weights, TracingSink)
}

/// `frequency_weight * frequency + transition_weight * transition`.
///
/// The two parts point in opposite directions: the frequency score is a
/// distance (smaller is closer to the training language) while the
/// transition score is a likelihood (larger is more language-like). The
/// linear combination keeps both as they are; pick weights with that in mind.
pub fn score_as_language_custom_with<S: DiagnosticSink>(
    model: &Model,
    buf: &[u8],
    weights: Weights,
    sink: S,
) -> f32 {
    score_all_with(model, buf, weights, sink).combined
}

/// Combined score with both weights at 1.0.
pub fn score_as_language(model: &Model, buf: &[u8]) -> f32 {
    score_as_language_custom(model, buf, Weights::default())
}

pub fn score_all(model: &Model, buf: &[u8], weights: Weights) -> Scores {
    score_all_with(model, buf, weights, TracingSink)
}

/// Transition, frequency and combined score in one call.
pub fn score_all_with<S: DiagnosticSink>(
    model: &Model,
    buf: &[u8],
    weights: Weights,
    mut sink: S,
) -> Scores {
    let frequency = score_frequencies_with(model, buf, &mut sink);
    let transition = score_transitions_with(model, buf, &mut sink);
    Scores {
        transition,
        frequency,
        combined: frequency * weights.frequency + transition * weights.transition,
    }
}
