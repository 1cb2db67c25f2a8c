/*!
Model — fixed-width character transition and unigram tables.

The model stores four tables over an alphabet of `W` byte values:

- transition counts and frequencies (W×W, row-major, predecessor → successor)
- character counts and frequencies (length W)

Counts are filled by [`crate::Trainer`]; frequencies are derived from them
exactly once when training finishes. After that the model is never mutated,
so a finished `Model` can be shared freely across scorers.
*/

use crate::error::{ClassifierError, Result};

/// Largest alphabet the model supports (symbols are bytes).
pub const MAX_ALPHABET_WIDTH: usize = 256;

/// Row-major flattening of `(x, y)` into a `x_dim × y_dim` table.
///
/// Not symmetric: `index_2d(x, y, ..) != index_2d(y, x, ..)` unless `x == y`,
/// which keeps the direction of a transition.
#[inline]
pub fn index_2d(x: usize, y: usize, _x_dim: usize, y_dim: usize) -> usize {
    x * y_dim + y
}

/// Character bigram/unigram model over a fixed byte alphabet.
#[derive(Debug, Clone, PartialEq)]
pub struct Model {
    alphabet_width: usize,
    transition_counts: Vec<u32>,
    transition_frequencies: Vec<f32>,
    character_counts: Vec<u32>,
    character_frequencies: Vec<f32>,
}

impl Model {
    /// Zero-filled model. Only the trainer creates these.
    pub(crate) fn empty(alphabet_width: usize) -> Result<Self> {
        validate_width(alphabet_width)?;
        let cells = alphabet_width * alphabet_width;
        Ok(Self {
            alphabet_width,
            transition_counts: vec![0; cells],
            transition_frequencies: vec![0.0; cells],
            character_counts: vec![0; alphabet_width],
            character_frequencies: vec![0.0; alphabet_width],
        })
    }

    pub fn alphabet_width(&self) -> usize {
        self.alphabet_width
    }

    /// Table index for a single symbol, or `None` if it lies outside the alphabet.
    #[inline]
    pub fn symbol_index(&self, x: u8) -> Option<usize> {
        let x = x as usize;
        (x < self.alphabet_width).then_some(x)
    }

    /// Table index for the transition `x -> y`, or `None` if either symbol
    /// lies outside the alphabet.
    #[inline]
    pub fn pair_index(&self, x: u8, y: u8) -> Option<usize> {
        let x = self.symbol_index(x)?;
        let y = self.symbol_index(y)?;
        Some(index_2d(x, y, self.alphabet_width, self.alphabet_width))
    }

    pub fn transition_count(&self, x: u8, y: u8) -> Option<u32> {
        self.pair_index(x, y).map(|i| self.transition_counts[i])
    }

    pub fn transition_frequency(&self, x: u8, y: u8) -> Option<f32> {
        self.pair_index(x, y).map(|i| self.transition_frequencies[i])
    }

    pub fn character_count(&self, x: u8) -> Option<u32> {
        self.symbol_index(x).map(|i| self.character_counts[i])
    }

    pub fn character_frequency(&self, x: u8) -> Option<f32> {
        self.symbol_index(x).map(|i| self.character_frequencies[i])
    }

    /// Normalized successor distribution for predecessor `x`.
    ///
    /// All zeros when `x` was never followed by anything in training.
    pub fn transition_row(&self, x: u8) -> Option<&[f32]> {
        let start = self.symbol_index(x)? * self.alphabet_width;
        Some(&self.transition_frequencies[start..start + self.alphabet_width])
    }

    /// Number of observed transitions out of `x`.
    pub fn row_sum(&self, x: u8) -> Option<u64> {
        let start = self.symbol_index(x)? * self.alphabet_width;
        Some(
            self.transition_counts[start..start + self.alphabet_width]
                .iter()
                .map(|&c| c as u64)
                .sum(),
        )
    }

    /// Total number of counted symbol occurrences.
    pub fn total_characters(&self) -> u64 {
        self.character_counts.iter().map(|&c| c as u64).sum()
    }

    /// Global unigram distribution, one entry per symbol.
    pub fn character_frequencies(&self) -> &[f32] {
        &self.character_frequencies
    }

    pub(crate) fn bump_transition(&mut self, index: usize) {
        self.transition_counts[index] = self.transition_counts[index].saturating_add(1);
    }

    pub(crate) fn bump_character(&mut self, index: usize) {
        self.character_counts[index] = self.character_counts[index].saturating_add(1);
    }

    /// Derive both frequency tables from the counts.
    ///
    /// Returns `EmptyCorpus` when no symbol was counted; the unigram table
    /// would otherwise be all NaN.
    pub(crate) fn normalize(&mut self) -> Result<()> {
        let total = self.total_characters();
        if total == 0 {
            return Err(ClassifierError::EmptyCorpus);
        }

        let w = self.alphabet_width;
        for x in 0..w {
            let row = x * w..(x + 1) * w;
            let row_sum: f32 = self.transition_counts[row.clone()]
                .iter()
                .map(|&c| c as f32)
                .sum();
            // rows with no data stay zero
            if row_sum > 0.0 {
                for i in row {
                    self.transition_frequencies[i] = self.transition_counts[i] as f32 / row_sum;
                }
            }
        }

        let total = total as f32;
        for (freq, &count) in self
            .character_frequencies
            .iter_mut()
            .zip(self.character_counts.iter())
        {
            *freq = count as f32 / total;
        }
        Ok(())
    }
}

/// Check an alphabet width once, up front.
pub fn validate_width(width: usize) -> Result<()> {
    if width == 0 || width > MAX_ALPHABET_WIDTH {
        return Err(ClassifierError::InvalidAlphabetWidth { width });
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn index_2d_is_row_major_and_directional() {
        assert_eq!(index_2d(0, 0, 4, 4), 0);
        assert_eq!(index_2d(1, 2, 4, 4), 6);
        assert_eq!(index_2d(2, 1, 4, 4), 9);
        assert_ne!(index_2d(1, 2, 4, 4), index_2d(2, 1, 4, 4));
        assert_eq!(index_2d(3, 3, 4, 4), 15);
    }

    #[test]
    fn width_is_validated() {
        assert!(matches!(
            Model::empty(0),
            Err(ClassifierError::InvalidAlphabetWidth { width: 0 })
        ));
        assert!(matches!(
            Model::empty(257),
            Err(ClassifierError::InvalidAlphabetWidth { width: 257 })
        ));
        assert!(Model::empty(1).is_ok());
        assert!(Model::empty(256).is_ok());
    }

    #[test]
    fn lookups_outside_alphabet_are_none() {
        let m = Model::empty(128).unwrap();
        assert_eq!(m.symbol_index(b'a'), Some(97));
        assert_eq!(m.symbol_index(0xFF), None);
        assert_eq!(m.pair_index(b'a', 0x80), None);
        assert_eq!(m.pair_index(0x80, b'a'), None);
        assert_eq!(m.transition_count(b'a', b'b'), Some(0));
        assert_eq!(m.character_frequency(200), None);
        assert!(m.transition_row(0x90).is_none());
    }

    #[test]
    fn high_bytes_index_without_sign_extension() {
        let m = Model::empty(256).unwrap();
        assert_eq!(m.pair_index(0xFF, 0x80), Some(255 * 256 + 128));
    }

    #[test]
    fn normalize_rows_and_unigrams() {
        let mut m = Model::empty(4).unwrap();
        // 1->2 twice, 1->3 once; row 0 untouched
        let a = m.pair_index(1, 2).unwrap();
        let b = m.pair_index(1, 3).unwrap();
        m.bump_transition(a);
        m.bump_transition(a);
        m.bump_transition(b);
        m.bump_character(1);
        m.bump_character(1);
        m.bump_character(2);
        m.bump_character(3);
        m.normalize().unwrap();

        assert!((m.transition_frequency(1, 2).unwrap() - 2.0 / 3.0).abs() < 1e-6);
        assert!((m.transition_frequency(1, 3).unwrap() - 1.0 / 3.0).abs() < 1e-6);
        assert!(m.transition_row(0).unwrap().iter().all(|&f| f == 0.0));
        assert_eq!(m.row_sum(1), Some(3));

        assert!((m.character_frequency(1).unwrap() - 0.5).abs() < 1e-6);
        let sum: f32 = m.character_frequencies().iter().sum();
        assert!((sum - 1.0).abs() < 1e-6);
    }

    #[test]
    fn normalize_empty_is_an_error() {
        let mut m = Model::empty(8).unwrap();
        assert!(matches!(m.normalize(), Err(ClassifierError::EmptyCorpus)));
    }
}
