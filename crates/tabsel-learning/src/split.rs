//! Train/test splitting and k-fold partitioning.
//!
//! Both splitters operate on row indices rather than the data itself; the
//! caller gathers rows with `FeatureMatrix::take_rows` /
//! `TargetVector::take`. Splitting is seeded so the same seed and row
//! count always produce the same partition.

use rand::SeedableRng;
use rand::rngs::StdRng;
use rand::seq::SliceRandom;

use crate::error::{Result, SelectionError};

/// Shuffle row indices with a seeded RNG and split them into
/// (train, test) with roughly `test_fraction` of rows in the test part.
///
/// # Errors
///
/// Returns [`SelectionError::InsufficientData`] when there are too few
/// rows to give both parts at least one row.
pub fn train_test_split(
    n_rows: usize,
    test_fraction: f64,
    seed: u64,
) -> Result<(Vec<usize>, Vec<usize>)> {
    if n_rows < 2 {
        return Err(SelectionError::InsufficientData(format!(
            "cannot split {n_rows} rows into train and test parts"
        )));
    }

    let mut indices: Vec<usize> = (0..n_rows).collect();
    let mut rng = StdRng::seed_from_u64(seed);
    indices.shuffle(&mut rng);

    // clamp so neither side ends up empty
    let n_test = ((n_rows as f64 * test_fraction).round() as usize).clamp(1, n_rows - 1);
    let test = indices.split_off(n_rows - n_test);
    Ok((indices, test))
}

/// Deterministic k-fold partitioner over `0..n_rows`.
///
/// Folds are contiguous index ranges: no shuffling happens here, because
/// the rows being partitioned are already a shuffled training subset.
/// The first `n_rows % k` folds get one extra row so sizes differ by at
/// most one.
#[derive(Debug, Clone, Copy)]
pub struct KFold {
    n_splits: usize,
}

impl KFold {
    #[must_use]
    pub fn new(n_splits: usize) -> Self {
        Self { n_splits }
    }

    /// Produce `k` (train_indices, validation_indices) pairs.
    ///
    /// # Errors
    ///
    /// Returns [`SelectionError::InsufficientData`] when `n_rows` is
    /// smaller than the fold count.
    pub fn split(&self, n_rows: usize) -> Result<Vec<(Vec<usize>, Vec<usize>)>> {
        if n_rows < self.n_splits {
            return Err(SelectionError::InsufficientData(format!(
                "{n_rows} rows cannot be partitioned into {} folds",
                self.n_splits
            )));
        }

        let base = n_rows / self.n_splits;
        let extra = n_rows % self.n_splits;

        let mut folds = Vec::with_capacity(self.n_splits);
        let mut start = 0;
        for fold in 0..self.n_splits {
            let size = base + usize::from(fold < extra);
            let end = start + size;

            let validation: Vec<usize> = (start..end).collect();
            let train: Vec<usize> = (0..start).chain(end..n_rows).collect();
            folds.push((train, validation));
            start = end;
        }
        Ok(folds)
    }
}
