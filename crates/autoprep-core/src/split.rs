//! Seeded train/test assignment.
//!
//! Only row positions are decided here; the frames themselves are cut with
//! [`crate::frame::filter_rows`] so features and labels stay in lockstep.

use std::collections::BTreeMap;

use rand::SeedableRng;
use rand::rngs::StdRng;
use rand::seq::SliceRandom;
use tracing::debug;

/// Row positions assigned to each fold, both ascending.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SplitPlan {
    pub train: Vec<usize>,
    pub test: Vec<usize>,
    pub stratified: bool,
}

impl SplitPlan {
    /// Everything in the training fold.
    pub fn train_only(rows: usize) -> Self {
        Self {
            train: (0..rows).collect(),
            test: Vec::new(),
            stratified: false,
        }
    }

    pub fn rows(&self) -> usize {
        self.train.len() + self.test.len()
    }

    /// Row mask selecting the training fold.
    pub fn train_mask(&self) -> Vec<bool> {
        self.mask(&self.train)
    }

    /// Row mask selecting the test fold.
    pub fn test_mask(&self) -> Vec<bool> {
        self.mask(&self.test)
    }

    fn mask(&self, rows: &[usize]) -> Vec<bool> {
        let mut mask = vec![false; self.rows()];
        for &row in rows {
            mask[row] = true;
        }
        mask
    }

    fn from_test_rows(rows: usize, mut test: Vec<usize>, stratified: bool) -> Self {
        test.sort_unstable();
        let mut in_test = vec![false; rows];
        for &row in &test {
            in_test[row] = true;
        }
        let train = (0..rows).filter(|row| !in_test[*row]).collect();
        Self {
            train,
            test,
            stratified,
        }
    }
}

/// Number of test rows for `rows` labelled rows. Both folds keep at least
/// one row whenever there are two or more rows.
pub fn test_size(rows: usize, test_share: f64) -> usize {
    if rows < 2 {
        return 0;
    }
    let raw = (rows as f64 * test_share - 1e-9).ceil().max(0.0) as usize;
    raw.clamp(1, rows - 1)
}

/// Shuffle all rows with `seed` and send the first `test_size` to the test fold.
pub fn random_split(rows: usize, test_share: f64, seed: u64) -> SplitPlan {
    let mut indices: Vec<usize> = (0..rows).collect();
    let mut rng = StdRng::seed_from_u64(seed);
    indices.shuffle(&mut rng);
    let test = indices[..test_size(rows, test_share)].to_vec();
    SplitPlan::from_test_rows(rows, test, false)
}

/// Split each class separately so class shares match across folds.
///
/// Classes with a single row stay in training. Falls back to
/// [`random_split`] when no class contributes a test row.
pub fn stratified_split(labels: &[String], test_share: f64, seed: u64) -> SplitPlan {
    let rows = labels.len();
    let mut classes: BTreeMap<&str, Vec<usize>> = BTreeMap::new();
    for (row, label) in labels.iter().enumerate() {
        classes.entry(label.as_str()).or_default().push(row);
    }
    let mut rng = StdRng::seed_from_u64(seed);
    let mut test = Vec::new();
    for (label, members) in classes.iter_mut() {
        if members.len() < 2 {
            continue;
        }
        members.shuffle(&mut rng);
        let take = ((members.len() as f64 * test_share).round() as usize).min(members.len() - 1);
        debug!(class = %label, rows = members.len(), test = take, "class split");
        test.extend_from_slice(&members[..take]);
    }
    if test.is_empty() {
        return random_split(rows, test_share, seed);
    }
    SplitPlan::from_test_rows(rows, test, true)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_size_rounds_up_and_keeps_both_folds() {
        assert_eq!(test_size(100, 0.2), 20);
        assert_eq!(test_size(5, 0.2), 1);
        assert_eq!(test_size(7, 0.2), 2);
        assert_eq!(test_size(2, 0.9), 1);
        assert_eq!(test_size(1, 0.2), 0);
    }

    #[test]
    fn random_split_is_reproducible_and_partitions_rows() {
        let a = random_split(50, 0.2, 42);
        let b = random_split(50, 0.2, 42);
        assert_eq!(a, b);
        assert_eq!(a.test.len(), 10);
        assert_eq!(a.train.len(), 40);
        let mut all: Vec<usize> = a.train.iter().chain(&a.test).copied().collect();
        all.sort_unstable();
        assert_eq!(all, (0..50).collect::<Vec<_>>());
        assert_ne!(random_split(50, 0.2, 7).test, a.test);
    }

    #[test]
    fn stratified_split_keeps_class_shares() {
        let labels: Vec<String> = (0..40)
            .map(|i| if i % 4 == 0 { "rare" } else { "common" }.to_string())
            .collect();
        let plan = stratified_split(&labels, 0.2, 42);
        assert!(plan.stratified);
        let rare_test = plan.test.iter().filter(|&&i| labels[i] == "rare").count();
        let common_test = plan.test.iter().filter(|&&i| labels[i] == "common").count();
        assert_eq!(rare_test, 2);
        assert_eq!(common_test, 6);
    }

    #[test]
    fn singleton_classes_stay_in_training() {
        let labels: Vec<String> = ["a", "b", "c", "c", "c", "c", "c"]
            .iter()
            .map(|s| s.to_string())
            .collect();
        let plan = stratified_split(&labels, 0.2, 1);
        assert!(plan.train.contains(&0));
        assert!(plan.train.contains(&1));
        assert_eq!(plan.test.len(), 1);
    }

    #[test]
    fn masks_cover_every_row_once() {
        let plan = random_split(9, 0.3, 3);
        let train = plan.train_mask();
        let test = plan.test_mask();
        assert!(train.iter().zip(&test).all(|(a, b)| a != b));
    }
}
