//! Candidate configurations and the grid that enumerates them.
//!
//! Each estimator family is an enum variant carrying only the
//! hyperparameters that family actually accepts, so an invalid
//! axis/family pairing cannot be constructed. [`SearchSpace`] holds the
//! per-family axis value lists and enumerates their Cartesian product in
//! a fixed order, which makes tie-breaking during selection
//! deterministic.

use serde::{Deserialize, Serialize};
use std::fmt;

/// Kernel choices for the support-vector family.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum SvmKernel {
    Linear,
    Rbf,
}

impl fmt::Display for SvmKernel {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Linear => write!(f, "linear"),
            Self::Rbf => write!(f, "rbf"),
        }
    }
}

/// One concrete estimator configuration drawn from the search space.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "family", rename_all = "snake_case")]
pub enum CandidateConfig {
    RandomForest { n_trees: u16, max_depth: u16 },
    DecisionTree { max_depth: u16 },
    LogisticRegression { alpha: f64 },
    SupportVector { c: f64, kernel: SvmKernel },
    NearestNeighbors { n_neighbors: usize },
}

impl CandidateConfig {
    /// Short family name, stable across hyperparameter values.
    #[must_use]
    pub fn family(&self) -> &'static str {
        match self {
            Self::RandomForest { .. } => "random_forest",
            Self::DecisionTree { .. } => "decision_tree",
            Self::LogisticRegression { .. } => "logistic_regression",
            Self::SupportVector { .. } => "support_vector",
            Self::NearestNeighbors { .. } => "nearest_neighbors",
        }
    }
}

impl fmt::Display for CandidateConfig {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::RandomForest { n_trees, max_depth } => {
                write!(f, "random_forest(n_trees={n_trees}, max_depth={max_depth})")
            }
            Self::DecisionTree { max_depth } => {
                write!(f, "decision_tree(max_depth={max_depth})")
            }
            Self::LogisticRegression { alpha } => {
                write!(f, "logistic_regression(alpha={alpha})")
            }
            Self::SupportVector { c, kernel } => {
                write!(f, "support_vector(c={c}, kernel={kernel})")
            }
            Self::NearestNeighbors { n_neighbors } => {
                write!(f, "nearest_neighbors(n_neighbors={n_neighbors})")
            }
        }
    }
}

/// Per-family hyperparameter axes.
///
/// `candidates()` enumerates families in declaration order and axes
/// row-major within each family. Setting an axis to an empty list removes
/// that family from the grid entirely.
///
/// # Example
///
/// ```
/// use tabsel_learning::SearchSpace;
///
/// let space = SearchSpace::default()
///     .with_knn_n_neighbors([3, 5])
///     .with_rf_n_trees([]);
///
/// let candidates = space.candidates();
/// assert!(candidates.iter().all(|c| c.family() != "random_forest"));
/// ```
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SearchSpace {
    pub rf_n_trees: Vec<u16>,
    pub rf_max_depth: Vec<u16>,
    pub dt_max_depth: Vec<u16>,
    pub lr_alpha: Vec<f64>,
    pub svc_c: Vec<f64>,
    pub svc_kernels: Vec<SvmKernel>,
    pub knn_n_neighbors: Vec<usize>,
}

impl Default for SearchSpace {
    /// The stock grid: 4 forest + 3 tree + 3 logistic + 6 SVC + 3 KNN
    /// candidates, 19 in total.
    fn default() -> Self {
        Self {
            rf_n_trees: vec![50, 100],
            rf_max_depth: vec![5, 10],
            dt_max_depth: vec![3, 5, 10],
            lr_alpha: vec![0.0, 0.1, 1.0],
            svc_c: vec![0.1, 1.0, 10.0],
            svc_kernels: vec![SvmKernel::Linear, SvmKernel::Rbf],
            knn_n_neighbors: vec![3, 5, 7],
        }
    }
}

impl SearchSpace {
    /// An empty grid; populate axes with the `with_*` methods.
    #[must_use]
    pub fn empty() -> Self {
        Self {
            rf_n_trees: Vec::new(),
            rf_max_depth: Vec::new(),
            dt_max_depth: Vec::new(),
            lr_alpha: Vec::new(),
            svc_c: Vec::new(),
            svc_kernels: Vec::new(),
            knn_n_neighbors: Vec::new(),
        }
    }

    #[must_use]
    pub fn with_rf_n_trees(mut self, values: impl IntoIterator<Item = u16>) -> Self {
        self.rf_n_trees = values.into_iter().collect();
        self
    }

    #[must_use]
    pub fn with_rf_max_depth(mut self, values: impl IntoIterator<Item = u16>) -> Self {
        self.rf_max_depth = values.into_iter().collect();
        self
    }

    #[must_use]
    pub fn with_dt_max_depth(mut self, values: impl IntoIterator<Item = u16>) -> Self {
        self.dt_max_depth = values.into_iter().collect();
        self
    }

    #[must_use]
    pub fn with_lr_alpha(mut self, values: impl IntoIterator<Item = f64>) -> Self {
        self.lr_alpha = values.into_iter().collect();
        self
    }

    #[must_use]
    pub fn with_svc_c(mut self, values: impl IntoIterator<Item = f64>) -> Self {
        self.svc_c = values.into_iter().collect();
        self
    }

    #[must_use]
    pub fn with_svc_kernels(mut self, values: impl IntoIterator<Item = SvmKernel>) -> Self {
        self.svc_kernels = values.into_iter().collect();
        self
    }

    #[must_use]
    pub fn with_knn_n_neighbors(mut self, values: impl IntoIterator<Item = usize>) -> Self {
        self.knn_n_neighbors = values.into_iter().collect();
        self
    }

    /// Enumerate every candidate configuration in deterministic order.
    #[must_use]
    pub fn candidates(&self) -> Vec<CandidateConfig> {
        let mut out = Vec::new();

        for &n_trees in &self.rf_n_trees {
            for &max_depth in &self.rf_max_depth {
                out.push(CandidateConfig::RandomForest { n_trees, max_depth });
            }
        }
        for &max_depth in &self.dt_max_depth {
            out.push(CandidateConfig::DecisionTree { max_depth });
        }
        for &alpha in &self.lr_alpha {
            out.push(CandidateConfig::LogisticRegression { alpha });
        }
        for &c in &self.svc_c {
            for &kernel in &self.svc_kernels {
                out.push(CandidateConfig::SupportVector { c, kernel });
            }
        }
        for &n_neighbors in &self.knn_n_neighbors {
            out.push(CandidateConfig::NearestNeighbors { n_neighbors });
        }

        out
    }

    /// Total number of candidates the grid enumerates.
    #[must_use]
    pub fn len(&self) -> usize {
        self.rf_n_trees.len() * self.rf_max_depth.len()
            + self.dt_max_depth.len()
            + self.lr_alpha.len()
            + self.svc_c.len() * self.svc_kernels.len()
            + self.knn_n_neighbors.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    #[test]
    fn test_default_grid_size() {
        let space = SearchSpace::default();
        let candidates = space.candidates();
        assert_eq!(candidates.len(), 19);
        assert_eq!(space.len(), candidates.len());
    }

    #[test]
    fn test_enumeration_order_is_deterministic() {
        let a = SearchSpace::default().candidates();
        let b = SearchSpace::default().candidates();
        assert_eq!(a, b);

        // families appear in declaration order
        assert_eq!(a[0].family(), "random_forest");
        assert_eq!(a.last().unwrap().family(), "nearest_neighbors");
    }

    #[test]
    fn test_row_major_axis_order() {
        let space = SearchSpace::empty()
            .with_rf_n_trees([10, 20])
            .with_rf_max_depth([2, 4]);
        let candidates = space.candidates();
        assert_eq!(
            candidates,
            vec![
                CandidateConfig::RandomForest {
                    n_trees: 10,
                    max_depth: 2
                },
                CandidateConfig::RandomForest {
                    n_trees: 10,
                    max_depth: 4
                },
                CandidateConfig::RandomForest {
                    n_trees: 20,
                    max_depth: 2
                },
                CandidateConfig::RandomForest {
                    n_trees: 20,
                    max_depth: 4
                },
            ]
        );
    }

    #[test]
    fn test_empty_axis_removes_family() {
        let space = SearchSpace::default().with_svc_kernels([]);
        let candidates = space.candidates();
        assert!(candidates.iter().all(|c| c.family() != "support_vector"));
        assert_eq!(candidates.len(), 13);
    }

    #[test]
    fn test_empty_space() {
        let space = SearchSpace::empty();
        assert!(space.is_empty());
        assert!(space.candidates().is_empty());
    }

    #[test]
    fn test_config_display() {
        let config = CandidateConfig::SupportVector {
            c: 1.0,
            kernel: SvmKernel::Rbf,
        };
        assert_eq!(config.to_string(), "support_vector(c=1, kernel=rbf)");
    }

    #[test]
    fn test_config_serializes_tagged() {
        let config = CandidateConfig::DecisionTree { max_depth: 5 };
        let json = serde_json::to_value(&config).unwrap();
        assert_eq!(json["family"], "decision_tree");
        assert_eq!(json["max_depth"], 5);
    }
}
