//! Estimator backends.
//!
//! [`Estimator`] is the capability seam between the search machinery and
//! the underlying ML library: the selector only ever sees a boxed
//! `predict`. Concrete implementations wrap smartcore's classifiers, with
//! conversion to `DenseMatrix` confined to this module.
//!
//! The support-vector backend is special-cased: smartcore's `SVC` borrows
//! its training inputs for the model's lifetime and cannot be stored, so
//! [`SvmModel`] owns a copy of the training data and refits on every
//! `predict` call. It also only handles binary targets; on multi-class
//! data the fit fails and the candidate is excluded from the search like
//! any other failing configuration.

use smartcore::ensemble::random_forest_classifier::{
    RandomForestClassifier, RandomForestClassifierParameters,
};
use smartcore::linalg::basic::matrix::DenseMatrix;
use smartcore::linear::logistic_regression::{LogisticRegression, LogisticRegressionParameters};
use smartcore::metrics::distance::euclidian::Euclidian;
use smartcore::neighbors::knn_classifier::{KNNClassifier, KNNClassifierParameters};
use smartcore::svm::Kernels;
use smartcore::svm::svc::{SVC, SVCParameters};
use smartcore::tree::decision_tree_classifier::{
    DecisionTreeClassifier, DecisionTreeClassifierParameters,
};

use crate::error::Result;
use crate::search_space::{CandidateConfig, SvmKernel};

/// A fitted classifier that can label new rows.
pub trait Estimator: Send + Sync {
    /// Predict a class label for each row.
    fn predict(&self, rows: &[Vec<f64>]) -> Result<Vec<i32>>;
}

fn to_matrix(rows: &[Vec<f64>]) -> DenseMatrix<f64> {
    DenseMatrix::from_2d_vec(&rows.to_vec()).expect("rows form a rectangular matrix")
}

impl CandidateConfig {
    /// Fit this configuration on the given rows and labels.
    ///
    /// # Errors
    ///
    /// Returns [`SelectionError::EstimatorFailure`] when the backend
    /// rejects the data (too few rows for the hyperparameters, more than
    /// two classes for the support-vector backend, and so on).
    ///
    /// [`SelectionError::EstimatorFailure`]: crate::SelectionError::EstimatorFailure
    pub fn fit(&self, rows: &[Vec<f64>], y: &[i32], seed: u64) -> Result<Box<dyn Estimator>> {
        let x = to_matrix(rows);
        let y = y.to_vec();

        match *self {
            Self::RandomForest { n_trees, max_depth } => {
                let params = RandomForestClassifierParameters::default()
                    .with_n_trees(n_trees)
                    .with_max_depth(max_depth)
                    .with_seed(seed);
                let model = RandomForestClassifier::fit(&x, &y, params)?;
                Ok(Box::new(ForestModel { model }))
            }
            Self::DecisionTree { max_depth } => {
                let params = DecisionTreeClassifierParameters::default().with_max_depth(max_depth);
                let model = DecisionTreeClassifier::fit(&x, &y, params)?;
                Ok(Box::new(TreeModel { model }))
            }
            Self::LogisticRegression { alpha } => {
                let params = LogisticRegressionParameters::default().with_alpha(alpha);
                let model = LogisticRegression::fit(&x, &y, params)?;
                Ok(Box::new(LogisticModel { model }))
            }
            Self::SupportVector { c, kernel } => {
                let model = SvmModel::fit(x, y, c, kernel, seed)?;
                Ok(Box::new(model))
            }
            Self::NearestNeighbors { n_neighbors } => {
                let params = KNNClassifierParameters::default().with_k(n_neighbors);
                let model = KNNClassifier::fit(&x, &y, params)?;
                Ok(Box::new(KnnModel { model }))
            }
        }
    }
}

struct ForestModel {
    model: RandomForestClassifier<f64, i32, DenseMatrix<f64>, Vec<i32>>,
}

impl Estimator for ForestModel {
    fn predict(&self, rows: &[Vec<f64>]) -> Result<Vec<i32>> {
        Ok(self.model.predict(&to_matrix(rows))?)
    }
}

struct TreeModel {
    model: DecisionTreeClassifier<f64, i32, DenseMatrix<f64>, Vec<i32>>,
}

impl Estimator for TreeModel {
    fn predict(&self, rows: &[Vec<f64>]) -> Result<Vec<i32>> {
        Ok(self.model.predict(&to_matrix(rows))?)
    }
}

struct LogisticModel {
    model: LogisticRegression<f64, i32, DenseMatrix<f64>, Vec<i32>>,
}

impl Estimator for LogisticModel {
    fn predict(&self, rows: &[Vec<f64>]) -> Result<Vec<i32>> {
        Ok(self.model.predict(&to_matrix(rows))?)
    }
}

struct KnnModel {
    model: KNNClassifier<f64, i32, DenseMatrix<f64>, Vec<i32>, Euclidian<f64>>,
}

impl Estimator for KnnModel {
    fn predict(&self, rows: &[Vec<f64>]) -> Result<Vec<i32>> {
        Ok(self.model.predict(&to_matrix(rows))?)
    }
}

/// Support-vector backend that owns its training data.
///
/// The underlying `SVC` holds borrows into x/y/params, so instead of
/// storing the fitted model this wrapper keeps the inputs and refits per
/// `predict` call. Wasteful but correct; SVC training on the dataset
/// sizes this workflow targets is cheap relative to the grid search
/// around it.
struct SvmModel {
    x: DenseMatrix<f64>,
    y: Vec<i32>,
    c: f64,
    kernel: SvmKernel,
    seed: u64,
}

impl SvmModel {
    fn fit(x: DenseMatrix<f64>, y: Vec<i32>, c: f64, kernel: SvmKernel, seed: u64) -> Result<Self> {
        let model = Self {
            x,
            y,
            c,
            kernel,
            seed,
        };
        // fit once up front so invalid configurations fail during search,
        // not at prediction time
        model.refit_and_predict(&model.x)?;
        Ok(model)
    }

    fn params(&self, n_features: usize) -> SVCParameters<f64, i32, DenseMatrix<f64>, Vec<i32>> {
        // the SMO solver permutates with a thread-local RNG unless seeded;
        // every refit must draw the same permutation for runs to repeat
        let params = SVCParameters::default()
            .with_c(self.c)
            .with_seed(Some(self.seed));
        match self.kernel {
            SvmKernel::Linear => params.with_kernel(Kernels::linear()),
            SvmKernel::Rbf => {
                let gamma = 1.0 / n_features.max(1) as f64;
                params.with_kernel(Kernels::rbf().with_gamma(gamma))
            }
        }
    }

    fn refit_and_predict(&self, rows: &DenseMatrix<f64>) -> Result<Vec<i32>> {
        use smartcore::linalg::basic::arrays::Array;

        let (_, n_features) = self.x.shape();
        let params = self.params(n_features);
        let model = SVC::fit(&self.x, &self.y, &params)?;
        let raw = model.predict(rows)?;
        // SVC reports labels as floats; map them back to label space
        Ok(raw.iter().map(|v| v.round() as i32).collect())
    }
}

impl Estimator for SvmModel {
    fn predict(&self, rows: &[Vec<f64>]) -> Result<Vec<i32>> {
        self.refit_and_predict(&to_matrix(rows))
    }
}
