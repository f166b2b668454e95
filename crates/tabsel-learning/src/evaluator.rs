//! Scoring a fitted pipeline on held-out data.
//!
//! All four metrics use support-weighted averaging over classes, so the
//! same code path covers binary and multi-class targets. A per-class
//! division with a zero denominator (no predictions for the class, or no
//! true members) contributes 0 for that class rather than NaN.

use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use tracing::info;

use crate::error::{Result, SelectionError};
use crate::pipeline::FittedPipeline;

/// The four held-out metrics, each in `[0, 1]`.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct EvaluationReport {
    pub accuracy: f64,
    pub precision: f64,
    pub recall: f64,
    pub f1: f64,
}

impl EvaluationReport {
    /// The metrics as a name → value mapping, in stable name order.
    #[must_use]
    pub fn as_map(&self) -> BTreeMap<String, f64> {
        BTreeMap::from([
            ("accuracy".to_string(), self.accuracy),
            ("precision".to_string(), self.precision),
            ("recall".to_string(), self.recall),
            ("f1".to_string(), self.f1),
        ])
    }
}

/// Score `model` on the held-out rows.
///
/// # Errors
///
/// Fails on empty input, mismatched lengths, or if the underlying
/// estimator cannot predict.
pub fn evaluate(
    model: &FittedPipeline,
    x_test: &[Vec<f64>],
    y_test: &[i32],
) -> Result<EvaluationReport> {
    if x_test.is_empty() {
        return Err(SelectionError::InsufficientData(
            "cannot evaluate on an empty test split".to_string(),
        ));
    }
    if x_test.len() != y_test.len() {
        return Err(SelectionError::DimensionMismatch {
            x_rows: x_test.len(),
            y_rows: y_test.len(),
        });
    }

    let predictions = model.predict(x_test)?;
    let report = score(&predictions, y_test);
    info!(
        accuracy = report.accuracy,
        precision = report.precision,
        recall = report.recall,
        f1 = report.f1,
        "held-out evaluation"
    );
    Ok(report)
}

/// Fraction of predictions matching the truth.
#[must_use]
pub fn accuracy(predictions: &[i32], truth: &[i32]) -> f64 {
    if truth.is_empty() {
        return 0.0;
    }
    let correct = predictions.iter().zip(truth).filter(|(p, t)| p == t).count();
    correct as f64 / truth.len() as f64
}

fn score(predictions: &[i32], truth: &[i32]) -> EvaluationReport {
    let n = truth.len() as f64;

    // classes present in the truth; classes only ever predicted carry
    // zero support and would contribute nothing to the weighted sums
    let mut classes: Vec<i32> = truth.to_vec();
    classes.sort_unstable();
    classes.dedup();

    let mut precision = 0.0;
    let mut recall = 0.0;
    let mut f1 = 0.0;

    for &class in &classes {
        let mut tp = 0usize;
        let mut fp = 0usize;
        let mut fn_ = 0usize;
        for (&p, &t) in predictions.iter().zip(truth) {
            match (p == class, t == class) {
                (true, true) => tp += 1,
                (true, false) => fp += 1,
                (false, true) => fn_ += 1,
                (false, false) => {}
            }
        }

        let class_precision = ratio(tp, tp + fp);
        let class_recall = ratio(tp, tp + fn_);
        let class_f1 = if class_precision + class_recall > 0.0 {
            2.0 * class_precision * class_recall / (class_precision + class_recall)
        } else {
            0.0
        };

        let weight = (tp + fn_) as f64 / n;
        precision += weight * class_precision;
        recall += weight * class_recall;
        f1 += weight * class_f1;
    }

    EvaluationReport {
        accuracy: accuracy(predictions, truth),
        precision,
        recall,
        f1,
    }
}

fn ratio(numerator: usize, denominator: usize) -> f64 {
    if denominator == 0 {
        0.0
    } else {
        numerator as f64 / denominator as f64
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    #[test]
    fn test_perfect_predictions() {
        let y = vec![0, 1, 1, 0, 2];
        let report = score(&y, &y);
        assert_eq!(report.accuracy, 1.0);
        assert_eq!(report.precision, 1.0);
        assert_eq!(report.recall, 1.0);
        assert_eq!(report.f1, 1.0);
    }

    #[test]
    fn test_binary_weighted_metrics() {
        // truth:  [0, 0, 1, 1]; preds: [0, 1, 1, 1]
        // class 0: tp=1 fp=0 fn=1 -> p=1.0, r=0.5, f1=2/3, support 2
        // class 1: tp=2 fp=1 fn=0 -> p=2/3, r=1.0, f1=0.8, support 2
        let report = score(&[0, 1, 1, 1], &[0, 0, 1, 1]);
        assert_eq!(report.accuracy, 0.75);
        assert!((report.precision - (0.5 * 1.0 + 0.5 * 2.0 / 3.0)).abs() < 1e-12);
        assert!((report.recall - 0.75).abs() < 1e-12);
        assert!((report.f1 - (0.5 * (2.0 / 3.0) + 0.5 * 0.8)).abs() < 1e-12);
    }

    #[test]
    fn test_never_predicted_class_contributes_zero() {
        // class 1 exists in truth but is never predicted: its precision
        // denominator is zero and must contribute 0, not NaN
        let report = score(&[0, 0, 0], &[0, 0, 1]);
        assert!(report.precision.is_finite());
        assert!(report.recall.is_finite());
        assert!(report.f1.is_finite());
        assert!((report.recall - 2.0 / 3.0).abs() < 1e-12);
    }

    #[test]
    fn test_metrics_within_unit_interval() {
        let report = score(&[2, 0, 1, 1, 2, 0], &[0, 0, 1, 2, 2, 1]);
        for (name, value) in report.as_map() {
            assert!((0.0..=1.0).contains(&value), "{name} = {value}");
        }
    }

    #[test]
    fn test_as_map_has_all_four_metrics() {
        let report = score(&[0, 1], &[0, 1]);
        let map = report.as_map();
        assert_eq!(map.len(), 4);
        assert!(map.contains_key("accuracy"));
        assert!(map.contains_key("precision"));
        assert!(map.contains_key("recall"));
        assert!(map.contains_key("f1"));
    }
}
