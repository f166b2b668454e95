//! End-to-end tests: CSV-shaped data through preprocessing, search, and
//! evaluation.

use polars::prelude::*;
use std::sync::Arc;
use std::sync::atomic::{AtomicUsize, Ordering};

use tabsel_learning::{
    ClosureProgressReporter, ModelSelector, SearchSpace, SelectionConfig, SelectionError,
    SelectionStage, SvmKernel, evaluate, run_selection,
};
use tabsel_processing::{Preprocessor, ProcessingError};

/// 100 rows, one numeric feature, separable string labels.
fn binary_frame() -> DataFrame {
    let values: Vec<f64> = (0..100)
        .map(|i| if i % 2 == 0 { i as f64 * 0.1 } else { 50.0 + i as f64 * 0.1 })
        .collect();
    let labels: Vec<&str> = (0..100).map(|i| if i % 2 == 0 { "no" } else { "yes" }).collect();
    df!(
        "value" => values,
        "label" => labels,
    )
    .unwrap()
}

#[test]
fn full_workflow_on_binary_dataset() {
    let df = binary_frame();
    let (x, y) = Preprocessor::new("label").prepare(&df).unwrap();

    assert_eq!(x.shape(), (100, 1));
    assert!(y.values.iter().all(|&v| v == 0 || v == 1));

    let (model, report) = run_selection(&x, &y, SelectionConfig::default()).unwrap();

    for (name, value) in report.as_map() {
        assert!((0.0..=1.0).contains(&value), "{name} = {value}");
    }
    // clearly separable: the winner should do well out of sample
    assert!(report.accuracy > 0.8, "accuracy = {}", report.accuracy);

    // the fitted model labels new rows from both clusters
    let preds = model.predict(&[vec![1.0], vec![55.0]]).unwrap();
    assert_eq!(preds.len(), 2);
}

#[test]
fn same_seed_selects_same_configuration() {
    let df = binary_frame();
    let (x, y) = Preprocessor::new("label").prepare(&df).unwrap();

    let run = || {
        let selector = ModelSelector::builder()
            .config(SelectionConfig::builder().seed(7).build().unwrap())
            .search_space(
                SearchSpace::empty()
                    .with_dt_max_depth([3, 5])
                    .with_svc_c([1.0])
                    .with_svc_kernels([SvmKernel::Linear, SvmKernel::Rbf])
                    .with_knn_n_neighbors([3, 5]),
            )
            .build();
        selector.select(&x, &y).unwrap()
    };

    let a = run();
    let b = run();
    assert_eq!(a.best, b.best);
    assert_eq!(a.candidates, b.candidates);

    let report_a = evaluate(&a.model, &a.x_test, &a.y_test).unwrap();
    let report_b = evaluate(&b.model, &b.x_test, &b.y_test).unwrap();
    assert_eq!(report_a, report_b);
}

#[test]
fn missing_target_column_fails_before_any_training() {
    let df = binary_frame();
    let result = Preprocessor::new("no_such_column").prepare(&df);
    assert!(matches!(result, Err(ProcessingError::ColumnNotFound(_))));
}

#[test]
fn all_failing_grid_reports_no_viable_configuration() {
    // three classes defeat the binary-only support-vector backend
    let df = df!(
        "value" => (0..90).map(|i| i as f64).collect::<Vec<f64>>(),
        "label" => (0..90).map(|i| ["a", "b", "c"][i % 3]).collect::<Vec<&str>>(),
    )
    .unwrap();
    let (x, y) = Preprocessor::new("label").prepare(&df).unwrap();

    let selector = ModelSelector::builder()
        .search_space(
            SearchSpace::empty()
                .with_svc_c([0.1, 1.0, 10.0])
                .with_svc_kernels([SvmKernel::Linear, SvmKernel::Rbf]),
        )
        .build();

    assert!(matches!(
        selector.select(&x, &y),
        Err(SelectionError::NoViableConfiguration { attempted: 6 })
    ));
}

#[test]
fn progress_events_reach_the_injected_reporter() {
    let df = binary_frame();
    let (x, y) = Preprocessor::new("label").prepare(&df).unwrap();

    let events = Arc::new(AtomicUsize::new(0));
    let saw_complete = Arc::new(AtomicUsize::new(0));
    let reporter = {
        let events = events.clone();
        let saw_complete = saw_complete.clone();
        ClosureProgressReporter::new(move |update| {
            events.fetch_add(1, Ordering::SeqCst);
            if update.stage == SelectionStage::Complete {
                saw_complete.fetch_add(1, Ordering::SeqCst);
            }
        })
    };

    let selector = ModelSelector::builder()
        .search_space(SearchSpace::empty().with_dt_max_depth([3]))
        .progress_reporter(Arc::new(reporter))
        .build();
    selector.select(&x, &y).unwrap();

    assert!(events.load(Ordering::SeqCst) >= 4);
    assert_eq!(saw_complete.load(Ordering::SeqCst), 1);
}
