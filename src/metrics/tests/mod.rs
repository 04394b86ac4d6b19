use crate::errors::ModelError;
use crate::metrics::{RegressionReport, accuracy};
use crate::tensor::Tensor;
use approx::assert_abs_diff_eq;

#[test]
fn test_accuracy() {
    assert_abs_diff_eq!(accuracy(&[0, 1, 2, 1], &[0, 1, 1, 1]).unwrap(), 0.75);
    assert_eq!(accuracy(&[], &[]).unwrap(), 0.0);
    assert!(matches!(
        accuracy(&[0, 1], &[0]),
        Err(ModelError::Shape { .. })
    ));
}

#[test]
fn test_regression_report_perfect_fit() {
    let y = Tensor::new(&[1.0, 2.0, 3.0, 4.0], &[4, 1]);
    let report = RegressionReport::from_predictions(&y, &y).unwrap();
    assert_abs_diff_eq!(report.mae, 0.0);
    assert_abs_diff_eq!(report.rmse, 0.0);
    assert_abs_diff_eq!(report.r2, 1.0);
    assert_abs_diff_eq!(report.pearson, 1.0, epsilon = 1e-6);
}

#[test]
fn test_regression_report_known_values() {
    let prediction = Tensor::new(&[2.0, 2.0, 4.0, 4.0], &[4, 1]);
    let target = Tensor::new(&[1.0, 2.0, 3.0, 4.0], &[4, 1]);
    let report = RegressionReport::from_predictions(&prediction, &target).unwrap();

    // 误差 [1, 0, 1, 0]
    assert_abs_diff_eq!(report.mae, 0.5, epsilon = 1e-6);
    assert_abs_diff_eq!(report.rmse, 0.5f32.sqrt(), epsilon = 1e-6);
    // SS_res = 2，SS_tot = 5
    assert_abs_diff_eq!(report.r2, 1.0 - 2.0 / 5.0, epsilon = 1e-6);
    // cov = 4，var_p = 4，SS_tot = 5 → 4 / (2·√5)
    assert_abs_diff_eq!(report.pearson, 4.0 / (2.0 * 5.0f32.sqrt()), epsilon = 1e-6);
}

#[test]
fn test_regression_report_constant_prediction() {
    let prediction = Tensor::new(&[2.5, 2.5, 2.5, 2.5], &[4]);
    let target = Tensor::new(&[1.0, 2.0, 3.0, 4.0], &[4]);
    let report = RegressionReport::from_predictions(&prediction, &target).unwrap();
    assert_abs_diff_eq!(report.r2, 0.0, epsilon = 1e-6);
    assert_eq!(report.pearson, 0.0);
}

#[test]
fn test_regression_report_shape_mismatch() {
    let prediction = Tensor::zeros(&[4, 1]);
    let target = Tensor::zeros(&[4, 2]);
    assert!(matches!(
        RegressionReport::from_predictions(&prediction, &target),
        Err(ModelError::Shape { .. })
    ));
}
