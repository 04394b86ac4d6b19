/*
 * @Author       : 老董
 * @Date         : 2026-02-05
 * @Description  : 损失函数与评估指标单元测试
 */

use crate::errors::ModelError;
use crate::nn::{Loss, Metric};
use crate::tensor::Tensor;
use approx::assert_abs_diff_eq;

#[test]
fn test_categorical_cross_entropy_value() {
    let prediction = Tensor::new(&[0.7, 0.2, 0.1, 0.1, 0.8, 0.1], &[2, 3]);
    let target = Tensor::new(&[1.0, 0.0, 0.0, 0.0, 1.0, 0.0], &[2, 3]);
    let loss = Loss::CategoricalCrossEntropy
        .compute(&prediction, &target)
        .unwrap();
    // -(ln 0.7 + ln 0.8) / 2
    let expected = -(0.7f32.ln() + 0.8f32.ln()) / 2.0;
    assert_abs_diff_eq!(loss, expected, epsilon = 1e-6);
}

#[test]
fn test_categorical_cross_entropy_clips_zero_probability() {
    let prediction = Tensor::new(&[0.0, 1.0], &[1, 2]);
    let target = Tensor::new(&[1.0, 0.0], &[1, 2]);
    let loss = Loss::CategoricalCrossEntropy
        .compute(&prediction, &target)
        .unwrap();
    assert!(loss.is_finite());
    assert_abs_diff_eq!(loss, -(1e-7f32).ln(), epsilon = 1e-3);
}

#[test]
fn test_mean_squared_error_and_gradient() {
    let prediction = Tensor::new(&[1.0, 2.0, 3.0, 4.0], &[2, 2]);
    let target = Tensor::new(&[1.0, 0.0, 3.0, 2.0], &[2, 2]);
    let loss = Loss::MeanSquaredError.compute(&prediction, &target).unwrap();
    assert_abs_diff_eq!(loss, (4.0 + 4.0) / 4.0, epsilon = 1e-6);

    let grad = Loss::MeanSquaredError.gradient(&prediction, &target).unwrap();
    assert_eq!(grad.to_vec(), vec![0.0, 1.0, 0.0, 1.0]);
}

#[test]
fn test_loss_shape_mismatch() {
    let prediction = Tensor::zeros(&[2, 3]);
    let target = Tensor::zeros(&[2, 2]);
    assert!(matches!(
        Loss::MeanSquaredError.compute(&prediction, &target),
        Err(ModelError::Shape { .. })
    ));
}

#[test]
fn test_accuracy_metric() {
    let prediction = Tensor::new(&[0.9, 0.1, 0.4, 0.6, 0.3, 0.7, 0.8, 0.2], &[4, 2]);
    let target = Tensor::new(&[1.0, 0.0, 0.0, 1.0, 1.0, 0.0, 1.0, 0.0], &[4, 2]);
    let accuracy = Metric::Accuracy.compute(&prediction, &target).unwrap();
    assert_abs_diff_eq!(accuracy, 0.75, epsilon = 1e-6);
    assert_eq!(Metric::Accuracy.name(), "accuracy");
}
