use crate::errors::ModelError;
use crate::models::{Architecture, Classifier, ConvParams, FitConfig, LayerSizes};
use crate::tensor::Tensor;

fn toy() -> (Tensor, Tensor) {
    let x = Tensor::new(&[0.0, 0.1, 0.2, 0.9, 1.0, 0.8, 0.1, 0.0, 1.0, 0.9], &[5, 2]);
    let y = Tensor::new(&[0.0, 1.0, 1.0, 0.0, 1.0], &[5]);
    (x, y)
}

fn classifier(output: usize) -> Classifier {
    Classifier::with_seed(
        Architecture::Dense,
        LayerSizes::new(vec![2, 4, output]).unwrap(),
        0,
    )
    .unwrap()
}

fn quick() -> FitConfig {
    FitConfig {
        max_epochs: 2,
        ..FitConfig::default()
    }
}

#[test]
fn test_fit_resolves_num_classes() {
    let (x, y) = toy();
    let fitted = classifier(2).fit(&x, &y, &x, &y, &quick()).unwrap();
    assert_eq!(fitted.num_classes(), 2);
    assert_eq!(fitted.history().epochs(), 2);
    assert_eq!(fitted.predict(&x).unwrap().shape(), &[5, 2]);
    assert_eq!(fitted.predict_classes(&x).unwrap().len(), 5);
}

#[test]
fn test_column_labels_are_accepted() {
    let (x, y) = toy();
    let y = y.reshape(&[5, 1]).unwrap();
    assert!(classifier(2).fit(&x, &y, &x, &y, &quick()).is_ok());
}

#[test]
fn test_negative_label_is_rejected() {
    let (x, _) = toy();
    let y = Tensor::new(&[0.0, 1.0, -1.0, 0.0, 1.0], &[5]);
    assert!(matches!(
        classifier(2)
            .fit(&x, &y, &x, &y, &quick())
            .map_err(ModelError::from),
        Err(ModelError::LabelRange(_))
    ));
}

#[test]
fn test_declared_num_classes_too_small() {
    let (x, y) = toy();
    let config = FitConfig {
        num_classes: Some(1),
        ..quick()
    };
    assert!(matches!(
        classifier(1)
            .fit(&x, &y, &x, &y, &config)
            .map_err(ModelError::from),
        Err(ModelError::LabelRange(_))
    ));
}

#[test]
fn test_validation_label_beyond_inferred_classes() {
    let (x, y) = toy();
    let val_y = Tensor::new(&[0.0, 1.0, 2.0, 0.0, 1.0], &[5]);
    assert!(matches!(
        classifier(2)
            .fit(&x, &y, &x, &val_y, &quick())
            .map_err(ModelError::from),
        Err(ModelError::LabelRange(_))
    ));
}

#[test]
fn test_num_classes_must_match_output_width() {
    let (x, y) = toy();
    assert!(matches!(
        classifier(3)
            .fit(&x, &y, &x, &y, &quick())
            .map_err(ModelError::from),
        Err(ModelError::Shape { .. })
    ));
    // 显式声明3类则与输出宽度一致
    let config = FitConfig {
        num_classes: Some(3),
        ..quick()
    };
    let fitted = classifier(3).fit(&x, &y, &x, &y, &config).unwrap();
    assert_eq!(fitted.num_classes(), 3);
}

#[test]
fn test_feature_width_mismatch() {
    let (_, y) = toy();
    let x = Tensor::zeros(&[5, 3]);
    assert!(matches!(
        classifier(2)
            .fit(&x, &y, &x, &y, &quick())
            .map_err(ModelError::from),
        Err(ModelError::Shape { .. })
    ));
}

#[test]
fn test_row_count_mismatch() {
    let (x, _) = toy();
    let y = Tensor::new(&[0.0, 1.0, 1.0], &[3]);
    assert!(matches!(
        classifier(2)
            .fit(&x, &y, &x, &y, &quick())
            .map_err(ModelError::from),
        Err(ModelError::Shape { .. })
    ));
}

#[test]
fn test_regression_architecture_rejected() {
    let sizes = LayerSizes::new(vec![2, 1]).unwrap();
    assert!(matches!(
        Classifier::new(Architecture::DenseRegression, sizes),
        Err(ModelError::Config(_))
    ));
}

#[test]
fn test_get_weights_on_unnamed_architecture() {
    let (x, y) = toy();
    let fitted = classifier(2).fit(&x, &y, &x, &y, &quick()).unwrap();
    assert!(matches!(
        fitted.get_weights("conv"),
        Err(ModelError::UnknownLayer(name)) if name == "conv"
    ));
    assert!(fitted.conv_weights().is_err());
}

#[test]
fn test_named_conv_weights_shape() {
    let (x, y) = toy();
    let params = ConvParams::new(3, 2, "relu").unwrap();
    let clf = Classifier::with_seed(
        Architecture::ConvolutionalNamed(params),
        LayerSizes::new(vec![2, 4, 2]).unwrap(),
        0,
    )
    .unwrap();
    let fitted = clf.fit(&x, &y, &x, &y, &quick()).unwrap();

    let (kernel, bias) = fitted.conv_weights().unwrap();
    assert_eq!(kernel.shape(), &[2, 1, 3]);
    assert_eq!(bias.shape(), &[3]);
    assert!(matches!(
        fitted.get_weights("activation"),
        Err(ModelError::Config(_))
    ));
}

#[test]
fn test_refit_continues_training() {
    let (x, y) = toy();
    let mut fitted = classifier(2).fit(&x, &y, &x, &y, &quick()).unwrap();
    let before = fitted.predict(&x).unwrap();
    let history = fitted.refit(&x, &y, &x, &y, &quick()).unwrap();
    assert!(history.epochs() >= 1);
    assert_ne!(fitted.predict(&x).unwrap(), before);
}

#[test]
fn test_score_rejects_unknown_class() {
    let (x, y) = toy();
    let fitted = classifier(2).fit(&x, &y, &x, &y, &quick()).unwrap();
    let bad = Tensor::new(&[0.0, 1.0, 5.0, 0.0, 1.0], &[5]);
    assert!(matches!(
        fitted.score(&x, &bad),
        Err(ModelError::LabelRange(_))
    ));
    let accuracy = fitted.score(&x, &y).unwrap();
    assert!((0.0..=1.0).contains(&accuracy));
}

#[test]
fn test_huge_label_is_rejected() {
    let (x, _) = toy();
    let y = Tensor::new(&[0.0, 1.0, 1e20, 0.0, 1.0], &[5]);
    assert!(matches!(
        classifier(2)
            .fit(&x, &y, &x, &y, &quick())
            .map_err(ModelError::from),
        Err(ModelError::LabelRange(_))
    ));
}

#[test]
fn test_failed_fit_returns_untouched_classifier() {
    let (x, y) = toy();
    let bad_y = Tensor::new(&[0.0, 1.0, -1.0, 0.0, 1.0], &[5]);
    let clf = classifier(2);
    let before = clf.model().get_weights();

    let err = clf.fit(&x, &bad_y, &x, &bad_y, &quick()).unwrap_err();
    assert!(matches!(err.error, ModelError::LabelRange(_)));
    let clf = err.into_model();
    assert_eq!(clf.model().get_weights(), before);

    let fitted = clf.fit(&x, &y, &x, &y, &quick()).unwrap();
    assert_eq!(fitted.num_classes(), 2);
}
