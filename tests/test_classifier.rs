/*
 * @Author       : 老董
 * @Date         : 2026-02-09
 * @Description  : 预置分类网络集成测试：线性可分的两类数据上 fit → score
 */

use kkeras::errors::ModelError;
use kkeras::models::{Architecture, Classifier, ConvParams, FitConfig, LayerSizes};
use kkeras::tensor::Tensor;
use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};

const FEATURES: usize = 8;

fn init_logger() {
    let _ = env_logger::builder().is_test(true).try_init();
}

/// 类别1的特征围绕+1，类别0围绕-1
fn separable(n: usize, seed: u64) -> (Tensor, Tensor) {
    let mut rng = StdRng::seed_from_u64(seed);
    let mut x = Vec::with_capacity(n * FEATURES);
    let mut y = Vec::with_capacity(n);
    for i in 0..n {
        let class = (i % 2) as f32;
        let center = class * 2.0 - 1.0;
        for _ in 0..FEATURES {
            x.push(center + rng.gen_range(-0.6..0.6));
        }
        y.push(class);
    }
    (Tensor::new(&x, &[n, FEATURES]), Tensor::new(&y, &[n]))
}

fn config() -> FitConfig {
    FitConfig {
        max_epochs: 100,
        patience: 5,
        verbosity: 1,
        ..FitConfig::default()
    }
}

fn sizes() -> LayerSizes {
    LayerSizes::new(vec![FEATURES, 16, 8, 2]).unwrap()
}

#[test]
fn test_mlp_separates_two_classes() -> Result<(), ModelError> {
    init_logger();
    let (train_x, train_y) = separable(160, 1);
    let (val_x, val_y) = separable(40, 2);
    let (test_x, test_y) = separable(60, 3);

    let clf = Classifier::with_seed(Architecture::Dense, sizes(), 42)?;
    let fitted = clf.fit(&train_x, &train_y, &val_x, &val_y, &config())?;

    let accuracy = fitted.score(&test_x, &test_y)?;
    println!("MLP准确率: {accuracy:.3}，训练{}个epoch", fitted.history().epochs());
    assert!(accuracy > 0.9, "准确率过低: {accuracy}");
    assert_eq!(fitted.num_classes(), 2);
    assert_eq!(
        fitted.history().loss().len(),
        fitted.history().val_loss().len()
    );
    Ok(())
}

#[test]
fn test_cnn_separates_two_classes() -> Result<(), ModelError> {
    init_logger();
    let (train_x, train_y) = separable(160, 4);
    let (val_x, val_y) = separable(40, 5);

    let clf = Classifier::with_seed(
        Architecture::Convolutional(ConvParams::default()),
        sizes(),
        42,
    )?;
    let fitted = clf.fit(&train_x, &train_y, &val_x, &val_y, &config())?;

    let accuracy = fitted.score(&val_x, &val_y)?;
    assert!(accuracy > 0.9, "准确率过低: {accuracy}");

    let probabilities = fitted.predict(&val_x)?;
    assert_eq!(probabilities.shape(), &[40, 2]);
    for row in 0..40 {
        let sum = probabilities[[row, 0]] + probabilities[[row, 1]];
        approx::assert_abs_diff_eq!(sum, 1.0, epsilon = 1e-5);
    }
    Ok(())
}

#[test]
fn test_named_cnn_exposes_conv_weights() -> Result<(), ModelError> {
    init_logger();
    let (train_x, train_y) = separable(60, 6);
    let (val_x, val_y) = separable(20, 7);

    let params = ConvParams::new(4, 5, "tanh")?;
    let clf = Classifier::with_seed(Architecture::ConvolutionalNamed(params), sizes(), 0)?;
    let fitted = clf.fit(&train_x, &train_y, &val_x, &val_y, &FitConfig::default())?;

    let (kernel, bias) = fitted.get_weights("conv")?;
    assert_eq!(kernel.shape(), &[5, 1, 4]);
    assert_eq!(bias.shape(), &[4]);
    assert_eq!(fitted.conv_weights()?, (kernel, bias));

    assert!(matches!(
        fitted.get_weights("pool"),
        Err(ModelError::UnknownLayer(_))
    ));
    Ok(())
}

#[test]
fn test_early_stopping_limits_epochs() -> Result<(), ModelError> {
    let (train_x, train_y) = separable(40, 8);
    // 验证标签与特征无关，验证损失难以持续下降
    let (val_x, _) = separable(40, 9);
    let val_y = Tensor::new(
        &(0..40).map(|i| ((i / 2) % 2) as f32).collect::<Vec<_>>(),
        &[40],
    );
    let config = FitConfig {
        max_epochs: 200,
        patience: 3,
        ..FitConfig::default()
    };
    let clf = Classifier::with_seed(Architecture::Dense, sizes(), 3)?;
    let fitted = clf.fit(&train_x, &train_y, &val_x, &val_y, &config)?;

    let history = fitted.history();
    assert!(history.stopped_early());
    assert!(history.epochs() < 200);
    assert_eq!(history.stopped_epoch(), Some(history.epochs() - 1));
    Ok(())
}

#[test]
fn test_save_and_load_weights() -> Result<(), ModelError> {
    let (x, y) = separable(40, 10);
    let fitted = Classifier::with_seed(Architecture::Dense, sizes(), 1)?.fit(
        &x,
        &y,
        &x,
        &y,
        &FitConfig::default(),
    )?;
    let path = std::env::temp_dir().join("kkeras_classifier_weights.bin");
    fitted.save_weights(&path)?;

    let short = FitConfig {
        max_epochs: 1,
        ..FitConfig::default()
    };
    let mut other =
        Classifier::with_seed(Architecture::Dense, sizes(), 2)?.fit(&x, &y, &x, &y, &short)?;
    other.load_weights(&path)?;
    assert_eq!(other.predict(&x)?, fitted.predict(&x)?);
    std::fs::remove_file(&path)?;
    Ok(())
}
