//! # 多层感知机回归示例
//!
//! 学习带噪声的非线性目标 y = sin(x0) + x1² - 0.5·x2，输出 MAE / RMSE / R² / Pearson 四项评估。
//!
//! ## 运行
//! ```bash
//! cargo run --example toy_regression
//! ```

use kkeras::errors::ModelError;
use kkeras::models::{FitConfig, LayerSizes, Regressor};
use kkeras::tensor::Tensor;
use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};

fn make_data(n: usize, rng: &mut StdRng) -> (Tensor, Tensor) {
    let mut x = Vec::with_capacity(n * 3);
    let mut y = Vec::with_capacity(n);
    for _ in 0..n {
        let row: [f32; 3] = [
            rng.gen_range(-2.0..2.0),
            rng.gen_range(-1.0..1.0),
            rng.gen_range(-1.0..1.0),
        ];
        y.push(row[0].sin() + row[1] * row[1] - 0.5 * row[2] + rng.gen_range(-0.05..0.05));
        x.extend_from_slice(&row);
    }
    (Tensor::new(&x, &[n, 3]), Tensor::new(&y, &[n]))
}

fn main() -> Result<(), ModelError> {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info")).init();
    println!("=== 多层感知机回归示例 ===\n");

    let mut rng = StdRng::seed_from_u64(7);
    let (train_x, train_y) = make_data(800, &mut rng);
    let (val_x, val_y) = make_data(200, &mut rng);
    let (test_x, test_y) = make_data(200, &mut rng);

    let regressor = Regressor::with_seed(LayerSizes::new(vec![3, 32, 16, 8, 1])?, 7)?;
    println!("{}\n", regressor.describe());

    let config = FitConfig {
        max_epochs: 100,
        patience: 10,
        restore_best_weights: true,
        ..FitConfig::default()
    };
    let fitted = regressor.fit(&train_x, &train_y, &val_x, &val_y, &config)?;
    println!("训练了 {} 个 epoch", fitted.history().epochs());
    println!("训练历史: {}", fitted.history().to_json()?);
    println!("测试集: {}", fitted.score(&test_x, &test_y)?);
    Ok(())
}
