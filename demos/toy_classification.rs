//! # 一维卷积分类示例（三分类）
//!
//! 展示命名卷积网络的完整流程：
//! - 合成数据：49 个特征的序列，三类分别在序列的前、中、后段出现峰值
//! - 网络：Conv1d(2, 3, relu) → Flatten → Dense(30) → Dense(10) → Dense(3, softmax)
//! - 早停监控验证损失，训练后读取卷积层权重
//!
//! ## 运行
//! ```bash
//! RUST_LOG=info cargo run --example toy_classification
//! ```

use kkeras::errors::ModelError;
use kkeras::models::{Classifier, ConvParams, FitConfig, LayerSizes};
use kkeras::tensor::Tensor;
use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};

const LEN: usize = 49;

/// 每类在序列的不同位置放置一个高斯峰，并叠加均匀噪声
fn make_data(n: usize, rng: &mut StdRng) -> (Tensor, Tensor) {
    let centers = [8.0, 24.0, 40.0];
    let mut x = Vec::with_capacity(n * LEN);
    let mut y = Vec::with_capacity(n);
    for i in 0..n {
        let class = i % 3;
        for t in 0..LEN {
            let d = t as f32 - centers[class];
            x.push((-d * d / 18.0).exp() + rng.gen_range(-0.2..0.2));
        }
        y.push(class as f32);
    }
    (Tensor::new(&x, &[n, LEN]), Tensor::new(&y, &[n]))
}

fn main() -> Result<(), ModelError> {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info")).init();
    println!("=== 一维卷积分类示例 ===\n");

    let mut rng = StdRng::seed_from_u64(42);
    let (train_x, train_y) = make_data(300, &mut rng);
    let (val_x, val_y) = make_data(60, &mut rng);
    let (test_x, test_y) = make_data(90, &mut rng);

    let clf = Classifier::with_seed(
        kkeras::models::Architecture::ConvolutionalNamed(ConvParams::default()),
        LayerSizes::new(vec![LEN, 30, 10, 3])?,
        42,
    )?;
    println!("{}\n", clf.describe());

    let config = FitConfig {
        max_epochs: 50,
        verbosity: 1,
        ..FitConfig::default()
    };
    let fitted = clf.fit(&train_x, &train_y, &val_x, &val_y, &config)?;

    let history = fitted.history();
    println!("\n训练了 {} 个 epoch，提前停止: {}", history.epochs(), history.stopped_early());
    println!("测试集准确率: {:.2}%", fitted.score(&test_x, &test_y)? * 100.0);

    let (kernel, bias) = fitted.conv_weights()?;
    println!("卷积核形状 {:?}: {:?}", kernel.shape(), kernel.to_vec());
    println!("卷积偏置形状 {:?}: {:?}", bias.shape(), bias.to_vec());
    Ok(())
}
