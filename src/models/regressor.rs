/*
 * @Author       : 老董
 * @Date         : 2026-02-08
 * @Description  : 回归网络封装：Regressor（未训练）→ fit → FittedRegressor
 */

use super::builder::Architecture;
use super::config::{FitConfig, LayerSizes};
use super::trainer::Trainer;
use crate::errors::{FitError, ModelError};
use crate::metrics::RegressionReport;
use crate::nn::{CompiledModel, History, ModelDescriptor};
use crate::tensor::Tensor;
use std::path::Path;

/// 尚未训练的多层感知机回归网络（MSE + Adam，输出层为线性）
#[derive(Debug)]
pub struct Regressor {
    trainer: Trainer,
}

impl Regressor {
    pub fn new(sizes: LayerSizes) -> Result<Self, ModelError> {
        Ok(Self {
            trainer: Trainer::new(Architecture::DenseRegression, sizes, None)?,
        })
    }

    pub fn with_seed(sizes: LayerSizes, seed: u64) -> Result<Self, ModelError> {
        Ok(Self {
            trainer: Trainer::new(Architecture::DenseRegression, sizes, Some(seed))?,
        })
    }

    pub fn layer_sizes(&self) -> &LayerSizes {
        self.trainer.sizes()
    }

    pub fn model(&self) -> &CompiledModel {
        self.trainer.model()
    }

    pub fn describe(&self) -> ModelDescriptor {
        self.trainer.model().describe()
    }

    /// 训练网络，目标值为`[N]`（视为`[N, 1]`）或`[N, D]`，D须等于输出宽度
    ///
    /// 失败时`FitError::model`交还未训练的网络。
    pub fn fit(
        mut self,
        train_x: &Tensor,
        train_y: &Tensor,
        val_x: &Tensor,
        val_y: &Tensor,
        config: &FitConfig,
    ) -> Result<FittedRegressor, FitError<Regressor>> {
        match train(&mut self.trainer, train_x, train_y, val_x, val_y, config) {
            Ok(history) => Ok(FittedRegressor {
                trainer: self.trainer,
                history,
            }),
            Err(error) => Err(FitError { model: self, error }),
        }
    }
}

/// 训练后的回归网络
#[derive(Debug)]
pub struct FittedRegressor {
    trainer: Trainer,
    history: History,
}

impl FittedRegressor {
    /// 测试集上的MAE、RMSE、R²与Pearson相关系数
    pub fn score(&self, x: &Tensor, y: &Tensor) -> Result<RegressionReport, ModelError> {
        let target = targets(y, self.trainer.sizes().output_width())?;
        self.trainer.check_features(x, target.rows())?;
        let prediction = self.predict(x)?;
        RegressionReport::from_predictions(&prediction, &target)
    }

    /// 连续输出，形状`[N, D]`
    pub fn predict(&self, x: &Tensor) -> Result<Tensor, ModelError> {
        self.trainer.predict(x)
    }

    pub fn history(&self) -> &History {
        &self.history
    }

    pub fn model(&self) -> &CompiledModel {
        self.trainer.model()
    }

    /// 以当前权重为起点继续训练，成功后替换训练历史
    pub fn refit(
        &mut self,
        train_x: &Tensor,
        train_y: &Tensor,
        val_x: &Tensor,
        val_y: &Tensor,
        config: &FitConfig,
    ) -> Result<&History, ModelError> {
        self.history = train(&mut self.trainer, train_x, train_y, val_x, val_y, config)?;
        Ok(&self.history)
    }

    pub fn save_weights<P: AsRef<Path>>(&self, path: P) -> Result<(), ModelError> {
        self.trainer.save_weights(path.as_ref())
    }

    pub fn load_weights<P: AsRef<Path>>(&mut self, path: P) -> Result<(), ModelError> {
        self.trainer.load_weights(path.as_ref())
    }
}

fn train(
    trainer: &mut Trainer,
    train_x: &Tensor,
    train_y: &Tensor,
    val_x: &Tensor,
    val_y: &Tensor,
    config: &FitConfig,
) -> Result<History, ModelError> {
    if config.num_classes.is_some() {
        log::warn!("回归网络忽略num_classes");
    }
    let width = trainer.sizes().output_width();
    let train_targets = targets(train_y, width)?;
    let val_targets = targets(val_y, width)?;
    trainer.train(train_x, &train_targets, val_x, &val_targets, config)
}

/// 目标值整理为`[N, width]`
fn targets(y: &Tensor, width: usize) -> Result<Tensor, ModelError> {
    match *y.shape() {
        [n] if width == 1 => Ok(y.reshape(&[n, 1])?),
        [_, d] if d == width => Ok(y.clone()),
        _ => Err(ModelError::shape(
            &[y.rows(), width],
            y.shape(),
            "目标值须为[样本数]或[样本数, 输出宽度]",
        )),
    }
}
