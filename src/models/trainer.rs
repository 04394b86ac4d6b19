/*
 * @Author       : 老董
 * @Date         : 2026-02-08
 * @Description  : 分类与回归共用的训练/推理流程
 *
 * 每次涉及张量的调用前都先经`ShapeAdapter`调整特征形状；
 * 早停固定监控验证损失。
 */

use super::builder::{Architecture, BuiltModel, LayerRegistry};
use super::config::{FitConfig, LayerSizes};
use super::shape::ShapeAdapter;
use crate::errors::ModelError;
use crate::nn::{CompiledModel, EarlyStopping, FitOptions, History, Monitor};
use crate::tensor::Tensor;
use std::path::Path;

/// predict / score 使用的批大小
pub const PREDICT_BATCH_SIZE: usize = 32;

#[derive(Debug)]
pub(crate) struct Trainer {
    architecture: Architecture,
    sizes: LayerSizes,
    adapter: ShapeAdapter,
    model: CompiledModel,
    registry: LayerRegistry,
}

impl Trainer {
    pub(crate) fn new(
        architecture: Architecture,
        sizes: LayerSizes,
        seed: Option<u64>,
    ) -> Result<Self, ModelError> {
        let BuiltModel { model, registry } = architecture.build(&sizes, seed)?;
        Ok(Self {
            adapter: architecture.shape_adapter(),
            architecture,
            sizes,
            model,
            registry,
        })
    }

    pub(crate) fn architecture(&self) -> &Architecture {
        &self.architecture
    }

    pub(crate) fn sizes(&self) -> &LayerSizes {
        &self.sizes
    }

    pub(crate) fn model(&self) -> &CompiledModel {
        &self.model
    }

    pub(crate) fn registry(&self) -> &LayerRegistry {
        &self.registry
    }

    /// 校验特征形状与行数；目标值需已编码为网络输出的形状
    pub(crate) fn check_features(&self, x: &Tensor, y_rows: usize) -> Result<Tensor, ModelError> {
        let x = self.adapter.adapt(x, self.sizes.input_width())?;
        if x.rows() != y_rows {
            return Err(ModelError::shape(
                &[y_rows],
                &[x.rows()],
                "特征与标签的样本数不一致",
            ));
        }
        Ok(x)
    }

    /// 训练，`train_y`/`val_y`已编码为网络输出的形状
    pub(crate) fn train(
        &mut self,
        train_x: &Tensor,
        train_y: &Tensor,
        val_x: &Tensor,
        val_y: &Tensor,
        config: &FitConfig,
    ) -> Result<History, ModelError> {
        config.validate()?;
        let train_x = self.check_features(train_x, train_y.rows())?;
        let val_x = self.check_features(val_x, val_y.rows())?;

        let options = FitOptions {
            batch_size: config.batch_size,
            epochs: config.max_epochs,
            shuffle: config.shuffle,
            verbosity: config.verbosity,
        };
        let mut early_stopping = EarlyStopping::new(Monitor::ValLoss, config.patience)
            .restore_best_weights(config.restore_best_weights);
        let history = self.model.fit(
            &train_x,
            train_y,
            Some((&val_x, val_y)),
            &options,
            Some(&mut early_stopping),
        )?;

        log::debug!(
            "训练结束：共{}个epoch，最优val_loss={:?}（第{:?}个epoch）",
            history.epochs(),
            early_stopping.best(),
            early_stopping.best_epoch()
        );
        Ok(history)
    }

    /// 网络原始输出
    pub(crate) fn predict(&self, x: &Tensor) -> Result<Tensor, ModelError> {
        let x = self.adapter.adapt(x, self.sizes.input_width())?;
        self.model.predict(&x, PREDICT_BATCH_SIZE)
    }

    pub(crate) fn save_weights(&self, path: &Path) -> Result<(), ModelError> {
        self.model.save_weights(path)
    }

    pub(crate) fn load_weights(&mut self, path: &Path) -> Result<(), ModelError> {
        self.model.load_weights(path)
    }
}
