/*
 * @Author       : 老董
 * @Date         : 2026-02-08
 * @Description  : 分类网络封装：Classifier（未训练）→ fit → FittedClassifier（可score/predict）
 */

use super::builder::{Architecture, CONV_LAYER_NAME, LayerRegistry};
use super::config::{ConvParams, FitConfig, LayerSizes};
use super::trainer::Trainer;
use crate::data::transforms::{check_label_range, class_indices, infer_num_classes, one_hot};
use crate::errors::{FitError, ModelError};
use crate::metrics;
use crate::nn::{CompiledModel, History, Layer, ModelDescriptor};
use crate::tensor::Tensor;
use std::path::Path;

/// 尚未训练的分类网络
///
/// 未训练的网络不提供score与predict：
///
/// ```compile_fail
/// use kkeras::models::{Classifier, LayerSizes};
/// use kkeras::tensor::Tensor;
///
/// let clf = Classifier::mlp(LayerSizes::new(vec![4, 8, 2]).unwrap()).unwrap();
/// let probabilities = clf.predict(&Tensor::zeros(&[1, 4]));
/// ```
///
/// ```
/// use kkeras::models::{Classifier, FitConfig, LayerSizes};
/// use kkeras::tensor::Tensor;
///
/// let clf = Classifier::with_seed(Default::default(), LayerSizes::new(vec![2, 4, 2])?, 0)?;
/// let x = Tensor::new(&[0.0, 0.0, 1.0, 1.0], &[2, 2]);
/// let y = Tensor::new(&[0.0, 1.0], &[2]);
/// let config = FitConfig { max_epochs: 1, ..Default::default() };
/// let fitted = clf.fit(&x, &y, &x, &y, &config)?;
/// assert_eq!(fitted.predict(&x)?.shape(), &[2, 2]);
/// # Ok::<(), kkeras::errors::ModelError>(())
/// ```
#[derive(Debug)]
pub struct Classifier {
    trainer: Trainer,
}

impl Classifier {
    pub fn new(architecture: Architecture, sizes: LayerSizes) -> Result<Self, ModelError> {
        Self::build(architecture, sizes, None)
    }

    /// 固定随机种子（初始化、Dropout与打乱顺序均可复现）
    pub fn with_seed(
        architecture: Architecture,
        sizes: LayerSizes,
        seed: u64,
    ) -> Result<Self, ModelError> {
        Self::build(architecture, sizes, Some(seed))
    }

    /// 多层感知机
    pub fn mlp(sizes: LayerSizes) -> Result<Self, ModelError> {
        Self::new(Architecture::Dense, sizes)
    }

    /// 一维卷积网络
    pub fn cnn(sizes: LayerSizes, params: ConvParams) -> Result<Self, ModelError> {
        Self::new(Architecture::Convolutional(params), sizes)
    }

    /// 卷积层命名为`conv`的一维卷积网络，训练后可读取其权重
    pub fn cnn_named(sizes: LayerSizes, params: ConvParams) -> Result<Self, ModelError> {
        Self::new(Architecture::ConvolutionalNamed(params), sizes)
    }

    fn build(
        architecture: Architecture,
        sizes: LayerSizes,
        seed: Option<u64>,
    ) -> Result<Self, ModelError> {
        if architecture.is_regression() {
            return Err(ModelError::Config(
                "分类网络不能使用回归结构，请改用Regressor".to_string(),
            ));
        }
        Ok(Self {
            trainer: Trainer::new(architecture, sizes, seed)?,
        })
    }

    pub fn architecture(&self) -> &Architecture {
        self.trainer.architecture()
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

    /// 训练网络
    ///
    /// 标签为`[N]`或`[N, 1]`的非负整数类别；类别数取`config.num_classes`，
    /// 未给出时为训练标签最大值加1，且须与网络输出宽度一致。
    /// 失败时`FitError::model`交还未训练的网络。
    pub fn fit(
        mut self,
        train_x: &Tensor,
        train_y: &Tensor,
        val_x: &Tensor,
        val_y: &Tensor,
        config: &FitConfig,
    ) -> Result<FittedClassifier, FitError<Classifier>> {
        match train(&mut self.trainer, train_x, train_y, val_x, val_y, config) {
            Ok((history, num_classes)) => Ok(FittedClassifier {
                trainer: self.trainer,
                history,
                num_classes,
            }),
            Err(error) => Err(FitError { model: self, error }),
        }
    }
}

/// 训练后的分类网络
#[derive(Debug)]
pub struct FittedClassifier {
    trainer: Trainer,
    history: History,
    num_classes: usize,
}

impl FittedClassifier {
    /// 测试集上的准确率
    pub fn score(&self, x: &Tensor, y: &Tensor) -> Result<f32, ModelError> {
        let expected = class_indices(y)?;
        check_label_range(&expected, self.num_classes)?;
        self.trainer.check_features(x, expected.len())?;
        let predicted = self.predict_classes(x)?;
        metrics::accuracy(&predicted, &expected)
    }

    /// 各类别的概率，形状`[N, num_classes]`
    pub fn predict(&self, x: &Tensor) -> Result<Tensor, ModelError> {
        self.trainer.predict(x)
    }

    /// 概率最大的类别
    pub fn predict_classes(&self, x: &Tensor) -> Result<Vec<usize>, ModelError> {
        Ok(self.predict(x)?.argmax_rows()?)
    }

    pub fn history(&self) -> &History {
        &self.history
    }

    pub fn num_classes(&self) -> usize {
        self.num_classes
    }

    pub fn architecture(&self) -> &Architecture {
        self.trainer.architecture()
    }

    pub fn model(&self) -> &CompiledModel {
        self.trainer.model()
    }

    pub fn registry(&self) -> &LayerRegistry {
        self.trainer.registry()
    }

    /// 已登记层的（权重，偏置）
    ///
    /// 对`conv`层，权重形状为`[kernel_len, 1, filters]`，偏置形状为`[filters]`。
    pub fn get_weights(&self, name: &str) -> Result<(Tensor, Tensor), ModelError> {
        let index = self.trainer.registry().get(name)?;
        let layer = self
            .model()
            .layer(index)
            .ok_or_else(|| ModelError::UnknownLayer(name.to_string()))?;
        match layer.parameters().as_slice() {
            [weights, bias] => Ok(((*weights).clone(), (*bias).clone())),
            params => Err(ModelError::Config(format!(
                "层`{name}`有{}个参数，不是（权重，偏置）",
                params.len()
            ))),
        }
    }

    /// 命名卷积层的（卷积核，偏置）
    pub fn conv_weights(&self) -> Result<(Tensor, Tensor), ModelError> {
        self.get_weights(CONV_LAYER_NAME)
    }

    /// 以当前权重为起点继续训练，成功后替换训练历史与类别数
    pub fn refit(
        &mut self,
        train_x: &Tensor,
        train_y: &Tensor,
        val_x: &Tensor,
        val_y: &Tensor,
        config: &FitConfig,
    ) -> Result<&History, ModelError> {
        let (history, num_classes) =
            train(&mut self.trainer, train_x, train_y, val_x, val_y, config)?;
        self.history = history;
        self.num_classes = num_classes;
        Ok(&self.history)
    }

    pub fn save_weights<P: AsRef<Path>>(&self, path: P) -> Result<(), ModelError> {
        self.trainer.save_weights(path.as_ref())
    }

    pub fn load_weights<P: AsRef<Path>>(&mut self, path: P) -> Result<(), ModelError> {
        self.trainer.load_weights(path.as_ref())
    }
}

/// 校验并编码标签后训练，返回训练历史与类别数
fn train(
    trainer: &mut Trainer,
    train_x: &Tensor,
    train_y: &Tensor,
    val_x: &Tensor,
    val_y: &Tensor,
    config: &FitConfig,
) -> Result<(History, usize), ModelError> {
    config.validate()?;
    let train_labels = class_indices(train_y)?;
    let val_labels = class_indices(val_y)?;
    let num_classes = match config.num_classes {
        Some(k) => k,
        None => infer_num_classes(&train_labels)
            .ok_or_else(|| ModelError::Config("训练标签为空".to_string()))?,
    };
    check_label_range(&train_labels, num_classes)?;
    check_label_range(&val_labels, num_classes)?;

    let output_width = trainer.sizes().output_width();
    if num_classes != output_width {
        return Err(ModelError::shape(
            &[output_width],
            &[num_classes],
            "类别数与网络输出宽度不一致",
        ));
    }

    let train_targets = one_hot(&train_labels, num_classes)?;
    let val_targets = one_hot(&val_labels, num_classes)?;
    let history = trainer.train(train_x, &train_targets, val_x, &val_targets, config)?;
    Ok((history, num_classes))
}
