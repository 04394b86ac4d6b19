/*
 * @Author       : 老董
 * @Date         : 2026-02-08
 * @Description  : 预置网络的构建策略
 *
 * 分类（层尺寸 l = [输入, 隐藏..., 输出]）：
 * - Dense：                input(l0) → [Dense(h) → ReLU → Dropout(0.2)]* → Dense(out) → Softmax
 * - Convolutional：        input(l0, 1) → Conv1d(same) → Flatten → 同上的全连接部分
 * - ConvolutionalNamed：   同Convolutional，卷积层命名为`conv`，并登记所有层名
 * 回归：
 * - DenseRegression：      input(l0) → [Dense(h) → ReLU]* → Dense(out)
 *
 * 分类网络：交叉熵 + RMSprop + accuracy；回归网络：MSE + Adam
 */

use super::config::{ConvParams, LayerSizes};
use super::shape::ShapeAdapter;
use crate::errors::ModelError;
use crate::nn::{
    ActivationKind, CompiledModel, Layer, LayerConfig, Loss, Metric, OptimizerConfig, Padding,
    Sequential,
};
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

/// 命名卷积网络中卷积层的名称
pub const CONV_LAYER_NAME: &str = "conv";

/// 分类网络隐藏层后的Dropout比例
const HIDDEN_DROPOUT: f32 = 0.2;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum Architecture {
    #[default]
    Dense,
    Convolutional(ConvParams),
    ConvolutionalNamed(ConvParams),
    DenseRegression,
}

/// 构建结果：编译好的模型与层注册表
#[derive(Debug)]
pub struct BuiltModel {
    pub model: CompiledModel,
    pub registry: LayerRegistry,
}

impl Architecture {
    pub fn is_regression(&self) -> bool {
        matches!(self, Architecture::DenseRegression)
    }

    pub fn conv_params(&self) -> Option<&ConvParams> {
        match self {
            Architecture::Convolutional(p) | Architecture::ConvolutionalNamed(p) => Some(p),
            Architecture::Dense | Architecture::DenseRegression => None,
        }
    }

    pub fn shape_adapter(&self) -> ShapeAdapter {
        match self {
            Architecture::Dense | Architecture::DenseRegression => ShapeAdapter::Identity,
            Architecture::Convolutional(_) | Architecture::ConvolutionalNamed(_) => {
                ShapeAdapter::Sequence
            }
        }
    }

    /// 构建并编译网络；`seed`为None时随机初始化
    pub fn build(&self, sizes: &LayerSizes, seed: Option<u64>) -> Result<BuiltModel, ModelError> {
        let input_shape = match self.shape_adapter() {
            ShapeAdapter::Identity => vec![sizes.input_width()],
            ShapeAdapter::Sequence => vec![sizes.input_width(), 1],
        };
        let mut seq = match seed {
            Some(seed) => Sequential::with_seed(&input_shape, seed),
            None => Sequential::new(&input_shape),
        };

        if let Some(params) = self.conv_params() {
            params.validate()?;
            log::info!(
                "卷积层参数: filters={}, kernel_len={}, activation={}",
                params.filters,
                params.kernel_len,
                params.activation
            );
            let conv = LayerConfig::Conv1d {
                filters: params.filters,
                kernel_len: params.kernel_len,
                padding: Padding::Same,
                activation: params.activation,
            };
            match self {
                Architecture::ConvolutionalNamed(_) => seq.add_named(conv, CONV_LAYER_NAME)?,
                _ => seq.add(conv)?,
            };
            seq.flatten()?;
        }

        for &units in sizes.hidden() {
            seq.dense(units)?.activation(ActivationKind::Relu)?;
            if !self.is_regression() {
                seq.dropout(HIDDEN_DROPOUT)?;
            }
        }
        seq.dense(sizes.output_width())?;

        let model = if self.is_regression() {
            seq.compile(Loss::MeanSquaredError, OptimizerConfig::adam(), vec![])?
        } else {
            seq.activation(ActivationKind::Softmax)?;
            seq.compile(
                Loss::CategoricalCrossEntropy,
                OptimizerConfig::rmsprop(),
                vec![Metric::Accuracy],
            )?
        };

        let registry = match self {
            Architecture::ConvolutionalNamed(_) => LayerRegistry::from_model(&model),
            _ => LayerRegistry::default(),
        };
        Ok(BuiltModel { model, registry })
    }
}

/// 层名 → 层在模型中的索引，构建后不再改变
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct LayerRegistry {
    layers: BTreeMap<String, usize>,
}

impl LayerRegistry {
    pub fn from_model(model: &CompiledModel) -> Self {
        Self {
            layers: model
                .layers()
                .iter()
                .enumerate()
                .map(|(i, l)| (l.name().to_string(), i))
                .collect(),
        }
    }

    pub fn get(&self, name: &str) -> Result<usize, ModelError> {
        self.layers
            .get(name)
            .copied()
            .ok_or_else(|| ModelError::UnknownLayer(name.to_string()))
    }

    pub fn contains(&self, name: &str) -> bool {
        self.layers.contains_key(name)
    }

    pub fn names(&self) -> impl Iterator<Item = &str> {
        self.layers.keys().map(String::as_str)
    }

    pub fn len(&self) -> usize {
        self.layers.len()
    }

    pub fn is_empty(&self) -> bool {
        self.layers.is_empty()
    }
}
