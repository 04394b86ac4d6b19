/*
 * @Author       : 老董
 * @Date         : 2026-02-04
 * @Description  : Layer 模块 - Keras Sequential 风格的层
 *
 * 每个层自行实现前向与反向传播（不依赖通用自动求导图）：
 * - `forward()`：推理模式，不缓存中间结果，Dropout 为恒等映射
 * - `forward_train()`：训练模式，缓存反向传播所需的中间结果
 * - `backward()`：由输出梯度计算参数梯度并返回输入梯度
 *
 * 张量的首维总是样本维，`input_shape()`/`output_shape()` 均不含样本维。
 */

mod activation;
mod conv1d;
mod dense;
mod dropout;
mod flatten;

pub use activation::{Activation, ActivationKind};
pub use conv1d::{Conv1d, Padding};
pub use dense::Dense;
pub use dropout::Dropout;
pub use flatten::Flatten;

use crate::errors::{ModelError, TensorError};
use crate::tensor::Tensor;
use enum_dispatch::enum_dispatch;
use serde::{Deserialize, Serialize};

/// 层的配置，既用于 `Sequential::add` 构建层，也用于模型描述符
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type")]
pub enum LayerConfig {
    Dense {
        units: usize,
    },
    Activation {
        activation: ActivationKind,
    },
    Dropout {
        rate: f32,
    },
    Conv1d {
        filters: usize,
        kernel_len: usize,
        padding: Padding,
        activation: ActivationKind,
    },
    Flatten,
}

impl LayerConfig {
    /// 自动命名所用的前缀（同Keras：`dense`、`dense_1`、`dense_2`...）
    pub fn base_name(&self) -> &'static str {
        match self {
            LayerConfig::Dense { .. } => "dense",
            LayerConfig::Activation { .. } => "activation",
            LayerConfig::Dropout { .. } => "dropout",
            LayerConfig::Conv1d { .. } => "conv1d",
            LayerConfig::Flatten => "flatten",
        }
    }
}

#[enum_dispatch]
#[derive(Debug, Clone)]
pub enum LayerEnum {
    Dense(Dense),
    Activation(Activation),
    Dropout(Dropout),
    Conv1d(Conv1d),
    Flatten(Flatten),
}

#[enum_dispatch(LayerEnum)]
pub trait Layer {
    fn name(&self) -> &str;

    fn config(&self) -> LayerConfig;

    /// 单个样本的输入形状（不含样本维）
    fn input_shape(&self) -> &[usize];

    /// 单个样本的输出形状（不含样本维）
    fn output_shape(&self) -> &[usize];

    /// 推理模式下的前向传播
    fn forward(&self, input: &Tensor) -> Result<Tensor, ModelError>;

    /// 训练模式下的前向传播，会缓存`backward()`所需的中间结果
    fn forward_train(&mut self, input: &Tensor) -> Result<Tensor, ModelError>;

    /// 依据上游梯度计算（并保存）本层参数的梯度，返回对输入的梯度
    fn backward(&mut self, grad_output: &Tensor) -> Result<Tensor, ModelError>;

    /// 可训练参数，无参数的层返回空
    fn parameters(&self) -> Vec<&Tensor> {
        Vec::new()
    }

    /// 可训练参数及其最近一次`backward()`得到的梯度
    fn parameters_and_grads(&mut self) -> Vec<(&mut Tensor, &Tensor)> {
        Vec::new()
    }

    /// 整体替换参数，形状须与现有参数逐一一致
    fn set_parameters(&mut self, params: Vec<Tensor>) -> Result<(), ModelError> {
        if params.is_empty() {
            Ok(())
        } else {
            Err(ModelError::Config(format!(
                "层`{}`没有可训练参数，却收到了{}个参数",
                self.name(),
                params.len()
            )))
        }
    }

    fn param_count(&self) -> usize {
        self.parameters().iter().map(|p| p.size()).sum()
    }
}

/// 检查输入是否为`[N, *expected]`
pub(crate) fn check_input_shape(
    layer_name: &str,
    expected: &[usize],
    input: &Tensor,
) -> Result<(), ModelError> {
    let got = input.shape();
    if got.len() != expected.len() + 1 || &got[1..] != expected {
        let mut full_expected = vec![got.first().copied().unwrap_or(0)];
        full_expected.extend_from_slice(expected);
        return Err(ModelError::shape(
            &full_expected,
            got,
            format!("层`{layer_name}`的输入形状不符"),
        ));
    }
    Ok(())
}

/// 检查新参数的个数与形状是否与层的现有参数一致
pub(crate) fn check_parameters(
    layer_name: &str,
    current: &[&Tensor],
    params: &[Tensor],
) -> Result<(), ModelError> {
    if current.len() != params.len() {
        return Err(ModelError::Config(format!(
            "层`{layer_name}`需要{}个参数，实际收到{}个",
            current.len(),
            params.len()
        )));
    }
    if let Some((target, param)) = current
        .iter()
        .zip(params.iter())
        .find(|(t, p)| !t.is_same_shape(p))
    {
        return Err(ModelError::shape(
            target.shape(),
            param.shape(),
            format!("层`{layer_name}`的参数形状不符"),
        ));
    }
    Ok(())
}

/// 整体替换参数，形状不符时不做任何修改
pub(crate) fn replace_parameters(
    layer_name: &str,
    targets: Vec<&mut Tensor>,
    params: Vec<Tensor>,
) -> Result<(), ModelError> {
    let current: Vec<&Tensor> = targets.iter().map(|t| &**t).collect();
    check_parameters(layer_name, &current, &params)?;
    for (target, param) in targets.into_iter().zip(params) {
        *target = param;
    }
    Ok(())
}

/// 反向传播前须先以训练模式前向传播
pub(crate) fn missing_cache(layer_name: &str) -> ModelError {
    ModelError::Config(format!(
        "层`{layer_name}`在backward()之前未调用forward_train()"
    ))
}

pub(crate) fn to_dim_error(expected: usize, got: usize) -> TensorError {
    TensorError::DimensionMismatch { expected, got }
}

#[cfg(test)]
mod tests;
