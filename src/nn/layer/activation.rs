/*
 * @Author       : 老董
 * @Date         : 2026-02-04
 * @Description  : 激活函数及激活层
 *
 * 反向传播均由前向的输出值计算：
 * - relu:    g * (y > 0)
 * - tanh:    g * (1 - y²)
 * - sigmoid: g * y * (1 - y)
 * - softmax: y * (g - Σ g·y)，沿最后一维
 */

use super::{Layer, LayerConfig, check_input_shape, missing_cache};
use crate::errors::ModelError;
use crate::tensor::Tensor;
use ndarray::{ArrayD, Axis, Zip};
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ActivationKind {
    #[default]
    Relu,
    Tanh,
    Sigmoid,
    Softmax,
    Linear,
}

impl ActivationKind {
    pub fn as_str(&self) -> &'static str {
        match self {
            ActivationKind::Relu => "relu",
            ActivationKind::Tanh => "tanh",
            ActivationKind::Sigmoid => "sigmoid",
            ActivationKind::Softmax => "softmax",
            ActivationKind::Linear => "linear",
        }
    }

    /// 原地作用于`z`；softmax沿最后一维归一化
    pub(crate) fn apply(&self, z: &mut ArrayD<f32>) {
        match self {
            ActivationKind::Relu => z.mapv_inplace(|v| v.max(0.0)),
            ActivationKind::Tanh => z.mapv_inplace(f32::tanh),
            ActivationKind::Sigmoid => z.mapv_inplace(|v| 1.0 / (1.0 + (-v).exp())),
            ActivationKind::Linear => {}
            ActivationKind::Softmax => {
                if z.ndim() == 0 {
                    z.fill(1.0);
                    return;
                }
                let axis = Axis(z.ndim() - 1);
                for mut lane in z.lanes_mut(axis) {
                    let max = lane.fold(f32::NEG_INFINITY, |m, &v| m.max(v));
                    lane.mapv_inplace(|v| (v - max).exp());
                    let sum = lane.sum();
                    lane.mapv_inplace(|v| v / sum);
                }
            }
        }
    }

    /// 由激活输出`output`与上游梯度`grad`求对激活输入的梯度
    pub(crate) fn backprop(&self, output: &ArrayD<f32>, grad: &ArrayD<f32>) -> ArrayD<f32> {
        let mut dz = grad.clone();
        match self {
            ActivationKind::Linear => {}
            ActivationKind::Relu => Zip::from(&mut dz)
                .and(output)
                .for_each(|d, &y| *d = if y > 0.0 { *d } else { 0.0 }),
            ActivationKind::Tanh => Zip::from(&mut dz)
                .and(output)
                .for_each(|d, &y| *d *= 1.0 - y * y),
            ActivationKind::Sigmoid => Zip::from(&mut dz)
                .and(output)
                .for_each(|d, &y| *d *= y * (1.0 - y)),
            ActivationKind::Softmax => {
                if output.ndim() == 0 {
                    dz.fill(0.0);
                    return dz;
                }
                let axis = Axis(output.ndim() - 1);
                Zip::from(dz.lanes_mut(axis))
                    .and(output.lanes(axis))
                    .for_each(|mut d, y| {
                        let dot = d.dot(&y);
                        Zip::from(&mut d).and(&y).for_each(|dv, &yv| *dv = yv * (*dv - dot));
                    });
            }
        }
        dz
    }
}

impl fmt::Display for ActivationKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

impl FromStr for ActivationKind {
    type Err = ModelError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_ascii_lowercase().as_str() {
            "relu" => Ok(ActivationKind::Relu),
            "tanh" => Ok(ActivationKind::Tanh),
            "sigmoid" => Ok(ActivationKind::Sigmoid),
            "softmax" => Ok(ActivationKind::Softmax),
            "linear" => Ok(ActivationKind::Linear),
            other => Err(ModelError::Config(format!("未知的激活函数: `{other}`"))),
        }
    }
}

/// 激活层，输入输出形状相同
#[derive(Debug, Clone)]
pub struct Activation {
    name: String,
    kind: ActivationKind,
    shape: Vec<usize>,
    cache_output: Option<ArrayD<f32>>,
}

impl Activation {
    pub fn new(name: &str, kind: ActivationKind, shape: &[usize]) -> Self {
        Self {
            name: name.to_string(),
            kind,
            shape: shape.to_vec(),
            cache_output: None,
        }
    }

    pub fn kind(&self) -> ActivationKind {
        self.kind
    }
}

impl Layer for Activation {
    fn name(&self) -> &str {
        &self.name
    }

    fn config(&self) -> LayerConfig {
        LayerConfig::Activation {
            activation: self.kind,
        }
    }

    fn input_shape(&self) -> &[usize] {
        &self.shape
    }

    fn output_shape(&self) -> &[usize] {
        &self.shape
    }

    fn forward(&self, input: &Tensor) -> Result<Tensor, ModelError> {
        check_input_shape(&self.name, &self.shape, input)?;
        let mut output = input.as_array().clone();
        self.kind.apply(&mut output);
        Ok(Tensor::from(output))
    }

    fn forward_train(&mut self, input: &Tensor) -> Result<Tensor, ModelError> {
        let output = self.forward(input)?;
        self.cache_output = Some(output.as_array().clone());
        Ok(output)
    }

    fn backward(&mut self, grad_output: &Tensor) -> Result<Tensor, ModelError> {
        let output = self
            .cache_output
            .as_ref()
            .ok_or_else(|| missing_cache(&self.name))?;
        if output.shape() != grad_output.shape() {
            return Err(ModelError::shape(
                output.shape(),
                grad_output.shape(),
                format!("层`{}`的输出梯度形状不符", self.name),
            ));
        }
        Ok(Tensor::from(
            self.kind.backprop(output, grad_output.as_array()),
        ))
    }
}
