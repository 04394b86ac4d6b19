/*
 * @Author       : 老董
 * @Date         : 2026-02-08
 * @Description  : 预置网络的配置：层尺寸列表、卷积超参数、训练参数
 */

use crate::errors::ModelError;
use crate::nn::ActivationKind;
use serde::{Deserialize, Serialize};
use std::path::Path;

/// 层尺寸列表`[输入宽度, 隐藏层1, ..., 输出宽度]`
///
/// 长度至少为2且每一项为正；首尾之间的每一项对应一个隐藏全连接层。
/// 卷积网络中首项为序列长度。
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(try_from = "Vec<usize>", into = "Vec<usize>")]
pub struct LayerSizes(Vec<usize>);

impl LayerSizes {
    pub fn new(sizes: Vec<usize>) -> Result<Self, ModelError> {
        if sizes.len() < 2 {
            return Err(ModelError::Config(format!(
                "层尺寸列表至少需要输入与输出两项，实际为{sizes:?}"
            )));
        }
        if let Some(i) = sizes.iter().position(|&s| s == 0) {
            return Err(ModelError::Config(format!(
                "层尺寸列表第{i}项为0：{sizes:?}"
            )));
        }
        Ok(Self(sizes))
    }

    pub fn input_width(&self) -> usize {
        self.0[0]
    }

    pub fn output_width(&self) -> usize {
        self.0[self.0.len() - 1]
    }

    /// 隐藏层宽度（不含首尾）
    pub fn hidden(&self) -> &[usize] {
        &self.0[1..self.0.len() - 1]
    }

    pub fn as_slice(&self) -> &[usize] {
        &self.0
    }
}

impl Default for LayerSizes {
    /// `[49, 30, 10, 3]`
    fn default() -> Self {
        Self(vec![49, 30, 10, 3])
    }
}

impl TryFrom<Vec<usize>> for LayerSizes {
    type Error = ModelError;

    fn try_from(sizes: Vec<usize>) -> Result<Self, Self::Error> {
        Self::new(sizes)
    }
}

impl From<LayerSizes> for Vec<usize> {
    fn from(sizes: LayerSizes) -> Self {
        sizes.0
    }
}

/// 一维卷积层超参数
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct ConvParams {
    /// 卷积核个数
    pub filters: usize,
    /// 卷积核长度
    pub kernel_len: usize,
    pub activation: ActivationKind,
}

impl Default for ConvParams {
    fn default() -> Self {
        Self {
            filters: 2,
            kernel_len: 3,
            activation: ActivationKind::Relu,
        }
    }
}

impl ConvParams {
    /// 激活函数以名称给出（`relu`、`tanh`、`sigmoid`、`softmax`、`linear`）
    pub fn new(filters: usize, kernel_len: usize, activation: &str) -> Result<Self, ModelError> {
        let params = Self {
            filters,
            kernel_len,
            activation: activation.parse()?,
        };
        params.validate()?;
        Ok(params)
    }

    pub fn validate(&self) -> Result<(), ModelError> {
        if self.filters == 0 || self.kernel_len == 0 {
            return Err(ModelError::Config(format!(
                "卷积核个数与长度须为正，实际为{}与{}",
                self.filters, self.kernel_len
            )));
        }
        Ok(())
    }
}

/// `fit()`的训练参数
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct FitConfig {
    pub batch_size: usize,
    /// 最大epoch数，早停可能提前结束
    pub max_epochs: usize,
    /// 0：静默；≥1：每个epoch输出info日志
    pub verbosity: u8,
    /// 验证损失连续`patience`个epoch未改善即停止
    pub patience: usize,
    /// 类别数；为None时取训练标签最大值加1（仅分类）
    pub num_classes: Option<usize>,
    pub shuffle: bool,
    /// 结束时恢复验证损失最优epoch的权重
    pub restore_best_weights: bool,
}

impl Default for FitConfig {
    fn default() -> Self {
        Self {
            batch_size: 10,
            max_epochs: 20,
            verbosity: 0,
            patience: 3,
            num_classes: None,
            shuffle: true,
            restore_best_weights: false,
        }
    }
}

impl FitConfig {
    pub fn from_json(json: &str) -> Result<Self, ModelError> {
        let config: Self = serde_json::from_str(json)?;
        config.validate()?;
        Ok(config)
    }

    pub fn from_json_file<P: AsRef<Path>>(path: P) -> Result<Self, ModelError> {
        Self::from_json(&std::fs::read_to_string(path)?)
    }

    pub fn to_json(&self) -> Result<String, ModelError> {
        Ok(serde_json::to_string_pretty(self)?)
    }

    pub fn validate(&self) -> Result<(), ModelError> {
        if self.batch_size == 0 {
            return Err(ModelError::Config("batch_size 必须大于 0".to_string()));
        }
        if self.num_classes == Some(0) {
            return Err(ModelError::Config("num_classes 必须大于 0".to_string()));
        }
        Ok(())
    }
}
