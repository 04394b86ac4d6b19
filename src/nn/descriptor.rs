/*
 * @Author       : 老董
 * @Date         : 2026-02-07
 * @Description  : 模型描述符（Model Descriptor）
 *                 编译后模型结构的可序列化表示，用于摘要输出、JSON 导出与调试
 */

use super::criterion::{Loss, Metric};
use super::layer::LayerConfig;
use super::optimizer::OptimizerConfig;
use crate::errors::ModelError;
use serde::{Deserialize, Serialize};
use std::fmt;

/// 模型的可序列化描述
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ModelDescriptor {
    /// 格式版本（用于向后兼容）
    pub version: String,
    /// 单个样本的输入形状
    pub input_shape: Vec<usize>,
    /// 按前向顺序排列的层
    pub layers: Vec<LayerDescriptor>,
    pub loss: Loss,
    pub optimizer: OptimizerConfig,
    #[serde(default)]
    pub metrics: Vec<Metric>,
}

/// 层描述
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct LayerDescriptor {
    pub name: String,
    pub config: LayerConfig,
    /// 单个样本的输出形状
    pub output_shape: Vec<usize>,
    pub param_count: usize,
}

impl ModelDescriptor {
    pub const VERSION: &'static str = "1.0";

    pub fn total_params(&self) -> usize {
        self.layers.iter().map(|l| l.param_count).sum()
    }

    pub fn to_json(&self) -> Result<String, ModelError> {
        Ok(serde_json::to_string_pretty(self)?)
    }

    pub fn from_json(json: &str) -> Result<Self, ModelError> {
        Ok(serde_json::from_str(json)?)
    }
}

/// 类似Keras `model.summary()` 的表格输出
impl fmt::Display for ModelDescriptor {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let rule = "─".repeat(64);
        writeln!(f, "{rule}")?;
        writeln!(f, "{:<24}{:<16}{:<16}{:>8}", "Layer", "Type", "Output", "Param #")?;
        writeln!(f, "{rule}")?;
        writeln!(
            f,
            "{:<24}{:<16}{:<16}{:>8}",
            "input",
            "Input",
            shape_str(&self.input_shape),
            0
        )?;
        for layer in &self.layers {
            writeln!(
                f,
                "{:<24}{:<16}{:<16}{:>8}",
                layer.name,
                layer.config.base_name(),
                shape_str(&layer.output_shape),
                layer.param_count
            )?;
        }
        writeln!(f, "{rule}")?;
        writeln!(f, "Total params: {}", self.total_params())?;
        write!(f, "Loss: {}", self.loss.name())
    }
}

fn shape_str(shape: &[usize]) -> String {
    let dims: Vec<String> = shape.iter().map(usize::to_string).collect();
    format!("(None, {})", dims.join(", "))
}
