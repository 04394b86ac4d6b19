/*
 * @Author       : 老董
 * @Date         : 2026-02-05
 * @Description  : 损失函数与评估指标（Keras `compile(loss, metrics)` 风格）
 *
 * - 分类交叉熵：作用于 softmax 输出的概率，target 为 one-hot 编码
 * - 均方误差：对所有元素取均值
 */

use crate::errors::ModelError;
use crate::tensor::Tensor;
use ndarray::Zip;
use serde::{Deserialize, Serialize};

/// 概率裁剪下限，避免 log(0)
const EPSILON: f32 = 1e-7;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Loss {
    CategoricalCrossEntropy,
    MeanSquaredError,
}

impl Loss {
    pub fn name(&self) -> &'static str {
        match self {
            Loss::CategoricalCrossEntropy => "categorical_crossentropy",
            Loss::MeanSquaredError => "mean_squared_error",
        }
    }

    /// 计算一批预测的平均损失
    pub fn compute(&self, prediction: &Tensor, target: &Tensor) -> Result<f32, ModelError> {
        check_same_shape(prediction, target)?;
        let (p, y) = (prediction.as_array(), target.as_array());
        match self {
            Loss::CategoricalCrossEntropy => {
                let n = prediction.rows().max(1) as f32;
                let mut total = 0.0;
                Zip::from(p).and(y).for_each(|&p, &y| {
                    total -= y * p.clamp(EPSILON, 1.0 - EPSILON).ln();
                });
                Ok(total / n)
            }
            Loss::MeanSquaredError => {
                let len = prediction.size().max(1) as f32;
                let mut total = 0.0;
                Zip::from(p).and(y).for_each(|&p, &y| total += (p - y) * (p - y));
                Ok(total / len)
            }
        }
    }

    /// 平均损失对预测值的梯度
    pub fn gradient(&self, prediction: &Tensor, target: &Tensor) -> Result<Tensor, ModelError> {
        check_same_shape(prediction, target)?;
        let (p, y) = (prediction.as_array(), target.as_array());
        let grad = match self {
            Loss::CategoricalCrossEntropy => {
                let n = prediction.rows().max(1) as f32;
                Zip::from(p)
                    .and(y)
                    .map_collect(|&p, &y| -y / p.clamp(EPSILON, 1.0 - EPSILON) / n)
            }
            Loss::MeanSquaredError => {
                let len = prediction.size().max(1) as f32;
                Zip::from(p).and(y).map_collect(|&p, &y| 2.0 * (p - y) / len)
            }
        };
        Ok(Tensor::from(grad))
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Metric {
    /// 预测概率的argmax与one-hot标签的argmax一致的比例
    Accuracy,
}

impl Metric {
    pub fn name(&self) -> &'static str {
        match self {
            Metric::Accuracy => "accuracy",
        }
    }

    pub fn compute(&self, prediction: &Tensor, target: &Tensor) -> Result<f32, ModelError> {
        check_same_shape(prediction, target)?;
        match self {
            Metric::Accuracy => {
                let predicted = prediction.argmax_rows()?;
                let expected = target.argmax_rows()?;
                if predicted.is_empty() {
                    return Ok(0.0);
                }
                let correct = predicted
                    .iter()
                    .zip(&expected)
                    .filter(|(p, e)| p == e)
                    .count();
                Ok(correct as f32 / predicted.len() as f32)
            }
        }
    }
}

fn check_same_shape(prediction: &Tensor, target: &Tensor) -> Result<(), ModelError> {
    if prediction.is_same_shape(target) {
        Ok(())
    } else {
        Err(ModelError::shape(
            prediction.shape(),
            target.shape(),
            "目标值与预测值形状不一致",
        ))
    }
}
