/*
 * @Author       : 老董
 * @Date         : 2026-02-08
 * @Description  : 评估指标：分类准确率与回归四项汇总（MAE、RMSE、R²、Pearson相关系数）
 */

use crate::errors::ModelError;
use crate::tensor::Tensor;
use serde::{Deserialize, Serialize};
use std::fmt;

/// 预测类别与真实类别一致的比例，空输入返回0
pub fn accuracy(predicted: &[usize], expected: &[usize]) -> Result<f32, ModelError> {
    if predicted.len() != expected.len() {
        return Err(ModelError::shape(
            &[expected.len()],
            &[predicted.len()],
            "预测类别与真实类别的数量不一致",
        ));
    }
    if predicted.is_empty() {
        return Ok(0.0);
    }
    let correct = predicted.iter().zip(expected).filter(|(p, e)| p == e).count();
    Ok(correct as f32 / predicted.len() as f32)
}

/// 回归评估的四项汇总，所有指标对全部输出元素计算
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct RegressionReport {
    /// 平均绝对误差
    pub mae: f32,
    /// 均方根误差
    pub rmse: f32,
    /// 决定系数 1 - SS_res / SS_tot；目标方差为0时，完全拟合记1，否则记0
    pub r2: f32,
    /// 预测与目标的Pearson相关系数；任一方差为0时记0
    pub pearson: f32,
}

impl RegressionReport {
    pub fn from_predictions(prediction: &Tensor, target: &Tensor) -> Result<Self, ModelError> {
        if !prediction.is_same_shape(target) {
            return Err(ModelError::shape(
                target.shape(),
                prediction.shape(),
                "回归预测与目标值形状不一致",
            ));
        }
        let n = prediction.size();
        if n == 0 {
            return Err(ModelError::Config("回归评估的数据为空".to_string()));
        }

        // f64累加，减小大样本下的舍入误差
        let p: Vec<f64> = prediction.as_array().iter().map(|&v| f64::from(v)).collect();
        let y: Vec<f64> = target.as_array().iter().map(|&v| f64::from(v)).collect();
        let len = n as f64;
        let mean_p = p.iter().sum::<f64>() / len;
        let mean_y = y.iter().sum::<f64>() / len;

        let (mut abs_sum, mut ss_res, mut ss_tot) = (0.0, 0.0, 0.0);
        let (mut cov, mut var_p) = (0.0, 0.0);
        for (&pi, &yi) in p.iter().zip(&y) {
            let err = pi - yi;
            abs_sum += err.abs();
            ss_res += err * err;
            ss_tot += (yi - mean_y) * (yi - mean_y);
            cov += (pi - mean_p) * (yi - mean_y);
            var_p += (pi - mean_p) * (pi - mean_p);
        }

        let r2 = if ss_tot > 0.0 {
            1.0 - ss_res / ss_tot
        } else if ss_res == 0.0 {
            1.0
        } else {
            0.0
        };
        let pearson = if var_p > 0.0 && ss_tot > 0.0 {
            cov / (var_p.sqrt() * ss_tot.sqrt())
        } else {
            0.0
        };
        Ok(Self {
            mae: (abs_sum / len) as f32,
            rmse: (ss_res / len).sqrt() as f32,
            r2: r2 as f32,
            pearson: pearson as f32,
        })
    }
}

impl fmt::Display for RegressionReport {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "MAE: {:.4}, RMSE: {:.4}, R²: {:.4}, Pearson: {:.4}",
            self.mae, self.rmse, self.r2, self.pearson
        )
    }
}

#[cfg(test)]
mod tests;
