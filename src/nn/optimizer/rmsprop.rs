/*
 * @Author       : 老董
 * @Date         : 2026-02-06
 * @Description  : RMSprop优化器实现
 */

use super::base::{Optimizer, ParamId};
use crate::tensor::Tensor;
use ndarray::Zip;
use std::collections::HashMap;

/// RMSprop优化器
///
/// v = ρ·v + (1-ρ)·g²，θ = θ - α·g / (√v + ε)
pub struct RmsProp {
    learning_rate: f32,
    rho: f32,
    epsilon: f32,
    /// 梯度平方的滑动平均
    v: HashMap<ParamId, Tensor>,
}

impl RmsProp {
    pub fn new(learning_rate: f32, rho: f32, epsilon: f32) -> Self {
        Self {
            learning_rate,
            rho,
            epsilon,
            v: HashMap::new(),
        }
    }
}

impl Default for RmsProp {
    fn default() -> Self {
        Self::new(1e-3, 0.9, 1e-7)
    }
}

impl Optimizer for RmsProp {
    fn step(&mut self, params: Vec<(ParamId, &mut Tensor, &Tensor)>) {
        let (lr, rho, eps) = (self.learning_rate, self.rho, self.epsilon);
        for (id, value, grad) in params {
            let v = self
                .v
                .entry(id)
                .or_insert_with(|| Tensor::zeros(grad.shape()));
            Zip::from(value.as_array_mut())
                .and(v.as_array_mut())
                .and(grad.as_array())
                .for_each(|theta, v, &g| {
                    *v = rho * *v + (1.0 - rho) * g * g;
                    *theta -= lr * g / (v.sqrt() + eps);
                });
        }
    }

    fn name(&self) -> &'static str {
        "rmsprop"
    }

    fn learning_rate(&self) -> f32 {
        self.learning_rate
    }
}
