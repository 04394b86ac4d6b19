/*
 * @Author       : 老董
 * @Date         : 2026-02-06
 * @Description  : Adam优化器实现
 */

use super::base::{Optimizer, ParamId};
use crate::tensor::Tensor;
use ndarray::Zip;
use std::collections::HashMap;

/// Adam优化器
pub struct Adam {
    learning_rate: f32,
    beta1: f32,
    beta2: f32,
    epsilon: f32,
    /// 一阶矩估计
    m: HashMap<ParamId, Tensor>,
    /// 二阶矩估计
    v: HashMap<ParamId, Tensor>,
    /// 时间步
    t: usize,
}

impl Adam {
    pub fn new(learning_rate: f32, beta1: f32, beta2: f32, epsilon: f32) -> Self {
        Self {
            learning_rate,
            beta1,
            beta2,
            epsilon,
            m: HashMap::new(),
            v: HashMap::new(),
            t: 0,
        }
    }
}

impl Default for Adam {
    fn default() -> Self {
        Self::new(1e-3, 0.9, 0.999, 1e-7)
    }
}

impl Optimizer for Adam {
    fn step(&mut self, params: Vec<(ParamId, &mut Tensor, &Tensor)>) {
        self.t += 1;
        let (lr, beta1, beta2, eps) = (self.learning_rate, self.beta1, self.beta2, self.epsilon);
        // 偏差修正系数
        let correction1 = 1.0 - beta1.powi(self.t as i32);
        let correction2 = 1.0 - beta2.powi(self.t as i32);

        for (id, value, grad) in params {
            let m = self
                .m
                .entry(id)
                .or_insert_with(|| Tensor::zeros(grad.shape()));
            let v = self
                .v
                .entry(id)
                .or_insert_with(|| Tensor::zeros(grad.shape()));
            // m = β1·m + (1-β1)·g，v = β2·v + (1-β2)·g²，θ = θ - α·m̂ / (√v̂ + ε)
            Zip::from(value.as_array_mut())
                .and(m.as_array_mut())
                .and(v.as_array_mut())
                .and(grad.as_array())
                .for_each(|theta, m, v, &g| {
                    *m = beta1 * *m + (1.0 - beta1) * g;
                    *v = beta2 * *v + (1.0 - beta2) * g * g;
                    let m_hat = *m / correction1;
                    let v_hat = *v / correction2;
                    *theta -= lr * m_hat / (v_hat.sqrt() + eps);
                });
        }
    }

    fn name(&self) -> &'static str {
        "adam"
    }

    fn learning_rate(&self) -> f32 {
        self.learning_rate
    }
}
