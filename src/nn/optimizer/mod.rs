/*
 * @Author       : 老董
 * @Date         : 2026-02-06
 * @Description  : 优化器模块：RMSprop（分类网络）与 Adam（回归网络），默认超参数与Keras一致
 */

mod adam;
mod base;
mod rmsprop;

pub use adam::Adam;
pub use base::{Optimizer, ParamId};
pub use rmsprop::RmsProp;

use serde::{Deserialize, Serialize};

/// 可序列化的优化器配置，用于`compile`时构造具体优化器
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum OptimizerConfig {
    RmsProp {
        learning_rate: f32,
        rho: f32,
        epsilon: f32,
    },
    Adam {
        learning_rate: f32,
        beta1: f32,
        beta2: f32,
        epsilon: f32,
    },
}

impl OptimizerConfig {
    pub const fn rmsprop() -> Self {
        OptimizerConfig::RmsProp {
            learning_rate: 1e-3,
            rho: 0.9,
            epsilon: 1e-7,
        }
    }

    pub const fn adam() -> Self {
        OptimizerConfig::Adam {
            learning_rate: 1e-3,
            beta1: 0.9,
            beta2: 0.999,
            epsilon: 1e-7,
        }
    }

    /// 仅修改学习率，其余超参数不变
    pub const fn with_learning_rate(self, lr: f32) -> Self {
        match self {
            OptimizerConfig::RmsProp { rho, epsilon, .. } => OptimizerConfig::RmsProp {
                learning_rate: lr,
                rho,
                epsilon,
            },
            OptimizerConfig::Adam {
                beta1,
                beta2,
                epsilon,
                ..
            } => OptimizerConfig::Adam {
                learning_rate: lr,
                beta1,
                beta2,
                epsilon,
            },
        }
    }

    pub fn build(&self) -> Box<dyn Optimizer> {
        match *self {
            OptimizerConfig::RmsProp {
                learning_rate,
                rho,
                epsilon,
            } => Box::new(RmsProp::new(learning_rate, rho, epsilon)),
            OptimizerConfig::Adam {
                learning_rate,
                beta1,
                beta2,
                epsilon,
            } => Box::new(Adam::new(learning_rate, beta1, beta2, epsilon)),
        }
    }
}
