/*
 * @Author       : 老董
 * @Date         : 2026-02-04
 * @Description  : 参数初始化方式（与Keras默认一致：权重Glorot均匀分布，偏置全零）
 */

use crate::tensor::Tensor;
use rand::Rng;
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
#[serde(rename_all = "snake_case")]
pub enum Init {
    /// U(-limit, limit)，limit = sqrt(6 / (fan_in + fan_out))
    #[default]
    GlorotUniform,
    Zeros,
}

impl Init {
    pub fn generate<R: Rng + ?Sized>(
        &self,
        shape: &[usize],
        fan_in: usize,
        fan_out: usize,
        rng: &mut R,
    ) -> Tensor {
        match self {
            Init::GlorotUniform => {
                let limit = (6.0 / (fan_in + fan_out).max(1) as f32).sqrt();
                Tensor::new_uniform(-limit, limit, shape, rng)
            }
            Init::Zeros => Tensor::zeros(shape),
        }
    }
}
