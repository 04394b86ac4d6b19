/*
 * @Author       : 老董
 * @Date         : 2026-02-04
 * @Description  : Dropout 层（inverted dropout）
 *
 * 训练时以概率`rate`将激活置零，并将保留的激活放大`1/(1-rate)`；
 * 推理时为恒等映射。
 */

use super::{Layer, LayerConfig, check_input_shape};
use crate::errors::ModelError;
use crate::tensor::Tensor;
use ndarray::ArrayD;
use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};

#[derive(Debug, Clone)]
pub struct Dropout {
    name: String,
    rate: f32,
    shape: Vec<usize>,
    rng: StdRng,
    /// 最近一次训练前向所用的缩放掩码
    mask: Option<ArrayD<f32>>,
}

impl Dropout {
    /// `rate`须在[0, 1)内
    pub fn new(name: &str, rate: f32, shape: &[usize], seed: u64) -> Result<Self, ModelError> {
        if !(0.0..1.0).contains(&rate) {
            return Err(ModelError::Config(format!(
                "Dropout比例须在[0, 1)内，实际为{rate}"
            )));
        }
        Ok(Self {
            name: name.to_string(),
            rate,
            shape: shape.to_vec(),
            rng: StdRng::seed_from_u64(seed),
            mask: None,
        })
    }

    pub fn rate(&self) -> f32 {
        self.rate
    }
}

impl Layer for Dropout {
    fn name(&self) -> &str {
        &self.name
    }

    fn config(&self) -> LayerConfig {
        LayerConfig::Dropout { rate: self.rate }
    }

    fn input_shape(&self) -> &[usize] {
        &self.shape
    }

    fn output_shape(&self) -> &[usize] {
        &self.shape
    }

    fn forward(&self, input: &Tensor) -> Result<Tensor, ModelError> {
        check_input_shape(&self.name, &self.shape, input)?;
        Ok(input.clone())
    }

    fn forward_train(&mut self, input: &Tensor) -> Result<Tensor, ModelError> {
        check_input_shape(&self.name, &self.shape, input)?;
        let keep = 1.0 - self.rate;
        let scale = 1.0 / keep;
        let rng = &mut self.rng;
        let mask = ArrayD::from_shape_simple_fn(input.shape(), || {
            if rng.gen_bool(f64::from(keep)) { scale } else { 0.0 }
        });
        let output = input.as_array() * &mask;
        self.mask = Some(mask);
        Ok(Tensor::from(output))
    }

    fn backward(&mut self, grad_output: &Tensor) -> Result<Tensor, ModelError> {
        check_input_shape(&self.name, &self.shape, grad_output)?;
        match &self.mask {
            Some(mask) if mask.shape() == grad_output.shape() => {
                Ok(Tensor::from(grad_output.as_array() * mask))
            }
            Some(mask) => Err(ModelError::shape(
                mask.shape(),
                grad_output.shape(),
                format!("层`{}`的输出梯度形状不符", self.name),
            )),
            None => Err(super::missing_cache(&self.name)),
        }
    }
}
