/*
 * @Author       : 老董
 * @Date         : 2026-02-05
 * @Description  : Flatten 层 - 保留样本维，展平其余维度
 *                 常用于卷积层与全连接层之间：[N, L, C] → [N, L*C]
 */

use super::{Layer, LayerConfig, check_input_shape};
use crate::errors::ModelError;
use crate::tensor::Tensor;

#[derive(Debug, Clone)]
pub struct Flatten {
    name: String,
    input_shape: Vec<usize>,
    output_shape: Vec<usize>,
}

impl Flatten {
    pub fn new(name: &str, input_shape: &[usize]) -> Self {
        Self {
            name: name.to_string(),
            input_shape: input_shape.to_vec(),
            output_shape: vec![input_shape.iter().product()],
        }
    }
}

impl Layer for Flatten {
    fn name(&self) -> &str {
        &self.name
    }

    fn config(&self) -> LayerConfig {
        LayerConfig::Flatten
    }

    fn input_shape(&self) -> &[usize] {
        &self.input_shape
    }

    fn output_shape(&self) -> &[usize] {
        &self.output_shape
    }

    fn forward(&self, input: &Tensor) -> Result<Tensor, ModelError> {
        check_input_shape(&self.name, &self.input_shape, input)?;
        Ok(input.reshape(&[input.rows(), self.output_shape[0]])?)
    }

    fn forward_train(&mut self, input: &Tensor) -> Result<Tensor, ModelError> {
        self.forward(input)
    }

    // 仅需把梯度还原为输入形状
    fn backward(&mut self, grad_output: &Tensor) -> Result<Tensor, ModelError> {
        check_input_shape(&self.name, &self.output_shape, grad_output)?;
        let mut shape = vec![grad_output.rows()];
        shape.extend_from_slice(&self.input_shape);
        Ok(grad_output.reshape(&shape)?)
    }
}
