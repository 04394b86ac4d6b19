/*
 * @Author       : 老董
 * @Date         : 2026-02-04
 * @Description  : Dense (全连接) 层：`output = x @ W + b`
 *
 * 输入/输出形状：
 * - 输入：[batch_size, in_features]
 * - 输出：[batch_size, out_features]
 */

use super::{Layer, LayerConfig, check_input_shape, missing_cache, replace_parameters};
use crate::errors::ModelError;
use crate::nn::Init;
use crate::tensor::Tensor;
use ndarray::{Array2, Axis};
use rand::Rng;

#[derive(Debug, Clone)]
pub struct Dense {
    name: String,
    /// 权重参数 [in_features, out_features]
    weights: Tensor,
    /// 偏置参数 [out_features]
    bias: Tensor,
    grad_weights: Tensor,
    grad_bias: Tensor,
    input_shape: Vec<usize>,
    output_shape: Vec<usize>,
    cache_input: Option<Array2<f32>>,
}

impl Dense {
    /// 创建Dense层：权重Glorot均匀初始化，偏置零初始化
    pub fn new<R: Rng + ?Sized>(
        name: &str,
        in_features: usize,
        out_features: usize,
        rng: &mut R,
    ) -> Self {
        let weights = Init::GlorotUniform.generate(
            &[in_features, out_features],
            in_features,
            out_features,
            rng,
        );
        let bias = Init::Zeros.generate(&[out_features], in_features, out_features, rng);
        Self {
            name: name.to_string(),
            grad_weights: Tensor::zeros(weights.shape()),
            grad_bias: Tensor::zeros(bias.shape()),
            weights,
            bias,
            input_shape: vec![in_features],
            output_shape: vec![out_features],
            cache_input: None,
        }
    }

    pub fn in_features(&self) -> usize {
        self.input_shape[0]
    }

    pub fn out_features(&self) -> usize {
        self.output_shape[0]
    }

    pub fn weights(&self) -> &Tensor {
        &self.weights
    }

    pub fn bias(&self) -> &Tensor {
        &self.bias
    }

    fn compute(&self, input: &Tensor) -> Result<Array2<f32>, ModelError> {
        check_input_shape(&self.name, &self.input_shape, input)?;
        let x = input.view_2d()?;
        let mut output = x.dot(&self.weights.view_2d()?);
        output += &self.bias.view_1d()?;
        Ok(output)
    }
}

impl Layer for Dense {
    fn name(&self) -> &str {
        &self.name
    }

    fn config(&self) -> LayerConfig {
        LayerConfig::Dense {
            units: self.out_features(),
        }
    }

    fn input_shape(&self) -> &[usize] {
        &self.input_shape
    }

    fn output_shape(&self) -> &[usize] {
        &self.output_shape
    }

    fn forward(&self, input: &Tensor) -> Result<Tensor, ModelError> {
        Ok(Tensor::from(self.compute(input)?))
    }

    fn forward_train(&mut self, input: &Tensor) -> Result<Tensor, ModelError> {
        let output = self.compute(input)?;
        self.cache_input = Some(input.view_2d()?.to_owned());
        Ok(Tensor::from(output))
    }

    fn backward(&mut self, grad_output: &Tensor) -> Result<Tensor, ModelError> {
        let x = self
            .cache_input
            .as_ref()
            .ok_or_else(|| missing_cache(&self.name))?;
        check_input_shape(&self.name, &self.output_shape, grad_output)?;
        let g = grad_output.view_2d()?;
        if g.nrows() != x.nrows() {
            return Err(ModelError::shape(
                &[x.nrows(), self.out_features()],
                grad_output.shape(),
                format!("层`{}`的输出梯度样本数不符", self.name),
            ));
        }

        // dW = xᵀ·g，db = Σ_batch g，dx = g·Wᵀ
        self.grad_weights = Tensor::from(x.t().dot(&g));
        self.grad_bias = Tensor::from(g.sum_axis(Axis(0)).into_dyn());
        let grad_input = g.dot(&self.weights.view_2d()?.t());
        Ok(Tensor::from(grad_input))
    }

    fn parameters(&self) -> Vec<&Tensor> {
        vec![&self.weights, &self.bias]
    }

    fn parameters_and_grads(&mut self) -> Vec<(&mut Tensor, &Tensor)> {
        vec![
            (&mut self.weights, &self.grad_weights),
            (&mut self.bias, &self.grad_bias),
        ]
    }

    fn set_parameters(&mut self, params: Vec<Tensor>) -> Result<(), ModelError> {
        replace_parameters(&self.name, vec![&mut self.weights, &mut self.bias], params)
    }
}
