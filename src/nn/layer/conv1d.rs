/*
 * @Author       : 老董
 * @Date         : 2026-02-05
 * @Description  : Conv1d (1D 卷积) 层，通道在后（channels-last），步长固定为1
 *
 * 输入/输出形状：
 * - 输入：[batch_size, L, in_channels]
 * - 输出：[batch_size, L', filters]
 *
 * 输出长度：
 * - same:  L' = L，左侧补 (k-1)/2 个零，右侧补其余
 * - valid: L' = L - k + 1
 *
 * 计算：output = act(conv1d(x, K) + b)，K 形状为 [kernel_len, in_channels, filters]
 */

use super::{
    ActivationKind, Layer, LayerConfig, check_input_shape, missing_cache, replace_parameters,
    to_dim_error,
};
use crate::errors::ModelError;
use crate::nn::Init;
use crate::tensor::Tensor;
use ndarray::{Array1, Array3, ArrayD, Ix3};
use rand::Rng;
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Padding {
    #[default]
    Same,
    Valid,
}

impl Padding {
    /// 左侧补零个数
    fn left(&self, kernel_len: usize) -> usize {
        match self {
            Padding::Same => (kernel_len - 1) / 2,
            Padding::Valid => 0,
        }
    }

    fn output_len(&self, input_len: usize, kernel_len: usize) -> Option<usize> {
        match self {
            Padding::Same => Some(input_len),
            Padding::Valid => (input_len + 1).checked_sub(kernel_len).filter(|&l| l > 0),
        }
    }
}

#[derive(Debug, Clone)]
pub struct Conv1d {
    name: String,
    kernel_len: usize,
    padding: Padding,
    activation: ActivationKind,
    /// 卷积核参数 [kernel_len, in_channels, filters]
    kernel: Tensor,
    /// 偏置参数 [filters]
    bias: Tensor,
    grad_kernel: Tensor,
    grad_bias: Tensor,
    input_shape: Vec<usize>,
    output_shape: Vec<usize>,
    cache_input: Option<Array3<f32>>,
    cache_output: Option<ArrayD<f32>>,
}

impl Conv1d {
    /// 创建Conv1d层
    ///
    /// # 参数
    /// - `input_shape`: 单个样本的形状 [L, in_channels]
    /// - `filters`: 卷积核个数（输出通道数）
    /// - `kernel_len`: 卷积核长度
    pub fn new<R: Rng + ?Sized>(
        name: &str,
        input_shape: &[usize],
        filters: usize,
        kernel_len: usize,
        padding: Padding,
        activation: ActivationKind,
        rng: &mut R,
    ) -> Result<Self, ModelError> {
        let &[input_len, in_channels] = input_shape else {
            return Err(ModelError::Config(format!(
                "Conv1d的单样本输入须为[L, 通道数]，实际为{input_shape:?}"
            )));
        };
        if filters == 0 || kernel_len == 0 {
            return Err(ModelError::Config(format!(
                "Conv1d的filters与kernel_len须为正，实际为{filters}与{kernel_len}"
            )));
        }
        let output_len = padding.output_len(input_len, kernel_len).ok_or_else(|| {
            ModelError::Config(format!(
                "valid填充下卷积核长度{kernel_len}不能超过序列长度{input_len}"
            ))
        })?;

        let kernel = Init::GlorotUniform.generate(
            &[kernel_len, in_channels, filters],
            kernel_len * in_channels,
            kernel_len * filters,
            rng,
        );
        let bias = Tensor::zeros(&[filters]);
        Ok(Self {
            name: name.to_string(),
            kernel_len,
            padding,
            activation,
            grad_kernel: Tensor::zeros(kernel.shape()),
            grad_bias: Tensor::zeros(bias.shape()),
            kernel,
            bias,
            input_shape: input_shape.to_vec(),
            output_shape: vec![output_len, filters],
            cache_input: None,
            cache_output: None,
        })
    }

    pub fn filters(&self) -> usize {
        self.output_shape[1]
    }

    pub fn kernel_len(&self) -> usize {
        self.kernel_len
    }

    pub fn activation(&self) -> ActivationKind {
        self.activation
    }

    pub fn kernel(&self) -> &Tensor {
        &self.kernel
    }

    pub fn bias(&self) -> &Tensor {
        &self.bias
    }

    /// 输出位置`t`、核位置`k`对应的输入位置，落在补零区域时返回None
    fn source_index(&self, t: usize, k: usize) -> Option<usize> {
        let pos = t + k;
        let pad = self.padding.left(self.kernel_len);
        (pos >= pad && pos - pad < self.input_shape[0]).then(|| pos - pad)
    }

    fn compute(&self, input: &Tensor) -> Result<ArrayD<f32>, ModelError> {
        check_input_shape(&self.name, &self.input_shape, input)?;
        let x = input.view_3d()?;
        let w = self.kernel.view_3d()?;
        let b = self.bias.view_1d()?;
        let (n, _, in_channels) = x.dim();
        let (output_len, filters) = (self.output_shape[0], self.output_shape[1]);

        let mut z = Array3::<f32>::zeros((n, output_len, filters));
        for s in 0..n {
            for t in 0..output_len {
                for k in 0..self.kernel_len {
                    let Some(src) = self.source_index(t, k) else {
                        continue;
                    };
                    for c in 0..in_channels {
                        let xv = x[[s, src, c]];
                        for f in 0..filters {
                            z[[s, t, f]] += xv * w[[k, c, f]];
                        }
                    }
                }
                for f in 0..filters {
                    z[[s, t, f]] += b[f];
                }
            }
        }

        let mut output = z.into_dyn();
        self.activation.apply(&mut output);
        Ok(output)
    }
}

impl Layer for Conv1d {
    fn name(&self) -> &str {
        &self.name
    }

    fn config(&self) -> LayerConfig {
        LayerConfig::Conv1d {
            filters: self.filters(),
            kernel_len: self.kernel_len,
            padding: self.padding,
            activation: self.activation,
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
        self.cache_input = Some(input.view_3d()?.to_owned());
        self.cache_output = Some(output.clone());
        Ok(Tensor::from(output))
    }

    fn backward(&mut self, grad_output: &Tensor) -> Result<Tensor, ModelError> {
        let (Some(x), Some(y)) = (self.cache_input.as_ref(), self.cache_output.as_ref()) else {
            return Err(missing_cache(&self.name));
        };
        if y.shape() != grad_output.shape() {
            return Err(ModelError::shape(
                y.shape(),
                grad_output.shape(),
                format!("层`{}`的输出梯度形状不符", self.name),
            ));
        }

        let dz = self
            .activation
            .backprop(y, grad_output.as_array())
            .into_dimensionality::<Ix3>()
            .map_err(|_| to_dim_error(3, grad_output.dimension()))?;
        let w = self.kernel.view_3d()?;
        let (n, input_len, in_channels) = x.dim();
        let (output_len, filters) = (self.output_shape[0], self.output_shape[1]);

        let mut grad_kernel = Array3::<f32>::zeros((self.kernel_len, in_channels, filters));
        let mut grad_bias = Array1::<f32>::zeros(filters);
        let mut grad_input = Array3::<f32>::zeros((n, input_len, in_channels));
        for s in 0..n {
            for t in 0..output_len {
                for f in 0..filters {
                    grad_bias[f] += dz[[s, t, f]];
                }
                for k in 0..self.kernel_len {
                    let Some(src) = self.source_index(t, k) else {
                        continue;
                    };
                    for c in 0..in_channels {
                        for f in 0..filters {
                            let d = dz[[s, t, f]];
                            grad_kernel[[k, c, f]] += x[[s, src, c]] * d;
                            grad_input[[s, src, c]] += w[[k, c, f]] * d;
                        }
                    }
                }
            }
        }

        self.grad_kernel = Tensor::from(grad_kernel);
        self.grad_bias = Tensor::from(grad_bias.into_dyn());
        Ok(Tensor::from(grad_input))
    }

    fn parameters(&self) -> Vec<&Tensor> {
        vec![&self.kernel, &self.bias]
    }

    fn parameters_and_grads(&mut self) -> Vec<(&mut Tensor, &Tensor)> {
        vec![
            (&mut self.kernel, &self.grad_kernel),
            (&mut self.bias, &self.grad_bias),
        ]
    }

    fn set_parameters(&mut self, params: Vec<Tensor>) -> Result<(), ModelError> {
        replace_parameters(&self.name, vec![&mut self.kernel, &mut self.bias], params)
    }
}
