use ndarray::{Array, Array2, Array3, ArrayD, IxDyn};
use rand::Rng;
use rand::distributions::{Distribution, Uniform};
use serde::{Deserialize, Serialize};

use crate::errors::TensorError;

mod index;
mod property;
mod shape;

#[cfg(test)]
mod tests;

/// 定义张量的结构体。其可以是标量、向量、矩阵或更高维度的数组。
/// 注：本库中张量的首维总是样本维（batch），如特征矩阵为`[N, F]`，一维卷积的输入为`[N, L, C]`。
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Tensor {
    data: ArrayD<f32>,
}

impl Tensor {
    /// 创建一个张量，`data`按行优先（C顺序）排列，其长度必须和`shape`中所有元素的乘积相等，否则会panic。
    /// 若需要可恢复的错误，请使用[`Tensor::try_new`]。
    pub fn new(data: &[f32], shape: &[usize]) -> Tensor {
        match Self::try_new(data, shape) {
            Ok(tensor) => tensor,
            Err(e) => panic!("{e}"),
        }
    }

    pub fn try_new(data: &[f32], shape: &[usize]) -> Result<Tensor, TensorError> {
        let data = Array::from_shape_vec(IxDyn(shape), data.to_vec()).map_err(|_| {
            TensorError::DataLenMismatch {
                data_len: data.len(),
                shape: shape.to_vec(),
            }
        })?;
        Ok(Tensor { data })
    }

    pub fn zeros(shape: &[usize]) -> Tensor {
        Tensor {
            data: ArrayD::zeros(IxDyn(shape)),
        }
    }

    /// 创建一个随机张量，其值服从[min, max]闭区间上的均匀分布
    pub fn new_uniform<R: Rng + ?Sized>(min: f32, max: f32, shape: &[usize], rng: &mut R) -> Tensor {
        let uniform = Uniform::from(min..=max);
        let len = shape.iter().product::<usize>();
        let data = (0..len).map(|_| uniform.sample(rng)).collect::<Vec<_>>();
        Tensor::new(&data, shape)
    }

    /// 由一组行长度相同的样本构造`[N, F]`的特征矩阵
    pub fn from_rows(rows: &[Vec<f32>]) -> Result<Tensor, TensorError> {
        let first = rows.first().ok_or(TensorError::EmptyList)?;
        let width = first.len();
        let mut data = Vec::with_capacity(rows.len() * width);
        for row in rows {
            if row.len() != width {
                return Err(TensorError::DataLenMismatch {
                    data_len: row.len(),
                    shape: vec![width],
                });
            }
            data.extend_from_slice(row);
        }
        Self::try_new(&data, &[rows.len(), width])
    }
}

/*↓↓↓↓↓↓↓↓↓↓↓↓↓↓↓↓↓↓↓↓↓↓↓↓↓与ndarray互转↓↓↓↓↓↓↓↓↓↓↓↓↓↓↓↓↓↓↓↓↓↓↓↓↓*/
impl From<ArrayD<f32>> for Tensor {
    fn from(data: ArrayD<f32>) -> Self {
        Tensor { data }
    }
}

impl From<Array2<f32>> for Tensor {
    fn from(data: Array2<f32>) -> Self {
        Tensor {
            data: data.into_dyn(),
        }
    }
}

impl From<Array3<f32>> for Tensor {
    fn from(data: Array3<f32>) -> Self {
        Tensor {
            data: data.into_dyn(),
        }
    }
}

impl From<f32> for Tensor {
    /// 将`f32`转换为形状为`[1]`的张量
    fn from(scalar: f32) -> Self {
        Tensor::new(&[scalar], &[1])
    }
}
/*↑↑↑↑↑↑↑↑↑↑↑↑↑↑↑↑↑↑↑↑↑↑↑↑↑与ndarray互转↑↑↑↑↑↑↑↑↑↑↑↑↑↑↑↑↑↑↑↑↑↑↑↑↑*/
