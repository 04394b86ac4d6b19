//! 从 `.npy` 文件读取特征矩阵与标签向量

use crate::errors::ModelError;
use crate::tensor::Tensor;
use ndarray::{Array1, Array2};
use ndarray_npy::read_npy;
use std::path::Path;

/// 读取形状为 [N, F] 的 f32 矩阵
pub fn load_matrix<P: AsRef<Path>>(path: P) -> Result<Tensor, ModelError> {
    let array: Array2<f32> = read_npy(path)?;
    Ok(Tensor::from(array))
}

/// 读取形状为 [N] 的 f32 向量（如类别标签或回归目标）
pub fn load_vector<P: AsRef<Path>>(path: P) -> Result<Tensor, ModelError> {
    let array: Array1<f32> = read_npy(path)?;
    Ok(Tensor::from(array.into_dyn()))
}
