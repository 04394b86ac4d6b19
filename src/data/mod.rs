//! 数据模块
//!
//! 提供批处理、标签变换与 `.npy` 读取功能。
//!
//! # 主要组件
//!
//! - [`DataLoader`]: 数据批量加载器
//! - [`TensorDataset`]: 借用特征和标签的数据集
//! - [`transforms`]: one-hot 编码与标签检查
//! - [`npy`]: 读取 NumPy 保存的特征矩阵

mod dataloader;
pub mod npy;
pub mod transforms;

#[cfg(test)]
mod tests;

pub use dataloader::{DataLoader, DataLoaderIterator, TensorDataset};
