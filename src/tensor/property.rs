/*
 * @Author       : 老董
 * @Date         : 2026-02-03
 * @Description  : 本类仅包含一些属性方法，不包含任何运算方法
 */

use super::Tensor;
use crate::errors::TensorError;
use ndarray::{ArrayD, ArrayView1, ArrayView2, ArrayView3, ArrayViewD, ArrayViewMutD, Ix1, Ix2, Ix3};

impl Tensor {
    /*↓↓↓↓↓↓↓↓↓↓↓↓↓↓↓↓↓↓↓↓↓↓↓↓↓快照/view(_mut)↓↓↓↓↓↓↓↓↓↓↓↓↓↓↓↓↓↓↓↓↓↓↓↓↓*/
    pub fn view(&self) -> ArrayViewD<'_, f32> {
        self.data.view()
    }
    pub fn view_mut(&mut self) -> ArrayViewMutD<'_, f32> {
        self.data.view_mut()
    }

    /// 以向量形式查看，张量须为1维
    pub fn view_1d(&self) -> Result<ArrayView1<'_, f32>, TensorError> {
        self.data
            .view()
            .into_dimensionality::<Ix1>()
            .map_err(|_| TensorError::DimensionMismatch {
                expected: 1,
                got: self.dimension(),
            })
    }

    /// 以矩阵形式查看，张量须为2维
    pub fn view_2d(&self) -> Result<ArrayView2<'_, f32>, TensorError> {
        self.data
            .view()
            .into_dimensionality::<Ix2>()
            .map_err(|_| TensorError::DimensionMismatch {
                expected: 2,
                got: self.dimension(),
            })
    }

    /// 以3阶数组形式查看，张量须为3维
    pub fn view_3d(&self) -> Result<ArrayView3<'_, f32>, TensorError> {
        self.data
            .view()
            .into_dimensionality::<Ix3>()
            .map_err(|_| TensorError::DimensionMismatch {
                expected: 3,
                got: self.dimension(),
            })
    }
    /*↑↑↑↑↑↑↑↑↑↑↑↑↑↑↑↑↑↑↑↑↑↑↑↑↑快照/view(_mut)↑↑↑↑↑↑↑↑↑↑↑↑↑↑↑↑↑↑↑↑↑↑↑↑↑*/

    pub fn as_array(&self) -> &ArrayD<f32> {
        &self.data
    }

    pub fn as_array_mut(&mut self) -> &mut ArrayD<f32> {
        &mut self.data
    }

    pub fn into_array(self) -> ArrayD<f32> {
        self.data
    }

    /// 若为向量，`shape`可以是[n]、[1,n]、[n,1]；
    /// 若为矩阵，`shape`可以是[n,m]；
    /// 若为更高维度的数组，`shape`可以是[n,l,c,...]。
    pub fn shape(&self) -> &[usize] {
        self.data.shape()
    }

    /// 张量的维（dim）数、阶（rank）数
    pub fn dimension(&self) -> usize {
        self.data.ndim()
    }

    /// 张量中所有元素的数量
    pub fn size(&self) -> usize {
        self.data.len()
    }

    /// 判断两个张量的形状是否严格一致。如：形状为 [1, 4]，[1, 4]和[4]是不一致的，会返回false
    pub fn is_same_shape(&self, other: &Self) -> bool {
        self.shape() == other.shape()
    }

    /// 判断张量是否为标量
    pub fn is_scalar(&self) -> bool {
        self.shape().is_empty() || self.shape().iter().all(|x| *x == 1)
    }

    /// 转化为纯数（number）。若为标量，则返回Some(number)，否则返回None
    pub fn number(&self) -> Option<f32> {
        if self.is_scalar() {
            self.data.iter().next().copied()
        } else {
            None
        }
    }

    /// 按行优先顺序导出所有元素
    pub fn to_vec(&self) -> Vec<f32> {
        self.data.iter().copied().collect()
    }

    /// 样本数，即首维长度；标量返回1
    pub fn rows(&self) -> usize {
        self.shape().first().copied().unwrap_or(1)
    }
}
