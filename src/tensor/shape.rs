use super::Tensor;
use crate::errors::TensorError;
use ndarray::{Axis, IxDyn};

impl Tensor {
    /// 变形为`shape`，元素按行优先顺序保持不变
    pub fn reshape(&self, shape: &[usize]) -> Result<Self, TensorError> {
        let new_total_elements: usize = shape.iter().product();
        if self.size() != new_total_elements {
            return Err(TensorError::IncompatibleShape {
                from: self.shape().to_vec(),
                to: shape.to_vec(),
            });
        }
        let data = self
            .data
            .as_standard_layout()
            .into_owned()
            .into_shape(IxDyn(shape))
            .map_err(|_| TensorError::IncompatibleShape {
                from: self.shape().to_vec(),
                to: shape.to_vec(),
            })?;
        Ok(Self { data })
    }

    /// 完全展平为一维张量
    pub fn flatten(&self) -> Self {
        Self {
            data: ndarray::Array::from_vec(self.to_vec()).into_dyn(),
        }
    }

    /// 保留首维（样本维），展平其余维度：`[N, a, b, ...]` → `[N, a*b*...]`
    pub fn flatten_samples(&self) -> Result<Self, TensorError> {
        let n = self.rows();
        let features = if n == 0 { 0 } else { self.size() / n };
        self.reshape(&[n, features])
    }

    /// 沿首维按`indices`的顺序选取样本，返回新的张量
    pub fn select_rows(&self, indices: &[usize]) -> Result<Self, TensorError> {
        if self.dimension() == 0 {
            return Err(TensorError::DimensionMismatch {
                expected: 1,
                got: 0,
            });
        }
        let len = self.rows();
        if let Some(&index) = indices.iter().find(|&&i| i >= len) {
            return Err(TensorError::RowOutOfBounds { index, len });
        }
        Ok(Self {
            data: self.data.select(Axis(0), indices),
        })
    }

    /// 矩阵每一行最大值所在的列号（并列时取首个）
    pub fn argmax_rows(&self) -> Result<Vec<usize>, TensorError> {
        let view = self.view_2d()?;
        Ok(view
            .outer_iter()
            .map(|row| {
                let mut best = 0;
                for (j, &value) in row.iter().enumerate() {
                    if value > row[best] {
                        best = j;
                    }
                }
                best
            })
            .collect())
    }
}
