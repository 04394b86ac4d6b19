//! 标签变换函数
//!
//! 整数类别标签与 one-hot 编码之间的转换，以及标签合法性检查。

use crate::errors::ModelError;
use crate::tensor::Tensor;

/// 类别标签允许的最大值（f32可精确表示的最大连续整数）
pub const MAX_LABEL: f32 = 16_777_216.0;

/// 将标签张量（形状 [N] 或 [N, 1]）转为类别索引
///
/// 标签须为不超过`MAX_LABEL`的非负整数，否则返回`ModelError::LabelRange`。
pub fn class_indices(labels: &Tensor) -> Result<Vec<usize>, ModelError> {
    let shape = labels.shape();
    let is_column = shape.len() == 1 || (shape.len() == 2 && shape[1] == 1);
    if !is_column {
        return Err(ModelError::shape(
            &[labels.rows()],
            shape,
            "类别标签须为一维向量或单列矩阵",
        ));
    }
    labels
        .as_array()
        .iter()
        .enumerate()
        .map(|(i, &value)| {
            if value < 0.0 || value.fract() != 0.0 || !value.is_finite() {
                Err(ModelError::LabelRange(format!(
                    "第{i}个标签为{value}，须为非负整数"
                )))
            } else if value > MAX_LABEL {
                Err(ModelError::LabelRange(format!(
                    "第{i}个标签为{value}，超过上限{MAX_LABEL}"
                )))
            } else {
                Ok(value as usize)
            }
        })
        .collect()
}

/// 由标签推断类别数：最大标签值 + 1；标签为空或溢出时返回None
pub fn infer_num_classes(indices: &[usize]) -> Option<usize> {
    indices.iter().max().and_then(|&max| max.checked_add(1))
}

/// 检查所有标签都落在 [0, num_classes) 内
pub fn check_label_range(indices: &[usize], num_classes: usize) -> Result<(), ModelError> {
    match indices.iter().max() {
        Some(&max) if max >= num_classes => Err(ModelError::LabelRange(format!(
            "类别数{num_classes}小于最大标签值{max}+1"
        ))),
        _ => Ok(()),
    }
}

/// 将类别索引转换为 one-hot 编码，形状 [N, num_classes]
///
/// # 示例
/// ```ignore
/// let one_hot = one_hot(&[0, 2, 1], 3)?;
/// // 结果: [[1,0,0], [0,0,1], [0,1,0]]
/// ```
pub fn one_hot(indices: &[usize], num_classes: usize) -> Result<Tensor, ModelError> {
    check_label_range(indices, num_classes)?;
    let mut data = vec![0.0; indices.len() * num_classes];
    for (i, &class_idx) in indices.iter().enumerate() {
        data[i * num_classes + class_idx] = 1.0;
    }
    Ok(Tensor::try_new(&data, &[indices.len(), num_classes])?)
}
