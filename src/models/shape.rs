/*
 * @Author       : 老董
 * @Date         : 2026-02-08
 * @Description  : 输入形状适配：全连接网络直接使用 [N, F]，卷积网络使用 [N, F, 1]
 */

use crate::errors::ModelError;
use crate::tensor::Tensor;
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ShapeAdapter {
    /// 原样使用二维特征矩阵
    #[default]
    Identity,
    /// 每个样本视为长度为F、单通道的序列
    Sequence,
}

impl ShapeAdapter {
    /// 校验`x`为`[N, input_width]`并转换为网络所需的形状
    pub fn adapt(&self, x: &Tensor, input_width: usize) -> Result<Tensor, ModelError> {
        let &[n, width] = x.shape() else {
            return Err(ModelError::shape(
                &[x.rows(), input_width],
                x.shape(),
                "特征须为二维矩阵[样本数, 特征数]",
            ));
        };
        if width != input_width {
            return Err(ModelError::shape(
                &[n, input_width],
                x.shape(),
                "特征数与网络输入宽度不一致",
            ));
        }
        match self {
            ShapeAdapter::Identity => Ok(x.clone()),
            ShapeAdapter::Sequence => Ok(x.reshape(&[n, width, 1])?),
        }
    }

    /// 训练集与验证集一并转换
    pub fn adapt_pair(
        &self,
        train: &Tensor,
        val: &Tensor,
        input_width: usize,
    ) -> Result<(Tensor, Tensor), ModelError> {
        Ok((
            self.adapt(train, input_width)?,
            self.adapt(val, input_width)?,
        ))
    }

    /// `adapt`的逆变换
    pub fn flatten_back(&self, x: &Tensor) -> Result<Tensor, ModelError> {
        match (self, x.shape()) {
            (ShapeAdapter::Identity, [_, _]) => Ok(x.clone()),
            (ShapeAdapter::Sequence, &[n, width, 1]) => Ok(x.reshape(&[n, width])?),
            (ShapeAdapter::Identity, got) => Err(ModelError::shape(
                &[x.rows(), 0],
                got,
                "Identity适配后的特征应为二维",
            )),
            (ShapeAdapter::Sequence, got) => Err(ModelError::shape(
                &[x.rows(), 0, 1],
                got,
                "Sequence适配后的特征应为[样本数, 长度, 1]",
            )),
        }
    }
}
