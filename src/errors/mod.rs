/*
 * @Author       : 老董
 * @Date         : 2026-02-03
 * @Description  : 错误类型：张量层面的TensorError，以及模型构建/训练/评估层面的ModelError
 */

use thiserror::Error;

#[derive(Error, Debug, PartialEq, Eq)]
pub enum TensorError {
    #[error("数据长度{data_len}与形状{shape:?}不符")]
    DataLenMismatch { data_len: usize, shape: Vec<usize> },
    #[error("张量形状不兼容：无法将形状{from:?}变为{to:?}")]
    IncompatibleShape { from: Vec<usize>, to: Vec<usize> },
    #[error("张量维数不符：期望{expected}维，实际{got}维")]
    DimensionMismatch { expected: usize, got: usize },
    #[error("行索引越界：{index} >= {len}")]
    RowOutOfBounds { index: usize, len: usize },
    #[error("张量列表为空")]
    EmptyList,
}

/// 模型相关的统一错误类型
///
/// 所有错误均在检测到的调用处同步返回，内部不做重试。
#[derive(Error, Debug)]
pub enum ModelError {
    /// 层尺寸列表或超参数不合法
    #[error("配置错误: {0}")]
    Config(String),

    /// 特征宽度与网络输入宽度等形状不匹配
    #[error("形状不匹配: 期望 {expected:?}, 实际 {got:?}（{message}）")]
    Shape {
        expected: Vec<usize>,
        got: Vec<usize>,
        message: String,
    },

    /// 类别标签为负、非整数，或超出声明的类别数
    #[error("标签越界: {0}")]
    LabelRange(String),

    /// 层注册表中不存在该名称
    #[error("未注册的层: `{0}`")]
    UnknownLayer(String),

    #[error(transparent)]
    Tensor(#[from] TensorError),

    #[error("IO 错误: {0}")]
    Io(#[from] std::io::Error),

    #[error("权重（反）序列化失败: {0}")]
    Bincode(#[from] bincode::Error),

    #[error("JSON（反）序列化失败: {0}")]
    Json(#[from] serde_json::Error),

    #[error("读取 npy 文件失败: {0}")]
    Npy(#[from] ndarray_npy::ReadNpyError),
}

impl ModelError {
    pub(crate) fn shape(expected: &[usize], got: &[usize], message: impl Into<String>) -> Self {
        Self::Shape {
            expected: expected.to_vec(),
            got: got.to_vec(),
            message: message.into(),
        }
    }
}

/// `fit`失败时连同未训练的网络一并返回，调用方可修正数据后重试
///
/// 校验类错误（标签、形状、配置）发生在任何权重更新之前，此时网络保持原样。
pub struct FitError<M> {
    pub model: M,
    pub error: ModelError,
}

impl<M> FitError<M> {
    pub fn into_model(self) -> M {
        self.model
    }
}

impl<M> std::fmt::Debug for FitError<M> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("FitError")
            .field("error", &self.error)
            .finish_non_exhaustive()
    }
}

impl<M> std::fmt::Display for FitError<M> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "训练失败: {}", self.error)
    }
}

impl<M> std::error::Error for FitError<M> {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        Some(&self.error)
    }
}

impl<M> From<FitError<M>> for ModelError {
    fn from(err: FitError<M>) -> Self {
        err.error
    }
}
