/*
 * @Author       : 老董
 * @Date         : 2024-01-31 20:23:53
 * @LastEditors  : 老董
 * @LastEditTime : 2026-02-07
 * @Description  : 负责神经网络（neural network）的构建：层、损失、优化器、回调与Sequential模型
 */

mod callbacks;
mod criterion;
mod descriptor;
mod init;
pub mod layer;
pub mod optimizer;
mod sequential;

pub use callbacks::{EarlyStopping, EarlyStoppingDecision, History, Monitor};
pub use criterion::{Loss, Metric};
pub use descriptor::{LayerDescriptor, ModelDescriptor};
pub use init::Init;
pub use layer::{
    Activation, ActivationKind, Conv1d, Dense, Dropout, Flatten, Layer, LayerConfig, LayerEnum,
    Padding,
};
pub use optimizer::{Adam, Optimizer, OptimizerConfig, ParamId, RmsProp};
pub use sequential::{CompiledModel, Evaluation, FitOptions, Sequential};

#[cfg(test)]
mod tests;
