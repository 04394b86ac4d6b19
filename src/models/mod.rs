/*
 * @Author       : 老董
 * @Date         : 2026-02-08
 * @Description  : 预置网络：多层感知机与一维卷积网络的分类/回归封装
 *
 * 结构：
 * - `Architecture`（构建策略）→ 编译好的 `CompiledModel` + 层注册表
 * - `Trainer` 负责 fit / predict 的共用流程，并在每次调用前经 `ShapeAdapter` 调整输入形状
 * - `Classifier`/`Regressor` 为未训练状态，`fit()` 后得到 `FittedClassifier`/`FittedRegressor`，
 *   只有后者才能 score / predict
 */

mod builder;
mod classifier;
mod config;
mod regressor;
mod shape;
mod trainer;

pub use builder::{Architecture, BuiltModel, CONV_LAYER_NAME, LayerRegistry};
pub use classifier::{Classifier, FittedClassifier};
pub use config::{ConvParams, FitConfig, LayerSizes};
pub use regressor::{FittedRegressor, Regressor};
pub use shape::ShapeAdapter;
pub use trainer::PREDICT_BATCH_SIZE;

#[cfg(test)]
mod tests;
