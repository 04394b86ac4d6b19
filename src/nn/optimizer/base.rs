/*
 * @Author       : 老董
 * @Date         : 2026-02-06
 * @Description  : 优化器基础trait
 */

use crate::tensor::Tensor;

/// 参数在模型中的位置：第`layer`层的第`slot`个参数
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct ParamId {
    pub layer: usize,
    pub slot: usize,
}

/// 优化器核心 trait
pub trait Optimizer {
    /// 用已计算的梯度更新一批参数，每调用一次记为一步
    ///
    /// 训练循环：
    /// ```ignore
    /// model.forward_train(&x)?;
    /// model.backward(&grad)?;
    /// optimizer.step(params);  // ← 只更新参数，不做 forward/backward
    /// ```
    fn step(&mut self, params: Vec<(ParamId, &mut Tensor, &Tensor)>);

    fn name(&self) -> &'static str;

    fn learning_rate(&self) -> f32;
}
