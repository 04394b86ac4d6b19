/*
 * @Author       : 老董
 * @Date         : 2026-02-06
 * @Description  : 训练回调：早停（EarlyStopping）与训练历史（History）
 */

use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

/// 早停所监控的量
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Monitor {
    Loss,
    #[default]
    ValLoss,
    Accuracy,
    ValAccuracy,
}

impl Monitor {
    /// 在History中对应的键名
    pub fn key(&self) -> &'static str {
        match self {
            Monitor::Loss => "loss",
            Monitor::ValLoss => "val_loss",
            Monitor::Accuracy => "accuracy",
            Monitor::ValAccuracy => "val_accuracy",
        }
    }

    pub fn needs_validation(&self) -> bool {
        matches!(self, Monitor::ValLoss | Monitor::ValAccuracy)
    }

    /// 对应Keras的`mode='auto'`：准确率越大越好，损失越小越好
    fn higher_is_better(&self) -> bool {
        matches!(self, Monitor::Accuracy | Monitor::ValAccuracy)
    }
}

/// 早停在每个epoch结束时给出的判断
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum EarlyStoppingDecision {
    /// 监控值创下新的最优
    Improved,
    /// 未改善，但尚未用完耐心
    Waiting,
    /// 已连续`patience`个epoch未改善后再次未改善，应停止训练
    Stop,
}

/// 早停规则
///
/// 最多容忍连续`patience`个未改善（未比最优值改善超过`min_delta`）的epoch，
/// 其后的下一个未改善epoch停止训练；`patience`为0时首个未改善epoch即停止。
#[derive(Debug, Clone, PartialEq)]
pub struct EarlyStopping {
    monitor: Monitor,
    patience: usize,
    min_delta: f32,
    restore_best_weights: bool,
    best: Option<f32>,
    best_epoch: Option<usize>,
    wait: usize,
}

impl EarlyStopping {
    pub fn new(monitor: Monitor, patience: usize) -> Self {
        Self {
            monitor,
            patience,
            min_delta: 0.0,
            restore_best_weights: false,
            best: None,
            best_epoch: None,
            wait: 0,
        }
    }

    pub fn min_delta(mut self, min_delta: f32) -> Self {
        self.min_delta = min_delta.abs();
        self
    }

    /// 停止时是否把权重恢复到监控值最优的那个epoch
    pub fn restore_best_weights(mut self, restore: bool) -> Self {
        self.restore_best_weights = restore;
        self
    }

    pub fn monitor(&self) -> Monitor {
        self.monitor
    }

    pub fn patience(&self) -> usize {
        self.patience
    }

    pub fn restores_best_weights(&self) -> bool {
        self.restore_best_weights
    }

    pub fn best(&self) -> Option<f32> {
        self.best
    }

    pub fn best_epoch(&self) -> Option<usize> {
        self.best_epoch
    }

    /// 在新一轮训练开始前调用
    pub fn reset(&mut self) {
        self.best = None;
        self.best_epoch = None;
        self.wait = 0;
    }

    /// 每个epoch结束时以监控值更新状态；NaN视为未改善
    pub fn update(&mut self, epoch: usize, value: f32) -> EarlyStoppingDecision {
        let improved = match self.best {
            _ if value.is_nan() => false,
            None => true,
            Some(best) if self.monitor.higher_is_better() => value - self.min_delta > best,
            Some(best) => value + self.min_delta < best,
        };
        if improved {
            self.best = Some(value);
            self.best_epoch = Some(epoch);
            self.wait = 0;
            return EarlyStoppingDecision::Improved;
        }
        self.wait += 1;
        if self.wait > self.patience {
            EarlyStoppingDecision::Stop
        } else {
            EarlyStoppingDecision::Waiting
        }
    }
}

/// 一次fit产生的逐epoch记录，键为`loss`、`val_loss`、`accuracy`、`val_accuracy`等
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct History {
    values: BTreeMap<String, Vec<f32>>,
    epochs: usize,
    /// 早停触发时所在的epoch（从0计）
    stopped_epoch: Option<usize>,
}

impl History {
    pub(crate) fn record(&mut self, key: &str, value: f32) {
        self.values.entry(key.to_string()).or_default().push(value);
    }

    pub(crate) fn finish_epoch(&mut self) {
        self.epochs += 1;
    }

    pub(crate) fn set_stopped_epoch(&mut self, epoch: usize) {
        self.stopped_epoch = Some(epoch);
    }

    pub fn get(&self, key: &str) -> Option<&[f32]> {
        self.values.get(key).map(Vec::as_slice)
    }

    pub fn last(&self, key: &str) -> Option<f32> {
        self.get(key).and_then(|v| v.last().copied())
    }

    pub fn keys(&self) -> impl Iterator<Item = &str> {
        self.values.keys().map(String::as_str)
    }

    pub fn loss(&self) -> &[f32] {
        self.get("loss").unwrap_or_default()
    }

    pub fn val_loss(&self) -> &[f32] {
        self.get("val_loss").unwrap_or_default()
    }

    /// 实际训练的epoch数
    pub fn epochs(&self) -> usize {
        self.epochs
    }

    pub fn stopped_epoch(&self) -> Option<usize> {
        self.stopped_epoch
    }

    pub fn stopped_early(&self) -> bool {
        self.stopped_epoch.is_some()
    }

    pub fn to_json(&self) -> Result<String, serde_json::Error> {
        serde_json::to_string_pretty(self)
    }
}
