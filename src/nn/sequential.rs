/*
 * @Author       : 老董
 * @Date         : 2026-02-07
 * @Description  : Sequential 模型：逐层堆叠 → compile → fit / evaluate / predict
 *
 * 用法与Keras一致：
 * ```ignore
 * let mut model = Sequential::with_seed(&[49], 42);
 * model.dense(30)?.activation(ActivationKind::Relu)?.dropout(0.2)?;
 * model.dense(3)?.activation(ActivationKind::Softmax)?;
 * let mut model = model.compile(
 *     Loss::CategoricalCrossEntropy,
 *     OptimizerConfig::rmsprop(),
 *     vec![Metric::Accuracy],
 * )?;
 * let history = model.fit(&x, &y, Some((&x_val, &y_val)), &FitOptions::default(), None)?;
 * ```
 */

use super::callbacks::{EarlyStopping, EarlyStoppingDecision, History};
use super::criterion::{Loss, Metric};
use super::descriptor::{LayerDescriptor, ModelDescriptor};
use super::layer::{
    Activation, ActivationKind, Conv1d, Dense, Dropout, Flatten, Layer, LayerConfig, LayerEnum,
    Padding, check_parameters,
};
use super::optimizer::{Optimizer, OptimizerConfig, ParamId};
use crate::data::{DataLoader, TensorDataset};
use crate::errors::ModelError;
use crate::tensor::Tensor;
use ndarray::{ArrayD, Axis, concatenate};
use rand::rngs::StdRng;
use rand::{RngCore, SeedableRng};
use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use std::fmt;
use std::fs::File;
use std::io::{BufReader, BufWriter};
use std::path::Path;

/// 未编译的层堆叠
pub struct Sequential {
    input_shape: Vec<usize>,
    layers: Vec<LayerEnum>,
    rng: StdRng,
    /// 每种层前缀已自动命名的次数
    name_counts: HashMap<&'static str, usize>,
}

impl Sequential {
    /// `input_shape`为单个样本的形状（不含样本维），随机种子取自系统熵
    pub fn new(input_shape: &[usize]) -> Self {
        Self::with_rng(input_shape, StdRng::from_entropy())
    }

    pub fn with_seed(input_shape: &[usize], seed: u64) -> Self {
        Self::with_rng(input_shape, StdRng::seed_from_u64(seed))
    }

    fn with_rng(input_shape: &[usize], rng: StdRng) -> Self {
        Self {
            input_shape: input_shape.to_vec(),
            layers: Vec::new(),
            rng,
            name_counts: HashMap::new(),
        }
    }

    /// 当前最后一层的单样本输出形状
    pub fn output_shape(&self) -> &[usize] {
        self.layers
            .last()
            .map_or(self.input_shape.as_slice(), |l| l.output_shape())
    }

    pub fn layers(&self) -> &[LayerEnum] {
        &self.layers
    }

    pub fn len(&self) -> usize {
        self.layers.len()
    }

    pub fn is_empty(&self) -> bool {
        self.layers.is_empty()
    }

    /// 按配置追加一层，名称自动生成（`dense`、`dense_1`...）
    pub fn add(&mut self, config: LayerConfig) -> Result<&mut Self, ModelError> {
        let name = self.auto_name(config.base_name());
        self.push(config, name)
    }

    /// 按配置追加一层并指定名称，名称须唯一
    pub fn add_named(&mut self, config: LayerConfig, name: &str) -> Result<&mut Self, ModelError> {
        if self.name_taken(name) {
            return Err(ModelError::Config(format!("层名`{name}`已存在")));
        }
        self.push(config, name.to_string())
    }

    pub fn dense(&mut self, units: usize) -> Result<&mut Self, ModelError> {
        self.add(LayerConfig::Dense { units })
    }

    pub fn activation(&mut self, activation: ActivationKind) -> Result<&mut Self, ModelError> {
        self.add(LayerConfig::Activation { activation })
    }

    pub fn dropout(&mut self, rate: f32) -> Result<&mut Self, ModelError> {
        self.add(LayerConfig::Dropout { rate })
    }

    pub fn conv1d(
        &mut self,
        filters: usize,
        kernel_len: usize,
        padding: Padding,
        activation: ActivationKind,
    ) -> Result<&mut Self, ModelError> {
        self.add(LayerConfig::Conv1d {
            filters,
            kernel_len,
            padding,
            activation,
        })
    }

    pub fn flatten(&mut self) -> Result<&mut Self, ModelError> {
        self.add(LayerConfig::Flatten)
    }

    fn name_taken(&self, name: &str) -> bool {
        self.layers.iter().any(|l| l.name() == name)
    }

    fn auto_name(&mut self, base: &'static str) -> String {
        loop {
            let count = self.name_counts.entry(base).or_insert(0);
            let name = match *count {
                0 => base.to_string(),
                n => format!("{base}_{n}"),
            };
            *count += 1;
            if !self.name_taken(&name) {
                return name;
            }
        }
    }

    fn push(&mut self, config: LayerConfig, name: String) -> Result<&mut Self, ModelError> {
        let shape = self.output_shape().to_vec();
        let layer: LayerEnum = match config {
            LayerConfig::Dense { units } => {
                let &[in_features] = shape.as_slice() else {
                    return Err(ModelError::Config(format!(
                        "Dense层`{name}`需要1维的单样本输入，实际为{shape:?}，请先添加Flatten"
                    )));
                };
                if units == 0 {
                    return Err(ModelError::Config(format!("Dense层`{name}`的units须为正")));
                }
                Dense::new(&name, in_features, units, &mut self.rng).into()
            }
            LayerConfig::Activation { activation } => {
                Activation::new(&name, activation, &shape).into()
            }
            LayerConfig::Dropout { rate } => {
                Dropout::new(&name, rate, &shape, self.rng.next_u64())?.into()
            }
            LayerConfig::Conv1d {
                filters,
                kernel_len,
                padding,
                activation,
            } => Conv1d::new(
                &name,
                &shape,
                filters,
                kernel_len,
                padding,
                activation,
                &mut self.rng,
            )?
            .into(),
            LayerConfig::Flatten => Flatten::new(&name, &shape).into(),
        };
        self.layers.push(layer);
        Ok(self)
    }

    /// 固定结构，配置损失、优化器与评估指标
    pub fn compile(
        self,
        loss: Loss,
        optimizer: OptimizerConfig,
        metrics: Vec<Metric>,
    ) -> Result<CompiledModel, ModelError> {
        if self.layers.is_empty() {
            return Err(ModelError::Config("模型中没有任何层".to_string()));
        }
        Ok(CompiledModel {
            input_shape: self.input_shape,
            layers: self.layers,
            loss,
            optimizer: optimizer.build(),
            optimizer_config: optimizer,
            metrics,
            rng: self.rng,
        })
    }
}

/// `CompiledModel::fit`的训练选项
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct FitOptions {
    pub batch_size: usize,
    pub epochs: usize,
    pub shuffle: bool,
    /// 0：静默；≥1：每个epoch以info级别输出日志
    pub verbosity: u8,
}

impl Default for FitOptions {
    fn default() -> Self {
        Self {
            batch_size: 32,
            epochs: 1,
            shuffle: true,
            verbosity: 0,
        }
    }
}

/// `evaluate`的结果：平均损失及各指标
#[derive(Debug, Clone, PartialEq)]
pub struct Evaluation {
    pub loss: f32,
    pub metrics: Vec<(Metric, f32)>,
}

impl Evaluation {
    pub fn metric(&self, metric: Metric) -> Option<f32> {
        self.metrics
            .iter()
            .find(|(m, _)| *m == metric)
            .map(|&(_, v)| v)
    }
}

#[derive(Serialize, Deserialize)]
struct WeightsFile {
    version: String,
    layers: Vec<(String, Vec<Tensor>)>,
}

/// 已编译的模型：结构固定，权重只通过`fit`或`set_weights`改变
pub struct CompiledModel {
    input_shape: Vec<usize>,
    layers: Vec<LayerEnum>,
    loss: Loss,
    optimizer: Box<dyn Optimizer>,
    optimizer_config: OptimizerConfig,
    metrics: Vec<Metric>,
    rng: StdRng,
}

impl fmt::Debug for CompiledModel {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("CompiledModel")
            .field("input_shape", &self.input_shape)
            .field("layers", &self.layers)
            .field("loss", &self.loss)
            .field("optimizer", &self.optimizer.name())
            .field("metrics", &self.metrics)
            .finish()
    }
}

impl CompiledModel {
    pub fn input_shape(&self) -> &[usize] {
        &self.input_shape
    }

    pub fn output_shape(&self) -> &[usize] {
        self.layers
            .last()
            .map_or(self.input_shape.as_slice(), |l| l.output_shape())
    }

    pub fn layers(&self) -> &[LayerEnum] {
        &self.layers
    }

    pub fn layer(&self, index: usize) -> Option<&LayerEnum> {
        self.layers.get(index)
    }

    pub fn layer_index(&self, name: &str) -> Option<usize> {
        self.layers.iter().position(|l| l.name() == name)
    }

    pub fn loss(&self) -> Loss {
        self.loss
    }

    pub fn metrics(&self) -> &[Metric] {
        &self.metrics
    }

    pub fn optimizer(&self) -> &dyn Optimizer {
        self.optimizer.as_ref()
    }

    pub fn param_count(&self) -> usize {
        self.layers.iter().map(|l| l.param_count()).sum()
    }

    pub fn describe(&self) -> ModelDescriptor {
        ModelDescriptor {
            version: ModelDescriptor::VERSION.to_string(),
            input_shape: self.input_shape.clone(),
            layers: self
                .layers
                .iter()
                .map(|l| LayerDescriptor {
                    name: l.name().to_string(),
                    config: l.config(),
                    output_shape: l.output_shape().to_vec(),
                    param_count: l.param_count(),
                })
                .collect(),
            loss: self.loss,
            optimizer: self.optimizer_config,
            metrics: self.metrics.clone(),
        }
    }

    /// 结构摘要的JSON
    pub fn summary(&self) -> Result<String, ModelError> {
        self.describe().to_json()
    }

    /// 检查`[N, *expected]`，返回样本数N
    fn check_rows(&self, x: &Tensor, expected: &[usize], what: &str) -> Result<usize, ModelError> {
        let got = x.shape();
        if got.len() != expected.len() + 1 || &got[1..] != expected {
            let mut full = vec![got.first().copied().unwrap_or(0)];
            full.extend_from_slice(expected);
            return Err(ModelError::shape(&full, got, format!("{what}形状不符")));
        }
        Ok(got[0])
    }

    fn check_pair(&self, x: &Tensor, y: &Tensor, what: &str) -> Result<usize, ModelError> {
        let n = self.check_rows(x, &self.input_shape, &format!("{what}特征"))?;
        let m = self.check_rows(y, self.output_shape(), &format!("{what}目标值"))?;
        if n != m {
            return Err(ModelError::shape(
                &[n],
                &[m],
                format!("{what}特征与目标值的样本数不一致"),
            ));
        }
        if n == 0 {
            return Err(ModelError::Config(format!("{what}数据为空")));
        }
        Ok(n)
    }

    /// 训练模型，返回逐epoch的训练历史
    ///
    /// 所有输入校验都在第一次权重更新之前完成。
    pub fn fit(
        &mut self,
        x: &Tensor,
        y: &Tensor,
        validation: Option<(&Tensor, &Tensor)>,
        options: &FitOptions,
        mut early_stopping: Option<&mut EarlyStopping>,
    ) -> Result<History, ModelError> {
        self.check_pair(x, y, "训练")?;
        if let Some((vx, vy)) = validation {
            self.check_pair(vx, vy, "验证")?;
        }
        if let Some(es) = early_stopping.as_deref_mut() {
            let monitor = es.monitor();
            if monitor.needs_validation() && validation.is_none() {
                return Err(ModelError::Config(format!(
                    "早停监控`{}`需要验证集",
                    monitor.key()
                )));
            }
            let tracks_accuracy = self.metrics.contains(&Metric::Accuracy);
            if monitor.key().ends_with("accuracy") && !tracks_accuracy {
                return Err(ModelError::Config(format!(
                    "早停监控`{}`需要在compile时加入accuracy指标",
                    monitor.key()
                )));
            }
            es.reset();
        }

        let dataset = TensorDataset::new(x, y)?;
        let loader = DataLoader::new(dataset, options.batch_size)?.shuffle(options.shuffle);
        log::debug!(
            "开始训练：{}个样本，每个epoch {}个批次",
            loader.len(),
            loader.num_batches()
        );

        let mut history = History::default();
        let mut best_weights: Option<Vec<Vec<Tensor>>> = None;
        for epoch in 0..options.epochs {
            let mut loss_sum = 0.0;
            let mut metric_sums = vec![0.0; self.metrics.len()];
            for batch in loader.iter(&mut self.rng) {
                let (bx, by) = batch?;
                let rows = bx.rows() as f32;
                let prediction = forward_train(&mut self.layers, &bx)?;
                loss_sum += self.loss.compute(&prediction, &by)? * rows;
                for (sum, metric) in metric_sums.iter_mut().zip(&self.metrics) {
                    *sum += metric.compute(&prediction, &by)? * rows;
                }
                let grad = self.loss.gradient(&prediction, &by)?;
                backward(&mut self.layers, &grad)?;
                apply_gradients(&mut self.layers, self.optimizer.as_mut());
            }

            let n = loader.len() as f32;
            history.record("loss", loss_sum / n);
            for (sum, metric) in metric_sums.iter().zip(&self.metrics) {
                history.record(metric.name(), sum / n);
            }
            if let Some((vx, vy)) = validation {
                let eval = self.evaluate(vx, vy, options.batch_size)?;
                history.record("val_loss", eval.loss);
                for (metric, value) in &eval.metrics {
                    history.record(&format!("val_{}", metric.name()), *value);
                }
            }
            history.finish_epoch();
            if options.verbosity > 0 {
                log::info!("Epoch {}/{} - {}", epoch + 1, options.epochs, epoch_line(&history));
            }

            let Some(es) = early_stopping.as_deref_mut() else {
                continue;
            };
            let value = history.last(es.monitor().key()).unwrap_or(f32::NAN);
            match es.update(epoch, value) {
                EarlyStoppingDecision::Improved if es.restores_best_weights() => {
                    best_weights = Some(self.get_weights());
                }
                EarlyStoppingDecision::Stop => {
                    history.set_stopped_epoch(epoch);
                    if options.verbosity > 0 {
                        log::info!(
                            "Epoch {}: early stopping，`{}`已连续{}个epoch未改善",
                            epoch + 1,
                            es.monitor().key(),
                            es.patience()
                        );
                    }
                    break;
                }
                _ => {}
            }
        }

        if let Some(weights) = best_weights {
            self.set_weights(weights)?;
        }
        Ok(history)
    }

    /// 推理模式下按批计算平均损失与指标
    pub fn evaluate(
        &self,
        x: &Tensor,
        y: &Tensor,
        batch_size: usize,
    ) -> Result<Evaluation, ModelError> {
        let n = self.check_pair(x, y, "评估")?;
        let dataset = TensorDataset::new(x, y)?;
        let loader = DataLoader::new(dataset, batch_size)?;
        let mut rng = StdRng::seed_from_u64(0);

        let mut loss_sum = 0.0;
        let mut metric_sums = vec![0.0; self.metrics.len()];
        for batch in loader.iter(&mut rng) {
            let (bx, by) = batch?;
            let rows = bx.rows() as f32;
            let prediction = self.forward(&bx)?;
            loss_sum += self.loss.compute(&prediction, &by)? * rows;
            for (sum, metric) in metric_sums.iter_mut().zip(&self.metrics) {
                *sum += metric.compute(&prediction, &by)? * rows;
            }
        }
        let n = n as f32;
        Ok(Evaluation {
            loss: loss_sum / n,
            metrics: self
                .metrics
                .iter()
                .zip(metric_sums)
                .map(|(&m, sum)| (m, sum / n))
                .collect(),
        })
    }

    /// 推理模式下按批前向传播，输出沿样本维拼接
    pub fn predict(&self, x: &Tensor, batch_size: usize) -> Result<Tensor, ModelError> {
        let n = self.check_rows(x, &self.input_shape, "预测特征")?;
        if batch_size == 0 {
            return Err(ModelError::Config("batch_size 必须大于 0".to_string()));
        }
        if n == 0 {
            let mut shape = vec![0];
            shape.extend_from_slice(self.output_shape());
            return Ok(Tensor::zeros(&shape));
        }

        let mut outputs: Vec<ArrayD<f32>> = Vec::with_capacity(n.div_ceil(batch_size));
        for start in (0..n).step_by(batch_size) {
            let indices: Vec<usize> = (start..(start + batch_size).min(n)).collect();
            let batch = x.select_rows(&indices)?;
            outputs.push(self.forward(&batch)?.into_array());
        }
        let views: Vec<_> = outputs.iter().map(|o| o.view()).collect();
        let output = concatenate(Axis(0), &views).map_err(|_| {
            ModelError::Config("预测输出拼接失败".to_string())
        })?;
        Ok(Tensor::from(output))
    }

    /// 单批推理前向
    pub fn forward(&self, x: &Tensor) -> Result<Tensor, ModelError> {
        let mut iter = self.layers.iter();
        let Some(first) = iter.next() else {
            return Ok(x.clone());
        };
        let mut output = first.forward(x)?;
        for layer in iter {
            output = layer.forward(&output)?;
        }
        Ok(output)
    }

    /// 各层参数的拷贝，按层顺序排列
    pub fn get_weights(&self) -> Vec<Vec<Tensor>> {
        self.layers
            .iter()
            .map(|l| l.parameters().into_iter().cloned().collect())
            .collect()
    }

    /// 整体替换各层参数；先校验全部层，任一层不符时模型保持不变
    pub fn set_weights(&mut self, weights: Vec<Vec<Tensor>>) -> Result<(), ModelError> {
        if weights.len() != self.layers.len() {
            return Err(ModelError::Config(format!(
                "权重对应{}层，模型有{}层",
                weights.len(),
                self.layers.len()
            )));
        }
        for (layer, params) in self.layers.iter().zip(&weights) {
            check_parameters(layer.name(), &layer.parameters(), params)?;
        }
        for (layer, params) in self.layers.iter_mut().zip(weights) {
            layer.set_parameters(params)?;
        }
        Ok(())
    }

    /// 以bincode格式保存全部权重
    pub fn save_weights<P: AsRef<Path>>(&self, path: P) -> Result<(), ModelError> {
        let file = WeightsFile {
            version: ModelDescriptor::VERSION.to_string(),
            layers: self
                .layers
                .iter()
                .map(|l| {
                    let params = l.parameters().into_iter().cloned().collect();
                    (l.name().to_string(), params)
                })
                .collect(),
        };
        let writer = BufWriter::new(File::create(path)?);
        bincode::serialize_into(writer, &file)?;
        Ok(())
    }

    /// 加载`save_weights`保存的权重，层名与形状须与当前模型一致
    pub fn load_weights<P: AsRef<Path>>(&mut self, path: P) -> Result<(), ModelError> {
        let reader = BufReader::new(File::open(path)?);
        let file: WeightsFile = bincode::deserialize_from(reader)?;
        if let Some((saved, layer)) = file
            .layers
            .iter()
            .zip(&self.layers)
            .find(|((name, _), layer)| name != layer.name())
        {
            return Err(ModelError::Config(format!(
                "权重文件中的层`{}`与模型中的层`{}`不对应",
                saved.0,
                layer.name()
            )));
        }
        self.set_weights(file.layers.into_iter().map(|(_, p)| p).collect())
    }
}

fn forward_train(layers: &mut [LayerEnum], x: &Tensor) -> Result<Tensor, ModelError> {
    let mut output = x.clone();
    for layer in layers.iter_mut() {
        output = layer.forward_train(&output)?;
    }
    Ok(output)
}

fn backward(layers: &mut [LayerEnum], grad: &Tensor) -> Result<(), ModelError> {
    let mut grad = grad.clone();
    for layer in layers.iter_mut().rev() {
        grad = layer.backward(&grad)?;
    }
    Ok(())
}

fn apply_gradients(layers: &mut [LayerEnum], optimizer: &mut dyn Optimizer) {
    let params = layers
        .iter_mut()
        .enumerate()
        .flat_map(|(layer, l)| {
            l.parameters_and_grads()
                .into_iter()
                .enumerate()
                .map(move |(slot, (value, grad))| (ParamId { layer, slot }, value, grad))
        })
        .collect();
    optimizer.step(params);
}

fn epoch_line(history: &History) -> String {
    history
        .keys()
        .filter_map(|k| history.last(k).map(|v| format!("{k}: {v:.4}")))
        .collect::<Vec<_>>()
        .join(" - ")
}
