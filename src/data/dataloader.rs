/*
 * @Author       : 老董
 * @Date         : 2026-02-07
 * @Description  : DataLoader - 训练循环所用的批量加载器
 *
 * 提供统一的数据迭代 API，支持：
 * - 自动分批 (batch_size)
 * - 随机打乱 (shuffle)，随机数发生器由调用方提供以便复现
 */

use crate::errors::ModelError;
use crate::tensor::Tensor;
use rand::Rng;
use rand::seq::SliceRandom;

/// TensorDataset - 借用特征和标签的数据集
///
/// # 示例
/// ```ignore
/// let dataset = TensorDataset::new(&features, &labels)?;
/// println!("样本数: {}", dataset.len());
/// ```
#[derive(Debug, Clone, Copy)]
pub struct TensorDataset<'a> {
    features: &'a Tensor,
    labels: &'a Tensor,
}

impl<'a> TensorDataset<'a> {
    /// `features`与`labels`的首维（样本数）须一致
    pub fn new(features: &'a Tensor, labels: &'a Tensor) -> Result<Self, ModelError> {
        if features.dimension() == 0 || labels.dimension() == 0 || features.rows() != labels.rows()
        {
            return Err(ModelError::shape(
                &[features.rows()],
                &[labels.rows()],
                "特征与标签的样本数必须一致",
            ));
        }
        Ok(Self { features, labels })
    }

    pub fn len(&self) -> usize {
        self.features.rows()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    pub fn features(&self) -> &'a Tensor {
        self.features
    }

    pub fn labels(&self) -> &'a Tensor {
        self.labels
    }
}

/// DataLoader - 数据批量加载器
///
/// # 示例
/// ```ignore
/// let loader = DataLoader::new(dataset, 32)?.shuffle(true);
/// for batch in loader.iter(&mut rng) {
///     let (x_batch, y_batch) = batch?;
///     ...
/// }
/// ```
#[derive(Debug, Clone)]
pub struct DataLoader<'a> {
    dataset: TensorDataset<'a>,
    batch_size: usize,
    shuffle: bool,
}

impl<'a> DataLoader<'a> {
    pub fn new(dataset: TensorDataset<'a>, batch_size: usize) -> Result<Self, ModelError> {
        if batch_size == 0 {
            return Err(ModelError::Config("batch_size 必须大于 0".to_string()));
        }
        Ok(Self {
            dataset,
            batch_size,
            shuffle: false,
        })
    }

    pub fn shuffle(mut self, shuffle: bool) -> Self {
        self.shuffle = shuffle;
        self
    }

    pub fn num_batches(&self) -> usize {
        self.dataset.len().div_ceil(self.batch_size)
    }

    pub fn len(&self) -> usize {
        self.dataset.len()
    }

    pub fn is_empty(&self) -> bool {
        self.dataset.is_empty()
    }

    /// 创建一轮（epoch）的批次迭代器
    pub fn iter<R: Rng + ?Sized>(&self, rng: &mut R) -> DataLoaderIterator<'_, 'a> {
        let mut indices: Vec<usize> = (0..self.dataset.len()).collect();
        if self.shuffle {
            indices.shuffle(rng);
        }
        DataLoaderIterator {
            loader: self,
            indices,
            current_batch: 0,
        }
    }
}

/// DataLoader 迭代器
pub struct DataLoaderIterator<'l, 'a> {
    loader: &'l DataLoader<'a>,
    indices: Vec<usize>,
    current_batch: usize,
}

impl Iterator for DataLoaderIterator<'_, '_> {
    type Item = Result<(Tensor, Tensor), ModelError>;

    fn next(&mut self) -> Option<Self::Item> {
        let n = self.indices.len();
        let batch_size = self.loader.batch_size;
        let start = self.current_batch * batch_size;
        if start >= n {
            return None;
        }
        let end = (start + batch_size).min(n);
        self.current_batch += 1;

        let batch_indices = &self.indices[start..end];
        let dataset = &self.loader.dataset;
        let batch = dataset
            .features
            .select_rows(batch_indices)
            .and_then(|x| Ok((x, dataset.labels.select_rows(batch_indices)?)))
            .map_err(ModelError::from);
        Some(batch)
    }
}
