//! # kkeras
//!
//! `kkeras`用纯rust提供几种预置的小型神经网络：多层感知机分类/回归网络，
//! 以及一维卷积分类网络（可选地为卷积层命名并在训练后读取其权重）。
//!
//! 每种网络都遵循同样的流程：按层尺寸列表构建 → `fit()`（带早停）→ `score()`/`predict()`。
//! 未训练的网络在类型上就不提供`score()`与`predict()`。
//!
//! ```
//! use kkeras::models::{Classifier, ConvParams, FitConfig, LayerSizes};
//! use kkeras::tensor::Tensor;
//!
//! let sizes = LayerSizes::new(vec![4, 6, 2])?;
//! let clf = Classifier::with_seed(
//!     kkeras::models::Architecture::ConvolutionalNamed(ConvParams::default()),
//!     sizes,
//!     7,
//! )?;
//! let x = Tensor::new(&[0.0, 0.1, 0.0, 0.2, 1.0, 0.9, 1.0, 0.8], &[2, 4]);
//! let y = Tensor::new(&[0.0, 1.0], &[2]);
//! let fitted = clf.fit(&x, &y, &x, &y, &FitConfig::default())?;
//! let (kernel, bias) = fitted.conv_weights()?;
//! assert_eq!(kernel.shape(), &[3, 1, 2]);
//! assert_eq!(bias.shape(), &[2]);
//! # Ok::<(), kkeras::errors::ModelError>(())
//! ```

pub mod data;
pub mod errors;
pub mod metrics;
pub mod models;
pub mod nn;
pub mod tensor;
