//! transforms 模块单元测试

use crate::data::transforms::{check_label_range, class_indices, infer_num_classes, one_hot};
use crate::errors::ModelError;
use crate::tensor::Tensor;

#[test]
fn test_one_hot_basic() {
    let encoded = one_hot(&[0, 2, 1], 3).unwrap();

    assert_eq!(encoded.shape(), &[3, 3]);
    // 类别 0 -> [1, 0, 0]
    assert_eq!(encoded[[0, 0]], 1.0);
    assert_eq!(encoded[[0, 1]], 0.0);
    // 类别 2 -> [0, 0, 1]
    assert_eq!(encoded[[1, 2]], 1.0);
    // 类别 1 -> [0, 1, 0]
    assert_eq!(encoded[[2, 1]], 1.0);

    for i in 0..3 {
        let row_sum: f32 = (0..3).map(|j| encoded[[i, j]]).sum();
        assert_eq!(row_sum, 1.0);
    }
}

#[test]
fn test_one_hot_then_argmax_restores_labels() {
    let labels = vec![0, 5, 9, 3, 3, 7, 0, 1];
    let encoded = one_hot(&labels, 10).unwrap();
    assert_eq!(encoded.argmax_rows().unwrap(), labels);
}

#[test]
fn test_one_hot_rejects_out_of_range() {
    assert!(matches!(
        one_hot(&[0, 3], 3),
        Err(ModelError::LabelRange(_))
    ));
}

#[test]
fn test_class_indices_accepts_vector_and_column() {
    let vector = Tensor::new(&[0.0, 2.0, 1.0], &[3]);
    let column = Tensor::new(&[0.0, 2.0, 1.0], &[3, 1]);
    assert_eq!(class_indices(&vector).unwrap(), vec![0, 2, 1]);
    assert_eq!(class_indices(&column).unwrap(), vec![0, 2, 1]);
}

#[test]
fn test_class_indices_rejects_negative_and_fractional() {
    let negative = Tensor::new(&[0.0, -1.0], &[2]);
    let fractional = Tensor::new(&[0.5, 1.0], &[2]);
    assert!(matches!(
        class_indices(&negative),
        Err(ModelError::LabelRange(_))
    ));
    assert!(matches!(
        class_indices(&fractional),
        Err(ModelError::LabelRange(_))
    ));
}

#[test]
fn test_class_indices_rejects_matrix() {
    let matrix = Tensor::zeros(&[3, 2]);
    assert!(matches!(
        class_indices(&matrix),
        Err(ModelError::Shape { .. })
    ));
}

#[test]
fn test_infer_and_check_num_classes() {
    assert_eq!(infer_num_classes(&[1, 4, 2]), Some(5));
    assert_eq!(infer_num_classes(&[]), None);
    assert!(check_label_range(&[1, 4, 2], 5).is_ok());
    assert!(matches!(
        check_label_range(&[1, 4, 2], 4),
        Err(ModelError::LabelRange(_))
    ));
}

#[test]
fn test_class_indices_rejects_huge_label() {
    let huge = Tensor::new(&[0.0, 1e20], &[2]);
    assert!(matches!(
        class_indices(&huge),
        Err(ModelError::LabelRange(_))
    ));
    assert_eq!(infer_num_classes(&[usize::MAX]), None);
}
