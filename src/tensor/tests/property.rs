use crate::errors::TensorError;
use crate::tensor::Tensor;

#[test]
fn test_new_and_shape() {
    let t = Tensor::new(&[1.0, 2.0, 3.0, 4.0, 5.0, 6.0], &[2, 3]);
    assert_eq!(t.shape(), &[2, 3]);
    assert_eq!(t.dimension(), 2);
    assert_eq!(t.size(), 6);
    assert_eq!(t.rows(), 2);
    assert_eq!(t[[1, 0]], 4.0);
}

#[test]
fn test_try_new_len_mismatch() {
    let err = Tensor::try_new(&[1.0, 2.0, 3.0], &[2, 2]).unwrap_err();
    assert_eq!(
        err,
        TensorError::DataLenMismatch {
            data_len: 3,
            shape: vec![2, 2]
        }
    );
}

#[test]
#[should_panic(expected = "数据长度3与形状[2, 2]不符")]
fn test_new_panics_on_len_mismatch() {
    let _ = Tensor::new(&[1.0, 2.0, 3.0], &[2, 2]);
}

#[test]
fn test_number_and_scalar() {
    assert_eq!(Tensor::new(&[7.0], &[1, 1]).number(), Some(7.0));
    assert_eq!(Tensor::from(3.5).number(), Some(3.5));
    assert_eq!(Tensor::zeros(&[2]).number(), None);
}

#[test]
fn test_from_rows() {
    let t = Tensor::from_rows(&[vec![1.0, 2.0], vec![3.0, 4.0], vec![5.0, 6.0]]).unwrap();
    assert_eq!(t.shape(), &[3, 2]);
    assert_eq!(t.to_vec(), vec![1.0, 2.0, 3.0, 4.0, 5.0, 6.0]);

    assert_eq!(Tensor::from_rows(&[]).unwrap_err(), TensorError::EmptyList);
    assert!(Tensor::from_rows(&[vec![1.0], vec![1.0, 2.0]]).is_err());
}

#[test]
fn test_view_dimensionality() {
    let t = Tensor::zeros(&[2, 3, 1]);
    assert!(t.view_3d().is_ok());
    assert_eq!(
        t.view_2d().unwrap_err(),
        TensorError::DimensionMismatch {
            expected: 2,
            got: 3
        }
    );
}
