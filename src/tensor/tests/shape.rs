use crate::errors::TensorError;
use crate::tensor::Tensor;

#[test]
fn test_reshape_keeps_row_major_order() {
    let t = Tensor::new(&[1.0, 2.0, 3.0, 4.0, 5.0, 6.0], &[2, 3]);
    let r = t.reshape(&[2, 3, 1]).unwrap();
    assert_eq!(r.shape(), &[2, 3, 1]);
    assert_eq!(r[[0, 2, 0]], 3.0);
    assert_eq!(r[[1, 0, 0]], 4.0);
    assert_eq!(r.reshape(&[2, 3]).unwrap(), t);
}

#[test]
fn test_reshape_incompatible() {
    let t = Tensor::zeros(&[2, 3]);
    assert_eq!(
        t.reshape(&[4]).unwrap_err(),
        TensorError::IncompatibleShape {
            from: vec![2, 3],
            to: vec![4]
        }
    );
}

#[test]
fn test_flatten_samples() {
    let t = Tensor::zeros(&[4, 5, 2]);
    assert_eq!(t.flatten_samples().unwrap().shape(), &[4, 10]);
    assert_eq!(t.flatten().shape(), &[40]);
}

#[test]
fn test_select_rows() {
    let t = Tensor::new(&[1.0, 2.0, 3.0, 4.0, 5.0, 6.0], &[3, 2]);
    let s = t.select_rows(&[2, 0]).unwrap();
    assert_eq!(s.to_vec(), vec![5.0, 6.0, 1.0, 2.0]);
    assert_eq!(
        t.select_rows(&[3]).unwrap_err(),
        TensorError::RowOutOfBounds { index: 3, len: 3 }
    );
}

#[test]
fn test_argmax_rows() {
    // [[1, 3, 2],
    //  [5, 4, 6],
    //  [7, 7, 0]]
    let t = Tensor::new(&[1.0, 3.0, 2.0, 5.0, 4.0, 6.0, 7.0, 7.0, 0.0], &[3, 3]);
    assert_eq!(t.argmax_rows().unwrap(), vec![1, 2, 0]);
    assert!(Tensor::zeros(&[3]).argmax_rows().is_err());
}
