use crate::data::npy::{load_matrix, load_vector};
use crate::errors::ModelError;
use ndarray::{Array1, arr2};
use ndarray_npy::write_npy;

#[test]
fn test_load_matrix_and_vector() {
    let dir = std::env::temp_dir();
    let x_path = dir.join("kkeras_npy_matrix.npy");
    let y_path = dir.join("kkeras_npy_vector.npy");
    write_npy(&x_path, &arr2(&[[1.0f32, 2.0], [3.0, 4.0], [5.0, 6.0]])).unwrap();
    write_npy(&y_path, &Array1::from(vec![0.0f32, 1.0, 2.0])).unwrap();

    let x = load_matrix(&x_path).unwrap();
    let y = load_vector(&y_path).unwrap();
    assert_eq!(x.shape(), &[3, 2]);
    assert_eq!(x[[2, 1]], 6.0);
    assert_eq!(y.to_vec(), vec![0.0, 1.0, 2.0]);

    // 维数不符
    assert!(matches!(load_matrix(&y_path), Err(ModelError::Npy(_))));

    let _ = std::fs::remove_file(&x_path);
    let _ = std::fs::remove_file(&y_path);
}

#[test]
fn test_load_missing_file() {
    let path = std::env::temp_dir().join("kkeras_npy_missing.npy");
    assert!(load_matrix(path).is_err());
}
