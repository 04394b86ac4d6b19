use crate::nn::layer::{Layer, LayerEnum};
use crate::tensor::Tensor;


/// 以`sum(output ⊙ upstream)`为目标函数，用中心差分估计对输入的梯度
fn numeric_input_grad(layer: &LayerEnum, x: &Tensor, upstream: &Tensor) -> Tensor {
    let eps = 1e-2;
    let objective = |input: &Tensor| -> f32 {
        let out = layer.forward(input).unwrap();
        (out.as_array() * upstream.as_array()).sum()
    };
    let mut grad = Tensor::zeros(x.shape());
    let flat_len = x.size();
    for i in 0..flat_len {
        let mut plus = x.clone();
        let mut minus = x.clone();
        plus.as_array_mut().as_slice_mut().unwrap()[i] += eps;
        minus.as_array_mut().as_slice_mut().unwrap()[i] -= eps;
        grad.as_array_mut().as_slice_mut().unwrap()[i] =
            (objective(&plus) - objective(&minus)) / (2.0 * eps);
    }
    grad
}

/// 对第`slot`个参数做同样的中心差分
fn numeric_param_grad(layer: &LayerEnum, slot: usize, x: &Tensor, upstream: &Tensor) -> Tensor {
    let eps = 1e-2;
    let base: Vec<Tensor> = layer.parameters().into_iter().cloned().collect();
    let objective = |params: Vec<Tensor>| -> f32 {
        let mut shifted = layer.clone();
        shifted.set_parameters(params).unwrap();
        let out = shifted.forward(x).unwrap();
        (out.as_array() * upstream.as_array()).sum()
    };
    let mut grad = Tensor::zeros(base[slot].shape());
    for i in 0..base[slot].size() {
        let mut plus = base.clone();
        let mut minus = base.clone();
        plus[slot].as_array_mut().as_slice_mut().unwrap()[i] += eps;
        minus[slot].as_array_mut().as_slice_mut().unwrap()[i] -= eps;
        grad.as_array_mut().as_slice_mut().unwrap()[i] =
            (objective(plus) - objective(minus)) / (2.0 * eps);
    }
    grad
}

fn assert_close(actual: &Tensor, expected: &Tensor, tol: f32) {
    assert_eq!(actual.shape(), expected.shape());
    for (a, e) in actual.to_vec().iter().zip(expected.to_vec()) {
        approx::assert_abs_diff_eq!(*a, e, epsilon = tol);
    }
}
