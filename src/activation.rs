use ndarray::{Array, Dimension};

/// Logistic function, evaluated without overflowing `exp` for large |x|.
pub fn sigmoid(x: f64) -> f64 {
    if x >= 0.0 {
        1.0 / (1.0 + (-x).exp())
    } else {
        let e = x.exp();
        e / (1.0 + e)
    }
}

/// Derivative of the sigmoid expressed through its output `s = sigmoid(x)`.
pub fn sigmoid_derivative(s: f64) -> f64 {
    s * (1.0 - s)
}

pub fn sigmoid_array<D: Dimension>(z: &Array<f64, D>) -> Array<f64, D> {
    z.mapv(sigmoid)
}
