use ndarray::{Array2, ArrayView2};

use crate::activation::{sigmoid_array, sigmoid_derivative};

/// Sigmoid hidden layer over bias-augmented inputs.
#[derive(Debug, Clone, Copy)]
pub struct FeedForwardLayer<'a> {
    /// `(neurons x (inputs + 1))`, bias in column 0.
    pub weights: ArrayView2<'a, f64>,
}

impl<'a> FeedForwardLayer<'a> {
    pub fn new(weights: ArrayView2<'a, f64>) -> Self {
        assert!(weights.ncols() >= 1, "Hidden weights need a bias column");
        FeedForwardLayer { weights }
    }

    pub fn inputs(&self) -> usize {
        self.weights.ncols() - 1
    }

    pub fn neurons(&self) -> usize {
        self.weights.nrows()
    }

    /// `sigmoid(A1 . W1^T)` for augmented inputs `A1` of shape `(n x (inputs + 1))`.
    pub fn forward(&self, augmented: ArrayView2<f64>) -> Array2<f64> {
        assert_eq!(
            augmented.ncols(),
            self.weights.ncols(),
            "Input size does not match layer's input size"
        );

        sigmoid_array(&augmented.dot(&self.weights.t()))
    }

    /// Gradient of the cost with respect to the weights, given the cost
    /// gradient `grad_output` with respect to this layer's activations.
    pub fn backward(
        &self,
        augmented: ArrayView2<f64>,
        activations: ArrayView2<f64>,
        grad_output: ArrayView2<f64>,
    ) -> Array2<f64> {
        assert_eq!(
            activations.dim(),
            grad_output.dim(),
            "Activation and gradient shapes differ"
        );

        let dlayer = &grad_output * &activations.mapv(sigmoid_derivative);
        dlayer.t().dot(&augmented)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use ndarray::array;

    #[test]
    fn test_forward_uses_bias_column() {
        // Zero input weights, bias only
        let weights = array![[2.0, 0.0], [-2.0, 0.0]];
        let layer = FeedForwardLayer::new(weights.view());
        let augmented = array![[1.0, 5.0], [1.0, -3.0]];

        let out = layer.forward(augmented.view());

        assert_eq!(layer.inputs(), 1);
        assert_eq!(layer.neurons(), 2);
        assert_eq!(out.dim(), (2, 2));
        assert_eq!(out[[0, 0]], out[[1, 0]]);
        assert!((out[[0, 0]] + out[[0, 1]] - 1.0).abs() < 1e-12);
    }

    #[test]
    fn test_backward_shape() {
        let weights = array![[0.1, 0.2, 0.3]];
        let layer = FeedForwardLayer::new(weights.view());
        let augmented = array![[1.0, 1.0, 2.0], [1.0, 0.5, -1.0]];
        let activations = layer.forward(augmented.view());
        let upstream = array![[1.0], [1.0]];

        let grad = layer.backward(augmented.view(), activations.view(), upstream.view());

        assert_eq!(grad.dim(), (1, 3));
        // Bias gradient is the sum of the sigmoid derivatives
        let expected_bias: f64 = activations.iter().map(|&a| a * (1.0 - a)).sum();
        assert!((grad[[0, 0]] - expected_bias).abs() < 1e-12);
    }

    #[test]
    #[should_panic(expected = "Input size does not match layer's input size")]
    fn test_forward_invalid_input_size() {
        let weights = array![[0.1, 0.2, 0.3]];
        let layer = FeedForwardLayer::new(weights.view());
        layer.forward(array![[1.0, 2.0]].view());
    }
}
