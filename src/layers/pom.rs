//! Proportional odds output layer.
//!
//! A single linear neuron projects each sample onto the latent line. The
//! cumulative probability of class `<= j` is `sigmoid(theta[j] - projection)`,
//! and class probabilities are first differences of the cumulative ones.

use ndarray::{s, Array1, Array2, ArrayView1, ArrayView2, Axis};

use crate::activation::{sigmoid, sigmoid_derivative};

#[derive(Debug, Clone, Copy)]
pub struct PomLayer<'w, 't> {
    /// One weight per hidden neuron, no bias (the thresholds absorb it).
    pub weights: ArrayView1<'w, f64>,
    /// Ordered cut points, `classes - 1` of them.
    pub thresholds: ArrayView1<'t, f64>,
}

/// Cost gradients produced by [`PomLayer::backward`].
#[derive(Debug, Clone)]
pub struct PomGradients {
    pub hidden: Array2<f64>,
    pub weights: Array1<f64>,
    pub thresholds: Array1<f64>,
}

impl<'w, 't> PomLayer<'w, 't> {
    pub fn new(weights: ArrayView1<'w, f64>, thresholds: ArrayView1<'t, f64>) -> Self {
        assert!(!thresholds.is_empty(), "POM layer needs at least one threshold");
        PomLayer { weights, thresholds }
    }

    pub fn classes(&self) -> usize {
        self.thresholds.len() + 1
    }

    /// Latent position of each sample.
    pub fn project(&self, hidden: ArrayView2<f64>) -> Array1<f64> {
        assert_eq!(
            hidden.ncols(),
            self.weights.len(),
            "Input size does not match layer's input size"
        );
        hidden.dot(&self.weights)
    }

    /// `(n x classes)` matrix of `P(class <= j)`; the last column is all ones.
    pub fn cumulative(&self, projection: ArrayView1<f64>) -> Array2<f64> {
        let k = self.classes();
        Array2::from_shape_fn((projection.len(), k), |(i, j)| {
            if j + 1 == k {
                1.0
            } else {
                sigmoid(self.thresholds[j] - projection[i])
            }
        })
    }

    /// Differences adjacent cumulative columns into class probabilities.
    pub fn class_probabilities(cumulative: ArrayView2<f64>) -> Array2<f64> {
        let mut probs = cumulative.to_owned();
        for j in (1..cumulative.ncols()).rev() {
            let prev = cumulative.column(j - 1);
            let mut col = probs.column_mut(j);
            col -= &prev;
        }
        probs
    }

    /// Backpropagates `grad_probs`, the cost gradient with respect to the class
    /// probabilities, through the differencing, the cumulative sigmoids and the
    /// projection.
    pub fn backward(
        &self,
        hidden: ArrayView2<f64>,
        cumulative: ArrayView2<f64>,
        grad_probs: ArrayView2<f64>,
    ) -> PomGradients {
        let k = self.classes();
        assert_eq!(grad_probs.dim(), cumulative.dim(), "Probability gradient shape mismatch");
        assert_eq!(cumulative.ncols(), k, "Cumulative matrix has wrong class count");

        // P[:, j] = C[:, j] - C[:, j - 1], so dC[:, j] = dP[:, j] - dP[:, j + 1].
        // The constant last column carries no gradient.
        let grad_cum = &grad_probs.slice(s![.., ..k - 1]) - &grad_probs.slice(s![.., 1..]);

        // Through sigmoid(theta - projection).
        let delta = &grad_cum * &cumulative.slice(s![.., ..k - 1]).mapv(sigmoid_derivative);

        let thresholds = delta.sum_axis(Axis(0));
        let grad_projection = -delta.sum_axis(Axis(1));

        let weights = hidden.t().dot(&grad_projection);
        let hidden_grad = grad_projection
            .view()
            .insert_axis(Axis(1))
            .dot(&self.weights.view().insert_axis(Axis(0)));

        PomGradients {
            hidden: hidden_grad,
            weights,
            thresholds,
        }
    }
}
