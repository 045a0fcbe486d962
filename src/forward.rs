use ndarray::{Array1, Array2, ArrayView1, ArrayView2};

use crate::layers::{FeedForwardLayer, PomLayer};
use crate::params::NetworkParams;
use crate::utils::add_bias_column;

/// Every intermediate of one forward pass, kept for backpropagation.
#[derive(Debug, Clone)]
pub struct ForwardPass {
    /// Inputs with a leading column of ones, `(n x (d + 1))`.
    pub augmented: Array2<f64>,
    /// Hidden activations, `(n x hidden)`.
    pub hidden: Array2<f64>,
    /// Latent score per sample.
    pub projection: Array1<f64>,
    /// `P(class <= j)`, `(n x classes)`, last column all ones.
    pub cumulative: Array2<f64>,
    /// `P(class == j)`, `(n x classes)`.
    pub probabilities: Array2<f64>,
}

impl ForwardPass {
    /// Runs the network on `x`. `thresholds` are the ordered cut points,
    /// not the raw threshold parameters.
    pub fn run(params: &NetworkParams, thresholds: ArrayView1<f64>, x: ArrayView2<f64>) -> Self {
        let hidden_layer = FeedForwardLayer::new(params.w1.view());
        let output_layer = PomLayer::new(params.w2.view(), thresholds);

        let augmented = add_bias_column(x);
        let hidden = hidden_layer.forward(augmented.view());
        let projection = output_layer.project(hidden.view());
        let cumulative = output_layer.cumulative(projection.view());
        let probabilities = PomLayer::class_probabilities(cumulative.view());

        ForwardPass {
            augmented,
            hidden,
            projection,
            cumulative,
            probabilities,
        }
    }

    pub fn samples(&self) -> usize {
        self.probabilities.nrows()
    }

    pub fn classes(&self) -> usize {
        self.probabilities.ncols()
    }

    /// Most probable label per sample, in `1..=classes`.
    pub fn labels(&self) -> Array1<usize> {
        argmax_labels(self.probabilities.view())
    }
}

/// Row-wise argmax, 1-based. Ties go to the lowest class.
pub fn argmax_labels(probabilities: ArrayView2<f64>) -> Array1<usize> {
    probabilities
        .rows()
        .into_iter()
        .map(|row| {
            let mut best = 0;
            for (j, &p) in row.iter().enumerate() {
                if p > row[best] {
                    best = j;
                }
            }
            best + 1
        })
        .collect()
}
