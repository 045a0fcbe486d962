use log::trace;
use ndarray::{s, Array1, Array2, ArrayView1, ArrayView2, Zip};

use crate::forward::ForwardPass;
use crate::layers::{FeedForwardLayer, PomLayer};
use crate::params::{NetworkParams, ParameterLayout};
use crate::thresholds::thresholds_backward;

/// Probabilities are floored here before taking the log.
pub const PROBABILITY_FLOOR: f64 = 1e-5;

/// Cost value and its gradient in the flat parameter layout.
#[derive(Debug, Clone)]
pub struct CostGradient {
    pub cost: f64,
    pub gradient: Array1<f64>,
}

/// Regularized cross-entropy of the POM network over a fixed training set.
///
/// `J = (1/n) sum_i -ln P[i, y_i] + (lambda / 2n) (|W1[:, 1..]|^2 + |W2|^2)`
///
/// Biases in column 0 of `W1` and the thresholds are not regularized.
#[derive(Debug, Clone)]
pub struct PomLoss<'a> {
    layout: ParameterLayout,
    inputs: ArrayView2<'a, f64>,
    targets: ArrayView2<'a, f64>,
    regularization: f64,
}

impl<'a> PomLoss<'a> {
    /// `targets` is the one-hot label matrix, `(n x classes)`.
    pub fn new(
        layout: ParameterLayout,
        inputs: ArrayView2<'a, f64>,
        targets: ArrayView2<'a, f64>,
        regularization: f64,
    ) -> Self {
        assert_eq!(inputs.nrows(), targets.nrows(), "Inputs and targets have different sample counts");
        assert!(inputs.nrows() > 0, "Loss needs at least one sample");
        assert_eq!(inputs.ncols(), layout.inputs, "Input width does not match network layout");
        assert_eq!(targets.ncols(), layout.classes, "Target width does not match network layout");

        PomLoss {
            layout,
            inputs,
            targets,
            regularization,
        }
    }

    pub fn layout(&self) -> &ParameterLayout {
        &self.layout
    }

    fn samples(&self) -> f64 {
        self.inputs.nrows() as f64
    }

    fn forward(&self, params: &NetworkParams) -> ForwardPass {
        let theta = params.thresholds();
        ForwardPass::run(params, theta.view(), self.inputs)
    }

    fn cross_entropy(&self, probabilities: ArrayView2<f64>) -> f64 {
        let mut total = 0.0;
        Zip::from(self.targets).and(probabilities).for_each(|&y, &p| {
            if y != 0.0 {
                total -= y * p.max(PROBABILITY_FLOOR).ln();
            }
        });
        total / self.samples()
    }

    fn penalty(&self, params: &NetworkParams) -> f64 {
        let w1 = params.w1.slice(s![.., 1..]);
        let squares = w1.iter().map(|w| w * w).sum::<f64>() + params.w2.dot(&params.w2);
        self.regularization / (2.0 * self.samples()) * squares
    }

    /// Cost only, without the backward pass.
    pub fn cost(&self, flat: ArrayView1<f64>) -> f64 {
        let params = NetworkParams::unpack(&self.layout, flat);
        let pass = self.forward(&params);
        self.cross_entropy(pass.probabilities.view()) + self.penalty(&params)
    }

    pub fn cost_and_gradient(&self, flat: ArrayView1<f64>) -> CostGradient {
        let params = NetworkParams::unpack(&self.layout, flat);
        let theta = params.thresholds();
        let pass = ForwardPass::run(&params, theta.view(), self.inputs);
        let n = self.samples();

        let cost = self.cross_entropy(pass.probabilities.view()) + self.penalty(&params);

        // d(-y ln p)/dp, only on the active class of each row
        let mut grad_probs = Array2::<f64>::zeros(pass.probabilities.dim());
        Zip::from(&mut grad_probs)
            .and(self.targets)
            .and(&pass.probabilities)
            .for_each(|g, &y, &p| {
                if y != 0.0 {
                    // Below the floor the cost is flat, but the step keeps pushing p up
                    *g = -y / (p.max(PROBABILITY_FLOOR) * n);
                }
            });

        let output_layer = PomLayer::new(params.w2.view(), theta.view());
        let pom = output_layer.backward(pass.hidden.view(), pass.cumulative.view(), grad_probs.view());

        let hidden_layer = FeedForwardLayer::new(params.w1.view());
        let mut w1 = hidden_layer.backward(pass.augmented.view(), pass.hidden.view(), pom.hidden.view());

        let scale = self.regularization / n;
        w1.slice_mut(s![.., 1..])
            .scaled_add(scale, &params.w1.slice(s![.., 1..]));
        let mut w2 = pom.weights;
        w2.scaled_add(scale, &params.w2);

        let threshold_params = thresholds_backward(params.threshold_params.view(), pom.thresholds.view());

        let gradient = NetworkParams {
            w1,
            w2,
            threshold_params,
        }
        .pack(&self.layout);

        trace!("cost evaluation: {cost:.6}");

        CostGradient { cost, gradient }
    }
}
