use std::ops::Range;

use ndarray::{s, Array1, Array2, ArrayView1};
use rand::Rng;
use rand_distr::{Distribution, Uniform};

use crate::error::{OrdinalError, Result};
use crate::thresholds::thresholds;

/// Maps the flat optimizer vector onto the three weight groups.
///
/// Layout is `[W1 | W2 | t]`, each group in row-major order:
/// `W1` is `hidden x (inputs + 1)` with the bias in column 0, `W2` has one
/// weight per hidden neuron, `t` holds the `classes - 1` raw thresholds.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ParameterLayout {
    pub inputs: usize,
    pub hidden: usize,
    pub classes: usize,
    pub w1: Range<usize>,
    pub w2: Range<usize>,
    pub thresholds: Range<usize>,
}

impl ParameterLayout {
    pub fn new(inputs: usize, hidden: usize, classes: usize) -> Self {
        assert!(classes >= 2, "At least two classes are required");

        let w1_len = hidden * (inputs + 1);
        let w1 = 0..w1_len;
        let w2 = w1.end..w1.end + hidden;
        let thresholds = w2.end..w2.end + classes - 1;

        ParameterLayout {
            inputs,
            hidden,
            classes,
            w1,
            w2,
            thresholds,
        }
    }

    /// Total number of scalars in the flat vector.
    pub fn len(&self) -> usize {
        self.thresholds.end
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    pub fn w1_shape(&self) -> (usize, usize) {
        (self.hidden, self.inputs + 1)
    }
}

/// The three weight groups of the network.
#[derive(Debug, Clone, PartialEq)]
pub struct NetworkParams {
    /// Hidden layer weights, bias in column 0.
    pub w1: Array2<f64>,
    /// Output weights, one per hidden neuron, no bias.
    pub w2: Array1<f64>,
    /// Unconstrained threshold parameters.
    pub threshold_params: Array1<f64>,
}

impl NetworkParams {
    /// Draws every weight uniformly from `[-range, range]`.
    pub fn random<R: Rng + ?Sized>(layout: &ParameterLayout, range: f64, rng: &mut R) -> Result<Self> {
        let dist = Uniform::new_inclusive(-range, range).map_err(|e| {
            OrdinalError::InvalidHyperparameter {
                name: "weight_init_range",
                reason: e.to_string(),
            }
        })?;

        let w1 = Array2::from_shape_fn(layout.w1_shape(), |_| dist.sample(&mut *rng));
        let w2 = Array1::from_shape_fn(layout.hidden, |_| dist.sample(&mut *rng));
        let threshold_params = Array1::from_shape_fn(layout.classes - 1, |_| dist.sample(&mut *rng));

        Ok(NetworkParams {
            w1,
            w2,
            threshold_params,
        })
    }

    /// Rebuilds the weight groups from a flat vector.
    ///
    /// Panics when the vector does not have exactly `layout.len()` elements:
    /// that means optimizer state and model shape went out of sync.
    pub fn unpack(layout: &ParameterLayout, flat: ArrayView1<f64>) -> Self {
        assert_eq!(
            flat.len(),
            layout.len(),
            "Parameter vector length does not match network layout"
        );

        let cols = layout.inputs + 1;
        let w1 = Array2::from_shape_fn(layout.w1_shape(), |(r, c)| flat[layout.w1.start + r * cols + c]);
        let w2 = flat.slice(s![layout.w2.clone()]).to_owned();
        let threshold_params = flat.slice(s![layout.thresholds.clone()]).to_owned();

        NetworkParams {
            w1,
            w2,
            threshold_params,
        }
    }

    /// Flattens the weight groups in the order `unpack` reads them.
    pub fn pack(&self, layout: &ParameterLayout) -> Array1<f64> {
        assert_eq!(self.w1.dim(), layout.w1_shape(), "W1 shape does not match network layout");
        assert_eq!(self.w2.len(), layout.hidden, "W2 length does not match network layout");
        assert_eq!(
            self.threshold_params.len(),
            layout.classes - 1,
            "Threshold count does not match network layout"
        );

        let mut flat = Array1::zeros(layout.len());
        flat.slice_mut(s![layout.w1.clone()])
            .iter_mut()
            .zip(self.w1.iter())
            .for_each(|(dst, &src)| *dst = src);
        flat.slice_mut(s![layout.w2.clone()]).assign(&self.w2);
        flat.slice_mut(s![layout.thresholds.clone()])
            .assign(&self.threshold_params);
        flat
    }

    /// Ordered thresholds derived from the raw threshold parameters.
    pub fn thresholds(&self) -> Array1<f64> {
        thresholds(self.threshold_params.view())
    }
}
