use serde::{Deserialize, Serialize};

use crate::error::{OrdinalError, Result};

/// Hyperparameters of one fit. Missing fields deserialize to their defaults.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Hyperparameters {
    /// Initial weights are drawn from `[-weight_init_range, weight_init_range]`
    pub weight_init_range: f64,

    /// Number of hidden neurons
    pub hidden_neurons: usize,

    /// Iteration budget handed to the optimizer
    pub max_iterations: usize,

    /// L2 regularization strength
    pub regularization: f64,
}

impl Default for Hyperparameters {
    fn default() -> Self {
        Hyperparameters {
            weight_init_range: 0.5,
            hidden_neurons: 50,
            max_iterations: 500,
            regularization: 0.01,
        }
    }
}

impl Hyperparameters {
    pub fn validate(&self) -> Result<()> {
        if !(self.weight_init_range.is_finite() && self.weight_init_range > 0.0) {
            return Err(invalid("weight_init_range", "must be finite and > 0"));
        }
        if self.hidden_neurons == 0 {
            return Err(invalid("hidden_neurons", "must be > 0"));
        }
        if self.max_iterations == 0 {
            return Err(invalid("max_iterations", "must be > 0"));
        }
        if !(self.regularization.is_finite() && self.regularization >= 0.0) {
            return Err(invalid("regularization", "must be finite and >= 0"));
        }
        Ok(())
    }
}

fn invalid(name: &'static str, reason: &str) -> OrdinalError {
    OrdinalError::InvalidHyperparameter {
        name,
        reason: reason.to_owned(),
    }
}
