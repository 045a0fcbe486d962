//! Ordinal regression with a single-hidden-layer neural network and a
//! proportional odds (POM) output layer.

mod activation;
mod error;
mod forward;
mod hyperparameters;
pub mod layers;
mod loss;
mod model;
mod optimizer;
mod params;
mod thresholds;
mod utils;

pub use activation::{sigmoid, sigmoid_derivative};
pub use error::{OrdinalError, Result};
pub use forward::{argmax_labels, ForwardPass};
pub use hyperparameters::Hyperparameters;
pub use loss::{CostGradient, PomLoss, PROBABILITY_FLOOR};
pub use model::{FittedState, Model, Prediction, TrainingReport};
pub use optimizer::{GradientDescent, IRpropPlus, Minimum, Objective, Optimizer};
pub use params::{NetworkParams, ParameterLayout};
pub use thresholds::{thresholds, thresholds_backward};
pub use utils::{add_bias_column, class_count, one_hot};
