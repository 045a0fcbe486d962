use log::{info, warn};
use ndarray::{Array1, Array2, ArrayView1, ArrayView2};
use rand::Rng;

use crate::error::{OrdinalError, Result};
use crate::forward::ForwardPass;
use crate::hyperparameters::Hyperparameters;
use crate::loss::PomLoss;
use crate::optimizer::{IRpropPlus, Optimizer};
use crate::params::{NetworkParams, ParameterLayout};
use crate::utils::{check_finite, class_count, one_hot};

/// Latent scores and discrete labels for a batch of samples.
#[derive(Debug, Clone, PartialEq)]
pub struct Prediction {
    pub projections: Array1<f64>,
    /// Labels in `1..=classes`.
    pub labels: Array1<usize>,
}

/// How the optimizer run that produced the fitted weights ended.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct TrainingReport {
    pub cost: f64,
    pub iterations: usize,
    pub converged: bool,
}

/// Everything a successful fit leaves behind.
#[derive(Debug, Clone)]
pub struct FittedState {
    pub params: NetworkParams,
    pub thresholds: Array1<f64>,
    pub classes: usize,
    pub inputs: usize,
    pub samples: usize,
    pub report: TrainingReport,
}

/// Neural network ordinal regressor with a proportional odds output layer.
///
/// One sigmoid hidden layer feeds a single linear output neuron whose value is
/// compared against `classes - 1` ordered thresholds.
#[derive(Debug, Clone, Default)]
pub struct Model {
    hyperparameters: Hyperparameters,
    fitted: Option<FittedState>,
}

impl Model {
    pub fn new(hyperparameters: Hyperparameters) -> Self {
        Model {
            hyperparameters,
            fitted: None,
        }
    }

    pub fn hyperparameters(&self) -> &Hyperparameters {
        &self.hyperparameters
    }

    pub fn is_fitted(&self) -> bool {
        self.fitted.is_some()
    }

    pub fn fitted(&self) -> Option<&FittedState> {
        self.fitted.as_ref()
    }

    pub fn report(&self) -> Option<TrainingReport> {
        self.fitted.as_ref().map(|state| state.report)
    }

    pub fn thresholds(&self) -> Option<ArrayView1<'_, f64>> {
        self.fitted.as_ref().map(|state| state.thresholds.view())
    }

    pub fn num_classes(&self) -> Option<usize> {
        self.fitted.as_ref().map(|state| state.classes)
    }

    pub fn num_features(&self) -> Option<usize> {
        self.fitted.as_ref().map(|state| state.inputs)
    }

    pub fn num_samples(&self) -> Option<usize> {
        self.fitted.as_ref().map(|state| state.samples)
    }

    /// Fits with the default iRprop+ optimizer.
    ///
    /// See [`Model::fit_with`].
    pub fn fit<R: Rng + ?Sized>(
        &mut self,
        x: ArrayView2<f64>,
        y: ArrayView1<usize>,
        rng: &mut R,
    ) -> Result<Prediction> {
        self.fit_with(x, y, &IRpropPlus::default(), rng)
    }

    /// Trains the network on `x` with labels `y` in `1..=K` and returns the
    /// predictions for the training samples.
    ///
    /// Initial weights come from `rng`. Whatever parameters the optimizer
    /// ends with are kept, converged or not; the outcome is available from
    /// [`Model::report`]. On error the previous fitted state is untouched.
    pub fn fit_with<R: Rng + ?Sized>(
        &mut self,
        x: ArrayView2<f64>,
        y: ArrayView1<usize>,
        optimizer: &dyn Optimizer,
        rng: &mut R,
    ) -> Result<Prediction> {
        let hp = self.hyperparameters;
        hp.validate()?;

        if x.nrows() == 0 {
            return Err(OrdinalError::EmptyDataset);
        }
        if x.nrows() != y.len() {
            return Err(OrdinalError::SampleCountMismatch {
                features: x.nrows(),
                labels: y.len(),
            });
        }
        check_finite(x)?;
        let classes = class_count(y)?;

        let layout = ParameterLayout::new(x.ncols(), hp.hidden_neurons, classes);
        let targets = one_hot(y, classes);
        let initial = NetworkParams::random(&layout, hp.weight_init_range, rng)?.pack(&layout);

        info!(
            "fitting POM network: {} samples, {} features, {} classes, {} hidden neurons, {} parameters",
            x.nrows(),
            x.ncols(),
            classes,
            hp.hidden_neurons,
            layout.len()
        );

        let loss = PomLoss::new(layout.clone(), x.reborrow(), targets.view(), hp.regularization);
        let minimum = optimizer.minimize(
            &mut |params: ArrayView1<f64>| loss.cost_and_gradient(params),
            initial,
            hp.max_iterations,
        );

        let report = TrainingReport {
            cost: minimum.cost,
            iterations: minimum.iterations,
            converged: minimum.converged,
        };
        if report.converged {
            info!("converged after {} iterations, cost {:.6}", report.iterations, report.cost);
        } else {
            warn!(
                "iteration budget of {} exhausted without convergence, keeping final parameters (cost {:.6})",
                report.iterations, report.cost
            );
        }

        let params = NetworkParams::unpack(&layout, minimum.params.view());
        let thresholds = params.thresholds();
        let pass = ForwardPass::run(&params, thresholds.view(), x);
        let prediction = Prediction {
            labels: pass.labels(),
            projections: pass.projection,
        };

        self.fitted = Some(FittedState {
            params,
            thresholds,
            classes,
            inputs: x.ncols(),
            samples: x.nrows(),
            report,
        });

        Ok(prediction)
    }

    /// Projections and most probable labels for `x`.
    pub fn predict(&self, x: ArrayView2<f64>) -> Result<Prediction> {
        let pass = self.forward(x)?;
        Ok(Prediction {
            labels: pass.labels(),
            projections: pass.projection,
        })
    }

    /// Class membership probabilities, `(m x classes)`.
    pub fn predict_proba(&self, x: ArrayView2<f64>) -> Result<Array2<f64>> {
        Ok(self.forward(x)?.probabilities)
    }

    fn forward(&self, x: ArrayView2<f64>) -> Result<ForwardPass> {
        let state = self.fitted.as_ref().ok_or(OrdinalError::NotFitted)?;
        if x.ncols() != state.inputs {
            return Err(OrdinalError::FeatureDimensionMismatch {
                expected: state.inputs,
                got: x.ncols(),
            });
        }
        check_finite(x)?;

        Ok(ForwardPass::run(&state.params, state.thresholds.view(), x))
    }
}
