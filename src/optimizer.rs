//! Gradient-based minimizers the trainer can drive.
//!
//! The trainer only relies on [`Optimizer::minimize`]; the algorithm behind
//! it is interchangeable.

use log::debug;
use ndarray::{Array1, ArrayView1, Zip};
use serde::{Deserialize, Serialize};

use crate::loss::CostGradient;

/// Objective callback: parameters in, cost and same-shaped gradient out.
pub type Objective<'a> = dyn FnMut(ArrayView1<f64>) -> CostGradient + 'a;

/// Outcome of a minimization run.
#[derive(Debug, Clone)]
pub struct Minimum {
    /// Terminal parameter vector.
    pub params: Array1<f64>,
    /// Objective value at `params`.
    pub cost: f64,
    /// Gradient evaluations spent by the search loop.
    pub iterations: usize,
    /// `false` when the iteration budget ran out first.
    pub converged: bool,
}

pub trait Optimizer {
    /// Minimizes `objective` starting at `initial`, evaluating it at most
    /// `max_iterations` times inside the search loop.
    fn minimize(
        &self,
        objective: &mut Objective<'_>,
        initial: Array1<f64>,
        max_iterations: usize,
    ) -> Minimum;
}

/// Improved resilient backpropagation with weight backtracking (iRprop+).
///
/// Each parameter keeps its own step size, grown while its gradient keeps the
/// same sign and shrunk when the sign flips. On a flip the previous move is
/// undone if the cost went up. Only gradient signs are used.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct IRpropPlus {
    pub eta_plus: f64,
    pub eta_minus: f64,
    pub initial_step: f64,
    pub min_step: f64,
    pub max_step: f64,
    /// Stop once every gradient component is below this in magnitude.
    pub gradient_tolerance: f64,
    /// Iterations between progress lines at debug level.
    pub log_every: usize,
}

impl Default for IRpropPlus {
    fn default() -> Self {
        IRpropPlus {
            eta_plus: 1.2,
            eta_minus: 0.5,
            initial_step: 0.0125,
            min_step: 0.0,
            max_step: 50.0,
            gradient_tolerance: 1e-10,
            log_every: 50,
        }
    }
}

impl Optimizer for IRpropPlus {
    fn minimize(
        &self,
        objective: &mut Objective<'_>,
        initial: Array1<f64>,
        max_iterations: usize,
    ) -> Minimum {
        let n = initial.len();
        let mut params = initial;
        let mut steps = Array1::from_elem(n, self.initial_step);
        let mut prev_grad = Array1::<f64>::zeros(n);
        let mut prev_move = Array1::<f64>::zeros(n);
        let mut prev_cost = f64::INFINITY;

        for iteration in 0..max_iterations {
            let CostGradient { cost, gradient } = objective(params.view());

            if self.log_every > 0 && iteration % self.log_every == 0 {
                debug!("iRprop+ iteration {iteration}: cost {cost:.6}");
            }

            if max_abs(gradient.view()) < self.gradient_tolerance {
                debug!("iRprop+ converged after {} iterations", iteration + 1);
                return Minimum {
                    params,
                    cost,
                    iterations: iteration + 1,
                    converged: true,
                };
            }

            let cost_increased = cost > prev_cost;
            Zip::from(&mut params)
                .and(&gradient)
                .and(&mut steps)
                .and(&mut prev_grad)
                .and(&mut prev_move)
                .for_each(|w, &g, step, pg, pm| {
                    let agreement = *pg * g;
                    if agreement > 0.0 {
                        *step = (*step * self.eta_plus).min(self.max_step);
                        *pm = -sign(g) * *step;
                        *w += *pm;
                        *pg = g;
                    } else if agreement < 0.0 {
                        *step = (*step * self.eta_minus).max(self.min_step);
                        if cost_increased {
                            *w -= *pm;
                        }
                        *pm = 0.0;
                        // Forces the plain branch on the next iteration
                        *pg = 0.0;
                    } else {
                        *pm = -sign(g) * *step;
                        *w += *pm;
                        *pg = g;
                    }
                });

            prev_cost = cost;
        }

        let CostGradient { cost, .. } = objective(params.view());
        debug!("iRprop+ stopped at iteration budget {max_iterations}: cost {cost:.6}");

        Minimum {
            params,
            cost,
            iterations: max_iterations,
            converged: false,
        }
    }
}

/// Plain batch gradient descent with a fixed learning rate.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct GradientDescent {
    pub learning_rate: f64,
    pub gradient_tolerance: f64,
}

impl GradientDescent {
    pub fn new(learning_rate: f64) -> Self {
        Self {
            learning_rate,
            ..Default::default()
        }
    }
}

impl Default for GradientDescent {
    fn default() -> Self {
        GradientDescent {
            learning_rate: 0.1,
            gradient_tolerance: 1e-10,
        }
    }
}

impl Optimizer for GradientDescent {
    fn minimize(
        &self,
        objective: &mut Objective<'_>,
        initial: Array1<f64>,
        max_iterations: usize,
    ) -> Minimum {
        let mut params = initial;

        for iteration in 0..max_iterations {
            let CostGradient { cost, gradient } = objective(params.view());

            if max_abs(gradient.view()) < self.gradient_tolerance {
                return Minimum {
                    params,
                    cost,
                    iterations: iteration + 1,
                    converged: true,
                };
            }

            params.scaled_add(-self.learning_rate, &gradient);
        }

        let CostGradient { cost, .. } = objective(params.view());
        debug!("gradient descent stopped at iteration budget {max_iterations}: cost {cost:.6}");

        Minimum {
            params,
            cost,
            iterations: max_iterations,
            converged: false,
        }
    }
}

fn sign(x: f64) -> f64 {
    if x > 0.0 {
        1.0
    } else if x < 0.0 {
        -1.0
    } else {
        0.0
    }
}

fn max_abs(v: ArrayView1<f64>) -> f64 {
    v.iter().fold(0.0, |acc, x| acc.max(x.abs()))
}
