//! Ordered class thresholds on the latent axis.
//!
//! The optimizer works on unconstrained raw values `t`. The thresholds are
//! `theta[j] = t[0] + sum(t[1..=j]^2)`, which can only grow with `j`, so any
//! real `t` yields a non-decreasing sequence.

use ndarray::{Array1, ArrayView1};

/// Maps raw threshold parameters to non-decreasing thresholds.
pub fn thresholds(raw: ArrayView1<f64>) -> Array1<f64> {
    let mut out = Array1::zeros(raw.len());
    let mut acc = 0.0;
    for (j, &t) in raw.iter().enumerate() {
        acc += if j == 0 { t } else { t * t };
        out[j] = acc;
    }
    out
}

/// Pulls a gradient with respect to the thresholds back onto the raw parameters.
///
/// `theta[j]` depends on every `t[k]` with `k <= j`, so `t[k]` collects the
/// suffix sum of `grad` from `k` onward, scaled by `2 * t[k]` for `k >= 1`.
pub fn thresholds_backward(raw: ArrayView1<f64>, grad: ArrayView1<f64>) -> Array1<f64> {
    assert_eq!(
        raw.len(),
        grad.len(),
        "Threshold gradient length does not match parameter length"
    );

    let mut out = Array1::zeros(raw.len());
    let mut suffix = 0.0;
    for k in (0..raw.len()).rev() {
        suffix += grad[k];
        out[k] = if k == 0 { suffix } else { 2.0 * raw[k] * suffix };
    }
    out
}

#[cfg(test)]
mod tests {
    use super::*;
    use ndarray::array;
    use rand::rngs::StdRng;
    use rand::{Rng, SeedableRng};

    #[test]
    fn test_thresholds_follow_cumulative_squares() {
        let raw = array![-1.0, 2.0, -0.5];
        let theta = thresholds(raw.view());

        assert_eq!(theta, array![-1.0, 3.0, 3.25]);
    }

    #[test]
    fn test_single_threshold_is_raw_value() {
        let raw = array![0.7];
        assert_eq!(thresholds(raw.view()), array![0.7]);
    }

    #[test]
    fn test_thresholds_are_monotone_for_random_inputs() {
        let mut rng = StdRng::seed_from_u64(7);
        for len in 1..8 {
            for _ in 0..50 {
                let raw: Array1<f64> = (0..len).map(|_| rng.random_range(-10.0..10.0)).collect();
                let theta = thresholds(raw.view());

                assert_eq!(theta.len(), len);
                for j in 1..len {
                    assert!(theta[j] >= theta[j - 1], "not monotone: {:?}", theta);
                }
                // Pure function
                assert_eq!(theta, thresholds(raw.view()));
            }
        }
    }

    #[test]
    fn test_backward_matches_finite_differences() {
        let raw = array![0.3, -0.8, 1.1, 0.05];
        let upstream = array![0.5, -1.0, 2.0, 0.25];
        let analytic = thresholds_backward(raw.view(), upstream.view());

        let h = 1e-6;
        for k in 0..raw.len() {
            let mut plus = raw.clone();
            let mut minus = raw.clone();
            plus[k] += h;
            minus[k] -= h;
            let f_plus = thresholds(plus.view()).dot(&upstream);
            let f_minus = thresholds(minus.view()).dot(&upstream);
            let numeric = (f_plus - f_minus) / (2.0 * h);

            assert!(
                (numeric - analytic[k]).abs() < 1e-6,
                "component {}: numeric {} analytic {}",
                k,
                numeric,
                analytic[k]
            );
        }
    }

    #[test]
    #[should_panic(expected = "Threshold gradient length")]
    fn test_backward_rejects_length_mismatch() {
        thresholds_backward(array![1.0, 2.0].view(), array![1.0].view());
    }
}
