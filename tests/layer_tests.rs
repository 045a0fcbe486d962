use ndarray::{array, Array1, Array2};
use nnpom::layers::{FeedForwardLayer, PomLayer};
use nnpom::{add_bias_column, sigmoid, thresholds};

#[test]
fn test_feed_forward_layer_dimensions() {
    let weights = Array2::from_elem((4, 3 + 1), 0.1);
    let layer = FeedForwardLayer::new(weights.view());

    assert_eq!(layer.inputs(), 3);
    assert_eq!(layer.neurons(), 4);

    let x = array![[1.0, 2.0, 3.0], [0.0, 0.0, 0.0]];
    let out = layer.forward(add_bias_column(x.view()).view());

    assert_eq!(out.dim(), (2, 4));
    // Sigmoid keeps activations in (0, 1)
    assert!(out.iter().all(|&a| a > 0.0 && a < 1.0));
    // Zero inputs leave only the bias
    assert!((out[[1, 0]] - sigmoid(0.1)).abs() < 1e-12);
}

#[test]
#[should_panic(expected = "Input size does not match layer's input size")]
fn test_feed_forward_layer_invalid_input_size() {
    let weights = Array2::from_elem((4, 3 + 1), 0.1);
    let layer = FeedForwardLayer::new(weights.view());

    let x = array![[1.0, 2.0]];
    layer.forward(add_bias_column(x.view()).view());
}

#[test]
fn test_pom_layer_probabilities_follow_projection() {
    let w2 = array![1.0, 1.0];
    let theta = thresholds(array![-1.0, 1.0, 1.0].view());
    let layer = PomLayer::new(w2.view(), theta.view());
    assert_eq!(layer.classes(), 4);

    // Projections far below, between and above the cut points
    let hidden = array![[-5.0, -5.0], [0.25, 0.25], [5.0, 5.0]];
    let projection = layer.project(hidden.view());
    assert_eq!(projection, array![-10.0, 0.5, 10.0]);

    let cumulative = layer.cumulative(projection.view());
    let probs = PomLayer::class_probabilities(cumulative.view());

    assert_eq!(probs.dim(), (3, 4));
    let argmax = |row: usize| {
        probs
            .row(row)
            .iter()
            .enumerate()
            .fold((0, f64::MIN), |best, (j, &p)| if p > best.1 { (j, p) } else { best })
            .0
    };
    assert_eq!(argmax(0), 0);
    assert_eq!(argmax(2), 3);
    for row in probs.rows() {
        assert!((row.sum() - 1.0).abs() < 1e-12);
        assert!(row.iter().all(|&p| p >= 0.0));
    }
}

#[test]
fn test_pom_layer_backward_matches_finite_differences() {
    // f(w2, theta) = sum(G * P) for a fixed upstream G
    let hidden = array![[0.2, 0.9], [0.7, 0.1], [0.5, 0.5]];
    let w2 = array![0.8, -1.3];
    let theta = array![-0.4, 0.3];
    let upstream = array![[1.0, -0.5, 0.25], [0.0, 2.0, -1.0], [-3.0, 0.0, 0.5]];

    let f = |w2: &Array1<f64>, theta: &Array1<f64>| {
        let layer = PomLayer::new(w2.view(), theta.view());
        let cum = layer.cumulative(layer.project(hidden.view()).view());
        (PomLayer::class_probabilities(cum.view()) * &upstream).sum()
    };

    let layer = PomLayer::new(w2.view(), theta.view());
    let cum = layer.cumulative(layer.project(hidden.view()).view());
    let grads = layer.backward(hidden.view(), cum.view(), upstream.view());

    let h = 1e-6;
    for k in 0..w2.len() {
        let mut plus = w2.clone();
        let mut minus = w2.clone();
        plus[k] += h;
        minus[k] -= h;
        let numeric = (f(&plus, &theta) - f(&minus, &theta)) / (2.0 * h);
        assert!((numeric - grads.weights[k]).abs() < 1e-6);
    }
    for k in 0..theta.len() {
        let mut plus = theta.clone();
        let mut minus = theta.clone();
        plus[k] += h;
        minus[k] -= h;
        let numeric = (f(&w2, &plus) - f(&w2, &minus)) / (2.0 * h);
        assert!((numeric - grads.thresholds[k]).abs() < 1e-6);
    }
}
