use approx::assert_relative_eq;
use feedforward_nn::activation::ActivationType;
use feedforward_nn::initialization::InitializationType;
use feedforward_nn::{Layer, LayerKind, Matrix, NetworkError, Trace};
use rand::rngs::StdRng;
use rand::SeedableRng;

#[test]
fn input_layer_is_identity() {
    let mut rng = StdRng::seed_from_u64(1);
    let init = InitializationType::Dumb.build();
    let sigmoid = ActivationType::Sigmoid.build();

    for n in [1, 3, 5] {
        let mut layer = Layer::input(n);
        layer.initialize(init.as_ref(), n, &mut rng, 10).unwrap();
        assert_eq!(layer.weights(), &Matrix::identity(n));
        assert_eq!(layer.biases(), &Matrix::from_vec(vec![0.0; n]));
        layer.check(n).unwrap();

        let input = Matrix::from_vec((0..n).map(|i| i as f64 * 1.5 - 2.0).collect());
        let mut trace = Trace::new();
        let out = layer.feedforward(&input, sigmoid.as_ref(), &mut trace).unwrap();
        assert_eq!(out, input);
        assert_eq!(trace.zs[0], input);
        assert_eq!(trace.activations[0], input);
    }
}

#[test]
fn input_layer_is_never_updated() {
    let mut rng = StdRng::seed_from_u64(1);
    let mut layer = Layer::input(2);
    layer.initialize(InitializationType::Dumb.build().as_ref(), 2, &mut rng, 4).unwrap();
    let step = Matrix::from_rows(vec![vec![1.0, 1.0], vec![1.0, 1.0]]);
    layer.update(&Matrix::from_vec(vec![1.0, 1.0]), &step).unwrap();
    assert_eq!(layer.weights(), &Matrix::identity(2));
}

#[test]
fn dense_layer_computes_weighted_sum_plus_bias() {
    let mut rng = StdRng::seed_from_u64(3);
    let mut layer = Layer::hidden(2);
    layer.initialize(InitializationType::Dumb.build().as_ref(), 3, &mut rng, 6).unwrap();
    layer.check(3).unwrap();

    layer.set_weight(0, 0, 0.5).unwrap();
    layer.set_weight(0, 1, -1.0).unwrap();
    layer.set_weight(0, 2, 2.0).unwrap();
    layer.set_bias(0, 0.25).unwrap();
    layer.set_weight(1, 0, 0.0).unwrap();
    layer.set_weight(1, 1, 0.0).unwrap();
    layer.set_weight(1, 2, 0.0).unwrap();
    layer.set_bias(1, -1.0).unwrap();

    let tanh = ActivationType::Tanh.build();
    let mut trace = Trace::new();
    let input = Matrix::from_vec(vec![1.0, 2.0, 3.0]);
    let a = layer.feedforward(&input, tanh.as_ref(), &mut trace).unwrap();

    let z0 = 0.5 - 2.0 + 6.0 + 0.25;
    assert_relative_eq!(trace.zs[0].get_scalar(0).unwrap(), z0);
    assert_relative_eq!(trace.zs[0].get_scalar(1).unwrap(), -1.0);
    assert_relative_eq!(a.get_scalar(0).unwrap(), z0.tanh());
    assert_relative_eq!(a.get_scalar(1).unwrap(), (-1.0f64).tanh());
}

#[test]
fn dense_layer_rejects_wrong_input_length() {
    let mut rng = StdRng::seed_from_u64(3);
    let mut layer = Layer::output(1);
    layer.initialize(InitializationType::Dumb.build().as_ref(), 2, &mut rng, 2).unwrap();
    let sigmoid = ActivationType::Sigmoid.build();
    let result = layer.feedforward(&Matrix::from_vec(vec![1.0, 2.0, 3.0]), sigmoid.as_ref(), &mut Trace::new());
    assert!(matches!(result, Err(NetworkError::ShapeMismatch(_))));
}

#[test]
fn update_replaces_with_difference() {
    let mut rng = StdRng::seed_from_u64(9);
    let mut layer = Layer::output(1);
    layer.initialize(InitializationType::Dumb.build().as_ref(), 2, &mut rng, 2).unwrap();
    let before_w = layer.weights().clone();
    let before_b = layer.biases().clone();

    let weight_step = Matrix::from_rows(vec![vec![0.5, -0.25]]);
    let bias_step = Matrix::from_vec(vec![1.0]);
    layer.update(&bias_step, &weight_step).unwrap();

    assert_eq!(layer.weights(), &before_w.sub(&weight_step).unwrap());
    assert_eq!(layer.biases(), &before_b.sub(&bias_step).unwrap());

    let wrong = Matrix::from_rows(vec![vec![0.5]]);
    assert!(matches!(layer.update(&bias_step, &wrong), Err(NetworkError::ShapeMismatch(_))));
}

#[test]
fn check_reports_wrong_fan_in() {
    let mut rng = StdRng::seed_from_u64(5);
    let mut layer = Layer::hidden(3);
    layer.initialize(InitializationType::Smart.build().as_ref(), 4, &mut rng, 12).unwrap();
    layer.check(4).unwrap();
    assert!(matches!(layer.check(5), Err(NetworkError::ConfigurationInvalid(_))));

    let uninitialized = Layer::hidden(3);
    assert!(matches!(uninitialized.check(4), Err(NetworkError::ConfigurationInvalid(_))));
}

#[test]
fn check_rejects_nested_biases() {
    let json = r#"{"kind":"feedforward","width":1,"height":1,"weights":[[0.5]],"biases":[[0.1]]}"#;
    let layer: Layer = serde_json::from_str(json).unwrap();
    assert!(matches!(layer.check(1), Err(NetworkError::ConfigurationInvalid(_))));

    let json = r#"{"kind":"feedforward","width":1,"height":1,"weights":[[0.5]],"biases":[0.1]}"#;
    let layer: Layer = serde_json::from_str(json).unwrap();
    layer.check(1).unwrap();
}

#[test]
fn convolutional_layer_fails_loudly() {
    let mut rng = StdRng::seed_from_u64(5);
    let mut layer = Layer::convolutional(2, 2);
    assert_eq!(layer.kind(), LayerKind::Convolutional);
    assert_eq!(layer.size(), 4);

    let init = InitializationType::Dumb.build();
    let sigmoid = ActivationType::Sigmoid.build();
    let m = Matrix::from_vec(vec![0.0; 4]);

    assert!(matches!(
        layer.initialize(init.as_ref(), 4, &mut rng, 16),
        Err(NetworkError::UnsupportedLayerOperation { operation: "initialize", .. })
    ));
    assert!(matches!(
        layer.feedforward(&m, sigmoid.as_ref(), &mut Trace::new()),
        Err(NetworkError::UnsupportedLayerOperation { operation: "feedforward", .. })
    ));
    assert!(matches!(
        layer.update(&m, &m),
        Err(NetworkError::UnsupportedLayerOperation { operation: "update", .. })
    ));
}
