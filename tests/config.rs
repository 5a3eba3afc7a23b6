use feedforward_nn::{LayerKind, NetworkConfig, NetworkError};

fn assert_invalid(config: NetworkConfig) {
    match config.build() {
        Err(NetworkError::ConfigurationInvalid(_)) => {}
        other => panic!("expected ConfigurationInvalid, got {other:?}"),
    }
}

#[test]
fn rejects_bad_topologies() {
    assert_invalid(NetworkConfig::new(0));
    assert_invalid(NetworkConfig::new(0).input(2));
    assert_invalid(NetworkConfig::new(0).feedforward(2).output(1));
    assert_invalid(NetworkConfig::new(0).input(2).input(2).output(1));
    assert_invalid(NetworkConfig::new(0).input(2).feedforward(3));
    assert_invalid(NetworkConfig::new(0).input(2).feedforward(0).output(1));
}

#[test]
fn rejects_bad_hyperparameters() {
    assert_invalid(NetworkConfig::new(0).input(2).output(1).eta(0.0));
    assert_invalid(NetworkConfig::new(0).input(2).output(1).eta(f64::NAN));
    assert_invalid(NetworkConfig::new(0).input(2).output(1).lambda(-0.1));
}

#[test]
fn convolutional_layers_fail_at_build_time() {
    let result = NetworkConfig::new(0).input(4).convolutional(2, 2).output(1).build();
    assert!(matches!(
        result,
        Err(NetworkError::UnsupportedLayerOperation { layer: "convolutional", .. })
    ));
}

#[test]
fn grid_input_uses_width_times_height() {
    let net = NetworkConfig::new(0).input_grid(2, 3).output(2).build().unwrap();
    assert_eq!(net.layers()[0].size(), 6);
    assert_eq!(net.layers()[0].width(), 2);
    assert_eq!(net.layers()[1].kind(), LayerKind::Output);
    assert_eq!(net.layers()[1].weights().get_matrix(0).unwrap().len(), 6);
}

#[test]
fn overflowing_network_size_is_rejected() {
    let mut config = NetworkConfig::new(1).input(10);
    for _ in 0..19 {
        config = config.feedforward(10);
    }
    assert_invalid(config.output(10));
}
