use std::sync::atomic::AtomicBool;
use std::sync::{mpsc, Arc};

use feedforward_nn::{
    train_loop, ActivationType, CostType, InitializationType, Matrix, Network, NetworkConfig,
    NetworkError, RegularizationType, TrainConfig,
};

fn xor() -> (Vec<Matrix>, Vec<Matrix>) {
    let data = vec![
        Matrix::from_vec(vec![0.0, 0.0]),
        Matrix::from_vec(vec![0.0, 1.0]),
        Matrix::from_vec(vec![1.0, 0.0]),
        Matrix::from_vec(vec![1.0, 1.0]),
    ];
    let expected = vec![
        Matrix::from_vec(vec![0.0]),
        Matrix::from_vec(vec![1.0]),
        Matrix::from_vec(vec![1.0]),
        Matrix::from_vec(vec![0.0]),
    ];
    (data, expected)
}

fn xor_network(hidden: usize, eta: f64) -> Network {
    NetworkConfig::new(42)
        .input(2)
        .feedforward(hidden)
        .output(1)
        .eta(eta)
        .cost(CostType::Quadratic)
        .activation(ActivationType::Sigmoid)
        .initialization(InitializationType::Dumb)
        .regularization(RegularizationType::None)
        .build()
        .unwrap()
}

#[test]
fn training_reduces_loss_on_separable_data() {
    let data = vec![
        Matrix::from_vec(vec![0.0, 0.0]),
        Matrix::from_vec(vec![0.2, 0.1]),
        Matrix::from_vec(vec![0.1, 0.3]),
        Matrix::from_vec(vec![1.0, 1.0]),
        Matrix::from_vec(vec![0.9, 0.8]),
        Matrix::from_vec(vec![0.8, 1.0]),
    ];
    let expected: Vec<Matrix> = [0.0, 0.0, 0.0, 1.0, 1.0, 1.0]
        .iter()
        .map(|&y| Matrix::from_vec(vec![y]))
        .collect();

    let mut net = NetworkConfig::new(3).input(2).feedforward(3).output(1).eta(1.0).build().unwrap();
    let before = net.evaluate(&data, &expected).unwrap();
    net.train(&data, &expected, 50, data.len()).unwrap();
    let after = net.evaluate(&data, &expected).unwrap();
    assert!(after < before, "loss went from {before} to {after}");
}

#[test]
fn xor_loss_decreases_at_every_checkpoint() {
    let (data, expected) = xor();
    let mut net = xor_network(2, 1.0);

    let mut losses = vec![net.evaluate(&data, &expected).unwrap()];
    for _ in 0..10 {
        net.train(&data, &expected, 200, 4).unwrap();
        losses.push(net.evaluate(&data, &expected).unwrap());
    }
    for pair in losses.windows(2) {
        assert!(pair[1] < pair[0], "loss did not decrease: {losses:?}");
    }
}

#[test]
fn xor_predictions_converge() {
    let (data, expected) = xor();
    let mut net = xor_network(3, 4.0);
    net.train(&data, &expected, 5000, 4).unwrap();

    for (x, y) in data.iter().zip(&expected) {
        let out = net.feedforward(x).unwrap().get_scalar(0).unwrap();
        let target = y.get_scalar(0).unwrap();
        assert!((out - target).abs() < 0.2, "{x:?} -> {out}, expected {target}");
    }
}

#[test]
fn train_loop_reports_every_epoch() {
    let (data, expected) = xor();
    let mut net = xor_network(2, 1.0);
    let (tx, rx) = mpsc::channel();
    let mut config = TrainConfig::new(20, 3);
    config.progress_tx = Some(tx);

    let last = train_loop(&mut net, &data, &expected, &config).unwrap();
    drop(config);

    let stats: Vec<_> = rx.iter().collect();
    assert_eq!(stats.len(), 20);
    assert_eq!(stats[0].epoch, 1);
    assert_eq!(stats[19].total_epochs, 20);
    assert!(stats.iter().all(|s| s.processed == 3));
    assert_eq!(stats[19].loss, last);
    assert_eq!(last, net.evaluate(&data, &expected).unwrap());
}

#[test]
fn train_loop_honours_stop_flag() {
    let (data, expected) = xor();
    let mut net = xor_network(2, 1.0);
    let initial = net.evaluate(&data, &expected).unwrap();
    let before = net.to_state();

    let mut config = TrainConfig::new(100, 4);
    config.stop_flag = Some(Arc::new(AtomicBool::new(true)));

    let loss = train_loop(&mut net, &data, &expected, &config).unwrap();
    assert_eq!(loss, initial);
    assert_eq!(net.to_state(), before);
}

#[test]
fn train_loop_stops_when_receiver_drops() {
    let (data, expected) = xor();
    let mut net = xor_network(2, 1.0);
    let reference = {
        let mut other = xor_network(2, 1.0);
        other.train(&data, &expected, 1, 4).unwrap();
        other.to_state()
    };

    let (tx, rx) = mpsc::channel();
    drop(rx);
    let mut config = TrainConfig::new(100, 4);
    config.progress_tx = Some(tx);

    train_loop(&mut net, &data, &expected, &config).unwrap();
    assert_eq!(net.to_state(), reference);
}

#[test]
fn train_loop_rejects_empty_data() {
    let mut net = xor_network(2, 1.0);
    let config = TrainConfig::new(1, 1);
    assert!(matches!(
        train_loop(&mut net, &[], &[], &config),
        Err(NetworkError::ConfigurationInvalid(_))
    ));
}
