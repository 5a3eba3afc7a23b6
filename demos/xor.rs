use std::sync::mpsc;

use feedforward_nn::{
    train_loop, ActivationType, CostType, InitializationType, Matrix, NetworkConfig,
    RegularizationType, TrainConfig,
};
use tracing_subscriber::EnvFilter;

fn main() -> feedforward_nn::Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")))
        .init();

    let mut network = NetworkConfig::new(42)
        .input(2)
        .feedforward(3)
        .output(1)
        .eta(4.0)
        .cost(CostType::Quadratic)
        .activation(ActivationType::Sigmoid)
        .initialization(InitializationType::Dumb)
        .regularization(RegularizationType::None)
        .build()?;

    let inputs = vec![
        Matrix::from_vec(vec![0.0, 0.0]),
        Matrix::from_vec(vec![0.0, 1.0]),
        Matrix::from_vec(vec![1.0, 0.0]),
        Matrix::from_vec(vec![1.0, 1.0]),
    ];
    let expected_outputs = vec![
        Matrix::from_vec(vec![0.0]),
        Matrix::from_vec(vec![1.0]),
        Matrix::from_vec(vec![1.0]),
        Matrix::from_vec(vec![0.0]),
    ];

    let (tx, rx) = mpsc::channel();
    let mut config = TrainConfig::new(5000, 4);
    config.progress_tx = Some(tx);

    let loss = train_loop(&mut network, &inputs, &expected_outputs, &config)?;
    drop(config);

    for stats in rx.iter().filter(|s| s.epoch % 500 == 0) {
        println!("Epoch {}: loss = {:.6}", stats.epoch, stats.loss);
    }
    println!("Final loss = {loss:.6}");

    for input in &inputs {
        let output = network.feedforward(input)?;
        println!("Input: {:?} -> Output: {:.4}", input.to_vec()?, output.get_scalar(0)?);
    }
    Ok(())
}
