use std::sync::atomic::Ordering;
use std::time::Instant;

use tracing::{debug, info};

use crate::error::{NetworkError, Result};
use crate::math::matrix::Matrix;
use crate::network::network::Network;
use crate::train::epoch_stats::EpochStats;
use crate::train::train_config::TrainConfig;

/// Trains `network` for `config.epochs` epochs, evaluating after each one,
/// and returns the loss after the **last completed epoch**.
///
/// Each epoch reshuffles the data with the network's own generator, so a
/// run is reproducible from the network's seed.
///
/// # Early termination
/// The loop breaks early if:
/// - the `progress_tx` receiver has been dropped, **or**
/// - `config.stop_flag` is set to `true`.
///
/// # Errors
/// `ConfigurationInvalid` for an empty dataset or `batch_size == 0`,
/// `ShapeMismatch` when inputs and labels disagree.
pub fn train_loop(
    network: &mut Network,
    data: &[Matrix],
    expected: &[Matrix],
    config: &TrainConfig,
) -> Result<f64> {
    if data.is_empty() {
        return Err(NetworkError::config("training data must not be empty"));
    }
    if config.batch_size == 0 {
        return Err(NetworkError::config("batch size must be at least 1"));
    }

    let mut last_loss = network.evaluate(data, expected)?;
    info!(epochs = config.epochs, batch_size = config.batch_size, initial_loss = last_loss, "starting training");

    for epoch in 1..=config.epochs {
        if stop_requested(config) {
            break;
        }

        let t_start = Instant::now();
        network.train(data, expected, 1, config.batch_size)?;
        last_loss = network.evaluate(data, expected)?;
        let elapsed_ms = t_start.elapsed().as_millis() as u64;

        let stats = EpochStats {
            epoch,
            total_epochs: config.epochs,
            loss: last_loss,
            processed: data.len() / config.batch_size * config.batch_size,
            elapsed_ms,
        };
        debug!(epoch, loss = last_loss, elapsed_ms, "epoch complete");

        if let Some(ref tx) = config.progress_tx {
            // If the receiver has been dropped, stop training.
            if tx.send(stats).is_err() {
                break;
            }
        }

        if stop_requested(config) {
            break;
        }
    }

    Ok(last_loss)
}

fn stop_requested(config: &TrainConfig) -> bool {
    config
        .stop_flag
        .as_ref()
        .map(|flag| flag.load(Ordering::Relaxed))
        .unwrap_or(false)
}
