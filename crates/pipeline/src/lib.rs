//! Vibration Mining Pipeline
//!
//! Wires segmentation, optional z-score scaling and feature extraction for
//! recordings handed over by dataset readers.

mod error;
mod miner;
mod settings;

pub use error::PipelineError;
pub use miner::{Recording, WindowMiner};
pub use settings::{MiningConfig, ENV_PREFIX};

use tracing::Level;
use tracing_subscriber::FmtSubscriber;

/// Install the global tracing subscriber
pub fn init_logging() -> Result<(), PipelineError> {
    init_logging_with(Level::INFO)
}

/// Install the global tracing subscriber at `level`
pub fn init_logging_with(level: Level) -> Result<(), PipelineError> {
    let subscriber = FmtSubscriber::builder()
        .with_max_level(level)
        .with_target(true)
        .finish();

    tracing::subscriber::set_global_default(subscriber)
        .map_err(|e| PipelineError::Logging(e.to_string()))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_second_logging_init_fails() {
        let _ = init_logging_with(Level::DEBUG);
        assert!(matches!(init_logging(), Err(PipelineError::Logging(_))));
    }
}
