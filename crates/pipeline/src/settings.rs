//! Mining Configuration

use crate::PipelineError;
use config::{Config, Environment, File, FileFormat};
use scaler::ZScoreScaler;
use segmenter::{MiningParams, OutputFormat, WindowParams};
use serde::{Deserialize, Serialize};

/// Environment variable prefix for overrides (`MINING__OUTPUT=array`)
pub const ENV_PREFIX: &str = "MINING";

/// How recordings are turned into window tables
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MiningConfig {
    /// Window parameters, uniform or keyed by sampling frequency
    pub params: MiningParams,

    /// Z-score scaling applied after segmentation
    #[serde(default)]
    pub normalize: Option<ZScoreScaler>,

    /// Representation returned by [`crate::WindowMiner::mine_as`]
    #[serde(default)]
    pub output: OutputFormat,
}

impl MiningConfig {
    pub fn new(params: impl Into<MiningParams>) -> Self {
        Self {
            params: params.into(),
            normalize: None,
            output: OutputFormat::default(),
        }
    }

    pub fn with_normalize(mut self, scaler: ZScoreScaler) -> Self {
        self.normalize = Some(scaler);
        self
    }

    pub fn with_output(mut self, output: OutputFormat) -> Self {
        self.output = output;
        self
    }

    /// Load from a file (format from its extension) with environment overrides
    pub fn load(path: &str) -> Result<Self, PipelineError> {
        let settings = Config::builder()
            .add_source(File::with_name(path))
            .add_source(
                Environment::with_prefix(ENV_PREFIX)
                    .separator("__")
                    .try_parsing(true),
            )
            .build()?;
        Ok(settings.try_deserialize()?)
    }

    /// Parse from an in-memory document
    pub fn parse(source: &str, format: FileFormat) -> Result<Self, PipelineError> {
        let settings = Config::builder()
            .add_source(File::from_str(source, format))
            .build()?;
        Ok(settings.try_deserialize()?)
    }
}

impl Default for MiningConfig {
    fn default() -> Self {
        Self::new(WindowParams::new(2048, 2048))
    }
}
