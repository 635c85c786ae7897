//! Window Miner

use crate::{MiningConfig, PipelineError};
use feature_engine::{FeatureExtractor, FeatureSet, FeatureTable, SpectrumAnalyzer, SpectrumTable};
use segmenter::{segment, Labels, RawSignal, Segments, WindowParams, WindowTable};
use tracing::{debug, info};

/// One channel of one source file, as handed over by a dataset reader
#[derive(Debug, Clone, PartialEq)]
pub struct Recording {
    pub signal: RawSignal,
    pub labels: Labels,
    /// Rate key used by the dataset's naming convention (`"48k"`), if any
    pub rate_key: Option<String>,
}

impl Recording {
    pub fn new(signal: RawSignal, labels: Labels) -> Self {
        Self {
            signal,
            labels,
            rate_key: None,
        }
    }

    pub fn with_rate_key(mut self, key: impl Into<String>) -> Self {
        self.rate_key = Some(key.into());
        self
    }
}

/// Turns recordings into window and feature tables
#[derive(Debug, Clone)]
pub struct WindowMiner {
    config: MiningConfig,
}

impl WindowMiner {
    pub fn new(config: MiningConfig) -> Self {
        info!(
            "Creating window miner: normalize={:?}, output={:?}",
            config.normalize.map(|s| s.axis),
            config.output
        );
        Self { config }
    }

    pub fn config(&self) -> &MiningConfig {
        &self.config
    }

    fn params_for(&self, recording: &Recording) -> Result<WindowParams, PipelineError> {
        let params = match &recording.rate_key {
            Some(key) => self.config.params.for_rate(key)?,
            None => self.config.params.resolve(recording.signal.sampling_freq())?,
        };
        Ok(params)
    }

    /// Segment, broadcast labels, then scale if configured
    pub fn mine(&self, recording: &Recording) -> Result<WindowTable, PipelineError> {
        let (win_len, hop_len) = self.params_for(recording)?.lengths()?;

        let table = segment(recording.signal.samples(), win_len, hop_len)?
            .with_labels(recording.labels.clone());

        let table = match &self.config.normalize {
            Some(scaler) => scaler.scale(&table)?,
            None => table,
        };

        debug!(
            "Mined {} windows of {} samples at fs={} Hz",
            table.len(),
            win_len,
            recording.signal.sampling_freq()
        );
        Ok(table)
    }

    /// [`WindowMiner::mine`] in the configured output representation
    pub fn mine_as(&self, recording: &Recording) -> Result<Segments, PipelineError> {
        let table = self.mine(recording)?;
        Ok(match self.config.output {
            segmenter::OutputFormat::Table => Segments::Table(table),
            segmenter::OutputFormat::Array => Segments::Array(table.into_array()),
        })
    }

    /// One-sided magnitude spectra of the mined windows
    pub fn spectra(&self, recording: &Recording) -> Result<SpectrumTable, PipelineError> {
        let table = self.mine(recording)?;
        Ok(SpectrumAnalyzer::new(recording.signal.sampling_freq()).transform(&table))
    }

    /// Mine `recording` and apply `features` to every window
    pub fn extract(
        &self,
        recording: &Recording,
        features: &FeatureSet,
    ) -> Result<FeatureTable, PipelineError> {
        let table = self.mine(recording)?;
        let extracted = FeatureExtractor::new(features.clone()).apply(&table)?;

        info!(
            "Extracted {} rows x {} features ({} label columns)",
            extracted.len(),
            extracted.columns().len(),
            extracted.labels().len()
        );
        Ok(extracted)
    }

    /// Apply `features` to each recording in turn, stopping at the first failure
    pub fn extract_all<'a>(
        &self,
        recordings: impl IntoIterator<Item = &'a Recording>,
        features: &FeatureSet,
    ) -> Result<Vec<FeatureTable>, PipelineError> {
        recordings
            .into_iter()
            .map(|recording| self.extract(recording, features))
            .collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use feature_engine::{DescriptiveCharacteristics, FeatureSpec};
    use ndarray::array;
    use scaler::{ScaleAxis, ZScoreScaler};
    use segmenter::{LabelValue, MiningParams, NumericTable, OutputFormat, SegmentError};
    use std::collections::BTreeMap;

    fn ramp_recording(n: usize, fs: f64) -> Recording {
        let samples = (0..n).map(|i| i as f64).collect();
        Recording::new(
            RawSignal::new(samples, fs),
            Labels::new()
                .with("state", "IR")
                .with("severity", "-")
                .with("load", 1i64),
        )
    }

    #[test]
    fn test_mine_broadcasts_labels() {
        let miner = WindowMiner::new(MiningConfig::new(WindowParams::new(4, 2)));
        let table = miner.mine(&ramp_recording(10, 12000.0)).unwrap();

        assert_eq!(table.len(), 4);
        assert_eq!(
            table.values(),
            array![
                [0.0, 1.0, 2.0, 3.0],
                [2.0, 3.0, 4.0, 5.0],
                [4.0, 5.0, 6.0, 7.0],
                [6.0, 7.0, 8.0, 9.0]
            ]
        );
        assert_eq!(table.labels().get("state"), Some(&LabelValue::from("IR")));
    }

    #[test]
    fn test_mine_applies_configured_scaling() {
        let config = MiningConfig::new(WindowParams::new(4, 4))
            .with_normalize(ZScoreScaler::new(ScaleAxis::Rows));
        let table = WindowMiner::new(config)
            .mine(&ramp_recording(8, 100.0))
            .unwrap();

        for window in table.windows() {
            let expected = [-1.3416, -0.4472, 0.4472, 1.3416];
            for (v, e) in window.iter().zip(expected) {
                assert!((v - e).abs() < 1e-4);
            }
        }
    }

    #[test]
    fn test_multi_rate_params() {
        let mut rates = BTreeMap::new();
        rates.insert("97656".to_string(), WindowParams::new(8, 8));
        rates.insert("48828".to_string(), WindowParams::new(4, 4));
        let miner = WindowMiner::new(MiningConfig::new(MiningParams::PerRate(rates)));

        assert_eq!(miner.mine(&ramp_recording(32, 97656.0)).unwrap().len(), 4);
        assert_eq!(miner.mine(&ramp_recording(32, 48828.0)).unwrap().len(), 8);

        let err = miner.mine(&ramp_recording(32, 12000.0)).unwrap_err();
        assert!(matches!(
            err,
            PipelineError::Segment(SegmentError::MissingRate(_))
        ));
    }

    #[test]
    fn test_rate_key_lookup() {
        let mut rates = BTreeMap::new();
        rates.insert("12k".to_string(), WindowParams::new(5, 5));
        let miner = WindowMiner::new(MiningConfig::new(MiningParams::PerRate(rates)));

        let recording = ramp_recording(20, 12000.0).with_rate_key("12k");
        assert_eq!(miner.mine(&recording).unwrap().win_len(), 5);
    }

    #[test]
    fn test_invalid_hop_from_config() {
        let miner = WindowMiner::new(MiningConfig::new(WindowParams::new(4, 0)));
        let err = miner.mine(&ramp_recording(10, 1.0)).unwrap_err();
        assert!(matches!(
            err,
            PipelineError::Segment(SegmentError::InvalidParameter { name: "hop_len", .. })
        ));
    }

    #[test]
    fn test_mine_as_array() {
        let config = MiningConfig::new(WindowParams::new(4, 2)).with_output(OutputFormat::Array);
        let segments = WindowMiner::new(config)
            .mine_as(&ramp_recording(10, 1.0))
            .unwrap();
        assert!(matches!(segments, Segments::Array(ref a) if a.dim() == (4, 4)));
    }

    #[test]
    fn test_extract_appends_labels() {
        let miner = WindowMiner::new(MiningConfig::new(WindowParams::new(4, 2)));
        let features = FeatureSet::time_domain()
            .with(FeatureSpec::characteristics("stats", DescriptiveCharacteristics, true))
            .unwrap();

        let table = miner.extract(&ramp_recording(10, 1.0), &features).unwrap();

        assert_eq!(table.len(), 4);
        let all = table.all_columns();
        assert_eq!(all.len(), 7 + 10 + 3);
        assert_eq!(&all[all.len() - 3..], &["state", "severity", "load"]);
        assert!((table.column("rms").unwrap()[0] - 3.5f64.sqrt()).abs() < 1e-12);
    }

    #[test]
    fn test_extract_all_short_recording_yields_empty_table() {
        let miner = WindowMiner::new(MiningConfig::new(WindowParams::new(16, 8)));
        let recordings = vec![ramp_recording(64, 1.0), ramp_recording(10, 1.0)];

        let tables = miner
            .extract_all(&recordings, &FeatureSet::time_domain())
            .unwrap();
        assert_eq!(tables.len(), 2);
        assert_eq!(tables[0].len(), 7);
        assert!(tables[1].is_empty());
    }

    #[test]
    fn test_spectra_use_recording_rate() {
        let miner = WindowMiner::new(MiningConfig::new(WindowParams::new(8, 8)));
        let spectra = miner.spectra(&ramp_recording(32, 800.0)).unwrap();

        assert_eq!(spectra.len(), 4);
        for (f, e) in spectra.freq_axis().iter().zip([0.0, 100.0, 200.0, 300.0]) {
            assert!((f - e).abs() < 1e-9);
        }
        assert_eq!(spectra.label_columns().len(), 3);
    }
}
