//! Sliding Window Splitter

use crate::table::{check_shape, NumericTable};
use crate::{Labels, SegmentError};
use ndarray::{Array2, ArrayView1, ArrayView2};
use serde::{Deserialize, Serialize};
use std::str::FromStr;
use tracing::{debug, warn};

/// Representation returned by [`segment_as`]
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase", try_from = "String")]
pub enum OutputFormat {
    /// Labelled [`WindowTable`]
    #[default]
    Table,
    /// Plain `Array2<f64>`
    Array,
}

impl FromStr for OutputFormat {
    type Err = SegmentError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_ascii_lowercase().as_str() {
            "table" | "dataframe" => Ok(OutputFormat::Table),
            "array" | "ndarray" => Ok(OutputFormat::Array),
            _ => Err(SegmentError::UnsupportedType(s.to_string())),
        }
    }
}

impl TryFrom<String> for OutputFormat {
    type Error = SegmentError;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        value.parse()
    }
}

/// Windows cut from one recording.
///
/// Row `i` holds samples `[i * hop_len, i * hop_len + win_len)` of the source.
/// Labels are broadcast: every row shares the same values.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct WindowTable {
    samples: Array2<f64>,
    hop_len: usize,
    labels: Labels,
}

impl WindowTable {
    pub fn win_len(&self) -> usize {
        self.samples.ncols()
    }

    pub fn hop_len(&self) -> usize {
        self.hop_len
    }

    /// Number of windows
    pub fn len(&self) -> usize {
        self.samples.nrows()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Offset of window `index` in the source recording
    pub fn start(&self, index: usize) -> usize {
        index * self.hop_len
    }

    pub fn window(&self, index: usize) -> Option<ArrayView1<'_, f64>> {
        (index < self.len()).then(|| self.samples.row(index))
    }

    pub fn windows(&self) -> impl Iterator<Item = ArrayView1<'_, f64>> {
        self.samples.rows().into_iter()
    }

    pub fn labels(&self) -> &Labels {
        &self.labels
    }

    /// Broadcast label columns onto every window
    pub fn with_labels(mut self, labels: Labels) -> Self {
        self.labels = labels;
        self
    }

    pub fn into_array(self) -> Array2<f64> {
        self.samples
    }
}

impl NumericTable for WindowTable {
    fn values(&self) -> ArrayView2<'_, f64> {
        self.samples.view()
    }

    fn with_values(&self, values: Array2<f64>) -> Result<Self, SegmentError> {
        check_shape(self.samples.dim(), values.dim())?;
        Ok(Self {
            samples: values,
            hop_len: self.hop_len,
            labels: self.labels.clone(),
        })
    }

    fn label_columns(&self) -> Labels {
        self.labels.clone()
    }
}

/// Output of [`segment_as`]
#[derive(Debug, Clone, PartialEq)]
pub enum Segments {
    Table(WindowTable),
    Array(Array2<f64>),
}

impl Segments {
    pub fn n_rows(&self) -> usize {
        match self {
            Segments::Table(table) => table.len(),
            Segments::Array(array) => array.nrows(),
        }
    }

    pub fn into_array(self) -> Array2<f64> {
        match self {
            Segments::Table(table) => table.into_array(),
            Segments::Array(array) => array,
        }
    }
}

/// Number of windows `segment` produces for a recording of `len` samples
pub fn window_count(len: usize, win_len: usize, hop_len: usize) -> Result<usize, SegmentError> {
    validate(win_len, hop_len)?;
    if win_len > len {
        return Ok(0);
    }
    Ok((len - win_len) / hop_len + 1)
}

fn validate(win_len: usize, hop_len: usize) -> Result<(), SegmentError> {
    if win_len == 0 {
        return Err(SegmentError::InvalidParameter {
            name: "win_len",
            value: 0,
        });
    }
    if hop_len == 0 {
        return Err(SegmentError::InvalidParameter {
            name: "hop_len",
            value: 0,
        });
    }
    Ok(())
}

/// Split `array` into windows of `win_len` samples, advancing `hop_len`
/// samples between consecutive starts.
///
/// Windows are emitted in increasing start order. A window that would run
/// past the end of the array is dropped, so `win_len > array.len()` yields
/// an empty table.
pub fn segment(
    array: &[f64],
    win_len: usize,
    hop_len: usize,
) -> Result<WindowTable, SegmentError> {
    let count = window_count(array.len(), win_len, hop_len)?;

    if count == 0 {
        warn!(
            "Recording of {} samples is shorter than win_len={}, no windows produced",
            array.len(),
            win_len
        );
    }

    let samples = Array2::from_shape_fn((count, win_len), |(row, col)| array[row * hop_len + col]);

    debug!(
        "Segmented {} samples into {} windows (win_len={}, hop_len={})",
        array.len(),
        count,
        win_len,
        hop_len
    );

    Ok(WindowTable {
        samples,
        hop_len,
        labels: Labels::default(),
    })
}

/// [`segment`] with the output representation chosen by `format`
pub fn segment_as(
    array: &[f64],
    win_len: usize,
    hop_len: usize,
    format: OutputFormat,
) -> Result<Segments, SegmentError> {
    let table = segment(array, win_len, hop_len)?;
    Ok(match format {
        OutputFormat::Table => Segments::Table(table),
        OutputFormat::Array => Segments::Array(table.into_array()),
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use ndarray::array;
    use proptest::prelude::*;

    fn ramp(n: usize) -> Vec<f64> {
        (0..n).map(|i| i as f64).collect()
    }

    #[test]
    fn test_overlapping_windows() {
        let table = segment(&ramp(10), 4, 2).unwrap();

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
        assert_eq!(table.start(3), 6);
        assert!(table.window(4).is_none());
    }

    #[test]
    fn test_disjoint_windows() {
        let table = segment(&ramp(10), 3, 3).unwrap();
        assert_eq!(table.len(), 3);
        assert_eq!(table.window(2).unwrap().to_vec(), vec![6.0, 7.0, 8.0]);
        assert!(table.window(3).is_none());
    }

    #[test]
    fn test_window_longer_than_signal() {
        let table = segment(&ramp(5), 8, 1).unwrap();
        assert!(table.is_empty());
        assert_eq!(table.win_len(), 8);
    }

    #[test]
    fn test_zero_lengths_rejected() {
        assert_eq!(
            segment(&ramp(10), 4, 0).unwrap_err(),
            SegmentError::InvalidParameter {
                name: "hop_len",
                value: 0
            }
        );
        assert_eq!(
            segment(&ramp(10), 0, 2).unwrap_err(),
            SegmentError::InvalidParameter {
                name: "win_len",
                value: 0
            }
        );
    }

    #[test]
    fn test_labels_survive_value_replacement() {
        let labels = Labels::new().with("state", "B").with("load", 1i64);
        let table = segment(&ramp(6), 2, 2).unwrap().with_labels(labels.clone());

        let zeroed = table.with_values(Array2::zeros((3, 2))).unwrap();
        assert_eq!(zeroed.labels(), &labels);
        assert_eq!(zeroed.hop_len(), 2);
    }

    #[test]
    fn test_segment_as_array() {
        let segments = segment_as(&ramp(10), 4, 2, OutputFormat::Array).unwrap();
        assert!(matches!(segments, Segments::Array(_)));
        assert_eq!(segments.n_rows(), 4);
        assert_eq!(segments.into_array().row(3).to_vec(), vec![6.0, 7.0, 8.0, 9.0]);
    }

    #[test]
    fn test_output_format_names() {
        assert_eq!("DataFrame".parse::<OutputFormat>().unwrap(), OutputFormat::Table);
        assert_eq!("ndarray".parse::<OutputFormat>().unwrap(), OutputFormat::Array);
        assert_eq!(
            "parquet".parse::<OutputFormat>().unwrap_err(),
            SegmentError::UnsupportedType("parquet".to_string())
        );
    }

    proptest! {
        #[test]
        fn prop_window_count_and_offsets(
            signal in prop::collection::vec(-1.0e3f64..1.0e3, 1..200),
            win_len in 1usize..64,
            hop_len in 1usize..64,
        ) {
            let n = signal.len();
            let table = segment(&signal, win_len, hop_len).unwrap();

            let expected = if win_len > n { 0 } else { (n - win_len) / hop_len + 1 };
            prop_assert_eq!(table.len(), expected);

            for (i, window) in table.windows().enumerate() {
                let start = i * hop_len;
                prop_assert_eq!(window.to_vec(), signal[start..start + win_len].to_vec());
            }
        }
    }
}
