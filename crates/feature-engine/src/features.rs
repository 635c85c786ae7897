//! Feature Registry and Extraction

use crate::characteristics::{additionals, CanonicalCharacteristics, NamedValues, ADDITIONAL_NAMES};
use crate::fft::Spectrum;
use crate::{spectral, statistics, BoxError, FeatureError};
use ndarray::{Array2, ArrayView1, ArrayView2};
use segmenter::{check_shape, Labels, NumericTable, SegmentError};
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::fmt;
use std::sync::Arc;
use tracing::debug;

/// Extra argument passed to a feature function alongside the window
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum FeatureArg {
    Number(f64),
    Flag(bool),
    Series(Vec<f64>),
    Text(String),
}

/// Positional and keyword arguments of one feature
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct FeatureArgs {
    pub positional: Vec<FeatureArg>,
    pub keyword: BTreeMap<String, FeatureArg>,
}

impl FeatureArgs {
    pub fn positional(&self, index: usize) -> Option<&FeatureArg> {
        self.positional.get(index)
    }

    pub fn keyword(&self, key: &str) -> Option<&FeatureArg> {
        self.keyword.get(key)
    }

    /// Positional argument `index` as a numeric series
    pub fn series(&self, index: usize) -> Result<&[f64], FeatureError> {
        match self.positional(index) {
            Some(FeatureArg::Series(values)) => Ok(values),
            Some(other) => Err(FeatureError::Argument(format!(
                "positional {} is {:?}, expected a series",
                index, other
            ))),
            None => Err(FeatureError::Argument(format!("positional {} missing", index))),
        }
    }

    /// Keyword argument `key` as a number, or `default` when absent
    pub fn number_or(&self, key: &str, default: f64) -> Result<f64, FeatureError> {
        match self.keyword(key) {
            Some(FeatureArg::Number(v)) => Ok(*v),
            Some(other) => Err(FeatureError::Argument(format!(
                "keyword {} is {:?}, expected a number",
                key, other
            ))),
            None => Ok(default),
        }
    }
}

type ScalarFn = dyn Fn(&[f64], &FeatureArgs) -> Result<f64, BoxError> + Send + Sync;

#[derive(Clone)]
enum FeatureKind {
    Scalar(Arc<ScalarFn>),
    Vector {
        plugin: Arc<dyn CanonicalCharacteristics>,
        include_additionals: bool,
    },
}

/// Result of one feature on one window
#[derive(Debug, Clone, PartialEq)]
pub enum FeatureOutput {
    Scalar(f64),
    Vector(NamedValues),
}

/// A named feature: a pure function of a window plus fixed arguments.
///
/// Scalar features fill one column named after the feature; vector features
/// fill one column per name the plugin declares.
#[derive(Clone)]
pub struct FeatureSpec {
    name: String,
    kind: FeatureKind,
    args: FeatureArgs,
}

impl fmt::Debug for FeatureSpec {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let kind = match &self.kind {
            FeatureKind::Scalar(_) => "scalar",
            FeatureKind::Vector { .. } => "vector",
        };
        f.debug_struct("FeatureSpec")
            .field("name", &self.name)
            .field("kind", &kind)
            .field("args", &self.args)
            .finish()
    }
}

impl FeatureSpec {
    /// Scalar feature from a fallible function of the window and arguments
    pub fn scalar<F>(name: impl Into<String>, func: F) -> Self
    where
        F: Fn(&[f64], &FeatureArgs) -> Result<f64, BoxError> + Send + Sync + 'static,
    {
        Self {
            name: name.into(),
            kind: FeatureKind::Scalar(Arc::new(func)),
            args: FeatureArgs::default(),
        }
    }

    /// Scalar feature from a plain time domain formula
    pub fn time_domain(name: impl Into<String>, formula: fn(&[f64]) -> f64) -> Self {
        Self::scalar(name, move |window, _| Ok(formula(window)))
    }

    /// Scalar feature over a magnitude spectrum row; the frequency axis is
    /// positional argument 0
    pub fn spectral(
        name: impl Into<String>,
        formula: fn(&Spectrum<'_>) -> f64,
        freq_axis: Vec<f64>,
    ) -> Self {
        Self::scalar(name, move |magnitude, args| {
            let spectrum = Spectrum::new(magnitude, args.series(0)?)?;
            Ok(formula(&spectrum))
        })
        .with_arg(FeatureArg::Series(freq_axis))
    }

    /// Vector feature backed by a characteristics plugin, optionally followed
    /// by `DN_Mean` and `DN_Spread_Std` of the raw window
    pub fn characteristics(
        name: impl Into<String>,
        plugin: impl CanonicalCharacteristics + 'static,
        include_additionals: bool,
    ) -> Self {
        Self {
            name: name.into(),
            kind: FeatureKind::Vector {
                plugin: Arc::new(plugin),
                include_additionals,
            },
            args: FeatureArgs::default(),
        }
    }

    pub fn with_arg(mut self, arg: FeatureArg) -> Self {
        self.args.positional.push(arg);
        self
    }

    pub fn with_kwarg(mut self, key: impl Into<String>, arg: FeatureArg) -> Self {
        self.args.keyword.insert(key.into(), arg);
        self
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn args(&self) -> &FeatureArgs {
        &self.args
    }

    /// Output columns this feature contributes, in order
    pub fn output_names(&self) -> Vec<String> {
        match &self.kind {
            FeatureKind::Scalar(_) => vec![self.name.clone()],
            FeatureKind::Vector {
                plugin,
                include_additionals,
            } => {
                let mut names = plugin.names();
                if *include_additionals {
                    names.extend(ADDITIONAL_NAMES.iter().map(|s| s.to_string()));
                }
                names
            }
        }
    }

    /// Evaluate on one window
    pub fn compute(&self, window: &[f64]) -> Result<FeatureOutput, BoxError> {
        match &self.kind {
            FeatureKind::Scalar(func) => func(window, &self.args).map(FeatureOutput::Scalar),
            FeatureKind::Vector {
                plugin,
                include_additionals,
            } => {
                let mut named = plugin.characterize(window, &self.args)?;
                if *include_additionals {
                    for (name, value) in ADDITIONAL_NAMES.iter().zip(additionals(window)) {
                        named.push(*name, value);
                    }
                }
                Ok(FeatureOutput::Vector(named))
            }
        }
    }
}

/// Ordered feature registry; registration order is column order
#[derive(Debug, Clone, Default)]
pub struct FeatureSet {
    specs: Vec<FeatureSpec>,
}

impl FeatureSet {
    pub fn new() -> Self {
        Self::default()
    }

    /// rms, peak, smsa, crest, clearance, shape and impulse factors
    pub fn time_domain() -> Self {
        let formulas: [(&str, fn(&[f64]) -> f64); 7] = [
            ("rms", statistics::rms),
            ("peak", statistics::peak),
            ("smsa", statistics::smsa),
            ("crest_factor", statistics::crest_factor),
            ("clearance_factor", statistics::clearance_factor),
            ("shape_factor", statistics::shape_factor),
            ("impulse_factor", statistics::impulse_factor),
        ];
        Self {
            specs: formulas
                .into_iter()
                .map(|(name, formula)| FeatureSpec::time_domain(name, formula))
                .collect(),
        }
    }

    /// Spectral centroid and P17..P24 over magnitude spectra sharing `freq_axis`
    pub fn frequency_domain(freq_axis: Vec<f64>) -> Self {
        let formulas: [(&str, fn(&Spectrum<'_>) -> f64); 9] = [
            ("spectral_centroid", spectral::spectral_centroid),
            ("P17", spectral::p17),
            ("P18", spectral::p18),
            ("P19", spectral::p19),
            ("P20", spectral::p20),
            ("P21", spectral::p21),
            ("P22", spectral::p22),
            ("P23", spectral::p23),
            ("P24", spectral::p24),
        ];
        Self {
            specs: formulas
                .into_iter()
                .map(|(name, formula)| FeatureSpec::spectral(name, formula, freq_axis.clone()))
                .collect(),
        }
    }

    /// Append a feature; fails if any of its columns is already registered
    pub fn push(&mut self, spec: FeatureSpec) -> Result<&mut Self, FeatureError> {
        if self.specs.iter().any(|s| s.name == spec.name) {
            return Err(FeatureError::DuplicateColumn(spec.name));
        }

        let mut seen = self.columns();
        for name in spec.output_names() {
            if seen.contains(&name) {
                return Err(FeatureError::DuplicateColumn(name));
            }
            seen.push(name);
        }

        self.specs.push(spec);
        Ok(self)
    }

    /// Builder-style [`FeatureSet::push`]
    pub fn with(mut self, spec: FeatureSpec) -> Result<Self, FeatureError> {
        self.push(spec)?;
        Ok(self)
    }

    /// Append every feature of `other`
    pub fn extend(mut self, other: FeatureSet) -> Result<Self, FeatureError> {
        for spec in other.specs {
            self.push(spec)?;
        }
        Ok(self)
    }

    /// Output column names in order
    pub fn columns(&self) -> Vec<String> {
        self.specs.iter().flat_map(|s| s.output_names()).collect()
    }

    pub fn iter(&self) -> impl Iterator<Item = &FeatureSpec> {
        self.specs.iter()
    }

    pub fn len(&self) -> usize {
        self.specs.len()
    }

    pub fn is_empty(&self) -> bool {
        self.specs.is_empty()
    }
}

/// Feature values, one row per window, followed by broadcast label columns
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FeatureTable {
    columns: Vec<String>,
    values: Array2<f64>,
    labels: Labels,
}

impl FeatureTable {
    /// Feature column names in registration order
    pub fn columns(&self) -> &[String] {
        &self.columns
    }

    pub fn column(&self, name: &str) -> Option<ArrayView1<'_, f64>> {
        let index = self.columns.iter().position(|c| c == name)?;
        Some(self.values.column(index))
    }

    pub fn row(&self, index: usize) -> Option<ArrayView1<'_, f64>> {
        (index < self.len()).then(|| self.values.row(index))
    }

    pub fn labels(&self) -> &Labels {
        &self.labels
    }

    /// Feature columns followed by label columns
    pub fn all_columns(&self) -> Vec<String> {
        self.columns
            .iter()
            .cloned()
            .chain(self.labels.keys().map(str::to_string))
            .collect()
    }

    pub fn len(&self) -> usize {
        self.values.nrows()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

impl NumericTable for FeatureTable {
    fn values(&self) -> ArrayView2<'_, f64> {
        self.values.view()
    }

    fn with_values(&self, values: Array2<f64>) -> Result<Self, SegmentError> {
        check_shape(self.values.dim(), values.dim())?;
        Ok(Self {
            columns: self.columns.clone(),
            values,
            labels: self.labels.clone(),
        })
    }

    fn label_columns(&self) -> Labels {
        self.labels.clone()
    }
}

/// Applies a [`FeatureSet`] to every window of a table
#[derive(Debug, Clone)]
pub struct FeatureExtractor {
    features: FeatureSet,
}

impl FeatureExtractor {
    pub fn new(features: FeatureSet) -> Self {
        Self { features }
    }

    pub fn features(&self) -> &FeatureSet {
        &self.features
    }

    /// Compute every feature for every row.
    ///
    /// Any failure aborts the whole extraction; no partial table is returned.
    pub fn apply<T: NumericTable>(&self, table: &T) -> Result<FeatureTable, FeatureError> {
        let columns = self.features.columns();
        let windows = table.values();
        let rows = windows.nrows();

        debug!(
            "Extracting {} feature columns from {} windows of {} samples",
            columns.len(),
            rows,
            windows.ncols()
        );

        let mut values = Array2::zeros((rows, columns.len()));
        let mut buffer = Vec::with_capacity(windows.ncols());

        for (row, window) in windows.rows().into_iter().enumerate() {
            buffer.clear();
            buffer.extend(window.iter().copied());

            let mut col = 0;
            for spec in self.features.iter() {
                let output = spec.compute(&buffer).map_err(|source| FeatureError::Computation {
                    feature: spec.name.clone(),
                    row,
                    source,
                })?;

                match output {
                    FeatureOutput::Scalar(value) => {
                        values[[row, col]] = value;
                        col += 1;
                    }
                    FeatureOutput::Vector(named) => {
                        let expected = spec.output_names();
                        if named.names != expected || named.values.len() != expected.len() {
                            return Err(FeatureError::InconsistentOutput {
                                feature: spec.name.clone(),
                                row,
                                expected,
                                actual: named.names,
                            });
                        }
                        for value in named.values {
                            values[[row, col]] = value;
                            col += 1;
                        }
                    }
                }
            }
        }

        Ok(FeatureTable {
            columns,
            values,
            labels: table.label_columns(),
        })
    }
}

/// Apply `features` to every row of `table`
pub fn apply<T: NumericTable>(
    table: &T,
    features: &FeatureSet,
) -> Result<FeatureTable, FeatureError> {
    FeatureExtractor::new(features.clone()).apply(table)
}
