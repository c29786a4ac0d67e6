use serde::{Deserialize, Serialize};

/// Ordered marker timestamps in seconds
///
/// Markers are non-decreasing as authored in the host; adjacent duplicates
/// are allowed and skipped during analysis.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct MarkerSequence(Vec<f64>);

impl MarkerSequence {
    pub fn new() -> Self {
        Self(Vec::new())
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    /// Whether there are enough markers to derive at least one rate
    pub fn has_rate_data(&self) -> bool {
        self.0.len() >= 2
    }

    pub fn times(&self) -> &[f64] {
        &self.0
    }

    /// Adjacent `(earlier, later)` marker pairs
    pub fn intervals(&self) -> impl Iterator<Item = (f64, f64)> + '_ {
        self.0.windows(2).map(|pair| (pair[0], pair[1]))
    }
}

impl From<Vec<f64>> for MarkerSequence {
    fn from(times: Vec<f64>) -> Self {
        Self(times)
    }
}

impl FromIterator<f64> for MarkerSequence {
    fn from_iter<I: IntoIterator<Item = f64>>(iter: I) -> Self {
        Self(iter.into_iter().collect())
    }
}

/// One accepted stroke-rate measurement
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct CadenceSample {
    /// Instantaneous rate from the marker pair (strokes per minute)
    pub spot_rate: f64,

    /// Mean of every spot rate accepted so far in the same series
    pub running_avg_rate: f64,

    /// Time of the later marker, when the rate becomes known
    pub occurs_at: f64,

    /// In point of the layer the markers came from (0.0 for the source itself)
    pub origin_layer_start: f64,
}

/// All cadence samples for one source
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SourceCadence {
    pub source_id: String,

    /// Top-level series followed by each layer's series, in layer order
    pub samples: Vec<CadenceSample>,
}

impl SourceCadence {
    pub fn new<S: Into<String>>(source_id: S, samples: Vec<CadenceSample>) -> Self {
        Self {
            source_id: source_id.into(),
            samples,
        }
    }

    /// Running average of the last sample, or `None` without rate data
    pub fn final_rate(&self) -> Option<f64> {
        self.samples.last().map(|sample| sample.running_avg_rate)
    }

    pub fn has_rate_data(&self) -> bool {
        !self.samples.is_empty()
    }

    pub fn spot_rates(&self) -> Vec<f64> {
        self.samples.iter().map(|sample| sample.spot_rate).collect()
    }
}
