mod label;

pub use label::SeriesLabel;

use derive_more::derive::{Display, Error};
use serde::{Deserialize, Serialize};

/// Date labelled readings as delivered by a data source. Labels and values are index-aligned,
/// label order is whatever the source delivers.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(try_from = "RawSeriesDto")]
pub struct RawSeries {
    labels: Vec<String>,
    values: Vec<Option<f64>>,
}

#[derive(Debug, Clone, PartialEq, Eq, Display, Error)]
pub enum SeriesError {
    #[display("Series has {labels} labels but {values} values")]
    LengthMismatch { labels: usize, values: usize },
}

#[derive(Deserialize)]
struct RawSeriesDto {
    labels: Vec<String>,
    values: Vec<Option<f64>>,
}

impl TryFrom<RawSeriesDto> for RawSeries {
    type Error = SeriesError;

    fn try_from(dto: RawSeriesDto) -> Result<Self, Self::Error> {
        RawSeries::new(dto.labels, dto.values)
    }
}

impl RawSeries {
    //non-finite readings are stored as missing
    pub fn new(labels: Vec<String>, values: Vec<Option<f64>>) -> Result<Self, SeriesError> {
        if labels.len() != values.len() {
            return Err(SeriesError::LengthMismatch {
                labels: labels.len(),
                values: values.len(),
            });
        }

        let values = values.into_iter().map(|v| v.filter(|v| v.is_finite())).collect();

        Ok(Self { labels, values })
    }

    pub fn from_readings<L: Into<String>>(readings: impl IntoIterator<Item = (L, f64)>) -> Self {
        let (labels, values): (Vec<String>, Vec<Option<f64>>) = readings
            .into_iter()
            .map(|(label, value)| (label.into(), Some(value).filter(|v| v.is_finite())))
            .unzip();

        Self { labels, values }
    }

    pub fn labels(&self) -> &[String] {
        &self.labels
    }

    pub fn values(&self) -> &[Option<f64>] {
        &self.values
    }

    pub fn len(&self) -> usize {
        self.labels.len()
    }

    pub fn is_empty(&self) -> bool {
        self.labels.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, Option<f64>)> + '_ {
        self.labels.iter().map(String::as_str).zip(self.values.iter().copied())
    }

    /// Entries whose label parses as a calendar date. Malformed labels are logged and skipped.
    pub fn dated(&self) -> impl Iterator<Item = (SeriesLabel, Option<f64>)> + '_ {
        self.iter().filter_map(|(label, value)| match label.parse::<SeriesLabel>() {
            Ok(parsed) => Some((parsed, value)),
            Err(e) => {
                tracing::warn!("Skipping entry: {}", e);
                None
            }
        })
    }
}
