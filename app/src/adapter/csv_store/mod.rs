mod http_server;

use std::collections::BTreeMap;
use std::io::Read;
use std::path::{Path, PathBuf};

use anyhow::Context as _;
use chrono::NaiveDate;
use serde::Serialize;

pub use http_server::new_actix_web_scope;

use crate::core::energy::EnergyType;
use crate::core::timeseries::RawSeries;
use crate::port::{DataSource, FetchError};

const DATE_COLUMN: &str = "datum";

/// Meter readings file: `;` separated, `,` as decimal separator, one `datum` column plus one
/// column per energy type key. The file is read on every fetch as it is maintained externally.
#[derive(Debug, Clone)]
pub struct CsvDataSource {
    path: PathBuf,
}

impl CsvDataSource {
    pub fn new(path: impl AsRef<Path>) -> Self {
        Self {
            path: path.as_ref().to_path_buf(),
        }
    }
}

impl CsvDataSource {
    /// All rows of the readings file, newest first.
    pub async fn readings(&self) -> Result<Vec<ReadingRow>, FetchError> {
        let content = self.read_file().await?;

        read_readings(content.as_slice()).map_err(|e| FetchError::Malformed {
            message: format!("{:#}", e),
        })
    }

    async fn read_file(&self) -> Result<Vec<u8>, FetchError> {
        tokio::fs::read(&self.path).await.map_err(|e| FetchError::Storage {
            message: format!("{}: {}", self.path.display(), e),
        })
    }
}

impl DataSource for CsvDataSource {
    async fn fetch(&self, energy_type: EnergyType) -> Result<RawSeries, FetchError> {
        let content = self.read_file().await?;

        read_series(content.as_slice(), energy_type).map_err(|e| FetchError::Malformed {
            message: format!("{:#}", e),
        })
    }
}

/// Readings of one energy type in file order. Empty or unparseable cells become missing values,
/// a file without a column for the energy type yields an empty series.
pub fn read_series<R: Read>(reader: R, energy_type: EnergyType) -> anyhow::Result<RawSeries> {
    let mut reader = csv::ReaderBuilder::new()
        .delimiter(b';')
        .trim(csv::Trim::All)
        .flexible(true)
        .from_reader(reader);

    let headers = reader.headers().context("Error reading CSV header")?.clone();

    let date_idx = headers
        .iter()
        .position(|h| h == DATE_COLUMN)
        .with_context(|| format!("Missing column {}", DATE_COLUMN))?;

    let value_idx = match headers.iter().position(|h| h == energy_type.key()) {
        Some(idx) => idx,
        None => {
            tracing::warn!("No column for {} in readings file", energy_type);
            return Ok(RawSeries::default());
        }
    };

    let mut labels = vec![];
    let mut values = vec![];

    for (line, record) in reader.records().enumerate() {
        let record = record.with_context(|| format!("Error reading CSV record {}", line + 1))?;

        let label = match record.get(date_idx).and_then(date_part) {
            Some(label) => label,
            None => {
                tracing::warn!("Skipping CSV record {} without date", line + 1);
                continue;
            }
        };

        labels.push(label.to_owned());
        values.push(record.get(value_idx).and_then(parse_reading));
    }

    Ok(RawSeries::new(labels, values)?)
}

/// One row of the readings list. Serialized with display titles as keys, `Datum` as `DD.MM.YYYY`.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ReadingRow {
    #[serde(rename = "Datum", serialize_with = "serialize_display_date")]
    day: NaiveDate,
    #[serde(flatten)]
    readings: BTreeMap<String, Option<i64>>,
}

fn serialize_display_date<S: serde::Serializer>(date: &NaiveDate, serializer: S) -> Result<S::Ok, S::Error> {
    serializer.collect_str(&date.format("%d.%m.%Y"))
}

/// Every row and column of the readings file, newest first. Energy type columns get their display
/// title, unknown columns keep their header. Rows without a valid date are skipped, an empty file
/// gives no rows.
pub fn read_readings<R: Read>(reader: R) -> anyhow::Result<Vec<ReadingRow>> {
    let mut reader = csv::ReaderBuilder::new()
        .delimiter(b';')
        .trim(csv::Trim::All)
        .flexible(true)
        .from_reader(reader);

    let headers = reader.headers().context("Error reading CSV header")?.clone();
    if headers.iter().all(str::is_empty) {
        return Ok(vec![]);
    }

    let date_idx = headers
        .iter()
        .position(|h| h == DATE_COLUMN)
        .with_context(|| format!("Missing column {}", DATE_COLUMN))?;

    let columns: Vec<(usize, String)> = headers
        .iter()
        .enumerate()
        .filter(|(idx, h)| *idx != date_idx && !h.is_empty())
        .map(|(idx, h)| {
            let title = EnergyType::from_key(h).map_or(h, |t| t.column_title());
            (idx, title.to_owned())
        })
        .collect();

    let mut rows = vec![];

    for (line, record) in reader.records().enumerate() {
        let record = record.with_context(|| format!("Error reading CSV record {}", line + 1))?;

        let day = match record
            .get(date_idx)
            .and_then(date_part)
            .and_then(|d| NaiveDate::parse_from_str(d, "%Y-%m-%d").ok())
        {
            Some(day) => day,
            None => {
                tracing::warn!("Skipping CSV record {} without valid date", line + 1);
                continue;
            }
        };

        let readings = columns
            .iter()
            .map(|(idx, title)| {
                let value = record.get(*idx).and_then(parse_reading).map(|v| v as i64);
                (title.clone(), value)
            })
            .collect();

        rows.push(ReadingRow { day, readings });
    }

    //stable sort keeps later file rows first for equal dates
    rows.reverse();
    rows.sort_by(|a, b| b.day.cmp(&a.day));

    Ok(rows)
}

//"2024-01-15 00:00:00" -> "2024-01-15"
fn date_part(cell: &str) -> Option<&str> {
    cell.split_whitespace().next()
}

//stored readings are whole meter units
fn parse_reading(cell: &str) -> Option<f64> {
    cell.replace(',', ".")
        .parse::<f64>()
        .ok()
        .filter(|v| v.is_finite())
        .map(f64::floor)
}
