pub mod csv_store;
pub mod dashboard;
pub mod data_api;

use std::path::PathBuf;

use serde::Deserialize;

use crate::core::energy::EnergyType;
use crate::core::timeseries::RawSeries;
use crate::port::{DataSource, FetchError};
use csv_store::CsvDataSource;
use data_api::HttpDataSource;

#[derive(Debug, Clone, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum DataSourceSettings {
    Csv { path: PathBuf },
    Http { url: String, token: Option<String> },
}

impl DataSourceSettings {
    pub fn new_data_source(&self) -> anyhow::Result<ConfiguredDataSource> {
        Ok(match self {
            DataSourceSettings::Csv { path } => ConfiguredDataSource::Csv(CsvDataSource::new(path)),
            DataSourceSettings::Http { url, token } => {
                ConfiguredDataSource::Http(HttpDataSource::new(url, token.clone())?)
            }
        })
    }

    //readings file to expose via /api/data, if the dashboard owns one
    pub fn csv_store(&self) -> Option<CsvDataSource> {
        match self {
            DataSourceSettings::Csv { path } => Some(CsvDataSource::new(path)),
            DataSourceSettings::Http { .. } => None,
        }
    }
}

#[derive(Debug, Clone)]
pub enum ConfiguredDataSource {
    Csv(CsvDataSource),
    Http(HttpDataSource),
}

impl DataSource for ConfiguredDataSource {
    async fn fetch(&self, energy_type: EnergyType) -> Result<RawSeries, FetchError> {
        match self {
            ConfiguredDataSource::Csv(source) => source.fetch(energy_type).await,
            ConfiguredDataSource::Http(source) => source.fetch(energy_type).await,
        }
    }
}
