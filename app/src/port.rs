#![allow(async_fn_in_trait)]

use derive_more::derive::{Display, Error};

use crate::core::energy::EnergyType;
use crate::core::timeseries::RawSeries;

/// Delivers the raw readings of one energy type. Implementations never retry.
pub trait DataSource {
    async fn fetch(&self, energy_type: EnergyType) -> Result<RawSeries, FetchError>;
}

#[derive(Debug, Clone, PartialEq, Eq, Display, Error)]
pub enum FetchError {
    #[display("Data source returned status {status} for {url}")]
    Status { status: u16, url: String },

    #[display("Error reaching data source: {message}")]
    Transport { message: String },

    #[display("Malformed data source response: {message}")]
    Malformed { message: String },

    #[display("Error reading stored readings: {message}")]
    Storage { message: String },
}

impl FetchError {
    //failures of the remote side as opposed to bad data
    pub fn is_network(&self) -> bool {
        matches!(self, FetchError::Status { .. } | FetchError::Transport { .. })
    }
}
