use infrastructure::HttpClientConfig;
use reqwest_middleware::ClientWithMiddleware;

use crate::core::energy::EnergyType;
use crate::core::timeseries::RawSeries;
use crate::port::{DataSource, FetchError};

/// Client of a remote `/api/data/{energy_type}` endpoint.
#[derive(Debug, Clone)]
pub struct HttpDataSource {
    client: ClientWithMiddleware,
    base_url: String,
}

impl HttpDataSource {
    pub fn new(url: &str, token: Option<String>) -> anyhow::Result<Self> {
        let client = HttpClientConfig::new(token).new_tracing_client()?;

        Ok(Self {
            client,
            base_url: url.trim_end_matches('/').to_owned(),
        })
    }

    fn url_of(&self, energy_type: EnergyType) -> String {
        format!("{}/api/data/{}", self.base_url, energy_type.key())
    }
}

impl DataSource for HttpDataSource {
    #[tracing::instrument(skip(self))]
    async fn fetch(&self, energy_type: EnergyType) -> Result<RawSeries, FetchError> {
        let url = self.url_of(energy_type);

        let response = self
            .client
            .get(url.as_str())
            .send()
            .await
            .map_err(|e| FetchError::Transport { message: e.to_string() })?;

        let status = response.status();
        if !status.is_success() {
            return Err(FetchError::Status {
                status: status.as_u16(),
                url,
            });
        }

        response
            .json::<RawSeries>()
            .await
            .map_err(|e| FetchError::Malformed { message: e.to_string() })
    }
}
