use config::{Config, ConfigError, Environment, File};
use infrastructure::{HttpServerConfig, MonitoringConfig};
use serde::Deserialize;

#[derive(Debug, Deserialize)]
pub struct Settings {
    pub http_server: HttpServerConfig,
    pub monitoring: MonitoringConfig,
    #[serde(default)]
    pub dashboard: DashboardSettings,
    pub data_source: crate::adapter::DataSourceSettings,
}

impl Settings {
    pub fn new() -> Result<Self, ConfigError> {
        let builder = Config::builder()
            .add_source(File::with_name("config.toml"))
            .add_source(Environment::with_prefix("DASHBOARD").separator("__"));

        let s = builder.build()?;
        s.try_deserialize()
    }
}

#[derive(Debug, Deserialize, Clone)]
pub struct DashboardSettings {
    pub cache_ttl_secs: u64,
    pub preload: bool,
}

impl DashboardSettings {
    pub fn cache_ttl(&self) -> std::time::Duration {
        std::time::Duration::from_secs(self.cache_ttl_secs)
    }
}

impl Default for DashboardSettings {
    fn default() -> Self {
        Self {
            cache_ttl_secs: 3 * 60 * 60,
            preload: true,
        }
    }
}
