use std::sync::Arc;

use settings::Settings;

use crate::core::energy::EnergyType;
use crate::core::{DashboardApi, SeriesCache};

mod adapter;
mod core;
pub mod port;
mod settings;

#[tokio::main(flavor = "multi_thread")]
pub async fn main() {
    let settings = Settings::new().expect("Error reading configuration");

    settings.monitoring.init().expect("Error initializing monitoring");

    let source = settings
        .data_source
        .new_data_source()
        .expect("Error initializing data source");

    let api = Arc::new(DashboardApi::new(source, SeriesCache::new(settings.dashboard.cache_ttl())));

    if settings.dashboard.preload {
        tracing::info!("Preloading energy series");
        let loaded = api.preload().await;
        tracing::info!("Preloaded {} of {} energy types", loaded, EnergyType::variants().len());
    }

    let csv_store = settings.data_source.csv_store();

    tracing::info!("Starting HTTP server");

    settings
        .http_server
        .run_server(move || {
            let mut scopes = vec![adapter::dashboard::routes(api.clone())];
            if let Some(store) = &csv_store {
                scopes.push(adapter::csv_store::new_actix_web_scope(store.clone()));
            }
            scopes
        })
        .await
        .expect("HTTP server execution failed");
}
