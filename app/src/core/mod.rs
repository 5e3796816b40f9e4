pub mod aggregate;
pub mod api;
pub mod energy;
pub mod time;
pub mod timeseries;

pub use api::{DashboardApi, SeriesCache};
