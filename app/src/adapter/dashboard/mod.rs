mod chart;

use std::sync::Arc;

use actix_web::{
    HttpResponse, ResponseError,
    http::header,
    web::{self, Path},
};
use anyhow::Context as _;
use derive_more::derive::{Display, Error};

use crate::core::DashboardApi;
use crate::core::aggregate;
use crate::core::energy::EnergyType;
use crate::port::{DataSource, FetchError};

pub fn routes<S: DataSource + 'static>(api: Arc<DashboardApi<S>>) -> actix_web::Scope {
    web::scope("/dashboard/{energy_type}")
        .route("", web::get().to(full_view::<S>))
        .route("/yearly", web::get().to(yearly::<S>))
        .route("/yearly.csv", web::get().to(yearly_csv::<S>))
        .route("/monthly", web::get().to(monthly::<S>))
        .route("/avg_monthly", web::get().to(avg_monthly::<S>))
        .route("/cumulative", web::get().to(cumulative::<S>))
        .route("/refresh", web::post().to(refresh::<S>))
        .app_data(web::Data::from(api))
}

type DashboardResponse = Result<HttpResponse, DashboardApiError>;

#[derive(Debug, Error, Display)]
enum DashboardApiError {
    #[display("Error loading data: {_0}")]
    DataSourceError(FetchError),

    #[display("Internal error")]
    InternalError(anyhow::Error),

    #[display("Selection changed while loading")]
    Superseded,
}

impl ResponseError for DashboardApiError {
    fn status_code(&self) -> actix_web::http::StatusCode {
        use actix_web::http::StatusCode;

        tracing::warn!("DashboardApiError: {:?}", self);

        match self {
            DashboardApiError::DataSourceError(e) if e.is_network() => StatusCode::BAD_GATEWAY,
            DashboardApiError::Superseded => StatusCode::CONFLICT,
            _ => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }
}

async fn full_view<S: DataSource + 'static>(
    api: web::Data<DashboardApi<S>>,
    energy_type: Path<EnergyType>,
) -> DashboardResponse {
    let view = api
        .view(*energy_type)
        .await
        .map_err(DashboardApiError::DataSourceError)?;

    Ok(HttpResponse::Ok().json(view))
}

async fn yearly<S: DataSource + 'static>(
    api: web::Data<DashboardApi<S>>,
    energy_type: Path<EnergyType>,
) -> DashboardResponse {
    let energy_type = *energy_type;
    let payload = api
        .aggregate(energy_type, |raw, _| chart::yearly_chart(energy_type, &aggregate::yearly(raw)))
        .await
        .map_err(DashboardApiError::DataSourceError)?;

    Ok(HttpResponse::Ok().json(payload))
}

async fn monthly<S: DataSource + 'static>(
    api: web::Data<DashboardApi<S>>,
    energy_type: Path<EnergyType>,
) -> DashboardResponse {
    let energy_type = *energy_type;
    let payload = api
        .aggregate(energy_type, |raw, reference_year| {
            chart::monthly_chart(energy_type, &aggregate::monthly_by_year(raw, reference_year))
        })
        .await
        .map_err(DashboardApiError::DataSourceError)?;

    Ok(HttpResponse::Ok().json(payload))
}

async fn avg_monthly<S: DataSource + 'static>(
    api: web::Data<DashboardApi<S>>,
    energy_type: Path<EnergyType>,
) -> DashboardResponse {
    let energy_type = *energy_type;
    let payload = api
        .aggregate(energy_type, |raw, _| chart::avg_monthly_chart(energy_type, &aggregate::avg_monthly(raw)))
        .await
        .map_err(DashboardApiError::DataSourceError)?;

    Ok(HttpResponse::Ok().json(payload))
}

async fn cumulative<S: DataSource + 'static>(
    api: web::Data<DashboardApi<S>>,
    energy_type: Path<EnergyType>,
) -> DashboardResponse {
    let energy_type = *energy_type;
    let payload = api
        .aggregate(energy_type, |raw, _| chart::cumulative_chart(energy_type, &aggregate::cumulative(raw)))
        .await
        .map_err(DashboardApiError::DataSourceError)?;

    Ok(HttpResponse::Ok().json(payload))
}

#[derive(Debug, serde::Deserialize)]
struct RefreshParams {
    session: Option<String>,
}

async fn refresh<S: DataSource + 'static>(
    api: web::Data<DashboardApi<S>>,
    energy_type: Path<EnergyType>,
    params: web::Query<RefreshParams>,
) -> DashboardResponse {
    let view = api
        .switch_energy_type(params.session.as_deref(), *energy_type)
        .await
        .map_err(DashboardApiError::DataSourceError)?
        .ok_or(DashboardApiError::Superseded)?;

    Ok(HttpResponse::Ok().json(view))
}

#[derive(serde::Serialize)]
struct YearRow<'a> {
    year: &'a str,
    value: f64,
}

async fn yearly_csv<S: DataSource + 'static>(
    api: web::Data<DashboardApi<S>>,
    energy_type: Path<EnergyType>,
) -> DashboardResponse {
    let yearly = api
        .aggregate(*energy_type, |raw, _| aggregate::yearly(raw))
        .await
        .map_err(DashboardApiError::DataSourceError)?;

    let rows = yearly
        .labels
        .iter()
        .zip(yearly.values.iter())
        .map(|(year, value)| YearRow { year, value: *value });

    csv_response(rows)
}

fn csv_response<S: serde::Serialize>(rows: impl IntoIterator<Item = S>) -> DashboardResponse {
    let mut writer = csv::Writer::from_writer(vec![]);

    for row in rows {
        writer
            .serialize(row)
            .context("Error serializing row to CSV")
            .map_err(DashboardApiError::InternalError)?;
    }

    let csv = writer
        .into_inner()
        .context("Error creating CSV")
        .map_err(DashboardApiError::InternalError)?;

    Ok(HttpResponse::Ok()
        .append_header(header::ContentType(mime::TEXT_CSV))
        .body(csv))
}
