use actix_web::web::{self, Path};
use actix_web::{HttpResponse, Responder};

use crate::core::energy::EnergyType;
use crate::port::DataSource;

use super::CsvDataSource;

pub fn new_actix_web_scope(store: CsvDataSource) -> actix_web::Scope {
    web::scope("/api")
        .route("/data/{energy_type}", web::get().to(handle_get_series))
        .route("/readings", web::get().to(handle_get_readings))
        .app_data(web::Data::new(store))
}

async fn handle_get_series(store: web::Data<CsvDataSource>, key: Path<String>) -> impl Responder {
    let energy_type = match EnergyType::from_key(&key) {
        Some(t) => t,
        None => return HttpResponse::NotFound().body(format!("Unknown energy type {}", key)),
    };

    match store.fetch(energy_type).await {
        Ok(series) => HttpResponse::Ok().json(series),
        Err(e) => {
            tracing::error!("Error reading series for {}: {}", energy_type, e);
            HttpResponse::InternalServerError().body(format!("Error: {e}"))
        }
    }
}

async fn handle_get_readings(store: web::Data<CsvDataSource>) -> impl Responder {
    match store.readings().await {
        Ok(rows) => HttpResponse::Ok().json(rows),
        Err(e) => {
            tracing::error!("Error reading readings list: {}", e);
            HttpResponse::InternalServerError().body(format!("Error: {e}"))
        }
    }
}

#[cfg(test)]
mod tests {
    use actix_web::{App, http::StatusCode, test};
    use assert_json_diff::assert_json_eq;
    use serde_json::json;

    use super::*;

    fn readings_file(name: &str) -> std::path::PathBuf {
        let path = std::env::temp_dir().join(format!("energy-dashboard-{}-{}.csv", name, std::process::id()));
        std::fs::write(&path, "datum;strom;gas\n2024-01-01;10;x\n2024-02-01;12,5;3\n").unwrap();
        path
    }

    #[actix_web::test]
    async fn serves_series_as_json() {
        let path = readings_file("serve");
        let app = test::init_service(App::new().service(new_actix_web_scope(CsvDataSource::new(&path)))).await;

        let req = test::TestRequest::get().uri("/api/data/gas").to_request();
        let body: serde_json::Value = test::call_and_read_body_json(&app, req).await;

        assert_json_eq!(
            body,
            json!({
                "labels": ["2024-01-01", "2024-02-01"],
                "values": [null, 3.0]
            })
        );

        let _ = std::fs::remove_file(path);
    }

    #[actix_web::test]
    async fn unknown_energy_type_is_not_found() {
        let path = readings_file("unknown");
        let app = test::init_service(App::new().service(new_actix_web_scope(CsvDataSource::new(&path)))).await;

        let req = test::TestRequest::get().uri("/api/data/oil").to_request();
        let resp = test::call_service(&app, req).await;

        assert_eq!(resp.status(), StatusCode::NOT_FOUND);

        let _ = std::fs::remove_file(path);
    }

    #[actix_web::test]
    async fn unreadable_file_is_server_error() {
        let app = test::init_service(
            App::new().service(new_actix_web_scope(CsvDataSource::new("/nonexistent/readings.csv"))),
        )
        .await;

        let req = test::TestRequest::get().uri("/api/data/strom").to_request();
        let resp = test::call_service(&app, req).await;

        assert_eq!(resp.status(), StatusCode::INTERNAL_SERVER_ERROR);
    }

    #[actix_web::test]
    async fn serves_readings_newest_first() {
        let path = readings_file("list");
        let app = test::init_service(App::new().service(new_actix_web_scope(CsvDataSource::new(&path)))).await;

        let req = test::TestRequest::get().uri("/api/readings").to_request();
        let body: serde_json::Value = test::call_and_read_body_json(&app, req).await;

        assert_json_eq!(
            body,
            json!([
                { "Datum": "01.02.2024", "Strom": 12, "Gas": 3 },
                { "Datum": "01.01.2024", "Strom": 10, "Gas": null }
            ])
        );

        let _ = std::fs::remove_file(path);
    }
}
