#[macro_use]
extern crate rocket;

mod api;
mod config;
mod models;
mod services;

use rocket::{Build, Rocket};
use services::probe::Probe;
use services::sentinel::SentinelFile;
use std::path::PathBuf;
use std::sync::Arc;

pub struct AppState {
    pub live_db: PathBuf,
    pub real_db: PathBuf,
    pub crawler: SentinelFile,
    pub probe: Arc<dyn Probe>,
}

fn build(state: AppState) -> Rocket<Build> {
    rocket::build()
        .manage(state)
        .mount("/ads", routes![api::mock_ads, api::live_ads, api::real_ads])
        .mount("/system", routes![api::system_mock, api::system_real])
        .mount(
            "/crawler",
            routes![
                api::start_crawler,
                api::stop_crawler,
                api::crawler_status,
                api::crawler_status_real
            ],
        )
        .mount(
            "/analysis",
            routes![api::start_analysis, api::analysis_status, api::analysis_results],
        )
        .mount("/setup", routes![api::setup_database])
        .mount("/proxy", routes![api::proxy_request])
}

#[launch]
fn rocket() -> _ {
    config::load_environment();
    config::init_logger();
    build(config::create_app_state())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::services::probe::SyntheticProbe;
    use rocket::http::{ContentType, Status};
    use rocket::local::blocking::Client;
    use serde_json::Value;
    use tempfile::TempDir;

    fn client(dir: &TempDir) -> Client {
        let state = AppState {
            live_db: dir.path().join("ads.db"),
            real_db: dir.path().join("real_ads.db"),
            crawler: SentinelFile::new(dir.path().join("crawler.pid")),
            probe: Arc::new(SyntheticProbe),
        };
        Client::tracked(build(state)).expect("valid rocket instance")
    }

    fn get_json(client: &Client, uri: &str) -> Value {
        let response = client.get(uri).dispatch();
        assert_eq!(response.status(), Status::Ok);
        response.into_json().expect("json body")
    }

    #[test]
    fn mock_ads_always_respond() {
        let dir = TempDir::new().unwrap();
        let body = get_json(&client(&dir), "/ads");
        assert_eq!(body["stats"]["total_ads"], 127);
        assert_eq!(body["recent_ads"].as_array().unwrap().len(), 5);
    }

    #[test]
    fn live_ads_without_store_reports_no_database() {
        let dir = TempDir::new().unwrap();
        let body = get_json(&client(&dir), "/ads/live");
        assert_eq!(body["source"], "no_database");
        assert_eq!(body["stats"]["total_ads"], 0);
        assert_eq!(body["stats"]["avg_confidence"], 0.0);
        assert!(body["recent_ads"].as_array().unwrap().is_empty());
        assert_eq!(body["crawler_status"]["running"], false);
    }

    #[test]
    fn real_ads_without_store_reports_no_real_database() {
        let dir = TempDir::new().unwrap();
        let body = get_json(&client(&dir), "/ads/real");
        assert_eq!(body["source"], "no_real_database");
        assert_eq!(body["stats"]["total_ads"], 0);
    }

    #[test]
    fn setup_then_live_ads_round_trip() {
        let dir = TempDir::new().unwrap();
        let client = client(&dir);
        let db_path = dir.path().join("ads.db");

        let response = client
            .post("/setup")
            .header(ContentType::JSON)
            .body(format!(r#"{{"dbPath": "{}"}}"#, db_path.display()))
            .dispatch();
        assert_eq!(response.status(), Status::Ok);
        let setup: Value = response.into_json().unwrap();
        assert_eq!(setup["mode"], "database");

        let body = get_json(&client, "/ads/live");
        assert_eq!(body["source"], "live_database");
        assert_eq!(body["stats"]["total_ads"], 5);
        assert_eq!(body["recent_ads"].as_array().unwrap().len(), 5);
        assert!(!body["ad_types"].as_array().unwrap().is_empty());
    }

    #[test]
    fn setup_without_body_is_bad_request() {
        let dir = TempDir::new().unwrap();
        let client = client(&dir);
        let response = client.post("/setup").dispatch();
        assert_eq!(response.status(), Status::BadRequest);
    }

    #[test]
    fn crawler_lifecycle_conflicts_stay_http_200() {
        let dir = TempDir::new().unwrap();
        let client = client(&dir);

        let response = client.post("/crawler/start").dispatch();
        assert_eq!(response.status(), Status::Ok);
        let started: Value = response.into_json().unwrap();
        assert_eq!(started["status"], "started");
        let pid = started["pid"].as_u64().unwrap();

        let response = client.post("/crawler/start").dispatch();
        assert_eq!(response.status(), Status::Ok);
        let again: Value = response.into_json().unwrap();
        assert_eq!(again["status"], "running");

        // rejected start leaves the recorded identifier untouched
        let recorded = std::fs::read_to_string(dir.path().join("crawler.pid")).unwrap();
        assert_eq!(recorded.trim().parse::<u64>().unwrap(), pid);

        let response = client.post("/crawler/stop").dispatch();
        let stopped: Value = response.into_json().unwrap();
        assert_eq!(stopped["status"], "stopped");

        let response = client.post("/crawler/stop").dispatch();
        let stopped: Value = response.into_json().unwrap();
        assert_eq!(stopped["status"], "already_stopped");
    }

    #[test]
    fn crawler_status_reports_stopped_without_sentinel() {
        let dir = TempDir::new().unwrap();
        let body = get_json(&client(&dir), "/crawler/status");
        assert_eq!(body["status"], "stopped");
    }

    #[test]
    fn system_endpoints_always_render() {
        let dir = TempDir::new().unwrap();
        let client = client(&dir);

        let mock = get_json(&client, "/system");
        assert_eq!(mock["cpu_usage"], 42);

        let real = get_json(&client, "/system/real");
        let cpu = real["cpu_usage"].as_f64().unwrap();
        assert!((0.0..=100.0).contains(&cpu));
        assert_eq!(real["gpu_usage"].as_array().unwrap().len(), 6);
        assert!(!real["gpus"].as_array().unwrap().is_empty());
    }

    #[test]
    fn proxy_requires_endpoint_parameter() {
        let dir = TempDir::new().unwrap();
        let client = client(&dir);
        let response = client.get("/proxy").dispatch();
        assert_eq!(response.status(), Status::BadRequest);
    }

    #[test]
    fn analysis_endpoints_are_synthetic() {
        let dir = TempDir::new().unwrap();
        let client = client(&dir);

        let response = client.post("/analysis/start").dispatch();
        assert_eq!(response.status(), Status::Ok);
        let started: Value = response.into_json().unwrap();
        assert_eq!(started["status"], "started");
        assert!(started["analysis_id"].as_u64().is_some());

        let status = get_json(&client, "/analysis/status");
        assert!(status["status"] == "running" || status["status"] == "idle");

        let results = get_json(&client, "/analysis/results");
        assert_eq!(results["total_ads"], 2847);
    }
}
