use crate::models::SetupResponse;
use crate::services::setup_service;
use log::{error, info};
use rocket::http::Status;
use rocket::post;
use rocket::serde::json::Json;
use serde::Deserialize;
use serde_json::{json, Value};

#[derive(Debug, Deserialize)]
pub struct SetupRequest {
    #[serde(rename = "dbPath")]
    pub db_path: String,
}

/// Creates the demo store. A missing or invalid body is the only 400; any
/// setup failure still answers 200 with a mock-mode acknowledgment.
#[post("/", data = "<request>")]
pub fn setup_database(
    request: Option<Json<SetupRequest>>,
) -> Result<Json<SetupResponse>, (Status, Json<Value>)> {
    let Some(request) = request else {
        return Err((
            Status::BadRequest,
            Json(json!({ "error": "Database path is required" })),
        ));
    };

    match setup_service::initialize(&request.db_path) {
        Ok(()) => {
            info!("Database setup completed at {}", request.db_path);
            Ok(Json(SetupResponse {
                message: "Database initialized successfully with sample data".to_string(),
                path: request.db_path.clone(),
                mode: "database".to_string(),
                error: None,
            }))
        }
        Err(e) => {
            error!("Database setup failed: {e:?}");
            Ok(Json(SetupResponse {
                message: "Database setup not available in this environment. Using mock data instead."
                    .to_string(),
                path: request.db_path.clone(),
                mode: "mock".to_string(),
                error: Some(e.to_string()),
            }))
        }
    }
}
