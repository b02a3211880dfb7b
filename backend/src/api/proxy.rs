use crate::config;
use log::error;
use rocket::get;
use rocket::http::Status;
use rocket::serde::json::Json;
use serde_json::{json, Value};

/// Forwards to the external analysis server and relays its JSON verbatim.
#[get("/?<endpoint>")]
pub async fn proxy_request(endpoint: Option<String>) -> Result<Json<Value>, (Status, Json<Value>)> {
    let Some(endpoint) = endpoint else {
        return Err((
            Status::BadRequest,
            Json(json!({ "error": "Endpoint parameter is required" })),
        ));
    };

    let url = format!("{}/api/{}", &*config::API_URL, endpoint);
    let upstream = async { reqwest::get(&url).await?.json::<Value>().await }.await;

    match upstream {
        Ok(data) => Ok(Json(data)),
        Err(e) => {
            error!("Proxy request to {url} failed: {e:?}");
            Err((
                Status::InternalServerError,
                Json(json!({ "error": "Failed to fetch data from server" })),
            ))
        }
    }
}
