use crate::models::{DashboardPayload, ErrorResponse};
use crate::services::dashboard;
use crate::services::store::SchemaVariant;
use crate::AppState;
use log::error;
use rocket::serde::json::Json;
use rocket::{get, State};
use serde_json::{json, Value};

/// Demo data for environments without any database. Always the same payload,
/// never an error.
#[get("/")]
pub fn mock_ads() -> Json<Value> {
    Json(demo_payload())
}

#[get("/live")]
pub fn live_ads(state: &State<AppState>) -> Result<Json<DashboardPayload>, ErrorResponse> {
    dashboard::assemble(&state.live_db, SchemaVariant::Demo, &state.crawler)
        .map(Json)
        .map_err(|e| {
            error!("Failed to assemble live dashboard: {e:?}");
            ErrorResponse::store(e)
        })
}

#[get("/real")]
pub fn real_ads(state: &State<AppState>) -> Result<Json<DashboardPayload>, ErrorResponse> {
    dashboard::assemble(&state.real_db, SchemaVariant::Real, &state.crawler)
        .map(Json)
        .map_err(|e| {
            error!("Failed to assemble real dashboard: {e:?}");
            ErrorResponse::store(e)
        })
}

fn demo_payload() -> Value {
    json!({
        "stats": {
            "total_ads": 127,
            "unique_channels": 18,
            "avg_confidence": 0.87,
            "ads_last_24h": 12,
        },
        "recent_ads": [
            {
                "id": 1,
                "video_id": "sample1",
                "title": "Car Ad 2025 - The Future of Driving",
                "channel": "AutoChannel",
                "views": 15000,
                "likes": 750,
                "engagement_rate": 0.05,
                "confidence_score": 0.95,
                "ad_type": "automotive",
                "duration": 30,
                "created_at": "2025-01-15T10:00:00Z",
            },
            {
                "id": 2,
                "video_id": "sample2",
                "title": "New Phone Ad - Advanced Technology",
                "channel": "TechChannel",
                "views": 25000,
                "likes": 1200,
                "engagement_rate": 0.048,
                "confidence_score": 0.92,
                "ad_type": "technology",
                "duration": 45,
                "created_at": "2025-01-16T14:30:00Z",
            },
            {
                "id": 3,
                "video_id": "sample3",
                "title": "Soft Drink Ad - Summer 2025",
                "channel": "DrinkChannel",
                "views": 8000,
                "likes": 320,
                "engagement_rate": 0.04,
                "confidence_score": 0.88,
                "ad_type": "food_beverage",
                "duration": 20,
                "created_at": "2025-01-17T16:45:00Z",
            },
            {
                "id": 4,
                "video_id": "sample4",
                "title": "Online Store Ad - Special Discounts",
                "channel": "ShopChannel",
                "views": 12000,
                "likes": 480,
                "engagement_rate": 0.04,
                "confidence_score": 0.91,
                "ad_type": "retail",
                "duration": 25,
                "created_at": "2025-01-18T09:15:00Z",
            },
            {
                "id": 5,
                "video_id": "sample5",
                "title": "Restaurant Ad - Delicious Food",
                "channel": "FoodChannel",
                "views": 18000,
                "likes": 900,
                "engagement_rate": 0.05,
                "confidence_score": 0.89,
                "ad_type": "food_beverage",
                "duration": 35,
                "created_at": "2025-01-19T12:00:00Z",
            },
        ],
        "ad_types": [
            { "ad_type": "automotive", "count": 32 },
            { "ad_type": "technology", "count": 45 },
            { "ad_type": "food_beverage", "count": 28 },
            { "ad_type": "retail", "count": 22 },
        ],
        "system_stats": {
            "gpu_usage": [
                { "time": "08:00", "usage": 15 },
                { "time": "09:00", "usage": 45 },
                { "time": "10:00", "usage": 78 },
                { "time": "11:00", "usage": 92 },
                { "time": "12:00", "usage": 65 },
                { "time": "13:00", "usage": 48 },
            ],
            "cpu_usage": 42,
            "memory_usage": 68,
            "storage_usage": 37,
            "active_processes": 3,
        },
    })
}
