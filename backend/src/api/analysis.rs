use rand::Rng;
use rocket::serde::json::Json;
use rocket::{get, post};
use serde::Deserialize;
use serde_json::{json, Value};

#[derive(Debug, Deserialize)]
pub struct AnalysisRequest {
    #[serde(default = "default_year")]
    pub year: i32,
    #[serde(default = "default_comprehensive")]
    pub comprehensive: bool,
    #[serde(default = "default_categories")]
    pub categories: String,
}

fn default_year() -> i32 {
    2025
}

fn default_comprehensive() -> bool {
    true
}

fn default_categories() -> String {
    "all".to_string()
}

impl Default for AnalysisRequest {
    fn default() -> Self {
        AnalysisRequest {
            year: default_year(),
            comprehensive: default_comprehensive(),
            categories: default_categories(),
        }
    }
}

/// Entirely synthetic: returns a random job id, runs nothing.
#[post("/start", data = "<request>")]
pub fn start_analysis(request: Option<Json<AnalysisRequest>>) -> Json<Value> {
    let request = request.map(Json::into_inner).unwrap_or_default();
    let analysis_id: u32 = rand::thread_rng().gen_range(1000..11000);

    Json(json!({
        "message": format!("Comprehensive analysis started for {}", request.year),
        "analysis_id": analysis_id,
        "status": "started",
        "estimated_duration": "2-4 hours",
        "config": {
            "year": request.year,
            "comprehensive": request.comprehensive,
            "categories": request.categories,
            "queries_planned": 45,
            "max_videos": 10000,
        },
    }))
}

/// Randomly reports a run in progress; there is no job behind this.
#[get("/status")]
pub fn analysis_status() -> Json<Value> {
    let mut rng = rand::thread_rng();

    if rng.gen_bool(0.3) {
        Json(json!({
            "status": "running",
            "progress": rng.gen_range(10..90),
            "current_phase": "Analyzing video content",
            "stats": {
                "videos_found": rng.gen_range(1000..6000),
                "ads_detected": rng.gen_range(200..1700),
                "errors": rng.gen_range(0..50),
                "api_calls": rng.gen_range(500..2500),
                "elapsed_time": rng.gen_range(300..7500),
            },
            "message": "Analysis in progress. Processing YouTube videos from 2025...",
        }))
    } else {
        Json(json!({
            "status": "idle",
            "progress": 0,
            "current_phase": "Ready to start",
            "stats": {
                "videos_found": 0,
                "ads_detected": 0,
                "errors": 0,
                "api_calls": 0,
                "elapsed_time": 0,
            },
            "message": "Click Start Analysis to begin comprehensive 2025 YouTube ads analysis",
        }))
    }
}

/// Fixed demo analytics.
#[get("/results")]
pub fn analysis_results() -> Json<Value> {
    Json(json!({
        "total_ads": 2847,
        "categories": [
            { "category": "technology", "count": 654, "percentage": 23 },
            { "category": "automotive", "count": 512, "percentage": 18 },
            { "category": "food_beverage", "count": 398, "percentage": 14 },
            { "category": "fashion", "count": 341, "percentage": 12 },
            { "category": "beauty", "count": 285, "percentage": 10 },
            { "category": "finance", "count": 227, "percentage": 8 },
            { "category": "travel", "count": 198, "percentage": 7 },
            { "category": "health", "count": 156, "percentage": 5 },
            { "category": "education", "count": 76, "percentage": 3 },
        ],
        "top_brands": [
            { "brand": "Samsung", "ads": 89, "engagement": 0.045 },
            { "brand": "Nike", "ads": 76, "engagement": 0.052 },
            { "brand": "Coca-Cola", "ads": 68, "engagement": 0.038 },
            { "brand": "Apple", "ads": 54, "engagement": 0.067 },
            { "brand": "McDonald's", "ads": 47, "engagement": 0.041 },
            { "brand": "BMW", "ads": 43, "engagement": 0.049 },
            { "brand": "L'Oréal", "ads": 39, "engagement": 0.055 },
            { "brand": "Netflix", "ads": 35, "engagement": 0.062 },
        ],
        "monthly_trends": [
            { "month": "January", "ads": 245, "growth": 0 },
            { "month": "February", "ads": 267, "growth": 8.9 },
            { "month": "March", "ads": 289, "growth": 8.2 },
            { "month": "April", "ads": 312, "growth": 7.9 },
            { "month": "May", "ads": 298, "growth": -4.5 },
            { "month": "June", "ads": 334, "growth": 12.1 },
            { "month": "July", "ads": 356, "growth": 6.6 },
            { "month": "August", "ads": 341, "growth": -4.2 },
            { "month": "September", "ads": 378, "growth": 10.8 },
            { "month": "October", "ads": 392, "growth": 3.7 },
            { "month": "November", "ads": 425, "growth": 8.4 },
            { "month": "December", "ads": 410, "growth": -3.5 },
        ],
        "top_channels": [
            { "channel": "Samsung", "ads": 89, "avg_views": 125000 },
            { "channel": "Nike", "ads": 76, "avg_views": 98000 },
            { "channel": "Coca-Cola", "ads": 68, "avg_views": 156000 },
            { "channel": "Apple", "ads": 54, "avg_views": 234000 },
            { "channel": "McDonald's", "ads": 47, "avg_views": 87000 },
            { "channel": "BMW", "ads": 43, "avg_views": 112000 },
            { "channel": "L'Oréal Paris", "ads": 39, "avg_views": 76000 },
            { "channel": "Netflix", "ads": 35, "avg_views": 145000 },
        ],
    }))
}
