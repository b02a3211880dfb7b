use rocket::http::{ContentType, Status};
use rocket::request::Request;
use rocket::response::Responder;
use rocket::serde::{Deserialize, Serialize};
use rocket::{response, Response};
use std::io::Cursor;

/// Canonical ad record. Both physical schemas (the demo `ads` table and the
/// crawler's `real_ads` table) are normalized into this shape by the
/// aggregation queries.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Ad {
    pub id: i64,
    pub video_id: String,
    pub title: String,
    pub channel: String,
    pub views: i64,
    pub likes: i64,
    pub comment_count: i64,
    pub engagement_rate: f64,
    pub confidence_score: f64,
    pub ad_type: Option<String>,
    pub duration: i64,
    pub created_at: String,
    pub thumbnail_url: Option<String>,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct SummaryStats {
    pub total_ads: i64,
    pub unique_channels: i64,
    pub avg_confidence: f64,
    pub ads_last_24h: i64,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AdTypeAggregate {
    pub ad_type: String,
    pub count: i64,
    pub avg_confidence: f64,
    pub avg_views: f64,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct HourlyBucket {
    pub hour: String,
    pub ads_count: i64,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ChannelAggregate {
    pub channel: String,
    pub ads_count: i64,
    pub avg_views: f64,
    pub avg_engagement: f64,
}

/// Latest crawler run, surfaced as an untyped object because the run table's
/// columns differ between crawler generations.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CrawlerStatus {
    pub running: bool,
    pub stats: Option<serde_json::Value>,
}

#[derive(Debug, Serialize, Deserialize)]
pub struct DashboardPayload {
    pub stats: SummaryStats,
    pub recent_ads: Vec<Ad>,
    pub ad_types: Vec<AdTypeAggregate>,
    pub hourly_stats: Vec<HourlyBucket>,
    pub top_channels: Vec<ChannelAggregate>,
    pub crawler_status: CrawlerStatus,
    pub source: String,
    pub timestamp: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub message: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub database_path: Option<String>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct GpuInfo {
    pub index: u32,
    pub name: String,
    pub memory_used: String,
    pub memory_total: String,
    pub utilization: f64,
    pub temperature: i64,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ProcessInfo {
    pub name: String,
    pub pid: i64,
    pub cpu: f64,
    pub memory: f64,
    pub runtime: String,
    pub status: String,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct UsagePoint {
    pub time: String,
    pub usage: f64,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SystemMetrics {
    pub cpu_usage: f64,
    pub memory_usage: f64,
    pub storage_usage: f64,
    pub active_processes: usize,
    pub gpus: Vec<GpuInfo>,
    pub processes: Vec<ProcessInfo>,
    pub gpu_usage: Vec<UsagePoint>,
    pub timestamp: String,
}

#[derive(Debug, Serialize, Deserialize)]
pub struct SetupResponse {
    pub message: String,
    pub path: String,
    pub mode: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
}

#[derive(Serialize, Deserialize)]
pub struct ErrorResponse {
    pub error: String,
    pub message: String,
    pub source: String,
}

impl ErrorResponse {
    pub fn store(error: impl std::fmt::Display) -> Self {
        ErrorResponse {
            error: "Failed to fetch data".to_string(),
            message: error.to_string(),
            source: "error".to_string(),
        }
    }
}

impl<'r> Responder<'r, 'static> for ErrorResponse {
    fn respond_to(self, _: &'r Request<'_>) -> response::Result<'static> {
        let json = serde_json::to_string(&self).map_err(|_| Status::InternalServerError)?;
        Response::build()
            .status(Status::InternalServerError)
            .header(ContentType::JSON)
            .sized_body(json.len(), Cursor::new(json))
            .ok()
    }
}
