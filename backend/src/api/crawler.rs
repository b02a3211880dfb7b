use crate::config;
use crate::services::sentinel::{LifecycleError, LifecycleState};
use crate::AppState;
use chrono::Utc;
use log::error;
use rand::Rng;
use regex::Regex;
use rocket::serde::json::Json;
use rocket::{get, post, State};
use serde::{Deserialize, Serialize};
use serde_json::{json, Value};
use std::fs;

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CrawlerConfig {
    #[serde(default)]
    pub channels: Vec<String>,
    #[serde(default)]
    pub keywords: Vec<String>,
    #[serde(default = "default_max_videos", rename = "maxVideos")]
    pub max_videos: u32,
}

fn default_max_videos() -> u32 {
    10
}

impl Default for CrawlerConfig {
    fn default() -> Self {
        CrawlerConfig {
            channels: Vec::new(),
            keywords: Vec::new(),
            max_videos: default_max_videos(),
        }
    }
}

/// Creates the sentinel file with a synthetic PID. An unparsable body is
/// ignored and the default config used; lifecycle conflicts stay HTTP 200.
#[post("/start", data = "<config>")]
pub fn start_crawler(config: Option<Json<CrawlerConfig>>, state: &State<AppState>) -> Json<Value> {
    let config = config.map(Json::into_inner).unwrap_or_default();

    match state.crawler.start() {
        Ok(pid) => Json(json!({
            "message": "Crawler started (simulated)",
            "pid": pid,
            "status": "started",
            "config": config,
        })),
        Err(LifecycleError::AlreadyRunning) => Json(json!({
            "error": "Crawler is already running",
            "status": "running",
        })),
        Err(e) => {
            error!("Failed to start crawler: {e:?}");
            Json(json!({
                "error": format!("Failed to start crawler: {e}"),
                "status": "error",
            }))
        }
    }
}

#[post("/stop")]
pub fn stop_crawler(state: &State<AppState>) -> Json<Value> {
    match state.crawler.stop() {
        Ok(()) => Json(json!({
            "message": "Crawler stopped (simulated)",
            "status": "stopped",
        })),
        Err(LifecycleError::AlreadyStopped) => Json(json!({
            "message": "Crawler is not running",
            "status": "already_stopped",
        })),
        Err(e) => {
            error!("Failed to stop crawler: {e:?}");
            Json(json!({
                "error": format!("Failed to stop crawler: {e}"),
                "status": "error",
            }))
        }
    }
}

#[get("/status")]
pub fn crawler_status(state: &State<AppState>) -> Json<Value> {
    match state.crawler.status() {
        LifecycleState::Running { pid } => {
            let mut rng = rand::thread_rng();
            Json(json!({
                "status": "running",
                "pid": pid,
                "stats": {
                    "videosProcessed": rng.gen_range(0..100),
                    "adsFound": rng.gen_range(0..50),
                    "errors": rng.gen_range(0..10),
                },
                "message": "Crawler is running",
            }))
        }
        LifecycleState::Stopped => Json(json!({
            "status": "stopped",
            "message": "Crawler is not running",
        })),
    }
}

/// Extended status: sentinel reconcile plus the crawler log tail and a scan
/// for python crawler processes that run without a sentinel.
#[get("/status/real")]
pub fn crawler_status_real(state: &State<AppState>) -> Json<Value> {
    let mut status = json!({
        "status": "stopped",
        "pid": null,
        "stats": {
            "videosProcessed": 0,
            "adsFound": 0,
            "errors": 0,
            "startTime": null,
            "lastActivity": null,
        },
        "message": "Crawler is not running",
        "logs": [],
    });

    if let LifecycleState::Running { pid } = state.crawler.status() {
        status["status"] = json!("running");
        status["pid"] = json!(pid);
        status["message"] = json!("Crawler is running");

        if let Ok(log_content) = fs::read_to_string(&*config::CRAWLER_LOG_FILE) {
            let tail: Vec<&str> = log_content.lines().collect();
            let tail = &tail[tail.len().saturating_sub(20)..];
            status["logs"] = Value::Array(
                tail.iter()
                    .filter(|line| !line.trim().is_empty())
                    .map(|line| {
                        json!({
                            "timestamp": Utc::now().to_rfc3339(),
                            "message": line.trim(),
                        })
                    })
                    .collect(),
            );

            for (pattern, key) in [
                (r"(?i)processed (\d+) videos", "videosProcessed"),
                (r"(?i)found (\d+) ads", "adsFound"),
                (r"(?i)(\d+) errors", "errors"),
            ] {
                let Ok(re) = Regex::new(pattern) else { continue };
                if let Some(caps) = re.captures(&log_content) {
                    if let Ok(n) = caps[1].parse::<i64>() {
                        status["stats"][key] = json!(n);
                    }
                }
            }
        }
    }

    if status["status"] == "stopped" && python_crawler_detected() {
        let mut rng = rand::thread_rng();
        status["status"] = json!("running");
        status["message"] = json!("Detected a python crawling process");
        status["stats"]["videosProcessed"] = json!(rng.gen_range(0..100));
        status["stats"]["adsFound"] = json!(rng.gen_range(0..50));
    }

    Json(status)
}

fn python_crawler_detected() -> bool {
    std::process::Command::new("sh")
        .arg("-c")
        .arg("ps aux | grep python | grep -v grep")
        .output()
        .ok()
        .filter(|out| out.status.success())
        .map(|out| {
            String::from_utf8_lossy(&out.stdout)
                .lines()
                .any(|line| {
                    line.contains("crawler") || line.contains("youtube") || line.contains("ads")
                })
        })
        .unwrap_or(false)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn crawler_config_merges_over_defaults() {
        let parsed: CrawlerConfig =
            serde_json::from_str(r#"{"channels": ["TechChannel"], "maxVideos": 50}"#).unwrap();
        assert_eq!(parsed.channels, vec!["TechChannel".to_string()]);
        assert!(parsed.keywords.is_empty());
        assert_eq!(parsed.max_videos, 50);

        let empty: CrawlerConfig = serde_json::from_str("{}").unwrap();
        assert_eq!(empty.max_videos, 10);
    }
}
