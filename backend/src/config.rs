use crate::services::probe::{Probe, ShellProbe, SyntheticProbe};
use crate::services::sentinel::SentinelFile;
use crate::AppState;
use env_logger::Builder;
use lazy_static::lazy_static;
use log::{info, LevelFilter};
use std::env;
use std::path::PathBuf;
use std::sync::Arc;
use std::time::Duration;

lazy_static! {
    pub static ref DATABASE_PATH: String =
        env::var("DATABASE_PATH").unwrap_or_else(|_| "/data/ads/ads_database.db".to_string());
    pub static ref REAL_DATABASE_PATH: String =
        env::var("REAL_DATABASE_PATH").unwrap_or_else(|_| "/data/ads/real_ads.db".to_string());
    pub static ref CRAWLER_PID_FILE: String =
        env::var("CRAWLER_PID_FILE").unwrap_or_else(|_| "/tmp/crawler.pid".to_string());
    pub static ref CRAWLER_LOG_FILE: String =
        env::var("CRAWLER_LOG_FILE").unwrap_or_else(|_| "/tmp/crawler.log".to_string());
    pub static ref API_URL: String =
        env::var("API_URL").unwrap_or_else(|_| "http://localhost:8000".to_string());
    pub static ref PROBE_MODE: String =
        env::var("PROBE_MODE").unwrap_or_else(|_| "shell".to_string());
    pub static ref PROBE_TIMEOUT_SECS: u64 = env::var("PROBE_TIMEOUT_SECS")
        .unwrap_or_else(|_| "2".to_string())
        .parse::<u64>()
        .unwrap_or(2);
}

pub fn init_logger() {
    Builder::new().filter_level(LevelFilter::Info).init();
    info!("Starting Rocket backend...");
}

pub fn load_environment() {
    dotenv::dotenv().ok();
}

pub fn create_app_state() -> AppState {
    let probe: Arc<dyn Probe> = match PROBE_MODE.as_str() {
        "synthetic" => Arc::new(SyntheticProbe),
        _ => Arc::new(ShellProbe::new(Duration::from_secs(*PROBE_TIMEOUT_SECS))),
    };

    info!(
        "Dashboard state: live_db={}, real_db={}, pid_file={}, probe={}",
        &*DATABASE_PATH, &*REAL_DATABASE_PATH, &*CRAWLER_PID_FILE, &*PROBE_MODE
    );

    AppState {
        live_db: PathBuf::from(&*DATABASE_PATH),
        real_db: PathBuf::from(&*REAL_DATABASE_PATH),
        crawler: SentinelFile::new(CRAWLER_PID_FILE.as_str()),
        probe,
    }
}
