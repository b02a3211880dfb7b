use crate::models::{CrawlerStatus, DashboardPayload, SummaryStats};
use crate::services::aggregation;
use crate::services::sentinel::SentinelFile;
use crate::services::store::{self, SchemaVariant, StoreError};
use chrono::Utc;
use log::warn;
use std::path::Path;

/// Builds the composite dashboard payload for one request.
///
/// A missing store file is not an error: the payload carries zeroed stats,
/// empty sequences and the variant's missing-source tag. A store that exists
/// but cannot be opened is an error for the caller (HTTP 500). Individual
/// aggregate queries that fail only default their own field.
pub fn assemble(
    db_path: &Path,
    variant: SchemaVariant,
    sentinel: &SentinelFile,
) -> Result<DashboardPayload, StoreError> {
    let running = sentinel.is_present();
    let timestamp = Utc::now().to_rfc3339();

    if !db_path.exists() {
        return Ok(DashboardPayload {
            stats: SummaryStats::default(),
            recent_ads: Vec::new(),
            ad_types: Vec::new(),
            hourly_stats: Vec::new(),
            top_channels: Vec::new(),
            crawler_status: CrawlerStatus {
                running,
                stats: None,
            },
            source: variant.missing_source().to_string(),
            timestamp,
            message: Some("Run the crawler first to create the database".to_string()),
            database_path: None,
        });
    }

    let conn = store::open_store(db_path)?;

    let stats = aggregation::summary(&conn, variant).unwrap_or_else(|e| {
        warn!("summary query failed: {e}");
        SummaryStats::default()
    });
    let recent_ads = aggregation::recent(&conn, variant, 20).unwrap_or_else(|e| {
        warn!("recent-ads query failed: {e}");
        Vec::new()
    });
    let ad_types = aggregation::by_type(&conn, variant).unwrap_or_else(|e| {
        warn!("ad-type query failed: {e}");
        Vec::new()
    });
    let hourly_stats = aggregation::hourly(&conn, variant).unwrap_or_else(|e| {
        warn!("hourly query failed: {e}");
        Vec::new()
    });
    let top_channels = aggregation::top_channels(&conn, variant, 10).unwrap_or_else(|e| {
        warn!("top-channels query failed: {e}");
        Vec::new()
    });
    let run_stats = aggregation::latest_run(&conn, variant).unwrap_or_else(|e| {
        warn!("crawler-stats query failed: {e}");
        None
    });

    Ok(DashboardPayload {
        stats,
        recent_ads,
        ad_types,
        hourly_stats,
        top_channels,
        crawler_status: CrawlerStatus {
            running,
            stats: run_stats,
        },
        source: variant.live_source().to_string(),
        timestamp,
        message: None,
        database_path: Some(db_path.display().to_string()),
    })
}
