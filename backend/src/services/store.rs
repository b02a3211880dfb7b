use rusqlite::Connection;
use std::path::Path;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum StoreError {
    #[error("database not found: {0}")]
    NotFound(String),
    #[error(transparent)]
    Sqlite(#[from] rusqlite::Error),
}

/// Opens the store file for one request. The file must already exist;
/// creation is the setup service's job. The connection closes on drop.
pub fn open_store(path: &Path) -> Result<Connection, StoreError> {
    if !path.exists() {
        return Err(StoreError::NotFound(path.display().to_string()));
    }
    Ok(Connection::open(path)?)
}

/// The two physical ad schemas. The demo schema is what `POST /setup`
/// creates; the collected schema is what the external crawler writes. All
/// column-name differences are resolved here so the aggregation SQL is
/// written once.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SchemaVariant {
    Demo,
    Real,
}

impl SchemaVariant {
    pub fn table(&self) -> &'static str {
        match self {
            SchemaVariant::Demo => "ads",
            SchemaVariant::Real => "real_ads",
        }
    }

    pub fn channel(&self) -> &'static str {
        match self {
            SchemaVariant::Demo => "channel",
            SchemaVariant::Real => "channel_title",
        }
    }

    pub fn views(&self) -> &'static str {
        match self {
            SchemaVariant::Demo => "views",
            SchemaVariant::Real => "view_count",
        }
    }

    pub fn likes(&self) -> &'static str {
        match self {
            SchemaVariant::Demo => "likes",
            SchemaVariant::Real => "like_count",
        }
    }

    pub fn comments(&self) -> &'static str {
        match self {
            SchemaVariant::Demo => "comments_count",
            SchemaVariant::Real => "comment_count",
        }
    }

    pub fn confidence(&self) -> &'static str {
        match self {
            SchemaVariant::Demo => "confidence_score",
            SchemaVariant::Real => "ad_confidence",
        }
    }

    pub fn duration(&self) -> &'static str {
        match self {
            SchemaVariant::Demo => "duration",
            SchemaVariant::Real => "duration_seconds",
        }
    }

    // The collected schema has no engagement column; the crawler's
    // confidence is the closest stand-in.
    pub fn engagement(&self) -> &'static str {
        match self {
            SchemaVariant::Demo => "engagement_rate",
            SchemaVariant::Real => "ad_confidence",
        }
    }

    pub fn run_order(&self) -> &'static str {
        match self {
            SchemaVariant::Demo => "run_time",
            SchemaVariant::Real => "timestamp",
        }
    }

    pub fn live_source(&self) -> &'static str {
        match self {
            SchemaVariant::Demo => "live_database",
            SchemaVariant::Real => "real_database",
        }
    }

    pub fn missing_source(&self) -> &'static str {
        match self {
            SchemaVariant::Demo => "no_database",
            SchemaVariant::Real => "no_real_database",
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    #[test]
    fn open_missing_store_is_not_found() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("nope.db");
        match open_store(&path) {
            Err(StoreError::NotFound(p)) => assert!(p.contains("nope.db")),
            other => panic!("expected NotFound, got {other:?}"),
        }
    }

    #[test]
    fn open_existing_store_succeeds() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("ads.db");
        let conn = Connection::open(&path).unwrap();
        conn.execute_batch("CREATE TABLE ads (id INTEGER PRIMARY KEY);")
            .unwrap();
        assert!(open_store(&path).is_ok());
    }

    #[test]
    fn variants_map_distinct_tables_and_sources() {
        assert_eq!(SchemaVariant::Demo.table(), "ads");
        assert_eq!(SchemaVariant::Real.table(), "real_ads");
        assert_eq!(SchemaVariant::Demo.missing_source(), "no_database");
        assert_eq!(SchemaVariant::Real.missing_source(), "no_real_database");
    }
}
