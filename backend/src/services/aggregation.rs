use crate::models::{Ad, AdTypeAggregate, ChannelAggregate, HourlyBucket, SummaryStats};
use crate::services::store::{SchemaVariant, StoreError};
use rusqlite::types::ValueRef;
use rusqlite::{params, Connection};
use serde_json::Value;

/// Headline counters. `AVG` over an empty table is NULL in SQLite; that is
/// mapped to 0.0 so an empty store never surfaces null or NaN.
pub fn summary(conn: &Connection, variant: SchemaVariant) -> Result<SummaryStats, StoreError> {
    let sql = format!(
        "SELECT \
            COUNT(*) AS total_ads, \
            COUNT(DISTINCT {channel}) AS unique_channels, \
            AVG({confidence}) AS avg_confidence, \
            COUNT(CASE WHEN datetime(created_at) > datetime('now', '-1 day') THEN 1 END) AS ads_last_24h \
         FROM {table}",
        channel = variant.channel(),
        confidence = variant.confidence(),
        table = variant.table(),
    );

    let stats = conn.query_row(&sql, [], |row| {
        Ok(SummaryStats {
            total_ads: row.get(0)?,
            unique_channels: row.get(1)?,
            avg_confidence: row.get::<_, Option<f64>>(2)?.unwrap_or(0.0),
            ads_last_24h: row.get(3)?,
        })
    })?;

    Ok(stats)
}

/// Newest ads first; identical timestamps fall back to descending id so the
/// order is deterministic.
pub fn recent(
    conn: &Connection,
    variant: SchemaVariant,
    limit: u32,
) -> Result<Vec<Ad>, StoreError> {
    let sql = format!(
        "SELECT \
            id, video_id, title, {channel} AS channel, {views} AS views, \
            {likes} AS likes, {comments} AS comment_count, \
            {engagement} AS engagement_rate, {confidence} AS confidence_score, \
            ad_type, {duration} AS duration, created_at, thumbnail_url \
         FROM {table} \
         ORDER BY created_at DESC, id DESC \
         LIMIT ?1",
        channel = variant.channel(),
        views = variant.views(),
        likes = variant.likes(),
        comments = variant.comments(),
        engagement = variant.engagement(),
        confidence = variant.confidence(),
        duration = variant.duration(),
        table = variant.table(),
    );

    let mut stmt = conn.prepare(&sql)?;
    let ads = stmt
        .query_map(params![limit], |row| {
            Ok(Ad {
                id: row.get(0)?,
                video_id: row.get::<_, Option<String>>(1)?.unwrap_or_default(),
                title: row.get::<_, Option<String>>(2)?.unwrap_or_default(),
                channel: row.get::<_, Option<String>>(3)?.unwrap_or_default(),
                views: row.get::<_, Option<i64>>(4)?.unwrap_or(0),
                likes: row.get::<_, Option<i64>>(5)?.unwrap_or(0),
                comment_count: row.get::<_, Option<i64>>(6)?.unwrap_or(0),
                engagement_rate: row.get::<_, Option<f64>>(7)?.unwrap_or(0.0),
                confidence_score: row.get::<_, Option<f64>>(8)?.unwrap_or(0.0),
                ad_type: row.get(9)?,
                duration: row.get::<_, Option<i64>>(10)?.unwrap_or(0),
                created_at: row.get::<_, Option<String>>(11)?.unwrap_or_default(),
                thumbnail_url: row.get(12)?,
            })
        })?
        .collect::<Result<Vec<_>, _>>()?;

    Ok(ads)
}

/// Per-label counts. Rows with a NULL or empty label are excluded entirely
/// rather than bucketed as "other".
pub fn by_type(
    conn: &Connection,
    variant: SchemaVariant,
) -> Result<Vec<AdTypeAggregate>, StoreError> {
    let sql = format!(
        "SELECT ad_type, COUNT(*) AS count, \
            AVG({confidence}) AS avg_confidence, AVG({views}) AS avg_views \
         FROM {table} \
         WHERE ad_type IS NOT NULL AND ad_type != '' \
         GROUP BY ad_type \
         ORDER BY count DESC",
        confidence = variant.confidence(),
        views = variant.views(),
        table = variant.table(),
    );

    let mut stmt = conn.prepare(&sql)?;
    let types = stmt
        .query_map([], |row| {
            Ok(AdTypeAggregate {
                ad_type: row.get(0)?,
                count: row.get(1)?,
                avg_confidence: row.get::<_, Option<f64>>(2)?.unwrap_or(0.0),
                avg_views: row.get::<_, Option<f64>>(3)?.unwrap_or(0.0),
            })
        })?
        .collect::<Result<Vec<_>, _>>()?;

    Ok(types)
}

/// Ads per hour-of-day over the trailing 24 hours. Hours with no ads are
/// simply absent; the sequence sorts ascending by the `HH:00` label.
pub fn hourly(conn: &Connection, variant: SchemaVariant) -> Result<Vec<HourlyBucket>, StoreError> {
    let sql = format!(
        "SELECT strftime('%H:00', created_at) AS hour, COUNT(*) AS ads_count \
         FROM {table} \
         WHERE datetime(created_at) > datetime('now', '-1 day') \
         GROUP BY strftime('%H', created_at) \
         ORDER BY hour",
        table = variant.table(),
    );

    let mut stmt = conn.prepare(&sql)?;
    let buckets = stmt
        .query_map([], |row| {
            Ok(HourlyBucket {
                hour: row.get(0)?,
                ads_count: row.get(1)?,
            })
        })?
        .collect::<Result<Vec<_>, _>>()?;

    Ok(buckets)
}

pub fn top_channels(
    conn: &Connection,
    variant: SchemaVariant,
    limit: u32,
) -> Result<Vec<ChannelAggregate>, StoreError> {
    let sql = format!(
        "SELECT {channel} AS channel, COUNT(*) AS ads_count, \
            AVG({views}) AS avg_views, AVG({engagement}) AS avg_engagement \
         FROM {table} \
         GROUP BY {channel} \
         ORDER BY ads_count DESC \
         LIMIT ?1",
        channel = variant.channel(),
        views = variant.views(),
        engagement = variant.engagement(),
        table = variant.table(),
    );

    let mut stmt = conn.prepare(&sql)?;
    let channels = stmt
        .query_map(params![limit], |row| {
            Ok(ChannelAggregate {
                channel: row.get::<_, Option<String>>(0)?.unwrap_or_default(),
                ads_count: row.get(1)?,
                avg_views: row.get::<_, Option<f64>>(2)?.unwrap_or(0.0),
                avg_engagement: row.get::<_, Option<f64>>(3)?.unwrap_or(0.0),
            })
        })?
        .collect::<Result<Vec<_>, _>>()?;

    Ok(channels)
}

/// Most recent `crawler_stats` row as a JSON object. The crawler generations
/// disagree on column names, so the row is carried over column-by-column
/// instead of through a fixed struct.
pub fn latest_run(conn: &Connection, variant: SchemaVariant) -> Result<Option<Value>, StoreError> {
    let sql = format!(
        "SELECT * FROM crawler_stats ORDER BY {} DESC LIMIT 1",
        variant.run_order()
    );

    let mut stmt = conn.prepare(&sql)?;
    let names: Vec<String> = stmt.column_names().into_iter().map(String::from).collect();
    let mut rows = stmt.query([])?;

    let Some(row) = rows.next()? else {
        return Ok(None);
    };

    let mut map = serde_json::Map::new();
    for (i, name) in names.iter().enumerate() {
        let value = match row.get_ref(i)? {
            ValueRef::Null => Value::Null,
            ValueRef::Integer(n) => Value::from(n),
            ValueRef::Real(f) => serde_json::json!(f),
            ValueRef::Text(t) => Value::from(String::from_utf8_lossy(t).into_owned()),
            ValueRef::Blob(_) => Value::Null,
        };
        map.insert(name.clone(), value);
    }

    Ok(Some(Value::Object(map)))
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::{Duration, Utc};

    fn demo_conn() -> Connection {
        let conn = Connection::open_in_memory().unwrap();
        conn.execute_batch(
            "CREATE TABLE ads (
                id INTEGER PRIMARY KEY AUTOINCREMENT,
                video_id TEXT UNIQUE NOT NULL,
                title TEXT NOT NULL,
                channel TEXT,
                views INTEGER DEFAULT 0,
                likes INTEGER DEFAULT 0,
                comments_count INTEGER DEFAULT 0,
                engagement_rate REAL DEFAULT 0.0,
                confidence_score REAL DEFAULT 0.0,
                ad_type TEXT,
                duration INTEGER DEFAULT 0,
                created_at TEXT DEFAULT CURRENT_TIMESTAMP,
                thumbnail_url TEXT
            );",
        )
        .unwrap();
        conn
    }

    fn insert_ad(
        conn: &Connection,
        video_id: &str,
        channel: &str,
        ad_type: Option<&str>,
        confidence: f64,
        views: i64,
        created_at: &str,
    ) {
        conn.execute(
            "INSERT INTO ads (video_id, title, channel, views, confidence_score, ad_type, created_at)
             VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7)",
            params![video_id, format!("ad {video_id}"), channel, views, confidence, ad_type, created_at],
        )
        .unwrap();
    }

    fn hours_ago(h: i64) -> String {
        (Utc::now() - Duration::hours(h))
            .format("%Y-%m-%dT%H:%M:%SZ")
            .to_string()
    }

    #[test]
    fn summary_on_empty_store_is_all_zero() {
        let conn = demo_conn();
        let stats = summary(&conn, SchemaVariant::Demo).unwrap();
        assert_eq!(stats.total_ads, 0);
        assert_eq!(stats.unique_channels, 0);
        assert_eq!(stats.avg_confidence, 0.0);
        assert_eq!(stats.ads_last_24h, 0);
    }

    #[test]
    fn summary_counts_and_24h_window() {
        let conn = demo_conn();
        insert_ad(&conn, "a", "ChanA", Some("tech"), 0.8, 100, &hours_ago(1));
        insert_ad(&conn, "b", "ChanA", Some("tech"), 0.6, 200, &hours_ago(2));
        insert_ad(&conn, "c", "ChanB", None, 1.0, 300, &hours_ago(30));

        let stats = summary(&conn, SchemaVariant::Demo).unwrap();
        assert_eq!(stats.total_ads, 3);
        assert_eq!(stats.unique_channels, 2);
        assert!((stats.avg_confidence - 0.8).abs() < 1e-9);
        assert_eq!(stats.ads_last_24h, 2);
    }

    #[test]
    fn recent_orders_newest_first_with_id_tiebreak() {
        let conn = demo_conn();
        let same = hours_ago(3);
        insert_ad(&conn, "old", "C", None, 0.5, 1, &hours_ago(10));
        insert_ad(&conn, "tie1", "C", None, 0.5, 1, &same);
        insert_ad(&conn, "tie2", "C", None, 0.5, 1, &same);

        let ads = recent(&conn, SchemaVariant::Demo, 20).unwrap();
        assert_eq!(ads.len(), 3);
        assert_eq!(ads[0].video_id, "tie2");
        assert_eq!(ads[1].video_id, "tie1");
        assert_eq!(ads[2].video_id, "old");

        let limited = recent(&conn, SchemaVariant::Demo, 2).unwrap();
        assert_eq!(limited.len(), 2);
    }

    #[test]
    fn by_type_excludes_null_and_empty_and_sorts_desc() {
        let conn = demo_conn();
        insert_ad(&conn, "a", "C", Some("tech"), 0.9, 100, &hours_ago(1));
        insert_ad(&conn, "b", "C", Some("tech"), 0.7, 300, &hours_ago(1));
        insert_ad(&conn, "c", "C", Some("auto"), 0.5, 50, &hours_ago(1));
        insert_ad(&conn, "d", "C", None, 0.5, 50, &hours_ago(1));
        insert_ad(&conn, "e", "C", Some(""), 0.5, 50, &hours_ago(1));

        let types = by_type(&conn, SchemaVariant::Demo).unwrap();
        assert_eq!(types.len(), 2);
        assert_eq!(types[0].ad_type, "tech");
        assert_eq!(types[0].count, 2);
        assert!((types[0].avg_confidence - 0.8).abs() < 1e-9);
        assert!((types[0].avg_views - 200.0).abs() < 1e-9);
        assert_eq!(types[1].ad_type, "auto");
        assert!(types[0].count >= types[1].count);
    }

    #[test]
    fn hourly_only_covers_last_day() {
        let conn = demo_conn();
        insert_ad(&conn, "fresh", "C", None, 0.5, 1, &hours_ago(1));
        insert_ad(&conn, "stale", "C", None, 0.5, 1, &hours_ago(30));

        let buckets = hourly(&conn, SchemaVariant::Demo).unwrap();
        assert_eq!(buckets.len(), 1);
        assert_eq!(buckets[0].ads_count, 1);
        assert!(buckets[0].hour.ends_with(":00"));
    }

    #[test]
    fn top_channels_sorts_and_limits() {
        let conn = demo_conn();
        for i in 0..3 {
            insert_ad(&conn, &format!("a{i}"), "Big", None, 0.5, 100, &hours_ago(1));
        }
        insert_ad(&conn, "b0", "Small", None, 0.5, 400, &hours_ago(1));

        let channels = top_channels(&conn, SchemaVariant::Demo, 10).unwrap();
        assert_eq!(channels.len(), 2);
        assert_eq!(channels[0].channel, "Big");
        assert_eq!(channels[0].ads_count, 3);

        let limited = top_channels(&conn, SchemaVariant::Demo, 1).unwrap();
        assert_eq!(limited.len(), 1);
    }

    #[test]
    fn latest_run_errors_without_table_and_picks_newest_row() {
        let conn = demo_conn();
        assert!(latest_run(&conn, SchemaVariant::Demo).is_err());

        conn.execute_batch(
            "CREATE TABLE crawler_stats (
                id INTEGER PRIMARY KEY AUTOINCREMENT,
                total_videos_checked INTEGER,
                total_ads_found INTEGER,
                run_time DATETIME DEFAULT CURRENT_TIMESTAMP
            );
            INSERT INTO crawler_stats (total_videos_checked, total_ads_found, run_time)
                VALUES (10, 2, '2025-01-01T00:00:00Z');
            INSERT INTO crawler_stats (total_videos_checked, total_ads_found, run_time)
                VALUES (50, 7, '2025-06-01T00:00:00Z');",
        )
        .unwrap();

        let run = latest_run(&conn, SchemaVariant::Demo).unwrap().unwrap();
        assert_eq!(run["total_videos_checked"], 50);
        assert_eq!(run["total_ads_found"], 7);
    }

    #[test]
    fn real_variant_reads_crawler_columns() {
        let conn = Connection::open_in_memory().unwrap();
        conn.execute_batch(
            "CREATE TABLE real_ads (
                id INTEGER PRIMARY KEY AUTOINCREMENT,
                video_id TEXT,
                title TEXT,
                channel_title TEXT,
                view_count INTEGER,
                like_count INTEGER,
                comment_count INTEGER,
                ad_confidence REAL,
                ad_type TEXT,
                duration_seconds INTEGER,
                created_at TEXT,
                thumbnail_url TEXT
            );
            INSERT INTO real_ads (video_id, title, channel_title, view_count, like_count,
                                  comment_count, ad_confidence, ad_type, duration_seconds, created_at)
                VALUES ('v1', 'ad', 'RealChan', 500, 10, 2, 0.9, 'tech', 15, '2025-05-01T00:00:00Z');",
        )
        .unwrap();

        let stats = summary(&conn, SchemaVariant::Real).unwrap();
        assert_eq!(stats.total_ads, 1);
        assert_eq!(stats.unique_channels, 1);

        let ads = recent(&conn, SchemaVariant::Real, 20).unwrap();
        assert_eq!(ads[0].channel, "RealChan");
        assert_eq!(ads[0].views, 500);
        assert!((ads[0].confidence_score - 0.9).abs() < 1e-9);
    }
}
