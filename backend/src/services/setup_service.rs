use anyhow::{Context, Result};
use log::info;
use rusqlite::Connection;
use std::fs;
use std::path::Path;

const SCHEMA: &str = "
CREATE TABLE IF NOT EXISTS ads (
    id INTEGER PRIMARY KEY AUTOINCREMENT,
    video_id TEXT UNIQUE NOT NULL,
    url TEXT NOT NULL,
    source TEXT DEFAULT 'YouTube',
    type TEXT DEFAULT 'video',
    title TEXT NOT NULL,
    published_at TEXT,
    channel TEXT,
    description TEXT,
    views INTEGER DEFAULT 0,
    likes INTEGER DEFAULT 0,
    comments_count INTEGER DEFAULT 0,
    engagement_rate REAL DEFAULT 0.0,
    confidence_score REAL DEFAULT 0.0,
    ad_type TEXT,
    dominant_colors TEXT,
    duration INTEGER DEFAULT 0,
    thumbnail_url TEXT,
    created_at TEXT DEFAULT CURRENT_TIMESTAMP,
    processed_at DATETIME DEFAULT CURRENT_TIMESTAMP
);

CREATE TABLE IF NOT EXISTS audio_features (
    ad_id INTEGER PRIMARY KEY,
    tempo REAL,
    energy REAL,
    spectral_centroid REAL,
    spectral_rolloff REAL,
    spectral_bandwidth REAL,
    zero_crossing_rate REAL,
    speech_ratio REAL,
    mfcc_features TEXT,
    chroma_features TEXT,
    FOREIGN KEY (ad_id) REFERENCES ads(id) ON DELETE CASCADE
);

CREATE TABLE IF NOT EXISTS visual_features (
    ad_id INTEGER PRIMARY KEY,
    text_density REAL DEFAULT 0.0,
    brightness REAL DEFAULT 0.0,
    color_palette TEXT,
    has_faces BOOLEAN DEFAULT 0,
    has_text BOOLEAN DEFAULT 0,
    FOREIGN KEY (ad_id) REFERENCES ads(id) ON DELETE CASCADE
);

CREATE INDEX IF NOT EXISTS idx_video_id ON ads(video_id);
CREATE INDEX IF NOT EXISTS idx_published_at ON ads(published_at);
CREATE INDEX IF NOT EXISTS idx_engagement_rate ON ads(engagement_rate);
";

const SAMPLE_ADS: &str = "
INSERT OR IGNORE INTO ads (
    video_id, url, title, channel, views, likes, engagement_rate,
    confidence_score, ad_type, duration, published_at, created_at
) VALUES
    ('sample1', 'https://youtube.com/watch?v=sample1', 'Car Ad 2025 - The Future of Driving',
     'AutoChannel', 15000, 750, 0.05, 0.95, 'automotive', 30,
     '2025-01-15T10:00:00Z', '2025-01-15T10:00:00Z'),
    ('sample2', 'https://youtube.com/watch?v=sample2', 'New Phone Ad - Advanced Technology',
     'TechChannel', 25000, 1200, 0.048, 0.92, 'technology', 45,
     '2025-01-16T14:30:00Z', '2025-01-16T14:30:00Z'),
    ('sample3', 'https://youtube.com/watch?v=sample3', 'Soft Drink Ad - Summer 2025',
     'DrinkChannel', 8000, 320, 0.04, 0.88, 'food_beverage', 20,
     '2025-01-17T16:45:00Z', '2025-01-17T16:45:00Z'),
    ('sample4', 'https://youtube.com/watch?v=sample4', 'Online Store Ad - Special Discounts',
     'ShopChannel', 12000, 480, 0.04, 0.91, 'retail', 25,
     '2025-01-18T09:15:00Z', '2025-01-18T09:15:00Z'),
    ('sample5', 'https://youtube.com/watch?v=sample5', 'Restaurant Ad - Delicious Food',
     'FoodChannel', 18000, 900, 0.05, 0.89, 'food_beverage', 35,
     '2025-01-19T12:00:00Z', '2025-01-19T12:00:00Z');

INSERT OR IGNORE INTO audio_features (ad_id, tempo, energy, speech_ratio) VALUES
    (1, 120, 0.8, 0.6),
    (2, 140, 0.9, 0.7),
    (3, 110, 0.7, 0.4),
    (4, 130, 0.6, 0.8),
    (5, 100, 0.5, 0.3);

INSERT OR IGNORE INTO visual_features (ad_id, text_density, brightness) VALUES
    (1, 0.3, 180),
    (2, 0.4, 200),
    (3, 0.2, 220),
    (4, 0.5, 160),
    (5, 0.3, 190);
";

/// Creates the demo store at `db_path` with schema and sample rows. Safe to
/// call repeatedly: tables use IF NOT EXISTS and sample rows INSERT OR
/// IGNORE, so the 5 documented ads are inserted at most once.
pub fn initialize(db_path: &str) -> Result<()> {
    let path = Path::new(db_path);
    if let Some(dir) = path.parent() {
        if !dir.as_os_str().is_empty() {
            fs::create_dir_all(dir)
                .with_context(|| format!("failed to create directory {}", dir.display()))?;
        }
    }

    let conn = Connection::open(path)
        .with_context(|| format!("failed to open database at {db_path}"))?;
    conn.execute_batch(SCHEMA).context("failed to create schema")?;
    conn.execute_batch(SAMPLE_ADS).context("failed to insert sample data")?;

    info!("Database initialized at {db_path}");
    Ok(())
}
