use chrono::{DateTime, Utc};
use sqlx::{Row, SqlitePool};
use tracing::info;

use crate::db::models::DbTrack;

/// SQLite-backed catalog of tracks.
///
/// One table, keyed by the process-generated track id, with a lookup index on
/// `source_id` for dedup and listing ordered by creation time, descending.
/// Timestamps are stored as RFC 3339 text.
#[derive(Debug, Clone)]
pub struct Database {
    pool: SqlitePool,
}

impl Database {
    /// Initialize database connection and create tables
    pub async fn new(database_path: &str) -> Result<Self, sqlx::Error> {
        // Use sqlite:// with ?mode=rwc to create if it doesn't exist
        let database_url = format!("sqlite://{}?mode=rwc", database_path);
        info!("Connecting to {}", database_url);
        let pool = SqlitePool::connect(&database_url).await?;

        let db = Database { pool };
        db.create_tables().await?;
        Ok(db)
    }

    /// Initialize an in-memory database (tests)
    pub async fn new_in_memory() -> Result<Self, sqlx::Error> {
        let pool = SqlitePool::connect("sqlite::memory:").await?;

        let db = Database { pool };
        db.create_tables().await?;
        Ok(db)
    }

    async fn create_tables(&self) -> Result<(), sqlx::Error> {
        sqlx::query(
            r#"
            CREATE TABLE IF NOT EXISTS tracks (
                id TEXT PRIMARY KEY,
                source_id TEXT,
                title TEXT NOT NULL,
                artist TEXT,
                duration_seconds INTEGER NOT NULL,
                file_path TEXT NOT NULL,
                thumbnail_path TEXT,
                file_size_bytes INTEGER NOT NULL,
                is_local BOOLEAN NOT NULL DEFAULT FALSE,
                created_at TEXT NOT NULL
            )
            "#,
        )
        .execute(&self.pool)
        .await?;

        sqlx::query("CREATE INDEX IF NOT EXISTS idx_tracks_source_id ON tracks (source_id)")
            .execute(&self.pool)
            .await?;

        Ok(())
    }

    /// Insert a track, replacing any existing row with the same id.
    /// This is the only write primitive; there is no field-level update.
    pub async fn insert_or_replace_track(&self, track: &DbTrack) -> Result<(), sqlx::Error> {
        sqlx::query(
            r#"
            INSERT OR REPLACE INTO tracks (
                id, source_id, title, artist, duration_seconds,
                file_path, thumbnail_path, file_size_bytes, is_local, created_at
            ) VALUES (?, ?, ?, ?, ?, ?, ?, ?, ?, ?)
            "#,
        )
        .bind(&track.id)
        .bind(&track.source_id)
        .bind(&track.title)
        .bind(&track.artist)
        .bind(track.duration_seconds)
        .bind(&track.file_path)
        .bind(&track.thumbnail_path)
        .bind(track.file_size_bytes)
        .bind(track.is_local)
        .bind(track.created_at.to_rfc3339())
        .execute(&self.pool)
        .await?;

        Ok(())
    }

    /// Get a track by its internal id
    pub async fn get_track_by_id(&self, id: &str) -> Result<Option<DbTrack>, sqlx::Error> {
        let row = sqlx::query("SELECT * FROM tracks WHERE id = ?")
            .bind(id)
            .fetch_optional(&self.pool)
            .await?;

        Ok(row.map(|row| Self::row_to_track(&row)))
    }

    /// Get a track by its external source id (the dedup lookup)
    pub async fn get_track_by_source_id(
        &self,
        source_id: &str,
    ) -> Result<Option<DbTrack>, sqlx::Error> {
        let row = sqlx::query("SELECT * FROM tracks WHERE source_id = ?")
            .bind(source_id)
            .fetch_optional(&self.pool)
            .await?;

        Ok(row.map(|row| Self::row_to_track(&row)))
    }

    /// All tracks, newest first
    pub async fn all_tracks(&self) -> Result<Vec<DbTrack>, sqlx::Error> {
        let rows = sqlx::query("SELECT * FROM tracks ORDER BY created_at DESC")
            .fetch_all(&self.pool)
            .await?;

        Ok(rows.iter().map(Self::row_to_track).collect())
    }

    /// All cataloged file paths, for the local importer's set-difference
    pub async fn all_file_paths(&self) -> Result<Vec<String>, sqlx::Error> {
        let rows = sqlx::query("SELECT file_path FROM tracks")
            .fetch_all(&self.pool)
            .await?;

        Ok(rows.iter().map(|row| row.get("file_path")).collect())
    }

    pub async fn delete_track_by_id(&self, id: &str) -> Result<(), sqlx::Error> {
        sqlx::query("DELETE FROM tracks WHERE id = ?")
            .bind(id)
            .execute(&self.pool)
            .await?;

        Ok(())
    }

    pub async fn track_count(&self) -> Result<i64, sqlx::Error> {
        let row = sqlx::query("SELECT COUNT(*) as count FROM tracks")
            .fetch_one(&self.pool)
            .await?;

        Ok(row.get("count"))
    }

    fn row_to_track(row: &sqlx::sqlite::SqliteRow) -> DbTrack {
        DbTrack {
            id: row.get("id"),
            source_id: row.get("source_id"),
            title: row.get("title"),
            artist: row.get("artist"),
            duration_seconds: row.get("duration_seconds"),
            file_path: row.get("file_path"),
            thumbnail_path: row.get("thumbnail_path"),
            file_size_bytes: row.get("file_size_bytes"),
            is_local: row.get("is_local"),
            created_at: DateTime::parse_from_rfc3339(&row.get::<String, _>("created_at"))
                .unwrap()
                .with_timezone(&Utc),
        }
    }
}
