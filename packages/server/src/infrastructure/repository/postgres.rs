//! PostgreSQL Gaze Repository 実装
//!
//! `gaze_data` / `page_changes` テーブルを使います。テーブルは起動時に
//! 存在しなければ作成されます。

use std::time::Duration;

use async_trait::async_trait;
use chrono::NaiveDateTime;
use sqlx::{FromRow, PgPool, postgres::PgPoolOptions};

use crate::domain::{
    GazeRepository, PageChange, PageId, PositionSample, PurgeCounts, RepositoryError, SectionId,
    StoredSample, Timestamp,
};

const CREATE_GAZE_DATA: &str = r#"
    CREATE TABLE IF NOT EXISTS gaze_data (
        id SERIAL PRIMARY KEY,
        x FLOAT NOT NULL,
        y FLOAT NOT NULL,
        timestamp BIGINT NOT NULL,
        section_id VARCHAR(100),
        current_page VARCHAR(100),
        created_at TIMESTAMP DEFAULT NOW()
    )
"#;

const CREATE_PAGE_CHANGES: &str = r#"
    CREATE TABLE IF NOT EXISTS page_changes (
        id SERIAL PRIMARY KEY,
        current_page VARCHAR(100) NOT NULL,
        timestamp BIGINT NOT NULL,
        created_at TIMESTAMP DEFAULT NOW()
    )
"#;

#[derive(Debug, FromRow)]
struct GazeRow {
    id: i64,
    x: f64,
    y: f64,
    timestamp: i64,
    section_id: Option<String>,
    current_page: Option<String>,
    created_at: Option<NaiveDateTime>,
}

impl GazeRow {
    /// 行をドメインモデルに変換する。座標が不正な行は `None`
    fn into_stored(self) -> Option<StoredSample> {
        let sample = PositionSample::new(
            self.x,
            self.y,
            Timestamp::new(self.timestamp),
            // 他の書き込み元が入れた空文字などはラベルなしとして扱う
            self.section_id.and_then(|s| SectionId::new(s).ok()),
            self.current_page.and_then(|p| PageId::new(p).ok()),
        )
        .ok()?;
        Some(StoredSample {
            id: self.id,
            sample,
            created_at: self
                .created_at
                .map(|t| Timestamp::new(t.and_utc().timestamp_millis())),
        })
    }
}

fn backend(e: sqlx::Error) -> RepositoryError {
    RepositoryError::Backend(e.to_string())
}

pub struct PostgresGazeRepository {
    pool: PgPool,
}

impl PostgresGazeRepository {
    /// 接続プールを作成し、テーブルを用意する
    pub async fn connect(database_url: &str) -> Result<Self, RepositoryError> {
        let pool = PgPoolOptions::new()
            .max_connections(5)
            .connect(database_url)
            .await
            .map_err(backend)?;
        let repository = Self { pool };
        repository.ensure_schema().await?;
        tracing::info!("Connected to PostgreSQL");
        Ok(repository)
    }

    async fn ensure_schema(&self) -> Result<(), RepositoryError> {
        sqlx::query(CREATE_GAZE_DATA)
            .execute(&self.pool)
            .await
            .map_err(backend)?;
        sqlx::query(CREATE_PAGE_CHANGES)
            .execute(&self.pool)
            .await
            .map_err(backend)?;
        Ok(())
    }
}

#[async_trait]
impl GazeRepository for PostgresGazeRepository {
    async fn save_sample(&self, sample: &PositionSample) -> Result<(), RepositoryError> {
        sqlx::query(
            "INSERT INTO gaze_data (x, y, timestamp, section_id, current_page) \
             VALUES ($1, $2, $3, $4, $5)",
        )
        .bind(sample.x)
        .bind(sample.y)
        .bind(sample.timestamp.value())
        .bind(sample.section_id.as_ref().map(SectionId::as_str))
        .bind(sample.page_id.as_ref().map(PageId::as_str))
        .execute(&self.pool)
        .await
        .map_err(backend)?;
        Ok(())
    }

    async fn save_page_change(&self, change: &PageChange) -> Result<(), RepositoryError> {
        sqlx::query("INSERT INTO page_changes (current_page, timestamp) VALUES ($1, $2)")
            .bind(change.page_id.as_str())
            .bind(change.timestamp.value())
            .execute(&self.pool)
            .await
            .map_err(backend)?;
        Ok(())
    }

    async fn recent_samples(&self, limit: usize) -> Result<Vec<StoredSample>, RepositoryError> {
        let limit = i64::try_from(limit).unwrap_or(i64::MAX);
        let rows: Vec<GazeRow> = sqlx::query_as(
            r#"
            SELECT id::BIGINT AS id, x, y, timestamp, section_id, current_page, created_at
            FROM gaze_data
            ORDER BY created_at DESC, id DESC
            LIMIT $1
            "#,
        )
        .bind(limit)
        .fetch_all(&self.pool)
        .await
        .map_err(backend)?;

        let total = rows.len();
        let samples: Vec<StoredSample> = rows.into_iter().filter_map(GazeRow::into_stored).collect();
        if samples.len() < total {
            tracing::warn!(
                "Skipped {} gaze_data row(s) with non-finite coordinates",
                total - samples.len()
            );
        }
        Ok(samples)
    }

    async fn clear_all(&self) -> Result<PurgeCounts, RepositoryError> {
        let mut tx = self.pool.begin().await.map_err(backend)?;
        let samples = sqlx::query("DELETE FROM gaze_data")
            .execute(tx.as_mut())
            .await
            .map_err(backend)?
            .rows_affected();
        let page_changes = sqlx::query("DELETE FROM page_changes")
            .execute(tx.as_mut())
            .await
            .map_err(backend)?
            .rows_affected();
        tx.commit().await.map_err(backend)?;

        Ok(PurgeCounts {
            samples,
            page_changes,
        })
    }

    async fn delete_older_than(&self, retention: Duration) -> Result<PurgeCounts, RepositoryError> {
        let seconds = retention.as_secs_f64();
        let samples = sqlx::query(
            "DELETE FROM gaze_data WHERE created_at < NOW() - make_interval(secs => $1)",
        )
        .bind(seconds)
        .execute(&self.pool)
        .await
        .map_err(backend)?
        .rows_affected();
        let page_changes = sqlx::query(
            "DELETE FROM page_changes WHERE created_at < NOW() - make_interval(secs => $1)",
        )
        .bind(seconds)
        .execute(&self.pool)
        .await
        .map_err(backend)?
        .rows_affected();

        Ok(PurgeCounts {
            samples,
            page_changes,
        })
    }
}
