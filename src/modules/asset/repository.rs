use async_trait::async_trait;
use thiserror::Error;

use super::model::{AssetRow, MediaAsset};
use crate::infrastructure::db::pool::DbPool;

/// Table holding the media records in every namespace.
pub const ASSET_COLLECTION: &str = "media_assets";

#[derive(Debug, Error)]
pub enum StoreError {
    #[error("database error: {0}")]
    Database(#[from] sqlx::Error),

    #[error("store unavailable: {0}")]
    Unavailable(String),
}

/// Persistence for the media record.
///
/// Every automated write is conditional so that status only moves forward:
/// Ready and Processing writes skip both terminal states, Error writes skip
/// Ready rows. Each write returns whether a row changed.
#[async_trait]
pub trait AssetStore: Send + Sync {
    async fn get(&self, id: &str) -> Result<Option<MediaAsset>, StoreError>;

    /// Exact, case-sensitive match on the stored job correlation id.
    async fn find_by_job(&self, job_name: &str) -> Result<Vec<MediaAsset>, StoreError>;

    async fn mark_processing(&self, id: &str) -> Result<bool, StoreError>;

    /// Reserves the single job submission for an asset. Succeeds for at
    /// most one caller, and only while no job id is stored and the asset
    /// is not terminal.
    async fn claim_submission(&self, id: &str) -> Result<bool, StoreError>;

    /// Sets the job correlation id only if none is stored yet.
    async fn record_job(&self, id: &str, job_name: &str) -> Result<bool, StoreError>;

    async fn mark_ready(&self, id: &str, video_url: &str) -> Result<bool, StoreError>;

    async fn mark_failed(&self, id: &str, detail: Option<&str>) -> Result<bool, StoreError>;

    /// Operator override: Ready with an explicit URL regardless of state.
    async fn force_ready(&self, id: &str, video_url: &str) -> Result<bool, StoreError>;

    /// Names of the tables visible in this namespace.
    async fn list_collections(&self) -> Result<Vec<String>, StoreError>;
}

const SELECT_ASSET: &str = r#"
    SELECT id, status, source_uri, transcode_job_id, video_url, job_error, last_updated
    FROM media_assets
"#;

#[derive(Clone)]
pub struct PgAssetStore {
    pool: DbPool,
}

impl PgAssetStore {
    pub fn new(pool: DbPool) -> Self {
        Self { pool }
    }
}

#[async_trait]
impl AssetStore for PgAssetStore {
    async fn get(&self, id: &str) -> Result<Option<MediaAsset>, StoreError> {
        let row = sqlx::query_as::<_, AssetRow>(&format!("{SELECT_ASSET} WHERE id = $1"))
            .bind(id)
            .fetch_optional(&self.pool)
            .await?;

        Ok(row.map(MediaAsset::from))
    }

    async fn find_by_job(&self, job_name: &str) -> Result<Vec<MediaAsset>, StoreError> {
        let rows = sqlx::query_as::<_, AssetRow>(&format!(
            "{SELECT_ASSET} WHERE transcode_job_id = $1"
        ))
        .bind(job_name)
        .fetch_all(&self.pool)
        .await?;

        Ok(rows.into_iter().map(MediaAsset::from).collect())
    }

    async fn mark_processing(&self, id: &str) -> Result<bool, StoreError> {
        let result = sqlx::query(
            r#"
            UPDATE media_assets
            SET status = 'Processing', last_updated = NOW()
            WHERE id = $1
              AND status IS DISTINCT FROM 'Ready'
              AND status IS DISTINCT FROM 'Error'
            "#,
        )
        .bind(id)
        .execute(&self.pool)
        .await?;

        Ok(result.rows_affected() > 0)
    }

    async fn claim_submission(&self, id: &str) -> Result<bool, StoreError> {
        let result = sqlx::query(
            r#"
            UPDATE media_assets
            SET submit_claimed_at = NOW(), last_updated = NOW()
            WHERE id = $1
              AND transcode_job_id IS NULL
              AND submit_claimed_at IS NULL
              AND status IS DISTINCT FROM 'Ready'
              AND status IS DISTINCT FROM 'Error'
            "#,
        )
        .bind(id)
        .execute(&self.pool)
        .await?;

        Ok(result.rows_affected() > 0)
    }

    async fn record_job(&self, id: &str, job_name: &str) -> Result<bool, StoreError> {
        let result = sqlx::query(
            r#"
            UPDATE media_assets
            SET transcode_job_id = $2, last_updated = NOW()
            WHERE id = $1 AND transcode_job_id IS NULL
            "#,
        )
        .bind(id)
        .bind(job_name)
        .execute(&self.pool)
        .await?;

        Ok(result.rows_affected() > 0)
    }

    async fn mark_ready(&self, id: &str, video_url: &str) -> Result<bool, StoreError> {
        let result = sqlx::query(
            r#"
            UPDATE media_assets
            SET status = 'Ready', video_url = $2, job_error = NULL, last_updated = NOW()
            WHERE id = $1
              AND status IS DISTINCT FROM 'Ready'
              AND status IS DISTINCT FROM 'Error'
            "#,
        )
        .bind(id)
        .bind(video_url)
        .execute(&self.pool)
        .await?;

        Ok(result.rows_affected() > 0)
    }

    async fn mark_failed(&self, id: &str, detail: Option<&str>) -> Result<bool, StoreError> {
        let result = sqlx::query(
            r#"
            UPDATE media_assets
            SET status = 'Error', video_url = NULL, job_error = $2, last_updated = NOW()
            WHERE id = $1 AND status IS DISTINCT FROM 'Ready'
            "#,
        )
        .bind(id)
        .bind(detail)
        .execute(&self.pool)
        .await?;

        Ok(result.rows_affected() > 0)
    }

    async fn force_ready(&self, id: &str, video_url: &str) -> Result<bool, StoreError> {
        let result = sqlx::query(
            r#"
            UPDATE media_assets
            SET status = 'Ready', video_url = $2, job_error = NULL, last_updated = NOW()
            WHERE id = $1
            "#,
        )
        .bind(id)
        .bind(video_url)
        .execute(&self.pool)
        .await?;

        Ok(result.rows_affected() > 0)
    }

    async fn list_collections(&self) -> Result<Vec<String>, StoreError> {
        let tables = sqlx::query_scalar::<_, String>(
            r#"
            SELECT table_name::text
            FROM information_schema.tables
            WHERE table_schema = current_schema()
            ORDER BY table_name
            "#,
        )
        .fetch_all(&self.pool)
        .await?;

        Ok(tables)
    }
}

/// Runs against a scratch database per test; needs `DATABASE_URL`.
/// `cargo test -- --ignored` to include them.
#[cfg(test)]
mod pg_tests {
    use sqlx::PgPool;

    use super::*;
    use crate::modules::asset::model::AssetStatus;

    const JOB: &str = "projects/p/locations/us-central1/jobs/job-1";

    async fn seed(pool: &PgPool, id: &str, status: Option<&str>) {
        sqlx::query("INSERT INTO media_assets (id, status) VALUES ($1, $2)")
            .bind(id)
            .bind(status)
            .execute(pool)
            .await
            .unwrap();
    }

    #[sqlx::test(migrations = "./migrations")]
    #[ignore = "needs DATABASE_URL"]
    async fn ready_write_keeps_override(pool: PgPool) {
        seed(&pool, "abc123", Some("Processing")).await;
        let store = PgAssetStore::new(pool);

        assert!(store.force_ready("abc123", "https://cdn.example/fixed.m3u8").await.unwrap());
        assert!(!store.mark_ready("abc123", "https://storage.example/abc123.m3u8").await.unwrap());
        assert!(!store.mark_failed("abc123", Some("late failure")).await.unwrap());

        let asset = store.get("abc123").await.unwrap().unwrap();
        assert_eq!(asset.status, Some(AssetStatus::Ready));
        assert_eq!(asset.video_url.as_deref(), Some("https://cdn.example/fixed.m3u8"));
    }

    #[sqlx::test(migrations = "./migrations")]
    #[ignore = "needs DATABASE_URL"]
    async fn error_rows_are_not_reopened(pool: PgPool) {
        seed(&pool, "abc123", Some("Error")).await;
        let store = PgAssetStore::new(pool);

        assert!(!store.mark_processing("abc123").await.unwrap());
        assert!(!store.mark_ready("abc123", "https://storage.example/abc123.m3u8").await.unwrap());
        assert!(!store.claim_submission("abc123").await.unwrap());

        assert!(store.force_ready("abc123", "https://cdn.example/fixed.m3u8").await.unwrap());
        let asset = store.get("abc123").await.unwrap().unwrap();
        assert_eq!(asset.status, Some(AssetStatus::Ready));
        assert_eq!(asset.job_error, None);
    }

    #[sqlx::test(migrations = "./migrations")]
    #[ignore = "needs DATABASE_URL"]
    async fn submission_is_claimed_once(pool: PgPool) {
        seed(&pool, "abc123", None).await;
        let store = PgAssetStore::new(pool);

        assert!(store.claim_submission("abc123").await.unwrap());
        assert!(!store.claim_submission("abc123").await.unwrap());
        assert!(!store.claim_submission("ghost").await.unwrap());
    }

    #[sqlx::test(migrations = "./migrations")]
    #[ignore = "needs DATABASE_URL"]
    async fn job_id_is_set_once_and_matched_exactly(pool: PgPool) {
        seed(&pool, "Movie1", None).await;
        seed(&pool, "movie1", None).await;
        let store = PgAssetStore::new(pool);

        assert!(store.record_job("Movie1", JOB).await.unwrap());
        assert!(!store.record_job("Movie1", "projects/p/locations/us-central1/jobs/other").await.unwrap());

        let found = store.find_by_job(JOB).await.unwrap();
        assert_eq!(found.len(), 1);
        assert_eq!(found[0].id, "Movie1");
        assert!(store.find_by_job(&JOB.to_uppercase()).await.unwrap().is_empty());
    }

    #[sqlx::test(migrations = "./migrations")]
    #[ignore = "needs DATABASE_URL"]
    async fn failure_clears_url_and_keeps_detail(pool: PgPool) {
        seed(&pool, "abc123", Some("Processing")).await;
        let store = PgAssetStore::new(pool);

        assert!(store.mark_failed("abc123", Some("unsupported codec")).await.unwrap());
        let asset = store.get("abc123").await.unwrap().unwrap();
        assert_eq!(asset.status, Some(AssetStatus::Error));
        assert_eq!(asset.video_url, None);
        assert_eq!(asset.job_error.as_deref(), Some("unsupported codec"));
        assert!(store.list_collections().await.unwrap().contains(&ASSET_COLLECTION.to_string()));
    }
}
