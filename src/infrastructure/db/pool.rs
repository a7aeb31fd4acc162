use sqlx::postgres::{PgConnectOptions, PgPoolOptions};
use sqlx::{Pool, Postgres};
use std::str::FromStr;
use std::time::Duration;
use tracing::info;

pub type DbPool = Pool<Postgres>;

pub async fn connect_to_db(connection_string: &str) -> Result<DbPool, sqlx::Error> {
    let options = PgConnectOptions::from_str(connection_string)?;

    let pool = PgPoolOptions::new()
        .max_connections(20)
        .min_connections(2)
        .acquire_timeout(Duration::from_secs(5))
        .idle_timeout(Duration::from_secs(600))
        .connect_with(options)
        .await?;

    info!("✅ Connected to PostgreSQL ({})", options_label(connection_string));
    Ok(pool)
}

/// Pool that defers connecting until first use. The fallback namespace is
/// only touched by diagnostics, so an unreachable fallback must not block
/// startup.
pub fn connect_lazy(connection_string: &str) -> Result<DbPool, sqlx::Error> {
    let options = PgConnectOptions::from_str(connection_string)?;

    let pool = PgPoolOptions::new()
        .max_connections(2)
        .acquire_timeout(Duration::from_secs(5))
        .connect_lazy_with(options);

    Ok(pool)
}

fn options_label(connection_string: &str) -> String {
    match url::Url::parse(connection_string) {
        Ok(url) => format!(
            "{}{}",
            url.host_str().unwrap_or("localhost"),
            url.path()
        ),
        Err(_) => "unparsed url".to_string(),
    }
}
