use redis::{AsyncCommands, Client, aio::MultiplexedConnection};
use tracing::info;

#[derive(Clone)]
pub struct RedisService {
    client: Client,
}

impl RedisService {
    pub async fn new(connection_string: &str) -> Result<Self, redis::RedisError> {
        let service = Self::open(connection_string)?;

        // Test connection
        let _conn = service.get_conn().await?;

        info!("✅ Connected to Redis");
        Ok(service)
    }

    /// Builds the client without touching the network.
    pub fn open(connection_string: &str) -> Result<Self, redis::RedisError> {
        let client = Client::open(connection_string)?;
        Ok(Self { client })
    }

    pub async fn get_conn(&self) -> Result<MultiplexedConnection, redis::RedisError> {
        self.client.get_multiplexed_async_connection().await
    }

    pub async fn is_token_revoked(&self, token: &str) -> Result<bool, redis::RedisError> {
        let mut conn = self.get_conn().await?;
        conn.exists(format!("blocked_token:{}", token)).await
    }
}
