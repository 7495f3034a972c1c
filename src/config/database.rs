use crate::config::parameter;
use async_trait::async_trait;
use sqlx::{Error, Pool, Postgres, pool::PoolOptions};
use tracing::info;

pub struct Database {
    pool: Pool<Postgres>,
}

#[async_trait]
pub trait DatabaseTrait {
    async fn init() -> Result<Self, Error>
        where
            Self: Sized;
    fn get_pool(&self) -> &Pool<Postgres>;
}

#[async_trait]
impl DatabaseTrait for Database {
    async fn init() -> Result<Self, Error> {
        let database_url = parameter::get("DATABASE_URL");

        let max_connections = parameter::get_optional("DB_MAX_CONNECTIONS")
            .and_then(|s| s.parse::<u32>().ok())
            .unwrap_or(20);

        let min_connections = parameter::get_optional("DB_MIN_CONNECTIONS")
            .and_then(|s| s.parse::<u32>().ok())
            .unwrap_or(5);

        let acquire_timeout_seconds = parameter::get_optional("DB_ACQUIRE_TIMEOUT_SECONDS")
            .and_then(|s| s.parse::<u64>().ok())
            .unwrap_or(30);

        let idle_timeout_seconds = parameter::get_optional("DB_IDLE_TIMEOUT_SECONDS")
            .and_then(|s| s.parse::<u64>().ok())
            .unwrap_or(600);

        let max_lifetime_seconds = parameter::get_optional("DB_MAX_LIFETIME_SECONDS")
            .and_then(|s| s.parse::<u64>().ok())
            .unwrap_or(1800);

        let pool = PoolOptions::<Postgres>::new()
            .max_connections(max_connections)
            .min_connections(min_connections)
            .acquire_timeout(std::time::Duration::from_secs(acquire_timeout_seconds))
            .idle_timeout(std::time::Duration::from_secs(idle_timeout_seconds))
            .max_lifetime(std::time::Duration::from_secs(max_lifetime_seconds))
            .connect(&database_url)
            .await?;

        // Avoid exposing pool capacity details outside development
        if cfg!(debug_assertions) || !parameter::is_production() {
            info!(
                "Database pool configured: max={}, min={}, acquire_timeout={}s, idle_timeout={}s, max_lifetime={}s",
                max_connections, min_connections, acquire_timeout_seconds, idle_timeout_seconds, max_lifetime_seconds
            );
        } else {
            info!("Database pool configured successfully");
        }

        Ok(Self { pool })
    }

    fn get_pool(&self) -> &Pool<Postgres> {
        &self.pool
    }
}
