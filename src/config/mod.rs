use std::env;
use std::time::Duration;

#[derive(Debug, Clone, serde::Deserialize)]
pub struct Config {
    pub database_url: String,
    pub redis_url: String,
    pub jwt_secret: String,
    pub server_host: String,
    pub server_port: u16,
    pub api_base_uri: String,
    pub cache_ttl_categories_secs: u64,
    pub cache_ttl_books_secs: u64,
    pub cache_ttl_not_returned_secs: u64,
    pub cache_timeout_ms: u64,
}

impl Config {
    pub fn from_env() -> Result<Self, env::VarError> {
        dotenv::dotenv().ok();

        Ok(Config {
            database_url: env::var("DATABASE_URL")?,
            redis_url: env::var("REDIS_URL")?,
            jwt_secret: env::var("JWT_SECRET")?,
            server_host: env::var("SERVER_HOST").unwrap_or_else(|_| "0.0.0.0".into()),
            server_port: parse_or("SERVER_PORT", 5000),
            api_base_uri: env::var("API_BASE_URI").unwrap_or_else(|_| "/api/v1".into()),
            cache_ttl_categories_secs: parse_or("CACHE_TTL_CATEGORIES_SECS", 3600),
            cache_ttl_books_secs: parse_or("CACHE_TTL_BOOKS_SECS", 300),
            cache_ttl_not_returned_secs: parse_or("CACHE_TTL_NOT_RETURNED_SECS", 300),
            cache_timeout_ms: parse_or("CACHE_TIMEOUT_MS", 250),
        })
    }

    pub fn categories_ttl(&self) -> Duration {
        Duration::from_secs(self.cache_ttl_categories_secs)
    }

    pub fn books_ttl(&self) -> Duration {
        Duration::from_secs(self.cache_ttl_books_secs)
    }

    pub fn not_returned_ttl(&self) -> Duration {
        Duration::from_secs(self.cache_ttl_not_returned_secs)
    }

    pub fn cache_timeout(&self) -> Duration {
        Duration::from_millis(self.cache_timeout_ms)
    }
}

// 可选变量：缺失或无法解析时使用默认值
fn parse_or<T: std::str::FromStr>(key: &str, default: T) -> T {
    env::var(key)
        .ok()
        .and_then(|v| v.trim().parse().ok())
        .unwrap_or(default)
}

#[cfg(test)]
impl Config {
    pub fn for_tests() -> Self {
        Config {
            database_url: "postgres://localhost/library_test".into(),
            redis_url: "redis://127.0.0.1/".into(),
            jwt_secret: "test-secret".into(),
            server_host: "127.0.0.1".into(),
            server_port: 5000,
            api_base_uri: "/api/v1".into(),
            cache_ttl_categories_secs: 3600,
            cache_ttl_books_secs: 300,
            cache_ttl_not_returned_secs: 300,
            cache_timeout_ms: 250,
        }
    }
}
