//! Environment-driven configuration, loaded once at startup.

/// Server settings from the environment (`.env` supported via dotenvy):
/// `DATABASE_URL`, `BIND_ADDR`, `DATABASE_MAX_CONNECTIONS`.
#[derive(Debug, Clone)]
pub struct Config {
    pub database_url: String,
    pub bind_addr: String,
    pub max_connections: u32,
}

impl Config {
    pub fn from_env() -> Self {
        let database_url = std::env::var("DATABASE_URL")
            .unwrap_or_else(|_| "postgres://localhost/movies".into());
        let bind_addr = std::env::var("BIND_ADDR").unwrap_or_else(|_| "0.0.0.0:3000".into());
        let max_connections = std::env::var("DATABASE_MAX_CONNECTIONS")
            .ok()
            .and_then(|v| v.parse().ok())
            .unwrap_or(5);
        Config {
            database_url,
            bind_addr,
            max_connections,
        }
    }
}
