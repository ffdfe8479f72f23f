use std::{env, fmt::Display, str::FromStr};

use log::{info, warn};

/// Where posts, adventures and user names are kept.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum StoreBackend {
    Mongo,
    Memory,
}

impl FromStr for StoreBackend {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "mongo" | "mongodb" => Ok(StoreBackend::Mongo),
            "memory" | "in-memory" => Ok(StoreBackend::Memory),
            other => Err(format!("unknown store backend '{other}'")),
        }
    }
}

impl Display for StoreBackend {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            StoreBackend::Mongo => write!(f, "mongo"),
            StoreBackend::Memory => write!(f, "memory"),
        }
    }
}

#[derive(Debug, Clone)]
pub struct Config {
    pub host: String,
    pub port: u16,
    pub mongodb_uri: String,
    pub database_name: String,
    pub store_backend: StoreBackend,
    pub jwt_secret: String,
    pub write_retry_limit: u32,
}

impl Config {
    pub fn load() -> Self {
        Self {
            host: try_load("HOST", "127.0.0.1".to_string()),
            port: try_load("PORT", 8000),
            mongodb_uri: try_load("MONGODB_URI", "mongodb://localhost:27017".to_string()),
            database_name: try_load("DATABASE_NAME", "bagpack".to_string()),
            store_backend: try_load("STORE_BACKEND", StoreBackend::Mongo),
            jwt_secret: load_secret("JWT_SECRET"),
            write_retry_limit: try_load("WRITE_RETRY_LIMIT", 5),
        }
    }
}

fn var(key: &str) -> Option<String> {
    env::var(key).ok().filter(|value| !value.trim().is_empty())
}

fn try_load<T>(key: &str, default: T) -> T
where
    T: FromStr + Display,
    T::Err: Display,
{
    let Some(raw) = var(key) else {
        info!("{key} not set, using default: {default}");
        return default;
    };

    raw.trim().parse().unwrap_or_else(|e| {
        warn!("Invalid {key} value '{raw}': {e}, using default: {default}");
        default
    })
}

fn load_secret(key: &str) -> String {
    var(key).unwrap_or_else(|| {
        warn!("{key} not set, falling back to an insecure development secret");
        "secret".to_string()
    })
}
