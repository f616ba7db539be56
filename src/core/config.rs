use std::env;

use validator::Validate;

use crate::features::rate_limits::models::RateLimitPolicy;

#[derive(Debug, Clone)]
pub struct Config {
    pub app: AppConfig,
    pub store: StoreConfig,
    pub rate_limits: RateLimitsConfig,
    pub swagger: SwaggerConfig,
}

#[derive(Debug, Clone)]
pub struct AppConfig {
    pub host: String,
    pub port: u16,
    pub cors_allowed_origins: Vec<String>,
    pub max_request_body_size: usize,
}

/// Which backing store serves notes, comments and rate limits
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum StoreConfig {
    /// Direct PostgreSQL connection (`DATABASE_URL`)
    Postgres(DatabaseConfig),
    /// Hosted PostgREST endpoint (`SUPABASE_URL` + `SUPABASE_ANON_KEY`)
    Rest(RestStoreConfig),
    /// No credentials; the server starts but every love-wall request fails
    Missing,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DatabaseConfig {
    pub url: String,
    pub max_connections: u32,
    pub min_connections: u32,
    pub acquire_timeout_secs: u64,
    pub idle_timeout_secs: u64,
    pub max_lifetime_secs: u64,
}

#[derive(Clone, PartialEq, Eq)]
pub struct RestStoreConfig {
    pub url: String,
    pub api_key: String,
    pub timeout_secs: u64,
}

// Keeps the key out of startup logs
impl std::fmt::Debug for RestStoreConfig {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("RestStoreConfig")
            .field("url", &self.url)
            .field("api_key", &"***")
            .field("timeout_secs", &self.timeout_secs)
            .finish()
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RateLimitsConfig {
    pub notes: RateLimitPolicy,
    pub comments: RateLimitPolicy,
}

#[derive(Debug, Clone)]
pub struct SwaggerConfig {
    pub username: Option<String>,
    pub password: Option<String>,
    pub title: String,
    pub version: String,
    pub description: String,
}

/// Look up an environment variable, treating blank values as unset
fn non_empty<F>(lookup: &F, key: &str) -> Option<String>
where
    F: Fn(&str) -> Option<String>,
{
    lookup(key)
        .map(|v| v.trim().to_string())
        .filter(|v| !v.is_empty())
}

fn parse_or<F, T>(lookup: &F, key: &str, default: T) -> Result<T, String>
where
    F: Fn(&str) -> Option<String>,
    T: std::str::FromStr,
{
    match non_empty(lookup, key) {
        Some(raw) => raw
            .parse::<T>()
            .map_err(|_| format!("{} must be a valid number", key)),
        None => Ok(default),
    }
}

fn env_lookup(key: &str) -> Option<String> {
    env::var(key).ok()
}

impl Config {
    pub fn from_env() -> Result<Self, String> {
        // Load .env file if exists, ignore if not found (optional for production)
        if let Err(e) = dotenvy::dotenv() {
            if !e.to_string().contains("not found") {
                eprintln!("Warning: Error loading .env file: {}", e);
            }
        }

        Ok(Config {
            app: AppConfig::from_lookup(&env_lookup)?,
            store: StoreConfig::from_lookup(&env_lookup)?,
            rate_limits: RateLimitsConfig::from_lookup(&env_lookup)?,
            swagger: SwaggerConfig::from_lookup(&env_lookup),
        })
    }
}

impl AppConfig {
    const DEFAULT_MAX_REQUEST_BODY_SIZE: usize = 64 * 1024; // 64KB

    pub fn from_lookup<F: Fn(&str) -> Option<String>>(lookup: &F) -> Result<Self, String> {
        let host = non_empty(lookup, "HOST").unwrap_or_else(|| "127.0.0.1".to_string());
        let port = non_empty(lookup, "PORT")
            .unwrap_or_else(|| "3000".to_string())
            .parse::<u16>()
            .map_err(|e| format!("Invalid PORT: {}", e))?;

        // Parse CORS allowed origins from comma-separated string
        let cors_allowed_origins = non_empty(lookup, "CORS_ALLOWED_ORIGINS")
            .unwrap_or_else(|| "*".to_string())
            .split(',')
            .map(|s| s.trim().to_string())
            .filter(|s| !s.is_empty())
            .collect();

        let max_request_body_size = parse_or(
            lookup,
            "MAX_REQUEST_BODY_SIZE",
            Self::DEFAULT_MAX_REQUEST_BODY_SIZE,
        )?;

        Ok(Self {
            host,
            port,
            cors_allowed_origins,
            max_request_body_size,
        })
    }

    pub fn server_address(&self) -> String {
        format!("{}:{}", self.host, self.port)
    }
}

impl StoreConfig {
    pub fn from_lookup<F: Fn(&str) -> Option<String>>(lookup: &F) -> Result<Self, String> {
        if let Some(url) = non_empty(lookup, "DATABASE_URL") {
            return Ok(StoreConfig::Postgres(DatabaseConfig::from_lookup(url, lookup)?));
        }

        match (
            non_empty(lookup, "SUPABASE_URL"),
            non_empty(lookup, "SUPABASE_ANON_KEY"),
        ) {
            (Some(url), Some(api_key)) => Ok(StoreConfig::Rest(RestStoreConfig {
                url,
                api_key,
                timeout_secs: parse_or(
                    lookup,
                    "STORE_TIMEOUT_SECS",
                    RestStoreConfig::DEFAULT_TIMEOUT_SECS,
                )?,
            })),
            _ => Ok(StoreConfig::Missing),
        }
    }

    pub fn backend_name(&self) -> &'static str {
        match self {
            StoreConfig::Postgres(_) => "postgres",
            StoreConfig::Rest(_) => "postgrest",
            StoreConfig::Missing => "none",
        }
    }
}

impl RestStoreConfig {
    const DEFAULT_TIMEOUT_SECS: u64 = 10;
}

impl DatabaseConfig {
    // Default values for database connection pool (conservative defaults for small-medium apps)
    const DEFAULT_MAX_CONNECTIONS: u32 = 10;
    const DEFAULT_MIN_CONNECTIONS: u32 = 1;
    const DEFAULT_ACQUIRE_TIMEOUT_SECS: u64 = 5;
    const DEFAULT_IDLE_TIMEOUT_SECS: u64 = 600; // 10 minutes
    const DEFAULT_MAX_LIFETIME_SECS: u64 = 1800; // 30 minutes

    fn from_lookup<F: Fn(&str) -> Option<String>>(url: String, lookup: &F) -> Result<Self, String> {
        Ok(Self {
            url,
            max_connections: parse_or(lookup, "DB_MAX_CONNECTIONS", Self::DEFAULT_MAX_CONNECTIONS)?,
            min_connections: parse_or(lookup, "DB_MIN_CONNECTIONS", Self::DEFAULT_MIN_CONNECTIONS)?,
            acquire_timeout_secs: parse_or(
                lookup,
                "DB_ACQUIRE_TIMEOUT_SECS",
                Self::DEFAULT_ACQUIRE_TIMEOUT_SECS,
            )?,
            idle_timeout_secs: parse_or(
                lookup,
                "DB_IDLE_TIMEOUT_SECS",
                Self::DEFAULT_IDLE_TIMEOUT_SECS,
            )?,
            max_lifetime_secs: parse_or(
                lookup,
                "DB_MAX_LIFETIME_SECS",
                Self::DEFAULT_MAX_LIFETIME_SECS,
            )?,
        })
    }
}

impl RateLimitsConfig {
    const DEFAULT_WINDOW_MS: i64 = 60_000;
    const DEFAULT_NOTES_MAX: i32 = 5;
    const DEFAULT_COMMENTS_MAX: i32 = 10;

    pub fn from_lookup<F: Fn(&str) -> Option<String>>(lookup: &F) -> Result<Self, String> {
        let notes = RateLimitPolicy::new(
            parse_or(lookup, "NOTES_RATE_LIMIT_WINDOW_MS", Self::DEFAULT_WINDOW_MS)?,
            parse_or(lookup, "NOTES_RATE_LIMIT_MAX", Self::DEFAULT_NOTES_MAX)?,
        );
        notes
            .validate()
            .map_err(|e| format!("Invalid notes rate limit: {}", e))?;

        let comments = RateLimitPolicy::new(
            parse_or(lookup, "COMMENTS_RATE_LIMIT_WINDOW_MS", Self::DEFAULT_WINDOW_MS)?,
            parse_or(lookup, "COMMENTS_RATE_LIMIT_MAX", Self::DEFAULT_COMMENTS_MAX)?,
        );
        comments
            .validate()
            .map_err(|e| format!("Invalid comments rate limit: {}", e))?;

        Ok(Self { notes, comments })
    }
}

impl SwaggerConfig {
    pub fn from_lookup<F: Fn(&str) -> Option<String>>(lookup: &F) -> Self {
        Self {
            username: non_empty(lookup, "SWAGGER_USERNAME"),
            password: non_empty(lookup, "SWAGGER_PASSWORD"),
            title: non_empty(lookup, "SWAGGER_TITLE").unwrap_or_else(|| "Love Wall API".to_string()),
            version: non_empty(lookup, "SWAGGER_VERSION").unwrap_or_else(|| "0.1.0".to_string()),
            description: non_empty(lookup, "SWAGGER_DESCRIPTION")
                .unwrap_or_else(|| "Notes and comments for the love wall".to_string()),
        }
    }

    /// Returns credentials in "username:password" format if auth is enabled
    pub fn credentials(&self) -> Option<String> {
        match (&self.username, &self.password) {
            (Some(user), Some(pass)) => Some(format!("{}:{}", user, pass)),
            _ => None,
        }
    }
}
