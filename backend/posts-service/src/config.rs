/// Configuration management for Posts Service
///
/// Loaded from environment variables (optionally seeded from a `.env` file by
/// `main`). Database pool tuning lives in `db_pool::DbConfig`.
use db_pool::{parse_env_flag, parse_env_with_default};
use serde::{Deserialize, Serialize};

const MIN_PRODUCTION_SECRET_LEN: usize = 32;

/// Main application configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Config {
    /// Application settings
    pub app: AppConfig,
    /// CORS configuration
    pub cors: CorsConfig,
    /// Bearer token validation
    pub auth: AuthConfig,
    /// Post listing behaviour
    pub posts: PostsConfig,
}

/// Application settings
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AppConfig {
    /// Application environment (development, staging, production)
    pub env: String,
    /// Server host to bind to
    pub host: String,
    /// Server port to bind to
    pub port: u16,
    /// Number of actix-web workers
    pub workers: usize,
    /// Apply embedded migrations at startup
    pub run_migrations: bool,
    /// Emit JSON log lines instead of the human-readable format
    pub json_logs: bool,
}

/// CORS configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CorsConfig {
    /// Comma-separated list of allowed origins
    pub allowed_origins: String,
}

#[derive(Clone, Serialize, Deserialize)]
pub struct AuthConfig {
    /// HS256 secret shared with the auth service
    #[serde(skip_serializing)]
    pub jwt_secret: String,
}

impl std::fmt::Debug for AuthConfig {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("AuthConfig")
            .field("jwt_secret", &"[REDACTED]")
            .finish()
    }
}

/// Post listing configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PostsConfig {
    /// Only list posts with `published = true`
    pub list_published_only: bool,
    /// Page size when the caller omits `limit`
    pub default_limit: i64,
    /// Larger `limit` values are clamped to this; unset means no cap
    pub max_limit: Option<i64>,
}

impl Default for PostsConfig {
    fn default() -> Self {
        Self {
            list_published_only: false,
            default_limit: 10,
            max_limit: None,
        }
    }
}

impl Config {
    /// Load configuration from environment variables
    pub fn from_env() -> Result<Self, String> {
        let app_env = std::env::var("APP_ENV").unwrap_or_else(|_| "development".to_string());
        let production = app_env.eq_ignore_ascii_case("production");

        let cors = {
            let allowed_origins = match std::env::var("CORS_ALLOWED_ORIGINS") {
                Ok(value) => value,
                Err(_) if production => {
                    return Err("CORS_ALLOWED_ORIGINS must be set in production".to_string())
                }
                Err(_) => "http://localhost:3000".to_string(),
            };

            if production && allowed_origins.trim() == "*" {
                return Err("CORS_ALLOWED_ORIGINS cannot be '*' in production".to_string());
            }

            CorsConfig { allowed_origins }
        };

        let auth = {
            let jwt_secret = std::env::var("JWT_SECRET")
                .map_err(|_| "JWT_SECRET environment variable not set".to_string())?;
            if jwt_secret.trim().is_empty() {
                return Err("JWT_SECRET must not be empty".to_string());
            }
            if production && jwt_secret.len() < MIN_PRODUCTION_SECRET_LEN {
                return Err(format!(
                    "JWT_SECRET must be at least {} bytes in production",
                    MIN_PRODUCTION_SECRET_LEN
                ));
            }
            AuthConfig { jwt_secret }
        };

        let posts = {
            let defaults = PostsConfig::default();
            let max_limit = match std::env::var("POSTS_MAX_LIMIT") {
                Ok(raw) => {
                    let value: i64 = raw
                        .trim()
                        .parse()
                        .map_err(|_| format!("POSTS_MAX_LIMIT must be an integer, got {:?}", raw))?;
                    if value < 1 {
                        return Err(format!("POSTS_MAX_LIMIT must be positive, got {}", value));
                    }
                    Some(value)
                }
                Err(_) => defaults.max_limit,
            };
            let default_limit = parse_env_with_default("POSTS_DEFAULT_LIMIT", defaults.default_limit);

            if default_limit < 0 {
                return Err(format!(
                    "POSTS_DEFAULT_LIMIT must not be negative, got {}",
                    default_limit
                ));
            }
            if let Some(max) = max_limit.filter(|max| default_limit > *max) {
                return Err(format!(
                    "POSTS_DEFAULT_LIMIT must be between 0 and {}, got {}",
                    max, default_limit
                ));
            }

            PostsConfig {
                list_published_only: parse_env_flag(
                    "POSTS_LIST_PUBLISHED_ONLY",
                    defaults.list_published_only,
                ),
                default_limit,
                max_limit,
            }
        };

        Ok(Config {
            app: AppConfig {
                env: app_env,
                host: std::env::var("POSTS_SERVICE_HOST")
                    .unwrap_or_else(|_| "0.0.0.0".to_string()),
                port: parse_env_with_default("POSTS_SERVICE_PORT", 8000),
                workers: parse_env_with_default("HTTP_WORKERS", 4),
                run_migrations: parse_env_flag("RUN_MIGRATIONS", true),
                json_logs: std::env::var("LOG_FORMAT")
                    .map(|v| v.eq_ignore_ascii_case("json"))
                    .unwrap_or(false),
            },
            cors,
            auth,
            posts,
        })
    }

    pub fn bind_address(&self) -> String {
        format!("{}:{}", self.app.host, self.app.port)
    }
}
