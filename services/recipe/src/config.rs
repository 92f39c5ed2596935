use std::path::PathBuf;

use recipe_auth_types::token::DEFAULT_TOKEN_TTL_SECS;

/// Recipe service configuration loaded from environment variables.
#[derive(Debug)]
pub struct RecipeConfig {
    /// PostgreSQL connection URL.
    pub database_url: String,
    /// HMAC secret for signing bearer tokens.
    pub jwt_secret: String,
    /// TCP port for the HTTP server (default 8000). Env var: `RECIPE_PORT`.
    pub recipe_port: u16,
    /// Directory uploaded files are written to (default `media`). Env var: `MEDIA_ROOT`.
    pub media_root: PathBuf,
    /// Bearer token lifetime in seconds (default 7 days). Env var: `TOKEN_TTL_SECS`.
    pub token_ttl_secs: u64,
}

impl RecipeConfig {
    pub fn from_env() -> Self {
        Self {
            database_url: std::env::var("DATABASE_URL").expect("DATABASE_URL"),
            jwt_secret: std::env::var("JWT_SECRET").expect("JWT_SECRET"),
            recipe_port: std::env::var("RECIPE_PORT")
                .ok()
                .and_then(|v| v.parse().ok())
                .unwrap_or(8000),
            media_root: std::env::var("MEDIA_ROOT")
                .map(PathBuf::from)
                .unwrap_or_else(|_| PathBuf::from("media")),
            token_ttl_secs: std::env::var("TOKEN_TTL_SECS")
                .ok()
                .and_then(|v| v.parse().ok())
                .unwrap_or(DEFAULT_TOKEN_TTL_SECS),
        }
    }
}
