use crate::error::{AppError, Result};
use std::env;

#[derive(Debug, Clone)]
pub struct AppConfig {
    pub server: ServerConfig,
    pub database: DatabaseConfig,
    pub cors: CorsConfig,
    pub identity: IdentityConfig,
    pub marketplace: MarketplaceConfig,
}

#[derive(Debug, Clone)]
pub struct ServerConfig {
    pub host: String,
    pub port: u16,
    pub max_body_size: usize,
}

#[derive(Debug, Clone)]
pub struct DatabaseConfig {
    pub url: String,
    pub max_connections: u32,
}

#[derive(Debug, Clone)]
pub struct CorsConfig {
    pub allowed_origins: Vec<String>,
}

/// Settings for verifying tokens minted by the external identity provider.
#[derive(Debug, Clone)]
pub struct IdentityConfig {
    pub jwt_secret: String,
    pub issuer: Option<String>,
    pub audience: Option<String>,
}

#[derive(Debug, Clone)]
pub struct MarketplaceConfig {
    /// Refuse product approval while the owning store is still pending.
    pub require_active_store: bool,
    pub pickup_points: Vec<String>,
}

impl Default for MarketplaceConfig {
    fn default() -> Self {
        Self {
            require_active_store: true,
            pickup_points: vec!["Main Campus Gate".to_string()],
        }
    }
}

impl AppConfig {
    pub fn from_env() -> Result<Self> {
        Ok(Self {
            server: ServerConfig {
                host: env::var("HOST").unwrap_or_else(|_| "0.0.0.0".to_string()),
                port: env::var("PORT")
                    .unwrap_or_else(|_| "3000".to_string())
                    .parse()
                    .map_err(|_| AppError::ConfigError("Invalid PORT value".to_string()))?,
                max_body_size: env::var("MAX_BODY_SIZE")
                    .unwrap_or_else(|_| "1048576".to_string())
                    .parse()
                    .map_err(|_| AppError::ConfigError("Invalid MAX_BODY_SIZE value".to_string()))?,
            },
            database: DatabaseConfig {
                url: env::var("DB_URL")?,
                max_connections: env::var("DB_MAX_CONNECTIONS")
                    .unwrap_or_else(|_| "20".to_string())
                    .parse()
                    .map_err(|_| {
                        AppError::ConfigError("Invalid DB_MAX_CONNECTIONS value".to_string())
                    })?,
            },
            cors: CorsConfig {
                allowed_origins: split_list(&env::var("FRONTEND_URL")?),
            },
            identity: IdentityConfig {
                jwt_secret: env::var("IDENTITY_JWT_SECRET").map_err(|_| {
                    AppError::ConfigError("IDENTITY_JWT_SECRET not set".to_string())
                })?,
                issuer: optional_var("IDENTITY_ISSUER"),
                audience: optional_var("IDENTITY_AUDIENCE"),
            },
            marketplace: MarketplaceConfig {
                require_active_store: parse_bool(
                    "MODERATION_REQUIRE_ACTIVE_STORE",
                    env::var("MODERATION_REQUIRE_ACTIVE_STORE").ok().as_deref(),
                    true,
                )?,
                pickup_points: match optional_var("PICKUP_POINTS") {
                    Some(raw) => {
                        let points = split_list(&raw);
                        if points.is_empty() {
                            return Err(AppError::ConfigError(
                                "PICKUP_POINTS must name at least one location".to_string(),
                            ));
                        }
                        points
                    }
                    None => MarketplaceConfig::default().pickup_points,
                },
            },
        })
    }

    pub fn server_address(&self) -> String {
        format!("{}:{}", self.server.host, self.server.port)
    }
}

fn optional_var(name: &str) -> Option<String> {
    env::var(name)
        .ok()
        .map(|v| v.trim().to_string())
        .filter(|v| !v.is_empty())
}

fn split_list(raw: &str) -> Vec<String> {
    raw.split(',')
        .map(|s| s.trim().to_string())
        .filter(|s| !s.is_empty())
        .collect()
}

fn parse_bool(name: &str, raw: Option<&str>, default: bool) -> Result<bool> {
    match raw.map(str::trim) {
        None | Some("") => Ok(default),
        Some(v) if v.eq_ignore_ascii_case("true") || v == "1" => Ok(true),
        Some(v) if v.eq_ignore_ascii_case("false") || v == "0" => Ok(false),
        Some(_) => Err(AppError::ConfigError(format!("Invalid {} value", name))),
    }
}
