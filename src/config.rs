use serde::{Deserialize, Serialize};
use std::env;

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Config {
    pub server: ServerConfig,
    pub database: DatabaseConfig,
    #[serde(default)]
    pub email: EmailConfig,
    #[serde(default)]
    pub catalog: CatalogConfig,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ServerConfig {
    pub host: String,
    pub port: u16,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DatabaseConfig {
    pub url: String,
    pub max_connections: u32,
    #[serde(default = "default_connect_timeout")]
    pub connect_timeout_secs: u64,
    #[serde(default = "default_acquire_timeout")]
    pub acquire_timeout_secs: u64,
}

fn default_connect_timeout() -> u64 {
    10
}

fn default_acquire_timeout() -> u64 {
    10
}

#[derive(Debug, Clone, Serialize, Deserialize, Default)]
pub struct EmailConfig {
    pub api_key: String,
    #[serde(default)]
    pub from_name: String,
    #[serde(default)]
    pub from_email: String,
}

/// What the catalog reconciler does when a line item reuses an existing
/// reference with different display fields.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
#[serde(rename_all = "lowercase")]
pub enum CatalogPolicy {
    /// Overwrite the stored name/brand (last writer wins).
    #[default]
    Overwrite,
    /// Refuse the write and fail the whole call.
    Reject,
    /// Keep the stored row and link a versioned sibling instead.
    Version,
}

#[derive(Debug, Clone, Serialize, Deserialize, Default)]
pub struct CatalogConfig {
    #[serde(default)]
    pub policy: CatalogPolicy,
}

impl Config {
    pub fn from_toml() -> Result<Self, Box<dyn std::error::Error>> {
        let config_path = env::var("CONFIG_PATH").unwrap_or_else(|_| "config.toml".to_string());
        use std::io::ErrorKind;

        // Read the config file if present, otherwise build from env vars only
        let config_result = std::fs::read_to_string(&config_path);

        let mut config: Config = match config_result {
            Ok(config_str) => {
                toml::from_str(&config_str).map_err(|e| format!("Failed to parse config file: {e}"))?
            }
            Err(e) if e.kind() == ErrorKind::NotFound => {
                fn get_env(name: &str) -> Option<String> {
                    env::var(name).ok()
                }
                fn get_env_parse<T: std::str::FromStr>(name: &str, default: T) -> T {
                    env::var(name)
                        .ok()
                        .and_then(|v| v.parse::<T>().ok())
                        .unwrap_or(default)
                }

                // Without a config file the database URL has to come from the environment
                let database_url = get_env("DATABASE_URL")
                    .ok_or("DATABASE_URL is not set and no config.toml was found")?;

                Config {
                    server: ServerConfig {
                        host: get_env("SERVER_HOST").unwrap_or_else(|| "0.0.0.0".to_string()),
                        port: get_env_parse("SERVER_PORT", 8080u16),
                    },
                    database: DatabaseConfig {
                        url: database_url,
                        max_connections: get_env_parse("DB_MAX_CONNECTIONS", 10u32),
                        connect_timeout_secs: get_env_parse(
                            "DB_CONNECT_TIMEOUT_SECS",
                            default_connect_timeout(),
                        ),
                        acquire_timeout_secs: get_env_parse(
                            "DB_ACQUIRE_TIMEOUT_SECS",
                            default_acquire_timeout(),
                        ),
                    },
                    email: EmailConfig {
                        api_key: get_env("RESEND_API_KEY").unwrap_or_default(),
                        from_name: get_env("EMAIL_FROM_NAME")
                            .unwrap_or_else(|| "Atelier Parfum".to_string()),
                        from_email: get_env("EMAIL_FROM_ADDRESS").unwrap_or_default(),
                    },
                    catalog: CatalogConfig {
                        policy: parse_catalog_policy(get_env("CATALOG_POLICY").as_deref())
                            .unwrap_or_default(),
                    },
                }
            }
            Err(e) => {
                return Err(format!("Failed to read config file {config_path}: {e}").into());
            }
        };

        // Env vars override file values when both are present
        if let Ok(v) = env::var("SERVER_HOST") {
            config.server.host = v;
        }
        if let Ok(v) = env::var("SERVER_PORT")
            && let Ok(p) = v.parse()
        {
            config.server.port = p;
        }
        if let Ok(v) = env::var("DATABASE_URL") {
            config.database.url = v;
        }
        if let Ok(v) = env::var("DB_MAX_CONNECTIONS")
            && let Ok(mc) = v.parse()
        {
            config.database.max_connections = mc;
        }
        if let Ok(v) = env::var("DB_CONNECT_TIMEOUT_SECS")
            && let Ok(n) = v.parse()
        {
            config.database.connect_timeout_secs = n;
        }
        if let Ok(v) = env::var("DB_ACQUIRE_TIMEOUT_SECS")
            && let Ok(n) = v.parse()
        {
            config.database.acquire_timeout_secs = n;
        }
        if let Ok(v) = env::var("RESEND_API_KEY") {
            config.email.api_key = v;
        }
        if let Ok(v) = env::var("EMAIL_FROM_NAME") {
            config.email.from_name = v;
        }
        if let Ok(v) = env::var("EMAIL_FROM_ADDRESS") {
            config.email.from_email = v;
        }
        if let Ok(v) = env::var("CATALOG_POLICY")
            && let Some(p) = parse_catalog_policy(Some(&v))
        {
            config.catalog.policy = p;
        }

        Ok(config)
    }
}

fn parse_catalog_policy(value: Option<&str>) -> Option<CatalogPolicy> {
    match value {
        Some("overwrite") => Some(CatalogPolicy::Overwrite),
        Some("reject") => Some(CatalogPolicy::Reject),
        Some("version") => Some(CatalogPolicy::Version),
        _ => None,
    }
}
