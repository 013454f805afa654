use std::path::PathBuf;

pub const DEFAULT_BIND_ADDRESS: &str = "127.0.0.1:8080";
pub const DEFAULT_EXPORT_TEMPLATE: &str = "templates/risalah.docx";
pub const DEFAULT_MAX_CONNECTIONS: u32 = 8;

/// Runtime settings, read from the environment (and `.env` when present).
#[derive(Debug, Clone, PartialEq)]
pub struct AppConfig {
    /// `None` runs on the in-memory store.
    pub database_url: Option<String>,
    pub bind_address: String,
    pub export_template: PathBuf,
    pub max_connections: u32,
}

impl AppConfig {
    pub fn from_env() -> Result<Self, String> {
        if let Err(e) = dotenvy::dotenv() {
            if !e.not_found() {
                log::warn!("Could not load .env: {e}");
            }
        }
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Build from an arbitrary variable source. Blank values count as unset.
    pub fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Result<Self, String> {
        let get = |key: &str| lookup(key).map(|v| v.trim().to_string()).filter(|v| !v.is_empty());

        let max_connections = match get("DB_MAX_CONNECTIONS") {
            Some(raw) => match raw.parse::<u32>() {
                Ok(n) if n > 0 => n,
                _ => return Err(format!("DB_MAX_CONNECTIONS must be a positive integer, got '{raw}'")),
            },
            None => DEFAULT_MAX_CONNECTIONS,
        };

        Ok(AppConfig {
            database_url: get("DATABASE_URL"),
            bind_address: get("BIND_ADDRESS").unwrap_or_else(|| DEFAULT_BIND_ADDRESS.to_string()),
            export_template: PathBuf::from(
                get("EXPORT_TEMPLATE").unwrap_or_else(|| DEFAULT_EXPORT_TEMPLATE.to_string()),
            ),
            max_connections,
        })
    }
}
