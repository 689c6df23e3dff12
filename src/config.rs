use std::env;
use std::net::SocketAddr;

use crate::error::AppError;
use crate::genai::{DEFAULT_BASE_URL, DEFAULT_MODEL, GenaiConfig};

pub const DEFAULT_BIND_ADDR: &str = "127.0.0.1:3000";

/// Settings read from the environment (and `.env`, loaded by the binary).
///
/// Missing optional settings do not stop the server: the features that need
/// them answer with a configuration error instead.
#[derive(Clone, Debug)]
pub struct AppConfig {
    pub database_url: Option<String>,
    pub bind_addr: SocketAddr,
    pub admin_emails: Vec<String>,
    pub genai: Option<GenaiConfig>,
}

impl AppConfig {
    pub fn new_from_env() -> Result<Self, AppError> {
        Self::from_lookup(|key| env::var(key).ok())
    }

    pub fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Result<Self, AppError> {
        let get = |key: &str| lookup(key).map(|v| v.trim().to_string()).filter(|v| !v.is_empty());

        let bind_addr = get("BIND_ADDR")
            .unwrap_or_else(|| DEFAULT_BIND_ADDR.to_string())
            .parse::<SocketAddr>()
            .map_err(|e| AppError::NotConfigured(format!("BIND_ADDR is invalid: {}", e)))?;

        let admin_emails = get("ADMIN_EMAILS")
            .map(|list| {
                list.split(',')
                    .map(|e| e.trim().to_string())
                    .filter(|e| !e.is_empty())
                    .collect()
            })
            .unwrap_or_default();

        let genai = get("GEMINI_API_KEY").map(|api_key| GenaiConfig {
            api_key,
            model: get("GEMINI_MODEL").unwrap_or_else(|| DEFAULT_MODEL.to_string()),
            base_url: get("GEMINI_BASE_URL").unwrap_or_else(|| DEFAULT_BASE_URL.to_string()),
        });

        Ok(Self {
            database_url: get("DATABASE_URL"),
            bind_addr,
            admin_emails,
            genai,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;

    fn config(pairs: &[(&str, &str)]) -> Result<AppConfig, AppError> {
        let vars: HashMap<String, String> = pairs
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect();
        AppConfig::from_lookup(|key| vars.get(key).cloned())
    }

    #[test]
    fn defaults_when_nothing_is_set() {
        let cfg = config(&[]).unwrap();
        assert!(cfg.database_url.is_none());
        assert!(cfg.genai.is_none());
        assert!(cfg.admin_emails.is_empty());
        assert_eq!(cfg.bind_addr.to_string(), DEFAULT_BIND_ADDR);
    }

    #[test]
    fn reads_every_setting() {
        let cfg = config(&[
            ("DATABASE_URL", "sqlite://syllabus.db"),
            ("BIND_ADDR", "0.0.0.0:8080"),
            ("ADMIN_EMAILS", "a@x.com, b@x.com,"),
            ("GEMINI_API_KEY", "key"),
            ("GEMINI_MODEL", "gemini-pro"),
        ])
        .unwrap();
        assert_eq!(cfg.database_url.as_deref(), Some("sqlite://syllabus.db"));
        assert_eq!(cfg.bind_addr.port(), 8080);
        assert_eq!(cfg.admin_emails, vec!["a@x.com", "b@x.com"]);
        let genai = cfg.genai.unwrap();
        assert_eq!(genai.model, "gemini-pro");
        assert_eq!(genai.base_url, DEFAULT_BASE_URL);
    }

    #[test]
    fn blank_values_count_as_unset() {
        let cfg = config(&[("DATABASE_URL", "  "), ("GEMINI_API_KEY", "")]).unwrap();
        assert!(cfg.database_url.is_none());
        assert!(cfg.genai.is_none());
    }

    #[test]
    fn bad_bind_addr_is_a_config_error() {
        assert!(matches!(config(&[("BIND_ADDR", "nope")]), Err(AppError::NotConfigured(_))));
    }
}
