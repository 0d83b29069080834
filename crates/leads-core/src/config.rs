//! Store configuration read once from the process environment

use serde::{Deserialize, Serialize};

use crate::error::{LeadError, Result};

pub const ENV_STORE_URL: &str = "SUPABASE_URL";
pub const ENV_STORE_KEY: &str = "SUPABASE_KEY";

/// Endpoint and credential for the hosted relational store
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct StoreConfig {
    pub base_url: String,
    pub api_key: String,
}

impl StoreConfig {
    /// Validate the configuration
    pub fn validate(&self) -> Result<()> {
        if self.base_url.is_empty() {
            return Err(LeadError::Validation("store base URL is required".to_string()));
        }
        if !self.base_url.starts_with("http://") && !self.base_url.starts_with("https://") {
            return Err(LeadError::Validation(format!(
                "store base URL must be an http(s) endpoint: {}",
                self.base_url
            )));
        }
        if self.api_key.is_empty() {
            return Err(LeadError::Validation("store API key is required".to_string()));
        }
        Ok(())
    }
}

/// Configuration snapshot taken once at process start
#[derive(Debug, Clone, Default)]
pub struct LeadsConfig {
    /// `None` leaves the store handle in its degraded, disconnected state
    pub supabase: Option<StoreConfig>,
}

impl LeadsConfig {
    /// Read configuration from the environment, honoring a local `.env`.
    ///
    /// A missing or invalid endpoint/credential pair does not abort startup;
    /// it degrades the store to the disconnected state in which every
    /// operation fails fast with `NotConnected`.
    pub fn from_env() -> Self {
        let _ = dotenvy::dotenv();

        let base_url = std::env::var(ENV_STORE_URL).unwrap_or_default();
        let api_key = std::env::var(ENV_STORE_KEY).unwrap_or_default();

        if base_url.is_empty() || api_key.is_empty() {
            log::warn!(
                "lead store not configured, set {} and {}",
                ENV_STORE_URL,
                ENV_STORE_KEY
            );
            return Self { supabase: None };
        }

        let config = StoreConfig { base_url, api_key };
        match config.validate() {
            Ok(()) => Self { supabase: Some(config) },
            Err(e) => {
                log::warn!("ignoring lead store configuration: {}", e);
                Self { supabase: None }
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_validate_accepts_https_endpoint() {
        let config = StoreConfig {
            base_url: "https://example.supabase.co".to_string(),
            api_key: "service-role-key".to_string(),
        };
        assert!(config.validate().is_ok());
    }

    #[test]
    fn test_validate_rejects_empty_fields() {
        let config = StoreConfig {
            base_url: String::new(),
            api_key: "key".to_string(),
        };
        assert!(config.validate().is_err());

        let config = StoreConfig {
            base_url: "https://example.supabase.co".to_string(),
            api_key: String::new(),
        };
        assert!(config.validate().is_err());
    }

    #[test]
    fn test_validate_rejects_non_http_endpoint() {
        let config = StoreConfig {
            base_url: "postgres://example".to_string(),
            api_key: "key".to_string(),
        };
        let err = config.validate().unwrap_err();
        assert!(err.to_string().contains("http"));
    }
}
