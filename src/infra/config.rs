use serde::{Deserialize, Serialize};

use crate::application::dto::session::SessionTtls;

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DatabaseConfig {
    pub url: String,
    pub max_connections: u32,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LoggerConfig {
    pub log_path: String,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ApplicationConfig {
    pub allow_origins: Vec<String>,
    pub address: String,
}

/// Lifetimes are in seconds.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SessionConfig {
    pub access_ttl: i64,
    pub refresh_ttl: i64,
    pub access_cookie_name: String,
    pub refresh_cookie_name: String,
    pub cookie_secure: bool,
    pub cookie_http_only: bool,
}

impl SessionConfig {
    pub fn ttls(&self) -> SessionTtls {
        SessionTtls {
            access_ttl: self.access_ttl,
            refresh_ttl: self.refresh_ttl,
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AuthConfig {
    /// When set, new identities stay unconfirmed and sign-up does not sign in.
    pub require_email_confirmation: bool,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct EventsConfig {
    pub capacity: usize,
    /// Seconds between sweeps of expired sessions out of the session store.
    pub sweep_interval: u64,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AppConfig {
    pub db: DatabaseConfig,
    pub logger: LoggerConfig,
    pub application: ApplicationConfig,
    pub session: SessionConfig,
    pub auth: AuthConfig,
    pub events: EventsConfig,
}

impl AppConfig {
    pub fn from_file<P: AsRef<std::path::Path>>(path: P) -> anyhow::Result<AppConfig> {
        let contents = std::fs::read_to_string(path)?;
        let config = toml::from_str(&contents)?;
        Ok(config)
    }
}

#[cfg(test)]
mod tests {
    use crate::infra::config::AppConfig;

    #[test]
    fn test_base_config_parses() {
        let config: AppConfig = toml::from_str(include_str!("../../config/base.toml")).expect("parse base config");

        assert_eq!(config.session.access_cookie_name, "access_token");
        assert_eq!(config.session.refresh_cookie_name, "refresh_token");
        assert!(config.session.access_ttl < config.session.refresh_ttl);
        assert!(!config.auth.require_email_confirmation);
        assert!(config.events.capacity > 0);
        assert!(config.events.sweep_interval > 0);
    }

    #[test]
    fn test_ttls_follow_session_section() {
        let config: AppConfig = toml::from_str(include_str!("../../config/base.toml")).unwrap();
        let ttls = config.session.ttls();

        assert_eq!(ttls.access_ttl, config.session.access_ttl);
        assert_eq!(ttls.refresh_ttl, config.session.refresh_ttl);
    }
}
