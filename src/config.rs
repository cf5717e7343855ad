//! Runtime configuration for the payroll engine server.

use std::env;

/// Server configuration resolved from the environment.
#[derive(Debug, Clone)]
pub struct AppConfig {
    /// Socket address the HTTP server binds to.
    pub bind_addr: String,
    /// Username for the identity seeded at startup.
    pub seed_admin_username: String,
}

impl AppConfig {
    /// Loads configuration from the environment, with a `.env` file as an
    /// optional source. Missing variables fall back to defaults.
    pub fn from_env() -> Self {
        dotenvy::dotenv().ok();
        Self {
            bind_addr: env::var("BIND_ADDR").unwrap_or_else(|_| "0.0.0.0:8080".to_string()),
            seed_admin_username: env::var("SEED_ADMIN_USERNAME")
                .unwrap_or_else(|_| "admin".to_string()),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults_apply_when_unset() {
        // Only assert the fallback shape; the environment may override it.
        let config = AppConfig::from_env();
        assert!(config.bind_addr.contains(':'));
        assert!(!config.seed_admin_username.is_empty());
    }
}
