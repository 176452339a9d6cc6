//! Application configuration management.
//!
//! All values come from environment variables. Sensitive fields are
//! clearly marked and must never be logged.

use envconfig::Envconfig;
use std::sync::LazyLock;

#[derive(Envconfig, Clone)]
pub struct AppConfig {
    /// Environment name the forms run against (NON-SENSITIVE)
    /// Values: "local", "dev", "staging", "prod"
    #[envconfig(default = "local")]
    pub env: String,

    /// Base URL of the wallet backend (NON-SENSITIVE)
    /// Example: "https://api.serdipay.com"
    pub backend_base_url: String,

    /// 🔒 SENSITIVE: bearer token sent on every backend call
    pub backend_auth_token: String,

    /// Per-request timeout for backend calls, in seconds (NON-SENSITIVE)
    #[envconfig(default = "30")]
    pub request_timeout_secs: u64,
}

impl AppConfig {
    /// Checks if running in production environment
    pub fn is_prod(&self) -> bool {
        self.env.to_lowercase() == "prod"
    }

    /// Full URL for a backend path like "api/currency/convert"
    pub fn backend_endpoint(&self, path: &str) -> String {
        format!(
            "{base}/{path}",
            base = self.backend_base_url.trim_end_matches('/'),
            path = path.trim_start_matches('/')
        )
    }
}

/// Global application configuration instance, validated on first access.
pub static APP_CONFIG: LazyLock<AppConfig> = LazyLock::new(|| {
    AppConfig::init_from_env()
        .expect("Failed to load application configuration. Check environment variables.")
});

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_backend_endpoint_joins_slashes() {
        let config = AppConfig {
            env: "local".into(),
            backend_base_url: "https://api.serdipay.com/".into(),
            backend_auth_token: "token".into(),
            request_timeout_secs: 30,
        };

        assert_eq!(
            config.backend_endpoint("/api/currency/convert"),
            "https://api.serdipay.com/api/currency/convert"
        );
        assert!(!config.is_prod());
    }
}
