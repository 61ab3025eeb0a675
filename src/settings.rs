use miette::{IntoDiagnostic, Result};
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};

#[derive(Debug, Clone, Serialize, Deserialize, Default)]
pub struct Settings {
    #[serde(default)]
    pub server: Server,
    #[serde(default)]
    pub auth: Auth,
    #[serde(default)]
    pub identity: Identity,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Server {
    pub host: String,
    pub port: u16,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Auth {
    /// Path to a JSON secret document of the form `{"jwt_secret": "..."}`.
    /// If the file is missing or unreadable, `fallback_secret` is used.
    pub secret_path: Option<PathBuf>,
    /// Last-resort signing secret when no secret file is available.
    #[serde(default = "default_fallback_secret")]
    pub fallback_secret: String,
    /// Lifetime of issued tokens, in seconds.
    #[serde(default = "default_token_ttl_secs")]
    pub token_ttl_secs: u64,
    /// Route table as an inline JSON blob. Takes precedence over `route_table_path`.
    /// An unparsable table degrades to "no restriction" (fail-open) - see authz docs.
    pub route_table: Option<String>,
    /// Path to a JSON file holding the route table.
    pub route_table_path: Option<PathBuf>,
}

fn default_fallback_secret() -> String {
    "fallback-secret".to_string()
}

fn default_token_ttl_secs() -> u64 {
    3600
}

#[derive(Debug, Clone, Serialize, Deserialize, Default)]
pub struct Identity {
    /// Base URL of the profile service used by the login flow,
    /// e.g., http://internal-lb.example.com
    pub base_url: Option<String>,
}

impl Default for Server {
    fn default() -> Self {
        Self {
            host: "0.0.0.0".to_string(),
            port: 8080,
        }
    }
}

impl Default for Auth {
    fn default() -> Self {
        Self {
            secret_path: None,
            fallback_secret: default_fallback_secret(),
            token_ttl_secs: default_token_ttl_secs(),
            route_table: None,
            route_table_path: None,
        }
    }
}

impl Settings {
    pub fn load(path: &str) -> Result<Self> {
        let mut builder = config::Config::builder()
            .set_default("server.host", Server::default().host)
            .into_diagnostic()?
            .set_default("server.port", Server::default().port)
            .into_diagnostic()?
            .set_default("auth.fallback_secret", default_fallback_secret())
            .into_diagnostic()?
            .set_default("auth.token_ttl_secs", default_token_ttl_secs())
            .into_diagnostic()?;

        // Optional file
        if Path::new(path).exists() {
            builder = builder.add_source(config::File::with_name(path));
        }

        // Environment overrides: PORTCULLIS__SERVER__PORT=9090, etc.
        builder =
            builder.add_source(config::Environment::with_prefix("PORTCULLIS").separator("__"));

        let cfg = builder.build().into_diagnostic()?;
        let s: Settings = cfg.try_deserialize().into_diagnostic()?;
        Ok(s)
    }

    /// The raw route-table JSON from configuration: the inline blob wins,
    /// otherwise the file at `route_table_path` is read. `None` means no
    /// table was configured at all.
    pub fn route_table_source(&self) -> Option<String> {
        if let Some(blob) = &self.auth.route_table {
            return Some(blob.clone());
        }
        if let Some(path) = &self.auth.route_table_path {
            match std::fs::read_to_string(path) {
                Ok(contents) => return Some(contents),
                Err(err) => {
                    tracing::warn!(
                        path = %path.display(),
                        error = %err,
                        "Failed to read route table file; continuing without restrictions"
                    );
                    return None;
                }
            }
        }
        None
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::fs;
    use tempfile::TempDir;

    #[test]
    fn test_settings_load_defaults() {
        let temp_dir = TempDir::new().expect("Failed to create temp dir");
        let config_path = temp_dir.path().join("nonexistent.toml");

        let settings =
            Settings::load(config_path.to_str().unwrap()).expect("Failed to load settings");

        assert_eq!(settings.server.host, "0.0.0.0");
        assert_eq!(settings.server.port, 8080);
        assert_eq!(settings.auth.fallback_secret, "fallback-secret");
        assert_eq!(settings.auth.token_ttl_secs, 3600);
        assert!(settings.auth.route_table.is_none());
    }

    #[test]
    fn test_settings_load_from_file() {
        let temp_dir = TempDir::new().expect("Failed to create temp dir");
        let config_path = temp_dir.path().join("test_config.toml");

        let config_content = r#"
[server]
host = "127.0.0.1"
port = 9090

[auth]
fallback_secret = "test-secret"
token_ttl_secs = 600
route_table = '{"GET:/v1/customers/*": "employee"}'

[identity]
base_url = "http://profiles.internal"
"#;
        fs::write(&config_path, config_content).expect("Failed to write config");

        let settings =
            Settings::load(config_path.to_str().unwrap()).expect("Failed to load settings");

        assert_eq!(settings.server.host, "127.0.0.1");
        assert_eq!(settings.server.port, 9090);
        assert_eq!(settings.auth.fallback_secret, "test-secret");
        assert_eq!(settings.auth.token_ttl_secs, 600);
        assert_eq!(
            settings.identity.base_url,
            Some("http://profiles.internal".to_string())
        );
        assert!(settings
            .route_table_source()
            .unwrap()
            .contains("GET:/v1/customers/*"));
    }

    #[test]
    fn test_route_table_from_file_path() {
        let temp_dir = TempDir::new().expect("Failed to create temp dir");
        let table_path = temp_dir.path().join("routes.json");
        fs::write(&table_path, r#"{"DELETE:/v1/orders/*": "employee"}"#)
            .expect("Failed to write table");

        let mut settings = Settings::default();
        settings.auth.route_table_path = Some(table_path);

        let source = settings.route_table_source().unwrap();
        assert!(source.contains("DELETE:/v1/orders/*"));
    }

    #[test]
    fn test_inline_route_table_wins_over_path() {
        let mut settings = Settings::default();
        settings.auth.route_table = Some("{}".to_string());
        settings.auth.route_table_path = Some(PathBuf::from("/nonexistent/routes.json"));

        assert_eq!(settings.route_table_source(), Some("{}".to_string()));
    }

    #[test]
    fn test_missing_route_table_file_degrades_to_none() {
        let mut settings = Settings::default();
        settings.auth.route_table_path = Some(PathBuf::from("/nonexistent/routes.json"));

        assert!(settings.route_table_source().is_none());
    }
}
