use std::path::PathBuf;
use std::sync::OnceLock;

use serde::Deserialize;

/// Source of the symmetric signing secret. Modeled as an injected dependency
/// rather than ambient global state so tests can substitute a fixed secret.
pub trait SecretProvider: Send + Sync {
    /// The current signing secret. Implementations never fail: a provider
    /// that cannot reach its backing store falls back to a configured
    /// last-resort secret, matching the availability-first posture of the
    /// rest of the engine.
    fn jwt_secret(&self) -> String;
}

/// Fixed secret, mainly for tests and local development.
pub struct StaticSecret(pub String);

impl SecretProvider for StaticSecret {
    fn jwt_secret(&self) -> String {
        self.0.clone()
    }
}

#[derive(Debug, Deserialize)]
struct SecretDocument {
    jwt_secret: String,
}

/// Secret read from a JSON document (`{"jwt_secret": "..."}`) on disk,
/// typically materialized there by a secret-store sidecar. The value is read
/// once and cached for the lifetime of the process - secrets are stable
/// relative to request volume.
pub struct FileSecret {
    path: Option<PathBuf>,
    fallback: String,
    cache: OnceLock<String>,
}

impl FileSecret {
    pub fn new(path: Option<PathBuf>, fallback: String) -> Self {
        Self {
            path,
            fallback,
            cache: OnceLock::new(),
        }
    }

    fn load(&self) -> String {
        let Some(path) = &self.path else {
            return self.fallback.clone();
        };
        match std::fs::read_to_string(path) {
            Ok(contents) => match serde_json::from_str::<SecretDocument>(&contents) {
                Ok(doc) => doc.jwt_secret,
                Err(err) => {
                    tracing::warn!(
                        path = %path.display(),
                        error = %err,
                        "Secret document is not valid JSON; using fallback secret"
                    );
                    self.fallback.clone()
                }
            },
            Err(err) => {
                tracing::warn!(
                    path = %path.display(),
                    error = %err,
                    "Failed to read secret document; using fallback secret"
                );
                self.fallback.clone()
            }
        }
    }
}

impl SecretProvider for FileSecret {
    fn jwt_secret(&self) -> String {
        self.cache.get_or_init(|| self.load()).clone()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::fs;
    use tempfile::TempDir;

    #[test]
    fn test_static_secret() {
        let provider = StaticSecret("s3cret".into());
        assert_eq!(provider.jwt_secret(), "s3cret");
    }

    #[test]
    fn test_file_secret_reads_document() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("secret.json");
        fs::write(&path, r#"{"jwt_secret": "from-file"}"#).unwrap();

        let provider = FileSecret::new(Some(path), "fallback".into());
        assert_eq!(provider.jwt_secret(), "from-file");
    }

    #[test]
    fn test_file_secret_missing_file_falls_back() {
        let provider = FileSecret::new(
            Some(PathBuf::from("/nonexistent/secret.json")),
            "fallback".into(),
        );
        assert_eq!(provider.jwt_secret(), "fallback");
    }

    #[test]
    fn test_file_secret_malformed_document_falls_back() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("secret.json");
        fs::write(&path, "not json").unwrap();

        let provider = FileSecret::new(Some(path), "fallback".into());
        assert_eq!(provider.jwt_secret(), "fallback");
    }

    #[test]
    fn test_file_secret_caches_first_read() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("secret.json");
        fs::write(&path, r#"{"jwt_secret": "first"}"#).unwrap();

        let provider = FileSecret::new(Some(path.clone()), "fallback".into());
        assert_eq!(provider.jwt_secret(), "first");

        // A later rewrite is not observed within the same process.
        fs::write(&path, r#"{"jwt_secret": "second"}"#).unwrap();
        assert_eq!(provider.jwt_secret(), "first");
    }

    #[test]
    fn test_no_path_uses_fallback() {
        let provider = FileSecret::new(None, "fallback".into());
        assert_eq!(provider.jwt_secret(), "fallback");
    }
}
