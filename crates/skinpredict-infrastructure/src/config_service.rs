//! Configuration service implementation.
//!
//! Loads `SkinPredictConfig` from `config.toml` and applies environment
//! overrides. A missing file is not an error; a malformed one is logged and
//! replaced by defaults.

use std::path::{Path, PathBuf};
use std::sync::{Arc, PoisonError, RwLock};

use skinpredict_core::config::SkinPredictConfig;

/// Overrides `api_base_url`.
pub const ENV_API_URL: &str = "SKINPREDICT_API_URL";
/// Overrides `use_groq` (`1`/`true`/`yes`).
pub const ENV_USE_GROQ: &str = "SKINPREDICT_USE_GROQ";

type EnvLookup = Arc<dyn Fn(&str) -> Option<String> + Send + Sync>;

/// Configuration service that loads and caches the application config.
#[derive(Clone)]
pub struct ConfigService {
    path: PathBuf,
    /// Cached configuration loaded from file.
    config: Arc<RwLock<Option<SkinPredictConfig>>>,
    env: EnvLookup,
}

impl std::fmt::Debug for ConfigService {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ConfigService")
            .field("path", &self.path)
            .finish_non_exhaustive()
    }
}

impl ConfigService {
    /// Creates a service reading `path`; the file is read lazily.
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self {
            path: path.into(),
            config: Arc::new(RwLock::new(None)),
            env: Arc::new(|key| std::env::var(key).ok()),
        }
    }

    /// Replaces the environment lookup; tests use this instead of `set_var`.
    pub fn with_env<F>(mut self, lookup: F) -> Self
    where
        F: Fn(&str) -> Option<String> + Send + Sync + 'static,
    {
        self.env = Arc::new(lookup);
        self
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Gets the configuration, loading from file if not cached.
    pub fn get_config(&self) -> SkinPredictConfig {
        {
            let read_lock = self.config.read().unwrap_or_else(PoisonError::into_inner);
            if let Some(ref cached) = *read_lock {
                return cached.clone();
            }
        }

        let mut loaded = Self::load_file(&self.path);
        self.apply_env(&mut loaded);

        let mut write_lock = self.config.write().unwrap_or_else(PoisonError::into_inner);
        *write_lock = Some(loaded.clone());
        loaded
    }

    /// Invalidates the cache, forcing a reload on next access.
    pub fn invalidate_cache(&self) {
        let mut write_lock = self.config.write().unwrap_or_else(PoisonError::into_inner);
        *write_lock = None;
    }

    fn load_file(path: &Path) -> SkinPredictConfig {
        let content = match std::fs::read_to_string(path) {
            Ok(content) => content,
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => {
                tracing::debug!("[ConfigService] {} not found, using defaults", path.display());
                return SkinPredictConfig::default();
            }
            Err(e) => {
                tracing::warn!("[ConfigService] Failed to read {}: {}", path.display(), e);
                return SkinPredictConfig::default();
            }
        };

        match toml::from_str(&content) {
            Ok(config) => config,
            Err(e) => {
                tracing::warn!(
                    "[ConfigService] Malformed config at {}, using defaults: {}",
                    path.display(),
                    e
                );
                SkinPredictConfig::default()
            }
        }
    }

    fn apply_env(&self, config: &mut SkinPredictConfig) {
        if let Some(url) = (self.env)(ENV_API_URL).filter(|v| !v.trim().is_empty()) {
            tracing::debug!("[ConfigService] {} overrides api_base_url", ENV_API_URL);
            config.api_base_url = url.trim().to_string();
        }
        if let Some(flag) = (self.env)(ENV_USE_GROQ) {
            config.use_groq = matches!(
                flag.trim().to_ascii_lowercase().as_str(),
                "1" | "true" | "yes"
            );
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    fn no_env(_: &str) -> Option<String> {
        None
    }

    #[test]
    fn test_missing_file_yields_defaults() {
        let dir = TempDir::new().unwrap();
        let service = ConfigService::new(dir.path().join("config.toml")).with_env(no_env);
        assert_eq!(service.get_config(), SkinPredictConfig::default());
    }

    #[test]
    fn test_malformed_file_yields_defaults() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("config.toml");
        std::fs::write(&path, "api_base_url = [").unwrap();

        let service = ConfigService::new(&path).with_env(no_env);
        assert_eq!(service.get_config().api_base_url, "http://localhost:5000");
    }

    #[test]
    fn test_cache_until_invalidated() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("config.toml");
        std::fs::write(&path, "search_radius_m = 1200").unwrap();

        let service = ConfigService::new(&path).with_env(no_env);
        assert_eq!(service.get_config().search_radius_m, 1200);

        std::fs::write(&path, "search_radius_m = 800").unwrap();
        assert_eq!(service.get_config().search_radius_m, 1200);

        service.invalidate_cache();
        assert_eq!(service.get_config().search_radius_m, 800);
    }

    #[test]
    fn test_env_overrides_file() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("config.toml");
        std::fs::write(&path, "api_base_url = \"http://file:1\"\nuse_groq = true").unwrap();

        let service = ConfigService::new(&path).with_env(|key| match key {
            ENV_API_URL => Some(" http://env:2 ".to_string()),
            ENV_USE_GROQ => Some("no".to_string()),
            _ => None,
        });
        let config = service.get_config();
        assert_eq!(config.api_base_url, "http://env:2");
        assert!(!config.use_groq);
    }
}
