//! Path management for SkinPredict files.
//!
//! # Directory Structure
//!
//! ```text
//! ~/.config/skinpredict/        # Config directory
//! └── config.toml               # Application configuration
//!
//! ~/.local/share/skinpredict/   # Data directory
//! ├── auth.json                 # Signed-in user
//! ├── scan_history/             # One document per scan
//! │   └── <user_id>/<session_id>.json
//! └── logs/
//!     └── skinpredict.log.YYYY-MM-DD
//! ```

use std::path::{Path, PathBuf};

const APP_DIR: &str = "skinpredict";

/// Errors that can occur during path resolution.
#[derive(Debug)]
pub enum PathError {
    /// Home directory could not be determined.
    HomeDirNotFound,
}

impl std::fmt::Display for PathError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            PathError::HomeDirNotFound => write!(f, "Cannot find home directory"),
        }
    }
}

impl std::error::Error for PathError {}

/// Resolved config and data roots.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SkinPaths {
    config_dir: PathBuf,
    data_dir: PathBuf,
}

impl SkinPaths {
    /// Platform directories (XDG on Linux, the usual places elsewhere).
    pub fn resolve() -> Result<Self, PathError> {
        let config_dir = dirs::config_dir().ok_or(PathError::HomeDirNotFound)?;
        let data_dir = dirs::data_dir().ok_or(PathError::HomeDirNotFound)?;
        Ok(Self {
            config_dir: config_dir.join(APP_DIR),
            data_dir: data_dir.join(APP_DIR),
        })
    }

    /// Everything under one directory; used by `--data-dir` and tests.
    pub fn with_base(base: impl AsRef<Path>) -> Self {
        let base = base.as_ref();
        Self {
            config_dir: base.join("config"),
            data_dir: base.join("data"),
        }
    }

    pub fn config_dir(&self) -> &Path {
        &self.config_dir
    }

    pub fn data_dir(&self) -> &Path {
        &self.data_dir
    }

    pub fn config_file(&self) -> PathBuf {
        self.config_dir.join("config.toml")
    }

    pub fn auth_file(&self) -> PathBuf {
        self.data_dir.join("auth.json")
    }

    pub fn history_dir(&self) -> PathBuf {
        self.data_dir.join("scan_history")
    }

    pub fn logs_dir(&self) -> PathBuf {
        self.data_dir.join("logs")
    }
}
