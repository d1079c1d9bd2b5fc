//! File-backed authentication.
//!
//! There is no identity provider behind the terminal shell: signing in just
//! records who is using this machine. The uid is derived from the email so
//! the same address always maps to the same history directory.

use std::path::PathBuf;

use async_trait::async_trait;
use skinpredict_core::error::{Result, SkinError};
use skinpredict_core::user::{AuthService, UserIdentity};
use tokio::sync::RwLock;
use uuid::Uuid;

use crate::storage::AtomicJsonFile;

/// Remembers the signed-in user in `auth.json`.
pub struct LocalAuthService {
    file: AtomicJsonFile<UserIdentity>,
    /// `None` until the file has been read once.
    cached: RwLock<Option<Option<UserIdentity>>>,
}

impl LocalAuthService {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self {
            file: AtomicJsonFile::new(path),
            cached: RwLock::new(None),
        }
    }
}

/// Stable uid for an address.
pub fn uid_for_email(email: &str) -> String {
    let normalized = email.trim().to_lowercase();
    Uuid::new_v5(&Uuid::NAMESPACE_OID, normalized.as_bytes()).to_string()
}

fn is_plausible_email(email: &str) -> bool {
    let Some((local, domain)) = email.split_once('@') else {
        return false;
    };
    !local.is_empty()
        && !domain.contains('@')
        && domain.contains('.')
        && !domain.starts_with('.')
        && !domain.ends_with('.')
        && !email.chars().any(char::is_whitespace)
}

#[async_trait]
impl AuthService for LocalAuthService {
    async fn current_user(&self) -> Result<Option<UserIdentity>> {
        if let Some(cached) = self.cached.read().await.as_ref() {
            return Ok(cached.clone());
        }

        let loaded = match self.file.load().await {
            Ok(user) => user,
            Err(e) => {
                tracing::warn!("[LocalAuthService] Ignoring unreadable auth file: {:#}", e);
                None
            }
        };
        *self.cached.write().await = Some(loaded.clone());
        Ok(loaded)
    }

    async fn sign_in(&self, email: &str, display_name: Option<&str>) -> Result<UserIdentity> {
        let email = email.trim();
        if !is_plausible_email(email) {
            return Err(SkinError::invalid_input(format!(
                "'{}' is not a valid email address",
                email
            )));
        }

        let user = UserIdentity {
            uid: uid_for_email(email),
            email: email.to_string(),
            display_name: display_name
                .map(str::trim)
                .filter(|name| !name.is_empty())
                .map(str::to_string),
        };
        self.file
            .save(&user)
            .await
            .map_err(|e| SkinError::io(format!("{:#}", e)))?;
        *self.cached.write().await = Some(Some(user.clone()));

        tracing::info!("[LocalAuthService] Signed in {}", user.uid);
        Ok(user)
    }

    async fn sign_out(&self) -> Result<()> {
        self.file
            .remove()
            .await
            .map_err(|e| SkinError::io(format!("{:#}", e)))?;
        *self.cached.write().await = Some(None);
        tracing::info!("[LocalAuthService] Signed out");
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_email_validation() {
        assert!(is_plausible_email("amira@example.com"));
        assert!(!is_plausible_email("amira"));
        assert!(!is_plausible_email("@example.com"));
        assert!(!is_plausible_email("amira@example"));
        assert!(!is_plausible_email("amira@@example.com"));
        assert!(!is_plausible_email("am ira@example.com"));
    }

    #[test]
    fn test_uid_ignores_case_and_padding() {
        assert_eq!(uid_for_email("Amira@Example.com "), uid_for_email("amira@example.com"));
        assert_ne!(uid_for_email("a@example.com"), uid_for_email("b@example.com"));
    }
}
