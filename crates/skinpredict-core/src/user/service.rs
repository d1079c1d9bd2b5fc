//! Authentication service trait.

use async_trait::async_trait;

use super::model::UserIdentity;
use crate::error::Result;

/// Gatekeeper for everything user-scoped (scanning, history).
#[async_trait]
pub trait AuthService: Send + Sync {
    /// Returns the signed-in user, if any.
    async fn current_user(&self) -> Result<Option<UserIdentity>>;

    /// Signs in and remembers the user across restarts.
    ///
    /// Fails with `SkinError::InvalidInput` for a malformed email.
    async fn sign_in(&self, email: &str, display_name: Option<&str>) -> Result<UserIdentity>;

    async fn sign_out(&self) -> Result<()>;
}
