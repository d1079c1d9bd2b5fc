use serde::{Deserialize, Serialize};

/// The signed-in user.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct UserIdentity {
    /// Stable user id; history documents are keyed by it.
    pub uid: String,
    pub email: String,
    #[serde(default)]
    pub display_name: Option<String>,
}

impl UserIdentity {
    /// Display name, or the local part of the email when none was given.
    pub fn greeting_name(&self) -> &str {
        match self.display_name.as_deref() {
            Some(name) if !name.trim().is_empty() => name,
            _ => self.email.split('@').next().unwrap_or(&self.email),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_greeting_name_falls_back_to_email() {
        let mut user = UserIdentity {
            uid: "u1".into(),
            email: "amira@example.com".into(),
            display_name: None,
        };
        assert_eq!(user.greeting_name(), "amira");

        user.display_name = Some("Amira".into());
        assert_eq!(user.greeting_name(), "Amira");
    }
}
