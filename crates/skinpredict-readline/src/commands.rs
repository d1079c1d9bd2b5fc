//! Parsing of REPL input lines.

use std::path::PathBuf;

/// Slash commands offered for completion.
pub const COMMAND_NAMES: &[&str] = &[
    "/login", "/logout", "/whoami", "/scan", "/new", "/history", "/open", "/stats", "/help",
    "/quit",
];

#[derive(Debug, Clone, PartialEq)]
pub enum Command {
    Login {
        email: String,
        display_name: Option<String>,
    },
    Logout,
    WhoAmI,
    Scan(PathBuf),
    New,
    History,
    Open(String),
    Stats,
    Help,
    Quit,
    /// A number picks one of the chips of the last reply (1-based).
    Chip(usize),
    /// Anything else is chat.
    Say(String),
    /// A malformed command, with a usage hint.
    Usage(&'static str),
    Unknown(String),
}

impl Command {
    pub fn parse(line: &str) -> Self {
        let line = line.trim();
        if matches!(line, "quit" | "exit") {
            return Command::Quit;
        }
        if let Ok(index) = line.parse::<usize>() {
            return Command::Chip(index);
        }
        if !line.starts_with('/') {
            return Command::Say(line.to_string());
        }

        let (name, rest) = match line.split_once(char::is_whitespace) {
            Some((name, rest)) => (name, rest.trim()),
            None => (line, ""),
        };
        match name {
            "/login" => {
                let mut parts = rest.splitn(2, char::is_whitespace);
                match parts.next().filter(|email| !email.is_empty()) {
                    Some(email) => Command::Login {
                        email: email.to_string(),
                        display_name: parts
                            .next()
                            .map(str::trim)
                            .filter(|name| !name.is_empty())
                            .map(str::to_string),
                    },
                    None => Command::Usage("/login <email> [display name]"),
                }
            }
            "/logout" => Command::Logout,
            "/whoami" => Command::WhoAmI,
            "/scan" if rest.is_empty() => Command::Usage("/scan <path to .png/.jpg>"),
            "/scan" => Command::Scan(PathBuf::from(rest)),
            "/new" => Command::New,
            "/history" => Command::History,
            "/open" if rest.is_empty() => Command::Usage("/open <scan id>"),
            "/open" => Command::Open(rest.to_string()),
            "/stats" => Command::Stats,
            "/help" => Command::Help,
            "/quit" | "/exit" => Command::Quit,
            other => Command::Unknown(other.to_string()),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_chat_and_chips() {
        assert_eq!(
            Command::parse("  Find a dermatologist  "),
            Command::Say("Find a dermatologist".into())
        );
        assert_eq!(Command::parse("2"), Command::Chip(2));
        assert_eq!(Command::parse("exit"), Command::Quit);
    }

    #[test]
    fn test_parse_login() {
        assert_eq!(
            Command::parse("/login amira@example.com Amira Ben Ali"),
            Command::Login {
                email: "amira@example.com".into(),
                display_name: Some("Amira Ben Ali".into()),
            }
        );
        assert_eq!(
            Command::parse("/login amira@example.com"),
            Command::Login {
                email: "amira@example.com".into(),
                display_name: None,
            }
        );
        assert!(matches!(Command::parse("/login"), Command::Usage(_)));
    }

    #[test]
    fn test_parse_arguments() {
        assert_eq!(
            Command::parse("/scan ~/Pictures/my face.jpg"),
            Command::Scan(PathBuf::from("~/Pictures/my face.jpg"))
        );
        assert_eq!(Command::parse("/open scan_1714"), Command::Open("scan_1714".into()));
        assert!(matches!(Command::parse("/open"), Command::Usage(_)));
        assert_eq!(Command::parse("/dance"), Command::Unknown("/dance".into()));
    }
}
