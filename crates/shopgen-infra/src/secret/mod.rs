//! Provider credential lookup.
//!
//! - `env`: environment variables named by the provider config
//! - `StaticCredentials`: fixed in-memory map, for tests and one-off tools
//!
//! Values come back wrapped in [`SecretString`] and are never logged.

pub mod env;

use std::collections::HashMap;

use secrecy::SecretString;

pub use env::EnvCredentials;

/// A source of API keys keyed by variable name (e.g. `ANTHROPIC_API_KEY`).
pub trait CredentialSource: Send + Sync {
    /// The non-empty credential stored under `name`, if any.
    fn get(&self, name: &str) -> Option<SecretString>;
}

/// Credentials from a fixed map.
#[derive(Default)]
pub struct StaticCredentials {
    values: HashMap<String, String>,
}

impl StaticCredentials {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with(mut self, name: &str, value: &str) -> Self {
        self.values.insert(name.to_string(), value.to_string());
        self
    }
}

impl CredentialSource for StaticCredentials {
    fn get(&self, name: &str) -> Option<SecretString> {
        self.values
            .get(name)
            .filter(|v| !v.trim().is_empty())
            .map(|v| SecretString::from(v.clone()))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use secrecy::ExposeSecret;

    #[test]
    fn test_static_credentials() {
        let creds = StaticCredentials::new()
            .with("ANTHROPIC_API_KEY", "sk-ant")
            .with("TONGYI_API_KEY", "  ");
        assert_eq!(
            creds.get("ANTHROPIC_API_KEY").unwrap().expose_secret(),
            "sk-ant"
        );
        assert!(creds.get("TONGYI_API_KEY").is_none());
        assert!(creds.get("MISSING").is_none());
    }
}
