//! Environment variable credential source.
//!
//! Read-only: credentials are set through the process environment, never
//! through the application.

use secrecy::SecretString;

use super::CredentialSource;

/// Reads credentials from environment variables.
pub struct EnvCredentials;

impl EnvCredentials {
    pub fn new() -> Self {
        Self
    }
}

impl Default for EnvCredentials {
    fn default() -> Self {
        Self::new()
    }
}

impl CredentialSource for EnvCredentials {
    fn get(&self, name: &str) -> Option<SecretString> {
        match std::env::var(name) {
            Ok(value) if !value.trim().is_empty() => Some(SecretString::from(value)),
            // Unset, blank, or not valid Unicode: treat as absent.
            _ => None,
        }
    }
}
