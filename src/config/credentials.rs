use std::collections::HashMap;
use std::path::Path;

use crate::adapters::parsers::dotenv_parser::DotenvParser;
use crate::core::errors::{FocusError, Result};

pub const ACCESS_TOKEN_VAR: &str = "ACCESS_TOKEN";
pub const CLIENT_ID_VAR: &str = "CLIENT_ID";

/// Twitch credentials for chat login and the Helix API.
#[derive(Clone)]
pub struct Credentials {
    pub access_token: String,
    pub client_id: String,
}

impl std::fmt::Debug for Credentials {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Credentials")
            .field("access_token", &"<redacted>")
            .field("client_id", &self.client_id)
            .finish()
    }
}

/// Variables from the process environment with a `.env` file as fallback.
///
/// The environment always wins over the file.
pub struct CredentialSource {
    file_vars: HashMap<String, String>,
}

impl CredentialSource {
    /// Read `dotenv_path` if it exists; a missing file is not an error.
    pub fn load(dotenv_path: &Path) -> Result<Self> {
        let file_vars = if dotenv_path.exists() {
            let content = std::fs::read_to_string(dotenv_path)?;
            DotenvParser::parse(&content)?
        } else {
            HashMap::new()
        };
        Ok(Self { file_vars })
    }

    #[cfg(test)]
    fn from_vars(file_vars: HashMap<String, String>) -> Self {
        Self { file_vars }
    }

    pub fn get(&self, key: &str) -> Option<String> {
        std::env::var(key)
            .ok()
            .filter(|v| !v.is_empty())
            .or_else(|| self.file_vars.get(key).cloned())
    }

    fn require(&self, key: &str) -> Result<String> {
        self.get(key).ok_or_else(|| FocusError::InvalidConfig {
            detail: format!("{key} is not set. Export it or add it to .env"),
        })
    }

    /// Token for chat login. The client id is optional here.
    pub fn chat_token(&self) -> Result<String> {
        self.require(ACCESS_TOKEN_VAR)
    }

    /// Both values, as required by the Helix API.
    pub fn credentials(&self) -> Result<Credentials> {
        Ok(Credentials {
            access_token: self.require(ACCESS_TOKEN_VAR)?,
            client_id: self.require(CLIENT_ID_VAR)?,
        })
    }
}
