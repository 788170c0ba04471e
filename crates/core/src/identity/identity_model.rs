use std::fmt;

use serde::{Deserialize, Serialize};

use crate::constants::{USERNAME_MAX_LEN, USERNAME_MIN_LEN};
use crate::errors::ValidationError;

/// A validated username token.
///
/// 2-30 characters of `[A-Za-z0-9_-]`, mirroring what the server enforces.
/// Validating locally keeps bad names from ever reaching the wire.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Username(String);

impl Username {
    /// Parse and validate a raw user-entered name.
    pub fn parse(raw: &str) -> Result<Self, ValidationError> {
        let name = raw.trim();
        if name.len() < USERNAME_MIN_LEN || name.len() > USERNAME_MAX_LEN {
            return Err(ValidationError::UsernameLength);
        }
        if !name
            .chars()
            .all(|c| c.is_ascii_alphanumeric() || c == '_' || c == '-')
        {
            return Err(ValidationError::UsernameCharset);
        }
        Ok(Self(name.to_string()))
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for Username {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}
