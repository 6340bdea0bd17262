//! The structs deserialized from inbound payloads and their validation.

use lazy_regex::regex_is_match;
use serde::Deserialize;

// ###################################
// ->   STRUCTS
// ###################################
/// The subscription payload as received. `email` can be missing or invalid,
/// validation happens in `ValidEmail::parse`.
#[derive(Debug, Deserialize)]
pub struct SubscribeRequest {
    #[serde(default)]
    pub email: Option<String>,
}

/// Validated subscriber email
#[derive(Debug, Clone, derive_more::Display)]
pub struct ValidEmail(String);

impl AsRef<str> for ValidEmail {
    fn as_ref(&self) -> &str {
        &self.0
    }
}

impl ValidEmail {
    /// Accepts anything matching `\S+@\S+.\S+`, the same coarse filter the
    /// subscription form applies client-side. The list is a plain text file
    /// with one address per line, so this is deliberately not a full
    /// mailbox-grammar check.
    pub fn parse<S>(value: S) -> Result<Self, DataParsingError>
    where
        S: AsRef<str>,
    {
        let value = value.as_ref();

        if regex_is_match!(r"\S+@\S+\.\S+", value) {
            Ok(ValidEmail(value.to_owned()))
        } else {
            Err(DataParsingError::EmailInvalid)
        }
    }
}

// ###################################
// ->   ERROR
// ###################################
#[derive(Debug, thiserror::Error)]
pub enum DataParsingError {
    #[error("invalid subscriber email")]
    EmailInvalid,
}
