//! Claims carried by every token the server issues.
//!
//! All tokens share one claim set and are told apart by `token_type`, so an access token
//! can never be replayed as a refresh or confirmation token.

use serde::{Deserialize, Serialize};
use std::fmt;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum TokenType {
    Access,
    Refresh,
    Confirm,
}

impl fmt::Display for TokenType {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        match self {
            TokenType::Access => write!(f, "access"),
            TokenType::Refresh => write!(f, "refresh"),
            TokenType::Confirm => write!(f, "confirm"),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Claims {
    /// Username for access and refresh tokens, email address for confirmation tokens.
    pub sub: String,
    #[serde(rename = "type")]
    pub token_type: TokenType,
    /// Set only on access tokens issued straight from a password check.
    pub fresh: bool,
    pub iat: u64,
    pub exp: u64,
    /// Unique token id.
    pub jti: String,
}
