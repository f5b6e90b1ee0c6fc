//! Issuing and validating the JSON Web Tokens used for sessions and email confirmation.
//!
//! Every token is signed with HS256 using `Config::jwt_secret_key`. Access and refresh tokens
//! carry the username as subject; confirmation tokens carry the email address.
//!
//! # Example
//!
//! ```rust
//! use clap::Parser;
//! use domain::jwt::{issue_tokens, validate_token, TokenType};
//! use service::config::Config;
//!
//! let config = Config::parse_from(["phaunos", "--jwt-secret-key", "test-secret"]);
//! let jwt = issue_tokens(&config, "user0").unwrap();
//! let claims = validate_token(&config, &jwt.access_token, TokenType::Access).unwrap();
//! assert_eq!(claims.sub, "user0");
//! assert!(claims.fresh);
//! ```

use crate::error::{DomainErrorKind, Error, InternalErrorKind};
use chrono::Utc;
use jsonwebtoken::{decode, encode, Algorithm, DecodingKey, EncodingKey, Header, Validation};
use log::*;
use service::config::Config;
use uuid::Uuid;

// re-export the Jwt struct from the entity module
pub use entity::jwt::Jwt;

pub use claims::{Claims, TokenType};

pub(crate) mod claims;

/// Issues a fresh access token together with a refresh token, as done on login.
pub fn issue_tokens(config: &Config, username: &str) -> Result<Jwt, Error> {
    Ok(Jwt {
        access_token: create_access_token(config, username, true)?,
        refresh_token: Some(create_token(
            config,
            username,
            TokenType::Refresh,
            false,
            config.refresh_token_expiry_secs,
        )?),
    })
}

/// Issues an access token. Tokens minted from a refresh token are never fresh.
pub fn create_access_token(config: &Config, username: &str, fresh: bool) -> Result<String, Error> {
    create_token(
        config,
        username,
        TokenType::Access,
        fresh,
        config.access_token_expiry_secs,
    )
}

pub fn create_confirmation_token(config: &Config, email: &str) -> Result<String, Error> {
    create_token(
        config,
        email,
        TokenType::Confirm,
        false,
        config.confirmation_token_expiry_secs,
    )
}

fn create_token(
    config: &Config,
    subject: &str,
    token_type: TokenType,
    fresh: bool,
    expiry_secs: u64,
) -> Result<String, Error> {
    let now = Utc::now().timestamp().max(0) as u64;
    let claims = Claims {
        sub: subject.to_owned(),
        token_type,
        fresh,
        iat: now,
        exp: now + expiry_secs,
        jti: Uuid::new_v4().to_string(),
    };
    encode_claims(config, &claims)
}

fn encode_claims(config: &Config, claims: &Claims) -> Result<String, Error> {
    encode(
        &Header::new(Algorithm::HS256),
        claims,
        &EncodingKey::from_secret(config.jwt_secret_key().as_bytes()),
    )
    .map_err(|err| {
        error!("Failed to encode {} token: {err:?}", claims.token_type);
        Error {
            source: Some(Box::new(err)),
            error_kind: DomainErrorKind::Internal(InternalErrorKind::Other(
                "JWT encoding related error".to_string(),
            )),
        }
    })
}

/// Decodes `token`, checking its signature, its expiry and that it is of the expected type.
///
/// Any failure is reported as `Unauthenticated`; callers translate it when another
/// outcome fits better, as confirmation links do.
pub fn validate_token(config: &Config, token: &str, expected: TokenType) -> Result<Claims, Error> {
    let validation = Validation::new(Algorithm::HS256);

    let claims = decode::<Claims>(
        token,
        &DecodingKey::from_secret(config.jwt_secret_key().as_bytes()),
        &validation,
    )
    .map_err(|err| {
        debug!("Rejected {expected} token: {err}");
        let message = match err.kind() {
            jsonwebtoken::errors::ErrorKind::ExpiredSignature => "Token has expired.",
            _ => "Invalid token.",
        };
        Error {
            source: Some(Box::new(err)),
            ..Error::unauthenticated(message)
        }
    })?
    .claims;

    if claims.token_type != expected {
        debug!(
            "Rejected {} token presented as {expected} token",
            claims.token_type
        );
        return Err(Error::unauthenticated("Invalid token type."));
    }

    Ok(claims)
}
