//! Account lifecycle: registration, email confirmation, login and token refresh, plus the
//! user administration used by global admins.

use crate::error::Error;
use crate::jwt::{self, Jwt, TokenType};
use crate::{emails, memberships, projects, users, Id, UpdateMap};
use email_address::EmailAddress;
use entity_api::user;
use log::*;
use sea_orm::{DatabaseConnection, Value};
use service::config::Config;

pub use entity_api::user::{find_page, find_page_by_project};

pub const USERNAME_MAX_LENGTH: usize = 20;
pub const PASSWORD_MIN_LENGTH: usize = 8;

const INVALID_CONFIRMATION: &str = "The confirmation link is invalid or has expired.";

/// The fields submitted to create an account.
#[derive(Debug, Clone)]
pub struct Registration {
    pub username: String,
    pub email: String,
    pub password: String,
}

/// A user with every project they belong to and their role there.
pub type UserWithMemberships = (users::Model, Vec<(memberships::Model, Option<projects::Model>)>);

pub async fn find_by_id(db: &DatabaseConnection, id: Id) -> Result<users::Model, Error> {
    user::find_by_id(db, id)
        .await
        .map_err(|err| Error::from(err).with_not_found_message(format!("User with id {id} not found")))
}

pub async fn find_with_memberships(
    db: &DatabaseConnection,
    id: Id,
) -> Result<UserWithMemberships, Error> {
    let user = find_by_id(db, id).await?;
    let memberships = user::find_memberships(db, id).await?;
    Ok((user, memberships))
}

fn validate_username(username: &str, messages: &mut Vec<String>) {
    let length = username.chars().count();
    if length == 0 || length > USERNAME_MAX_LENGTH {
        messages.push(format!(
            "Username must be between 1 and {USERNAME_MAX_LENGTH} characters."
        ));
    }
}

fn validate_email(email: &str, messages: &mut Vec<String>) {
    if !EmailAddress::is_valid(email) {
        messages.push(format!("{email} is not a valid email address."));
    }
}

/// Checks the registration form, returning one message per broken rule.
pub fn validate_registration(registration: &Registration) -> Result<(), Error> {
    let mut messages = Vec::new();
    validate_username(&registration.username, &mut messages);
    validate_email(&registration.email, &mut messages);
    if registration.password.chars().count() < PASSWORD_MIN_LENGTH {
        messages.push(format!(
            "Password must be at least {PASSWORD_MIN_LENGTH} characters."
        ));
    }

    if messages.is_empty() {
        Ok(())
    } else {
        Err(Error::invalid_fields(messages))
    }
}

/// Creates an unconfirmed account and sends its confirmation link.
///
/// A confirmation email that cannot be delivered is logged and does not undo the
/// registration; the user can ask for a new link.
pub async fn register(
    db: &DatabaseConnection,
    config: &Config,
    registration: Registration,
) -> Result<users::Model, Error> {
    let registration = Registration {
        username: registration.username.trim().to_owned(),
        email: registration.email.trim().to_owned(),
        ..registration
    };
    validate_registration(&registration)?;

    if user::find_by_username(db, &registration.username)
        .await?
        .is_some()
    {
        return Err(Error::conflict("This username is already in the database"));
    }
    if user::find_by_email(db, &registration.email).await?.is_some() {
        return Err(Error::conflict("This email address is already in the database"));
    }

    let now = chrono::Utc::now();
    let created = user::create(
        db,
        users::Model {
            id: 0,
            username: registration.username,
            email: registration.email,
            password: registration.password,
            is_admin: false,
            confirmed_on: None,
            created_at: now.into(),
            updated_at: now.into(),
        },
    )
    .await?;
    info!("Registered user {} ({})", created.username, created.id);

    if let Err(err) = send_confirmation(config, &created.email).await {
        error!(
            "Could not send confirmation email to {}: {err:?}",
            created.email
        );
    }

    Ok(created)
}

async fn send_confirmation(config: &Config, email: &str) -> Result<(), Error> {
    let token = jwt::create_confirmation_token(config, email)?;
    emails::send_confirmation_email(config, email, &token).await
}

/// Sends a new confirmation link to an account that is not confirmed yet.
pub async fn request_confirmation(
    db: &DatabaseConnection,
    config: &Config,
    email: &str,
) -> Result<(), Error> {
    let user = user::find_by_email(db, email)
        .await?
        .ok_or_else(|| Error::invalid(format!("{email} not found")))?;

    if user.is_confirmed() {
        return Err(Error::invalid(format!("{email} already confirmed")));
    }

    send_confirmation(config, &user.email).await
}

/// Confirms the account named by a confirmation token.
pub async fn confirm(
    db: &DatabaseConnection,
    config: &Config,
    token: &str,
) -> Result<users::Model, Error> {
    let claims = jwt::validate_token(config, token, TokenType::Confirm)
        .map_err(|_| Error::invalid(INVALID_CONFIRMATION))?;

    let user = user::find_by_email(db, &claims.sub)
        .await?
        .ok_or_else(|| Error::invalid(INVALID_CONFIRMATION))?;

    if user.is_confirmed() {
        return Err(Error::invalid(format!("{} already confirmed", user.email)));
    }

    let confirmed = user::confirm(db, user).await?;
    info!("User {} confirmed their email", confirmed.username);
    Ok(confirmed)
}

/// Checks the credentials of a confirmed account and issues a fresh token pair.
pub async fn login(
    db: &DatabaseConnection,
    config: &Config,
    username: &str,
    password: &str,
) -> Result<(users::Model, Jwt), Error> {
    let user = user::find_by_username(db, username)
        .await?
        .ok_or_else(|| Error::invalid(format!("User {username} doesn't exist")))?;

    if !user.is_confirmed() {
        return Err(Error::invalid(format!("{} not confirmed", user.email)));
    }

    user::verify_password(password, &user.password)
        .await
        .map_err(|_| {
            warn!("Failed login for {username}");
            Error::unauthenticated("Invalid password.")
        })?;

    let tokens = jwt::issue_tokens(config, &user.username)?;
    debug!("User {username} logged in");
    Ok((user, tokens))
}

/// Resolves the user an access token was issued to.
pub async fn authenticate(
    db: &DatabaseConnection,
    config: &Config,
    access_token: &str,
) -> Result<users::Model, Error> {
    let claims = jwt::validate_token(config, access_token, TokenType::Access)?;
    find_token_subject(db, &claims.sub).await
}

/// Issues a non-fresh access token from a refresh token.
pub async fn refresh(
    db: &DatabaseConnection,
    config: &Config,
    refresh_token: &str,
) -> Result<Jwt, Error> {
    let claims = jwt::validate_token(config, refresh_token, TokenType::Refresh)?;
    let user = find_token_subject(db, &claims.sub).await?;

    Ok(Jwt {
        access_token: jwt::create_access_token(config, &user.username, false)?,
        refresh_token: None,
    })
}

async fn find_token_subject(db: &DatabaseConnection, username: &str) -> Result<users::Model, Error> {
    user::find_by_username(db, username).await?.ok_or_else(|| {
        warn!("Token presented for unknown user {username}");
        Error::unauthenticated("Invalid token.")
    })
}

/// Applies an administrator's edit. Only `username`, `email` and `is_admin` may change.
pub async fn update(
    db: &DatabaseConnection,
    id: Id,
    mut update_map: UpdateMap,
) -> Result<users::Model, Error> {
    for read_only in ["id", "password", "confirmed_on", "created_at", "updated_at"] {
        update_map.remove(read_only);
    }

    let mut messages = Vec::new();
    if let Some(Value::String(Some(username))) = update_map.get("username") {
        validate_username(username, &mut messages);
    }
    if let Some(Value::String(Some(email))) = update_map.get("email") {
        validate_email(email, &mut messages);
    }
    if !messages.is_empty() {
        return Err(Error::validation(messages));
    }

    user::update(db, id, update_map).await.map_err(|err| {
        Error::from(err)
            .with_not_found_message(format!("User with id {id} not found"))
            .with_conflict_message("Username or email address already in use.")
    })
}

/// Deletes the user together with their annotations and memberships.
pub async fn delete(db: &DatabaseConnection, id: Id) -> Result<(), Error> {
    user::delete(db, id)
        .await
        .map_err(|err| Error::from(err).with_not_found_message(format!("User with id {id} not found")))
}
