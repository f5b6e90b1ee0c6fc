use sea_orm::Value;
use serde::Deserialize;
use utoipa::{IntoParams, ToSchema};

use super::deserialize_flag;
use domain::{user::Registration, IntoUpdateMap, UpdateMap};

#[derive(Debug, Deserialize, ToSchema)]
pub struct CreateUserParams {
    pub username: String,
    pub email: String,
    pub password: String,
}

impl From<CreateUserParams> for Registration {
    fn from(params: CreateUserParams) -> Self {
        Registration {
            username: params.username,
            email: params.email,
            password: params.password,
        }
    }
}

#[derive(Debug, Deserialize, ToSchema)]
pub struct RequestConfirmationParams {
    pub email: String,
}

#[derive(Debug, Deserialize, ToSchema)]
pub struct LoginParams {
    pub username: String,
    pub password: String,
}

#[derive(Debug, Default, Deserialize, IntoParams)]
pub(crate) struct LoginQuery {
    /// `1` stores the tokens in cookies instead of returning them.
    #[serde(default, deserialize_with = "deserialize_flag")]
    #[param(value_type = Option<u8>)]
    pub(crate) web: bool,
}

/// Fields an administrator may change on an account.
#[derive(Debug, Deserialize, IntoParams, ToSchema)]
pub struct UpdateUserParams {
    pub username: Option<String>,
    pub email: Option<String>,
    pub is_admin: Option<bool>,
}

impl IntoUpdateMap for UpdateUserParams {
    fn into_update_map(self) -> UpdateMap {
        let mut update_map = UpdateMap::new();
        if let Some(username) = self.username {
            update_map.insert(
                "username".to_string(),
                Some(Value::String(Some(Box::new(username.trim().to_owned())))),
            );
        }
        if let Some(email) = self.email {
            update_map.insert(
                "email".to_string(),
                Some(Value::String(Some(Box::new(email.trim().to_owned())))),
            );
        }
        if let Some(is_admin) = self.is_admin {
            update_map.insert("is_admin".to_string(), Some(Value::Bool(Some(is_admin))));
        }
        update_map
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn only_present_fields_are_updated() {
        let update_map = UpdateUserParams {
            username: Some(" user9 ".to_owned()),
            email: None,
            is_admin: Some(true),
        }
        .into_update_map();

        assert_eq!(
            update_map.get("username"),
            Some(&Value::String(Some(Box::new("user9".to_owned()))))
        );
        assert_eq!(update_map.get("email"), None);
        assert_eq!(update_map.get("is_admin"), Some(&Value::Bool(Some(true))));
    }
}
