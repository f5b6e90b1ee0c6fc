use crate::Error;
use axum::{
    extract::{FromRequest, Request},
    Json,
};
use domain::error::Error as DomainError;
use serde::de::DeserializeOwned;

/// `Json` whose rejections are reported as `400` with the usual `{"messages": [..]}` body.
pub(crate) struct JsonBody<T>(pub T);

impl<S, T> FromRequest<S> for JsonBody<T>
where
    T: DeserializeOwned,
    S: Send + Sync,
{
    type Rejection = Error;

    async fn from_request(request: Request, state: &S) -> Result<Self, Self::Rejection> {
        match Json::<T>::from_request(request, state).await {
            Ok(Json(value)) => Ok(JsonBody(value)),
            Err(rejection) => Err(DomainError::invalid(rejection.body_text()).into()),
        }
    }
}
