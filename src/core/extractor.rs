use std::convert::Infallible;

use axum::{
    body::Bytes,
    extract::{rejection::PathRejection, FromRequest, FromRequestParts, Path, Request},
    http::{request::Parts, HeaderMap},
    response::{IntoResponse, Response},
};
use serde::de::DeserializeOwned;

use crate::core::error::AppError;
use crate::shared::constants::UNKNOWN_CLIENT_ID;

/// Best-effort identifier of the calling client
///
/// First entry of `X-Forwarded-For`, else `X-Real-IP`, else `"unknown"`.
/// Callers without either header share one identifier.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ClientId(pub String);

impl ClientId {
    pub fn from_headers(headers: &HeaderMap) -> Self {
        let forwarded = header_value(headers, "x-forwarded-for")
            .and_then(|chain| chain.split(',').next())
            .map(str::trim)
            .filter(|v| !v.is_empty());

        let id = forwarded
            .or_else(|| header_value(headers, "x-real-ip"))
            .unwrap_or(UNKNOWN_CLIENT_ID);

        Self(id.to_string())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

fn header_value<'a>(headers: &'a HeaderMap, name: &str) -> Option<&'a str> {
    headers
        .get(name)
        .and_then(|v| v.to_str().ok())
        .map(str::trim)
        .filter(|v| !v.is_empty())
}

impl<S> FromRequestParts<S> for ClientId
where
    S: Send + Sync,
{
    type Rejection = Infallible;

    async fn from_request_parts(parts: &mut Parts, _state: &S) -> Result<Self, Self::Rejection> {
        Ok(Self::from_headers(&parts.headers))
    }
}

/// Custom path extractor that reports bad segments in the JSON error shape
pub struct AppPath<T>(pub T);

impl<T, S> FromRequestParts<S> for AppPath<T>
where
    T: DeserializeOwned + Send,
    S: Send + Sync,
{
    type Rejection = AppPathRejection;

    async fn from_request_parts(parts: &mut Parts, state: &S) -> Result<Self, Self::Rejection> {
        match Path::<T>::from_request_parts(parts, state).await {
            Ok(value) => Ok(Self(value.0)),
            Err(rejection) => Err(AppPathRejection(rejection)),
        }
    }
}

pub struct AppPathRejection(PathRejection);

impl From<AppPathRejection> for AppError {
    fn from(rejection: AppPathRejection) -> Self {
        let message = match rejection.0 {
            PathRejection::FailedToDeserializePathParams(err) => {
                format!("Invalid path parameter: {}", err.body_text())
            }
            _ => "Failed to parse path parameters".to_string(),
        };

        AppError::BadRequest(message)
    }
}

impl IntoResponse for AppPathRejection {
    fn into_response(self) -> Response {
        AppError::from(self).into_response()
    }
}

/// Raw submission body whose read failure (e.g. over the body limit) is
/// deferred to the handler instead of rejecting the request outright
pub struct SubmissionBody(pub Result<Bytes, AppError>);

impl<S> FromRequest<S> for SubmissionBody
where
    S: Send + Sync,
{
    type Rejection = Infallible;

    async fn from_request(req: Request, state: &S) -> Result<Self, Self::Rejection> {
        Ok(Self(Bytes::from_request(req, state).await.map_err(AppError::from)))
    }
}
