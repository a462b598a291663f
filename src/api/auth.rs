//! Session extraction.
//!
//! The acting user is supplied by the fronting session layer in the
//! `x-user-id` header. Requests without one are rejected before any
//! handler logic runs.

use axum::{async_trait, extract::FromRequestParts, http::request::Parts};
use tracing::warn;

use crate::error::EngineError;

use super::response::ApiErrorResponse;

/// Header carrying the authenticated user id.
pub const USER_ID_HEADER: &str = "x-user-id";

/// The authenticated user for a request.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SessionUser(pub String);

impl SessionUser {
    /// The user id.
    pub fn id(&self) -> &str {
        &self.0
    }
}

#[async_trait]
impl<S> FromRequestParts<S> for SessionUser
where
    S: Send + Sync,
{
    type Rejection = ApiErrorResponse;

    async fn from_request_parts(parts: &mut Parts, _state: &S) -> Result<Self, Self::Rejection> {
        let user_id = parts
            .headers
            .get(USER_ID_HEADER)
            .and_then(|value| value.to_str().ok())
            .map(str::trim)
            .filter(|value| !value.is_empty());

        match user_id {
            Some(id) => Ok(SessionUser(id.to_string())),
            None => {
                warn!(path = %parts.uri.path(), "Rejected request without session");
                Err(EngineError::Unauthorized.into())
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use axum::http::{Request, StatusCode};

    async fn extract(request: Request<()>) -> Result<SessionUser, ApiErrorResponse> {
        let (mut parts, _) = request.into_parts();
        SessionUser::from_request_parts(&mut parts, &()).await
    }

    #[tokio::test]
    async fn test_header_yields_user() {
        let request = Request::builder()
            .header(USER_ID_HEADER, " alice ")
            .body(())
            .unwrap();
        assert_eq!(extract(request).await.unwrap().id(), "alice");
    }

    #[tokio::test]
    async fn test_missing_header_is_unauthorized() {
        let request = Request::builder().body(()).unwrap();
        let rejection = extract(request).await.unwrap_err();
        assert_eq!(rejection.status, StatusCode::UNAUTHORIZED);
    }

    #[tokio::test]
    async fn test_blank_header_is_unauthorized() {
        let request = Request::builder()
            .header(USER_ID_HEADER, "   ")
            .body(())
            .unwrap();
        assert!(extract(request).await.is_err());
    }
}
