//! Bearer-session middleware for admin routes.

use axum::{
    extract::{FromRequestParts, Request, State},
    http::{header::AUTHORIZATION, request::Parts},
    middleware::Next,
    response::{IntoResponse, Response},
};
use smartgen_shared::types::AdminId;
use tracing::debug;

use crate::AppState;
use crate::error::ApiError;

/// Extracts the bearer token from the Authorization header.
fn extract_bearer_token(header: &str) -> Option<&str> {
    header
        .strip_prefix("Bearer ")
        .or_else(|| header.strip_prefix("bearer "))
        .map(str::trim)
        .filter(|token| !token.is_empty())
}

/// Rejects requests without a live session.
///
/// On success the resolved [`AuthAdmin`] is stored in request extensions.
pub async fn auth_middleware(
    State(state): State<AppState>,
    mut request: Request,
    next: Next,
) -> Response {
    let auth_header = request
        .headers()
        .get(AUTHORIZATION)
        .and_then(|h| h.to_str().ok());

    let Some(token) = auth_header.and_then(extract_bearer_token) else {
        return ApiError::unauthorized("Unauthorized").into_response();
    };

    match state.sessions.verify(token) {
        Ok(admin_id) => {
            let auth = AuthAdmin {
                admin_id,
                token: token.to_string(),
            };
            request.extensions_mut().insert(auth);
            next.run(request).await
        }
        Err(e) => {
            debug!(error = %e, "Rejected admin session");
            ApiError::from(e).into_response()
        }
    }
}

/// The authenticated admin of a request.
///
/// ```ignore
/// async fn handler(auth: AuthAdmin) -> impl IntoResponse {
///     let admin_id = auth.admin_id;
///     // ...
/// }
/// ```
#[derive(Debug, Clone)]
pub struct AuthAdmin {
    /// Session owner.
    pub admin_id: AdminId,
    /// The bearer token, kept for logout.
    pub token: String,
}

impl<S> FromRequestParts<S> for AuthAdmin
where
    S: Send + Sync,
{
    type Rejection = ApiError;

    async fn from_request_parts(parts: &mut Parts, _state: &S) -> Result<Self, Self::Rejection> {
        parts
            .extensions
            .get::<Self>()
            .cloned()
            .ok_or_else(|| ApiError::unauthorized("Authentication required"))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rstest::rstest;

    #[rstest]
    #[case("Bearer abc", Some("abc"))]
    #[case("bearer abc", Some("abc"))]
    #[case("Bearer   ", None)]
    #[case("Basic abc", None)]
    #[case("abc", None)]
    fn test_extract_bearer_token(#[case] header: &str, #[case] expected: Option<&str>) {
        assert_eq!(extract_bearer_token(header), expected);
    }
}
