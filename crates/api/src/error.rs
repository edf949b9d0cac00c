//! HTTP mapping of domain errors.

use axum::{
    Json,
    http::StatusCode,
    response::{IntoResponse, Response},
};
use serde_json::json;
use smartgen_core::auth::{PasswordError, SessionError};
use smartgen_core::lifecycle::LifecycleError;
use smartgen_core::payment::SignatureError;
use smartgen_core::rate_limit::RateLimitExceeded;
use smartgen_core::store::StoreError;
use smartgen_shared::AppError;
use tracing::error;

/// Result type for handlers.
pub type ApiResult<T> = Result<T, ApiError>;

/// Handler error rendered as `{"error": CODE, "message": text}`.
#[derive(Debug)]
pub struct ApiError(pub AppError);

impl ApiError {
    /// 400 with a validation message.
    pub fn validation(message: impl Into<String>) -> Self {
        Self(AppError::Validation(message.into()))
    }

    /// 404 with a not-found message.
    pub fn not_found(message: impl Into<String>) -> Self {
        Self(AppError::NotFound(message.into()))
    }

    /// 401 with an authentication message.
    pub fn unauthorized(message: impl Into<String>) -> Self {
        Self(AppError::Unauthorized(message.into()))
    }

    /// Returns the HTTP status.
    #[must_use]
    pub fn status(&self) -> StatusCode {
        StatusCode::from_u16(self.0.status_code()).unwrap_or(StatusCode::INTERNAL_SERVER_ERROR)
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        if let AppError::Internal(cause) = &self.0 {
            error!(error = %cause, "Request failed with internal error");
        }

        let status = self.status();
        let body = Json(json!({
            "error": self.0.error_code(),
            "message": self.0.public_message(),
        }));
        (status, body).into_response()
    }
}

macro_rules! into_api_error {
    ($($source:ty),+ $(,)?) => {
        $(
            impl From<$source> for ApiError {
                fn from(err: $source) -> Self {
                    Self(AppError::from(err))
                }
            }
        )+
    };
}

into_api_error!(
    LifecycleError,
    StoreError,
    SessionError,
    SignatureError,
    PasswordError,
    RateLimitExceeded,
);

impl From<AppError> for ApiError {
    fn from(err: AppError) -> Self {
        Self(err)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use http_body_util::BodyExt;
    use smartgen_core::subscription::SubscriptionStatus;

    async fn body_json(response: Response) -> serde_json::Value {
        let bytes = response.into_body().collect().await.unwrap().to_bytes();
        serde_json::from_slice(&bytes).unwrap()
    }

    #[tokio::test]
    async fn test_conflict_body() {
        let err = ApiError::from(LifecycleError::InvalidSubscriptionTransition {
            from: SubscriptionStatus::Revoked,
            to: SubscriptionStatus::Active,
        });
        let response = err.into_response();
        assert_eq!(response.status(), StatusCode::CONFLICT);

        let body = body_json(response).await;
        assert_eq!(body["error"], "CONFLICT");
        assert_eq!(
            body["message"],
            "Invalid subscription transition from revoked to active"
        );
    }

    #[tokio::test]
    async fn test_internal_cause_is_hidden() {
        let response = ApiError(AppError::Internal("store offline".into())).into_response();
        assert_eq!(response.status(), StatusCode::INTERNAL_SERVER_ERROR);

        let body = body_json(response).await;
        assert_eq!(body["error"], "INTERNAL_ERROR");
        assert_eq!(body["message"], "An internal error occurred");
    }

    #[test]
    fn test_duplicate_email_is_bad_request() {
        let err = ApiError::from(StoreError::DuplicateEmail("a@b.c".into()));
        assert_eq!(err.status(), StatusCode::BAD_REQUEST);
    }

    #[test]
    fn test_session_errors_are_unauthorized() {
        assert_eq!(
            ApiError::from(SessionError::Expired).status(),
            StatusCode::UNAUTHORIZED
        );
    }
}
