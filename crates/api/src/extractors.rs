//! Extractors whose rejections use the API error body.

use std::str::FromStr;

use axum::{
    Json,
    extract::{FromRequest, FromRequestParts, Path, Query, Request},
    http::request::Parts,
};
use serde::{Deserialize, Deserializer, de::DeserializeOwned};
use validator::Validate;

use crate::error::ApiError;

/// JSON body; malformed input is a 400 `VALIDATION_ERROR`.
#[derive(Debug, Clone, Copy, Default)]
pub struct ApiJson<T>(pub T);

impl<S, T> FromRequest<S> for ApiJson<T>
where
    T: DeserializeOwned,
    S: Send + Sync,
{
    type Rejection = ApiError;

    async fn from_request(req: Request, state: &S) -> Result<Self, Self::Rejection> {
        let Json(value) = Json::<T>::from_request(req, state)
            .await
            .map_err(|rejection| ApiError::validation(rejection.body_text()))?;
        Ok(Self(value))
    }
}

/// JSON body checked with `validator` before the handler runs.
#[derive(Debug, Clone, Copy, Default)]
pub struct ValidatedJson<T>(pub T);

impl<S, T> FromRequest<S> for ValidatedJson<T>
where
    T: DeserializeOwned + Validate,
    S: Send + Sync,
{
    type Rejection = ApiError;

    async fn from_request(req: Request, state: &S) -> Result<Self, Self::Rejection> {
        let ApiJson(value) = ApiJson::<T>::from_request(req, state).await?;
        value.validate().map_err(|errors| {
            let mut fields: Vec<String> = errors
                .field_errors()
                .keys()
                .map(ToString::to_string)
                .collect();
            fields.sort();
            ApiError::validation(format!("Invalid fields: {}", fields.join(", ")))
        })?;
        Ok(Self(value))
    }
}

/// Path parameters; unparseable ids are a 400.
#[derive(Debug, Clone, Copy)]
pub struct ApiPath<T>(pub T);

impl<S, T> FromRequestParts<S> for ApiPath<T>
where
    T: DeserializeOwned + Send,
    S: Send + Sync,
{
    type Rejection = ApiError;

    async fn from_request_parts(parts: &mut Parts, state: &S) -> Result<Self, Self::Rejection> {
        let Path(value) = Path::<T>::from_request_parts(parts, state)
            .await
            .map_err(|rejection| ApiError::validation(rejection.body_text()))?;
        Ok(Self(value))
    }
}

/// Query string parameters.
#[derive(Debug, Clone, Copy, Default)]
pub struct ApiQuery<T>(pub T);

impl<S, T> FromRequestParts<S> for ApiQuery<T>
where
    T: DeserializeOwned,
    S: Send + Sync,
{
    type Rejection = ApiError;

    async fn from_request_parts(parts: &mut Parts, state: &S) -> Result<Self, Self::Rejection> {
        let Query(value) = Query::<T>::from_request_parts(parts, state)
            .await
            .map_err(|rejection| ApiError::validation(rejection.body_text()))?;
        Ok(Self(value))
    }
}

/// A record id taken from a path or body.
///
/// Ids are opaque to clients: a value that does not parse names no record,
/// so it surfaces as a 404 rather than a validation error.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RecordId<T>(pub Option<T>);

impl<T> RecordId<T> {
    /// Returns the parsed id, or a 404 with `message`.
    pub fn or_not_found(self, message: &'static str) -> Result<T, ApiError> {
        self.0.ok_or_else(|| ApiError::not_found(message))
    }
}

impl<'de, T: FromStr> Deserialize<'de> for RecordId<T> {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let raw = String::deserialize(deserializer)?;
        Ok(Self(raw.trim().parse().ok()))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use smartgen_shared::types::SchoolId;

    #[test]
    fn test_record_id_parses_uuid() {
        let id = SchoolId::new();
        let parsed: RecordId<SchoolId> = serde_json::from_value(serde_json::json!(id)).unwrap();
        assert_eq!(parsed, RecordId(Some(id)));
    }

    #[test]
    fn test_record_id_unparseable_is_not_found() {
        let parsed: RecordId<SchoolId> =
            serde_json::from_value(serde_json::json!("does-not-exist")).unwrap();
        assert_eq!(parsed, RecordId(None));

        let err = parsed.or_not_found("School not found").unwrap_err();
        assert_eq!(err.status(), axum::http::StatusCode::NOT_FOUND);
    }
}
