//! Document generation.

use axum::{
    Json, Router,
    extract::State,
    http::StatusCode,
    routing::{get, post},
};
use serde::Deserialize;
use smartgen_core::audit::{AuditAction, EntityType, NewAuditLog};
use smartgen_core::document::{Document, DocumentService};
use smartgen_shared::types::{SchoolId, SubscriptionId};
use tracing::info;

use crate::AppState;
use crate::error::{ApiError, ApiResult};
use crate::extractors::{ApiJson, RecordId};
use crate::middleware::AuthAdmin;

/// Creates the document routes.
pub fn admin_routes() -> Router<AppState> {
    Router::new()
        .route("/admin/documents", get(list_documents))
        .route("/admin/documents/generate", post(generate_document))
}

const SUBSCRIPTION_NOT_FOUND: &str = "Subscription not found for school";

/// Document request body.
#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct GenerateDocumentRequest {
    /// School the document is issued to.
    pub school_id: RecordId<SchoolId>,
    /// Subscription to include in the snapshot. Must belong to the school.
    #[serde(default)]
    pub subscription_id: Option<RecordId<SubscriptionId>>,
    /// Document kind, e.g. `invoice` or `certificate`.
    #[serde(default, rename = "type")]
    pub document_type: String,
}

/// POST /admin/documents/generate
async fn generate_document(
    State(state): State<AppState>,
    auth: AuthAdmin,
    ApiJson(payload): ApiJson<GenerateDocumentRequest>,
) -> ApiResult<(StatusCode, Json<Document>)> {
    let school_id = payload.school_id.or_not_found("School not found")?;
    let school = state
        .store
        .get_school(school_id)
        .await?
        .ok_or_else(|| ApiError::not_found("School not found"))?;

    let subscription = match payload.subscription_id {
        Some(id) => {
            let id = id.or_not_found(SUBSCRIPTION_NOT_FOUND)?;
            let subscription = state
                .store
                .get_subscription(id)
                .await?
                .filter(|subscription| subscription.school_id == school.id)
                .ok_or_else(|| ApiError::not_found(SUBSCRIPTION_NOT_FOUND))?;
            Some(subscription)
        }
        None => None,
    };

    let draft = DocumentService::generate(
        &payload.document_type,
        &school,
        subscription.as_ref(),
        state.clock.now(),
    )?;
    let document = state.store.create_document(draft).await?;

    state
        .audit(
            NewAuditLog::new(AuditAction::DocumentGenerated, EntityType::Document, document.id)
                .by(auth.admin_id)
                .details(format!(
                    "{} document generated for {}",
                    document.document_type, school.name
                )),
        )
        .await;

    info!(
        document_id = %document.id,
        document_number = %document.document_number,
        school_id = %school.id,
        "Document generated"
    );
    Ok((StatusCode::CREATED, Json(document)))
}

/// GET /admin/documents - All documents.
async fn list_documents(State(state): State<AppState>) -> ApiResult<Json<Vec<Document>>> {
    Ok(Json(state.store.list_documents().await?))
}
