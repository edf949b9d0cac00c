//! School registration and review.

use axum::{
    Json, Router,
    extract::State,
    http::StatusCode,
    routing::{get, patch, post},
};
use serde::Deserialize;
use smartgen_core::audit::{AuditAction, EntityType, NewAuditLog};
use smartgen_core::school::{NewSchool, School, SchoolPatch, SchoolService};
use smartgen_shared::types::SchoolId;
use tracing::info;
use validator::Validate;

use crate::AppState;
use crate::error::{ApiError, ApiResult};
use crate::extractors::{ApiPath, RecordId, ValidatedJson};
use crate::middleware::AuthAdmin;

/// Creates the public school routes.
pub fn routes() -> Router<AppState> {
    Router::new().route("/schools/register", post(register_school))
}

/// Creates the admin school routes.
pub fn admin_routes() -> Router<AppState> {
    Router::new()
        .route("/admin/schools", get(list_schools))
        .route("/admin/schools/{id}/approve", patch(approve_school))
        .route("/admin/schools/{id}/reject", patch(reject_school))
}

/// Registration request body.
#[derive(Debug, Deserialize, Validate)]
#[serde(rename_all = "camelCase")]
pub struct RegisterSchoolRequest {
    /// School name.
    #[validate(length(min = 1, max = 255))]
    pub name: String,
    /// Contact email, unique across schools.
    #[validate(email)]
    pub email: String,
    /// Contact phone.
    #[validate(length(min = 1, max = 32))]
    pub phone: String,
    /// Street address.
    #[validate(length(min = 1))]
    pub address: String,
    /// City.
    #[validate(length(min = 1))]
    pub city: String,
    /// State.
    #[validate(length(min = 1))]
    pub state: String,
    /// Six-digit postal code.
    #[validate(length(equal = 6))]
    pub pincode: String,
    /// Principal's name.
    #[validate(length(min = 1))]
    pub principal_name: String,
    /// GST registration number.
    #[serde(default)]
    pub gst_number: Option<String>,
    /// TIN.
    #[serde(default)]
    pub tin_number: Option<String>,
    /// PAN.
    #[serde(default)]
    pub pan_number: Option<String>,
    /// School registration number.
    #[serde(default)]
    pub registration_number: Option<String>,
    /// Enrolled students.
    #[serde(default)]
    pub student_count: u32,
}

fn non_empty(value: Option<String>) -> Option<String> {
    value
        .map(|v| v.trim().to_string())
        .filter(|v| !v.is_empty())
}

impl From<RegisterSchoolRequest> for NewSchool {
    fn from(req: RegisterSchoolRequest) -> Self {
        Self {
            name: req.name.trim().to_string(),
            email: req.email,
            phone: req.phone.trim().to_string(),
            address: req.address.trim().to_string(),
            city: req.city.trim().to_string(),
            state: req.state.trim().to_string(),
            pincode: req.pincode,
            principal_name: req.principal_name.trim().to_string(),
            gst_number: non_empty(req.gst_number),
            tin_number: non_empty(req.tin_number),
            pan_number: non_empty(req.pan_number),
            registration_number: non_empty(req.registration_number),
            student_count: req.student_count,
        }
    }
}

/// POST /schools/register - Submit a registration for review.
async fn register_school(
    State(state): State<AppState>,
    ValidatedJson(payload): ValidatedJson<RegisterSchoolRequest>,
) -> ApiResult<(StatusCode, Json<School>)> {
    let school = state.store.create_school(NewSchool::from(payload)).await?;

    state
        .audit(
            NewAuditLog::new(AuditAction::SchoolRegistered, EntityType::School, school.id)
                .details(format!("School {} registered", school.name)),
        )
        .await;

    info!(school_id = %school.id, "School registered");
    Ok((StatusCode::CREATED, Json(school)))
}

/// GET /admin/schools - All schools.
async fn list_schools(State(state): State<AppState>) -> ApiResult<Json<Vec<School>>> {
    Ok(Json(state.store.list_schools().await?))
}

/// PATCH /admin/schools/{id}/approve
async fn approve_school(
    State(state): State<AppState>,
    auth: AuthAdmin,
    ApiPath(id): ApiPath<RecordId<SchoolId>>,
) -> ApiResult<Json<School>> {
    review(
        &state,
        &auth,
        id,
        SchoolService::approve(),
        AuditAction::SchoolApproved,
    )
    .await
}

/// PATCH /admin/schools/{id}/reject
async fn reject_school(
    State(state): State<AppState>,
    auth: AuthAdmin,
    ApiPath(id): ApiPath<RecordId<SchoolId>>,
) -> ApiResult<Json<School>> {
    review(
        &state,
        &auth,
        id,
        SchoolService::reject(),
        AuditAction::SchoolRejected,
    )
    .await
}

async fn review(
    state: &AppState,
    auth: &AuthAdmin,
    id: RecordId<SchoolId>,
    decision: SchoolPatch,
    action: AuditAction,
) -> ApiResult<Json<School>> {
    let id = id.or_not_found("School not found")?;
    let school = state
        .store
        .update_school(id, decision)
        .await?
        .ok_or_else(|| ApiError::not_found("School not found"))?;

    state
        .audit(
            NewAuditLog::new(action, EntityType::School, school.id)
                .by(auth.admin_id)
                .details(format!("School {} {}", school.name, school.status)),
        )
        .await;

    info!(school_id = %school.id, admin_id = %auth.admin_id, status = %school.status, "School reviewed");
    Ok(Json(school))
}
