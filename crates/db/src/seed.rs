//! Startup seeding.

use smartgen_core::auth::{Admin, NewAdmin};
use smartgen_core::store::{Store, StoreResult};
use tracing::info;

/// Ensures the configured admin exists, returning it.
///
/// Seeding is idempotent: an existing admin with the same email is kept
/// unchanged.
pub async fn seed_admin(
    store: &dyn Store,
    email: &str,
    name: &str,
    password_hash: String,
) -> StoreResult<Admin> {
    if let Some(existing) = store.find_admin_by_email(email).await? {
        info!(admin_id = %existing.id, "Admin already seeded");
        return Ok(existing);
    }

    let admin = store
        .create_admin(NewAdmin {
            email: email.to_string(),
            password_hash,
            name: name.to_string(),
        })
        .await?;
    info!(admin_id = %admin.id, email = %admin.email, "Seeded admin account");
    Ok(admin)
}
