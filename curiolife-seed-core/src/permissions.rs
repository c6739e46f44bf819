//! Public read access for the seeded content types.

use futures::future::try_join_all;
use std::collections::HashSet;
use tracing::{error, info};

use crate::contract::PermissionStore;
use crate::document::ContentKind;
use crate::error::StoreError;

pub const PUBLIC_ROLE: &str = "public";
pub const PUBLIC_READ_ACTIONS: [&str; 2] = ["find", "findOne"];

/// Controller action string, e.g. `api::prayer.prayer.findOne`.
pub fn action_name(kind: ContentKind, action: &str) -> String {
    let controller = kind.singular();
    format!("api::{controller}.{controller}.{action}")
}

/// Grants `actions` on every kind to the public role, creating only the
/// permissions whose action string is not already present. Returns the
/// action strings that were created.
pub async fn grant_public_permissions<S>(
    store: &S,
    kinds: &[ContentKind],
    actions: &[&str],
) -> Result<Vec<String>, StoreError>
where
    S: PermissionStore + ?Sized,
{
    let role = match store.find_role_by_type(PUBLIC_ROLE).await? {
        Some(role) => role,
        None => {
            error!("[SEED][ERROR] Public role not found");
            return Err(StoreError::RoleNotFound(PUBLIC_ROLE.to_string()));
        }
    };

    let existing: HashSet<String> = store
        .list_permissions(role.id)
        .await?
        .into_iter()
        .map(|p| p.action)
        .collect();

    let missing: Vec<String> = kinds
        .iter()
        .flat_map(|kind| actions.iter().map(move |a| action_name(*kind, a)))
        .filter(|action| !existing.contains(action))
        .collect();

    try_join_all(
        missing
            .iter()
            .map(|action| store.create_permission(role.id, action)),
    )
    .await?;

    info!(
        role_id = role.id,
        created = missing.len(),
        already_present = existing.len(),
        "[SEED] Set public read permissions for content types"
    );
    Ok(missing)
}
