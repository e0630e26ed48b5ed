//! Referential existence check for related IDs

use std::collections::BTreeSet;

use crate::{
    error::{AppError, AppResult},
    models::EntityKind,
    repository::StoreTransaction,
};

/// Candidate IDs absent from `existing`, ascending and without duplicates
pub fn missing_ids(candidates: &[i64], existing: &[i64]) -> Vec<i64> {
    let existing: BTreeSet<i64> = existing.iter().copied().collect();
    candidates
        .iter()
        .copied()
        .filter(|id| !existing.contains(id))
        .collect::<BTreeSet<_>>()
        .into_iter()
        .collect()
}

/// Fail with `RelatedEntityNotFound` naming every ID in `ids` that has no
/// `kind` row. Runs against a fresh ID scan inside the caller's transaction.
pub async fn ensure_exist(
    tx: &mut dyn StoreTransaction,
    kind: EntityKind,
    ids: &[i64],
) -> AppResult<()> {
    if ids.is_empty() {
        return Ok(());
    }

    let existing = tx.find_all_ids(kind).await?;
    let missing = missing_ids(ids, &existing);
    if missing.is_empty() {
        return Ok(());
    }

    tracing::warn!(%kind, ?missing, "Rejecting write referencing unknown IDs");
    Err(AppError::RelatedEntityNotFound { kind, ids: missing })
}
