//! Book-author join table synchronization.
//!
//! The owner's join rows are replaced wholesale: every existing row for the
//! owner is deleted, then one row per distinct target ID is inserted. Links
//! the caller wants to keep must be part of `targets`. Both steps run in the
//! caller's transaction, next to the owner's own upsert.

use std::collections::BTreeSet;

use crate::{error::AppResult, models::EntityKind, repository::StoreTransaction};

pub async fn synchronize(
    tx: &mut dyn StoreTransaction,
    owner: EntityKind,
    owner_id: i64,
    targets: &[i64],
) -> AppResult<()> {
    tx.delete_join_rows(owner, owner_id).await?;

    let targets: BTreeSet<i64> = targets.iter().copied().collect();
    for related_id in &targets {
        tx.insert_join_row(owner.link(owner_id, *related_id)).await?;
    }

    tracing::debug!(%owner, owner_id, links = targets.len(), "Synchronized join rows");
    Ok(())
}
