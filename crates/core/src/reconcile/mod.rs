//! Collection reconciliation for aggregate updates.
//!
//! An aggregate update (company + departments + users) submits the full
//! desired collection. Each incoming row is explicitly tagged as an existing
//! row (carrying its persisted id) or a new one; persisted rows absent from
//! the payload are deleted. The tag makes the merge independent of id string
//! shape.

use std::collections::HashSet;

use serde::{Deserialize, Serialize};
use thiserror::Error;
use uuid::Uuid;

#[cfg(test)]
mod tests;

/// One row of an incoming collection, tagged by persistence state.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "lowercase")]
pub enum RowPatch<T> {
    /// A row that already exists in the database and should be updated.
    Existing {
        /// Persisted row id.
        id: Uuid,
        /// New field values.
        data: T,
    },
    /// A row to be inserted.
    New {
        /// Field values for the insert.
        data: T,
    },
}

impl<T> RowPatch<T> {
    /// Returns the persisted id for existing rows.
    #[must_use]
    pub const fn existing_id(&self) -> Option<Uuid> {
        match self {
            Self::Existing { id, .. } => Some(*id),
            Self::New { .. } => None,
        }
    }

    /// Returns a reference to the row data.
    #[must_use]
    pub const fn data(&self) -> &T {
        match self {
            Self::Existing { data, .. } | Self::New { data } => data,
        }
    }
}

/// Reconciliation failures.
#[derive(Debug, Error, PartialEq, Eq)]
pub enum ReconcileError {
    /// The payload referenced a persisted row that does not exist.
    #[error("row {0} does not exist")]
    UnknownRow(Uuid),
}

/// The writes needed to make the stored collection match the payload.
#[derive(Debug, Clone)]
pub struct ReconcilePlan<T> {
    /// Rows to insert.
    pub insert: Vec<T>,
    /// Rows to update in place, keyed by persisted id.
    pub update: Vec<(Uuid, T)>,
    /// Persisted ids absent from the payload, to be deleted.
    pub delete: Vec<Uuid>,
}

/// Diffs the incoming collection against the persisted row ids.
///
/// # Errors
///
/// Returns [`ReconcileError::UnknownRow`] when an `Existing` row references
/// an id that is not currently persisted.
pub fn plan<T>(
    existing_ids: &[Uuid],
    incoming: Vec<RowPatch<T>>,
) -> Result<ReconcilePlan<T>, ReconcileError> {
    let existing: HashSet<Uuid> = existing_ids.iter().copied().collect();

    let mut insert = Vec::new();
    let mut update = Vec::new();
    let mut kept: HashSet<Uuid> = HashSet::new();

    for row in incoming {
        match row {
            RowPatch::Existing { id, data } => {
                if !existing.contains(&id) {
                    return Err(ReconcileError::UnknownRow(id));
                }
                kept.insert(id);
                update.push((id, data));
            }
            RowPatch::New { data } => insert.push(data),
        }
    }

    let delete = existing_ids
        .iter()
        .copied()
        .filter(|id| !kept.contains(id))
        .collect();

    Ok(ReconcilePlan {
        insert,
        update,
        delete,
    })
}
