//! Change sets for the character/movie many-to-many relation.
//!
//! The join is owned by movies. Either side can request changes, but they are
//! expressed the same way: a set of ids to add and a set to remove, applied
//! additions first, then removals. An id in both sets therefore ends up
//! removed.

use std::collections::BTreeSet;

use crate::criteria::normalize_ids;
use crate::error::CoreError;
use crate::types::DbId;

/// Requested additions and removals for one entity's related-id set.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct RelationChanges {
    add: Vec<DbId>,
    remove: Vec<DbId>,
}

impl RelationChanges {
    /// Validate and normalise the two id lists. `field` names the
    /// related side in error messages (e.g. `"movie_ids"`).
    pub fn new(field: &str, add: &[DbId], remove: &[DbId]) -> Result<Self, CoreError> {
        Ok(Self {
            add: normalize_ids(field, add)?,
            remove: normalize_ids(field, remove)?,
        })
    }

    /// Additions only, as used on create.
    pub fn additions_only(field: &str, add: &[DbId]) -> Result<Self, CoreError> {
        Self::new(field, add, &[])
    }

    pub fn is_empty(&self) -> bool {
        self.add.is_empty() && self.remove.is_empty()
    }

    /// Sorted, unique ids to add.
    pub fn additions(&self) -> &[DbId] {
        &self.add
    }

    /// Sorted, unique ids to remove.
    pub fn removals(&self) -> &[DbId] {
        &self.remove
    }

    /// Apply all additions, then all removals, to `current`.
    pub fn apply_to(&self, current: &mut BTreeSet<DbId>) {
        current.extend(self.add.iter().copied());
        for id in &self.remove {
            current.remove(id);
        }
    }
}
