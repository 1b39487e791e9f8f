//! Change-tracking ticket records.
//!
//! A [`TicketRecord`] separates the field values last seen on the server (the
//! snapshot) from locally mutated values, so a save submits only what changed.
//! After the server acknowledges a save the caller rebases the snapshot onto
//! the just-submitted values; skipping that step would make a second edit in
//! the same session diff against stale data.

use std::collections::BTreeMap;

use chrono::{DateTime, Utc};

use crate::error::RecordError;

/// Ordered field-name to value mapping used throughout the crate.
pub type FieldMap = BTreeMap<String, String>;

/// Keys carried out of band on every ticket, never stored as field data.
pub const RESERVED_FIELDS: [&str; 3] = ["id", "created", "modified"];

/// Returns `true` for the structural keys the generic field map may not hold.
#[must_use]
pub fn is_reserved(name: &str) -> bool {
    RESERVED_FIELDS.contains(&name)
}

/// A ticket with snapshot/diff semantics.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TicketRecord {
    id: Option<u64>,
    created: Option<DateTime<Utc>>,
    modified: Option<DateTime<Utc>>,
    fields: FieldMap,
    original: FieldMap,
}

impl TicketRecord {
    /// Build a record from data returned by the gateway.
    ///
    /// The snapshot is taken here: `diff()` is empty until a field changes.
    pub fn new(
        id: u64,
        created: Option<DateTime<Utc>>,
        modified: Option<DateTime<Utc>>,
        fields: FieldMap,
    ) -> Result<Self, RecordError> {
        reject_reserved(&fields)?;
        Ok(Self {
            id: Some(id),
            created,
            modified,
            original: fields.clone(),
            fields,
        })
    }

    /// Build a pre-create draft: no identity, no timestamps.
    pub fn draft(fields: FieldMap) -> Result<Self, RecordError> {
        reject_reserved(&fields)?;
        Ok(Self {
            id: None,
            created: None,
            modified: None,
            original: fields.clone(),
            fields,
        })
    }

    #[must_use]
    pub const fn id(&self) -> Option<u64> {
        self.id
    }

    #[must_use]
    pub const fn created(&self) -> Option<DateTime<Utc>> {
        self.created
    }

    #[must_use]
    pub const fn modified(&self) -> Option<DateTime<Utc>> {
        self.modified
    }

    #[must_use]
    pub fn field(&self, name: &str) -> Option<&str> {
        self.fields.get(name).map(String::as_str)
    }

    #[must_use]
    pub const fn fields(&self) -> &FieldMap {
        &self.fields
    }

    /// Set one field. Reserved keys are rejected; the snapshot is untouched.
    pub fn set_field(
        &mut self,
        name: impl Into<String>,
        value: impl Into<String>,
    ) -> Result<(), RecordError> {
        let name = name.into();
        if is_reserved(&name) {
            return Err(RecordError::ImmutableField { name });
        }
        self.fields.insert(name, value.into());
        Ok(())
    }

    /// Apply a whole delta through [`set_field`](Self::set_field).
    pub fn apply(&mut self, delta: &FieldMap) -> Result<(), RecordError> {
        for (name, value) in delta {
            self.set_field(name.clone(), value.clone())?;
        }
        Ok(())
    }

    /// Fields whose current value differs from the snapshot, plus fields
    /// added since. Pure; order independent.
    #[must_use]
    pub fn diff(&self) -> FieldMap {
        self.fields
            .iter()
            .filter(|(name, value)| self.original.get(*name) != Some(*value))
            .map(|(name, value)| (name.clone(), value.clone()))
            .collect()
    }

    /// Replace the snapshot with the current fields.
    ///
    /// Call only after the gateway acknowledged a save; `diff()` is empty
    /// afterwards until further mutation.
    pub fn rebase(&mut self) {
        self.original = self.fields.clone();
    }
}

fn reject_reserved(fields: &FieldMap) -> Result<(), RecordError> {
    for name in fields.keys() {
        if is_reserved(name) {
            return Err(RecordError::ReservedField { name: name.clone() });
        }
    }
    Ok(())
}
