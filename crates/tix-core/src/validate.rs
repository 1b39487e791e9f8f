//! Client-side validation against the server's legal field values.
//!
//! The tracker declares, per field name, the set of values it will accept
//! (priorities, components, milestones, ...). Submissions are checked here
//! before any network write, and every violation is collected: a user fixing
//! a rejected edit should see the whole list at once, not one error per
//! round trip.

use std::collections::BTreeMap;
use std::fmt;

use crate::record::FieldMap;

/// Server-declared legal value sets, keyed by field name.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct FieldEnums {
    values: BTreeMap<String, Vec<String>>,
}

impl FieldEnums {
    #[must_use]
    pub fn new(values: impl IntoIterator<Item = (String, Vec<String>)>) -> Self {
        Self {
            values: values.into_iter().collect(),
        }
    }

    /// Register (or replace) the legal set for one field.
    pub fn insert(&mut self, field: impl Into<String>, legal: Vec<String>) {
        self.values.insert(field.into(), legal);
    }

    #[must_use]
    pub fn legal_values(&self, field: &str) -> Option<&[String]> {
        self.values.get(field).map(Vec::as_slice)
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.values.is_empty()
    }

    /// Check every field with a declared enumeration.
    ///
    /// Empty values always pass (clearing a field is always legal), as do
    /// fields with no declared enumeration. Violations are exhaustive, never
    /// fail-fast.
    pub fn validate(&self, fields: &FieldMap) -> Result<(), ValidationError> {
        let violations: Vec<Violation> = fields
            .iter()
            .filter_map(|(name, value)| {
                let legal = self.values.get(name)?;
                if value.is_empty() || legal.contains(value) {
                    None
                } else {
                    Some(Violation {
                        field: name.clone(),
                        value: value.clone(),
                        legal: legal.clone(),
                    })
                }
            })
            .collect();

        if violations.is_empty() {
            Ok(())
        } else {
            Err(ValidationError { violations })
        }
    }
}

/// One field value outside its legal set.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Violation {
    pub field: String,
    pub value: String,
    pub legal: Vec<String>,
}

impl fmt::Display for Violation {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{}: '{}' is not one of [{}]",
            self.field,
            self.value,
            self.legal.join(", ")
        )
    }
}

/// The full violation list for a rejected submission.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ValidationError {
    pub violations: Vec<Violation>,
}

impl std::error::Error for ValidationError {}

impl fmt::Display for ValidationError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(f, "the following fields contain invalid values:")?;
        for violation in &self.violations {
            writeln!(f, "  {violation}")?;
        }
        Ok(())
    }
}
