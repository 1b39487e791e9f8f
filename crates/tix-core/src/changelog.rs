//! Ticket history as reported by the tracker.

use chrono::{DateTime, Utc};
use serde::Serialize;

/// One change event from a ticket's changelog, in server-provided
/// chronological order.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ChangeEvent {
    pub timestamp: DateTime<Utc>,
    pub author: String,
    pub field: String,
    pub old_value: String,
    pub new_value: String,
    /// Whether the change is permanent (comments and attachment notes are
    /// reported with this flag cleared).
    pub permanent: bool,
}
