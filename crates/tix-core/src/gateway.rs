//! The seam between the shell and the remote tracker.
//!
//! Everything the command layer needs from the wire lives behind
//! [`TicketGateway`]; the concrete JSON-RPC client implements it in
//! `tix-rpc`, and tests substitute in-memory fakes.

use std::collections::BTreeSet;

use crate::changelog::ChangeEvent;
use crate::error::GatewayError;
use crate::record::{FieldMap, TicketRecord};
use crate::validate::FieldEnums;

/// The remote operation names a connected server supports.
///
/// Commands declare the capability they need; entries whose capability the
/// server lacks are dropped from the dispatch table at startup.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct CapabilitySet {
    names: BTreeSet<String>,
}

impl CapabilitySet {
    #[must_use]
    pub fn new(names: impl IntoIterator<Item = String>) -> Self {
        Self {
            names: names.into_iter().collect(),
        }
    }

    #[must_use]
    pub fn contains(&self, name: &str) -> bool {
        self.names.contains(name)
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.names.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = &str> {
        self.names.iter().map(String::as_str)
    }
}

/// Operations the shell performs against the remote ticket service.
///
/// Mutations are never retried automatically: `create_ticket` is not
/// idempotent, and a retried `save_ticket` could double-apply a comment.
/// Reads are safe to reissue.
pub trait TicketGateway {
    /// Remote operations the connected server advertises.
    fn capabilities(&self) -> &CapabilitySet;

    /// Legal value sets fetched at connect time, used for client-side
    /// validation before any write.
    fn field_enums(&self) -> &FieldEnums;

    fn get_ticket(&self, id: u64) -> Result<TicketRecord, GatewayError>;

    /// Resolve `query` to ids, then fetch them all in one batched round
    /// trip. Result order matches id order one-to-one.
    fn query_tickets(&self, query: &str) -> Result<Vec<TicketRecord>, GatewayError>;

    /// Validate `fields` exhaustively, then submit. Returns the new id.
    /// Nothing is sent if validation fails.
    fn create_ticket(
        &self,
        summary: &str,
        description: &str,
        fields: &FieldMap,
    ) -> Result<u64, GatewayError>;

    /// Submit `record.diff()` plus `comment`. The record itself is not
    /// mutated; on success the caller rebases it.
    fn save_ticket(&self, record: &TicketRecord, comment: &str) -> Result<(), GatewayError>;

    fn changelog(&self, id: u64) -> Result<Vec<ChangeEvent>, GatewayError>;

    /// Fetch several changelogs in one batched round trip, paired with
    /// their ids in request order.
    fn changelogs(&self, ids: &[u64]) -> Result<Vec<(u64, Vec<ChangeEvent>)>, GatewayError>;
}
