//! In-memory gateway fake shared by command and shell tests.

use std::cell::RefCell;
use std::collections::BTreeMap;

use tix_core::changelog::ChangeEvent;
use tix_core::error::GatewayError;
use tix_core::gateway::{CapabilitySet, TicketGateway};
use tix_core::record::{FieldMap, TicketRecord};
use tix_core::validate::FieldEnums;

/// Everything the shell can talk to, recorded for assertions.
pub struct MockGateway {
    capabilities: CapabilitySet,
    enums: FieldEnums,
    pub tickets: BTreeMap<u64, TicketRecord>,
    pub events: BTreeMap<u64, Vec<ChangeEvent>>,
    /// Method-name log of every call, in order.
    pub calls: RefCell<Vec<String>>,
    pub queries: RefCell<Vec<String>>,
    /// `(id, comment, submitted diff)` per save.
    pub saves: RefCell<Vec<(u64, String, FieldMap)>>,
    /// `(summary, description, fields)` per create.
    pub creates: RefCell<Vec<(String, String, FieldMap)>>,
    pub next_id: u64,
}

pub const ALL_CAPABILITIES: [&str; 5] = [
    "ticket.get",
    "ticket.query",
    "ticket.update",
    "ticket.create",
    "ticket.changelog",
];

impl MockGateway {
    pub fn with_capabilities(names: &[&str]) -> Self {
        Self {
            capabilities: CapabilitySet::new(names.iter().map(|name| (*name).to_string())),
            enums: FieldEnums::default(),
            tickets: BTreeMap::new(),
            events: BTreeMap::new(),
            calls: RefCell::new(Vec::new()),
            queries: RefCell::new(Vec::new()),
            saves: RefCell::new(Vec::new()),
            creates: RefCell::new(Vec::new()),
            next_id: 500,
        }
    }

    pub fn with_all_capabilities() -> Self {
        Self::with_capabilities(&ALL_CAPABILITIES)
    }

    pub fn with_enums(mut self, enums: FieldEnums) -> Self {
        self.enums = enums;
        self
    }

    pub fn with_ticket(mut self, id: u64, fields: &[(&str, &str)]) -> Self {
        let map: FieldMap = fields
            .iter()
            .map(|(name, value)| ((*name).to_string(), (*value).to_string()))
            .collect();
        self.tickets
            .insert(id, TicketRecord::new(id, None, None, map).unwrap());
        self
    }

    pub fn with_events(mut self, id: u64, events: Vec<ChangeEvent>) -> Self {
        self.events.insert(id, events);
        self
    }

    fn log(&self, method: &str) {
        self.calls.borrow_mut().push(method.to_string());
    }
}

impl TicketGateway for MockGateway {
    fn capabilities(&self) -> &CapabilitySet {
        &self.capabilities
    }

    fn field_enums(&self) -> &FieldEnums {
        &self.enums
    }

    fn get_ticket(&self, id: u64) -> Result<TicketRecord, GatewayError> {
        self.log("ticket.get");
        self.tickets
            .get(&id)
            .cloned()
            .ok_or(GatewayError::NotFound { id })
    }

    fn query_tickets(&self, query: &str) -> Result<Vec<TicketRecord>, GatewayError> {
        self.log("ticket.query");
        self.queries.borrow_mut().push(query.to_string());
        Ok(self.tickets.values().cloned().collect())
    }

    fn create_ticket(
        &self,
        summary: &str,
        description: &str,
        fields: &FieldMap,
    ) -> Result<u64, GatewayError> {
        self.enums.validate(fields)?;
        self.log("ticket.create");
        self.creates.borrow_mut().push((
            summary.to_string(),
            description.to_string(),
            fields.clone(),
        ));
        Ok(self.next_id)
    }

    fn save_ticket(&self, record: &TicketRecord, comment: &str) -> Result<(), GatewayError> {
        let Some(id) = record.id() else {
            return Err(GatewayError::Transport("draft record".to_string()));
        };
        self.enums.validate(record.fields())?;
        self.log("ticket.update");
        self.saves
            .borrow_mut()
            .push((id, comment.to_string(), record.diff()));
        Ok(())
    }

    fn changelog(&self, id: u64) -> Result<Vec<ChangeEvent>, GatewayError> {
        self.log("ticket.changelog");
        self.events
            .get(&id)
            .cloned()
            .ok_or(GatewayError::NotFound { id })
    }

    fn changelogs(&self, ids: &[u64]) -> Result<Vec<(u64, Vec<ChangeEvent>)>, GatewayError> {
        ids.iter().map(|id| Ok((*id, self.changelog(*id)?))).collect()
    }
}
