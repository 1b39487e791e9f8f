//! Shell command handlers, one module per command.

pub mod changelog;
pub mod create;
pub mod edit;
pub mod query;
pub mod view;

/// Parse a ticket id argument; a leading `#` is tolerated.
pub fn parse_ticket_id(token: &str) -> anyhow::Result<u64> {
    let digits = token.strip_prefix('#').unwrap_or(token);
    digits
        .parse()
        .map_err(|_| anyhow::anyhow!("'{token}' is not a ticket id"))
}
