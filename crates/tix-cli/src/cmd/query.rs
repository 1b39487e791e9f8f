//! `query <expr>` — list tickets matching a query expression.

use std::fmt::Write as _;
use std::io::Write as _;

use serde_json::Value;

use crate::output;
use crate::shell::Session;

pub fn run(session: &mut Session<'_>, args: &[String]) -> anyhow::Result<()> {
    if args.is_empty() {
        anyhow::bail!("usage: query <expr>");
    }
    let expr = args.join(" ");
    let tickets = session.gateway.query_tickets(&expr)?;

    if session.json {
        let values: Vec<Value> = tickets.iter().map(output::ticket_json).collect();
        return output::render_json(session.out, &Value::Array(values));
    }

    if tickets.is_empty() {
        writeln!(session.out, "query returned no results")?;
        return Ok(());
    }

    let mut block = String::new();
    for ticket in &tickets {
        let id = ticket.id().unwrap_or_default();
        let status = ticket.field("status").unwrap_or("-");
        let summary = ticket.field("summary").unwrap_or("");
        writeln!(block, "{id:>5}: [{status:^9}] {summary}")?;
    }
    session.emit(&block)?;
    Ok(())
}
