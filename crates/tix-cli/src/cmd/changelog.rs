//! `changelog <id> [id ...]` — show ticket history, batched when several
//! ids are given.

use std::fmt::Write as _;
use std::io::Write as _;

use serde_json::json;

use tix_core::changelog::ChangeEvent;
use tix_core::error::GatewayError;

use crate::cmd::parse_ticket_id;
use crate::output;
use crate::shell::Session;

const TIME_FORMAT: &str = "%Y-%m-%d %H:%M";

pub fn run(session: &mut Session<'_>, args: &[String]) -> anyhow::Result<()> {
    if args.is_empty() {
        anyhow::bail!("usage: changelog <id> [id ...]");
    }
    let ids = args
        .iter()
        .map(|token| parse_ticket_id(token))
        .collect::<anyhow::Result<Vec<u64>>>()?;

    let logs = if let [id] = ids.as_slice() {
        match session.gateway.changelog(*id) {
            Ok(events) => vec![(*id, events)],
            Err(GatewayError::NotFound { .. }) => {
                writeln!(session.out, "ticket #{id} not found")?;
                return Ok(());
            }
            Err(err) => return Err(err.into()),
        }
    } else {
        session.gateway.changelogs(&ids)?
    };

    if session.json {
        let value = json!(
            logs.iter()
                .map(|(id, events)| json!({"id": id, "events": events}))
                .collect::<Vec<_>>()
        );
        return output::render_json(session.out, &value);
    }

    let mut block = String::new();
    for (id, events) in &logs {
        writeln!(block, "Changelog for ticket #{id}")?;
        if events.is_empty() {
            writeln!(block, "  (no changes recorded)")?;
            continue;
        }
        for event in events {
            writeln!(block, "  {}", format_event(event))?;
        }
    }
    session.emit(&block)?;
    Ok(())
}

fn format_event(event: &ChangeEvent) -> String {
    let stamp = event.timestamp.format(TIME_FORMAT);
    if event.old_value.is_empty() {
        format!(
            "{stamp}  {:<12} {}: {}",
            event.author, event.field, event.new_value
        )
    } else {
        format!(
            "{stamp}  {:<12} {}: {} -> {}",
            event.author, event.field, event.old_value, event.new_value
        )
    }
}
