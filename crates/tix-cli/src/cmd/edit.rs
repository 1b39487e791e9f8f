//! `edit <id> [field=value ...]` — the mutating heart of the shell.
//!
//! With trailing `field=value` pairs the editor is bypassed and the pairs
//! are the delta. Without them the full edit-session round trip runs:
//! fetch, serialize, suspend on the editor, re-parse, diff. Either way the
//! save submits only the touched fields, and the record is rebased once the
//! gateway acknowledges.

use std::io::Write as _;

use tix_core::edit::{EditOutcome, EditSession};
use tix_core::error::GatewayError;
use tix_core::record::FieldMap;

use crate::cmd::parse_ticket_id;
use crate::shell::Session;

pub fn run(session: &mut Session<'_>, args: &[String]) -> anyhow::Result<()> {
    let Some((token, assignments)) = args.split_first() else {
        anyhow::bail!("usage: edit <id> [field=value ...]");
    };
    let id = parse_ticket_id(token)?;

    let mut record = match session.gateway.get_ticket(id) {
        Ok(record) => record,
        Err(GatewayError::NotFound { .. }) => {
            writeln!(session.out, "ticket #{id} not found")?;
            return Ok(());
        }
        Err(err) => return Err(err.into()),
    };

    let (delta, comment) = if assignments.is_empty() {
        let editor = EditSession::new(session.editor.clone());
        match editor.run(record.fields())? {
            EditOutcome::NoEditor => {
                writeln!(
                    session.out,
                    "no editor configured; set `editor` in your config or $EDITOR"
                )?;
                return Ok(());
            }
            EditOutcome::Aborted => {
                writeln!(session.out, "no changes made to ticket #{id}")?;
                return Ok(());
            }
            EditOutcome::Applied { delta, comment } => (delta, comment),
        }
    } else {
        (parse_assignments(assignments)?, String::new())
    };

    if delta.is_empty() && comment.is_empty() {
        writeln!(session.out, "nothing to submit for ticket #{id}")?;
        return Ok(());
    }

    record.apply(&delta)?;
    session.gateway.save_ticket(&record, &comment)?;
    record.rebase();

    writeln!(
        session.out,
        "updated ticket #{id} ({} field{})",
        delta.len(),
        if delta.len() == 1 { "" } else { "s" }
    )?;
    Ok(())
}

/// Parse trailing `field=value` arguments into a delta.
fn parse_assignments(args: &[String]) -> anyhow::Result<FieldMap> {
    let mut delta = FieldMap::new();
    for arg in args {
        let Some((name, value)) = arg.split_once('=') else {
            anyhow::bail!("expected field=value, got '{arg}'");
        };
        if name.is_empty() {
            anyhow::bail!("expected field=value, got '{arg}'");
        }
        delta.insert(name.to_string(), value.to_string());
    }
    Ok(delta)
}
