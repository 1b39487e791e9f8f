//! Rendering helpers shared by all shell commands: human key/value output,
//! JSON parity, error rendering with stable codes, and the pager hand-off.

use std::io::{self, Write};
use std::process::{Command, Stdio};

use serde_json::json;

use tix_core::error::{ConfigError, EditError, GatewayError, RecordError};
use tix_core::record::TicketRecord;
use tix_core::validate::ValidationError;

/// Shared width for human output separators.
pub const RULE_WIDTH: usize = 60;

/// Write a horizontal separator.
pub fn rule(w: &mut dyn Write) -> io::Result<()> {
    writeln!(w, "{:-<width$}", "", width = RULE_WIDTH)
}

/// Render a left-aligned key/value line.
pub fn kv(w: &mut dyn Write, key: &str, value: impl AsRef<str>) -> io::Result<()> {
    writeln!(w, "{:>14}: {}", key, value.as_ref())
}

/// Pretty-print a JSON value followed by a newline.
pub fn render_json(w: &mut dyn Write, value: &serde_json::Value) -> anyhow::Result<()> {
    serde_json::to_writer_pretty(&mut *w, value)?;
    writeln!(w)?;
    Ok(())
}

/// The JSON shape of one ticket, shared by `query` and `view`.
#[must_use]
pub fn ticket_json(record: &TicketRecord) -> serde_json::Value {
    json!({
        "id": record.id(),
        "created": record.created().map(|stamp| stamp.to_rfc3339()),
        "modified": record.modified().map(|stamp| stamp.to_rfc3339()),
        "fields": record.fields(),
    })
}

/// Print a block directly, or through `$PAGER` when it is tall enough and
/// stdout is interactive. Pager failure falls back to direct printing.
pub fn emit_block(
    w: &mut dyn Write,
    paging: bool,
    threshold: usize,
    text: &str,
) -> io::Result<()> {
    if paging && text.lines().count() > threshold && page(text).is_ok() {
        return Ok(());
    }
    w.write_all(text.as_bytes())
}

fn page(text: &str) -> io::Result<()> {
    let pager = std::env::var("PAGER").unwrap_or_else(|_| "less".to_string());
    let words = tix_core::alias::split_args(&pager);
    let Some((program, args)) = words.split_first() else {
        return Err(io::Error::other("empty pager command"));
    };

    let mut child = Command::new(program)
        .args(args)
        .stdin(Stdio::piped())
        .spawn()?;
    if let Some(stdin) = child.stdin.as_mut() {
        stdin.write_all(text.as_bytes())?;
    }
    child.wait()?;
    Ok(())
}

/// A rendered error: message plus optional stable code and hint.
#[derive(Debug)]
pub struct CliError {
    pub message: String,
    pub code: Option<String>,
    pub hint: Option<String>,
}

impl CliError {
    pub fn new(message: impl Into<String>) -> Self {
        Self {
            message: message.into(),
            code: None,
            hint: None,
        }
    }
}

/// Pull code and hint out of the known error kinds; anything else renders
/// as a bare message.
#[must_use]
pub fn classify(err: &anyhow::Error) -> CliError {
    if let Some(gateway) = err.downcast_ref::<GatewayError>() {
        return CliError {
            message: gateway.to_string(),
            code: Some(gateway.error_code().to_string()),
            hint: gateway.hint().map(str::to_string),
        };
    }
    if let Some(record) = err.downcast_ref::<RecordError>() {
        return CliError {
            message: record.to_string(),
            code: Some(record.error_code().to_string()),
            hint: record.hint().map(str::to_string),
        };
    }
    if let Some(edit) = err.downcast_ref::<EditError>() {
        return CliError {
            message: edit.to_string(),
            code: Some(edit.error_code().to_string()),
            hint: edit.hint().map(str::to_string),
        };
    }
    if let Some(config) = err.downcast_ref::<ConfigError>() {
        return CliError {
            message: config.to_string(),
            code: Some(config.error_code().to_string()),
            hint: config.hint().map(str::to_string),
        };
    }
    if let Some(validation) = err.downcast_ref::<ValidationError>() {
        return CliError {
            message: validation.to_string(),
            code: Some("E2201".to_string()),
            hint: Some("Fix the listed field values and resubmit.".to_string()),
        };
    }
    CliError::new(err.to_string())
}

/// Render an error to stderr in the requested format.
pub fn render_error(json_mode: bool, error: &CliError) {
    let stderr = io::stderr();
    let mut out = stderr.lock();
    if json_mode {
        let wrapper = json!({
            "error": {
                "message": error.message,
                "code": error.code,
                "hint": error.hint,
            }
        });
        let _ = serde_json::to_writer_pretty(&mut out, &wrapper);
        let _ = writeln!(out);
    } else {
        let _ = writeln!(out, "error: {}", error.message.trim_end());
        if let Some(ref hint) = error.hint {
            let _ = writeln!(out, "  hint: {hint}");
        }
    }
}
