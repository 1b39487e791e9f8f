//! `view <id>` — show every field of one ticket.

use std::io::Write as _;

use tix_core::error::GatewayError;

use crate::cmd::parse_ticket_id;
use crate::output;
use crate::shell::Session;

const TIME_FORMAT: &str = "%Y-%m-%d %H:%M";

pub fn run(session: &mut Session<'_>, args: &[String]) -> anyhow::Result<()> {
    let [token] = args else {
        anyhow::bail!("usage: view <id>");
    };
    let id = parse_ticket_id(token)?;

    let ticket = match session.gateway.get_ticket(id) {
        Ok(ticket) => ticket,
        Err(GatewayError::NotFound { .. }) => {
            writeln!(session.out, "ticket #{id} not found")?;
            return Ok(());
        }
        Err(err) => return Err(err.into()),
    };

    if session.json {
        return output::render_json(session.out, &output::ticket_json(&ticket));
    }

    let mut block = Vec::new();
    writeln!(block, "Ticket #{id}")?;
    output::rule(&mut block)?;
    if let Some(created) = ticket.created() {
        output::kv(&mut block, "created", created.format(TIME_FORMAT).to_string())?;
    }
    if let Some(modified) = ticket.modified() {
        output::kv(&mut block, "modified", modified.format(TIME_FORMAT).to_string())?;
    }
    for (name, value) in ticket.fields() {
        output::kv(&mut block, name, value)?;
    }
    session.emit(&String::from_utf8_lossy(&block))?;
    Ok(())
}

#[cfg(test)]
mod tests {
    use crate::shell::Shell;
    use crate::testutil::MockGateway;
    use tix_core::config::Config;

    fn shell_output(gateway: &MockGateway, line: &str) -> (String, anyhow::Result<()>) {
        let mut out = Vec::new();
        let result = {
            let mut shell =
                Shell::new(&Config::default(), gateway, None, false, false, &mut out).unwrap();
            shell.run_line(line)
        };
        (String::from_utf8(out).unwrap(), result)
    }

    #[test]
    fn shows_all_fields() {
        let gateway = MockGateway::with_all_capabilities().with_ticket(
            42,
            &[
                ("summary", "Broken link"),
                ("status", "new"),
                ("priority", "normal"),
            ],
        );
        let (text, result) = shell_output(&gateway, "view 42");
        result.unwrap();
        assert!(text.contains("Ticket #42"));
        assert!(text.contains("summary: Broken link"));
        assert!(text.contains("status: new"));
        assert!(text.contains("priority: normal"));
    }

    #[test]
    fn hash_prefixed_id_works() {
        let gateway =
            MockGateway::with_all_capabilities().with_ticket(42, &[("summary", "x")]);
        let (text, result) = shell_output(&gateway, "view #42");
        result.unwrap();
        assert!(text.contains("Ticket #42"));
    }

    #[test]
    fn missing_ticket_reports_not_found_without_failing() {
        let gateway = MockGateway::with_all_capabilities();
        let (text, result) = shell_output(&gateway, "view 999");
        result.unwrap();
        assert!(text.contains("ticket #999 not found"));
    }

    #[test]
    fn usage_error_without_id() {
        let gateway = MockGateway::with_all_capabilities();
        let (_, result) = shell_output(&gateway, "view");
        assert!(result.unwrap_err().to_string().contains("usage: view"));
    }

    #[test]
    fn non_numeric_id_is_rejected() {
        let gateway = MockGateway::with_all_capabilities();
        let (_, result) = shell_output(&gateway, "view abc");
        assert!(result.unwrap_err().to_string().contains("not a ticket id"));
        assert!(gateway.calls.borrow().is_empty());
    }
}
