//! `create <summary>` — draft a new ticket in the editor and submit it.

use std::io::Write as _;

use tix_core::edit::{EditOutcome, EditSession};
use tix_core::record::FieldMap;

use crate::shell::Session;

/// Fields offered in the creation template, summary first.
const TEMPLATE_FIELDS: [&str; 8] = [
    "reporter",
    "description",
    "type",
    "priority",
    "component",
    "milestone",
    "version",
    "keywords",
];

pub fn run(session: &mut Session<'_>, args: &[String]) -> anyhow::Result<()> {
    let summary = args.join(" ");
    if summary.is_empty() {
        anyhow::bail!("usage: create <summary>");
    }

    let mut template = FieldMap::from([("summary".to_string(), summary)]);
    for field in TEMPLATE_FIELDS {
        template.insert(field.to_string(), String::new());
    }

    let editor = EditSession::new(session.editor.clone());
    let delta = match editor.run(&template)? {
        EditOutcome::NoEditor => {
            writeln!(
                session.out,
                "no editor configured; set `editor` in your config or $EDITOR"
            )?;
            return Ok(());
        }
        EditOutcome::Aborted => {
            writeln!(session.out, "ticket creation aborted")?;
            return Ok(());
        }
        // The comment placeholder makes no sense on a ticket that does not
        // exist yet; whatever was typed there is dropped.
        EditOutcome::Applied { delta, .. } => delta,
    };

    let mut fields = template;
    fields.extend(delta);
    let summary = fields.remove("summary").unwrap_or_default();
    let description = fields.remove("description").unwrap_or_default();
    if summary.is_empty() || description.is_empty() {
        anyhow::bail!("summary and description are required to create a ticket");
    }
    fields.retain(|_, value| !value.is_empty());

    let id = session.gateway.create_ticket(&summary, &description, &fields)?;
    writeln!(session.out, "created ticket #{id}: {summary}")?;
    Ok(())
}

#[cfg(test)]
mod tests {
    use crate::shell::Shell;
    use crate::testutil::MockGateway;
    use tix_core::config::Config;

    fn run_shell(
        gateway: &MockGateway,
        editor: Option<String>,
        line: &str,
    ) -> (String, anyhow::Result<()>) {
        let mut out = Vec::new();
        let result = {
            let mut shell =
                Shell::new(&Config::default(), gateway, editor, false, false, &mut out).unwrap();
            shell.run_line(line)
        };
        (String::from_utf8(out).unwrap(), result)
    }

    #[test]
    fn usage_error_without_summary() {
        let gateway = MockGateway::with_all_capabilities();
        let (_, result) = run_shell(&gateway, None, "create");
        assert!(result.unwrap_err().to_string().contains("usage: create"));
    }

    #[test]
    fn no_editor_is_reported_without_remote_calls() {
        let gateway = MockGateway::with_all_capabilities();
        let (text, result) = run_shell(&gateway, None, "create Login times out");
        result.unwrap();
        assert!(text.contains("no editor configured"));
        assert!(gateway.calls.borrow().is_empty());
    }

    #[cfg(unix)]
    mod with_scripted_editor {
        use super::run_shell;
        use crate::testutil::MockGateway;
        use std::fs;
        use std::os::unix::fs::PermissionsExt;
        use tix_core::validate::FieldEnums;

        fn scripted_editor(dir: &tempfile::TempDir, body: &str) -> String {
            let path = dir.path().join("editor.sh");
            fs::write(&path, format!("#!/bin/sh\n{body}\n")).unwrap();
            fs::set_permissions(&path, fs::Permissions::from_mode(0o755)).unwrap();
            path.to_string_lossy().into_owned()
        }

        #[test]
        fn untouched_template_aborts_creation() {
            let dir = tempfile::TempDir::new().unwrap();
            let gateway = MockGateway::with_all_capabilities();
            let editor = scripted_editor(&dir, "exit 0");

            let (text, result) = run_shell(&gateway, Some(editor), "create Login times out");
            result.unwrap();
            assert!(text.contains("ticket creation aborted"));
            assert!(gateway.creates.borrow().is_empty());
        }

        #[test]
        fn filled_template_submits_summary_description_and_fields() {
            let dir = tempfile::TempDir::new().unwrap();
            let gateway = MockGateway::with_all_capabilities();
            let editor = scripted_editor(
                &dir,
                r#"sed -i -e 's/^description=$/description=Session cookie expires early./' -e 's/^priority=$/priority=high/' "$1""#,
            );

            let (text, result) = run_shell(&gateway, Some(editor), "create Login times out");
            result.unwrap();
            assert!(text.contains("created ticket #500: Login times out"));

            let creates = gateway.creates.borrow();
            let (summary, description, fields) = &creates[0];
            assert_eq!(summary, "Login times out");
            assert_eq!(description, "Session cookie expires early.");
            assert_eq!(fields.get("priority").map(String::as_str), Some("high"));
            // Untouched empty template fields are not submitted.
            assert!(!fields.contains_key("milestone"));
            assert!(!fields.contains_key("summary"));
        }

        #[test]
        fn missing_description_is_rejected_before_any_call() {
            let dir = tempfile::TempDir::new().unwrap();
            let gateway = MockGateway::with_all_capabilities();
            let editor = scripted_editor(
                &dir,
                r#"sed -i 's/^priority=$/priority=high/' "$1""#,
            );

            let (_, result) = run_shell(&gateway, Some(editor), "create Login times out");
            let message = result.unwrap_err().to_string();
            assert!(message.contains("summary and description are required"));
            assert!(gateway.calls.borrow().is_empty());
        }

        #[test]
        fn illegal_enum_value_aborts_with_the_full_violation_list() {
            let dir = tempfile::TempDir::new().unwrap();
            let enums = FieldEnums::new([(
                "priority".to_string(),
                vec!["low".to_string(), "normal".to_string(), "high".to_string()],
            )]);
            let gateway = MockGateway::with_all_capabilities().with_enums(enums);
            let editor = scripted_editor(
                &dir,
                r#"sed -i -e 's/^description=$/description=details/' -e 's/^priority=$/priority=urgent/' "$1""#,
            );

            let (_, result) = run_shell(&gateway, Some(editor), "create Login times out");
            let message = result.unwrap_err().to_string();
            assert!(message.contains("priority: 'urgent' is not one of [low, normal, high]"));
            // Validation failed client-side: nothing was submitted.
            assert!(gateway.creates.borrow().is_empty());
            assert!(gateway.calls.borrow().is_empty());
        }
    }
}
