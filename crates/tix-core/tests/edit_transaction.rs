//! End-to-end edit transactions: fetch-shaped record, scripted editor,
//! session delta, save acknowledgement, snapshot rebase.

#![cfg(unix)]

use std::fs;
use std::os::unix::fs::PermissionsExt;
use std::path::PathBuf;

use tix_core::edit::{EditOutcome, EditSession};
use tix_core::record::{FieldMap, TicketRecord};

fn scripted_editor(dir: &tempfile::TempDir, body: &str) -> PathBuf {
    let path = dir.path().join("editor.sh");
    fs::write(&path, format!("#!/bin/sh\n{body}\n")).unwrap();
    fs::set_permissions(&path, fs::Permissions::from_mode(0o755)).unwrap();
    path
}

fn fetched_record() -> TicketRecord {
    TicketRecord::new(
        101,
        None,
        None,
        FieldMap::from([
            ("summary".to_string(), "Search returns stale results".to_string()),
            ("status".to_string(), "new".to_string()),
            ("priority".to_string(), "normal".to_string()),
        ]),
    )
    .unwrap()
}

#[test]
fn applied_session_feeds_the_record_and_rebase_resets_the_diff() {
    let dir = tempfile::TempDir::new().unwrap();
    let editor = scripted_editor(
        &dir,
        r#"sed -i -e 's/^status=new$/status=accepted/' -e 's/^comment=.*$/comment=taking this/' "$1""#,
    );

    let mut record = fetched_record();
    let session = EditSession::new(Some(editor.to_string_lossy().into_owned()));

    let EditOutcome::Applied { delta, comment } = session.run(record.fields()).unwrap() else {
        panic!("expected an applied outcome");
    };
    assert_eq!(comment, "taking this");

    record.apply(&delta).unwrap();
    assert_eq!(
        record.diff(),
        FieldMap::from([("status".to_string(), "accepted".to_string())])
    );

    // The gateway acknowledged: the snapshot must move to the saved values,
    // or a second edit would diff against stale data.
    record.rebase();
    assert!(record.diff().is_empty());

    record.set_field("priority", "high").unwrap();
    assert_eq!(
        record.diff(),
        FieldMap::from([("priority".to_string(), "high".to_string())])
    );
}

#[test]
fn aborted_session_leaves_the_record_untouched() {
    let dir = tempfile::TempDir::new().unwrap();
    let editor = scripted_editor(&dir, "exit 0");

    let record = fetched_record();
    let session = EditSession::new(Some(editor.to_string_lossy().into_owned()));

    assert_eq!(session.run(record.fields()).unwrap(), EditOutcome::Aborted);
    assert!(record.diff().is_empty());
}

#[test]
fn multi_line_description_survives_the_round_trip() {
    let dir = tempfile::TempDir::new().unwrap();
    // Append a description whose value spans three lines.
    let editor = scripted_editor(
        &dir,
        r#"printf 'description=seen on:\n - staging\n - prod\n' >> "$1""#,
    );

    let record = fetched_record();
    let session = EditSession::new(Some(editor.to_string_lossy().into_owned()));

    let EditOutcome::Applied { delta, .. } = session.run(record.fields()).unwrap() else {
        panic!("expected an applied outcome");
    };
    assert_eq!(
        delta.get("description").map(String::as_str),
        Some("seen on:\n - staging\n - prod")
    );
}
