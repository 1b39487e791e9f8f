//! The edit-session round trip: serialize a draft to a temp file, suspend on
//! an external editor, re-parse whatever came back, and reduce it to the
//! delta the user actually touched.
//!
//! Cancellation ("saved nothing") and a missing editor are ordinary outcomes,
//! not errors; see [`EditOutcome`].

use std::io::Write;
use std::process::Command;
use std::{fs, process};

use tempfile::NamedTempFile;
use tracing::debug;

use crate::codec;
use crate::error::EditError;
use crate::record::FieldMap;

/// The injected annotation field. Stripped from the parsed result and never
/// submitted as ticket data.
pub const COMMENT_FIELD: &str = "comment";

/// Placeholder instruction shown in the editor. Returned untouched it counts
/// as no comment at all.
pub const COMMENT_PLACEHOLDER: &str = "Describe this change (optional)";

/// Result of one edit transaction.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum EditOutcome {
    /// The user saved changes: the session delta plus the extracted comment.
    Applied { delta: FieldMap, comment: String },
    /// The artifact's modification time never changed: nothing to submit.
    Aborted,
    /// No editor is configured; no artifact was created.
    NoEditor,
}

/// One edit transaction over a draft field map.
#[derive(Debug, Clone)]
pub struct EditSession {
    editor: Option<String>,
}

impl EditSession {
    /// `editor` is the resolved editor command line, or `None` when neither
    /// the config nor the environment names one.
    #[must_use]
    pub const fn new(editor: Option<String>) -> Self {
        Self { editor }
    }

    /// Run the round trip.
    ///
    /// The temp artifact lives only for the duration of the call and is
    /// removed on every exit path, including editor-launch failure.
    pub fn run(&self, draft: &FieldMap) -> Result<EditOutcome, EditError> {
        let Some(editor) = self.editor.as_deref() else {
            return Ok(EditOutcome::NoEditor);
        };

        let mut shown = draft.clone();
        shown.insert(COMMENT_FIELD.to_string(), COMMENT_PLACEHOLDER.to_string());
        let before_text = codec::serialize(&shown);
        // Diff against the parsed-back form of what was shown, so values the
        // codec normalizes (trailing whitespace) do not register as edits.
        let before_fields = codec::deserialize(&before_text);

        let mut file = NamedTempFile::with_prefix("tix-edit-")?;
        file.write_all(before_text.as_bytes())?;
        file.as_file().sync_all()?;
        let before_mtime = file.as_file().metadata()?.modified()?;

        run_editor(editor, file.path().to_string_lossy().as_ref())?;

        let after_mtime = fs::metadata(file.path())?.modified()?;
        if after_mtime == before_mtime {
            debug!("edit file untouched, aborting");
            return Ok(EditOutcome::Aborted);
        }

        let after_text = fs::read_to_string(file.path())?;
        let mut after_fields = codec::deserialize(&after_text);

        let mut comment = after_fields.remove(COMMENT_FIELD).unwrap_or_default();
        if comment == COMMENT_PLACEHOLDER {
            comment.clear();
        }

        let delta = session_delta(&before_fields, &after_fields);
        debug!(changed = delta.len(), "edit session applied");
        Ok(EditOutcome::Applied { delta, comment })
    }
}

/// Keys in `after` whose value differs from `before`, including keys the
/// user introduced. Keys the user deleted are treated as untouched.
#[must_use]
pub fn session_delta(before: &FieldMap, after: &FieldMap) -> FieldMap {
    after
        .iter()
        .filter(|(name, value)| before.get(*name) != Some(*value))
        .map(|(name, value)| (name.clone(), value.clone()))
        .collect()
}

/// Launch the editor on `path` and wait for it to exit.
///
/// The editor setting may carry arguments (`"code -w"`); it is split
/// quote-aware and the artifact path appended as the final argument.
fn run_editor(editor: &str, path: &str) -> Result<(), EditError> {
    let words = crate::alias::split_args(editor);
    let Some((program, args)) = words.split_first() else {
        return Err(EditError::EditorLaunch {
            editor: editor.to_string(),
            message: "empty editor command".to_string(),
        });
    };

    let status = Command::new(program)
        .args(args)
        .arg(path)
        .status()
        .map_err(|err| EditError::EditorLaunch {
            editor: editor.to_string(),
            message: err.to_string(),
        })?;

    if status.success() {
        Ok(())
    } else {
        Err(EditError::EditorLaunch {
            editor: editor.to_string(),
            message: exit_description(&status),
        })
    }
}

fn exit_description(status: &process::ExitStatus) -> String {
    status.code().map_or_else(
        || "terminated by signal".to_string(),
        |code| format!("exited with status {code}"),
    )
}
