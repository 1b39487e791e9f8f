use std::path::PathBuf;

use thiserror::Error;

use crate::validate::ValidationError;

/// Construction or mutation failure on a ticket record.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum RecordError {
    /// A reserved key (`id`, `created`, `modified`) appeared in a field map.
    #[error("reserved field '{name}' cannot be stored as ticket data")]
    ReservedField { name: String },

    /// An attempt to write a structural field through the generic setter.
    #[error("field '{name}' is immutable")]
    ImmutableField { name: String },
}

impl RecordError {
    /// Stable code identifier (`E####`) for machine parsing.
    #[must_use]
    pub const fn error_code(&self) -> &'static str {
        match self {
            Self::ReservedField { .. } => "E2101",
            Self::ImmutableField { .. } => "E2102",
        }
    }

    /// Optional remediation hint surfaced by the CLI error renderer.
    #[must_use]
    pub const fn hint(&self) -> Option<&'static str> {
        match self {
            Self::ReservedField { .. } => {
                Some("id/created/modified are carried out of band; remove them from the field map.")
            }
            Self::ImmutableField { .. } => {
                Some("The server owns this field; edit a regular ticket field instead.")
            }
        }
    }
}

/// A genuine failure inside an edit-session round trip.
///
/// User cancellation and a missing editor are *not* errors; see
/// [`EditOutcome`](crate::edit::EditOutcome).
#[derive(Debug, Error)]
pub enum EditError {
    #[error("edit file error: {0}")]
    Io(#[from] std::io::Error),

    #[error("failed to launch editor '{editor}': {message}")]
    EditorLaunch { editor: String, message: String },
}

impl EditError {
    #[must_use]
    pub const fn error_code(&self) -> &'static str {
        match self {
            Self::Io(_) => "E4001",
            Self::EditorLaunch { .. } => "E4002",
        }
    }

    #[must_use]
    pub const fn hint(&self) -> Option<&'static str> {
        match self {
            Self::Io(_) => None,
            Self::EditorLaunch { .. } => {
                Some("Check the `editor` setting in your config, or $VISUAL / $EDITOR.")
            }
        }
    }
}

/// A fault reported by (or on the way to) the remote ticket service.
#[derive(Debug, Error)]
pub enum GatewayError {
    /// The server rejected a call. Code and message are surfaced verbatim.
    #[error("remote call failed (code {code}): {message}")]
    CallFailed { code: i64, message: String },

    /// The identifier resolved to nothing.
    #[error("ticket #{id} not found")]
    NotFound { id: u64 },

    /// The bounded wait on a round trip elapsed.
    #[error("remote call timed out")]
    Timeout,

    /// Connection-level failure before any response arrived.
    #[error("transport error: {0}")]
    Transport(String),

    /// Client-side field validation rejected the submission.
    #[error(transparent)]
    Validation(#[from] ValidationError),
}

impl GatewayError {
    #[must_use]
    pub const fn error_code(&self) -> &'static str {
        match self {
            Self::CallFailed { .. } => "E5001",
            Self::NotFound { .. } => "E2001",
            Self::Timeout => "E5003",
            Self::Transport(_) => "E5002",
            Self::Validation(_) => "E2201",
        }
    }

    #[must_use]
    pub const fn hint(&self) -> Option<&'static str> {
        match self {
            Self::CallFailed { .. } => None,
            Self::NotFound { .. } => Some("Check the ticket id with `query`."),
            Self::Timeout => Some("Retry, or raise `timeout_secs` in your config."),
            Self::Transport(_) => Some("Check the site URL and your network connection."),
            Self::Validation(_) => Some("Fix the listed field values and resubmit."),
        }
    }
}

/// Configuration loading and resolution failures.
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("failed to read config {path}: {source}")]
    Read {
        path: PathBuf,
        source: std::io::Error,
    },

    #[error("failed to parse config {path}: {source}")]
    Parse {
        path: PathBuf,
        source: toml::de::Error,
    },

    #[error("unknown site '{name}'")]
    UnknownSite { name: String },

    #[error("no site configured; add a [sites.<name>] table or pass --site")]
    NoSite,

    /// Aliases may never shadow built-in command names.
    #[error("aliases shadow built-in commands: {}", names.join(", "))]
    ReservedAlias { names: Vec<String> },
}

impl ConfigError {
    #[must_use]
    pub const fn error_code(&self) -> &'static str {
        match self {
            Self::Read { .. } => "E1003",
            Self::Parse { .. } => "E1002",
            Self::UnknownSite { .. } => "E1004",
            Self::NoSite => "E1005",
            Self::ReservedAlias { .. } => "E1006",
        }
    }

    #[must_use]
    pub const fn hint(&self) -> Option<&'static str> {
        match self {
            Self::Read { .. } | Self::Parse { .. } => {
                Some("Fix syntax in ~/.config/tix/config.toml and retry.")
            }
            Self::UnknownSite { .. } => Some("List configured sites under [sites.<name>]."),
            Self::NoSite => Some("Set `default_site` or pass --site <name>."),
            Self::ReservedAlias { .. } => Some("Rename the offending [aliases] entries."),
        }
    }
}
