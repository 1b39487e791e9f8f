//! Core engine for the tix ticket shell: change-tracking records, the
//! flat-text edit codec, edit-session transactions, alias expansion, and the
//! gateway seam to the remote tracker.

pub mod alias;
pub mod changelog;
pub mod codec;
pub mod config;
pub mod edit;
pub mod error;
pub mod gateway;
pub mod record;
pub mod validate;

pub use alias::AliasExpander;
pub use changelog::ChangeEvent;
pub use config::{Config, SiteConfig};
pub use edit::{EditOutcome, EditSession};
pub use error::{ConfigError, EditError, GatewayError, RecordError};
pub use gateway::{CapabilitySet, TicketGateway};
pub use record::{FieldMap, TicketRecord};
pub use validate::{FieldEnums, ValidationError, Violation};
