//! Schema engine for daily update records
//!
//! Declares what a valid record is and checks drafts against it.
//!
//! # Design Principles
//!
//! - Every field rule is evaluated in isolation
//! - helpDetails is required only when needsHelp is Yes, decided at
//!   validation time and never stored as a flag
//! - Validation is pure and total: an error map, never a panic
//! - Ids are not assigned here; the record store owns identity

mod errors;
mod types;
mod validator;

pub use errors::ValidationErrors;
pub use types::{DailyUpdate, Draft, FieldName, NeedsHelp, Record, RecordId, ValidRecord, MAX_IMAGES};
pub use validator::{is_blank_rich, read_draft, validate, SchemaValidator};
