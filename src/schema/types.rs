//! Record type definitions
//!
//! - `Draft`: an unvalidated candidate record, every field optional
//! - `DailyUpdate`: the field values of a record that passed validation
//! - `ValidRecord`: proof that a `DailyUpdate` came out of the validator
//! - `Record`: a persisted `DailyUpdate` with its assigned `RecordId`
//!
//! JSON field names are camelCase.

use std::fmt;

use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// Hard upper bound on attachments per record.
pub const MAX_IMAGES: usize = 5;

/// Answer to "Need any help?"
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum NeedsHelp {
    Yes,
    No,
}

impl NeedsHelp {
    /// Parses a raw form value. Case-insensitive, surrounding whitespace ignored.
    pub fn parse(raw: &str) -> Option<Self> {
        let trimmed = raw.trim();
        if trimmed.eq_ignore_ascii_case("yes") {
            Some(NeedsHelp::Yes)
        } else if trimmed.eq_ignore_ascii_case("no") {
            Some(NeedsHelp::No)
        } else {
            None
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            NeedsHelp::Yes => "Yes",
            NeedsHelp::No => "No",
        }
    }
}

impl fmt::Display for NeedsHelp {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Names of the validated fields, in declaration order.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum FieldName {
    Title,
    KeyUpdate,
    Summary,
    UpcomingPlan,
    NeedsHelp,
    HelpDetails,
    AdditionalMessage,
    Images,
}

impl FieldName {
    /// All fields in declaration order
    pub const ALL: [FieldName; 8] = [
        FieldName::Title,
        FieldName::KeyUpdate,
        FieldName::Summary,
        FieldName::UpcomingPlan,
        FieldName::NeedsHelp,
        FieldName::HelpDetails,
        FieldName::AdditionalMessage,
        FieldName::Images,
    ];

    /// JSON name of the field
    pub fn as_str(&self) -> &'static str {
        match self {
            FieldName::Title => "title",
            FieldName::KeyUpdate => "keyUpdate",
            FieldName::Summary => "summary",
            FieldName::UpcomingPlan => "upcomingPlan",
            FieldName::NeedsHelp => "needsHelp",
            FieldName::HelpDetails => "helpDetails",
            FieldName::AdditionalMessage => "additionalMessage",
            FieldName::Images => "images",
        }
    }
}

impl fmt::Display for FieldName {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// In-progress candidate record. Carries no id.
///
/// `needs_help` stays a raw string so a missing or unexpected answer reaches
/// the validator instead of failing deserialization.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct Draft {
    pub title: Option<String>,
    pub key_update: Option<String>,
    pub summary: Option<String>,
    pub upcoming_plan: Option<String>,
    pub needs_help: Option<String>,
    pub help_details: Option<String>,
    pub additional_message: Option<String>,
    pub images: Vec<String>,
}

impl From<&DailyUpdate> for Draft {
    fn from(update: &DailyUpdate) -> Self {
        Self {
            title: Some(update.title.clone()),
            key_update: Some(update.key_update.clone()),
            summary: Some(update.summary.clone()),
            upcoming_plan: Some(update.upcoming_plan.clone()),
            needs_help: Some(update.needs_help.as_str().to_string()),
            help_details: update.help_details.clone(),
            additional_message: update.additional_message.clone(),
            images: update.images.clone(),
        }
    }
}

/// Pre-fills an edit draft from a stored record.
impl From<&Record> for Draft {
    fn from(record: &Record) -> Self {
        Draft::from(&record.fields)
    }
}

/// Field values of a validated daily update.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DailyUpdate {
    pub title: String,
    pub key_update: String,
    pub summary: String,
    pub upcoming_plan: String,
    pub needs_help: NeedsHelp,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub help_details: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub additional_message: Option<String>,
    #[serde(default)]
    pub images: Vec<String>,
}

/// A `DailyUpdate` that passed the validator.
///
/// Only `SchemaValidator` constructs this, so holding one means the field
/// rules were checked.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ValidRecord(DailyUpdate);

impl ValidRecord {
    pub(crate) fn new(update: DailyUpdate) -> Self {
        Self(update)
    }

    pub fn fields(&self) -> &DailyUpdate {
        &self.0
    }

    pub fn into_inner(self) -> DailyUpdate {
        self.0
    }
}

/// Opaque record identifier.
///
/// Never a position: routes such as `/view/:id` hand the string back verbatim.
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct RecordId(String);

impl RecordId {
    /// Fresh random (UUID v4) identifier
    pub fn generate() -> Self {
        Self(Uuid::new_v4().to_string())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl From<&str> for RecordId {
    fn from(raw: &str) -> Self {
        Self(raw.to_string())
    }
}

impl From<String> for RecordId {
    fn from(raw: String) -> Self {
        Self(raw)
    }
}

impl fmt::Display for RecordId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

/// A persisted daily update.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Record {
    pub id: RecordId,
    #[serde(flatten)]
    pub fields: DailyUpdate,
}
