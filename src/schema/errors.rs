//! Validation error map
//!
//! A draft either validates completely or yields one message per failing
//! field. Nothing is partially applied.

use std::collections::BTreeMap;
use std::fmt;

use serde::Serialize;

use super::types::FieldName;

/// Field → message map produced by a failed validation.
///
/// Ordered by field declaration order so output is deterministic.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
#[serde(transparent)]
pub struct ValidationErrors(BTreeMap<FieldName, String>);

impl ValidationErrors {
    pub fn new() -> Self {
        Self::default()
    }

    /// Stable error code for the whole map
    pub fn code(&self) -> &'static str {
        "DAILY_VALIDATION_FAILED"
    }

    /// Records a message for `field`. The first message for a field wins.
    pub fn insert(&mut self, field: FieldName, message: impl Into<String>) {
        self.0.entry(field).or_insert_with(|| message.into());
    }

    /// Folds `other` in. Fields already present keep their message.
    pub fn merge(&mut self, other: ValidationErrors) {
        for (field, message) in other.0 {
            self.insert(field, message);
        }
    }

    pub fn get(&self, field: FieldName) -> Option<&str> {
        self.0.get(&field).map(String::as_str)
    }

    pub fn contains(&self, field: FieldName) -> bool {
        self.0.contains_key(&field)
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn fields(&self) -> impl Iterator<Item = FieldName> + '_ {
        self.0.keys().copied()
    }

    pub fn iter(&self) -> impl Iterator<Item = (FieldName, &str)> {
        self.0.iter().map(|(field, message)| (*field, message.as_str()))
    }
}

impl fmt::Display for ValidationErrors {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "validation failed")?;
        let mut sep = ": ";
        for (field, message) in self.iter() {
            write!(f, "{}{}: {}", sep, field, message)?;
            sep = "; ";
        }
        Ok(())
    }
}

impl std::error::Error for ValidationErrors {}
