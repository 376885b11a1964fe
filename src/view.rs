//! Search/list projection and the single-record detail view.
//!
//! Both are pure functions of a collection snapshot. Nothing is cached; the
//! caller re-derives after every store mutation or query edit.

use serde::Serialize;

use crate::schema::{NeedsHelp, Record, RecordId};

/// One row of the update list.
///
/// `id` routes view/edit/delete actions. `position` is the 1-based row
/// number shown to the user and must never be used to address a record.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct DisplayRow {
    pub position: usize,
    pub id: RecordId,
    pub title: String,
}

/// Filter by case-insensitive title substring, keeping storage order.
///
/// A blank query returns the whole collection.
pub fn project(records: &[Record], query: &str) -> Vec<DisplayRow> {
    let needle = query.trim().to_lowercase();
    records
        .iter()
        .filter(|r| needle.is_empty() || r.fields.title.to_lowercase().contains(&needle))
        .enumerate()
        .map(|(i, r)| DisplayRow {
            position: i + 1,
            id: r.id.clone(),
            title: r.fields.title.clone(),
        })
        .collect()
}

/// Fields shown on the view screen
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct RecordDetail {
    pub id: RecordId,
    pub title: String,
    pub key_update: String,
    pub summary: String,
    pub upcoming_plan: String,
    pub needs_help: NeedsHelp,
    /// Only present when help was requested
    #[serde(skip_serializing_if = "Option::is_none")]
    pub help_details: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub additional_message: Option<String>,
    pub attachment_count: usize,
}

pub fn detail(record: &Record) -> RecordDetail {
    let fields = &record.fields;
    RecordDetail {
        id: record.id.clone(),
        title: fields.title.clone(),
        key_update: fields.key_update.clone(),
        summary: fields.summary.clone(),
        upcoming_plan: fields.upcoming_plan.clone(),
        needs_help: fields.needs_help,
        help_details: match fields.needs_help {
            NeedsHelp::Yes => fields.help_details.clone(),
            NeedsHelp::No => None,
        },
        additional_message: fields
            .additional_message
            .clone()
            .filter(|m| !m.trim().is_empty()),
        attachment_count: fields.images.len(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::schema::DailyUpdate;

    fn record(id: &str, title: &str) -> Record {
        Record {
            id: RecordId::from(id),
            fields: DailyUpdate {
                title: title.into(),
                key_update: "k".into(),
                summary: "s".into(),
                upcoming_plan: "u".into(),
                needs_help: NeedsHelp::No,
                help_details: Some("stale note".into()),
                additional_message: None,
                images: vec!["AA==".into()],
            },
        }
    }

    #[test]
    fn test_blank_query_returns_all() {
        let records = vec![record("1", "A"), record("2", "B")];
        assert_eq!(project(&records, "").len(), 2);
        assert_eq!(project(&records, "   ").len(), 2);
    }

    #[test]
    fn test_case_insensitive_match() {
        let records = vec![record("1", "Weekly SYNC"), record("2", "Other")];
        let rows = project(&records, "sync");
        assert_eq!(rows.len(), 1);
        assert_eq!(rows[0].id, RecordId::from("1"));
    }

    #[test]
    fn test_positions_renumber_but_ids_do_not() {
        let records = vec![record("a", "Report"), record("b", "Monday")];
        let rows = project(&records, "mon");
        assert_eq!(rows[0].position, 1);
        assert_eq!(rows[0].id, RecordId::from("b"));
    }

    #[test]
    fn test_empty_collection() {
        assert!(project(&[], "x").is_empty());
    }

    #[test]
    fn test_detail_hides_help_details_when_no() {
        let view = detail(&record("1", "t"));
        assert_eq!(view.help_details, None);
        assert_eq!(view.attachment_count, 1);

        let mut with_help = record("2", "t");
        with_help.fields.needs_help = NeedsHelp::Yes;
        assert_eq!(detail(&with_help).help_details.as_deref(), Some("stale note"));
    }
}
