//! Draft validation
//!
//! Validation semantics:
//! - title, keyUpdate, summary and upcomingPlan are required and non-empty
//! - needsHelp is required and must be Yes or No
//! - helpDetails is required iff needsHelp is Yes
//! - additionalMessage is optional
//! - images holds at most `max_images` non-empty encoded strings
//!
//! Every rule is checked independently and all failures are reported
//! together. Validation never panics and never touches the store.

use std::sync::OnceLock;

use regex::Regex;
use serde_json::Value;

use super::errors::ValidationErrors;
use super::types::{DailyUpdate, Draft, FieldName, NeedsHelp, ValidRecord, MAX_IMAGES};

/// Validates drafts and promotes them to `ValidRecord`.
#[derive(Debug, Clone, Copy)]
pub struct SchemaValidator {
    max_images: usize,
}

impl Default for SchemaValidator {
    fn default() -> Self {
        Self {
            max_images: MAX_IMAGES,
        }
    }
}

impl SchemaValidator {
    pub fn new() -> Self {
        Self::default()
    }

    /// Validator with a lower attachment limit. Values above `MAX_IMAGES` are
    /// clamped.
    pub fn with_max_images(max_images: usize) -> Self {
        Self {
            max_images: max_images.min(MAX_IMAGES),
        }
    }

    pub fn max_images(&self) -> usize {
        self.max_images
    }

    /// Validates a draft.
    ///
    /// # Errors
    ///
    /// Returns the map of every failing field. An `Ok` result means the map
    /// would have been empty.
    pub fn validate(&self, draft: &Draft) -> Result<ValidRecord, ValidationErrors> {
        let mut errors = ValidationErrors::new();

        let title = require_plain(&mut errors, FieldName::Title, &draft.title, "Title is required");
        let key_update = require_rich(
            &mut errors,
            FieldName::KeyUpdate,
            &draft.key_update,
            "Key update is required",
        );
        let summary = require_rich(
            &mut errors,
            FieldName::Summary,
            &draft.summary,
            "Summary is required",
        );
        let upcoming_plan = require_rich(
            &mut errors,
            FieldName::UpcomingPlan,
            &draft.upcoming_plan,
            "Tomorrow's plan is required",
        );
        let needs_help = check_help(&mut errors, draft);
        self.check_images(&mut errors, &draft.images);

        match (title, key_update, summary, upcoming_plan, needs_help) {
            (Some(title), Some(key_update), Some(summary), Some(upcoming_plan), Some(needs_help))
                if errors.is_empty() =>
            {
                Ok(ValidRecord::new(DailyUpdate {
                    title,
                    key_update,
                    summary,
                    upcoming_plan,
                    needs_help,
                    help_details: draft.help_details.clone(),
                    additional_message: draft.additional_message.clone(),
                    images: draft.images.clone(),
                }))
            }
            _ => Err(errors),
        }
    }

    /// Reads a draft out of an arbitrary JSON value, then validates it.
    ///
    /// Wrongly typed fields are reported in the error map instead of failing
    /// deserialization, so any input yields a field-level answer.
    ///
    /// A wrongly typed field keeps its type message; every other field is
    /// still checked by its own rule.
    pub fn validate_json(&self, value: &Value) -> Result<ValidRecord, ValidationErrors> {
        let (draft, mut errors) = read_fields(value);
        match self.validate(&draft) {
            Ok(valid) if errors.is_empty() => Ok(valid),
            Ok(_) => Err(errors),
            Err(rule_errors) => {
                errors.merge(rule_errors);
                Err(errors)
            }
        }
    }

    fn check_images(&self, errors: &mut ValidationErrors, images: &[String]) {
        if images.len() > self.max_images {
            errors.insert(
                FieldName::Images,
                format!("At most {} images are allowed", self.max_images),
            );
            return;
        }
        if let Some(pos) = images.iter().position(|image| image.trim().is_empty()) {
            errors.insert(FieldName::Images, format!("Image {} is empty", pos + 1));
        }
    }
}

/// Validates with the default limits.
pub fn validate(draft: &Draft) -> Result<ValidRecord, ValidationErrors> {
    SchemaValidator::default().validate(draft)
}

/// Controlling field first, then the dependent rule.
///
/// helpDetails is only looked at once needsHelp resolved to Yes.
fn check_help(errors: &mut ValidationErrors, draft: &Draft) -> Option<NeedsHelp> {
    let raw = draft
        .needs_help
        .as_deref()
        .map(str::trim)
        .filter(|raw| !raw.is_empty());

    let Some(raw) = raw else {
        errors.insert(FieldName::NeedsHelp, "Please select whether you need help");
        return None;
    };

    let Some(needs_help) = NeedsHelp::parse(raw) else {
        errors.insert(FieldName::NeedsHelp, "Please choose Yes or No");
        return None;
    };

    if needs_help == NeedsHelp::Yes && is_blank_rich(draft.help_details.as_deref()) {
        errors.insert(FieldName::HelpDetails, "Please provide details");
    }

    Some(needs_help)
}

fn require_plain(
    errors: &mut ValidationErrors,
    field: FieldName,
    value: &Option<String>,
    message: &str,
) -> Option<String> {
    match value {
        Some(text) if !text.trim().is_empty() => Some(text.clone()),
        _ => {
            errors.insert(field, message);
            None
        }
    }
}

fn require_rich(
    errors: &mut ValidationErrors,
    field: FieldName,
    value: &Option<String>,
    message: &str,
) -> Option<String> {
    if is_blank_rich(value.as_deref()) {
        errors.insert(field, message);
        return None;
    }
    value.clone()
}

fn markup_pattern() -> &'static Regex {
    static PATTERN: OnceLock<Regex> = OnceLock::new();
    PATTERN.get_or_init(|| Regex::new(r"(?s)<[^>]*>").expect("markup pattern is valid"))
}

/// True when a rich-text value has no visible text once tags and `&nbsp;`
/// entities are stripped (`<p><br></p>` counts as blank).
pub fn is_blank_rich(value: Option<&str>) -> bool {
    let Some(markup) = value else {
        return true;
    };
    let text = markup_pattern().replace_all(markup, " ");
    text.replace("&nbsp;", " ").trim().is_empty()
}

/// Lenient JSON → `Draft` conversion.
///
/// Absent and `null` fields become `None`; anything else of the wrong type is
/// reported against its field.
pub fn read_draft(value: &Value) -> Result<Draft, ValidationErrors> {
    let (draft, errors) = read_fields(value);
    if errors.is_empty() {
        Ok(draft)
    } else {
        Err(errors)
    }
}

/// Reads whatever is well-typed; wrongly typed fields are left unset and
/// reported.
fn read_fields(value: &Value) -> (Draft, ValidationErrors) {
    let mut errors = ValidationErrors::new();

    let Some(object) = value.as_object() else {
        for field in FieldName::ALL {
            if field != FieldName::HelpDetails && field != FieldName::AdditionalMessage {
                errors.insert(field, "Draft must be a JSON object");
            }
        }
        return (Draft::default(), errors);
    };

    let mut text = |field: FieldName| -> Option<String> {
        match object.get(field.as_str()) {
            None | Some(Value::Null) => None,
            Some(Value::String(s)) => Some(s.clone()),
            Some(_) => {
                errors.insert(field, "Must be text");
                None
            }
        }
    };

    let mut draft = Draft {
        title: text(FieldName::Title),
        key_update: text(FieldName::KeyUpdate),
        summary: text(FieldName::Summary),
        upcoming_plan: text(FieldName::UpcomingPlan),
        needs_help: text(FieldName::NeedsHelp),
        help_details: text(FieldName::HelpDetails),
        additional_message: text(FieldName::AdditionalMessage),
        images: Vec::new(),
    };

    match object.get(FieldName::Images.as_str()) {
        None | Some(Value::Null) => {}
        Some(Value::Array(items)) => {
            for (i, item) in items.iter().enumerate() {
                match item.as_str() {
                    Some(s) => draft.images.push(s.to_string()),
                    None => errors.insert(
                        FieldName::Images,
                        format!("Image {} must be an encoded string", i + 1),
                    ),
                }
            }
        }
        Some(_) => errors.insert(FieldName::Images, "Images must be a list"),
    }

    (draft, errors)
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn complete_draft() -> Draft {
        Draft {
            title: Some("Monday Update".into()),
            key_update: Some("<p>Shipped search</p>".into()),
            summary: Some("<p>All tests green</p>".into()),
            upcoming_plan: Some("<p>Edit screen</p>".into()),
            needs_help: Some("No".into()),
            help_details: None,
            additional_message: None,
            images: vec![],
        }
    }

    #[test]
    fn test_complete_draft_validates() {
        let valid = validate(&complete_draft()).unwrap();
        assert_eq!(valid.fields().title, "Monday Update");
        assert_eq!(valid.fields().needs_help, NeedsHelp::No);
    }

    #[test]
    fn test_empty_draft_reports_every_required_field() {
        let errors = validate(&Draft::default()).unwrap_err();
        assert_eq!(errors.get(FieldName::Title), Some("Title is required"));
        assert_eq!(errors.get(FieldName::KeyUpdate), Some("Key update is required"));
        assert_eq!(errors.get(FieldName::Summary), Some("Summary is required"));
        assert_eq!(
            errors.get(FieldName::UpcomingPlan),
            Some("Tomorrow's plan is required")
        );
        assert_eq!(
            errors.get(FieldName::NeedsHelp),
            Some("Please select whether you need help")
        );
        // helpDetails is never evaluated while needsHelp is unset
        assert!(!errors.contains(FieldName::HelpDetails));
        assert!(!errors.contains(FieldName::AdditionalMessage));
        assert!(!errors.contains(FieldName::Images));
    }

    #[test]
    fn test_help_details_required_when_yes() {
        let mut draft = complete_draft();
        draft.needs_help = Some("Yes".into());
        let errors = validate(&draft).unwrap_err();
        assert_eq!(errors.get(FieldName::HelpDetails), Some("Please provide details"));
        assert_eq!(errors.len(), 1);

        draft.help_details = Some("Need access to staging".into());
        assert!(validate(&draft).is_ok());
    }

    #[test]
    fn test_help_details_ignored_when_no() {
        let mut draft = complete_draft();
        draft.help_details = Some("   ".into());
        assert!(validate(&draft).is_ok());
    }

    #[test]
    fn test_unknown_needs_help_value() {
        let mut draft = complete_draft();
        draft.needs_help = Some("Maybe".into());
        let errors = validate(&draft).unwrap_err();
        assert_eq!(errors.get(FieldName::NeedsHelp), Some("Please choose Yes or No"));
        assert!(!errors.contains(FieldName::HelpDetails));
    }

    #[test]
    fn test_blank_rich_text_is_empty() {
        assert!(is_blank_rich(None));
        assert!(is_blank_rich(Some("")));
        assert!(is_blank_rich(Some("<p><br></p>")));
        assert!(is_blank_rich(Some("<p>&nbsp;</p>\n")));
        assert!(!is_blank_rich(Some("<p>x</p>")));
        assert!(!is_blank_rich(Some("plain")));
    }

    #[test]
    fn test_whitespace_title_rejected() {
        let mut draft = complete_draft();
        draft.title = Some("   ".into());
        let errors = validate(&draft).unwrap_err();
        assert!(errors.contains(FieldName::Title));
    }

    #[test]
    fn test_too_many_images() {
        let mut draft = complete_draft();
        draft.images = vec!["data:image/png;base64,AA==".to_string(); 6];
        let errors = validate(&draft).unwrap_err();
        assert_eq!(
            errors.get(FieldName::Images),
            Some("At most 5 images are allowed")
        );
    }

    #[test]
    fn test_empty_image_entry() {
        let mut draft = complete_draft();
        draft.images = vec!["AA==".into(), "".into()];
        let errors = validate(&draft).unwrap_err();
        assert_eq!(errors.get(FieldName::Images), Some("Image 2 is empty"));
    }

    #[test]
    fn test_image_without_mime_framing_accepted() {
        let mut draft = complete_draft();
        draft.images = vec!["iVBORw0KGgo=".into()];
        assert!(validate(&draft).is_ok());
    }

    #[test]
    fn test_lower_limit_is_clamped() {
        assert_eq!(SchemaValidator::with_max_images(9).max_images(), MAX_IMAGES);
        let validator = SchemaValidator::with_max_images(1);
        let mut draft = complete_draft();
        draft.images = vec!["AA==".into(), "AA==".into()];
        assert!(validator.validate(&draft).is_err());
    }

    #[test]
    fn test_validate_json_reports_type_errors() {
        let value = json!({
            "title": 42,
            "keyUpdate": "k",
            "summary": "s",
            "upcomingPlan": "u",
            "needsHelp": "No",
            "images": "not-a-list"
        });
        let errors = SchemaValidator::new().validate_json(&value).unwrap_err();
        assert_eq!(errors.get(FieldName::Title), Some("Must be text"));
        assert_eq!(errors.get(FieldName::Images), Some("Images must be a list"));
    }

    #[test]
    fn test_validate_json_type_error_keeps_other_field_errors() {
        let errors = SchemaValidator::new()
            .validate_json(&json!({ "title": 42 }))
            .unwrap_err();
        assert_eq!(errors.get(FieldName::Title), Some("Must be text"));
        assert_eq!(errors.get(FieldName::KeyUpdate), Some("Key update is required"));
        assert_eq!(errors.get(FieldName::Summary), Some("Summary is required"));
        assert_eq!(
            errors.get(FieldName::UpcomingPlan),
            Some("Tomorrow's plan is required")
        );
        assert_eq!(
            errors.get(FieldName::NeedsHelp),
            Some("Please select whether you need help")
        );
        assert_eq!(errors.len(), 5);
    }

    #[test]
    fn test_validate_json_type_error_in_otherwise_valid_draft() {
        let value = json!({
            "title": "t",
            "keyUpdate": "k",
            "summary": "s",
            "upcomingPlan": "u",
            "needsHelp": "No",
            "additionalMessage": ["not", "text"]
        });
        let errors = SchemaValidator::new().validate_json(&value).unwrap_err();
        assert_eq!(errors.get(FieldName::AdditionalMessage), Some("Must be text"));
        assert_eq!(errors.len(), 1);
    }

    #[test]
    fn test_validate_json_non_object() {
        let errors = SchemaValidator::new().validate_json(&json!([1, 2])).unwrap_err();
        assert!(errors.contains(FieldName::Title));
        assert!(!errors.contains(FieldName::HelpDetails));
    }

    #[test]
    fn test_validate_json_null_fields_are_absent() {
        let value = json!({
            "title": "t",
            "keyUpdate": "k",
            "summary": "s",
            "upcomingPlan": "u",
            "needsHelp": "No",
            "helpDetails": null,
            "images": null
        });
        let valid = SchemaValidator::new().validate_json(&value).unwrap();
        assert!(valid.fields().help_details.is_none());
        assert!(valid.fields().images.is_empty());
    }
}
