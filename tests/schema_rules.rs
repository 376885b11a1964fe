//! Schema Rule Tests
//!
//! - needsHelp = No never requires helpDetails
//! - needsHelp = Yes always requires non-empty helpDetails
//! - Field rules are independent of each other
//! - Validation is deterministic and total

use dailylog::schema::{validate, Draft, FieldName, NeedsHelp, SchemaValidator};
use serde_json::json;

// =============================================================================
// Helper Functions
// =============================================================================

fn base_draft() -> Draft {
    Draft {
        title: Some("Sprint day 3".into()),
        key_update: Some("<p>Merged the store refactor</p>".into()),
        summary: Some("<p>Reviewed two PRs</p>".into()),
        upcoming_plan: Some("<p>Start on search</p>".into()),
        needs_help: Some("No".into()),
        help_details: None,
        additional_message: None,
        images: vec![],
    }
}

fn help_detail_variants() -> Vec<Option<String>> {
    vec![
        None,
        Some(String::new()),
        Some("   ".into()),
        Some("<p><br></p>".into()),
        Some("<p>&nbsp;</p>".into()),
        Some("Real details".into()),
        Some("<p>Real details</p>".into()),
    ]
}

// =============================================================================
// Conditional Requirement Tests
// =============================================================================

/// needsHelp = No: helpDetails is never required, whatever it holds.
#[test]
fn test_no_never_requires_help_details() {
    for needs_help in ["No", "no", " NO "] {
        for help_details in help_detail_variants() {
            let mut draft = base_draft();
            draft.needs_help = Some(needs_help.into());
            draft.help_details = help_details.clone();

            let result = validate(&draft);
            assert!(
                result.is_ok(),
                "needsHelp={needs_help:?} helpDetails={help_details:?} -> {result:?}"
            );
        }
    }
}

/// needsHelp = Yes with empty or absent helpDetails always fails on helpDetails.
#[test]
fn test_yes_requires_help_details() {
    for help_details in [
        None,
        Some(String::new()),
        Some("  \n ".into()),
        Some("<p><br></p>".into()),
    ] {
        let mut draft = base_draft();
        draft.needs_help = Some("Yes".into());
        draft.help_details = help_details.clone();

        let errors = validate(&draft).unwrap_err();
        assert_eq!(
            errors.get(FieldName::HelpDetails),
            Some("Please provide details"),
            "helpDetails={help_details:?}"
        );
    }
}

/// needsHelp = Yes with details validates and keeps the details.
#[test]
fn test_yes_with_details_validates() {
    let mut draft = base_draft();
    draft.needs_help = Some("Yes".into());
    draft.help_details = Some("Need DB credentials".into());

    let valid = validate(&draft).unwrap();
    assert_eq!(valid.fields().needs_help, NeedsHelp::Yes);
    assert_eq!(valid.fields().help_details.as_deref(), Some("Need DB credentials"));
}

/// Unset needsHelp reports needsHelp and never evaluates helpDetails.
#[test]
fn test_unset_needs_help_skips_help_details() {
    for needs_help in [None, Some(String::new()), Some("  ".into())] {
        let mut draft = base_draft();
        draft.needs_help = needs_help;
        draft.help_details = None;

        let errors = validate(&draft).unwrap_err();
        assert!(errors.contains(FieldName::NeedsHelp));
        assert!(!errors.contains(FieldName::HelpDetails));
        assert_eq!(errors.len(), 1);
    }
}

// =============================================================================
// Independence and Determinism
// =============================================================================

/// Each missing required field is reported on its own, no more, no less.
#[test]
fn test_each_required_field_isolated() {
    let cases: [(FieldName, fn(&mut Draft)); 4] = [
        (FieldName::Title, |d| d.title = None),
        (FieldName::KeyUpdate, |d| d.key_update = None),
        (FieldName::Summary, |d| d.summary = Some("<p></p>".into())),
        (FieldName::UpcomingPlan, |d| d.upcoming_plan = Some(String::new())),
    ];

    for (field, clear) in cases {
        let mut draft = base_draft();
        clear(&mut draft);
        let errors = validate(&draft).unwrap_err();
        assert_eq!(errors.fields().collect::<Vec<_>>(), vec![field]);
    }
}

/// Same draft, same answer, every time.
#[test]
fn test_validation_is_deterministic() {
    let draft = Draft {
        title: None,
        needs_help: Some("Yes".into()),
        ..base_draft()
    };
    let first = validate(&draft).unwrap_err();
    for _ in 0..100 {
        assert_eq!(validate(&draft).unwrap_err(), first);
    }
}

/// Optional additionalMessage never causes an error.
#[test]
fn test_additional_message_optional() {
    let mut draft = base_draft();
    draft.additional_message = Some(String::new());
    assert!(validate(&draft).is_ok());
    draft.additional_message = None;
    assert!(validate(&draft).is_ok());
}

// =============================================================================
// Images
// =============================================================================

#[test]
fn test_five_images_allowed_six_rejected() {
    let mut draft = base_draft();
    draft.images = vec!["data:image/png;base64,AA==".into(); 5];
    assert!(validate(&draft).is_ok());

    draft.images.push("data:image/png;base64,AA==".into());
    let errors = validate(&draft).unwrap_err();
    assert!(errors.contains(FieldName::Images));
}

// =============================================================================
// Malformed Input
// =============================================================================

/// Any JSON input yields a field-level answer, never a panic.
#[test]
fn test_malformed_json_is_total() {
    let validator = SchemaValidator::new();
    let inputs = [
        json!(null),
        json!("string"),
        json!(12),
        json!({}),
        json!({ "title": [], "needsHelp": true, "images": [1, null] }),
        json!({ "images": { "a": 1 } }),
    ];
    for input in inputs {
        let errors = validator.validate_json(&input).unwrap_err();
        assert!(!errors.is_empty(), "{input}");
    }
}

/// A wrongly typed field does not hide the other fields' errors.
#[test]
fn test_type_error_does_not_mask_missing_fields() {
    let errors = SchemaValidator::new()
        .validate_json(&json!({ "title": 42, "summary": "<p>s</p>" }))
        .unwrap_err();
    assert_eq!(
        errors.fields().collect::<Vec<_>>(),
        vec![
            FieldName::Title,
            FieldName::KeyUpdate,
            FieldName::UpcomingPlan,
            FieldName::NeedsHelp
        ]
    );
}
