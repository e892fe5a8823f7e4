//! Tests for settings functionality.

use crate::config::{SETTINGS_VERSION, Settings, StepKind, VerifyProfile, VerifyStep};
use tempfile::TempDir;

#[test]
fn test_default_settings() {
    let settings = Settings::default();

    assert_eq!(settings.version, SETTINGS_VERSION);
    assert!(settings.project_name.is_empty());
    assert!(settings.packs.is_empty());
    assert!(settings.verify.is_none());
    assert!(settings.created_at.is_none());
}

#[test]
fn test_parse_empty_object() {
    let settings = Settings::from_json("{}").unwrap();
    assert_eq!(settings.version, SETTINGS_VERSION);
    assert!(settings.packs.is_empty());
}

#[test]
fn test_parse_full_settings() {
    let json = r#"{
        "version": "1",
        "project_name": "shop",
        "packs": ["web", "design"],
        "verify": {
            "steps": [
                {"name": "lint", "kind": "lint", "command": "npm run lint"},
                {"name": "build", "kind": "build", "command": "npm run build"},
                {"name": "e2e", "kind": "test", "command": "npx playwright test", "skip_in_quick": true}
            ]
        },
        "created_at": "2026-01-13T10:00:00Z"
    }"#;

    let settings = Settings::from_json(json).unwrap();
    assert_eq!(settings.project_name, "shop");
    assert_eq!(settings.packs, vec!["web", "design"]);
    assert!(settings.created_at.is_some());

    let steps = &settings.verify.as_ref().unwrap().steps;
    assert_eq!(steps.len(), 3);
    assert_eq!(steps[0].kind, StepKind::Lint);
    assert!(!steps[0].skipped_in_quick());
    assert!(steps[1].skipped_in_quick(), "build steps default to skipped in quick mode");
    assert!(steps[2].skipped_in_quick());
}

#[test]
fn test_unknown_fields_round_trip() {
    let json = r#"{"project_name": "x", "team": {"lead": "sam"}, "packs": []}"#;
    let settings = Settings::from_json(json).unwrap();
    assert!(settings.extra.contains_key("team"));

    let out = settings.to_json().unwrap();
    let reparsed = Settings::from_json(&out).unwrap();
    assert_eq!(reparsed.extra.get("team"), settings.extra.get("team"));
}

#[test]
fn test_unknown_pack_is_rejected() {
    let err = Settings::from_json(r#"{"packs": ["android"]}"#).unwrap_err();
    assert!(err.to_string().contains("unknown pack 'android'"));
}

#[test]
fn test_duplicate_pack_is_rejected() {
    let err = Settings::from_json(r#"{"packs": ["web", "web"]}"#).unwrap_err();
    assert!(err.to_string().contains("more than once"));
}

#[test]
fn test_verify_step_without_command_is_rejected() {
    let settings = Settings {
        verify: Some(VerifyProfile {
            steps: vec![VerifyStep::new("lint", StepKind::Lint, "  ")],
            ..Default::default()
        }),
        ..Default::default()
    };
    let err = settings.validate().unwrap_err();
    assert!(err.to_string().contains("has no command"));
}

#[test]
fn test_invalid_json_is_user_error() {
    let err = Settings::from_json("{not json").unwrap_err();
    assert_eq!(err.exit_code(), crate::exit_codes::GENERAL_ERROR);
    assert!(err.to_string().contains("failed to parse settings JSON"));
}

#[test]
fn test_add_and_remove_pack() {
    let mut settings = Settings::default();

    assert!(settings.add_pack("python"));
    assert!(!settings.add_pack("python"));
    assert!(settings.has_pack("python"));

    assert!(settings.remove_pack("python"));
    assert!(!settings.remove_pack("python"));
    assert!(settings.packs.is_empty());
}

#[test]
fn test_save_and_load() {
    let temp = TempDir::new().unwrap();
    let path = temp.path().join("settings.json");

    let mut settings = Settings {
        project_name: "api".to_string(),
        ..Default::default()
    };
    settings.add_pack("python");
    settings.save(&path).unwrap();

    let content = std::fs::read_to_string(&path).unwrap();
    assert!(content.ends_with('\n'));

    let loaded = Settings::load(&path).unwrap();
    assert_eq!(loaded.project_name, "api");
    assert_eq!(loaded.packs, vec!["python"]);
}

#[test]
fn test_step_kind_names() {
    let kind: StepKind = serde_json::from_str("\"typecheck\"").unwrap();
    assert_eq!(kind, StepKind::Typecheck);
    assert!(serde_json::from_str::<StepKind>("\"deploy\"").is_err());
    assert_eq!(StepKind::Build.to_string(), "build");
}
