//! Integration tests for configuration: keys, path resolution and overrides

use gradeplan::config::{Config, ConfigOverrides, KEYS};
use gradeplan::core::{DocumentError, PlanDocument};
use std::fs;
use std::path::PathBuf;
use tempfile::TempDir;

fn gradeplan_dir() -> PathBuf {
    Config::get_gradeplan_dir()
}

#[test]
fn test_every_key_round_trips_through_get_set_unset() {
    let defaults = Config::from_defaults();
    let mut config = defaults.clone();
    let values = [
        ("level", "error", "error"),
        ("file", "/tmp/gp.log", "/tmp/gp.log"),
        ("verbose", "true", "true"),
        ("plan_file", "/tmp/mine.json", "/tmp/mine.json"),
        ("reports_dir", "/tmp/reports", "/tmp/reports"),
    ];
    assert_eq!(values.len(), KEYS.len());

    for (key, value, expected) in values {
        assert!(KEYS.contains(&key));
        config.set(key, value).expect("set");
        assert_eq!(config.get(key).as_deref(), Some(expected), "{key}");
    }
    for key in KEYS {
        config.unset(key, &defaults).expect("unset");
        assert_eq!(config.get(key), defaults.get(key), "{key}");
    }
}

#[test]
fn test_dashed_aliases_address_path_keys() {
    let mut config = Config::default();
    config.set("plan-file", "/a/plan.json").expect("alias");
    config.set("reports-dir", "/a/out").expect("alias");
    assert_eq!(config.get("plan_file").as_deref(), Some("/a/plan.json"));
    assert_eq!(config.get("reports_dir").as_deref(), Some("/a/out"));
    assert!(config.get("plan file").is_none());
}

#[test]
fn test_unknown_keys_and_bad_values_change_nothing() {
    let mut config = Config::from_defaults();
    let before = format!("{config}");

    assert!(config.set("colour", "blue").is_err());
    assert!(config.set("level", "loud").is_err());
    assert!(config.set("verbose", "maybe").is_err());
    assert!(config.unset("colour", &Config::default()).is_err());
    assert_eq!(format!("{config}"), before);
}

#[test]
fn test_level_is_stored_normalized() {
    let mut config = Config::default();
    config.set("level", "WARNING").expect("level");
    assert_eq!(config.logging.level, "warn");
}

#[test]
fn test_default_plan_lives_in_config_dir() {
    let config = Config::from_defaults();
    let plan = config.plan_path();
    assert!(plan.starts_with(gradeplan_dir()));
    let name = plan.file_name().and_then(|n| n.to_str()).unwrap_or_default();
    assert!(name == "plan.json" || name == "dplan.json", "{name}");
    assert_eq!(config.reports_path(), gradeplan_dir().join("reports"));
}

#[test]
fn test_empty_paths_fall_back_to_config_dir() {
    let config = Config::from_toml("[paths]\nplan_file = \"  \"\n").expect("toml");
    assert_eq!(config.plan_path(), gradeplan_dir().join("plan.json"));
    assert_eq!(config.reports_path(), gradeplan_dir().join("reports"));
}

#[test]
fn test_plan_file_variable_flows_into_plan_path() {
    let from_file =
        Config::from_toml("[paths]\nplan_file = \"$GRADEPLAN/y2/plan.json\"\n").expect("toml");
    assert_eq!(
        from_file.plan_path(),
        gradeplan_dir().join("y2").join("plan.json")
    );

    let mut from_set = Config::default();
    from_set
        .set("plan_file", "$GRADEPLAN/alt.json")
        .expect("set");
    assert_eq!(from_set.plan_path(), gradeplan_dir().join("alt.json"));
}

#[test]
fn test_overrides_redirect_plan_and_reports_for_one_run() {
    let stored = Config::from_defaults();
    let mut run = stored.clone();
    run.apply_overrides(&ConfigOverrides {
        plan_file: Some("./other.json".to_string()),
        reports_dir: Some("$GRADEPLAN/exports".to_string()),
        ..ConfigOverrides::default()
    });

    assert_eq!(run.plan_path(), PathBuf::from("./other.json"));
    assert_eq!(run.reports_path(), gradeplan_dir().join("exports"));
    assert_eq!(stored.plan_path(), Config::from_defaults().plan_path());
    assert_eq!(run.logging.level, stored.logging.level);
}

#[test]
fn test_saved_toml_reloads_expanded_paths() {
    let mut config = Config::from_defaults();
    config.set("plan_file", "$GRADEPLAN/saved.json").expect("set");

    let reloaded = Config::from_toml(&toml::to_string_pretty(&config).expect("toml"))
        .expect("reload");
    assert_eq!(reloaded.plan_path(), config.plan_path());
    assert!(!reloaded.paths.plan_file.contains("$GRADEPLAN"));
}

#[test]
fn test_merge_defaults_fills_only_blank_paths() {
    let mut config =
        Config::from_toml("[paths]\nplan_file = \"/mine.json\"\nreports_dir = \"\"\n")
            .expect("toml");
    let defaults = Config::from_defaults();

    assert!(config.merge_defaults(&defaults));
    assert_eq!(config.plan_path(), PathBuf::from("/mine.json"));
    assert_eq!(config.reports_path(), defaults.reports_path());
    assert!(!config.merge_defaults(&defaults));
}

#[test]
fn test_configured_plan_file_is_checked_without_creating_it() {
    let dir = TempDir::new().expect("temp dir");
    let plan = dir.path().join("plan.json");

    assert!(matches!(
        PlanDocument::check(&plan),
        Err(DocumentError::Io { .. })
    ));
    assert!(!plan.exists());

    PlanDocument::builtin()
        .expect("builtin")
        .write(&plan)
        .expect("write");
    assert!(PlanDocument::check(&plan).is_ok());

    fs::write(&plan, r#"{"courses": [{"course_id": 1}]}"#).expect("write");
    assert!(matches!(
        PlanDocument::check(&plan),
        Err(DocumentError::Json(_))
    ));
}
