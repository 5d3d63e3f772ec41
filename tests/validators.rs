//! Configuration validation, on raw JSON and on typed configs.

use magiklog::config::validators;
use magiklog::{Error, Logger, LoggerConfig, NoOutputPolicy, ValidationError};
use serde_json::json;
use std::fs;
use tempfile::TempDir;

fn file_config(dir: &TempDir) -> serde_json::Value {
    json!({
        "logger_name": "app",
        "logger_path": dir.path().join("logs").to_string_lossy(),
        "log_to_file": true,
    })
}

#[test]
fn defaults_fill_missing_keys() {
    let config = LoggerConfig::from_value(&json!({ "logger_name": "svc" })).unwrap();
    assert_eq!(config, LoggerConfig::new("svc"));
    assert_eq!(config.path, "logs");
    assert!(config.log_to_console);
    assert!(!config.log_to_file);
    assert_eq!(config.level, magiklog::Level::Info);
    assert_eq!(config.max_bytes, 0);
    assert_eq!(config.backup_count, 0);
    assert!(config.colored);
}

#[test]
fn logger_name_is_required() {
    let err = LoggerConfig::from_value(&json!({ "log_level": "INFO" })).unwrap_err();
    assert!(matches!(err, ValidationError::Missing { field: "logger_name" }));
}

#[test]
fn blank_name_is_rejected() {
    let err = LoggerConfig::from_value(&json!({ "logger_name": "   " })).unwrap_err();
    assert!(matches!(err, ValidationError::Empty { field: "logger_name" }));
}

#[test]
fn unknown_level_is_rejected_and_creates_nothing() {
    let dir = TempDir::new().unwrap();
    let mut raw = file_config(&dir);
    raw["log_level"] = json!("VERBOSE");

    let err = LoggerConfig::from_value(&raw).unwrap_err();
    assert!(matches!(err, ValidationError::UnknownLevel { field: "log_level", .. }));
    assert!(!dir.path().join("logs").exists());
}

#[test]
fn level_is_case_insensitive() {
    let config =
        LoggerConfig::from_value(&json!({ "logger_name": "a", "log_level": "warning" })).unwrap();
    assert_eq!(config.level, magiklog::Level::Warning);
}

#[test]
fn negative_max_bytes_is_rejected() {
    let dir = TempDir::new().unwrap();
    let mut raw = file_config(&dir);
    raw["max_bytes"] = json!(-1);

    let err = LoggerConfig::from_value(&raw).unwrap_err();
    assert!(matches!(err, ValidationError::Negative { field: "max_bytes", value: -1 }));
    assert!(!dir.path().join("logs").exists());
}

#[test]
fn fractional_backup_count_is_rejected() {
    let err = LoggerConfig::from_value(&json!({ "logger_name": "a", "backup_count": 1.5 }))
        .unwrap_err();
    assert!(matches!(err, ValidationError::WrongType { field: "backup_count", .. }));
}

#[test]
fn booleans_must_be_real_booleans() {
    for surrogate in [json!("true"), json!(1), json!(0), json!(null)] {
        let err = LoggerConfig::from_value(&json!({ "logger_name": "a", "colored": surrogate }))
            .unwrap_err();
        assert!(
            matches!(err, ValidationError::WrongType { field: "colored", .. }),
            "{surrogate} should be rejected"
        );
    }
}

#[test]
fn use_color_is_accepted_as_alias() {
    let config =
        LoggerConfig::from_value(&json!({ "logger_name": "a", "use_color": false })).unwrap();
    assert!(!config.colored);
}

#[test]
fn no_output_policy_parses_lowercase_names() {
    let config = LoggerConfig::from_value(&json!({
        "logger_name": "a",
        "log_to_console": false,
        "no_output_policy": "console",
    }))
    .unwrap();
    assert_eq!(config.no_output_policy, NoOutputPolicy::Console);

    let err = LoggerConfig::from_value(&json!({
        "logger_name": "a",
        "no_output_policy": "sometimes",
    }))
    .unwrap_err();
    assert!(matches!(err, ValidationError::WrongType { field: "no_output_policy", .. }));
}

#[test]
fn malformed_json_text_is_a_parse_error() {
    let err = LoggerConfig::from_json_str("{ \"logger_name\": ").unwrap_err();
    assert!(matches!(err, ValidationError::Parse(_)));
}

#[test]
fn json_text_round_trips_into_config() {
    let config = LoggerConfig::from_json_str(
        r#"{ "logger_name": "svc", "max_bytes": 4096, "backup_count": 3, "log_format": "%(levelname)s - %(message)s" }"#,
    )
    .unwrap();
    assert_eq!(config.max_bytes, 4096);
    assert_eq!(config.backup_count, 3);
    assert_eq!(config.format, "%(levelname)s - %(message)s");
}

#[test]
fn format_without_message_is_rejected() {
    let err = validators::format("log_format", "{timestamp} - {level}").unwrap_err();
    assert!(matches!(err, ValidationError::MissingPlaceholder { .. }));
    assert!(validators::format("log_format", "%(message)s").is_ok());
}

#[test]
fn bad_timestamp_format_is_rejected() {
    let mut config = LoggerConfig::new("a");
    config.timestamp_format = "%Q".to_string();
    assert!(matches!(
        config.validate(),
        Err(ValidationError::BadTimestampFormat { .. })
    ));
}

#[test]
fn path_is_only_checked_when_file_logging() {
    let dir = TempDir::new().unwrap();
    let blocker = dir.path().join("not-a-dir");
    fs::write(&blocker, "x").unwrap();

    let mut config = LoggerConfig::new("a");
    config.path = blocker.join("logs").to_string_lossy().into_owned();
    assert!(config.validate().is_ok());

    config.log_to_file = true;
    assert!(matches!(
        config.validate(),
        Err(ValidationError::PathNotWritable { .. })
    ));
}

#[test]
fn missing_directory_under_writable_parent_is_accepted_without_creating_it() {
    let dir = TempDir::new().unwrap();
    let target = dir.path().join("a").join("b");
    assert!(validators::writable_dir(&target).is_ok());
    assert!(!target.exists());
}

#[test]
fn reject_policy_refuses_a_logger_without_outputs() {
    let mut config = LoggerConfig::new("a");
    config.log_to_console = false;
    config.no_output_policy = NoOutputPolicy::Reject;

    let err = Logger::new(config).err().unwrap();
    assert!(matches!(err, Error::Validation(ValidationError::NoOutputs)));
}

#[test]
fn validation_error_names_its_field() {
    let err = LoggerConfig::from_value(&json!({ "logger_name": "a", "max_bytes": "big" }))
        .unwrap_err();
    assert_eq!(err.field(), Some("max_bytes"));
    assert!(err.to_string().contains("max_bytes"));
}

#[cfg(unix)]
#[test]
fn writability_matches_what_the_process_can_do() {
    use std::os::unix::fs::PermissionsExt;

    let dir = TempDir::new().unwrap();
    let locked = dir.path().join("locked");
    fs::create_dir(&locked).unwrap();
    fs::set_permissions(&locked, fs::Permissions::from_mode(0o555)).unwrap();

    // Privileged users may write regardless of mode bits; ask the filesystem.
    let attempt = locked.join("attempt");
    let writable = fs::File::create(&attempt).is_ok();
    let _ = fs::remove_file(&attempt);

    for target in [locked.clone(), locked.join("nested")] {
        let mut config = LoggerConfig::new("app");
        config.log_to_file = true;
        config.log_to_console = false;
        config.path = target.to_string_lossy().into_owned();

        match Logger::new(config) {
            Ok(_) => assert!(writable, "{} should have been rejected", target.display()),
            Err(Error::Validation(ValidationError::PathNotWritable { .. })) => {
                assert!(!writable, "{} should have been accepted", target.display());
            }
            Err(other) => panic!("expected a validation outcome, got: {other}"),
        }
    }

    fs::set_permissions(&locked, fs::Permissions::from_mode(0o755)).unwrap();
}

#[test]
fn name_must_stay_inside_the_log_directory() {
    let dir = TempDir::new().unwrap();
    for name in ["a/b", "/tmp/escape", "..", ".", "dir\\file"] {
        let raw = json!({
            "logger_name": name,
            "logger_path": dir.path().to_string_lossy(),
            "log_to_file": true,
        });
        let err = LoggerConfig::from_value(&raw).unwrap_err();
        assert!(
            matches!(err, ValidationError::NotAFileName { field: "logger_name", .. }),
            "{name} should be rejected"
        );
    }
    assert_eq!(fs::read_dir(dir.path()).unwrap().count(), 0);
    assert!(validators::file_name("logger_name", "app.v2").is_ok());
}
