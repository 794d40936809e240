/*!
 * Tests for application configuration functionality
 */

use std::path::PathBuf;

use registrar::app_config::{Config, LogLevel};

/// Test default configuration values
#[test]
fn test_defaultConfig_withNoParameters_shouldHaveCorrectDefaults() {
    let config = Config::default();

    // Test default values
    assert_eq!(config.database_path, None);
    assert_eq!(config.log_level, LogLevel::Info);
    assert_eq!(config.seed.students, 10);
    assert_eq!(config.seed.modules_per_course, 5);
    assert_eq!(config.seed.assessments_per_module, 3);
    assert_eq!(config.seed.enrollments_per_student, 2);
}

/// Test configuration validation
#[test]
fn test_validate_withZeroTargets_shouldFail() {
    // Start with a valid config
    let mut config = Config::default();
    assert!(config.validate().is_ok());

    // Zero students
    config.seed.students = 0;
    assert!(config.validate().is_err());
    config.seed.students = 10;

    // Zero modules per course
    config.seed.modules_per_course = 0;
    assert!(config.validate().is_err());
    config.seed.modules_per_course = 5;

    // Zero assessments per module
    config.seed.assessments_per_module = 0;
    assert!(config.validate().is_err());
    config.seed.assessments_per_module = 3;

    // Zero enrollments per student
    config.seed.enrollments_per_student = 0;
    assert!(config.validate().is_err());
    config.seed.enrollments_per_student = 2;

    assert!(config.validate().is_ok());
}

/// Test that a config without optional keys falls back to defaults
#[test]
fn test_deserialize_withPartialJson_shouldFillDefaults() {
    let config: Config =
        serde_json::from_str(r#"{ "log_level": "debug" }"#).expect("Failed to parse config");

    assert_eq!(config.log_level, LogLevel::Debug);
    assert_eq!(config.database_path, None);
    assert_eq!(config.seed.students, 10);
}

/// Test that nested seed targets override selectively
#[test]
fn test_deserialize_withSeedOverrides_shouldKeepOtherDefaults() {
    let config: Config =
        serde_json::from_str(r#"{ "seed": { "students": 25 } }"#).expect("Failed to parse config");

    assert_eq!(config.seed.students, 25);
    assert_eq!(config.seed.modules_per_course, 5);
    assert_eq!(config.seed.assessments_per_module, 3);
}

/// Test round-tripping a config through JSON
#[test]
fn test_serialize_withCustomValues_shouldRoundTrip() {
    let mut config = Config::default();
    config.database_path = Some(PathBuf::from("/tmp/records.db"));
    config.log_level = LogLevel::Warn;
    config.seed.students = 4;

    let json = serde_json::to_string_pretty(&config).expect("Failed to serialize config");
    let parsed: Config = serde_json::from_str(&json).expect("Failed to parse config");

    assert_eq!(parsed.database_path, config.database_path);
    assert_eq!(parsed.log_level, LogLevel::Warn);
    assert_eq!(parsed.seed.students, 4);
}
