use anyhow::{anyhow, Result};
use serde::{Deserialize, Serialize};
use std::default::Default;
use std::path::PathBuf;

use crate::seed::SeedTargets;

/// Application configuration module
/// This module handles the application configuration including loading,
/// validating and saving configuration settings.
/// Represents the application configuration
#[derive(Debug, Serialize, Deserialize, Clone)]
pub struct Config {
    /// Database file path; omit to use the platform data directory
    #[serde(default)]
    pub database_path: Option<PathBuf>,

    /// Log level
    #[serde(default)]
    pub log_level: LogLevel,

    /// Seed generator targets
    #[serde(default)]
    pub seed: SeedTargets,
}

/// Log verbosity level
#[derive(Debug, Serialize, Deserialize, Clone, PartialEq, Default)]
#[serde(rename_all = "lowercase")]
pub enum LogLevel {
    Error,
    Warn,
    #[default]
    Info,
    Debug,
    Trace,
}

impl Config {
    /// Validate the configuration for consistency and required values
    pub fn validate(&self) -> Result<()> {
        if self.seed.students == 0 {
            return Err(anyhow!("Seed target 'students' must be at least 1"));
        }
        if self.seed.modules_per_course == 0 {
            return Err(anyhow!("Seed target 'modules_per_course' must be at least 1"));
        }
        if self.seed.assessments_per_module == 0 {
            return Err(anyhow!(
                "Seed target 'assessments_per_module' must be at least 1"
            ));
        }
        if self.seed.enrollments_per_student == 0 {
            return Err(anyhow!(
                "Seed target 'enrollments_per_student' must be at least 1"
            ));
        }

        Ok(())
    }
}

/// Default implementation for Config
impl Default for Config {
    fn default() -> Self {
        Config {
            database_path: None,
            log_level: LogLevel::default(),
            seed: SeedTargets::default(),
        }
    }
}
