use serde::{Deserialize, Serialize};
use std::fs;
use std::path::Path;
use thiserror::Error;
use tracing::{debug, info, warn};

use crate::algorithms::AdvisoryThresholds;
use crate::api::export::ExportFormat;
use crate::api::types::OutputFormat;
use crate::core::Scenario;
use crate::processing::ParametricStudy;
use crate::validation::{InputLimits, ScenarioValidator};

/// Analysis configuration as stored on disk (JSON)
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct AnalysisConfig {
    /// Scenario used when no explicit values are given
    pub scenario: Scenario,
    /// Thresholds for advisory warnings
    pub advisories: AdvisoryThresholds,
    /// Parametric study grid
    pub study: ParametricStudy,
    /// Front-end control limits
    pub limits: InputLimits,
    /// Output preferences
    pub output: OutputConfig,
}

/// Output configuration
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct OutputConfig {
    /// Console format
    pub format: OutputFormat,
    /// Pretty-print JSON output
    pub pretty_json: bool,
    /// Format used when an export path has no recognised extension
    pub export_format: ExportFormat,
    /// Worker threads for parametric studies
    pub study_workers: usize,
}

impl Default for AnalysisConfig {
    fn default() -> Self {
        Self {
            scenario: Scenario::default(),
            advisories: AdvisoryThresholds::default(),
            study: ParametricStudy::default(),
            limits: InputLimits::default(),
            output: OutputConfig::default(),
        }
    }
}

impl Default for OutputConfig {
    fn default() -> Self {
        Self {
            format: OutputFormat::Text,
            pretty_json: true,
            export_format: ExportFormat::Csv,
            study_workers: 1,
        }
    }
}

/// Configuration errors
#[derive(Debug, Clone, PartialEq, Error)]
pub enum ConfigError {
    #[error("I/O error: {message}")]
    IoError { message: String },

    #[error("Serialization error: {message}")]
    SerializationError { message: String },

    #[error("Invalid parameter '{parameter}' = '{value}': {reason}")]
    InvalidParameter {
        parameter: String,
        value: String,
        reason: String,
    },
}

/// Configuration validation result
#[derive(Debug)]
pub struct ValidationResult {
    /// Whether configuration is valid
    pub is_valid: bool,
    /// Validation errors
    pub errors: Vec<ConfigError>,
    /// Validation warnings
    pub warnings: Vec<String>,
}

/// Loads, validates and saves [`AnalysisConfig`]
pub struct ConfigurationManager {
    config: AnalysisConfig,
    config_file_path: Option<String>,
    is_modified: bool,
}

impl Default for ConfigurationManager {
    fn default() -> Self {
        Self::new()
    }
}

impl ConfigurationManager {
    /// Create a new configuration manager with default settings
    pub fn new() -> Self {
        Self {
            config: AnalysisConfig::default(),
            config_file_path: None,
            is_modified: false,
        }
    }

    /// Create configuration manager and load from file
    pub fn from_file<P: AsRef<Path>>(path: P) -> Result<Self, ConfigError> {
        let mut manager = Self::new();
        manager.load_from_file(path)?;
        Ok(manager)
    }

    pub fn config(&self) -> &AnalysisConfig {
        &self.config
    }

    /// Replace the configuration after validation
    pub fn update_config(&mut self, config: AnalysisConfig) -> Result<(), ConfigError> {
        Self::first_error(Self::validate_config(&config))?;
        self.config = config;
        self.is_modified = true;
        Ok(())
    }

    /// Load configuration from JSON file. Missing sections take defaults.
    pub fn load_from_file<P: AsRef<Path>>(&mut self, path: P) -> Result<(), ConfigError> {
        let path_str = path.as_ref().to_string_lossy().to_string();

        let content = fs::read_to_string(&path).map_err(|e| ConfigError::IoError {
            message: format!("Failed to read config file '{}': {}", path_str, e),
        })?;

        let config: AnalysisConfig =
            serde_json::from_str(&content).map_err(|e| ConfigError::SerializationError {
                message: format!("Failed to parse config file '{}': {}", path_str, e),
            })?;

        let validation = Self::validate_config(&config);
        for warning in &validation.warnings {
            warn!(path = %path_str, "{}", warning);
        }
        Self::first_error(validation)?;

        info!(path = %path_str, "configuration loaded");
        self.config = config;
        self.config_file_path = Some(path_str);
        self.is_modified = false;
        Ok(())
    }

    /// Save configuration to JSON file
    pub fn save_to_file<P: AsRef<Path>>(&mut self, path: P) -> Result<(), ConfigError> {
        let path_str = path.as_ref().to_string_lossy().to_string();

        let content =
            serde_json::to_string_pretty(&self.config).map_err(|e| ConfigError::SerializationError {
                message: format!("Failed to serialize config: {}", e),
            })?;

        fs::write(&path, content).map_err(|e| ConfigError::IoError {
            message: format!("Failed to write config file '{}': {}", path_str, e),
        })?;

        debug!(path = %path_str, "configuration saved");
        self.config_file_path = Some(path_str);
        self.is_modified = false;
        Ok(())
    }

    /// Save to the currently loaded file path
    pub fn save(&mut self) -> Result<(), ConfigError> {
        match self.config_file_path.clone() {
            Some(path) => self.save_to_file(path),
            None => Err(ConfigError::IoError {
                message: "No file path set for saving configuration".to_string(),
            }),
        }
    }

    /// Check if configuration has been modified since last save
    pub fn is_modified(&self) -> bool {
        self.is_modified
    }

    /// Update advisory thresholds
    pub fn set_advisory_thresholds(&mut self, thresholds: AdvisoryThresholds) -> Result<AdvisoryThresholds, ConfigError> {
        let old_value = self.config.advisories;
        let mut updated = self.config.clone();
        updated.advisories = thresholds;
        self.update_config(updated)?;
        Ok(old_value)
    }

    /// Update the default scenario
    pub fn set_scenario(&mut self, scenario: Scenario) -> Result<Scenario, ConfigError> {
        let old_value = self.config.scenario;
        let mut updated = self.config.clone();
        updated.scenario = scenario;
        self.update_config(updated)?;
        Ok(old_value)
    }

    /// Validate a configuration
    pub fn validate_config(config: &AnalysisConfig) -> ValidationResult {
        let mut errors = Vec::new();
        let mut warnings = Vec::new();

        if let Err(e) = ScenarioValidator::validate(&config.scenario) {
            errors.push(ConfigError::InvalidParameter {
                parameter: "scenario".to_string(),
                value: format!("{:?}", config.scenario),
                reason: e.to_string(),
            });
        } else if config.scenario.sensor1 == config.scenario.sensor2 {
            warnings.push("Sensors coincide; every fix will use the degenerate-geometry fallback".to_string());
        }

        let advisories = &config.advisories;
        if !(0.0..=90.0).contains(&advisories.poor_geometry_angle_deg) {
            errors.push(ConfigError::InvalidParameter {
                parameter: "advisories.poor_geometry_angle_deg".to_string(),
                value: advisories.poor_geometry_angle_deg.to_string(),
                reason: "Angle threshold must be between 0 and 90 degrees".to_string(),
            });
        }
        if !(advisories.high_gdop >= 1.0) {
            errors.push(ConfigError::InvalidParameter {
                parameter: "advisories.high_gdop".to_string(),
                value: advisories.high_gdop.to_string(),
                reason: "GDOP threshold must be at least 1 (the minimum possible GDOP)".to_string(),
            });
        }

        let study = &config.study;
        if let Err(e) = ScenarioValidator::validate_sweep(study.baseline_m, &study.bearing_errors_deg, &study.ranges_m) {
            errors.push(ConfigError::InvalidParameter {
                parameter: "study".to_string(),
                value: format!("{:?}", study),
                reason: e.to_string(),
            });
        } else if study.baseline_m <= 0.0 {
            warnings.push("Study baseline is not positive; all study fixes will be degenerate".to_string());
        }

        for (name, bounds) in [
            ("limits.sensor_km", config.limits.sensor_km),
            ("limits.target_x_km", config.limits.target_x_km),
            ("limits.target_y_km", config.limits.target_y_km),
            ("limits.bearing_error_deg", config.limits.bearing_error_deg),
        ] {
            if !(bounds.min <= bounds.max) {
                errors.push(ConfigError::InvalidParameter {
                    parameter: name.to_string(),
                    value: format!("[{}, {}]", bounds.min, bounds.max),
                    reason: "Lower bound must not exceed upper bound".to_string(),
                });
            }
        }

        if config.output.study_workers == 0 {
            errors.push(ConfigError::InvalidParameter {
                parameter: "output.study_workers".to_string(),
                value: "0".to_string(),
                reason: "At least one worker is required".to_string(),
            });
        }

        ValidationResult {
            is_valid: errors.is_empty(),
            errors,
            warnings,
        }
    }

    fn first_error(validation: ValidationResult) -> Result<(), ConfigError> {
        match validation.errors.into_iter().next() {
            Some(error) => Err(error),
            None => Ok(()),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::path::PathBuf;

    fn temp_path(name: &str) -> PathBuf {
        std::env::temp_dir().join(format!("rdf_{}_{}.json", name, std::process::id()))
    }

    #[test]
    fn test_default_config_is_valid() {
        let validation = ConfigurationManager::validate_config(&AnalysisConfig::default());
        assert!(validation.is_valid);
        assert!(validation.warnings.is_empty());
    }

    #[test]
    fn test_manager_creation() {
        let manager = ConfigurationManager::new();
        assert_eq!(manager.config().scenario, Scenario::default());
        assert_eq!(manager.config().study.len(), 25);
        assert!(!manager.is_modified());
    }

    #[test]
    fn test_config_serialization() {
        let path = temp_path("config_roundtrip");
        let mut manager = ConfigurationManager::new();
        manager
            .set_scenario(Scenario::symmetric(4000.0, 6000.0, 1.5))
            .unwrap();
        assert!(manager.is_modified());

        manager.save_to_file(&path).unwrap();
        assert!(!manager.is_modified());

        let loaded = ConfigurationManager::from_file(&path).unwrap();
        assert_eq!(loaded.config(), manager.config());

        let _ = fs::remove_file(path);
    }

    #[test]
    fn test_partial_file_uses_defaults() {
        let path = temp_path("config_partial");
        fs::write(&path, r#"{ "advisories": { "poor_geometry_angle_deg": 45.0, "high_gdop": 3.0 } }"#).unwrap();

        let manager = ConfigurationManager::from_file(&path).unwrap();
        assert_eq!(manager.config().advisories.poor_geometry_angle_deg, 45.0);
        assert_eq!(manager.config().scenario, Scenario::default());
        assert_eq!(manager.config().output.study_workers, 1);

        let _ = fs::remove_file(path);
    }

    #[test]
    fn test_invalid_file_rejected() {
        let path = temp_path("config_invalid");
        fs::write(&path, r#"{ "output": { "study_workers": 0 } }"#).unwrap();

        let result = ConfigurationManager::from_file(&path);
        assert!(matches!(result, Err(ConfigError::InvalidParameter { ref parameter, .. }) if parameter == "output.study_workers"));

        let _ = fs::remove_file(path);
    }

    #[test]
    fn test_missing_file() {
        let result = ConfigurationManager::from_file("/nonexistent/rdf_config.json");
        assert!(matches!(result, Err(ConfigError::IoError { .. })));
    }

    #[test]
    fn test_threshold_validation() {
        let mut manager = ConfigurationManager::new();
        let bad = AdvisoryThresholds {
            poor_geometry_angle_deg: 30.0,
            high_gdop: 0.5,
        };
        assert!(manager.set_advisory_thresholds(bad).is_err());
        assert!(!manager.is_modified());

        let good = AdvisoryThresholds {
            poor_geometry_angle_deg: 20.0,
            high_gdop: 4.0,
        };
        let previous = manager.set_advisory_thresholds(good).unwrap();
        assert_eq!(previous, AdvisoryThresholds::default());
        assert_eq!(manager.config().advisories, good);
    }

    #[test]
    fn test_coincident_sensors_warn() {
        let mut config = AnalysisConfig::default();
        config.scenario = config.scenario.with_sensor2(config.scenario.sensor1);

        let validation = ConfigurationManager::validate_config(&config);
        assert!(validation.is_valid);
        assert_eq!(validation.warnings.len(), 1);
    }

    #[test]
    fn test_save_without_path() {
        let mut manager = ConfigurationManager::new();
        assert!(matches!(manager.save(), Err(ConfigError::IoError { .. })));
    }
}
