use serde::{Deserialize, Serialize};
use shared::PlantType;
use std::collections::HashSet;
use std::path::Path;
use std::time::Duration;
use strum::IntoEnumIterator;

use crate::error::ConfigError;

pub const DEFAULT_MAX_UPLOAD_BYTES: u64 = 5 * 1024 * 1024;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct DiagnosisConfig {
    pub max_upload_bytes: u64,
    /// `None` disables the client-side timeout.
    pub request_timeout_ms: Option<u64>,
    pub result_route: String,
    pub capture: CaptureConfig,
    pub messages: Messages,
    pub api: ApiConfig,
    pub plants: Vec<PlantOption>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct CaptureConfig {
    pub delay_ms: u64,
    pub file_name: String,
    pub placeholder_preview: String,
}

/// Fallback texts for the inline alert when the provider sent none.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Messages {
    pub prediction_failed: String,
    pub request_failed: String,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ApiConfig {
    pub base_url: String,
    pub predict_path: String,
    pub history_path: String,
}

/// Display metadata for one entry of the plant selector.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PlantOption {
    pub id: PlantType,
    pub name: String,
    pub icon: String,
    pub color: String,
    pub selected_color: String,
}

impl Default for CaptureConfig {
    fn default() -> Self {
        Self {
            delay_ms: 1500,
            file_name: "camera_capture.jpg".to_string(),
            placeholder_preview: "/img/placeholder-plant.jpg".to_string(),
        }
    }
}

impl Default for Messages {
    fn default() -> Self {
        Self {
            prediction_failed: "Failed to get a diagnosis result.".to_string(),
            request_failed: "Diagnosis failed. Please try again.".to_string(),
        }
    }
}

impl Default for ApiConfig {
    fn default() -> Self {
        Self {
            base_url: "/api".to_string(),
            predict_path: "/diagnosis/predict".to_string(),
            history_path: "/diagnosis/history".to_string(),
        }
    }
}

impl Default for DiagnosisConfig {
    fn default() -> Self {
        Self {
            max_upload_bytes: DEFAULT_MAX_UPLOAD_BYTES,
            request_timeout_ms: Some(30_000),
            result_route: "/diagnostics-result".to_string(),
            capture: CaptureConfig::default(),
            messages: Messages::default(),
            api: ApiConfig::default(),
            plants: default_plants(),
        }
    }
}

fn default_plants() -> Vec<PlantOption> {
    let option = |id, name: &str, icon: &str, color: &str, selected_color: &str| PlantOption {
        id,
        name: name.to_string(),
        icon: icon.to_string(),
        color: color.to_string(),
        selected_color: selected_color.to_string(),
    };

    vec![
        option(
            PlantType::Cabai,
            "Cabai",
            "🌶️",
            "bg-red-100 hover:bg-red-200 border-red-300",
            "bg-red-500 text-white",
        ),
        option(
            PlantType::Tomat,
            "Tomat",
            "🍅",
            "bg-red-100 hover:bg-red-200 border-red-300",
            "bg-red-500 text-white",
        ),
        option(
            PlantType::Selada,
            "Selada",
            "🥬",
            "bg-green-100 hover:bg-green-200 border-green-300",
            "bg-green-500 text-white",
        ),
    ]
}

impl DiagnosisConfig {
    pub fn from_yaml_str(source: &str) -> Result<Self, ConfigError> {
        let config: DiagnosisConfig = serde_yaml::from_str(source)?;
        config.validate()?;
        Ok(config)
    }

    pub fn load(path: impl AsRef<Path>) -> Result<Self, ConfigError> {
        let source = std::fs::read_to_string(path)?;
        Self::from_yaml_str(&source)
    }

    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.max_upload_bytes == 0 {
            return Err(ConfigError::Invalid("max_upload_bytes must be positive".into()));
        }
        if !self.result_route.starts_with('/') {
            return Err(ConfigError::Invalid(format!(
                "result_route must be an absolute path, got {:?}",
                self.result_route
            )));
        }

        let mut seen = HashSet::new();
        for option in &self.plants {
            if !seen.insert(option.id) {
                return Err(ConfigError::Invalid(format!("plant {} listed twice", option.id)));
            }
        }
        if let Some(missing) = PlantType::iter().find(|plant| !seen.contains(plant)) {
            return Err(ConfigError::Invalid(format!("plant {} missing from catalog", missing)));
        }

        Ok(())
    }

    pub fn plant(&self, id: PlantType) -> Option<&PlantOption> {
        self.plants.iter().find(|option| option.id == id)
    }

    pub fn request_timeout(&self) -> Option<Duration> {
        self.request_timeout_ms.map(Duration::from_millis)
    }

    pub fn capture_delay(&self) -> Duration {
        Duration::from_millis(self.capture.delay_ms)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn defaults_match_the_shipped_file() {
        let shipped = include_str!("../../config/diagnosis.yaml");
        let config = DiagnosisConfig::from_yaml_str(shipped).unwrap();
        assert_eq!(config, DiagnosisConfig::default());
        assert_eq!(config.max_upload_bytes, 5 * 1024 * 1024);
        assert_eq!(config.capture_delay(), Duration::from_millis(1500));
    }

    #[test]
    fn partial_yaml_keeps_defaults() {
        let config = DiagnosisConfig::from_yaml_str("request_timeout_ms: ~\nmax_upload_bytes: 1024\n").unwrap();
        assert_eq!(config.max_upload_bytes, 1024);
        assert_eq!(config.request_timeout(), None);
        assert_eq!(config.plants.len(), 3);
        assert_eq!(config.plant(PlantType::Selada).unwrap().icon, "🥬");
    }

    #[test]
    fn catalog_must_cover_every_plant_once() {
        let mut config = DiagnosisConfig::default();
        config.plants.pop();
        assert!(matches!(config.validate(), Err(ConfigError::Invalid(_))));

        let mut config = DiagnosisConfig::default();
        let duplicate = config.plants[0].clone();
        config.plants.push(duplicate);
        assert!(matches!(config.validate(), Err(ConfigError::Invalid(_))));
    }

    #[test]
    fn rejects_zero_limit_and_relative_route() {
        assert!(DiagnosisConfig::from_yaml_str("max_upload_bytes: 0").is_err());
        assert!(DiagnosisConfig::from_yaml_str("result_route: diagnostics-result").is_err());
        assert!(matches!(
            DiagnosisConfig::from_yaml_str("plants: 3"),
            Err(ConfigError::Yaml(_))
        ));
    }

    #[test]
    fn load_reports_missing_file() {
        assert!(matches!(
            DiagnosisConfig::load("/nonexistent/diagnosis.yaml"),
            Err(ConfigError::Io(_))
        ));
    }
}
