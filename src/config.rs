use serde::{Deserialize, Serialize};
use std::fs;
use std::path::{Path, PathBuf};

/// Runtime settings for one training run.
///
/// Loaded from `trainer.json` in the working directory when present,
/// otherwise defaults are used. The endpoint and training key can also be
/// supplied through `VISION_ENDPOINT` / `VISION_TRAINING_KEY`, which win
/// over the file so credentials do not have to live on disk.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct TrainerConfig {
    /// Base URL of the training service.
    pub endpoint: String,
    /// Credential sent with every request.
    pub training_key: String,
    /// Root folder holding one subfolder of images per class.
    pub image_root: PathBuf,
    /// Name of the project created on the service.
    pub project_name: String,
    /// Upper bound on images uploaded per class. Folders with fewer files
    /// than this are skipped entirely.
    pub images_per_class: usize,
    /// Upper bound on the number of classes taken from the image root.
    pub max_classes: usize,
    /// Seconds between training status polls.
    pub poll_interval_secs: u64,
    /// Give up waiting for training after this many seconds.
    pub poll_timeout_secs: u64,
}

impl Default for TrainerConfig {
    fn default() -> Self {
        Self {
            endpoint: String::new(),
            training_key: String::new(),
            image_root: PathBuf::from("training_images"),
            project_name: "Test01".to_string(),
            images_per_class: 10,
            max_classes: 3,
            poll_interval_secs: 1,
            poll_timeout_secs: 1800,
        }
    }
}

impl TrainerConfig {
    pub fn default_path() -> PathBuf {
        PathBuf::from("trainer.json")
    }

    pub fn load<P: AsRef<Path>>(path: P) -> Result<Self, crate::error::AppError> {
        let content = fs::read_to_string(path)?;
        let config: TrainerConfig = serde_json::from_str(&content)?;
        Ok(config)
    }

    /// Load from the default path, falling back to defaults when the file
    /// is missing or malformed, then apply environment overrides.
    pub fn load_or_default() -> Self {
        let path = Self::default_path();
        let mut config = if path.exists() {
            match Self::load(&path) {
                Ok(config) => config,
                Err(e) => {
                    eprintln!(
                        "Warning: failed to read config {}: {}",
                        path.display(),
                        e
                    );
                    eprintln!("Using default settings");
                    Self::default()
                }
            }
        } else {
            Self::default()
        };
        config.apply_env();
        config
    }

    fn apply_env(&mut self) {
        if let Ok(endpoint) = std::env::var("VISION_ENDPOINT") {
            self.endpoint = endpoint;
        }
        if let Ok(key) = std::env::var("VISION_TRAINING_KEY") {
            self.training_key = key;
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;

    #[test]
    fn test_default_config() {
        let config = TrainerConfig::default();
        assert_eq!(config.images_per_class, 10);
        assert_eq!(config.max_classes, 3);
        assert_eq!(config.project_name, "Test01");
        assert_eq!(config.poll_interval_secs, 1);
    }

    #[test]
    fn test_serialize_deserialize() {
        let config = TrainerConfig::default();
        let json = serde_json::to_string(&config).unwrap();
        let deserialized: TrainerConfig = serde_json::from_str(&json).unwrap();

        assert_eq!(config.project_name, deserialized.project_name);
        assert_eq!(config.images_per_class, deserialized.images_per_class);
        assert_eq!(config.image_root, deserialized.image_root);
    }

    #[test]
    fn test_partial_file_fills_defaults() {
        let json = r#"{ "project_name": "Simpsons", "max_classes": 5 }"#;
        let config: TrainerConfig = serde_json::from_str(json).unwrap();

        assert_eq!(config.project_name, "Simpsons");
        assert_eq!(config.max_classes, 5);
        assert_eq!(config.images_per_class, 10);
        assert_eq!(config.poll_timeout_secs, 1800);
    }

    #[test]
    fn test_load_from_file() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("trainer.json");
        let mut file = fs::File::create(&path).unwrap();
        write!(file, r#"{{ "endpoint": "https://vision.example", "images_per_class": 25 }}"#)
            .unwrap();

        let config = TrainerConfig::load(&path).unwrap();
        assert_eq!(config.endpoint, "https://vision.example");
        assert_eq!(config.images_per_class, 25);
    }

    #[test]
    fn test_env_overrides_win() {
        std::env::set_var("VISION_ENDPOINT", "https://override.example");
        std::env::set_var("VISION_TRAINING_KEY", "from-env");

        let mut config = TrainerConfig {
            endpoint: "https://file.example".to_string(),
            training_key: "from-file".to_string(),
            ..TrainerConfig::default()
        };
        config.apply_env();

        assert_eq!(config.endpoint, "https://override.example");
        assert_eq!(config.training_key, "from-env");

        std::env::remove_var("VISION_ENDPOINT");
        std::env::remove_var("VISION_TRAINING_KEY");
    }

    #[test]
    fn test_load_missing_file_errors() {
        let dir = tempfile::tempdir().unwrap();
        assert!(TrainerConfig::load(&dir.path().join("nope.json")).is_err());
    }
}
