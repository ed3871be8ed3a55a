//! Application configuration value object

use serde::{Deserialize, Serialize};

use crate::domain::capture::{Duration, VideoFormat};

/// Default translation service endpoint (local dev server)
pub const DEFAULT_ENDPOINT: &str = "http://127.0.0.1:5000";

/// Default camera device node
pub const DEFAULT_DEVICE: &str = "/dev/video0";

/// Application configuration.
/// All fields are optional to support partial configs and merging.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct AppConfig {
    pub endpoint: Option<String>,
    pub library_path: Option<String>,
    pub device: Option<String>,
    pub format: Option<String>,
    pub translate: Option<bool>,
    pub max_duration: Option<String>,
}

impl AppConfig {
    /// Create config with default values
    pub fn defaults() -> Self {
        Self {
            endpoint: Some(DEFAULT_ENDPOINT.to_string()),
            library_path: None,
            device: Some(DEFAULT_DEVICE.to_string()),
            format: Some("webm".to_string()),
            translate: Some(false),
            max_duration: Some("60s".to_string()),
        }
    }

    /// Create an empty config (all None)
    pub fn empty() -> Self {
        Self::default()
    }

    /// Merge this config with another, where other takes precedence.
    /// Only non-None values from other will override this.
    pub fn merge(self, other: Self) -> Self {
        Self {
            endpoint: other.endpoint.or(self.endpoint),
            library_path: other.library_path.or(self.library_path),
            device: other.device.or(self.device),
            format: other.format.or(self.format),
            translate: other.translate.or(self.translate),
            max_duration: other.max_duration.or(self.max_duration),
        }
    }

    /// Get endpoint, or the local default if not set
    pub fn endpoint_or_default(&self) -> &str {
        self.endpoint.as_deref().unwrap_or(DEFAULT_ENDPOINT)
    }

    /// Get camera device, or the default node if not set
    pub fn device_or_default(&self) -> &str {
        self.device.as_deref().unwrap_or(DEFAULT_DEVICE)
    }

    /// Get format as parsed VideoFormat, or default if not set/invalid
    pub fn format_or_default(&self) -> VideoFormat {
        self.format
            .as_ref()
            .and_then(|s| s.parse().ok())
            .unwrap_or_default()
    }

    /// Get translate setting, or false if not set
    pub fn translate_or_default(&self) -> bool {
        self.translate.unwrap_or(false)
    }

    /// Get max_duration as parsed Duration, or default if not set/invalid
    pub fn max_duration_or_default(&self) -> Duration {
        self.max_duration
            .as_ref()
            .and_then(|s| s.parse().ok())
            .unwrap_or_else(Duration::default_max_duration)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn defaults_have_expected_values() {
        let config = AppConfig::defaults();
        assert_eq!(config.endpoint, Some(DEFAULT_ENDPOINT.to_string()));
        assert!(config.library_path.is_none());
        assert_eq!(config.device, Some(DEFAULT_DEVICE.to_string()));
        assert_eq!(config.format, Some("webm".to_string()));
        assert_eq!(config.translate, Some(false));
        assert_eq!(config.max_duration, Some("60s".to_string()));
    }

    #[test]
    fn empty_has_all_none() {
        let config = AppConfig::empty();
        assert!(config.endpoint.is_none());
        assert!(config.library_path.is_none());
        assert!(config.device.is_none());
        assert!(config.format.is_none());
        assert!(config.translate.is_none());
        assert!(config.max_duration.is_none());
    }

    #[test]
    fn merge_other_takes_precedence() {
        let base = AppConfig {
            endpoint: Some("http://base:5000".to_string()),
            format: Some("webm".to_string()),
            ..Default::default()
        };

        let other = AppConfig {
            endpoint: Some("http://other:5000".to_string()),
            format: None, // Should not override
            translate: Some(true),
            ..Default::default()
        };

        let merged = base.merge(other);

        assert_eq!(merged.endpoint, Some("http://other:5000".to_string()));
        assert_eq!(merged.format, Some("webm".to_string())); // Kept from base
        assert_eq!(merged.translate, Some(true));
    }

    #[test]
    fn merge_preserves_base_when_other_is_none() {
        let base = AppConfig {
            device: Some("/dev/video2".to_string()),
            translate: Some(true),
            ..Default::default()
        };

        let merged = base.merge(AppConfig::empty());

        assert_eq!(merged.device, Some("/dev/video2".to_string()));
        assert_eq!(merged.translate, Some(true));
    }

    #[test]
    fn format_or_default_parses() {
        let config = AppConfig {
            format: Some("mp4".to_string()),
            ..Default::default()
        };
        assert_eq!(config.format_or_default(), VideoFormat::Mp4);
    }

    #[test]
    fn format_or_default_uses_default_on_invalid() {
        let config = AppConfig {
            format: Some("avi".to_string()),
            ..Default::default()
        };
        assert_eq!(config.format_or_default(), VideoFormat::Webm);
    }

    #[test]
    fn max_duration_or_default_parses() {
        let config = AppConfig {
            max_duration: Some("2m".to_string()),
            ..Default::default()
        };
        assert_eq!(config.max_duration_or_default().as_secs(), 120);
    }

    #[test]
    fn max_duration_or_default_uses_default_on_invalid() {
        let config = AppConfig {
            max_duration: Some("invalid".to_string()),
            ..Default::default()
        };
        assert_eq!(config.max_duration_or_default().as_secs(), 60);
    }

    #[test]
    fn boolean_defaults() {
        let config = AppConfig::empty();
        assert!(!config.translate_or_default());
    }

    #[test]
    fn endpoint_or_default() {
        assert_eq!(AppConfig::empty().endpoint_or_default(), DEFAULT_ENDPOINT);
    }
}
