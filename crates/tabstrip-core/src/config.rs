//! Tab bar configuration

use serde::{Deserialize, Serialize};
use std::time::Duration;

use tabstrip_drag::{DragConfig, DETACH_THRESHOLD, DRAG_THRESHOLD, TRANSITION_DURATION};

use crate::error::CoreError;
use crate::Result;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TabBarConfig {
    /// Whether tabs can be reordered by dragging. Deliberately has no default.
    pub tabs_movable: bool,
    /// Pointer travel in px before a press becomes a drag
    #[serde(default = "default_drag_threshold")]
    pub drag_threshold: f64,
    /// Distance in px outside the strip before a detach is requested
    #[serde(default = "default_detach_threshold")]
    pub detach_threshold: f64,
    /// Snap transition after release; keep equal to the stylesheet's
    #[serde(default = "default_transition_duration_ms")]
    pub transition_duration_ms: u64,
    /// Release an in-progress drag when the dragged item's title changes
    #[serde(default)]
    pub cancel_drag_on_title_change: bool,
}

fn default_drag_threshold() -> f64 {
    DRAG_THRESHOLD
}

fn default_detach_threshold() -> f64 {
    DETACH_THRESHOLD
}

fn default_transition_duration_ms() -> u64 {
    TRANSITION_DURATION.as_millis() as u64
}

impl TabBarConfig {
    pub fn new(tabs_movable: bool) -> Self {
        Self {
            tabs_movable,
            drag_threshold: default_drag_threshold(),
            detach_threshold: default_detach_threshold(),
            transition_duration_ms: default_transition_duration_ms(),
            cancel_drag_on_title_change: false,
        }
    }

    /// Parse and validate a JSON configuration.
    pub fn from_json(json: &str) -> Result<Self> {
        let config: Self = serde_json::from_str(json)?;
        config.validate()?;

        tracing::debug!(
            tabs_movable = config.tabs_movable,
            drag_threshold = config.drag_threshold,
            detach_threshold = config.detach_threshold,
            "Loaded tab bar configuration"
        );

        Ok(config)
    }

    pub fn validate(&self) -> Result<()> {
        for (name, value) in [
            ("drag_threshold", self.drag_threshold),
            ("detach_threshold", self.detach_threshold),
        ] {
            if !value.is_finite() || value < 0.0 {
                return Err(CoreError::InvalidConfig(format!(
                    "{name} must be a non-negative number, got {value}"
                )));
            }
        }
        Ok(())
    }

    pub fn transition_duration(&self) -> Duration {
        Duration::from_millis(self.transition_duration_ms)
    }

    pub fn drag_config(&self) -> DragConfig {
        DragConfig {
            drag_threshold: self.drag_threshold,
            detach_threshold: self.detach_threshold,
            transition_duration: self.transition_duration(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults_match_engine_constants() {
        let config = TabBarConfig::new(true);
        assert_eq!(config.drag_config(), DragConfig::default());
    }

    #[test]
    fn test_from_json() {
        let json = r#"{
            "tabs_movable": false,
            "detach_threshold": 40,
            "cancel_drag_on_title_change": true
        }"#;
        let config = TabBarConfig::from_json(json).unwrap();

        assert!(!config.tabs_movable);
        assert_eq!(config.detach_threshold, 40.0);
        assert_eq!(config.drag_threshold, 5.0);
        assert_eq!(config.transition_duration(), Duration::from_millis(150));
        assert!(config.cancel_drag_on_title_change);
    }

    #[test]
    fn test_tabs_movable_is_required() {
        let result = TabBarConfig::from_json(r#"{"drag_threshold": 5}"#);
        assert!(matches!(result, Err(CoreError::Json(_))));
    }

    #[test]
    fn test_negative_threshold_rejected() {
        let result = TabBarConfig::from_json(r#"{"tabs_movable": true, "drag_threshold": -1}"#);
        assert!(matches!(result, Err(CoreError::InvalidConfig(_))));
    }
}
