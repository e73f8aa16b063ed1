//! Tab title data
//!
//! A title is everything the visual tab shows:
//! - Text
//! - Optional icon and extra class
//! - Whether a close icon click should request a close

use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Title {
    /// Label text
    pub text: String,
    /// Icon class or identifier, if any
    #[serde(default)]
    pub icon: Option<String>,
    /// Extra class applied to the visual tab
    #[serde(default)]
    pub class_name: Option<String>,
    /// Whether the tab offers a close action
    #[serde(default)]
    pub closable: bool,
}

impl Title {
    pub fn new(text: impl Into<String>) -> Self {
        Self {
            text: text.into(),
            ..Self::default()
        }
    }

    pub fn with_icon(mut self, icon: impl Into<String>) -> Self {
        self.icon = Some(icon.into());
        self
    }

    pub fn with_class_name(mut self, class_name: impl Into<String>) -> Self {
        self.class_name = Some(class_name.into());
        self
    }

    pub fn closable(mut self, closable: bool) -> Self {
        self.closable = closable;
        self
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_builder() {
        let title = Title::new("Red").with_icon("dot").closable(true);
        assert_eq!(title.text, "Red");
        assert_eq!(title.icon.as_deref(), Some("dot"));
        assert!(title.class_name.is_none());
        assert!(title.closable);
    }

    #[test]
    fn test_deserialize_defaults() {
        let title: Title = serde_json::from_str(r#"{"text": "Blue"}"#).unwrap();
        assert_eq!(title, Title::new("Blue"));
    }
}
