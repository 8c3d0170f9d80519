use serde::{Deserialize, Serialize};
use std::{collections::BTreeMap, path::PathBuf};

/// Stores user-configurable wizard preferences.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Config {
    /// First segment of exported file names.
    #[serde(default = "Config::default_export_prefix")]
    pub export_prefix: String,
    /// Prepended to a field's element id to form its saved-answers key.
    #[serde(default = "Config::default_storage_key_prefix")]
    pub storage_key_prefix: String,

    #[serde(skip_serializing_if = "Option::is_none")]
    /// Optional custom export directory. Defaults to `~/Documents/RecruitWizard`.
    pub export_dir: Option<PathBuf>,

    #[serde(skip_serializing_if = "Option::is_none")]
    /// Optional directory holding question files. Defaults to `<app home>/questions`.
    pub questions_dir: Option<PathBuf>,

    /// Field record key to question file name.
    #[serde(default = "Config::default_assistants")]
    pub assistants: BTreeMap<String, String>,

    #[serde(default)]
    pub accessibility: AccessibilitySettings,
    #[serde(default = "Config::default_ui_color_enabled")]
    pub ui_color_enabled: bool,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            export_prefix: Self::default_export_prefix(),
            storage_key_prefix: Self::default_storage_key_prefix(),
            export_dir: None,
            questions_dir: None,
            assistants: Self::default_assistants(),
            accessibility: AccessibilitySettings::default(),
            ui_color_enabled: Self::default_ui_color_enabled(),
        }
    }
}

impl Config {
    pub fn default_export_prefix() -> String {
        "chiikiokoshi".into()
    }

    pub fn default_storage_key_prefix() -> String {
        "ai-widget-".into()
    }

    pub fn default_ui_color_enabled() -> bool {
        true
    }

    pub fn default_assistants() -> BTreeMap<String, String> {
        BTreeMap::from([
            ("mission".to_string(), "mission.json".to_string()),
            (
                "regionFeatures".to_string(),
                "region-features.json".to_string(),
            ),
        ])
    }

    pub fn resolve_export_dir(&self) -> PathBuf {
        if let Some(path) = &self.export_dir {
            return path.clone();
        }

        let base = dirs::document_dir()
            .or_else(dirs::home_dir)
            .unwrap_or_else(|| PathBuf::from("."));

        base.join("RecruitWizard")
    }

    pub fn resolve_questions_dir(&self, app_home: &std::path::Path) -> PathBuf {
        self.questions_dir
            .clone()
            .unwrap_or_else(|| app_home.join("questions"))
    }
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct AccessibilitySettings {
    #[serde(default)]
    pub plain_output: bool,
    #[serde(default)]
    pub high_contrast: bool,
}
