use std::path::{Path, PathBuf};

use directories::ProjectDirs;
use serde::{Deserialize, Serialize};

use crate::entry::{DEFAULT_SHEET, default_dataset_path};
use crate::error::GlossError;
use crate::query::Operator;
use crate::search::DEFAULT_THRESHOLD;
use crate::suggest::DEFAULT_MAX_SUGGESTIONS;

/// User configuration loaded from `~/.config/gloss/config.toml`.
///
/// All fields have sensible defaults so the config file is optional.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Config {
    #[serde(default = "default_dataset_path")]
    pub dataset_path: PathBuf,
    #[serde(default = "default_threshold")]
    pub threshold: u8,
    #[serde(default)]
    pub operator: Operator,
    #[serde(default = "default_max_suggestions")]
    pub max_suggestions: usize,
    /// Worksheet read when `dataset_path` is a workbook.
    #[serde(default = "default_sheet")]
    pub sheet: String,
    /// Heading of the interactive browser.
    #[serde(default = "default_title")]
    pub title: String,
    #[serde(default = "default_intro")]
    pub intro: String,
}

pub const DEFAULT_TITLE: &str = "Resilience Planet Initiative Glossary";

pub const DEFAULT_INTRO: &str = "Welcome to the Resilience Planet Initiative Glossary App. \
This application offers a friendly way to explore a wide range of definitions and classifications \
that underpin how solutions could be organized within the RPI ecosystem. It is designed to \
facilitate access to these key definitions during the design process of the Solution Hub. \
Use the sidebar to filter entries by their classification system (Source) and the search box to \
quickly find the definitions and concepts.";

fn default_threshold() -> u8 {
    DEFAULT_THRESHOLD
}

fn default_max_suggestions() -> usize {
    DEFAULT_MAX_SUGGESTIONS
}

fn default_sheet() -> String {
    DEFAULT_SHEET.to_string()
}

fn default_title() -> String {
    DEFAULT_TITLE.to_string()
}

fn default_intro() -> String {
    DEFAULT_INTRO.to_string()
}

impl Default for Config {
    fn default() -> Self {
        Self {
            dataset_path: default_dataset_path(),
            threshold: default_threshold(),
            operator: Operator::default(),
            max_suggestions: default_max_suggestions(),
            sheet: default_sheet(),
            title: default_title(),
            intro: default_intro(),
        }
    }
}

impl Config {
    /// Load from the user config directory, falling back to defaults.
    pub fn load() -> Result<Self, GlossError> {
        match Self::config_path() {
            Some(path) => Self::load_from(&path),
            None => Ok(Self::default()),
        }
    }

    /// Load from an explicit path; a missing file yields defaults.
    pub fn load_from(path: &Path) -> Result<Self, GlossError> {
        if !path.exists() {
            return Ok(Self::default());
        }
        let content = std::fs::read_to_string(path)?;
        let config: Self = toml::from_str(&content)
            .map_err(|e| GlossError::InvalidConfig(format!("{}: {e}", path.display())))?;
        config.validate()?;
        Ok(config)
    }

    pub fn validate(&self) -> Result<(), GlossError> {
        if self.threshold > 100 {
            return Err(GlossError::InvalidConfig(format!(
                "threshold must be between 0 and 100, got {}",
                self.threshold
            )));
        }
        Ok(())
    }

    pub fn config_path() -> Option<PathBuf> {
        ProjectDirs::from("", "", "gloss").map(|dirs| dirs.config_dir().join("config.toml"))
    }
}

#[cfg(test)]
mod tests {
    use pretty_assertions::assert_eq;

    use super::*;

    #[test]
    fn missing_file_gives_defaults() {
        let dir = tempfile::tempdir().unwrap();
        let config = Config::load_from(&dir.path().join("config.toml")).unwrap();
        assert_eq!(config, Config::default());
        assert_eq!(config.threshold, 70);
        assert_eq!(config.max_suggestions, 5);
        assert_eq!(config.operator, Operator::And);
        assert_eq!(config.dataset_path, PathBuf::from("glossary.csv"));
        assert_eq!(config.sheet, "Glossary");
        assert_eq!(config.title, "Resilience Planet Initiative Glossary");
        assert!(config.intro.starts_with("Welcome to the Resilience Planet Initiative"));
    }

    #[test]
    fn workbook_and_heading_settings() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("config.toml");
        std::fs::write(
            &path,
            "dataset_path = \"RPI_glossary_official_info.xlsx\"\nsheet = \"Terms\"\ntitle = \"Terms\"\n",
        )
        .unwrap();
        let config = Config::load_from(&path).unwrap();
        assert_eq!(config.sheet, "Terms");
        assert_eq!(config.title, "Terms");
        assert_eq!(config.intro, DEFAULT_INTRO);
    }

    #[test]
    fn partial_file_keeps_other_defaults() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("config.toml");
        std::fs::write(&path, "operator = \"OR\"\ndataset_path = \"/data/rpi.json\"\n").unwrap();
        let config = Config::load_from(&path).unwrap();
        assert_eq!(config.operator, Operator::Or);
        assert_eq!(config.dataset_path, PathBuf::from("/data/rpi.json"));
        assert_eq!(config.threshold, 70);
    }

    #[test]
    fn out_of_range_threshold_rejected() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("config.toml");
        std::fs::write(&path, "threshold = 130\n").unwrap();
        assert!(matches!(
            Config::load_from(&path),
            Err(GlossError::InvalidConfig(_))
        ));
    }

    #[test]
    fn malformed_file_rejected() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("config.toml");
        std::fs::write(&path, "threshold = \"high\"\n").unwrap();
        assert!(Config::load_from(&path).is_err());
    }
}
