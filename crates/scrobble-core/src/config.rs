use std::fs;
use std::path::{Path, PathBuf};

use serde::Deserialize;
use thiserror::Error;

use crate::histogram::TIMES_LISTENED_BINS;

pub const DEFAULT_PERSON_A_EXPORT: &str = "data/scrobbles-a.csv";
pub const DEFAULT_PERSON_B_EXPORT: &str = "data/scrobbles-b.csv";
pub const JOINT_TABLE_FILE: &str = "joint_pivot_table.csv";
pub const HISTOGRAM_FILE: &str = "histograms.svg";

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("failed to read config {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
    #[error("invalid config: {0}")]
    Toml(#[from] toml::de::Error),
    #[error("invalid config: {0}")]
    Invalid(String),
}

/// One person's export and the label used in suffixes and plot titles.
#[derive(Debug, Clone, PartialEq)]
pub struct PersonConfig {
    pub label: String,
    pub export_path: PathBuf,
}

/// A `[person_*]` table as written in the file; absent keys keep the
/// defaults of that person.
#[derive(Debug, Default, Deserialize)]
#[serde(default)]
struct PersonSection {
    label: Option<String>,
    export_path: Option<PathBuf>,
}

impl PersonSection {
    fn apply_to(self, person: &mut PersonConfig) {
        if let Some(label) = self.label {
            person.label = label;
        }
        if let Some(path) = self.export_path {
            person.export_path = path;
        }
    }
}

#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(default)]
pub struct OutputConfig {
    pub directory: PathBuf,
    pub joint_table_file: String,
    pub histogram_file: String,
}

impl Default for OutputConfig {
    fn default() -> Self {
        Self {
            directory: PathBuf::from("."),
            joint_table_file: JOINT_TABLE_FILE.to_string(),
            histogram_file: HISTOGRAM_FILE.to_string(),
        }
    }
}

impl OutputConfig {
    pub fn joint_table_path(&self) -> PathBuf {
        self.directory.join(&self.joint_table_file)
    }

    pub fn histogram_path(&self) -> PathBuf {
        self.directory.join(&self.histogram_file)
    }
}

#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(default)]
pub struct DisplayConfig {
    pub head_rows: usize,
    pub tail_rows: usize,
    pub times_listened_bins: usize,
}

impl Default for DisplayConfig {
    fn default() -> Self {
        Self {
            head_rows: 5,
            tail_rows: 10,
            times_listened_bins: TIMES_LISTENED_BINS,
        }
    }
}

#[derive(Debug, Default, Deserialize)]
#[serde(default)]
struct ReportFile {
    person_a: PersonSection,
    person_b: PersonSection,
    output: OutputConfig,
    display: DisplayConfig,
}

/// Settings for a report run. Every field has a default, so an empty TOML
/// file (or no file at all) reproduces the built-in paths.
#[derive(Debug, Clone, PartialEq)]
pub struct ReportConfig {
    pub person_a: PersonConfig,
    pub person_b: PersonConfig,
    pub output: OutputConfig,
    pub display: DisplayConfig,
}

impl Default for ReportConfig {
    fn default() -> Self {
        Self {
            person_a: PersonConfig {
                label: "A".to_string(),
                export_path: PathBuf::from(DEFAULT_PERSON_A_EXPORT),
            },
            person_b: PersonConfig {
                label: "B".to_string(),
                export_path: PathBuf::from(DEFAULT_PERSON_B_EXPORT),
            },
            output: OutputConfig::default(),
            display: DisplayConfig::default(),
        }
    }
}

impl ReportConfig {
    pub fn from_toml_str(content: &str) -> Result<Self, ConfigError> {
        let file: ReportFile = toml::from_str(content)?;
        let mut config = ReportConfig {
            output: file.output,
            display: file.display,
            ..ReportConfig::default()
        };
        file.person_a.apply_to(&mut config.person_a);
        file.person_b.apply_to(&mut config.person_b);
        config.validate()?;
        Ok(config)
    }

    pub fn from_toml_file(path: impl AsRef<Path>) -> Result<Self, ConfigError> {
        let path = path.as_ref();
        let content = fs::read_to_string(path).map_err(|source| ConfigError::Io {
            path: path.to_path_buf(),
            source,
        })?;
        Self::from_toml_str(&content)
    }

    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.person_a.label == self.person_b.label {
            return Err(ConfigError::Invalid(format!(
                "person labels must differ, both are '{}'",
                self.person_a.label
            )));
        }
        if self.display.times_listened_bins == 0 {
            return Err(ConfigError::Invalid(
                "times_listened_bins must be at least 1".to_string(),
            ));
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn empty_file_uses_defaults() {
        let config = ReportConfig::from_toml_str("").unwrap();
        assert_eq!(config, ReportConfig::default());
        assert_eq!(
            config.output.joint_table_path(),
            PathBuf::from("./joint_pivot_table.csv")
        );
    }

    #[test]
    fn partial_sections_keep_remaining_defaults() {
        let config = ReportConfig::from_toml_str(
            r#"
            [person_b]
            label = "Ada"
            export_path = "exports/ada.csv"

            [display]
            tail_rows = 3
            "#,
        )
        .unwrap();

        assert_eq!(config.person_a.label, "A");
        assert_eq!(config.person_b.export_path, PathBuf::from("exports/ada.csv"));
        assert_eq!(config.display.head_rows, 5);
        assert_eq!(config.display.tail_rows, 3);
        assert_eq!(config.output.histogram_file, HISTOGRAM_FILE);
    }

    #[test]
    fn person_table_may_set_only_the_label() {
        let config = ReportConfig::from_toml_str("[person_a]\nlabel = \"Zs\"\n").unwrap();

        assert_eq!(config.person_a.label, "Zs");
        assert_eq!(
            config.person_a.export_path,
            PathBuf::from(DEFAULT_PERSON_A_EXPORT)
        );
        assert_eq!(config.person_b, ReportConfig::default().person_b);
    }

    #[test]
    fn person_table_may_set_only_the_export_path() {
        let config =
            ReportConfig::from_toml_str("[person_b]\nexport_path = \"exports/b.csv\"\n").unwrap();

        assert_eq!(config.person_b.label, "B");
        assert_eq!(config.person_b.export_path, PathBuf::from("exports/b.csv"));
    }

    #[test]
    fn identical_labels_are_rejected() {
        let err = ReportConfig::from_toml_str(
            r#"
            [person_b]
            label = "A"
            export_path = "b.csv"
            "#,
        )
        .expect_err("duplicate labels should fail");
        assert!(matches!(err, ConfigError::Invalid(_)));
    }
}
