//! TOML configuration for the CLI.
//!
//! ```toml
//! [dataset]
//! path = "data/youth_engagement.csv"
//! delimiter = ","
//!
//! [chart]
//! backend = "alternate"
//! theme = "darkgrid"
//! palette = "muted"
//! label_rotation = 45
//! ```
//!
//! Every section and key is optional.

use std::path::{Path, PathBuf};

use engagement_chart_models::ChartStyle;
use engagement_ingest::LoadOptions;
use serde::Deserialize;

/// Errors that can occur while loading the CLI configuration.
#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    /// The config file could not be read.
    #[error("Failed to read config {path}: {source}")]
    Io {
        /// Path of the config file.
        path: PathBuf,
        /// Underlying I/O failure.
        source: std::io::Error,
    },
    /// The config file is not valid TOML for this layout.
    #[error("Failed to parse config: {0}")]
    Parse(#[from] toml::de::Error),
    /// The delimiter is not a single ASCII character.
    #[error("Delimiter must be a single ASCII character, got {0:?}")]
    InvalidDelimiter(char),
    /// Neither `--data` nor `[dataset] path` was given.
    #[error("No dataset given: pass --data or set [dataset] path in the config")]
    MissingDataset,
}

/// Parsed config file.
#[derive(Debug, Clone, PartialEq, Eq, Default, Deserialize)]
#[serde(default)]
pub struct Config {
    /// `[dataset]` section.
    pub dataset: DatasetConfig,
    /// `[chart]` section, applied on top of each chart's defaults.
    pub chart: ChartStyle,
}

/// Where the dataset lives and how it is delimited.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(default)]
pub struct DatasetConfig {
    /// CSV file to load when `--data` is not given.
    pub path: Option<PathBuf>,
    /// Field delimiter; must be ASCII.
    pub delimiter: char,
}

impl Default for DatasetConfig {
    fn default() -> Self {
        Self {
            path: None,
            delimiter: ',',
        }
    }
}

impl Config {
    /// Reads and parses the config file at `path`.
    ///
    /// # Errors
    ///
    /// * If the file can't be read
    /// * If the contents aren't valid TOML for this layout
    pub fn load(path: &Path) -> Result<Self, ConfigError> {
        let contents = std::fs::read_to_string(path).map_err(|source| ConfigError::Io {
            path: path.to_path_buf(),
            source,
        })?;
        Self::parse(&contents)
    }

    /// Parses config file contents.
    ///
    /// # Errors
    ///
    /// * If `contents` isn't valid TOML for this layout
    pub fn parse(contents: &str) -> Result<Self, ConfigError> {
        Ok(toml::de::from_str(contents)?)
    }

    /// Resolves the dataset to load, preferring `path_override` over the
    /// configured path.
    ///
    /// # Errors
    ///
    /// * If neither an override nor a configured path is present
    /// * If the delimiter isn't a single-byte character
    pub fn dataset(
        &self,
        path_override: Option<PathBuf>,
    ) -> Result<(PathBuf, LoadOptions), ConfigError> {
        let path = path_override
            .or_else(|| self.dataset.path.clone())
            .ok_or(ConfigError::MissingDataset)?;

        let delimiter = self.dataset.delimiter;
        let delimiter =
            u8::try_from(delimiter).map_err(|_| ConfigError::InvalidDelimiter(delimiter))?;
        if !delimiter.is_ascii() {
            return Err(ConfigError::InvalidDelimiter(char::from(delimiter)));
        }

        Ok((
            path,
            LoadOptions {
                delimiter,
                ..LoadOptions::default()
            },
        ))
    }
}
