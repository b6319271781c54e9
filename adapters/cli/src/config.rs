use std::{
    fs,
    path::{Path, PathBuf},
};

use anyhow::{bail, Context, Result};
use marble_lab_core::GridDimensions;
use marble_lab_persistence::JsonStyle;
use serde::Deserialize;

/// Configuration file looked up in the working directory when none is given.
const DEFAULT_CONFIG_FILE: &str = "marble-lab.toml";

/// Editor settings read from `marble-lab.toml`.
#[derive(Clone, Debug, PartialEq, Eq, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub(crate) struct EditorConfig {
    /// Number of grid rows.
    pub(crate) rows: u32,
    /// Number of grid columns.
    pub(crate) columns: u32,
    /// Whether saved documents are indented.
    pub(crate) pretty_json: bool,
}

impl Default for EditorConfig {
    fn default() -> Self {
        Self {
            rows: GridDimensions::DEFAULT.rows(),
            columns: GridDimensions::DEFAULT.columns(),
            pretty_json: false,
        }
    }
}

impl EditorConfig {
    /// Loads the explicit configuration file, or the default one if it exists.
    pub(crate) fn load(explicit: Option<&Path>) -> Result<Self> {
        let path = match explicit {
            Some(path) => path.to_path_buf(),
            None => {
                let fallback = PathBuf::from(DEFAULT_CONFIG_FILE);
                if !fallback.exists() {
                    return Ok(Self::default());
                }
                fallback
            }
        };

        let contents = fs::read_to_string(&path)
            .with_context(|| format!("failed to read configuration at {}", path.display()))?;
        let config = Self::parse(&contents)
            .with_context(|| format!("invalid configuration in {}", path.display()))?;
        log::debug!("loaded configuration from {}", path.display());
        Ok(config)
    }

    fn parse(contents: &str) -> Result<Self> {
        let config: Self = toml::from_str(contents).context("failed to parse configuration toml")?;
        let _ = config.dimensions()?;
        Ok(config)
    }

    /// Grid dimensions described by the configuration.
    pub(crate) fn dimensions(&self) -> Result<GridDimensions> {
        match GridDimensions::new(self.rows, self.columns) {
            Some(dimensions) => Ok(dimensions),
            None => bail!(
                "grid must have at least one row and column, got {}x{}",
                self.rows,
                self.columns
            ),
        }
    }

    /// JSON layout used when saving.
    pub(crate) fn json_style(&self) -> JsonStyle {
        if self.pretty_json {
            JsonStyle::Pretty
        } else {
            JsonStyle::Compact
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn empty_file_yields_defaults() {
        let config = EditorConfig::parse("").expect("defaults parse");
        assert_eq!(config, EditorConfig::default());
        assert_eq!(config.dimensions().expect("valid"), GridDimensions::DEFAULT);
        assert_eq!(config.json_style(), JsonStyle::Compact);
    }

    #[test]
    fn partial_file_overrides_given_fields() {
        let config = EditorConfig::parse("rows = 5\npretty_json = true\n").expect("parses");
        assert_eq!(config.rows, 5);
        assert_eq!(config.columns, 8);
        assert_eq!(config.json_style(), JsonStyle::Pretty);
    }

    #[test]
    fn zero_dimensions_are_rejected() {
        assert!(EditorConfig::parse("columns = 0").is_err());
    }

    #[test]
    fn unknown_fields_are_rejected() {
        assert!(EditorConfig::parse("colour = \"red\"").is_err());
    }
}
