//! Configuration management for the schema viewer
//!
//! Supports loading configuration from:
//! - Default values
//! - Config file (viewer.toml)
//! - Environment variables (VIEWER__*)
//!
//! ## Example config file (viewer.toml):
//! ```toml
//! [documents]
//! schema_dir = "./schemas"
//! skip_prefixes = ["target/", "node_modules/"]
//!
//! [render]
//! strict = false
//! expand_depth = 0
//!
//! [output]
//! format = "table"
//! indent_width = 2
//! show_validation = true
//! ```

use config_crate::{Config, ConfigError, Environment, File};
use serde::{Deserialize, Serialize};
use std::path::PathBuf;

use crate::resolver::LoadConfig;
use crate::table::TableFormatter;

/// Main configuration for the viewer
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct ViewerConfig {
    /// Where schema documents come from
    #[serde(default)]
    pub documents: DocumentsConfig,

    /// Rendering behaviour
    #[serde(default)]
    pub render: RenderConfig,

    /// Output settings
    #[serde(default)]
    pub output: OutputConfig,
}

/// Document loading configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DocumentsConfig {
    /// Root directory that document ids are relative to
    #[serde(default = "default_schema_dir")]
    pub schema_dir: PathBuf,

    /// Skip documents under these path prefixes
    #[serde(default = "default_skip_prefixes")]
    pub skip_prefixes: Vec<String>,
}

/// Rendering configuration
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct RenderConfig {
    /// Abort on the first malformed subtree instead of showing an error row
    #[serde(default)]
    pub strict: bool,

    /// Reference levels to expand before the first render
    #[serde(default)]
    pub expand_depth: usize,
}

/// Output configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct OutputConfig {
    #[serde(default)]
    pub format: OutputFormat,

    /// Spaces per depth level in table output
    #[serde(default = "default_indent_width")]
    pub indent_width: usize,

    /// Show validation keywords in table output
    #[serde(default = "default_true")]
    pub show_validation: bool,
}

/// Row output format
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
#[serde(rename_all = "lowercase")]
pub enum OutputFormat {
    #[default]
    Table,
    Json,
}

// Default value functions
fn default_schema_dir() -> PathBuf {
    PathBuf::from(".")
}

fn default_skip_prefixes() -> Vec<String> {
    LoadConfig::default().skip_prefixes
}

fn default_indent_width() -> usize {
    2
}

fn default_true() -> bool {
    true
}

impl Default for DocumentsConfig {
    fn default() -> Self {
        Self {
            schema_dir: default_schema_dir(),
            skip_prefixes: default_skip_prefixes(),
        }
    }
}

impl Default for OutputConfig {
    fn default() -> Self {
        Self {
            format: OutputFormat::Table,
            indent_width: default_indent_width(),
            show_validation: true,
        }
    }
}

impl ViewerConfig {
    /// Load configuration from default locations
    pub fn load() -> Result<Self, ConfigError> {
        Self::load_from(None)
    }

    /// Load configuration from a specific file
    pub fn load_from(config_path: Option<&str>) -> Result<Self, ConfigError> {
        let mut builder = Config::builder();

        let config_locations = ["viewer.toml", ".viewer.toml", "config/viewer.toml"];

        for location in config_locations {
            builder = builder.add_source(File::with_name(location).required(false));
        }

        // XDG config directory
        if let Some(config_dir) = directories::ProjectDirs::from("dev", "familiar", "schema-viewer") {
            let xdg_config = config_dir.config_dir().join("viewer.toml");
            if xdg_config.exists() {
                builder = builder.add_source(File::from(xdg_config).required(false));
            }
        }

        if let Some(path) = config_path {
            builder = builder.add_source(File::with_name(path).required(true));
        }

        // VIEWER__RENDER__STRICT=true etc.
        builder = builder.add_source(
            Environment::with_prefix("VIEWER")
                .prefix_separator("__")
                .separator("__")
                .try_parsing(true),
        );

        let config = builder.build()?;
        config.try_deserialize()
    }

    /// Save configuration to a file
    pub fn save(&self, path: &str) -> std::io::Result<()> {
        let content = toml::to_string_pretty(self)
            .map_err(|e| std::io::Error::new(std::io::ErrorKind::InvalidData, e))?;
        std::fs::write(path, content)
    }

    /// Schema directory, resolved against the current directory
    pub fn schema_dir(&self) -> PathBuf {
        if self.documents.schema_dir.is_absolute() {
            self.documents.schema_dir.clone()
        } else {
            std::env::current_dir()
                .unwrap_or_default()
                .join(&self.documents.schema_dir)
        }
    }

    pub fn load_config(&self) -> LoadConfig {
        LoadConfig {
            skip_prefixes: self.documents.skip_prefixes.clone(),
        }
    }

    pub fn formatter(&self) -> TableFormatter {
        TableFormatter::new(self.output.indent_width, self.output.show_validation)
    }

    /// Every setting as a `section.key` / value pair, in file order
    pub fn settings(&self) -> Vec<(&'static str, String)> {
        let format = match self.output.format {
            OutputFormat::Table => "table",
            OutputFormat::Json => "json",
        };
        vec![
            ("documents.schema_dir", self.documents.schema_dir.display().to_string()),
            ("documents.skip_prefixes", self.documents.skip_prefixes.join(", ")),
            ("render.strict", self.render.strict.to_string()),
            ("render.expand_depth", self.render.expand_depth.to_string()),
            ("output.format", format.to_string()),
            ("output.indent_width", self.output.indent_width.to_string()),
            ("output.show_validation", self.output.show_validation.to_string()),
        ]
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::tempdir;

    #[test]
    fn test_default_config() {
        let config = ViewerConfig::default();
        assert!(!config.render.strict);
        assert_eq!(config.output.format, OutputFormat::Table);
        assert_eq!(config.output.indent_width, 2);
        assert!(config.documents.skip_prefixes.contains(&"node_modules/".to_string()));
    }

    #[test]
    fn test_serialize_config() {
        let config = ViewerConfig::default();
        let toml_str = toml::to_string_pretty(&config).unwrap();
        assert!(toml_str.contains("[documents]"));
        assert!(toml_str.contains("[render]"));
        assert!(toml_str.contains("[output]"));
    }

    #[test]
    fn test_load_from_file() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("custom.toml");
        std::fs::write(
            &path,
            "[render]\nstrict = true\nexpand_depth = 2\n\n[output]\nformat = \"json\"\n",
        )
        .unwrap();

        let config = ViewerConfig::load_from(path.to_str()).unwrap();
        assert!(config.render.strict);
        assert_eq!(config.render.expand_depth, 2);
        assert_eq!(config.output.format, OutputFormat::Json);
        assert_eq!(config.output.indent_width, 2);
    }

    #[test]
    fn test_settings_use_file_keys() {
        let mut config = ViewerConfig::default();
        config.output.format = OutputFormat::Json;
        let settings = config.settings();

        assert_eq!(settings.len(), 7);
        assert_eq!(settings[0].0, "documents.schema_dir");
        assert!(settings.contains(&("output.format", "json".to_string())));
        assert!(settings.contains(&("render.strict", "false".to_string())));
    }

    #[test]
    fn test_save_round_trip() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("viewer.toml");
        let mut config = ViewerConfig::default();
        config.output.indent_width = 6;
        config.save(path.to_str().unwrap()).unwrap();

        let loaded = ViewerConfig::load_from(path.to_str()).unwrap();
        assert_eq!(loaded.output.indent_width, 6);
    }
}
