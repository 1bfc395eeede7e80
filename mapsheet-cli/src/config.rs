//! Configuration handling for the MapSheet CLI
//!
//! Supports loading defaults from mapsheet.toml files with CLI argument
//! overrides.

use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};

use mapsheet_core::{Dpi, Orientation, OutputFormat, PageSize};

#[derive(Debug, Clone, Serialize, Deserialize, Default)]
pub struct Config {
    #[serde(default)]
    pub page: PageConfig,
    #[serde(default)]
    pub output: OutputConfig,
    #[serde(default)]
    pub branding: BrandingConfig,
    #[serde(default)]
    pub auth: AuthConfig,
}

#[derive(Debug, Clone, Serialize, Deserialize, Default)]
pub struct PageConfig {
    /// Catalog page size used when no size flags are given
    #[serde(default)]
    pub size: PageSize,

    /// Default page orientation
    #[serde(default)]
    pub orientation: Orientation,
}

#[derive(Debug, Clone, Serialize, Deserialize, Default)]
pub struct OutputConfig {
    /// Format used when none is given and the extension is not recognised
    #[serde(default)]
    pub format: OutputFormat,

    /// Default print resolution
    #[serde(default)]
    pub dpi: Dpi,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct BrandingConfig {
    /// Logo file path or URL placed on PDF sheets
    pub logo: Option<String>,

    /// Rendered logo width in mm
    #[serde(default = "default_logo_width")]
    pub logo_width: f64,

    /// Rendered logo height in mm
    #[serde(default = "default_logo_height")]
    pub logo_height: f64,
}

#[derive(Debug, Clone, Serialize, Deserialize, Default)]
pub struct AuthConfig {
    /// Access token forwarded to the tile sources
    pub access_token: Option<String>,
}

fn default_logo_width() -> f64 {
    20.0
}

fn default_logo_height() -> f64 {
    20.0
}

impl Default for BrandingConfig {
    fn default() -> Self {
        Self {
            logo: None,
            logo_width: default_logo_width(),
            logo_height: default_logo_height(),
        }
    }
}

impl Config {
    /// Load configuration from file or use defaults
    pub fn load(config_path: Option<&Path>) -> Result<Self> {
        let config = match config_path {
            Some(path) => {
                log::info!("Loading configuration from: {}", path.display());
                Self::load_from_file(path)?
            }
            None => {
                // Try to find mapsheet.toml in current directory
                let default_path = PathBuf::from("mapsheet.toml");
                if default_path.exists() {
                    log::info!("Loading configuration from: mapsheet.toml");
                    Self::load_from_file(&default_path)?
                } else {
                    log::info!("Using default configuration");
                    Self::default()
                }
            }
        };

        Ok(config)
    }

    /// Load configuration from a specific TOML file
    pub fn load_from_file(path: &Path) -> Result<Self> {
        let content = std::fs::read_to_string(path)
            .with_context(|| format!("Failed to read configuration file: {}", path.display()))?;

        let config: Config = toml::from_str(&content)
            .with_context(|| format!("Failed to parse configuration file: {}", path.display()))?;

        Ok(config)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_config() {
        let config = Config::default();
        assert_eq!(config.page.size, PageSize::A4);
        assert_eq!(config.page.orientation, Orientation::Landscape);
        assert_eq!(config.output.format, OutputFormat::Pdf);
        assert_eq!(config.output.dpi.value(), 300);
        assert_eq!(config.branding.logo_width, 20.0);
        assert!(config.auth.access_token.is_none());
    }

    #[test]
    fn test_partial_file_keeps_remaining_defaults() -> Result<()> {
        let dir = tempfile::tempdir()?;
        let path = dir.path().join("mapsheet.toml");
        std::fs::write(
            &path,
            "[page]\nsize = \"a3\"\norientation = \"portrait\"\n\n[output]\ndpi = 200\n",
        )?;

        let config = Config::load_from_file(&path)?;
        assert_eq!(config.page.size, PageSize::A3);
        assert_eq!(config.page.orientation, Orientation::Portrait);
        assert_eq!(config.output.dpi.value(), 200);
        assert_eq!(config.output.format, OutputFormat::Pdf);
        assert_eq!(config.branding.logo_height, 20.0);
        Ok(())
    }

    #[test]
    fn test_rejects_off_catalog_dpi() -> Result<()> {
        let dir = tempfile::tempdir()?;
        let path = dir.path().join("mapsheet.toml");
        std::fs::write(&path, "[output]\ndpi = 150\n")?;

        let result = Config::load_from_file(&path);
        assert!(result.is_err());
        Ok(())
    }

    #[test]
    fn test_missing_file_is_an_error() {
        let result = Config::load_from_file(Path::new("does-not-exist.toml"));
        assert!(result.is_err());
    }

    #[test]
    fn test_branding_section() -> Result<()> {
        let dir = tempfile::tempdir()?;
        let path = dir.path().join("mapsheet.toml");
        std::fs::write(
            &path,
            "[branding]\nlogo = \"https://example.com/logo.png\"\nlogo_width = 25.0\n",
        )?;

        let config = Config::load_from_file(&path)?;
        assert_eq!(
            config.branding.logo.as_deref(),
            Some("https://example.com/logo.png")
        );
        assert_eq!(config.branding.logo_width, 25.0);
        assert_eq!(config.branding.logo_height, 20.0);
        Ok(())
    }
}
