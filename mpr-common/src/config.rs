//! Configuration loading
//!
//! Priority order (highest first):
//! 1. Command-line argument
//! 2. Environment variable (bound to the same argument)
//! 3. TOML config file (`mpr.toml` or `--config`)
//! 4. Compiled default
//!
//! Missing default config file SHALL NOT cause termination; a config file
//! named explicitly must exist and parse.

use std::path::{Path, PathBuf};

use clap::Parser;
use serde::Deserialize;

use crate::{Error, Result};

/// Config file looked up in the working directory when `--config` is absent
pub const DEFAULT_CONFIG_FILE: &str = "mpr.toml";

pub const DEFAULT_HOST: &str = "127.0.0.1";
pub const DEFAULT_PORT: u16 = 5000;
pub const DEFAULT_DATA_FILE: &str = "dados_desaparecidos.json";
pub const DEFAULT_UPLOAD_DIR: &str = "uploads";
pub const DEFAULT_STATIC_DIR: &str = "static";
pub const DEFAULT_LOG_LEVEL: &str = "info";

/// Command-line arguments for mpr-web
#[derive(Parser, Debug, Clone, Default)]
#[command(name = "mpr-web")]
#[command(about = "Missing-person registry web service")]
#[command(version)]
pub struct CliArgs {
    /// TOML configuration file
    #[arg(short, long, env = "MPR_CONFIG")]
    pub config: Option<PathBuf>,

    /// Address to bind
    #[arg(long, env = "MPR_HOST")]
    pub host: Option<String>,

    /// Port to listen on
    #[arg(short, long, env = "MPR_PORT")]
    pub port: Option<u16>,

    /// JSON document holding all records
    #[arg(long, env = "MPR_DATA_FILE")]
    pub data_file: Option<PathBuf>,

    /// Directory receiving uploaded photos
    #[arg(long, env = "MPR_UPLOAD_DIR")]
    pub upload_dir: Option<PathBuf>,

    /// Static asset directory served under /static
    #[arg(long, env = "MPR_STATIC_DIR")]
    pub static_dir: Option<PathBuf>,

    /// Directory with page template overrides
    #[arg(long, env = "MPR_TEMPLATE_DIR")]
    pub template_dir: Option<PathBuf>,

    /// Serialize store writes behind an in-process lock
    #[arg(long)]
    pub serialize_writes: bool,

    /// Log level (trace, debug, info, warn, error)
    #[arg(long, env = "MPR_LOG_LEVEL")]
    pub log_level: Option<String>,
}

/// Bootstrap configuration loaded from TOML file
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct TomlConfig {
    pub host: Option<String>,
    pub port: Option<u16>,
    pub store: StoreSection,
    pub uploads: UploadsSection,
    pub web: WebSection,
    pub logging: LoggingConfig,
}

#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct StoreSection {
    pub data_file: Option<PathBuf>,
    pub serialize_writes: Option<bool>,
}

#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct UploadsSection {
    pub dir: Option<PathBuf>,
}

#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct WebSection {
    pub static_dir: Option<PathBuf>,
    pub template_dir: Option<PathBuf>,
}

/// Logging configuration
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct LoggingConfig {
    pub level: Option<String>,
}

impl TomlConfig {
    /// Read and parse a TOML config file
    pub fn load(path: &Path) -> Result<Self> {
        let content = std::fs::read_to_string(path)
            .map_err(|e| Error::Config(format!("Read {} failed: {}", path.display(), e)))?;
        Self::parse(&content)
            .map_err(|e| Error::Config(format!("Parse {} failed: {}", path.display(), e)))
    }

    pub fn parse(content: &str) -> std::result::Result<Self, toml::de::Error> {
        toml::from_str(content)
    }
}

/// Fully resolved service configuration
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Config {
    pub host: String,
    pub port: u16,
    pub data_file: PathBuf,
    pub serialize_writes: bool,
    pub upload_dir: PathBuf,
    pub static_dir: PathBuf,
    pub template_dir: Option<PathBuf>,
    pub log_level: String,
    /// TOML file the values were read from, if any
    pub config_file: Option<PathBuf>,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            host: DEFAULT_HOST.to_string(),
            port: DEFAULT_PORT,
            data_file: PathBuf::from(DEFAULT_DATA_FILE),
            serialize_writes: false,
            upload_dir: PathBuf::from(DEFAULT_UPLOAD_DIR),
            static_dir: PathBuf::from(DEFAULT_STATIC_DIR),
            template_dir: None,
            log_level: DEFAULT_LOG_LEVEL.to_string(),
            config_file: None,
        }
    }
}

impl Config {
    /// Resolve configuration from CLI/ENV arguments and the TOML file they point to
    pub fn load(args: &CliArgs) -> Result<Self> {
        let source = config_source(args);
        let toml = match &source {
            Some(path) => Some(TomlConfig::load(path)?),
            None => None,
        };
        let mut config = Self::resolve(args, toml);
        config.config_file = source;
        Ok(config)
    }

    /// Merge the layers; no I/O
    pub fn resolve(args: &CliArgs, toml: Option<TomlConfig>) -> Self {
        let toml = toml.unwrap_or_default();
        let defaults = Config::default();

        Self {
            host: args.host.clone().or(toml.host).unwrap_or(defaults.host),
            port: args.port.or(toml.port).unwrap_or(defaults.port),
            data_file: args
                .data_file
                .clone()
                .or(toml.store.data_file)
                .unwrap_or(defaults.data_file),
            serialize_writes: args.serialize_writes
                || toml.store.serialize_writes.unwrap_or(defaults.serialize_writes),
            upload_dir: args
                .upload_dir
                .clone()
                .or(toml.uploads.dir)
                .unwrap_or(defaults.upload_dir),
            static_dir: args
                .static_dir
                .clone()
                .or(toml.web.static_dir)
                .unwrap_or(defaults.static_dir),
            template_dir: args.template_dir.clone().or(toml.web.template_dir),
            log_level: args
                .log_level
                .clone()
                .or(toml.logging.level)
                .unwrap_or(defaults.log_level),
            config_file: None,
        }
    }

    pub fn bind_addr(&self) -> String {
        format!("{}:{}", self.host, self.port)
    }
}

/// TOML file to read: `--config` if given, else `mpr.toml` when present
///
/// An explicit path is returned even if it does not exist, so that
/// [`Config::load`] reports it.
pub fn config_source(args: &CliArgs) -> Option<PathBuf> {
    if let Some(path) = &args.config {
        return Some(path.clone());
    }
    let default_path = PathBuf::from(DEFAULT_CONFIG_FILE);
    default_path.exists().then_some(default_path)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults_match_legacy_paths() {
        let config = Config::resolve(&CliArgs::default(), None);
        assert_eq!(config.data_file, PathBuf::from("dados_desaparecidos.json"));
        assert_eq!(config.upload_dir, PathBuf::from("uploads"));
        assert_eq!(config.bind_addr(), "127.0.0.1:5000");
        assert!(!config.serialize_writes);
        assert!(config.template_dir.is_none());
    }

    #[test]
    fn test_toml_sections_parse() {
        let toml = TomlConfig::parse(
            r#"
            port = 8080

            [store]
            data_file = "/srv/mpr/dados.json"
            serialize_writes = true

            [uploads]
            dir = "/srv/mpr/uploads"

            [logging]
            level = "debug"
            "#,
        )
        .unwrap();

        let config = Config::resolve(&CliArgs::default(), Some(toml));
        assert_eq!(config.port, 8080);
        assert_eq!(config.host, DEFAULT_HOST);
        assert_eq!(config.data_file, PathBuf::from("/srv/mpr/dados.json"));
        assert_eq!(config.upload_dir, PathBuf::from("/srv/mpr/uploads"));
        assert!(config.serialize_writes);
        assert_eq!(config.log_level, "debug");
    }

    #[test]
    fn test_unknown_toml_key_is_rejected() {
        assert!(TomlConfig::parse("prot = 8080").is_err());
    }
}
