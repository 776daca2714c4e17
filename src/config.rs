use crate::cli::Cli;
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};
use thiserror::Error;

/// Trait for abstracting environment variable access
pub trait EnvProvider {
    fn get(&self, key: &str) -> Option<String>;
}

/// System environment variable provider for production use
pub struct SystemEnvProvider;

impl EnvProvider for SystemEnvProvider {
    fn get(&self, key: &str) -> Option<String> {
        std::env::var(key).ok()
    }
}

#[derive(Error, Debug)]
pub enum ConfigError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("TOML parsing error: {0}")]
    TomlParsing(#[from] toml::de::Error),

    #[error("JSON parsing error: {0}")]
    JsonParsing(#[from] serde_json::Error),

    #[error("Configuration validation error: {0}")]
    Validation(String),

    #[error("Environment variable error: {0}")]
    Environment(String),

    #[error("Unsupported configuration file format: {0}")]
    UnsupportedFormat(String),
}

pub type Result<T> = std::result::Result<T, ConfigError>;

/// Main application configuration
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Default)]
#[serde(default)]
pub struct Config {
    pub binding: BindOptions,
    pub output: OutputConfig,
}

/// Where elements for an array field are looked up
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize, clap::ValueEnum)]
#[serde(rename_all = "kebab-case")]
pub enum ArrayScope {
    /// `/<current element name>/<field name>` evaluated from the document root
    #[default]
    RootAnchored,
    /// Direct children of the element being bound
    Relative,
}

/// Binding behaviour
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(default)]
pub struct BindOptions {
    pub array_scope: ArrayScope,
    /// Strip leading and trailing whitespace from the XML text before parsing
    pub trim_input: bool,
    /// Maximum number of type descriptors kept in the descriptor cache
    pub max_cached_types: u64,
}

impl Default for BindOptions {
    fn default() -> Self {
        Self {
            array_scope: ArrayScope::RootAnchored,
            trim_input: true,
            max_cached_types: 1024,
        }
    }
}

/// How bound instances are printed
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize, clap::ValueEnum)]
#[serde(rename_all = "lowercase")]
pub enum OutputFormat {
    /// Compact JSON
    Json,
    /// Indented JSON
    #[default]
    Pretty,
    /// Indented field tree
    Human,
}

/// Output configuration
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Default)]
#[serde(default)]
pub struct OutputConfig {
    pub format: OutputFormat,
    /// Verbose output
    pub verbose: bool,
    /// Quiet mode (errors only)
    pub quiet: bool,
}

/// Configuration manager for loading and merging configurations
pub struct ConfigManager;

impl ConfigManager {
    /// Load configuration with precedence: file -> environment -> CLI
    pub fn load_config(cli: &Cli) -> Result<Config> {
        Self::load_config_with(&SystemEnvProvider, cli)
    }

    pub fn load_config_with(env: &impl EnvProvider, cli: &Cli) -> Result<Config> {
        let mut config = match &cli.config {
            Some(config_path) => Self::load_from_file(config_path)?,
            None => Self::find_config_file()?.unwrap_or_default(),
        };

        config = Self::apply_environment_overrides_with(env, config)?;
        config = Self::merge_with_cli(config, cli);

        Self::validate_config(&config)?;

        Ok(config)
    }

    /// Load configuration from a file (TOML or JSON)
    pub fn load_from_file(path: &Path) -> Result<Config> {
        let content = std::fs::read_to_string(path)?;

        match path.extension().and_then(|ext| ext.to_str()) {
            Some("toml") => Ok(toml::from_str(&content)?),
            Some("json") => Ok(serde_json::from_str(&content)?),
            Some(ext) => Err(ConfigError::UnsupportedFormat(ext.to_string())),
            None => {
                // Try to parse as TOML first, then JSON
                if let Ok(config) = toml::from_str::<Config>(&content) {
                    Ok(config)
                } else {
                    Ok(serde_json::from_str(&content)?)
                }
            }
        }
    }

    /// Find configuration file in standard locations
    pub fn find_config_file() -> Result<Option<Config>> {
        let config_names = [
            "xml-bind.toml",
            "xml-bind.json",
            ".xml-bind.toml",
            ".xml-bind.json",
        ];

        // Check current directory first
        for name in &config_names {
            let path = PathBuf::from(name);
            if path.exists() {
                return Ok(Some(Self::load_from_file(&path)?));
            }
        }

        // Check user config directory
        if let Some(config_dir) = dirs::config_dir() {
            let app_config_dir = config_dir.join("xml-bind");
            for name in &config_names {
                let path = app_config_dir.join(name);
                if path.exists() {
                    return Ok(Some(Self::load_from_file(&path)?));
                }
            }
        }

        Ok(None)
    }

    /// Apply environment variable overrides with a custom environment provider
    pub fn apply_environment_overrides_with(
        env: &impl EnvProvider,
        mut config: Config,
    ) -> Result<Config> {
        // Binding settings
        if let Some(scope) = env.get("XML_BIND_ARRAY_SCOPE") {
            config.binding.array_scope = match scope.to_lowercase().as_str() {
                "root-anchored" => ArrayScope::RootAnchored,
                "relative" => ArrayScope::Relative,
                _ => {
                    return Err(ConfigError::Environment(format!(
                        "Invalid XML_BIND_ARRAY_SCOPE value: {}",
                        scope
                    )));
                }
            };
        }

        if let Some(trim) = env.get("XML_BIND_TRIM_INPUT") {
            config.binding.trim_input = trim.parse().map_err(|_| {
                ConfigError::Environment(format!("Invalid XML_BIND_TRIM_INPUT value: {}", trim))
            })?;
        }

        if let Some(max_types) = env.get("XML_BIND_MAX_CACHED_TYPES") {
            config.binding.max_cached_types = max_types.parse().map_err(|_| {
                ConfigError::Environment(format!(
                    "Invalid XML_BIND_MAX_CACHED_TYPES value: {}",
                    max_types
                ))
            })?;
        }

        // Output settings
        if let Some(format) = env.get("XML_BIND_FORMAT") {
            config.output.format = match format.to_lowercase().as_str() {
                "json" => OutputFormat::Json,
                "pretty" => OutputFormat::Pretty,
                "human" => OutputFormat::Human,
                _ => {
                    return Err(ConfigError::Environment(format!(
                        "Invalid XML_BIND_FORMAT value: {}",
                        format
                    )));
                }
            };
        }

        if let Some(verbose) = env.get("XML_BIND_VERBOSE") {
            config.output.verbose = verbose.parse().map_err(|_| {
                ConfigError::Environment(format!("Invalid XML_BIND_VERBOSE value: {}", verbose))
            })?;
        }

        if let Some(quiet) = env.get("XML_BIND_QUIET") {
            config.output.quiet = quiet.parse().map_err(|_| {
                ConfigError::Environment(format!("Invalid XML_BIND_QUIET value: {}", quiet))
            })?;
        }

        Ok(config)
    }

    /// Merge CLI arguments with configuration (CLI takes precedence)
    pub fn merge_with_cli(mut config: Config, cli: &Cli) -> Config {
        if let Some(scope) = cli.array_scope {
            config.binding.array_scope = scope;
        }
        if let Some(format) = cli.format {
            config.output.format = format;
        }
        if cli.verbose {
            config.output.verbose = true;
            config.output.quiet = false;
        }
        if cli.quiet {
            config.output.quiet = true;
            config.output.verbose = false;
        }

        config
    }

    /// Validate configuration values
    pub fn validate_config(config: &Config) -> Result<()> {
        if config.binding.max_cached_types == 0 {
            return Err(ConfigError::Validation(
                "max_cached_types must be greater than 0".to_string(),
            ));
        }

        if config.output.verbose && config.output.quiet {
            return Err(ConfigError::Validation(
                "verbose and quiet cannot both be enabled".to_string(),
            ));
        }

        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use clap::Parser;
    use std::collections::HashMap;
    use std::fs;
    use tempfile::TempDir;

    struct MockEnv(HashMap<&'static str, &'static str>);

    impl MockEnv {
        fn new(vars: &[(&'static str, &'static str)]) -> Self {
            Self(vars.iter().copied().collect())
        }
    }

    impl EnvProvider for MockEnv {
        fn get(&self, key: &str) -> Option<String> {
            self.0.get(key).map(|v| v.to_string())
        }
    }

    fn cli(args: &[&str]) -> Cli {
        let mut full = vec!["xml-bind", "input.xml", "--mapping", "types.toml"];
        full.extend_from_slice(args);
        Cli::try_parse_from(full).unwrap()
    }

    #[test]
    fn test_default_config() {
        let config = Config::default();

        assert_eq!(config.binding.array_scope, ArrayScope::RootAnchored);
        assert!(config.binding.trim_input);
        assert!(config.binding.max_cached_types > 0);
        assert_eq!(config.output.format, OutputFormat::Pretty);
        assert!(ConfigManager::validate_config(&config).is_ok());
    }

    #[test]
    fn test_load_toml_file() {
        let temp_dir = TempDir::new().unwrap();
        let path = temp_dir.path().join("xml-bind.toml");
        fs::write(
            &path,
            r#"
[binding]
array_scope = "relative"
max_cached_types = 16

[output]
format = "human"
"#,
        )
        .unwrap();

        let config = ConfigManager::load_from_file(&path).unwrap();
        assert_eq!(config.binding.array_scope, ArrayScope::Relative);
        assert_eq!(config.binding.max_cached_types, 16);
        // Unspecified values fall back to defaults
        assert!(config.binding.trim_input);
        assert_eq!(config.output.format, OutputFormat::Human);
    }

    #[test]
    fn test_load_json_file() {
        let temp_dir = TempDir::new().unwrap();
        let path = temp_dir.path().join("xml-bind.json");
        fs::write(&path, r#"{"binding": {"trim_input": false}}"#).unwrap();

        let config = ConfigManager::load_from_file(&path).unwrap();
        assert!(!config.binding.trim_input);
        assert_eq!(config.binding.array_scope, ArrayScope::RootAnchored);
    }

    #[test]
    fn test_unsupported_file_format() {
        let temp_dir = TempDir::new().unwrap();
        let path = temp_dir.path().join("xml-bind.yaml");
        fs::write(&path, "binding: {}").unwrap();

        match ConfigManager::load_from_file(&path) {
            Err(ConfigError::UnsupportedFormat(ext)) => assert_eq!(ext, "yaml"),
            other => panic!("Expected UnsupportedFormat, got {other:?}"),
        }
    }

    #[test]
    fn test_environment_overrides() {
        let env = MockEnv::new(&[
            ("XML_BIND_ARRAY_SCOPE", "relative"),
            ("XML_BIND_TRIM_INPUT", "false"),
            ("XML_BIND_MAX_CACHED_TYPES", "8"),
            ("XML_BIND_FORMAT", "json"),
            ("XML_BIND_VERBOSE", "true"),
        ]);

        let config =
            ConfigManager::apply_environment_overrides_with(&env, Config::default()).unwrap();
        assert_eq!(config.binding.array_scope, ArrayScope::Relative);
        assert!(!config.binding.trim_input);
        assert_eq!(config.binding.max_cached_types, 8);
        assert_eq!(config.output.format, OutputFormat::Json);
        assert!(config.output.verbose);
    }

    #[test]
    fn test_invalid_environment_values() {
        let env = MockEnv::new(&[("XML_BIND_ARRAY_SCOPE", "sideways")]);
        let result = ConfigManager::apply_environment_overrides_with(&env, Config::default());
        assert!(matches!(result, Err(ConfigError::Environment(_))));

        let env = MockEnv::new(&[("XML_BIND_MAX_CACHED_TYPES", "lots")]);
        let result = ConfigManager::apply_environment_overrides_with(&env, Config::default());
        assert!(matches!(result, Err(ConfigError::Environment(_))));
    }

    #[test]
    fn test_cli_takes_precedence() {
        let temp_dir = TempDir::new().unwrap();
        let path = temp_dir.path().join("config.toml");
        fs::write(
            &path,
            "[binding]\narray_scope = \"relative\"\n[output]\nformat = \"human\"\n",
        )
        .unwrap();

        let env = MockEnv::new(&[("XML_BIND_FORMAT", "json")]);
        let cli = cli(&[
            "--config",
            path.to_str().unwrap(),
            "--array-scope",
            "root-anchored",
            "--quiet",
        ]);

        let config = ConfigManager::load_config_with(&env, &cli).unwrap();
        assert_eq!(config.binding.array_scope, ArrayScope::RootAnchored);
        // Environment beats the file when the CLI is silent
        assert_eq!(config.output.format, OutputFormat::Json);
        assert!(config.output.quiet);
    }

    #[test]
    fn test_validate_config() {
        let mut config = Config::default();
        config.binding.max_cached_types = 0;
        assert!(ConfigManager::validate_config(&config).is_err());

        let mut config = Config::default();
        config.output.verbose = true;
        config.output.quiet = true;
        assert!(ConfigManager::validate_config(&config).is_err());
    }
}
