use crate::cli::VerbosityLevel;
use crate::config::ConfigError;
use crate::error::BindError;
use crate::mapping::MappingError;

/// Error reporter with configurable verbosity
pub struct ErrorReporter {
    verbosity: VerbosityLevel,
}

impl ErrorReporter {
    /// Create a new error reporter with specified verbosity
    pub fn new(verbosity: VerbosityLevel) -> Self {
        Self { verbosity }
    }

    /// Report a bind error with appropriate verbosity
    pub fn report_bind_error(&self, error: &BindError) {
        eprintln!("{}", self.format_bind_error(error));
    }

    /// Report a configuration error
    pub fn report_config_error(&self, error: &ConfigError) {
        eprintln!("{}", self.format_config_error(error));
    }

    /// Report a declaration table error
    pub fn report_mapping_error(&self, error: &MappingError) {
        eprintln!("{}", self.format_mapping_error(error));
    }

    pub fn format_bind_error(&self, error: &BindError) -> String {
        match self.verbosity {
            VerbosityLevel::Quiet => self.format_error_brief(error),
            VerbosityLevel::Normal => error.to_string(),
            VerbosityLevel::Verbose => {
                format!("{}\nSuggestion: {}", error, self.get_bind_help(error))
            }
        }
    }

    pub fn format_config_error(&self, error: &ConfigError) -> String {
        match self.verbosity {
            VerbosityLevel::Quiet => format!("Config error: {}", error),
            VerbosityLevel::Normal => {
                format!("Configuration Error: {}\n{}", error, self.get_config_help(error))
            }
            VerbosityLevel::Verbose => {
                format!(
                    "Configuration Error: {}\nDebug: {:?}\n{}",
                    error,
                    error,
                    self.get_config_help(error)
                )
            }
        }
    }

    pub fn format_mapping_error(&self, error: &MappingError) -> String {
        match self.verbosity {
            VerbosityLevel::Quiet => format!("Mapping error: {}", error),
            VerbosityLevel::Normal | VerbosityLevel::Verbose => {
                let mut output = format!("Mapping Error: {}", error);
                if self.verbosity == VerbosityLevel::Verbose {
                    let mut current: &dyn std::error::Error = error;
                    while let Some(source) = current.source() {
                        output.push_str(&format!("\n  caused by: {}", source));
                        current = source;
                    }
                }
                output.push('\n');
                output.push_str(self.get_mapping_help(error));
                output
            }
        }
    }

    /// Format error for brief output (quiet mode)
    fn format_error_brief(&self, error: &BindError) -> String {
        match error {
            BindError::Configuration { type_name, .. } => format!("INVALID TYPE: {}", type_name),
            BindError::Value {
                type_name, field, ..
            } => format!("INVALID VALUE: {}.{}", type_name, field),
            BindError::Document { .. } => "MALFORMED XML".to_string(),
            BindError::Decode { type_name, .. } => format!("DECODE FAILED: {}", type_name),
        }
    }

    fn get_bind_help(&self, error: &BindError) -> &'static str {
        match error {
            BindError::Configuration { .. } => {
                "Check that every field has a type and exactly one of element, attribute, inner-xml or an array element marker"
            }
            BindError::Value { .. } => "Check the XML value against the field's type or validator",
            BindError::Document { .. } => "Check the XML syntax",
            BindError::Decode { .. } => "Check that the record's fields match the declared field names and types",
        }
    }

    /// Get helpful suggestions for configuration errors
    fn get_config_help(&self, error: &ConfigError) -> &'static str {
        match error {
            ConfigError::Io(_) => "Check that the configuration file exists and is readable",
            ConfigError::TomlParsing(_) | ConfigError::JsonParsing(_) => {
                "Check the configuration file syntax (TOML/JSON format expected)"
            }
            ConfigError::UnsupportedFormat(_) => "Use a .toml or .json configuration file",
            ConfigError::Environment(_) => "Fix or unset the XML_BIND_* environment variable",
            ConfigError::Validation(_) => "Fix the configuration value named above",
        }
    }

    fn get_mapping_help(&self, error: &MappingError) -> &'static str {
        match error {
            MappingError::Io(_) => "Check that the mapping file exists and is readable",
            MappingError::TomlParsing(_) | MappingError::JsonParsing(_) => {
                "Check the mapping file syntax: a list of [[types]] with [[types.fields]]"
            }
            MappingError::InvalidPattern { .. } => "Fix the regular expression in the field's pattern",
            MappingError::UnknownConverter { .. } => {
                "Use one of the converters: yes-no, trim, lowercase, uppercase, int"
            }
            MappingError::InvalidRange { .. } => "Make range.min less than or equal to range.max",
            MappingError::DuplicateType(_) => "Declare each type only once",
            MappingError::UnsupportedFormat(_) => "Use a .toml or .json mapping file",
        }
    }
}
