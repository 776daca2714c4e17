use crate::config::{ArrayScope, OutputFormat};
use clap::Parser;
use serde::{Deserialize, Serialize};
use std::path::PathBuf;

/// Verbosity levels for output
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Default, Serialize, Deserialize)]
pub enum VerbosityLevel {
    /// Only show errors
    Quiet,
    /// Show standard information
    #[default]
    Normal,
    /// Show detailed information
    Verbose,
}

/// Bind an XML document to declared types
#[derive(Parser, Debug, Clone)]
#[command(name = "xml-bind")]
#[command(about = "Bind XML documents to declared record types")]
#[command(version)]
pub struct Cli {
    /// XML document to bind
    #[arg(help = "XML document to bind")]
    pub input: PathBuf,

    /// Declaration table (TOML or JSON)
    #[arg(
        short = 'm',
        long = "mapping",
        help = "Type declaration table (.toml or .json)"
    )]
    pub mapping: PathBuf,

    /// Target type; defaults to the root element name
    #[arg(short = 't', long = "type", help = "Type to bind the root element to")]
    pub type_name: Option<String>,

    /// Configuration file
    #[arg(short = 'c', long = "config")]
    pub config: Option<PathBuf>,

    /// Output format
    #[arg(short = 'f', long = "format", value_enum)]
    pub format: Option<OutputFormat>,

    /// Where array elements are looked up
    #[arg(long = "array-scope", value_enum)]
    pub array_scope: Option<ArrayScope>,

    /// Enable verbose output
    #[arg(short = 'v', long = "verbose", help = "Enable verbose output")]
    pub verbose: bool,

    /// Enable quiet mode (errors only)
    #[arg(
        short = 'q',
        long = "quiet",
        help = "Quiet mode",
        conflicts_with = "verbose"
    )]
    pub quiet: bool,
}

impl Cli {
    pub fn parse_args() -> Self {
        Self::parse()
    }

    pub fn validate(&self) -> Result<(), String> {
        if !self.input.exists() {
            return Err(format!("Input does not exist: {}", self.input.display()));
        }
        if !self.mapping.exists() {
            return Err(format!(
                "Mapping file does not exist: {}",
                self.mapping.display()
            ));
        }
        if let Some(type_name) = &self.type_name
            && type_name.trim().is_empty()
        {
            return Err("Type name must not be empty".to_string());
        }
        Ok(())
    }

    pub fn verbosity(&self) -> VerbosityLevel {
        if self.quiet {
            VerbosityLevel::Quiet
        } else if self.verbose {
            VerbosityLevel::Verbose
        } else {
            VerbosityLevel::Normal
        }
    }
}
