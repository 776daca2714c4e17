//! Output formatting
//!
//! Renders bound instances as compact JSON, indented JSON, or an indented
//! field tree for humans.

use std::time::Duration;

use crate::cli::VerbosityLevel;
use crate::config::OutputFormat;
use crate::value::{Instance, Value};

/// Formatter for bound instances
pub struct Output {
    format: OutputFormat,
    verbosity: VerbosityLevel,
}

impl Output {
    pub fn new(format: OutputFormat, verbosity: VerbosityLevel) -> Self {
        Self { format, verbosity }
    }

    pub fn format_instance(&self, instance: &Instance) -> serde_json::Result<String> {
        match self.format {
            OutputFormat::Json => serde_json::to_string(instance),
            OutputFormat::Pretty => serde_json::to_string_pretty(instance),
            OutputFormat::Human => Ok(format_tree(instance)),
        }
    }

    /// One-line report of a finished bind, `None` unless verbose
    pub fn format_summary(&self, instance: &Instance, duration: Duration) -> Option<String> {
        if self.verbosity < VerbosityLevel::Verbose {
            return None;
        }
        Some(format!(
            "Bound {} ({} field{}, {} values) in {}",
            instance.type_name(),
            instance.len(),
            if instance.len() == 1 { "" } else { "s" },
            count_values(instance),
            format_duration(duration)
        ))
    }
}

fn format_tree(instance: &Instance) -> String {
    let mut output = String::new();
    output.push_str(instance.type_name());
    output.push('\n');
    write_fields(&mut output, instance, 1);
    output
}

fn write_fields(output: &mut String, instance: &Instance, depth: usize) {
    for (name, value) in instance.fields() {
        write_value(output, name, value, depth);
    }
}

fn write_value(output: &mut String, label: &str, value: &Value, depth: usize) {
    let indent = "  ".repeat(depth);
    match value {
        Value::Record(nested) => {
            output.push_str(&format!("{}{}: {}\n", indent, label, nested.type_name()));
            write_fields(output, nested, depth + 1);
        }
        Value::Array(items) if items.is_empty() => {
            output.push_str(&format!("{}{}: []\n", indent, label));
        }
        Value::Array(items) => {
            output.push_str(&format!("{}{}:\n", indent, label));
            for (i, item) in items.iter().enumerate() {
                write_value(output, &format!("[{}]", i), item, depth + 1);
            }
        }
        scalar => {
            output.push_str(&format!("{}{}: {}\n", indent, label, format_scalar(scalar)));
        }
    }
}

fn format_scalar(value: &Value) -> String {
    match value {
        Value::Null => "null".to_string(),
        Value::Int(i) => i.to_string(),
        Value::Bool(b) => b.to_string(),
        Value::Float(f) => f.to_string(),
        Value::String(s) => format!("{:?}", s),
        Value::Array(_) | Value::Record(_) => String::new(),
    }
}

fn count_values(instance: &Instance) -> usize {
    fn count(value: &Value) -> usize {
        match value {
            Value::Record(nested) => count_values(nested),
            Value::Array(items) => items.iter().map(count).sum(),
            _ => 1,
        }
    }
    instance.fields().map(|(_, value)| count(value)).sum()
}

fn format_duration(duration: Duration) -> String {
    let total_secs = duration.as_secs_f64();
    if total_secs < 1.0 {
        format!("{:.0}ms", duration.as_millis())
    } else {
        format!("{:.2}s", total_secs)
    }
}
