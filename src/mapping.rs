//! Declaration tables
//!
//! Type declarations can be written down as data instead of code, in TOML or
//! JSON:
//!
//! ```toml
//! [[types]]
//! name = "Person"
//!
//! [[types.fields]]
//! name = "Age"
//! type = "int"
//! bind = "element"
//! range = { min = 0, max = 150 }
//!
//! [[types.fields]]
//! name = "id"
//! type = "int"
//! bind = "attribute"
//! ```
//!
//! Type strings accept the scalar names, `null`, `array`, any other type
//! name, unions (`int|string`), the nullable shorthand (`?Person`) and
//! intersections (`A&B`, always rejected at bind time).

use std::path::Path;
use std::sync::Arc;

use regex::Regex;
use serde::Deserialize;
use thiserror::Error;

use crate::declaration::{DeclaredKind, ElementKind, FieldDeclaration, Marker, TypeDeclaration, TypeRegistry};
use crate::scalar::coerce_int;
use crate::value::Value;

#[derive(Error, Debug)]
pub enum MappingError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("TOML parsing error: {0}")]
    TomlParsing(#[from] toml::de::Error),

    #[error("JSON parsing error: {0}")]
    JsonParsing(#[from] serde_json::Error),

    #[error("Invalid pattern for field {field}: {source}")]
    InvalidPattern {
        field: String,
        #[source]
        source: regex::Error,
    },

    #[error("Unknown converter for field {field}: {name}")]
    UnknownConverter { field: String, name: String },

    #[error("Invalid range for field {field}: min {min} is greater than max {max}")]
    InvalidRange { field: String, min: i64, max: i64 },

    #[error("Type {0} is declared more than once")]
    DuplicateType(String),

    #[error("Unsupported mapping file format: {0}")]
    UnsupportedFormat(String),
}

pub type Result<T> = std::result::Result<T, MappingError>;

#[derive(Debug, Deserialize)]
#[serde(deny_unknown_fields)]
struct MappingFile {
    #[serde(default)]
    types: Vec<TypeEntry>,
}

#[derive(Debug, Deserialize)]
#[serde(deny_unknown_fields)]
struct TypeEntry {
    name: String,
    #[serde(default)]
    fields: Vec<FieldEntry>,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "kebab-case")]
enum BindEntry {
    Element,
    Attribute,
    InnerXml,
}

#[derive(Debug, Deserialize)]
#[serde(deny_unknown_fields)]
struct RangeEntry {
    min: i64,
    max: i64,
}

#[derive(Debug, Deserialize)]
#[serde(deny_unknown_fields)]
struct FieldEntry {
    name: String,
    #[serde(rename = "type")]
    kind: Option<String>,
    bind: Option<BindEntry>,
    xml_name: Option<String>,
    elements: Option<String>,
    pattern: Option<String>,
    range: Option<RangeEntry>,
    convert: Option<String>,
    #[serde(default)]
    optional: bool,
}

/// Load a declaration table from a `.toml` or `.json` file
pub fn load_registry(path: &Path) -> Result<TypeRegistry> {
    let content = std::fs::read_to_string(path)?;

    match path.extension().and_then(|ext| ext.to_str()) {
        Some("toml") => registry_from_toml(&content),
        Some("json") => registry_from_json(&content),
        Some(ext) => Err(MappingError::UnsupportedFormat(ext.to_string())),
        None => registry_from_toml(&content),
    }
}

pub fn registry_from_toml(content: &str) -> Result<TypeRegistry> {
    build_registry(toml::from_str(content)?)
}

pub fn registry_from_json(content: &str) -> Result<TypeRegistry> {
    build_registry(serde_json::from_str(content)?)
}

fn build_registry(file: MappingFile) -> Result<TypeRegistry> {
    let mut registry = TypeRegistry::new();

    for entry in file.types {
        if registry.contains(&entry.name) {
            return Err(MappingError::DuplicateType(entry.name));
        }

        let mut declaration = TypeDeclaration::new(entry.name);
        for field in entry.fields {
            declaration = declaration.field(build_field(field)?);
        }
        registry.register(declaration);
    }

    Ok(registry)
}

fn build_field(entry: FieldEntry) -> Result<FieldDeclaration> {
    let mut field = match &entry.kind {
        Some(kind) => FieldDeclaration::new(entry.name.clone(), parse_declared_kind(kind)),
        None => FieldDeclaration::untyped(entry.name.clone()),
    };

    match entry.bind {
        Some(BindEntry::Element) => field = field.marker(Marker::Element(entry.xml_name.clone())),
        Some(BindEntry::Attribute) => field = field.marker(Marker::Attribute(entry.xml_name.clone())),
        Some(BindEntry::InnerXml) => field = field.inner_xml(),
        None => {}
    }

    if let Some(elements) = &entry.elements {
        field = field.array_of(ElementKind::from_name(elements.trim()));
    }

    // A field carries one validator, so pattern and range are checked together
    let pattern = entry
        .pattern
        .as_deref()
        .map(Regex::new)
        .transpose()
        .map_err(|source| MappingError::InvalidPattern {
            field: entry.name.clone(),
            source,
        })?;

    let range = match entry.range {
        Some(RangeEntry { min, max }) if min > max => {
            return Err(MappingError::InvalidRange {
                field: entry.name,
                min,
                max,
            });
        }
        Some(RangeEntry { min, max }) => Some(min..=max),
        None => None,
    };

    if pattern.is_some() || range.is_some() {
        field = field.validate_with(move |raw| {
            let matches_pattern = pattern.as_ref().is_none_or(|regex| regex.is_match(raw));
            let in_range = range.as_ref().is_none_or(|range| {
                raw.parse::<i64>()
                    .map(|value| range.contains(&value))
                    .unwrap_or(false)
            });
            matches_pattern && in_range
        });
    }

    if let Some(name) = &entry.convert {
        let converter = named_converter(name).ok_or_else(|| MappingError::UnknownConverter {
            field: entry.name.clone(),
            name: name.clone(),
        })?;
        field = field.marker(Marker::Conversion(converter));
    }

    if entry.optional {
        field = field.optional();
    }

    Ok(field)
}

/// Built-in converters selectable by name from a declaration table
fn named_converter(name: &str) -> Option<crate::scalar::Converter> {
    let converter: crate::scalar::Converter = match name {
        "yes-no" => Arc::new(|raw: &str| Value::Bool(raw.trim().eq_ignore_ascii_case("yes"))),
        "trim" => Arc::new(|raw: &str| Value::String(raw.trim().to_string())),
        "lowercase" => Arc::new(|raw: &str| Value::String(raw.to_lowercase())),
        "uppercase" => Arc::new(|raw: &str| Value::String(raw.to_uppercase())),
        "int" => Arc::new(|raw: &str| Value::Int(coerce_int(raw))),
        _ => return None,
    };
    Some(converter)
}

/// Parse a type string such as `int`, `?Person`, `int|string|null` or `A&B`
pub fn parse_declared_kind(text: &str) -> DeclaredKind {
    let text = text.trim();

    if let Some(inner) = text.strip_prefix('?') {
        return DeclaredKind::nullable(parse_declared_kind(inner));
    }
    if text.contains('|') {
        return DeclaredKind::Union(text.split('|').map(parse_declared_kind).collect());
    }
    if text.contains('&') {
        return DeclaredKind::Intersection(text.split('&').map(parse_declared_kind).collect());
    }

    match text {
        "int" => DeclaredKind::Int,
        "bool" => DeclaredKind::Bool,
        "float" => DeclaredKind::Float,
        "string" => DeclaredKind::String,
        "null" => DeclaredKind::Null,
        "array" => DeclaredKind::Array,
        name => DeclaredKind::named(name),
    }
}
