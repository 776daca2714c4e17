//! # xml-bind Library
//!
//! Binds XML documents to declared record types. Types are declared through a
//! builder API, a TOML/JSON declaration table, or the [`XmlRecord`] trait;
//! each field selects exactly one binding mode (element, attribute, array of
//! elements, or inner XML). Type descriptors are derived once per type and
//! cached, and a [`Parser`] can be shared across threads.

pub mod acceptance;
pub mod binder;
pub mod cli;
pub mod config;
pub mod declaration;
pub mod error;
pub mod error_reporter;
pub mod mapping;
pub mod metadata;
pub mod output;
pub mod resolver;
pub mod scalar;
pub mod value;
pub mod xml;

pub use acceptance::{
    Binding, BindingMode, ElementTarget, FieldDescriptor, TypeDescriptor, accept, is_acceptable,
};
pub use binder::Parser;
pub use cli::{Cli, VerbosityLevel};
pub use config::{ArrayScope, BindOptions, Config, ConfigError, ConfigManager, OutputFormat};
pub use declaration::{
    DeclaredKind, ElementKind, FieldDeclaration, Marker, Reflector, TypeDeclaration, TypeRegistry,
    XmlRecord,
};
pub use error::{BindError, ErrorKind};
pub use error_reporter::ErrorReporter;
pub use mapping::{MappingError, load_registry, registry_from_json, registry_from_toml};
pub use metadata::{FieldMetadata, ScalarCodec, ValueKind, extract_field};
pub use output::Output;
pub use resolver::TypeResolver;
pub use scalar::{Converter, ScalarKind, Validator};
pub use value::{BoundInstance, Instance, Value};
pub use xml::{XmlDocument, XmlNode};
