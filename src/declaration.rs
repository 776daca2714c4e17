//! Type declarations
//!
//! Field declarations and their binding markers are registered ahead of time,
//! either through the builder methods here, a declaration table file (see
//! [`crate::mapping`]) or the [`XmlRecord`] trait on a Rust struct. The
//! [`Reflector`] trait is the seam the binder reads them through.

use std::collections::HashMap;
use std::fmt;
use std::sync::Arc;

use serde::de::DeserializeOwned;

use crate::scalar::{Converter, ScalarKind, Validator};
use crate::value::Value;

/// The declared value kind of a field
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum DeclaredKind {
    Int,
    Bool,
    Float,
    String,
    Null,
    Array,
    /// Reference to another declared type
    Named(String),
    Union(Vec<DeclaredKind>),
    Intersection(Vec<DeclaredKind>),
}

impl DeclaredKind {
    pub fn named(type_name: impl Into<String>) -> Self {
        DeclaredKind::Named(type_name.into())
    }

    /// `T` or null
    pub fn nullable(kind: DeclaredKind) -> Self {
        DeclaredKind::Union(vec![kind, DeclaredKind::Null])
    }

    pub fn as_scalar(&self) -> Option<ScalarKind> {
        match self {
            DeclaredKind::Int => Some(ScalarKind::Int),
            DeclaredKind::Bool => Some(ScalarKind::Bool),
            DeclaredKind::Float => Some(ScalarKind::Float),
            DeclaredKind::String => Some(ScalarKind::String),
            _ => None,
        }
    }
}

impl From<ScalarKind> for DeclaredKind {
    fn from(kind: ScalarKind) -> Self {
        match kind {
            ScalarKind::Int => DeclaredKind::Int,
            ScalarKind::Bool => DeclaredKind::Bool,
            ScalarKind::Float => DeclaredKind::Float,
            ScalarKind::String => DeclaredKind::String,
        }
    }
}

fn write_joined(f: &mut fmt::Formatter<'_>, kinds: &[DeclaredKind], sep: &str) -> fmt::Result {
    for (i, kind) in kinds.iter().enumerate() {
        if i > 0 {
            f.write_str(sep)?;
        }
        write!(f, "{}", kind)?;
    }
    Ok(())
}

impl fmt::Display for DeclaredKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            DeclaredKind::Int => f.write_str("int"),
            DeclaredKind::Bool => f.write_str("bool"),
            DeclaredKind::Float => f.write_str("float"),
            DeclaredKind::String => f.write_str("string"),
            DeclaredKind::Null => f.write_str("null"),
            DeclaredKind::Array => f.write_str("array"),
            DeclaredKind::Named(name) => f.write_str(name),
            DeclaredKind::Union(kinds) => write_joined(f, kinds, "|"),
            DeclaredKind::Intersection(kinds) => write_joined(f, kinds, "&"),
        }
    }
}

/// Kind of the items of an array field
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ElementKind {
    Scalar(ScalarKind),
    Named(String),
}

impl ElementKind {
    /// `int`, `bool`, `float` and `string` are scalars; anything else names a type
    pub fn from_name(name: &str) -> Self {
        match ScalarKind::from_name(name) {
            Some(kind) => ElementKind::Scalar(kind),
            None => ElementKind::Named(name.to_string()),
        }
    }
}

impl From<ScalarKind> for ElementKind {
    fn from(kind: ScalarKind) -> Self {
        ElementKind::Scalar(kind)
    }
}

impl fmt::Display for ElementKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ElementKind::Scalar(kind) => write!(f, "{}", kind),
            ElementKind::Named(name) => f.write_str(name),
        }
    }
}

/// A declarative marker attached to a field
#[derive(Clone)]
pub enum Marker {
    /// Bind from a child element, optionally under a different name
    Element(Option<String>),
    /// Bind from an attribute, optionally under a different name
    Attribute(Option<String>),
    /// Bind the raw markup of all child elements
    InnerXml,
    /// Bind every matching element into an array of the given kind
    ArrayElements(ElementKind),
    Conversion(Converter),
    Validation(Validator),
    Optional,
}

impl fmt::Debug for Marker {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Marker::Element(name) => f.debug_tuple("Element").field(name).finish(),
            Marker::Attribute(name) => f.debug_tuple("Attribute").field(name).finish(),
            Marker::InnerXml => f.write_str("InnerXml"),
            Marker::ArrayElements(kind) => f.debug_tuple("ArrayElements").field(kind).finish(),
            Marker::Conversion(_) => f.write_str("Conversion(<fn>)"),
            Marker::Validation(_) => f.write_str("Validation(<fn>)"),
            Marker::Optional => f.write_str("Optional"),
        }
    }
}

/// One field of a declared type: name, declared kind and ordered markers
#[derive(Debug, Clone)]
pub struct FieldDeclaration {
    pub name: String,
    pub declared: Option<DeclaredKind>,
    pub markers: Vec<Marker>,
}

impl FieldDeclaration {
    /// A field with no declared kind; only useful to exercise the error path
    pub fn untyped(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            declared: None,
            markers: Vec::new(),
        }
    }

    pub fn new(name: impl Into<String>, declared: impl Into<DeclaredKind>) -> Self {
        Self {
            name: name.into(),
            declared: Some(declared.into()),
            markers: Vec::new(),
        }
    }

    pub fn marker(mut self, marker: Marker) -> Self {
        self.markers.push(marker);
        self
    }

    pub fn element(self) -> Self {
        self.marker(Marker::Element(None))
    }

    pub fn element_named(self, xml_name: impl Into<String>) -> Self {
        self.marker(Marker::Element(Some(xml_name.into())))
    }

    pub fn attribute(self) -> Self {
        self.marker(Marker::Attribute(None))
    }

    pub fn attribute_named(self, xml_name: impl Into<String>) -> Self {
        self.marker(Marker::Attribute(Some(xml_name.into())))
    }

    pub fn inner_xml(self) -> Self {
        self.marker(Marker::InnerXml)
    }

    pub fn array_of(self, kind: impl Into<ElementKind>) -> Self {
        self.marker(Marker::ArrayElements(kind.into()))
    }

    pub fn convert_with<F>(self, converter: F) -> Self
    where
        F: Fn(&str) -> Value + Send + Sync + 'static,
    {
        self.marker(Marker::Conversion(Arc::new(converter)))
    }

    pub fn validate_with<F>(self, validator: F) -> Self
    where
        F: Fn(&str) -> bool + Send + Sync + 'static,
    {
        self.marker(Marker::Validation(Arc::new(validator)))
    }

    pub fn optional(self) -> Self {
        self.marker(Marker::Optional)
    }
}

/// A declared record type: its name and fields in declaration order
#[derive(Debug, Clone)]
pub struct TypeDeclaration {
    pub name: String,
    pub fields: Vec<FieldDeclaration>,
}

impl TypeDeclaration {
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            fields: Vec::new(),
        }
    }

    pub fn field(mut self, field: FieldDeclaration) -> Self {
        self.fields.push(field);
        self
    }
}

/// Source of field declarations by type name
#[cfg_attr(test, mockall::automock)]
pub trait Reflector: Send + Sync {
    /// Ordered field declarations of `type_name`, or `None` if the type is unknown
    fn fields(&self, type_name: &str) -> Option<Vec<FieldDeclaration>>;
}

/// A Rust record that can be bound from XML
///
/// The struct is filled through serde, so its serde field names must match
/// the declared field names.
pub trait XmlRecord: DeserializeOwned {
    const TYPE_NAME: &'static str;

    fn declaration() -> TypeDeclaration;
}

/// In-memory table of type declarations
#[derive(Debug, Clone, Default)]
pub struct TypeRegistry {
    types: HashMap<String, TypeDeclaration>,
}

impl TypeRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    /// Register a declaration, replacing any previous one with the same name
    pub fn register(&mut self, declaration: TypeDeclaration) -> &mut Self {
        self.types.insert(declaration.name.clone(), declaration);
        self
    }

    pub fn with(mut self, declaration: TypeDeclaration) -> Self {
        self.register(declaration);
        self
    }

    pub fn register_record<T: XmlRecord>(&mut self) -> &mut Self {
        let mut declaration = T::declaration();
        declaration.name = T::TYPE_NAME.to_string();
        self.register(declaration)
    }

    pub fn contains(&self, type_name: &str) -> bool {
        self.types.contains_key(type_name)
    }

    pub fn get(&self, type_name: &str) -> Option<&TypeDeclaration> {
        self.types.get(type_name)
    }

    /// Registered type names, sorted
    pub fn type_names(&self) -> Vec<&str> {
        let mut names: Vec<_> = self.types.keys().map(String::as_str).collect();
        names.sort_unstable();
        names
    }

    pub fn len(&self) -> usize {
        self.types.len()
    }

    pub fn is_empty(&self) -> bool {
        self.types.is_empty()
    }
}

impl Reflector for TypeRegistry {
    fn fields(&self, type_name: &str) -> Option<Vec<FieldDeclaration>> {
        self.get(type_name).map(|decl| decl.fields.clone())
    }
}

impl<R: Reflector + ?Sized> Reflector for Arc<R> {
    fn fields(&self, type_name: &str) -> Option<Vec<FieldDeclaration>> {
        (**self).fields(type_name)
    }
}
