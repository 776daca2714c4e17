//! Type acceptability
//!
//! A type can be bound only if every one of its fields selects exactly one
//! binding mode. [`accept`] performs that check and lowers the metadata into
//! a [`TypeDescriptor`], the only form the binder works with.

use std::fmt;

use crate::declaration::ElementKind;
use crate::error::{BindError, Result};
use crate::metadata::{FieldMetadata, ScalarCodec, ValueKind};
use crate::scalar::ScalarKind;
use crate::value::{Instance, Value};

/// How a field's value is located in XML
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum BindingMode {
    Element,
    Attribute,
    ArrayOfElements,
    InnerXml,
}

impl fmt::Display for BindingMode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            BindingMode::Element => "element",
            BindingMode::Attribute => "attribute",
            BindingMode::ArrayOfElements => "array of elements",
            BindingMode::InnerXml => "inner XML",
        };
        f.write_str(name)
    }
}

/// What an element-bound field turns its child into
#[derive(Debug, Clone)]
pub enum ElementTarget {
    Scalar(ScalarCodec),
    Nested(String),
}

/// A field's binding mode together with the data that mode needs
#[derive(Debug, Clone)]
pub enum Binding {
    Element(ElementTarget),
    Attribute(ScalarCodec),
    ArrayOfElements(ElementKind),
    InnerXml,
}

/// One accepted field
#[derive(Debug, Clone)]
pub struct FieldDescriptor {
    name: String,
    xml_name: String,
    binding: Binding,
    optional: bool,
}

impl FieldDescriptor {
    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn xml_name(&self) -> &str {
        &self.xml_name
    }

    pub fn binding(&self) -> &Binding {
        &self.binding
    }

    pub fn mode(&self) -> BindingMode {
        match self.binding {
            Binding::Element(_) => BindingMode::Element,
            Binding::Attribute(_) => BindingMode::Attribute,
            Binding::ArrayOfElements(_) => BindingMode::ArrayOfElements,
            Binding::InnerXml => BindingMode::InnerXml,
        }
    }

    /// Informational only; a missing element keeps its default either way
    pub fn is_optional(&self) -> bool {
        self.optional
    }

    /// Value of this field on a freshly allocated instance
    pub fn default_value(&self) -> Value {
        match &self.binding {
            Binding::Element(ElementTarget::Scalar(codec)) | Binding::Attribute(codec) => {
                codec.kind.default_value()
            }
            Binding::Element(ElementTarget::Nested(_)) => Value::Null,
            Binding::ArrayOfElements(_) => Value::Array(Vec::new()),
            Binding::InnerXml => Value::String(String::new()),
        }
    }
}

/// An accepted type: its name and fields in bind order
#[derive(Debug, Clone)]
pub struct TypeDescriptor {
    name: String,
    fields: Vec<FieldDescriptor>,
}

impl TypeDescriptor {
    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn fields(&self) -> &[FieldDescriptor] {
        &self.fields
    }

    pub fn field(&self, name: &str) -> Option<&FieldDescriptor> {
        self.fields.iter().find(|field| field.name == name)
    }

    /// A new instance with every field at its default
    pub fn new_instance(&self) -> Instance {
        let mut instance = Instance::new(self.name.clone());
        for field in &self.fields {
            instance.set(field.name.clone(), field.default_value());
        }
        instance
    }
}

/// True iff every field has exactly one binding mode
pub fn is_acceptable(fields: &[FieldMetadata]) -> bool {
    fields.iter().all(|field| field.binding_mode_count() == 1)
}

/// Check acceptability and lower the metadata of `type_name` into a descriptor
pub fn accept(type_name: &str, fields: Vec<FieldMetadata>) -> Result<TypeDescriptor> {
    if let Some(bad) = fields.iter().find(|field| field.binding_mode_count() != 1) {
        return Err(BindError::configuration(
            type_name,
            format!(
                "type {} cannot be used: field {} has {} binding modes, expected exactly one",
                type_name,
                bad.field_name,
                bad.binding_mode_count()
            ),
        ));
    }

    let fields = fields
        .into_iter()
        .map(|field| lower_field(type_name, field))
        .collect::<Result<Vec<_>>>()?;

    Ok(TypeDescriptor {
        name: type_name.to_string(),
        fields,
    })
}

fn lower_field(type_name: &str, field: FieldMetadata) -> Result<FieldDescriptor> {
    let binding = if field.is_element {
        match (&field.value_kind, &field.codec) {
            (ValueKind::Nested(nested), _) => Binding::Element(ElementTarget::Nested(nested.clone())),
            (ValueKind::Scalar(_), Some(codec)) => Binding::Element(ElementTarget::Scalar(codec.clone())),
            _ => return Err(mismatch(type_name, &field, BindingMode::Element)),
        }
    } else if field.is_attribute {
        match &field.codec {
            Some(codec) => Binding::Attribute(codec.clone()),
            None => return Err(mismatch(type_name, &field, BindingMode::Attribute)),
        }
    } else if let Some(kind) = &field.array_element {
        Binding::ArrayOfElements(kind.clone())
    } else {
        match field.value_kind {
            ValueKind::Scalar(ScalarKind::String) => Binding::InnerXml,
            _ => return Err(mismatch(type_name, &field, BindingMode::InnerXml)),
        }
    };

    Ok(FieldDescriptor {
        name: field.field_name,
        xml_name: field.xml_name,
        binding,
        optional: field.optional,
    })
}

fn mismatch(type_name: &str, field: &FieldMetadata, mode: BindingMode) -> BindError {
    BindError::configuration(
        type_name,
        format!(
            "field {} cannot use {} binding with value kind {:?}",
            field.field_name, mode, field.value_kind
        ),
    )
}
