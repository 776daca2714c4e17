//! Field metadata extraction
//!
//! Turns one [`FieldDeclaration`] into a [`FieldMetadata`] record: which
//! binding markers are present, the XML name, the resolved value kind and,
//! for scalars, the validator and converter in effect.
//!
//! Extraction does not decide whether the combination of binding markers is
//! usable; that is [`crate::acceptance`]'s job.

use std::fmt;

use crate::declaration::{DeclaredKind, ElementKind, FieldDeclaration, Marker};
use crate::error::{BindError, Result};
use crate::scalar::{Converter, ScalarKind, Validator};

/// Resolved value kind of a field
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ValueKind {
    Scalar(ScalarKind),
    /// Reference to another declared type, resolved lazily by name
    Nested(String),
    ArrayOf(ElementKind),
}

/// Scalar validator and converter pair
#[derive(Clone)]
pub struct ScalarCodec {
    pub kind: ScalarKind,
    pub validator: Validator,
    pub converter: Converter,
}

impl fmt::Debug for ScalarCodec {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ScalarCodec")
            .field("kind", &self.kind)
            .finish_non_exhaustive()
    }
}

/// Everything the markers and declared kind say about one field
#[derive(Debug, Clone)]
pub struct FieldMetadata {
    pub field_name: String,
    pub xml_name: String,
    pub is_element: bool,
    pub is_attribute: bool,
    pub is_inner_xml: bool,
    /// Element kind given by an array marker
    pub array_element: Option<ElementKind>,
    pub value_kind: ValueKind,
    /// Present only for scalar value kinds
    pub codec: Option<ScalarCodec>,
    pub optional: bool,
    /// The declared kind was a union including null
    pub nullable: bool,
}

impl FieldMetadata {
    pub fn is_array_of_elements(&self) -> bool {
        self.array_element.is_some()
    }

    /// Number of binding modes the markers selected
    pub fn binding_mode_count(&self) -> usize {
        [
            self.is_element,
            self.is_array_of_elements(),
            self.is_attribute,
            self.is_inner_xml,
        ]
        .into_iter()
        .filter(|set| *set)
        .count()
    }
}

/// Declared kind after union resolution
enum Resolved {
    Scalar(ScalarKind),
    Nested(String),
    Array,
}

/// Extract the metadata of field `decl` declared on type `type_name`
pub fn extract_field(type_name: &str, decl: &FieldDeclaration) -> Result<FieldMetadata> {
    let Some(declared) = &decl.declared else {
        return Err(BindError::configuration(
            type_name,
            format!("field {} needs to have a type", decl.name),
        ));
    };

    let nullable = matches!(declared, DeclaredKind::Union(kinds) if kinds.contains(&DeclaredKind::Null));
    let resolved = resolve_declared(type_name, &decl.name, declared)?;

    let mut metadata = FieldMetadata {
        field_name: decl.name.clone(),
        xml_name: decl.name.clone(),
        is_element: false,
        is_attribute: false,
        is_inner_xml: false,
        array_element: None,
        value_kind: ValueKind::Scalar(ScalarKind::String),
        codec: None,
        optional: false,
        nullable,
    };
    let mut validator = None;
    let mut converter = None;

    for marker in &decl.markers {
        match marker {
            Marker::Element(name) => {
                metadata.is_element = true;
                metadata.xml_name = name.clone().unwrap_or_else(|| decl.name.clone());
            }
            Marker::Attribute(name) => {
                metadata.is_attribute = true;
                metadata.xml_name = name.clone().unwrap_or_else(|| decl.name.clone());
            }
            Marker::InnerXml => metadata.is_inner_xml = true,
            Marker::ArrayElements(kind) => {
                metadata.array_element = Some(kind.clone());
                metadata.xml_name = decl.name.clone();
            }
            Marker::Conversion(f) => converter = Some(f.clone()),
            Marker::Validation(f) => validator = Some(f.clone()),
            Marker::Optional => metadata.optional = true,
        }
    }

    match (resolved, &metadata.array_element) {
        (Resolved::Array, Some(kind)) => {
            metadata.value_kind = ValueKind::ArrayOf(kind.clone());
        }
        (Resolved::Array, None) => {
            return Err(BindError::configuration(
                type_name,
                format!("array field {} has no array element marker", decl.name),
            ));
        }
        (_, Some(_)) => {
            return Err(BindError::configuration(
                type_name,
                format!(
                    "array element marker on field {} requires an array type, found {}",
                    decl.name, declared
                ),
            ));
        }
        (Resolved::Scalar(kind), None) => {
            metadata.value_kind = ValueKind::Scalar(kind);
            metadata.codec = Some(ScalarCodec {
                kind,
                validator: validator.unwrap_or_else(|| kind.default_validator()),
                converter: converter.unwrap_or_else(|| kind.default_converter()),
            });
        }
        (Resolved::Nested(name), None) => {
            metadata.value_kind = ValueKind::Nested(name);
        }
    }

    Ok(metadata)
}

fn resolve_declared(type_name: &str, field: &str, declared: &DeclaredKind) -> Result<Resolved> {
    let unsupported = || {
        BindError::configuration(
            type_name,
            format!("field {} has an unsupported type: {}", field, declared),
        )
    };

    match declared {
        DeclaredKind::Int | DeclaredKind::Bool | DeclaredKind::Float | DeclaredKind::String => {
            declared.as_scalar().map(Resolved::Scalar).ok_or_else(unsupported)
        }
        DeclaredKind::Array => Ok(Resolved::Array),
        DeclaredKind::Named(name) => Ok(Resolved::Nested(name.clone())),
        DeclaredKind::Null | DeclaredKind::Intersection(_) => Err(unsupported()),
        DeclaredKind::Union(branches) => {
            let branches: Vec<_> = branches
                .iter()
                .filter(|kind| **kind != DeclaredKind::Null)
                .collect();

            match branches.as_slice() {
                [] => Err(unsupported()),
                [DeclaredKind::Union(_)] | [DeclaredKind::Intersection(_)] => Err(unsupported()),
                [single] => resolve_declared(type_name, field, single),
                // Several branches: all scalar, the first one is authoritative
                [first, rest @ ..] => {
                    let first = first.as_scalar().ok_or_else(unsupported)?;
                    if rest.iter().all(|kind| kind.as_scalar().is_some()) {
                        Ok(Resolved::Scalar(first))
                    } else {
                        Err(unsupported())
                    }
                }
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::value::Value;

    fn extract(decl: FieldDeclaration) -> Result<FieldMetadata> {
        extract_field("Example", &decl)
    }

    fn reason(error: BindError) -> String {
        match error {
            BindError::Configuration { reason, .. } => reason,
            other => panic!("Expected configuration error, got {other:?}"),
        }
    }

    #[test]
    fn test_element_defaults_xml_name_to_field_name() {
        let metadata = extract(FieldDeclaration::new("Name", DeclaredKind::String).element()).unwrap();

        assert!(metadata.is_element);
        assert_eq!(metadata.xml_name, "Name");
        assert_eq!(metadata.value_kind, ValueKind::Scalar(ScalarKind::String));
        assert_eq!(metadata.binding_mode_count(), 1);
    }

    #[test]
    fn test_attribute_name_override() {
        let metadata = extract(FieldDeclaration::new("myId", DeclaredKind::Int).attribute_named("id")).unwrap();

        assert!(metadata.is_attribute);
        assert_eq!(metadata.field_name, "myId");
        assert_eq!(metadata.xml_name, "id");
    }

    #[test]
    fn test_missing_type() {
        let error = extract(FieldDeclaration::untyped("name").element()).unwrap_err();
        assert!(reason(error).contains("needs to have a type"));
    }

    #[test]
    fn test_intersection_is_unsupported() {
        let kind = DeclaredKind::Intersection(vec![DeclaredKind::named("A"), DeclaredKind::named("B")]);
        let error = extract(FieldDeclaration::new("both", kind).element()).unwrap_err();
        assert!(reason(error).contains("unsupported type: A&B"));
    }

    #[test]
    fn test_nullable_scalar_union() {
        let metadata =
            extract(FieldDeclaration::new("maybe", DeclaredKind::nullable(DeclaredKind::Int)).element()).unwrap();

        assert_eq!(metadata.value_kind, ValueKind::Scalar(ScalarKind::Int));
        assert!(metadata.nullable);
    }

    #[test]
    fn test_scalar_union_takes_first_branch() {
        let kind = DeclaredKind::Union(vec![DeclaredKind::Int, DeclaredKind::String, DeclaredKind::Null]);
        let metadata = extract(FieldDeclaration::new("intOrString", kind).element()).unwrap();
        assert_eq!(metadata.value_kind, ValueKind::Scalar(ScalarKind::Int));
    }

    #[test]
    fn test_nullable_nested_type() {
        let kind = DeclaredKind::nullable(DeclaredKind::named("Example1"));
        let metadata = extract(FieldDeclaration::new("inner", kind).element()).unwrap();

        assert_eq!(metadata.value_kind, ValueKind::Nested("Example1".to_string()));
        assert!(metadata.codec.is_none());
    }

    #[test]
    fn test_union_with_several_non_scalar_branches() {
        let kind = DeclaredKind::Union(vec![DeclaredKind::Int, DeclaredKind::named("Example1")]);
        let error = extract(FieldDeclaration::new("mixed", kind).element()).unwrap_err();
        assert!(reason(error).contains("unsupported type"));

        let only_null = DeclaredKind::Union(vec![DeclaredKind::Null]);
        assert!(extract(FieldDeclaration::new("nothing", only_null).element()).is_err());
    }

    #[test]
    fn test_array_with_element_marker() {
        let metadata =
            extract(FieldDeclaration::new("number", DeclaredKind::Array).array_of(ScalarKind::Int)).unwrap();

        assert!(metadata.is_array_of_elements());
        assert_eq!(metadata.xml_name, "number");
        assert_eq!(
            metadata.value_kind,
            ValueKind::ArrayOf(ElementKind::Scalar(ScalarKind::Int))
        );
    }

    #[test]
    fn test_array_without_element_marker() {
        let error = extract(FieldDeclaration::new("number", DeclaredKind::Array).element()).unwrap_err();
        assert!(reason(error).contains("no array element marker"));
    }

    #[test]
    fn test_element_marker_without_array() {
        let error = extract(FieldDeclaration::new("number", DeclaredKind::Int).array_of(ScalarKind::Int)).unwrap_err();
        assert!(reason(error).contains("requires an array type"));
    }

    #[test]
    fn test_custom_validator_and_converter_override_defaults() {
        let metadata = extract(
            FieldDeclaration::new("hasSignedAgreement", DeclaredKind::Bool)
                .element()
                .convert_with(|raw| Value::Bool(raw.eq_ignore_ascii_case("yes")))
                .validate_with(|raw| !raw.is_empty()),
        )
        .unwrap();

        let codec = metadata.codec.unwrap();
        assert_eq!((codec.converter)("no"), Value::Bool(false));
        assert_eq!((codec.converter)("YES"), Value::Bool(true));
        assert!(!(codec.validator)(""));
    }

    #[test]
    fn test_default_codec_for_int() {
        let metadata = extract(FieldDeclaration::new("Age", DeclaredKind::Int).element()).unwrap();
        let codec = metadata.codec.unwrap();

        assert!((codec.validator)("30"));
        assert!(!(codec.validator)("thirty"));
        assert_eq!((codec.converter)("30"), Value::Int(30));
    }

    #[test]
    fn test_binding_mode_count() {
        let none = extract(FieldDeclaration::new("a", DeclaredKind::String)).unwrap();
        assert_eq!(none.binding_mode_count(), 0);

        let two = extract(FieldDeclaration::new("a", DeclaredKind::String).element().attribute()).unwrap();
        assert_eq!(two.binding_mode_count(), 2);
    }

    #[test]
    fn test_optional_is_recorded() {
        let metadata = extract(FieldDeclaration::new("OptionalElement", DeclaredKind::Int).element().optional()).unwrap();
        assert!(metadata.optional);
    }
}
