//! Shared declarations for the integration tests

#![allow(dead_code)]

use serde::Deserialize;
use xml_bind::{
    DeclaredKind, ElementKind, FieldDeclaration, ScalarKind, TypeDeclaration, TypeRegistry, Value,
    XmlRecord,
};

pub const EXAMPLE1_XML: &str = "<Example1 id='1'><Name>John Doe</Name><Age>30</Age></Example1>";

pub const EXAMPLE9_XML: &str = "<Example9>\
    <Example1 id='1'><Name>Adam Jones</Name><Age>31</Age></Example1>\
    <Example1 id='2'><Name>John Doe</Name><Age>30</Age></Example1>\
    </Example9>";

pub fn example1() -> TypeDeclaration {
    TypeDeclaration::new("Example1")
        .field(FieldDeclaration::new("Name", DeclaredKind::String).element())
        .field(FieldDeclaration::new("Age", DeclaredKind::Int).element_named("Age"))
        .field(FieldDeclaration::new("myId", DeclaredKind::Int).attribute_named("id"))
}

pub fn dice_throw(raw: &str) -> bool {
    raw.parse::<i64>()
        .map(|value| (1..=6).contains(&value))
        .unwrap_or(false)
}

pub fn yes_no(raw: &str) -> Value {
    Value::Bool(raw.trim().eq_ignore_ascii_case("yes"))
}

/// Every example type from the binding tests
pub fn registry() -> TypeRegistry {
    TypeRegistry::new()
        .with(example1())
        .with(
            TypeDeclaration::new("Example2").field(FieldDeclaration::untyped("name").element()),
        )
        .with(
            TypeDeclaration::new("Example3")
                .field(FieldDeclaration::new("integer", DeclaredKind::Int).element())
                .field(FieldDeclaration::new("myId", DeclaredKind::Int).attribute_named("id")),
        )
        .with(
            TypeDeclaration::new("Example4")
                .field(FieldDeclaration::new("Example1", DeclaredKind::named("Example1")).element()),
        )
        .with(
            TypeDeclaration::new("Example5")
                .field(
                    FieldDeclaration::new("integerWhichMayBeMissing", DeclaredKind::nullable(DeclaredKind::Int))
                        .element(),
                )
                .field(
                    FieldDeclaration::new(
                        "stringWhichMayBeMissing",
                        DeclaredKind::nullable(DeclaredKind::String),
                    )
                    .element(),
                )
                .field(
                    FieldDeclaration::new(
                        "intOrString",
                        DeclaredKind::Union(vec![DeclaredKind::Int, DeclaredKind::String]),
                    )
                    .element(),
                )
                .field(
                    FieldDeclaration::new(
                        "intOrStringOrMissing",
                        DeclaredKind::Union(vec![
                            DeclaredKind::Int,
                            DeclaredKind::String,
                            DeclaredKind::Null,
                        ]),
                    )
                    .element(),
                ),
        )
        .with(
            TypeDeclaration::new("Example6")
                .field(FieldDeclaration::new("name", DeclaredKind::Array).array_of(ScalarKind::String)),
        )
        .with(
            TypeDeclaration::new("Example7")
                .field(FieldDeclaration::new("number", DeclaredKind::Array).array_of(ScalarKind::Int))
                .field(FieldDeclaration::new("boolean", DeclaredKind::Array).array_of(ScalarKind::Bool)),
        )
        .with(
            TypeDeclaration::new("Example8")
                .field(FieldDeclaration::new("innerXml", DeclaredKind::String).inner_xml()),
        )
        .with(
            TypeDeclaration::new("Example9").field(
                FieldDeclaration::new("Example1", DeclaredKind::Array)
                    .array_of(ElementKind::Named("Example1".to_string())),
            ),
        )
        .with(
            TypeDeclaration::new("Example10").field(
                FieldDeclaration::new("diceThrow", DeclaredKind::Int)
                    .element()
                    .validate_with(dice_throw),
            ),
        )
        .with(
            TypeDeclaration::new("Example11").field(
                FieldDeclaration::new("hasSignedAgreement", DeclaredKind::Bool)
                    .element()
                    .convert_with(yes_no),
            ),
        )
        .with(
            TypeDeclaration::new("Example12").field(
                FieldDeclaration::new("OptionalElement", DeclaredKind::Int)
                    .element()
                    .optional(),
            ),
        )
        .with(
            TypeDeclaration::new("Outer")
                .field(FieldDeclaration::new("Holder", DeclaredKind::named("Holder")).element()),
        )
        .with(
            TypeDeclaration::new("Holder")
                .field(FieldDeclaration::new("number", DeclaredKind::Array).array_of(ScalarKind::Int)),
        )
}

/// Typed counterpart of `Example1`
#[derive(Debug, Clone, PartialEq, Deserialize)]
pub struct Person {
    #[serde(rename = "Name")]
    pub name: String,
    #[serde(rename = "Age")]
    pub age: i64,
    #[serde(rename = "myId")]
    pub id: i64,
}

impl XmlRecord for Person {
    const TYPE_NAME: &'static str = "Example1";

    fn declaration() -> TypeDeclaration {
        example1()
    }
}

/// Typed counterpart of `Example9`
#[derive(Debug, Clone, PartialEq, Deserialize)]
pub struct People {
    #[serde(rename = "Example1")]
    pub people: Vec<Person>,
}

impl XmlRecord for People {
    const TYPE_NAME: &'static str = "Example9";

    fn declaration() -> TypeDeclaration {
        TypeDeclaration::new("Example9").field(
            FieldDeclaration::new("Example1", DeclaredKind::Array)
                .array_of(ElementKind::Named(Person::TYPE_NAME.to_string())),
        )
    }
}

/// Declares `Name` as text but expects a number on the Rust side
#[derive(Debug, Deserialize)]
pub struct MisdeclaredPerson {
    #[serde(rename = "Name")]
    pub name: i64,
}

impl XmlRecord for MisdeclaredPerson {
    const TYPE_NAME: &'static str = "Example1";

    fn declaration() -> TypeDeclaration {
        example1()
    }
}

pub const EXAMPLES_TOML: &str = r#"
[[types]]
name = "Example1"

[[types.fields]]
name = "Name"
type = "string"
bind = "element"

[[types.fields]]
name = "Age"
type = "int"
bind = "element"

[[types.fields]]
name = "myId"
type = "int"
bind = "attribute"
xml_name = "id"

[[types]]
name = "Example9"

[[types.fields]]
name = "Example1"
type = "array"
elements = "Example1"

[[types]]
name = "Example10"

[[types.fields]]
name = "diceThrow"
type = "int"
bind = "element"
range = { min = 1, max = 6 }
"#;
