//! Recursive object binding
//!
//! [`Parser`] is the entry point: it parses XML text, picks the target type
//! (explicit or the root element name) and binds the root element. Binding
//! walks the descriptor's fields in declaration order against the element,
//! recursing into nested and array element types.
//!
//! Recursion depth follows the joint nesting of the document and of the
//! declared types. There is no explicit limit.

use std::sync::Arc;

use tracing::{debug, trace};

use crate::acceptance::{Binding, ElementTarget, FieldDescriptor, TypeDescriptor};
use crate::config::{ArrayScope, BindOptions};
use crate::declaration::{ElementKind, Reflector, XmlRecord};
use crate::error::{BindError, Result};
use crate::metadata::ScalarCodec;
use crate::resolver::TypeResolver;
use crate::value::{BoundInstance, Instance, Value};
use crate::xml::{XmlDocument, XmlNode};

/// Binds XML documents to declared types
pub struct Parser {
    resolver: TypeResolver,
    options: BindOptions,
}

impl Parser {
    pub fn new(reflector: impl Reflector + 'static) -> Self {
        Self::with_options(reflector, BindOptions::default())
    }

    pub fn with_options(reflector: impl Reflector + 'static, options: BindOptions) -> Self {
        Self {
            resolver: TypeResolver::new(reflector, options.max_cached_types),
            options,
        }
    }

    /// The accepted descriptor of `type_name`, derived on first use
    pub fn descriptor(&self, type_name: &str) -> Result<Arc<TypeDescriptor>> {
        self.resolver.resolve(type_name)
    }

    /// Bind `xml` to `type_name`, or to the type named by its root element
    pub fn parse(&self, xml: &str, type_name: Option<&str>) -> Result<BoundInstance> {
        let xml = if self.options.trim_input { xml.trim() } else { xml };
        let document = XmlDocument::parse(xml)?;

        let type_name = type_name.unwrap_or_else(|| document.root_element_name());
        let descriptor = self.descriptor(type_name)?;

        let result = self.bind(&descriptor, document.root())?;
        Ok(BoundInstance { result })
    }

    /// Bind `xml` to the Rust record `T`
    pub fn parse_as<T: XmlRecord>(&self, xml: &str) -> Result<BoundInstance<T>> {
        let bound = self.parse(xml, Some(T::TYPE_NAME))?;
        let result = bound.result.decode()?;
        Ok(BoundInstance { result })
    }

    /// Build a new instance of `descriptor` from `node`
    pub fn bind(&self, descriptor: &TypeDescriptor, node: XmlNode<'_, '_>) -> Result<Instance> {
        debug!(type_name = descriptor.name(), element = node.name(), "binding");

        let mut instance = descriptor.new_instance();

        for field in descriptor.fields() {
            let value = match field.binding() {
                Binding::Element(target) => {
                    let Some(child) = node.child_by_name(field.xml_name()) else {
                        trace!(field = field.name(), "element absent, keeping default");
                        continue;
                    };
                    match target {
                        ElementTarget::Nested(type_name) => {
                            let nested = self.descriptor(type_name)?;
                            Value::Record(self.bind(&nested, child)?)
                        }
                        ElementTarget::Scalar(codec) => {
                            self.convert(descriptor, field, codec, &child.text())?
                        }
                    }
                }
                Binding::Attribute(codec) => {
                    let Some(raw) = node.attribute(field.xml_name()) else {
                        trace!(field = field.name(), "attribute absent, keeping default");
                        continue;
                    };
                    self.convert(descriptor, field, codec, raw)?
                }
                Binding::ArrayOfElements(kind) => self.bind_array(field, kind, node)?,
                Binding::InnerXml => Value::String(
                    node.element_children()
                        .map(|child| child.serialize())
                        .collect(),
                ),
            };

            instance.set(field.name(), value);
        }

        Ok(instance)
    }

    fn convert(
        &self,
        descriptor: &TypeDescriptor,
        field: &FieldDescriptor,
        codec: &ScalarCodec,
        raw: &str,
    ) -> Result<Value> {
        if !(codec.validator)(raw) {
            return Err(BindError::value(descriptor.name(), field.name(), raw));
        }
        Ok((codec.converter)(raw))
    }

    fn bind_array(
        &self,
        field: &FieldDescriptor,
        kind: &ElementKind,
        node: XmlNode<'_, '_>,
    ) -> Result<Value> {
        let matched = match self.options.array_scope {
            ArrayScope::RootAnchored => node.select_from_root(&[node.name(), field.xml_name()]),
            ArrayScope::Relative => node.children_named(field.xml_name()).collect(),
        };

        let items = match kind {
            ElementKind::Scalar(scalar) => matched
                .iter()
                .map(|element| scalar.coerce(&array_item_text(element)))
                .collect(),
            // The element type is only resolved once there is an element to bind
            ElementKind::Named(_) if matched.is_empty() => Vec::new(),
            ElementKind::Named(type_name) => {
                let nested = self.descriptor(type_name)?;
                matched
                    .into_iter()
                    .map(|element| self.bind(&nested, element).map(Value::Record))
                    .collect::<Result<Vec<_>>>()?
            }
        };

        Ok(Value::Array(items))
    }
}

/// Raw text of a scalar array item
///
/// Reads the element's first attribute when it has any, and its text content
/// otherwise. Scalar `Element` and `Attribute` bindings never go through here.
fn array_item_text(element: &XmlNode<'_, '_>) -> String {
    match element.first_attribute() {
        Some(value) => value.to_string(),
        None => element.text(),
    }
}
