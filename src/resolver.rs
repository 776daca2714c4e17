//! Descriptor resolution
//!
//! Type descriptors are derived on first use (reflector, then metadata
//! extraction, then acceptance) and memoized per type name. Derivation is a
//! pure function of the declaration, so a cached descriptor never goes stale.

use std::sync::Arc;

use moka::sync::Cache;
use tracing::debug;

use crate::acceptance::{self, TypeDescriptor};
use crate::declaration::Reflector;
use crate::error::{BindError, Result};
use crate::metadata::extract_field;

/// Lazily derives and caches [`TypeDescriptor`]s
///
/// The cache guarantees a single derivation per type name even when several
/// threads ask for the same type at once; the others wait for the result.
pub struct TypeResolver {
    reflector: Box<dyn Reflector>,
    cache: Cache<String, Arc<TypeDescriptor>>,
}

impl TypeResolver {
    pub fn new(reflector: impl Reflector + 'static, max_capacity: u64) -> Self {
        let cache = Cache::builder().max_capacity(max_capacity).build();

        Self {
            reflector: Box::new(reflector),
            cache,
        }
    }

    /// The accepted descriptor for `type_name`
    pub fn resolve(&self, type_name: &str) -> Result<Arc<TypeDescriptor>> {
        self.cache
            .try_get_with(type_name.to_string(), || self.derive(type_name))
            .map_err(|e| (*e).clone())
    }

    /// Whether `type_name` has already been derived successfully
    pub fn is_cached(&self, type_name: &str) -> bool {
        self.cache.contains_key(type_name)
    }

    fn derive(&self, type_name: &str) -> Result<Arc<TypeDescriptor>> {
        let declarations = self.reflector.fields(type_name).ok_or_else(|| {
            BindError::configuration(type_name, format!("type {} is not declared", type_name))
        })?;

        let metadata = declarations
            .iter()
            .map(|decl| extract_field(type_name, decl))
            .collect::<Result<Vec<_>>>()?;

        let descriptor = acceptance::accept(type_name, metadata)?;
        debug!(
            type_name,
            fields = descriptor.fields().len(),
            "accepted type descriptor"
        );

        Ok(Arc::new(descriptor))
    }
}
