//! Core type definitions for the entity data model

use serde::{Deserialize, Serialize};
use std::fmt;

/// Namespace-qualified name of a schema element (e.g., "Shop.Product")
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize, PartialOrd, Ord)]
pub struct FullQualifiedName {
    pub namespace: String,
    pub name: String,
}

impl FullQualifiedName {
    pub fn new(namespace: impl Into<String>, name: impl Into<String>) -> Self {
        FullQualifiedName {
            namespace: namespace.into(),
            name: name.into(),
        }
    }

    /// Split a dotted name at its last dot. Returns `None` when there is no
    /// namespace part.
    pub fn parse(text: &str) -> Option<Self> {
        let (namespace, name) = text.rsplit_once('.')?;
        if namespace.is_empty() || name.is_empty() {
            return None;
        }
        Some(FullQualifiedName::new(namespace, name))
    }
}

impl fmt::Display for FullQualifiedName {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}.{}", self.namespace, self.name)
    }
}

/// Category of a resolved type
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum EdmTypeKind {
    Primitive,
    Complex,
    Entity,
}

/// Lightweight reference to a model type, stored inside resolved URI
/// segments so the request descriptor owns no borrows into the model.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct EdmTypeRef {
    pub name: FullQualifiedName,
    pub kind: EdmTypeKind,
}

impl EdmTypeRef {
    pub fn new(name: FullQualifiedName, kind: EdmTypeKind) -> Self {
        EdmTypeRef { name, kind }
    }
}

impl fmt::Display for EdmTypeRef {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.name)
    }
}

/// Structural property of an entity or complex type
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct EdmProperty {
    pub name: String,
    /// Qualified name of the property type; either a primitive type in the
    /// `Edm` namespace or a registered complex type.
    pub property_type: FullQualifiedName,
    #[serde(default)]
    pub collection: bool,
}

/// Navigation property pointing at another entity type
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct EdmNavigationProperty {
    pub name: String,
    pub target_type: FullQualifiedName,
    #[serde(default)]
    pub collection: bool,
}

/// Entity type declaration
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct EdmEntityType {
    pub name: FullQualifiedName,
    #[serde(default)]
    pub base_type: Option<FullQualifiedName>,
    /// Names of the key properties. May be empty on a subtype; the key is
    /// then inherited from the base type.
    #[serde(default)]
    pub key: Vec<String>,
    #[serde(default)]
    pub properties: Vec<EdmProperty>,
    #[serde(default)]
    pub navigation_properties: Vec<EdmNavigationProperty>,
}

/// Complex type declaration
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct EdmComplexType {
    pub name: FullQualifiedName,
    #[serde(default)]
    pub base_type: Option<FullQualifiedName>,
    #[serde(default)]
    pub properties: Vec<EdmProperty>,
}

/// Entity set declaration (top-level collection in the service root)
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct EdmEntitySet {
    pub name: String,
    pub entity_type: FullQualifiedName,
}

/// Singleton declaration (top-level single instance in the service root)
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct EdmSingleton {
    pub name: String,
    pub entity_type: FullQualifiedName,
}

/// Whether an operation is an action or a function
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum EdmOperationKind {
    Action,
    Function,
}

/// Binding of a bound operation to the type of its first parameter
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct EdmOperationBinding {
    pub binding_type: FullQualifiedName,
    #[serde(default)]
    pub collection: bool,
}

/// Action or function declaration
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct EdmOperation {
    pub name: FullQualifiedName,
    pub kind: EdmOperationKind,
    /// `None` for unbound operations (addressable through an import)
    #[serde(default)]
    pub binding: Option<EdmOperationBinding>,
    #[serde(default)]
    pub return_type: Option<FullQualifiedName>,
    #[serde(default)]
    pub return_collection: bool,
}

/// Service-root import exposing an unbound operation under a plain name
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct EdmOperationImport {
    pub name: String,
    pub operation: FullQualifiedName,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_qualified_name_display() {
        let fqn = FullQualifiedName::new("Shop", "Product");
        assert_eq!(fqn.to_string(), "Shop.Product");
    }

    #[test]
    fn test_qualified_name_parse() {
        let fqn = FullQualifiedName::parse("Shop.Sub.Product").unwrap();
        assert_eq!(fqn.namespace, "Shop.Sub");
        assert_eq!(fqn.name, "Product");

        assert!(FullQualifiedName::parse("Product").is_none());
        assert!(FullQualifiedName::parse(".Product").is_none());
        assert!(FullQualifiedName::parse("Shop.").is_none());
    }

    #[test]
    fn test_type_ref_display() {
        let string_type = EdmTypeRef::new(FullQualifiedName::new("Edm", "String"), EdmTypeKind::Primitive);
        assert_eq!(string_type.kind, EdmTypeKind::Primitive);
        assert_eq!(string_type.to_string(), "Edm.String");
    }
}
