//! Read-only entity-data-model container consulted during URI resolution
//!
//! The model is built once (in code or from JSON) and shared immutably
//! across concurrent request parses. The resolver never mutates it.

use super::types::{
    EdmComplexType, EdmEntitySet, EdmEntityType, EdmNavigationProperty, EdmOperation,
    EdmOperationImport, EdmProperty, EdmSingleton, EdmTypeKind, EdmTypeRef, FullQualifiedName,
};
use serde::{Deserialize, Serialize};

/// Entity data model: schema elements plus the lookup surface the segment
/// resolver needs (root names, properties, derived types, bound operations).
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct EdmModel {
    #[serde(default)]
    pub entity_types: Vec<EdmEntityType>,
    #[serde(default)]
    pub complex_types: Vec<EdmComplexType>,
    #[serde(default)]
    pub entity_sets: Vec<EdmEntitySet>,
    #[serde(default)]
    pub singletons: Vec<EdmSingleton>,
    #[serde(default)]
    pub operations: Vec<EdmOperation>,
    #[serde(default)]
    pub operation_imports: Vec<EdmOperationImport>,
}

impl EdmModel {
    /// Create an empty model
    pub fn new() -> Self {
        Self::default()
    }

    /// Load a model from its JSON representation
    pub fn from_json(json: &str) -> Result<Self, serde_json::Error> {
        serde_json::from_str(json)
    }

    /// Serialize the model to JSON
    pub fn to_json(&self) -> Result<String, serde_json::Error> {
        serde_json::to_string_pretty(self)
    }

    pub fn add_entity_type(&mut self, entity_type: EdmEntityType) -> &mut Self {
        self.entity_types.push(entity_type);
        self
    }

    pub fn add_complex_type(&mut self, complex_type: EdmComplexType) -> &mut Self {
        self.complex_types.push(complex_type);
        self
    }

    pub fn add_entity_set(&mut self, entity_set: EdmEntitySet) -> &mut Self {
        self.entity_sets.push(entity_set);
        self
    }

    pub fn add_singleton(&mut self, singleton: EdmSingleton) -> &mut Self {
        self.singletons.push(singleton);
        self
    }

    pub fn add_operation(&mut self, operation: EdmOperation) -> &mut Self {
        self.operations.push(operation);
        self
    }

    pub fn add_operation_import(&mut self, import: EdmOperationImport) -> &mut Self {
        self.operation_imports.push(import);
        self
    }

    /// Look up an entity set by its service-root name
    pub fn entity_set(&self, name: &str) -> Option<&EdmEntitySet> {
        self.entity_sets.iter().find(|s| s.name == name)
    }

    /// Look up a singleton by its service-root name
    pub fn singleton(&self, name: &str) -> Option<&EdmSingleton> {
        self.singletons.iter().find(|s| s.name == name)
    }

    /// Look up an entity type by qualified name
    pub fn entity_type(&self, name: &FullQualifiedName) -> Option<&EdmEntityType> {
        self.entity_types.iter().find(|t| &t.name == name)
    }

    /// Look up a complex type by qualified name
    pub fn complex_type(&self, name: &FullQualifiedName) -> Option<&EdmComplexType> {
        self.complex_types.iter().find(|t| &t.name == name)
    }

    /// Build a type reference for a qualified name. Names registered as
    /// entity or complex types resolve to those kinds; everything else is
    /// treated as primitive.
    pub fn type_ref(&self, name: &FullQualifiedName) -> EdmTypeRef {
        let kind = if self.entity_type(name).is_some() {
            EdmTypeKind::Entity
        } else if self.complex_type(name).is_some() {
            EdmTypeKind::Complex
        } else {
            EdmTypeKind::Primitive
        };
        EdmTypeRef::new(name.clone(), kind)
    }

    /// Find a structural property on an entity or complex type, walking the
    /// base-type chain.
    pub fn structural_property(
        &self,
        type_name: &FullQualifiedName,
        property: &str,
    ) -> Option<&EdmProperty> {
        let mut current = Some(type_name.clone());
        while let Some(name) = current {
            if let Some(entity) = self.entity_type(&name) {
                if let Some(found) = entity.properties.iter().find(|p| p.name == property) {
                    return Some(found);
                }
                current = entity.base_type.clone();
            } else if let Some(complex) = self.complex_type(&name) {
                if let Some(found) = complex.properties.iter().find(|p| p.name == property) {
                    return Some(found);
                }
                current = complex.base_type.clone();
            } else {
                return None;
            }
        }
        None
    }

    /// Find a navigation property on an entity type, walking the base-type
    /// chain.
    pub fn navigation_property(
        &self,
        type_name: &FullQualifiedName,
        navigation: &str,
    ) -> Option<&EdmNavigationProperty> {
        let mut current = Some(type_name.clone());
        while let Some(name) = current {
            let entity = self.entity_type(&name)?;
            if let Some(found) = entity
                .navigation_properties
                .iter()
                .find(|n| n.name == navigation)
            {
                return Some(found);
            }
            current = entity.base_type.clone();
        }
        None
    }

    /// Names of the key properties of an entity type. Subtypes without an
    /// own key inherit the base type's key.
    pub fn key_property_names(&self, type_name: &FullQualifiedName) -> Vec<String> {
        let mut current = Some(type_name.clone());
        while let Some(name) = current {
            let Some(entity) = self.entity_type(&name) else {
                break;
            };
            if !entity.key.is_empty() {
                return entity.key.clone();
            }
            current = entity.base_type.clone();
        }
        Vec::new()
    }

    /// Whether `candidate` equals `base` or transitively derives from it.
    /// Works for entity and complex types.
    pub fn is_derived_from(
        &self,
        candidate: &FullQualifiedName,
        base: &FullQualifiedName,
    ) -> bool {
        let mut current = Some(candidate.clone());
        while let Some(name) = current {
            if &name == base {
                return true;
            }
            current = if let Some(entity) = self.entity_type(&name) {
                entity.base_type.clone()
            } else if let Some(complex) = self.complex_type(&name) {
                complex.base_type.clone()
            } else {
                None
            };
        }
        false
    }

    /// Find an operation bound to the given type with matching binding
    /// collection-ness. The binding also matches when the bound type is a
    /// base type of the current one.
    pub fn bound_operation(
        &self,
        name: &FullQualifiedName,
        binding_type: &FullQualifiedName,
        binding_collection: bool,
    ) -> Option<&EdmOperation> {
        self.operations.iter().find(|op| {
            &op.name == name
                && op.binding.as_ref().is_some_and(|b| {
                    b.collection == binding_collection
                        && self.is_derived_from(binding_type, &b.binding_type)
                })
        })
    }

    /// Resolve a service-root operation import to its unbound operation
    pub fn operation_import(&self, name: &str) -> Option<&EdmOperation> {
        let import = self.operation_imports.iter().find(|i| i.name == name)?;
        self.operations
            .iter()
            .find(|op| op.name == import.operation && op.binding.is_none())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::edm::{EdmOperationBinding, EdmOperationKind};

    fn sample_model() -> EdmModel {
        let mut model = EdmModel::new();
        model
            .add_entity_type(EdmEntityType {
                name: FullQualifiedName::new("Shop", "Product"),
                base_type: None,
                key: vec!["ID".to_string()],
                properties: vec![EdmProperty {
                    name: "Name".to_string(),
                    property_type: FullQualifiedName::new("Edm", "String"),
                    collection: false,
                }],
                navigation_properties: vec![],
            })
            .add_entity_type(EdmEntityType {
                name: FullQualifiedName::new("Shop", "DiscontinuedProduct"),
                base_type: Some(FullQualifiedName::new("Shop", "Product")),
                key: vec![],
                properties: vec![],
                navigation_properties: vec![],
            })
            .add_entity_set(EdmEntitySet {
                name: "Products".to_string(),
                entity_type: FullQualifiedName::new("Shop", "Product"),
            })
            .add_operation(EdmOperation {
                name: FullQualifiedName::new("Shop", "MostRecent"),
                kind: EdmOperationKind::Function,
                binding: Some(EdmOperationBinding {
                    binding_type: FullQualifiedName::new("Shop", "Product"),
                    collection: true,
                }),
                return_type: Some(FullQualifiedName::new("Shop", "Product")),
                return_collection: false,
            });
        model
    }

    #[test]
    fn test_entity_set_lookup() {
        let model = sample_model();
        assert!(model.entity_set("Products").is_some());
        assert!(model.entity_set("Orders").is_none());
    }

    #[test]
    fn test_property_inherited_from_base() {
        let model = sample_model();
        let derived = FullQualifiedName::new("Shop", "DiscontinuedProduct");
        let prop = model.structural_property(&derived, "Name").unwrap();
        assert_eq!(prop.property_type, FullQualifiedName::new("Edm", "String"));
    }

    #[test]
    fn test_key_inherited_from_base() {
        let model = sample_model();
        let derived = FullQualifiedName::new("Shop", "DiscontinuedProduct");
        assert_eq!(model.key_property_names(&derived), vec!["ID".to_string()]);
    }

    #[test]
    fn test_derived_type_check() {
        let model = sample_model();
        let base = FullQualifiedName::new("Shop", "Product");
        let derived = FullQualifiedName::new("Shop", "DiscontinuedProduct");
        assert!(model.is_derived_from(&derived, &base));
        assert!(model.is_derived_from(&base, &base));
        assert!(!model.is_derived_from(&base, &derived));
    }

    #[test]
    fn test_bound_operation_matches_collection() {
        let model = sample_model();
        let name = FullQualifiedName::new("Shop", "MostRecent");
        let product = FullQualifiedName::new("Shop", "Product");
        assert!(model.bound_operation(&name, &product, true).is_some());
        assert!(model.bound_operation(&name, &product, false).is_none());
    }

    #[test]
    fn test_json_round_trip() {
        let model = sample_model();
        let json = model.to_json().unwrap();
        let loaded = EdmModel::from_json(&json).unwrap();
        assert_eq!(loaded, model);
    }
}
