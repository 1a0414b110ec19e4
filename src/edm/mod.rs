//! Entity data model (EDM)
//!
//! The schema surface the URI resolver consults: entity and complex types
//! with their properties, navigation properties and keys, entity sets and
//! singletons at the service root, and bound/unbound operations. The model
//! is read-only during parsing and safe to share across requests.

pub mod model;
pub mod types;

// Re-export main types
pub use model::EdmModel;
pub use types::{
    EdmComplexType, EdmEntitySet, EdmEntityType, EdmNavigationProperty, EdmOperation,
    EdmOperationBinding, EdmOperationImport, EdmOperationKind, EdmProperty, EdmSingleton,
    EdmTypeKind, EdmTypeRef, FullQualifiedName,
};
