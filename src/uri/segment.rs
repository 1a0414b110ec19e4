//! Resolved resource-path segments
//!
//! Each `/`-delimited unit of a request path resolves to one `UriResource`
//! variant. The variant is fixed at construction; key predicates live only
//! on the key-capable variants.

use crate::edm::{EdmTypeKind, EdmTypeRef};

/// One key predicate: `ID=5` or the single-key shorthand `5`
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct KeyPredicate {
    /// Key property name; `None` for the single-key shorthand
    pub name: Option<String>,
    /// Literal text of the key value (string literals are unquoted)
    pub value: String,
}

impl KeyPredicate {
    pub fn named(name: impl Into<String>, value: impl Into<String>) -> Self {
        KeyPredicate {
            name: Some(name.into()),
            value: value.into(),
        }
    }

    pub fn unnamed(value: impl Into<String>) -> Self {
        KeyPredicate {
            name: None,
            value: value.into(),
        }
    }
}

/// Closed tag identifying the segment variant
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum UriResourceKind {
    EntitySet,
    Singleton,
    NavigationProperty,
    Action,
    Function,
    TypeFilter,
    PrimitiveProperty,
    ComplexProperty,
    Value,
    Ref,
    Count,
    LambdaVariable,
}

/// Resolved resource-path segment
///
/// Pseudo-segments (`$value`, `$ref`, `$count`) carry no model type. A
/// `TypeFilter` narrows the preceding segment to a derived type without
/// advancing the navigation context; its collection-ness is inherited from
/// that left context.
#[derive(Debug, Clone, PartialEq)]
pub enum UriResource {
    EntitySet {
        name: String,
        entity_type: EdmTypeRef,
        keys: Option<Vec<KeyPredicate>>,
    },
    Singleton {
        name: String,
        entity_type: EdmTypeRef,
    },
    NavigationProperty {
        name: String,
        target_type: EdmTypeRef,
        collection: bool,
        keys: Option<Vec<KeyPredicate>>,
    },
    Action {
        name: String,
        return_type: Option<EdmTypeRef>,
        collection: bool,
    },
    Function {
        name: String,
        return_type: Option<EdmTypeRef>,
        collection: bool,
        /// Inline parameters/keys, in the `(name=value, ...)` shape
        keys: Option<Vec<KeyPredicate>>,
    },
    TypeFilter {
        target_type: EdmTypeRef,
        collection: bool,
        keys: Option<Vec<KeyPredicate>>,
    },
    PrimitiveProperty {
        name: String,
        property_type: EdmTypeRef,
        collection: bool,
    },
    ComplexProperty {
        name: String,
        complex_type: EdmTypeRef,
        collection: bool,
    },
    Value,
    Ref {
        collection: bool,
    },
    Count,
    LambdaVariable {
        name: String,
        var_type: EdmTypeRef,
        collection: bool,
    },
}

impl UriResource {
    pub fn kind(&self) -> UriResourceKind {
        match self {
            UriResource::EntitySet { .. } => UriResourceKind::EntitySet,
            UriResource::Singleton { .. } => UriResourceKind::Singleton,
            UriResource::NavigationProperty { .. } => UriResourceKind::NavigationProperty,
            UriResource::Action { .. } => UriResourceKind::Action,
            UriResource::Function { .. } => UriResourceKind::Function,
            UriResource::TypeFilter { .. } => UriResourceKind::TypeFilter,
            UriResource::PrimitiveProperty { .. } => UriResourceKind::PrimitiveProperty,
            UriResource::ComplexProperty { .. } => UriResourceKind::ComplexProperty,
            UriResource::Value => UriResourceKind::Value,
            UriResource::Ref { .. } => UriResourceKind::Ref,
            UriResource::Count => UriResourceKind::Count,
            UriResource::LambdaVariable { .. } => UriResourceKind::LambdaVariable,
        }
    }

    /// Resolved model type of this segment, absent for pseudo-segments
    pub fn edm_type(&self) -> Option<&EdmTypeRef> {
        match self {
            UriResource::EntitySet { entity_type, .. }
            | UriResource::Singleton { entity_type, .. } => Some(entity_type),
            UriResource::NavigationProperty { target_type, .. }
            | UriResource::TypeFilter { target_type, .. } => Some(target_type),
            UriResource::Action { return_type, .. }
            | UriResource::Function { return_type, .. } => return_type.as_ref(),
            UriResource::PrimitiveProperty { property_type, .. } => Some(property_type),
            UriResource::ComplexProperty { complex_type, .. } => Some(complex_type),
            UriResource::LambdaVariable { var_type, .. } => Some(var_type),
            UriResource::Value | UriResource::Ref { .. } | UriResource::Count => None,
        }
    }

    /// Effective collection-ness: a segment denotes a single instance once
    /// key predicates are attached, regardless of the static hint.
    pub fn is_collection(&self) -> bool {
        match self {
            UriResource::EntitySet { keys, .. } => keys.is_none(),
            UriResource::Singleton { .. } => false,
            UriResource::NavigationProperty {
                collection, keys, ..
            }
            | UriResource::Function {
                collection, keys, ..
            }
            | UriResource::TypeFilter {
                collection, keys, ..
            } => keys.is_none() && *collection,
            UriResource::Action { collection, .. }
            | UriResource::PrimitiveProperty { collection, .. }
            | UriResource::ComplexProperty { collection, .. }
            | UriResource::Ref { collection }
            | UriResource::LambdaVariable { collection, .. } => *collection,
            UriResource::Value | UriResource::Count => false,
        }
    }

    /// Textual form of the segment as it appears in a path
    pub fn segment_value(&self) -> String {
        match self {
            UriResource::EntitySet { name, .. }
            | UriResource::Singleton { name, .. }
            | UriResource::NavigationProperty { name, .. }
            | UriResource::Action { name, .. }
            | UriResource::Function { name, .. }
            | UriResource::PrimitiveProperty { name, .. }
            | UriResource::ComplexProperty { name, .. }
            | UriResource::LambdaVariable { name, .. } => name.clone(),
            UriResource::TypeFilter { target_type, .. } => target_type.name.to_string(),
            UriResource::Value => "$value".to_string(),
            UriResource::Ref { .. } => "$ref".to_string(),
            UriResource::Count => "$count".to_string(),
        }
    }

    /// Attached key predicates, if any
    pub fn key_predicates(&self) -> Option<&[KeyPredicate]> {
        match self {
            UriResource::EntitySet { keys, .. }
            | UriResource::NavigationProperty { keys, .. }
            | UriResource::Function { keys, .. }
            | UriResource::TypeFilter { keys, .. } => keys.as_deref(),
            _ => None,
        }
    }

    /// Whether this variant can carry key predicates
    pub fn supports_keys(&self) -> bool {
        matches!(
            self,
            UriResource::EntitySet { .. }
                | UriResource::NavigationProperty { .. }
                | UriResource::Function { .. }
                | UriResource::TypeFilter { .. }
        )
    }

    /// Attach key predicates; returns `false` when the variant has no key
    /// capability.
    pub(crate) fn attach_keys(&mut self, predicates: Vec<KeyPredicate>) -> bool {
        match self {
            UriResource::EntitySet { keys, .. }
            | UriResource::NavigationProperty { keys, .. }
            | UriResource::Function { keys, .. }
            | UriResource::TypeFilter { keys, .. } => {
                *keys = Some(predicates);
                true
            }
            _ => false,
        }
    }

    /// Whether the segment's resolved type is an entity type
    pub fn is_entity_typed(&self) -> bool {
        self.edm_type()
            .is_some_and(|t| t.kind == EdmTypeKind::Entity)
    }
}
