//! OData URI Engine
//!
//! Request-URI parsing and semantic resolution for an HTTP-based, typed
//! query protocol. A client request URI — a path of segments (entity sets,
//! keys, navigation properties, type casts, actions/functions) followed by
//! a query string of system options, parameter aliases and custom options —
//! is converted into a validated, strongly-typed [`uri::UriInfo`] request
//! descriptor for downstream query execution and response serialization.
//!
//! # Architecture
//!
//! - `edm` — the read-only entity data model the resolver consults
//! - `uri` — lexer, path-token grammar, segment resolver, option
//!   classifier and the assembled request descriptor
//!
//! Parsing is synchronous, performs no I/O and holds no shared mutable
//! state; an [`edm::EdmModel`] can be shared read-only across concurrent
//! request parses.
//!
//! ## Example Usage
//!
//! ```rust
//! use odata_uri::edm::{EdmEntitySet, EdmEntityType, EdmModel, EdmProperty, FullQualifiedName};
//! use odata_uri::uri::{parse_uri, UriInfoKind, UriResourceKind};
//!
//! let mut model = EdmModel::new();
//! model
//!     .add_entity_type(EdmEntityType {
//!         name: FullQualifiedName::new("Shop", "Product"),
//!         base_type: None,
//!         key: vec!["ID".to_string()],
//!         properties: vec![EdmProperty {
//!             name: "ID".to_string(),
//!             property_type: FullQualifiedName::new("Edm", "String"),
//!             collection: false,
//!         }],
//!         navigation_properties: vec![],
//!     })
//!     .add_entity_set(EdmEntitySet {
//!         name: "Products".to_string(),
//!         entity_type: FullQualifiedName::new("Shop", "Product"),
//!     });
//!
//! let info = parse_uri(&model, "/Products('P1')", "$top=5&@p=1", None).unwrap();
//!
//! assert_eq!(info.kind(), UriInfoKind::Resource);
//! let subject = info.last_resource_part().unwrap();
//! assert_eq!(subject.kind(), UriResourceKind::EntitySet);
//! assert!(!subject.is_collection());
//! assert_eq!(info.top_option().unwrap().text, "5");
//! assert_eq!(info.get_value_for_alias("p"), Some("1"));
//! ```

#![allow(missing_docs)]
#![warn(clippy::all)]

pub mod edm;
pub mod uri;

// Re-export main types for convenience
pub use edm::{
    EdmComplexType, EdmEntitySet, EdmEntityType, EdmModel, EdmNavigationProperty, EdmOperation,
    EdmOperationBinding, EdmOperationImport, EdmOperationKind, EdmProperty, EdmSingleton,
    EdmTypeKind, EdmTypeRef, FullQualifiedName,
};

pub use uri::{
    classify_options, parse_uri, resolve_resource_path, AliasQueryOption, CustomQueryOption,
    KeyPredicate, QueryOptionSet, SystemQueryOption, SystemQueryOptionKind, UriInfo,
    UriInfoBuilder, UriInfoKind, UriParseError, UriResource, UriResourceKind, UriResult,
};

/// Version information
pub const VERSION: &str = env!("CARGO_PKG_VERSION");

/// Get version string
pub fn version() -> &'static str {
    VERSION
}
