//! Request-URI parsing and semantic resolution
//!
//! Converts the raw request URI (path, query string, fragment) plus the
//! entity data model into a validated [`UriInfo`] descriptor:
//!
//! raw text -> lexer (split + decode) -> kind dispatch -> segment resolver
//! -> option classifier -> descriptor assembly
//!
//! Parsing is synchronous and per-request; the model is only read. Every
//! error aborts the whole request, no partial descriptor is ever returned.

pub mod info;
pub mod options;
pub mod resolver;
pub mod segment;

mod lexer;
mod parser;

// Re-export main types
pub use info::{
    BatchView, CrossJoinView, EntityIdView, MetadataView, ResourceView, ServiceView, UriInfo,
    UriInfoBuilder, UriInfoKind,
};
pub use options::{
    classify_options, AliasQueryOption, CustomQueryOption, QueryOptionSet, SystemQueryOption,
    SystemQueryOptionKind,
};
pub use resolver::resolve_resource_path;
pub use segment::{KeyPredicate, UriResource, UriResourceKind};

use crate::edm::{EdmModel, FullQualifiedName};
use thiserror::Error;
use tracing::debug;

/// URI parsing and resolution errors
///
/// All request-scoped and non-retriable; the caller maps them to
/// protocol-level client error responses.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum UriParseError {
    /// A path token does not resolve against the current context type or
    /// the service root
    #[error("Resource segment '{0}' not found")]
    SegmentNotFound(String),

    /// Malformed key text, keys on a keyless segment, or a key set that
    /// does not match the target entity type
    #[error("Invalid key predicate on segment '{segment}': {reason}")]
    InvalidKeyPredicate { segment: String, reason: String },

    /// A system query option kind supplied more than once
    #[error("System query option '{0}' specified more than once")]
    DuplicateSystemOption(SystemQueryOptionKind),

    /// A structurally valid segment in an illegal position
    #[error("Segment '{0}' is not allowed at this position")]
    UnsupportedSegmentSequence(String),

    /// Raw text the grammar rejects
    #[error("Syntax error in request URI part '{0}'")]
    Syntax(String),
}

pub type UriResult<T> = Result<T, UriParseError>;

/// Parse a request URI into a validated [`UriInfo`] descriptor.
///
/// `path` and `query` are the raw (still percent-encoded) URI parts
/// relative to the service root; `fragment` is passed through untouched.
pub fn parse_uri(
    model: &EdmModel,
    path: &str,
    query: &str,
    fragment: Option<&str>,
) -> UriResult<UriInfo> {
    let tokens = lexer::split_path(path)?;
    let pairs = lexer::split_query(query)?;
    debug!(path, segments = tokens.len(), options = pairs.len(), "parsing request uri");

    let mut builder = match tokens.first().map(String::as_str) {
        None => UriInfoBuilder::new(UriInfoKind::Service),
        Some("$metadata") => {
            reject_trailing_segments(&tokens)?;
            UriInfoBuilder::new(UriInfoKind::Metadata)
        }
        Some("$batch") => {
            reject_trailing_segments(&tokens)?;
            UriInfoBuilder::new(UriInfoKind::Batch)
        }
        Some(token) if token.starts_with("$crossjoin") => {
            reject_trailing_segments(&tokens)?;
            crossjoin_builder(model, token)?
        }
        Some("$entity") => entity_id_builder(model, &tokens)?,
        Some(_) => {
            let parts = resolver::resolve_resource_path(model, &tokens)?;
            UriInfoBuilder::new(UriInfoKind::Resource).resource_parts(parts)
        }
    };

    builder = builder.query_options(pairs);
    if let Some(fragment) = fragment {
        builder = builder.fragment(fragment);
    }
    let info = builder.build()?;

    if info.kind() == UriInfoKind::EntityId && info.id_option().is_none() {
        return Err(UriParseError::Syntax(
            "$entity request without the $id system query option".to_string(),
        ));
    }

    debug!(kind = ?info.kind(), "request uri parsed");
    Ok(info)
}

fn reject_trailing_segments(tokens: &[String]) -> UriResult<()> {
    match tokens.get(1) {
        Some(extra) => Err(UriParseError::UnsupportedSegmentSequence(extra.clone())),
        None => Ok(()),
    }
}

fn crossjoin_builder(model: &EdmModel, token: &str) -> UriResult<UriInfoBuilder> {
    let mut builder = UriInfoBuilder::new(UriInfoKind::CrossJoin);
    for name in parser::parse_crossjoin(token)? {
        if model.entity_set(&name).is_none() {
            return Err(UriParseError::SegmentNotFound(name));
        }
        builder = builder.entity_set_name(name);
    }
    Ok(builder)
}

/// `$entity` with an optional qualified-type-name segment narrowing the
/// referenced entity (`/$entity/Shop.DiscontinuedProduct?$id=...`).
fn entity_id_builder(model: &EdmModel, tokens: &[String]) -> UriResult<UriInfoBuilder> {
    let mut builder = UriInfoBuilder::new(UriInfoKind::EntityId);
    match tokens.len() {
        1 => {}
        2 => {
            let cast = &tokens[1];
            let fqn = FullQualifiedName::parse(cast)
                .ok_or_else(|| UriParseError::Syntax(cast.clone()))?;
            if model.entity_type(&fqn).is_none() {
                return Err(UriParseError::SegmentNotFound(cast.clone()));
            }
            builder = builder.entity_type_cast(model.type_ref(&fqn));
        }
        _ => {
            return Err(UriParseError::UnsupportedSegmentSequence(tokens[2].clone()));
        }
    }
    Ok(builder)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::edm::{EdmEntitySet, EdmEntityType, EdmProperty};

    fn model() -> EdmModel {
        let mut model = EdmModel::new();
        model
            .add_entity_type(EdmEntityType {
                name: FullQualifiedName::new("Shop", "Product"),
                base_type: None,
                key: vec!["ID".to_string()],
                properties: vec![EdmProperty {
                    name: "ID".to_string(),
                    property_type: FullQualifiedName::new("Edm", "String"),
                    collection: false,
                }],
                navigation_properties: vec![],
            })
            .add_entity_set(EdmEntitySet {
                name: "Products".to_string(),
                entity_type: FullQualifiedName::new("Shop", "Product"),
            })
            .add_entity_set(EdmEntitySet {
                name: "Orders".to_string(),
                entity_type: FullQualifiedName::new("Shop", "Product"),
            });
        model
    }

    #[test]
    fn test_service_document_request() {
        let info = parse_uri(&model(), "/", "", None).unwrap();
        assert_eq!(info.kind(), UriInfoKind::Service);
        assert!(info.as_service().is_some());
        assert!(info.last_resource_part().is_none());
    }

    #[test]
    fn test_metadata_request() {
        let info = parse_uri(&model(), "/$metadata", "$format=xml", None).unwrap();
        assert_eq!(info.kind(), UriInfoKind::Metadata);
        assert_eq!(info.as_metadata().unwrap().format_option().unwrap().text, "xml");

        let err = parse_uri(&model(), "/$metadata/extra", "", None).unwrap_err();
        assert_eq!(
            err,
            UriParseError::UnsupportedSegmentSequence("extra".to_string())
        );
    }

    #[test]
    fn test_batch_request() {
        let info = parse_uri(&model(), "/$batch", "", None).unwrap();
        assert_eq!(info.kind(), UriInfoKind::Batch);
        assert!(info.as_batch().is_some());
    }

    #[test]
    fn test_crossjoin_request() {
        let info = parse_uri(&model(), "/$crossjoin(Products,Orders)", "", None).unwrap();
        assert_eq!(info.kind(), UriInfoKind::CrossJoin);
        assert_eq!(info.entity_set_names(), ["Products", "Orders"]);

        let err = parse_uri(&model(), "/$crossjoin(Products,Missing)", "", None).unwrap_err();
        assert_eq!(err, UriParseError::SegmentNotFound("Missing".to_string()));
    }

    #[test]
    fn test_entity_id_request() {
        let info = parse_uri(&model(), "/$entity", "$id=Products('P1')", None).unwrap();
        assert_eq!(info.kind(), UriInfoKind::EntityId);
        assert_eq!(
            info.as_entity_id().unwrap().id_option().unwrap().text,
            "Products('P1')"
        );

        let err = parse_uri(&model(), "/$entity", "", None).unwrap_err();
        assert!(matches!(err, UriParseError::Syntax(_)));
    }

    #[test]
    fn test_entity_id_with_type_cast() {
        let info = parse_uri(
            &model(),
            "/$entity/Shop.Product",
            "$id=Products('P1')",
            None,
        )
        .unwrap();
        assert_eq!(
            info.entity_type_cast().unwrap().name,
            FullQualifiedName::new("Shop", "Product")
        );

        let err =
            parse_uri(&model(), "/$entity/Shop.Unknown", "$id=Products('P1')", None).unwrap_err();
        assert_eq!(err, UriParseError::SegmentNotFound("Shop.Unknown".to_string()));
    }

    #[test]
    fn test_resource_request() {
        let info = parse_uri(&model(), "/Products('P1')", "$top=5", Some("F")).unwrap();
        assert_eq!(info.kind(), UriInfoKind::Resource);
        assert_eq!(info.fragment(), Some("F"));
        let view = info.as_resource().unwrap();
        assert_eq!(view.top_option().unwrap().text, "5");
        assert_eq!(
            view.last_resource_part().unwrap().segment_value(),
            "Products"
        );
    }
}
