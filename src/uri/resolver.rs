//! Context-sensitive resource-path resolution
//!
//! Walks the path tokens left to right with a cursor of (current model
//! type, collection-ness). Each token's legal interpretations depend on
//! the type reached by the previous segment: entity sets and singletons at
//! the root, then navigation properties, structural properties, derived-type
//! filters and bound operations. Pure function of (model, tokens); fails
//! fast on the first unresolvable token.

use super::parser::parse_path_token;
use super::segment::{KeyPredicate, UriResource, UriResourceKind};
use super::{UriParseError, UriResult};
use crate::edm::{EdmModel, EdmOperation, EdmOperationKind, EdmTypeKind, FullQualifiedName};
use tracing::trace;

/// Resolve an ordered list of raw path tokens into resource-path segments
pub fn resolve_resource_path(model: &EdmModel, tokens: &[String]) -> UriResult<Vec<UriResource>> {
    let mut parts: Vec<UriResource> = Vec::new();

    for raw in tokens {
        let token = parse_path_token(raw)?;

        let mut segment = match token.name.as_str() {
            "$value" => resolve_value(&parts)?,
            "$count" => resolve_count(&parts)?,
            "$ref" => resolve_ref(&parts)?,
            "$it" => resolve_it(&parts)?,
            name => match parts.last() {
                None => resolve_root(model, name)?,
                Some(last) => resolve_in_context(model, last, name)?,
            },
        };

        if let Some(predicates) = token.keys {
            attach_key_predicates(model, &mut segment, &token.name, predicates)?;
        }

        trace!(
            segment = %segment.segment_value(),
            kind = ?segment.kind(),
            collection = segment.is_collection(),
            "resolved path segment"
        );
        parts.push(segment);
    }

    Ok(parts)
}

/// Root context: entity sets, singletons and operation imports
fn resolve_root(model: &EdmModel, name: &str) -> UriResult<UriResource> {
    if let Some(set) = model.entity_set(name) {
        return Ok(UriResource::EntitySet {
            name: set.name.clone(),
            entity_type: model.type_ref(&set.entity_type),
            keys: None,
        });
    }
    if let Some(singleton) = model.singleton(name) {
        return Ok(UriResource::Singleton {
            name: singleton.name.clone(),
            entity_type: model.type_ref(&singleton.entity_type),
        });
    }
    if let Some(operation) = model.operation_import(name) {
        return Ok(operation_segment(model, operation, name));
    }
    Err(UriParseError::SegmentNotFound(name.to_string()))
}

/// Non-root context: type filters, bound operations, navigation and
/// structural properties against the cursor type.
fn resolve_in_context(
    model: &EdmModel,
    last: &UriResource,
    name: &str,
) -> UriResult<UriResource> {
    let Some(cursor_type) = last.edm_type().cloned() else {
        // $value, $count and $ref terminate the path
        return Err(UriParseError::UnsupportedSegmentSequence(name.to_string()));
    };
    let cursor_collection = last.is_collection();

    if name.contains('.') {
        let fqn = FullQualifiedName::parse(name)
            .ok_or_else(|| UriParseError::Syntax(name.to_string()))?;

        let names_a_type =
            model.entity_type(&fqn).is_some() || model.complex_type(&fqn).is_some();
        if names_a_type && model.is_derived_from(&fqn, &cursor_type.name) {
            // a second cast needs an intervening navigation
            if last.kind() == UriResourceKind::TypeFilter {
                return Err(UriParseError::UnsupportedSegmentSequence(name.to_string()));
            }
            return Ok(UriResource::TypeFilter {
                target_type: model.type_ref(&fqn),
                collection: cursor_collection,
                keys: None,
            });
        }

        if let Some(operation) = model.bound_operation(&fqn, &cursor_type.name, cursor_collection)
        {
            return Ok(operation_segment(model, operation, name));
        }

        return Err(UriParseError::SegmentNotFound(name.to_string()));
    }

    if let Some(navigation) = model.navigation_property(&cursor_type.name, name) {
        if cursor_collection {
            return Err(UriParseError::UnsupportedSegmentSequence(name.to_string()));
        }
        return Ok(UriResource::NavigationProperty {
            name: navigation.name.clone(),
            target_type: model.type_ref(&navigation.target_type),
            collection: navigation.collection,
            keys: None,
        });
    }

    if let Some(property) = model.structural_property(&cursor_type.name, name) {
        if cursor_collection {
            return Err(UriParseError::UnsupportedSegmentSequence(name.to_string()));
        }
        let type_ref = model.type_ref(&property.property_type);
        return Ok(if model.complex_type(&property.property_type).is_some() {
            UriResource::ComplexProperty {
                name: property.name.clone(),
                complex_type: type_ref,
                collection: property.collection,
            }
        } else {
            UriResource::PrimitiveProperty {
                name: property.name.clone(),
                property_type: type_ref,
                collection: property.collection,
            }
        });
    }

    Err(UriParseError::SegmentNotFound(name.to_string()))
}

fn operation_segment(model: &EdmModel, operation: &EdmOperation, name: &str) -> UriResource {
    let return_type = operation.return_type.as_ref().map(|t| model.type_ref(t));
    match operation.kind {
        EdmOperationKind::Action => UriResource::Action {
            name: name.to_string(),
            return_type,
            collection: operation.return_collection,
        },
        EdmOperationKind::Function => UriResource::Function {
            name: name.to_string(),
            return_type,
            collection: operation.return_collection,
            keys: None,
        },
    }
}

/// `$value`: only directly after a single-valued primitive property
fn resolve_value(parts: &[UriResource]) -> UriResult<UriResource> {
    let legal = parts.last().is_some_and(|last| {
        last.kind() == UriResourceKind::PrimitiveProperty && !last.is_collection()
    });
    if !legal {
        return Err(UriParseError::UnsupportedSegmentSequence("$value".to_string()));
    }
    Ok(UriResource::Value)
}

/// `$count`: only after a collection-valued, model-typed segment. The
/// type check keeps it off pseudo-segments like a collection `$ref`.
fn resolve_count(parts: &[UriResource]) -> UriResult<UriResource> {
    let legal = parts
        .last()
        .is_some_and(|last| last.edm_type().is_some() && last.is_collection());
    if !legal {
        return Err(UriParseError::UnsupportedSegmentSequence("$count".to_string()));
    }
    Ok(UriResource::Count)
}

/// `$ref`: only after an entity-typed segment
fn resolve_ref(parts: &[UriResource]) -> UriResult<UriResource> {
    let Some(last) = parts.last().filter(|l| l.is_entity_typed()) else {
        return Err(UriParseError::UnsupportedSegmentSequence("$ref".to_string()));
    };
    Ok(UriResource::Ref {
        collection: last.is_collection(),
    })
}

/// `$it`: lambda-style reference to the current instance
fn resolve_it(parts: &[UriResource]) -> UriResult<UriResource> {
    let var_type = parts
        .last()
        .and_then(|last| last.edm_type().cloned())
        .ok_or_else(|| UriParseError::UnsupportedSegmentSequence("$it".to_string()))?;
    let collection = parts.last().is_some_and(UriResource::is_collection);
    Ok(UriResource::LambdaVariable {
        name: "$it".to_string(),
        var_type,
        collection,
    })
}

/// Attach parsed key text to the just-emitted segment, validating entity
/// keys against the target type's key property names.
fn attach_key_predicates(
    model: &EdmModel,
    segment: &mut UriResource,
    token_name: &str,
    predicates: Vec<KeyPredicate>,
) -> UriResult<()> {
    if !segment.supports_keys() {
        return Err(UriParseError::InvalidKeyPredicate {
            segment: token_name.to_string(),
            reason: "segment does not support key predicates".to_string(),
        });
    }

    // function parameters share the key-predicate shape but are opaque here
    if segment.kind() != UriResourceKind::Function {
        if let Some(entity_type) = segment.edm_type().filter(|t| t.kind == EdmTypeKind::Entity) {
            validate_entity_keys(
                &model.key_property_names(&entity_type.name),
                token_name,
                &predicates,
            )?;
        }
    }

    segment.attach_keys(predicates);
    Ok(())
}

fn validate_entity_keys(
    key_names: &[String],
    token_name: &str,
    predicates: &[KeyPredicate],
) -> UriResult<()> {
    let invalid = |reason: String| UriParseError::InvalidKeyPredicate {
        segment: token_name.to_string(),
        reason,
    };

    // single-key shorthand: one positional value
    if predicates.len() == 1 && predicates[0].name.is_none() {
        if key_names.len() == 1 {
            return Ok(());
        }
        return Err(invalid(format!(
            "positional key value given but entity type has {} key properties",
            key_names.len()
        )));
    }

    let mut seen: Vec<&str> = Vec::new();
    for predicate in predicates {
        let Some(name) = predicate.name.as_deref() else {
            return Err(invalid("mixed positional and named key values".to_string()));
        };
        if seen.contains(&name) {
            return Err(invalid(format!("duplicate key property '{name}'")));
        }
        if !key_names.iter().any(|k| k == name) {
            return Err(invalid(format!("'{name}' is not a key property")));
        }
        seen.push(name);
    }

    if seen.len() != key_names.len() {
        let missing: Vec<&str> = key_names
            .iter()
            .map(String::as_str)
            .filter(|k| !seen.contains(k))
            .collect();
        return Err(invalid(format!(
            "missing key properties: {}",
            missing.join(", ")
        )));
    }

    Ok(())
}
