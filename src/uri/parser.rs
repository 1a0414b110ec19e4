//! Path-token parser using Pest
//!
//! Turns one decoded path segment into its name and optional key-predicate
//! pairs. Semantic resolution against the model happens afterwards in the
//! resolver; this layer is purely syntactic.

use super::segment::KeyPredicate;
use super::{UriParseError, UriResult};
use pest::Parser;
use pest_derive::Parser;

#[derive(Parser)]
#[grammar = "uri/odata.pest"]
struct PathTokenParser;

/// Syntactic form of one path segment: `Products('P1')` becomes
/// `name = "Products"`, `keys = Some([("", "P1")])`.
#[derive(Debug, Clone, PartialEq)]
pub(crate) struct PathToken {
    pub name: String,
    pub keys: Option<Vec<KeyPredicate>>,
}

/// Parse a decoded path segment into a [`PathToken`]
pub(crate) fn parse_path_token(raw: &str) -> UriResult<PathToken> {
    let pairs =
        PathTokenParser::parse(Rule::path_segment, raw).map_err(|_| syntax_error(raw))?;

    let mut name = String::new();
    let mut keys = None;

    for segment in pairs {
        for inner in segment.into_inner() {
            match inner.as_rule() {
                Rule::segment_name => name = inner.as_str().to_string(),
                Rule::key_predicate => keys = Some(parse_key_predicate(inner)),
                Rule::EOI => break,
                _ => {}
            }
        }
    }

    Ok(PathToken { name, keys })
}

/// Parse a `$crossjoin(Set1,Set2,...)` token into its entity-set names
pub(crate) fn parse_crossjoin(raw: &str) -> UriResult<Vec<String>> {
    let pairs = PathTokenParser::parse(Rule::crossjoin_list, raw)
        .map_err(|_| UriParseError::Syntax(raw.to_string()))?;

    Ok(pairs
        .flat_map(|list| list.into_inner())
        .filter(|p| p.as_rule() == Rule::identifier)
        .map(|p| p.as_str().to_string())
        .collect())
}

fn parse_key_predicate(pair: pest::iterators::Pair<Rule>) -> Vec<KeyPredicate> {
    let mut predicates = Vec::new();

    for list in pair.into_inner() {
        if list.as_rule() != Rule::key_list {
            continue;
        }
        for entry in list.into_inner() {
            match entry.as_rule() {
                // single-key shorthand: Products('P1')
                Rule::key_value => {
                    predicates.push(KeyPredicate::unnamed(unquote(entry.as_str())));
                }
                Rule::named_keys => {
                    for named in entry.into_inner() {
                        if named.as_rule() != Rule::named_key {
                            continue;
                        }
                        let mut name = String::new();
                        let mut value = String::new();
                        for part in named.into_inner() {
                            match part.as_rule() {
                                Rule::identifier => name = part.as_str().to_string(),
                                Rule::key_value => value = unquote(part.as_str()),
                                _ => {}
                            }
                        }
                        predicates.push(KeyPredicate::named(name, value));
                    }
                }
                _ => {}
            }
        }
    }

    predicates
}

/// Strip OData string-literal quoting; non-string literals pass through
fn unquote(literal: &str) -> String {
    if literal.len() >= 2 && literal.starts_with('\'') && literal.ends_with('\'') {
        literal[1..literal.len() - 1].replace("''", "'")
    } else {
        literal.to_string()
    }
}

/// Malformed key text is a key-predicate error; everything else is a plain
/// syntax error.
fn syntax_error(raw: &str) -> UriParseError {
    match raw.split_once('(') {
        Some((name, _)) => UriParseError::InvalidKeyPredicate {
            segment: name.to_string(),
            reason: "malformed key predicate text".to_string(),
        },
        None => UriParseError::Syntax(raw.to_string()),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_plain_segment() {
        let token = parse_path_token("Products").unwrap();
        assert_eq!(token.name, "Products");
        assert!(token.keys.is_none());
    }

    #[test]
    fn test_single_key_shorthand() {
        let token = parse_path_token("Products('P1')").unwrap();
        assert_eq!(token.name, "Products");
        assert_eq!(
            token.keys.unwrap(),
            vec![KeyPredicate::unnamed("P1")]
        );
    }

    #[test]
    fn test_named_compound_keys() {
        let token = parse_path_token("OrderLines(OrderID=1,LineNo=2)").unwrap();
        assert_eq!(
            token.keys.unwrap(),
            vec![
                KeyPredicate::named("OrderID", "1"),
                KeyPredicate::named("LineNo", "2"),
            ]
        );
    }

    #[test]
    fn test_qualified_name_segment() {
        let token = parse_path_token("Shop.DiscontinuedProduct").unwrap();
        assert_eq!(token.name, "Shop.DiscontinuedProduct");
    }

    #[test]
    fn test_special_segment() {
        let token = parse_path_token("$count").unwrap();
        assert_eq!(token.name, "$count");
    }

    #[test]
    fn test_quote_escaping() {
        let token = parse_path_token("Products('O''Brien')").unwrap();
        assert_eq!(token.keys.unwrap()[0].value, "O'Brien");
    }

    #[test]
    fn test_empty_parens() {
        let token = parse_path_token("TopProducts()").unwrap();
        assert_eq!(token.keys, Some(vec![]));
    }

    #[test]
    fn test_malformed_keys_reported_as_key_error() {
        let err = parse_path_token("Products('P1'").unwrap_err();
        assert!(matches!(
            err,
            UriParseError::InvalidKeyPredicate { ref segment, .. } if segment == "Products"
        ));
    }

    #[test]
    fn test_malformed_name_is_syntax_error() {
        let err = parse_path_token("1Products").unwrap_err();
        assert_eq!(err, UriParseError::Syntax("1Products".to_string()));
    }

    #[test]
    fn test_crossjoin_list() {
        let sets = parse_crossjoin("$crossjoin(Products,Orders)").unwrap();
        assert_eq!(sets, vec!["Products".to_string(), "Orders".to_string()]);

        assert!(parse_crossjoin("$crossjoin()").is_err());
    }
}
