//! Query-option model, classifier and validator
//!
//! Raw `(name, text)` pairs from the query string are bucketed into system
//! options (at most one per kind), parameter aliases (`@name`, last
//! definition wins) and custom options (kept verbatim, duplicates allowed).

use super::{UriParseError, UriResult};
use indexmap::IndexMap;
use std::fmt;

/// Protocol-reserved system query option kinds
///
/// Uniqueness is enforced per kind, not per spelling: `$count` and its
/// legacy synonym `$inlinecount` map to the same kind.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum SystemQueryOptionKind {
    Expand,
    Filter,
    Format,
    Id,
    Count,
    OrderBy,
    Search,
    Select,
    Skip,
    SkipToken,
    Top,
    Levels,
}

impl SystemQueryOptionKind {
    /// Map a raw query-option name to its kind
    pub fn from_name(name: &str) -> Option<Self> {
        match name {
            "$expand" => Some(SystemQueryOptionKind::Expand),
            "$filter" => Some(SystemQueryOptionKind::Filter),
            "$format" => Some(SystemQueryOptionKind::Format),
            "$id" => Some(SystemQueryOptionKind::Id),
            "$count" | "$inlinecount" => Some(SystemQueryOptionKind::Count),
            "$orderby" => Some(SystemQueryOptionKind::OrderBy),
            "$search" => Some(SystemQueryOptionKind::Search),
            "$select" => Some(SystemQueryOptionKind::Select),
            "$skip" => Some(SystemQueryOptionKind::Skip),
            "$skiptoken" => Some(SystemQueryOptionKind::SkipToken),
            "$top" => Some(SystemQueryOptionKind::Top),
            "$levels" => Some(SystemQueryOptionKind::Levels),
            _ => None,
        }
    }

    /// Canonical protocol spelling
    pub fn protocol_name(&self) -> &'static str {
        match self {
            SystemQueryOptionKind::Expand => "$expand",
            SystemQueryOptionKind::Filter => "$filter",
            SystemQueryOptionKind::Format => "$format",
            SystemQueryOptionKind::Id => "$id",
            SystemQueryOptionKind::Count => "$count",
            SystemQueryOptionKind::OrderBy => "$orderby",
            SystemQueryOptionKind::Search => "$search",
            SystemQueryOptionKind::Select => "$select",
            SystemQueryOptionKind::Skip => "$skip",
            SystemQueryOptionKind::SkipToken => "$skiptoken",
            SystemQueryOptionKind::Top => "$top",
            SystemQueryOptionKind::Levels => "$levels",
        }
    }
}

impl fmt::Display for SystemQueryOptionKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.protocol_name())
    }
}

/// A recognized system query option, stored verbatim under its kind
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SystemQueryOption {
    pub kind: SystemQueryOptionKind,
    /// Name as received (may be a synonym spelling)
    pub name: String,
    pub text: String,
}

/// A parameter alias (`@name=value`); `name` excludes the `@` marker
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AliasQueryOption {
    pub name: String,
    pub text: String,
}

/// Any query option that is neither reserved nor an alias
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CustomQueryOption {
    pub name: String,
    pub text: String,
}

/// Validated option buckets produced by [`classify_options`]
#[derive(Debug, Clone, Default, PartialEq)]
pub struct QueryOptionSet {
    /// One entry per kind, in first-seen order
    pub system: IndexMap<SystemQueryOptionKind, SystemQueryOption>,
    /// Insertion order preserved, duplicates allowed
    pub custom: Vec<CustomQueryOption>,
    /// Keyed by alias name; a redefinition replaces the value but keeps the
    /// original position, so the map holds the current distinct names
    pub aliases: IndexMap<String, AliasQueryOption>,
}

/// Classify raw query-string pairs into system/alias/custom buckets and
/// enforce one-instance-per-kind for system options.
pub fn classify_options(pairs: &[(String, String)]) -> UriResult<QueryOptionSet> {
    let mut set = QueryOptionSet::default();

    for (name, text) in pairs {
        if let Some(alias_name) = name.strip_prefix('@') {
            set.aliases.insert(
                alias_name.to_string(),
                AliasQueryOption {
                    name: alias_name.to_string(),
                    text: text.clone(),
                },
            );
        } else if let Some(kind) = SystemQueryOptionKind::from_name(name) {
            if set.system.contains_key(&kind) {
                return Err(UriParseError::DuplicateSystemOption(kind));
            }
            set.system.insert(
                kind,
                SystemQueryOption {
                    kind,
                    name: name.clone(),
                    text: text.clone(),
                },
            );
        } else {
            set.custom.push(CustomQueryOption {
                name: name.clone(),
                text: text.clone(),
            });
        }
    }

    Ok(set)
}
