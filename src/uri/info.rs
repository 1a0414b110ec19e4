//! Request descriptor assembled from resolved segments and query options
//!
//! One `UriInfo` is built per request by a single validating build step and
//! is immutable afterwards. Kind-specific accessor groups are exposed as
//! checked narrowings (`as_resource()`, `as_crossjoin()`, ...) returning
//! `None` on a kind mismatch instead of panicking casts.

use super::options::{
    classify_options, AliasQueryOption, CustomQueryOption, SystemQueryOption,
    SystemQueryOptionKind,
};
use super::segment::UriResource;
use super::UriResult;
use crate::edm::EdmTypeRef;
use indexmap::IndexMap;

/// Overall kind of the request the URI describes
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum UriInfoKind {
    Service,
    Metadata,
    Resource,
    Batch,
    CrossJoin,
    EntityId,
}

/// Validated, immutable request descriptor
#[derive(Debug, Clone, PartialEq)]
pub struct UriInfo {
    kind: UriInfoKind,
    resource_parts: Vec<UriResource>,
    system_options: IndexMap<SystemQueryOptionKind, SystemQueryOption>,
    custom_options: Vec<CustomQueryOption>,
    aliases: IndexMap<String, AliasQueryOption>,
    entity_type_cast: Option<EdmTypeRef>,
    fragment: Option<String>,
    entity_set_names: Vec<String>,
}

/// Single validating construction step for [`UriInfo`]
///
/// Query options are collected raw and classified once at `build()`, so a
/// duplicate system option surfaces as a construction-time error.
#[derive(Debug, Clone)]
pub struct UriInfoBuilder {
    kind: UriInfoKind,
    resource_parts: Vec<UriResource>,
    query_pairs: Vec<(String, String)>,
    entity_type_cast: Option<EdmTypeRef>,
    fragment: Option<String>,
    entity_set_names: Vec<String>,
}

impl UriInfoBuilder {
    pub fn new(kind: UriInfoKind) -> Self {
        UriInfoBuilder {
            kind,
            resource_parts: Vec::new(),
            query_pairs: Vec::new(),
            entity_type_cast: None,
            fragment: None,
            entity_set_names: Vec::new(),
        }
    }

    /// Append a resolved path segment (insertion order = path order)
    pub fn resource_part(mut self, part: UriResource) -> Self {
        self.resource_parts.push(part);
        self
    }

    pub fn resource_parts(mut self, parts: Vec<UriResource>) -> Self {
        self.resource_parts.extend(parts);
        self
    }

    /// Append one raw query-string pair
    pub fn query_option(mut self, name: impl Into<String>, text: impl Into<String>) -> Self {
        self.query_pairs.push((name.into(), text.into()));
        self
    }

    pub fn query_options(mut self, pairs: Vec<(String, String)>) -> Self {
        self.query_pairs.extend(pairs);
        self
    }

    pub fn entity_set_name(mut self, name: impl Into<String>) -> Self {
        self.entity_set_names.push(name.into());
        self
    }

    pub fn entity_type_cast(mut self, type_ref: EdmTypeRef) -> Self {
        self.entity_type_cast = Some(type_ref);
        self
    }

    pub fn fragment(mut self, fragment: impl Into<String>) -> Self {
        self.fragment = Some(fragment.into());
        self
    }

    /// Classify and validate the collected options and produce the
    /// immutable descriptor.
    pub fn build(self) -> UriResult<UriInfo> {
        let options = classify_options(&self.query_pairs)?;
        Ok(UriInfo {
            kind: self.kind,
            resource_parts: self.resource_parts,
            system_options: options.system,
            custom_options: options.custom,
            aliases: options.aliases,
            entity_type_cast: self.entity_type_cast,
            fragment: self.fragment,
            entity_set_names: self.entity_set_names,
        })
    }
}

impl UriInfo {
    pub fn kind(&self) -> UriInfoKind {
        self.kind
    }

    /// Resolved path segments in path order
    pub fn resource_parts(&self) -> &[UriResource] {
        &self.resource_parts
    }

    /// The final path segment: the "subject" of the request
    pub fn last_resource_part(&self) -> Option<&UriResource> {
        self.resource_parts.last()
    }

    /// All stored system options, one per kind, in first-seen order
    pub fn system_query_options(&self) -> Vec<&SystemQueryOption> {
        self.system_options.values().collect()
    }

    fn system_option(&self, kind: SystemQueryOptionKind) -> Option<&SystemQueryOption> {
        self.system_options.get(&kind)
    }

    pub fn expand_option(&self) -> Option<&SystemQueryOption> {
        self.system_option(SystemQueryOptionKind::Expand)
    }

    pub fn filter_option(&self) -> Option<&SystemQueryOption> {
        self.system_option(SystemQueryOptionKind::Filter)
    }

    pub fn format_option(&self) -> Option<&SystemQueryOption> {
        self.system_option(SystemQueryOptionKind::Format)
    }

    pub fn id_option(&self) -> Option<&SystemQueryOption> {
        self.system_option(SystemQueryOptionKind::Id)
    }

    pub fn count_option(&self) -> Option<&SystemQueryOption> {
        self.system_option(SystemQueryOptionKind::Count)
    }

    pub fn order_by_option(&self) -> Option<&SystemQueryOption> {
        self.system_option(SystemQueryOptionKind::OrderBy)
    }

    pub fn search_option(&self) -> Option<&SystemQueryOption> {
        self.system_option(SystemQueryOptionKind::Search)
    }

    pub fn select_option(&self) -> Option<&SystemQueryOption> {
        self.system_option(SystemQueryOptionKind::Select)
    }

    pub fn skip_option(&self) -> Option<&SystemQueryOption> {
        self.system_option(SystemQueryOptionKind::Skip)
    }

    pub fn skip_token_option(&self) -> Option<&SystemQueryOption> {
        self.system_option(SystemQueryOptionKind::SkipToken)
    }

    pub fn top_option(&self) -> Option<&SystemQueryOption> {
        self.system_option(SystemQueryOptionKind::Top)
    }

    pub fn levels_option(&self) -> Option<&SystemQueryOption> {
        self.system_option(SystemQueryOptionKind::Levels)
    }

    /// Custom options in input order, duplicates preserved
    pub fn custom_query_options(&self) -> &[CustomQueryOption] {
        &self.custom_options
    }

    /// Current set of distinct aliases, in first-definition order
    pub fn aliases(&self) -> Vec<&AliasQueryOption> {
        self.aliases.values().collect()
    }

    /// Substitution text for `@name` references; reflects the last
    /// definition of the alias.
    pub fn get_value_for_alias(&self, name: &str) -> Option<&str> {
        self.aliases.get(name).map(|a| a.text.as_str())
    }

    /// Top-level entity-type cast of an entity-id request
    pub fn entity_type_cast(&self) -> Option<&EdmTypeRef> {
        self.entity_type_cast.as_ref()
    }

    pub fn fragment(&self) -> Option<&str> {
        self.fragment.as_deref()
    }

    /// Entity-set names of a cross-join request, in path order
    pub fn entity_set_names(&self) -> &[String] {
        &self.entity_set_names
    }

    pub fn as_service(&self) -> Option<ServiceView<'_>> {
        (self.kind == UriInfoKind::Service).then_some(ServiceView { info: self })
    }

    pub fn as_metadata(&self) -> Option<MetadataView<'_>> {
        (self.kind == UriInfoKind::Metadata).then_some(MetadataView { info: self })
    }

    pub fn as_resource(&self) -> Option<ResourceView<'_>> {
        (self.kind == UriInfoKind::Resource).then_some(ResourceView { info: self })
    }

    pub fn as_batch(&self) -> Option<BatchView<'_>> {
        (self.kind == UriInfoKind::Batch).then_some(BatchView { info: self })
    }

    pub fn as_crossjoin(&self) -> Option<CrossJoinView<'_>> {
        (self.kind == UriInfoKind::CrossJoin).then_some(CrossJoinView { info: self })
    }

    pub fn as_entity_id(&self) -> Option<EntityIdView<'_>> {
        (self.kind == UriInfoKind::EntityId).then_some(EntityIdView { info: self })
    }
}

/// Service-document request view
#[derive(Debug, Clone, Copy)]
pub struct ServiceView<'a> {
    info: &'a UriInfo,
}

impl ServiceView<'_> {
    pub fn format_option(&self) -> Option<&SystemQueryOption> {
        self.info.format_option()
    }
}

/// Metadata-document request view
#[derive(Debug, Clone, Copy)]
pub struct MetadataView<'a> {
    info: &'a UriInfo,
}

impl MetadataView<'_> {
    pub fn format_option(&self) -> Option<&SystemQueryOption> {
        self.info.format_option()
    }

    pub fn fragment(&self) -> Option<&str> {
        self.info.fragment()
    }
}

/// Plain resource request view: the full path and option surface
#[derive(Debug, Clone, Copy)]
pub struct ResourceView<'a> {
    info: &'a UriInfo,
}

impl<'a> ResourceView<'a> {
    pub fn resource_parts(&self) -> &'a [UriResource] {
        self.info.resource_parts()
    }

    pub fn last_resource_part(&self) -> Option<&'a UriResource> {
        self.info.last_resource_part()
    }

    pub fn filter_option(&self) -> Option<&'a SystemQueryOption> {
        self.info.filter_option()
    }

    pub fn select_option(&self) -> Option<&'a SystemQueryOption> {
        self.info.select_option()
    }

    pub fn expand_option(&self) -> Option<&'a SystemQueryOption> {
        self.info.expand_option()
    }

    pub fn order_by_option(&self) -> Option<&'a SystemQueryOption> {
        self.info.order_by_option()
    }

    pub fn top_option(&self) -> Option<&'a SystemQueryOption> {
        self.info.top_option()
    }

    pub fn skip_option(&self) -> Option<&'a SystemQueryOption> {
        self.info.skip_option()
    }

    pub fn skip_token_option(&self) -> Option<&'a SystemQueryOption> {
        self.info.skip_token_option()
    }

    pub fn search_option(&self) -> Option<&'a SystemQueryOption> {
        self.info.search_option()
    }

    pub fn count_option(&self) -> Option<&'a SystemQueryOption> {
        self.info.count_option()
    }

    pub fn format_option(&self) -> Option<&'a SystemQueryOption> {
        self.info.format_option()
    }

    pub fn levels_option(&self) -> Option<&'a SystemQueryOption> {
        self.info.levels_option()
    }
}

/// Batch request view; the batch body is handled downstream
#[derive(Debug, Clone, Copy)]
pub struct BatchView<'a> {
    info: &'a UriInfo,
}

impl BatchView<'_> {
    pub fn kind(&self) -> UriInfoKind {
        self.info.kind()
    }
}

/// Cross-join request view
#[derive(Debug, Clone, Copy)]
pub struct CrossJoinView<'a> {
    info: &'a UriInfo,
}

impl<'a> CrossJoinView<'a> {
    pub fn entity_set_names(&self) -> &'a [String] {
        self.info.entity_set_names()
    }

    pub fn filter_option(&self) -> Option<&'a SystemQueryOption> {
        self.info.filter_option()
    }

    pub fn order_by_option(&self) -> Option<&'a SystemQueryOption> {
        self.info.order_by_option()
    }

    pub fn top_option(&self) -> Option<&'a SystemQueryOption> {
        self.info.top_option()
    }

    pub fn skip_option(&self) -> Option<&'a SystemQueryOption> {
        self.info.skip_option()
    }

    pub fn count_option(&self) -> Option<&'a SystemQueryOption> {
        self.info.count_option()
    }

    pub fn format_option(&self) -> Option<&'a SystemQueryOption> {
        self.info.format_option()
    }
}

/// Entity-by-id request view
#[derive(Debug, Clone, Copy)]
pub struct EntityIdView<'a> {
    info: &'a UriInfo,
}

impl<'a> EntityIdView<'a> {
    /// The mandatory `$id` option naming the entity
    pub fn id_option(&self) -> Option<&'a SystemQueryOption> {
        self.info.id_option()
    }

    pub fn entity_type_cast(&self) -> Option<&'a EdmTypeRef> {
        self.info.entity_type_cast()
    }

    pub fn select_option(&self) -> Option<&'a SystemQueryOption> {
        self.info.select_option()
    }

    pub fn expand_option(&self) -> Option<&'a SystemQueryOption> {
        self.info.expand_option()
    }

    pub fn format_option(&self) -> Option<&'a SystemQueryOption> {
        self.info.format_option()
    }
}
