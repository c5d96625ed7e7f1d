//! # Schema Index
//!
//! In-memory lookup structures derived from a registered model: per group,
//! a name→template map for O(1) template lookup and the list of required
//! field names. The index is built once per registration (and once per
//! re-hydration from the durable store) and persisted alongside the model so
//! reads never rebuild it.
//!
//! The "seen" flags the validator uses to detect missing required fields are
//! deliberately NOT part of the index: they are request-scoped working
//! state, minted fresh per validation run via [`GroupIndex::seen_flags`].
//! Persisting them, or mutating a shared index in place, would leak one
//! request's observations into the next.

use std::collections::HashMap;

use serde::{Deserialize, Serialize};

use crate::models::{FieldTemplate, Model, ParamGroup};

/// Lookup structures for a single parameter group.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct GroupIndex {
    /// Field name → template.
    templates: HashMap<String, FieldTemplate>,

    /// Names of required fields, in declaration order.
    required: Vec<String>,
}

impl GroupIndex {
    /// Builds the index for one group's templates.
    ///
    /// A name declared twice keeps the last template, consistent with the
    /// upsert semantics of registration.
    pub fn build(templates: &[FieldTemplate]) -> Self {
        let mut index = GroupIndex::default();
        for template in templates {
            if template.required && !index.required.contains(&template.name) {
                index.required.push(template.name.clone());
            }
            index
                .templates
                .insert(template.name.clone(), template.clone());
        }
        index
    }

    /// Looks up a template by field name.
    pub fn template(&self, name: &str) -> Option<&FieldTemplate> {
        self.templates.get(name)
    }

    /// Names of all required fields in this group.
    pub fn required_fields(&self) -> &[String] {
        &self.required
    }

    /// Mints a fresh required-name → seen map, every flag `false`.
    ///
    /// One map per validation run; never shared between runs.
    pub fn seen_flags(&self) -> HashMap<&str, bool> {
        self.required.iter().map(|name| (name.as_str(), false)).collect()
    }

    /// Number of indexed templates.
    pub fn len(&self) -> usize {
        self.templates.len()
    }

    /// True if the group declares no templates.
    pub fn is_empty(&self) -> bool {
        self.templates.is_empty()
    }
}

/// The full index over a model's three parameter groups.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct SchemaIndex {
    query_params: GroupIndex,
    headers: GroupIndex,
    body: GroupIndex,
}

impl SchemaIndex {
    /// Builds the index for every group of the model.
    pub fn build(model: &Model) -> Self {
        SchemaIndex {
            query_params: GroupIndex::build(&model.query_params),
            headers: GroupIndex::build(&model.headers),
            body: GroupIndex::build(&model.body),
        }
    }

    /// The index for one group.
    ///
    /// Every group always exists; a model without templates for a group
    /// simply yields an empty index.
    pub fn group(&self, group: ParamGroup) -> &GroupIndex {
        match group {
            ParamGroup::QueryParams => &self.query_params,
            ParamGroup::Headers => &self.headers,
            ParamGroup::Body => &self.body,
        }
    }
}
