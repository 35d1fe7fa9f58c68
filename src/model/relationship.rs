//! Relationship (edge) in the knowledge graph.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use super::{EntityId, PropertyMap, Value};

/// A directed, typed, weighted edge between two entity ids.
///
/// Relationships are append-only and immutable. Endpoints are soft
/// references: neither `source` nor `target` is required to exist in the
/// entity store, and multiple edges between the same ordered pair with the
/// same type are permitted (multigraph).
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Relationship {
    pub source: EntityId,
    pub target: EntityId,
    pub rel_type: String,
    pub properties: PropertyMap,
    pub weight: f64,
    pub created_at: DateTime<Utc>,
}

impl Relationship {
    pub fn new(
        source: impl Into<EntityId>,
        target: impl Into<EntityId>,
        rel_type: impl Into<String>,
    ) -> Self {
        Self {
            source: source.into(),
            target: target.into(),
            rel_type: rel_type.into(),
            properties: PropertyMap::new(),
            weight: 1.0,
            created_at: Utc::now(),
        }
    }

    pub fn with_weight(mut self, weight: f64) -> Self {
        self.weight = weight;
        self
    }

    pub fn with_property(mut self, key: impl Into<String>, value: impl Into<Value>) -> Self {
        self.properties.insert(key.into(), value.into());
        self
    }

    /// The "other" end of the edge from the given entity.
    pub fn other_end(&self, from: &str) -> Option<&EntityId> {
        if self.source.as_str() == from { Some(&self.target) }
        else if self.target.as_str() == from { Some(&self.source) }
        else { None }
    }
}
