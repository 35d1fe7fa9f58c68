//! Relation — a traversal result joining an edge with its live endpoint.

use serde::{Deserialize, Serialize};

use super::{Entity, EntityId, PropertyMap};

/// Which way an edge was crossed relative to the traversal origin.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Direction {
    Outgoing,
    Incoming,
}

/// One hop of a traversal: the entity on the far end of an edge, plus the
/// edge's type, direction, weight, and properties.
///
/// Only produced for edges whose far endpoint exists in the entity store —
/// dangling edges never surface here.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Relation {
    /// The entity on the far end of the edge.
    pub entity: Entity,
    pub entity_id: EntityId,
    /// The edge's type label.
    pub relationship: String,
    pub direction: Direction,
    pub weight: f64,
    pub properties: PropertyMap,
    /// Hops from the traversal origin. 1 for direct relations.
    pub depth: usize,
}
