//! Snapshot export — a full dump of entities, relationships, and counts.
//!
//! Intended for diagnostics and visualization, not a stable persisted
//! format. The graph itself is rebuilt from the Profile Store, never
//! reloaded from an export.

use chrono::{DateTime, Utc};
use hashbrown::HashMap;
use serde::{Deserialize, Serialize};

use crate::graph::KnowledgeGraph;
use crate::model::{Entity, EntityId, Relationship};

/// Aggregate counts taken at export time.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct GraphStats {
    pub total_entities: usize,
    pub total_relationships: usize,
    /// Live entity count per kind label.
    pub entity_kinds: HashMap<String, usize>,
    pub created_at: DateTime<Utc>,
}

/// A full graph dump.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct GraphExport {
    pub entities: HashMap<EntityId, Entity>,
    pub relationships: Vec<Relationship>,
    pub stats: GraphStats,
}

impl GraphExport {
    pub fn to_json(&self) -> serde_json::Result<String> {
        serde_json::to_string_pretty(self)
    }
}

impl KnowledgeGraph {
    /// Dump the whole graph. Taken under one read guard, so the entities,
    /// relationships, and stats are mutually consistent.
    pub fn export(&self) -> GraphExport {
        let g = self.read();
        let stats = GraphStats {
            total_entities: g.entities.len(),
            total_relationships: g.relationships.len(),
            entity_kinds: g
                .kind_index
                .keys()
                .map(|kind| (kind.as_str().to_owned(), g.live_ids_of_kind(kind).count()))
                .collect(),
            created_at: Utc::now(),
        };
        GraphExport {
            entities: g.entities.clone(),
            relationships: g.relationships.clone(),
            stats,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::{EntityKind, PropertyMap};

    #[test]
    fn test_export_counts() {
        let graph = KnowledgeGraph::new();
        graph.add_entity("s1", EntityKind::Startup, PropertyMap::new());
        graph.add_entity("f1", EntityKind::Founder, PropertyMap::new());
        graph.add_relationship("s1", "f1", "founded_by", None, 1.0);

        let dump = graph.export();
        assert_eq!(dump.stats.total_entities, 2);
        assert_eq!(dump.stats.total_relationships, 1);
        assert_eq!(dump.stats.entity_kinds.get("startup"), Some(&1));
        assert_eq!(dump.stats.entity_kinds.get("founder"), Some(&1));
    }

    #[test]
    fn test_export_serializes() {
        let graph = KnowledgeGraph::new();
        graph.add_entity("s1", EntityKind::Startup, PropertyMap::new());
        let json = graph.export().to_json().unwrap();
        assert!(json.contains("\"total_entities\": 1"));
    }
}
