//! Similarity engine: two deliberately distinct scoring strategies.
//!
//! | Strategy | Used by | Formula |
//! |----------|---------|---------|
//! | [`NeighborhoodJaccard`] | online queries (`similarity`, `find_similar`) | Jaccard over (neighbor kind, edge type) feature sets |
//! | [`ProfileRubric`] | bulk build (`link_similar`) | fixed field-match rubric over profile properties |
//!
//! The two are independent by design and must not be merged: the bulk pass
//! scores raw profile fields before the graph is densely connected, while
//! the online path scores graph structure.

use std::cmp::Ordering;

use hashbrown::HashSet;
use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::graph::{GraphInner, KnowledgeGraph};
use crate::model::{Entity, EntityId, EntityKind, PropertyMap, Value};

// ============================================================================
// Strategy interface
// ============================================================================

/// Pairwise entity similarity. Implementations must be symmetric:
/// `score(a, b) == score(b, a)`.
pub trait SimilarityStrategy {
    fn name(&self) -> &'static str;

    /// Score in `[0, 1]`. 0.0 when either id is unknown.
    fn score(&self, graph: &KnowledgeGraph, a: &str, b: &str) -> f64;
}

// ============================================================================
// Jaccard over the relation neighborhood
// ============================================================================

/// Structural similarity: the set of `(neighbor kind, relationship type)`
/// pairs observed over an entity's direct relations, compared with the
/// Jaccard index `|A ∩ B| / |A ∪ B|`.
#[derive(Debug, Clone, Copy, Default)]
pub struct NeighborhoodJaccard;

type FeatureSet = HashSet<(EntityKind, String)>;

impl GraphInner {
    /// Feature set over direct relations, direction-agnostic, unfiltered.
    fn neighbor_features(&self, id: &str) -> FeatureSet {
        self.direct_relations(id, None)
            .into_iter()
            .map(|rel| (rel.entity.kind, rel.relationship))
            .collect()
    }
}

fn jaccard(a: &FeatureSet, b: &FeatureSet) -> (usize, f64) {
    let intersection = a.intersection(b).count();
    let union = a.union(b).count();
    if union == 0 {
        (0, 0.0)
    } else {
        (intersection, intersection as f64 / union as f64)
    }
}

impl SimilarityStrategy for NeighborhoodJaccard {
    fn name(&self) -> &'static str {
        "neighborhood_jaccard"
    }

    fn score(&self, graph: &KnowledgeGraph, a: &str, b: &str) -> f64 {
        let g = graph.read();
        if !g.entities.contains_key(a) || !g.entities.contains_key(b) {
            return 0.0;
        }
        jaccard(&g.neighbor_features(a), &g.neighbor_features(b)).1
    }
}

// ============================================================================
// Profile field rubric
// ============================================================================

/// Build-time similarity over profile fields rather than graph structure.
///
/// Each categorical field contributes its weight when both entities carry
/// the field with equal values. The metric field contributes up to its
/// weight, scaled by `min / max`, when both values are positive.
#[derive(Debug, Clone)]
pub struct ProfileRubric {
    pub categorical: Vec<(String, f64)>,
    pub metric: (String, f64),
}

impl Default for ProfileRubric {
    /// The startup rubric: industry 0.4, stage 0.2, funding stage 0.2,
    /// city 0.1, monthly revenue ratio up to 0.1.
    fn default() -> Self {
        Self {
            categorical: vec![
                ("industry_sector".into(), 0.4),
                ("stage".into(), 0.2),
                ("funding_stage".into(), 0.2),
                ("location_city".into(), 0.1),
            ],
            metric: ("monthly_revenue".into(), 0.1),
        }
    }
}

impl ProfileRubric {
    /// Score two property bags directly, without graph lookups.
    pub fn score_records(&self, a: &PropertyMap, b: &PropertyMap) -> f64 {
        let mut score = 0.0;

        for (field, weight) in &self.categorical {
            match (a.get(field.as_str()), b.get(field.as_str())) {
                (Some(va), Some(vb)) if va == vb => score += weight,
                _ => {}
            }
        }

        let (field, weight) = &self.metric;
        let ma = a.get(field.as_str()).and_then(Value::as_float).unwrap_or(0.0);
        let mb = b.get(field.as_str()).and_then(Value::as_float).unwrap_or(0.0);
        if ma > 0.0 && mb > 0.0 {
            score += weight * (ma.min(mb) / ma.max(mb));
        }

        score
    }
}

impl SimilarityStrategy for ProfileRubric {
    fn name(&self) -> &'static str {
        "profile_rubric"
    }

    fn score(&self, graph: &KnowledgeGraph, a: &str, b: &str) -> f64 {
        let g = graph.read();
        match (g.entities.get(a), g.entities.get(b)) {
            (Some(ea), Some(eb)) => self.score_records(&ea.properties, &eb.properties),
            _ => 0.0,
        }
    }
}

// ============================================================================
// Similar-entity result
// ============================================================================

/// One `find_similar` match.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SimilarEntity {
    pub entity_id: EntityId,
    pub entity: Entity,
    pub score: f64,
    /// Size of the feature-set intersection behind the score.
    pub common_connections: usize,
}

// ============================================================================
// Engine API
// ============================================================================

impl KnowledgeGraph {
    /// Structural similarity between two entities under
    /// [`NeighborhoodJaccard`]. Symmetric; 0.0 when either id is unknown or
    /// neither entity has any relations.
    pub fn similarity(&self, a: &str, b: &str) -> f64 {
        NeighborhoodJaccard.score(self, a, b)
    }

    /// Entities of the same kind as `id` whose Jaccard similarity is at
    /// least `threshold`, sorted descending by score. The sort is stable,
    /// so ties keep the insertion order of the kind index. Empty when `id`
    /// is unknown.
    pub fn find_similar(&self, id: &str, threshold: f64) -> Vec<SimilarEntity> {
        let g = self.read();
        let Some(origin) = g.entities.get(id) else {
            return Vec::new();
        };
        let origin_features = g.neighbor_features(id);

        let mut matches = Vec::new();
        for other_id in g.live_ids_of_kind(&origin.kind) {
            if other_id.as_str() == id {
                continue;
            }
            let (common, score) = jaccard(&origin_features, &g.neighbor_features(other_id.as_str()));
            if score >= threshold {
                matches.push(SimilarEntity {
                    entity_id: other_id.clone(),
                    entity: g.entities[other_id.as_str()].clone(),
                    score,
                    common_connections: common,
                });
            }
        }

        matches.sort_by(|x, y| y.score.partial_cmp(&x.score).unwrap_or(Ordering::Equal));
        matches
    }

    /// Bulk build-time pass: score every unordered pair of `kind` entities
    /// under `rubric` and link pairs scoring strictly above `threshold`
    /// with a `similar_to` edge weighted by the score. Returns the number
    /// of edges added.
    pub fn link_similar(&self, kind: &EntityKind, rubric: &ProfileRubric, threshold: f64) -> usize {
        // Snapshot the candidates, then release the lock before mutating.
        let candidates: Vec<(EntityId, PropertyMap)> = {
            let g = self.read();
            g.live_ids_of_kind(kind)
                .map(|id| (id.clone(), g.entities[id.as_str()].properties.clone()))
                .collect()
        };

        let mut linked = 0;
        for (i, (id_a, props_a)) in candidates.iter().enumerate() {
            for (id_b, props_b) in &candidates[i + 1..] {
                let score = rubric.score_records(props_a, props_b);
                if score > threshold {
                    let mut props = PropertyMap::new();
                    props.insert("similarity_score".into(), Value::Float(score));
                    self.add_relationship(id_a.clone(), id_b.clone(), "similar_to", Some(props), score);
                    linked += 1;
                }
            }
        }

        debug!(kind = %kind, pairs = candidates.len() * candidates.len().saturating_sub(1) / 2,
               linked, "similarity linking pass complete");
        linked
    }
}

// ============================================================================
// Tests
// ============================================================================

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::EntityKind;

    fn startup(graph: &KnowledgeGraph, id: &str, fields: &[(&str, &str)]) {
        let mut props = PropertyMap::new();
        for (k, v) in fields {
            props.insert((*k).into(), Value::from(*v));
        }
        graph.add_entity(id, EntityKind::Startup, props);
    }

    #[test]
    fn test_rubric_weights() {
        let rubric = ProfileRubric::default();

        let mut a = PropertyMap::new();
        a.insert("industry_sector".into(), Value::from("fintech"));
        a.insert("stage".into(), Value::from("seed"));
        a.insert("monthly_revenue".into(), Value::Float(1000.0));

        let mut b = a.clone();
        assert!((rubric.score_records(&a, &b) - 0.7).abs() < 1e-9);

        b.insert("monthly_revenue".into(), Value::Float(2000.0));
        // Revenue contribution scales by min/max = 0.5.
        assert!((rubric.score_records(&a, &b) - 0.65).abs() < 1e-9);
    }

    #[test]
    fn test_rubric_ignores_missing_fields() {
        let rubric = ProfileRubric::default();
        // Both missing every field: no contribution, not a "match".
        assert_eq!(rubric.score_records(&PropertyMap::new(), &PropertyMap::new()), 0.0);
    }

    #[test]
    fn test_link_similar_scenario() {
        let graph = KnowledgeGraph::new();
        startup(&graph, "s1", &[("industry_sector", "fintech"), ("stage", "seed")]);
        startup(&graph, "s2", &[("industry_sector", "fintech"), ("stage", "seed")]);
        startup(&graph, "s3", &[("industry_sector", "health"), ("stage", "series-a")]);

        let linked = graph.link_similar(&EntityKind::Startup, &ProfileRubric::default(), 0.3);
        assert_eq!(linked, 1);

        let rels = graph.direct_relations("s1", Some(&["similar_to"]));
        assert_eq!(rels.len(), 1);
        assert_eq!(rels[0].entity_id.as_str(), "s2");
        assert!(rels[0].weight >= 0.6, "industry + stage match must score >= 0.6");

        assert!(graph.direct_relations("s3", Some(&["similar_to"])).is_empty());
    }

    #[test]
    fn test_jaccard_unknown_ids_score_zero() {
        let graph = KnowledgeGraph::new();
        startup(&graph, "s1", &[]);
        assert_eq!(graph.similarity("s1", "nobody"), 0.0);
        assert_eq!(graph.similarity("nobody", "s1"), 0.0);
    }

    #[test]
    fn test_jaccard_empty_union_scores_zero() {
        let graph = KnowledgeGraph::new();
        startup(&graph, "s1", &[]);
        startup(&graph, "s2", &[]);
        assert_eq!(graph.similarity("s1", "s2"), 0.0);
    }
}
