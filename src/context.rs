//! Context builder: composes traversal and similarity into the bundles a
//! chat/insight layer consumes.
//!
//! Buckets are carved out of the raw two-hop traversal by matching
//! `(neighbor kind, relationship type)` pairs against a fixed taxonomy.
//! Relations matching no known pair are simply left out of the buckets —
//! the raw traversal itself stays available via
//! [`KnowledgeGraph::related_entities`].

use hashbrown::{HashMap, HashSet};
use serde::{Deserialize, Serialize};

use crate::graph::KnowledgeGraph;
use crate::model::{Entity, EntityKind, Relation};
use crate::similarity::SimilarEntity;

// ============================================================================
// Entity context
// ============================================================================

/// The startup-centric context bundle: the entity itself plus its relations
/// bucketed by the taxonomy below.
///
/// | Bucket | Kind | Relationship |
/// |--------|------|--------------|
/// | `founders` | founder | `founded_by` |
/// | `team_members` | team_member | `employs` |
/// | `investors` | investor | `invested_by` |
/// | `competitors` | startup | `competes_with` |
/// | `similar_startups` | startup | `similar_to` |
/// | `market_connections` | industry | `operates_in` |
/// | `technology_stack` | technology | `uses_technology` |
/// | `partnerships` | startup | `partners_with` |
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct EntityContext {
    pub entity: Option<Entity>,
    pub founders: Vec<Relation>,
    pub team_members: Vec<Relation>,
    pub investors: Vec<Relation>,
    pub competitors: Vec<Relation>,
    pub similar_startups: Vec<Relation>,
    pub market_connections: Vec<Relation>,
    pub technology_stack: Vec<Relation>,
    pub partnerships: Vec<Relation>,
}

// ============================================================================
// Query focus
// ============================================================================

/// The single focus a free-text query resolves to. Matched first-to-last,
/// case-insensitively, against fixed keyword sets.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Focus {
    Competitors,
    SimilarStartups,
    Team,
    Funding,
    Market,
    /// No keyword matched.
    General,
}

impl Focus {
    /// First-match priority order is the declaration order above.
    fn detect(query: &str) -> Focus {
        const KEYWORDS: &[(Focus, &[&str])] = &[
            (Focus::Competitors, &["competitor", "competition", "rival"]),
            (Focus::SimilarStartups, &["similar", "like", "comparable"]),
            (Focus::Team, &["founder", "team", "who"]),
            (Focus::Funding, &["funding", "investment", "investor"]),
            (Focus::Market, &["market", "industry", "sector"]),
        ];

        let query = query.to_lowercase();
        for (focus, words) in KEYWORDS {
            if words.iter().any(|w| query.contains(w)) {
                return *focus;
            }
        }
        Focus::General
    }
}

/// Query-specific context: the base bundle plus the resolved focus.
///
/// When the focus is [`Focus::SimilarStartups`], scored matches from
/// `find_similar` land in `similar_matches`; the structural
/// `similar_startups` bucket is left as traversed.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct QueryContext {
    #[serde(flatten)]
    pub context: EntityContext,
    pub focus: Focus,
    #[serde(skip_serializing_if = "Vec::is_empty", default)]
    pub similar_matches: Vec<SimilarEntity>,
}

// ============================================================================
// Portfolio insights
// ============================================================================

/// Aggregate view over an investor's `invested_in` edges.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct PortfolioInsights {
    pub portfolio_size: usize,
    pub industry_distribution: HashMap<String, usize>,
    pub stage_distribution: HashMap<String, usize>,
    pub unique_founders: usize,
    pub portfolio_startups: Vec<Entity>,
}

// ============================================================================
// Builder API
// ============================================================================

const DEFAULT_SIMILARITY_THRESHOLD: f64 = 0.3;

impl KnowledgeGraph {
    /// Classify every relation within two hops of `id` into the context
    /// buckets. `None` when `id` is unknown.
    pub fn entity_context(&self, id: &str) -> Option<EntityContext> {
        let entity = self.entity(id)?;
        let mut ctx = EntityContext { entity: Some(entity), ..Default::default() };

        for rel in self.bfs_relations(id, None, 2) {
            let bucket = match (&rel.entity.kind, rel.relationship.as_str()) {
                (EntityKind::Founder, "founded_by") => &mut ctx.founders,
                (EntityKind::TeamMember, "employs") => &mut ctx.team_members,
                (EntityKind::Investor, "invested_by") => &mut ctx.investors,
                (EntityKind::Startup, "competes_with") => &mut ctx.competitors,
                (EntityKind::Startup, "similar_to") => &mut ctx.similar_startups,
                (EntityKind::Industry, "operates_in") => &mut ctx.market_connections,
                (EntityKind::Technology, "uses_technology") => &mut ctx.technology_stack,
                (EntityKind::Startup, "partners_with") => &mut ctx.partnerships,
                _ => continue,
            };
            bucket.push(rel);
        }

        Some(ctx)
    }

    /// [`entity_context`](Self::entity_context) enriched with a query
    /// focus. Exactly one focus is selected per query; only `Competitors`
    /// and `SimilarStartups` change the bundle's content.
    pub fn query_context(&self, id: &str, query: &str) -> Option<QueryContext> {
        let mut context = self.entity_context(id)?;
        let focus = Focus::detect(query);
        let mut similar_matches = Vec::new();

        match focus {
            Focus::Competitors => {
                context.competitors =
                    self.bfs_relations(id, Some(&["competes_with", "similar_to"]), 2);
            }
            Focus::SimilarStartups => {
                similar_matches = self.find_similar(id, DEFAULT_SIMILARITY_THRESHOLD);
            }
            Focus::Team | Focus::Funding | Focus::Market | Focus::General => {}
        }

        Some(QueryContext { context, focus, similar_matches })
    }

    /// Portfolio aggregates for an investor entity: what it invested in,
    /// how those startups spread over industries and stages, and how many
    /// distinct founders sit behind them. `None` when `id` is unknown.
    pub fn portfolio_insights(&self, investor_id: &str) -> Option<PortfolioInsights> {
        let g = self.read();
        g.entities.get(investor_id)?;

        let mut insights = PortfolioInsights::default();
        let mut founders = HashSet::new();

        let offsets = g.by_source.get(investor_id).cloned().unwrap_or_default();
        for i in offsets {
            let rel = &g.relationships[i];
            if rel.rel_type != "invested_in" {
                continue;
            }
            let Some(startup) = g.entities.get(rel.target.as_str()) else {
                continue;
            };

            let field = |key: &str| {
                startup
                    .get(key)
                    .and_then(|v| v.as_str())
                    .unwrap_or("Unknown")
                    .to_owned()
            };
            *insights.industry_distribution.entry(field("industry_sector")).or_insert(0) += 1;
            *insights.stage_distribution.entry(field("stage")).or_insert(0) += 1;

            for founder_rel in g.direct_relations(rel.target.as_str(), Some(&["founded_by"])) {
                founders.insert(founder_rel.entity_id);
            }

            insights.portfolio_startups.push(startup.clone());
        }

        insights.portfolio_size = insights.portfolio_startups.len();
        insights.unique_founders = founders.len();
        Some(insights)
    }
}

// ============================================================================
// Tests
// ============================================================================

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_focus_first_match_priority() {
        // "who invested" hits Team ("who") before Funding ("investment").
        assert_eq!(Focus::detect("who invested in them?"), Focus::Team);
        assert_eq!(Focus::detect("Main RIVALS in the space"), Focus::Competitors);
        assert_eq!(Focus::detect("comparable companies"), Focus::SimilarStartups);
        assert_eq!(Focus::detect("funding round size"), Focus::Funding);
        assert_eq!(Focus::detect("market outlook"), Focus::Market);
        assert_eq!(Focus::detect("tell me more"), Focus::General);
    }

    #[test]
    fn test_focus_is_case_insensitive() {
        assert_eq!(Focus::detect("COMPETITION analysis"), Focus::Competitors);
    }
}
