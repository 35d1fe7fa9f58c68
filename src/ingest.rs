//! Ingestion: bulk graph builds from a profile source, live conversation
//! recording, and snapshot publication.
//!
//! The Profile Store is an external collaborator — it appears here only as
//! the [`ProfileSource`] trait. A build pass maps each startup record to
//! one entity, each founder to an entity plus a `founded_by` edge, and the
//! categorical fields (industry, stage, city) to shared singleton entities
//! with deterministic slug-derived ids, so repeated builds converge on the
//! same shared nodes. Edges accumulate across builds; de-duplication is the
//! caller's concern (rebuild into a fresh graph instead).

use std::sync::Arc;
use std::sync::atomic::{AtomicU64, Ordering};

use parking_lot::RwLock;
use serde::{Deserialize, Serialize};
use tracing::{debug, info};

use crate::graph::KnowledgeGraph;
use crate::model::{EntityId, EntityKind, PropertyMap, Value};
use crate::similarity::ProfileRubric;
use crate::{Error, Result};

/// Threshold above which the build pass links `similar_to` edges.
pub const LINK_THRESHOLD: f64 = 0.3;

// ============================================================================
// Profile source boundary
// ============================================================================

/// The external Profile Store, seen from the graph's side.
///
/// Implementations fetch bulk startup records (with nested founders) from
/// wherever profiles live. A failure here aborts the build; it never
/// corrupts an already-published graph.
pub trait ProfileSource {
    fn startups(&self) -> Result<Vec<StartupRecord>>;
}

/// One startup profile as supplied by the Profile Store.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct StartupRecord {
    pub startup_id: String,
    pub company_name: Option<String>,
    pub industry_sector: Option<String>,
    pub stage: Option<String>,
    pub funding_stage: Option<String>,
    pub location_city: Option<String>,
    pub location_state: Option<String>,
    pub monthly_revenue: Option<f64>,
    #[serde(default)]
    pub founders: Vec<FounderRecord>,
    /// Open-ended fields that ride along into the entity's properties.
    #[serde(default)]
    pub extra: PropertyMap,
}

/// A founder sub-record nested in a startup profile.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct FounderRecord {
    pub name: String,
    pub role: Option<String>,
    pub years_of_experience: Option<f64>,
    pub equity_percentage: Option<f64>,
    pub professional_experience: Option<String>,
}

impl StartupRecord {
    fn to_properties(&self) -> PropertyMap {
        let mut props = self.extra.clone();
        let mut put = |key: &str, value: Option<Value>| {
            if let Some(v) = value {
                props.insert(key.to_owned(), v);
            }
        };
        put("company_name", self.company_name.clone().map(Value::from));
        put("industry_sector", self.industry_sector.clone().map(Value::from));
        put("stage", self.stage.clone().map(Value::from));
        put("funding_stage", self.funding_stage.clone().map(Value::from));
        put("location_city", self.location_city.clone().map(Value::from));
        put("location_state", self.location_state.clone().map(Value::from));
        put("monthly_revenue", self.monthly_revenue.map(Value::from));
        props
    }
}

impl FounderRecord {
    fn to_properties(&self) -> PropertyMap {
        let mut props = PropertyMap::new();
        props.insert("name".to_owned(), Value::from(self.name.clone()));
        if let Some(role) = &self.role {
            props.insert("role".to_owned(), Value::from(role.clone()));
        }
        if let Some(years) = self.years_of_experience {
            props.insert("years_of_experience".to_owned(), Value::from(years));
        }
        if let Some(equity) = self.equity_percentage {
            props.insert("equity_percentage".to_owned(), Value::from(equity));
        }
        if let Some(exp) = &self.professional_experience {
            props.insert("professional_experience".to_owned(), Value::from(exp.clone()));
        }
        props
    }
}

/// Deterministic id fragment for a shared singleton entity. Repeated
/// builds must derive the same id from the same value.
pub(crate) fn slug(value: &str) -> String {
    value.trim().replace(' ', "_").to_lowercase()
}

// ============================================================================
// Build pass
// ============================================================================

/// Build a fresh graph from the profile source, then run the similarity
/// linking pass.
///
/// On source failure the error is reported as [`Error::BuildAborted`] and
/// no graph is produced — callers holding a previous snapshot keep serving
/// it.
pub fn build_graph(source: &dyn ProfileSource, threshold: f64) -> Result<KnowledgeGraph> {
    let records = source
        .startups()
        .map_err(|e| Error::BuildAborted(e.to_string()))?;

    let graph = KnowledgeGraph::new();
    info!(startups = records.len(), "building knowledge graph");

    for record in &records {
        ingest_startup(&graph, record);
    }

    let linked = graph.link_similar(&EntityKind::Startup, &ProfileRubric::default(), threshold);
    info!(
        entities = graph.entity_count(),
        relationships = graph.relationship_count(),
        similar_links = linked,
        "knowledge graph built"
    );

    Ok(graph)
}

fn ingest_startup(graph: &KnowledgeGraph, record: &StartupRecord) {
    let startup_id = record.startup_id.as_str();
    graph.add_entity(startup_id, EntityKind::Startup, record.to_properties());
    debug!(startup = startup_id, founders = record.founders.len(), "ingesting startup");

    for founder in &record.founders {
        let founder_id = format!("founder_{}", slug(&founder.name));
        graph.add_entity(founder_id.as_str(), EntityKind::Founder, founder.to_properties());
        graph.add_relationship(startup_id, founder_id.as_str(), "founded_by", None, 1.0);

        if let Some(experience) = &founder.professional_experience {
            let exp_id = format!("experience_{}", slug(experience));
            let mut props = PropertyMap::new();
            props.insert("description".to_owned(), Value::from(experience.clone()));
            graph.add_entity(exp_id.as_str(), EntityKind::Experience, props);
            graph.add_relationship(founder_id.as_str(), exp_id.as_str(), "has_experience", None, 1.0);
        }
    }

    if let Some(industry) = &record.industry_sector {
        let industry_id = format!("industry_{}", slug(industry));
        let mut props = PropertyMap::new();
        props.insert("name".to_owned(), Value::from(industry.clone()));
        graph.add_entity(industry_id.as_str(), EntityKind::Industry, props);
        graph.add_relationship(startup_id, industry_id.as_str(), "operates_in", None, 1.0);
    }

    if let Some(stage) = &record.stage {
        let stage_id = format!("stage_{}", slug(stage));
        let mut props = PropertyMap::new();
        props.insert("name".to_owned(), Value::from(stage.clone()));
        graph.add_entity(stage_id.as_str(), EntityKind::Stage, props);
        graph.add_relationship(startup_id, stage_id.as_str(), "in_stage", None, 1.0);
    }

    if let Some(city) = &record.location_city {
        let location_id = format!("location_{}", slug(city));
        let mut props = PropertyMap::new();
        props.insert("city".to_owned(), Value::from(city.clone()));
        if let Some(state) = &record.location_state {
            props.insert("state".to_owned(), Value::from(state.clone()));
        }
        graph.add_entity(location_id.as_str(), EntityKind::Location, props);
        graph.add_relationship(startup_id, location_id.as_str(), "located_in", None, 1.0);
    }
}

// ============================================================================
// Live event ingestion
// ============================================================================

/// Monotonic sequence for conversation entity ids, per process.
static CONVERSATION_SEQ: AtomicU64 = AtomicU64::new(1);

impl KnowledgeGraph {
    /// Record one conversation turn as a `conversation` entity with a
    /// `discussed_in` edge to the startup. Returns the new entity's id.
    ///
    /// Safe to call while readers are in flight — the append is serialized
    /// behind the graph's single lock, one structure-consistent step at a
    /// time.
    pub fn record_conversation(
        &self,
        startup_id: &str,
        session_id: &str,
        user_query: &str,
        agent_response: &str,
    ) -> EntityId {
        let seq = CONVERSATION_SEQ.fetch_add(1, Ordering::Relaxed);
        let conv_id = format!("conversation_{}_{seq}", slug(session_id));

        let mut props = PropertyMap::new();
        props.insert("session_id".to_owned(), Value::from(session_id));
        props.insert("user_query".to_owned(), Value::from(user_query));
        props.insert("agent_response".to_owned(), Value::from(agent_response));

        self.add_entity(conv_id.as_str(), EntityKind::Conversation, props);
        self.add_relationship(conv_id.as_str(), startup_id, "discussed_in", None, 1.0);
        EntityId::from(conv_id)
    }
}

// ============================================================================
// Snapshot publication
// ============================================================================

/// Snapshot holder for the rebuild-and-swap discipline.
///
/// Readers call [`load`](Self::load) and operate against a stable snapshot
/// for as long as they hold the `Arc`; [`rebuild`](Self::rebuild) builds a
/// fresh graph off to the side and publishes it atomically only on success.
/// A failed build leaves the current snapshot untouched.
pub struct SharedGraph {
    current: RwLock<Arc<KnowledgeGraph>>,
}

impl Default for SharedGraph {
    fn default() -> Self {
        Self::new()
    }
}

impl SharedGraph {
    /// Start with an empty graph.
    pub fn new() -> Self {
        Self { current: RwLock::new(Arc::new(KnowledgeGraph::new())) }
    }

    /// The current snapshot. Cheap — clones an `Arc`.
    pub fn load(&self) -> Arc<KnowledgeGraph> {
        self.current.read().clone()
    }

    /// Publish an externally built graph.
    pub fn publish(&self, graph: KnowledgeGraph) -> Arc<KnowledgeGraph> {
        let arc = Arc::new(graph);
        *self.current.write() = arc.clone();
        arc
    }

    /// Run a full build pass and publish the result. On failure the
    /// previous snapshot stays published and the error is returned.
    pub fn rebuild(&self, source: &dyn ProfileSource) -> Result<Arc<KnowledgeGraph>> {
        let graph = build_graph(source, LINK_THRESHOLD)?;
        Ok(self.publish(graph))
    }
}

// ============================================================================
// Tests
// ============================================================================
