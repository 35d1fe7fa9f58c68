//! The knowledge graph store: entities, relationships, and derived indices.
//!
//! ## Structure
//!
//! | Structure | Role |
//! |-----------|------|
//! | `entities` | Canonical id → record map |
//! | `kind_index` | kind → ids, insertion-ordered |
//! | `relationships` | Append-only edge list |
//! | `by_source` / `by_target` | Adjacency: id → edge offsets |
//!
//! ## Concurrency
//!
//! All five structures sit behind one `parking_lot::RwLock`, because every
//! mutation touches more than one of them (e.g. `add_entity` writes the
//! entity map and the kind index as separate steps). Readers take the read
//! lock; live writes (conversation ingestion) serialize on the write lock.
//! Full rebuilds should not mutate a shared graph in place — build a fresh
//! one and publish it through [`crate::SharedGraph`].
//!
//! ## Soft-reference semantics
//!
//! Edges never require their endpoints to exist, and the kind index may
//! briefly name an entity that was overwritten under another kind. Every
//! read path therefore re-checks the primary entity map instead of trusting
//! an index entry.

use chrono::Utc;
use hashbrown::HashMap;
use parking_lot::{RwLock, RwLockReadGuard};
use smallvec::SmallVec;

use crate::model::{Entity, EntityId, EntityKind, PropertyMap, Relationship};

// ============================================================================
// GraphInner
// ============================================================================

/// The five structures guarded by the graph's single lock.
#[derive(Debug)]
pub(crate) struct GraphInner {
    pub(crate) entities: HashMap<EntityId, Entity>,
    /// Append-only; `by_source`/`by_target` hold offsets into this list,
    /// which stay valid because edges are never removed.
    pub(crate) relationships: Vec<Relationship>,
    /// Insertion-ordered per kind; order breaks similarity-score ties.
    pub(crate) kind_index: HashMap<EntityKind, Vec<EntityId>>,
    pub(crate) by_source: HashMap<EntityId, SmallVec<[usize; 4]>>,
    pub(crate) by_target: HashMap<EntityId, SmallVec<[usize; 4]>>,
}

impl GraphInner {
    fn new() -> Self {
        Self {
            entities: HashMap::new(),
            relationships: Vec::new(),
            kind_index: HashMap::new(),
            by_source: HashMap::new(),
            by_target: HashMap::new(),
        }
    }

    /// Ids of a kind, index order, filtered against the primary store so a
    /// stale index entry (overwritten under a different kind) never leaks.
    pub(crate) fn live_ids_of_kind<'a>(
        &'a self,
        kind: &'a EntityKind,
    ) -> impl Iterator<Item = &'a EntityId> + 'a {
        self.kind_index
            .get(kind)
            .into_iter()
            .flatten()
            .filter(move |id| {
                self.entities
                    .get(id.as_str())
                    .is_some_and(|e| &e.kind == kind)
            })
    }
}

// ============================================================================
// KnowledgeGraph
// ============================================================================

/// An explicitly owned graph handle.
///
/// Construct one per snapshot; there is no process-wide default instance.
/// All operations take `&self` — mutation is serialized internally.
#[derive(Debug)]
pub struct KnowledgeGraph {
    inner: RwLock<GraphInner>,
}

impl Default for KnowledgeGraph {
    fn default() -> Self {
        Self::new()
    }
}

impl KnowledgeGraph {
    pub fn new() -> Self {
        Self { inner: RwLock::new(GraphInner::new()) }
    }

    pub(crate) fn read(&self) -> RwLockReadGuard<'_, GraphInner> {
        self.inner.read()
    }

    // ========================================================================
    // Entity store
    // ========================================================================

    /// Insert or overwrite an entity record.
    ///
    /// Both timestamps are stamped to now, and the id is registered in the
    /// kind index. Re-adding an id replaces the record wholesale — use
    /// [`update_entity`](Self::update_entity) to merge properties instead.
    /// Always succeeds.
    pub fn add_entity(
        &self,
        id: impl Into<EntityId>,
        kind: EntityKind,
        properties: PropertyMap,
    ) {
        let id = id.into();
        let now = Utc::now();
        let entity = Entity {
            id: id.clone(),
            kind: kind.clone(),
            properties,
            created_at: now,
            updated_at: now,
        };

        let mut g = self.inner.write();
        let bucket = g.kind_index.entry(kind).or_default();
        if !bucket.contains(&id) {
            bucket.push(id.clone());
        }
        g.entities.insert(id, entity);
    }

    /// Shallow-merge `properties` into an existing entity and refresh its
    /// `updated_at`. No-op when the id is absent.
    pub fn update_entity(&self, id: &str, properties: PropertyMap) {
        let mut g = self.inner.write();
        if let Some(entity) = g.entities.get_mut(id) {
            entity.properties.extend(properties);
            entity.updated_at = Utc::now();
        }
    }

    /// Look up a single entity by id.
    pub fn entity(&self, id: &str) -> Option<Entity> {
        self.inner.read().entities.get(id).cloned()
    }

    pub fn contains(&self, id: &str) -> bool {
        self.inner.read().entities.contains_key(id)
    }

    /// All entities currently indexed under `kind`, as an id → record map.
    /// Empty when none. Stale index entries are filtered out at read time.
    pub fn entities_by_kind(&self, kind: &EntityKind) -> HashMap<EntityId, Entity> {
        let g = self.inner.read();
        g.live_ids_of_kind(kind)
            .map(|id| (id.clone(), g.entities[id.as_str()].clone()))
            .collect()
    }

    // ========================================================================
    // Relationship store
    // ========================================================================

    /// Append a directed, weighted edge and index it by source and target.
    ///
    /// Succeeds regardless of whether either endpoint exists as an entity
    /// (soft references). Repeated calls append duplicate edges — the graph
    /// is a multigraph. `weight` is expected to be >= 0.
    pub fn add_relationship(
        &self,
        source: impl Into<EntityId>,
        target: impl Into<EntityId>,
        rel_type: impl Into<String>,
        properties: Option<PropertyMap>,
        weight: f64,
    ) {
        let rel = Relationship {
            source: source.into(),
            target: target.into(),
            rel_type: rel_type.into(),
            properties: properties.unwrap_or_default(),
            weight,
            created_at: Utc::now(),
        };

        let mut g = self.inner.write();
        let idx = g.relationships.len();
        g.by_source.entry(rel.source.clone()).or_default().push(idx);
        g.by_target.entry(rel.target.clone()).or_default().push(idx);
        g.relationships.push(rel);
    }

    // ========================================================================
    // Introspection
    // ========================================================================

    pub fn entity_count(&self) -> usize {
        self.inner.read().entities.len()
    }

    pub fn relationship_count(&self) -> usize {
        self.inner.read().relationships.len()
    }

    /// Distinct entity kinds with live counts (index filtered against the
    /// primary store).
    pub fn kind_counts(&self) -> HashMap<String, usize> {
        let g = self.inner.read();
        g.kind_index
            .keys()
            .map(|kind| (kind.as_str().to_owned(), g.live_ids_of_kind(kind).count()))
            .collect()
    }
}

// ============================================================================
// Tests
// ============================================================================
