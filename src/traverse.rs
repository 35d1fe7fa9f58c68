//! Traversal engine: direct neighbors, bounded BFS expansion, and
//! exhaustive simple-path discovery.
//!
//! All operations are read-only and treat edges as soft references — an
//! edge whose far endpoint is missing from the entity store is skipped at
//! the join point, never surfaced.

use std::collections::VecDeque;

use hashbrown::HashSet;

use crate::graph::{GraphInner, KnowledgeGraph};
use crate::model::{Direction, EntityId, Relation};
use crate::{Error, Result};

fn type_allowed(types: Option<&[&str]>, rel_type: &str) -> bool {
    types.is_none_or(|ts| ts.contains(&rel_type))
}

// ============================================================================
// Inner traversal (runs under one read guard)
// ============================================================================

impl GraphInner {
    /// Direction-tagged relations of `id`, joined against the live entity
    /// store. The type filter applies independently in each direction.
    pub(crate) fn direct_relations(&self, id: &str, types: Option<&[&str]>) -> Vec<Relation> {
        let mut related = Vec::new();

        // Outgoing edges: id is the source, far end is the target.
        if let Some(offsets) = self.by_source.get(id) {
            for &i in offsets {
                let rel = &self.relationships[i];
                if !type_allowed(types, &rel.rel_type) {
                    continue;
                }
                if let Some(entity) = self.entities.get(rel.target.as_str()) {
                    related.push(Relation {
                        entity: entity.clone(),
                        entity_id: rel.target.clone(),
                        relationship: rel.rel_type.clone(),
                        direction: Direction::Outgoing,
                        weight: rel.weight,
                        properties: rel.properties.clone(),
                        depth: 1,
                    });
                }
            }
        }

        // Incoming edges: id is the target, far end is the source.
        if let Some(offsets) = self.by_target.get(id) {
            for &i in offsets {
                let rel = &self.relationships[i];
                if !type_allowed(types, &rel.rel_type) {
                    continue;
                }
                if let Some(entity) = self.entities.get(rel.source.as_str()) {
                    related.push(Relation {
                        entity: entity.clone(),
                        entity_id: rel.source.clone(),
                        relationship: rel.rel_type.clone(),
                        direction: Direction::Incoming,
                        weight: rel.weight,
                        properties: rel.properties.clone(),
                        depth: 1,
                    });
                }
            }
        }

        related
    }

    /// Depth-first search over outgoing edges only. `visited` is scoped to
    /// the current branch and released on backtrack, so sibling branches
    /// may revisit nodes.
    fn dfs_paths(
        &self,
        current: &str,
        target: &str,
        max_depth: usize,
        depth: usize,
        visited: &mut HashSet<EntityId>,
        path: &mut Vec<EntityId>,
        out: &mut Vec<Vec<EntityId>>,
    ) {
        if depth > max_depth {
            return;
        }
        // The trivial zero-length "path" to self is excluded by the length
        // check; a cycle back to the origin is blocked by the visited set.
        if current == target && path.len() > 1 {
            out.push(path.clone());
            return;
        }
        if visited.contains(current) {
            return;
        }
        visited.insert(EntityId::from(current));

        if let Some(offsets) = self.by_source.get(current) {
            for &i in offsets {
                let next = &self.relationships[i].target;
                if visited.contains(next.as_str()) {
                    continue;
                }
                if !self.entities.contains_key(next.as_str()) {
                    continue;
                }
                path.push(next.clone());
                self.dfs_paths(next.as_str(), target, max_depth, depth + 1, visited, path, out);
                path.pop();
            }
        }

        visited.remove(current);
    }
}

// ============================================================================
// Public traversal API
// ============================================================================

impl KnowledgeGraph {
    /// Every relation where `id` is source or target, tagged with the
    /// direction it was crossed in.
    ///
    /// Entries whose opposite endpoint is not a known entity are dropped.
    /// With `types` given, only edges of those types are included.
    pub fn direct_relations(&self, id: &str, types: Option<&[&str]>) -> Vec<Relation> {
        self.read().direct_relations(id, types)
    }

    /// Entities related to `id` within `max_depth` hops, direction-agnostic.
    ///
    /// `max_depth == 1` behaves exactly as [`direct_relations`]. Deeper
    /// expansion is breadth-first: the visited set bounds *work* (no node is
    /// expanded twice, so cycles terminate), but a not-yet-expanded neighbor
    /// may be emitted more than once when it is reachable from several
    /// parents. Results carry the depth at which they were reached.
    ///
    /// `max_depth == 0` is rejected with [`Error::InvalidDepth`].
    ///
    /// [`direct_relations`]: Self::direct_relations
    pub fn related_entities(
        &self,
        id: &str,
        types: Option<&[&str]>,
        max_depth: usize,
    ) -> Result<Vec<Relation>> {
        if max_depth == 0 {
            return Err(Error::InvalidDepth(0));
        }
        Ok(self.bfs_relations(id, types, max_depth))
    }

    /// BFS expansion without the depth validation. Callers pass a depth
    /// known to be >= 1.
    pub(crate) fn bfs_relations(
        &self,
        id: &str,
        types: Option<&[&str]>,
        max_depth: usize,
    ) -> Vec<Relation> {
        let g = self.read();
        if max_depth == 1 {
            return g.direct_relations(id, types);
        }

        let mut visited: HashSet<EntityId> = HashSet::new();
        let mut queue: VecDeque<(EntityId, usize)> = VecDeque::new();
        queue.push_back((EntityId::from(id), 0));
        let mut results = Vec::new();

        while let Some((current, depth)) = queue.pop_front() {
            if visited.contains(current.as_str()) {
                continue;
            }
            visited.insert(current.clone());

            for mut rel in g.direct_relations(current.as_str(), types) {
                if visited.contains(rel.entity_id.as_str()) {
                    continue;
                }
                rel.depth = depth + 1;
                let next = rel.entity_id.clone();
                results.push(rel);
                if depth + 1 < max_depth {
                    queue.push_back((next, depth + 1));
                }
            }
        }

        results
    }

    /// Every simple path from `source` to `target` of length <= `max_depth`
    /// edges, following outgoing edges only.
    ///
    /// Paths are ordered entity-id sequences including both endpoints. The
    /// zero-length path to self is never returned, so
    /// `find_paths(a, a, _)` is empty even in cyclic graphs. All simple
    /// paths are returned, not just shortest ones.
    pub fn find_paths(
        &self,
        source: &str,
        target: &str,
        max_depth: usize,
    ) -> Result<Vec<Vec<EntityId>>> {
        if max_depth == 0 {
            return Err(Error::InvalidDepth(0));
        }
        let g = self.read();
        let mut out = Vec::new();
        let mut visited = HashSet::new();
        let mut path = vec![EntityId::from(source)];
        g.dfs_paths(source, target, max_depth, 0, &mut visited, &mut path, &mut out);
        Ok(out)
    }
}

// ============================================================================
// Tests
// ============================================================================
