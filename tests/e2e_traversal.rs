//! End-to-end tests for traversal: direct relations, bounded BFS
//! expansion, and exhaustive simple-path discovery.

use pretty_assertions::assert_eq;
use venture_graph::{Direction, EntityId, EntityKind, KnowledgeGraph, PropertyMap, Value};

fn add(graph: &KnowledgeGraph, id: &str, kind: EntityKind) {
    graph.add_entity(id, kind, PropertyMap::new());
}

// ============================================================================
// 1. Direction mirror: founded_by seen from both endpoints
// ============================================================================

#[test]
fn test_direct_relations_direction_mirror() {
    let graph = KnowledgeGraph::new();
    let mut founder_props = PropertyMap::new();
    founder_props.insert("name".into(), Value::from("Jane"));
    graph.add_entity("F1", EntityKind::Founder, founder_props);
    graph.add_entity("S1", EntityKind::Startup, PropertyMap::new());
    graph.add_relationship("S1", "F1", "founded_by", None, 1.0);

    let from_startup = graph.direct_relations("S1", None);
    assert_eq!(from_startup.len(), 1);
    assert_eq!(from_startup[0].direction, Direction::Outgoing);
    assert_eq!(from_startup[0].relationship, "founded_by");
    assert_eq!(from_startup[0].entity_id.as_str(), "F1");
    assert_eq!(from_startup[0].entity.get("name"), Some(&Value::from("Jane")));

    let from_founder = graph.direct_relations("F1", None);
    assert_eq!(from_founder.len(), 1);
    assert_eq!(from_founder[0].direction, Direction::Incoming);
    assert_eq!(from_founder[0].relationship, "founded_by");
    assert_eq!(from_founder[0].entity_id.as_str(), "S1");
}

// ============================================================================
// 2. Depth bound: nothing beyond max_depth appears
// ============================================================================

#[test]
fn test_depth_bound_excludes_further_entities() {
    // s0 -> s1 -> s2 -> s3: a chain where s3 is only reachable at depth 3.
    let graph = KnowledgeGraph::new();
    for id in ["s0", "s1", "s2", "s3"] {
        add(&graph, id, EntityKind::Startup);
    }
    graph.add_relationship("s0", "s1", "partners_with", None, 1.0);
    graph.add_relationship("s1", "s2", "partners_with", None, 1.0);
    graph.add_relationship("s2", "s3", "partners_with", None, 1.0);

    let rels = graph.related_entities("s0", None, 2).unwrap();
    assert!(rels.iter().all(|r| r.depth <= 2));
    assert!(rels.iter().any(|r| r.entity_id.as_str() == "s2"));
    assert!(
        rels.iter().all(|r| r.entity_id.as_str() != "s3"),
        "s3 is only reachable at depth 3 and must not appear at max_depth 2"
    );
}

#[test]
fn test_max_depth_one_equals_direct_relations() {
    let graph = KnowledgeGraph::new();
    for id in ["a", "b", "c"] {
        add(&graph, id, EntityKind::Startup);
    }
    graph.add_relationship("a", "b", "partners_with", None, 1.0);
    graph.add_relationship("b", "c", "partners_with", None, 1.0);

    let direct = graph.direct_relations("a", None);
    let related = graph.related_entities("a", None, 1).unwrap();
    assert_eq!(direct, related);
}

// ============================================================================
// 3. BFS is direction-agnostic
// ============================================================================

#[test]
fn test_bfs_crosses_edges_both_ways() {
    // investor -> s1 <- nothing else; from s1 at depth 2 we reach what the
    // investor also invested in, crossing one edge backwards.
    let graph = KnowledgeGraph::new();
    add(&graph, "inv", EntityKind::Investor);
    add(&graph, "s1", EntityKind::Startup);
    add(&graph, "s2", EntityKind::Startup);
    graph.add_relationship("inv", "s1", "invested_in", None, 1.0);
    graph.add_relationship("inv", "s2", "invested_in", None, 1.0);

    let rels = graph.related_entities("s1", None, 2).unwrap();
    let ids: Vec<&str> = rels.iter().map(|r| r.entity_id.as_str()).collect();
    assert!(ids.contains(&"inv"));
    assert!(ids.contains(&"s2"), "sibling startup reachable via incoming + outgoing edge");
}

// ============================================================================
// 4. Type filter bounds the expansion, not just the output
// ============================================================================

#[test]
fn test_bfs_type_filter() {
    let graph = KnowledgeGraph::new();
    for id in ["a", "b", "c", "d"] {
        add(&graph, id, EntityKind::Startup);
    }
    graph.add_relationship("a", "b", "competes_with", None, 1.0);
    graph.add_relationship("b", "c", "competes_with", None, 1.0);
    graph.add_relationship("a", "d", "partners_with", None, 1.0);

    let rels = graph.related_entities("a", Some(&["competes_with"]), 2).unwrap();
    let ids: Vec<&str> = rels.iter().map(|r| r.entity_id.as_str()).collect();
    assert!(ids.contains(&"b"));
    assert!(ids.contains(&"c"));
    assert!(!ids.contains(&"d"));
}

// ============================================================================
// 5. Cycles terminate
// ============================================================================

#[test]
fn test_bfs_cycle_terminates() {
    let graph = KnowledgeGraph::new();
    for id in ["a", "b", "c"] {
        add(&graph, id, EntityKind::Startup);
    }
    graph.add_relationship("a", "b", "partners_with", None, 1.0);
    graph.add_relationship("b", "c", "partners_with", None, 1.0);
    graph.add_relationship("c", "a", "partners_with", None, 1.0);

    let rels = graph.related_entities("a", None, 50).unwrap();
    assert!(rels.iter().all(|r| r.depth <= 50));
    // Every node expands at most once, so the result set is bounded.
    assert!(rels.len() <= 6);
}

// ============================================================================
// 6. find_paths: all simple paths, not just shortest
// ============================================================================

#[test]
fn test_find_paths_returns_all_simple_paths() {
    let graph = KnowledgeGraph::new();
    for id in ["A", "B", "C"] {
        add(&graph, id, EntityKind::Startup);
    }
    graph.add_relationship("A", "B", "partners_with", None, 1.0);
    graph.add_relationship("B", "C", "partners_with", None, 1.0);
    graph.add_relationship("A", "C", "partners_with", None, 1.0);

    let mut paths = graph.find_paths("A", "C", 2).unwrap();
    paths.sort_by_key(|p| p.len());

    let ids = |p: &[EntityId]| p.iter().map(|e| e.as_str().to_owned()).collect::<Vec<_>>();
    assert_eq!(paths.len(), 2, "both the direct edge and the two-hop path must appear");
    assert_eq!(ids(&paths[0]), vec!["A", "C"]);
    assert_eq!(ids(&paths[1]), vec!["A", "B", "C"]);
}

#[test]
fn test_find_paths_respects_max_depth() {
    let graph = KnowledgeGraph::new();
    for id in ["A", "B", "C"] {
        add(&graph, id, EntityKind::Startup);
    }
    graph.add_relationship("A", "B", "partners_with", None, 1.0);
    graph.add_relationship("B", "C", "partners_with", None, 1.0);

    let paths = graph.find_paths("A", "C", 1).unwrap();
    assert!(paths.is_empty(), "only a two-hop path exists; max_depth 1 finds nothing");
}

#[test]
fn test_find_paths_self_target_empty_even_with_cycles() {
    let graph = KnowledgeGraph::new();
    for id in ["A", "B"] {
        add(&graph, id, EntityKind::Startup);
    }
    graph.add_relationship("A", "B", "partners_with", None, 1.0);
    graph.add_relationship("B", "A", "partners_with", None, 1.0);

    assert!(graph.find_paths("A", "A", 3).unwrap().is_empty());
}

#[test]
fn test_find_paths_ignores_incoming_edges() {
    let graph = KnowledgeGraph::new();
    for id in ["A", "B"] {
        add(&graph, id, EntityKind::Startup);
    }
    graph.add_relationship("B", "A", "partners_with", None, 1.0);

    // Only B -> A exists; there is no outgoing path A -> B.
    assert!(graph.find_paths("A", "B", 3).unwrap().is_empty());
    assert_eq!(graph.find_paths("B", "A", 3).unwrap().len(), 1);
}

// ============================================================================
// 7. Unknown origins yield empty results, never errors
// ============================================================================

#[test]
fn test_unknown_origin_is_empty() {
    let graph = KnowledgeGraph::new();
    assert!(graph.direct_relations("nobody", None).is_empty());
    assert!(graph.related_entities("nobody", None, 3).unwrap().is_empty());
    assert!(graph.find_paths("nobody", "also_nobody", 3).unwrap().is_empty());
}
