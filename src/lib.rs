//! # venture-graph — In-Process Knowledge Graph Engine
//!
//! A mutable entity/relationship store for startup investment intelligence:
//! typed indexing, bounded multi-hop traversal, path discovery, and
//! structural-similarity scoring.
//!
//! ## Design Principles
//!
//! 1. **Owned handles, no globals**: a [`KnowledgeGraph`] is an explicitly
//!    constructed value; callers that need concurrent rebuilds publish
//!    immutable snapshots through [`SharedGraph`]
//! 2. **Clean DTOs**: `Entity`, `Relationship`, `Relation`, `Value` cross
//!    all boundaries
//! 3. **Emptiness is not an error**: absent ids, empty type buckets, and
//!    zero-result traversals come back as empty collections or 0.0 scores
//! 4. **Soft references**: an edge may outlive (or predate) its endpoints;
//!    every traversal join point filters against the live entity store
//!
//! ## Quick Start
//!
//! ```rust
//! use venture_graph::{KnowledgeGraph, EntityKind, PropertyMap, Value};
//!
//! let graph = KnowledgeGraph::new();
//!
//! let mut props = PropertyMap::new();
//! props.insert("name".into(), Value::from("Jane"));
//! graph.add_entity("founder_jane", EntityKind::Founder, props);
//! graph.add_entity("startup_acme", EntityKind::Startup, PropertyMap::new());
//! graph.add_relationship("startup_acme", "founder_jane", "founded_by", None, 1.0);
//!
//! for rel in graph.direct_relations("startup_acme", None) {
//!     println!("startup_acme -[{}]-> {}", rel.relationship, rel.entity_id);
//! }
//! ```
//!
//! ## Pipeline
//!
//! | Phase | Module | Description |
//! |-------|--------|-------------|
//! | Build | `ingest` | Bulk load from a `ProfileSource`, similarity linking |
//! | Steady state | `graph` | Entity/relationship store + derived indices |
//! | Query | `traverse`, `similarity`, `context` | Read-only operations |
//! | Export | `export` | Diagnostic snapshot dump |

// ============================================================================
// Modules
// ============================================================================

pub mod model;
pub mod graph;
pub mod traverse;
pub mod similarity;
pub mod context;
pub mod ingest;
pub mod export;

// ============================================================================
// Re-exports: Model (the DTOs)
// ============================================================================

pub use model::{
    Entity, EntityId, EntityKind, Relationship, Relation,
    Direction, Value, PropertyMap,
};

// ============================================================================
// Re-exports: Engine
// ============================================================================

pub use graph::KnowledgeGraph;
pub use similarity::{SimilarityStrategy, NeighborhoodJaccard, ProfileRubric, SimilarEntity};
pub use context::{EntityContext, QueryContext, Focus, PortfolioInsights};
pub use ingest::{ProfileSource, StartupRecord, FounderRecord, SharedGraph, build_graph};
pub use export::{GraphExport, GraphStats};

// ============================================================================
// Error Types
// ============================================================================

#[derive(Debug, thiserror::Error)]
pub enum Error {
    /// A traversal depth of zero was requested.
    #[error("invalid traversal depth: {0} (must be >= 1)")]
    InvalidDepth(usize),

    /// The profile source could not supply records.
    #[error("profile source error: {0}")]
    Source(String),

    /// A build pass failed part-way. The previously published snapshot,
    /// if any, is untouched.
    #[error("build aborted, graph left in prior state: {0}")]
    BuildAborted(String),
}

pub type Result<T> = std::result::Result<T, Error>;
