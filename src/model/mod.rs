//! # Knowledge Graph Model
//!
//! Clean DTOs that define the entity/relationship graph. These types cross
//! every boundary: store ↔ traversal ↔ similarity ↔ context builder ↔ user.
//!
//! Design rule: this module is pure data — no I/O, no locks, no state.

pub mod entity;
pub mod relationship;
pub mod relation;
pub mod value;
pub mod property_map;

pub use entity::{Entity, EntityId, EntityKind};
pub use relationship::Relationship;
pub use relation::{Relation, Direction};
pub use value::Value;
pub use property_map::PropertyMap;
