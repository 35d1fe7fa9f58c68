//! Entity — a typed, identified record in the knowledge graph.

use std::borrow::Borrow;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use super::{PropertyMap, Value};

/// Externally assigned entity identifier (e.g. `"startup_acme"`,
/// `"industry_fintech"`).
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct EntityId(pub String);

impl EntityId {
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl std::fmt::Display for EntityId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl From<&str> for EntityId {
    fn from(s: &str) -> Self { EntityId(s.to_owned()) }
}

impl From<String> for EntityId {
    fn from(s: String) -> Self { EntityId(s) }
}

/// Lets `HashMap<EntityId, _>` be queried with a plain `&str`.
impl Borrow<str> for EntityId {
    fn borrow(&self) -> &str {
        &self.0
    }
}

/// The entity taxonomy. Known kinds drive the type index and the context
/// builder's bucket matching; anything else rides along as `Other`.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(from = "String", into = "String")]
pub enum EntityKind {
    Startup,
    Founder,
    Investor,
    TeamMember,
    Industry,
    Stage,
    Location,
    Experience,
    Technology,
    Conversation,
    Other(String),
}

impl EntityKind {
    pub fn as_str(&self) -> &str {
        match self {
            EntityKind::Startup => "startup",
            EntityKind::Founder => "founder",
            EntityKind::Investor => "investor",
            EntityKind::TeamMember => "team_member",
            EntityKind::Industry => "industry",
            EntityKind::Stage => "stage",
            EntityKind::Location => "location",
            EntityKind::Experience => "experience",
            EntityKind::Technology => "technology",
            EntityKind::Conversation => "conversation",
            EntityKind::Other(s) => s,
        }
    }
}

impl std::fmt::Display for EntityKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

impl From<&str> for EntityKind {
    fn from(s: &str) -> Self {
        match s {
            "startup" => EntityKind::Startup,
            "founder" => EntityKind::Founder,
            "investor" => EntityKind::Investor,
            "team_member" => EntityKind::TeamMember,
            "industry" => EntityKind::Industry,
            "stage" => EntityKind::Stage,
            "location" => EntityKind::Location,
            "experience" => EntityKind::Experience,
            "technology" => EntityKind::Technology,
            "conversation" => EntityKind::Conversation,
            other => EntityKind::Other(other.to_owned()),
        }
    }
}

impl From<String> for EntityKind {
    fn from(s: String) -> Self { EntityKind::from(s.as_str()) }
}

impl From<EntityKind> for String {
    fn from(k: EntityKind) -> Self { k.as_str().to_owned() }
}

/// An entity in the knowledge graph.
///
/// Identity is the id. Entities are immutable once added except for
/// property merge via the store's update path.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Entity {
    pub id: EntityId,
    pub kind: EntityKind,
    pub properties: PropertyMap,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl Entity {
    pub fn new(id: impl Into<EntityId>, kind: EntityKind) -> Self {
        let now = Utc::now();
        Self {
            id: id.into(),
            kind,
            properties: PropertyMap::new(),
            created_at: now,
            updated_at: now,
        }
    }

    pub fn with_property(mut self, key: impl Into<String>, value: impl Into<Value>) -> Self {
        self.properties.insert(key.into(), value.into());
        self
    }

    pub fn get(&self, key: &str) -> Option<&Value> {
        self.properties.get(key)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_kind_round_trip() {
        for raw in ["startup", "founder", "team_member", "conversation", "satellite"] {
            let kind = EntityKind::from(raw);
            assert_eq!(kind.as_str(), raw);
        }
        assert_eq!(EntityKind::from("satellite"), EntityKind::Other("satellite".into()));
    }

    #[test]
    fn test_entity_builder() {
        let e = Entity::new("startup_acme", EntityKind::Startup)
            .with_property("name", "Acme")
            .with_property("team_size", 12);
        assert_eq!(e.get("name"), Some(&Value::from("Acme")));
        assert_eq!(e.get("team_size"), Some(&Value::Int(12)));
        assert_eq!(e.id.as_str(), "startup_acme");
    }
}
