//! Objects returned by a remote directory

use crate::identity::ActorType;
use serde::{Deserialize, Serialize};

/// ActivityStreams type of a fetched object
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(from = "String", into = "String")]
pub enum ObjectType {
    Actor(ActorType),
    Note,
    Article,
    Tombstone,
    Other(String),
}

impl ObjectType {
    /// The actor kind, if this object can be addressed as an identity
    pub fn actor_type(&self) -> Option<ActorType> {
        match self {
            Self::Actor(ty) => Some(*ty),
            _ => None,
        }
    }
}

impl From<String> for ObjectType {
    fn from(name: String) -> Self {
        if let Some(actor) = ActorType::parse(&name) {
            return Self::Actor(actor);
        }
        match name.as_str() {
            "Note" => Self::Note,
            "Article" => Self::Article,
            "Tombstone" => Self::Tombstone,
            _ => Self::Other(name),
        }
    }
}

impl From<ObjectType> for String {
    fn from(ty: ObjectType) -> Self {
        match ty {
            ObjectType::Actor(actor) => actor.as_str().to_string(),
            ObjectType::Note => "Note".to_string(),
            ObjectType::Article => "Article".to_string(),
            ObjectType::Tombstone => "Tombstone".to_string(),
            ObjectType::Other(name) => name,
        }
    }
}

/// A remote object as far as mention resolution cares about it
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RemoteObject {
    #[serde(rename = "type")]
    pub object_type: ObjectType,
    /// Canonical IRI; absent for transient objects
    #[serde(default)]
    pub id: Option<String>,
    #[serde(default)]
    pub preferred_username: Option<String>,
    #[serde(default)]
    pub name: Option<String>,
    /// Profile page meant for people
    #[serde(default)]
    pub url: Option<String>,
}

impl RemoteObject {
    pub fn new(object_type: ObjectType) -> Self {
        Self {
            object_type,
            id: None,
            preferred_username: None,
            name: None,
            url: None,
        }
    }

    /// Shorthand for an actor object with an IRI and username
    pub fn actor(actor_type: ActorType, iri: impl Into<String>, username: impl Into<String>) -> Self {
        Self::new(ObjectType::Actor(actor_type))
            .with_id(iri)
            .with_preferred_username(username)
    }

    pub fn with_id(mut self, id: impl Into<String>) -> Self {
        self.id = Some(id.into());
        self
    }

    pub fn with_preferred_username(mut self, username: impl Into<String>) -> Self {
        self.preferred_username = Some(username.into());
        self
    }

    pub fn with_name(mut self, name: impl Into<String>) -> Self {
        self.name = Some(name.into());
        self
    }

    pub fn with_url(mut self, url: impl Into<String>) -> Self {
        self.url = Some(url.into());
        self
    }

    /// Whether this object represents an addressable identity
    pub fn is_actor(&self) -> bool {
        self.object_type.actor_type().is_some()
    }
}
