//! Identity record representation

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// Kind of actor an identity was persisted from
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum ActorType {
    Application,
    Group,
    Organization,
    Person,
    Service,
}

impl ActorType {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Application => "Application",
            Self::Group => "Group",
            Self::Organization => "Organization",
            Self::Person => "Person",
            Self::Service => "Service",
        }
    }

    /// Parse the ActivityStreams type name of an actor
    pub fn parse(name: &str) -> Option<Self> {
        match name {
            "Application" => Some(Self::Application),
            "Group" => Some(Self::Group),
            "Organization" => Some(Self::Organization),
            "Person" => Some(Self::Person),
            "Service" => Some(Self::Service),
            _ => None,
        }
    }
}

impl std::fmt::Display for ActorType {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// A known identity
///
/// `iri` is the canonical identifier and always present; `url` is the
/// profile page meant for people, when the actor advertises one.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct IdentityRecord {
    /// Stable internal identifier
    pub id: String,
    /// Handle in token form (`user@host`)
    pub handle: String,
    /// Canonical, globally unique identifier
    pub iri: String,
    /// User-facing profile link
    pub url: Option<String>,
    /// Display name
    pub name: Option<String>,
    pub actor_type: ActorType,
    pub updated_at: DateTime<Utc>,
}

impl IdentityRecord {
    /// Link target for this identity: the profile URL, else the IRI
    pub fn href(&self) -> &str {
        self.url.as_deref().unwrap_or(&self.iri)
    }
}

/// Fields needed to insert or refresh an identity
#[derive(Debug, Clone, PartialEq)]
pub struct NewAccount {
    pub iri: String,
    pub handle: String,
    pub url: Option<String>,
    pub name: Option<String>,
    pub actor_type: ActorType,
}

impl NewAccount {
    pub fn new(iri: impl Into<String>, handle: impl Into<String>, actor_type: ActorType) -> Self {
        Self {
            iri: iri.into(),
            handle: handle.into(),
            url: None,
            name: None,
            actor_type,
        }
    }

    pub fn with_url(mut self, url: impl Into<String>) -> Self {
        self.url = Some(url.into());
        self
    }

    pub fn with_name(mut self, name: impl Into<String>) -> Self {
        self.name = Some(name.into());
        self
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn record(url: Option<&str>) -> IdentityRecord {
        IdentityRecord {
            id: "1".into(),
            handle: "alice@example.com".into(),
            iri: "https://example.com/users/alice".into(),
            url: url.map(String::from),
            name: None,
            actor_type: ActorType::Person,
            updated_at: Utc::now(),
        }
    }

    #[test]
    fn href_prefers_profile_url() {
        let r = record(Some("https://example.com/@alice"));
        assert_eq!(r.href(), "https://example.com/@alice");
    }

    #[test]
    fn href_falls_back_to_iri() {
        let r = record(None);
        assert_eq!(r.href(), "https://example.com/users/alice");
    }

    #[test]
    fn actor_type_names_parse_back() {
        for ty in [
            ActorType::Application,
            ActorType::Group,
            ActorType::Organization,
            ActorType::Person,
            ActorType::Service,
        ] {
            assert_eq!(ActorType::parse(ty.as_str()), Some(ty));
        }
        assert_eq!(ActorType::parse("Note"), None);
    }
}
