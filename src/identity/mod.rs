//! Durable identity records and the persistence step that creates them

mod persist;
mod record;

pub use persist::{AccountPersister, StorePersister};
pub use record::{ActorType, IdentityRecord, NewAccount};
