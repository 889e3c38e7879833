//! Core module - records, stores, queries, forms, sessions and access rules

pub mod config;
pub mod credentials;
pub mod dashboard;
pub mod entity;
pub mod form;
pub mod identity;
pub mod policy;
pub mod query;
pub mod session;
pub mod store;

pub use config::{Config, ConfigError, Paths};
pub use credentials::{CredentialVerifier, StaticCredentials};
pub use dashboard::{Dashboard, DeletePolicy, Deletion, Holds};
pub use entity::{Assignment, Choice, FieldError, FieldKind, FieldSpec, Record, Summary};
pub use form::{Commit, FormEditor, FormError, FormState};
pub use identity::{IdParseError, RecordId};
pub use policy::{Access, AccessPolicy, Action, PolicyError, Role, Section, StaticPolicy};
pub use query::{Lookup, Query};
pub use session::{FileStorage, Identity, MemoryStorage, Session, SessionError, SessionStorage};
pub use store::{Entry, RecordStore};
