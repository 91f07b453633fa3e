//! Credential lifecycle management.
//!
//! Keeps a principal's page credentials in sync with the external authority
//! and tracks their expiry.
//!
//! # Architecture
//!
//! - [`ExternalAuthority`]: exchanges proofs, lists resources, inspects lifetimes
//! - [`RecordStore`]: durable principal and resource records
//! - [`Synchronizer`]: reconciles all of a principal's resources
//! - [`RenewalCoordinator`]: renews one resource under its per-key lock
//! - [`Sweeper`]: recomputes stored `active` flags from stored expiries
//! - [`CredentialService`]: the facade the API layer talks to

mod authority;
mod clock;
mod context;
mod error;
mod expiry;
mod locks;
mod renewal;
mod service;
mod session;
mod store;
mod sweeper;
mod synchronizer;
mod types;

// Authority implementations
pub mod platforms;

pub use authority::{
    ExchangeResult, ExchangedIdentity, ExternalAuthority, LifetimeResult, ListResult,
    OwnedResource,
};
pub use clock::{Clock, ManualClock, SystemClock};
pub use context::SyncContext;
pub use error::{AuthorityError, AuthorityUnavailable, SyncError};
pub use expiry::{expiry_from_lifetime, is_expired};
pub use locks::{KeyedLocks, principal_key, resource_key};
pub use renewal::RenewalCoordinator;
pub use service::{CredentialService, ServiceOptions};
pub use session::{AuthSession, Authenticator};
pub use store::RecordStore;
pub use sweeper::{SweepScheduler, Sweeper};
pub use synchronizer::{DEFAULT_SYNC_CONCURRENCY, Synchronizer};
pub use types::{Principal, PrincipalFields, PrincipalView, Resource, ResourceFields, ResourceView};
