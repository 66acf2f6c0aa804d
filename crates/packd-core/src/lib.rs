// ABOUTME: Core library for packd, containing the packet record, both in-memory stores,
// ABOUTME: time-window queries, and the store service that hosts attach to.

pub mod packet;
pub mod query;
pub mod service;
pub mod store;

pub use packet::{DataPath, LookupError, Packet, PathStep};
pub use query::TimeQuery;
pub use service::{ResolveError, SourceResolver, StaticResolver, StoreService};
pub use store::{NamedStore, UnnamedStore};
