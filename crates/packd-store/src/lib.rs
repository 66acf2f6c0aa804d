// ABOUTME: Persistence layer for packd: the snapshot codec, the log report writer,
// ABOUTME: and the gateway that names files and guards against same-second collisions.

pub mod gateway;
pub mod report;
pub mod snapshot;

pub use gateway::{GatewayError, LogStrategy, PersistenceGateway};
pub use report::{ReportError, render_report, write_report_append, write_report_atomic};
pub use snapshot::{Snapshot, SnapshotError};
