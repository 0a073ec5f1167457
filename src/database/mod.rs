//! Database connection resolution
//!
//! Maps a vendor-neutral [`ConnectionDescriptor`] to the driver identifier
//! and connection string a SQL layer needs. Nothing here connects to
//! anything.

mod descriptor;
mod resolver;

pub use descriptor::{ConnectionDescriptor, Encrypt, Vendor};
pub use resolver::{resolve, ResolvedConnection, CLICKHOUSE_DEFAULT_PORT};
