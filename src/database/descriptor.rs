//! Connection descriptor types
//!
//! The wire form matches the panel documents that carry database settings:
//! `type`, `database`, `username`, `password_encrypt`, `address`,
//! `apiKey_encrypt` and `extra`.

use crate::error::{Error, Result};
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::fmt;
use std::str::FromStr;

/// A secret as stored: its text plus whether that text is still encrypted
///
/// Resolution always uses `value` verbatim. Decryption happens before a
/// descriptor gets here.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct Encrypt {
    pub value: String,
    pub encrypted: bool,
}

impl Encrypt {
    /// A plaintext secret
    pub fn plain(value: impl Into<String>) -> Self {
        Self {
            value: value.into(),
            encrypted: false,
        }
    }
}

/// Vendor-neutral description of how to reach a database
#[derive(Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct ConnectionDescriptor {
    /// Vendor tag, e.g. `postgres`
    #[serde(rename = "type")]
    pub vendor: String,

    pub database: String,

    pub username: String,

    #[serde(rename = "password_encrypt")]
    pub password: Encrypt,

    /// Host, optionally with a port and (for postgres) a query string
    pub address: String,

    #[serde(rename = "apiKey_encrypt")]
    pub api_key: Encrypt,

    /// Vendor parameters, appended in key order
    pub extra: BTreeMap<String, String>,
}

impl ConnectionDescriptor {
    /// Create a descriptor for a vendor and database
    pub fn new(vendor: impl Into<String>, database: impl Into<String>) -> Self {
        Self {
            vendor: vendor.into(),
            database: database.into(),
            ..Self::default()
        }
    }

    /// Parse the JSON wire form
    pub fn from_json(json: &str) -> Result<Self> {
        Ok(serde_json::from_str(json)?)
    }

    #[must_use]
    pub fn with_credentials(mut self, username: impl Into<String>, password: impl Into<String>) -> Self {
        self.username = username.into();
        self.password = Encrypt::plain(password);
        self
    }

    #[must_use]
    pub fn with_address(mut self, address: impl Into<String>) -> Self {
        self.address = address.into();
        self
    }

    #[must_use]
    pub fn with_extra(mut self, key: impl Into<String>, value: impl Into<String>) -> Self {
        self.extra.insert(key.into(), value.into());
        self
    }
}

// Secrets stay out of logs and panic messages
impl fmt::Debug for ConnectionDescriptor {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ConnectionDescriptor")
            .field("vendor", &self.vendor)
            .field("database", &self.database)
            .field("username", &self.username)
            .field("password", &"<redacted>")
            .field("address", &self.address)
            .field("api_key", &"<redacted>")
            .field("extra", &self.extra)
            .finish()
    }
}

// ============================================================================
// Vendors
// ============================================================================

/// Database engines a descriptor can be resolved for
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Vendor {
    Postgres,
    Mysql,
    Sqlite,
    Oracle,
    SqlServer,
    Clickhouse,
}

impl Vendor {
    /// Every resolvable vendor
    pub const ALL: [Vendor; 6] = [
        Vendor::Postgres,
        Vendor::Mysql,
        Vendor::Sqlite,
        Vendor::Oracle,
        Vendor::SqlServer,
        Vendor::Clickhouse,
    ];

    /// Tag as written in descriptors
    pub fn tag(self) -> &'static str {
        match self {
            Vendor::Postgres => "postgres",
            Vendor::Mysql => "mysql",
            Vendor::Sqlite => "sqlite",
            Vendor::Oracle => "oracle",
            Vendor::SqlServer => "sqlserver",
            Vendor::Clickhouse => "clickhouse",
        }
    }

    /// Driver identifier expected by the SQL layer
    pub fn driver(self) -> &'static str {
        match self {
            Vendor::Sqlite => "sqlite3",
            other => other.tag(),
        }
    }
}

impl FromStr for Vendor {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self> {
        let tag = s.trim().to_ascii_lowercase();
        Vendor::ALL
            .into_iter()
            .find(|v| v.tag() == tag)
            .ok_or_else(|| Error::unsupported_vendor(s))
    }
}

impl fmt::Display for Vendor {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.tag())
    }
}
