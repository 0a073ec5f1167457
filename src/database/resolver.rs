//! Connection string construction
//!
//! One formatting rule per vendor. Resolution is a pure function of the
//! descriptor: no I/O, no decryption, no state.

use super::descriptor::{ConnectionDescriptor, Vendor};
use crate::error::{Error, Result};
use serde::Serialize;
use std::fmt::Write as _;

/// Port assumed for ClickHouse when the address has none
pub const CLICKHOUSE_DEFAULT_PORT: u16 = 9000;

/// Driver identifier and connection string for one descriptor
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ResolvedConnection {
    pub driver: String,
    pub connection_string: String,
}

/// Resolve a descriptor into the driver/connection-string pair for its vendor
pub fn resolve(descriptor: &ConnectionDescriptor) -> Result<ResolvedConnection> {
    let vendor: Vendor = descriptor.vendor.parse()?;

    let connection_string = match vendor {
        Vendor::Postgres => postgres(descriptor),
        Vendor::Mysql => mysql(descriptor),
        Vendor::Sqlite => descriptor.database.clone(),
        Vendor::Oracle => oracle(descriptor),
        Vendor::SqlServer => sqlserver(descriptor),
        Vendor::Clickhouse => clickhouse(descriptor)?,
    };

    tracing::debug!(
        vendor = %vendor,
        database = %descriptor.database,
        address = %descriptor.address,
        extras = descriptor.extra.len(),
        "Resolved database connection"
    );

    Ok(ResolvedConnection {
        driver: vendor.driver().to_string(),
        connection_string,
    })
}

/// `user:pass@`, or nothing when there is no username
fn credentials(descriptor: &ConnectionDescriptor) -> String {
    if descriptor.username.is_empty() {
        String::new()
    } else {
        format!("{}:{}@", descriptor.username, descriptor.password.value)
    }
}

/// Append each extra parameter as `&key=value`
fn push_extras(out: &mut String, descriptor: &ConnectionDescriptor) {
    for (key, value) in &descriptor.extra {
        let _ = write!(out, "&{key}={value}");
    }
}

// postgres://[user:pass@]host/database[?query]
//
// A query string on the address belongs after the database path.
fn postgres(d: &ConnectionDescriptor) -> String {
    let (host, query) = match d.address.split_once('?') {
        Some((host, query)) => (host, Some(query)),
        None => (d.address.as_str(), None),
    };

    let mut params: Vec<String> = query
        .filter(|q| !q.is_empty())
        .map(str::to_string)
        .into_iter()
        .collect();
    params.extend(d.extra.iter().map(|(key, value)| format!("{key}={value}")));

    let mut out = format!("postgres://{}{host}/{}", credentials(d), d.database);
    if !params.is_empty() {
        out.push('?');
        out.push_str(&params.join("&"));
    }
    out
}

// [user:pass@]tcp(address)/database?
fn mysql(d: &ConnectionDescriptor) -> String {
    let mut out = format!("{}tcp({})/{}?", credentials(d), d.address, d.database);
    push_extras(&mut out, d);
    out
}

// oracle://[user:pass@]address/database?
fn oracle(d: &ConnectionDescriptor) -> String {
    let mut out = format!("oracle://{}{}/{}?", credentials(d), d.address, d.database);
    push_extras(&mut out, d);
    out
}

// sqlserver://[user:pass@]address?database=database
fn sqlserver(d: &ConnectionDescriptor) -> String {
    let mut out = format!(
        "sqlserver://{}{}?database={}",
        credentials(d),
        d.address,
        d.database
    );
    push_extras(&mut out, d);
    out
}

// tcp://host:port?[username=user&password=pass&]database=database
fn clickhouse(d: &ConnectionDescriptor) -> Result<String> {
    let (host, port) = split_host_port(&d.address)?;

    let mut out = format!("tcp://{host}:{port}?");
    if !d.username.is_empty() {
        let _ = write!(
            out,
            "username={}&password={}&",
            d.username, d.password.value
        );
    }
    let _ = write!(out, "database={}", d.database);
    push_extras(&mut out, d);
    Ok(out)
}

/// Split `host[:port]`; no port means the default, a malformed one is an error
fn split_host_port(address: &str) -> Result<(&str, u16)> {
    // Bracketed IPv6 literal without a port
    if address.ends_with(']') {
        return Ok((address, CLICKHOUSE_DEFAULT_PORT));
    }

    match address.rsplit_once(':') {
        None => Ok((address, CLICKHOUSE_DEFAULT_PORT)),
        Some((host, port)) => port.parse().map(|port| (host, port)).map_err(|_| {
            Error::config(format!(
                "Invalid port '{port}' in ClickHouse address '{address}'"
            ))
        }),
    }
}
