use std::collections::BTreeMap;

use chrono::{DateTime, Utc};
use serde::Serialize;

use conninfo_core::{AddressSource, BrowserClassification};

/// Everything the page reports about a single request.
///
/// Plain data, built once per request and handed to the renderer; safe to
/// serialize or template directly.
#[derive(Debug, Clone, Serialize)]
pub struct ConnectionReport {
    /// Resolved client IP (see `conninfo_core::ResolvedAddress`)
    pub client_ip: String,
    /// Which request input supplied `client_ip`
    pub address_source: AddressSource,
    /// Raw transport peer address, kept for the record but not shown on
    /// the page
    pub remote_addr: String,
    pub method: String,
    pub path: String,
    /// Query parameters with sorted keys; repeated keys accumulate in
    /// request order
    pub query_params: BTreeMap<String, Vec<String>>,
    /// All request headers, sorted by name
    pub headers: Vec<HeaderEntry>,
    pub user_agent: BrowserClassification,
    /// Capture time of the report, UTC
    pub timestamp: DateTime<Utc>,
}

/// A single request header as displayed: multiple values for the same
/// name are already joined with `", "`.
#[derive(Debug, Clone, Serialize)]
pub struct HeaderEntry {
    pub name: String,
    pub value: String,
}
