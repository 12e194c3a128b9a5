use std::collections::BTreeMap;
use std::time::Duration;

use bytes::Bytes;
use http::Method;
use url::Url;

/// Resolved basic-auth credentials.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Credentials {
    pub username: String,
    pub password: String,
}

/// A fully resolved, immutable description of one HTTP request attempt.
///
/// Built fresh for every attempt because pattern URLs must vary across
/// requests; owned by the worker that built it and discarded after
/// execution. Never partially valid: any resolution failure fails the
/// whole build.
#[derive(Debug, Clone)]
pub struct RequestDescriptor {
    pub method: Method,
    pub url: Url,
    pub headers: BTreeMap<String, String>,
    pub cookies: BTreeMap<String, String>,
    pub credentials: Option<Credentials>,
    /// Override for the User-Agent header; `None` keeps the transport
    /// default.
    pub user_agent: Option<String>,
    pub body: Bytes,
    /// Per-request timeout; `None` keeps the transport default.
    pub timeout: Option<Duration>,
}
