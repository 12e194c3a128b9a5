use thiserror::Error;

use super::{KeyValError, PatternError, ValidationError};

/// Errors raised while resolving a target into a concrete request.
///
/// `Clone` because the one-time body-file read happens at builder setup
/// and a failure there is cached, then replayed on every attempt.
#[derive(Debug, Error, Clone)]
pub enum BuildError {
    #[error("URL must not be empty.")]
    UrlEmpty,
    #[error("Invalid URL '{url}': {source}")]
    InvalidUrl {
        url: String,
        #[source]
        source: url::ParseError,
    },
    #[error("URL '{url}' is missing a host.")]
    UrlMissingHost { url: String },
    #[error("URL pattern error: {source}")]
    Pattern {
        #[from]
        source: PatternError,
    },
    #[error("Invalid method '{method}'.")]
    InvalidMethod { method: String },
    #[error("Failed to read body file '{path}': {reason}")]
    ReadBodyFile { path: String, reason: String },
    #[error("Invalid headers: {source}")]
    InvalidHeaders {
        #[source]
        source: KeyValError,
    },
    #[error("Invalid cookies: {source}")]
    InvalidCookies {
        #[source]
        source: KeyValError,
    },
    #[error("Invalid basic auth: {source}")]
    InvalidBasicAuth {
        #[source]
        source: KeyValError,
    },
    #[error("Basic auth must be a single username:password pair.")]
    BasicAuthMultiplePairs,
    #[error("Invalid timeout: {source}")]
    InvalidTimeout {
        #[source]
        source: ValidationError,
    },
}
