//! The HTTP boundary: a trait the dispatcher executes descriptors
//! through, plus the reqwest-backed production implementation.
mod client;

pub use client::ReqwestTransport;

use async_trait::async_trait;

use crate::request::RequestDescriptor;

/// What the transport observed for one executed descriptor.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum TransportReply {
    /// The server answered and the body was drained.
    Response { status: u16, response_bytes: u64 },
    /// The per-request (or client default) timeout expired.
    TimedOut,
    /// The request failed before a response arrived.
    Failed { reason: String },
}

/// Executes one resolved request and reports what happened.
///
/// Injected into the dispatcher so load logic never owns connection
/// pooling, TLS, or redirect policy. Implementations never return an
/// error; every failure mode is a [`TransportReply`] variant so the
/// dispatcher can record it as an outcome and keep going.
#[async_trait]
pub trait HttpTransport: Send + Sync {
    async fn execute(&self, descriptor: &RequestDescriptor) -> TransportReply;
}
