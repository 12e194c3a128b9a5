use std::time::Duration;

use async_trait::async_trait;
use futures_util::StreamExt;
use reqwest::Client;
use reqwest::header::{COOKIE, USER_AGENT};

use crate::error::AppResult;
use crate::request::RequestDescriptor;

use super::{HttpTransport, TransportReply};

const DEFAULT_USER_AGENT: &str = concat!("barrage/", env!("CARGO_PKG_VERSION"));

/// Production transport over a shared `reqwest` client.
///
/// One client serves every worker of every target so the connection pool
/// is reused across the run. A descriptor's timeout overrides the client
/// default per request.
#[derive(Debug, Clone)]
pub struct ReqwestTransport {
    client: Client,
}

impl ReqwestTransport {
    /// Builds the shared client. `default_timeout` applies to requests
    /// whose descriptor carries no timeout of its own.
    ///
    /// # Errors
    ///
    /// Returns an error when the underlying client cannot be constructed.
    pub fn new(default_timeout: Option<Duration>) -> AppResult<Self> {
        let mut builder = Client::builder().user_agent(DEFAULT_USER_AGENT);
        if let Some(timeout) = default_timeout {
            builder = builder.timeout(timeout);
        }
        Ok(Self {
            client: builder.build()?,
        })
    }
}

#[async_trait]
impl HttpTransport for ReqwestTransport {
    async fn execute(&self, descriptor: &RequestDescriptor) -> TransportReply {
        let mut request = self
            .client
            .request(descriptor.method.clone(), descriptor.url.clone());

        for (name, value) in &descriptor.headers {
            request = request.header(name, value);
        }
        if !descriptor.cookies.is_empty() {
            let cookie_header = descriptor
                .cookies
                .iter()
                .map(|(name, value)| format!("{name}={value}"))
                .collect::<Vec<_>>()
                .join("; ");
            request = request.header(COOKIE, cookie_header);
        }
        if let Some(credentials) = &descriptor.credentials {
            request = request.basic_auth(&credentials.username, Some(&credentials.password));
        }
        if let Some(agent) = &descriptor.user_agent {
            request = request.header(USER_AGENT, agent);
        }
        if !descriptor.body.is_empty() {
            request = request.body(descriptor.body.clone());
        }
        if let Some(timeout) = descriptor.timeout {
            request = request.timeout(timeout);
        }

        match request.send().await {
            Ok(response) => {
                let status = response.status().as_u16();
                match drain_response_body(response).await {
                    Ok(response_bytes) => TransportReply::Response {
                        status,
                        response_bytes,
                    },
                    Err(err) if err.is_timeout() => TransportReply::TimedOut,
                    Err(err) => TransportReply::Failed {
                        reason: err.to_string(),
                    },
                }
            }
            Err(err) if err.is_timeout() => TransportReply::TimedOut,
            Err(err) => TransportReply::Failed {
                reason: err.to_string(),
            },
        }
    }
}

/// Reads the body to completion so latency covers the full response, not
/// just the header line.
async fn drain_response_body(response: reqwest::Response) -> Result<u64, reqwest::Error> {
    let mut stream = response.bytes_stream();
    let mut total_bytes: u64 = 0;
    while let Some(chunk) = stream.next().await {
        let bytes = chunk?;
        total_bytes = total_bytes.saturating_add(u64::try_from(bytes.len()).unwrap_or(u64::MAX));
    }
    Ok(total_bytes)
}
