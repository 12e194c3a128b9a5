use std::collections::BTreeMap;
use std::time::Duration;

use bytes::Bytes;
use http::Method;
use rand::Rng;
use url::Url;

use crate::config::parse_duration_value;
use crate::config::types::Target;
use crate::error::BuildError;
use crate::keyval::parse_key_val_string;
use crate::pattern::CompiledPattern;

use super::descriptor::{Credentials, RequestDescriptor};

/// Per-target request factory, shared read-only by all of the target's
/// workers.
///
/// Everything that resolves once per target happens in [`RequestBuilder::new`]:
/// header/cookie/auth parsing, pattern compilation, timeout resolution, and
/// the one-time body-file read. A resolution failure is cached so every
/// attempt replays it as a build error instead of aborting the pool.
/// [`RequestBuilder::build`] only resolves the URL, keeping the per-attempt
/// cost low.
#[derive(Debug, Clone)]
pub struct RequestBuilder {
    state: Result<RequestSpec, BuildError>,
}

impl RequestBuilder {
    #[must_use]
    pub fn new(target: &Target) -> Self {
        Self {
            state: RequestSpec::resolve(target),
        }
    }

    /// Resolves one concrete request descriptor.
    ///
    /// # Errors
    ///
    /// Returns [`BuildError`] when the target failed to resolve at setup
    /// (replayed per attempt) or when the URL for this attempt is invalid.
    pub fn build<R: Rng + ?Sized>(&self, rng: &mut R) -> Result<RequestDescriptor, BuildError> {
        let spec = self.state.as_ref().map_err(BuildError::clone)?;
        let url = spec.url_source.resolve(rng)?;
        Ok(RequestDescriptor {
            method: spec.method.clone(),
            url,
            headers: spec.headers.clone(),
            cookies: spec.cookies.clone(),
            credentials: spec.credentials.clone(),
            user_agent: spec.user_agent.clone(),
            body: spec.body.clone(),
            timeout: spec.timeout,
        })
    }
}

#[derive(Debug, Clone)]
enum UrlSource {
    Static(Url),
    Pattern(CompiledPattern),
}

impl UrlSource {
    fn resolve<R: Rng + ?Sized>(&self, rng: &mut R) -> Result<Url, BuildError> {
        match self {
            UrlSource::Static(url) => Ok(url.clone()),
            UrlSource::Pattern(pattern) => parse_absolute_url(&pattern.generate(rng)),
        }
    }
}

#[derive(Debug, Clone)]
struct RequestSpec {
    method: Method,
    url_source: UrlSource,
    headers: BTreeMap<String, String>,
    cookies: BTreeMap<String, String>,
    credentials: Option<Credentials>,
    user_agent: Option<String>,
    body: Bytes,
    timeout: Option<Duration>,
}

impl RequestSpec {
    fn resolve(target: &Target) -> Result<Self, BuildError> {
        // http's InvalidMethod is not Clone, so it cannot ride along in a
        // replayable error; the offending token is enough.
        let method = Method::from_bytes(target.method.as_bytes()).map_err(|_source| {
            BuildError::InvalidMethod {
                method: target.method.clone(),
            }
        })?;

        let url_source = if target.regex_url {
            UrlSource::Pattern(CompiledPattern::compile(&target.url)?)
        } else {
            UrlSource::Static(parse_absolute_url(&target.url)?)
        };

        let headers = if target.headers.is_empty() {
            BTreeMap::new()
        } else {
            parse_key_val_string(&target.headers, ',', ':')
                .map_err(|source| BuildError::InvalidHeaders { source })?
        };

        let cookies = if target.cookies.is_empty() {
            BTreeMap::new()
        } else {
            parse_key_val_string(&target.cookies, ';', '=')
                .map_err(|source| BuildError::InvalidCookies { source })?
        };

        let credentials = if target.basic_auth.is_empty() {
            None
        } else {
            let pairs = parse_key_val_string(&target.basic_auth, ',', ':')
                .map_err(|source| BuildError::InvalidBasicAuth { source })?;
            if pairs.len() != 1 {
                return Err(BuildError::BasicAuthMultiplePairs);
            }
            pairs
                .into_iter()
                .next()
                .map(|(username, password)| Credentials { username, password })
        };

        // File contents win over the literal body when both are set.
        let body = if target.body_filename.is_empty() {
            Bytes::from(target.body.clone().into_bytes())
        } else {
            let contents = std::fs::read(&target.body_filename).map_err(|source| {
                BuildError::ReadBodyFile {
                    path: target.body_filename.clone(),
                    reason: source.to_string(),
                }
            })?;
            Bytes::from(contents)
        };

        let user_agent = if target.user_agent.is_empty() {
            None
        } else {
            Some(target.user_agent.clone())
        };

        let timeout = if target.timeout.is_empty() {
            None
        } else {
            Some(
                parse_duration_value(&target.timeout)
                    .map_err(|source| BuildError::InvalidTimeout { source })?,
            )
        };

        Ok(Self {
            method,
            url_source,
            headers,
            cookies,
            credentials,
            user_agent,
            body,
            timeout,
        })
    }
}

fn parse_absolute_url(raw: &str) -> Result<Url, BuildError> {
    if raw.is_empty() {
        return Err(BuildError::UrlEmpty);
    }
    let url = Url::parse(raw).map_err(|source| BuildError::InvalidUrl {
        url: raw.to_owned(),
        source,
    })?;
    if url.host_str().filter(|host| !host.is_empty()).is_none() {
        return Err(BuildError::UrlMissingHost {
            url: raw.to_owned(),
        });
    }
    Ok(url)
}
