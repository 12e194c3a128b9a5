use serde::Deserialize;

pub const DEFAULT_URL: &str = "http://localhost";
pub const DEFAULT_COUNT: u64 = 10;
pub const DEFAULT_CONCURRENCY: u64 = 1;
pub const DEFAULT_TIMEOUT: &str = "10s";
pub const DEFAULT_METHOD: &str = "GET";

/// One workload definition: where to send traffic, how much of it, and
/// what shape each request takes.
///
/// Raw header/cookie/auth strings stay unparsed here; the request builder
/// resolves them once per target. A target is validated before the run
/// starts and treated as read-only afterwards.
#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct Target {
    /// Literal absolute URL, or a pattern when `regex_url` is set.
    pub url: String,
    /// Interpret `url` as a pattern and generate a fresh URL per request.
    pub regex_url: bool,
    /// Total requests to issue against this target.
    #[serde(alias = "num")]
    pub count: u64,
    /// Parallel workers for this target. Never more than `count`.
    #[serde(alias = "concurrent")]
    pub concurrency: u64,
    /// Per-request timeout such as "10s" or "1500ms". Empty means the
    /// transport default applies.
    pub timeout: String,
    pub method: String,
    /// Raw header list, e.g. `"Accept: text/html, X-Trace: 1"`.
    pub headers: String,
    /// Raw cookie list, e.g. `"session=abc; theme=dark"`.
    pub cookies: String,
    /// Raw `username:password` pair.
    pub basic_auth: String,
    /// Override for the User-Agent header. Empty keeps the default.
    pub user_agent: String,
    /// Literal request body. Ignored when `body_filename` is set.
    pub body: String,
    /// Path to a file whose contents become the request body.
    pub body_filename: String,
}

impl Default for Target {
    fn default() -> Self {
        Self {
            url: DEFAULT_URL.to_owned(),
            regex_url: false,
            count: DEFAULT_COUNT,
            concurrency: DEFAULT_CONCURRENCY,
            timeout: DEFAULT_TIMEOUT.to_owned(),
            method: DEFAULT_METHOD.to_owned(),
            headers: String::new(),
            cookies: String::new(),
            basic_auth: String::new(),
            user_agent: String::new(),
            body: String::new(),
            body_filename: String::new(),
        }
    }
}

/// The full workload: an ordered, non-empty list of targets.
#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct StressConfig {
    pub targets: Vec<Target>,
}

impl Default for StressConfig {
    /// A minimally valid single-target configuration. Each call returns a
    /// fresh value.
    fn default() -> Self {
        Self {
            targets: vec![Target::default()],
        }
    }
}
