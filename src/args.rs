use std::time::Duration;

use clap::Parser;

use crate::config::parse_duration_value;
use crate::config::types::{
    DEFAULT_CONCURRENCY, DEFAULT_COUNT, DEFAULT_METHOD, DEFAULT_TIMEOUT, Target,
};
use crate::error::{AppError, AppResult};

#[derive(Debug, Parser, Clone)]
#[clap(
    version,
    about = "Async HTTP load-generation engine - per-target worker pools, regex-randomized URLs, and streamed per-request outcomes for API stress testing."
)]
pub struct BarrageArgs {
    /// Target URLs, one target per URL (regex patterns with --regex-url)
    pub urls: Vec<String>,

    /// Total requests to issue against each target
    #[arg(long = "num", short = 'n', default_value_t = DEFAULT_COUNT)]
    pub count: u64,

    /// Parallel workers per target (never more than --num)
    #[arg(long = "concurrent", short = 'c', default_value_t = DEFAULT_CONCURRENCY)]
    pub concurrency: u64,

    /// Per-request timeout (supports ms/s/m/h); empty uses the client default
    #[arg(long, short = 't', default_value = DEFAULT_TIMEOUT)]
    pub timeout: String,

    /// HTTP method to use
    #[arg(long, short = 'X', default_value = DEFAULT_METHOD)]
    pub method: String,

    /// Request headers, e.g. "Accept: text/html, X-Trace: 1"
    #[arg(long, short = 'H', default_value = "")]
    pub headers: String,

    /// Request cookies, e.g. "session=abc; theme=dark"
    #[arg(long, default_value = "")]
    pub cookies: String,

    /// Basic auth as username:password
    #[arg(long = "basic-auth", default_value = "")]
    pub basic_auth: String,

    /// Override for the User-Agent header
    #[arg(long = "user-agent", default_value = "")]
    pub user_agent: String,

    /// Literal request body
    #[arg(long = "body", short = 'd', default_value = "")]
    pub body: String,

    /// File whose contents become the request body (wins over --body)
    #[arg(long = "body-file", default_value = "")]
    pub body_filename: String,

    /// Interpret URLs as regex patterns, generating a fresh URL per request
    #[arg(long = "regex-url", short = 'r')]
    pub regex_url: bool,

    /// Config file (.toml or .json) with a [[targets]] list; replaces URLs
    #[arg(long)]
    pub config: Option<String>,

    /// Stop claiming new requests after this long (supports ms/s/m/h)
    #[arg(long = "duration-cap", value_parser = parse_duration_arg)]
    pub duration_cap: Option<Duration>,

    /// Write the run report as JSON to this path
    #[arg(long = "output-json")]
    pub output_json: Option<String>,

    /// Enable verbose (debug) logging
    #[arg(long, short = 'v')]
    pub verbose: bool,

    /// Disable ANSI colors in log output
    #[arg(long = "no-color")]
    pub no_color: bool,
}

impl BarrageArgs {
    /// Builds the target list: one target per positional URL, all sharing
    /// the flag values.
    #[must_use]
    pub fn to_targets(&self) -> Vec<Target> {
        self.urls
            .iter()
            .map(|url| Target {
                url: url.clone(),
                regex_url: self.regex_url,
                count: self.count,
                concurrency: self.concurrency,
                timeout: self.timeout.clone(),
                method: self.method.to_ascii_uppercase(),
                headers: self.headers.clone(),
                cookies: self.cookies.clone(),
                basic_auth: self.basic_auth.clone(),
                user_agent: self.user_agent.clone(),
                body: self.body.clone(),
                body_filename: self.body_filename.clone(),
            })
            .collect()
    }
}

/// Parses a duration flag (e.g. `10s`, `500ms`).
///
/// # Errors
///
/// Returns an error when the duration is invalid.
pub fn parse_duration_arg(input: &str) -> AppResult<Duration> {
    parse_duration_value(input).map_err(AppError::validation)
}

#[cfg(test)]
mod tests {
    use clap::Parser;

    use super::BarrageArgs;

    fn parse(argv: &[&str]) -> Result<BarrageArgs, String> {
        BarrageArgs::try_parse_from(argv).map_err(|err| format!("parse failed: {err}"))
    }

    #[test]
    fn bare_url_uses_documented_defaults() -> Result<(), String> {
        let args = parse(&["barrage", "http://localhost:8080"])?;
        let targets = args.to_targets();
        let target = targets
            .first()
            .ok_or("expected one target from one URL")?;
        if target.url != "http://localhost:8080" {
            return Err(format!("unexpected url: {}", target.url));
        }
        if target.count != 10 || target.concurrency != 1 {
            return Err(format!("unexpected defaults: {target:?}"));
        }
        if target.method != "GET" || target.timeout != "10s" {
            return Err(format!("unexpected defaults: {target:?}"));
        }
        Ok(())
    }

    #[test]
    fn each_url_becomes_its_own_target() -> Result<(), String> {
        let args = parse(&[
            "barrage",
            "http://a.localhost",
            "http://b.localhost",
            "-n",
            "50",
            "-c",
            "5",
        ])?;
        let targets = args.to_targets();
        if targets.len() != 2 {
            return Err(format!("expected 2 targets, got {}", targets.len()));
        }
        if !targets
            .iter()
            .all(|target| target.count == 50 && target.concurrency == 5)
        {
            return Err(format!("flags not shared across targets: {targets:?}"));
        }
        Ok(())
    }

    #[test]
    fn method_flag_is_uppercased() -> Result<(), String> {
        let args = parse(&["barrage", "http://localhost", "-X", "post"])?;
        let targets = args.to_targets();
        match targets.first() {
            Some(target) if target.method == "POST" => Ok(()),
            Some(target) => Err(format!("unexpected method: {}", target.method)),
            None => Err("expected one target".to_owned()),
        }
    }

    #[test]
    fn request_shape_flags_map_onto_the_target() -> Result<(), String> {
        let args = parse(&[
            "barrage",
            "http://localhost/items/[a-z]{3}",
            "--regex-url",
            "-H",
            "Accept: text/html",
            "--cookies",
            "session=abc",
            "--basic-auth",
            "user:pass",
            "--user-agent",
            "smoke-test",
            "-d",
            "payload",
        ])?;
        let targets = args.to_targets();
        let target = targets.first().ok_or("expected one target")?;
        if !target.regex_url {
            return Err("regex_url flag not carried".to_owned());
        }
        if target.headers != "Accept: text/html"
            || target.cookies != "session=abc"
            || target.basic_auth != "user:pass"
            || target.user_agent != "smoke-test"
            || target.body != "payload"
        {
            return Err(format!("request shape lost in mapping: {target:?}"));
        }
        Ok(())
    }

    #[test]
    fn invalid_duration_cap_is_rejected() -> Result<(), String> {
        match parse(&["barrage", "http://localhost", "--duration-cap", "soon"]) {
            Ok(args) => Err(format!("'soon' parsed: {:?}", args.duration_cap)),
            Err(_) => Ok(()),
        }
    }
}
