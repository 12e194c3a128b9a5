use tracing_subscriber::EnvFilter;

/// Env vars consulted for a filter directive, most specific first.
const FILTER_ENV_VARS: [&str; 2] = ["BARRAGE_LOG", "RUST_LOG"];

pub fn init_logging(verbose: bool, no_color: bool) {
    let result = tracing_subscriber::fmt()
        .with_env_filter(env_filter(verbose))
        .with_ansi(!no_color)
        .try_init();
    if let Err(err) = result {
        eprintln!("logging already initialized: {err}");
    }
}

fn env_filter(verbose: bool) -> EnvFilter {
    let fallback = if verbose { "debug" } else { "info" };
    FILTER_ENV_VARS
        .iter()
        .find_map(|name| std::env::var(name).ok())
        .and_then(|value| EnvFilter::try_new(value).ok())
        .unwrap_or_else(|| EnvFilter::new(fallback))
}
