use anyhow::Context as _;
use tracing_subscriber::EnvFilter;

pub const DEFAULT_FILTER: &str = "bookshelf=info,tower_http=debug";

/// Installs the global stderr subscriber. A non-empty `RUST_LOG` wins over
/// `default_filter`, which normally comes from `--log-filter`.
pub fn init(default_filter: &str) -> anyhow::Result<()> {
    let filter = build_filter(std::env::var("RUST_LOG").ok().as_deref(), default_filter)?;

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_target(false)
        .with_writer(std::io::stderr)
        .try_init()
        .map_err(|err| anyhow::anyhow!("initialize tracing subscriber: {err}"))?;

    Ok(())
}

fn build_filter(env_filter: Option<&str>, default_filter: &str) -> anyhow::Result<EnvFilter> {
    match env_filter.map(str::trim).filter(|v| !v.is_empty()) {
        Some(directives) => {
            EnvFilter::try_new(directives).with_context(|| format!("parse RUST_LOG={directives:?}"))
        }
        None => EnvFilter::try_new(default_filter)
            .with_context(|| format!("parse log filter {default_filter:?}")),
    }
}
