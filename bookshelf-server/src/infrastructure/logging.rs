use anyhow::{Result, anyhow};
use tracing_subscriber::{EnvFilter, fmt};

// per-statement sqlx logs echo bound parameters
const QUIET_DIRECTIVES: &[&str] = &["sqlx::query=warn", "hyper=info"];

pub(crate) fn init_logging(default_level: &str) -> Result<()> {
    let filter = EnvFilter::try_from_default_env()
        .or_else(|_| EnvFilter::try_new(filter_directives(default_level)))
        .unwrap_or_else(|_| EnvFilter::new("info"));

    fmt()
        .with_env_filter(filter)
        .with_target(true)
        .compact()
        .try_init()
        .map_err(|e| anyhow!("failed to init logging: {e}"))?;

    Ok(())
}

fn filter_directives(default_level: &str) -> String {
    let level = default_level.trim();
    let level = if level.is_empty() { "info" } else { level };

    std::iter::once(level)
        .chain(QUIET_DIRECTIVES.iter().copied())
        .collect::<Vec<_>>()
        .join(",")
}
