use tracing_subscriber::{fmt, prelude::*, EnvFilter};

const DEFAULT_FILTER: &str = "info,actix_web=info,sqlx=warn,sea_orm=warn";

/// Install the global subscriber. `RUST_LOG` overrides the default filter;
/// `LOG_FORMAT=pretty` swaps the JSON lines for human-readable output.
pub fn init_tracing() {
    let env_filter =
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(DEFAULT_FILTER));
    let pretty = std::env::var("LOG_FORMAT").is_ok_and(|v| v.eq_ignore_ascii_case("pretty"));

    let base = fmt::layer()
        .with_target(pretty)
        .with_file(false)
        .with_line_number(false)
        .with_thread_ids(false)
        .with_thread_names(false);

    let registry = tracing_subscriber::registry().with(env_filter);
    if pretty {
        registry.with(base.pretty()).init();
    } else {
        registry.with(base.with_ansi(false).json()).init();
    }
}
