use tracing::level_filters::LevelFilter;
use tracing_subscriber::{
    EnvFilter, filter::Targets, fmt, prelude::__tracing_subscriber_SubscriberExt,
    util::SubscriberInitExt,
};

const APP_TARGET: &str = "coinfx";

/// Filter applied to this crate's own events.
fn app_targets(verbose: bool) -> Targets {
    let level = if verbose {
        LevelFilter::DEBUG
    } else {
        LevelFilter::OFF
    };
    Targets::new().with_target(APP_TARGET, level)
}

/// Directive used when `RUST_LOG` is unset or unreadable.
fn default_directive(verbose: bool) -> &'static str {
    if verbose { "debug" } else { "off" }
}

/// Installs the global subscriber. Crate events only show with `verbose`.
pub fn init_logging(verbose: bool) {
    let env_filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new(default_directive(verbose)));

    tracing_subscriber::registry()
        .with(fmt::layer().pretty().without_time())
        .with(app_targets(verbose))
        .with(env_filter)
        .init();
}
