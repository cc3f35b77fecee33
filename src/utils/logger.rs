use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

const DEFAULT_FILTER: &str = "inventory_alert=info";
const VERBOSE_FILTER: &str = "inventory_alert=debug,info";

/// `RUST_LOG` overrides the filter picked from `verbose`.
pub fn filter_directive(verbose: bool) -> String {
    std::env::var(EnvFilter::DEFAULT_ENV)
        .ok()
        .filter(|d| !d.trim().is_empty())
        .unwrap_or_else(|| {
            if verbose {
                VERBOSE_FILTER.to_string()
            } else {
                DEFAULT_FILTER.to_string()
            }
        })
}

/// Compact lines for terminals, JSON lines when `json` is set (scheduled runs
/// whose output goes to a log collector).
pub fn init_logger(verbose: bool, json: bool) {
    let filter = EnvFilter::try_new(filter_directive(verbose))
        .unwrap_or_else(|_| EnvFilter::new(DEFAULT_FILTER));

    let fmt_layer = tracing_subscriber::fmt::layer()
        .with_target(false)
        .with_thread_ids(false)
        .with_file(false)
        .with_line_number(false);

    let registry = tracing_subscriber::registry().with(filter);
    if json {
        registry.with(fmt_layer.json()).init();
    } else {
        registry.with(fmt_layer.compact()).init();
    }
}
