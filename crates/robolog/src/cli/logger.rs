use env_logger::{Builder, Env};

/// Library diagnostics go to stderr. `RUST_LOG` overrides the level picked here.
pub fn init(verbose: bool) {
    let level = if verbose { "debug" } else { "warn" };
    // A second init (e.g. from tests) is not an error worth failing on.
    let _ = Builder::from_env(Env::default().default_filter_or(level))
        .format_timestamp_millis()
        .format_module_path(true)
        .try_init();
}
