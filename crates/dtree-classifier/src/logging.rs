use log::LevelFilter;

/// Environment variable holding the log filter, in `env_logger` syntax.
pub const LOG_ENV_VAR: &str = "DTREE_LOG";

/// Initialise the global logger.
///
/// The level defaults to errors only and can be widened through `DTREE_LOG`
/// (falling back to `default_filter`, e.g. `"error,dtree_classifier=info"`).
/// Calling this more than once is harmless; later calls leave the first
/// logger in place.
pub fn init_logger(default_filter: &str) {
    let result = env_logger::Builder::default()
        .filter_level(LevelFilter::Error)
        .parse_env(env_logger::Env::default().filter_or(LOG_ENV_VAR, default_filter))
        .try_init();
    if result.is_err() {
        log::debug!("Logger already initialised");
    }
}
