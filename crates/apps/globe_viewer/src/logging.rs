use std::sync::Once;

static INIT: Once = Once::new();

/// Install the global tracing subscriber. Safe to call more than once.
///
/// Browser builds log to the devtools console; native builds (tests,
/// tooling) log to stderr filtered by `RUST_LOG`, defaulting to `info`.
pub fn init_logging() {
    INIT.call_once(install);
}

#[cfg(target_arch = "wasm32")]
fn install() {
    tracing_wasm::set_as_global_default();
}

#[cfg(not(target_arch = "wasm32"))]
fn install() {
    use tracing_subscriber::EnvFilter;

    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));
    // Another subscriber may already be installed by a test harness.
    let _ = tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_test_writer()
        .try_init();
}

#[cfg(test)]
mod tests {
    use super::init_logging;

    #[test]
    fn init_is_idempotent() {
        init_logging();
        init_logging();
        tracing::info!("logging initialised twice without panicking");
    }
}
