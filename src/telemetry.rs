use tracing::subscriber::{set_global_default, SetGlobalDefaultError};
use tracing_subscriber::{layer::SubscriberExt, EnvFilter, Registry};

/// Installs a console subscriber; `RUST_LOG` takes precedence over `level`.
pub fn init(level: &str) -> Result<(), SetGlobalDefaultError> {
    let env_filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(level));

    let fmt_layer = tracing_subscriber::fmt::Layer::new()
        .with_writer(std::io::stderr)
        .with_target(false)
        .without_time();

    set_global_default(Registry::default().with(env_filter).with(fmt_layer))
}
