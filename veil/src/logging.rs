use tracing_subscriber::layer::SubscriberExt;
use tracing_subscriber::EnvFilter;

/// Log to stderr, with the level filter taken from `RUST_LOG` and
/// defaulting to `info`.
pub fn setup_logging() {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));
    let subscriber = tracing_subscriber::registry()
        .with(filter)
        .with(tracing_subscriber::fmt::layer().with_writer(std::io::stderr));

    tracing::subscriber::set_global_default(subscriber)
        .expect("Couldn't setup global subscriber (logger)");
}
