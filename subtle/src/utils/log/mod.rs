use tracing_subscriber::{fmt, layer::SubscriberExt, EnvFilter};

/// Log to stderr, filtered by `RUST_LOG` or else by `fallback`.
pub fn setup_logging(fallback: &str) {
    let filter = EnvFilter::try_from_default_env()
        .or_else(|_| EnvFilter::try_new(fallback))
        .unwrap_or_else(|err| {
            eprintln!("Invalid log filter `{fallback}`: {err}");
            EnvFilter::new("info")
        });

    let subscriber = tracing_subscriber::registry()
        .with(filter)
        .with(fmt::layer().with_writer(std::io::stderr));

    if let Err(err) = tracing::subscriber::set_global_default(subscriber) {
        eprintln!("Couldn't setup global subscriber (logger): {err}");
    }
}
