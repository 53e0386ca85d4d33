use tracing_subscriber::{EnvFilter, layer::SubscriberExt, util::SubscriberInitExt};

/// Log to stderr so grids and JSON on stdout stay clean.
///
/// `RUST_LOG` wins over the defaults.
pub fn init_logger(verbose: bool) {
    let default = if verbose {
        "staycal=debug,staycal_core=debug"
    } else {
        "staycal=info,staycal_core=error"
    };
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default));

    tracing_subscriber::registry()
        .with(filter)
        .with(
            tracing_subscriber::fmt::layer()
                .with_writer(std::io::stderr)
                .with_target(false)
                .with_file(false)
                .with_line_number(false)
                .compact(),
        )
        .init();
}
