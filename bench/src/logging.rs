use tracing_subscriber::{fmt, prelude::*, EnvFilter};

/// Default filter when neither `FINDROUTES_LOG` nor `RUST_LOG` is set.
const DEFAULT_FILTER: &str = "findroutes=info";

/// Install the global tracing subscriber. Logs go to stderr so the
/// measurement output on stdout stays clean.
pub fn init_tracing(log_json: bool) -> Result<(), Box<dyn std::error::Error>> {
    let filter = EnvFilter::try_from_env("FINDROUTES_LOG")
        .or_else(|_| EnvFilter::try_from_default_env())
        .unwrap_or_else(|_| EnvFilter::new(DEFAULT_FILTER));

    let registry = tracing_subscriber::registry().with(filter);

    if log_json {
        registry
            .with(
                fmt::layer()
                    .json()
                    .with_writer(std::io::stderr)
                    .with_ansi(false),
            )
            .try_init()?;
    } else {
        registry
            .with(
                fmt::layer()
                    .compact()
                    .with_target(false)
                    .with_writer(std::io::stderr)
                    .with_ansi(false),
            )
            .try_init()?;
    }

    Ok(())
}
