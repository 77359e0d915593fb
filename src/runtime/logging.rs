use std::fs::OpenOptions;
use std::sync::Mutex;

use tracing_subscriber::{EnvFilter, layer::SubscriberExt, util::SubscriberInitExt};

use crate::config::LoggingSettings;

/// Install the global subscriber. Logs go to `logging.file` only; the
/// terminal is owned by the UI. `ENCORE_LOG` overrides `logging.level`.
pub fn init(settings: &LoggingSettings) {
    let Some(path) = &settings.file else {
        return;
    };

    let file = match OpenOptions::new().create(true).append(true).open(path) {
        Ok(f) => f,
        Err(e) => {
            eprintln!("encore: cannot open log file {}: {e}", path.display());
            return;
        }
    };

    let filter = EnvFilter::try_from_env("ENCORE_LOG")
        .or_else(|_| EnvFilter::try_new(&settings.level))
        .unwrap_or_else(|_| EnvFilter::new("info"));

    let result = tracing_subscriber::registry()
        .with(filter)
        .with(
            tracing_subscriber::fmt::layer()
                .with_ansi(false)
                .with_writer(Mutex::new(file)),
        )
        .try_init();

    if let Err(e) = result {
        eprintln!("encore: logging disabled: {e}");
    }
}
