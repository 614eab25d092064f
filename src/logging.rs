use std::fs::OpenOptions;
use std::path::PathBuf;
use std::sync::Mutex;

use chrono::Local;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

/// Today's log file: ~/.hacktober/logs/hacktober-YYYY-MM-DD.log
pub fn log_path() -> Option<PathBuf> {
    let home = dirs::home_dir()?;
    let day = Local::now().format("%Y-%m-%d");
    Some(
        home.join(".hacktober")
            .join("logs")
            .join(format!("hacktober-{}.log", day)),
    )
}

/// Install the global subscriber. The terminal belongs to the TUI, so events
/// go to the log file, or nowhere if it cannot be opened.
pub fn init() -> Option<PathBuf> {
    let filter =
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("hacktober=debug"));

    let file = log_path().and_then(|path| {
        std::fs::create_dir_all(path.parent()?).ok()?;
        let file = OpenOptions::new()
            .create(true)
            .append(true)
            .open(&path)
            .ok()?;
        Some((path, file))
    });

    match file {
        Some((path, file)) => {
            tracing_subscriber::registry()
                .with(filter)
                .with(
                    tracing_subscriber::fmt::layer()
                        .with_ansi(false)
                        .with_writer(Mutex::new(file)),
                )
                .init();
            tracing::info!(
                version = env!("CARGO_PKG_VERSION"),
                log_file = %path.display(),
                "hacktober started"
            );
            Some(path)
        }
        None => {
            tracing_subscriber::registry()
                .with(filter)
                .with(tracing_subscriber::fmt::layer().with_writer(std::io::sink))
                .init();
            None
        }
    }
}
