use miette::{Context, IntoDiagnostic};
use std::path::Path;
use tracing_appender::non_blocking::{NonBlocking, WorkerGuard};
use tracing_appender::rolling::{RollingFileAppender, Rotation};
use tracing_subscriber::layer::SubscriberExt;
use tracing_subscriber::util::SubscriberInitExt;
use tracing_subscriber::{EnvFilter, fmt};

/// Used when `RUST_LOG` is unset.
const DEFAULT_FILTER: &str = "shelver=info";

/// Logs to stderr and, if given, appends (without colour) to `log_file`.
///
/// File output is written from a background thread; keep the returned guard
/// alive until exit or buffered lines are lost.
pub fn init(log_file: Option<&Path>) -> miette::Result<Option<WorkerGuard>> {
    let (file, guard) = match log_file {
        Some(path) => {
            let (writer, guard) = file_writer(path)?;
            (Some(writer), Some(guard))
        },
        None => (None, None),
    };

    tracing_subscriber::registry()
        .with(EnvFilter::try_from_default_env().unwrap_or_else(|_| DEFAULT_FILTER.into()))
        .with(fmt::layer().with_writer(std::io::stderr))
        .with(file.map(|writer| fmt::layer().with_ansi(false).with_writer(writer)))
        .init();
    Ok(guard)
}

/// A single, never rotated log file.
fn file_writer(path: &Path) -> miette::Result<(NonBlocking, WorkerGuard)> {
    let Some(name) = path.file_name() else {
        miette::bail!("log file {} has no file name", path.display());
    };
    let directory = match path.parent() {
        Some(parent) if !parent.as_os_str().is_empty() => parent,
        _ => Path::new("."),
    };
    let appender = RollingFileAppender::builder()
        .rotation(Rotation::NEVER)
        .filename_prefix(name.to_string_lossy())
        .build(directory)
        .into_diagnostic()
        .wrap_err_with(|| format!("cannot open log file {}", path.display()))?;
    Ok(tracing_appender::non_blocking(appender))
}
