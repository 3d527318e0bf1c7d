//! shelver: watches a download inbox and shelves arriving books into a
//! categorised library.

mod cli;
mod logging;

use crate::cli::{Cli, Command};
use clap::Parser;
use miette::IntoDiagnostic;
use shelver_classify::{AnthropicClassifier, ClassifierHandle};
use shelver_config::Config;
use shelver_library::{Context, FolderMode, Layout, Service, organize};
use shelver_storage::{BackendHandle, LocalBackend};
use std::error::Error as StdError;
use std::path::Path;
use std::sync::Arc;
use tokio::signal;

#[tokio::main]
async fn main() -> miette::Result<()> {
    let cli = Cli::parse();
    let config = Config::load(cli.config.as_deref(), &cli.overrides()).map_err(report)?;
    let _log_guard = logging::init(config.log_file.as_deref())?;
    tracing::debug!(?config, "Loaded configuration");

    match cli.command.unwrap_or_default() {
        Command::Watch => {
            Service::new(context(&config)?).run(shutdown_signal()).await.map_err(report)?;
            tracing::info!("Shelver stopped");
        },
        Command::Once => {
            let outcomes = Service::new(context(&config)?).run_once().await.map_err(report)?;
            tracing::info!(count = outcomes.len(), "Inbox processed");
        },
        Command::Inspect { file } => inspect(&config, &file).await?,
    }
    Ok(())
}

/// Renders the full `exn` tree, locations included.
fn report<E: StdError + Send + Sync + 'static>(error: exn::Exn<E>) -> miette::Report {
    miette::miette!("{error:?}")
}

fn classifier(config: &Config) -> miette::Result<ClassifierHandle> {
    let settings = &config.classifier;
    let classifier = AnthropicClassifier::new(settings.api_key.clone(), settings.timeout())
        .map_err(report)?
        .with_model(&settings.model)
        .with_max_tokens(settings.max_tokens)
        .with_endpoint(&settings.endpoint);
    if !classifier.has_credential() {
        tracing::warn!("No ANTHROPIC_API_KEY configured, everything will be filed as unsorted");
    }
    Ok(Arc::new(classifier))
}

fn context(config: &Config) -> miette::Result<Context> {
    let backend: BackendHandle = Arc::new(LocalBackend::new("local"));
    let layout = Layout {
        author_folders: config.layout.author_folders,
        title_filenames: config.layout.title_filenames,
        unknown_author: config.layout.unknown_author.clone(),
    };
    let folders = FolderMode { enabled: config.folders.enabled, fallback: config.folders.fallback };
    Ok(Context::new(&config.inbox, &config.library, backend, classifier(config)?)
        .with_delay(config.stabilization.delay())
        .with_min_size(config.stabilization.min_size)
        .with_layout(layout)
        .with_folders(folders))
}

/// Dry run for a single file: what would be extracted, how it would be
/// classified and where it would go (before collision suffixes).
async fn inspect(config: &Config, file: &Path) -> miette::Result<()> {
    if !file.is_file() {
        miette::bail!("not a file: {}", file.display());
    }
    let ctx = context(config)?;
    let owned = file.to_path_buf();
    let metadata = tokio::task::spawn_blocking(move || shelver_extract::extract(owned)).await.into_diagnostic()?;
    let original = file.file_name().map(|name| name.to_string_lossy().into_owned()).unwrap_or_default();
    let category = ctx.classifier.classify(&metadata, &original).await;
    let destination = organize::directory(&ctx.library, category, &metadata.author, &ctx.layout)
        .map_err(report)?
        .join(organize::filename(&metadata, &original, &ctx.layout));

    let output = serde_json::json!({
        "file": file,
        "supported": shelver_extract::is_supported(file),
        "metadata": metadata,
        "category": category.as_str(),
        "destination": destination,
    });
    println!("{}", serde_json::to_string_pretty(&output).into_diagnostic()?);
    Ok(())
}

async fn shutdown_signal() {
    let ctrl_c = async {
        if let Err(error) = signal::ctrl_c().await {
            tracing::error!(error = %error, "Could not listen for Ctrl+C");
            std::future::pending::<()>().await;
        }
    };

    #[cfg(unix)]
    let terminate = async {
        match signal::unix::signal(signal::unix::SignalKind::terminate()) {
            Ok(mut stream) => {
                stream.recv().await;
            },
            Err(error) => {
                tracing::error!(error = %error, "Could not listen for SIGTERM");
                std::future::pending::<()>().await;
            },
        }
    };

    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    tokio::select! {
        () = ctrl_c => tracing::info!("Received Ctrl+C, shutting down"),
        () = terminate => tracing::info!("Received SIGTERM, shutting down"),
    }
}
