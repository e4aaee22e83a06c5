use clap::Parser;
use tracing_subscriber::prelude::__tracing_subscriber_SubscriberExt;

#[tokio::main]
async fn main() -> std::process::ExitCode {
    let registry = tracing_subscriber::Registry::default()
        .with(tracing_subscriber::fmt::layer())
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new("info")),
        )
        .with(tracing_subscriber::filter::filter_fn(|meta| {
            meta.target().contains("exporter") || meta.target().contains("analysis")
        }));
    if let Err(e) = tracing::subscriber::set_global_default(registry) {
        eprintln!("Setting up logging: {}", e);
    }

    let config = exporter::Config::from(exporter::Cli::parse());

    let files = match exporter::discover::find_demos(&config.paths) {
        Ok(f) => f,
        Err(e) => {
            tracing::error!("{}", e);
            return std::process::ExitCode::FAILURE;
        }
    };
    if files.is_empty() {
        println!("There are no demos in the provided path");
        return std::process::ExitCode::SUCCESS;
    }

    tracing::info!(jobs = config.jobs, "Processing {} demos", files.len());
    let summary = exporter::batch::run(files, &config).await;

    tracing::info!(
        exported = summary.exported,
        skipped = summary.skipped,
        failed = summary.failed.len(),
        "Done"
    );
    for (path, reason) in summary.failed.iter() {
        tracing::warn!(?path, "{}", reason);
    }

    if summary.failed.is_empty() {
        std::process::ExitCode::SUCCESS
    } else {
        std::process::ExitCode::FAILURE
    }
}
