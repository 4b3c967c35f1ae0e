use anyhow::Context;
use clap::{Parser, Subcommand};
use configuration::{LogFormat, LoggingSettings};
use std::path::PathBuf;
use tracing_appender::non_blocking::WorkerGuard;
use tracing_subscriber::{
    fmt, layer::SubscriberExt, util::SubscriberInitExt, EnvFilter, Layer,
};

/// The main entry point for the grade statistics service.
#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // Load environment variables (DATABASE_URL, RUST_LOG) from .env if present.
    dotenvy::dotenv().ok();

    let cli = Cli::parse();

    match cli.command {
        Commands::Serve(args) => handle_serve(args).await,
        Commands::Docs(args) => {
            let _guard = init_tracing(&LoggingSettings::default());
            let path = web_server::openapi::write_docs(&args.output)
                .with_context(|| format!("writing documentation to {}", args.output.display()))?;
            println!("Documentation written to {}", path.display());
            Ok(())
        }
    }
}

// ==============================================================================
// CLI Structure
// ==============================================================================

/// Read-only statistics API over course grades.
#[derive(Parser)]
#[command(author, version, about, long_about = None)]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Serve the statistics HTTP API.
    Serve(ServeArgs),
    /// Generate the static API documentation page.
    Docs(DocsArgs),
}

#[derive(Parser)]
struct ServeArgs {
    /// Configuration file (defaults to ./config.toml when present).
    #[arg(long)]
    config: Option<PathBuf>,

    /// Override the listening port.
    #[arg(long)]
    port: Option<u16>,

    /// Override the console log format.
    #[arg(long, value_enum)]
    log_format: Option<LogFormat>,
}

#[derive(Parser)]
struct DocsArgs {
    /// Directory that receives index.html.
    #[arg(long, default_value = "docs")]
    output: PathBuf,
}

// ==============================================================================
// Serve Command Logic
// ==============================================================================

async fn handle_serve(args: ServeArgs) -> anyhow::Result<()> {
    let mut settings =
        configuration::load_config(args.config.as_deref()).context("loading configuration")?;
    if let Some(port) = args.port {
        settings.server.port = port;
    }
    if let Some(format) = args.log_format {
        settings.logging.format = format;
    }
    settings.validate()?;

    // Keeps the file writer flushing until the server stops.
    let _guard = init_tracing(&settings.logging);

    web_server::run_server(&settings).await
}

/// Console output (pretty or JSON) filtered by `RUST_LOG`, falling back to the
/// configured level, plus a daily rolling JSON file when a directory is set.
fn init_tracing(logging: &LoggingSettings) -> Option<WorkerGuard> {
    let console_filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new(&logging.level));
    let console_layer = match logging.format {
        LogFormat::Pretty => fmt::layer()
            .with_target(true)
            .with_writer(std::io::stderr)
            .with_filter(console_filter)
            .boxed(),
        LogFormat::Json => fmt::layer()
            .json()
            .with_current_span(true)
            .with_writer(std::io::stderr)
            .with_filter(console_filter)
            .boxed(),
    };

    let (file_layer, guard) = match &logging.directory {
        Some(directory) => {
            let file_appender = tracing_appender::rolling::daily(directory, "grade-stats.log");
            let (non_blocking_file, guard) = tracing_appender::non_blocking(file_appender);
            let layer = fmt::layer()
                .json()
                .with_current_span(true)
                .with_span_list(true)
                .with_writer(non_blocking_file)
                .with_filter(EnvFilter::new(&logging.level));
            (Some(layer), Some(guard))
        }
        None => (None, None),
    };

    tracing_subscriber::registry()
        .with(console_layer)
        .with(file_layer)
        .init();

    guard
}
