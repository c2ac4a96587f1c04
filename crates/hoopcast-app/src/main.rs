// hoopcast entry point.
//
// Startup sequence:
// 1. Parse arguments
// 2. Initialize tracing (log to file, stdout is reserved for output)
// 3. Load config, copying defaults on first run
// 4. Build the source fetcher and load the dataset
// 5. Run the command and print its output

use hoopcast_app::cli::{self, Cli};
use hoopcast_app::config::{self, Config, SourceKindConfig};
use hoopcast_core::{Dataset, FileFetcher, HttpFetcher, SourceFetcher};

use anyhow::Context;
use clap::Parser;
use std::path::Path;
use tracing::{info, warn};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // 1. Parse arguments
    let args = Cli::parse();

    // 2. Initialize tracing
    init_tracing(&args.base_dir)?;
    info!("hoopcast starting up");

    // 3. Load config
    let config = config::load_config(&args.base_dir).context("failed to load configuration")?;
    info!(
        "Config loaded: {:?} source at {}, windows {}/{}",
        config.sources.kind, config.sources.root, config.view.short_window, config.view.long_window
    );

    // 4. Load every source; failures degrade to empty collections
    let fetcher = build_fetcher(&config, &args)?;
    let dataset = Dataset::load(fetcher.as_ref(), &config.sources.names).await;
    if dataset.report().all_failed() {
        warn!("No source could be loaded from {}", config.sources.root);
    }

    // 5. Run the command
    let output = cli::run(&args.command, &dataset, &config.view)?;
    print!("{output}");

    info!("hoopcast finished");
    Ok(())
}

/// Pick the transport named in config. A relative file root resolves
/// against `--base-dir`.
fn build_fetcher(config: &Config, args: &Cli) -> anyhow::Result<Box<dyn SourceFetcher>> {
    let sources = &config.sources;
    let fetcher: Box<dyn SourceFetcher> = match sources.kind {
        SourceKindConfig::File => Box::new(FileFetcher::new(args.base_dir.join(&sources.root))),
        SourceKindConfig::Http => Box::new(
            HttpFetcher::new(sources.root.clone(), sources.timeout())
                .context("failed to set up HTTP source")?,
        ),
    };
    Ok(fetcher)
}

/// Initialize tracing to log to `<base_dir>/logs` (not the terminal, which
/// carries command output).
fn init_tracing(base_dir: &Path) -> anyhow::Result<()> {
    use tracing_subscriber::fmt;
    use tracing_subscriber::EnvFilter;

    let log_path = config::log_path(base_dir);
    if let Some(log_dir) = log_path.parent() {
        std::fs::create_dir_all(log_dir)?;
    }

    let log_file = std::fs::File::create(&log_path)?;

    let subscriber = fmt::Subscriber::builder()
        .with_env_filter(
            EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| EnvFilter::new("hoopcast_core=info,hoopcast_app=info,warn")),
        )
        .with_writer(log_file)
        .with_ansi(false)
        .with_target(true)
        .with_line_number(true)
        .finish();

    tracing::subscriber::set_global_default(subscriber)
        .context("failed to set tracing subscriber")?;

    Ok(())
}
