use std::fs::OpenOptions;
use std::path::{Path, PathBuf};
use std::sync::Mutex;
use std::time::Duration;

use anyhow::Result;
use clap::Parser;
use tracing_subscriber::{EnvFilter, FmtSubscriber};

use stardust::connector::tui;
use stardust::{Commands, Container, ContainerConfig, Router};

#[derive(Parser)]
#[command(name = "stardust")]
#[command(author, version, about, long_about = None)]
struct Cli {
    #[arg(short, long, global = true)]
    verbose: bool,

    /// Answer offline instead of calling the Gemini API
    #[arg(long, global = true)]
    mock: bool,

    /// Pause before each request, in milliseconds
    #[arg(long, global = true, default_value = "1000")]
    pacing_ms: u64,

    /// Append logs to this file (the chat screen logs nowhere otherwise)
    #[arg(long, global = true)]
    log_file: Option<PathBuf>,

    #[command(subcommand)]
    command: Option<Commands>,
}

fn init_logging(verbose: bool, log_file: Option<&Path>, interactive: bool) -> Result<()> {
    let default_directive = if verbose { "stardust=debug" } else { "stardust=warn" };
    let filter =
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default_directive));
    let builder = FmtSubscriber::builder()
        .with_env_filter(filter)
        .with_target(false);

    match log_file {
        Some(path) => {
            let file = OpenOptions::new().create(true).append(true).open(path)?;
            let subscriber = builder.with_ansi(false).with_writer(Mutex::new(file)).finish();
            tracing::subscriber::set_global_default(subscriber)?;
        }
        // Writing to the terminal would corrupt the chat screen.
        None if interactive => {}
        None => {
            let subscriber = builder.with_writer(std::io::stderr).finish();
            tracing::subscriber::set_global_default(subscriber)?;
        }
    }

    Ok(())
}

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();
    let command = cli.command.unwrap_or(Commands::Chat);
    let interactive = matches!(command, Commands::Chat);

    init_logging(cli.verbose, cli.log_file.as_deref(), interactive)?;

    // Suggestions never reach the model, so they need no credentials.
    let needs_generator = !matches!(command, Commands::Suggest { .. });

    let container = Container::new(ContainerConfig {
        mock: cli.mock || !needs_generator,
        pacing_delay: Duration::from_millis(cli.pacing_ms),
    })?;

    match command {
        Commands::Chat => tui::run(container.chat_session()).await,
        command => {
            let router = Router::new(&container);
            let output = router.route(command).await?;
            println!("{}", output);
            Ok(())
        }
    }
}
