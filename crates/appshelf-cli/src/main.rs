//! CLI entry point.
//!
//! Initializes logging, parses arguments, bootstraps the [`CliContext`]
//! and dispatches to a handler. A [`CliError`] from a handler selects the
//! process exit code.

use clap::{CommandFactory, Parser};
use tracing_subscriber::EnvFilter;

use appshelf_cli::{Cli, CliConfig, CliError, Commands, bootstrap, handlers};

fn init_tracing(verbose: bool) {
    let default_level = if verbose { "debug" } else { "info" };
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default_level));
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .init();
}

async fn run(cli: Cli) -> anyhow::Result<()> {
    let Some(command) = cli.command else {
        Cli::command().print_help()?;
        return Ok(());
    };

    let mut config = CliConfig::new(cli.data_dir);
    if let Commands::Download {
        no_install: true, ..
    } = &command
    {
        config = config.with_auto_install(false);
    }
    let ctx = bootstrap(config)?;

    match command {
        Commands::List => handlers::list::execute(&ctx).await,
        Commands::Download { key, .. } => handlers::download::execute(&ctx, &key).await,
        Commands::Permissions { command } => handlers::permissions::execute(&ctx, command).await,
        Commands::Settings { command } => handlers::settings::execute(&ctx, command),
        Commands::Paths => handlers::paths::execute(&ctx),
    }
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // Load .env before clap reads APPSHELF_DATA_DIR
    dotenvy::dotenv().ok();

    let cli = Cli::parse();
    init_tracing(cli.verbose);

    if let Err(err) = run(cli).await {
        if let Some(cli_err) = err.downcast_ref::<CliError>() {
            eprintln!("Error: {cli_err}");
            std::process::exit(cli_err.exit_code());
        }
        return Err(err);
    }
    Ok(())
}
