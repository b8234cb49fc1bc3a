mod address;
mod api;
mod cli;
mod error;
mod ledger;
mod storage;

use clap::Parser;
use tracing_subscriber::EnvFilter;

use cli::{Cli, Commands, Context};

fn init_tracing() {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .init();
}

fn run(cli: Cli) -> error::Result<()> {
    let ctx = Context::load(cli.data_dir, cli.account)?;

    match cli.command {
        Commands::Serve {
            host,
            port,
            no_persist,
        } => {
            let runtime = tokio::runtime::Runtime::new()?;
            runtime.block_on(cli::serve::execute(ctx, host, port, no_persist))
        }
        Commands::Init { known, force } => cli::init::execute(&ctx, known, force),
        command => cli::tasks::execute(&ctx, command),
    }
}

fn main() {
    init_tracing();

    // Parse command line arguments
    let cli = Cli::parse();

    if let Err(e) = run(cli) {
        eprintln!("Error: {}", e);
        std::process::exit(1);
    }
}
