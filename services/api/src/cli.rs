use crate::demo::{run_demo, run_pool_rank, DemoArgs, PoolRankArgs};
use crate::server;
use clap::{Args, Parser, Subcommand};
use devpool::error::AppError;
use std::path::PathBuf;

#[derive(Parser, Debug)]
#[command(
    name = "Developer Pool",
    about = "Score, browse, and propose developers for open job requirements",
    version
)]
struct Cli {
    #[command(subcommand)]
    command: Option<Command>,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Start the HTTP service (default command)
    Serve(ServeArgs),
    /// Inspect a developer roster against a requirement
    Pool {
        #[command(subcommand)]
        command: PoolCommand,
    },
    /// Walk through ranking, selection, and a bulk proposal on a sample roster
    Demo(DemoArgs),
}

#[derive(Subcommand, Debug)]
enum PoolCommand {
    /// Rank a CSV roster against a requirement and print the best matches
    Rank(PoolRankArgs),
}

#[derive(Args, Debug, Default)]
pub(crate) struct ServeArgs {
    /// Override the configured host for the HTTP server
    #[arg(long)]
    pub(crate) host: Option<String>,
    /// Override the configured port for the HTTP server
    #[arg(long)]
    pub(crate) port: Option<u16>,
    /// CSV roster to serve instead of the built-in sample developers
    #[arg(long)]
    pub(crate) roster: Option<PathBuf>,
}

pub(crate) async fn run() -> Result<(), AppError> {
    let cli = Cli::parse();
    let command = cli
        .command
        .unwrap_or_else(|| Command::Serve(ServeArgs::default()));

    match command {
        Command::Serve(args) => server::run(args).await,
        Command::Pool {
            command: PoolCommand::Rank(args),
        } => run_pool_rank(args),
        Command::Demo(args) => run_demo(args).await,
    }
}
