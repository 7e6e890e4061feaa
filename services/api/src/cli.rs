use crate::commands::{run_mortgage, run_search, MortgageArgs, SearchArgs};
use crate::server;
use clap::{Args, Parser, Subcommand};
use homefinder::error::AppError;

#[derive(Parser, Debug)]
#[command(
    name = "homefinder",
    about = "Search real estate listings and estimate mortgage payments",
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
    /// Filter and sort the listing catalog from the command line
    Search(SearchArgs),
    /// Estimate the monthly payment for a purchase
    Mortgage(MortgageArgs),
}

#[derive(Args, Debug, Default)]
pub(crate) struct ServeArgs {
    /// Override the configured host for the HTTP server
    #[arg(long)]
    pub(crate) host: Option<String>,
    /// Override the configured port for the HTTP server
    #[arg(long)]
    pub(crate) port: Option<u16>,
}

pub(crate) async fn run() -> Result<(), AppError> {
    let cli = Cli::parse();
    let command = cli
        .command
        .unwrap_or_else(|| Command::Serve(ServeArgs::default()));

    match command {
        Command::Serve(args) => server::run(args).await,
        Command::Search(args) => run_search(args),
        Command::Mortgage(args) => run_mortgage(args),
    }
}
