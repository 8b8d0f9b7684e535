use crate::report::{print_catalog, run_score, ScoreArgs};
use crate::server;
use clap::{Args, Parser, Subcommand};
use futurewife::error::AppError;

#[derive(Parser, Debug)]
#[command(
    name = "futurewife",
    about = "Serve and run the futurewife compatibility quiz from the command line",
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
    /// Score a submission file and print the evaluation
    Score(ScoreArgs),
    /// Print the question catalog served to clients
    Questions,
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
        Command::Score(args) => run_score(args),
        Command::Questions => print_catalog(),
    }
}
