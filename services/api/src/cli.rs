use clap::{Args, Parser, Subcommand};
use kpi_board::error::AppError;

use crate::demo::{run_demo, run_scoreboard, DemoArgs, ScoreboardArgs};
use crate::server;

#[derive(Parser, Debug)]
#[command(
    name = "Provincial KPI Scoreboard",
    about = "Serve and inspect the provincial KPI reporting dashboard from the command line",
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
    /// Render the evaluated scoreboard and dashboard summary to stdout
    Scoreboard(ScoreboardArgs),
    /// Run a seeded end-to-end demo with sample district submissions
    Demo(DemoArgs),
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
        Command::Scoreboard(args) => run_scoreboard(args),
        Command::Demo(args) => run_demo(args),
    }
}
