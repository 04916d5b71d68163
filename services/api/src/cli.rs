use crate::report::{run_deadline_report, run_pwd_lookup, DeadlineReportArgs, PwdArgs};
use crate::server;
use clap::{Args, Parser, Subcommand};
use perm_tracker::error::AppError;

#[derive(Parser, Debug)]
#[command(
    name = "PERM Deadline Tracker",
    about = "Compute PERM labor-certification deadlines and serve them over HTTP",
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
    /// Inspect deadlines without starting the server
    Deadlines {
        #[command(subcommand)]
        command: DeadlinesCommand,
    },
}

#[derive(Subcommand, Debug)]
enum DeadlinesCommand {
    /// Print the full deadline report for a case stored as JSON
    Report(DeadlineReportArgs),
    /// Print the expiration for a prevailing wage determination date
    Pwd(PwdArgs),
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
        Command::Deadlines {
            command: DeadlinesCommand::Report(args),
        } => run_deadline_report(args),
        Command::Deadlines {
            command: DeadlinesCommand::Pwd(args),
        } => run_pwd_lookup(args),
    }
}
