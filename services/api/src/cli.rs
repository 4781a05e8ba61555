use crate::demo::{run_demo, run_previews, DemoArgs, PreviewArgs};
use crate::server;
use clap::{Args, Parser, Subcommand};
use sheaf::error::AppError;

#[derive(Parser, Debug)]
#[command(
    name = "Worksheet Catalog API",
    about = "Serve and inspect the printable worksheet catalog from the command line",
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
    /// Walk the catalog with demo data and print what the API would serve
    Demo(DemoArgs),
    /// Derive the thumbnail and preview images for a PDF on disk
    Previews(PreviewArgs),
}

#[derive(Args, Debug, Default)]
pub(crate) struct ServeArgs {
    /// Override the configured host for the HTTP server
    #[arg(long)]
    pub(crate) host: Option<String>,
    /// Override the configured port for the HTTP server
    #[arg(long)]
    pub(crate) port: Option<u16>,
    /// Seed the in-memory catalog with demo data on startup
    #[arg(long)]
    pub(crate) demo_data: bool,
}

pub(crate) async fn run() -> Result<(), AppError> {
    let cli = Cli::parse();
    let command = cli
        .command
        .unwrap_or_else(|| Command::Serve(ServeArgs::default()));

    match command {
        Command::Serve(args) => server::run(args).await,
        Command::Demo(args) => run_demo(args),
        Command::Previews(args) => run_previews(args),
    }
}
