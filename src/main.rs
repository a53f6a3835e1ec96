use clap::{Parser, Subcommand};
use anyhow::Result;
use dotenvy::dotenv;

mod config;
mod queries;
mod record;
mod export;
mod search;
mod channel;
mod run;
mod youtube;
mod extract;
mod util;
mod output;
mod telemetry;

#[derive(Parser)]
#[command(name = "channel-scout", about = "Discover YouTube channels by topic and export their public contacts")]
struct Cli {
    /// Emit a single JSON envelope to stdout; logs go to stderr
    #[arg(global = true, long, default_value_t = false)]
    json: bool,

    #[command(subcommand)]
    command: Option<Commands>,
}

#[derive(Subcommand)]
enum Commands {
    Run(run::RunCmd),
    Search(search::SearchCmd),
    Channel(channel::ChannelCmd),
    Queries(queries::QueriesCmd),
}

#[tokio::main]
async fn main() -> Result<()> {
    dotenv().ok();
    let cli = Cli::parse();
    telemetry::config::set_json_mode(cli.json);

    // initialize logging/tracing (stderr). Respect RUST_LOG and SCOUT_LOG_FORMAT
    telemetry::config::init_tracing();

    let cfg = config::ScoutConfig::from_env();

    match cli.command {
        // bare invocation runs the whole pipeline with defaults
        None => run::run(&cfg, run::RunCmd::default()).await?,
        Some(Commands::Run(args)) => run::run(&cfg, args).await?,
        Some(Commands::Search(args)) => search::run(args).await?,
        Some(Commands::Channel(args)) => channel::run(&cfg, args).await?,
        Some(Commands::Queries(args)) => queries::run(args)?,
    }

    Ok(())
}
