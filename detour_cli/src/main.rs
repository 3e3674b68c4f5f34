use clap::{Parser, Subcommand};
use detour_planner::config::PlannerConfig;
use mimalloc::MiMalloc;

use crate::{
    closures::{ClosuresArgs, StatusArgs},
    decode::DecodeArgs,
    route::RouteArgs,
};

mod closures;
mod decode;
mod parsers;
mod route;

#[global_allocator]
static GLOBAL: MiMalloc = MiMalloc;

#[derive(Parser)]
#[clap(author, version, about, long_about = None)]
struct Cli {
    #[command(subcommand)]
    command: Option<Commands>,

    #[arg(short, long)]
    debug: bool,
}

#[derive(Subcommand)]
enum Commands {
    /// Compares the direct route with the one avoiding closures
    #[command(visible_alias = "r")]
    Route {
        #[command(flatten)]
        args: RouteArgs,
    },
    /// Lists the closures of an area
    #[command(visible_alias = "c")]
    Closures {
        #[command(flatten)]
        args: ClosuresArgs,
    },
    /// Closure counts by type and status
    Stats,
    /// Changes the status of a closure, needs DETOUR_CLOSURES_API_TOKEN
    Status {
        #[command(flatten)]
        args: StatusArgs,
    },
    /// Decodes an encoded polyline
    Decode {
        #[command(flatten)]
        args: DecodeArgs,
    },
}

#[tokio::main]
async fn main() -> Result<(), anyhow::Error> {
    dotenvy::from_filename("./.env.local").ok();

    let cli = Cli::parse();
    tracing_subscriber::fmt()
        .with_max_level(if cli.debug {
            tracing::Level::DEBUG
        } else {
            tracing::Level::INFO
        })
        .init();

    let config = PlannerConfig::from_env()?;

    match cli.command {
        Some(Commands::Route { args }) => route::run(args, &config).await?,
        Some(Commands::Closures { args }) => closures::run(args, &config).await?,
        Some(Commands::Stats) => closures::statistics(&config).await?,
        Some(Commands::Status { args }) => closures::update_status(args, &config).await?,
        Some(Commands::Decode { args }) => decode::run(args)?,
        None => {}
    }

    Ok(())
}
