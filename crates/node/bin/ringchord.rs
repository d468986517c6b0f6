use std::path::PathBuf;
use std::time::Duration;

use clap::Args;
use clap::Parser;
use clap::Subcommand;
use ringchord_node::config::Config;
use ringchord_node::config::DEFAULT_CONFIG_PATH;
use ringchord_node::logging::init_logging;
use ringchord_node::logging::LogLevel;
use ringchord_node::simulation::Simulation;
use ringchord_node::util;

#[derive(Parser, Debug)]
#[command(about, version, author)]
struct Cli {
    #[arg(long, default_value_t = LogLevel::Info, value_enum, env, global = true)]
    log_level: LogLevel,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand, Debug)]
#[command(rename_all = "kebab-case")]
enum Command {
    /// Run a simulated ring and print a snapshot of every node.
    Run(RunArgs),
    /// Write the default configuration to a file.
    InitConfig(InitConfigArgs),
}

#[derive(Args, Debug)]
struct RunArgs {
    #[arg(long, short = 'c', env = "RINGCHORD_CONFIG", help = "yaml config file")]
    config: Option<PathBuf>,

    #[arg(long, short = 'n', help = "count of nodes, overrides the config file")]
    nodes: Option<usize>,

    #[arg(long, help = "run time in seconds, overrides the config file")]
    seconds: Option<u64>,

    #[arg(long, help = "stop as soon as the ring is consistent")]
    until_consistent: bool,
}

#[derive(Args, Debug)]
struct InitConfigArgs {
    #[arg(default_value = DEFAULT_CONFIG_PATH)]
    location: PathBuf,
}

async fn run(args: RunArgs) -> anyhow::Result<()> {
    let mut config = Config::load(args.config.as_ref())?;
    if let Some(nodes) = args.nodes {
        config.nodes = nodes;
        config.seed_ids.clear();
    }
    if let Some(seconds) = args.seconds {
        config.run_seconds = seconds;
    }

    let sim = Simulation::start(&config).await?;
    let consistent = sim
        .run(Duration::from_secs(config.run_seconds), args.until_consistent)
        .await?;
    tracing::info!("ring consistent: {}", consistent);

    let snapshots = sim.inspect()?;
    println!("{}", serde_json::to_string_pretty(&snapshots)?);
    sim.shutdown().await?;
    Ok(())
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();
    init_logging(cli.log_level);
    tracing::debug!("ringchord {}", util::build_version());

    match cli.command {
        Command::Run(args) => run(args).await,
        Command::InitConfig(args) => {
            let path = Config::default().write_fs(&args.location)?;
            println!("Your config file has saved to: {}", path);
            Ok(())
        }
    }
}
