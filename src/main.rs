use clap::Parser;
use tracing::error;

use yieldsweep::adapter::inbound::cli::command::{Cli, Commands, ConfigCommand};
use yieldsweep::adapter::inbound::cli::output::{self, OutputConfig};
use yieldsweep::adapter::inbound::cli::{balances, config, plan, run};
use yieldsweep::error::Result;

#[tokio::main]
async fn main() {
    let _ = dotenvy::dotenv();

    let cli = Cli::parse();
    output::configure(OutputConfig::new(cli.json, cli.quiet, cli.verbose));

    if let Err(e) = dispatch(cli.command).await {
        error!(error = %e, "Command failed");
        output::error(&e.to_string());
        std::process::exit(1);
    }
}

async fn dispatch(command: Commands) -> Result<()> {
    match command {
        Commands::Run(args) => run::execute(&args).await,
        Commands::Plan(args) => plan::execute(&args).await,
        Commands::Balances(args) => balances::execute(&args).await,
        Commands::Config(ConfigCommand::Init(args)) => config::execute_init(&args.path, args.force),
        Commands::Config(ConfigCommand::Show(args)) => config::execute_show(&args.config),
        Commands::Config(ConfigCommand::Validate(args)) => config::execute_validate(&args.config),
    }
}
