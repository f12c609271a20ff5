mod cities;
mod cli;
mod grid;
mod offset;
mod parquet;

use std::process::ExitCode;

use anyhow::Result;
use clap::Parser;
use cli::{command, init_logging, Cli, Commands};

#[tokio::main]
async fn main() -> ExitCode {
    let cli = Cli::parse();
    init_logging(&cli.log_level);

    match run(&cli.command).await {
        Ok(Some(filename)) => {
            println!("File saved to `{}`", filename);
            ExitCode::SUCCESS
        }
        Ok(None) => ExitCode::SUCCESS,
        Err(e) => {
            eprintln!("Error: {:#}", e);
            ExitCode::FAILURE
        }
    }
}

async fn run(commands: &Commands) -> Result<Option<String>> {
    let filename = match commands {
        Commands::Extract(args) => Some(command::extract(args).await?),
        Commands::Inspect { input } => {
            command::inspect(input).await?;
            None
        }
        Commands::Lookup { lat, lon, input } => {
            command::lookup(*lat, *lon, input).await?;
            None
        }
        Commands::Coords(args) => Some(command::coords(args).await?),
        Commands::Split { input, output_dir } => {
            Some(command::split(input, output_dir).await?)
        }
        Commands::Annotate { action } => {
            command::annotate(action).await?;
            None
        }
        Commands::Offsets(args) => Some(command::offsets(args).await?),
    };

    Ok(filename)
}
