use clap::Parser;
use macrosplit::structs::cli::Cli;
use macrosplit::workers::command_runner::CommandRunner;

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info")).init();

    let cli = Cli::parse();
    let mut runner = CommandRunner::new();
    runner.run_command(cli.command).await?;
    Ok(())
}
