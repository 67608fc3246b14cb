use clap::{Parser, Subcommand};
use std::path::PathBuf;

use listinha::commands::{ConfigCommand, ItemCommand, ListCommand, WatchCommand};
use listinha::config::Config;

#[derive(Parser)]
#[command(name = "listinha")]
#[command(version)]
#[command(about = "Listas de compras colaborativas", long_about = None)]
struct Cli {
    /// Path to config file
    #[arg(long, short, global = true)]
    config: Option<PathBuf>,

    #[command(subcommand)]
    command: Option<Commands>,
}

#[derive(Subcommand)]
enum Commands {
    /// Manage shopping lists
    List(ListCommand),

    /// Manage items on a list
    Item(ItemCommand),

    /// Follow a list live, mirroring the change feed
    Watch(WatchCommand),

    /// Manage configuration
    Config(ConfigCommand),
}

#[tokio::main]
async fn main() {
    if let Err(e) = run().await {
        eprintln!("Erro: {}", e);
        std::process::exit(1);
    }
}

async fn run() -> Result<(), Box<dyn std::error::Error>> {
    let cli = Cli::parse();

    let config = Config::load(cli.config.clone())?;

    match cli.command {
        Some(Commands::List(cmd)) => cmd.run(&config, cli.config).await?,
        Some(Commands::Item(cmd)) => cmd.run(&config).await?,
        Some(Commands::Watch(cmd)) => cmd.run(&config).await?,
        Some(Commands::Config(cmd)) => cmd.run(&config, cli.config)?,
        None => {
            println!("Use --help para ver os comandos disponíveis");
        }
    }

    Ok(())
}
