use clap::{Args, Subcommand, ValueEnum};
use std::path::PathBuf;

use crate::config::Config;

#[derive(Clone, ValueEnum, Default)]
pub enum OutputFormat {
    #[default]
    Text,
    Json,
}

#[derive(Args)]
pub struct ConfigCommand {
    #[command(subcommand)]
    pub command: ConfigSubcommand,
}

#[derive(Subcommand)]
pub enum ConfigSubcommand {
    /// Show current configuration values
    Show {
        /// Output format
        #[arg(long, short, value_enum, default_value = "text")]
        format: OutputFormat,
    },
}

impl ConfigCommand {
    pub fn run(
        &self,
        config: &Config,
        config_path: Option<PathBuf>,
    ) -> Result<(), Box<dyn std::error::Error>> {
        match &self.command {
            ConfigSubcommand::Show { format } => {
                match format {
                    OutputFormat::Json => {
                        println!("{}", serde_json::to_string_pretty(config)?);
                    }
                    OutputFormat::Text => {
                        let path = config_path.unwrap_or_else(Config::default_config_path);
                        if path.exists() {
                            println!("Arquivo de configuração: {}", path.display());
                        } else {
                            println!(
                                "Arquivo de configuração: {} (não encontrado)",
                                path.display()
                            );
                        }
                        println!();
                        println!("server_url: {}", config.server_url);
                        println!(
                            "default_list: {}",
                            config.default_list.as_deref().unwrap_or("(nenhuma)")
                        );
                    }
                }
                Ok(())
            }
        }
    }
}
