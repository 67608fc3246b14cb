//! List management CLI commands.

use clap::{Args, Subcommand};
use std::path::PathBuf;

use super::{drain_notices, render_items, resolve_list, target_list_name};
use crate::client::HttpRemote;
use crate::config::Config;
use crate::store::ListStore;

#[derive(Args)]
pub struct ListCommand {
    #[command(subcommand)]
    pub command: ListSubcommand,
}

#[derive(Subcommand)]
pub enum ListSubcommand {
    /// Show all lists
    All,

    /// Create a list and make it the default
    Create {
        /// List name
        name: String,
    },

    /// Rename a list
    Rename {
        /// Current name
        name: String,

        /// New name
        new_name: String,
    },

    /// Delete a list and all of its items
    Delete {
        /// List name
        name: String,
    },

    /// Show a list's items grouped by category
    Show {
        /// List name (defaults to the configured list)
        name: Option<String>,
    },

    /// Make a list the default target for item commands
    Open {
        /// List name
        name: String,
    },
}

impl ListCommand {
    pub async fn run(
        &self,
        config: &Config,
        config_path: Option<PathBuf>,
    ) -> Result<(), Box<dyn std::error::Error>> {
        let mut store = ListStore::new(HttpRemote::new(&config.server_url));

        match &self.command {
            ListSubcommand::All => {
                store.refresh_lists().await;
                drain_notices(&mut store)?;

                if store.lists.is_empty() {
                    println!("Nenhuma lista criada ainda.");
                } else {
                    for list in &store.lists {
                        println!(
                            "{}  (criada em {})",
                            list.name,
                            list.created_at.format("%d/%m/%Y")
                        );
                    }
                }
                Ok(())
            }

            ListSubcommand::Create { name } => {
                store.list_name_input = name.clone();
                store.create_list().await;
                drain_notices(&mut store)?;

                // The new list becomes the default target, mirroring the
                // view switch in the original UI.
                let mut updated = config.clone();
                updated.default_list = Some(name.trim().to_string());
                updated.save(config_path)?;

                println!("Lista '{}' criada.", name.trim());
                Ok(())
            }

            ListSubcommand::Rename { name, new_name } => {
                let list = resolve_list(&mut store, name).await?;
                store.editing_list = Some(list.id);
                store.rename_list(list.id, new_name).await;
                drain_notices(&mut store)?;

                println!("Lista '{}' renomeada para '{}'.", name, new_name.trim());
                Ok(())
            }

            ListSubcommand::Delete { name } => {
                let list = resolve_list(&mut store, name).await?;
                store.active_list = Some(list.id);
                store.delete_list(list.id).await;
                drain_notices(&mut store)?;

                println!("Lista '{}' excluída.", name);
                Ok(())
            }

            ListSubcommand::Show { name } => {
                let name = target_list_name(name.as_deref(), config.default_list.as_deref())?;
                let list = resolve_list(&mut store, &name).await?;
                store.active_list = Some(list.id);
                store.refresh_items().await;
                drain_notices(&mut store)?;

                println!("== {} ==", list.name);
                render_items(&store);
                Ok(())
            }

            ListSubcommand::Open { name } => {
                // Resolving validates the list exists before persisting
                let list = resolve_list(&mut store, name).await?;

                let mut updated = config.clone();
                updated.default_list = Some(list.name.clone());
                updated.save(config_path)?;

                println!("Lista '{}' agora é a padrão.", list.name);
                Ok(())
            }
        }
    }
}
