//! Item management CLI commands.
//!
//! Mutations are acknowledged by the backend but displayed state is only
//! updated through the change feed; use `listinha watch` to follow a list
//! live.

use clap::{Args, Subcommand};

use super::{drain_notices, resolve_list, target_list_name};
use crate::client::HttpRemote;
use crate::config::Config;
use crate::models::{Category, ShoppingItem};
use crate::store::ListStore;

#[derive(Args)]
pub struct ItemCommand {
    #[command(subcommand)]
    pub command: ItemSubcommand,
}

#[derive(Subcommand)]
pub enum ItemSubcommand {
    /// Add an item to a list
    Add {
        /// Item name
        name: String,

        /// Category, e.g. "Laticínios" (see 'listinha item categories')
        category: Category,

        /// Quantity (invalid or non-positive input becomes 1)
        #[arg(long, short)]
        qty: Option<String>,

        /// Target list (defaults to the configured list)
        #[arg(long, short)]
        list: Option<String>,
    },

    /// Toggle an item between bought and pending
    Toggle {
        /// Item name
        name: String,

        /// Target list (defaults to the configured list)
        #[arg(long, short)]
        list: Option<String>,
    },

    /// Remove an item from a list
    Remove {
        /// Item name
        name: String,

        /// Target list (defaults to the configured list)
        #[arg(long, short)]
        list: Option<String>,
    },

    /// Show the available categories
    Categories,
}

impl ItemCommand {
    pub async fn run(&self, config: &Config) -> Result<(), Box<dyn std::error::Error>> {
        let mut store = ListStore::new(HttpRemote::new(&config.server_url));

        match &self.command {
            ItemSubcommand::Add {
                name,
                category,
                qty,
                list,
            } => {
                let list_name = target_list_name(list.as_deref(), config.default_list.as_deref())?;
                let list = resolve_list(&mut store, &list_name).await?;

                store.active_list = Some(list.id);
                store.item_name_input = name.clone();
                store.item_category_input = Some(*category);
                store.item_quantity_input = qty.clone().unwrap_or_default();

                store.add_item().await;
                drain_notices(&mut store)?;

                println!("Item '{}' adicionado em '{}'.", name.trim(), list.name);
                Ok(())
            }

            ItemSubcommand::Toggle { name, list } => {
                let item = find_item(&mut store, config, name, list.as_deref()).await?;
                store.toggle_item(item.id).await;
                drain_notices(&mut store)?;

                let state = if item.bought { "pendente" } else { "comprado" };
                println!("'{}' marcado como {}.", item.name, state);
                Ok(())
            }

            ItemSubcommand::Remove { name, list } => {
                let item = find_item(&mut store, config, name, list.as_deref()).await?;
                store.delete_item(item.id).await;
                drain_notices(&mut store)?;

                println!("Item '{}' removido.", item.name);
                Ok(())
            }

            ItemSubcommand::Categories => {
                for category in Category::ALL {
                    println!("{}", category);
                }
                Ok(())
            }
        }
    }
}

/// Resolves the target list and finds an item on it by name.
async fn find_item(
    store: &mut ListStore<HttpRemote>,
    config: &Config,
    name: &str,
    list_flag: Option<&str>,
) -> Result<ShoppingItem, Box<dyn std::error::Error>> {
    let list_name = target_list_name(list_flag, config.default_list.as_deref())?;
    let list = resolve_list(store, &list_name).await?;

    store.active_list = Some(list.id);
    store.refresh_items().await;
    drain_notices(store)?;

    let wanted = name.trim().to_lowercase();
    store
        .items
        .iter()
        .find(|i| i.name.to_lowercase() == wanted)
        .cloned()
        .ok_or_else(|| format!("Item '{}' não encontrado em '{}'", name, list.name).into())
}
