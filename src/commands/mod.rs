mod config_cmd;
mod item_cmd;
mod list_cmd;
mod watch_cmd;

pub use config_cmd::ConfigCommand;
pub use item_cmd::ItemCommand;
pub use list_cmd::ListCommand;
pub use watch_cmd::WatchCommand;

use crate::client::HttpRemote;
use crate::models::ShoppingList;
use crate::store::{ListStore, NoticeLevel};

/// Prints pending notices; fails if any of them was an error.
pub(crate) fn drain_notices(
    store: &mut ListStore<HttpRemote>,
) -> Result<(), Box<dyn std::error::Error>> {
    let mut failure = None;
    for notice in store.take_notices() {
        match notice.level {
            NoticeLevel::Error => {
                eprintln!("{}", notice.message);
                failure = Some(notice.message);
            }
            NoticeLevel::Info => println!("{}", notice.message),
        }
    }
    match failure {
        Some(message) => Err(message.into()),
        None => Ok(()),
    }
}

/// Fetches the lists and resolves one by name (case-insensitive).
pub(crate) async fn resolve_list(
    store: &mut ListStore<HttpRemote>,
    name: &str,
) -> Result<ShoppingList, Box<dyn std::error::Error>> {
    store.refresh_lists().await;
    drain_notices(store)?;

    let wanted = name.trim().to_lowercase();
    store
        .lists
        .iter()
        .find(|l| l.name.to_lowercase() == wanted)
        .cloned()
        .ok_or_else(|| format!("Lista '{}' não encontrada", name).into())
}

/// Picks the target list name: --list flag, then the configured default.
pub(crate) fn target_list_name(
    flag: Option<&str>,
    default_list: Option<&str>,
) -> Result<String, Box<dyn std::error::Error>> {
    flag.or(default_list)
        .map(str::to_string)
        .ok_or_else(|| {
            "Nenhuma lista selecionada. Use --list ou defina uma com 'listinha list open'."
                .to_string()
                .into()
        })
}

/// Renders the grouped view of the active list's items.
pub(crate) fn render_items(store: &ListStore<HttpRemote>) {
    if store.items.is_empty() {
        println!("Nenhum item na lista.");
        return;
    }

    for (category, items) in store.grouped_items() {
        println!("{}", category);
        for item in items {
            let check = if item.bought { "[x]" } else { "[ ]" };
            println!("  {} {}", check, item);
        }
    }

    let bought = store.items.iter().filter(|i| i.bought).count();
    println!("{} de {} itens comprados", bought, store.items.len());
}
