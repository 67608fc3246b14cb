//! Live view of a list: mirrors the change feed into the store and
//! re-renders on every echo.

use clap::Args;

use super::{drain_notices, render_items, resolve_list, target_list_name};
use crate::client::{self, HttpRemote};
use crate::config::Config;
use crate::feed::ChangeOp;
use crate::store::ListStore;

#[derive(Args)]
pub struct WatchCommand {
    /// List to follow (defaults to the configured list)
    #[arg(long, short)]
    pub list: Option<String>,
}

impl WatchCommand {
    pub async fn run(&self, config: &Config) -> Result<(), Box<dyn std::error::Error>> {
        let mut store = ListStore::new(HttpRemote::new(&config.server_url));

        let list_name = target_list_name(self.list.as_deref(), config.default_list.as_deref())?;
        let list = resolve_list(&mut store, &list_name).await?;
        let mut title = list.name.clone();

        store.active_list = Some(list.id);
        store.refresh_items().await;
        drain_notices(&mut store)?;

        // Subscriptions open after the initial fetch; a mutation landing in
        // between may only show up on the next echo that touches its row.
        let mut items_feed = client::subscribe_items(&config.server_url, Some(list.id)).await?;
        let mut lists_feed = client::subscribe_lists(&config.server_url).await?;

        render(&store, &title);

        loop {
            tokio::select! {
                event = items_feed.next_event() => match event? {
                    Some(event) => {
                        store.apply_item_event(event);
                        render(&store, &title);
                    }
                    None => break,
                },
                event = lists_feed.next_event() => match event? {
                    Some(event) => {
                        if event.row.id == list.id {
                            if event.op == ChangeOp::Delete {
                                println!("A lista '{}' foi excluída.", title);
                                break;
                            }
                            title = event.row.name.clone();
                        }
                        store.apply_list_event(event);
                        render(&store, &title);
                    }
                    None => break,
                },
            }
        }

        Ok(())
    }
}

fn render(store: &ListStore<HttpRemote>, title: &str) {
    println!();
    println!("== {} ==", title);
    render_items(store);
}
