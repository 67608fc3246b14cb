//! Row-level change feed shared by the server and its clients.
//!
//! Every committed mutation is broadcast as a full-row event. Clients mirror
//! the events into local state instead of applying mutation responses
//! directly, so all connected views converge on what the backend committed.

use serde::{Deserialize, Serialize};
use tokio::sync::broadcast;
use uuid::Uuid;

use crate::models::{ShoppingItem, ShoppingList};

/// The kind of row change a feed event describes.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ChangeOp {
    Insert,
    Update,
    Delete,
}

/// A change to a row in `shopping_lists`.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct ListEvent {
    pub op: ChangeOp,
    pub row: ShoppingList,
}

/// A change to a row in `shopping_items`.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct ItemEvent {
    pub op: ChangeOp,
    pub row: ShoppingItem,
}

impl ItemEvent {
    /// Whether this event is relevant to a subscription filtered by list.
    pub fn matches_list(&self, filter: Option<Uuid>) -> bool {
        match filter {
            Some(list_id) => self.row.list_id == list_id,
            None => true,
        }
    }
}

/// Fan-out point for feed events, one broadcast channel per table.
///
/// Mutation handlers broadcast after commit; WebSocket sessions subscribe
/// and forward. Send errors mean no subscribers and are ignored.
pub struct FeedHub {
    lists: broadcast::Sender<ListEvent>,
    items: broadcast::Sender<ItemEvent>,
}

impl FeedHub {
    pub fn new() -> Self {
        let (lists, _) = broadcast::channel(64);
        let (items, _) = broadcast::channel(64);
        Self { lists, items }
    }

    pub fn subscribe_lists(&self) -> broadcast::Receiver<ListEvent> {
        self.lists.subscribe()
    }

    pub fn subscribe_items(&self) -> broadcast::Receiver<ItemEvent> {
        self.items.subscribe()
    }

    pub fn broadcast_list(&self, op: ChangeOp, row: ShoppingList) {
        let _ = self.lists.send(ListEvent { op, row });
    }

    pub fn broadcast_item(&self, op: ChangeOp, row: ShoppingItem) {
        let _ = self.items.send(ItemEvent { op, row });
    }
}

impl Default for FeedHub {
    fn default() -> Self {
        Self::new()
    }
}
