//! Client-side synchronized state for shopping lists and their items.
//!
//! The [`ListStore`] owns everything a view renders: the lists, the items of
//! the active list, draft input fields and transient notices. Mutations are
//! sent to the remote store, but displayed state only changes when the
//! corresponding change-feed event comes back — the feed echo — so every
//! connected client converges on what the backend committed. The one
//! exception is list creation, which switches the active view to the new
//! list immediately.

use std::collections::HashMap;
use std::fmt;
use uuid::Uuid;

use crate::feed::{ChangeOp, ItemEvent, ListEvent};
use crate::models::{Category, NewItem, ShoppingItem, ShoppingList};

/// Error from a remote-store operation, already reduced to a message.
///
/// The store never inspects remote failures beyond logging and notifying;
/// a single opaque type keeps the trait implementable by HTTP clients and
/// test fakes alike.
#[derive(Debug, Clone, PartialEq)]
pub struct RemoteError(pub String);

impl fmt::Display for RemoteError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl std::error::Error for RemoteError {}

/// Operations the store issues against the backend.
///
/// Implemented by the HTTP client and by in-memory fakes in tests.
#[allow(async_fn_in_trait)]
pub trait RemoteStore {
    async fn fetch_lists(&self) -> Result<Vec<ShoppingList>, RemoteError>;
    async fn fetch_items(&self, list_id: Uuid) -> Result<Vec<ShoppingItem>, RemoteError>;
    async fn insert_list(&self, name: &str) -> Result<ShoppingList, RemoteError>;
    async fn update_list_name(&self, id: Uuid, name: &str) -> Result<(), RemoteError>;
    async fn delete_list(&self, id: Uuid) -> Result<(), RemoteError>;
    async fn delete_items_for_list(&self, list_id: Uuid) -> Result<(), RemoteError>;
    async fn insert_item(&self, item: &NewItem) -> Result<ShoppingItem, RemoteError>;
    async fn update_item_bought(&self, id: Uuid, bought: bool) -> Result<(), RemoteError>;
    async fn delete_item(&self, id: Uuid) -> Result<(), RemoteError>;
}

/// Severity of a transient notification.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum NoticeLevel {
    Info,
    Error,
}

/// A transient user-facing notification. Messages are localized (pt-BR).
#[derive(Debug, Clone, PartialEq)]
pub struct Notice {
    pub level: NoticeLevel,
    pub message: String,
}

impl Notice {
    pub fn error(message: impl Into<String>) -> Self {
        Self {
            level: NoticeLevel::Error,
            message: message.into(),
        }
    }

    pub fn info(message: impl Into<String>) -> Self {
        Self {
            level: NoticeLevel::Info,
            message: message.into(),
        }
    }
}

/// Coerces free-form quantity input to a positive integer, defaulting to 1.
pub fn normalize_quantity(input: &str) -> i64 {
    input
        .trim()
        .parse::<i64>()
        .ok()
        .filter(|q| *q > 0)
        .unwrap_or(1)
}

/// Client-visible state of the lists and the currently open list's items.
pub struct ListStore<R> {
    remote: R,
    pub lists: Vec<ShoppingList>,
    pub items: Vec<ShoppingItem>,
    pub active_list: Option<Uuid>,
    pub loading: bool,

    // Draft/UI state mirrored from the view
    pub list_name_input: String,
    pub item_name_input: String,
    pub item_category_input: Option<Category>,
    pub item_quantity_input: String,
    pub editing_list: Option<Uuid>,
    pub category_picker_open: bool,

    notices: Vec<Notice>,
}

impl<R: RemoteStore> ListStore<R> {
    pub fn new(remote: R) -> Self {
        Self {
            remote,
            lists: Vec::new(),
            items: Vec::new(),
            active_list: None,
            loading: false,
            list_name_input: String::new(),
            item_name_input: String::new(),
            item_category_input: None,
            item_quantity_input: String::new(),
            editing_list: None,
            category_picker_open: false,
            notices: Vec::new(),
        }
    }

    pub fn remote(&self) -> &R {
        &self.remote
    }

    /// Drains pending notifications for the view to display.
    pub fn take_notices(&mut self) -> Vec<Notice> {
        std::mem::take(&mut self.notices)
    }

    fn push_error(&mut self, message: &str) {
        self.notices.push(Notice::error(message));
    }

    /// Replaces the lists sequence with a fresh snapshot, newest first.
    ///
    /// On failure prior state is left untouched apart from the loading flag.
    pub async fn refresh_lists(&mut self) {
        self.loading = true;
        match self.remote.fetch_lists().await {
            Ok(lists) => self.lists = lists,
            Err(e) => {
                tracing::warn!("failed to fetch lists: {}", e);
                self.push_error("Não foi possível carregar as listas.");
            }
        }
        self.loading = false;
    }

    /// Replaces the item sequence with a fresh snapshot of the active list.
    pub async fn refresh_items(&mut self) {
        let Some(list_id) = self.active_list else {
            return;
        };
        self.loading = true;
        match self.remote.fetch_items(list_id).await {
            Ok(items) => self.items = items,
            Err(e) => {
                tracing::warn!("failed to fetch items for {}: {}", list_id, e);
                self.push_error("Não foi possível carregar os itens.");
            }
        }
        self.loading = false;
    }

    /// Creates a list from the draft name.
    ///
    /// The only mutation that does not wait for the feed echo before
    /// changing view state: the active list switches to the new id right
    /// away. The lists sequence itself still waits for the insert event.
    pub async fn create_list(&mut self) {
        let name = self.list_name_input.trim().to_string();
        if name.is_empty() {
            self.push_error("Informe um nome para a lista.");
            return;
        }

        match self.remote.insert_list(&name).await {
            Ok(created) => {
                self.active_list = Some(created.id);
                self.items.clear();
                self.list_name_input.clear();
            }
            Err(e) => {
                tracing::warn!("failed to create list: {}", e);
                self.push_error("Não foi possível criar a lista.");
            }
        }
    }

    /// Renames a list; clears the editing state on success.
    pub async fn rename_list(&mut self, id: Uuid, name: &str) {
        let name = name.trim();
        if name.is_empty() {
            self.push_error("Informe um nome para a lista.");
            return;
        }

        match self.remote.update_list_name(id, name).await {
            Ok(()) => self.editing_list = None,
            Err(e) => {
                tracing::warn!("failed to rename list {}: {}", id, e);
                self.push_error("Não foi possível salvar a lista.");
            }
        }
    }

    /// Deletes a list: items first, then the list row.
    ///
    /// There is no transaction across the two calls; a failure after the
    /// first leaves the list without items, never orphaned items.
    pub async fn delete_list(&mut self, id: Uuid) {
        if let Err(e) = self.remote.delete_items_for_list(id).await {
            tracing::warn!("failed to delete items of list {}: {}", id, e);
            self.push_error("Não foi possível excluir a lista.");
            return;
        }

        match self.remote.delete_list(id).await {
            Ok(()) => {
                if self.active_list == Some(id) {
                    self.active_list = None;
                    self.items.clear();
                }
            }
            Err(e) => {
                tracing::warn!("failed to delete list {}: {}", id, e);
                self.push_error("Não foi possível excluir a lista.");
            }
        }
    }

    /// Creates an item on the active list from the draft fields.
    pub async fn add_item(&mut self) {
        let name = self.item_name_input.trim().to_string();
        let category = match self.item_category_input {
            Some(category) if !name.is_empty() => category,
            _ => {
                self.push_error("Informe o nome e a categoria do item.");
                return;
            }
        };
        let Some(list_id) = self.active_list else {
            self.push_error("Selecione uma lista antes de adicionar itens.");
            return;
        };
        let quantity = normalize_quantity(&self.item_quantity_input);

        let new_item = NewItem {
            name,
            category,
            quantity,
            list_id,
        };

        match self.remote.insert_item(&new_item).await {
            Ok(_) => {
                self.item_name_input.clear();
                self.item_category_input = None;
                self.item_quantity_input.clear();
                self.category_picker_open = false;
            }
            Err(e) => {
                tracing::warn!("failed to add item: {}", e);
                self.push_error("Não foi possível salvar o item.");
            }
        }
    }

    /// Flips an item's bought flag on the backend.
    ///
    /// The local row is not touched; it changes when the update echo
    /// arrives through the feed.
    pub async fn toggle_item(&mut self, id: Uuid) {
        let Some(item) = self.items.iter().find(|i| i.id == id) else {
            return;
        };
        let bought = !item.bought;

        if let Err(e) = self.remote.update_item_bought(id, bought).await {
            tracing::warn!("failed to toggle item {}: {}", id, e);
            self.push_error("Não foi possível salvar o item.");
        }
    }

    pub async fn delete_item(&mut self, id: Uuid) {
        if let Err(e) = self.remote.delete_item(id).await {
            tracing::warn!("failed to delete item {}: {}", id, e);
            self.push_error("Não foi possível excluir o item.");
        }
    }

    /// Mirrors a lists-feed event into local state.
    pub fn apply_list_event(&mut self, event: ListEvent) {
        apply_change(&mut self.lists, event.op, event.row, |l| l.id);
    }

    /// Mirrors an items-feed event into local state.
    ///
    /// Events for lists other than the active one are ignored.
    pub fn apply_item_event(&mut self, event: ItemEvent) {
        if !event.matches_list(self.active_list) {
            return;
        }
        apply_change(&mut self.items, event.op, event.row, |i| i.id);
    }

    /// Groups the item sequence by category, preserving item order.
    ///
    /// Group order is the order each category first appears in the item
    /// sequence. Categories with no items are absent.
    pub fn grouped_items(&self) -> Vec<(Category, Vec<ShoppingItem>)> {
        let mut groups: Vec<(Category, Vec<ShoppingItem>)> = Vec::new();
        let mut index: HashMap<Category, usize> = HashMap::new();

        for item in &self.items {
            let slot = *index.entry(item.category).or_insert_with(|| {
                groups.push((item.category, Vec::new()));
                groups.len() - 1
            });
            groups[slot].1.push(item.clone());
        }

        groups
    }
}

/// Applies one feed event to an in-memory sequence.
///
/// Inserts prepend; if the row is already present (a fetch snapshot racing
/// the feed) the insert degrades to an in-place replace so no duplicate row
/// is ever shown. Updates replace by id, deletes remove by id.
fn apply_change<T, F: Fn(&T) -> Uuid>(rows: &mut Vec<T>, op: ChangeOp, row: T, id_of: F) {
    let target = id_of(&row);
    match op {
        ChangeOp::Insert | ChangeOp::Update => {
            if let Some(slot) = rows.iter_mut().find(|r| id_of(&**r) == target) {
                *slot = row;
            } else if op == ChangeOp::Insert {
                rows.insert(0, row);
            }
        }
        ChangeOp::Delete => rows.retain(|r| id_of(r) != target),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::Mutex;

    #[derive(Debug, Clone, PartialEq)]
    enum RemoteCall {
        FetchLists,
        FetchItems(Uuid),
        InsertList(String),
        UpdateListName(Uuid, String),
        DeleteList(Uuid),
        DeleteItemsForList(Uuid),
        InsertItem(NewItemSnapshot),
        UpdateItemBought(Uuid, bool),
        DeleteItem(Uuid),
    }

    #[derive(Debug, Clone, PartialEq)]
    struct NewItemSnapshot {
        name: String,
        category: Category,
        quantity: i64,
        list_id: Uuid,
    }

    /// In-memory remote that records every call and can be told to fail.
    #[derive(Default)]
    struct RecordingRemote {
        calls: Mutex<Vec<RemoteCall>>,
        lists: Vec<ShoppingList>,
        items: Vec<ShoppingItem>,
        fail: bool,
    }

    impl RecordingRemote {
        fn failing() -> Self {
            Self {
                fail: true,
                ..Default::default()
            }
        }

        fn record(&self, call: RemoteCall) -> Result<(), RemoteError> {
            self.calls.lock().unwrap().push(call);
            if self.fail {
                Err(RemoteError("connection refused".into()))
            } else {
                Ok(())
            }
        }

        fn calls(&self) -> Vec<RemoteCall> {
            self.calls.lock().unwrap().clone()
        }
    }

    impl RemoteStore for RecordingRemote {
        async fn fetch_lists(&self) -> Result<Vec<ShoppingList>, RemoteError> {
            self.record(RemoteCall::FetchLists)?;
            Ok(self.lists.clone())
        }

        async fn fetch_items(&self, list_id: Uuid) -> Result<Vec<ShoppingItem>, RemoteError> {
            self.record(RemoteCall::FetchItems(list_id))?;
            Ok(self.items.clone())
        }

        async fn insert_list(&self, name: &str) -> Result<ShoppingList, RemoteError> {
            self.record(RemoteCall::InsertList(name.to_string()))?;
            Ok(ShoppingList::new(name))
        }

        async fn update_list_name(&self, id: Uuid, name: &str) -> Result<(), RemoteError> {
            self.record(RemoteCall::UpdateListName(id, name.to_string()))
        }

        async fn delete_list(&self, id: Uuid) -> Result<(), RemoteError> {
            self.record(RemoteCall::DeleteList(id))
        }

        async fn delete_items_for_list(&self, list_id: Uuid) -> Result<(), RemoteError> {
            self.record(RemoteCall::DeleteItemsForList(list_id))
        }

        async fn insert_item(&self, item: &NewItem) -> Result<ShoppingItem, RemoteError> {
            self.record(RemoteCall::InsertItem(NewItemSnapshot {
                name: item.name.clone(),
                category: item.category,
                quantity: item.quantity,
                list_id: item.list_id,
            }))?;
            Ok(
                ShoppingItem::new(&item.name, item.category, item.list_id)
                    .with_quantity(item.quantity),
            )
        }

        async fn update_item_bought(&self, id: Uuid, bought: bool) -> Result<(), RemoteError> {
            self.record(RemoteCall::UpdateItemBought(id, bought))
        }

        async fn delete_item(&self, id: Uuid) -> Result<(), RemoteError> {
            self.record(RemoteCall::DeleteItem(id))
        }
    }

    fn store_with_active_list(remote: RecordingRemote) -> (ListStore<RecordingRemote>, Uuid) {
        let mut store = ListStore::new(remote);
        let list_id = Uuid::new_v4();
        store.active_list = Some(list_id);
        (store, list_id)
    }

    fn error_messages(store: &mut ListStore<RecordingRemote>) -> Vec<String> {
        store
            .take_notices()
            .into_iter()
            .filter(|n| n.level == NoticeLevel::Error)
            .map(|n| n.message)
            .collect()
    }

    #[test]
    fn test_normalize_quantity() {
        assert_eq!(normalize_quantity("2"), 2);
        assert_eq!(normalize_quantity(" 7 "), 7);
        assert_eq!(normalize_quantity("0"), 1);
        assert_eq!(normalize_quantity("-3"), 1);
        assert_eq!(normalize_quantity(""), 1);
        assert_eq!(normalize_quantity("abc"), 1);
    }

    #[tokio::test]
    async fn test_add_item_empty_name_never_calls_remote() {
        let (mut store, _) = store_with_active_list(RecordingRemote::default());
        store.item_category_input = Some(Category::Padaria);

        store.add_item().await;

        assert!(store.remote().calls().is_empty());
        assert_eq!(error_messages(&mut store).len(), 1);
    }

    #[tokio::test]
    async fn test_add_item_missing_category_never_calls_remote() {
        let (mut store, _) = store_with_active_list(RecordingRemote::default());
        store.item_name_input = "Leite".into();

        store.add_item().await;

        assert!(store.remote().calls().is_empty());
        assert_eq!(error_messages(&mut store).len(), 1);
    }

    #[tokio::test]
    async fn test_add_item_without_active_list_is_rejected() {
        let mut store = ListStore::new(RecordingRemote::default());
        store.item_name_input = "Leite".into();
        store.item_category_input = Some(Category::Laticinios);

        store.add_item().await;

        assert!(store.remote().calls().is_empty());
        assert_eq!(
            error_messages(&mut store),
            vec!["Selecione uma lista antes de adicionar itens.".to_string()]
        );
    }

    #[tokio::test]
    async fn test_add_valid_item_issues_one_insert_and_waits_for_echo() {
        let (mut store, list_id) = store_with_active_list(RecordingRemote::default());
        store.item_name_input = "Leite".into();
        store.item_category_input = Some(Category::Laticinios);
        store.item_quantity_input = "2".into();
        store.category_picker_open = true;

        store.add_item().await;

        assert_eq!(
            store.remote().calls(),
            vec![RemoteCall::InsertItem(NewItemSnapshot {
                name: "Leite".into(),
                category: Category::Laticinios,
                quantity: 2,
                list_id,
            })]
        );

        // Inputs cleared, picker closed, but no item until the echo
        assert!(store.item_name_input.is_empty());
        assert!(store.item_category_input.is_none());
        assert!(store.item_quantity_input.is_empty());
        assert!(!store.category_picker_open);
        assert!(store.items.is_empty());

        // Feed echo arrives
        let row = ShoppingItem::new("Leite", Category::Laticinios, list_id).with_quantity(2);
        store.apply_item_event(ItemEvent {
            op: ChangeOp::Insert,
            row: row.clone(),
        });

        let groups = store.grouped_items();
        assert_eq!(groups.len(), 1);
        assert_eq!(groups[0].0, Category::Laticinios);
        assert_eq!(format!("{}", groups[0].1[0]), "2x Leite");
        assert!(!row.bought);
    }

    #[tokio::test]
    async fn test_quantity_input_normalizes_before_insert() {
        for raw in ["0", "-3", ""] {
            let (mut store, list_id) = store_with_active_list(RecordingRemote::default());
            store.item_name_input = "Ovos".into();
            store.item_category_input = Some(Category::Mercearia);
            store.item_quantity_input = raw.into();

            store.add_item().await;

            assert_eq!(
                store.remote().calls(),
                vec![RemoteCall::InsertItem(NewItemSnapshot {
                    name: "Ovos".into(),
                    category: Category::Mercearia,
                    quantity: 1,
                    list_id,
                })],
                "input {:?} should normalize to 1",
                raw
            );
        }
    }

    #[tokio::test]
    async fn test_toggle_waits_for_feed_echo() {
        let (mut store, list_id) = store_with_active_list(RecordingRemote::default());
        let item = ShoppingItem::new("Pão", Category::Padaria, list_id);
        store.items.push(item.clone());

        store.toggle_item(item.id).await;

        assert_eq!(
            store.remote().calls(),
            vec![RemoteCall::UpdateItemBought(item.id, true)]
        );
        // Not flipped locally yet
        assert!(!store.items[0].bought);

        let echoed = item.clone().with_bought(true);
        store.apply_item_event(ItemEvent {
            op: ChangeOp::Update,
            row: echoed,
        });
        assert!(store.items[0].bought);
    }

    #[tokio::test]
    async fn test_toggle_unknown_item_is_a_no_op() {
        let (mut store, _) = store_with_active_list(RecordingRemote::default());
        store.toggle_item(Uuid::new_v4()).await;
        assert!(store.remote().calls().is_empty());
    }

    #[tokio::test]
    async fn test_delete_item_issues_one_delete() {
        let (mut store, list_id) = store_with_active_list(RecordingRemote::default());
        let item = ShoppingItem::new("Pão", Category::Padaria, list_id);
        store.items.push(item.clone());

        store.delete_item(item.id).await;

        assert_eq!(store.remote().calls(), vec![RemoteCall::DeleteItem(item.id)]);
        // Row stays until the delete echo
        assert_eq!(store.items.len(), 1);

        store.apply_item_event(ItemEvent {
            op: ChangeOp::Delete,
            row: item,
        });
        assert!(store.items.is_empty());
    }

    #[tokio::test]
    async fn test_create_list_whitespace_name_is_rejected() {
        let mut store = ListStore::new(RecordingRemote::default());
        store.list_name_input = "  ".into();

        store.create_list().await;

        assert!(store.remote().calls().is_empty());
        assert_eq!(error_messages(&mut store).len(), 1);
        assert!(store.active_list.is_none());
    }

    #[tokio::test]
    async fn test_create_list_switches_active_view_immediately() {
        let mut store = ListStore::new(RecordingRemote::default());
        store.list_name_input = " Churrasco ".into();

        store.create_list().await;

        assert_eq!(
            store.remote().calls(),
            vec![RemoteCall::InsertList("Churrasco".into())]
        );
        // Active view switches without waiting for the echo; the lists
        // sequence itself still does.
        assert!(store.active_list.is_some());
        assert!(store.lists.is_empty());
        assert!(store.list_name_input.is_empty());
    }

    #[tokio::test]
    async fn test_rename_list_clears_editing_state() {
        let mut store = ListStore::new(RecordingRemote::default());
        let id = Uuid::new_v4();
        store.editing_list = Some(id);

        store.rename_list(id, "Novo nome").await;

        assert_eq!(
            store.remote().calls(),
            vec![RemoteCall::UpdateListName(id, "Novo nome".into())]
        );
        assert!(store.editing_list.is_none());
    }

    #[tokio::test]
    async fn test_rename_list_empty_name_keeps_editing_state() {
        let mut store = ListStore::new(RecordingRemote::default());
        let id = Uuid::new_v4();
        store.editing_list = Some(id);

        store.rename_list(id, "   ").await;

        assert!(store.remote().calls().is_empty());
        assert_eq!(store.editing_list, Some(id));
        assert_eq!(error_messages(&mut store).len(), 1);
    }

    #[tokio::test]
    async fn test_delete_list_cascades_items_first_then_clears_active_state() {
        let (mut store, list_id) = store_with_active_list(RecordingRemote::default());
        store
            .items
            .push(ShoppingItem::new("Leite", Category::Laticinios, list_id));

        store.delete_list(list_id).await;

        assert_eq!(
            store.remote().calls(),
            vec![
                RemoteCall::DeleteItemsForList(list_id),
                RemoteCall::DeleteList(list_id),
            ]
        );
        assert!(store.active_list.is_none());
        assert!(store.items.is_empty());
    }

    #[tokio::test]
    async fn test_delete_inactive_list_keeps_active_state() {
        let (mut store, active_id) = store_with_active_list(RecordingRemote::default());
        store
            .items
            .push(ShoppingItem::new("Leite", Category::Laticinios, active_id));

        store.delete_list(Uuid::new_v4()).await;

        assert_eq!(store.active_list, Some(active_id));
        assert_eq!(store.items.len(), 1);
    }

    #[tokio::test]
    async fn test_delete_list_stops_after_cascade_failure() {
        let (mut store, list_id) = store_with_active_list(RecordingRemote::failing());

        store.delete_list(list_id).await;

        // The list row delete is never attempted
        assert_eq!(
            store.remote().calls(),
            vec![RemoteCall::DeleteItemsForList(list_id)]
        );
        assert_eq!(store.active_list, Some(list_id));
        assert_eq!(error_messages(&mut store).len(), 1);
    }

    #[tokio::test]
    async fn test_refresh_failure_keeps_state_and_clears_loading() {
        let mut store = ListStore::new(RecordingRemote::failing());
        let existing = ShoppingList::new("Antiga");
        store.lists.push(existing.clone());

        store.refresh_lists().await;

        assert_eq!(store.lists, vec![existing]);
        assert!(!store.loading);
        assert_eq!(
            error_messages(&mut store),
            vec!["Não foi possível carregar as listas.".to_string()]
        );
    }

    #[tokio::test]
    async fn test_refresh_items_replaces_snapshot() {
        let list_id = Uuid::new_v4();
        let remote = RecordingRemote {
            items: vec![
                ShoppingItem::new("Leite", Category::Laticinios, list_id),
                ShoppingItem::new("Pão", Category::Padaria, list_id),
            ],
            ..Default::default()
        };
        let mut store = ListStore::new(remote);
        store.active_list = Some(list_id);
        store
            .items
            .push(ShoppingItem::new("Fantasma", Category::Outros, list_id));

        store.refresh_items().await;

        assert_eq!(store.items.len(), 2);
        assert_eq!(store.items[0].name, "Leite");
    }

    #[test]
    fn test_feed_insert_prepends() {
        let mut store = ListStore::new(RecordingRemote::default());
        let list_id = Uuid::new_v4();
        store.active_list = Some(list_id);
        store
            .items
            .push(ShoppingItem::new("Antigo", Category::Outros, list_id));

        store.apply_item_event(ItemEvent {
            op: ChangeOp::Insert,
            row: ShoppingItem::new("Novo", Category::Outros, list_id),
        });

        assert_eq!(store.items[0].name, "Novo");
        assert_eq!(store.items[1].name, "Antigo");
    }

    #[test]
    fn test_feed_insert_of_known_row_does_not_duplicate() {
        let mut store = ListStore::new(RecordingRemote::default());
        let list_id = Uuid::new_v4();
        store.active_list = Some(list_id);
        let item = ShoppingItem::new("Leite", Category::Laticinios, list_id);
        store.items.push(item.clone());

        // Echo of a row a fetch snapshot already delivered
        store.apply_item_event(ItemEvent {
            op: ChangeOp::Insert,
            row: item,
        });

        assert_eq!(store.items.len(), 1);
    }

    #[test]
    fn test_feed_events_for_other_lists_are_ignored() {
        let mut store = ListStore::new(RecordingRemote::default());
        store.active_list = Some(Uuid::new_v4());

        store.apply_item_event(ItemEvent {
            op: ChangeOp::Insert,
            row: ShoppingItem::new("Alheio", Category::Outros, Uuid::new_v4()),
        });

        assert!(store.items.is_empty());
    }

    #[test]
    fn test_feed_update_replaces_in_place() {
        let mut store = ListStore::new(RecordingRemote::default());
        let list = ShoppingList::new("Mercado");
        store.lists.push(list.clone());
        store.lists.push(ShoppingList::new("Feira"));

        let mut renamed = list.clone();
        renamed.name = "Mercadão".into();
        store.apply_list_event(ListEvent {
            op: ChangeOp::Update,
            row: renamed,
        });

        assert_eq!(store.lists.len(), 2);
        assert_eq!(store.lists[0].name, "Mercadão");
    }

    #[test]
    fn test_feed_delete_removes_by_id() {
        let mut store = ListStore::new(RecordingRemote::default());
        let list = ShoppingList::new("Mercado");
        store.lists.push(list.clone());

        store.apply_list_event(ListEvent {
            op: ChangeOp::Delete,
            row: list,
        });

        assert!(store.lists.is_empty());
    }

    #[test]
    fn test_grouping_is_total_and_keeps_first_appearance_order() {
        let mut store = ListStore::new(RecordingRemote::default());
        let list_id = Uuid::new_v4();
        store.active_list = Some(list_id);
        store.items = vec![
            ShoppingItem::new("Leite", Category::Laticinios, list_id),
            ShoppingItem::new("Pão", Category::Padaria, list_id),
            ShoppingItem::new("Queijo", Category::Laticinios, list_id),
            ShoppingItem::new("Sabão", Category::Limpeza, list_id),
        ];

        let groups = store.grouped_items();

        let order: Vec<Category> = groups.iter().map(|(c, _)| *c).collect();
        assert_eq!(
            order,
            vec![Category::Laticinios, Category::Padaria, Category::Limpeza]
        );

        // Union of all groups equals the item sequence, each item once
        let mut regrouped: Vec<Uuid> = groups
            .iter()
            .flat_map(|(_, items)| items.iter().map(|i| i.id))
            .collect();
        let mut original: Vec<Uuid> = store.items.iter().map(|i| i.id).collect();
        regrouped.sort();
        original.sort();
        assert_eq!(regrouped, original);

        // Idempotent: grouping twice yields the same result
        assert_eq!(store.grouped_items(), groups);
    }

    #[test]
    fn test_grouping_empty_items_yields_no_groups() {
        let store = ListStore::new(RecordingRemote::default());
        assert!(store.grouped_items().is_empty());
    }
}
