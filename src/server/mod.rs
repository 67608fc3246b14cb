//! The listinha backend: an HTTP API over SQLite plus a WebSocket change
//! feed.
//!
//! Every successful mutation is broadcast through the [`FeedHub`] after it
//! commits, so connected clients can mirror row changes without polling.
//! Access is fully collaborative — there is no per-user ownership and no
//! authentication at the data layer.

use axum::{
    extract::{
        ws::{Message, WebSocket},
        Path, Query, State, WebSocketUpgrade,
    },
    http::StatusCode,
    response::{IntoResponse, Response},
    routing::get,
    Json, Router,
};
use serde::{Deserialize, Serialize};
use std::sync::Arc;
use tokio::sync::broadcast;
use tower_http::trace::TraceLayer;
use uuid::Uuid;

use crate::db::{ItemRepository, ListRepository};
use crate::feed::{ChangeOp, FeedHub, ItemEvent, ListEvent};
use crate::models::{NewItem, ShoppingItem, ShoppingList};

/// Shared state for all handlers.
#[derive(Clone)]
pub struct AppState {
    pub lists: Arc<ListRepository>,
    pub items: Arc<ItemRepository>,
    pub hub: Arc<FeedHub>,
}

impl AppState {
    pub fn new(pool: sqlx::SqlitePool) -> Self {
        Self {
            lists: Arc::new(ListRepository::new(pool.clone())),
            items: Arc::new(ItemRepository::new(pool)),
            hub: Arc::new(FeedHub::new()),
        }
    }
}

/// Builds the full router: REST routes, feed routes and request tracing.
pub fn app(state: AppState) -> Router {
    Router::new()
        .route("/health", get(health))
        .route("/lists", get(get_lists).post(create_list))
        .route(
            "/lists/{id}",
            axum::routing::patch(rename_list).delete(delete_list),
        )
        .route("/lists/{id}/items", axum::routing::delete(delete_list_items))
        .route("/items", get(get_items).post(create_item))
        .route(
            "/items/{id}",
            axum::routing::patch(update_item).delete(delete_item),
        )
        .route("/feed/lists", get(feed_lists))
        .route("/feed/items", get(feed_items))
        .with_state(state)
        .layer(TraceLayer::new_for_http())
}

// ============================================================================
// Errors
// ============================================================================

pub enum ApiError {
    NotFound,
    Database(sqlx::Error),
}

impl From<sqlx::Error> for ApiError {
    fn from(e: sqlx::Error) -> Self {
        match e {
            sqlx::Error::RowNotFound => ApiError::NotFound,
            other => ApiError::Database(other),
        }
    }
}

#[derive(Serialize)]
struct ErrorBody {
    error: &'static str,
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        match self {
            ApiError::NotFound => {
                (StatusCode::NOT_FOUND, Json(ErrorBody { error: "not_found" })).into_response()
            }
            ApiError::Database(e) => {
                tracing::error!("database error: {}", e);
                (
                    StatusCode::INTERNAL_SERVER_ERROR,
                    Json(ErrorBody { error: "database" }),
                )
                    .into_response()
            }
        }
    }
}

// ============================================================================
// Handlers
// ============================================================================

#[derive(Serialize)]
struct HealthResponse {
    status: &'static str,
    version: &'static str,
}

async fn health() -> Json<HealthResponse> {
    Json(HealthResponse {
        status: "ok",
        version: env!("CARGO_PKG_VERSION"),
    })
}

async fn get_lists(State(state): State<AppState>) -> Result<Json<Vec<ShoppingList>>, ApiError> {
    Ok(Json(state.lists.list().await?))
}

#[derive(Debug, Deserialize)]
pub struct CreateList {
    pub name: String,
}

async fn create_list(
    State(state): State<AppState>,
    Json(payload): Json<CreateList>,
) -> Result<(StatusCode, Json<ShoppingList>), ApiError> {
    let created = state.lists.create(&ShoppingList::new(payload.name)).await?;
    state.hub.broadcast_list(ChangeOp::Insert, created.clone());
    Ok((StatusCode::CREATED, Json(created)))
}

#[derive(Debug, Deserialize)]
pub struct RenameList {
    pub name: String,
}

async fn rename_list(
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
    Json(payload): Json<RenameList>,
) -> Result<Json<ShoppingList>, ApiError> {
    let renamed = state.lists.rename(id, &payload.name).await?;
    state.hub.broadcast_list(ChangeOp::Update, renamed.clone());
    Ok(Json(renamed))
}

async fn delete_list(
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
) -> Result<StatusCode, ApiError> {
    let list = state.lists.get_by_id(id).await?.ok_or(ApiError::NotFound)?;
    state.lists.delete(id).await?;
    state.hub.broadcast_list(ChangeOp::Delete, list);
    Ok(StatusCode::NO_CONTENT)
}

/// Cascade half of list deletion: removes every item of the list,
/// announcing each removed row on the items feed.
async fn delete_list_items(
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
) -> Result<StatusCode, ApiError> {
    let removed = state.items.delete_for_list(id).await?;
    for item in removed {
        state.hub.broadcast_item(ChangeOp::Delete, item);
    }
    Ok(StatusCode::NO_CONTENT)
}

#[derive(Debug, Deserialize)]
pub struct ItemsQuery {
    pub list_id: Uuid,
}

async fn get_items(
    State(state): State<AppState>,
    Query(query): Query<ItemsQuery>,
) -> Result<Json<Vec<ShoppingItem>>, ApiError> {
    Ok(Json(state.items.list_for(query.list_id).await?))
}

async fn create_item(
    State(state): State<AppState>,
    Json(payload): Json<NewItem>,
) -> Result<(StatusCode, Json<ShoppingItem>), ApiError> {
    // New items are always unbought; the bought flag is not client-settable
    // on creation.
    let item = ShoppingItem::new(payload.name, payload.category, payload.list_id)
        .with_quantity(payload.quantity.max(1));
    let created = state.items.create(&item).await?;
    state.hub.broadcast_item(ChangeOp::Insert, created.clone());
    Ok((StatusCode::CREATED, Json(created)))
}

#[derive(Debug, Deserialize)]
pub struct UpdateItem {
    pub bought: bool,
}

async fn update_item(
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
    Json(payload): Json<UpdateItem>,
) -> Result<Json<ShoppingItem>, ApiError> {
    let updated = state.items.set_bought(id, payload.bought).await?;
    state.hub.broadcast_item(ChangeOp::Update, updated.clone());
    Ok(Json(updated))
}

async fn delete_item(
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
) -> Result<StatusCode, ApiError> {
    let item = state.items.get_by_id(id).await?.ok_or(ApiError::NotFound)?;
    state.items.delete(id).await?;
    state.hub.broadcast_item(ChangeOp::Delete, item);
    Ok(StatusCode::NO_CONTENT)
}

// ============================================================================
// Feed endpoints
// ============================================================================

async fn feed_lists(ws: WebSocketUpgrade, State(state): State<AppState>) -> Response {
    let rx = state.hub.subscribe_lists();
    ws.on_upgrade(move |socket| forward_list_events(socket, rx))
}

#[derive(Debug, Deserialize)]
pub struct FeedItemsQuery {
    pub list_id: Option<Uuid>,
}

async fn feed_items(
    ws: WebSocketUpgrade,
    State(state): State<AppState>,
    Query(query): Query<FeedItemsQuery>,
) -> Response {
    let rx = state.hub.subscribe_items();
    ws.on_upgrade(move |socket| forward_item_events(socket, rx, query.list_id))
}

async fn forward_list_events(mut socket: WebSocket, mut rx: broadcast::Receiver<ListEvent>) {
    loop {
        tokio::select! {
            event = rx.recv() => match event {
                Ok(event) => {
                    if send_event(&mut socket, &event).await.is_err() {
                        break;
                    }
                }
                Err(broadcast::error::RecvError::Lagged(n)) => {
                    tracing::warn!("lists feed subscriber lagged by {} events", n);
                }
                Err(broadcast::error::RecvError::Closed) => break,
            },
            msg = socket.recv() => match msg {
                // The feed is one-way; client frames other than close are ignored
                Some(Ok(Message::Close(_))) | Some(Err(_)) | None => break,
                Some(Ok(_)) => {}
            },
        }
    }
}

async fn forward_item_events(
    mut socket: WebSocket,
    mut rx: broadcast::Receiver<ItemEvent>,
    filter: Option<Uuid>,
) {
    loop {
        tokio::select! {
            event = rx.recv() => match event {
                Ok(event) => {
                    if !event.matches_list(filter) {
                        continue;
                    }
                    if send_event(&mut socket, &event).await.is_err() {
                        break;
                    }
                }
                Err(broadcast::error::RecvError::Lagged(n)) => {
                    tracing::warn!("items feed subscriber lagged by {} events", n);
                }
                Err(broadcast::error::RecvError::Closed) => break,
            },
            msg = socket.recv() => match msg {
                Some(Ok(Message::Close(_))) | Some(Err(_)) | None => break,
                Some(Ok(_)) => {}
            },
        }
    }
}

async fn send_event<E: Serialize>(socket: &mut WebSocket, event: &E) -> Result<(), ()> {
    let text = match serde_json::to_string(event) {
        Ok(text) => text,
        Err(e) => {
            tracing::error!("failed to encode feed event: {}", e);
            return Ok(());
        }
    };
    socket.send(Message::Text(text.into())).await.map_err(|_| ())
}
