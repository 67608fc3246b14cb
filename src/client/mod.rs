//! HTTP and WebSocket client for the listinha backend.
//!
//! [`HttpRemote`] implements [`RemoteStore`] over the REST API;
//! [`FeedSubscription`] consumes the change feed. Dropping a subscription
//! closes the socket — it never aborts mutations already in flight.

use futures::{SinkExt, StreamExt};
use serde::de::DeserializeOwned;
use std::marker::PhantomData;
use tokio::net::TcpStream;
use tokio_tungstenite::{connect_async, tungstenite::Message, MaybeTlsStream, WebSocketStream};
use uuid::Uuid;

use crate::feed::{ItemEvent, ListEvent};
use crate::models::{NewItem, ShoppingItem, ShoppingList};
use crate::store::{RemoteError, RemoteStore};

/// Errors from the HTTP client or the feed connection.
#[derive(Debug)]
pub enum ClientError {
    /// Failed to reach the server
    Connection(String),
    /// WebSocket protocol error
    WebSocket(String),
    /// Feed payload could not be decoded
    Decode(String),
}

impl std::fmt::Display for ClientError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            ClientError::Connection(e) => write!(f, "Connection error: {}", e),
            ClientError::WebSocket(e) => write!(f, "WebSocket error: {}", e),
            ClientError::Decode(e) => write!(f, "Failed to decode feed event: {}", e),
        }
    }
}

impl std::error::Error for ClientError {}

/// REST client for the backend's remote-store operations.
pub struct HttpRemote {
    base_url: String,
    http: reqwest::Client,
}

impl HttpRemote {
    pub fn new(server_url: impl Into<String>) -> Self {
        let base_url = server_url.into().trim_end_matches('/').to_string();
        Self {
            base_url,
            http: reqwest::Client::new(),
        }
    }

    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    fn url(&self, path: &str) -> String {
        format!("{}{}", self.base_url, path)
    }
}

fn request_error(e: reqwest::Error) -> RemoteError {
    RemoteError(e.to_string())
}

fn check_status(response: reqwest::Response) -> Result<reqwest::Response, RemoteError> {
    if response.status().is_success() {
        Ok(response)
    } else {
        Err(RemoteError(format!(
            "unexpected status {} from {}",
            response.status(),
            response.url()
        )))
    }
}

impl RemoteStore for HttpRemote {
    async fn fetch_lists(&self) -> Result<Vec<ShoppingList>, RemoteError> {
        let response = self
            .http
            .get(self.url("/lists"))
            .send()
            .await
            .map_err(request_error)?;
        check_status(response)?.json().await.map_err(request_error)
    }

    async fn fetch_items(&self, list_id: Uuid) -> Result<Vec<ShoppingItem>, RemoteError> {
        let response = self
            .http
            .get(self.url("/items"))
            .query(&[("list_id", list_id.to_string())])
            .send()
            .await
            .map_err(request_error)?;
        check_status(response)?.json().await.map_err(request_error)
    }

    async fn insert_list(&self, name: &str) -> Result<ShoppingList, RemoteError> {
        let response = self
            .http
            .post(self.url("/lists"))
            .json(&serde_json::json!({ "name": name }))
            .send()
            .await
            .map_err(request_error)?;
        check_status(response)?.json().await.map_err(request_error)
    }

    async fn update_list_name(&self, id: Uuid, name: &str) -> Result<(), RemoteError> {
        let response = self
            .http
            .patch(self.url(&format!("/lists/{}", id)))
            .json(&serde_json::json!({ "name": name }))
            .send()
            .await
            .map_err(request_error)?;
        check_status(response).map(|_| ())
    }

    async fn delete_list(&self, id: Uuid) -> Result<(), RemoteError> {
        let response = self
            .http
            .delete(self.url(&format!("/lists/{}", id)))
            .send()
            .await
            .map_err(request_error)?;
        check_status(response).map(|_| ())
    }

    async fn delete_items_for_list(&self, list_id: Uuid) -> Result<(), RemoteError> {
        let response = self
            .http
            .delete(self.url(&format!("/lists/{}/items", list_id)))
            .send()
            .await
            .map_err(request_error)?;
        check_status(response).map(|_| ())
    }

    async fn insert_item(&self, item: &NewItem) -> Result<ShoppingItem, RemoteError> {
        let response = self
            .http
            .post(self.url("/items"))
            .json(item)
            .send()
            .await
            .map_err(request_error)?;
        check_status(response)?.json().await.map_err(request_error)
    }

    async fn update_item_bought(&self, id: Uuid, bought: bool) -> Result<(), RemoteError> {
        let response = self
            .http
            .patch(self.url(&format!("/items/{}", id)))
            .json(&serde_json::json!({ "bought": bought }))
            .send()
            .await
            .map_err(request_error)?;
        check_status(response).map(|_| ())
    }

    async fn delete_item(&self, id: Uuid) -> Result<(), RemoteError> {
        let response = self
            .http
            .delete(self.url(&format!("/items/{}", id)))
            .send()
            .await
            .map_err(request_error)?;
        check_status(response).map(|_| ())
    }
}

/// An open change-feed connection yielding decoded events.
pub struct FeedSubscription<E> {
    ws: WebSocketStream<MaybeTlsStream<TcpStream>>,
    _marker: PhantomData<E>,
}

impl<E: DeserializeOwned> FeedSubscription<E> {
    async fn connect(url: &str) -> Result<Self, ClientError> {
        let (ws, _) = connect_async(url)
            .await
            .map_err(|e| ClientError::Connection(e.to_string()))?;
        Ok(Self {
            ws,
            _marker: PhantomData,
        })
    }

    /// Waits for the next feed event. `Ok(None)` means the feed closed.
    pub async fn next_event(&mut self) -> Result<Option<E>, ClientError> {
        loop {
            match self.ws.next().await {
                Some(Ok(Message::Text(text))) => {
                    return serde_json::from_str(&text)
                        .map(Some)
                        .map_err(|e| ClientError::Decode(e.to_string()));
                }
                Some(Ok(Message::Ping(data))) => {
                    self.ws
                        .send(Message::Pong(data))
                        .await
                        .map_err(|e| ClientError::WebSocket(e.to_string()))?;
                }
                Some(Ok(Message::Close(_))) | None => return Ok(None),
                Some(Ok(_)) => {}
                Some(Err(e)) => return Err(ClientError::WebSocket(e.to_string())),
            }
        }
    }
}

/// Subscribes to the lists feed.
pub async fn subscribe_lists(server_url: &str) -> Result<FeedSubscription<ListEvent>, ClientError> {
    FeedSubscription::connect(&feed_url(server_url, "lists", None)).await
}

/// Subscribes to the items feed, optionally filtered by list.
pub async fn subscribe_items(
    server_url: &str,
    list_id: Option<Uuid>,
) -> Result<FeedSubscription<ItemEvent>, ClientError> {
    FeedSubscription::connect(&feed_url(server_url, "items", list_id)).await
}

/// Builds the WebSocket URL for a feed, converting http(s) schemes.
fn feed_url(server_url: &str, table: &str, list_id: Option<Uuid>) -> String {
    let base_url = if server_url.starts_with("http://") {
        server_url.replace("http://", "ws://")
    } else if server_url.starts_with("https://") {
        server_url.replace("https://", "wss://")
    } else if !server_url.starts_with("ws://") && !server_url.starts_with("wss://") {
        format!("ws://{}", server_url)
    } else {
        server_url.to_string()
    };
    let base_url = base_url.trim_end_matches('/');

    match list_id {
        Some(id) => format!("{}/feed/{}?list_id={}", base_url, table, id),
        None => format!("{}/feed/{}", base_url, table),
    }
}
