//! Collaborative shopping lists backed by a SQLite store and a row-level
//! change feed.
//!
//! The crate ships both halves of the system: the backend (`server`, `db`,
//! `feed`) and the client (`client`, `store`, `commands`). The heart of the
//! client is [`store::ListStore`], which reconciles local view state against
//! the remote store and the inbound change feed.

pub mod client;
pub mod commands;
pub mod config;
pub mod db;
pub mod feed;
pub mod models;
pub mod server;
pub mod store;
