//! Client layer for the shop REST backend.
//!
//! The crate is organized around three seams: [`token::TokenStore`] over
//! an injected [`storage::Storage`], the [`client::HttpGateway`] which
//! shapes every HTTP response into a [`types::response::Envelope`], and
//! the resource services in [`services`]. Navigation and notification
//! are capabilities the embedder supplies; see
//! [`client::factory::ClientFactory`] for the composition root.

pub mod api;
pub mod client;
pub mod config;
pub mod guard;
pub mod logs;
pub mod nav;
pub mod notify;
pub mod services;
pub mod storage;
pub mod token;
pub mod types;
