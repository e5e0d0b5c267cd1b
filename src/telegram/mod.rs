//! Client adapter for the external Telegram library.
//!
//! The HTTP layer only talks to the [`Messenger`] trait; the grammers-backed
//! implementation lives in [`client`]. Keeping the seam here lets the route
//! handlers be tested against a mock without a live session.

pub mod client;

pub use client::TelegramGateway;

use anyhow::Result;
use async_trait::async_trait;
use serde::{Deserialize, Serialize};

/// A group dialog, reduced to what callers need to address it.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Group {
    pub title: String,
    pub id: String,
}

/// Operations the façade needs from the messaging client.
#[async_trait]
pub trait Messenger: Send + Sync {
    /// Whether the current session is live and authorized.
    async fn is_authorized(&self) -> Result<bool>;

    /// (Re)establish the connection from the stored session.
    async fn connect(&self) -> Result<()>;

    /// Disconnect and reconnect, verifying authorization. On failure the
    /// previous connection stays in place.
    async fn reload(&self) -> Result<()>;

    /// Group dialogs among the 100 most recent; everything else is skipped.
    async fn list_groups(&self) -> Result<Vec<Group>>;

    /// Send a plain text message to the dialog with the given id.
    async fn send_text(&self, id: &str, message: &str) -> Result<()>;

    /// Upload bytes as a photo (non-document) with an optional caption.
    async fn send_image(
        &self,
        id: &str,
        bytes: Vec<u8>,
        filename: &str,
        caption: Option<String>,
    ) -> Result<()>;

    /// Upload bytes as a document with an optional caption.
    async fn send_document(
        &self,
        id: &str,
        bytes: Vec<u8>,
        filename: &str,
        caption: Option<String>,
    ) -> Result<()>;
}
