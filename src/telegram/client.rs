//! grammers-backed implementation of the [`Messenger`] trait.
//!
//! One long-lived client handle lives behind an `RwLock`: sends and
//! listings hold the read lock, `reload` connects a fresh client and swaps
//! it in under the write lock, so a reload can never interleave with an
//! in-flight call.

use anyhow::{bail, Context, Result};
use async_trait::async_trait;
use base64::engine::general_purpose::STANDARD as BASE64;
use base64::Engine;
use grammers_client::types::Chat;
use grammers_client::{Client, Config as ClientConfig, InitParams, InputMessage};
use grammers_session::Session;
use tokio::sync::RwLock;
use tracing::{debug, info};

use super::{Group, Messenger};
use crate::config::Config;

/// How many recent dialogs `/groups` scans.
const DIALOG_LIMIT: usize = 100;

const DEFAULT_IMAGE_CAPTION: &str = "Image from bot";
const DEFAULT_FILE_CAPTION: &str = "File from bot";

pub struct TelegramGateway {
    app_id: i32,
    app_hash: String,
    client: RwLock<Client>,
}

impl TelegramGateway {
    /// Build the client from stored credentials, connect, and verify the
    /// session is authorized. Errors here are fatal to the caller.
    pub async fn connect(config: &Config) -> Result<Self> {
        let session = load_session(&config.session)?;
        let client = connect_client(session, config.app_id, config.app_hash.clone()).await?;
        info!("Telegram client connected and authorized");
        Ok(Self {
            app_id: config.app_id,
            app_hash: config.app_hash.clone(),
            client: RwLock::new(client),
        })
    }
}

fn load_session(encoded: &str) -> Result<Session> {
    let bytes = BASE64
        .decode(encoded.trim())
        .context("TELE_SESSION_TEXT is not valid base64")?;
    Session::load(&bytes).context("failed to parse stored session")
}

async fn connect_client(session: Session, app_id: i32, app_hash: String) -> Result<Client> {
    let client = Client::connect(ClientConfig {
        session,
        api_id: app_id,
        api_hash: app_hash,
        params: InitParams::default(),
    })
    .await
    .context("failed to connect to Telegram")?;

    if !client
        .is_authorized()
        .await
        .context("authorization check failed")?
    {
        bail!("Invalid session. Please generate a new session.");
    }
    Ok(client)
}

/// Resolve a dialog by its stringified id.
async fn find_chat(client: &Client, id: &str) -> Result<Chat> {
    let mut dialogs = client.iter_dialogs();
    while let Some(dialog) = dialogs
        .next()
        .await
        .context("failed to fetch dialogs")?
    {
        let chat = dialog.chat();
        if chat.id().to_string() == id {
            return Ok(chat.clone());
        }
    }
    bail!("No dialog found with id {id}");
}

#[async_trait]
impl Messenger for TelegramGateway {
    async fn is_authorized(&self) -> Result<bool> {
        let client = self.client.read().await;
        client
            .is_authorized()
            .await
            .context("authorization check failed")
    }

    async fn connect(&self) -> Result<()> {
        self.reload().await
    }

    async fn reload(&self) -> Result<()> {
        let mut guard = self.client.write().await;
        // Snapshot the live session so the fresh connection reuses the
        // current auth state, not the one the process started with.
        let session =
            Session::load(&guard.session().save()).context("failed to snapshot session")?;
        let fresh = connect_client(session, self.app_id, self.app_hash.clone()).await?;
        *guard = fresh;
        info!("Telegram client reloaded");
        Ok(())
    }

    async fn list_groups(&self) -> Result<Vec<Group>> {
        let client = self.client.read().await;
        let mut dialogs = client.iter_dialogs().limit(DIALOG_LIMIT);
        let mut groups = Vec::new();
        while let Some(dialog) = dialogs
            .next()
            .await
            .context("failed to fetch dialogs")?
        {
            if let Chat::Group(group) = dialog.chat() {
                groups.push(Group {
                    title: group.title().to_string(),
                    id: group.id().to_string(),
                });
            }
        }
        debug!(count = groups.len(), "listed group dialogs");
        Ok(groups)
    }

    async fn send_text(&self, id: &str, message: &str) -> Result<()> {
        let client = self.client.read().await;
        let chat = find_chat(&client, id).await?;
        client
            .send_message(chat.pack(), InputMessage::text(message))
            .await
            .context("failed to send message")?;
        Ok(())
    }

    async fn send_image(
        &self,
        id: &str,
        bytes: Vec<u8>,
        filename: &str,
        caption: Option<String>,
    ) -> Result<()> {
        let client = self.client.read().await;
        let chat = find_chat(&client, id).await?;
        let size = bytes.len();
        let mut reader = bytes.as_slice();
        let uploaded = client
            .upload_stream(&mut reader, size, filename.to_string())
            .await
            .context("failed to upload image")?;
        let caption = caption.unwrap_or_else(|| DEFAULT_IMAGE_CAPTION.to_string());
        client
            .send_message(chat.pack(), InputMessage::text(caption).photo(uploaded))
            .await
            .context("failed to send image")?;
        Ok(())
    }

    async fn send_document(
        &self,
        id: &str,
        bytes: Vec<u8>,
        filename: &str,
        caption: Option<String>,
    ) -> Result<()> {
        let client = self.client.read().await;
        let chat = find_chat(&client, id).await?;
        let size = bytes.len();
        let mut reader = bytes.as_slice();
        let uploaded = client
            .upload_stream(&mut reader, size, filename.to_string())
            .await
            .context("failed to upload file")?;
        let caption = caption.unwrap_or_else(|| DEFAULT_FILE_CAPTION.to_string());
        client
            .send_message(chat.pack(), InputMessage::text(caption).document(uploaded))
            .await
            .context("failed to send file")?;
        Ok(())
    }
}
