//! One handler per endpoint: validate, call the adapter, wrap the result.

use axum::extract::{Multipart, Path, State};
use axum::Json;
use serde::Deserialize;
use serde_json::{json, Value};
use tracing::error;

use crate::server::response::{ok, ApiError, ApiResult};
use crate::server::AppState;
use crate::telegram::Group;
use crate::validate;

fn upstream(prefix: &str, err: anyhow::Error) -> ApiError {
    error!("{prefix}: {err:#}");
    ApiError::Upstream(format!("{prefix}: {err:#}"))
}

pub async fn welcome() -> ApiResult<&'static str> {
    ok("Welcome to Telegram Bot API")
}

pub async fn start(State(state): State<AppState>) -> ApiResult<&'static str> {
    match state.messenger.is_authorized().await {
        Ok(true) => return ok("Telegram bot already running"),
        Ok(false) => {}
        Err(err) => return Err(upstream("Failed to start bot", err)),
    }
    state
        .messenger
        .connect()
        .await
        .map_err(|err| upstream("Failed to start bot", err))?;
    ok("Telegram bot started")
}

pub async fn reload(State(state): State<AppState>) -> ApiResult<&'static str> {
    state
        .messenger
        .reload()
        .await
        .map_err(|err| upstream("Failed to reload client", err))?;
    ok("Telegram client reloaded successfully")
}

pub async fn groups(State(state): State<AppState>) -> ApiResult<Vec<Group>> {
    let groups = state
        .messenger
        .list_groups()
        .await
        .map_err(|err| upstream("Failed to fetch groups", err))?;
    ok(groups)
}

pub async fn send_path(
    State(state): State<AppState>,
    Path((id, message)): Path<(String, String)>,
) -> ApiResult<&'static str> {
    send_text_to(&state, &id, &message).await
}

#[derive(Debug, Deserialize)]
pub struct SendTextRequest {
    #[serde(default)]
    pub id: String,
    #[serde(default)]
    pub message: String,
}

pub async fn send_text(
    State(state): State<AppState>,
    Json(req): Json<SendTextRequest>,
) -> ApiResult<&'static str> {
    if req.id.is_empty() || req.message.is_empty() {
        return Err(ApiError::Invalid(
            "Invalid request: id and message are required".to_string(),
        ));
    }
    send_text_to(&state, &req.id, &req.message).await
}

async fn send_text_to(state: &AppState, id: &str, message: &str) -> ApiResult<&'static str> {
    validate::check_message(message).map_err(ApiError::Invalid)?;
    state
        .messenger
        .send_text(id, message)
        .await
        .map_err(|err| upstream("Failed to send message", err))?;
    ok("Message sent")
}

pub async fn send_image(
    State(state): State<AppState>,
    multipart: Multipart,
) -> ApiResult<&'static str> {
    let upload = Upload::read(multipart, "image").await?;
    let (id, bytes) = match (upload.id, upload.bytes) {
        (Some(id), Some(bytes)) if !id.is_empty() => (id, bytes),
        _ => {
            return Err(ApiError::Invalid(
                "Invalid request: id and image are required".to_string(),
            ))
        }
    };
    validate::check_upload(
        upload.content_type.as_deref(),
        bytes.len(),
        validate::IMAGE_MIME_TYPES,
    )
    .map_err(ApiError::Invalid)?;
    if let Some(caption) = &upload.caption {
        validate::check_caption(caption).map_err(ApiError::Invalid)?;
    }
    let filename = upload.filename.unwrap_or_else(|| "image.jpg".to_string());
    state
        .messenger
        .send_image(&id, bytes, &filename, upload.caption)
        .await
        .map_err(|err| upstream("Failed to send image", err))?;
    ok("Image sent successfully")
}

pub async fn send_file(
    State(state): State<AppState>,
    multipart: Multipart,
) -> ApiResult<&'static str> {
    let upload = Upload::read(multipart, "file").await?;
    let (id, bytes) = match (upload.id, upload.bytes) {
        (Some(id), Some(bytes)) if !id.is_empty() => (id, bytes),
        _ => {
            return Err(ApiError::Invalid(
                "Invalid request: id and file are required".to_string(),
            ))
        }
    };
    validate::check_upload(
        upload.content_type.as_deref(),
        bytes.len(),
        validate::DOCUMENT_MIME_TYPES,
    )
    .map_err(ApiError::Invalid)?;
    if let Some(caption) = &upload.caption {
        validate::check_caption(caption).map_err(ApiError::Invalid)?;
    }
    let filename = upload.filename.unwrap_or_else(|| "file.bin".to_string());
    state
        .messenger
        .send_document(&id, bytes, &filename, upload.caption)
        .await
        .map_err(|err| upstream("Failed to send file", err))?;
    ok("File sent successfully")
}

/// Fields pulled out of a multipart upload request.
#[derive(Default)]
struct Upload {
    id: Option<String>,
    caption: Option<String>,
    bytes: Option<Vec<u8>>,
    filename: Option<String>,
    content_type: Option<String>,
}

impl Upload {
    async fn read(mut multipart: Multipart, file_field: &str) -> Result<Self, ApiError> {
        let mut upload = Self::default();
        while let Some(field) = multipart.next_field().await.map_err(bad_multipart)? {
            let name = field.name().unwrap_or_default().to_string();
            if name == "id" {
                upload.id = Some(field.text().await.map_err(bad_multipart)?);
            } else if name == "caption" {
                upload.caption = Some(field.text().await.map_err(bad_multipart)?);
            } else if name == file_field {
                upload.filename = field.file_name().map(str::to_string);
                upload.content_type = field.content_type().map(str::to_string);
                upload.bytes = Some(field.bytes().await.map_err(bad_multipart)?.to_vec());
            }
        }
        Ok(upload)
    }
}

fn bad_multipart(err: axum::extract::multipart::MultipartError) -> ApiError {
    ApiError::Invalid(format!("Malformed multipart body: {err}"))
}

/// Endpoint documentation, served without authentication.
pub async fn docs() -> Json<Value> {
    Json(json!({
        "name": env!("CARGO_PKG_NAME"),
        "version": env!("CARGO_PKG_VERSION"),
        "description": env!("CARGO_PKG_DESCRIPTION"),
        "authentication": {
            "header": "x-api-key",
            "exempt": ["/api/docs"],
        },
        "endpoints": [
            {"method": "GET", "path": "/api/", "description": "Welcome message"},
            {"method": "GET", "path": "/api/start", "description": "Connect the Telegram client if it is not already authorized"},
            {"method": "GET", "path": "/api/reload", "description": "Disconnect and reconnect the Telegram client"},
            {"method": "GET", "path": "/api/groups", "description": "List group dialogs as {title, id} pairs"},
            {"method": "GET", "path": "/api/send/{id}/{message}", "description": "Send a text message via path parameters"},
            {"method": "POST", "path": "/api/send-text", "description": "Send a text message; JSON body {id, message}", "limits": {"message": "4096 chars"}},
            {"method": "POST", "path": "/api/send-image", "description": "Send an image; multipart fields id, image, caption?", "limits": {"size": "10 MB", "types": validate::IMAGE_MIME_TYPES, "caption": "1024 chars"}},
            {"method": "POST", "path": "/api/send-file", "description": "Send a document; multipart fields id, file, caption?", "limits": {"size": "10 MB", "types": validate::DOCUMENT_MIME_TYPES, "caption": "1024 chars"}},
        ],
    }))
}
