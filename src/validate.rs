//! Boundary validation: every constraint is checked here, once, before
//! anything reaches the client adapter.

/// Telegram's hard limit for a single text message.
pub const MAX_MESSAGE_CHARS: usize = 4096;

/// Maximum caption length for media uploads.
pub const MAX_CAPTION_CHARS: usize = 1024;

/// Maximum accepted upload size.
pub const MAX_UPLOAD_BYTES: usize = 10 * 1024 * 1024;

pub const IMAGE_MIME_TYPES: &[&str] = &["image/jpeg", "image/png", "image/gif"];

pub const DOCUMENT_MIME_TYPES: &[&str] = &[
    "application/pdf",
    "text/csv",
    "text/plain",
    "application/vnd.ms-excel",
    "application/vnd.openxmlformats-officedocument.spreadsheetml.sheet",
];

/// Check a text message against the length limit, counting characters the
/// way Telegram does (code points, not bytes).
pub fn check_message(message: &str) -> Result<(), String> {
    if message.chars().count() > MAX_MESSAGE_CHARS {
        return Err(format!("Message exceeds {MAX_MESSAGE_CHARS} characters"));
    }
    Ok(())
}

pub fn check_caption(caption: &str) -> Result<(), String> {
    if caption.chars().count() > MAX_CAPTION_CHARS {
        return Err(format!("Caption exceeds {MAX_CAPTION_CHARS} characters"));
    }
    Ok(())
}

/// Check an upload's declared MIME type and size against a whitelist.
pub fn check_upload(
    content_type: Option<&str>,
    size: usize,
    allowed: &[&str],
) -> Result<(), String> {
    match content_type {
        Some(mime) if allowed.contains(&mime) => {}
        Some(mime) => return Err(format!("Unsupported file type: {mime}")),
        None => return Err("Missing file content type".to_string()),
    }
    if size > MAX_UPLOAD_BYTES {
        return Err(format!(
            "File exceeds maximum size of {} bytes",
            MAX_UPLOAD_BYTES
        ));
    }
    Ok(())
}
