//! Input resolution: turn a user-supplied path or URL into bytes.
//!
//! The rest of the pipeline only ever sees owned byte buffers, which is what
//! an upload widget hands over. Local files are read directly; HTTP(S) URLs
//! are downloaded with a timeout.

use crate::error::ToolkitError;
use std::path::PathBuf;
use std::time::Duration;
use tracing::{debug, info};

/// Raw bytes plus where they came from (for messages).
#[derive(Debug, Clone)]
pub struct InputBytes {
    pub source: String,
    pub bytes: Vec<u8>,
}

/// Check if the input string looks like a URL.
pub fn is_url(input: &str) -> bool {
    input.starts_with("http://") || input.starts_with("https://")
}

/// Read a local file or download a URL.
pub async fn load_input(input: &str, timeout_secs: u64) -> Result<InputBytes, ToolkitError> {
    let bytes = if is_url(input) {
        download_url(input, timeout_secs).await?
    } else {
        read_local(input).await?
    };
    Ok(InputBytes {
        source: input.to_string(),
        bytes,
    })
}

/// How far into the buffer the `%PDF` header may appear. PDF readers
/// tolerate leading junk (a BOM, whitespace, gateway preambles) up to here.
pub const PDF_HEADER_WINDOW: usize = 1024;

/// Reject buffers with no `%PDF` header in their first
/// [`PDF_HEADER_WINDOW`] bytes.
pub fn ensure_pdf_magic(bytes: &[u8]) -> Result<(), ToolkitError> {
    if bytes.len() < 4 {
        return Err(ToolkitError::UnreadableDocument {
            detail: format!("file is too short to be a PDF ({} bytes)", bytes.len()),
        });
    }
    let head = &bytes[..bytes.len().min(PDF_HEADER_WINDOW)];
    match head.windows(4).position(|w| w == b"%PDF") {
        Some(offset) => {
            if offset > 0 {
                debug!("PDF header found at byte {}", offset);
            }
            Ok(())
        }
        None => Err(ToolkitError::UnreadableDocument {
            detail: format!(
                "not a PDF (no %PDF header in the first {} bytes, starts with {:?})",
                head.len(),
                &bytes[..4]
            ),
        }),
    }
}

async fn read_local(path_str: &str) -> Result<Vec<u8>, ToolkitError> {
    let path = PathBuf::from(path_str);

    match tokio::fs::read(&path).await {
        Ok(bytes) => {
            debug!("Read {} bytes from {}", bytes.len(), path.display());
            Ok(bytes)
        }
        Err(e) if e.kind() == std::io::ErrorKind::PermissionDenied => {
            Err(ToolkitError::PermissionDenied { path })
        }
        Err(_) => Err(ToolkitError::FileNotFound { path }),
    }
}

async fn download_url(url: &str, timeout_secs: u64) -> Result<Vec<u8>, ToolkitError> {
    info!("Downloading {}", url);

    let failed = |reason: String| ToolkitError::DownloadFailed {
        url: url.to_string(),
        reason,
    };

    let client = reqwest::Client::builder()
        .timeout(Duration::from_secs(timeout_secs))
        .build()
        .map_err(|e| failed(e.to_string()))?;

    let response = client.get(url).send().await.map_err(|e| {
        if e.is_timeout() {
            ToolkitError::DownloadTimeout {
                url: url.to_string(),
                secs: timeout_secs,
            }
        } else {
            failed(e.to_string())
        }
    })?;

    if !response.status().is_success() {
        return Err(failed(format!("HTTP {}", response.status())));
    }

    let bytes = response.bytes().await.map_err(|e| failed(e.to_string()))?;
    info!("Downloaded {} bytes", bytes.len());
    Ok(bytes.to_vec())
}
