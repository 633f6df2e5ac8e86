//! Image Loader
//!
//! Fetches (HTTP or filesystem) and decodes images through a `ResourceCache`.
//! Concurrent loads of the same locator share one fetch and decode.

use std::sync::Arc;

use reqwest::Client;
use tracing::debug;

use crate::cache::ResourceCache;
use crate::error::{AppError, Result};
use crate::images::DecodedImage;

/// Largest remote image body accepted before decoding.
pub const MAX_REMOTE_IMAGE_BYTES: usize = 8 * 1024 * 1024;

/// Loads and caches decoded images by locator (URL or path).
///
/// Paths are read from disk as-is; only bundled assets should reach the
/// loader as paths.
#[derive(Clone, Debug)]
pub struct ImageLoader {
    http: Client,
    cache: ResourceCache<String, Arc<DecodedImage>>,
    max_bytes: usize,
}

impl ImageLoader {
    /// `http` should already carry the outbound timeout.
    pub fn new(http: Client, cache: ResourceCache<String, Arc<DecodedImage>>) -> Self {
        Self {
            http,
            cache,
            max_bytes: MAX_REMOTE_IMAGE_BYTES,
        }
    }

    /// Overrides the remote body limit.
    pub fn with_max_bytes(mut self, max_bytes: usize) -> Self {
        self.max_bytes = max_bytes;
        self
    }

    pub fn cache(&self) -> &ResourceCache<String, Arc<DecodedImage>> {
        &self.cache
    }

    /// Returns the decoded image at `locator`.
    ///
    /// Any fetch or decode failure is an [`AppError::AssetLoad`] carrying the
    /// locator and is not cached. Fallback assets are the caller's concern.
    pub async fn load_cached(&self, locator: &str) -> Result<Arc<DecodedImage>> {
        let locator = locator.trim();
        if locator.is_empty() {
            return Err(AppError::asset(locator, "empty locator"));
        }

        let http = self.http.clone();
        let owned = locator.to_string();
        let max_bytes = self.max_bytes;

        self.cache
            .get_or_fetch(locator.to_string(), move || async move {
                let bytes = read_bytes(&http, &owned, max_bytes).await?;
                debug!("Fetched {} bytes from {}", bytes.len(), owned);

                // Decoding is CPU bound; keep it off the async workers
                let decoded = tokio::task::spawn_blocking(move || DecodedImage::decode(&bytes))
                    .await
                    .map_err(|e| AppError::asset(&owned, e))?
                    .map_err(|reason| AppError::asset(&owned, reason))?;

                Ok(Arc::new(decoded))
            })
            .await
    }
}

/// True for locators that are fetched over HTTP rather than read from disk.
pub fn is_remote(locator: &str) -> bool {
    locator.starts_with("http://") || locator.starts_with("https://")
}

async fn read_bytes(http: &Client, locator: &str, max_bytes: usize) -> Result<Vec<u8>> {
    if is_remote(locator) {
        let mut response = http
            .get(locator)
            .send()
            .await
            .map_err(|e| AppError::asset(locator, e))?;

        let status = response.status();
        if !status.is_success() {
            return Err(AppError::asset(locator, format!("HTTP {}", status)));
        }

        let too_large = || AppError::asset(locator, format!("body exceeds {} bytes", max_bytes));
        if response
            .content_length()
            .is_some_and(|len| len > max_bytes as u64)
        {
            return Err(too_large());
        }

        // Content-Length may be absent or wrong; enforce the cap while reading
        let mut body = Vec::new();
        while let Some(chunk) = response
            .chunk()
            .await
            .map_err(|e| AppError::asset(locator, e))?
        {
            if body.len() + chunk.len() > max_bytes {
                return Err(too_large());
            }
            body.extend_from_slice(&chunk);
        }
        Ok(body)
    } else {
        tokio::fs::read(locator)
            .await
            .map_err(|e| AppError::asset(locator, e))
    }
}
