//! Bundled assets and the fallback policy for images that fail to load.

use std::path::Path;
use std::sync::Arc;

use tracing::warn;

use crate::images::{DecodedImage, ImageLoader};

/// Locators of the images shipped under the assets directory.
#[derive(Debug, Clone)]
pub struct Assets {
    pub default_avatar: String,
    pub default_banner: String,
    pub coins_icon: String,
    pub reps_icon: String,
    pub status_icon: String,
    pub rank_background: String,
    pub atm_background: String,
    pub atm_overlay: String,
}

impl Assets {
    /// Resolves the bundled asset layout under `root`.
    pub fn from_dir(root: &Path) -> Self {
        let locator = |relative: &str| root.join(relative).to_string_lossy().into_owned();

        Self {
            default_avatar: locator("discordblue.png"),
            default_banner: locator("Bbanner.png"),
            coins_icon: locator("icons/coins.png"),
            reps_icon: locator("icons/reps.png"),
            status_icon: locator("icons/status.png"),
            rank_background: locator("backgrounds/rank.png"),
            atm_background: locator("backgrounds/atm.jpg"),
            atm_overlay: locator("backgrounds/atm_overlay.png"),
        }
    }
}

/// Loads `primary`, then `fallback`.
///
/// Returns `None` when both fail, in which case the caller draws a
/// placeholder. A missing or blank `primary` goes straight to the fallback.
pub async fn load_or_fallback(
    loader: &ImageLoader,
    primary: Option<&str>,
    fallback: &str,
) -> Option<Arc<DecodedImage>> {
    if let Some(primary) = primary.filter(|p| !p.trim().is_empty()) {
        match loader.load_cached(primary).await {
            Ok(image) => return Some(image),
            Err(e) => warn!("{}; using {}", e, fallback),
        }
    }

    load_optional(loader, fallback).await
}

/// Loads a bundled asset, logging instead of failing.
pub async fn load_optional(loader: &ImageLoader, locator: &str) -> Option<Arc<DecodedImage>> {
    match loader.load_cached(locator).await {
        Ok(image) => Some(image),
        Err(e) => {
            warn!("{}", e);
            None
        }
    }
}
