//! Render Module
//!
//! Card composition. Each card is drawn in two phases: every image is first
//! resolved through the image cache and the fallback policy, then the
//! synchronous draw runs on the blocking pool and yields PNG bytes.

pub mod assets;
pub mod atm;
pub mod canvas;
mod font;
pub mod profile;
pub mod rank;

use std::path::Path;
use std::sync::Arc;

use futures::future::join_all;
use tracing::debug;

use crate::error::{AppError, Result};
use crate::images::{DecodedImage, ImageLoader};
use crate::users::UserInfo;

pub use assets::{load_optional, load_or_fallback, Assets};
pub use atm::AtmCard;
pub use canvas::{Canvas, TextAlign};
pub use font::{Font, Fonts};
pub use profile::ProfileCard;
pub use rank::{RankBoard, RankRow};

/// A resolved user with the amount shown next to them.
#[derive(Debug, Clone)]
pub struct RankedUser {
    pub user: Arc<UserInfo>,
    /// Abbreviated coin balance.
    pub coins: String,
}

/// Draws cards from cached images, bundled assets and fonts.
#[derive(Debug, Clone)]
pub struct Renderer {
    images: ImageLoader,
    assets: Assets,
    fonts: Fonts,
}

impl Renderer {
    /// Builds a renderer over the asset layout in `assets_dir`, loading fonts
    /// from its `fonts/` subdirectory.
    pub fn new(images: ImageLoader, assets_dir: &Path) -> Self {
        Self::with_parts(
            images,
            Assets::from_dir(assets_dir),
            Fonts::load(&assets_dir.join("fonts")),
        )
    }

    pub fn with_parts(images: ImageLoader, assets: Assets, fonts: Fonts) -> Self {
        Self {
            images,
            assets,
            fonts,
        }
    }

    /// The user's avatar, or the bundled default avatar.
    pub async fn avatar(&self, user: &UserInfo) -> Option<Arc<DecodedImage>> {
        load_or_fallback(
            &self.images,
            user.avatar_url.as_deref(),
            &self.assets.default_avatar,
        )
        .await
    }

    async fn asset(&self, locator: &str) -> Option<Arc<DecodedImage>> {
        load_optional(&self.images, locator).await
    }

    pub async fn render_profile(&self, card: ProfileCard) -> Result<Vec<u8>> {
        let (banner, avatar, coins_icon, reps_icon, status_icon) = tokio::join!(
            load_or_fallback(
                &self.images,
                card.banner.as_deref(),
                &self.assets.default_banner
            ),
            self.avatar(&card.user),
            self.asset(&self.assets.coins_icon),
            self.asset(&self.assets.reps_icon),
            self.asset(&self.assets.status_icon),
        );

        let images = profile::ProfileImages {
            banner,
            avatar,
            coins_icon,
            reps_icon,
            status_icon,
        };
        let fonts = self.fonts.clone();

        debug!("Drawing profile card for {}", card.user.id);
        draw_blocking(move || profile::draw(&card, &images, &fonts)).await
    }

    /// Draws the podium from the best three and the list from the best five.
    ///
    /// Both slices are expected sorted best first. Unresolved podium slots
    /// stay empty.
    pub async fn render_rank(
        &self,
        podium: Vec<Option<RankedUser>>,
        list: Vec<RankedUser>,
    ) -> Result<Vec<u8>> {
        let podium_rows = join_all(podium.into_iter().take(3).map(move |slot| async move {
            match slot {
                Some(ranked) => Some(self.rank_row(ranked).await),
                None => None,
            }
        }));
        let list_rows = join_all(list.into_iter().take(5).map(|ranked| self.rank_row(ranked)));

        let (podium, list, background, coins_icon) = tokio::join!(
            podium_rows,
            list_rows,
            self.asset(&self.assets.rank_background),
            self.asset(&self.assets.coins_icon),
        );

        let board = RankBoard { podium, list };
        let images = rank::RankImages {
            background,
            coins_icon,
        };
        let fonts = self.fonts.clone();

        draw_blocking(move || rank::draw(&board, &images, &fonts)).await
    }

    pub async fn render_atm(&self, card: AtmCard) -> Result<Vec<u8>> {
        let (background, overlay, avatar) = tokio::join!(
            self.asset(&self.assets.atm_background),
            self.asset(&self.assets.atm_overlay),
            self.avatar(&card.user),
        );

        let images = atm::AtmImages {
            background,
            overlay,
            avatar,
        };
        let fonts = self.fonts.clone();

        draw_blocking(move || atm::draw(&card, &images, &fonts)).await
    }

    async fn rank_row(&self, ranked: RankedUser) -> RankRow {
        RankRow {
            avatar: self.avatar(&ranked.user).await,
            display_name: ranked.user.display_name.clone(),
            coins: ranked.coins,
        }
    }
}

async fn draw_blocking<F>(draw: F) -> Result<Vec<u8>>
where
    F: FnOnce() -> Result<Vec<u8>> + Send + 'static,
{
    tokio::task::spawn_blocking(draw)
        .await
        .map_err(|e| AppError::Internal(format!("render task failed: {}", e)))?
}
