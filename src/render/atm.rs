//! ATM receipt (800x300): avatar, username, wallet and bank balances.

use std::sync::Arc;

use crate::error::Result;
use crate::images::DecodedImage;
use crate::render::canvas::{rgb, Canvas, TextAlign};
use crate::render::Fonts;
use crate::users::UserInfo;

pub const WIDTH: u32 = 800;
pub const HEIGHT: u32 = 300;

const AVATAR_X: f32 = 120.0;
const AVATAR_Y_OFFSET: f32 = -30.0;
const AVATAR_SIZE: f32 = 150.0;
const USERNAME_POS: (f32, f32) = (280.0, 110.0);
const COINS_POS: (f32, f32) = (320.0, 207.0);
const BANK_POS: (f32, f32) = (540.0, 207.0);

#[derive(Debug, Clone)]
pub struct AtmCard {
    pub user: Arc<UserInfo>,
    /// Abbreviated wallet balance.
    pub coins: String,
    /// Abbreviated bank balance.
    pub bank: String,
}

#[derive(Debug, Clone, Default)]
pub struct AtmImages {
    pub background: Option<Arc<DecodedImage>>,
    pub overlay: Option<Arc<DecodedImage>>,
    pub avatar: Option<Arc<DecodedImage>>,
}

pub fn draw(card: &AtmCard, images: &AtmImages, fonts: &Fonts) -> Result<Vec<u8>> {
    let mut canvas = Canvas::new(WIDTH, HEIGHT)?;
    let (width, height) = (WIDTH as f32, HEIGHT as f32);

    match &images.background {
        Some(background) => canvas.draw_image(background, 0.0, 0.0, width, height),
        None => canvas.fill(rgb(0x23272a)),
    }
    if let Some(overlay) = &images.overlay {
        canvas.draw_image(overlay, 0.0, 0.0, width, height);
    }

    let avatar_y = (height - AVATAR_SIZE) / 2.0 + AVATAR_Y_OFFSET;
    canvas.draw_avatar(
        images.avatar.as_deref(),
        AVATAR_X,
        avatar_y,
        AVATAR_SIZE,
        rgb(0xffffff),
        4.0,
    );

    canvas.fill_text(
        fonts.bold(),
        &card.user.username,
        50.0,
        USERNAME_POS.0,
        USERNAME_POS.1,
        TextAlign::Left,
        rgb(0xffffff),
    );

    let black = rgb(0x000000);
    for (amount, (x, y)) in [(&card.coins, COINS_POS), (&card.bank, BANK_POS)] {
        canvas.fill_text(fonts.bold(), amount, 20.0, x, y, TextAlign::Left, black);
    }

    canvas.fill_text(
        fonts.regular(),
        "Criado com o Sam",
        12.0,
        width - 10.0,
        height - 10.0,
        TextAlign::Right,
        rgb(0xffffff),
    );

    canvas.encode_png()
}
