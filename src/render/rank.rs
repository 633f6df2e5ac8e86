//! Leaderboard podium (525x350): top three on a podium, top five listed.

use std::sync::Arc;

use crate::error::Result;
use crate::images::DecodedImage;
use crate::render::canvas::{rgb, Canvas, TextAlign};
use crate::render::Fonts;

pub const WIDTH: u32 = 525;
pub const HEIGHT: u32 = 350;

/// Podium anchors (name center, avatar bottom) for 1st, 2nd and 3rd.
const PODIUM_POSITIONS: [(f32, f32); 3] = [(135.0, 250.0), (65.0, 280.0), (210.0, 295.0)];
/// Gold, silver, bronze.
const PODIUM_COLORS: [u32; 3] = [0xffd700, 0xc0c0c0, 0xcd7f32];
const PODIUM_AVATAR: f32 = 50.0;

const LIST_X: f32 = 340.0;
const LIST_NAME_X: f32 = 400.0;
const LIST_START_Y: f32 = 30.0;
const LIST_STEP: f32 = 65.0;
const LIST_AVATAR: f32 = 50.0;
const COINS_ICON: f32 = 24.0;

/// One resolved leaderboard row.
#[derive(Debug, Clone)]
pub struct RankRow {
    pub display_name: String,
    /// Abbreviated coin balance.
    pub coins: String,
    pub avatar: Option<Arc<DecodedImage>>,
}

/// Podium and list rows, best first. `None` marks a podium slot whose user
/// could not be resolved; it is left empty.
#[derive(Debug, Clone, Default)]
pub struct RankBoard {
    pub podium: Vec<Option<RankRow>>,
    pub list: Vec<RankRow>,
}

#[derive(Debug, Clone, Default)]
pub struct RankImages {
    pub background: Option<Arc<DecodedImage>>,
    pub coins_icon: Option<Arc<DecodedImage>>,
}

pub fn draw(board: &RankBoard, images: &RankImages, fonts: &Fonts) -> Result<Vec<u8>> {
    let mut canvas = Canvas::new(WIDTH, HEIGHT)?;
    let (width, height) = (WIDTH as f32, HEIGHT as f32);

    match &images.background {
        Some(background) => canvas.draw_image(background, 0.0, 0.0, width, height),
        None => canvas.fill(rgb(0xf2f3f5)),
    }

    let slots = board.podium.iter().zip(PODIUM_POSITIONS).zip(PODIUM_COLORS);
    for ((row, (x, y)), color) in slots {
        let Some(row) = row else {
            continue;
        };
        canvas.draw_avatar(
            row.avatar.as_deref(),
            x - PODIUM_AVATAR / 2.0,
            y - 75.0,
            PODIUM_AVATAR,
            rgb(color),
            3.0,
        );
        canvas.fill_text(
            fonts.bold(),
            &row.display_name,
            14.0,
            x,
            y - 90.0,
            TextAlign::Center,
            rgb(0xffffff),
        );
    }

    let black = rgb(0x000000);
    let mut list_y = LIST_START_Y;
    for row in &board.list {
        canvas.draw_avatar(
            row.avatar.as_deref(),
            LIST_X,
            list_y - 20.0,
            LIST_AVATAR,
            rgb(0x333333),
            2.0,
        );
        canvas.fill_text(
            fonts.bold(),
            &row.display_name,
            16.0,
            LIST_NAME_X,
            list_y,
            TextAlign::Left,
            black,
        );

        let icon_y = list_y + 7.0;
        if let Some(icon) = &images.coins_icon {
            canvas.draw_image(icon, LIST_NAME_X, icon_y, COINS_ICON, COINS_ICON);
        }
        canvas.fill_text(
            fonts.regular(),
            &row.coins,
            12.0,
            LIST_NAME_X + COINS_ICON + 8.0,
            icon_y + 17.0,
            TextAlign::Left,
            black,
        );

        list_y += LIST_STEP;
    }

    canvas.fill_text(
        fonts.regular(),
        "Criado com o Sam",
        12.0,
        width - 10.0,
        height - 10.0,
        TextAlign::Right,
        black,
    );

    canvas.encode_png()
}
