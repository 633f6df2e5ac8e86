//! Profile card (800x450): banner, avatar, name, stat pills and an
//! "about me" box.

use std::sync::Arc;

use chrono::{DateTime, Local};

use crate::error::Result;
use crate::format::wrap_text;
use crate::images::DecodedImage;
use crate::render::canvas::{rgb, Canvas, TextAlign};
use crate::render::Fonts;
use crate::users::UserInfo;

pub const WIDTH: u32 = 800;
pub const HEIGHT: u32 = 450;

const AVATAR_SIZE: f32 = 130.0;
const AVATAR_X: f32 = 40.0;
const PILL_HEIGHT: f32 = 40.0;
const PILL_ICON: f32 = 30.0;
const PILL_GAP: f32 = 10.0;
const ABOUT_WIDTH: f32 = 350.0;
const ABOUT_HEIGHT: f32 = 100.0;
const ABOUT_LINE_HEIGHT: f32 = 20.0;
/// Characters per wrapped "about me" line at 16px.
const ABOUT_WRAP: usize = 38;

/// Everything printed on a profile card.
#[derive(Debug, Clone)]
pub struct ProfileCard {
    pub user: Arc<UserInfo>,
    /// Abbreviated coin balance.
    pub coins: String,
    /// Abbreviated reputation.
    pub reps: String,
    pub status: String,
    pub about_me: String,
    /// Requested banner locator; the bundled banner is used when absent.
    pub banner: Option<String>,
    pub created_at: DateTime<Local>,
}

/// Images a profile card is composed from, already resolved through the
/// fallback policy.
#[derive(Debug, Clone, Default)]
pub struct ProfileImages {
    pub banner: Option<Arc<DecodedImage>>,
    pub avatar: Option<Arc<DecodedImage>>,
    pub coins_icon: Option<Arc<DecodedImage>>,
    pub reps_icon: Option<Arc<DecodedImage>>,
    pub status_icon: Option<Arc<DecodedImage>>,
}

/// Splits the "about me" text on newlines and wraps each line.
pub fn about_me_lines(about_me: &str) -> Vec<String> {
    about_me
        .lines()
        .flat_map(|line| {
            let wrapped = wrap_text(line, ABOUT_WRAP);
            if wrapped.is_empty() {
                vec![String::new()]
            } else {
                wrapped
            }
        })
        .collect()
}

pub fn draw(card: &ProfileCard, images: &ProfileImages, fonts: &Fonts) -> Result<Vec<u8>> {
    let mut canvas = Canvas::new(WIDTH, HEIGHT)?;
    let (width, height) = (WIDTH as f32, HEIGHT as f32);

    // Banner over the top half, flat panel below
    match &images.banner {
        Some(banner) => canvas.draw_image(banner, 0.0, 0.0, width, height / 2.0),
        None => canvas.fill_rect(0.0, 0.0, width, height / 2.0, rgb(0x5865f2)),
    }
    canvas.fill_rect(0.0, height / 2.0, width, height / 2.0, rgb(0x1a1a1a));

    let avatar_y = height / 2.0 - AVATAR_SIZE / 2.0;
    canvas.draw_avatar(
        images.avatar.as_deref(),
        AVATAR_X,
        avatar_y,
        AVATAR_SIZE,
        rgb(0x1a1a1a),
        10.0,
    );

    let white = rgb(0xffffff);
    let name_x = AVATAR_X + AVATAR_SIZE + 20.0;
    let name_y = avatar_y + AVATAR_SIZE / 2.0 + 30.0;
    canvas.fill_text(
        fonts.bold(),
        &card.user.display_name,
        30.0,
        name_x,
        name_y,
        TextAlign::Left,
        white,
    );

    // Stat pills
    let pill_y = name_y + 30.0;
    let pills = [
        (&images.coins_icon, card.coins.as_str()),
        (&images.reps_icon, card.reps.as_str()),
        (&images.status_icon, card.status.as_str()),
    ];
    let mut pill_x = name_x;
    for (icon, text) in pills {
        let pill_width = Canvas::measure_text(fonts.regular(), text, 18.0) + PILL_ICON + 20.0;
        canvas.fill_rect(pill_x, pill_y, pill_width, PILL_HEIGHT, rgb(0x2a2a2a));
        if let Some(icon) = icon {
            canvas.draw_image(
                icon,
                pill_x + 5.0,
                pill_y + (PILL_HEIGHT - PILL_ICON) / 2.0,
                PILL_ICON,
                PILL_ICON,
            );
        }
        canvas.fill_text(
            fonts.regular(),
            text,
            18.0,
            pill_x + PILL_ICON + 10.0,
            pill_y + 25.0,
            TextAlign::Left,
            white,
        );
        pill_x += pill_width + PILL_GAP;
    }

    // About me
    let about_x = name_x;
    let about_y = pill_y + PILL_HEIGHT + PILL_GAP * 2.0;
    let about_center = about_x + ABOUT_WIDTH / 2.0;
    canvas.fill_rect(about_x, about_y, ABOUT_WIDTH, ABOUT_HEIGHT, rgb(0x2a2a2a));
    canvas.fill_text(
        fonts.bold(),
        "Sobre mim",
        18.0,
        about_center,
        about_y + 20.0,
        TextAlign::Center,
        white,
    );

    let lines = about_me_lines(&card.about_me);
    let text_height = lines.len() as f32 * ABOUT_LINE_HEIGHT;
    let first_baseline = about_y + (ABOUT_HEIGHT - text_height) / 2.0 + ABOUT_LINE_HEIGHT;
    for (i, line) in lines.iter().enumerate() {
        canvas.fill_text(
            fonts.regular(),
            line,
            16.0,
            about_center,
            first_baseline + i as f32 * ABOUT_LINE_HEIGHT,
            TextAlign::Center,
            white,
        );
    }

    // Footer, right aligned
    let right = width - 20.0;
    let footer = format!("Criado em {}", card.created_at.format("%d/%m/%Y, %H:%M"));
    canvas.fill_text(fonts.regular(), &footer, 16.0, right, height - 20.0, TextAlign::Right, white);
    canvas.fill_text(
        fonts.regular(),
        "© 2024 Sam Bot",
        14.0,
        right,
        height - 40.0,
        TextAlign::Right,
        white,
    );
    canvas.fill_text(
        fonts.regular(),
        "Criado com o Sam",
        14.0,
        right,
        height - 60.0,
        TextAlign::Right,
        white,
    );

    canvas.encode_png()
}
