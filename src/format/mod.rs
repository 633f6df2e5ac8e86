//! Formatting Module
//!
//! Pure helpers for the text drawn onto cards: number abbreviation,
//! display-name truncation and word wrapping.

mod abbreviate;
mod text;

pub use abbreviate::{abbreviate, abbreviate_with, parse_amount};
pub use text::{is_mostly_special, truncate, wrap_text};

/// Maximum number of characters of a name drawn on a card
pub const MAX_NAME_LENGTH: usize = 14;
