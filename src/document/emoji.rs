use serde::{Deserialize, Serialize};
use unicode_properties::UnicodeEmoji;
use unicode_segmentation::UnicodeSegmentation;

use crate::canvas::DocCoord;

pub type EmojiId = usize;

/// A single emoji placed on the canvas.
///
/// `is_selected` and `is_dragging` are transient UI state and are never
/// written to disk.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Emoji {
    pub id: EmojiId,
    pub text: String,
    pub x: i32,
    pub y: i32,
    pub size: u32,
    #[serde(skip)]
    pub is_selected: bool,
    #[serde(skip)]
    pub is_dragging: bool,
}

impl Emoji {
    pub fn new(id: EmojiId, text: impl Into<String>, at: DocCoord, size: u32) -> Self {
        Self {
            id,
            text: text.into(),
            x: at.x,
            y: at.y,
            size: size.max(1),
            is_selected: false,
            is_dragging: false,
        }
    }

    pub fn position(&self) -> DocCoord {
        DocCoord::new(self.x, self.y)
    }

    pub fn set_position(&mut self, at: DocCoord) {
        self.x = at.x;
        self.y = at.y;
    }
}

/// `max(1, round(size * factor))`, saturating at `u32::MAX`.
pub fn scaled_size(size: u32, factor: f32) -> u32 {
    let scaled = (size as f32 * factor).round();
    if scaled.is_nan() || scaled < 1.0 {
        1
    } else {
        scaled as u32
    }
}

/// Converts a fractional font size into a stored emoji size.
pub fn size_from_points(points: f32) -> u32 {
    scaled_size(1, points)
}

/// Whether a single grapheme cluster reads as an emoji.
///
/// Digits, `#`, `*` and the few text symbols below U+238D carry the Emoji
/// property too, so they only count with a variation selector or keycap
/// attached. A lone regional indicator is half a flag.
fn is_emoji_grapheme(grapheme: &str) -> bool {
    let mut chars = grapheme.chars();
    let Some(first) = chars.next() else {
        return false;
    };
    if !first.is_emoji_char() {
        return false;
    }
    if ('\u{1F1E6}'..='\u{1F1FF}').contains(&first) {
        return chars.next().is_some();
    }
    first as u32 >= 0x238D || chars.any(|c| c == '\u{FE0F}' || c == '\u{20E3}')
}

/// Returns the emoji grapheme at the very start of `text`, if the text starts
/// with one. Leading whitespace is not skipped.
pub fn first_emoji(text: &str) -> Option<&str> {
    text.graphemes(true).next().filter(|g| is_emoji_grapheme(g))
}

/// Splits a run of emoji into its graphemes, dropping everything else.
pub fn emoji_graphemes(text: &str) -> Vec<&str> {
    text.graphemes(true).filter(|g| is_emoji_grapheme(g)).collect()
}
