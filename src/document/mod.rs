mod background;
mod emoji;

use egui::Vec2;
use serde::{Deserialize, Serialize};

use crate::canvas::DocCoord;
use crate::error::DocumentError;

pub use background::Background;
pub use emoji::{Emoji, EmojiId, emoji_graphemes, first_emoji, scaled_size, size_from_points};

/// The EmojiArt document: placed emoji plus a background.
///
/// All methods here mutate directly. Undoable edits go through
/// [`crate::command::Command`], which calls into these.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Document {
    emojis: Vec<Emoji>,
    background: Background,
    next_emoji_id: EmojiId,
}

impl Document {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn emojis(&self) -> &[Emoji] {
        &self.emojis
    }

    pub fn emoji(&self, id: EmojiId) -> Option<&Emoji> {
        self.emojis.iter().find(|emoji| emoji.id == id)
    }

    pub fn index_of(&self, id: EmojiId) -> Option<usize> {
        self.emojis.iter().position(|emoji| emoji.id == id)
    }

    pub fn background(&self) -> &Background {
        &self.background
    }

    fn emoji_mut(&mut self, id: EmojiId) -> Result<&mut Emoji, DocumentError> {
        self.emojis
            .iter_mut()
            .find(|emoji| emoji.id == id)
            .ok_or(DocumentError::UnknownEmoji(id))
    }

    /// Builds an emoji with a fresh id without placing it.
    ///
    /// Ids are never handed out twice, even if the emoji is never inserted.
    pub fn make_emoji(&mut self, text: impl Into<String>, at: DocCoord, size: f32) -> Emoji {
        let id = self.next_emoji_id;
        self.next_emoji_id += 1;
        Emoji::new(id, text, at, size_from_points(size))
    }

    pub fn add_emoji(&mut self, text: impl Into<String>, at: DocCoord, size: f32) -> EmojiId {
        let emoji = self.make_emoji(text, at, size);
        let id = emoji.id;
        self.emojis.push(emoji);
        id
    }

    /// Inserts an existing emoji, clamping `index` to the end of the list.
    pub fn insert_emoji(&mut self, index: usize, emoji: Emoji) {
        self.next_emoji_id = self.next_emoji_id.max(emoji.id + 1);
        let index = index.min(self.emojis.len());
        self.emojis.insert(index, emoji);
    }

    /// Removes an emoji, returning it with the index it occupied.
    pub fn remove_emoji(&mut self, id: EmojiId) -> Result<(usize, Emoji), DocumentError> {
        let index = self.index_of(id).ok_or(DocumentError::UnknownEmoji(id))?;
        Ok((index, self.emojis.remove(index)))
    }

    /// Moves an emoji by a document-space delta. Returns its previous position.
    pub fn move_emoji(&mut self, id: EmojiId, delta: Vec2) -> Result<DocCoord, DocumentError> {
        let emoji = self.emoji_mut(id)?;
        let old = emoji.position();
        emoji.set_position(old.offset_by(delta));
        Ok(old)
    }

    pub fn place_emoji(&mut self, id: EmojiId, at: DocCoord) -> Result<DocCoord, DocumentError> {
        let emoji = self.emoji_mut(id)?;
        let old = emoji.position();
        emoji.set_position(at);
        Ok(old)
    }

    /// Scales an emoji's size. Returns its previous size.
    pub fn scale_emoji(&mut self, id: EmojiId, factor: f32) -> Result<u32, DocumentError> {
        let emoji = self.emoji_mut(id)?;
        let old = emoji.size;
        emoji.size = scaled_size(old, factor);
        Ok(old)
    }

    pub fn resize_emoji(&mut self, id: EmojiId, size: u32) -> Result<u32, DocumentError> {
        let emoji = self.emoji_mut(id)?;
        let old = emoji.size;
        emoji.size = size.max(1);
        Ok(old)
    }

    /// Toggles the selection flag of one emoji. Returns the new flag.
    pub fn select_emoji(&mut self, id: EmojiId) -> Result<bool, DocumentError> {
        let emoji = self.emoji_mut(id)?;
        emoji.is_selected = !emoji.is_selected;
        Ok(emoji.is_selected)
    }

    pub fn set_dragging(&mut self, id: EmojiId, is_dragging: bool) -> Result<(), DocumentError> {
        self.emoji_mut(id)?.is_dragging = is_dragging;
        Ok(())
    }

    /// Selects exactly `ids`, returning the previous selection.
    pub fn set_selection(&mut self, ids: &[EmojiId]) -> Result<Vec<EmojiId>, DocumentError> {
        if let Some(id) = ids.iter().find(|id| self.emoji(**id).is_none()) {
            return Err(DocumentError::UnknownEmoji(*id));
        }
        let previous = self.selected_ids();
        for emoji in &mut self.emojis {
            emoji.is_selected = ids.contains(&emoji.id);
        }
        Ok(previous)
    }

    pub fn has_selection(&self) -> bool {
        self.emojis.iter().any(|emoji| emoji.is_selected)
    }

    pub fn selected_ids(&self) -> Vec<EmojiId> {
        self.emojis
            .iter()
            .filter(|emoji| emoji.is_selected)
            .map(|emoji| emoji.id)
            .collect()
    }

    pub fn set_background(&mut self, background: Background) -> Background {
        std::mem::replace(&mut self.background, background)
    }

    pub fn to_json(&self) -> Result<String, serde_json::Error> {
        serde_json::to_string(self)
    }

    pub fn from_json(json: &str) -> Result<Self, DocumentError> {
        let mut document: Self =
            serde_json::from_str(json).map_err(|e| DocumentError::Malformed(e.to_string()))?;
        let max_id = document.emojis.iter().map(|emoji| emoji.id + 1).max().unwrap_or(0);
        document.next_emoji_id = document.next_emoji_id.max(max_id);
        Ok(document)
    }
}
