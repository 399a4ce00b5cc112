use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::document::emoji_graphemes;

/// A named row of emoji the user can drag onto the canvas
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Palette {
    pub id: Uuid,
    pub name: String,
    pub emojis: String,
}

impl Palette {
    pub fn new(name: impl Into<String>, emojis: &str) -> Self {
        Self {
            id: Uuid::new_v4(),
            name: name.into(),
            emojis: unique_emojis(emojis),
        }
    }

    pub fn graphemes(&self) -> Vec<&str> {
        emoji_graphemes(&self.emojis)
    }

    /// Appends any emoji from `text` not already in the palette.
    pub fn add_emojis(&mut self, text: &str) {
        let combined = format!("{}{}", self.emojis, text);
        self.emojis = unique_emojis(&combined);
    }

    pub fn remove_emoji(&mut self, emoji: &str) {
        self.emojis = self
            .graphemes()
            .into_iter()
            .filter(|g| *g != emoji)
            .collect();
    }
}

/// Keeps the first occurrence of each emoji, dropping everything else.
fn unique_emojis(text: &str) -> String {
    let mut seen: Vec<&str> = Vec::new();
    for emoji in emoji_graphemes(text) {
        if !seen.contains(&emoji) {
            seen.push(emoji);
        }
    }
    seen.concat()
}

/// The user's palettes. Never empty.
///
/// Shared explicitly (`Rc<RefCell<PaletteStore>>`) with whatever needs it.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PaletteStore {
    pub name: String,
    palettes: Vec<Palette>,
}

impl PaletteStore {
    /// A store seeded with the built-in palettes
    pub fn new(name: impl Into<String>) -> Self {
        let mut store = Self {
            name: name.into(),
            palettes: Vec::new(),
        };
        store.seed();
        store
    }

    fn seed(&mut self) {
        for (name, emojis) in DEFAULT_PALETTES {
            self.palettes.push(Palette::new(*name, emojis));
        }
    }

    /// Key used when persisting this store
    pub fn storage_key(&self) -> String {
        format!("PaletteStore:{}", self.name)
    }

    pub fn palettes(&self) -> &[Palette] {
        &self.palettes
    }

    pub fn len(&self) -> usize {
        self.palettes.len()
    }

    pub fn is_empty(&self) -> bool {
        self.palettes.is_empty()
    }

    /// Clamps an index into the valid range.
    pub fn bounded_index(&self, index: usize) -> usize {
        index.min(self.palettes.len().saturating_sub(1))
    }

    /// Palette at `index`, clamped.
    pub fn palette(&self, index: usize) -> &Palette {
        &self.palettes[self.bounded_index(index)]
    }

    pub fn palette_mut(&mut self, index: usize) -> &mut Palette {
        let index = self.bounded_index(index);
        &mut self.palettes[index]
    }

    pub fn index_of(&self, id: Uuid) -> Option<usize> {
        self.palettes.iter().position(|palette| palette.id == id)
    }

    /// The index after `index`, wrapping around.
    pub fn next_index(&self, index: usize) -> usize {
        (self.bounded_index(index) + 1) % self.palettes.len()
    }

    /// Inserts a palette at `index` (clamped) and returns where it landed.
    pub fn insert_palette(&mut self, name: impl Into<String>, emojis: &str, index: usize) -> usize {
        let index = index.min(self.palettes.len());
        self.palettes.insert(index, Palette::new(name, emojis));
        index
    }

    /// Removes the palette at `index`, re-seeding if it was the last one.
    /// Returns the index that should be shown next.
    pub fn remove_palette(&mut self, index: usize) -> usize {
        if index < self.palettes.len() {
            let removed = self.palettes.remove(index);
            log::info!("Removed palette {}", removed.name);
        }
        if self.palettes.is_empty() {
            self.seed();
        }
        self.bounded_index(index)
    }

    /// Moves the palette at `from` so that it ends up at `to`.
    pub fn move_palette(&mut self, from: usize, to: usize) {
        if from >= self.palettes.len() {
            return;
        }
        let palette = self.palettes.remove(from);
        let to = to.min(self.palettes.len());
        self.palettes.insert(to, palette);
    }

    /// Fixes up a store restored from storage.
    pub fn sanitized(mut self) -> Self {
        if self.palettes.is_empty() {
            self.seed();
        }
        self
    }
}

const DEFAULT_PALETTES: &[(&str, &str)] = &[
    ("Vehicles", "🚙🚗🚘🚕🚖🏎🚚🛻🚛🚐🚓🚔🚑🚒🚀✈️🛫🛬🛩🚁🛸🚲🏍🛶⛵️🚤🛥🛳⛴🚢🚂🚝🚅🚆🚊🚉🚇🛺🚜"),
    ("Sports", "🏈⚾️🏀⚽️🎾🏐🥏🏓⛳️🥅🥌🏂⛷🎳"),
    ("Music", "🎼🎤🎹🪘🥁🎺🪗🪕🎻"),
    ("Animals", "🐥🐣🐂🐄🐎🐖🐏🐑🦙🐐🐓🐁🐀🐒🦆🦅🦉🦇🐢🐍🦎🦖🦕🐅🐆🦓🦍🦧🦣🐘🦛🦏🐪🐫🦒🦘🦬🐃🦙🐐🦌🐕🐩🦮🐈🦤🦢🦩🕊🦝🦨🦡🦫🦦🦥🐿🦔"),
    ("Animal Faces", "🐵🙈🙊🙉🐶🐱🐭🐹🐰🦊🐻🐼🐻‍❄️🐨🐯🦁🐮🐷🐸🐲"),
    ("Flora", "🌲🌴🌿☘️🍀🍁🍄🌾💐🌷🌹🥀🌺🌸🌼🌻"),
    ("Weather", "☀️🌤⛅️🌥☁️🌦🌧⛈🌩🌨❄️💨☔️💧💦🌊☂️🌫🌪"),
    ("COVID", "💉🦠😷🤧🤒"),
    ("Faces", "😀😃😄😁😆😅😂🤣🥲☺️😊😇🙂🙃😉😌😍🥰😘😗😙😚😋😛😝😜🤪🤨🧐🤓😎🥸🤩🥳😏😞😔😟😕🙁☹️😣😖😫😩🥺😢😭😤😠😡🤯😳🥶😥😓🤗🤔🤭🤫🤥😬🙄😯😧🥱😴🤮😷🤧🤒🤠"),
];
