use egui::Vec2;

use crate::background::FetchStatus;
use crate::document::EmojiId;

#[derive(Debug, Clone, PartialEq)]
pub enum EditorEvent {
    DocumentChanged(DocumentEvent),
    ViewChanged {
        zoom: f32,
        pan: Vec2,
    },
    FetchStatusChanged(FetchStatus),
    HistoryChanged {
        can_undo: bool,
        can_redo: bool,
    },
}

#[derive(Debug, Clone, PartialEq)]
pub enum DocumentEvent {
    EmojisAdded { ids: Vec<EmojiId> },
    EmojisRemoved { ids: Vec<EmojiId> },
    EmojisMoved { ids: Vec<EmojiId> },
    EmojisResized { ids: Vec<EmojiId> },
    SelectionToggled { id: EmojiId, selected: bool },
    SelectionChanged { ids: Vec<EmojiId> },
    DraggingChanged { id: EmojiId, dragging: bool },
    BackgroundChanged,
    Loaded,
}
