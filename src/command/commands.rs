use egui::Vec2;
use serde::{Deserialize, Serialize};

use super::{CommandContext, CommandResult};
use crate::canvas::DocCoord;
use crate::document::{Background, Emoji, EmojiId};
use crate::error::DocumentError;
use crate::event::DocumentEvent;

/// Undoable edits to a [`crate::document::Document`].
///
/// Executing a command returns the command that reverses it. Batch variants
/// touch several emoji but form a single undo step. Every id is checked
/// before anything is mutated, so a failing command leaves the document as
/// it was.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub enum Command {
    /// Put emoji at the given list indices (ascending)
    InsertEmojis { entries: Vec<(usize, Emoji)> },

    /// Take emoji out of the document
    RemoveEmojis { ids: Vec<EmojiId> },

    /// Offset emoji by a document-space delta
    MoveEmojis { ids: Vec<EmojiId>, delta: Vec2 },

    /// Put emoji at absolute positions
    PlaceEmojis { positions: Vec<(EmojiId, DocCoord)> },

    /// Scale each emoji's own size by `factor`
    ScaleEmojis { ids: Vec<EmojiId>, factor: f32 },

    /// Set absolute sizes
    ResizeEmojis { sizes: Vec<(EmojiId, u32)> },

    /// Flip one emoji's selection flag
    ToggleSelection { id: EmojiId },

    /// Select exactly these emoji
    SetSelection { ids: Vec<EmojiId> },

    /// Replace the background
    SetBackground { background: Background },
}

impl Command {
    /// Name shown next to undo/redo controls
    pub fn name(&self) -> &'static str {
        match self {
            Command::InsertEmojis { .. } => "Add Emoji",
            Command::RemoveEmojis { .. } => "Delete",
            Command::MoveEmojis { .. } | Command::PlaceEmojis { .. } => "Move",
            Command::ScaleEmojis { .. } | Command::ResizeEmojis { .. } => "Scale",
            Command::ToggleSelection { .. } | Command::SetSelection { .. } => "Select",
            Command::SetBackground { .. } => "Set Background",
        }
    }

    /// Execute the command, returning its inverse
    pub fn execute(&self, ctx: &mut CommandContext<'_>) -> CommandResult<Command> {
        match self {
            Command::InsertEmojis { entries } => {
                let mut entries = entries.clone();
                entries.sort_by_key(|(index, _)| *index);
                let ids: Vec<_> = entries.iter().map(|(_, emoji)| emoji.id).collect();
                for (index, emoji) in entries {
                    ctx.document.insert_emoji(index, emoji);
                }
                ctx.emit(DocumentEvent::EmojisAdded { ids: ids.clone() });
                Ok(Command::RemoveEmojis { ids })
            }

            Command::RemoveEmojis { ids } => {
                let mut indices = Vec::with_capacity(ids.len());
                for id in ids {
                    let index = ctx
                        .document
                        .index_of(*id)
                        .ok_or(DocumentError::UnknownEmoji(*id))?;
                    indices.push((index, *id));
                }
                indices.sort_by_key(|(index, _)| std::cmp::Reverse(*index));
                indices.dedup();

                let mut entries = Vec::with_capacity(indices.len());
                for (_, id) in indices {
                    entries.push(ctx.document.remove_emoji(id)?);
                }
                entries.reverse();
                ctx.emit(DocumentEvent::EmojisRemoved { ids: ids.clone() });
                Ok(Command::InsertEmojis { entries })
            }

            Command::MoveEmojis { ids, delta } => {
                check_ids(ctx, ids)?;
                let mut positions = Vec::with_capacity(ids.len());
                for id in ids {
                    positions.push((*id, ctx.document.move_emoji(*id, *delta)?));
                }
                ctx.emit(DocumentEvent::EmojisMoved { ids: ids.clone() });
                Ok(Command::PlaceEmojis { positions })
            }

            Command::PlaceEmojis { positions } => {
                let ids: Vec<_> = positions.iter().map(|(id, _)| *id).collect();
                check_ids(ctx, &ids)?;
                let mut previous = Vec::with_capacity(positions.len());
                for (id, at) in positions {
                    previous.push((*id, ctx.document.place_emoji(*id, *at)?));
                }
                ctx.emit(DocumentEvent::EmojisMoved { ids });
                Ok(Command::PlaceEmojis { positions: previous })
            }

            Command::ScaleEmojis { ids, factor } => {
                check_ids(ctx, ids)?;
                let mut sizes = Vec::with_capacity(ids.len());
                for id in ids {
                    sizes.push((*id, ctx.document.scale_emoji(*id, *factor)?));
                }
                ctx.emit(DocumentEvent::EmojisResized { ids: ids.clone() });
                Ok(Command::ResizeEmojis { sizes })
            }

            Command::ResizeEmojis { sizes } => {
                let ids: Vec<_> = sizes.iter().map(|(id, _)| *id).collect();
                check_ids(ctx, &ids)?;
                let mut previous = Vec::with_capacity(sizes.len());
                for (id, size) in sizes {
                    previous.push((*id, ctx.document.resize_emoji(*id, *size)?));
                }
                ctx.emit(DocumentEvent::EmojisResized { ids });
                Ok(Command::ResizeEmojis { sizes: previous })
            }

            Command::ToggleSelection { id } => {
                let selected = ctx.document.select_emoji(*id)?;
                ctx.emit(DocumentEvent::SelectionToggled { id: *id, selected });
                Ok(Command::ToggleSelection { id: *id })
            }

            Command::SetSelection { ids } => {
                let previous = ctx.document.set_selection(ids)?;
                ctx.emit(DocumentEvent::SelectionChanged { ids: ids.clone() });
                Ok(Command::SetSelection { ids: previous })
            }

            Command::SetBackground { background } => {
                let old = ctx.document.set_background(background.clone());
                ctx.emit(DocumentEvent::BackgroundChanged);
                Ok(Command::SetBackground { background: old })
            }
        }
    }
}

fn check_ids(ctx: &CommandContext<'_>, ids: &[EmojiId]) -> CommandResult {
    match ids.iter().find(|id| ctx.document.emoji(**id).is_none()) {
        Some(id) => Err(DocumentError::UnknownEmoji(*id).into()),
        None => Ok(()),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::document::Document;
    use crate::event::EventBus;
    use egui::vec2;

    fn three_emoji() -> Document {
        let mut document = Document::new();
        document.add_emoji("A", DocCoord::new(0, 0), 40.0);
        document.add_emoji("B", DocCoord::new(10, 0), 40.0);
        document.add_emoji("C", DocCoord::new(20, 0), 40.0);
        document
    }

    #[test]
    fn test_remove_then_inverse_restores_order() {
        let mut document = three_emoji();
        let before = document.clone();
        let bus = EventBus::new();
        let mut ctx = CommandContext::new(&mut document, &bus);

        let inverse = Command::RemoveEmojis { ids: vec![2, 0] }.execute(&mut ctx).unwrap();
        assert_eq!(ctx.document.emojis().len(), 1);

        inverse.execute(&mut ctx).unwrap();
        assert_eq!(*ctx.document, before);
    }

    #[test]
    fn test_batch_with_unknown_id_changes_nothing() {
        let mut document = three_emoji();
        let before = document.clone();
        let bus = EventBus::new();
        let mut ctx = CommandContext::new(&mut document, &bus);

        let result = Command::MoveEmojis {
            ids: vec![0, 99],
            delta: vec2(5.0, 5.0),
        }
        .execute(&mut ctx);

        assert!(result.is_err());
        assert_eq!(document, before);
    }

    #[test]
    fn test_scale_inverse_restores_exact_sizes() {
        let mut document = three_emoji();
        let bus = EventBus::new();
        let mut ctx = CommandContext::new(&mut document, &bus);

        let inverse = Command::ScaleEmojis {
            ids: vec![0, 1],
            factor: 0.001,
        }
        .execute(&mut ctx)
        .unwrap();
        assert_eq!(ctx.document.emoji(0).unwrap().size, 1);

        inverse.execute(&mut ctx).unwrap();
        assert_eq!(ctx.document.emoji(0).unwrap().size, 40);
        assert_eq!(ctx.document.emoji(1).unwrap().size, 40);
    }

    #[test]
    fn test_set_selection_inverse_restores_previous_selection() {
        let mut document = three_emoji();
        document.select_emoji(0).unwrap();
        document.select_emoji(2).unwrap();
        let bus = EventBus::new();
        let mut ctx = CommandContext::new(&mut document, &bus);

        let inverse = Command::SetSelection { ids: vec![] }.execute(&mut ctx).unwrap();
        assert_eq!(inverse, Command::SetSelection { ids: vec![0, 2] });
        assert!(!ctx.document.has_selection());

        inverse.execute(&mut ctx).unwrap();
        assert_eq!(ctx.document.selected_ids(), vec![0, 2]);
    }
}
