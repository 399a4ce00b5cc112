use egui::{Event, Key, Modifiers, Sense, Vec2};

use crate::EmojiArtApp;
use crate::document::EmojiId;
use crate::input::{DropPayload, Pasteboard};
use crate::state::Editor;

/// Drag-and-drop payload carried from the palette chooser to the canvas
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PaletteEmoji(pub String);

/// Pointer bookkeeping that outlives a single frame
#[derive(Debug, Default)]
pub struct CanvasInput {
    /// Screen translation accumulated by the current drag
    drag_translation: Vec2,
    /// Cumulative scale of the current magnification
    magnify_scale: Option<f32>,
}

impl CanvasInput {
    fn reset(&mut self) {
        self.drag_translation = Vec2::ZERO;
        self.magnify_scale = None;
    }
}

pub fn canvas_panel(app: &mut EmojiArtApp, ctx: &egui::Context) {
    let double_tap_zooms = app.config().double_tap_zooms_to_fit;

    egui::CentralPanel::default()
        .frame(egui::Frame::none())
        .show(ctx, |ui| {
            let (response, painter) =
                ui.allocate_painter(ui.available_size(), Sense::click_and_drag());
            let (input, editor, renderer) = app.canvas_parts();
            editor.set_surface(response.rect);

            handle_taps(&response, editor, double_tap_zooms);
            handle_drag(ui, &response, input, editor);
            handle_magnify(ui, &response, input, editor);
            handle_keys(ui, input, editor);
            handle_drops(ui, &response, editor);

            renderer.render(ui, &painter, editor);
        });
}

/// What a click on the canvas does
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TapAction {
    Toggle(EmojiId),
    ClearSelection,
    ZoomToFit,
}

/// Maps a click to its action.
///
/// egui reports the second click of a double click as both `clicked` and
/// `double_clicked`. That click is not treated as a tap, so a double click on
/// an emoji toggles it exactly once (on the first click).
pub fn tap_action(
    hit: Option<EmojiId>,
    clicked: bool,
    double_clicked: bool,
    double_tap_zooms: bool,
) -> Option<TapAction> {
    if double_clicked {
        return (hit.is_none() && double_tap_zooms).then_some(TapAction::ZoomToFit);
    }
    if !clicked {
        return None;
    }
    Some(match hit {
        Some(id) => TapAction::Toggle(id),
        None => TapAction::ClearSelection,
    })
}

fn handle_taps(response: &egui::Response, editor: &mut Editor, double_tap_zooms: bool) {
    let Some(pos) = response.interact_pointer_pos() else {
        return;
    };
    let hit = editor.emoji_at(pos);
    let action = tap_action(hit, response.clicked(), response.double_clicked(), double_tap_zooms);

    let result = match action {
        None => return,
        Some(TapAction::ZoomToFit) => {
            editor.zoom_to_fit();
            Ok(())
        }
        Some(TapAction::Toggle(id)) => editor.select_emoji(id),
        Some(TapAction::ClearSelection) => editor.clear_selection(),
    };
    if let Err(err) = result {
        log::warn!("Tap failed: {}", err);
    }
}

fn handle_drag(ui: &egui::Ui, response: &egui::Response, input: &mut CanvasInput, editor: &mut Editor) {
    if response.drag_started() {
        let origin = ui
            .input(|i| i.pointer.press_origin())
            .or_else(|| response.interact_pointer_pos());
        input.drag_translation = Vec2::ZERO;
        let begun = match origin {
            Some(origin) => editor.begin_drag_at(origin),
            None => editor.begin_drag(None),
        };
        if let Err(err) = begun {
            log::debug!("Drag not started: {}", err);
        }
    }

    if response.dragged() && editor.gestures().is_dragging() {
        input.drag_translation += response.drag_delta();
        if let Err(err) = editor.update_drag(input.drag_translation) {
            log::debug!("Drag update ignored: {}", err);
        }
    }

    if response.drag_stopped() && editor.gestures().is_dragging() {
        input.drag_translation += response.drag_delta();
        if let Err(err) = editor.end_drag(input.drag_translation) {
            log::warn!("Drag end failed: {}", err);
        }
        input.drag_translation = Vec2::ZERO;
    }
}

fn handle_magnify(ui: &egui::Ui, response: &egui::Response, input: &mut CanvasInput, editor: &mut Editor) {
    let (zoom_delta, touching) = ui.input(|i| (i.zoom_delta(), i.multi_touch().is_some()));
    let zooming = response.hovered() && (zoom_delta != 1.0 || touching);

    match (input.magnify_scale, zooming) {
        (None, true) => {
            if editor.begin_magnify().is_ok() {
                input.magnify_scale = Some(zoom_delta);
                if let Err(err) = editor.update_magnify(zoom_delta) {
                    log::debug!("Magnify update ignored: {}", err);
                }
            }
        }
        (Some(scale), true) => {
            let scale = scale * zoom_delta;
            input.magnify_scale = Some(scale);
            if let Err(err) = editor.update_magnify(scale) {
                log::debug!("Magnify update ignored: {}", err);
            }
        }
        (Some(scale), false) => {
            input.magnify_scale = None;
            if let Err(err) = editor.end_magnify(scale) {
                log::warn!("Magnify end failed: {}", err);
            }
        }
        (None, false) => {}
    }
}

fn handle_keys(ui: &egui::Ui, input: &mut CanvasInput, editor: &mut Editor) {
    // Text fields own the keyboard while focused.
    if ui.memory(|m| m.focused().is_some()) {
        return;
    }

    if ui.input(|i| i.key_pressed(Key::Escape)) {
        editor.cancel_drag();
        editor.cancel_magnify();
        input.reset();
    }

    let delete = ui.input(|i| i.key_pressed(Key::Delete) || i.key_pressed(Key::Backspace));
    if delete {
        if let Err(err) = editor.delete_selected() {
            log::warn!("Delete failed: {}", err);
        }
    }

    // Shift+Cmd+Z first: the plain Cmd+Z shortcut also matches it.
    if ui.input_mut(|i| i.consume_key(Modifiers::COMMAND | Modifiers::SHIFT, Key::Z)) {
        if let Err(err) = editor.redo() {
            log::debug!("Redo: {}", err);
        }
    } else if ui.input_mut(|i| i.consume_key(Modifiers::COMMAND, Key::Z)) {
        if let Err(err) = editor.undo() {
            log::debug!("Undo: {}", err);
        }
    }

    let pasted = ui.input(|i| {
        i.events.iter().find_map(|event| match event {
            Event::Paste(text) => Some(text.clone()),
            _ => None,
        })
    });
    if let Some(text) = pasted {
        editor.paste_background(&Pasteboard::from_text(&text));
    }
}

fn handle_drops(ui: &egui::Ui, response: &egui::Response, editor: &mut Editor) {
    let fallback = response.rect.center();

    if let Some(emoji) = response.dnd_release_payload::<PaletteEmoji>() {
        let at = response.hover_pos().unwrap_or(fallback);
        editor.drop_payloads(&[DropPayload::Text(emoji.0.clone())], at);
    }

    let (files, hover) = ui.input(|i| (i.raw.dropped_files.clone(), i.pointer.hover_pos()));
    if files.is_empty() {
        return;
    }
    let payloads: Vec<DropPayload> = files.iter().filter_map(dropped_file_payload).collect();
    let at = hover.filter(|pos| response.rect.contains(*pos)).unwrap_or(fallback);
    editor.drop_payloads(&payloads, at);
}

/// Turns a file dropped from the OS into a drop payload.
pub fn dropped_file_payload(file: &egui::DroppedFile) -> Option<DropPayload> {
    if let Some(bytes) = &file.bytes {
        log::info!("Dropped {} ({} bytes)", file.name, bytes.len());
        return Some(DropPayload::ImageBytes(bytes.to_vec()));
    }
    let path = file.path.as_ref()?;
    match std::fs::read(path) {
        Ok(bytes) => Some(DropPayload::ImageBytes(bytes)),
        Err(err) => {
            log::error!("Failed to read dropped file {}: {}", path.display(), err);
            None
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_double_click_on_emoji_toggles_once() {
        // First click of the pair, then the click that completes the double click
        assert_eq!(tap_action(Some(4), true, false, true), Some(TapAction::Toggle(4)));
        assert_eq!(tap_action(Some(4), true, true, true), None);
    }

    #[test]
    fn test_taps_on_empty_canvas() {
        assert_eq!(tap_action(None, true, false, true), Some(TapAction::ClearSelection));
        assert_eq!(tap_action(None, true, true, true), Some(TapAction::ZoomToFit));
        assert_eq!(tap_action(None, true, true, false), None);
        assert_eq!(tap_action(None, false, false, true), None);
    }

    #[test]
    fn test_dropped_bytes_become_image_payload() {
        let file = egui::DroppedFile {
            name: "a.png".to_owned(),
            bytes: Some(vec![1u8, 2, 3].into()),
            ..Default::default()
        };
        assert_eq!(
            dropped_file_payload(&file),
            Some(DropPayload::ImageBytes(vec![1, 2, 3]))
        );
    }

    #[test]
    fn test_unreadable_path_is_skipped() {
        let file = egui::DroppedFile {
            path: Some(std::env::temp_dir().join(format!("missing-{}", uuid::Uuid::new_v4()))),
            ..Default::default()
        };
        assert_eq!(dropped_file_payload(&file), None);
    }
}
