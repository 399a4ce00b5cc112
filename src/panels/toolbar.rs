use crate::EmojiArtApp;
use crate::background::FetchStatus;

pub fn toolbar_panel(app: &mut EmojiArtApp, ctx: &egui::Context) {
    egui::TopBottomPanel::top("toolbar").show(ctx, |ui| {
        ui.horizontal(|ui| {
            let history = app.editor().history();
            let undo_label = history
                .undo_name()
                .map_or_else(|| "Undo".to_owned(), |name| format!("Undo {name}"));
            let redo_label = history
                .redo_name()
                .map_or_else(|| "Redo".to_owned(), |name| format!("Redo {name}"));
            let (can_undo, can_redo) = (history.can_undo(), history.can_redo());

            if ui.add_enabled(can_undo, egui::Button::new(undo_label)).clicked() {
                if let Err(err) = app.editor_mut().undo() {
                    log::warn!("Undo failed: {}", err);
                }
            }
            if ui.add_enabled(can_redo, egui::Button::new(redo_label)).clicked() {
                if let Err(err) = app.editor_mut().redo() {
                    log::warn!("Redo failed: {}", err);
                }
            }

            ui.separator();

            let has_selection = app.editor().document().has_selection();
            if ui
                .add_enabled(has_selection, egui::Button::new("Delete"))
                .clicked()
            {
                if let Err(err) = app.editor_mut().delete_selected() {
                    log::warn!("Delete failed: {}", err);
                }
            }
            if ui.button("Paste Background").clicked() {
                // The clipboard text comes back as a paste event on the canvas.
                ctx.send_viewport_cmd(egui::ViewportCommand::RequestPaste);
            }
            if ui.button("Zoom to Fit").clicked() {
                app.editor_mut().zoom_to_fit();
            }
            if ui.button("Save").clicked() {
                app.save_document();
            }

            ui.separator();

            let editor = app.editor();
            ui.label(format!("{:.0}%", editor.zoom_scale() * 100.0));
            match editor.fetch_status() {
                FetchStatus::Idle => {}
                FetchStatus::Fetching => {
                    ui.label("Fetching background…");
                }
                FetchStatus::Fetched { size } => {
                    ui.label(format!("{}×{}", size.x, size.y));
                }
                FetchStatus::Failed(locator) => {
                    ui.colored_label(egui::Color32::RED, format!("Failed: {locator}"));
                }
            }
        });
    });
}
