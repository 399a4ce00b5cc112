use std::cell::RefCell;
use std::rc::Rc;

use egui::{Id, RichText, ScrollArea};

use super::canvas::PaletteEmoji;
use crate::EmojiArtApp;
use crate::palette::PaletteStore;

const EMOJI_POINTS: f32 = 40.0;

/// Which palette is showing, plus the editor and manager windows.
#[derive(Debug)]
pub struct PaletteChooser {
    palettes: Rc<RefCell<PaletteStore>>,
    chosen: usize,
    editing: bool,
    managing: bool,
    emojis_to_add: String,
}

impl PaletteChooser {
    pub fn new(palettes: Rc<RefCell<PaletteStore>>) -> Self {
        Self {
            palettes,
            chosen: 0,
            editing: false,
            managing: false,
            emojis_to_add: String::new(),
        }
    }

    pub fn chosen_index(&self) -> usize {
        self.palettes.borrow().bounded_index(self.chosen)
    }

    pub fn next_palette(&mut self) {
        self.chosen = self.palettes.borrow().next_index(self.chosen);
    }

    /// Inserts an empty palette in front of the current one and opens it
    /// in the editor.
    pub fn new_palette(&mut self) {
        let at = self.chosen_index();
        self.chosen = self.palettes.borrow_mut().insert_palette("New", "", at);
        self.editing = true;
    }

    pub fn delete_palette(&mut self) {
        let at = self.chosen_index();
        self.chosen = self.palettes.borrow_mut().remove_palette(at);
    }

    fn show(&mut self, ui: &mut egui::Ui) {
        let index = self.chosen_index();
        let (name, emojis) = {
            let store = self.palettes.borrow();
            let palette = store.palette(index);
            (
                palette.name.clone(),
                palette
                    .graphemes()
                    .into_iter()
                    .map(str::to_owned)
                    .collect::<Vec<_>>(),
            )
        };

        ui.horizontal(|ui| {
            let title = ui.button(RichText::new(&name).size(EMOJI_POINTS * 0.5));
            if title.clicked() {
                self.next_palette();
            }
            title.context_menu(|ui| {
                if ui.button("New").clicked() {
                    self.new_palette();
                    ui.close_menu();
                }
                if ui.button("Edit").clicked() {
                    self.editing = true;
                    ui.close_menu();
                }
                if ui.button("Delete").clicked() {
                    self.delete_palette();
                    ui.close_menu();
                }
                if ui.button("Manager").clicked() {
                    self.managing = true;
                    ui.close_menu();
                }
            });

            ScrollArea::horizontal().show(ui, |ui| {
                ui.horizontal(|ui| {
                    for (i, emoji) in emojis.iter().enumerate() {
                        let id = Id::new(("palette_emoji", index, i));
                        ui.dnd_drag_source(id, PaletteEmoji(emoji.clone()), |ui| {
                            ui.label(RichText::new(emoji).size(EMOJI_POINTS));
                        });
                    }
                });
            });
        });
    }

    fn show_editor(&mut self, ctx: &egui::Context) {
        if !self.editing {
            return;
        }
        let index = self.chosen_index();
        let mut open = true;
        egui::Window::new("Edit Palette")
            .open(&mut open)
            .collapsible(false)
            .show(ctx, |ui| {
                let mut store = self.palettes.borrow_mut();
                let palette = store.palette_mut(index);

                ui.horizontal(|ui| {
                    ui.label("Name");
                    ui.text_edit_singleline(&mut palette.name);
                });
                ui.horizontal(|ui| {
                    ui.label("Add Emojis");
                    let field = ui.text_edit_singleline(&mut self.emojis_to_add);
                    if field.lost_focus() && !self.emojis_to_add.is_empty() {
                        palette.add_emojis(&self.emojis_to_add);
                        self.emojis_to_add.clear();
                    }
                });

                ui.separator();
                ui.label("Tap an emoji to remove it");
                let mut removed = None;
                ui.horizontal_wrapped(|ui| {
                    for emoji in palette.graphemes() {
                        if ui.button(RichText::new(emoji).size(EMOJI_POINTS * 0.75)).clicked() {
                            removed = Some(emoji.to_owned());
                        }
                    }
                });
                if let Some(emoji) = removed {
                    palette.remove_emoji(&emoji);
                }
            });
        self.editing = open;
    }

    fn show_manager(&mut self, ctx: &egui::Context) {
        if !self.managing {
            return;
        }
        let mut open = true;
        egui::Window::new("Manage Palettes")
            .open(&mut open)
            .show(ctx, |ui| {
                let rows: Vec<(String, String)> = self
                    .palettes
                    .borrow()
                    .palettes()
                    .iter()
                    .map(|palette| (palette.name.clone(), palette.emojis.clone()))
                    .collect();
                let last = rows.len().saturating_sub(1);

                let mut action = None;
                egui::Grid::new("palette_manager_grid")
                    .num_columns(2)
                    .striped(true)
                    .show(ui, |ui| {
                        for (i, (name, emojis)) in rows.iter().enumerate() {
                            ui.vertical(|ui| {
                                if ui.selectable_label(i == self.chosen, name).clicked() {
                                    action = Some(ManagerAction::Choose(i));
                                }
                                ui.label(emojis);
                            });
                            ui.horizontal(|ui| {
                                if ui.add_enabled(i > 0, egui::Button::new("⬆")).clicked() {
                                    action = Some(ManagerAction::Move(i, i - 1));
                                }
                                if ui.add_enabled(i < last, egui::Button::new("⬇")).clicked() {
                                    action = Some(ManagerAction::Move(i, i + 1));
                                }
                                if ui.button("Delete").clicked() {
                                    action = Some(ManagerAction::Delete(i));
                                }
                            });
                            ui.end_row();
                        }
                    });

                match action {
                    Some(ManagerAction::Choose(i)) => self.chosen = i,
                    Some(ManagerAction::Move(from, to)) => {
                        self.palettes.borrow_mut().move_palette(from, to);
                        if self.chosen == from {
                            self.chosen = to;
                        }
                    }
                    Some(ManagerAction::Delete(i)) => {
                        self.chosen = self.palettes.borrow_mut().remove_palette(i);
                    }
                    None => {}
                }
            });
        self.managing = open;
    }
}

enum ManagerAction {
    Choose(usize),
    Move(usize, usize),
    Delete(usize),
}

pub fn palette_panel(app: &mut EmojiArtApp, ctx: &egui::Context) {
    let chooser = app.chooser_mut();
    egui::TopBottomPanel::bottom("palette_chooser")
        .resizable(false)
        .show(ctx, |ui| {
            chooser.show(ui);
        });
    chooser.show_editor(ctx);
    chooser.show_manager(ctx);
}

#[cfg(test)]
mod tests {
    use super::*;

    fn chooser() -> PaletteChooser {
        PaletteChooser::new(Rc::new(RefCell::new(PaletteStore::new("Test"))))
    }

    #[test]
    fn test_next_palette_wraps() {
        let mut chooser = chooser();
        let count = chooser.palettes.borrow().len();
        for _ in 0..count {
            chooser.next_palette();
        }
        assert_eq!(chooser.chosen_index(), 0);
    }

    #[test]
    fn test_new_palette_is_chosen_and_edited() {
        let mut chooser = chooser();
        chooser.next_palette();
        chooser.new_palette();
        assert_eq!(chooser.chosen_index(), 1);
        assert!(chooser.editing);
        assert_eq!(chooser.palettes.borrow().palette(1).name, "New");
    }

    #[test]
    fn test_deleting_every_palette_keeps_one() {
        let mut chooser = chooser();
        let count = chooser.palettes.borrow().len();
        for _ in 0..count + 2 {
            chooser.delete_palette();
        }
        assert!(!chooser.palettes.borrow().is_empty());
    }
}
