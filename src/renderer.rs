use egui::{Align2, Color32, ColorImage, FontId, Pos2, Rect, TextureHandle, TextureOptions, Vec2};

use crate::canvas::DocCoord;
use crate::state::Editor;

const SELECTION_SHADOW: Color32 = Color32::from_rgba_premultiplied(0, 90, 200, 200);

/// Draws the editor's document into a canvas rect.
///
/// Holds the background texture, re-uploading it only when the editor's
/// background generation changes.
#[derive(Default)]
pub struct Renderer {
    background: Option<(u64, TextureHandle)>,
}

impl std::fmt::Debug for Renderer {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Renderer")
            .field("background_generation", &self.background.as_ref().map(|(g, _)| *g))
            .finish()
    }
}

impl Renderer {
    pub fn new() -> Self {
        Self::default()
    }

    /// Renders the current frame
    ///
    /// Args:
    ///     ui (egui::Ui): The UI the canvas was allocated in
    ///     painter (egui::Painter): The painter clipped to the canvas
    ///     editor (Editor): The editor whose document is drawn
    pub fn render(&mut self, ui: &egui::Ui, painter: &egui::Painter, editor: &Editor) {
        let rect = editor.surface();
        painter.rect_filled(rect, 0.0, Color32::WHITE);

        self.paint_background(ui.ctx(), painter, editor);

        if editor.fetch_status().is_fetching() {
            egui::Spinner::new()
                .size(48.0)
                .paint_at(ui, Rect::from_center_size(rect.center(), Vec2::splat(48.0)));
            return;
        }

        for emoji in editor.document().emojis() {
            let at = editor.to_screen(editor.emoji_position(emoji));
            let font = FontId::proportional(editor.emoji_font_size(emoji).max(1.0));
            if emoji.is_selected {
                painter.text(
                    at + Vec2::splat(2.0),
                    Align2::CENTER_CENTER,
                    &emoji.text,
                    font.clone(),
                    SELECTION_SHADOW,
                );
            }
            painter.text(at, Align2::CENTER_CENTER, &emoji.text, font, Color32::BLACK);
        }
    }

    fn paint_background(&mut self, ctx: &egui::Context, painter: &egui::Painter, editor: &Editor) {
        let Some(image) = editor.background_image() else {
            self.background = None;
            return;
        };

        let generation = editor.background_generation();
        let stale = self
            .background
            .as_ref()
            .is_none_or(|(cached, _)| *cached != generation);
        if stale {
            log::debug!("Uploading background texture (generation {})", generation);
            let color_image = ColorImage::from_rgba_unmultiplied(image.size, &image.rgba);
            let handle = ctx.load_texture(
                format!("background_{generation}"),
                color_image,
                TextureOptions::LINEAR,
            );
            self.background = Some((generation, handle));
        }

        if let Some((_, texture)) = &self.background {
            let rect = image_rect(
                editor.to_screen(DocCoord::ORIGIN),
                image.size_vec(),
                editor.zoom_scale(),
            );
            painter.image(
                texture.id(),
                rect,
                Rect::from_min_max(Pos2::ZERO, Pos2::new(1.0, 1.0)),
                Color32::WHITE,
            );
        }
    }
}

/// Screen rect of an image of `size` pixels centered on `origin` at `zoom`.
pub fn image_rect(origin: Pos2, size: Vec2, zoom: f32) -> Rect {
    Rect::from_center_size(origin, size * zoom)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_image_rect_scales_about_origin() {
        let rect = image_rect(Pos2::new(100.0, 50.0), Vec2::new(40.0, 20.0), 2.0);
        assert_eq!(rect.center(), Pos2::new(100.0, 50.0));
        assert_eq!(rect.size(), Vec2::new(80.0, 40.0));
    }

    #[test]
    fn test_renderer_starts_without_texture() {
        let renderer = Renderer::new();
        assert!(renderer.background.is_none());
    }
}
