use std::cell::RefCell;
use std::rc::Rc;

use crate::background::{Notice, ThreadFetcher};
use crate::canvas::Viewport;
use crate::config::AppConfig;
use crate::document::Document;
use crate::event::EditorEvent;
use crate::palette::PaletteStore;
use crate::panels::{self, CanvasInput, PaletteChooser};
use crate::renderer::Renderer;
use crate::state::{DocumentStore, Editor};

const VIEWPORT_KEY: &str = "EmojiArtViewport";

pub struct EmojiArtApp {
    editor: Editor,
    palettes: Rc<RefCell<PaletteStore>>,
    chooser: PaletteChooser,
    canvas_input: CanvasInput,
    renderer: Renderer,
    store: DocumentStore,
    config: AppConfig,
    // Notice currently on screen
    notice: Option<Notice>,
}

impl std::fmt::Debug for EmojiArtApp {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("EmojiArtApp")
            .field("editor", &self.editor)
            .field("config", &self.config)
            .finish_non_exhaustive()
    }
}

impl EmojiArtApp {
    /// Called once before the first frame.
    pub fn new(cc: &eframe::CreationContext<'_>, config: AppConfig) -> Self {
        let viewport = cc
            .storage
            .and_then(|storage| eframe::get_value::<Viewport>(storage, VIEWPORT_KEY))
            .unwrap_or_default();

        let palette_key = PaletteStore::new(config.palette_store_name.clone()).storage_key();
        let palettes = cc
            .storage
            .and_then(|storage| eframe::get_value::<PaletteStore>(storage, &palette_key))
            .map(PaletteStore::sanitized)
            .unwrap_or_else(|| PaletteStore::new(config.palette_store_name.clone()));

        let store = DocumentStore::new(config.data_dir.clone());
        let document = if store.exists(&config.document_name) {
            store.load(&config.document_name).unwrap_or_else(|err| {
                log::error!("Failed to load {}: {}", config.document_name, err);
                Document::new()
            })
        } else {
            Document::new()
        };

        let editor = Editor::new(document, Box::new(ThreadFetcher::new()))
            .with_viewport(viewport)
            .with_default_emoji_font_size(config.default_emoji_font_size);

        let ctx = cc.egui_ctx.clone();
        editor.events().subscribe(Box::new(move |event: &EditorEvent| {
            log::trace!("Repaint for {:?}", event);
            ctx.request_repaint();
        }));

        Self::with_parts(editor, Rc::new(RefCell::new(palettes)), store, config)
    }

    /// Builds an app around an existing editor, without eframe storage.
    pub fn with_parts(
        editor: Editor,
        palettes: Rc<RefCell<PaletteStore>>,
        store: DocumentStore,
        config: AppConfig,
    ) -> Self {
        Self {
            editor,
            chooser: PaletteChooser::new(Rc::clone(&palettes)),
            palettes,
            canvas_input: CanvasInput::default(),
            renderer: Renderer::new(),
            store,
            config,
            notice: None,
        }
    }

    pub fn editor(&self) -> &Editor {
        &self.editor
    }

    pub fn editor_mut(&mut self) -> &mut Editor {
        &mut self.editor
    }

    pub fn config(&self) -> &AppConfig {
        &self.config
    }

    pub fn palettes(&self) -> Rc<RefCell<PaletteStore>> {
        Rc::clone(&self.palettes)
    }

    pub fn chooser_mut(&mut self) -> &mut PaletteChooser {
        &mut self.chooser
    }

    /// Split borrow for the canvas panel: input state, editor and renderer.
    pub fn canvas_parts(&mut self) -> (&mut CanvasInput, &mut Editor, &mut Renderer) {
        (&mut self.canvas_input, &mut self.editor, &mut self.renderer)
    }

    pub fn save_document(&mut self) {
        let name = self.config.document_name.clone();
        if let Err(err) = self.store.save(&name, self.editor.document()) {
            log::error!("Failed to save {}: {}", name, err);
            self.notice = Some(Notice {
                title: "Save".to_owned(),
                message: format!("Couldn't save {name}: {err}"),
            });
        }
    }

    fn show_notice(&mut self, ctx: &egui::Context) {
        if self.notice.is_none() {
            self.notice = self.editor.take_notice();
        }
        let Some(notice) = &self.notice else {
            return;
        };

        let mut dismissed = false;
        egui::Window::new(notice.title.as_str())
            .collapsible(false)
            .resizable(false)
            .anchor(egui::Align2::CENTER_CENTER, egui::Vec2::ZERO)
            .show(ctx, |ui| {
                ui.label(notice.message.as_str());
                if ui.button("OK").clicked() {
                    dismissed = true;
                }
            });
        if dismissed {
            self.notice = None;
        }
    }
}

impl eframe::App for EmojiArtApp {
    /// Called by the frame work to save state before shutdown.
    fn save(&mut self, storage: &mut dyn eframe::Storage) {
        eframe::set_value(storage, VIEWPORT_KEY, &self.editor.viewport());
        {
            let palettes = self.palettes.borrow();
            eframe::set_value(storage, &palettes.storage_key(), &*palettes);
        }
        self.save_document();
    }

    /// Called each time the UI needs repainting, which may be many times per second.
    fn update(&mut self, ctx: &egui::Context, _frame: &mut eframe::Frame) {
        self.editor.poll_background();
        if self.editor.fetch_status().is_fetching() {
            ctx.request_repaint_after(std::time::Duration::from_millis(100));
        }

        panels::toolbar_panel(self, ctx);
        panels::palette_panel(self, ctx);
        panels::canvas_panel(self, ctx);

        self.show_notice(ctx);
    }
}
