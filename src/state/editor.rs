//! The editor: one document plus everything needed to view and edit it.
//!
//! `Editor` owns the document, the steady viewport, the in-flight gesture
//! state, the undo log and the event bus. It is driven from a single thread:
//! the UI calls the gesture and edit methods in response to input, and calls
//! [`Editor::poll_background`] once per frame to pick up fetch results.

use std::collections::VecDeque;

use egui::{Pos2, Rect, Vec2};

use crate::background::{BackgroundFetcher, FetchStatus, FetchedImage, Notice};
use crate::canvas::{CanvasTransform, DocCoord, Viewport, delta_to_doc};
use crate::command::{Command, CommandContext, CommandHistory, CommandResult};
use crate::document::{Background, Document, Emoji, EmojiId};
use crate::error::GestureError;
use crate::event::{DocumentEvent, EditorEvent, EventBus};
use crate::input::{
    DragRoute, DropAction, DropPayload, GestureCommit, GestureState, Pasteboard, interpret_drop,
};

pub struct Editor {
    document: Document,
    viewport: Viewport,
    gestures: GestureState,
    history: CommandHistory,
    event_bus: EventBus,
    fetcher: Box<dyn BackgroundFetcher>,
    fetch_status: FetchStatus,
    fetch_generation: u64,
    /// The background the current fetch generation was requested for
    requested_background: Background,
    background_image: Option<FetchedImage>,
    /// Zoom to fit the next background image that arrives
    autozoom: bool,
    surface: Rect,
    notices: VecDeque<Notice>,
    default_emoji_font_size: f32,
}

impl std::fmt::Debug for Editor {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Editor")
            .field("document", &self.document)
            .field("viewport", &self.viewport)
            .field("gestures", &self.gestures)
            .field("fetch_status", &self.fetch_status)
            .field("surface", &self.surface)
            .finish_non_exhaustive()
    }
}

impl Editor {
    pub fn new(document: Document, fetcher: Box<dyn BackgroundFetcher>) -> Self {
        let mut editor = Self {
            document,
            viewport: Viewport::default(),
            gestures: GestureState::new(),
            history: CommandHistory::new(),
            event_bus: EventBus::new(),
            fetcher,
            fetch_status: FetchStatus::Idle,
            fetch_generation: 0,
            requested_background: Background::Blank,
            background_image: None,
            autozoom: false,
            surface: Rect::from_min_size(Pos2::ZERO, Vec2::ZERO),
            notices: VecDeque::new(),
            default_emoji_font_size: 40.0,
        };
        editor.sync_background();
        editor
    }

    pub fn with_viewport(mut self, viewport: Viewport) -> Self {
        self.viewport = viewport.sanitized();
        self
    }

    pub fn with_default_emoji_font_size(mut self, size: f32) -> Self {
        self.default_emoji_font_size = size;
        self
    }

    // ---- accessors ----

    pub fn document(&self) -> &Document {
        &self.document
    }

    pub fn viewport(&self) -> Viewport {
        self.viewport
    }

    pub fn gestures(&self) -> &GestureState {
        &self.gestures
    }

    pub fn history(&self) -> &CommandHistory {
        &self.history
    }

    /// Subscribe here to observe document, view and fetch changes.
    pub fn events(&self) -> &EventBus {
        &self.event_bus
    }

    pub fn fetch_status(&self) -> &FetchStatus {
        &self.fetch_status
    }

    pub fn background_image(&self) -> Option<&FetchedImage> {
        self.background_image.as_ref()
    }

    /// Bumped whenever a new background is requested.
    pub fn background_generation(&self) -> u64 {
        self.fetch_generation
    }

    pub fn surface(&self) -> Rect {
        self.surface
    }

    /// Replaces the document wholesale, e.g. after loading from disk.
    pub fn load_document(&mut self, document: Document) {
        self.gestures = GestureState::new();
        self.history.clear();
        self.document = document;
        self.event_bus
            .emit(EditorEvent::DocumentChanged(DocumentEvent::Loaded));
        self.emit_history();
        self.sync_background();
    }

    // ---- coordinates ----

    pub fn set_surface(&mut self, surface: Rect) {
        self.surface = surface;
    }

    /// Effective zoom: steady zoom times any in-flight canvas zoom.
    pub fn zoom_scale(&self) -> f32 {
        self.viewport.zoom_scale(self.gestures.zoom_delta())
    }

    /// Effective pan in screen units.
    pub fn pan_offset(&self) -> Vec2 {
        self.viewport.pan_offset(self.gestures.pan_delta())
    }

    pub fn transform(&self) -> CanvasTransform {
        CanvasTransform {
            center: self.surface.center(),
            pan: self.pan_offset(),
            zoom: self.zoom_scale(),
        }
    }

    pub fn to_screen(&self, doc: DocCoord) -> Pos2 {
        self.transform().to_screen(doc)
    }

    pub fn to_doc(&self, screen: Pos2) -> DocCoord {
        self.transform().to_doc(screen)
    }

    /// Document position at which an emoji is drawn this frame.
    pub fn emoji_position(&self, emoji: &Emoji) -> DocCoord {
        emoji.position().offset_by(self.gestures.emoji_offset(emoji.id))
    }

    /// Font size, in screen points, at which an emoji is drawn this frame.
    pub fn emoji_font_size(&self, emoji: &Emoji) -> f32 {
        emoji.size as f32 * self.gestures.emoji_scale(emoji.id) * self.zoom_scale()
    }

    /// Screen rect an emoji occupies this frame.
    pub fn emoji_rect(&self, emoji: &Emoji) -> Rect {
        let size = self.emoji_font_size(emoji);
        Rect::from_center_size(self.to_screen(self.emoji_position(emoji)), Vec2::splat(size))
    }

    /// The topmost emoji under a screen point.
    pub fn emoji_at(&self, screen: Pos2) -> Option<EmojiId> {
        self.document
            .emojis()
            .iter()
            .rev()
            .find(|emoji| self.emoji_rect(emoji).contains(screen))
            .map(|emoji| emoji.id)
    }

    // ---- undoable edits ----

    fn execute(&mut self, command: Command) -> CommandResult {
        let mut ctx = CommandContext::new(&mut self.document, &self.event_bus);
        let result = self.history.execute(command, &mut ctx);
        self.after_history_change();
        result
    }

    pub fn undo(&mut self) -> CommandResult {
        let mut ctx = CommandContext::new(&mut self.document, &self.event_bus);
        let result = self.history.undo(&mut ctx);
        self.after_history_change();
        result
    }

    pub fn redo(&mut self) -> CommandResult {
        let mut ctx = CommandContext::new(&mut self.document, &self.event_bus);
        let result = self.history.redo(&mut ctx);
        self.after_history_change();
        result
    }

    fn after_history_change(&mut self) {
        self.emit_history();
        self.sync_background();
    }

    fn emit_history(&self) {
        self.event_bus.emit(EditorEvent::HistoryChanged {
            can_undo: self.history.can_undo(),
            can_redo: self.history.can_redo(),
        });
    }

    /// Adds an emoji at a document position with a size in document units.
    pub fn add_emoji(&mut self, text: &str, at: DocCoord, size: f32) -> CommandResult<EmojiId> {
        let emoji = self.document.make_emoji(text, at, size);
        let id = emoji.id;
        let index = self.document.emojis().len();
        self.execute(Command::InsertEmojis {
            entries: vec![(index, emoji)],
        })?;
        Ok(id)
    }

    /// Toggles one emoji's selection.
    pub fn select_emoji(&mut self, id: EmojiId) -> CommandResult {
        self.execute(Command::ToggleSelection { id })
    }

    /// Deselects everything as one undo step. Does nothing without a selection.
    pub fn clear_selection(&mut self) -> CommandResult {
        if !self.document.has_selection() {
            return Ok(());
        }
        self.execute(Command::SetSelection { ids: Vec::new() })
    }

    pub fn move_emoji(&mut self, id: EmojiId, delta: Vec2) -> CommandResult {
        self.execute(Command::MoveEmojis {
            ids: vec![id],
            delta,
        })
    }

    pub fn scale_emoji(&mut self, id: EmojiId, factor: f32) -> CommandResult {
        self.execute(Command::ScaleEmojis {
            ids: vec![id],
            factor,
        })
    }

    /// Moves every selected emoji. One undo step.
    pub fn move_selected(&mut self, delta: Vec2) -> CommandResult {
        let ids = self.document.selected_ids();
        if ids.is_empty() {
            return Ok(());
        }
        self.execute(Command::MoveEmojis { ids, delta })
    }

    /// Scales every selected emoji by its own size. One undo step.
    pub fn scale_selected(&mut self, factor: f32) -> CommandResult {
        let ids = self.document.selected_ids();
        if ids.is_empty() {
            return Ok(());
        }
        self.execute(Command::ScaleEmojis { ids, factor })
    }

    pub fn delete_selected(&mut self) -> CommandResult {
        let ids = self.document.selected_ids();
        if ids.is_empty() {
            return Ok(());
        }
        log::info!("Deleting {} selected emoji", ids.len());
        self.execute(Command::RemoveEmojis { ids })
    }

    pub fn set_background(&mut self, background: Background) -> CommandResult {
        if &background == self.document.background() {
            return Ok(());
        }
        self.execute(Command::SetBackground { background })
    }

    // ---- gestures ----

    /// Starts a drag on whatever lies under `at`.
    pub fn begin_drag_at(&mut self, at: Pos2) -> Result<(), GestureError> {
        let grabbed = self.emoji_at(at);
        self.begin_drag(grabbed)
    }

    /// Starts a drag that grabbed `grabbed` (or empty canvas).
    pub fn begin_drag(&mut self, grabbed: Option<EmojiId>) -> Result<(), GestureError> {
        let grabbed = grabbed.and_then(|id| self.document.emoji(id));
        let route = GestureState::route_drag(grabbed, self.document.selected_ids());
        self.gestures.begin_drag(route.clone())?;
        if let DragRoute::Emoji(id) = route {
            self.set_dragging(id, true);
        }
        Ok(())
    }

    /// `translation` is the screen-space distance since the drag began.
    pub fn update_drag(&mut self, translation: Vec2) -> Result<(), GestureError> {
        let offset = delta_to_doc(translation, self.zoom_scale());
        self.gestures.update_drag(offset)
    }

    /// Ends the drag, committing its translation.
    pub fn end_drag(&mut self, translation: Vec2) -> Result<(), GestureError> {
        let offset = delta_to_doc(translation, self.zoom_scale());
        let (route, commit) = self.gestures.end_drag(offset)?;
        if let DragRoute::Emoji(id) = route {
            self.set_dragging(id, false);
        }
        self.apply_commit(commit)
    }

    pub fn cancel_drag(&mut self) {
        if let Some(DragRoute::Emoji(id)) = self.gestures.cancel_drag() {
            self.set_dragging(id, false);
        }
    }

    pub fn begin_magnify(&mut self) -> Result<(), GestureError> {
        let route = GestureState::route_magnify(self.document.selected_ids());
        self.gestures.begin_magnify(route)
    }

    /// `scale` is the cumulative magnification since the gesture began.
    pub fn update_magnify(&mut self, scale: f32) -> Result<(), GestureError> {
        self.gestures.update_magnify(scale)
    }

    pub fn end_magnify(&mut self, scale: f32) -> Result<(), GestureError> {
        let commit = self.gestures.end_magnify(scale)?;
        self.apply_commit(commit)
    }

    pub fn cancel_magnify(&mut self) {
        self.gestures.cancel_magnify();
    }

    fn set_dragging(&mut self, id: EmojiId, dragging: bool) {
        if self.document.set_dragging(id, dragging).is_ok() {
            self.event_bus.emit(EditorEvent::DocumentChanged(
                DocumentEvent::DraggingChanged { id, dragging },
            ));
        }
    }

    fn apply_commit(&mut self, commit: GestureCommit) -> Result<(), GestureError> {
        match commit {
            GestureCommit::Pan(delta) => {
                self.viewport.commit_pan(delta);
                self.emit_view();
            }
            GestureCommit::Zoom(factor) => {
                self.viewport.commit_zoom(factor)?;
                self.emit_view();
            }
            GestureCommit::Move { ids, delta } => {
                // Emoji deleted mid-gesture are skipped; the rest still move.
                let ids = self.live_ids(ids);
                if ids.is_empty() {
                    return Ok(());
                }
                if let Err(err) = self.execute(Command::MoveEmojis { ids, delta }) {
                    log::warn!("Dropped move at end of drag: {}", err);
                }
            }
            GestureCommit::Scale { ids, factor } => {
                let ids = self.live_ids(ids);
                if ids.is_empty() {
                    return Ok(());
                }
                if let Err(err) = self.execute(Command::ScaleEmojis { ids, factor }) {
                    log::warn!("Dropped scale at end of magnify: {}", err);
                }
            }
        }
        Ok(())
    }

    fn live_ids(&self, mut ids: Vec<EmojiId>) -> Vec<EmojiId> {
        let before = ids.len();
        ids.retain(|id| self.document.emoji(*id).is_some());
        if ids.len() < before {
            log::debug!("{} emoji vanished during the gesture", before - ids.len());
        }
        ids
    }

    fn emit_view(&self) {
        self.event_bus.emit(EditorEvent::ViewChanged {
            zoom: self.viewport.steady_zoom,
            pan: self.viewport.steady_pan,
        });
    }

    // ---- drop, paste and background ----

    /// Handles a drop at a screen location. Returns true if anything changed.
    pub fn drop_payloads(&mut self, payloads: &[DropPayload], at: Pos2) -> bool {
        let Some(action) = interpret_drop(payloads) else {
            log::debug!("Ignoring drop of {} item(s)", payloads.len());
            return false;
        };
        match action {
            DropAction::AddEmoji(text) => {
                let location = self.to_doc(at);
                let size = self.default_emoji_font_size / self.zoom_scale();
                log::info!("Dropped {} at {:?}", text, location);
                self.add_emoji(&text, location, size).is_ok()
            }
            DropAction::SetBackground(background) => {
                log::info!("Dropped background {}", background.locator());
                self.autozoom = true;
                self.set_background(background).is_ok()
            }
        }
    }

    /// Sets the background from the pasteboard, or raises a notice if it
    /// holds nothing usable.
    pub fn paste_background(&mut self, pasteboard: &Pasteboard) -> bool {
        self.autozoom = true;
        match pasteboard.background() {
            Some(background) => self.set_background(background).is_ok(),
            None => {
                self.notices.push_back(Notice::empty_pasteboard());
                false
            }
        }
    }

    /// Zooms so the background image fills the surface. Returns false if
    /// there is no image or the surface is empty.
    pub fn zoom_to_fit(&mut self) -> bool {
        let Some(image) = &self.background_image else {
            return false;
        };
        let fitted = self.viewport.zoom_to_fit(image.size_vec(), self.surface.size());
        if fitted {
            self.emit_view();
        }
        fitted
    }

    fn set_fetch_status(&mut self, status: FetchStatus) {
        if self.fetch_status != status {
            self.fetch_status = status.clone();
            self.event_bus.emit(EditorEvent::FetchStatusChanged(status));
        }
    }

    /// Requests a fetch when the document's background differs from the
    /// one last requested.
    fn sync_background(&mut self) {
        if self.document.background() == &self.requested_background {
            return;
        }
        self.requested_background = self.document.background().clone();
        self.fetch_generation += 1;
        self.background_image = None;

        if self.requested_background.is_blank() {
            self.set_fetch_status(FetchStatus::Idle);
        } else {
            log::info!(
                "Fetching background {} (generation {})",
                self.requested_background.locator(),
                self.fetch_generation
            );
            self.fetcher
                .request(self.fetch_generation, &self.requested_background);
            self.set_fetch_status(FetchStatus::Fetching);
        }
    }

    /// Drains fetch results. Returns true if a new background image arrived.
    pub fn poll_background(&mut self) -> bool {
        let mut arrived = false;
        while let Some(result) = self.fetcher.poll() {
            if result.generation != self.fetch_generation {
                log::debug!("Discarding stale fetch generation {}", result.generation);
                continue;
            }
            match result.outcome {
                Ok(image) => {
                    let size = image.size_vec();
                    log::info!("Background fetched: {}x{}", size.x, size.y);
                    self.background_image = Some(image);
                    self.set_fetch_status(FetchStatus::Fetched { size });
                    if self.autozoom {
                        self.zoom_to_fit();
                    }
                    arrived = true;
                }
                Err(err) => {
                    log::warn!("Background fetch failed: {}", err);
                    let locator = err.locator().to_owned();
                    self.notices.push_back(Notice::fetch_failed(&locator));
                    self.set_fetch_status(FetchStatus::Failed(locator));
                }
            }
        }
        arrived
    }

    /// Takes the oldest pending notice. Each notice is returned once.
    pub fn take_notice(&mut self) -> Option<Notice> {
        self.notices.pop_front()
    }
}
