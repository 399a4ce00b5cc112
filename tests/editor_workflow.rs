use std::cell::RefCell;
use std::collections::VecDeque;
use std::rc::Rc;

use egui::{Pos2, Rect, Vec2};
use emoji_art::background::{BackgroundFetcher, FetchError, FetchResult, FetchStatus, FetchedImage};
use emoji_art::canvas::{DocCoord, Viewport};
use emoji_art::document::{Background, Document};
use emoji_art::event::{DocumentEvent, EditorEvent};
use emoji_art::input::{DropPayload, Pasteboard};
use emoji_art::state::Editor;

// Records requests; results are queued by the test and handed out on poll
#[derive(Default)]
struct FetchLog {
    requests: Vec<(u64, Background)>,
    results: VecDeque<FetchResult>,
}

struct MockFetcher(Rc<RefCell<FetchLog>>);

impl BackgroundFetcher for MockFetcher {
    fn request(&mut self, generation: u64, background: &Background) {
        self.0
            .borrow_mut()
            .requests
            .push((generation, background.clone()));
    }

    fn poll(&mut self) -> Option<FetchResult> {
        self.0.borrow_mut().results.pop_front()
    }
}

fn surface() -> Rect {
    Rect::from_min_size(Pos2::ZERO, Vec2::new(400.0, 300.0))
}

fn editor_with(document: Document, viewport: Viewport) -> (Editor, Rc<RefCell<FetchLog>>) {
    let log = Rc::new(RefCell::new(FetchLog::default()));
    let mut editor = Editor::new(document, Box::new(MockFetcher(Rc::clone(&log))))
        .with_viewport(viewport)
        .with_default_emoji_font_size(40.0);
    editor.set_surface(surface());
    (editor, log)
}

fn editor() -> (Editor, Rc<RefCell<FetchLog>>) {
    editor_with(Document::new(), Viewport::default())
}

fn image(width: usize, height: usize) -> FetchedImage {
    FetchedImage {
        size: [width, height],
        rgba: vec![0; width * height * 4],
    }
}

fn deliver(log: &Rc<RefCell<FetchLog>>, generation: u64, outcome: Result<FetchedImage, FetchError>) {
    log.borrow_mut()
        .results
        .push_back(FetchResult { generation, outcome });
}

#[test]
fn test_dropped_text_adds_first_emoji_at_drop_location() {
    let (mut editor, _) = editor();

    let changed = editor.drop_payloads(&[DropPayload::Text("😀 hello".into())], Pos2::new(250.0, 100.0));

    assert!(changed);
    let emoji = &editor.document().emojis()[0];
    assert_eq!(emoji.text, "😀");
    assert_eq!(emoji.position(), DocCoord::new(50, -50));
    assert_eq!(emoji.size, 40);
}

#[test]
fn test_dropped_emoji_size_compensates_for_zoom() {
    let viewport = Viewport {
        steady_zoom: 2.0,
        steady_pan: Vec2::ZERO,
    };
    let (mut editor, _) = editor_with(Document::new(), viewport);

    editor.drop_payloads(&[DropPayload::Text("🐶".into())], Pos2::new(250.0, 100.0));

    let emoji = &editor.document().emojis()[0];
    assert_eq!(emoji.position(), DocCoord::new(25, -25));
    assert_eq!(emoji.size, 20);
    // Drawn at the default font size on screen
    assert_eq!(editor.emoji_font_size(emoji), 40.0);
}

#[test]
fn test_malformed_drop_changes_nothing() {
    let (mut editor, log) = editor();
    let before = editor.document().clone();

    let changed = editor.drop_payloads(
        &[
            DropPayload::Text("no emoji here".into()),
            DropPayload::Url("not a url".into()),
            DropPayload::ImageBytes(Vec::new()),
        ],
        Pos2::new(10.0, 10.0),
    );

    assert!(!changed);
    assert_eq!(editor.document(), &before);
    assert!(!editor.history().can_undo());
    assert!(log.borrow().requests.is_empty());
}

#[test]
fn test_url_drop_fetches_and_zooms_to_fit() {
    let (mut editor, log) = editor();

    editor.drop_payloads(
        &[DropPayload::Url("https://example.com/cat.png".into())],
        Pos2::new(0.0, 0.0),
    );
    assert_eq!(
        log.borrow().requests,
        vec![(1, Background::Url("https://example.com/cat.png".into()))]
    );
    assert_eq!(editor.fetch_status(), &FetchStatus::Fetching);

    deliver(&log, 1, Ok(image(200, 100)));
    assert!(editor.poll_background());

    assert_eq!(
        editor.fetch_status(),
        &FetchStatus::Fetched {
            size: Vec2::new(200.0, 100.0)
        }
    );
    // min(400 / 200, 300 / 100)
    assert_eq!(editor.viewport().steady_zoom, 2.0);
    assert_eq!(editor.viewport().steady_pan, Vec2::ZERO);
    assert!(editor.background_image().is_some());
}

#[test]
fn test_stale_fetch_results_are_discarded() {
    let (mut editor, log) = editor();
    editor.drop_payloads(&[DropPayload::Url("https://a.example/1.png".into())], Pos2::ZERO);
    editor.drop_payloads(&[DropPayload::Url("https://a.example/2.png".into())], Pos2::ZERO);
    assert_eq!(editor.background_generation(), 2);

    deliver(&log, 1, Ok(image(10, 10)));
    assert!(!editor.poll_background());
    assert!(editor.background_image().is_none());
    assert!(editor.fetch_status().is_fetching());

    deliver(&log, 2, Ok(image(20, 10)));
    assert!(editor.poll_background());
    assert_eq!(editor.background_image().map(|image| image.size), Some([20, 10]));
}

#[test]
fn test_failed_fetch_raises_one_notice() {
    let (mut editor, log) = editor();
    let url = "https://example.com/missing.png";
    editor.drop_payloads(&[DropPayload::Url(url.into())], Pos2::ZERO);

    deliver(&log, 1, Err(FetchError::Unsupported(url.into())));
    assert!(!editor.poll_background());

    assert_eq!(editor.fetch_status(), &FetchStatus::Failed(url.into()));
    let notice = editor.take_notice().unwrap();
    assert_eq!(notice.message, format!("Couldn't load image from {url}."));
    assert!(editor.take_notice().is_none());
}

#[test]
fn test_paste_prefers_image_over_url() {
    let (mut editor, _) = editor();
    let pasteboard = Pasteboard {
        image: Some(vec![1, 2, 3]),
        url: Some("https://example.com/x.png".into()),
    };

    assert!(editor.paste_background(&pasteboard));
    assert_eq!(editor.document().background(), &Background::ImageData(vec![1, 2, 3]));
}

#[test]
fn test_paste_with_empty_pasteboard_shows_notice() {
    let (mut editor, log) = editor();

    assert!(!editor.paste_background(&Pasteboard::default()));

    let notice = editor.take_notice().unwrap();
    assert_eq!(notice.message, "There is no image currently on the pasteboard.");
    assert!(log.borrow().requests.is_empty());
}

#[test]
fn test_undoing_background_refetches_previous_one() {
    let (mut editor, log) = editor();
    editor.set_background(Background::Url("https://example.com/a.png".into())).unwrap();
    editor.set_background(Background::Url("https://example.com/b.png".into())).unwrap();

    editor.undo().unwrap();

    let requests = log.borrow().requests.clone();
    assert_eq!(requests.len(), 3);
    assert_eq!(requests[2], (3, Background::Url("https://example.com/a.png".into())));

    editor.undo().unwrap();
    assert_eq!(editor.document().background(), &Background::Blank);
    assert_eq!(editor.fetch_status(), &FetchStatus::Idle);
    assert_eq!(log.borrow().requests.len(), 3);
}

#[test]
fn test_delete_selected_is_one_undo_step() {
    let (mut editor, _) = editor();
    let a = editor.add_emoji("🐶", DocCoord::new(0, 0), 40.0).unwrap();
    let b = editor.add_emoji("🐱", DocCoord::new(10, 0), 40.0).unwrap();
    let c = editor.add_emoji("🐭", DocCoord::new(20, 0), 40.0).unwrap();
    editor.select_emoji(a).unwrap();
    editor.select_emoji(c).unwrap();

    editor.delete_selected().unwrap();
    let ids: Vec<_> = editor.document().emojis().iter().map(|e| e.id).collect();
    assert_eq!(ids, vec![b]);

    editor.undo().unwrap();
    let ids: Vec<_> = editor.document().emojis().iter().map(|e| e.id).collect();
    assert_eq!(ids, vec![a, b, c]);
    assert_eq!(editor.history().redo_name(), Some("Delete"));
}

#[test]
fn test_selection_toggle_is_undoable() {
    let (mut editor, _) = editor();
    let id = editor.add_emoji("🐶", DocCoord::ORIGIN, 40.0).unwrap();

    editor.select_emoji(id).unwrap();
    assert!(editor.document().emoji(id).unwrap().is_selected);

    editor.undo().unwrap();
    assert!(!editor.document().emoji(id).unwrap().is_selected);
    editor.redo().unwrap();
    assert!(editor.document().emoji(id).unwrap().is_selected);
}

#[test]
fn test_clear_selection_is_one_undo_step() {
    let (mut editor, _) = editor();
    let a = editor.add_emoji("🐶", DocCoord::ORIGIN, 40.0).unwrap();
    let b = editor.add_emoji("🐱", DocCoord::new(10, 0), 40.0).unwrap();
    editor.select_emoji(a).unwrap();
    editor.select_emoji(b).unwrap();

    editor.clear_selection().unwrap();
    assert!(!editor.document().has_selection());
    assert_eq!(editor.history().undo_name(), Some("Select"));

    editor.undo().unwrap();
    assert_eq!(editor.document().selected_ids(), vec![a, b]);
    editor.redo().unwrap();
    assert!(!editor.document().has_selection());
}

#[test]
fn test_clear_selection_without_selection_records_nothing() {
    let (mut editor, _) = editor();
    editor.add_emoji("🐶", DocCoord::ORIGIN, 40.0).unwrap();

    editor.clear_selection().unwrap();
    assert_eq!(editor.history().undo_name(), Some("Add Emoji"));
}

#[test]
fn test_events_reach_subscribers() {
    let (mut editor, _) = editor();
    let seen = Rc::new(RefCell::new(Vec::new()));
    let sink = Rc::clone(&seen);
    editor
        .events()
        .subscribe(Box::new(move |event: &EditorEvent| sink.borrow_mut().push(event.clone())));

    let id = editor.add_emoji("🐶", DocCoord::ORIGIN, 40.0).unwrap();

    let seen = seen.borrow();
    assert!(seen.contains(&EditorEvent::DocumentChanged(DocumentEvent::EmojisAdded {
        ids: vec![id]
    })));
    assert_eq!(
        seen.last(),
        Some(&EditorEvent::HistoryChanged {
            can_undo: true,
            can_redo: false
        })
    );
}

#[test]
fn test_loaded_document_with_background_starts_fetching() {
    let mut document = Document::new();
    document.set_background(Background::Url("file:///tmp/bg.png".into()));

    let (editor, log) = editor_with(document, Viewport::default());

    assert!(editor.fetch_status().is_fetching());
    assert_eq!(log.borrow().requests.len(), 1);
}

#[test]
fn test_emoji_at_picks_topmost() {
    let (mut editor, _) = editor();
    let below = editor.add_emoji("🐶", DocCoord::ORIGIN, 40.0).unwrap();
    let above = editor.add_emoji("🐱", DocCoord::new(10, 0), 40.0).unwrap();

    // Surface center is (200, 150); both squares cover (205, 150)
    assert_eq!(editor.emoji_at(Pos2::new(205.0, 150.0)), Some(above));
    assert_eq!(editor.emoji_at(Pos2::new(185.0, 150.0)), Some(below));
    assert_eq!(editor.emoji_at(Pos2::new(0.0, 0.0)), None);
}

#[test]
fn test_loading_a_document_resets_history_and_fetches() {
    let (mut editor, log) = editor();
    editor.add_emoji("🐶", DocCoord::ORIGIN, 40.0).unwrap();
    assert!(editor.history().can_undo());

    let mut document = Document::new();
    document.add_emoji("🐱", DocCoord::new(5, 5), 30.0);
    document.set_background(Background::ImageData(vec![7]));
    editor.load_document(document.clone());

    assert_eq!(editor.document(), &document);
    assert!(!editor.history().can_undo());
    assert_eq!(log.borrow().requests, vec![(1, Background::ImageData(vec![7]))]);
}
