#![warn(clippy::all, rust_2018_idioms)]

use emoji_art::{AppConfig, EmojiArtApp};

fn main() -> eframe::Result {
    env_logger::init(); // Log to stderr (if you run with `RUST_LOG=debug`).

    let config = AppConfig::load();
    log::info!("Using data directory {}", config.data_dir.display());

    let native_options = eframe::NativeOptions {
        viewport: egui::ViewportBuilder::default()
            .with_title("EmojiArt")
            .with_inner_size([1024.0, 768.0])
            .with_min_inner_size([400.0, 300.0])
            .with_drag_and_drop(true),
        ..Default::default()
    };
    eframe::run_native(
        "EmojiArt",
        native_options,
        Box::new(|cc| Ok(Box::new(EmojiArtApp::new(cc, config)))),
    )
}
