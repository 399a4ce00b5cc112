#![warn(clippy::all, rust_2018_idioms)]

pub mod app;
pub mod background;
pub mod canvas;
pub mod command;
pub mod config;
pub mod document;
pub mod error;
pub mod event;
pub mod input;
pub mod palette;
pub mod panels;
pub mod renderer;
pub mod state;

pub use app::EmojiArtApp;
pub use background::{BackgroundFetcher, FetchStatus, ThreadFetcher};
pub use canvas::{DocCoord, Viewport};
pub use command::{Command, CommandHistory};
pub use config::AppConfig;
pub use document::{Background, Document, Emoji, EmojiId};
pub use palette::{Palette, PaletteStore};
pub use renderer::Renderer;
pub use state::Editor;
