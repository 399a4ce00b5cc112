mod canvas;
mod palette_chooser;
mod toolbar;

pub use canvas::{CanvasInput, PaletteEmoji, TapAction, canvas_panel, dropped_file_payload, tap_action};
pub use palette_chooser::{PaletteChooser, palette_panel};
pub use toolbar::toolbar_panel;
