mod coords;
mod viewport;

pub use coords::{CanvasTransform, DocCoord, delta_to_doc, to_doc, to_screen};
pub use viewport::Viewport;
