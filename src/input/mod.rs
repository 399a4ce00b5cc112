mod drop;
mod gestures;

pub use drop::{DropAction, DropPayload, Pasteboard, image_url, interpret_drop, normalize_url};
pub use gestures::{DragRoute, GestureCommit, GestureState, MagnifyRoute};
