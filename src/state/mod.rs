mod editor;
pub mod persistence;

pub use editor::Editor;
pub use persistence::{DocumentSnapshot, DocumentStore, PersistenceError, PersistenceResult};
