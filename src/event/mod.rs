mod bus;
mod events;

pub use bus::EventBus;
pub use events::{DocumentEvent, EditorEvent};

/// Receives every event emitted on an [`EventBus`] it is subscribed to.
pub trait EventHandler {
    fn handle_event(&mut self, event: &EditorEvent);
}

impl<F> EventHandler for F
where
    F: FnMut(&EditorEvent),
{
    fn handle_event(&mut self, event: &EditorEvent) {
        self(event)
    }
}
