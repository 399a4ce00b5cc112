use crate::document::Document;
use crate::event::{DocumentEvent, EditorEvent, EventBus};

/// Context for command execution, providing access to the document
/// and the event system.
#[derive(Debug)]
pub struct CommandContext<'a> {
    /// The document being edited
    pub document: &'a mut Document,
    /// The event bus for broadcasting changes
    pub event_bus: &'a EventBus,
}

impl<'a> CommandContext<'a> {
    pub fn new(document: &'a mut Document, event_bus: &'a EventBus) -> Self {
        Self {
            document,
            event_bus,
        }
    }

    pub(crate) fn emit(&self, event: DocumentEvent) {
        self.event_bus.emit(EditorEvent::DocumentChanged(event));
    }
}
