use std::cell::{Cell, RefCell};
use std::collections::VecDeque;

use crate::event::{EditorEvent, EventHandler};

/// A simple event bus for broadcasting editor events to registered handlers
///
/// Handlers may emit or subscribe from inside `handle_event`. Events emitted
/// during a dispatch are queued and delivered, in order, once the current
/// event has reached every handler.
pub struct EventBus {
    handlers: RefCell<Vec<Box<dyn EventHandler>>>,
    pending: RefCell<VecDeque<EditorEvent>>,
    dispatching: Cell<bool>,
    // Handlers moved out of `handlers` for the current dispatch
    in_flight: Cell<usize>,
}

impl std::fmt::Debug for EventBus {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("EventBus")
            .field("handlers", &format!("<{} handlers>", self.handler_count()))
            .finish()
    }
}

impl Default for EventBus {
    fn default() -> Self {
        Self::new()
    }
}

impl EventBus {
    /// Creates a new event bus
    pub fn new() -> Self {
        Self {
            handlers: RefCell::new(Vec::new()),
            pending: RefCell::new(VecDeque::new()),
            dispatching: Cell::new(false),
            in_flight: Cell::new(0),
        }
    }

    /// Subscribe a handler to receive events
    pub fn subscribe(&self, handler: Box<dyn EventHandler>) {
        self.handlers.borrow_mut().push(handler);
    }

    pub fn handler_count(&self) -> usize {
        self.handlers.borrow().len() + self.in_flight.get()
    }

    /// Emit an event to all registered handlers.
    pub fn emit(&self, event: EditorEvent) {
        log::trace!("event: {:?}", event);
        self.pending.borrow_mut().push_back(event);
        if self.dispatching.replace(true) {
            return;
        }

        loop {
            let Some(event) = self.pending.borrow_mut().pop_front() else {
                break;
            };
            let mut active = std::mem::take(&mut *self.handlers.borrow_mut());
            self.in_flight.set(active.len());
            for handler in &mut active {
                handler.handle_event(&event);
            }
            self.in_flight.set(0);

            // Keep subscription order: handlers added mid-dispatch go last.
            let mut handlers = self.handlers.borrow_mut();
            let added = std::mem::replace(&mut *handlers, active);
            handlers.extend(added);
        }
        self.dispatching.set(false);
    }
}
