//! View event dispatch
//!
//! Render passes report what they reconciled through [`ViewEvent`]s. Handlers
//! are registered per view and event kind.

use lamina_core::Property;
use rustc_hash::FxHashMap;

use crate::view::ViewId;

/// Event kinds
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum ViewEventKind {
    Validated,
    Updated,
    Attached,
    Detached,
}

#[derive(Clone, Debug, PartialEq)]
pub enum ViewEvent {
    /// A property with no built-in reconciliation step was invalidated
    Validated { view: ViewId, property: Property },
    /// A render pass finished for the view
    Updated { view: ViewId },
    /// The view was attached and its entrance transition (if any) finished
    Attached { view: ViewId },
    /// The view's element left the presentation tree
    Detached { view: ViewId },
}

impl ViewEvent {
    pub fn view(&self) -> ViewId {
        match self {
            ViewEvent::Validated { view, .. }
            | ViewEvent::Updated { view }
            | ViewEvent::Attached { view }
            | ViewEvent::Detached { view } => *view,
        }
    }

    pub fn kind(&self) -> ViewEventKind {
        match self {
            ViewEvent::Validated { .. } => ViewEventKind::Validated,
            ViewEvent::Updated { .. } => ViewEventKind::Updated,
            ViewEvent::Attached { .. } => ViewEventKind::Attached,
            ViewEvent::Detached { .. } => ViewEventKind::Detached,
        }
    }
}

/// Event handler function type
pub type EventHandler = Box<dyn Fn(&ViewEvent)>;

/// Routes events to the handlers registered for their view and kind
#[derive(Default)]
pub struct EventDispatcher {
    handlers: FxHashMap<(ViewId, ViewEventKind), Vec<EventHandler>>,
}

impl EventDispatcher {
    pub fn new() -> Self {
        Self::default()
    }

    /// Register an event handler for a view and event kind
    pub fn register<F>(&mut self, view: ViewId, kind: ViewEventKind, handler: F)
    where
        F: Fn(&ViewEvent) + 'static,
    {
        self.handlers
            .entry((view, kind))
            .or_default()
            .push(Box::new(handler));
    }

    /// Dispatch an event to all registered handlers
    pub fn dispatch(&self, event: &ViewEvent) {
        if let Some(handlers) = self.handlers.get(&(event.view(), event.kind())) {
            for handler in handlers {
                handler(event);
            }
        }
    }

    /// Drop every handler registered for `view`
    pub fn unregister_view(&mut self, view: ViewId) {
        self.handlers.retain(|(id, _), _| *id != view);
    }

    pub fn has_handlers(&self, view: ViewId) -> bool {
        self.handlers.keys().any(|(id, _)| *id == view)
    }
}

impl std::fmt::Debug for EventDispatcher {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("EventDispatcher")
            .field("handlers", &self.handlers.len())
            .finish()
    }
}
