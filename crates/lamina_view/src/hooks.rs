//! Attach and detach transitions
//!
//! A parent view can carry [`TransitionHooks`] that run when a child is
//! attached or detached through one of the animated entry points. The hook
//! starts whatever animation it likes and returns a [`Completion`]; the tree
//! finishes the structural change once that completion resolves.

use lamina_core::{Completion, Presenter};

use crate::tree::ViewTree;
use crate::view::ViewId;

pub trait TransitionHooks<P: Presenter> {
    /// Entrance transition for `child`, already inserted under `parent`
    fn animate_attach(&self, tree: &mut ViewTree<P>, parent: ViewId, child: ViewId) -> Completion {
        let _ = (tree, parent, child);
        Completion::resolved()
    }

    /// Exit transition for `child`, still inserted under `parent`
    fn animate_detach(&self, tree: &mut ViewTree<P>, parent: ViewId, child: ViewId) -> Completion {
        let _ = (tree, parent, child);
        Completion::resolved()
    }
}

/// Hooks that finish immediately
#[derive(Debug, Clone, Copy, Default)]
pub struct ImmediateTransitions;

impl<P: Presenter> TransitionHooks<P> for ImmediateTransitions {}

/// Fades children in on attach and out on detach
#[derive(Debug, Clone, Copy)]
pub struct FadeTransitions {
    pub duration_ms: f64,
}

impl<P: Presenter> TransitionHooks<P> for FadeTransitions {
    fn animate_attach(&self, tree: &mut ViewTree<P>, _parent: ViewId, child: ViewId) -> Completion {
        let Some(set) = tree.animation_set(child) else {
            return Completion::resolved();
        };
        set.view_state_mut().set_opacity(0.0);
        set.animation()
            .get("transition")
            .chain(0.0)
            .opacity(self.duration_ms, 1.0)
            .completion()
    }

    fn animate_detach(&self, tree: &mut ViewTree<P>, _parent: ViewId, child: ViewId) -> Completion {
        let Some(set) = tree.animation_set(child) else {
            return Completion::resolved();
        };
        set.animation()
            .get("transition")
            .chain(0.0)
            .opacity(self.duration_ms, 0.0)
            .completion()
    }
}
