//! Attaching and detaching views
//!
//! The animated entry points ask the parent's [`TransitionHooks`] for a
//! transition and return a [`Completion`] that resolves when the structural
//! change is finished. Hooks that resolve immediately finish synchronously;
//! others are polled at the end of every frame cycle.
//!
//! [`TransitionHooks`]: crate::hooks::TransitionHooks

use lamina_core::{Completion, Presenter};

use crate::events::ViewEvent;
use crate::tree::ViewTree;
use crate::view::{Lifecycle, ViewId};

/// How a view leaves the presentation tree
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum DetachMode {
    /// Unlink the element, keeping it for a later attach
    Detach,
    /// Destroy the element and its subtree
    Remove,
}

#[derive(Clone, Copy, Debug)]
enum Placement {
    Append(ViewId),
    Before(ViewId),
    After(ViewId),
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub(crate) enum FollowUp {
    Attach,
    Detach(DetachMode),
}

#[derive(Debug)]
pub(crate) struct PendingTransition {
    pub(crate) view: ViewId,
    hook: Completion,
    done: Completion,
    follow_up: FollowUp,
}

impl<P: Presenter> ViewTree<P> {
    pub fn append(&mut self, parent: ViewId, child: ViewId) {
        self.attach(Placement::Append(parent), child, false);
    }

    pub fn append_with_animation(&mut self, parent: ViewId, child: ViewId) -> Completion {
        self.attach(Placement::Append(parent), child, true)
    }

    /// Insert `child` right before `reference`
    pub fn before(&mut self, child: ViewId, reference: ViewId) {
        self.attach(Placement::Before(reference), child, false);
    }

    pub fn before_with_animation(&mut self, child: ViewId, reference: ViewId) -> Completion {
        self.attach(Placement::Before(reference), child, true)
    }

    /// Insert `child` right after `reference`
    pub fn after(&mut self, child: ViewId, reference: ViewId) {
        self.attach(Placement::After(reference), child, false);
    }

    pub fn after_with_animation(&mut self, child: ViewId, reference: ViewId) -> Completion {
        self.attach(Placement::After(reference), child, true)
    }

    pub fn detach(&mut self, id: ViewId) {
        self.begin_detach(id, DetachMode::Detach, false);
    }

    pub fn detach_with_animation(&mut self, id: ViewId) -> Completion {
        self.begin_detach(id, DetachMode::Detach, true)
    }

    pub fn remove(&mut self, id: ViewId) {
        self.begin_detach(id, DetachMode::Remove, false);
    }

    pub fn remove_with_animation(&mut self, id: ViewId) -> Completion {
        self.begin_detach(id, DetachMode::Remove, true)
    }

    fn attach(&mut self, placement: Placement, child: ViewId, animate: bool) -> Completion {
        let Some(child_element) = self.views.get(child).map(|view| view.element) else {
            return Completion::resolved();
        };
        if !self.presenter.contains(child_element) {
            tracing::warn!(?child, "cannot attach a view whose element was removed");
            return Completion::resolved();
        }
        let target = match placement {
            Placement::Append(id) | Placement::Before(id) | Placement::After(id) => id,
        };
        let Some(target_element) = self.views.get(target).map(|view| view.element) else {
            return Completion::resolved();
        };
        let expected_parent = match placement {
            Placement::Append(_) => Some(target_element),
            Placement::Before(_) | Placement::After(_) => self.presenter.parent(target_element),
        };
        match placement {
            Placement::Append(_) => self.presenter.append_child(target_element, child_element),
            Placement::Before(_) => self.presenter.insert_before(target_element, child_element),
            Placement::After(_) => self.presenter.insert_after(target_element, child_element),
        }
        // Detached references and cyclic appends are ignored by the presenter
        if expected_parent.is_none() || self.presenter.parent(child_element) != expected_parent {
            tracing::warn!(?child, ?placement, "presenter rejected the insertion");
            return Completion::resolved();
        }
        self.child_added(child, animate)
    }

    fn child_added(&mut self, child: ViewId, animate: bool) -> Completion {
        let parent = self.parent(child);
        let mut was_removed = false;
        if let Some(view) = self.views.get_mut(child) {
            was_removed = view.lifecycle == Lifecycle::Removed;
            view.lifecycle = Lifecycle::Visible;
            if animate {
                view.ever_had_layout = false;
            }
        }
        if was_removed {
            self.schedule_pending_update(child);
        }
        self.set_needs_layout(child, true);
        if let Some(parent) = parent {
            self.set_needs_layout(parent, true);
        }

        let hook = match (animate, parent) {
            (true, Some(parent)) => match self.hooks.get(parent).cloned() {
                Some(hooks) => hooks.animate_attach(self, parent, child),
                None => Completion::resolved(),
            },
            _ => Completion::resolved(),
        };
        self.track_transition(child, hook, FollowUp::Attach)
    }

    fn begin_detach(&mut self, id: ViewId, mode: DetachMode, animate: bool) -> Completion {
        let Some(view) = self.views.get(id) else {
            return Completion::resolved();
        };
        if view.lifecycle != Lifecycle::Visible {
            tracing::trace!(?id, lifecycle = ?view.lifecycle, "view already leaving the tree");
            return Completion::resolved();
        }
        match self.parent(id) {
            Some(parent) => self.child_removed(parent, id, mode, animate),
            None => {
                self.finish_detach(id, mode);
                Completion::resolved()
            }
        }
    }

    fn child_removed(
        &mut self,
        parent: ViewId,
        child: ViewId,
        mode: DetachMode,
        animate: bool,
    ) -> Completion {
        self.set_needs_layout(parent, true);
        if !animate {
            self.finish_detach(child, mode);
            return Completion::resolved();
        }

        if let Some(view) = self.views.get_mut(child) {
            view.lifecycle = Lifecycle::Detaching;
        }
        let hook = match self.hooks.get(parent).cloned() {
            Some(hooks) => hooks.animate_detach(self, parent, child),
            None => Completion::resolved(),
        };
        self.track_transition(child, hook, FollowUp::Detach(mode))
    }

    fn finish_detach(&mut self, id: ViewId, mode: DetachMode) {
        let Some(view) = self.views.get_mut(id) else {
            return;
        };
        view.lifecycle = Lifecycle::Removed;
        let element = view.element;
        match mode {
            DetachMode::Detach => self.presenter.detach(element),
            DetachMode::Remove => {
                self.forget_subtree(id);
                self.presenter.remove(element);
            }
        }
        tracing::trace!(?id, ?mode, "view left the presentation tree");
        self.emit(ViewEvent::Detached { view: id });
    }

    /// Unmap `id` and every view below it; their elements are about to be
    /// destroyed.
    fn forget_subtree(&mut self, id: ViewId) {
        let mut stack = vec![id];
        while let Some(current) = stack.pop() {
            stack.extend(self.children_views(current));
            if let Some(view) = self.views.get_mut(current) {
                view.lifecycle = Lifecycle::Removed;
                let element = view.element;
                if self.by_element.get(&element) == Some(&current) {
                    self.by_element.remove(&element);
                }
            }
        }
    }

    fn track_transition(&mut self, view: ViewId, hook: Completion, follow_up: FollowUp) -> Completion {
        let done = Completion::new();
        if hook.is_resolved() {
            self.complete_transition(view, follow_up);
            done.resolve();
            return done;
        }
        self.transitions.push(PendingTransition {
            view,
            hook,
            done: done.clone(),
            follow_up,
        });
        done
    }

    fn complete_transition(&mut self, view: ViewId, follow_up: FollowUp) {
        match follow_up {
            FollowUp::Attach => {
                // Skipped when a detach started before the entrance finished
                let visible = self
                    .views
                    .get(view)
                    .is_some_and(|v| v.lifecycle == Lifecycle::Visible);
                if visible {
                    self.emit(ViewEvent::Attached { view });
                }
            }
            FollowUp::Detach(mode) => {
                // Re-attached while the exit transition ran
                let detaching = self
                    .views
                    .get(view)
                    .is_some_and(|v| v.lifecycle == Lifecycle::Detaching);
                if detaching {
                    self.finish_detach(view, mode);
                }
            }
        }
    }

    /// Finish transitions whose hooks have resolved
    pub(crate) fn poll_transitions(&mut self) {
        if self.transitions.is_empty() {
            return;
        }
        for transition in std::mem::take(&mut self.transitions) {
            if transition.hook.is_resolved() {
                self.complete_transition(transition.view, transition.follow_up);
                transition.done.resolve();
            } else {
                self.transitions.push(transition);
            }
        }
    }
}
