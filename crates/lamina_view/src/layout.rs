//! Layout pass
//!
//! Layout dirtiness travels up: a view that needs layout marks its parent,
//! and the effective root registers one deduplicated layout task for the next
//! frame. The pass then runs top-down from that root.

use lamina_core::{Dimension, ElementId, Presenter, Property, RectChanges};

use crate::tree::{FrameKey, FrameTask, ViewTree};
use crate::view::{Lifecycle, ViewId};

impl<P: Presenter> ViewTree<P> {
    /// Mark or clear layout dirtiness.
    ///
    /// Marking an attached view also marks its parent view; a view with no
    /// parent view registers the layout pass for the next frame instead.
    /// Removed views ignore the call.
    pub fn set_needs_layout(&mut self, id: ViewId, needs_layout: bool) {
        let Some(view) = self.views.get_mut(id) else {
            return;
        };
        if view.lifecycle == Lifecycle::Removed {
            tracing::trace!(?id, "ignoring layout request on removed view");
            return;
        }
        if view.needs_layout == needs_layout {
            return;
        }
        view.needs_layout = needs_layout;
        if needs_layout {
            self.propagate_layout(id);
        }
    }

    /// Request a layout pass covering this view
    pub fn update_layout(&mut self, id: ViewId) {
        self.set_needs_layout(id, true);
    }

    pub(crate) fn propagate_layout(&mut self, id: ViewId) {
        let Some(view) = self.views.get(id) else {
            return;
        };
        if self.presenter.parent(view.element).is_none() {
            // Not in the presentation tree yet; attaching re-marks it
            return;
        }
        match self.parent(id) {
            Some(parent) => self.set_needs_layout(parent, true),
            None => {
                if !self.frames.is_registered(&FrameKey::Layout(id)) {
                    tracing::trace!(root = ?id, "scheduling layout");
                }
                self.frames.once(FrameKey::Layout(id), FrameTask::Layout(id));
            }
        }
    }

    /// Attach a root view under a non-view host element
    pub fn mount(&mut self, id: ViewId, host: ElementId) {
        let Some(view) = self.views.get_mut(id) else {
            return;
        };
        let element = view.element;
        let was_removed = view.lifecycle == Lifecycle::Removed;
        view.lifecycle = Lifecycle::Visible;
        view.needs_layout = true;
        self.presenter.append_child(host, element);
        if was_removed {
            self.schedule_pending_update(id);
        }
        self.propagate_layout(id);
    }

    /// Layout task body. Returns true if a pass actually ran.
    pub(crate) fn run_layout(&mut self, registered: ViewId) -> bool {
        if !self.views.contains_key(registered) {
            return false;
        }
        // The registered view may have been attached under another view since
        let root = self.effective_root(registered);
        let dirty = self
            .views
            .get(root)
            .is_some_and(|view| view.needs_layout && view.lifecycle == Lifecycle::Visible);
        if !dirty {
            return false;
        }
        tracing::debug!(?root, "layout pass");
        self.layout(root);
        true
    }

    /// Lay the view out if it is marked dirty
    pub fn layout_if_needed(&mut self, id: ViewId) {
        let dirty = self
            .views
            .get(id)
            .is_some_and(|view| view.needs_layout && view.lifecycle == Lifecycle::Visible);
        if dirty {
            self.layout(id);
        }
    }

    fn layout(&mut self, id: ViewId) {
        let size_changed = self.layout_bounds(id);
        self.layout_children(id, size_changed);
        if let Some(view) = self.views.get_mut(id) {
            view.needs_layout = false;
            view.ever_had_layout = true;
        }
    }

    /// Resolve match-parent dimensions. Returns true if the size changed in
    /// this pass or since the last render.
    fn layout_bounds(&mut self, id: ViewId) -> bool {
        let Some(view) = self.views.get(id) else {
            return false;
        };
        let pending_size = view.is_invalidated(&Property::Size);
        let Some(params) = view.params else {
            return pending_size;
        };
        let Some(parent_bounds) = self
            .parent(id)
            .and_then(|parent| self.views.get(parent))
            .map(|parent| parent.bounds)
        else {
            return pending_size;
        };

        let Some(view) = self.views.get_mut(id) else {
            return false;
        };
        let mut changes = RectChanges::NONE;
        if params.width == Dimension::MatchParent {
            changes.size |= view.bounds.set_width(parent_bounds.width()).size;
        }
        if params.height == Dimension::MatchParent {
            changes.size |= view.bounds.set_height(parent_bounds.height()).size;
        }
        self.invalidate_rect_changes(id, changes);
        pending_size || changes.size
    }

    fn layout_children(&mut self, id: ViewId, size_changed: bool) {
        let children = self.children_views(id);
        if size_changed {
            for &child in &children {
                self.set_needs_layout(child, true);
            }
        }
        for child in children {
            if !self.should_ignore_during_layout(child) {
                self.layout_if_needed(child);
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use lamina_core::{MemoryPresenter, Rect};

    use super::*;

    fn tree() -> ViewTree<MemoryPresenter> {
        ViewTree::new(MemoryPresenter::new())
    }

    #[test]
    fn test_unattached_view_does_not_schedule() {
        let mut tree = tree();
        let view = tree.create_view();
        tree.set_needs_layout(view, true);
        assert!(tree.view(view).unwrap().needs_layout());
        assert!(!tree.frames.has_pending());
    }

    #[test]
    fn test_dirtiness_propagates_to_root() {
        let mut tree = tree();
        let host = tree.presenter().document();
        let root = tree.create_view();
        let child = tree.create_view();
        tree.mount(root, host);
        tree.append(root, child);
        tree.deliver_frame();

        tree.set_needs_layout(child, true);
        assert!(tree.view(root).unwrap().needs_layout());
        assert!(tree.frames.is_registered(&FrameKey::Layout(root)));
        assert!(!tree.frames.is_registered(&FrameKey::Layout(child)));
    }

    #[test]
    fn test_match_parent_resolves_against_parent() {
        let mut tree = tree();
        let host = tree.presenter().document();
        let root = tree.create_view();
        let child = tree.create_view();
        tree.set_bounds(root, Rect::new(0.0, 0.0, 320.0, 480.0));
        tree.mount(root, host);
        tree.append(root, child);
        tree.match_parent_size(child);

        let stats = tree.deliver_frame();
        assert_eq!(stats.layout_passes, 1);
        assert_eq!(tree.view(child).unwrap().bounds(), Rect::new(0.0, 0.0, 320.0, 480.0));
        assert!(!tree.view(child).unwrap().needs_layout());
    }

    #[test]
    fn test_parent_resize_relayouts_children() {
        let mut tree = tree();
        let host = tree.presenter().document();
        let root = tree.create_view();
        let child = tree.create_view();
        tree.mount(root, host);
        tree.append(root, child);
        tree.match_parent_size(child);
        tree.deliver_frame();

        tree.set_size(root, 100.0, 40.0);
        tree.update_layout(root);
        tree.deliver_frame();
        assert_eq!(tree.view(child).unwrap().bounds().width(), 100.0);
        assert_eq!(tree.view(child).unwrap().bounds().height(), 40.0);
    }
}
