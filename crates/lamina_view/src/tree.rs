//! View tree
//!
//! [`ViewTree`] owns every [`View`] in a slot map and maps presentation
//! elements back to views through a side table. Structure lives only in the
//! [`Presenter`]: a view's parent is the nearest ancestor element that has a
//! view, and its children are the nearest descendant elements that have one.
//!
//! # Frame delivery
//!
//! The host calls [`ViewTree::deliver_frame`] once per display refresh. A
//! delivery runs one or more frame cycles:
//!
//! 1. Animations tick and raise render invalidations
//! 2. Pending layout passes run, one per effective root, top-down
//! 3. Render updates run, one per invalidated view
//! 4. Attach/detach transitions whose hooks resolved are finished
//!
//! Another cycle follows immediately while an animation lane hands over to
//! its successor, up to `frame.max_immediate_frames`.

use std::rc::Rc;

use lamina_animation::{Animation, AnimationSet, FrameState};
use lamina_core::{
    Clock, EdgeInsets, ElementId, FrameScheduler, LaminaConfig, LayoutParams,
    MonotonicClock, Presenter, Property, Rect, RectChanges, Transform,
};
use rustc_hash::FxHashMap;
use slotmap::{SecondaryMap, SlotMap};
use smallvec::SmallVec;

use crate::events::{EventDispatcher, ViewEvent, ViewEventKind};
use crate::hooks::TransitionHooks;
use crate::view::{Lifecycle, View, ViewId};

/// Short list of views, in presentation order
pub type ViewList = SmallVec<[ViewId; 8]>;

#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub(crate) enum FrameKey {
    Layout(ViewId),
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub(crate) enum FrameTask {
    Layout(ViewId),
    Update(ViewId),
}

/// What one [`ViewTree::deliver_frame`] call did
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct FrameStats {
    /// Frame cycles run, including immediate follow-ups
    pub cycles: u32,
    /// Layout passes that resolved at least the root
    pub layout_passes: u32,
    /// Views whose render update ran
    pub updates: u32,
}

/// Tree of views over a presentation medium
pub struct ViewTree<P: Presenter> {
    pub(crate) presenter: P,
    pub(crate) views: SlotMap<ViewId, View>,
    pub(crate) by_element: FxHashMap<ElementId, ViewId>,
    pub(crate) hooks: SecondaryMap<ViewId, Rc<dyn TransitionHooks<P>>>,
    pub(crate) frames: FrameScheduler<FrameKey, FrameTask>,
    pub(crate) events: EventDispatcher,
    pub(crate) transitions: Vec<crate::attach::PendingTransition>,
    pub(crate) config: LaminaConfig,
    clock: Box<dyn Clock>,
}

impl<P: Presenter> ViewTree<P> {
    pub fn new(presenter: P) -> Self {
        Self::with_config(presenter, LaminaConfig::default())
    }

    pub fn with_config(presenter: P, config: LaminaConfig) -> Self {
        Self::with_clock(presenter, config, MonotonicClock::new())
    }

    pub fn with_clock(presenter: P, config: LaminaConfig, clock: impl Clock + 'static) -> Self {
        Self {
            presenter,
            views: SlotMap::with_key(),
            by_element: FxHashMap::default(),
            hooks: SecondaryMap::new(),
            frames: FrameScheduler::new(),
            events: EventDispatcher::new(),
            transitions: Vec::new(),
            config,
            clock: Box::new(clock),
        }
    }

    pub fn presenter(&self) -> &P {
        &self.presenter
    }

    pub fn presenter_mut(&mut self) -> &mut P {
        &mut self.presenter
    }

    pub fn config(&self) -> &LaminaConfig {
        &self.config
    }

    /// Create a view with a fresh, unattached element
    pub fn create_view(&mut self) -> ViewId {
        let element = self.presenter.create_element();
        let id = self.views.insert(View::new(element));
        self.by_element.insert(element, id);
        tracing::trace!(?id, ?element, "created view");
        id
    }

    /// Drop a view for good, removing its element if still attached
    pub fn dispose(&mut self, id: ViewId) {
        let Some(view) = self.views.get(id) else {
            return;
        };
        if view.lifecycle != Lifecycle::Removed && self.presenter.parent(view.element).is_some() {
            self.remove(id);
        }
        if let Some(view) = self.views.remove(id) {
            if self.by_element.get(&view.element) == Some(&id) {
                self.by_element.remove(&view.element);
            }
        }
        self.hooks.remove(id);
        self.events.unregister_view(id);
        self.transitions.retain(|transition| transition.view != id);
    }

    pub fn view(&self, id: ViewId) -> Option<&View> {
        self.views.get(id)
    }

    pub fn contains(&self, id: ViewId) -> bool {
        self.views.contains_key(id)
    }

    pub fn len(&self) -> usize {
        self.views.len()
    }

    pub fn is_empty(&self) -> bool {
        self.views.is_empty()
    }

    /// View owning `element`, if any
    pub fn view_for_element(&self, element: ElementId) -> Option<ViewId> {
        self.by_element.get(&element).copied()
    }

    /// Nearest ancestor view in the presentation tree
    pub fn parent(&self, id: ViewId) -> Option<ViewId> {
        let element = self.views.get(id)?.element;
        let mut current = self.presenter.parent(element);
        while let Some(ancestor) = current {
            if let Some(&view) = self.by_element.get(&ancestor) {
                return Some(view);
            }
            current = self.presenter.parent(ancestor);
        }
        None
    }

    /// Topmost view reached by walking [`ViewTree::parent`]
    pub fn effective_root(&self, id: ViewId) -> ViewId {
        let mut root = id;
        while let Some(parent) = self.parent(root) {
            root = parent;
        }
        root
    }

    /// Nearest descendant views, in presentation order
    pub fn children_views(&self, id: ViewId) -> ViewList {
        let mut children = ViewList::new();
        if let Some(view) = self.views.get(id) {
            self.collect_child_views(view.element, &mut children);
        }
        children
    }

    fn collect_child_views(&self, element: ElementId, out: &mut ViewList) {
        for child in self.presenter.children(element) {
            match self.by_element.get(&child) {
                Some(&view) => out.push(view),
                None => self.collect_child_views(child, out),
            }
        }
    }

    /// True if the view is attached somewhere in the presentation tree
    pub fn is_attached(&self, id: ViewId) -> bool {
        self.views
            .get(id)
            .is_some_and(|view| self.presenter.parent(view.element).is_some())
    }

    /// Layout and measurement code must skip these views
    pub fn should_ignore_during_layout(&self, id: ViewId) -> bool {
        self.views
            .get(id)
            .map_or(true, |view| view.lifecycle != Lifecycle::Visible)
    }

    // ------------------------------------------------------------------
    // Geometry and style setters
    // ------------------------------------------------------------------

    pub fn set_bounds(&mut self, id: ViewId, bounds: Rect) {
        let Some(view) = self.views.get_mut(id) else {
            return;
        };
        let changes = view.bounds.set(bounds);
        self.invalidate_rect_changes(id, changes);
    }

    pub fn set_position(&mut self, id: ViewId, x: f32, y: f32) {
        let Some(view) = self.views.get_mut(id) else {
            return;
        };
        let changes = view.bounds.set_position(x, y);
        self.invalidate_rect_changes(id, changes);
    }

    pub fn set_size(&mut self, id: ViewId, width: f32, height: f32) {
        let Some(view) = self.views.get_mut(id) else {
            return;
        };
        let changes = view.bounds.set_size(width, height);
        self.invalidate_rect_changes(id, changes);
    }

    pub(crate) fn invalidate_rect_changes(&mut self, id: ViewId, changes: RectChanges) {
        if changes.position {
            self.invalidate(id, Property::Position);
        }
        if changes.size {
            self.invalidate(id, Property::Size);
        }
    }

    pub fn set_transform(&mut self, id: ViewId, transform: &Transform) {
        let Some(view) = self.views.get_mut(id) else {
            return;
        };
        if view.transform.set(transform) {
            self.invalidate(id, Property::Transform);
        }
    }

    /// Edit the transform in place
    pub fn update_transform(&mut self, id: ViewId, edit: impl FnOnce(&mut Transform)) {
        let Some(view) = self.views.get_mut(id) else {
            return;
        };
        let before = view.transform.clone();
        edit(&mut view.transform);
        if view.transform != before {
            self.invalidate(id, Property::Transform);
        }
    }

    pub fn set_opacity(&mut self, id: ViewId, opacity: f32) {
        let Some(view) = self.views.get_mut(id) else {
            return;
        };
        view.opacity = opacity;
        self.invalidate(id, Property::Opacity);
    }

    /// Margin enters the outer size, so the view also needs layout
    pub fn set_margin(&mut self, id: ViewId, margin: EdgeInsets) {
        let Some(view) = self.views.get_mut(id) else {
            return;
        };
        if view.margin.set(margin) {
            self.invalidate(id, Property::Margin);
            self.set_needs_layout(id, true);
        }
    }

    pub fn set_padding(&mut self, id: ViewId, padding: EdgeInsets) {
        let Some(view) = self.views.get_mut(id) else {
            return;
        };
        if view.padding.set(padding) {
            self.invalidate(id, Property::Padding);
            self.set_needs_layout(id, true);
        }
    }

    pub fn set_params(&mut self, id: ViewId, params: LayoutParams) {
        let Some(view) = self.views.get_mut(id) else {
            return;
        };
        view.params = Some(params);
        self.set_needs_layout(id, true);
    }

    /// Follow the parent's resolved size in both dimensions
    pub fn match_parent_size(&mut self, id: ViewId) {
        self.set_params(id, LayoutParams::match_parent());
    }

    pub fn add_class(&mut self, id: ViewId, class: &str) {
        if let Some(view) = self.views.get(id) {
            self.presenter.add_class(view.element, class);
        }
    }

    pub fn remove_class(&mut self, id: ViewId, class: &str) {
        if let Some(view) = self.views.get(id) {
            self.presenter.remove_class(view.element, class);
        }
    }

    pub fn outer_width(&self, id: ViewId) -> Option<f32> {
        self.views.get(id).map(View::outer_width)
    }

    pub fn outer_height(&self, id: ViewId) -> Option<f32> {
        self.views.get(id).map(View::outer_height)
    }

    // ------------------------------------------------------------------
    // Animation
    // ------------------------------------------------------------------

    /// The view's animation set, created on first use
    pub fn animation_set(&mut self, id: ViewId) -> Option<&mut AnimationSet> {
        let view = self.views.get_mut(id)?;
        Some(view.animation.get_or_insert_with(AnimationSet::new))
    }

    /// Root multiplexer of the view's animation set
    pub fn animation(&mut self, id: ViewId) -> Option<&mut Animation> {
        self.animation_set(id).map(AnimationSet::animation)
    }

    /// Cancel the view's animations and drop their overrides
    pub fn reset_animation(&mut self, id: ViewId) {
        let Some(set) = self.views.get_mut(id).and_then(|view| view.animation.as_mut()) else {
            return;
        };
        set.reset();
        let changed = set.view_state_mut().take_invalidations();
        for property in changed {
            self.invalidate(id, property);
        }
    }

    pub fn set_hooks(&mut self, id: ViewId, hooks: impl TransitionHooks<P> + 'static) {
        if self.views.contains_key(id) {
            self.hooks.insert(id, Rc::new(hooks));
        }
    }

    pub fn clear_hooks(&mut self, id: ViewId) {
        self.hooks.remove(id);
    }

    // ------------------------------------------------------------------
    // Events
    // ------------------------------------------------------------------

    /// Register a handler for events of `kind` on `view`
    pub fn on<F>(&mut self, view: ViewId, kind: ViewEventKind, handler: F)
    where
        F: Fn(&ViewEvent) + 'static,
    {
        self.events.register(view, kind, handler);
    }

    pub(crate) fn emit(&self, event: ViewEvent) {
        self.events.dispatch(&event);
    }

    // ------------------------------------------------------------------
    // Frame delivery
    // ------------------------------------------------------------------

    /// True while anything is waiting for a frame
    pub fn needs_frame(&self) -> bool {
        self.frames.has_pending()
            || !self.transitions.is_empty()
            || self.views.values().any(View::is_animating)
    }

    /// Run the work due for this display refresh
    pub fn deliver_frame(&mut self) -> FrameStats {
        let max_immediate = self.config.frame.max_immediate_frames;
        let mut stats = FrameStats::default();
        loop {
            stats.cycles += 1;
            let immediate = self.run_frame_cycle(&mut stats);
            if !immediate {
                break;
            }
            if stats.cycles > max_immediate {
                tracing::warn!(
                    cycles = stats.cycles,
                    "immediate frame cap reached, deferring to next refresh"
                );
                break;
            }
        }
        tracing::trace!(?stats, "frame delivered");
        stats
    }

    fn run_frame_cycle(&mut self, stats: &mut FrameStats) -> bool {
        let mut state = FrameState::new(self.clock.now_ms());
        self.tick_animations(&mut state);

        let batch = self.frames.take_frame();
        for (_, task) in batch.named {
            self.run_task(task, stats);
        }

        // Updates raised by the layout pass join this frame
        let mut updates = batch.unnamed;
        updates.extend(self.frames.take_requests());
        for task in updates {
            self.run_task(task, stats);
        }

        self.poll_transitions();
        state.immediate_frame_requested()
    }

    fn run_task(&mut self, task: FrameTask, stats: &mut FrameStats) {
        match task {
            FrameTask::Layout(root) => {
                if self.run_layout(root) {
                    stats.layout_passes += 1;
                }
            }
            FrameTask::Update(id) => {
                if self.update(id) {
                    stats.updates += 1;
                }
            }
        }
    }

    fn tick_animations(&mut self, state: &mut FrameState) {
        let animating: ViewList = self
            .views
            .iter()
            .filter(|(_, view)| view.is_animating())
            .map(|(id, _)| id)
            .collect();

        for id in animating {
            let Some(view) = self.views.get_mut(id) else {
                continue;
            };
            let View {
                transform,
                opacity,
                animation,
                ..
            } = view;
            let Some(set) = animation.as_mut() else {
                continue;
            };
            set.view_state_mut().sync_base(transform, *opacity);
            set.compute(state);
            let changed = set.view_state_mut().take_invalidations();
            for property in changed {
                self.invalidate(id, property);
            }
        }
    }
}

impl<P: Presenter + std::fmt::Debug> std::fmt::Debug for ViewTree<P> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ViewTree")
            .field("presenter", &self.presenter)
            .field("views", &self.views.len())
            .field("frames", &self.frames)
            .field("transitions", &self.transitions.len())
            .finish()
    }
}
