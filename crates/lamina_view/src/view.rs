//! View nodes
//!
//! A [`View`] holds the geometry and render state of one presentation
//! element. It does not store its parent or children: those are read from the
//! presentation tree through [`ViewTree`](crate::ViewTree). Views are
//! mutated only through the tree's setters, which raise the matching
//! invalidations.

use indexmap::IndexSet;
use lamina_animation::AnimationSet;
use lamina_core::{EdgeInsets, ElementId, LayoutParams, Property, Rect, Transform};
use slotmap::new_key_type;

new_key_type! {
    pub struct ViewId;
}

/// Attachment state of a view
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub enum Lifecycle {
    /// Attached (or never attached) and taking part in layout and rendering
    #[default]
    Visible,
    /// Detach transition running. Still rendered, skipped by layout.
    Detaching,
    /// Detached or removed. Inert until attached again.
    Removed,
}

#[derive(Debug)]
pub struct View {
    pub(crate) element: ElementId,
    pub(crate) bounds: Rect,
    pub(crate) transform: Transform,
    pub(crate) margin: EdgeInsets,
    pub(crate) padding: EdgeInsets,
    pub(crate) opacity: f32,
    pub(crate) params: Option<LayoutParams>,
    pub(crate) lifecycle: Lifecycle,
    pub(crate) needs_layout: bool,
    /// `Some` while an update is scheduled for the next frame
    pub(crate) invalidation: Option<IndexSet<Property>>,
    pub(crate) animation: Option<AnimationSet>,
    pub(crate) ever_had_layout: bool,
}

impl View {
    pub(crate) fn new(element: ElementId) -> Self {
        Self {
            element,
            bounds: Rect::default(),
            transform: Transform::new(),
            margin: EdgeInsets::default(),
            padding: EdgeInsets::default(),
            opacity: 1.0,
            params: None,
            lifecycle: Lifecycle::Visible,
            needs_layout: false,
            invalidation: None,
            animation: None,
            ever_had_layout: false,
        }
    }

    pub fn element(&self) -> ElementId {
        self.element
    }

    pub fn bounds(&self) -> Rect {
        self.bounds
    }

    pub fn transform(&self) -> &Transform {
        &self.transform
    }

    pub fn margin(&self) -> EdgeInsets {
        self.margin
    }

    pub fn padding(&self) -> EdgeInsets {
        self.padding
    }

    pub fn opacity(&self) -> f32 {
        self.opacity
    }

    pub fn params(&self) -> Option<LayoutParams> {
        self.params
    }

    pub fn lifecycle(&self) -> Lifecycle {
        self.lifecycle
    }

    pub fn is_removed(&self) -> bool {
        self.lifecycle == Lifecycle::Removed
    }

    pub fn needs_layout(&self) -> bool {
        self.needs_layout
    }

    /// False after an animated attach until the view's first layout pass
    pub fn ever_had_layout(&self) -> bool {
        self.ever_had_layout
    }

    /// True if `property` is waiting for the next render pass
    pub fn is_invalidated(&self, property: &Property) -> bool {
        self.invalidation
            .as_ref()
            .is_some_and(|flags| flags.contains(property))
    }

    /// Properties waiting for the next render pass, in invalidation order
    pub fn pending_invalidations(&self) -> impl Iterator<Item = &Property> {
        self.invalidation.iter().flatten()
    }

    pub fn animation_set(&self) -> Option<&AnimationSet> {
        self.animation.as_ref()
    }

    pub(crate) fn is_animating(&self) -> bool {
        self.animation
            .as_ref()
            .is_some_and(|set| set.is_running() || set.view_state().has_invalidations())
    }

    /// Outer width: bounds plus padding plus margin
    pub fn outer_width(&self) -> f32 {
        self.bounds.width() + self.padding.horizontal() + self.margin.horizontal()
    }

    /// Outer height: bounds plus padding plus margin
    pub fn outer_height(&self) -> f32 {
        self.bounds.height() + self.padding.vertical() + self.margin.vertical()
    }
}
