//! Render-invalidation pass
//!
//! Each invalidated view schedules its own update for the next frame. The
//! update writes every pending property to the presentation tree, blending
//! transform and opacity with the view's running animations. Updates of
//! different views run in no guaranteed order.

use indexmap::IndexSet;
use lamina_core::{Presenter, Property, RenderConfig};

use crate::events::ViewEvent;
use crate::tree::{FrameTask, ViewTree};
use crate::view::{Lifecycle, View, ViewId};

const VIEW_CLASS: &str = "lamina-view";

impl<P: Presenter> ViewTree<P> {
    /// Mark a property stale. The first invalidation of a view in a frame
    /// schedules its update; later ones only add to the pending set.
    ///
    /// A removed view only records the property. Its update is scheduled when
    /// it is attached again.
    pub fn invalidate(&mut self, id: ViewId, property: Property) {
        let Some(view) = self.views.get_mut(id) else {
            return;
        };
        let removed = view.lifecycle == Lifecycle::Removed;
        if removed {
            tracing::trace!(?id, %property, "recording invalidation on removed view");
        }
        let schedule = view.invalidation.is_none() && !removed;
        view.invalidation
            .get_or_insert_with(IndexSet::new)
            .insert(property);
        if schedule {
            self.frames.request(FrameTask::Update(id));
        }
    }

    /// Schedule the update of a view that came back with pending invalidations
    pub(crate) fn schedule_pending_update(&mut self, id: ViewId) {
        if self.views.get(id).is_some_and(|view| view.invalidation.is_some()) {
            self.frames.request(FrameTask::Update(id));
        }
    }

    /// Write position, size and transform right away
    pub fn render(&mut self, id: ViewId) {
        let Some(view) = self.views.get(id) else {
            return;
        };
        let element = view.element;
        self.presenter.add_class(element, VIEW_CLASS);
        for property in [Property::Position, Property::Size, Property::Transform] {
            self.validate(id, &property);
        }
    }

    /// Update task body. Returns true if anything was written.
    pub(crate) fn update(&mut self, id: ViewId) -> bool {
        let Some(view) = self.views.get_mut(id) else {
            return false;
        };
        if view.lifecycle == Lifecycle::Removed {
            tracing::trace!(?id, "deferring render update of removed view");
            return false;
        }
        let Some(flags) = view.invalidation.take() else {
            return false;
        };
        for property in &flags {
            self.validate(id, property);
        }
        self.emit(ViewEvent::Updated { view: id });
        true
    }

    fn validate(&mut self, id: ViewId, property: &Property) {
        let Some(view) = self.views.get(id) else {
            return;
        };
        let element = view.element;
        let render = &self.config.render;
        let unit = render.length_unit.as_str();

        let writes: Vec<(&str, String)> = match property {
            Property::Position => vec![
                ("left", format!("{}{unit}", view.bounds.x())),
                ("top", format!("{}{unit}", view.bounds.y())),
            ],
            Property::Size => vec![
                ("width", format!("{}{unit}", view.bounds.width())),
                ("height", format!("{}{unit}", view.bounds.height())),
            ],
            Property::Transform => vec![("transform", transform_css(view, render))],
            Property::Opacity => vec![("opacity", blended_opacity(view).to_string())],
            Property::Padding => vec![("padding", view.padding.to_css_string(unit))],
            Property::Margin => vec![("margin", view.margin.to_css_string(unit))],
            Property::Custom(_) => {
                self.emit(ViewEvent::Validated {
                    view: id,
                    property: property.clone(),
                });
                return;
            }
        };

        for (name, value) in writes {
            self.presenter.set_style(element, name, &value);
        }
    }
}

fn transform_css(view: &View, render: &RenderConfig) -> String {
    let transform = match &view.animation {
        Some(set) => set.view_state().blend_transform(&view.transform),
        None => &view.transform,
    };
    let mut css = transform.to_string();
    if render.hardware_acceleration_hint && !transform.has_3d_transforms() {
        if !css.is_empty() {
            css.push(' ');
        }
        css.push_str("translateZ(0)");
    } else if css.is_empty() {
        css.push_str("none");
    }
    css
}

fn blended_opacity(view: &View) -> f32 {
    match &view.animation {
        Some(set) => set.view_state().blend_opacity(view.opacity),
        None => view.opacity,
    }
}
