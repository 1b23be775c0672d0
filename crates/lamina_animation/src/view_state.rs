//! Animated overrides for one view
//!
//! The view tree syncs the view's own transform and opacity into the base
//! fields each frame. Running steps write overrides on top; the render pass
//! asks [`ViewState::blend_transform`] / [`ViewState::blend_opacity`] for the
//! value that actually reaches the presentation tree.

use std::borrow::Cow;

use indexmap::{IndexMap, IndexSet};
use lamina_core::{Property, Transform};

#[derive(Debug, Clone)]
pub struct ViewState {
    base_transform: Transform,
    base_opacity: f32,
    transform: Option<Transform>,
    opacity: Option<f32>,
    values: IndexMap<Cow<'static, str>, f32>,
    invalidated: IndexSet<Property>,
}

impl Default for ViewState {
    fn default() -> Self {
        Self {
            base_transform: Transform::new(),
            base_opacity: 1.0,
            transform: None,
            opacity: None,
            values: IndexMap::new(),
            invalidated: IndexSet::new(),
        }
    }
}

impl ViewState {
    pub fn new() -> Self {
        Self::default()
    }

    /// Record the view's own (non-animated) values
    pub fn sync_base(&mut self, transform: &Transform, opacity: f32) {
        self.base_transform.set(transform);
        self.base_opacity = opacity;
    }

    pub fn base_transform(&self) -> &Transform {
        &self.base_transform
    }

    pub fn base_opacity(&self) -> f32 {
        self.base_opacity
    }

    pub fn transform_override(&self) -> Option<&Transform> {
        self.transform.as_ref()
    }

    pub fn opacity_override(&self) -> Option<f32> {
        self.opacity
    }

    /// Transform as currently presented: the override, else the base
    pub fn current_transform(&self) -> &Transform {
        self.blend_transform(&self.base_transform)
    }

    /// Opacity as currently presented: the override, else the base
    pub fn current_opacity(&self) -> f32 {
        self.blend_opacity(self.base_opacity)
    }

    /// `base` blended with the animated transform
    pub fn blend_transform<'a>(&'a self, base: &'a Transform) -> &'a Transform {
        self.transform.as_ref().unwrap_or(base)
    }

    /// `base` blended with the animated opacity
    pub fn blend_opacity(&self, base: f32) -> f32 {
        self.opacity.unwrap_or(base)
    }

    pub fn set_transform(&mut self, transform: Transform) {
        if self.transform.as_ref() != Some(&transform) {
            self.transform = Some(transform);
            self.invalidated.insert(Property::Transform);
        }
    }

    pub fn set_opacity(&mut self, opacity: f32) {
        if self.opacity != Some(opacity) {
            self.opacity = Some(opacity);
            self.invalidated.insert(Property::Opacity);
        }
    }

    /// Custom animated scalar; raises a custom invalidation tag of the same name
    pub fn value(&self, name: &str) -> Option<f32> {
        self.values.get(name).copied()
    }

    pub fn set_value(&mut self, name: impl Into<Cow<'static, str>>, value: f32) {
        let name = name.into();
        if self.values.get(&name) == Some(&value) {
            return;
        }
        self.invalidated.insert(Property::custom(name.clone()));
        self.values.insert(name, value);
    }

    /// Drop every override, invalidating what they covered
    pub fn clear(&mut self) {
        if self.transform.take().is_some() {
            self.invalidated.insert(Property::Transform);
        }
        if self.opacity.take().is_some() {
            self.invalidated.insert(Property::Opacity);
        }
        for (name, _) in self.values.drain(..) {
            self.invalidated.insert(Property::custom(name));
        }
    }

    pub fn has_invalidations(&self) -> bool {
        !self.invalidated.is_empty()
    }

    /// Properties changed by animation since the last call
    pub fn take_invalidations(&mut self) -> Vec<Property> {
        self.invalidated.drain(..).collect()
    }
}
