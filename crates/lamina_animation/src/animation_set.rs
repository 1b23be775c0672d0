//! Per-view animation owner

use crate::animation::Animation;
use crate::frame_state::FrameState;
use crate::view_state::ViewState;

/// The root multiplexer of one view plus the state it animates
#[derive(Debug)]
pub struct AnimationSet {
    root: Animation,
    view_state: ViewState,
}

impl Default for AnimationSet {
    fn default() -> Self {
        Self::new()
    }
}

impl AnimationSet {
    pub fn new() -> Self {
        Self {
            root: Animation::new("root"),
            view_state: ViewState::new(),
        }
    }

    /// Root multiplexer; use [`Animation::get`] for named lanes
    pub fn animation(&mut self) -> &mut Animation {
        &mut self.root
    }

    pub fn root(&self) -> &Animation {
        &self.root
    }

    pub fn view_state(&self) -> &ViewState {
        &self.view_state
    }

    pub fn view_state_mut(&mut self) -> &mut ViewState {
        &mut self.view_state
    }

    pub fn compute(&mut self, state: &mut FrameState) {
        self.root.compute(state, &mut self.view_state);
    }

    pub fn is_running(&self) -> bool {
        !self.root.is_idle()
    }

    /// Cancel every lane and drop animated overrides
    pub fn reset(&mut self) {
        self.root.remove_all();
        self.view_state.clear();
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use lamina_core::{Property, Transform};

    #[test]
    fn test_overrides_persist_until_reset() {
        let mut set = AnimationSet::new();
        set.animation()
            .chain(0.0)
            .transform(10.0, Transform::new().translate(0.0, 50.0));

        let mut t = 0.0;
        while set.is_running() {
            let mut state = FrameState::new(t);
            set.compute(&mut state);
            if !state.immediate_frame_requested() {
                t += 10.0;
            }
        }
        assert_eq!(
            set.view_state().current_transform().translation(),
            (0.0, 50.0)
        );
        let _ = set.view_state_mut().take_invalidations();

        set.reset();
        assert!(set.view_state().transform_override().is_none());
        assert_eq!(
            set.view_state_mut().take_invalidations(),
            vec![Property::Transform]
        );
    }
}
