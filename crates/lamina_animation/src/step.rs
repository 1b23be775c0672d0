//! Leaf animation steps
//!
//! A [`BasicAnimation`] runs a set of value [`Track`]s over a fixed duration,
//! signals stop exactly once, and may carry a successor that takes over its
//! lane when it stops. Builder calls link successors so that a whole sequence
//! reads as one expression:
//!
//! ```
//! use lamina_animation::Animation;
//! use lamina_core::Transform;
//!
//! let mut root = Animation::new("root");
//! root.chain(0.0)
//!     .transform(200.0, Transform::new().translate(0.0, 400.0))
//!     .opacity(100.0, 0.0);
//! ```

use std::borrow::Cow;
use std::fmt;

use lamina_core::{Completion, Transform};
use smallvec::SmallVec;

use crate::easing::Easing;
use crate::frame_state::FrameState;
use crate::id::AnimationId;
use crate::view_state::ViewState;

/// One animated value inside a step
pub trait Track: fmt::Debug {
    /// Capture start values on the step's first frame
    fn begin(&mut self, view: &ViewState);

    /// Write the value for eased `progress` into the view state
    fn apply(&mut self, progress: f32, view: &mut ViewState);
}

/// Animates the view transform toward a target
#[derive(Debug, Clone)]
pub struct TransformTrack {
    from: Option<Transform>,
    to: Transform,
}

impl TransformTrack {
    pub fn new(to: Transform) -> Self {
        Self { from: None, to }
    }
}

impl Track for TransformTrack {
    fn begin(&mut self, view: &ViewState) {
        self.from = Some(view.current_transform().clone());
    }

    fn apply(&mut self, progress: f32, view: &mut ViewState) {
        let from = self.from.as_ref().unwrap_or(&self.to);
        view.set_transform(Transform::lerp(from, &self.to, progress));
    }
}

/// Animates the view opacity toward a target
#[derive(Debug, Clone)]
pub struct OpacityTrack {
    from: Option<f32>,
    to: f32,
}

impl OpacityTrack {
    pub fn new(to: f32) -> Self {
        Self { from: None, to }
    }
}

impl Track for OpacityTrack {
    fn begin(&mut self, view: &ViewState) {
        self.from = Some(view.current_opacity());
    }

    fn apply(&mut self, progress: f32, view: &mut ViewState) {
        let from = self.from.unwrap_or(self.to);
        view.set_opacity(from + (self.to - from) * progress);
    }
}

/// Animates a named custom scalar between two fixed values
#[derive(Debug, Clone)]
pub struct ValueTrack {
    name: Cow<'static, str>,
    from: f32,
    to: f32,
}

impl ValueTrack {
    pub fn new(name: impl Into<Cow<'static, str>>, from: f32, to: f32) -> Self {
        Self {
            name: name.into(),
            from,
            to,
        }
    }
}

impl Track for ValueTrack {
    fn begin(&mut self, _view: &ViewState) {}

    fn apply(&mut self, progress: f32, view: &mut ViewState) {
        view.set_value(self.name.clone(), self.from + (self.to - self.from) * progress);
    }
}

/// Timed leaf step
pub struct BasicAnimation {
    id: AnimationId,
    name: Cow<'static, str>,
    duration_ms: f64,
    easing: Easing,
    tracks: SmallVec<[Box<dyn Track>; 2]>,
    started_at: Option<f64>,
    finished: bool,
    stop_pending: bool,
    next: Option<Box<BasicAnimation>>,
    completion: Option<Completion>,
}

impl BasicAnimation {
    pub fn new(name: impl Into<Cow<'static, str>>, duration_ms: f64) -> Self {
        Self {
            id: AnimationId::next(),
            name: name.into(),
            duration_ms,
            easing: Easing::default(),
            tracks: SmallVec::new(),
            started_at: None,
            finished: false,
            stop_pending: false,
            next: None,
            completion: None,
        }
    }

    pub fn id(&self) -> AnimationId {
        self.id
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn duration_ms(&self) -> f64 {
        self.duration_ms
    }

    pub fn easing(&self) -> Easing {
        self.easing
    }

    pub fn set_easing(&mut self, easing: Easing) -> &mut Self {
        self.easing = easing;
        self
    }

    pub fn add_track(&mut self, track: impl Track + 'static) -> &mut Self {
        self.tracks.push(Box::new(track));
        self
    }

    pub fn is_started(&self) -> bool {
        self.started_at.is_some()
    }

    pub fn is_finished(&self) -> bool {
        self.finished
    }

    pub fn next(&self) -> Option<&BasicAnimation> {
        self.next.as_deref()
    }

    pub fn next_mut(&mut self) -> Option<&mut BasicAnimation> {
        self.next.as_deref_mut()
    }

    /// Link the step that takes over this lane once this one stops.
    ///
    /// Replaces any existing successor and returns the new one. The replaced
    /// chain is cancelled and its completions resolve.
    pub fn set_next(&mut self, next: BasicAnimation) -> &mut BasicAnimation {
        self.next.insert(Box::new(next))
    }

    /// Unlink the successor
    pub fn take_next(&mut self) -> Option<BasicAnimation> {
        self.next.take().map(|next| *next)
    }

    /// Successor that moves the transform to `target`
    pub fn transform(&mut self, duration_ms: f64, target: Transform) -> &mut BasicAnimation {
        let mut step = BasicAnimation::new("transform", duration_ms);
        step.add_track(TransformTrack::new(target));
        self.set_next(step)
    }

    /// Successor that fades to `target`
    pub fn opacity(&mut self, duration_ms: f64, target: f32) -> &mut BasicAnimation {
        let mut step = BasicAnimation::new("opacity", duration_ms);
        step.add_track(OpacityTrack::new(target));
        self.set_next(step)
    }

    /// Successor that moves a custom scalar from `from` to `to`
    pub fn custom(
        &mut self,
        name: impl Into<Cow<'static, str>>,
        duration_ms: f64,
        from: f32,
        to: f32,
    ) -> &mut BasicAnimation {
        let name = name.into();
        let mut step = BasicAnimation::new(name.clone(), duration_ms);
        step.add_track(ValueTrack::new(name, from, to));
        self.set_next(step)
    }

    /// Handle resolved when this step stops
    pub fn completion(&mut self) -> Completion {
        let finished = self.finished;
        let completion = self.completion.get_or_insert_with(Completion::new);
        if finished {
            completion.resolve();
        }
        completion.clone()
    }

    /// Advance to the frame time in `state`, writing track values into `view`
    pub fn compute(&mut self, state: &FrameState, view: &mut ViewState) {
        if self.finished {
            return;
        }

        let now = state.now_ms();
        let started_at = match self.started_at {
            Some(started_at) => started_at,
            None => {
                self.started_at = Some(now);
                for track in self.tracks.iter_mut() {
                    track.begin(view);
                }
                now
            }
        };

        let progress = if self.duration_ms <= 0.0 {
            1.0
        } else {
            ((now - started_at) / self.duration_ms).clamp(0.0, 1.0) as f32
        };

        let eased = self.easing.apply(progress);
        for track in self.tracks.iter_mut() {
            track.apply(eased, view);
        }

        if progress >= 1.0 {
            tracing::trace!(id = %self.id, name = %self.name, "step finished");
            self.finished = true;
            self.stop_pending = true;
            if let Some(completion) = &self.completion {
                completion.resolve();
            }
        }
    }

    /// One-shot stop signal: true exactly once, on the frame the step finishes
    pub fn take_stop(&mut self) -> bool {
        std::mem::take(&mut self.stop_pending)
    }
}

/// A step dropped before it finished (replaced, removed or cancelled) still
/// resolves its completion.
impl Drop for BasicAnimation {
    fn drop(&mut self) {
        let Some(completion) = &self.completion else {
            return;
        };
        if !self.finished {
            tracing::trace!(id = %self.id, name = %self.name, "step cancelled");
        }
        completion.resolve();
    }
}

impl fmt::Debug for BasicAnimation {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("BasicAnimation")
            .field("id", &self.id)
            .field("name", &self.name)
            .field("duration_ms", &self.duration_ms)
            .field("tracks", &self.tracks)
            .field("finished", &self.finished)
            .field("next", &self.next)
            .finish()
    }
}
