//! Animation multiplexer
//!
//! An [`Animation`] runs an ordered list of lanes every frame. A lane is
//! either a nested multiplexer (a named parallel track obtained with
//! [`Animation::get`]) or a leaf [`BasicAnimation`]. When a leaf step stops,
//! its successor takes over the same index in the lane list.
//!
//! Frame computation is two-phase: every lane computes first, then stopped
//! lanes are reconciled. Lanes are never removed while the list is being
//! iterated.

use std::borrow::Cow;

use crate::frame_state::FrameState;
use crate::id::AnimationId;
use crate::step::BasicAnimation;
use crate::view_state::ViewState;

/// One entry in a multiplexer's lane list
#[derive(Debug)]
pub enum Lane {
    /// Nested multiplexer. Never signals stop and has no successor.
    Group(Animation),
    /// Leaf step
    Step(BasicAnimation),
}

impl Lane {
    pub fn id(&self) -> AnimationId {
        match self {
            Lane::Group(group) => group.id(),
            Lane::Step(step) => step.id(),
        }
    }

    pub fn name(&self) -> &str {
        match self {
            Lane::Group(group) => group.name(),
            Lane::Step(step) => step.name(),
        }
    }

    pub fn compute(&mut self, state: &mut FrameState, view: &mut ViewState) {
        match self {
            Lane::Group(group) => group.compute(state, view),
            Lane::Step(step) => step.compute(state, view),
        }
    }

    fn take_stop(&mut self) -> bool {
        match self {
            Lane::Group(_) => false,
            Lane::Step(step) => step.take_stop(),
        }
    }

    fn into_successor(self) -> Option<BasicAnimation> {
        match self {
            Lane::Group(_) => None,
            Lane::Step(mut step) => step.take_next(),
        }
    }

    /// Nested multiplexer of this lane. A leaf step is swapped for an empty
    /// group named `name`.
    fn group_or_replace(&mut self, name: &str) -> &mut Animation {
        match self {
            Lane::Group(group) => group,
            Lane::Step(_) => {
                *self = Lane::Group(Animation::new(name.to_owned()));
                self.group_or_replace(name)
            }
        }
    }

    /// Leaf step of this lane. A group is swapped for an empty `"start"` step.
    fn step_or_start(&mut self, duration_ms: f64) -> &mut BasicAnimation {
        match self {
            Lane::Step(step) => step,
            Lane::Group(_) => {
                *self = Lane::Step(BasicAnimation::new("start", duration_ms));
                self.step_or_start(duration_ms)
            }
        }
    }

    /// True when nothing under this lane is still running
    pub fn is_idle(&self) -> bool {
        match self {
            Lane::Group(group) => group.is_idle(),
            Lane::Step(_) => false,
        }
    }

    pub fn as_group(&self) -> Option<&Animation> {
        match self {
            Lane::Group(group) => Some(group),
            Lane::Step(_) => None,
        }
    }

    pub fn as_group_mut(&mut self) -> Option<&mut Animation> {
        match self {
            Lane::Group(group) => Some(group),
            Lane::Step(_) => None,
        }
    }

    pub fn as_step(&self) -> Option<&BasicAnimation> {
        match self {
            Lane::Group(_) => None,
            Lane::Step(step) => Some(step),
        }
    }

    pub fn as_step_mut(&mut self) -> Option<&mut BasicAnimation> {
        match self {
            Lane::Group(_) => None,
            Lane::Step(step) => Some(step),
        }
    }
}

impl From<Animation> for Lane {
    fn from(group: Animation) -> Self {
        Lane::Group(group)
    }
}

impl From<BasicAnimation> for Lane {
    fn from(step: BasicAnimation) -> Self {
        Lane::Step(step)
    }
}

/// Named container running lanes side by side
#[derive(Debug)]
pub struct Animation {
    id: AnimationId,
    name: Cow<'static, str>,
    lanes: Vec<Lane>,
    stopped: Vec<AnimationId>,
}

impl Animation {
    pub fn new(name: impl Into<Cow<'static, str>>) -> Self {
        Self {
            id: AnimationId::next(),
            name: name.into(),
            lanes: Vec::new(),
            stopped: Vec::new(),
        }
    }

    pub fn id(&self) -> AnimationId {
        self.id
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn lanes(&self) -> &[Lane] {
        &self.lanes
    }

    pub fn len(&self) -> usize {
        self.lanes.len()
    }

    pub fn is_empty(&self) -> bool {
        self.lanes.is_empty()
    }

    /// First lane named `name`
    pub fn search(&self, name: &str) -> Option<&Lane> {
        self.lanes.iter().find(|lane| lane.name() == name)
    }

    pub fn search_mut(&mut self, name: &str) -> Option<&mut Lane> {
        self.lanes.iter_mut().find(|lane| lane.name() == name)
    }

    /// First nested multiplexer named `name`, appended empty if there is none.
    ///
    /// Leaf steps sharing the name are skipped.
    pub fn get(&mut self, name: &str) -> &mut Animation {
        let existing = self
            .lanes
            .iter()
            .position(|lane| matches!(lane, Lane::Group(group) if group.name() == name));
        let index = match existing {
            Some(index) => index,
            None => {
                tracing::trace!(parent = %self.name, lane = name, "creating animation lane");
                self.lanes.push(Lane::Group(Animation::new(name.to_owned())));
                self.lanes.len() - 1
            }
        };
        self.lanes[index].group_or_replace(name)
    }

    /// Add a lane at the end
    pub fn append(&mut self, lane: impl Into<Lane>) -> AnimationId {
        let lane = lane.into();
        let id = lane.id();
        self.lanes.push(lane);
        id
    }

    /// Add a lane at `index`, clamped to the lane count
    pub fn insert(&mut self, index: usize, lane: impl Into<Lane>) -> AnimationId {
        let lane = lane.into();
        let id = lane.id();
        let index = index.min(self.lanes.len());
        self.lanes.insert(index, lane);
        id
    }

    /// Remove a direct lane by id. Absent ids are ignored.
    pub fn remove(&mut self, id: AnimationId) -> Option<Lane> {
        self.stopped.retain(|stopped| *stopped != id);
        let index = self.position(id)?;
        Some(self.lanes.remove(index))
    }

    /// Cancel every lane
    pub fn remove_all(&mut self) {
        if !self.lanes.is_empty() {
            tracing::trace!(name = %self.name, lanes = self.lanes.len(), "removing all lanes");
        }
        self.lanes.clear();
        self.stopped.clear();
    }

    pub fn last(&self) -> Option<&Lane> {
        self.lanes.last()
    }

    pub fn last_mut(&mut self) -> Option<&mut Lane> {
        self.lanes.last_mut()
    }

    /// Start a sequence with an empty step named `"start"`.
    ///
    /// If the last lane is a leaf step the new step becomes its successor and
    /// only runs once that lane stops. Otherwise (no lanes, or the last lane
    /// is a nested multiplexer, which never stops) the step is appended as an
    /// active lane.
    pub fn chain(&mut self, duration_ms: f64) -> &mut BasicAnimation {
        let onto_last = matches!(self.lanes.last(), Some(Lane::Step(_)));
        if !onto_last {
            self.lanes.push(Lane::Step(BasicAnimation::new("start", duration_ms)));
        }
        let index = self.lanes.len() - 1;
        let last = self.lanes[index].step_or_start(duration_ms);
        if !onto_last {
            return last;
        }
        if let Some(replaced) = last.next() {
            tracing::debug!(
                lane = %last.name(),
                replaced = %replaced.name(),
                "chain replaces pending successor"
            );
        }
        last.set_next(BasicAnimation::new("start", duration_ms))
    }

    /// Compute every lane for this frame, then swap stopped lanes for their
    /// successors in place.
    pub fn compute(&mut self, state: &mut FrameState, view: &mut ViewState) {
        for lane in self.lanes.iter_mut() {
            lane.compute(state, view);
            if lane.take_stop() {
                self.stopped.push(lane.id());
            }
        }

        for id in std::mem::take(&mut self.stopped) {
            let Some(index) = self.position(id) else {
                continue;
            };
            let lane = self.lanes.remove(index);
            if let Some(next) = lane.into_successor() {
                tracing::trace!(
                    parent = %self.name,
                    index,
                    next = %next.name(),
                    "successor takes over lane"
                );
                self.lanes.insert(index, Lane::Step(next));
                state.request_immediate_frame();
            }
        }
    }

    /// True when no leaf step is active at any depth
    pub fn is_idle(&self) -> bool {
        self.lanes.iter().all(Lane::is_idle)
    }

    fn position(&self, id: AnimationId) -> Option<usize> {
        self.lanes.iter().position(|lane| lane.id() == id)
    }
}
