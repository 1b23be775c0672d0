//! Integration tests for lane multiplexing and step chaining
//!
//! These tests verify that:
//! - Named lanes run in parallel and are found again by name
//! - Chained steps take over their lane without a gap frame
//! - Momentum samples from a drag produce a usable fling projection

use lamina_animation::{Animation, AnimationSet, BasicAnimation, FrameState, Momentum, ViewState};
use lamina_core::{ManualClock, Property, Transform};

/// Drive `set` until it goes idle, honouring immediate-frame requests.
/// Returns the number of frames computed.
fn run_to_idle(set: &mut AnimationSet, start_ms: f64, step_ms: f64) -> usize {
    let mut now = start_ms;
    let mut frames = 0;
    while set.is_running() && frames < 1000 {
        let mut state = FrameState::new(now);
        set.compute(&mut state);
        frames += 1;
        if !state.immediate_frame_requested() {
            now += step_ms;
        }
    }
    frames
}

/// A chain built in one expression runs each step in order
#[test]
fn test_chain_runs_sequentially() {
    let mut set = AnimationSet::new();
    set.animation()
        .chain(0.0)
        .transform(100.0, Transform::new().translate(0.0, 200.0))
        .opacity(100.0, 0.0);

    // First frame: "start" stops at once and hands over to the transform step
    let mut state = FrameState::new(0.0);
    set.compute(&mut state);
    assert!(state.immediate_frame_requested());
    assert_eq!(set.root().len(), 1);
    assert_eq!(set.root().lanes()[0].name(), "transform");

    // Halfway through the transform the opacity is untouched
    set.compute(&mut FrameState::new(0.0));
    set.compute(&mut FrameState::new(50.0));
    assert_eq!(
        set.view_state().current_transform().translation(),
        (0.0, 100.0)
    );
    assert!(set.view_state().opacity_override().is_none());

    run_to_idle(&mut set, 100.0, 16.0);
    assert_eq!(
        set.view_state().current_transform().translation(),
        (0.0, 200.0)
    );
    assert_eq!(set.view_state().current_opacity(), 0.0);
}

/// Named lanes are independent; replacing a step in one leaves the other
#[test]
fn test_named_lanes_run_in_parallel() {
    let mut set = AnimationSet::new();
    set.animation()
        .get("slide")
        .chain(0.0)
        .transform(100.0, Transform::new().translate(300.0, 0.0));
    set.animation()
        .get("filter")
        .chain(0.0)
        .custom("blur", 100.0, 0.0, 8.0);

    // `get` found the existing lanes rather than adding new ones
    set.animation().get("slide");
    assert_eq!(set.root().len(), 2);

    let mut state = FrameState::new(0.0);
    set.compute(&mut state);
    assert!(state.immediate_frame_requested());
    set.compute(&mut FrameState::new(0.0));
    set.compute(&mut FrameState::new(50.0));

    let view = set.view_state();
    assert_eq!(view.current_transform().translation(), (150.0, 0.0));
    assert_eq!(view.value("blur"), Some(4.0));

    run_to_idle(&mut set, 100.0, 16.0);
    assert_eq!(set.view_state().value("blur"), Some(8.0));
    // Groups outlive their steps
    assert_eq!(set.root().len(), 2);
}

/// Reconciliation nets to zero lanes and keeps the slot
#[test]
fn test_replacement_preserves_slot() {
    let mut root = Animation::new("root");
    root.append(BasicAnimation::new("left", 500.0));
    root.chain(0.0).set_next(BasicAnimation::new("tail", 0.0));
    let right = root.append(BasicAnimation::new("right", 1000.0));

    let mut view = ViewState::new();
    let mut state = FrameState::new(0.0);
    root.compute(&mut state, &mut view);
    assert_eq!(root.len(), 2);
    assert_eq!(root.lanes()[1].id(), right);

    // "left" stops at 500ms; its "start" successor takes index 0
    let mut state = FrameState::new(500.0);
    root.compute(&mut state, &mut view);
    assert!(state.immediate_frame_requested());
    assert_eq!(root.len(), 2);
    assert_eq!(root.lanes()[0].name(), "start");
    assert_eq!(root.lanes()[1].id(), right);
}

/// Cancelling mid-flight restores the view's own values
#[test]
fn test_reset_cancels_running_steps() {
    let mut set = AnimationSet::new();
    set.view_state_mut().sync_base(&Transform::new(), 0.8);
    set.animation().chain(0.0).opacity(100.0, 0.0);
    set.compute(&mut FrameState::new(0.0));
    set.compute(&mut FrameState::new(0.0));
    set.compute(&mut FrameState::new(50.0));
    assert!(set.is_running());

    set.reset();
    assert!(!set.is_running());
    assert_eq!(set.view_state().current_opacity(), 0.8);
    assert!(set
        .view_state_mut()
        .take_invalidations()
        .contains(&Property::Opacity));
}

/// A flick downward projects further than the finger travelled
#[test]
fn test_drag_samples_project_fling() {
    let clock = ManualClock::new();
    let mut momentum = Momentum::with_clock(300.0, clock.clone());

    // Accelerating drag: 0, 8, 24, 48 px at 16ms spacing
    for value in [0.0, 8.0, 24.0, 48.0] {
        momentum.inject_value(value);
        clock.advance(16.0);
    }

    assert!(momentum.velocity() > 0.0);
    assert!(momentum.acceleration() > momentum.min_acceleration());
    assert!(momentum.compute_delta() > 48.0);
}
