//! Lamina Animation System
//!
//! Animation for layered views: lanes, chained steps and drag momentum.
//!
//! # Features
//!
//! - **Multiplexing**: an [`Animation`] runs named parallel lanes, nested to
//!   any depth
//! - **Chaining**: a stopped [`BasicAnimation`] hands its lane to its
//!   successor without a gap frame
//! - **Blending**: [`ViewState`] layers animated overrides over a view's own
//!   transform and opacity
//! - **Momentum**: [`Momentum`] projects fling distance from drag samples

pub mod animation;
pub mod animation_set;
pub mod easing;
pub mod frame_state;
pub mod id;
pub mod momentum;
pub mod step;
pub mod view_state;

pub use animation::{Animation, Lane};
pub use animation_set::AnimationSet;
pub use easing::Easing;
pub use frame_state::FrameState;
pub use id::AnimationId;
pub use momentum::Momentum;
pub use step::{BasicAnimation, OpacityTrack, Track, TransformTrack, ValueTrack};
pub use view_state::ViewState;
