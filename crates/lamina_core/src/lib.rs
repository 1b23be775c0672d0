//! Lamina Core
//!
//! Foundational types shared by the animation system and the view engine:
//!
//! - **Geometry values**: [`Rect`], [`EdgeInsets`], [`Transform`] and
//!   [`LayoutParams`], with mutators that report what changed
//! - **Presentation contract**: the [`Presenter`] trait for the external
//!   retained tree, plus the in-memory [`MemoryPresenter`]
//! - **Frame scheduling**: [`FrameScheduler`] with unnamed and deduplicating
//!   named registrations
//! - **Property tags** naming what a render pass must reconcile
//! - **Completion handles** for work that finishes on a later frame
//! - **Clocks** and **configuration**

pub mod clock;
pub mod completion;
pub mod config;
pub mod frame;
pub mod geometry;
pub mod layout_params;
pub mod presenter;
pub mod property;
pub mod transform;

pub use clock::{Clock, ManualClock, MonotonicClock};
pub use completion::Completion;
pub use config::{ConfigError, FrameConfig, LaminaConfig, MomentumConfig, RenderConfig};
pub use frame::{FrameBatch, FrameScheduler};
pub use geometry::{EdgeInsets, Point, Rect, RectChanges, Size};
pub use layout_params::{Dimension, LayoutParams};
pub use presenter::{ElementId, MemoryPresenter, Presenter};
pub use property::Property;
pub use transform::{Transform, TransformFunction};
