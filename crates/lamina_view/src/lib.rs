//! Lamina View Engine
//!
//! Views layered over a retained presentation tree.
//!
//! A [`ViewTree`] keeps geometry, transform, opacity, margin and padding for
//! every view and reconciles them into a [`Presenter`] once per frame:
//!
//! - **Layout**: dirtiness propagates to the effective root, which runs one
//!   top-down pass per frame resolving match-parent dimensions
//! - **Render invalidation**: each view collects stale property tags and
//!   writes them in a single update, blended with its animations
//! - **Transitions**: animated attach/detach through per-parent
//!   [`TransitionHooks`]
//!
//! ```
//! use lamina_core::{MemoryPresenter, Rect};
//! use lamina_view::ViewTree;
//!
//! let mut tree = ViewTree::new(MemoryPresenter::new());
//! let host = tree.presenter().document();
//! let root = tree.create_view();
//! let card = tree.create_view();
//!
//! tree.set_bounds(root, Rect::new(0.0, 0.0, 320.0, 480.0));
//! tree.mount(root, host);
//! tree.append(root, card);
//! tree.match_parent_size(card);
//! tree.deliver_frame();
//!
//! assert_eq!(tree.view(card).unwrap().bounds().width(), 320.0);
//! ```
//!
//! [`Presenter`]: lamina_core::Presenter

mod attach;
pub mod events;
pub mod hooks;
mod layout;
mod render;
pub mod tree;
pub mod view;

pub use attach::DetachMode;
pub use events::{EventDispatcher, ViewEvent, ViewEventKind};
pub use hooks::{FadeTransitions, ImmediateTransitions, TransitionHooks};
pub use tree::{FrameStats, ViewList, ViewTree};
pub use view::{Lifecycle, View, ViewId};
