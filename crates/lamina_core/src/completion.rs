//! Resolve-once completion handles
//!
//! A [`Completion`] represents in-flight work that finishes on some later
//! frame (e.g. an entrance animation). Clones share the same state. It can be
//! polled with [`Completion::is_resolved`] from a frame loop or awaited as a
//! `Future`.
//!
//! There is no cancellation: dropping every handle does not stop the
//! underlying work.

use std::cell::{Cell, RefCell};
use std::fmt;
use std::future::Future;
use std::pin::Pin;
use std::rc::Rc;
use std::task::{Context, Poll, Waker};

#[derive(Default)]
struct Shared {
    resolved: Cell<bool>,
    wakers: RefCell<Vec<Waker>>,
}

/// Shared, resolve-once completion signal
#[derive(Clone, Default)]
pub struct Completion {
    shared: Rc<Shared>,
}

impl Completion {
    /// A pending completion
    pub fn new() -> Self {
        Self::default()
    }

    /// A completion that is already resolved
    pub fn resolved() -> Self {
        let completion = Self::new();
        completion.resolve();
        completion
    }

    /// Mark as resolved and wake any awaiting tasks. Later calls do nothing.
    pub fn resolve(&self) {
        if self.shared.resolved.replace(true) {
            return;
        }
        let wakers = std::mem::take(&mut *self.shared.wakers.borrow_mut());
        for waker in wakers {
            waker.wake();
        }
    }

    pub fn is_resolved(&self) -> bool {
        self.shared.resolved.get()
    }

    /// True if both handles share the same state
    pub fn ptr_eq(&self, other: &Completion) -> bool {
        Rc::ptr_eq(&self.shared, &other.shared)
    }
}

impl fmt::Debug for Completion {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Completion")
            .field("resolved", &self.is_resolved())
            .finish()
    }
}

impl Future for Completion {
    type Output = ();

    fn poll(self: Pin<&mut Self>, cx: &mut Context<'_>) -> Poll<()> {
        if self.is_resolved() {
            return Poll::Ready(());
        }
        let mut wakers = self.shared.wakers.borrow_mut();
        if !wakers.iter().any(|w| w.will_wake(cx.waker())) {
            wakers.push(cx.waker().clone());
        }
        Poll::Pending
    }
}
