//! Frame scheduler
//!
//! Collects work to run on the next display refresh. Two kinds of
//! registration are supported:
//!
//! - **Unnamed** ([`FrameScheduler::request`]): every call queues its own task.
//! - **Named** ([`FrameScheduler::once`]): at most one task per key per frame.
//!   Registering again under a key that is already pending replaces the task
//!   (most recent registration wins) but keeps the key's original position.
//!
//! When a frame is taken, named tasks come first in order of first
//! registration, then unnamed tasks in request order.

use std::fmt;
use std::hash::Hash;

use indexmap::IndexMap;

/// Work collected for one frame
#[derive(Debug)]
pub struct FrameBatch<K, T> {
    /// Deduplicated named tasks, in order of first registration
    pub named: Vec<(K, T)>,
    /// Unnamed tasks, in request order
    pub unnamed: Vec<T>,
}

impl<K, T> FrameBatch<K, T> {
    pub fn is_empty(&self) -> bool {
        self.named.is_empty() && self.unnamed.is_empty()
    }

    pub fn len(&self) -> usize {
        self.named.len() + self.unnamed.len()
    }
}

/// Pending frame work, keyed for deduplication by `K`
pub struct FrameScheduler<K, T> {
    named: IndexMap<K, T>,
    unnamed: Vec<T>,
    frames_taken: u64,
}

impl<K, T> FrameScheduler<K, T>
where
    K: Hash + Eq + fmt::Debug,
{
    pub fn new() -> Self {
        Self {
            named: IndexMap::new(),
            unnamed: Vec::new(),
            frames_taken: 0,
        }
    }

    /// Queue a task for the next frame
    pub fn request(&mut self, task: T) {
        self.unnamed.push(task);
    }

    /// Register a deduplicated task for the next frame.
    ///
    /// Returns `true` if an earlier registration under the same key was
    /// replaced.
    pub fn once(&mut self, key: K, task: T) -> bool {
        if let Some(slot) = self.named.get_mut(&key) {
            tracing::trace!(?key, "replacing pending frame registration");
            *slot = task;
            return true;
        }
        tracing::trace!(?key, "registering frame task");
        self.named.insert(key, task);
        false
    }

    /// True if the named key is waiting for the next frame
    pub fn is_registered(&self, key: &K) -> bool {
        self.named.contains_key(key)
    }

    /// True if any work is waiting for the next frame
    pub fn has_pending(&self) -> bool {
        !self.named.is_empty() || !self.unnamed.is_empty()
    }

    /// Number of tasks waiting for the next frame
    pub fn pending_len(&self) -> usize {
        self.named.len() + self.unnamed.len()
    }

    /// Number of frames taken so far
    pub fn frames_taken(&self) -> u64 {
        self.frames_taken
    }

    /// Take everything registered so far. Tasks registered while the batch is
    /// being processed land in the following frame.
    pub fn take_frame(&mut self) -> FrameBatch<K, T> {
        self.frames_taken += 1;
        FrameBatch {
            named: self.named.drain(..).collect(),
            unnamed: std::mem::take(&mut self.unnamed),
        }
    }

    /// Take only the unnamed tasks, leaving named registrations pending.
    /// Used to fold work queued mid-frame into the frame being delivered.
    pub fn take_requests(&mut self) -> Vec<T> {
        std::mem::take(&mut self.unnamed)
    }
}

impl<K, T> Default for FrameScheduler<K, T>
where
    K: Hash + Eq + fmt::Debug,
{
    fn default() -> Self {
        Self::new()
    }
}

impl<K, T> fmt::Debug for FrameScheduler<K, T>
where
    K: fmt::Debug,
{
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("FrameScheduler")
            .field("named", &self.named.keys().collect::<Vec<_>>())
            .field("unnamed", &self.unnamed.len())
            .field("frames_taken", &self.frames_taken)
            .finish()
    }
}
