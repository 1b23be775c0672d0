//! Per-frame animation context

/// Context handed to every lane while one frame is computed
#[derive(Debug, Clone, PartialEq)]
pub struct FrameState {
    now_ms: f64,
    immediate_frame: bool,
}

impl FrameState {
    pub fn new(now_ms: f64) -> Self {
        Self {
            now_ms,
            immediate_frame: false,
        }
    }

    /// Frame timestamp in milliseconds
    pub fn now_ms(&self) -> f64 {
        self.now_ms
    }

    /// Ask the driver to run another frame right away instead of waiting for
    /// the next display refresh.
    pub fn request_immediate_frame(&mut self) {
        self.immediate_frame = true;
    }

    pub fn immediate_frame_requested(&self) -> bool {
        self.immediate_frame
    }
}
