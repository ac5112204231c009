use runtime::{Frame, FrameClock, FrameId, FrameScheduler};
use tracing::warn;
use wasm_bindgen::JsCast;
use wasm_bindgen::prelude::*;

/// `requestAnimationFrame`-backed scheduler. Every request re-arms the same
/// callback.
pub struct RafScheduler {
    callback: Closure<dyn FnMut(f64)>,
    clock: FrameClock,
    next_id: u64,
    pending: Option<(FrameId, i32)>,
}

impl RafScheduler {
    pub fn new(callback: Closure<dyn FnMut(f64)>) -> Self {
        Self {
            callback,
            clock: FrameClock::new(),
            next_id: 0,
            pending: None,
        }
    }

    /// Called from the callback with the DOMHighResTimeStamp it received.
    pub fn begin_frame(&mut self, timestamp_ms: f64) -> Frame {
        self.pending = None;
        self.clock.tick(timestamp_ms / 1000.0)
    }
}

impl FrameScheduler for RafScheduler {
    fn request_frame(&mut self) -> FrameId {
        if let Some((id, _)) = self.pending {
            return id;
        }
        let id = FrameId(self.next_id);
        self.next_id += 1;
        let Some(window) = web_sys::window() else {
            warn!("no window; frame not scheduled");
            return id;
        };
        match window.request_animation_frame(self.callback.as_ref().unchecked_ref()) {
            Ok(handle) => self.pending = Some((id, handle)),
            Err(e) => warn!("requestAnimationFrame failed: {e:?}"),
        }
        id
    }

    fn cancel_frame(&mut self, id: FrameId) {
        let Some((pending, handle)) = self.pending else {
            return;
        };
        if pending != id {
            return;
        }
        if let Some(window) = web_sys::window() {
            let _ = window.cancel_animation_frame(handle);
        }
        self.pending = None;
    }
}
