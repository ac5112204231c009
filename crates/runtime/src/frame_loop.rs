use crate::frame::Frame;

/// Handle of a requested-but-not-yet-run frame.
#[derive(Debug, Copy, Clone, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct FrameId(pub u64);

/// Something that can run a callback on the next display frame.
///
/// The browser implementation wraps `requestAnimationFrame`; [`FrameLoop`] is
/// the fixed-timestep native equivalent.
pub trait FrameScheduler {
    fn request_frame(&mut self) -> FrameId;
    fn cancel_frame(&mut self, id: FrameId);
}

/// Fixed-timestep animation loop.
///
/// A frame is only produced by [`FrameLoop::poll`] when one was requested, so
/// a callback that stops requesting (or cancels) ends the loop.
#[derive(Debug)]
pub struct FrameLoop {
    next: Frame,
    next_id: u64,
    pending: Option<FrameId>,
    limit: Option<u64>,
}

impl FrameLoop {
    pub fn new(fps: f64) -> Self {
        let fps = if fps.is_finite() && fps > 0.0 { fps } else { 60.0 };
        Self {
            next: Frame::new(0, 1.0 / fps),
            next_id: 0,
            pending: None,
            limit: None,
        }
    }

    /// Stops producing frames after `frames` frames.
    pub fn with_limit(mut self, frames: u64) -> Self {
        self.limit = Some(frames);
        self
    }

    pub fn dt_s(&self) -> f64 {
        self.next.dt_s
    }

    pub fn pending(&self) -> Option<FrameId> {
        self.pending
    }

    /// Takes the pending request and yields the frame it was for.
    pub fn poll(&mut self) -> Option<Frame> {
        self.pending.take()?;
        if let Some(limit) = self.limit {
            if self.next.index >= limit {
                return None;
            }
        }
        let frame = self.next;
        self.next = frame.next();
        Some(frame)
    }
}

impl FrameScheduler for FrameLoop {
    fn request_frame(&mut self) -> FrameId {
        if let Some(id) = self.pending {
            return id;
        }
        let id = FrameId(self.next_id);
        self.next_id = self.next_id.wrapping_add(1);
        self.pending = Some(id);
        id
    }

    fn cancel_frame(&mut self, id: FrameId) {
        if self.pending == Some(id) {
            self.pending = None;
        }
    }
}
