use foundation::time::Time;

/// Per-frame timing metadata handed to every frame callback.
#[derive(Debug, Copy, Clone, PartialEq)]
pub struct Frame {
    /// 0-based frame index.
    pub index: u64,
    /// Seconds since the previous frame.
    pub dt_s: f64,
    /// Loop time at the start of the frame.
    pub time: Time,
}

impl Frame {
    /// A frame on a fixed timestep.
    pub fn new(index: u64, dt_s: f64) -> Self {
        Self {
            index,
            dt_s,
            time: Time(index as f64 * dt_s),
        }
    }

    /// A frame stamped by an external clock (e.g. a display callback timestamp).
    pub fn timed(index: u64, dt_s: f64, time: Time) -> Self {
        Self { index, dt_s, time }
    }

    pub fn next(self) -> Self {
        Self {
            index: self.index + 1,
            dt_s: self.dt_s,
            time: self.time.after(self.dt_s),
        }
    }
}

/// Longest step a display-clocked frame may report.
pub const MAX_FRAME_DT_S: f64 = 0.1;

/// Turns display-callback timestamps into [`Frame`]s.
#[derive(Debug, Default)]
pub struct FrameClock {
    start_s: Option<f64>,
    last_s: f64,
    index: u64,
}

impl FrameClock {
    pub fn new() -> Self {
        Self::default()
    }

    /// `timestamp_s` is the host clock in seconds. The first tick is frame 0 at
    /// time zero with a nominal 60 Hz step.
    pub fn tick(&mut self, timestamp_s: f64) -> Frame {
        let Some(start) = self.start_s else {
            self.start_s = Some(timestamp_s);
            self.last_s = timestamp_s;
            self.index = 1;
            return Frame::timed(0, 1.0 / 60.0, Time::ZERO);
        };
        let dt = (timestamp_s - self.last_s).clamp(0.0, MAX_FRAME_DT_S);
        self.last_s = timestamp_s;
        let frame = Frame::timed(self.index, dt, Time(timestamp_s - start));
        self.index += 1;
        frame
    }
}
