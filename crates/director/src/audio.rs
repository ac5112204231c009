use serde::{Deserialize, Serialize};
use thiserror::Error;

#[derive(Error, Debug, Clone, PartialEq)]
pub enum AudioError {
    #[error("no audio output device available")]
    NoDevice,

    #[error("audio backend error: {0}")]
    Backend(String),

    #[error("audio context is closed")]
    Closed,
}

/// Lifecycle of the underlying audio context.
#[derive(Debug, Copy, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ContextState {
    /// Created but not allowed to make sound yet (e.g. before a user gesture).
    Suspended,
    Running,
    Closed,
}

/// Voice parameters pushed to the engine every frame while playing.
#[derive(Debug, Copy, Clone, PartialEq, Serialize, Deserialize)]
pub struct AudioParams {
    /// Linear master gain, `0..=1`.
    pub master: f64,
    pub water_gain: f64,
    pub land_gain: f64,
    pub land_root_hz: f64,
    pub land_cutoff_hz: f64,
    /// Rate of the water voice's amplitude swell.
    pub swell_hz: f64,
}

impl Default for AudioParams {
    fn default() -> Self {
        Self {
            master: 0.7,
            water_gain: 0.0,
            land_gain: 0.6,
            land_root_hz: 110.0,
            land_cutoff_hz: 400.0,
            swell_hz: 0.06,
        }
    }
}

/// The sound-producing backend driven by the director.
pub trait AudioEngine {
    /// Builds the voice graph / opens the device. Called once.
    fn init(&mut self) -> Result<(), AudioError>;

    fn state(&self) -> ContextState;

    /// Moves a suspended context to running.
    fn resume(&mut self) -> Result<(), AudioError>;

    fn start(&mut self);

    fn stop(&mut self);

    fn apply(&mut self, params: &AudioParams);
}

/// Engine that makes no sound and remembers what it was told.
#[derive(Debug, Clone)]
pub struct NullAudio {
    state: ContextState,
    initialized: bool,
    running: bool,
    fail_init: bool,
    applied: usize,
    last: Option<AudioParams>,
}

impl Default for NullAudio {
    fn default() -> Self {
        Self {
            state: ContextState::Suspended,
            initialized: false,
            running: false,
            fail_init: false,
            applied: 0,
            last: None,
        }
    }
}

impl NullAudio {
    pub fn new() -> Self {
        Self::default()
    }

    /// An engine whose `init` always fails.
    pub fn failing() -> Self {
        Self {
            fail_init: true,
            ..Self::default()
        }
    }

    pub fn is_initialized(&self) -> bool {
        self.initialized
    }

    pub fn is_running(&self) -> bool {
        self.running
    }

    pub fn applied_count(&self) -> usize {
        self.applied
    }

    pub fn last_params(&self) -> Option<AudioParams> {
        self.last
    }
}

impl AudioEngine for NullAudio {
    fn init(&mut self) -> Result<(), AudioError> {
        if self.fail_init {
            return Err(AudioError::NoDevice);
        }
        self.initialized = true;
        Ok(())
    }

    fn state(&self) -> ContextState {
        self.state
    }

    fn resume(&mut self) -> Result<(), AudioError> {
        if self.state == ContextState::Closed {
            return Err(AudioError::Closed);
        }
        self.state = ContextState::Running;
        Ok(())
    }

    fn start(&mut self) {
        self.running = true;
    }

    fn stop(&mut self) {
        self.running = false;
    }

    fn apply(&mut self, params: &AudioParams) {
        self.applied += 1;
        self.last = Some(*params);
    }
}
