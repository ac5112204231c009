use director::{AudioEngine, AudioError, AudioParams, ContextState, NullAudio};

#[cfg(feature = "audio")]
use crate::speaker::CpalAudio;

/// Audio backend picked at startup.
pub enum Output {
    Silent(NullAudio),
    #[cfg(feature = "audio")]
    Speaker(CpalAudio),
}

impl Output {
    /// The speaker when built with the `audio` feature and not muted.
    pub fn select(mute: bool) -> Self {
        if mute {
            return Output::Silent(NullAudio::new());
        }
        Self::speaker()
    }

    #[cfg(feature = "audio")]
    fn speaker() -> Self {
        Output::Speaker(CpalAudio::new())
    }

    #[cfg(not(feature = "audio"))]
    fn speaker() -> Self {
        tracing::info!("built without the `audio` feature; running silent");
        Output::Silent(NullAudio::new())
    }

    pub fn name(&self) -> &'static str {
        match self {
            Output::Silent(_) => "silent",
            #[cfg(feature = "audio")]
            Output::Speaker(_) => "speaker",
        }
    }

    fn engine(&mut self) -> &mut dyn AudioEngine {
        match self {
            Output::Silent(a) => a,
            #[cfg(feature = "audio")]
            Output::Speaker(a) => a,
        }
    }
}

impl AudioEngine for Output {
    fn init(&mut self) -> Result<(), AudioError> {
        self.engine().init()
    }

    fn state(&self) -> ContextState {
        match self {
            Output::Silent(a) => a.state(),
            #[cfg(feature = "audio")]
            Output::Speaker(a) => a.state(),
        }
    }

    fn resume(&mut self) -> Result<(), AudioError> {
        self.engine().resume()
    }

    fn start(&mut self) {
        self.engine().start()
    }

    fn stop(&mut self) {
        self.engine().stop()
    }

    fn apply(&mut self, params: &AudioParams) {
        self.engine().apply(params)
    }
}
