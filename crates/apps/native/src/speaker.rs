use std::sync::Arc;

use cpal::traits::{DeviceTrait, HostTrait, StreamTrait};
use cpal::{BufferSize, OutputCallbackInfo, Stream, StreamConfig};
use director::{AmbientSynth, AudioEngine, AudioError, AudioParams, ContextState};
use parking_lot::Mutex;
use tracing::{error, info};

#[derive(Debug, Default)]
struct Shared {
    params: AudioParams,
    running: bool,
}

/// Plays the ambient synth on the default cpal output device.
///
/// The stream is built paused by `init` and only starts pulling samples once
/// `resume` is called.
pub struct CpalAudio {
    shared: Arc<Mutex<Shared>>,
    stream: Option<Stream>,
    state: ContextState,
}

impl CpalAudio {
    pub fn new() -> Self {
        Self {
            shared: Arc::new(Mutex::new(Shared::default())),
            stream: None,
            state: ContextState::Suspended,
        }
    }

    fn build_stream(&self) -> Result<Stream, AudioError> {
        let host = cpal::default_host();
        info!("cpal host: {}", host.id().name());
        let device = host.default_output_device().ok_or(AudioError::NoDevice)?;
        if let Ok(name) = device.name() {
            info!("cpal device: {name}");
        }

        let default_config = device
            .default_output_config()
            .map_err(|e| AudioError::Backend(e.to_string()))?;
        let config = StreamConfig {
            channels: 2,
            sample_rate: default_config.sample_rate(),
            buffer_size: BufferSize::Default,
        };
        info!(
            sample_rate = config.sample_rate.0,
            channels = config.channels,
            "opening output stream"
        );

        let mut synth = AmbientSynth::new(f64::from(config.sample_rate.0));
        let channels = usize::from(config.channels);
        let shared = self.shared.clone();
        let stream = device
            .build_output_stream(
                &config,
                move |data: &mut [f32], _: &OutputCallbackInfo| {
                    {
                        let shared = shared.lock();
                        synth.set_params(&shared.params);
                        synth.set_running(shared.running);
                    }
                    synth.fill(data, channels);
                },
                |err| error!("audio stream error: {err}"),
                None,
            )
            .map_err(|e| AudioError::Backend(e.to_string()))?;
        stream
            .pause()
            .map_err(|e| AudioError::Backend(e.to_string()))?;
        Ok(stream)
    }
}

impl AudioEngine for CpalAudio {
    fn init(&mut self) -> Result<(), AudioError> {
        if self.state == ContextState::Closed {
            return Err(AudioError::Closed);
        }
        let stream = self.build_stream()?;
        if self.state == ContextState::Running {
            stream
                .play()
                .map_err(|e| AudioError::Backend(e.to_string()))?;
        }
        self.stream = Some(stream);
        Ok(())
    }

    fn state(&self) -> ContextState {
        self.state
    }

    fn resume(&mut self) -> Result<(), AudioError> {
        if self.state == ContextState::Closed {
            return Err(AudioError::Closed);
        }
        if let Some(stream) = &self.stream {
            stream
                .play()
                .map_err(|e| AudioError::Backend(e.to_string()))?;
        }
        self.state = ContextState::Running;
        Ok(())
    }

    fn start(&mut self) {
        self.shared.lock().running = true;
    }

    fn stop(&mut self) {
        self.shared.lock().running = false;
    }

    fn apply(&mut self, params: &AudioParams) {
        self.shared.lock().params = *params;
    }
}
