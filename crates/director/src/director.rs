use layers::{TerrainKind, TerrainSample};
use serde::{Deserialize, Serialize};

use crate::audio::{AudioEngine, AudioError, AudioParams, ContextState};
use crate::wanderer::{CameraMove, Wanderer};

/// Elevation mapped to the top of the land voice's range (meters).
pub const ELEVATION_CEILING_M: f64 = 3_000.0;
pub const LAND_BASE_HZ: f64 = 110.0;

/// Minor pentatonic over two octaves, in semitones above the base.
const PENTATONIC: [f64; 10] = [0.0, 3.0, 5.0, 7.0, 10.0, 12.0, 15.0, 17.0, 19.0, 22.0];

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct AudioConfig {
    /// Initial master volume, `0..=100`.
    pub master_volume: f64,
    /// Time constant of the water/land crossfade (seconds).
    pub crossfade_s: f64,
}

impl Default for AudioConfig {
    fn default() -> Self {
        Self {
            master_volume: 70.0,
            crossfade_s: 1.5,
        }
    }
}

/// Turns terrain samples into voice parameters and drives the wanderer.
pub struct Director<A: AudioEngine> {
    engine: A,
    pub wanderer: Wanderer,
    crossfade_s: f64,
    master_volume: f64,
    audio_initialized: bool,
    playing: bool,
    water_level: f64,
    last_kind: Option<TerrainKind>,
    params: AudioParams,
}

impl<A: AudioEngine> Director<A> {
    pub fn new(engine: A, config: &AudioConfig, wanderer: Wanderer) -> Self {
        Self {
            engine,
            wanderer,
            crossfade_s: config.crossfade_s.max(0.0),
            master_volume: clamp_volume(config.master_volume),
            audio_initialized: false,
            playing: false,
            water_level: 0.0,
            last_kind: None,
            params: AudioParams::default(),
        }
    }

    pub fn engine(&self) -> &A {
        &self.engine
    }

    pub fn audio_initialized(&self) -> bool {
        self.audio_initialized
    }

    pub fn is_playing(&self) -> bool {
        self.playing
    }

    pub fn water_level(&self) -> f64 {
        self.water_level
    }

    pub fn master_volume(&self) -> f64 {
        self.master_volume
    }

    pub fn params(&self) -> &AudioParams {
        &self.params
    }

    /// Prepares the audio engine. Safe to call more than once.
    pub fn init_audio(&mut self) -> Result<(), AudioError> {
        if self.audio_initialized {
            return Ok(());
        }
        self.engine.init()?;
        self.audio_initialized = true;
        tracing::info!("audio engine initialised");
        Ok(())
    }

    /// Lets a suspended audio context make sound. Needs a user gesture in browsers.
    pub fn resume_audio(&mut self) -> Result<(), AudioError> {
        if self.engine.state() == ContextState::Running {
            return Ok(());
        }
        self.engine.resume()
    }

    pub fn start(&mut self) {
        if self.playing {
            return;
        }
        if let Err(err) = self.init_audio() {
            tracing::error!("cannot start audio: {err}");
            return;
        }
        self.engine.start();
        self.playing = true;
        self.params.master = self.master_volume / 100.0;
        self.engine.apply(&self.params);
        tracing::info!("playback started");
    }

    pub fn stop(&mut self) {
        if !self.playing {
            return;
        }
        self.engine.stop();
        self.playing = false;
        tracing::info!("playback stopped");
    }

    /// Sets master volume on a `0..=100` scale.
    pub fn set_master_volume(&mut self, volume: f64) {
        if !volume.is_finite() {
            tracing::warn!(volume, "ignoring non-finite volume");
            return;
        }
        self.master_volume = clamp_volume(volume);
        self.params.master = self.master_volume / 100.0;
        if self.playing {
            self.engine.apply(&self.params);
        }
    }

    /// Per-frame update: crossfade voices toward the sampled terrain and steer.
    pub fn update(&mut self, sample: &TerrainSample, dt_s: f64) -> Option<CameraMove> {
        if self.last_kind != Some(sample.kind) {
            tracing::info!(
                from = ?self.last_kind,
                to = %sample.kind,
                elevation = sample.elevation,
                "terrain changed"
            );
            self.last_kind = Some(sample.kind);
        }

        let target = match sample.kind {
            TerrainKind::Water => 1.0,
            TerrainKind::Mix => 0.0,
        };
        self.water_level += crossfade_coeff(dt_s, self.crossfade_s) * (target - self.water_level);
        self.params = params_for(self.water_level, sample.elevation, self.master_volume);

        if self.playing {
            self.engine.apply(&self.params);
        }

        self.wanderer.step(sample, dt_s)
    }
}

fn clamp_volume(v: f64) -> f64 {
    if v.is_finite() { v.clamp(0.0, 100.0) } else { 70.0 }
}

fn crossfade_coeff(dt_s: f64, tau_s: f64) -> f64 {
    if tau_s <= 0.0 {
        return 1.0;
    }
    1.0 - (-dt_s.max(0.0) / tau_s).exp()
}

/// Maps elevation to a pentatonic degree above [`LAND_BASE_HZ`].
pub fn land_root_hz(elevation_m: f64) -> f64 {
    let norm = normalized_elevation(elevation_m);
    let band = ((norm * PENTATONIC.len() as f64) as usize).min(PENTATONIC.len() - 1);
    LAND_BASE_HZ * 2f64.powf(PENTATONIC[band] / 12.0)
}

fn normalized_elevation(elevation_m: f64) -> f64 {
    (elevation_m / ELEVATION_CEILING_M).clamp(0.0, 1.0)
}

pub fn params_for(water_level: f64, elevation_m: f64, master_volume: f64) -> AudioParams {
    let water = water_level.clamp(0.0, 1.0);
    AudioParams {
        master: master_volume / 100.0,
        water_gain: 0.8 * water,
        land_gain: 0.6 * (1.0 - water),
        land_root_hz: land_root_hz(elevation_m),
        land_cutoff_hz: 400.0 + 3_600.0 * normalized_elevation(elevation_m),
        swell_hz: 0.06 + 0.06 * water,
    }
}
