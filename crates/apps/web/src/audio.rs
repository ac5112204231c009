use director::{
    AudioEngine, AudioError, AudioParams, ContextState, LAND_PARTIALS, WATER_CUTOFF_HZ,
};
use tracing::{debug, warn};
use wasm_bindgen::JsValue;
use web_sys::{
    AudioContext, AudioContextState, AudioParam, BiquadFilterNode, BiquadFilterType, GainNode,
    OscillatorNode, OscillatorType,
};

const RAMP_S: f64 = 0.1;
const NOISE_SECONDS: f32 = 2.0;

fn backend(e: JsValue) -> AudioError {
    AudioError::Backend(e.as_string().unwrap_or_else(|| format!("{e:?}")))
}

struct Graph {
    master: GainNode,
    water: GainNode,
    swell: OscillatorNode,
    swell_depth: GainNode,
    land: GainNode,
    land_filter: BiquadFilterNode,
    partials: Vec<OscillatorNode>,
}

/// Web Audio rendition of the ambient voices: looped noise through a
/// low-pass under an LFO swell, and a filtered three-partial drone.
#[derive(Default)]
pub struct WebAudio {
    ctx: Option<AudioContext>,
    graph: Option<Graph>,
    running: bool,
    params: AudioParams,
}

impl WebAudio {
    pub fn new() -> Self {
        Self::default()
    }

    fn context(&mut self) -> Result<&AudioContext, AudioError> {
        if self.ctx.is_none() {
            self.ctx = Some(AudioContext::new().map_err(backend)?);
        }
        self.ctx.as_ref().ok_or(AudioError::Closed)
    }

    fn ramp(&self, param: &AudioParam, value: f64) {
        if let Some(ctx) = &self.ctx {
            if let Err(e) = param.set_target_at_time(value as f32, ctx.current_time(), RAMP_S) {
                debug!("param ramp failed: {e:?}");
            }
        }
    }

    fn push_params(&self) {
        let Some(g) = &self.graph else {
            return;
        };
        let p = &self.params;
        let master = if self.running { p.master } else { 0.0 };
        self.ramp(&g.master.gain(), master);
        self.ramp(&g.water.gain(), 0.5 * p.water_gain);
        self.ramp(&g.swell_depth.gain(), 0.5 * p.water_gain);
        self.ramp(&g.swell.frequency(), p.swell_hz);
        self.ramp(&g.land.gain(), p.land_gain);
        self.ramp(&g.land_filter.frequency(), p.land_cutoff_hz);
        for (osc, (ratio, _)) in g.partials.iter().zip(LAND_PARTIALS) {
            self.ramp(&osc.frequency(), p.land_root_hz * ratio);
        }
    }
}

fn build_graph(ctx: &AudioContext, params: &AudioParams) -> Result<Graph, JsValue> {
    let master = ctx.create_gain()?;
    master.gain().set_value(0.0);
    master.connect_with_audio_node(&ctx.destination())?;

    let frames = (ctx.sample_rate() * NOISE_SECONDS) as u32;
    let buffer = ctx.create_buffer(1, frames, ctx.sample_rate())?;
    let noise: Vec<f32> = (0..frames)
        .map(|_| (js_sys::Math::random() * 2.0 - 1.0) as f32)
        .collect();
    buffer.copy_to_channel(&noise, 0)?;
    let source = ctx.create_buffer_source()?;
    source.set_buffer(Some(&buffer));
    source.set_loop(true);

    let water_filter = ctx.create_biquad_filter()?;
    water_filter.set_type(BiquadFilterType::Lowpass);
    water_filter.frequency().set_value(WATER_CUTOFF_HZ as f32);

    let water = ctx.create_gain()?;
    water.gain().set_value(0.0);
    source.connect_with_audio_node(&water_filter)?;
    water_filter.connect_with_audio_node(&water)?;
    water.connect_with_audio_node(&master)?;

    let swell = ctx.create_oscillator()?;
    swell.set_type(OscillatorType::Sine);
    swell.frequency().set_value(params.swell_hz as f32);
    let swell_depth = ctx.create_gain()?;
    swell_depth.gain().set_value(0.0);
    swell.connect_with_audio_node(&swell_depth)?;
    swell_depth.connect_with_audio_param(&water.gain())?;

    let land_filter = ctx.create_biquad_filter()?;
    land_filter.set_type(BiquadFilterType::Lowpass);
    land_filter.frequency().set_value(params.land_cutoff_hz as f32);
    let land = ctx.create_gain()?;
    land.gain().set_value(0.0);
    land_filter.connect_with_audio_node(&land)?;
    land.connect_with_audio_node(&master)?;

    let mut partials = Vec::with_capacity(LAND_PARTIALS.len());
    for (ratio, weight) in LAND_PARTIALS {
        let osc = ctx.create_oscillator()?;
        osc.set_type(OscillatorType::Sine);
        osc.frequency()
            .set_value((params.land_root_hz * ratio) as f32);
        let level = ctx.create_gain()?;
        level.gain().set_value(weight as f32);
        osc.connect_with_audio_node(&level)?;
        level.connect_with_audio_node(&land_filter)?;
        osc.start()?;
        partials.push(osc);
    }

    source.start()?;
    swell.start()?;

    Ok(Graph {
        master,
        water,
        swell,
        swell_depth,
        land,
        land_filter,
        partials,
    })
}

impl AudioEngine for WebAudio {
    fn init(&mut self) -> Result<(), AudioError> {
        if self.graph.is_some() {
            return Ok(());
        }
        let params = self.params;
        let ctx = self.context()?;
        let graph = build_graph(ctx, &params).map_err(backend)?;
        self.graph = Some(graph);
        self.push_params();
        Ok(())
    }

    fn state(&self) -> ContextState {
        match self.ctx.as_ref().map(|ctx| ctx.state()) {
            Some(AudioContextState::Running) => ContextState::Running,
            Some(AudioContextState::Closed) => ContextState::Closed,
            _ => ContextState::Suspended,
        }
    }

    fn resume(&mut self) -> Result<(), AudioError> {
        if self.state() == ContextState::Closed {
            return Err(AudioError::Closed);
        }
        let ctx = self.context()?;
        // The promise settles on its own; state() reports the outcome.
        if let Err(e) = ctx.resume() {
            warn!("audio context resume rejected: {e:?}");
            return Err(backend(e));
        }
        Ok(())
    }

    fn start(&mut self) {
        self.running = true;
        self.push_params();
    }

    fn stop(&mut self) {
        self.running = false;
        self.push_params();
    }

    fn apply(&mut self, params: &AudioParams) {
        self.params = *params;
        self.push_params();
    }
}
