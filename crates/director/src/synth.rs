//! Sample-level voices shared by the native output backends.
//!
//! Two voices are mixed: a water wash (low-passed white noise under a slow
//! amplitude swell) and a land drone (root, fifth and octave partials through
//! a one-pole low-pass). Every parameter is smoothed per sample so frame-rate
//! updates never click.

use std::f64::consts::TAU;

use crate::audio::AudioParams;

const PARAM_SMOOTHING_S: f64 = 0.05;
pub const WATER_CUTOFF_HZ: f64 = 900.0;
/// `(frequency ratio, weight)` of each land partial.
pub const LAND_PARTIALS: [(f64, f64); 3] = [(1.0, 0.5), (1.5, 0.3), (2.0, 0.2)];

fn one_pole_coeff(cutoff_hz: f64, sample_rate: f64) -> f64 {
    1.0 - (-TAU * cutoff_hz / sample_rate).exp()
}

#[derive(Debug, Clone)]
pub struct AmbientSynth {
    sample_rate: f64,
    running: bool,
    target: AudioParams,
    current: AudioParams,
    smoothing: f64,
    partial_phase: [f64; 3],
    swell_phase: f64,
    noise_state: u64,
    water_lp: f64,
    land_lp: f64,
}

impl AmbientSynth {
    pub fn new(sample_rate: f64) -> Self {
        let sample_rate = sample_rate.max(1.0);
        let target = AudioParams::default();
        Self {
            sample_rate,
            running: false,
            target,
            current: AudioParams {
                master: 0.0,
                ..target
            },
            smoothing: 1.0 - (-1.0 / (PARAM_SMOOTHING_S * sample_rate)).exp(),
            partial_phase: [0.0; 3],
            swell_phase: 0.0,
            noise_state: 0x2545_F491_4F6C_DD1D,
            water_lp: 0.0,
            land_lp: 0.0,
        }
    }

    pub fn set_running(&mut self, running: bool) {
        self.running = running;
    }

    pub fn set_params(&mut self, params: &AudioParams) {
        self.target = *params;
    }

    fn white_noise(&mut self) -> f64 {
        // xorshift64*
        let mut x = self.noise_state;
        x ^= x >> 12;
        x ^= x << 25;
        x ^= x >> 27;
        self.noise_state = x;
        let bits = x.wrapping_mul(0x2545_F491_4F6C_DD1D) >> 11;
        bits as f64 / (1u64 << 52) as f64 - 1.0
    }

    fn smooth_params(&mut self) {
        let a = self.smoothing;
        let t = self.target;
        let master = if self.running { t.master } else { 0.0 };
        let c = &mut self.current;
        c.master += a * (master - c.master);
        c.water_gain += a * (t.water_gain - c.water_gain);
        c.land_gain += a * (t.land_gain - c.land_gain);
        c.land_root_hz += a * (t.land_root_hz - c.land_root_hz);
        c.land_cutoff_hz += a * (t.land_cutoff_hz - c.land_cutoff_hz);
        c.swell_hz += a * (t.swell_hz - c.swell_hz);
    }

    pub fn next_sample(&mut self) -> f32 {
        self.smooth_params();
        let p = self.current;
        let sr = self.sample_rate;

        let noise = self.white_noise();
        self.water_lp += one_pole_coeff(WATER_CUTOFF_HZ, sr) * (noise - self.water_lp);
        self.swell_phase = (self.swell_phase + p.swell_hz / sr).fract();
        let swell = 0.5 + 0.5 * (TAU * self.swell_phase).sin();
        let water = self.water_lp * swell * p.water_gain;

        let mut drone = 0.0;
        for (phase, (ratio, weight)) in self.partial_phase.iter_mut().zip(LAND_PARTIALS) {
            *phase = (*phase + p.land_root_hz * ratio / sr).fract();
            drone += weight * (TAU * *phase).sin();
        }
        self.land_lp += one_pole_coeff(p.land_cutoff_hz, sr) * (drone - self.land_lp);
        let land = self.land_lp * p.land_gain;

        (p.master * (water + land)).clamp(-1.0, 1.0) as f32
    }

    /// Fills an interleaved buffer, writing the same sample to every channel.
    pub fn fill(&mut self, out: &mut [f32], channels: usize) {
        let channels = channels.max(1);
        for frame in out.chunks_mut(channels) {
            let s = self.next_sample();
            frame.fill(s);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::AmbientSynth;
    use crate::audio::AudioParams;

    const SR: f64 = 48_000.0;

    #[test]
    fn silent_until_started() {
        let mut synth = AmbientSynth::new(SR);
        let mut buf = vec![1.0f32; 512];
        synth.fill(&mut buf, 2);
        assert!(buf.iter().all(|s| *s == 0.0));
    }

    #[test]
    fn output_stays_in_range_at_full_gain() {
        let mut synth = AmbientSynth::new(SR);
        synth.set_params(&AudioParams {
            master: 1.0,
            water_gain: 1.0,
            land_gain: 1.0,
            land_root_hz: 220.0,
            land_cutoff_hz: 8_000.0,
            swell_hz: 2.0,
        });
        synth.set_running(true);
        let mut peak = 0.0f32;
        for _ in 0..SR as usize {
            let s = synth.next_sample();
            assert!((-1.0..=1.0).contains(&s));
            peak = peak.max(s.abs());
        }
        assert!(peak > 0.05, "expected audible output, peak {peak}");
    }

    #[test]
    fn stop_fades_to_silence() {
        let mut synth = AmbientSynth::new(SR);
        synth.set_running(true);
        for _ in 0..4_800 {
            synth.next_sample();
        }
        synth.set_running(false);
        for _ in 0..SR as usize {
            synth.next_sample();
        }
        assert!(synth.next_sample().abs() < 1e-4);
    }

    #[test]
    fn fill_duplicates_across_channels() {
        let mut synth = AmbientSynth::new(SR);
        synth.set_running(true);
        let mut buf = vec![0.0f32; 64];
        synth.fill(&mut buf, 2);
        for frame in buf.chunks(2) {
            assert_eq!(frame[0], frame[1]);
        }
    }
}
