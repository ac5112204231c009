use foundation::math::{normalize_deg, shortest_delta_deg};
use layers::{TerrainKind, TerrainSample};
use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};
use serde::{Deserialize, Serialize};

/// Ground speed at speed `1.0` (meters per second).
pub const BASE_GROUND_SPEED_MPS: f64 = 60.0;
pub const MAX_SPEED: f64 = 10.0;

const MANUAL_TURN_RATE_DPS: f64 = 90.0;
const AUTOPILOT_TURN_RATE_DPS: f64 = 20.0;
const RETARGET_MIN_S: f64 = 4.0;
const RETARGET_MAX_S: f64 = 10.0;
const RETARGET_SPREAD_DEG: f64 = 60.0;
const WATER_ESCAPE_AFTER_S: f64 = 3.0;
const WATER_ESCAPE_TURN_DEG: f64 = 150.0;

#[derive(Debug, Copy, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum WanderMode {
    /// Procedural heading that drifts on its own and steers away from open water.
    Autopilot,
    /// Heading follows the knob.
    Manual,
}

impl std::str::FromStr for WanderMode {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "autopilot" | "auto" => Ok(WanderMode::Autopilot),
            "manual" => Ok(WanderMode::Manual),
            other => Err(format!("unknown wander mode: {other}")),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct WandererConfig {
    pub speed: f64,
    pub seed: u64,
    pub autopilot: bool,
}

impl Default for WandererConfig {
    fn default() -> Self {
        Self {
            speed: 1.0,
            seed: 0x5EED,
            autopilot: true,
        }
    }
}

/// How far the camera should travel this frame.
#[derive(Debug, Copy, Clone, PartialEq)]
pub struct CameraMove {
    pub bearing_deg: f64,
    pub distance_m: f64,
}

/// Steers the virtual camera across the map.
#[derive(Debug, Clone)]
pub struct Wanderer {
    mode: WanderMode,
    bearing_deg: f64,
    manual_bearing_deg: f64,
    target_bearing_deg: f64,
    speed: f64,
    flight: bool,
    rng: StdRng,
    clock_s: f64,
    next_retarget_s: f64,
    water_time_s: f64,
    escaping: bool,
}

impl Wanderer {
    pub fn new(config: &WandererConfig) -> Self {
        let mode = if config.autopilot {
            WanderMode::Autopilot
        } else {
            WanderMode::Manual
        };
        Self {
            mode,
            bearing_deg: 0.0,
            manual_bearing_deg: 0.0,
            target_bearing_deg: 0.0,
            speed: sanitize_speed(config.speed).unwrap_or(1.0),
            flight: true,
            rng: StdRng::seed_from_u64(config.seed),
            clock_s: 0.0,
            next_retarget_s: 0.0,
            water_time_s: 0.0,
            escaping: false,
        }
    }

    pub fn mode(&self) -> WanderMode {
        self.mode
    }

    pub fn bearing_deg(&self) -> f64 {
        self.bearing_deg
    }

    pub fn speed(&self) -> f64 {
        self.speed
    }

    pub fn flight(&self) -> bool {
        self.flight
    }

    pub fn set_mode(&mut self, mode: WanderMode) {
        if self.mode != mode {
            tracing::info!(?mode, "wander mode changed");
        }
        self.mode = mode;
        // Pick a fresh autopilot heading on the next step.
        self.next_retarget_s = self.clock_s;
        self.escaping = false;
    }

    /// Sets the manual heading (compass degrees).
    pub fn set_bearing(&mut self, deg: f64) {
        if !deg.is_finite() {
            tracing::warn!(deg, "ignoring non-finite bearing");
            return;
        }
        self.manual_bearing_deg = normalize_deg(deg);
    }

    pub fn set_speed(&mut self, speed: f64) {
        match sanitize_speed(speed) {
            Some(s) => self.speed = s,
            None => tracing::warn!(speed, "ignoring non-finite speed"),
        }
    }

    pub fn set_flight(&mut self, enabled: bool) {
        self.flight = enabled;
    }

    /// Mirrors the heading north/south and returns it. Used to bounce off the
    /// map's latitude limit; the manual heading is mirrored too so steering
    /// does not turn straight back into the limit.
    pub fn reflect_bearing(&mut self) -> f64 {
        let mirror = |deg: f64| normalize_deg(180.0 - deg);
        self.bearing_deg = mirror(self.bearing_deg);
        self.target_bearing_deg = mirror(self.target_bearing_deg);
        self.manual_bearing_deg = mirror(self.manual_bearing_deg);
        self.bearing_deg
    }

    /// Advances steering by `dt_s` and returns the camera move for this frame.
    pub fn step(&mut self, sample: &TerrainSample, dt_s: f64) -> Option<CameraMove> {
        let dt_s = dt_s.max(0.0);
        self.clock_s += dt_s;

        if sample.kind == TerrainKind::Water {
            self.water_time_s += dt_s;
        } else {
            self.water_time_s = 0.0;
            self.escaping = false;
        }

        let max_turn = match self.mode {
            WanderMode::Manual => {
                self.target_bearing_deg = self.manual_bearing_deg;
                MANUAL_TURN_RATE_DPS * dt_s
            }
            WanderMode::Autopilot => {
                self.retarget_autopilot();
                AUTOPILOT_TURN_RATE_DPS * dt_s
            }
        };

        let delta = shortest_delta_deg(self.bearing_deg, self.target_bearing_deg);
        self.bearing_deg = normalize_deg(self.bearing_deg + delta.clamp(-max_turn, max_turn));

        if !self.flight || self.speed <= 0.0 || dt_s == 0.0 {
            return None;
        }
        Some(CameraMove {
            bearing_deg: self.bearing_deg,
            distance_m: self.speed * BASE_GROUND_SPEED_MPS * dt_s,
        })
    }

    fn retarget_autopilot(&mut self) {
        if self.water_time_s > WATER_ESCAPE_AFTER_S && !self.escaping {
            self.escaping = true;
            self.target_bearing_deg = normalize_deg(self.bearing_deg + WATER_ESCAPE_TURN_DEG);
            self.next_retarget_s = self.clock_s + self.rng.gen_range(RETARGET_MIN_S..RETARGET_MAX_S);
            tracing::debug!(target = self.target_bearing_deg, "autopilot seeking land");
            return;
        }
        if self.clock_s >= self.next_retarget_s {
            let spread = self.rng.gen_range(-RETARGET_SPREAD_DEG..=RETARGET_SPREAD_DEG);
            self.target_bearing_deg = normalize_deg(self.bearing_deg + spread);
            self.next_retarget_s = self.clock_s + self.rng.gen_range(RETARGET_MIN_S..RETARGET_MAX_S);
        }
    }
}

fn sanitize_speed(speed: f64) -> Option<f64> {
    speed.is_finite().then(|| speed.clamp(0.0, MAX_SPEED))
}

#[cfg(test)]
mod tests {
    use super::*;

    fn land() -> TerrainSample {
        TerrainSample {
            kind: TerrainKind::Mix,
            elevation: 300.0,
        }
    }

    fn sea() -> TerrainSample {
        TerrainSample {
            kind: TerrainKind::Water,
            elevation: -10.0,
        }
    }

    fn manual() -> Wanderer {
        Wanderer::new(&WandererConfig {
            autopilot: false,
            ..WandererConfig::default()
        })
    }

    #[test]
    fn distance_scales_with_speed_and_dt() {
        let mut w = manual();
        w.set_speed(2.0);
        let mv = w.step(&land(), 0.5).expect("flying");
        assert_eq!(mv.distance_m, 2.0 * BASE_GROUND_SPEED_MPS * 0.5);
    }

    #[test]
    fn reflect_bearing_mirrors_manual_heading() {
        let mut w = manual();
        w.set_bearing(20.0);
        for _ in 0..10 {
            w.step(&land(), 0.1);
        }
        assert!((w.reflect_bearing() - 160.0).abs() < 1e-9);
        // Steering keeps the mirrored heading instead of swinging back north.
        let mv = w.step(&land(), 0.1).expect("flying");
        assert!((mv.bearing_deg - 160.0).abs() < 1e-9);
    }

    #[test]
    fn no_move_when_flight_disabled_or_stationary() {
        let mut w = manual();
        w.set_flight(false);
        assert!(w.step(&land(), 0.1).is_none());
        w.set_flight(true);
        w.set_speed(0.0);
        assert!(w.step(&land(), 0.1).is_none());
    }

    #[test]
    fn speed_is_clamped_and_nan_ignored() {
        let mut w = manual();
        w.set_speed(50.0);
        assert_eq!(w.speed(), MAX_SPEED);
        w.set_speed(-1.0);
        assert_eq!(w.speed(), 0.0);
        w.set_speed(f64::NAN);
        assert_eq!(w.speed(), 0.0);
    }

    #[test]
    fn manual_turns_along_short_arc_at_limited_rate() {
        let mut w = manual();
        w.set_bearing(-30.0);
        w.step(&land(), 0.1);
        assert!((w.bearing_deg() - 351.0).abs() < 1e-9);
        for _ in 0..10 {
            w.step(&land(), 0.1);
        }
        assert!((w.bearing_deg() - 330.0).abs() < 1e-9);
    }

    #[test]
    fn autopilot_is_reproducible_for_a_seed() {
        let config = WandererConfig::default();
        let mut a = Wanderer::new(&config);
        let mut b = Wanderer::new(&config);
        for _ in 0..600 {
            assert_eq!(a.step(&land(), 1.0 / 30.0), b.step(&land(), 1.0 / 30.0));
        }
    }

    #[test]
    fn autopilot_turns_around_after_lingering_over_water() {
        let mut w = Wanderer::new(&WandererConfig::default());
        // Let the first retarget settle.
        for _ in 0..30 {
            w.step(&land(), 0.1);
        }
        for _ in 0..31 {
            w.step(&sea(), 0.1);
        }
        assert!(w.escaping);
        // At most two 2° turn steps since the reversal was picked.
        let remaining = shortest_delta_deg(w.bearing_deg(), w.target_bearing_deg);
        assert!(remaining > 140.0, "remaining turn {remaining}");

        w.step(&land(), 0.1);
        assert!(!w.escaping);
    }

    #[test]
    fn mode_parses_from_str() {
        assert_eq!("autopilot".parse::<WanderMode>(), Ok(WanderMode::Autopilot));
        assert_eq!("manual".parse::<WanderMode>(), Ok(WanderMode::Manual));
        assert!("sideways".parse::<WanderMode>().is_err());
    }
}
