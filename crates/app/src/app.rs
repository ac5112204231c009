use std::cell::RefCell;
use std::rc::Rc;

use director::{AudioEngine, ContextState, Director, WanderMode};
use foundation::math::{MAX_MERCATOR_LAT, destination};
use layers::{MapError, MapStyle, MapView, TerrainSample, analyze_map};
use panel::ids::{self, class, event};
use panel::{ControlPanel, Dom, UiInput, UiValue, hide_overlay};
use runtime::{Frame, FrameId, FrameScheduler};
use tracing::{debug, error, info, warn};

/// Wires the control panel, the map and the director together and runs the
/// per-frame sampling loop.
pub struct App<M, A, D>
where
    M: MapView + 'static,
    A: AudioEngine + 'static,
    D: Dom + 'static,
{
    map: Rc<RefCell<M>>,
    director: Rc<RefCell<Director<A>>>,
    panel: ControlPanel<D>,
    resume_armed: bool,
    frame_id: Option<FrameId>,
    last_sample: TerrainSample,
}

impl<M, A, D> App<M, A, D>
where
    M: MapView + 'static,
    A: AudioEngine + 'static,
    D: Dom + 'static,
{
    pub fn new(map: M, director: Director<A>, dom: D) -> Self {
        Self {
            map: Rc::new(RefCell::new(map)),
            director: Rc::new(RefCell::new(director)),
            panel: ControlPanel::new(dom),
            resume_armed: false,
            frame_id: None,
            last_sample: TerrainSample::default(),
        }
    }

    pub fn map(&self) -> Rc<RefCell<M>> {
        self.map.clone()
    }

    pub fn director(&self) -> Rc<RefCell<Director<A>>> {
        self.director.clone()
    }

    pub fn panel(&self) -> &ControlPanel<D> {
        &self.panel
    }

    pub fn panel_mut(&mut self) -> &mut ControlPanel<D> {
        &mut self.panel
    }

    pub fn last_sample(&self) -> TerrainSample {
        self.last_sample
    }

    pub fn frame_id(&self) -> Option<FrameId> {
        self.frame_id
    }

    /// Whether the next user gesture will resume the audio context.
    pub fn resume_armed(&self) -> bool {
        self.resume_armed
    }

    /// Brings the app up: panel, event wiring, map, silent audio start, and
    /// the first frame request.
    pub fn init(&mut self, scheduler: &mut impl FrameScheduler) -> Result<(), MapError> {
        self.panel.init();
        self.wire_ui_events();

        self.map.borrow_mut().init()?;

        {
            let mut director = self.director.borrow_mut();
            info!("loading audio");
            match director.init_audio() {
                Ok(()) => {
                    info!("audio loaded, starting director");
                    director.start();
                }
                Err(err) => error!("auto-start failed: {err}"),
            }
        }

        self.resume_armed = true;
        self.frame_id = Some(scheduler.request_frame());
        Ok(())
    }

    fn wire_ui_events(&mut self) {
        let director = self.director.clone();
        let dom = self.panel.dom();
        self.panel.on(event::PLAY, move |_| {
            let mut director = director.borrow_mut();
            if !director.audio_initialized() {
                if let Err(err) = director.resume_audio() {
                    error!("play: {err}");
                    return;
                }
                if let Err(err) = director.init_audio() {
                    error!("play: {err}");
                    return;
                }
                hide_overlay(&mut *dom.borrow_mut());
            }
            director.start();
        });

        let director = self.director.clone();
        self.panel.on(event::STOP, move |_| director.borrow_mut().stop());

        let map = self.map.clone();
        self.panel.on(event::SET_MAP_STYLE, move |v| {
            if let Some(style) = v.as_text() {
                map.borrow_mut().set_style(MapStyle::new(style));
            }
        });

        let map = self.map.clone();
        self.panel.on(event::FORCE_REFRESH, move |_| {
            let mut map = map.borrow_mut();
            let style = map.style().clone();
            info!(%style, "refreshing map");
            map.set_style(style);
        });

        let director = self.director.clone();
        self.panel.on(event::SET_WANDER_MODE, move |v| {
            match v.as_text().map(str::parse::<WanderMode>) {
                Some(Ok(mode)) => director.borrow_mut().wanderer.set_mode(mode),
                Some(Err(err)) => warn!("{err}"),
                None => warn!(?v, "wander mode expects text"),
            }
        });

        let director = self.director.clone();
        self.panel.on(event::SET_AUTOPILOT, move |v| {
            let mode = if v.as_bool().unwrap_or(false) {
                WanderMode::Autopilot
            } else {
                WanderMode::Manual
            };
            director.borrow_mut().wanderer.set_mode(mode);
        });

        let director = self.director.clone();
        self.panel.on(event::SET_WANDER_DIRECTION, move |v| {
            if let Some(deg) = v.as_number() {
                director.borrow_mut().wanderer.set_bearing(deg);
            }
        });

        let director = self.director.clone();
        self.panel.on(event::SET_FLY_SPEED, move |v| {
            if let Some(speed) = v.as_number() {
                director.borrow_mut().wanderer.set_speed(speed);
            }
        });

        let director = self.director.clone();
        self.panel.on(event::SET_MASTER_VOLUME, move |v| {
            if let Some(volume) = v.as_number() {
                director.borrow_mut().set_master_volume(volume);
            }
        });

        let director = self.director.clone();
        self.panel.on(event::SET_FLIGHT, move |v| {
            if let Some(enabled) = v.as_bool() {
                director.borrow_mut().wanderer.set_flight(enabled);
            }
        });

        let dom = self.panel.dom();
        self.panel.on(event::SET_COMPASS, move |v: &UiValue| {
            let mut dom = dom.borrow_mut();
            if v.as_bool().unwrap_or(true) {
                dom.remove_class(ids::COMPASS_CONTAINER, class::HIDDEN);
            } else {
                dom.add_class(ids::COMPASS_CONTAINER, class::HIDDEN);
            }
        });
    }

    /// Routes one document input, resuming audio on the first user gesture.
    pub fn handle_input(&mut self, input: &UiInput) {
        if self.resume_armed && input.is_user_gesture() {
            self.resume_on_gesture();
        }
        self.panel.handle(input);
    }

    fn resume_on_gesture(&mut self) {
        self.resume_armed = false;
        self.panel.stop_play_button_animation();

        let mut director = self.director.borrow_mut();
        if director.engine().state() != ContextState::Running {
            info!("resuming audio context");
            match director.resume_audio() {
                Ok(()) => info!("audio context resumed"),
                Err(err) => warn!("audio resume failed: {err}"),
            }
        }
    }

    /// Samples what is under the viewport centre.
    pub fn analyze_map(&self) -> TerrainSample {
        analyze_map(&*self.map.borrow())
    }

    /// One animation frame: sample, direct, move the camera, request the next frame.
    pub fn frame(&mut self, frame: Frame, scheduler: &mut impl FrameScheduler) -> TerrainSample {
        self.panel.tick(frame.time);

        let sample = self.analyze_map();
        let camera_move = self.director.borrow_mut().update(&sample, frame.dt_s);

        if let Some(mv) = camera_move {
            let mut map = self.map.borrow_mut();
            if map.is_ready() {
                let center = map.center();
                let mut bearing = mv.bearing_deg;
                let mut next = destination(center, bearing, mv.distance_m);
                // The projection clamps latitude; bounce instead of stalling at the edge.
                if next.lat.abs() >= MAX_MERCATOR_LAT {
                    bearing = self.director.borrow_mut().wanderer.reflect_bearing();
                    next = destination(center, bearing, mv.distance_m);
                    debug!(lat = center.lat, bearing, "bounced off latitude limit");
                }
                map.jump_to(next, bearing);
            }
        }

        self.last_sample = sample;
        self.frame_id = Some(scheduler.request_frame());
        sample
    }

    /// Cancels the pending frame, ending the loop.
    pub fn stop_loop(&mut self, scheduler: &mut impl FrameScheduler) {
        if let Some(id) = self.frame_id.take() {
            scheduler.cancel_frame(id);
        }
    }
}
