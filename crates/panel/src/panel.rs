use std::cell::RefCell;
use std::rc::Rc;

use foundation::time::Time;
use runtime::EventBus;

use crate::dom::{BODY, Dom};
use crate::ids::{self, class, event};
use crate::input::{UiInput, UiValue, one_decimal, parse_int_prefix};
use crate::knob::{KnobState, knob_angle_in};

/// How long the zen hint stays on screen after entering zen mode.
pub const ZEN_OVERLAY_SECS: f64 = 2.0;

const ACCENT: &str = "var(--accent)";

/// Which panel elements were present when the panel was initialised.
#[derive(Debug, Copy, Clone, Default, PartialEq, Eq)]
struct Elements {
    start_overlay: bool,
    play_btn: bool,
    stop_btn: bool,
    fly_speed: bool,
    map_style: bool,
    master_volume: bool,
    flight_toggle: bool,
    autopilot_toggle: bool,
    compass_toggle: bool,
    heading_knob: bool,
    zen_mode_btn: bool,
    refresh_btn: bool,
}

impl Elements {
    fn cache<D: Dom>(dom: &D) -> Self {
        Self {
            start_overlay: dom.exists(ids::START_OVERLAY),
            play_btn: dom.exists(ids::PLAY_BTN),
            stop_btn: dom.exists(ids::STOP_BTN),
            fly_speed: dom.exists(ids::FLY_SPEED),
            map_style: dom.exists(ids::MAP_STYLE),
            master_volume: dom.exists(ids::MASTER_VOLUME),
            flight_toggle: dom.exists(ids::FLIGHT_TOGGLE),
            autopilot_toggle: dom.exists(ids::AUTOPILOT_TOGGLE),
            compass_toggle: dom.exists(ids::COMPASS_TOGGLE),
            heading_knob: dom.exists(ids::HEADING_KNOB),
            zen_mode_btn: dom.exists(ids::ZEN_MODE_BTN),
            refresh_btn: dom.exists(ids::REFRESH_BTN),
        }
    }

    /// Knob dragging is only wired alongside the autopilot toggle.
    fn knob(&self) -> bool {
        self.autopilot_toggle && self.heading_knob
    }
}

/// Hides the click-to-start overlay.
pub fn hide_overlay<D: Dom + ?Sized>(dom: &mut D) {
    dom.add_class(ids::START_OVERLAY, class::HIDDEN);
}

/// Stops the "press play" pulse on the play button.
pub fn stop_play_button_animation<D: Dom + ?Sized>(dom: &mut D) {
    dom.remove_class(ids::PLAY_BTN, class::HIGHLIGHT_PULSE);
}

pub fn set_knob_rotation<D: Dom + ?Sized>(dom: &mut D, deg: f64) {
    dom.set_style(ids::HEADING_KNOB, "transform", &format!("rotate({deg}deg)"));
}

/// The control panel: turns raw document input into named events.
pub struct ControlPanel<D: Dom + 'static> {
    dom: Rc<RefCell<D>>,
    bus: EventBus<UiValue>,
    elements: Elements,
    knob: KnobState,
    zen_overlay_deadline: Option<Time>,
    now: Time,
}

impl<D: Dom + 'static> ControlPanel<D> {
    pub fn new(dom: D) -> Self {
        Self::with_shared_dom(Rc::new(RefCell::new(dom)))
    }

    pub fn with_shared_dom(dom: Rc<RefCell<D>>) -> Self {
        Self {
            dom,
            bus: EventBus::new(),
            elements: Elements::default(),
            knob: KnobState::default(),
            zen_overlay_deadline: None,
            now: Time::ZERO,
        }
    }

    /// Shared handle to the document, for listeners that touch it.
    pub fn dom(&self) -> Rc<RefCell<D>> {
        self.dom.clone()
    }

    pub fn knob(&self) -> KnobState {
        self.knob
    }

    pub fn is_zen(&self) -> bool {
        self.dom.borrow().has_class(BODY, class::ZEN_MODE)
    }

    /// Caches element presence and registers the panel's own listeners.
    pub fn init(&mut self) {
        self.elements = Elements::cache(&*self.dom.borrow());
        tracing::debug!(elements = ?self.elements, "control panel wired");

        if self.elements.autopilot_toggle {
            let dom = self.dom.clone();
            self.on(event::SET_AUTOPILOT, move |v: &UiValue| {
                let mut dom = dom.borrow_mut();
                if v.as_bool().unwrap_or(false) {
                    dom.add_class(ids::HEADING_KNOB, class::DISABLED);
                } else {
                    dom.remove_class(ids::HEADING_KNOB, class::DISABLED);
                }
            });
        }
    }

    pub fn on(&mut self, event: &str, callback: impl FnMut(&UiValue) + 'static) {
        self.bus.on(event, callback);
    }

    pub fn emit(&mut self, event: &str, data: UiValue) {
        tracing::debug!(event, ?data, "ui event");
        self.bus.emit(event, &data);
    }

    pub fn listener_count(&self, event: &str) -> usize {
        self.bus.listener_count(event)
    }

    pub fn hide_overlay(&mut self) {
        hide_overlay(&mut *self.dom.borrow_mut());
    }

    pub fn stop_play_button_animation(&mut self) {
        stop_play_button_animation(&mut *self.dom.borrow_mut());
    }

    /// Advances panel timers to `now`.
    pub fn tick(&mut self, now: Time) {
        self.now = now;
        if let Some(deadline) = self.zen_overlay_deadline {
            if now.has_reached(deadline) {
                self.dom.borrow_mut().add_class(ids::ZEN_OVERLAY, class::HIDDEN);
                self.zen_overlay_deadline = None;
            }
        }
    }

    pub fn toggle_zen_mode(&mut self) {
        let is_zen = {
            let mut dom = self.dom.borrow_mut();
            let is_zen = dom.toggle_class(BODY, class::ZEN_MODE);
            if is_zen && dom.exists(ids::ZEN_OVERLAY) {
                dom.set_style(ids::ZEN_OVERLAY, "display", "");
                dom.remove_class(ids::ZEN_OVERLAY, class::HIDDEN);
                self.zen_overlay_deadline = Some(self.now.after(ZEN_OVERLAY_SECS));
            }
            is_zen
        };
        tracing::info!(zen = is_zen, "zen mode toggled");
        self.emit(event::TOGGLE_ZEN_MODE, UiValue::Bool(is_zen));
    }

    /// Dispatches one document input.
    pub fn handle(&mut self, input: &UiInput) {
        let el = self.elements;
        match input {
            UiInput::Click(id) | UiInput::TouchStart(id)
                if id == ids::START_OVERLAY && el.start_overlay =>
            {
                self.hide_overlay();
                self.emit(event::PLAY, UiValue::None);
            }
            UiInput::Click(id) => self.handle_click(id),
            UiInput::Input { id, value } => self.handle_slider(id, value),
            UiInput::Change { id, value } if id == ids::MAP_STYLE && el.map_style => {
                self.change_map_style(value);
            }
            UiInput::Toggle { id, checked } => self.handle_toggle(id, *checked),
            UiInput::PointerDown {
                target: Some(target),
                x,
                y,
            } if target == ids::HEADING_KNOB && el.knob() => {
                self.knob.dragging = true;
                self.update_knob_from_pointer(*x, *y);
                self.dom.borrow_mut().set_style(BODY, "user-select", "none");
            }
            UiInput::PointerMove { x, y } if self.knob.dragging => {
                self.update_knob_from_pointer(*x, *y);
            }
            UiInput::PointerUp if el.knob() => {
                self.knob.dragging = false;
                self.dom.borrow_mut().set_style(BODY, "user-select", "");
            }
            UiInput::KeyDown(key) if key == "Escape" && self.is_zen() => {
                self.toggle_zen_mode();
            }
            _ => {}
        }
    }

    fn handle_click(&mut self, id: &str) {
        let el = self.elements;
        match id {
            ids::PLAY_BTN if el.play_btn => {
                self.emit(event::PLAY, UiValue::None);
                let mut dom = self.dom.borrow_mut();
                dom.set_style(ids::PLAY_BTN, "border-color", ACCENT);
                if el.stop_btn {
                    dom.set_style(ids::STOP_BTN, "border-color", "");
                }
            }
            ids::STOP_BTN if el.stop_btn => {
                self.emit(event::STOP, UiValue::None);
                let mut dom = self.dom.borrow_mut();
                if el.play_btn {
                    dom.set_style(ids::PLAY_BTN, "border-color", "");
                }
                dom.set_style(ids::STOP_BTN, "border-color", ACCENT);
            }
            ids::REFRESH_BTN if el.refresh_btn => {
                self.emit(event::FORCE_REFRESH, UiValue::None);
            }
            ids::ZEN_MODE_BTN if el.zen_mode_btn => self.toggle_zen_mode(),
            _ => {}
        }
    }

    fn handle_slider(&mut self, id: &str, value: &str) {
        let el = self.elements;
        match id {
            ids::FLY_SPEED if el.fly_speed => {
                let Ok(v) = value.trim().parse::<f64>() else {
                    tracing::warn!(value, "ignoring unparseable fly speed");
                    return;
                };
                self.emit(event::SET_FLY_SPEED, UiValue::Number(v));
                self.dom
                    .borrow_mut()
                    .set_text(ids::FLY_SPEED_VAL, &one_decimal(v));
            }
            ids::MASTER_VOLUME if el.master_volume => {
                let Some(v) = parse_int_prefix(value) else {
                    tracing::warn!(value, "ignoring unparseable master volume");
                    return;
                };
                self.emit(event::SET_MASTER_VOLUME, UiValue::Number(v as f64));
                self.dom
                    .borrow_mut()
                    .set_text(ids::MASTER_VOLUME_VAL, &format!("{v}%"));
            }
            _ => {}
        }
    }

    fn handle_toggle(&mut self, id: &str, checked: bool) {
        let el = self.elements;
        match id {
            ids::COMPASS_TOGGLE if el.compass_toggle => {
                self.emit(event::SET_COMPASS, UiValue::Bool(checked));
            }
            ids::FLIGHT_TOGGLE if el.flight_toggle => {
                self.emit(event::SET_FLIGHT, UiValue::Bool(checked));
            }
            ids::AUTOPILOT_TOGGLE if el.autopilot_toggle => {
                self.emit(event::SET_AUTOPILOT, UiValue::Bool(checked));
                if !checked {
                    let angle = self.knob.angle_deg;
                    self.emit(event::SET_WANDER_DIRECTION, UiValue::Number(angle));
                }
            }
            _ => {}
        }
    }

    fn change_map_style(&mut self, style: &str) {
        self.emit(event::SET_MAP_STYLE, UiValue::Text(style.to_string()));

        let mut dom = self.dom.borrow_mut();
        if dom.exists(ids::COMPASS_CONTAINER) {
            dom.remove_class(ids::COMPASS_CONTAINER, class::THEME_OUTDOORS);
            dom.remove_class(ids::COMPASS_CONTAINER, class::THEME_SATELLITE);
            if style.contains("outdoors") {
                dom.add_class(ids::COMPASS_CONTAINER, class::THEME_OUTDOORS);
            } else if style.contains("satellite") {
                dom.add_class(ids::COMPASS_CONTAINER, class::THEME_SATELLITE);
            }
        }
    }

    fn update_knob_from_pointer(&mut self, x: f64, y: f64) {
        let Some(rect) = self.dom.borrow().rect(ids::HEADING_KNOB) else {
            return;
        };
        let angle = knob_angle_in(rect, x, y);
        self.knob.angle_deg = angle;
        set_knob_rotation(&mut *self.dom.borrow_mut(), angle);
        self.emit(event::SET_WANDER_DIRECTION, UiValue::Number(angle));
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::dom::MemoryDom;
    use pretty_assertions::assert_eq;

    type Log = Rc<RefCell<Vec<(String, UiValue)>>>;

    fn panel_with(dom: MemoryDom) -> (ControlPanel<MemoryDom>, Log) {
        let mut panel = ControlPanel::new(dom);
        panel.init();
        let log: Log = Rc::new(RefCell::new(Vec::new()));
        for name in [
            event::PLAY,
            event::STOP,
            event::SET_FLY_SPEED,
            event::SET_MAP_STYLE,
            event::SET_COMPASS,
            event::FORCE_REFRESH,
            event::SET_MASTER_VOLUME,
            event::SET_FLIGHT,
            event::SET_AUTOPILOT,
            event::SET_WANDER_DIRECTION,
            event::TOGGLE_ZEN_MODE,
        ] {
            let log = log.clone();
            panel.on(name, move |v| log.borrow_mut().push((name.to_string(), v.clone())));
        }
        (panel, log)
    }

    fn panel() -> (ControlPanel<MemoryDom>, Log) {
        panel_with(MemoryDom::with_panel())
    }

    fn names(log: &Log) -> Vec<String> {
        log.borrow().iter().map(|(n, _)| n.clone()).collect()
    }

    #[test]
    fn start_overlay_click_hides_and_plays() {
        let (mut p, log) = panel();
        p.handle(&UiInput::TouchStart(ids::START_OVERLAY.into()));
        assert!(p.dom().borrow().has_class(ids::START_OVERLAY, class::HIDDEN));
        assert_eq!(names(&log), vec!["play"]);
    }

    #[test]
    fn play_and_stop_swap_accent() {
        let (mut p, log) = panel();
        p.handle(&UiInput::click(ids::PLAY_BTN));
        {
            let dom = p.dom();
            let dom = dom.borrow();
            assert_eq!(dom.style(ids::PLAY_BTN, "border-color"), Some(ACCENT));
            assert_eq!(dom.style(ids::STOP_BTN, "border-color"), None);
        }
        p.handle(&UiInput::click(ids::STOP_BTN));
        {
            let dom = p.dom();
            let dom = dom.borrow();
            assert_eq!(dom.style(ids::PLAY_BTN, "border-color"), None);
            assert_eq!(dom.style(ids::STOP_BTN, "border-color"), Some(ACCENT));
        }
        assert_eq!(names(&log), vec!["play", "stop"]);
    }

    #[test]
    fn fly_speed_emits_number_and_formats_label() {
        let (mut p, log) = panel();
        p.handle(&UiInput::input(ids::FLY_SPEED, "2.26"));
        assert_eq!(
            *log.borrow(),
            vec![("setFlySpeed".to_string(), UiValue::Number(2.26))]
        );
        assert_eq!(p.dom().borrow().text(ids::FLY_SPEED_VAL), Some("2.3"));

        p.handle(&UiInput::input(ids::FLY_SPEED, "0.25"));
        assert_eq!(p.dom().borrow().text(ids::FLY_SPEED_VAL), Some("0.3"));
    }

    #[test]
    fn bad_slider_values_are_ignored() {
        let (mut p, log) = panel();
        p.handle(&UiInput::input(ids::FLY_SPEED, "fast"));
        p.handle(&UiInput::input(ids::MASTER_VOLUME, "loud"));
        assert!(log.borrow().is_empty());
    }

    #[test]
    fn master_volume_emits_integer_with_percent_label() {
        let (mut p, log) = panel();
        p.handle(&UiInput::input(ids::MASTER_VOLUME, "42.9"));
        assert_eq!(
            *log.borrow(),
            vec![("setMasterVolume".to_string(), UiValue::Number(42.0))]
        );
        assert_eq!(p.dom().borrow().text(ids::MASTER_VOLUME_VAL), Some("42%"));
    }

    #[test]
    fn map_style_updates_compass_theme() {
        let (mut p, log) = panel();
        p.handle(&UiInput::change(ids::MAP_STYLE, "mapbox://styles/mapbox/satellite-v9"));
        {
            let dom = p.dom();
            let dom = dom.borrow();
            assert!(dom.has_class(ids::COMPASS_CONTAINER, class::THEME_SATELLITE));
            assert!(!dom.has_class(ids::COMPASS_CONTAINER, class::THEME_OUTDOORS));
        }
        p.handle(&UiInput::change(ids::MAP_STYLE, "mapbox://styles/mapbox/outdoors-v12"));
        {
            let dom = p.dom();
            let dom = dom.borrow();
            assert!(dom.has_class(ids::COMPASS_CONTAINER, class::THEME_OUTDOORS));
            assert!(!dom.has_class(ids::COMPASS_CONTAINER, class::THEME_SATELLITE));
        }
        p.handle(&UiInput::change(ids::MAP_STYLE, "mapbox://styles/mapbox/dark-v11"));
        {
            let dom = p.dom();
            let dom = dom.borrow();
            assert!(!dom.has_class(ids::COMPASS_CONTAINER, class::THEME_OUTDOORS));
            assert!(!dom.has_class(ids::COMPASS_CONTAINER, class::THEME_SATELLITE));
        }
        assert_eq!(log.borrow().len(), 3);
        assert_eq!(
            log.borrow()[2].1,
            UiValue::Text("mapbox://styles/mapbox/dark-v11".into())
        );
    }

    #[test]
    fn toggles_emit_checked_state() {
        let (mut p, log) = panel();
        p.handle(&UiInput::toggle(ids::COMPASS_TOGGLE, false));
        p.handle(&UiInput::toggle(ids::FLIGHT_TOGGLE, true));
        p.handle(&UiInput::click(ids::REFRESH_BTN));
        assert_eq!(
            *log.borrow(),
            vec![
                ("setCompass".to_string(), UiValue::Bool(false)),
                ("setFlight".to_string(), UiValue::Bool(true)),
                ("forceRefresh".to_string(), UiValue::None),
            ]
        );
    }

    #[test]
    fn knob_drag_emits_bearings_until_release() {
        let (mut p, log) = panel();
        // Knob rect is (100, 100) 60x60, centre (130, 130).
        p.handle(&UiInput::PointerDown {
            target: Some(ids::HEADING_KNOB.into()),
            x: 190.0,
            y: 130.0,
        });
        assert_eq!(
            p.dom().borrow().style(BODY, "user-select"),
            Some("none")
        );
        p.handle(&UiInput::PointerMove { x: 130.0, y: 190.0 });
        p.handle(&UiInput::PointerUp);
        p.handle(&UiInput::PointerMove { x: 70.0, y: 130.0 });

        let angles: Vec<f64> = log
            .borrow()
            .iter()
            .filter_map(|(n, v)| (n == "setWanderDirection").then(|| v.as_number()).flatten())
            .collect();
        assert_eq!(angles.len(), 2);
        assert!((angles[0] - 90.0).abs() < 1e-9);
        assert!((angles[1] - 180.0).abs() < 1e-9);
        assert!((p.knob().angle_deg - 180.0).abs() < 1e-9);
        assert!(!p.knob().dragging);
        assert_eq!(p.dom().borrow().style(BODY, "user-select"), None);
        assert!(
            p.dom()
                .borrow()
                .style(ids::HEADING_KNOB, "transform")
                .is_some_and(|t| t.starts_with("rotate(180"))
        );
    }

    #[test]
    fn pointer_down_elsewhere_does_not_drag() {
        let (mut p, log) = panel();
        p.handle(&UiInput::PointerDown {
            target: Some(ids::PLAY_BTN.into()),
            x: 0.0,
            y: 0.0,
        });
        p.handle(&UiInput::PointerMove { x: 10.0, y: 10.0 });
        assert!(log.borrow().is_empty());
    }

    #[test]
    fn autopilot_toggle_disables_knob_and_restores_heading() {
        let (mut p, log) = panel();
        p.handle(&UiInput::PointerDown {
            target: Some(ids::HEADING_KNOB.into()),
            x: 130.0,
            y: 190.0,
        });
        p.handle(&UiInput::PointerUp);
        log.borrow_mut().clear();

        p.handle(&UiInput::toggle(ids::AUTOPILOT_TOGGLE, true));
        assert!(p.dom().borrow().has_class(ids::HEADING_KNOB, class::DISABLED));
        assert_eq!(names(&log), vec!["setAutopilot"]);

        p.handle(&UiInput::toggle(ids::AUTOPILOT_TOGGLE, false));
        assert!(!p.dom().borrow().has_class(ids::HEADING_KNOB, class::DISABLED));
        let log = log.borrow();
        assert_eq!(log[1], ("setAutopilot".to_string(), UiValue::Bool(false)));
        assert_eq!(log[2].0, "setWanderDirection");
        assert!((log[2].1.as_number().unwrap_or(-1.0) - 180.0).abs() < 1e-9);
    }

    #[test]
    fn external_set_autopilot_also_disables_knob() {
        let (mut p, _log) = panel();
        p.emit(event::SET_AUTOPILOT, UiValue::Bool(true));
        assert!(p.dom().borrow().has_class(ids::HEADING_KNOB, class::DISABLED));
    }

    #[test]
    fn zen_overlay_hides_after_two_seconds() {
        let (mut p, log) = panel();
        p.tick(Time(10.0));
        p.handle(&UiInput::click(ids::ZEN_MODE_BTN));
        assert!(p.is_zen());
        assert!(!p.dom().borrow().has_class(ids::ZEN_OVERLAY, class::HIDDEN));

        p.tick(Time(11.9));
        assert!(!p.dom().borrow().has_class(ids::ZEN_OVERLAY, class::HIDDEN));
        p.tick(Time(12.0));
        assert!(p.dom().borrow().has_class(ids::ZEN_OVERLAY, class::HIDDEN));
        assert_eq!(
            *log.borrow(),
            vec![("toggleZenMode".to_string(), UiValue::Bool(true))]
        );
    }

    #[test]
    fn escape_only_leaves_zen() {
        let (mut p, log) = panel();
        p.handle(&UiInput::key("Escape"));
        assert!(!p.is_zen());
        assert!(log.borrow().is_empty());

        p.handle(&UiInput::click(ids::ZEN_MODE_BTN));
        p.handle(&UiInput::key("Enter"));
        assert!(p.is_zen());
        p.handle(&UiInput::key("Escape"));
        assert!(!p.is_zen());
        assert_eq!(
            log.borrow().last().cloned(),
            Some(("toggleZenMode".to_string(), UiValue::Bool(false)))
        );
    }

    #[test]
    fn missing_elements_skip_wiring() {
        let mut dom = MemoryDom::with_panel();
        dom.remove(ids::PLAY_BTN);
        dom.remove(ids::AUTOPILOT_TOGGLE);
        dom.remove(ids::ZEN_OVERLAY);
        let (mut p, log) = panel_with(dom);

        p.handle(&UiInput::click(ids::PLAY_BTN));
        p.handle(&UiInput::PointerDown {
            target: Some(ids::HEADING_KNOB.into()),
            x: 0.0,
            y: 0.0,
        });
        assert!(log.borrow().is_empty());
        assert_eq!(p.listener_count(event::SET_AUTOPILOT), 1);

        // Zen still toggles without its overlay.
        p.handle(&UiInput::click(ids::ZEN_MODE_BTN));
        assert!(p.is_zen());
    }

    #[test]
    fn stop_play_button_animation_removes_pulse() {
        let (mut p, _log) = panel();
        assert!(p.dom().borrow().has_class(ids::PLAY_BTN, class::HIGHLIGHT_PULSE));
        p.stop_play_button_animation();
        assert!(!p.dom().borrow().has_class(ids::PLAY_BTN, class::HIGHLIGHT_PULSE));
    }
}
