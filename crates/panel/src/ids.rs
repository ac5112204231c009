//! Element ids, CSS classes and event names the panel is wired against.

pub const START_OVERLAY: &str = "start-overlay";
pub const PLAY_BTN: &str = "play-btn";
pub const STOP_BTN: &str = "stop-btn";
pub const FLY_SPEED: &str = "fly-speed";
pub const FLY_SPEED_VAL: &str = "fly-speed-val";
pub const MAP_STYLE: &str = "map-style";
pub const MASTER_VOLUME: &str = "master-volume";
pub const MASTER_VOLUME_VAL: &str = "master-volume-val";
pub const FLIGHT_TOGGLE: &str = "flight-toggle";
pub const AUTOPILOT_TOGGLE: &str = "autopilot-toggle";
pub const COMPASS_TOGGLE: &str = "compass-toggle";
pub const COMPASS_CONTAINER: &str = "compass-container";
pub const HEADING_KNOB: &str = "heading-knob";
pub const ZEN_MODE_BTN: &str = "zen-mode-btn";
pub const ZEN_OVERLAY: &str = "zen-overlay";
pub const REFRESH_BTN: &str = "refresh-btn";

/// Every id the panel knows about, in document order.
pub const ALL: [&str; 16] = [
    START_OVERLAY,
    PLAY_BTN,
    STOP_BTN,
    FLY_SPEED,
    FLY_SPEED_VAL,
    MAP_STYLE,
    MASTER_VOLUME,
    MASTER_VOLUME_VAL,
    FLIGHT_TOGGLE,
    AUTOPILOT_TOGGLE,
    COMPASS_TOGGLE,
    COMPASS_CONTAINER,
    HEADING_KNOB,
    ZEN_MODE_BTN,
    ZEN_OVERLAY,
    REFRESH_BTN,
];

pub mod class {
    pub const HIDDEN: &str = "hidden";
    pub const ZEN_MODE: &str = "zen-mode";
    pub const THEME_OUTDOORS: &str = "theme-outdoors";
    pub const THEME_SATELLITE: &str = "theme-satellite";
    pub const DISABLED: &str = "disabled";
    pub const HIGHLIGHT_PULSE: &str = "highlight-pulse";
}

pub mod event {
    pub const PLAY: &str = "play";
    pub const STOP: &str = "stop";
    pub const SET_FLY_SPEED: &str = "setFlySpeed";
    pub const SET_MAP_STYLE: &str = "setMapStyle";
    pub const SET_COMPASS: &str = "setCompass";
    pub const FORCE_REFRESH: &str = "forceRefresh";
    pub const SET_MASTER_VOLUME: &str = "setMasterVolume";
    pub const SET_FLIGHT: &str = "setFlight";
    pub const SET_AUTOPILOT: &str = "setAutopilot";
    pub const SET_WANDER_MODE: &str = "setWanderMode";
    pub const SET_WANDER_DIRECTION: &str = "setWanderDirection";
    pub const TOGGLE_ZEN_MODE: &str = "toggleZenMode";
}
