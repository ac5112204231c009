use std::cell::RefCell;

use app::{App, AppConfig};
use console_error_panic_hook::set_once;
use director::{Director, Wanderer};
use foundation::math::LngLat;
use tracing::{error, info, warn};
use tracing_subscriber::prelude::*;
use tracing_subscriber::{EnvFilter, Layer};
use tracing_web::MakeWebConsoleWriter;
use wasm_bindgen::prelude::*;

mod audio;
mod dom;
mod events;
mod mapbox;
mod raf;

use audio::WebAudio;
use dom::WebDom;
use mapbox::MapboxMap;
use raf::RafScheduler;

/// Id of the element the map mounts into.
const MAP_CONTAINER: &str = "map";
/// Optional `<script type="application/json">` holding an [`AppConfig`].
const CONFIG_ELEMENT: &str = "driftscape-config";

type WebApp = App<MapboxMap, WebAudio, WebDom>;

struct WebState {
    app: WebApp,
    frames: RafScheduler,
}

thread_local! {
    static STATE: RefCell<Option<WebState>> = const { RefCell::new(None) };
}

fn init_tracing() {
    let fmt_layer = tracing_subscriber::fmt::layer()
        .with_ansi(false)
        .without_time()
        .with_writer(MakeWebConsoleWriter::new())
        .with_filter(EnvFilter::new("info"));
    let _ = tracing_subscriber::registry().with(fmt_layer).try_init();
}

fn page_config(document: &web_sys::Document) -> AppConfig {
    let Some(text) = document
        .get_element_by_id(CONFIG_ELEMENT)
        .and_then(|el| el.text_content())
    else {
        return AppConfig::default();
    };
    match AppConfig::from_json_str(&text) {
        Ok(config) => config,
        Err(err) => {
            warn!("ignoring page config: {err}");
            AppConfig::default()
        }
    }
}

fn on_animation_frame(timestamp_ms: f64) {
    STATE.with(|state| {
        let mut state = state.borrow_mut();
        let Some(WebState { app, frames }) = state.as_mut() else {
            return;
        };
        let frame = frames.begin_frame(timestamp_ms);
        app.frame(frame, frames);
    });
}

fn on_input(input: panel::UiInput) {
    STATE.with(|state| {
        if let Some(s) = state.borrow_mut().as_mut() {
            s.app.handle_input(&input);
        }
    });
}

#[wasm_bindgen(start)]
pub fn start() -> Result<(), JsValue> {
    set_once();
    init_tracing();

    let window = web_sys::window().ok_or_else(|| JsValue::from_str("no window"))?;
    let document = window
        .document()
        .ok_or_else(|| JsValue::from_str("no document"))?;

    let config = page_config(&document);
    let token = option_env!("MAPBOX_TOKEN").unwrap_or_default();
    let map = MapboxMap::new(
        MAP_CONTAINER,
        token,
        LngLat::new(config.map.start_lng, config.map.start_lat),
        config.map.zoom,
        config.map.style.clone(),
    );
    let director = Director::new(
        WebAudio::new(),
        &config.audio,
        Wanderer::new(&config.wanderer),
    );

    let mut app = App::new(map, director, WebDom::new(document.clone()));
    let mut frames = RafScheduler::new(Closure::wrap(
        Box::new(on_animation_frame) as Box<dyn FnMut(f64)>
    ));
    if let Err(err) = app.init(&mut frames) {
        error!("init failed: {err}");
        return Err(JsValue::from_str(&err.to_string()));
    }

    STATE.with(|state| *state.borrow_mut() = Some(WebState { app, frames }));
    events::bind(&document, on_input)?;
    info!("driftscape running");
    Ok(())
}

/// Stops the animation loop; the page keeps its current view and sound.
#[wasm_bindgen]
pub fn stop_loop() {
    STATE.with(|state| {
        if let Some(WebState { app, frames }) = state.borrow_mut().as_mut() {
            app.stop_loop(frames);
        }
    });
}
