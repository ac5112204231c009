use std::cell::Cell;
use std::rc::Rc;

use foundation::math::{LngLat, Vec2};
use js_sys::{Array, Object, Reflect};
use layers::{MapError, MapStyle, MapView, RenderedFeature, ScreenBox};
use tracing::{info, warn};
use wasm_bindgen::JsCast;
use wasm_bindgen::prelude::*;

const DEM_SOURCE: &str = "mapbox-dem";
const DEM_URL: &str = "mapbox://mapbox.mapbox-terrain-dem-v1";
const TERRAIN_EXAGGERATION: f64 = 1.5;

#[wasm_bindgen]
extern "C" {
    #[wasm_bindgen(js_namespace = mapboxgl, js_name = Map)]
    type JsMap;

    #[wasm_bindgen(constructor, js_namespace = mapboxgl, js_class = "Map", catch)]
    fn new(options: &JsValue) -> Result<JsMap, JsValue>;

    #[wasm_bindgen(method)]
    fn on(this: &JsMap, event: &str, listener: &js_sys::Function);

    #[wasm_bindgen(method, js_name = getCenter)]
    fn get_center(this: &JsMap) -> JsLngLat;

    #[wasm_bindgen(method)]
    fn project(this: &JsMap, lnglat: &JsValue) -> JsPoint;

    #[wasm_bindgen(method, js_name = queryTerrainElevation, catch)]
    fn query_terrain_elevation(this: &JsMap, lnglat: &JsValue) -> Result<JsValue, JsValue>;

    #[wasm_bindgen(method, js_name = queryRenderedFeatures)]
    fn query_rendered_features(this: &JsMap, geometry: &JsValue) -> Array;

    #[wasm_bindgen(method, js_name = setStyle)]
    fn set_style(this: &JsMap, url: &str);

    #[wasm_bindgen(method, js_name = jumpTo)]
    fn jump_to(this: &JsMap, options: &JsValue);

    #[wasm_bindgen(method, js_name = getSource)]
    fn get_source(this: &JsMap, id: &str) -> JsValue;

    #[wasm_bindgen(method, js_name = addSource, catch)]
    fn add_source(this: &JsMap, id: &str, source: &JsValue) -> Result<(), JsValue>;

    #[wasm_bindgen(method, js_name = setTerrain, catch)]
    fn set_terrain(this: &JsMap, terrain: &JsValue) -> Result<(), JsValue>;

    type JsLngLat;

    #[wasm_bindgen(method, getter)]
    fn lng(this: &JsLngLat) -> f64;

    #[wasm_bindgen(method, getter)]
    fn lat(this: &JsLngLat) -> f64;

    type JsPoint;

    #[wasm_bindgen(method, getter)]
    fn x(this: &JsPoint) -> f64;

    #[wasm_bindgen(method, getter)]
    fn y(this: &JsPoint) -> f64;
}

fn object(entries: &[(&str, JsValue)]) -> JsValue {
    let obj = Object::new();
    for (key, value) in entries {
        let _ = Reflect::set(&obj, &JsValue::from_str(key), value);
    }
    obj.into()
}

fn lnglat_js(p: LngLat) -> JsValue {
    Array::of2(&p.lng.into(), &p.lat.into()).into()
}

fn js_err(e: JsValue) -> String {
    e.as_string().unwrap_or_else(|| format!("{e:?}"))
}

/// Adds the DEM source and drapes terrain over it. Needed after every style load,
/// since a style swap drops sources.
fn add_terrain(map: &JsMap) -> Result<(), JsValue> {
    if map.get_source(DEM_SOURCE).is_undefined() {
        map.add_source(
            DEM_SOURCE,
            &object(&[
                ("type", "raster-dem".into()),
                ("url", DEM_URL.into()),
                ("tileSize", 512.into()),
                ("maxzoom", 14.into()),
            ]),
        )?;
    }
    map.set_terrain(&object(&[
        ("source", DEM_SOURCE.into()),
        ("exaggeration", TERRAIN_EXAGGERATION.into()),
    ]))
}

/// Mapbox GL map mounted in a container element.
pub struct MapboxMap {
    container: String,
    token: String,
    start: LngLat,
    zoom: f64,
    style: MapStyle,
    map: Option<JsMap>,
    ready: Rc<Cell<bool>>,
    listeners: Vec<Closure<dyn FnMut()>>,
}

impl MapboxMap {
    pub fn new(container: &str, token: &str, start: LngLat, zoom: f64, style: MapStyle) -> Self {
        Self {
            container: container.to_string(),
            token: token.to_string(),
            start,
            zoom,
            style,
            map: None,
            ready: Rc::new(Cell::new(false)),
            listeners: Vec::new(),
        }
    }

    fn set_access_token(&self) -> Result<(), MapError> {
        let gl = Reflect::get(&js_sys::global(), &JsValue::from_str("mapboxgl"))
            .map_err(|e| MapError::Setup(js_err(e)))?;
        if gl.is_undefined() {
            return Err(MapError::Setup("mapboxgl is not loaded".into()));
        }
        Reflect::set(&gl, &JsValue::from_str("accessToken"), &self.token.as_str().into())
            .map_err(|e| MapError::Setup(js_err(e)))?;
        Ok(())
    }
}

impl MapView for MapboxMap {
    fn init(&mut self) -> Result<(), MapError> {
        if self.token.is_empty() {
            warn!("no mapbox token configured; tiles will not load");
        }
        self.set_access_token()?;

        let map = JsMap::new(&object(&[
            ("container", self.container.as_str().into()),
            ("style", self.style.as_str().into()),
            ("center", lnglat_js(self.start)),
            ("zoom", self.zoom.into()),
            ("pitch", 60.into()),
            ("interactive", false.into()),
        ]))
        .map_err(|e| MapError::Setup(js_err(e)))?;

        let ready = self.ready.clone();
        let on_load = Closure::wrap(Box::new(move || {
            info!("map loaded");
            ready.set(true);
        }) as Box<dyn FnMut()>);
        map.on("load", on_load.as_ref().unchecked_ref());

        let styled: JsValue = map.clone().into();
        let on_style = Closure::wrap(Box::new(move || {
            let map: &JsMap = styled.unchecked_ref();
            if let Err(e) = add_terrain(map) {
                warn!("terrain setup failed: {}", js_err(e));
            }
        }) as Box<dyn FnMut()>);
        map.on("style.load", on_style.as_ref().unchecked_ref());

        self.listeners = vec![on_load, on_style];
        self.map = Some(map);
        Ok(())
    }

    fn is_ready(&self) -> bool {
        self.map.is_some() && self.ready.get()
    }

    fn center(&self) -> LngLat {
        match &self.map {
            Some(map) => {
                let c = map.get_center();
                LngLat::new(c.lng(), c.lat())
            }
            None => self.start,
        }
    }

    fn projected_center(&self) -> Vec2 {
        match &self.map {
            Some(map) => {
                let p = map.project(&lnglat_js(self.center()));
                Vec2::new(p.x(), p.y())
            }
            None => Vec2::default(),
        }
    }

    fn terrain_elevation(&self, at: LngLat) -> Result<Option<f64>, MapError> {
        let Some(map) = &self.map else {
            return Err(MapError::NotReady);
        };
        let value = map
            .query_terrain_elevation(&lnglat_js(at))
            .map_err(|e| MapError::Terrain(js_err(e)))?;
        Ok(value.as_f64())
    }

    fn rendered_features(&self, bbox: ScreenBox) -> Vec<RenderedFeature> {
        let Some(map) = &self.map else {
            return Vec::new();
        };
        let geometry = Array::of2(
            &Array::of2(&bbox.min.x.into(), &bbox.min.y.into()),
            &Array::of2(&bbox.max.x.into(), &bbox.max.y.into()),
        );
        map.query_rendered_features(&geometry)
            .iter()
            .filter_map(|feature| {
                let layer = Reflect::get(&feature, &JsValue::from_str("layer")).ok()?;
                let id = Reflect::get(&layer, &JsValue::from_str("id")).ok()?;
                Some(RenderedFeature::new(id.as_string()?))
            })
            .collect()
    }

    fn style(&self) -> &MapStyle {
        &self.style
    }

    fn set_style(&mut self, style: MapStyle) {
        info!(%style, "switching map style");
        if let Some(map) = &self.map {
            map.set_style(style.as_str());
        }
        self.style = style;
    }

    fn jump_to(&mut self, center: LngLat, bearing_deg: f64) {
        if let Some(map) = &self.map {
            map.jump_to(&object(&[
                ("center", lnglat_js(center)),
                ("bearing", bearing_deg.into()),
            ]));
        }
    }
}
