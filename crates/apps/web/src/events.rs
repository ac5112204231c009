use panel::UiInput;
use panel::ids;
use wasm_bindgen::JsCast;
use wasm_bindgen::prelude::*;
use web_sys::{
    Document, Element, Event, HtmlInputElement, HtmlSelectElement, KeyboardEvent, MouseEvent,
};

/// Document events forwarded to the panel.
const EVENTS: [&str; 8] = [
    "click",
    "touchstart",
    "input",
    "change",
    "mousedown",
    "mousemove",
    "mouseup",
    "keydown",
];

/// The nearest panel element at or above the event target.
fn panel_target(event: &Event) -> Option<Element> {
    let el = event.target()?.dyn_into::<Element>().ok()?;
    let selector = ids::ALL
        .iter()
        .map(|id| format!("#{id}"))
        .collect::<Vec<_>>()
        .join(",");
    el.closest(&selector).ok().flatten()
}

fn target_id(event: &Event) -> Option<String> {
    panel_target(event).map(|el| el.id())
}

fn translate(event: &Event) -> Option<UiInput> {
    match event.type_().as_str() {
        "click" => target_id(event).map(UiInput::Click),
        "touchstart" => Some(UiInput::TouchStart(target_id(event).unwrap_or_default())),
        "input" => {
            let el = panel_target(event)?.dyn_into::<HtmlInputElement>().ok()?;
            Some(UiInput::Input {
                id: el.id(),
                value: el.value(),
            })
        }
        "change" => {
            let el = panel_target(event)?;
            let el = match el.dyn_into::<HtmlInputElement>() {
                Ok(input) if input.type_() == "checkbox" => {
                    return Some(UiInput::Toggle {
                        id: input.id(),
                        checked: input.checked(),
                    });
                }
                Ok(input) => {
                    return Some(UiInput::Change {
                        id: input.id(),
                        value: input.value(),
                    });
                }
                Err(el) => el,
            };
            let select = el.dyn_into::<HtmlSelectElement>().ok()?;
            Some(UiInput::Change {
                id: select.id(),
                value: select.value(),
            })
        }
        "mousedown" => {
            let mouse = event.dyn_ref::<MouseEvent>()?;
            Some(UiInput::PointerDown {
                target: target_id(event),
                x: f64::from(mouse.client_x()),
                y: f64::from(mouse.client_y()),
            })
        }
        "mousemove" => {
            let mouse = event.dyn_ref::<MouseEvent>()?;
            Some(UiInput::PointerMove {
                x: f64::from(mouse.client_x()),
                y: f64::from(mouse.client_y()),
            })
        }
        "mouseup" => Some(UiInput::PointerUp),
        "keydown" => {
            let key = event.dyn_ref::<KeyboardEvent>()?;
            Some(UiInput::KeyDown(key.key()))
        }
        _ => None,
    }
}

/// Installs one document listener per forwarded event type. Listeners live
/// for the page's lifetime.
pub fn bind(document: &Document, handler: impl Fn(UiInput) + 'static) -> Result<(), JsValue> {
    let handler = std::rc::Rc::new(handler);
    for kind in EVENTS {
        let handler = handler.clone();
        let cb = Closure::wrap(Box::new(move |event: Event| {
            if let Some(input) = translate(&event) {
                handler(input);
            }
        }) as Box<dyn FnMut(_)>);
        document.add_event_listener_with_callback(kind, cb.as_ref().unchecked_ref())?;
        cb.forget();
    }
    Ok(())
}
