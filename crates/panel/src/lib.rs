pub mod dom;
pub mod ids;
pub mod input;
pub mod knob;
pub mod panel;

pub use dom::*;
pub use input::*;
pub use knob::*;
pub use panel::*;
