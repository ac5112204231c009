pub mod audio;
pub mod director;
pub mod synth;
pub mod wanderer;

pub use audio::*;
pub use director::*;
pub use synth::*;
pub use wanderer::*;
