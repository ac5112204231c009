pub mod map;
pub mod query;
pub mod synthetic;
pub mod terrain;

pub use map::*;
pub use query::*;
pub use terrain::*;
