mod campaign;
mod status;

pub use campaign::*;
pub use status::*;
