pub mod abi;
pub mod consts;
pub mod error;
pub mod event;
pub mod sdk;
pub mod state;
pub mod types;

pub mod prelude {
    pub use crate::abi::*;
    pub use crate::consts::*;
    pub use crate::error::*;
    pub use crate::event::*;
    pub use crate::state::*;
    pub use crate::types::*;
}
