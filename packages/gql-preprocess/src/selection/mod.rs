//! Selection gathering: what the caller selected beneath the active field.

mod dependency;
mod gather;
mod node;

pub use dependency::*;
pub use gather::*;
pub use node::*;
