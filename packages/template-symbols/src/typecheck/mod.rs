//! Template type-checking.
//!
//! Symbols of template nodes are answered from the generated type-check block
//! of a component, with the help of a semantic oracle over the program.

pub mod api;
pub mod src;


pub use api::*;
pub use src::*;
