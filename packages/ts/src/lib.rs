//! TypeScript-compatible program model for the Angular template tooling.
//!
//! Type-check blocks are generated TypeScript. This crate holds them as node
//! arenas together with the interfaces of the semantic oracle that checked
//! them.

pub mod factory;
pub mod node;
pub mod program;
pub mod type_checker;


pub use factory::*;
pub use node::*;
pub use program::*;
pub use type_checker::*;
