pub mod r3_ast;

pub use r3_ast::*;
