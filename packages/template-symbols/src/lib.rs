#![deny(clippy::all)]

/**
 * Angular Template Symbols - Rust Implementation
 *
 * Maps template nodes to the semantic symbols of their type-check block
 */
pub mod expression_parser;
pub mod parse_util;
pub mod render3;
pub mod typecheck;

pub use typecheck::{SymbolBuilder, SymbolBuilderError, Symbol, SymbolKind, TemplateTypeChecker};
