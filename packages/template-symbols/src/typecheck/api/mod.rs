// TypeCheck API Module

pub mod api;
pub mod checker;
pub mod symbols;

// Re-exports
pub use api::{BindingConsumer, BindingNode, BoundTarget, DirectiveMeta, ReferenceTarget};
pub use checker::TemplateTypeChecker;
pub use symbols::{
    BindingSymbol, BindingTarget, DirectiveSymbol, ElementSymbol, ExpressionSymbol,
    InputBindingSymbol, OutputBindingSymbol, ReferenceSymbol, ReferenceTargetSymbol,
    ShimLocation, Symbol, SymbolKind, TemplateSymbol, VariableSymbol,
};
