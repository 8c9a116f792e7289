use crate::node::NodeRef;
use serde::{Deserialize, Serialize};
use std::fmt::Debug;

/// Opaque handle to a symbol owned by a [`TypeChecker`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct SymbolId(pub u32);

/// Opaque handle to a type owned by a [`TypeChecker`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct TypeId(pub u32);

/// Semantic queries over a fully checked [`Program`](crate::Program).
pub trait TypeChecker: Debug {
    fn get_symbol_at_location(&self, node: NodeRef) -> Option<SymbolId>;
    /// Never absent; unresolvable locations report an `unknown` type.
    fn get_type_at_location(&self, node: NodeRef) -> TypeId;
    fn get_symbol_declarations(&self, symbol: SymbolId) -> Vec<NodeRef>;
    /// The symbol a type was declared by, e.g. the class of an instance type.
    fn get_type_symbol(&self, ty: TypeId) -> Option<SymbolId>;
}
