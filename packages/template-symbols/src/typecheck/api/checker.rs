// TypeCheck Checker API
//
// Template type-checker interface.

use super::symbols::Symbol;
use crate::render3::TemplateNode;

/// Interface for retrieving semantic information about template nodes.
pub trait TemplateTypeChecker<'t> {
    /// Get the `Symbol` of a template node.
    ///
    /// Returns `None` when no information is available at this node: the
    /// type-check block has no counterpart for it, or the counterpart has no
    /// resolvable symbol.
    fn get_symbol_of_node(&self, node: TemplateNode<'t>) -> Option<Symbol<'t>>;
}
