// TypeCheck Symbols
//
// Semantic information about template nodes, as resolved against the
// type-check block.

use indexmap::IndexSet;
use serde::{Deserialize, Serialize};
use smallvec::SmallVec;
use ts::{NodeRef, SymbolId, TypeId};

use crate::render3::{Element, Reference, Template, Variable};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum SymbolKind {
    Input,
    Output,
    Binding,
    Reference,
    Variable,
    Directive,
    Element,
    Template,
    Expression,
}

/// A position inside the type-check shim file.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct ShimLocation {
    /// File name of the shim that holds the type-check block.
    pub shim_path: String,
    /// Offset in the shim file where the symbol's evidence was found.
    pub position_in_shim_file: usize,
}

/// A resolved template symbol.
#[derive(Debug, Clone, PartialEq)]
pub enum Symbol<'t> {
    Input(InputBindingSymbol<'t>),
    Output(OutputBindingSymbol<'t>),
    Element(ElementSymbol<'t>),
    Reference(ReferenceSymbol<'t>),
    Expression(ExpressionSymbol),
    Directive(DirectiveSymbol),
    Template(TemplateSymbol<'t>),
    Variable(VariableSymbol<'t>),
}

impl<'t> Symbol<'t> {
    pub fn kind(&self) -> SymbolKind {
        match self {
            Symbol::Input(_) => SymbolKind::Input,
            Symbol::Output(_) => SymbolKind::Output,
            Symbol::Element(_) => SymbolKind::Element,
            Symbol::Reference(_) => SymbolKind::Reference,
            Symbol::Expression(_) => SymbolKind::Expression,
            Symbol::Directive(_) => SymbolKind::Directive,
            Symbol::Template(_) => SymbolKind::Template,
            Symbol::Variable(_) => SymbolKind::Variable,
        }
    }

    /// Location of the symbol in the shim. Binding symbols report their first
    /// binding; templates have no single location.
    pub fn shim_location(&self) -> Option<&ShimLocation> {
        match self {
            Symbol::Input(s) => s.bindings.first().map(|b| &b.shim_location),
            Symbol::Output(s) => s.bindings.first().map(|b| &b.shim_location),
            Symbol::Element(s) => Some(&s.shim_location),
            Symbol::Reference(s) => Some(&s.shim_location),
            Symbol::Expression(s) => Some(&s.shim_location),
            Symbol::Directive(s) => Some(&s.shim_location),
            Symbol::Template(_) => None,
            Symbol::Variable(s) => Some(&s.shim_location),
        }
    }
}

/// Elements, templates and directives a binding can be consumed by.
#[derive(Debug, Clone, PartialEq)]
pub enum BindingTarget<'t> {
    Element(ElementSymbol<'t>),
    Template(TemplateSymbol<'t>),
    Directive(DirectiveSymbol),
}

/// A single input or output field a binding is written to or read from.
#[derive(Debug, Clone, PartialEq)]
pub struct BindingSymbol<'t> {
    pub ts_symbol: SymbolId,
    pub ts_type: TypeId,
    /// The element, template or directive that owns the bound field.
    pub target: BindingTarget<'t>,
    pub shim_location: ShimLocation,
}

impl BindingSymbol<'_> {
    pub fn kind(&self) -> SymbolKind {
        SymbolKind::Binding
    }
}

/// A list of bindings for a single input. Today a binding resolves to a single
/// field even when several directives consume the same input.
// TODO: collect one binding per consuming directive.
#[derive(Debug, Clone, PartialEq)]
pub struct InputBindingSymbol<'t> {
    pub bindings: SmallVec<[BindingSymbol<'t>; 1]>,
}

#[derive(Debug, Clone, PartialEq)]
pub struct OutputBindingSymbol<'t> {
    pub bindings: SmallVec<[BindingSymbol<'t>; 1]>,
}

/// A directive instance matched on an element or template.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct DirectiveSymbol {
    pub ts_symbol: SymbolId,
    pub ts_type: TypeId,
    pub shim_location: ShimLocation,
}

impl DirectiveSymbol {
    pub fn kind(&self) -> SymbolKind {
        SymbolKind::Directive
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct ElementSymbol<'t> {
    pub ts_symbol: SymbolId,
    /// The DOM type of the element.
    pub ts_type: TypeId,
    pub shim_location: ShimLocation,
    /// Directives matched on the element, in declaration order.
    pub directives: IndexSet<DirectiveSymbol>,
    pub template_node: &'t Element,
}

#[derive(Debug, Clone, PartialEq)]
pub struct TemplateSymbol<'t> {
    pub directives: IndexSet<DirectiveSymbol>,
    pub template_node: &'t Template,
}

/// A `let-` declaration on a template.
#[derive(Debug, Clone, PartialEq)]
pub struct VariableSymbol<'t> {
    pub ts_symbol: SymbolId,
    pub ts_type: TypeId,
    pub shim_location: ShimLocation,
    pub declaration: &'t Variable,
}

/// What a template reference (`#ref`) points at.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum ReferenceTargetSymbol<'t> {
    Element(&'t Element),
    Template(&'t Template),
    /// The class declaration of the referenced directive.
    Directive(NodeRef),
}

#[derive(Debug, Clone, PartialEq)]
pub struct ReferenceSymbol<'t> {
    pub ts_symbol: SymbolId,
    pub ts_type: TypeId,
    pub shim_location: ShimLocation,
    pub declaration: &'t Reference,
    pub target: ReferenceTargetSymbol<'t>,
    /// Where the reference's own variable is declared in the shim.
    pub target_location: ShimLocation,
}

/// The meaning of an embedded expression.
#[derive(Debug, Clone, PartialEq)]
pub struct ExpressionSymbol {
    pub ts_symbol: SymbolId,
    pub ts_type: TypeId,
    pub shim_location: ShimLocation,
}
