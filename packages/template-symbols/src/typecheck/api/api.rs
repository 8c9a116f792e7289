// TypeCheck API
//
// Inputs shared by template type-checking consumers: directive metadata and
// the binding graph of a template.

use std::fmt::Debug;

use ts::NodeRef;

use crate::expression_parser::AST;
use crate::render3::{
    BoundAttribute, BoundEvent, Element, Reference, Template, TemplateNode, TextAttribute,
};

/// Metadata of a directive matched somewhere in the template.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DirectiveMeta {
    pub name: String,
    /// Declaration of the directive in the user program. Usually a class
    /// declaration.
    pub declaration: NodeRef,
}

/// A template binding whose consumer can be looked up.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum BindingNode<'t> {
    BoundAttribute(&'t BoundAttribute),
    TextAttribute(&'t TextAttribute),
    BoundEvent(&'t BoundEvent),
}

/// The owner of a binding: the element or template itself for native DOM
/// bindings, otherwise the directive that declares the input or output.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum BindingConsumer<'t> {
    Element(&'t Element),
    Template(&'t Template),
    Directive(&'t DirectiveMeta),
}

/// What a template reference points at.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum ReferenceTarget<'t> {
    Element(&'t Element),
    Template(&'t Template),
    Directive {
        directive: &'t DirectiveMeta,
        node: TemplateNode<'t>,
    },
}

/// Binding graph of a single template.
pub trait BoundTarget<'t>: Debug {
    fn get_consumer_of_binding(&self, binding: BindingNode<'t>) -> Option<BindingConsumer<'t>>;

    fn get_reference_target(&self, reference: &'t Reference) -> Option<ReferenceTarget<'t>>;

    /// The variable or reference an expression reads, e.g. `item` in
    /// `{{ item.name }}` when `item` is a `let-item` variable.
    fn get_expression_target(&self, expression: &'t AST) -> Option<TemplateNode<'t>>;
}
