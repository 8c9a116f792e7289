// TypeCheck Block Search
//
// Span-based lookup of generated type-check block nodes.
//
// Every generated node that corresponds to a template construct is attributed
// with the template span it came from, and some nodes carry expression
// identifiers. These helpers match on both.

use ts::{BinaryOperator, ExpressionIdentifier, Node, TextRange};

/// Options for the span-based node search.
pub struct FindOptions<F> {
    /// Shape predicate a node must satisfy.
    pub filter: F,
    /// When set, the node must be attributed with exactly this template span.
    pub with_span: Option<TextRange>,
}

impl<F> FindOptions<F> {
    pub fn new(filter: F) -> Self {
        FindOptions {
            filter,
            with_span: None,
        }
    }

    pub fn with_span(mut self, span: TextRange) -> Self {
        self.with_span = Some(span);
        self
    }
}

fn matches<'a, F>(node: &Node<'a>, opts: &FindOptions<F>) -> bool
where
    F: Fn(&Node<'a>) -> bool,
{
    if !(opts.filter)(node) {
        return false;
    }
    match opts.with_span {
        Some(span) => node.origin_span() == Some(span),
        None => true,
    }
}

/// Find the first descendant of `tcb`, in document order, that matches.
///
/// The children of a matching node are not searched.
pub fn find_first_matching_node<'a, F>(tcb: Node<'a>, opts: &FindOptions<F>) -> Option<Node<'a>>
where
    F: Fn(&Node<'a>) -> bool,
{
    let mut stack: Vec<Node<'a>> = tcb.children().collect();
    stack.reverse();
    while let Some(node) = stack.pop() {
        if matches(&node, opts) {
            return Some(node);
        }
        let first = stack.len();
        stack.extend(node.children());
        stack[first..].reverse();
    }
    None
}

/// Find all descendants of `tcb` that match, in document order.
///
/// The children of a matching node are not searched.
pub fn find_all_matching_nodes<'a, F>(tcb: Node<'a>, opts: &FindOptions<F>) -> Vec<Node<'a>>
where
    F: Fn(&Node<'a>) -> bool,
{
    let mut results = Vec::new();
    let mut stack: Vec<Node<'a>> = tcb.children().collect();
    stack.reverse();
    while let Some(node) = stack.pop() {
        if matches(&node, opts) {
            results.push(node);
            continue;
        }
        let first = stack.len();
        stack.extend(node.children());
        stack[first..].reverse();
    }
    results
}

pub fn has_expression_identifier(node: &Node<'_>, identifier: ExpressionIdentifier) -> bool {
    node.expression_identifiers().contains(identifier)
}

/// The template span a node was generated from.
pub fn read_span_comment(node: &Node<'_>) -> Option<TextRange> {
    node.origin_span()
}

/// `a = b` in any of its generated forms (`_t1.input = ...`, `_t1["input"] = ...`).
pub fn is_assignment(node: &Node<'_>) -> bool {
    node.operator() == Some(BinaryOperator::Equals)
}
