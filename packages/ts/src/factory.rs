//! Source file construction.
//!
//! [`SourceFileBuilder`] collects nodes bottom-up and prints them on
//! [`finish`](SourceFileBuilder::finish). Printing assigns every node its
//! offsets in the file text and emits the template span and expression
//! identifier of a node as trailing comments (`/*12,34*/`, `/*T:DIR*/`), the
//! same way a generated type-check block carries them.
//!
//! Each node may be used as a child at most once.

use std::fmt::Write;

use crate::node::{
    BinaryOperator, ExpressionIdentifier, NodeData, NodeEntry, NodeId, SourceFile, TextRange,
};

#[derive(Debug, Clone)]
struct PendingNode {
    data: NodeData,
    origin_span: Option<TextRange>,
    identifiers: ExpressionIdentifier,
}

#[derive(Debug, Clone)]
pub struct SourceFileBuilder {
    file_name: String,
    nodes: Vec<PendingNode>,
}

impl SourceFileBuilder {
    pub fn new(file_name: impl Into<String>) -> Self {
        SourceFileBuilder {
            file_name: file_name.into(),
            nodes: Vec::new(),
        }
    }

    pub fn add(&mut self, data: NodeData) -> NodeId {
        let id = NodeId(self.nodes.len() as u32);
        self.nodes.push(PendingNode {
            data,
            origin_span: None,
            identifiers: ExpressionIdentifier::empty(),
        });
        id
    }

    /// Attribute `node` to a span of the template.
    pub fn add_parse_span_info(&mut self, node: NodeId, span: TextRange) -> NodeId {
        if let Some(pending) = self.nodes.get_mut(node.index()) {
            pending.origin_span = Some(span);
        }
        node
    }

    pub fn add_expression_identifier(
        &mut self,
        node: NodeId,
        identifier: ExpressionIdentifier,
    ) -> NodeId {
        if let Some(pending) = self.nodes.get_mut(node.index()) {
            pending.identifiers |= identifier;
        }
        node
    }

    pub fn identifier(&mut self, text: impl Into<String>) -> NodeId {
        self.add(NodeData::Identifier { text: text.into() })
    }

    pub fn string_literal(&mut self, text: impl Into<String>) -> NodeId {
        self.add(NodeData::StringLiteral { text: text.into() })
    }

    pub fn null_keyword(&mut self) -> NodeId {
        self.add(NodeData::NullKeyword)
    }

    pub fn keyword_type(&mut self, keyword: impl Into<String>) -> NodeId {
        self.add(NodeData::KeywordType {
            keyword: keyword.into(),
        })
    }

    /// A type reference from a dotted name, e.g. `i0.MyDir`.
    pub fn type_reference(&mut self, name: &str, type_arguments: Vec<NodeId>) -> NodeId {
        let type_name = self.entity_name(name);
        self.add(NodeData::TypeReference {
            type_name,
            type_arguments,
        })
    }

    /// An identifier or a left-nested qualified name for `a.b.c`.
    pub fn entity_name(&mut self, name: &str) -> NodeId {
        let mut parts = name.split('.');
        let first = parts.next().unwrap_or_default();
        let mut current = self.identifier(first);
        for part in parts {
            let right = self.identifier(part);
            current = self.add(NodeData::QualifiedName {
                left: current,
                right,
            });
        }
        current
    }

    pub fn property_access(&mut self, expression: NodeId, name: &str) -> NodeId {
        let name = self.identifier(name);
        self.add(NodeData::PropertyAccessExpression { expression, name })
    }

    pub fn element_access(&mut self, expression: NodeId, argument_expression: NodeId) -> NodeId {
        self.add(NodeData::ElementAccessExpression {
            expression,
            argument_expression,
        })
    }

    pub fn call(&mut self, expression: NodeId, arguments: Vec<NodeId>) -> NodeId {
        self.add(NodeData::CallExpression {
            expression,
            arguments,
        })
    }

    pub fn paren(&mut self, expression: NodeId) -> NodeId {
        self.add(NodeData::ParenthesizedExpression { expression })
    }

    pub fn conditional(&mut self, condition: NodeId, when_true: NodeId, when_false: NodeId) -> NodeId {
        self.add(NodeData::ConditionalExpression {
            condition,
            when_true,
            when_false,
        })
    }

    pub fn binary(&mut self, left: NodeId, operator: BinaryOperator, right: NodeId) -> NodeId {
        self.add(NodeData::BinaryExpression {
            left,
            operator,
            right,
        })
    }

    pub fn assignment(&mut self, left: NodeId, right: NodeId) -> NodeId {
        self.binary(left, BinaryOperator::Equals, right)
    }

    pub fn as_expression(&mut self, expression: NodeId, type_: NodeId) -> NodeId {
        self.add(NodeData::AsExpression { expression, type_ })
    }

    pub fn non_null(&mut self, expression: NodeId) -> NodeId {
        self.add(NodeData::NonNullExpression { expression })
    }

    pub fn arrow_function(&mut self, parameters: Vec<NodeId>, body: NodeId) -> NodeId {
        self.add(NodeData::ArrowFunction { parameters, body })
    }

    pub fn parameter(&mut self, name: &str, type_: Option<NodeId>) -> NodeId {
        let name = self.identifier(name);
        self.add(NodeData::Parameter { name, type_ })
    }

    pub fn variable_declaration(
        &mut self,
        name: &str,
        type_: Option<NodeId>,
        initializer: Option<NodeId>,
    ) -> NodeId {
        let name = self.identifier(name);
        self.add(NodeData::VariableDeclaration {
            name,
            type_,
            initializer,
        })
    }

    pub fn variable_statement(&mut self, declarations: Vec<NodeId>) -> NodeId {
        self.add(NodeData::VariableStatement { declarations })
    }

    pub fn expression_statement(&mut self, expression: NodeId) -> NodeId {
        self.add(NodeData::ExpressionStatement { expression })
    }

    pub fn block(&mut self, statements: Vec<NodeId>) -> NodeId {
        self.add(NodeData::Block { statements })
    }

    pub fn if_statement(
        &mut self,
        expression: NodeId,
        then_statement: NodeId,
        else_statement: Option<NodeId>,
    ) -> NodeId {
        self.add(NodeData::IfStatement {
            expression,
            then_statement,
            else_statement,
        })
    }

    pub fn function_declaration(
        &mut self,
        name: &str,
        parameters: Vec<NodeId>,
        body: NodeId,
    ) -> NodeId {
        let name = self.identifier(name);
        self.add(NodeData::FunctionDeclaration {
            name: Some(name),
            parameters,
            body: Some(body),
        })
    }

    pub fn class_declaration(&mut self, name: &str, members: Vec<NodeId>) -> NodeId {
        let name = self.identifier(name);
        self.add(NodeData::ClassDeclaration {
            name: Some(name),
            members,
        })
    }

    pub fn property_declaration(&mut self, name: &str, type_: Option<NodeId>) -> NodeId {
        let name = self.identifier(name);
        self.add(NodeData::PropertyDeclaration { name, type_ })
    }

    pub fn type_alias(&mut self, name: &str, type_: NodeId) -> NodeId {
        let name = self.identifier(name);
        self.add(NodeData::TypeAliasDeclaration { name, type_ })
    }

    /// Print the file with `statements` as its top level.
    pub fn finish(mut self, statements: Vec<NodeId>) -> SourceFile {
        let root = self.add(NodeData::SourceFile { statements });

        let mut printer = Printer {
            nodes: &self.nodes,
            out: String::new(),
            ranges: vec![(0, 0); self.nodes.len()],
            indent: 0,
        };
        printer.emit(root);
        let Printer { out, ranges, .. } = printer;

        let mut parents = vec![None; self.nodes.len()];
        for (index, pending) in self.nodes.iter().enumerate() {
            for child in pending.data.children() {
                if let Some(slot) = parents.get_mut(child.index()) {
                    *slot = Some(NodeId(index as u32));
                }
            }
        }

        let nodes = self
            .nodes
            .into_iter()
            .zip(ranges)
            .zip(parents)
            .map(|((pending, (pos, end)), parent)| NodeEntry {
                data: pending.data,
                pos,
                end,
                parent,
                origin_span: pending.origin_span,
                identifiers: pending.identifiers,
            })
            .collect();

        SourceFile {
            file_name: self.file_name,
            text: out,
            nodes,
            root,
        }
    }
}

struct Printer<'b> {
    nodes: &'b [PendingNode],
    out: String,
    ranges: Vec<(usize, usize)>,
    indent: usize,
}

impl Printer<'_> {
    fn emit(&mut self, id: NodeId) {
        let nodes = self.nodes;
        let Some(pending) = nodes.get(id.index()) else {
            return;
        };
        let start = self.out.len();
        self.emit_data(&pending.data);
        let end = self.out.len();
        self.ranges[id.index()] = (start, end);

        if let Some(span) = pending.origin_span {
            write!(self.out, " /*{},{}*/", span.start, span.end).ok();
        }
        for flag in pending.identifiers.iter() {
            if let Some(text) = flag.comment_text() {
                write!(self.out, " /*T:{}*/", text).ok();
            }
        }
    }

    fn emit_list(&mut self, ids: &[NodeId], separator: &str) {
        for (i, id) in ids.iter().enumerate() {
            if i > 0 {
                self.out.push_str(separator);
            }
            self.emit(*id);
        }
    }

    fn newline(&mut self) {
        self.out.push('\n');
        self.out.push_str(&"  ".repeat(self.indent));
    }

    fn emit_statements(&mut self, statements: &[NodeId]) {
        self.out.push('{');
        self.indent += 1;
        for statement in statements {
            self.newline();
            self.emit(*statement);
        }
        self.indent -= 1;
        self.newline();
        self.out.push('}');
    }

    fn emit_data(&mut self, data: &NodeData) {
        match data {
            NodeData::SourceFile { statements } => {
                for (i, statement) in statements.iter().enumerate() {
                    if i > 0 {
                        self.out.push('\n');
                    }
                    self.emit(*statement);
                }
            }
            NodeData::FunctionDeclaration {
                name,
                parameters,
                body,
            } => {
                self.out.push_str("function ");
                if let Some(name) = name {
                    self.emit(*name);
                }
                self.out.push('(');
                self.emit_list(parameters, ", ");
                self.out.push_str(") ");
                match body {
                    Some(body) => self.emit(*body),
                    None => self.out.push(';'),
                }
            }
            NodeData::Parameter { name, type_ } | NodeData::PropertyDeclaration { name, type_ } => {
                self.emit(*name);
                if let Some(type_) = type_ {
                    self.out.push_str(": ");
                    self.emit(*type_);
                }
                if matches!(data, NodeData::PropertyDeclaration { .. }) {
                    self.out.push(';');
                }
            }
            NodeData::Block { statements } => self.emit_statements(statements),
            NodeData::IfStatement {
                expression,
                then_statement,
                else_statement,
            } => {
                self.out.push_str("if (");
                self.emit(*expression);
                self.out.push_str(") ");
                self.emit(*then_statement);
                if let Some(else_statement) = else_statement {
                    self.out.push_str(" else ");
                    self.emit(*else_statement);
                }
            }
            NodeData::VariableStatement { declarations } => {
                self.out.push_str("var ");
                self.emit_list(declarations, ", ");
                self.out.push(';');
            }
            NodeData::VariableDeclaration {
                name,
                type_,
                initializer,
            } => {
                self.emit(*name);
                if let Some(type_) = type_ {
                    self.out.push_str(": ");
                    self.emit(*type_);
                }
                if let Some(initializer) = initializer {
                    self.out.push_str(" = ");
                    self.emit(*initializer);
                }
            }
            NodeData::ExpressionStatement { expression } => {
                self.emit(*expression);
                self.out.push(';');
            }
            NodeData::ClassDeclaration { name, members } => {
                self.out.push_str("class ");
                if let Some(name) = name {
                    self.emit(*name);
                    self.out.push(' ');
                }
                self.emit_statements(members);
            }
            NodeData::TypeAliasDeclaration { name, type_ } => {
                self.out.push_str("type ");
                self.emit(*name);
                self.out.push_str(" = ");
                self.emit(*type_);
                self.out.push(';');
            }
            NodeData::Identifier { text } => self.out.push_str(text),
            NodeData::QualifiedName { left, right } => {
                self.emit(*left);
                self.out.push('.');
                self.emit(*right);
            }
            NodeData::TypeReference {
                type_name,
                type_arguments,
            } => {
                self.emit(*type_name);
                if !type_arguments.is_empty() {
                    self.out.push('<');
                    self.emit_list(type_arguments, ", ");
                    self.out.push('>');
                }
            }
            NodeData::KeywordType { keyword } => self.out.push_str(keyword),
            NodeData::PropertyAccessExpression { expression, name } => {
                self.emit(*expression);
                self.out.push('.');
                self.emit(*name);
            }
            NodeData::ElementAccessExpression {
                expression,
                argument_expression,
            } => {
                self.emit(*expression);
                self.out.push('[');
                self.emit(*argument_expression);
                self.out.push(']');
            }
            NodeData::CallExpression {
                expression,
                arguments,
            } => {
                self.emit(*expression);
                self.out.push('(');
                self.emit_list(arguments, ", ");
                self.out.push(')');
            }
            NodeData::ParenthesizedExpression { expression } => {
                self.out.push('(');
                self.emit(*expression);
                self.out.push(')');
            }
            NodeData::ConditionalExpression {
                condition,
                when_true,
                when_false,
            } => {
                self.emit(*condition);
                self.out.push_str(" ? ");
                self.emit(*when_true);
                self.out.push_str(" : ");
                self.emit(*when_false);
            }
            NodeData::BinaryExpression {
                left,
                operator,
                right,
            } => {
                self.emit(*left);
                write!(self.out, " {} ", operator.as_str()).ok();
                self.emit(*right);
            }
            NodeData::AsExpression { expression, type_ } => {
                self.emit(*expression);
                self.out.push_str(" as ");
                self.emit(*type_);
            }
            NodeData::NonNullExpression { expression } => {
                self.emit(*expression);
                self.out.push('!');
            }
            NodeData::ArrowFunction { parameters, body } => {
                self.out.push('(');
                self.emit_list(parameters, ", ");
                self.out.push_str(") => ");
                self.emit(*body);
            }
            NodeData::StringLiteral { text } => {
                write!(self.out, "\"{}\"", text).ok();
            }
            NodeData::NullKeyword => self.out.push_str("null"),
        }
    }
}
