//! Check-program syntax tree.
//!
//! Source files are flat node arenas. Besides its syntax, every node records
//! where it sits in the printed file text, which template span it was generated
//! from (if any) and the expression identifiers the type-check block generator
//! attached to it.

use bitflags::bitflags;
use serde::{Deserialize, Serialize};
use smallvec::SmallVec;

use crate::program::FileId;

/// Index of a node inside its [`SourceFile`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct NodeId(pub u32);

impl NodeId {
    pub fn index(self) -> usize {
        self.0 as usize
    }
}

/// A node of a specific source file in a [`Program`](crate::Program).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct NodeRef {
    pub file: FileId,
    pub node: NodeId,
}

impl NodeRef {
    pub fn new(file: FileId, node: NodeId) -> Self {
        NodeRef { file, node }
    }
}

/// Offsets `[start, end)` into the template text a check-program node was
/// generated from.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct TextRange {
    pub start: usize,
    pub end: usize,
}

impl TextRange {
    pub fn new(start: usize, end: usize) -> Self {
        TextRange { start, end }
    }
}

bitflags! {
    /// Markers attached to generated nodes whose meaning cannot be recovered
    /// from their syntax.
    #[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
    pub struct ExpressionIdentifier: u8 {
        /// The declaration holds a directive instance.
        const DIRECTIVE = 0b0001;
        const COMPONENT_COMPLETION = 0b0010;
        const EVENT_PARAMETER = 0b0100;
        const VARIABLE_AS_EXPRESSION = 0b1000;
    }
}

impl ExpressionIdentifier {
    /// Text of the `/*T:...*/` comment printed for a single identifier.
    pub fn comment_text(self) -> Option<&'static str> {
        if self == Self::DIRECTIVE {
            Some("DIR")
        } else if self == Self::COMPONENT_COMPLETION {
            Some("COMPCOMP")
        } else if self == Self::EVENT_PARAMETER {
            Some("EP")
        } else if self == Self::VARIABLE_AS_EXPRESSION {
            Some("VAE")
        } else {
            None
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum SyntaxKind {
    SourceFile,
    FunctionDeclaration,
    Parameter,
    Block,
    IfStatement,
    VariableStatement,
    VariableDeclaration,
    ExpressionStatement,
    ClassDeclaration,
    PropertyDeclaration,
    TypeAliasDeclaration,
    Identifier,
    QualifiedName,
    TypeReference,
    KeywordType,
    PropertyAccessExpression,
    ElementAccessExpression,
    CallExpression,
    ParenthesizedExpression,
    ConditionalExpression,
    BinaryExpression,
    AsExpression,
    NonNullExpression,
    ArrowFunction,
    StringLiteral,
    NullKeyword,
}

impl SyntaxKind {
    pub fn is_type_node(self) -> bool {
        matches!(self, SyntaxKind::TypeReference | SyntaxKind::KeywordType)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum BinaryOperator {
    Equals,
    EqualsEqualsEquals,
    ExclamationEqualsEquals,
    AmpersandAmpersand,
    BarBar,
    QuestionQuestion,
    Plus,
    Minus,
    Asterisk,
    Slash,
}

impl BinaryOperator {
    pub fn as_str(self) -> &'static str {
        match self {
            BinaryOperator::Equals => "=",
            BinaryOperator::EqualsEqualsEquals => "===",
            BinaryOperator::ExclamationEqualsEquals => "!==",
            BinaryOperator::AmpersandAmpersand => "&&",
            BinaryOperator::BarBar => "||",
            BinaryOperator::QuestionQuestion => "??",
            BinaryOperator::Plus => "+",
            BinaryOperator::Minus => "-",
            BinaryOperator::Asterisk => "*",
            BinaryOperator::Slash => "/",
        }
    }
}

/// Syntax of a single node. Child references always point into the same file.
#[derive(Debug, Clone, PartialEq)]
pub enum NodeData {
    SourceFile {
        statements: Vec<NodeId>,
    },
    FunctionDeclaration {
        name: Option<NodeId>,
        parameters: Vec<NodeId>,
        body: Option<NodeId>,
    },
    Parameter {
        name: NodeId,
        type_: Option<NodeId>,
    },
    Block {
        statements: Vec<NodeId>,
    },
    IfStatement {
        expression: NodeId,
        then_statement: NodeId,
        else_statement: Option<NodeId>,
    },
    VariableStatement {
        declarations: Vec<NodeId>,
    },
    VariableDeclaration {
        name: NodeId,
        type_: Option<NodeId>,
        initializer: Option<NodeId>,
    },
    ExpressionStatement {
        expression: NodeId,
    },
    ClassDeclaration {
        name: Option<NodeId>,
        members: Vec<NodeId>,
    },
    PropertyDeclaration {
        name: NodeId,
        type_: Option<NodeId>,
    },
    TypeAliasDeclaration {
        name: NodeId,
        type_: NodeId,
    },
    Identifier {
        text: String,
    },
    QualifiedName {
        left: NodeId,
        right: NodeId,
    },
    TypeReference {
        type_name: NodeId,
        type_arguments: Vec<NodeId>,
    },
    KeywordType {
        keyword: String,
    },
    PropertyAccessExpression {
        expression: NodeId,
        name: NodeId,
    },
    ElementAccessExpression {
        expression: NodeId,
        argument_expression: NodeId,
    },
    CallExpression {
        expression: NodeId,
        arguments: Vec<NodeId>,
    },
    ParenthesizedExpression {
        expression: NodeId,
    },
    ConditionalExpression {
        condition: NodeId,
        when_true: NodeId,
        when_false: NodeId,
    },
    BinaryExpression {
        left: NodeId,
        operator: BinaryOperator,
        right: NodeId,
    },
    AsExpression {
        expression: NodeId,
        type_: NodeId,
    },
    NonNullExpression {
        expression: NodeId,
    },
    ArrowFunction {
        parameters: Vec<NodeId>,
        body: NodeId,
    },
    StringLiteral {
        text: String,
    },
    NullKeyword,
}

impl NodeData {
    pub fn kind(&self) -> SyntaxKind {
        match self {
            NodeData::SourceFile { .. } => SyntaxKind::SourceFile,
            NodeData::FunctionDeclaration { .. } => SyntaxKind::FunctionDeclaration,
            NodeData::Parameter { .. } => SyntaxKind::Parameter,
            NodeData::Block { .. } => SyntaxKind::Block,
            NodeData::IfStatement { .. } => SyntaxKind::IfStatement,
            NodeData::VariableStatement { .. } => SyntaxKind::VariableStatement,
            NodeData::VariableDeclaration { .. } => SyntaxKind::VariableDeclaration,
            NodeData::ExpressionStatement { .. } => SyntaxKind::ExpressionStatement,
            NodeData::ClassDeclaration { .. } => SyntaxKind::ClassDeclaration,
            NodeData::PropertyDeclaration { .. } => SyntaxKind::PropertyDeclaration,
            NodeData::TypeAliasDeclaration { .. } => SyntaxKind::TypeAliasDeclaration,
            NodeData::Identifier { .. } => SyntaxKind::Identifier,
            NodeData::QualifiedName { .. } => SyntaxKind::QualifiedName,
            NodeData::TypeReference { .. } => SyntaxKind::TypeReference,
            NodeData::KeywordType { .. } => SyntaxKind::KeywordType,
            NodeData::PropertyAccessExpression { .. } => SyntaxKind::PropertyAccessExpression,
            NodeData::ElementAccessExpression { .. } => SyntaxKind::ElementAccessExpression,
            NodeData::CallExpression { .. } => SyntaxKind::CallExpression,
            NodeData::ParenthesizedExpression { .. } => SyntaxKind::ParenthesizedExpression,
            NodeData::ConditionalExpression { .. } => SyntaxKind::ConditionalExpression,
            NodeData::BinaryExpression { .. } => SyntaxKind::BinaryExpression,
            NodeData::AsExpression { .. } => SyntaxKind::AsExpression,
            NodeData::NonNullExpression { .. } => SyntaxKind::NonNullExpression,
            NodeData::ArrowFunction { .. } => SyntaxKind::ArrowFunction,
            NodeData::StringLiteral { .. } => SyntaxKind::StringLiteral,
            NodeData::NullKeyword => SyntaxKind::NullKeyword,
        }
    }

    /// Direct children in document order.
    pub fn children(&self) -> SmallVec<[NodeId; 4]> {
        let mut out = SmallVec::new();
        match self {
            NodeData::SourceFile { statements } | NodeData::Block { statements } => {
                out.extend(statements.iter().copied());
            }
            NodeData::FunctionDeclaration {
                name,
                parameters,
                body,
            } => {
                out.extend(name.iter().copied());
                out.extend(parameters.iter().copied());
                out.extend(body.iter().copied());
            }
            NodeData::Parameter { name, type_ } | NodeData::PropertyDeclaration { name, type_ } => {
                out.push(*name);
                out.extend(type_.iter().copied());
            }
            NodeData::IfStatement {
                expression,
                then_statement,
                else_statement,
            } => {
                out.push(*expression);
                out.push(*then_statement);
                out.extend(else_statement.iter().copied());
            }
            NodeData::VariableStatement { declarations } => {
                out.extend(declarations.iter().copied());
            }
            NodeData::VariableDeclaration {
                name,
                type_,
                initializer,
            } => {
                out.push(*name);
                out.extend(type_.iter().copied());
                out.extend(initializer.iter().copied());
            }
            NodeData::ExpressionStatement { expression }
            | NodeData::ParenthesizedExpression { expression }
            | NodeData::NonNullExpression { expression } => out.push(*expression),
            NodeData::ClassDeclaration { name, members } => {
                out.extend(name.iter().copied());
                out.extend(members.iter().copied());
            }
            NodeData::TypeAliasDeclaration { name, type_ } => {
                out.push(*name);
                out.push(*type_);
            }
            NodeData::QualifiedName { left, right } => {
                out.push(*left);
                out.push(*right);
            }
            NodeData::TypeReference {
                type_name,
                type_arguments,
            } => {
                out.push(*type_name);
                out.extend(type_arguments.iter().copied());
            }
            NodeData::PropertyAccessExpression { expression, name } => {
                out.push(*expression);
                out.push(*name);
            }
            NodeData::ElementAccessExpression {
                expression,
                argument_expression,
            } => {
                out.push(*expression);
                out.push(*argument_expression);
            }
            NodeData::CallExpression {
                expression,
                arguments,
            } => {
                out.push(*expression);
                out.extend(arguments.iter().copied());
            }
            NodeData::ConditionalExpression {
                condition,
                when_true,
                when_false,
            } => {
                out.push(*condition);
                out.push(*when_true);
                out.push(*when_false);
            }
            NodeData::BinaryExpression { left, right, .. } => {
                out.push(*left);
                out.push(*right);
            }
            NodeData::AsExpression { expression, type_ } => {
                out.push(*expression);
                out.push(*type_);
            }
            NodeData::ArrowFunction { parameters, body } => {
                out.extend(parameters.iter().copied());
                out.push(*body);
            }
            NodeData::Identifier { .. }
            | NodeData::KeywordType { .. }
            | NodeData::StringLiteral { .. }
            | NodeData::NullKeyword => {}
        }
        out
    }
}

#[derive(Debug, Clone)]
pub(crate) struct NodeEntry {
    pub(crate) data: NodeData,
    pub(crate) pos: usize,
    pub(crate) end: usize,
    pub(crate) parent: Option<NodeId>,
    pub(crate) origin_span: Option<TextRange>,
    pub(crate) identifiers: ExpressionIdentifier,
}

/// A printed check-program file.
#[derive(Debug, Clone)]
pub struct SourceFile {
    pub(crate) file_name: String,
    pub(crate) text: String,
    pub(crate) nodes: Vec<NodeEntry>,
    pub(crate) root: NodeId,
}

impl SourceFile {
    pub fn file_name(&self) -> &str {
        &self.file_name
    }

    pub fn text(&self) -> &str {
        &self.text
    }

    pub fn root(&self) -> NodeId {
        self.root
    }

    pub fn node_count(&self) -> usize {
        self.nodes.len()
    }

    pub fn contains(&self, id: NodeId) -> bool {
        id.index() < self.nodes.len()
    }

    pub(crate) fn entry(&self, id: NodeId) -> &NodeEntry {
        &self.nodes[id.index()]
    }
}

/// Borrowed view of one node, tied to the file it lives in.
#[derive(Clone, Copy)]
pub struct Node<'a> {
    file_id: FileId,
    file: &'a SourceFile,
    id: NodeId,
}

impl<'a> Node<'a> {
    pub(crate) fn new(file_id: FileId, file: &'a SourceFile, id: NodeId) -> Self {
        Node { file_id, file, id }
    }

    fn at(&self, id: NodeId) -> Node<'a> {
        Node::new(self.file_id, self.file, id)
    }

    pub fn id(&self) -> NodeId {
        self.id
    }

    pub fn node_ref(&self) -> NodeRef {
        NodeRef::new(self.file_id, self.id)
    }

    pub fn source_file(&self) -> &'a SourceFile {
        self.file
    }

    pub fn data(&self) -> &'a NodeData {
        &self.file.entry(self.id).data
    }

    pub fn kind(&self) -> SyntaxKind {
        self.data().kind()
    }

    /// Offset of the first character of the node in the file text.
    pub fn get_start(&self) -> usize {
        self.file.entry(self.id).pos
    }

    pub fn get_end(&self) -> usize {
        self.file.entry(self.id).end
    }

    pub fn get_text(&self) -> &'a str {
        let entry = self.file.entry(self.id);
        self.file.text.get(entry.pos..entry.end).unwrap_or("")
    }

    pub fn parent(&self) -> Option<Node<'a>> {
        self.file.entry(self.id).parent.map(|id| self.at(id))
    }

    pub fn children(&self) -> impl Iterator<Item = Node<'a>> + 'a {
        let this = *self;
        self.data().children().into_iter().map(move |id| this.at(id))
    }

    /// Template span this node was generated from.
    pub fn origin_span(&self) -> Option<TextRange> {
        self.file.entry(self.id).origin_span
    }

    pub fn expression_identifiers(&self) -> ExpressionIdentifier {
        self.file.entry(self.id).identifiers
    }

    pub fn is_kind(&self, kind: SyntaxKind) -> bool {
        self.kind() == kind
    }

    /// Identifier text, for identifiers only.
    pub fn identifier_text(&self) -> Option<&'a str> {
        match self.data() {
            NodeData::Identifier { text } => Some(text),
            _ => None,
        }
    }

    /// `name` of declarations and property accesses.
    pub fn name(&self) -> Option<Node<'a>> {
        match self.data() {
            NodeData::VariableDeclaration { name, .. }
            | NodeData::Parameter { name, .. }
            | NodeData::PropertyDeclaration { name, .. }
            | NodeData::TypeAliasDeclaration { name, .. }
            | NodeData::PropertyAccessExpression { name, .. } => Some(self.at(*name)),
            NodeData::FunctionDeclaration { name, .. } | NodeData::ClassDeclaration { name, .. } => {
                name.map(|id| self.at(id))
            }
            _ => None,
        }
    }

    /// Type annotation of declarations, or the target type of an `as` expression.
    pub fn type_node(&self) -> Option<Node<'a>> {
        match self.data() {
            NodeData::VariableDeclaration { type_, .. }
            | NodeData::Parameter { type_, .. }
            | NodeData::PropertyDeclaration { type_, .. } => type_.map(|id| self.at(id)),
            NodeData::TypeAliasDeclaration { type_, .. } | NodeData::AsExpression { type_, .. } => {
                Some(self.at(*type_))
            }
            _ => None,
        }
    }

    pub fn initializer(&self) -> Option<Node<'a>> {
        match self.data() {
            NodeData::VariableDeclaration { initializer, .. } => initializer.map(|id| self.at(id)),
            _ => None,
        }
    }

    /// The wrapped or receiving expression of expression-like nodes.
    pub fn expression(&self) -> Option<Node<'a>> {
        match self.data() {
            NodeData::ExpressionStatement { expression }
            | NodeData::IfStatement { expression, .. }
            | NodeData::PropertyAccessExpression { expression, .. }
            | NodeData::ElementAccessExpression { expression, .. }
            | NodeData::CallExpression { expression, .. }
            | NodeData::ParenthesizedExpression { expression }
            | NodeData::AsExpression { expression, .. }
            | NodeData::NonNullExpression { expression } => Some(self.at(*expression)),
            _ => None,
        }
    }

    pub fn argument_expression(&self) -> Option<Node<'a>> {
        match self.data() {
            NodeData::ElementAccessExpression {
                argument_expression,
                ..
            } => Some(self.at(*argument_expression)),
            _ => None,
        }
    }

    pub fn arguments(&self) -> Vec<Node<'a>> {
        match self.data() {
            NodeData::CallExpression { arguments, .. } => {
                arguments.iter().map(|id| self.at(*id)).collect()
            }
            _ => Vec::new(),
        }
    }

    pub fn when_true(&self) -> Option<Node<'a>> {
        match self.data() {
            NodeData::ConditionalExpression { when_true, .. } => Some(self.at(*when_true)),
            _ => None,
        }
    }

    pub fn left(&self) -> Option<Node<'a>> {
        match self.data() {
            NodeData::BinaryExpression { left, .. } | NodeData::QualifiedName { left, .. } => {
                Some(self.at(*left))
            }
            _ => None,
        }
    }

    pub fn right(&self) -> Option<Node<'a>> {
        match self.data() {
            NodeData::BinaryExpression { right, .. } | NodeData::QualifiedName { right, .. } => {
                Some(self.at(*right))
            }
            _ => None,
        }
    }

    pub fn operator(&self) -> Option<BinaryOperator> {
        match self.data() {
            NodeData::BinaryExpression { operator, .. } => Some(*operator),
            _ => None,
        }
    }

    pub fn type_name(&self) -> Option<Node<'a>> {
        match self.data() {
            NodeData::TypeReference { type_name, .. } => Some(self.at(*type_name)),
            _ => None,
        }
    }
}

impl std::fmt::Debug for Node<'_> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Node")
            .field("file", &self.file.file_name)
            .field("id", &self.id)
            .field("kind", &self.kind())
            .field("text", &self.get_text())
            .finish()
    }
}

impl PartialEq for Node<'_> {
    fn eq(&self, other: &Self) -> bool {
        self.file_id == other.file_id && self.id == other.id && std::ptr::eq(self.file, other.file)
    }
}

impl Eq for Node<'_> {}

/// Type guard helpers in the spirit of `ts.isXxx`.
pub fn is_variable_declaration(node: &Node<'_>) -> bool {
    node.is_kind(SyntaxKind::VariableDeclaration)
}

pub fn is_call_expression(node: &Node<'_>) -> bool {
    node.is_kind(SyntaxKind::CallExpression)
}

pub fn is_identifier(node: &Node<'_>) -> bool {
    node.is_kind(SyntaxKind::Identifier)
}

pub fn is_property_access_expression(node: &Node<'_>) -> bool {
    node.is_kind(SyntaxKind::PropertyAccessExpression)
}

pub fn is_conditional_expression(node: &Node<'_>) -> bool {
    node.is_kind(SyntaxKind::ConditionalExpression)
}

pub fn is_class_declaration(node: &Node<'_>) -> bool {
    node.is_kind(SyntaxKind::ClassDeclaration)
}

pub fn is_type_reference_node(node: &Node<'_>) -> bool {
    node.is_kind(SyntaxKind::TypeReference)
}

pub fn is_type_node(node: &Node<'_>) -> bool {
    node.kind().is_type_node()
}

/// Strip any number of parentheses around an expression.
pub fn skip_parentheses(node: Node<'_>) -> Node<'_> {
    let mut node = node;
    while let NodeData::ParenthesizedExpression { .. } = node.data() {
        match node.expression() {
            Some(inner) => node = inner,
            None => break,
        }
    }
    node
}
