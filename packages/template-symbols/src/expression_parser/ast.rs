/**
 * Angular Expression AST
 *
 * Expression nodes embedded in templates (bindings, interpolations, event
 * handlers). Every node carries its absolute span in the template text.
 */
use serde::{Deserialize, Serialize};
use ts::TextRange;

/// Absolute source span for mapping back to source
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct AbsoluteSourceSpan {
    pub start: usize,
    pub end: usize,
}

impl AbsoluteSourceSpan {
    pub fn new(start: usize, end: usize) -> Self {
        AbsoluteSourceSpan { start, end }
    }

    pub fn to_text_range(&self) -> TextRange {
        TextRange::new(self.start, self.end)
    }
}

/// Main AST enum containing all node types
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type", content = "data")]
pub enum AST {
    EmptyExpr(EmptyExpr),
    ImplicitReceiver(ImplicitReceiver),
    ThisReceiver(ThisReceiver),
    Conditional(Conditional),
    PropertyRead(PropertyRead),
    SafePropertyRead(SafePropertyRead),
    PropertyWrite(PropertyWrite),
    KeyedRead(KeyedRead),
    SafeKeyedRead(SafeKeyedRead),
    KeyedWrite(KeyedWrite),
    BindingPipe(BindingPipe),
    LiteralPrimitive(LiteralPrimitive),
    LiteralArray(LiteralArray),
    Interpolation(Interpolation),
    Binary(Binary),
    PrefixNot(PrefixNot),
    NonNullAssert(NonNullAssert),
    Call(Call),
    SafeCall(SafeCall),
    ParenthesizedExpression(ParenthesizedExpression),
    ASTWithSource(ASTWithSource),
}

/// Empty expression
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct EmptyExpr {
    pub source_span: AbsoluteSourceSpan,
}

/// Implicit receiver (the component instance)
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ImplicitReceiver {
    pub source_span: AbsoluteSourceSpan,
}

/// This receiver (explicit `this`)
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ThisReceiver {
    pub source_span: AbsoluteSourceSpan,
}

/// Ternary conditional (e.g., `condition ? true : false`)
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Conditional {
    pub source_span: AbsoluteSourceSpan,
    pub condition: Box<AST>,
    pub true_exp: Box<AST>,
    pub false_exp: Box<AST>,
}

/// Property read (e.g., `obj.property`)
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PropertyRead {
    pub source_span: AbsoluteSourceSpan,
    pub name_span: AbsoluteSourceSpan,
    pub receiver: Box<AST>,
    pub name: String,
}

/// Safe property read (e.g., `obj?.property`)
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SafePropertyRead {
    pub source_span: AbsoluteSourceSpan,
    pub name_span: AbsoluteSourceSpan,
    pub receiver: Box<AST>,
    pub name: String,
}

/// Property write (e.g., `obj.property = value`)
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PropertyWrite {
    pub source_span: AbsoluteSourceSpan,
    pub name_span: AbsoluteSourceSpan,
    pub receiver: Box<AST>,
    pub name: String,
    pub value: Box<AST>,
}

/// Keyed read (e.g., `obj[key]`)
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct KeyedRead {
    pub source_span: AbsoluteSourceSpan,
    pub receiver: Box<AST>,
    pub key: Box<AST>,
}

/// Safe keyed read (e.g., `obj?.[key]`)
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SafeKeyedRead {
    pub source_span: AbsoluteSourceSpan,
    pub receiver: Box<AST>,
    pub key: Box<AST>,
}

/// Keyed write (e.g., `obj[key] = value`)
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct KeyedWrite {
    pub source_span: AbsoluteSourceSpan,
    pub receiver: Box<AST>,
    pub key: Box<AST>,
    pub value: Box<AST>,
}

/// Pipe binding (e.g., `value | pipeName:arg1:arg2`)
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct BindingPipe {
    pub source_span: AbsoluteSourceSpan,
    pub name_span: AbsoluteSourceSpan,
    pub exp: Box<AST>,
    pub name: String,
    pub args: Vec<AST>,
}

/// Literal primitive (string, number, boolean, null)
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct LiteralPrimitive {
    pub source_span: AbsoluteSourceSpan,
    pub value: LiteralValue,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub enum LiteralValue {
    String(String),
    Number(f64),
    Boolean(bool),
    Null,
    Undefined,
}

/// Literal array (e.g., `[a, b]`)
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct LiteralArray {
    pub source_span: AbsoluteSourceSpan,
    pub expressions: Vec<AST>,
}

/// Interpolation (e.g., `{{ a }} and {{ b }}`)
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Interpolation {
    pub source_span: AbsoluteSourceSpan,
    pub strings: Vec<String>,
    pub expressions: Vec<AST>,
}

/// Binary operation (e.g., `a + b`)
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Binary {
    pub source_span: AbsoluteSourceSpan,
    pub operation: String,
    pub left: Box<AST>,
    pub right: Box<AST>,
}

/// Logical not (e.g., `!a`)
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PrefixNot {
    pub source_span: AbsoluteSourceSpan,
    pub expression: Box<AST>,
}

/// Non-null assertion (e.g., `expr!`)
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct NonNullAssert {
    pub source_span: AbsoluteSourceSpan,
    pub expression: Box<AST>,
}

/// Function call (e.g., `fn(a, b)` or `obj.method(a)`)
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Call {
    pub source_span: AbsoluteSourceSpan,
    pub receiver: Box<AST>,
    pub args: Vec<AST>,
    pub argument_span: AbsoluteSourceSpan,
}

/// Safe function call (e.g., `fn?.(a, b)`)
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SafeCall {
    pub source_span: AbsoluteSourceSpan,
    pub receiver: Box<AST>,
    pub args: Vec<AST>,
    pub argument_span: AbsoluteSourceSpan,
}

/// Parenthesized expression (e.g., `(a)`)
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ParenthesizedExpression {
    pub source_span: AbsoluteSourceSpan,
    pub expression: Box<AST>,
}

/// AST with source location info
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ASTWithSource {
    pub ast: Box<AST>,
    pub source: Option<String>,
    pub location: String,
    pub absolute_offset: usize,
}

impl ASTWithSource {
    pub fn new(ast: AST, source: Option<String>, location: String, absolute_offset: usize) -> Self {
        ASTWithSource {
            ast: Box::new(ast),
            source,
            location,
            absolute_offset,
        }
    }
}

// Helper constructors
impl AST {
    pub fn implicit_receiver(source_span: AbsoluteSourceSpan) -> AST {
        AST::ImplicitReceiver(ImplicitReceiver { source_span })
    }

    pub fn property_read(
        source_span: AbsoluteSourceSpan,
        name_span: AbsoluteSourceSpan,
        receiver: AST,
        name: impl Into<String>,
    ) -> AST {
        AST::PropertyRead(PropertyRead {
            source_span,
            name_span,
            receiver: Box::new(receiver),
            name: name.into(),
        })
    }

    pub fn safe_property_read(
        source_span: AbsoluteSourceSpan,
        name_span: AbsoluteSourceSpan,
        receiver: AST,
        name: impl Into<String>,
    ) -> AST {
        AST::SafePropertyRead(SafePropertyRead {
            source_span,
            name_span,
            receiver: Box::new(receiver),
            name: name.into(),
        })
    }

    pub fn call(
        source_span: AbsoluteSourceSpan,
        receiver: AST,
        args: Vec<AST>,
        argument_span: AbsoluteSourceSpan,
    ) -> AST {
        AST::Call(Call {
            source_span,
            receiver: Box::new(receiver),
            args,
            argument_span,
        })
    }

    pub fn literal(source_span: AbsoluteSourceSpan, value: LiteralValue) -> AST {
        AST::LiteralPrimitive(LiteralPrimitive { source_span, value })
    }

    /// Absolute span of the expression. A source wrapper reports the span of
    /// the expression it wraps.
    pub fn source_span(&self) -> AbsoluteSourceSpan {
        match self {
            AST::EmptyExpr(e) => e.source_span,
            AST::ImplicitReceiver(e) => e.source_span,
            AST::ThisReceiver(e) => e.source_span,
            AST::Conditional(e) => e.source_span,
            AST::PropertyRead(e) => e.source_span,
            AST::SafePropertyRead(e) => e.source_span,
            AST::PropertyWrite(e) => e.source_span,
            AST::KeyedRead(e) => e.source_span,
            AST::SafeKeyedRead(e) => e.source_span,
            AST::KeyedWrite(e) => e.source_span,
            AST::BindingPipe(e) => e.source_span,
            AST::LiteralPrimitive(e) => e.source_span,
            AST::LiteralArray(e) => e.source_span,
            AST::Interpolation(e) => e.source_span,
            AST::Binary(e) => e.source_span,
            AST::PrefixNot(e) => e.source_span,
            AST::NonNullAssert(e) => e.source_span,
            AST::Call(e) => e.source_span,
            AST::SafeCall(e) => e.source_span,
            AST::ParenthesizedExpression(e) => e.source_span,
            AST::ASTWithSource(e) => e.ast.source_span(),
        }
    }

    /// Span of the name part of named accesses and pipes.
    pub fn name_span(&self) -> Option<AbsoluteSourceSpan> {
        match self {
            AST::PropertyRead(e) => Some(e.name_span),
            AST::SafePropertyRead(e) => Some(e.name_span),
            AST::PropertyWrite(e) => Some(e.name_span),
            AST::BindingPipe(e) => Some(e.name_span),
            _ => None,
        }
    }

    /// `a?.b()`: a call whose callee is a safe property read.
    pub fn is_safe_method_call(&self) -> bool {
        matches!(self, AST::Call(call) if matches!(*call.receiver, AST::SafePropertyRead(_)))
    }

    pub fn kind_name(&self) -> &'static str {
        match self {
            AST::EmptyExpr(_) => "EmptyExpr",
            AST::ImplicitReceiver(_) => "ImplicitReceiver",
            AST::ThisReceiver(_) => "ThisReceiver",
            AST::Conditional(_) => "Conditional",
            AST::PropertyRead(_) => "PropertyRead",
            AST::SafePropertyRead(_) => "SafePropertyRead",
            AST::PropertyWrite(_) => "PropertyWrite",
            AST::KeyedRead(_) => "KeyedRead",
            AST::SafeKeyedRead(_) => "SafeKeyedRead",
            AST::KeyedWrite(_) => "KeyedWrite",
            AST::BindingPipe(_) => "BindingPipe",
            AST::LiteralPrimitive(_) => "LiteralPrimitive",
            AST::LiteralArray(_) => "LiteralArray",
            AST::Interpolation(_) => "Interpolation",
            AST::Binary(_) => "Binary",
            AST::PrefixNot(_) => "PrefixNot",
            AST::NonNullAssert(_) => "NonNullAssert",
            AST::Call(_) => "Call",
            AST::SafeCall(_) => "SafeCall",
            AST::ParenthesizedExpression(_) => "ParenthesizedExpression",
            AST::ASTWithSource(_) => "ASTWithSource",
        }
    }
}
