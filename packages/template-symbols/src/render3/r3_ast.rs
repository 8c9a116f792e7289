//! Render3 AST
//!
//! Node definitions of the parsed template object model.

use crate::expression_parser::ast::AST;
use crate::parse_util::ParseSourceSpan;

/// Text node
#[derive(Debug, Clone, PartialEq)]
pub struct Text {
    pub value: String,
    pub source_span: ParseSourceSpan,
}

/// Bound text node (interpolation)
#[derive(Debug, Clone, PartialEq)]
pub struct BoundText {
    pub value: AST,
    pub source_span: ParseSourceSpan,
}

/// Static attribute, e.g. `type="text"`. Attributes that match a directive
/// input are type-checked as input bindings.
#[derive(Debug, Clone, PartialEq)]
pub struct TextAttribute {
    pub name: String,
    pub value: String,
    pub source_span: ParseSourceSpan,
    pub key_span: Option<ParseSourceSpan>,
    pub value_span: Option<ParseSourceSpan>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum BindingType {
    Property,
    Attribute,
    Class,
    Style,
    TwoWay,
}

/// Bound attribute node, e.g. `[value]="expr"`
#[derive(Debug, Clone, PartialEq)]
pub struct BoundAttribute {
    pub name: String,
    pub type_: BindingType,
    pub value: AST,
    pub unit: Option<String>,
    pub source_span: ParseSourceSpan,
    pub key_span: ParseSourceSpan,
    pub value_span: Option<ParseSourceSpan>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ParsedEventType {
    Regular,
    Animation,
    TwoWay,
}

/// Bound event node, e.g. `(click)="handler($event)"`
#[derive(Debug, Clone, PartialEq)]
pub struct BoundEvent {
    pub name: String,
    pub type_: ParsedEventType,
    pub handler: AST,
    pub target: Option<String>,
    pub phase: Option<String>,
    pub source_span: ParseSourceSpan,
    pub handler_span: ParseSourceSpan,
    pub key_span: ParseSourceSpan,
}

/// Template variable, e.g. `let-item` or `let i = index`
#[derive(Debug, Clone, PartialEq)]
pub struct Variable {
    pub name: String,
    pub value: String,
    pub source_span: ParseSourceSpan,
    pub key_span: ParseSourceSpan,
    pub value_span: Option<ParseSourceSpan>,
}

/// Template reference, e.g. `#ref` or `#ref="ngModel"`
#[derive(Debug, Clone, PartialEq)]
pub struct Reference {
    pub name: String,
    pub value: String,
    pub source_span: ParseSourceSpan,
    pub key_span: ParseSourceSpan,
    pub value_span: Option<ParseSourceSpan>,
}

#[derive(Debug, Clone, PartialEq)]
pub struct Element {
    pub name: String,
    pub attributes: Vec<TextAttribute>,
    pub inputs: Vec<BoundAttribute>,
    pub outputs: Vec<BoundEvent>,
    pub children: Vec<R3Node>,
    pub references: Vec<Reference>,
    pub source_span: ParseSourceSpan,
    pub start_source_span: Option<ParseSourceSpan>,
    pub end_source_span: Option<ParseSourceSpan>,
}

/// `<ng-template>` or an element carrying a structural directive.
#[derive(Debug, Clone, PartialEq)]
pub struct Template {
    pub tag_name: Option<String>,
    pub attributes: Vec<TextAttribute>,
    pub inputs: Vec<BoundAttribute>,
    pub outputs: Vec<BoundEvent>,
    pub template_attrs: Vec<TemplateAttr>,
    pub children: Vec<R3Node>,
    pub references: Vec<Reference>,
    pub variables: Vec<Variable>,
    pub source_span: ParseSourceSpan,
    pub start_source_span: Option<ParseSourceSpan>,
    pub end_source_span: Option<ParseSourceSpan>,
}

/// Attributes of the structural directive microsyntax (`*ngFor="..."`).
#[derive(Debug, Clone, PartialEq)]
pub enum TemplateAttr {
    Bound(BoundAttribute),
    Text(TextAttribute),
}

/// Child node of an element or template.
#[derive(Debug, Clone, PartialEq)]
pub enum R3Node {
    Element(Element),
    Template(Template),
    Text(Text),
    BoundText(BoundText),
}

impl Element {
    /// The start tag when it was recorded, else the whole element.
    pub fn tag_span(&self) -> ParseSourceSpan {
        self.start_source_span.unwrap_or(self.source_span)
    }
}

impl Template {
    pub fn tag_span(&self) -> ParseSourceSpan {
        self.start_source_span.unwrap_or(self.source_span)
    }
}

/// Any template construct a symbol can be requested for.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum TemplateNode<'t> {
    Element(&'t Element),
    Template(&'t Template),
    Variable(&'t Variable),
    Reference(&'t Reference),
    BoundAttribute(&'t BoundAttribute),
    TextAttribute(&'t TextAttribute),
    BoundEvent(&'t BoundEvent),
    Expression(&'t AST),
}

impl TemplateNode<'_> {
    pub fn kind_name(&self) -> &'static str {
        match self {
            TemplateNode::Element(_) => "Element",
            TemplateNode::Template(_) => "Template",
            TemplateNode::Variable(_) => "Variable",
            TemplateNode::Reference(_) => "Reference",
            TemplateNode::BoundAttribute(_) => "BoundAttribute",
            TemplateNode::TextAttribute(_) => "TextAttribute",
            TemplateNode::BoundEvent(_) => "BoundEvent",
            TemplateNode::Expression(ast) => ast.kind_name(),
        }
    }
}

impl<'t> From<&'t Element> for TemplateNode<'t> {
    fn from(node: &'t Element) -> Self {
        TemplateNode::Element(node)
    }
}

impl<'t> From<&'t Template> for TemplateNode<'t> {
    fn from(node: &'t Template) -> Self {
        TemplateNode::Template(node)
    }
}

impl<'t> From<&'t Variable> for TemplateNode<'t> {
    fn from(node: &'t Variable) -> Self {
        TemplateNode::Variable(node)
    }
}

impl<'t> From<&'t Reference> for TemplateNode<'t> {
    fn from(node: &'t Reference) -> Self {
        TemplateNode::Reference(node)
    }
}

impl<'t> From<&'t BoundAttribute> for TemplateNode<'t> {
    fn from(node: &'t BoundAttribute) -> Self {
        TemplateNode::BoundAttribute(node)
    }
}

impl<'t> From<&'t TextAttribute> for TemplateNode<'t> {
    fn from(node: &'t TextAttribute) -> Self {
        TemplateNode::TextAttribute(node)
    }
}

impl<'t> From<&'t BoundEvent> for TemplateNode<'t> {
    fn from(node: &'t BoundEvent) -> Self {
        TemplateNode::BoundEvent(node)
    }
}

impl<'t> From<&'t AST> for TemplateNode<'t> {
    fn from(node: &'t AST) -> Self {
        TemplateNode::Expression(node)
    }
}
