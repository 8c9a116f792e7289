// TypeCheck Test Utilities
//
// A component template, its generated type-check block and in-memory fakes of
// the semantic oracle and the binding graph.

use std::collections::HashMap;

use ts::{
    ExpressionIdentifier, FileId, Node, NodeData, NodeId, NodeRef, Program, SourceFileBuilder,
    SymbolId, TextRange, TypeChecker, TypeId,
};

use crate::expression_parser::{AbsoluteSourceSpan, BindingPipe, LiteralValue, PropertyWrite, AST};
use crate::parse_util::ParseSourceSpan;
use crate::render3::{
    BindingType, BoundAttribute, BoundEvent, Element, ParsedEventType, Reference, Template,
    TemplateNode, TextAttribute, Variable,
};
use crate::typecheck::api::{
    BindingConsumer, BindingNode, BoundTarget, DirectiveMeta, ReferenceTarget,
};
use crate::typecheck::src::SymbolBuilder;

pub const SHIM_PATH: &str = "/app.ngtypecheck.ts";
pub const USER_PATH: &str = "/app.ts";

pub fn span(start: usize, end: usize) -> ParseSourceSpan {
    ParseSourceSpan::new(start, end)
}

pub fn abs(start: usize, end: usize) -> AbsoluteSourceSpan {
    AbsoluteSourceSpan::new(start, end)
}

fn range(start: usize, end: usize) -> TextRange {
    TextRange::new(start, end)
}

// ============================================================================
// Semantic oracle
// ============================================================================

pub const UNKNOWN_TYPE: TypeId = TypeId(0);

#[derive(Debug, Default)]
pub struct FakeTypeChecker {
    symbols_at: HashMap<NodeRef, SymbolId>,
    types_at: HashMap<NodeRef, TypeId>,
    declarations: HashMap<SymbolId, Vec<NodeRef>>,
    symbol_names: HashMap<SymbolId, String>,
    type_symbols: HashMap<TypeId, SymbolId>,
    type_names: HashMap<TypeId, String>,
}

impl FakeTypeChecker {
    pub fn new() -> Self {
        let mut checker = FakeTypeChecker::default();
        checker.type_names.insert(UNKNOWN_TYPE, "unknown".to_string());
        checker
    }

    pub fn define_symbol(&mut self, name: &str, declarations: Vec<NodeRef>) -> SymbolId {
        let id = SymbolId(self.symbol_names.len() as u32 + 1);
        self.symbol_names.insert(id, name.to_string());
        self.declarations.insert(id, declarations);
        id
    }

    pub fn define_type(&mut self, name: &str, symbol: Option<SymbolId>) -> TypeId {
        let id = TypeId(self.type_names.len() as u32);
        self.type_names.insert(id, name.to_string());
        if let Some(symbol) = symbol {
            self.type_symbols.insert(id, symbol);
        }
        id
    }

    pub fn bind(&mut self, node: NodeRef, symbol: Option<SymbolId>, ty: Option<TypeId>) {
        if let Some(symbol) = symbol {
            self.symbols_at.insert(node, symbol);
        }
        if let Some(ty) = ty {
            self.types_at.insert(node, ty);
        }
    }

    pub fn symbol_name(&self, symbol: SymbolId) -> &str {
        self.symbol_names.get(&symbol).map_or("", String::as_str)
    }

    pub fn type_name(&self, ty: TypeId) -> &str {
        self.type_names.get(&ty).map_or("", String::as_str)
    }
}

impl TypeChecker for FakeTypeChecker {
    fn get_symbol_at_location(&self, node: NodeRef) -> Option<SymbolId> {
        self.symbols_at.get(&node).copied()
    }

    fn get_type_at_location(&self, node: NodeRef) -> TypeId {
        self.types_at.get(&node).copied().unwrap_or(UNKNOWN_TYPE)
    }

    fn get_symbol_declarations(&self, symbol: SymbolId) -> Vec<NodeRef> {
        self.declarations.get(&symbol).cloned().unwrap_or_default()
    }

    fn get_type_symbol(&self, ty: TypeId) -> Option<SymbolId> {
        self.type_symbols.get(&ty).copied()
    }
}

// ============================================================================
// Binding graph
// ============================================================================

#[derive(Debug, Default)]
pub struct FakeBoundTarget<'t> {
    consumers: Vec<(BindingNode<'t>, BindingConsumer<'t>)>,
    references: Vec<(&'t Reference, ReferenceTarget<'t>)>,
    expressions: Vec<(&'t AST, TemplateNode<'t>)>,
}

impl<'t> FakeBoundTarget<'t> {
    pub fn consume(&mut self, binding: BindingNode<'t>, consumer: BindingConsumer<'t>) {
        self.consumers.push((binding, consumer));
    }

    pub fn refer(&mut self, reference: &'t Reference, target: ReferenceTarget<'t>) {
        self.references.push((reference, target));
    }

    pub fn read(&mut self, expression: &'t AST, target: TemplateNode<'t>) {
        self.expressions.push((expression, target));
    }
}

fn same_binding(a: BindingNode<'_>, b: BindingNode<'_>) -> bool {
    match (a, b) {
        (BindingNode::BoundAttribute(a), BindingNode::BoundAttribute(b)) => std::ptr::eq(a, b),
        (BindingNode::TextAttribute(a), BindingNode::TextAttribute(b)) => std::ptr::eq(a, b),
        (BindingNode::BoundEvent(a), BindingNode::BoundEvent(b)) => std::ptr::eq(a, b),
        _ => false,
    }
}

impl<'t> BoundTarget<'t> for FakeBoundTarget<'t> {
    fn get_consumer_of_binding(&self, binding: BindingNode<'t>) -> Option<BindingConsumer<'t>> {
        self.consumers
            .iter()
            .find(|(candidate, _)| same_binding(*candidate, binding))
            .map(|(_, consumer)| *consumer)
    }

    fn get_reference_target(&self, reference: &'t Reference) -> Option<ReferenceTarget<'t>> {
        self.references
            .iter()
            .find(|(candidate, _)| std::ptr::eq(*candidate, reference))
            .map(|(_, target)| *target)
    }

    fn get_expression_target(&self, expression: &'t AST) -> Option<TemplateNode<'t>> {
        self.expressions
            .iter()
            .find(|(candidate, _)| std::ptr::eq(*candidate, expression))
            .map(|(_, target)| *target)
    }
}

// ============================================================================
// Template
// ============================================================================

/// Template nodes of
///
/// ```html
/// <div dir gen-dir [inputA]="name" [id]="name" title="hi" [foo]="name" [bar]="name"
///      (outputA)="handle($event)" (click)="onClick($event)"
///      #myRef="dir" #divRef #aliasRef="alias" #bareRef></div>
/// <ng-template ngFor let-item [ngForOf]="items"></ng-template>
/// <ng-template></ng-template>
/// ```
///
/// plus free-standing expressions. Spans are chosen to line up with the
/// type-check block of [`TcbFixture`].
#[derive(Debug)]
pub struct TemplateFixture {
    pub div: Element,
    pub ng_for: Template,
    pub bare_template: Template,
    /// `name`
    pub name_read: AST,
    /// `name`, wrapped in its source
    pub wrapped_name_read: AST,
    /// `user?.name`
    pub safe_read: AST,
    /// `user?.getName()`
    pub safe_call: AST,
    /// `name | upper`
    pub pipe: AST,
    /// `name = $event`
    pub write: AST,
    /// `'abc'`
    pub literal: AST,
    /// `item`
    pub item_read: AST,
    /// An expression that was never type-checked.
    pub missing: AST,
}

fn name_read(start: usize) -> AST {
    AST::property_read(
        abs(start, start + 4),
        abs(start, start + 4),
        AST::implicit_receiver(abs(start, start)),
        "name",
    )
}

fn bound_attribute(name: &str, source_span: ParseSourceSpan) -> BoundAttribute {
    BoundAttribute {
        name: name.to_string(),
        type_: BindingType::Property,
        value: name_read(source_span.end.saturating_sub(5)),
        unit: None,
        source_span,
        key_span: span(source_span.start + 1, source_span.start + 1 + name.len()),
        value_span: None,
    }
}

fn bound_event(name: &str, source_span: ParseSourceSpan) -> BoundEvent {
    BoundEvent {
        name: name.to_string(),
        type_: ParsedEventType::Regular,
        handler: AST::implicit_receiver(abs(source_span.end, source_span.end)),
        target: None,
        phase: None,
        source_span,
        handler_span: source_span,
        key_span: span(source_span.start + 1, source_span.start + 1 + name.len()),
    }
}

fn reference(name: &str, value: &str, source_span: ParseSourceSpan) -> Reference {
    Reference {
        name: name.to_string(),
        value: value.to_string(),
        source_span,
        key_span: span(source_span.start + 1, source_span.start + 1 + name.len()),
        value_span: None,
    }
}

fn template(tag: ParseSourceSpan, source_span: ParseSourceSpan, variables: Vec<Variable>) -> Template {
    Template {
        tag_name: Some("ng-template".to_string()),
        attributes: vec![],
        inputs: vec![],
        outputs: vec![],
        template_attrs: vec![],
        children: vec![],
        references: vec![],
        variables,
        source_span,
        start_source_span: Some(tag),
        end_source_span: None,
    }
}

impl TemplateFixture {
    pub fn new() -> Self {
        let div = Element {
            name: "div".to_string(),
            attributes: vec![TextAttribute {
                name: "title".to_string(),
                value: "hi".to_string(),
                source_span: span(31, 41),
                key_span: Some(span(31, 36)),
                value_span: Some(span(38, 40)),
            }],
            inputs: vec![
                bound_attribute("inputA", span(5, 20)),
                bound_attribute("id", span(21, 30)),
                bound_attribute("foo", span(42, 50)),
                bound_attribute("bar", span(121, 130)),
            ],
            outputs: vec![
                bound_event("outputA", span(51, 70)),
                bound_event("click", span(71, 85)),
            ],
            children: vec![],
            references: vec![
                reference("myRef", "dir", span(86, 100)),
                reference("divRef", "", span(101, 110)),
                reference("aliasRef", "alias", span(111, 120)),
                reference("bareRef", "", span(131, 140)),
            ],
            source_span: span(0, 200),
            start_source_span: Some(span(0, 60)),
            end_source_span: Some(span(194, 200)),
        };

        let item = Variable {
            name: "item".to_string(),
            value: "$implicit".to_string(),
            source_span: span(310, 320),
            key_span: span(314, 318),
            value_span: None,
        };

        let user_read = |start: usize| {
            AST::property_read(
                abs(start, start + 4),
                abs(start, start + 4),
                AST::implicit_receiver(abs(start, start)),
                "user",
            )
        };

        TemplateFixture {
            div,
            ng_for: template(span(300, 360), span(300, 500), vec![item]),
            bare_template: template(span(600, 620), span(600, 640), vec![]),
            name_read: name_read(15),
            wrapped_name_read: AST::ASTWithSource(crate::expression_parser::ASTWithSource::new(
                name_read(15),
                Some("name".to_string()),
                "app.html".to_string(),
                15,
            )),
            safe_read: AST::safe_property_read(abs(700, 710), abs(706, 710), user_read(700), "name"),
            safe_call: AST::call(
                abs(720, 735),
                AST::safe_property_read(abs(720, 733), abs(726, 733), user_read(720), "getName"),
                vec![],
                abs(734, 734),
            ),
            pipe: AST::BindingPipe(BindingPipe {
                source_span: abs(740, 752),
                name_span: abs(747, 752),
                exp: Box::new(name_read(740)),
                name: "upper".to_string(),
                args: vec![],
            }),
            write: AST::PropertyWrite(PropertyWrite {
                source_span: abs(760, 772),
                name_span: abs(760, 764),
                receiver: Box::new(AST::implicit_receiver(abs(760, 760))),
                name: "name".to_string(),
                value: Box::new(AST::property_read(
                    abs(766, 772),
                    abs(766, 772),
                    AST::implicit_receiver(abs(766, 766)),
                    "$event",
                )),
            }),
            literal: AST::literal(abs(780, 785), LiteralValue::String("abc".to_string())),
            item_read: AST::property_read(
                abs(790, 794),
                abs(790, 794),
                AST::implicit_receiver(abs(790, 790)),
                "item",
            ),
            missing: AST::property_read(
                abs(800, 807),
                abs(800, 807),
                AST::implicit_receiver(abs(800, 800)),
                "missing",
            ),
        }
    }

    pub fn input(&self, name: &str) -> &BoundAttribute {
        self.div
            .inputs
            .iter()
            .find(|input| input.name == name)
            .unwrap()
    }

    pub fn output(&self, name: &str) -> &BoundEvent {
        self.div
            .outputs
            .iter()
            .find(|output| output.name == name)
            .unwrap()
    }

    pub fn reference(&self, name: &str) -> &Reference {
        self.div
            .references
            .iter()
            .find(|reference| reference.name == name)
            .unwrap()
    }

    pub fn item(&self) -> &Variable {
        &self.ng_for.variables[0]
    }
}

/// The binding graph of [`TemplateFixture`]. `[foo]` is consumed by `MyDir`
/// but was never type-checked.
pub fn bound_target<'t>(template: &'t TemplateFixture, tcb: &'t TcbFixture) -> FakeBoundTarget<'t> {
    let mut bound = FakeBoundTarget::default();
    let my_dir = BindingConsumer::Directive(&tcb.my_dir);

    bound.consume(BindingNode::BoundAttribute(template.input("inputA")), my_dir);
    bound.consume(
        BindingNode::BoundAttribute(template.input("id")),
        BindingConsumer::Element(&template.div),
    );
    bound.consume(BindingNode::BoundAttribute(template.input("foo")), my_dir);
    bound.consume(BindingNode::BoundAttribute(template.input("bar")), my_dir);
    bound.consume(BindingNode::TextAttribute(&template.div.attributes[0]), my_dir);
    bound.consume(BindingNode::BoundEvent(template.output("outputA")), my_dir);
    bound.consume(
        BindingNode::BoundEvent(template.output("click")),
        BindingConsumer::Element(&template.div),
    );

    bound.refer(
        template.reference("myRef"),
        ReferenceTarget::Directive {
            directive: &tcb.my_dir,
            node: TemplateNode::Element(&template.div),
        },
    );
    bound.refer(
        template.reference("divRef"),
        ReferenceTarget::Element(&template.div),
    );
    bound.refer(
        template.reference("bareRef"),
        ReferenceTarget::Element(&template.div),
    );
    bound.refer(
        template.reference("aliasRef"),
        ReferenceTarget::Directive {
            directive: &tcb.alias_dir,
            node: TemplateNode::Element(&template.div),
        },
    );

    bound.read(&template.item_read, TemplateNode::Variable(template.item()));
    bound
}

// ============================================================================
// Type-check block
// ============================================================================

/// Symbols and types the fake oracle knows about.
#[derive(Debug)]
pub struct FixtureSymbols {
    pub my_dir: SymbolId,
    pub my_dir_type: TypeId,
    pub gen_dir: SymbolId,
    pub gen_dir_type: TypeId,
    pub html_div: SymbolId,
    pub html_div_type: TypeId,
    pub ng_for_of: SymbolId,
    pub ng_for_of_type: TypeId,
    pub string_type: TypeId,
    pub input_a: SymbolId,
    pub id: SymbolId,
    pub title: SymbolId,
    pub bar: SymbolId,
    pub output_a: SymbolId,
    pub event_emitter_type: TypeId,
    pub my_ref: SymbolId,
    pub div_ref: SymbolId,
    pub item: SymbolId,
    pub item_type: TypeId,
    pub name: SymbolId,
    pub user_name: SymbolId,
    pub optional_name_type: TypeId,
    pub get_name: SymbolId,
    pub optional_get_name_type: TypeId,
    pub transform: SymbolId,
    pub transform_type: TypeId,
}

/// A program with a user file and the type-check shim of [`TemplateFixture`]:
///
/// ```text
/// function _tcb1(ctx: i0.AppComponent) {
///   var _t1: i0.MyDir /*0,60*/ /*T:DIR*/ = null!;
///   var _t2 /*0,60*/ /*T:DIR*/ = _ctor1(null!);
///   var _t3 = document.createElement("div") /*0,60*/;
///   _t1.inputA = ctx.name /*15,19*/ /*5,20*/;
///   _t3["id"] = ctx.name /*21,30*/;
///   _t1.title = "hi" /*31,41*/;
///   ctx.bar = ctx.name /*121,130*/;
///   _outputHelper(_t1["outputA"]).subscribe(($event) => ctx.handle($event)) /*51,70*/;
///   _t3.addEventListener("click", ($event) => ctx.onClick($event)) /*71,85*/;
///   var _t4 = _t1 /*86,100*/;
///   var _t5 = _t3 /*101,110*/;
///   var _t6 = _t1 /*111,120*/;
///   var _t9 /*131,140*/;
///   var _t7: i0.NgForOf<any> /*300,360*/ /*T:DIR*/ = null!;
///   if (true) {
///     var _t8 = _t7.$implicit /*310,320*/;
///   }
///   (null as any ? ctx.user!.name : undefined) /*700,710*/;
///   (null as any ? ctx.user!.getName() : undefined) /*720,735*/;
///   _pipe1.transform(ctx.name) /*740,752*/;
///   ctx.name /*760,764*/ = $event;
///   "abc" /*780,785*/;
/// }
/// ```
#[derive(Debug)]
pub struct TcbFixture {
    pub program: Program,
    pub checker: FakeTypeChecker,
    pub user_file: FileId,
    pub shim: FileId,
    pub tcb: NodeRef,
    pub my_dir: DirectiveMeta,
    pub alias_dir: DirectiveMeta,
    pub symbols: FixtureSymbols,
}

fn null_bang(b: &mut SourceFileBuilder) -> NodeId {
    let null = b.null_keyword();
    b.non_null(null)
}

fn ctx_name(b: &mut SourceFileBuilder) -> NodeId {
    let ctx = b.identifier("ctx");
    b.property_access(ctx, "name")
}

fn event_handler(b: &mut SourceFileBuilder, method: &str) -> NodeId {
    let event = b.parameter("$event", None);
    let ctx = b.identifier("ctx");
    let callee = b.property_access(ctx, method);
    let argument = b.identifier("$event");
    let body = b.call(callee, vec![argument]);
    b.arrow_function(vec![event], body)
}

fn alias_declaration(b: &mut SourceFileBuilder, name: &str, target: &str, span: TextRange) -> NodeId {
    let initializer = b.identifier(target);
    let declaration = b.variable_declaration(name, None, Some(initializer));
    b.add_parse_span_info(declaration, span);
    b.variable_statement(vec![declaration])
}

/// `(null as any ? <when_true> : undefined)`
fn safe_access(b: &mut SourceFileBuilder, when_true: NodeId, span: TextRange) -> NodeId {
    let null = b.null_keyword();
    let any = b.keyword_type("any");
    let condition = b.as_expression(null, any);
    let undefined = b.identifier("undefined");
    let conditional = b.conditional(condition, when_true, undefined);
    let paren = b.paren(conditional);
    b.add_parse_span_info(paren, span);
    b.expression_statement(paren)
}

fn user_access(b: &mut SourceFileBuilder, member: &str) -> NodeId {
    let ctx = b.identifier("ctx");
    let user = b.property_access(ctx, "user");
    let user = b.non_null(user);
    b.property_access(user, member)
}

impl TcbFixture {
    pub fn new() -> Self {
        let mut program = Program::new();

        // User code.
        let mut u = SourceFileBuilder::new(USER_PATH);
        let string = u.keyword_type("string");
        let input_a_decl = u.property_declaration("inputA", Some(string));
        let string = u.keyword_type("string");
        let title_decl = u.property_declaration("title", Some(string));
        let emitter = u.type_reference("EventEmitter", vec![]);
        let output_a_decl = u.property_declaration("outputA", Some(emitter));
        let my_dir_class =
            u.class_declaration("MyDir", vec![input_a_decl, title_decl, output_a_decl]);
        let gen_dir_class = u.class_declaration("GenDir", vec![]);
        let ng_for_of_class = u.class_declaration("NgForOf", vec![]);
        let string = u.keyword_type("string");
        let name_decl = u.property_declaration("name", Some(string));
        let app_class = u.class_declaration("AppComponent", vec![name_decl]);
        let aliased = u.type_reference("MyDir", vec![]);
        let alias = u.type_alias("AliasDir", aliased);
        let user_file = program
            .add_source_file(u.finish(vec![
                my_dir_class,
                gen_dir_class,
                ng_for_of_class,
                app_class,
                alias,
            ]))
            .unwrap();

        // Type-check shim.
        let mut b = SourceFileBuilder::new(SHIM_PATH);
        let mut statements = Vec::new();

        let my_dir_type = b.type_reference("i0.MyDir", vec![]);
        b.add_parse_span_info(my_dir_type, range(0, 60));
        b.add_expression_identifier(my_dir_type, ExpressionIdentifier::DIRECTIVE);
        let init = null_bang(&mut b);
        let t1 = b.variable_declaration("_t1", Some(my_dir_type), Some(init));
        statements.push(b.variable_statement(vec![t1]));

        let t2_name = b.identifier("_t2");
        b.add_parse_span_info(t2_name, range(0, 60));
        b.add_expression_identifier(t2_name, ExpressionIdentifier::DIRECTIVE);
        let ctor = b.identifier("_ctor1");
        let init = null_bang(&mut b);
        let gen_dir_init = b.call(ctor, vec![init]);
        let t2 = b.add(NodeData::VariableDeclaration {
            name: t2_name,
            type_: None,
            initializer: Some(gen_dir_init),
        });
        statements.push(b.variable_statement(vec![t2]));

        let document = b.identifier("document");
        let create = b.property_access(document, "createElement");
        let tag = b.string_literal("div");
        let element_init = b.call(create, vec![tag]);
        let t3 = b.variable_declaration("_t3", None, Some(element_init));
        b.add_parse_span_info(t3, range(0, 60));
        statements.push(b.variable_statement(vec![t3]));

        let t1_for_input = b.identifier("_t1");
        let input_a_access = b.property_access(t1_for_input, "inputA");
        let name_access = ctx_name(&mut b);
        b.add_parse_span_info(name_access, range(15, 19));
        let assign = b.assignment(input_a_access, name_access);
        b.add_parse_span_info(assign, range(5, 20));
        statements.push(b.expression_statement(assign));

        let t3_for_input = b.identifier("_t3");
        let id_literal = b.string_literal("id");
        let id_access = b.element_access(t3_for_input, id_literal);
        let value = ctx_name(&mut b);
        let assign = b.assignment(id_access, value);
        b.add_parse_span_info(assign, range(21, 30));
        statements.push(b.expression_statement(assign));

        let t1_for_title = b.identifier("_t1");
        let title_access = b.property_access(t1_for_title, "title");
        let value = b.string_literal("hi");
        let assign = b.assignment(title_access, value);
        b.add_parse_span_info(assign, range(31, 41));
        statements.push(b.expression_statement(assign));

        let ctx_for_bar = b.identifier("ctx");
        let bar_access = b.property_access(ctx_for_bar, "bar");
        let value = ctx_name(&mut b);
        let assign = b.assignment(bar_access, value);
        b.add_parse_span_info(assign, range(121, 130));
        statements.push(b.expression_statement(assign));

        let helper = b.identifier("_outputHelper");
        let t1_for_output = b.identifier("_t1");
        let output_a_literal = b.string_literal("outputA");
        let output_access = b.element_access(t1_for_output, output_a_literal);
        let helper_call = b.call(helper, vec![output_access]);
        let subscribe = b.property_access(helper_call, "subscribe");
        let handler = event_handler(&mut b, "handle");
        let subscription = b.call(subscribe, vec![handler]);
        b.add_parse_span_info(subscription, range(51, 70));
        statements.push(b.expression_statement(subscription));

        let t3_for_listener = b.identifier("_t3");
        let add_listener = b.property_access(t3_for_listener, "addEventListener");
        let click = b.string_literal("click");
        let handler = event_handler(&mut b, "onClick");
        let listener = b.call(add_listener, vec![click, handler]);
        b.add_parse_span_info(listener, range(71, 85));
        statements.push(b.expression_statement(listener));

        statements.push(alias_declaration(&mut b, "_t4", "_t1", range(86, 100)));
        statements.push(alias_declaration(&mut b, "_t5", "_t3", range(101, 110)));
        statements.push(alias_declaration(&mut b, "_t6", "_t1", range(111, 120)));
        let t9 = b.variable_declaration("_t9", None, None);
        b.add_parse_span_info(t9, range(131, 140));
        statements.push(b.variable_statement(vec![t9]));

        let any = b.keyword_type("any");
        let ng_for_of_type = b.type_reference("i0.NgForOf", vec![any]);
        b.add_parse_span_info(ng_for_of_type, range(300, 360));
        b.add_expression_identifier(ng_for_of_type, ExpressionIdentifier::DIRECTIVE);
        let init = null_bang(&mut b);
        let t7 = b.variable_declaration("_t7", Some(ng_for_of_type), Some(init));
        statements.push(b.variable_statement(vec![t7]));

        let t7_for_item = b.identifier("_t7");
        let implicit_access = b.property_access(t7_for_item, "$implicit");
        let t8 = b.variable_declaration("_t8", None, Some(implicit_access));
        b.add_parse_span_info(t8, range(310, 320));
        let t8_statement = b.variable_statement(vec![t8]);
        let guard = b.identifier("true");
        let then_block = b.block(vec![t8_statement]);
        statements.push(b.if_statement(guard, then_block, None));

        let user_name_access = user_access(&mut b, "name");
        statements.push(safe_access(&mut b, user_name_access, range(700, 710)));

        let get_name_access = user_access(&mut b, "getName");
        let get_name_call = b.call(get_name_access, vec![]);
        statements.push(safe_access(&mut b, get_name_call, range(720, 735)));

        let pipe = b.identifier("_pipe1");
        let transform_access = b.property_access(pipe, "transform");
        let value = ctx_name(&mut b);
        let pipe_call = b.call(transform_access, vec![value]);
        b.add_parse_span_info(pipe_call, range(740, 752));
        statements.push(b.expression_statement(pipe_call));

        let write_access = ctx_name(&mut b);
        b.add_parse_span_info(write_access, range(760, 764));
        let event = b.identifier("$event");
        let write = b.assignment(write_access, event);
        statements.push(b.expression_statement(write));

        let literal = b.string_literal("abc");
        b.add_parse_span_info(literal, range(780, 785));
        statements.push(b.expression_statement(literal));

        let body = b.block(statements);
        let ctx_type = b.type_reference("i0.AppComponent", vec![]);
        let ctx_param = b.parameter("ctx", Some(ctx_type));
        let tcb = b.function_declaration("_tcb1", vec![ctx_param], body);
        let shim = program.add_source_file(b.finish(vec![tcb])).unwrap();

        // Semantic facts.
        let s = |id: NodeId| NodeRef::new(shim, id);
        let u = |id: NodeId| NodeRef::new(user_file, id);
        let node = |r: NodeRef| program.get_node(r).unwrap();
        let name_of = |id: NodeId| node(s(id)).name().unwrap().node_ref();
        let type_name_of = |id: NodeId| node(s(id)).type_name().unwrap().node_ref();
        // The conditional inside `(null as any ? ... : undefined)`.
        let conditional_at = |start: usize| {
            let paren = find_attributed(&program, shim, start);
            node(s(paren)).expression().unwrap().node_ref()
        };

        let mut checker = FakeTypeChecker::new();
        let string_type = checker.define_type("string", None);

        let my_dir = checker.define_symbol("MyDir", vec![u(my_dir_class)]);
        let my_dir_ty = checker.define_type("MyDir", Some(my_dir));
        checker.bind(type_name_of(my_dir_type), Some(my_dir), Some(my_dir_ty));
        checker.bind(s(my_dir_type), None, Some(my_dir_ty));

        let gen_dir = checker.define_symbol("GenDir", vec![u(gen_dir_class)]);
        let gen_dir_type = checker.define_type("GenDir<any>", Some(gen_dir));
        checker.bind(s(gen_dir_init), None, Some(gen_dir_type));
        checker.bind(s(t2_name), None, Some(gen_dir_type));

        let html_div = checker.define_symbol("HTMLDivElement", vec![]);
        let html_div_type =
            checker.define_type("HTMLDivElement", Some(html_div));
        checker.bind(s(element_init), None, Some(html_div_type));

        let t1_symbol = checker.define_symbol("_t1", vec![s(t1)]);
        for receiver in [t1_for_input, t1_for_title, t1_for_output] {
            checker.bind(s(receiver), Some(t1_symbol), Some(my_dir_ty));
        }
        let t3_symbol = checker.define_symbol("_t3", vec![s(t3)]);
        for receiver in [t3_for_input, t3_for_listener] {
            checker.bind(s(receiver), Some(t3_symbol), Some(html_div_type));
        }
        let ctx_symbol = checker.define_symbol("ctx", vec![s(ctx_param)]);
        checker.bind(s(ctx_for_bar), Some(ctx_symbol), None);

        let input_a = checker.define_symbol("inputA", vec![u(input_a_decl)]);
        checker.bind(name_of(input_a_access), Some(input_a), Some(string_type));
        let id = checker.define_symbol("id", vec![]);
        checker.bind(s(id_literal), Some(id), Some(string_type));
        let title = checker.define_symbol("title", vec![u(title_decl)]);
        checker.bind(name_of(title_access), Some(title), Some(string_type));
        let bar = checker.define_symbol("bar", vec![]);
        checker.bind(name_of(bar_access), Some(bar), Some(string_type));

        let output_a =
            checker.define_symbol("outputA", vec![u(output_a_decl)]);
        let event_emitter_type =
            checker.define_type("EventEmitter<string>", None);
        checker.bind(s(output_a_literal), Some(output_a), Some(event_emitter_type));

        let t4 = s(find_declaration(&program, shim, "_t4"));
        let my_ref = checker.define_symbol("_t4", vec![t4]);
        checker.bind(node(t4).name().unwrap().node_ref(), Some(my_ref), Some(my_dir_ty));
        let t5 = s(find_declaration(&program, shim, "_t5"));
        let div_ref = checker.define_symbol("_t5", vec![t5]);
        checker.bind(node(t5).name().unwrap().node_ref(), Some(div_ref), Some(html_div_type));
        let t6 = s(find_declaration(&program, shim, "_t6"));
        let alias_ref = checker.define_symbol("_t6", vec![t6]);
        checker.bind(node(t6).name().unwrap().node_ref(), Some(alias_ref), Some(my_dir_ty));
        let bare_ref = checker.define_symbol("_t9", vec![s(t9)]);
        checker.bind(name_of(t9), Some(bare_ref), Some(html_div_type));

        let ng_for_of =
            checker.define_symbol("NgForOf", vec![u(ng_for_of_class)]);
        let ng_for_of_ty = checker.define_type("NgForOf<any>", Some(ng_for_of));
        checker.bind(type_name_of(ng_for_of_type), Some(ng_for_of), Some(ng_for_of_ty));
        checker.bind(s(ng_for_of_type), None, Some(ng_for_of_ty));

        let item = checker.define_symbol("$implicit", vec![]);
        let item_type = checker.define_type("Item", None);
        checker.bind(name_of(implicit_access), Some(item), None);
        checker.bind(s(implicit_access), None, Some(item_type));

        let name = checker.define_symbol("name", vec![u(name_decl)]);
        for access in [name_access, write_access] {
            checker.bind(name_of(access), Some(name), None);
            checker.bind(s(access), None, Some(string_type));
        }

        let user_name = checker.define_symbol("name", vec![]);
        checker.bind(name_of(user_name_access), Some(user_name), None);
        checker.bind(s(user_name_access), None, Some(string_type));
        let optional_name_type = checker.define_type("string | undefined", None);
        checker.bind(conditional_at(700), None, Some(optional_name_type));

        let get_name = checker.define_symbol("getName", vec![]);
        let method_type = checker.define_type("() => string", None);
        checker.bind(name_of(get_name_access), Some(get_name), None);
        checker.bind(s(get_name_access), None, Some(method_type));
        checker.bind(s(get_name_call), None, Some(string_type));
        let optional_get_name_type = checker.define_type("string | undefined", None);
        checker.bind(conditional_at(720), None, Some(optional_get_name_type));

        let transform = checker.define_symbol("transform", vec![]);
        let transform_type = checker.define_type("(value: string) => string", None);
        checker.bind(name_of(transform_access), Some(transform), None);
        checker.bind(s(transform_access), None, Some(transform_type));

        let abc_type = checker.define_type("\"abc\"", None);
        checker.bind(s(literal), None, Some(abc_type));

        let my_dir_meta = DirectiveMeta {
            name: "MyDir".to_string(),
            declaration: u(my_dir_class),
        };
        let alias_dir = DirectiveMeta {
            name: "AliasDir".to_string(),
            declaration: u(alias),
        };

        TcbFixture {
            program,
            checker,
            user_file,
            shim,
            tcb: s(tcb),
            my_dir: my_dir_meta,
            alias_dir,
            symbols: FixtureSymbols {
                my_dir,
                my_dir_type: my_dir_ty,
                gen_dir,
                gen_dir_type,
                html_div,
                html_div_type,
                ng_for_of,
                ng_for_of_type: ng_for_of_ty,
                string_type,
                input_a,
                id,
                title,
                bar,
                output_a,
                event_emitter_type,
                my_ref,
                div_ref,
                item,
                item_type,
                name,
                user_name,
                optional_name_type,
                get_name,
                optional_get_name_type,
                transform,
                transform_type,
            },
        }
    }

    pub fn builder<'a, 't>(&'a self, bound: &'a FakeBoundTarget<'t>) -> SymbolBuilder<'a, 't> {
        SymbolBuilder::new(&self.program, self.tcb, bound, &self.checker).unwrap()
    }

    pub fn tcb_node(&self) -> Node<'_> {
        self.program.get_node(self.tcb).unwrap()
    }

    pub fn shim_text(&self) -> &str {
        self.program.get_source_file(self.shim).unwrap().text()
    }

    /// Offset of the first occurrence of `needle` in the shim.
    pub fn position_of(&self, needle: &str) -> usize {
        self.shim_text().find(needle).unwrap()
    }
}

/// The declaration of the variable `name` anywhere in the shim.
fn find_declaration(program: &Program, shim: FileId, name: &str) -> NodeId {
    let root = program.get_root_node(shim).unwrap();
    let mut stack = vec![root];
    while let Some(node) = stack.pop() {
        if node.kind() == ts::SyntaxKind::VariableDeclaration
            && node.name().and_then(|n| n.identifier_text()) == Some(name)
        {
            return node.id();
        }
        stack.extend(node.children());
    }
    panic!("no declaration of {name}");
}

/// The first node attributed with a template span starting at `start`.
fn find_attributed(program: &Program, shim: FileId, start: usize) -> NodeId {
    let root = program.get_root_node(shim).unwrap();
    let mut stack = vec![root];
    while let Some(node) = stack.pop() {
        if node.origin_span().map(|span| span.start) == Some(start) {
            return node.id();
        }
        stack.extend(node.children());
    }
    panic!("no node at {start}");
}
