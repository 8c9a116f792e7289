// Template Symbol Builder
//
// Resolves template nodes to the symbols of their type-check block.

use indexmap::IndexSet;
use smallvec::smallvec;
use thiserror::Error;
use tracing::{debug, trace};
use ts::{
    is_call_expression, is_class_declaration, is_conditional_expression, is_identifier,
    is_property_access_expression, is_type_node, is_type_reference_node, is_variable_declaration,
    skip_parentheses, ExpressionIdentifier, Node, NodeRef, Program, ProgramError, SymbolId,
    SyntaxKind, TypeChecker, TypeId,
};

use super::comments::{
    find_all_matching_nodes, find_first_matching_node, has_expression_identifier, is_assignment,
    FindOptions,
};
use super::type_check_block::decode_output_call_expression;
use crate::expression_parser::AST;
use crate::parse_util::ParseSourceSpan;
use crate::render3::{BoundEvent, Element, Reference, Template, TemplateNode, Variable};
use crate::typecheck::api::{
    BindingConsumer, BindingNode, BindingSymbol, BindingTarget, BoundTarget, DirectiveSymbol,
    ElementSymbol, ExpressionSymbol, InputBindingSymbol, OutputBindingSymbol, ReferenceSymbol,
    ReferenceTarget, ReferenceTargetSymbol, ShimLocation, Symbol, TemplateSymbol,
    TemplateTypeChecker, VariableSymbol,
};

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum SymbolBuilderError {
    #[error(transparent)]
    Program(#[from] ProgramError),
    #[error("{0:?} is not a type-check block function")]
    NotATypeCheckBlock(NodeRef),
}

/// Symbol, type and shim position found for one type-check block node.
#[derive(Debug, Clone)]
struct TsNodeSymbolInfo {
    ts_symbol: SymbolId,
    ts_type: TypeId,
    shim_location: ShimLocation,
}

impl TsNodeSymbolInfo {
    fn into_directive(self) -> DirectiveSymbol {
        DirectiveSymbol {
            ts_symbol: self.ts_symbol,
            ts_type: self.ts_type,
            shim_location: self.shim_location,
        }
    }
}

/// Resolves template nodes against one type-check block.
///
/// A builder is bound to one snapshot of a type-check block. Create a new one
/// whenever the block is regenerated.
#[derive(Debug)]
pub struct SymbolBuilder<'a, 't> {
    shim_path: String,
    program: &'a Program,
    type_check_block: Node<'a>,
    bound_target: &'a dyn BoundTarget<'t>,
    type_checker: &'a dyn TypeChecker,
}

impl<'a, 't> SymbolBuilder<'a, 't> {
    pub fn new(
        program: &'a Program,
        type_check_block: NodeRef,
        bound_target: &'a dyn BoundTarget<'t>,
        type_checker: &'a dyn TypeChecker,
    ) -> Result<Self, SymbolBuilderError> {
        let tcb = program.get_node(type_check_block)?;
        if tcb.kind() != SyntaxKind::FunctionDeclaration {
            return Err(SymbolBuilderError::NotATypeCheckBlock(type_check_block));
        }
        Ok(SymbolBuilder {
            shim_path: tcb.source_file().file_name().to_string(),
            program,
            type_check_block: tcb,
            bound_target,
            type_checker,
        })
    }

    pub fn shim_path(&self) -> &str {
        &self.shim_path
    }

    pub fn get_symbol(&self, node: TemplateNode<'t>) -> Option<Symbol<'t>> {
        let symbol = match node {
            TemplateNode::BoundAttribute(attribute) => self
                .get_symbol_of_input_binding(
                    BindingNode::BoundAttribute(attribute),
                    attribute.source_span,
                )
                .map(Symbol::Input),
            TemplateNode::TextAttribute(attribute) => self
                .get_symbol_of_input_binding(
                    BindingNode::TextAttribute(attribute),
                    attribute.source_span,
                )
                .map(Symbol::Input),
            TemplateNode::BoundEvent(event) => {
                self.get_symbol_of_bound_event(event).map(Symbol::Output)
            }
            TemplateNode::Element(element) => {
                self.get_symbol_of_element(element).map(Symbol::Element)
            }
            TemplateNode::Template(template) => {
                Some(Symbol::Template(self.get_symbol_of_ast_template(template)))
            }
            TemplateNode::Variable(variable) => {
                self.get_symbol_of_variable(variable).map(Symbol::Variable)
            }
            TemplateNode::Reference(reference) => {
                self.get_symbol_of_reference(reference).map(Symbol::Reference)
            }
            TemplateNode::Expression(expression) => {
                self.get_symbol_of_template_expression(expression)
            }
        };
        if symbol.is_none() {
            debug!(kind = node.kind_name(), "no symbol for template node");
        }
        symbol
    }

    fn get_symbol_of_ast_template(&self, template: &'t Template) -> TemplateSymbol<'t> {
        TemplateSymbol {
            directives: self.get_directives_of_node(template.tag_span()),
            template_node: template,
        }
    }

    fn get_symbol_of_element(&self, element: &'t Element) -> Option<ElementSymbol<'t>> {
        let element_span = element.tag_span();
        let node = self.find_first(is_variable_declaration, element_span)?;
        let info = self.get_symbol_of_variable_declaration(node)?;
        Some(ElementSymbol {
            ts_symbol: info.ts_symbol,
            ts_type: info.ts_type,
            shim_location: info.shim_location,
            directives: self.get_directives_of_node(element_span),
            template_node: element,
        })
    }

    fn get_directives_of_node(&self, span: ParseSourceSpan) -> IndexSet<DirectiveSymbol> {
        let is_directive_declaration = |node: &Node<'a>| {
            (is_type_node(node) || is_identifier(node))
                && node.parent().is_some_and(|parent| is_variable_declaration(&parent))
                && has_expression_identifier(node, ExpressionIdentifier::DIRECTIVE)
        };
        let opts = FindOptions::new(is_directive_declaration).with_span(span.to_text_range());
        find_all_matching_nodes(self.type_check_block, &opts)
            .into_iter()
            .filter_map(|node| {
                let symbol = self.get_symbol_of_ts_node(node);
                if symbol.is_none() {
                    trace!(%span, "dropping directive candidate without a symbol");
                }
                symbol.map(TsNodeSymbolInfo::into_directive)
            })
            .collect()
    }

    fn get_symbol_of_bound_event(&self, event: &'t BoundEvent) -> Option<OutputBindingSymbol<'t>> {
        // Outputs are a call expression that looks like one of the two:
        // * _outputHelper(_t1["outputField"]).subscribe(handler);
        // * _t1.addEventListener(handler);
        let node = self.find_first(is_call_expression, event.source_span)?;

        let consumer = self
            .bound_target
            .get_consumer_of_binding(BindingNode::BoundEvent(event))?;
        if matches!(
            consumer,
            BindingConsumer::Element(_) | BindingConsumer::Template(_)
        ) {
            // Native listeners have no field to point at.
            trace!(event = %event.name, "output is bound to a DOM event");
            return None;
        }

        let output_field_access = decode_output_call_expression(node)?;
        let field = output_field_access.argument_expression()?;
        let ts_symbol = self.type_checker.get_symbol_at_location(field.node_ref())?;
        let ts_type = self.type_checker.get_type_at_location(field.node_ref());

        let target = self.get_directive_symbol_for_access_expression(output_field_access)?;

        Some(OutputBindingSymbol {
            bindings: smallvec![BindingSymbol {
                ts_symbol,
                ts_type,
                target: BindingTarget::Directive(target),
                shim_location: self.shim_location(field.get_start()),
            }],
        })
    }

    fn get_symbol_of_input_binding(
        &self,
        binding: BindingNode<'t>,
        span: ParseSourceSpan,
    ) -> Option<InputBindingSymbol<'t>> {
        // `_t1.input = value` or `_t1["input"] = value`
        let node = self.find_first(is_assignment, span)?;
        let left = node.left()?;
        let field = match left.kind() {
            SyntaxKind::ElementAccessExpression => left.argument_expression()?,
            SyntaxKind::PropertyAccessExpression => left.name()?,
            _ => {
                trace!(%span, "input assignment has an unexpected target");
                return None;
            }
        };
        let ts_symbol = self.type_checker.get_symbol_at_location(field.node_ref())?;
        let ts_type = self.type_checker.get_type_at_location(field.node_ref());

        let target = match self.bound_target.get_consumer_of_binding(binding)? {
            BindingConsumer::Element(element) => {
                self.get_binding_target_of_node(TemplateNode::Element(element))?
            }
            BindingConsumer::Template(template) => {
                self.get_binding_target_of_node(TemplateNode::Template(template))?
            }
            BindingConsumer::Directive(_) => {
                BindingTarget::Directive(self.get_directive_symbol_for_access_expression(left)?)
            }
        };

        Some(InputBindingSymbol {
            bindings: smallvec![BindingSymbol {
                ts_symbol,
                ts_type,
                target,
                shim_location: self.shim_location(field.get_start()),
            }],
        })
    }

    fn get_binding_target_of_node(&self, node: TemplateNode<'t>) -> Option<BindingTarget<'t>> {
        match self.get_symbol(node)? {
            Symbol::Element(element) => Some(BindingTarget::Element(element)),
            Symbol::Template(template) => Some(BindingTarget::Template(template)),
            Symbol::Directive(directive) => Some(BindingTarget::Directive(directive)),
            _ => None,
        }
    }

    fn get_directive_symbol_for_access_expression(&self, node: Node<'a>) -> Option<DirectiveSymbol> {
        // In either case, `_t1["index"]` or `_t1.index`, the receiver is `_t1`, whose
        // symbol is declared by the directive's variable declaration.
        let receiver = node.expression()?;
        let ts_symbol = self.type_checker.get_symbol_at_location(receiver.node_ref())?;
        let declarations = self.type_checker.get_symbol_declarations(ts_symbol);
        let declaration = self.program.get_node(*declarations.first()?).ok()?;
        if !is_variable_declaration(&declaration) || !self.is_in_shim(&declaration) {
            return None;
        }

        // The identifier is on the type for regular directives and on the name for
        // generic directives.
        let marked = declaration.type_node().or_else(|| declaration.name())?;
        if !has_expression_identifier(&marked, ExpressionIdentifier::DIRECTIVE) {
            trace!(
                declaration = declaration.get_text(),
                "receiver is not a directive instance"
            );
            return None;
        }

        self.get_symbol_of_variable_declaration(declaration)
            .map(TsNodeSymbolInfo::into_directive)
    }

    fn get_symbol_of_variable(&self, variable: &'t Variable) -> Option<VariableSymbol<'t>> {
        let node = self.find_first(is_variable_declaration, variable.source_span)?;
        let info = self.get_symbol_of_variable_declaration(node)?;
        Some(VariableSymbol {
            ts_symbol: info.ts_symbol,
            ts_type: info.ts_type,
            shim_location: info.shim_location,
            declaration: variable,
        })
    }

    fn get_symbol_of_reference(&self, reference: &'t Reference) -> Option<ReferenceSymbol<'t>> {
        let target = self.bound_target.get_reference_target(reference)?;
        // The reference declaration aliases its target, i.e. `var _t2 = _t1;`
        let node = self.find_first(is_variable_declaration, reference.source_span)?;
        if node.initializer().is_none() {
            trace!(reference = %reference.name, "reference declaration has no initializer");
            return None;
        }

        let info = self.get_symbol_of_ts_node(node.name()?)?;
        let target_location = self.shim_location(node.get_start());

        let target = match target {
            ReferenceTarget::Element(element) => ReferenceTargetSymbol::Element(element),
            ReferenceTarget::Template(template) => ReferenceTargetSymbol::Template(template),
            ReferenceTarget::Directive { directive, .. } => {
                let declaration = self.program.get_node(directive.declaration).ok()?;
                if !is_class_declaration(&declaration) {
                    trace!(
                        directive = %directive.name,
                        "referenced directive is not declared by a class"
                    );
                    return None;
                }
                ReferenceTargetSymbol::Directive(directive.declaration)
            }
        };

        Some(ReferenceSymbol {
            ts_symbol: info.ts_symbol,
            ts_type: info.ts_type,
            shim_location: info.shim_location,
            declaration: reference,
            target,
            target_location,
        })
    }

    fn get_symbol_of_template_expression(&self, expression: &'t AST) -> Option<Symbol<'t>> {
        let mut expression = expression;
        while let AST::ASTWithSource(with_source) = expression {
            expression = &*with_source.ast;
        }

        if let Some(target) = self.bound_target.get_expression_target(expression) {
            return self.get_symbol(target);
        }

        // The name of a property write has no AST node of its own, so it is found by
        // its name span.
        let with_span = match expression {
            AST::PropertyWrite(write) => write.name_span,
            _ => expression.source_span(),
        };
        let opts = FindOptions::new(|_: &Node<'a>| true).with_span(with_span.to_text_range());
        let node = skip_parentheses(find_first_matching_node(self.type_check_block, &opts)?);

        let is_safe_method_call = expression.is_safe_method_call();
        let is_safe_access =
            matches!(expression, AST::SafePropertyRead(_)) || is_safe_method_call;

        let info = if is_safe_access && is_conditional_expression(&node) {
            // `a?.b` is checked as `(null as any ? a!.b : undefined)`.
            let when_true = skip_parentheses(node.when_true()?);
            let resolved = if is_safe_method_call && is_call_expression(&when_true) {
                when_true.expression()?
            } else {
                when_true
            };
            let info = self.get_symbol_of_ts_node(resolved)?;
            // The type of the whole conditional keeps `undefined`.
            TsNodeSymbolInfo {
                ts_type: self.type_checker.get_type_at_location(node.node_ref()),
                ..info
            }
        } else if matches!(expression, AST::BindingPipe(_)) && is_call_expression(&node) {
            // Pipes are checked as `_pipe1.transform(value, ...args)`.
            self.get_symbol_of_ts_node(node.expression()?)?
        } else {
            self.get_symbol_of_ts_node(node)?
        };

        Some(Symbol::Expression(ExpressionSymbol {
            ts_symbol: info.ts_symbol,
            ts_type: info.ts_type,
            shim_location: info.shim_location,
        }))
    }

    fn get_symbol_of_ts_node(&self, node: Node<'a>) -> Option<TsNodeSymbolInfo> {
        let node = skip_parentheses(node);
        let symbol_node = if is_property_access_expression(&node) {
            node.name()?
        } else {
            node
        };

        let ts_type = self.type_checker.get_type_at_location(node.node_ref());
        // Literals have no symbol at their location, but their type does.
        let ts_symbol = self
            .type_checker
            .get_symbol_at_location(symbol_node.node_ref())
            .or_else(|| self.type_checker.get_type_symbol(ts_type))?;

        Some(TsNodeSymbolInfo {
            ts_symbol,
            ts_type,
            shim_location: self.shim_location(get_shim_position_for_node(node)),
        })
    }

    fn get_symbol_of_variable_declaration(&self, declaration: Node<'a>) -> Option<TsNodeSymbolInfo> {
        // The declared type is trusted over the initializer: `var _t2: MyDir = xyz`.
        if let Some(type_node) = declaration.type_node() {
            if is_type_reference_node(&type_node) {
                return self.get_symbol_of_ts_node(type_node.type_name()?);
            }
        }
        // Otherwise the initializer: `var _t2 = _t1.index`.
        if let Some(initializer) = declaration.initializer() {
            return self.get_symbol_of_ts_node(initializer);
        }
        None
    }

    fn find_first<F>(&self, filter: F, span: ParseSourceSpan) -> Option<Node<'a>>
    where
        F: Fn(&Node<'a>) -> bool,
    {
        let opts = FindOptions::new(filter).with_span(span.to_text_range());
        let node = find_first_matching_node(self.type_check_block, &opts);
        if node.is_none() {
            trace!(%span, "no type-check block node at span");
        }
        node
    }

    fn is_in_shim(&self, node: &Node<'_>) -> bool {
        node.node_ref().file == self.type_check_block.node_ref().file
    }

    fn shim_location(&self, position_in_shim_file: usize) -> ShimLocation {
        ShimLocation {
            shim_path: self.shim_path.clone(),
            position_in_shim_file,
        }
    }
}

impl<'t> TemplateTypeChecker<'t> for SymbolBuilder<'_, 't> {
    fn get_symbol_of_node(&self, node: TemplateNode<'t>) -> Option<Symbol<'t>> {
        self.get_symbol(node)
    }
}

fn get_shim_position_for_node(node: Node<'_>) -> usize {
    let position = match node.kind() {
        SyntaxKind::TypeReference => node.type_name().map(get_shim_position_for_node),
        SyntaxKind::QualifiedName => node.right().map(|right| right.get_start()),
        SyntaxKind::PropertyAccessExpression => node.name().map(|name| name.get_start()),
        SyntaxKind::ElementAccessExpression => {
            node.argument_expression().map(|argument| argument.get_start())
        }
        _ => None,
    };
    position.unwrap_or_else(|| node.get_start())
}
