// TypeCheck Block Shapes
//
// Recognizes the statement shapes the type-check block generator emits.

use ts::{FileId, Node, NodeData, Program, ProgramError, SyntaxKind};

/// Helper that adapts directive outputs to a subscribable in generated code.
pub const OUTPUT_HELPER: &str = "_outputHelper";

/// Prefix of the generated type-check block functions.
pub const TCB_FUNCTION_PREFIX: &str = "_tcb";

/// Extract the output field access from a generated output subscription.
///
/// Directive outputs are checked as
/// `_outputHelper(_t1["outputField"]).subscribe(handler)`; for that shape the
/// `_t1["outputField"]` element access is returned. Native listeners
/// (`_t1.addEventListener(...)`) and any other call yield `None`.
pub fn decode_output_call_expression<'a>(node: Node<'a>) -> Option<Node<'a>> {
    if node.kind() != SyntaxKind::CallExpression {
        return None;
    }
    // `_outputHelper(_t1["outputField"]).subscribe`
    let callee = node.expression()?;
    if callee.kind() != SyntaxKind::PropertyAccessExpression
        || callee.name()?.identifier_text() != Some("subscribe")
    {
        return None;
    }

    // `_outputHelper(_t1["outputField"])`
    let subscribe_expression = callee.expression()?;
    if subscribe_expression.kind() != SyntaxKind::CallExpression {
        return None;
    }
    let helper = subscribe_expression.expression()?;
    if helper.identifier_text() != Some(OUTPUT_HELPER) {
        return None;
    }
    let arguments = subscribe_expression.arguments();
    let [output_field_access] = arguments.as_slice() else {
        return None;
    };
    if output_field_access.kind() != SyntaxKind::ElementAccessExpression {
        return None;
    }
    Some(*output_field_access)
}

/// Find the type-check block function named `name` among the top-level
/// statements of a shim file.
pub fn find_type_check_block<'a>(
    program: &'a Program,
    shim: FileId,
    name: &str,
) -> Result<Option<Node<'a>>, ProgramError> {
    let root = program.get_root_node(shim)?;
    Ok(root.children().find(|statement| {
        matches!(statement.data(), NodeData::FunctionDeclaration { .. })
            && statement
                .name()
                .and_then(|n| n.identifier_text())
                .is_some_and(|text| text == name && text.starts_with(TCB_FUNCTION_PREFIX))
    }))
}
