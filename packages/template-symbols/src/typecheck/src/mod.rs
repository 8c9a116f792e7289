// TypeCheck Source Module

pub mod comments;
pub mod template_symbol_builder;
pub mod type_check_block;

// Re-exports
pub use comments::{
    find_all_matching_nodes, find_first_matching_node, has_expression_identifier, is_assignment,
    read_span_comment, FindOptions,
};
pub use template_symbol_builder::{SymbolBuilder, SymbolBuilderError};
pub use type_check_block::{
    decode_output_call_expression, find_type_check_block, OUTPUT_HELPER, TCB_FUNCTION_PREFIX,
};
