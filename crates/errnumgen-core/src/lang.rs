//! Go grammar glue: parser reuse, node kinds and field names.
use std::cell::RefCell;

use tree_sitter::{Node, Parser, Tree};

thread_local! {
    // One parser per rayon worker, created lazily.
    static PARSER: RefCell<Option<Parser>> = RefCell::new(new_parser());
}

fn new_parser() -> Option<Parser> {
    let mut parser = Parser::new();
    parser.set_language(&tree_sitter_go::LANGUAGE.into()).ok()?;
    Some(parser)
}

/// Language definition for Go sources.
#[derive(Debug, Default, Clone, Copy)]
pub struct LangGo;

#[allow(non_upper_case_globals)]
impl LangGo {
    // Node kinds
    pub const source_file: &'static str = "source_file";
    pub const package_clause: &'static str = "package_clause";
    pub const package_identifier: &'static str = "package_identifier";
    pub const function_declaration: &'static str = "function_declaration";
    pub const method_declaration: &'static str = "method_declaration";
    pub const func_literal: &'static str = "func_literal";
    pub const parameter_list: &'static str = "parameter_list";
    pub const parameter_declaration: &'static str = "parameter_declaration";
    pub const variadic_parameter_declaration: &'static str = "variadic_parameter_declaration";
    pub const type_identifier: &'static str = "type_identifier";
    pub const return_statement: &'static str = "return_statement";
    pub const expression_list: &'static str = "expression_list";
    pub const call_expression: &'static str = "call_expression";
    pub const selector_expression: &'static str = "selector_expression";
    pub const argument_list: &'static str = "argument_list";
    pub const identifier: &'static str = "identifier";
    pub const nil: &'static str = "nil";
    pub const comment: &'static str = "comment";
    pub const var_declaration: &'static str = "var_declaration";
    pub const var_spec: &'static str = "var_spec";

    // Field names
    pub const field_name: &'static str = "name";
    pub const field_type: &'static str = "type";
    pub const field_result: &'static str = "result";
    pub const field_body: &'static str = "body";
    pub const field_function: &'static str = "function";
    pub const field_arguments: &'static str = "arguments";
    pub const field_operand: &'static str = "operand";
    pub const field_field: &'static str = "field";
    pub const field_value: &'static str = "value";

    /// Name of the built-in error interface.
    pub const ERROR_TYPE: &'static str = "error";
    /// The "no error" literal.
    pub const NIL: &'static str = "nil";

    pub fn supported_extensions() -> &'static [&'static str] {
        &["go"]
    }

    /// Parse a whole file. `None` when the grammar could not be loaded.
    pub fn parse(text: impl AsRef<[u8]>) -> Option<Tree> {
        PARSER.with(|parser| {
            let mut parser = parser.borrow_mut();
            let parser = parser.as_mut()?;
            parser.parse(text.as_ref(), None)
        })
    }

    /// Whether `text` parses on its own as exactly one Go expression.
    pub fn is_expression(text: &str) -> bool {
        const PREFIX: &str = "package p\n\nvar _ = ";
        let source = format!("{PREFIX}{text}\n");
        let Some(tree) = Self::parse(&source) else {
            return false;
        };
        let root = tree.root_node();
        if root.has_error() {
            return false;
        }

        let Some(decl) = named_children(root).find(|n| n.kind() == Self::var_declaration) else {
            return false;
        };
        let Some(spec) = named_children(decl).find(|n| n.kind() == Self::var_spec) else {
            return false;
        };
        let Some(value) = spec.child_by_field_name(Self::field_value) else {
            return false;
        };
        let exprs: Vec<Node<'_>> = expressions(value).collect();
        match exprs.as_slice() {
            [expr] => {
                expr.start_byte() == PREFIX.len() && expr.end_byte() == PREFIX.len() + text.len()
            }
            _ => false,
        }
    }

    /// Exact-match check for the `error` type.
    pub fn is_error_type(node: Node<'_>, source: &[u8]) -> bool {
        node.kind() == Self::type_identifier && node.utf8_text(source) == Ok(Self::ERROR_TYPE)
    }

    /// Exact-match check for the `nil` literal.
    pub fn is_nil(node: Node<'_>, source: &[u8]) -> bool {
        match node.kind() {
            k if k == Self::nil => true,
            k if k == Self::identifier => node.utf8_text(source) == Ok(Self::NIL),
            _ => false,
        }
    }

    pub fn is_function_kind(kind: &str) -> bool {
        kind == Self::function_declaration || kind == Self::method_declaration
    }

    /// Top-level declarations the way the Go AST counts them: everything but
    /// the package clause and comments.
    pub fn is_top_level_decl(node: Node<'_>) -> bool {
        node.is_named()
            && !node.is_extra()
            && node.kind() != Self::package_clause
            && node.kind() != Self::comment
    }
}

/// Named children of `node`, collected so the cursor does not outlive the call.
pub fn named_children<'t>(node: Node<'t>) -> impl Iterator<Item = Node<'t>> {
    let mut cursor = node.walk();
    node.named_children(&mut cursor)
        .collect::<Vec<_>>()
        .into_iter()
}

/// Expressions of an `expression_list` or `argument_list`, comments dropped.
pub fn expressions<'t>(list: Node<'t>) -> impl Iterator<Item = Node<'t>> {
    named_children(list).filter(|n| !n.is_extra() && n.kind() != LangGo::comment)
}

/// Package name from the package clause of a parsed file.
pub fn package_name(tree: &Tree, source: &[u8]) -> Option<String> {
    let clause = named_children(tree.root_node()).find(|n| n.kind() == LangGo::package_clause)?;
    let ident = named_children(clause).find(|n| n.kind() == LangGo::package_identifier)?;
    ident.utf8_text(source).ok().map(str::to_string)
}
