//! Declaration filter: keep only functions that declare an `error` result.

use tree_sitter::Node;

use crate::context::{CompileUnit, UnitFile};
use crate::file::SourceFile;
use crate::lang::{LangGo, named_children};

/// Positional shape of a function's result list.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct ResultLayout {
    /// Number of result slots; `(a, b string)` counts as two.
    pub slots: usize,
    /// Zero-based slot of the first `error` result.
    pub error_index: Option<usize>,
}

impl ResultLayout {
    /// Layout of a function-like node (declaration, method or literal).
    pub fn of(function: Node<'_>, source: &[u8]) -> Self {
        match function.child_by_field_name(LangGo::field_result) {
            Some(result) => Self::of_result(result, source),
            None => Self::default(),
        }
    }

    fn of_result(result: Node<'_>, source: &[u8]) -> Self {
        if result.kind() != LangGo::parameter_list {
            // A single unnamed result type
            let error_index = LangGo::is_error_type(result, source).then_some(0);
            return Self {
                slots: 1,
                error_index,
            };
        }

        let mut layout = Self::default();
        for param in named_children(result) {
            let kind = param.kind();
            if kind == LangGo::parameter_declaration {
                let mut cursor = param.walk();
                let names = param
                    .children_by_field_name(LangGo::field_name, &mut cursor)
                    .count();
                let is_error = param
                    .child_by_field_name(LangGo::field_type)
                    .is_some_and(|ty| LangGo::is_error_type(ty, source));
                if is_error && layout.error_index.is_none() {
                    layout.error_index = Some(layout.slots);
                }
                layout.slots += names.max(1);
            } else if kind == LangGo::variadic_parameter_declaration {
                layout.slots += 1;
            }
        }
        layout
    }

    pub fn has_error(&self) -> bool {
        self.error_index.is_some()
    }
}

/// A retained function declaration.
#[derive(Debug, Clone, Copy)]
pub struct Declaration<'u> {
    pub node: Node<'u>,
    pub layout: ResultLayout,
}

impl<'u> Declaration<'u> {
    pub fn body(&self) -> Option<Node<'u>> {
        self.node.child_by_field_name(LangGo::field_body)
    }

    pub fn name<'s>(&self, source: &'s [u8]) -> &'s str {
        self.node
            .child_by_field_name(LangGo::field_name)
            .and_then(|n| n.utf8_text(source).ok())
            .unwrap_or("<anonymous>")
    }
}

/// A file with at least one retained declaration.
#[derive(Debug)]
pub struct FilteredFile<'u> {
    /// Index into the owning unit's `files`.
    pub index: usize,
    pub source: &'u SourceFile,
    pub decls: Vec<Declaration<'u>>,
}

/// The part of a compilation unit that later stages visit.
#[derive(Debug)]
pub struct FilteredUnit<'u> {
    pub unit: &'u CompileUnit,
    pub files: Vec<FilteredFile<'u>>,
}

impl FilteredUnit<'_> {
    pub fn decl_count(&self) -> usize {
        self.files.iter().map(|f| f.decls.len()).sum()
    }
}

/// Whether a top-level declaration can hold a relevant return.
fn retain(node: Node<'_>, source: &[u8]) -> Option<ResultLayout> {
    if !LangGo::is_function_kind(node.kind()) {
        return None;
    }
    node.child_by_field_name(LangGo::field_body)?;
    let layout = ResultLayout::of(node, source);
    (layout.slots > 0 && layout.has_error()).then_some(layout)
}

fn filter_file<'u>(index: usize, file: &'u UnitFile) -> Option<FilteredFile<'u>> {
    let tree = file.tree.as_ref()?;
    let source = file.source.content();
    let decls: Vec<Declaration<'u>> = named_children(tree.root_node())
        .filter_map(|node| retain(node, source).map(|layout| Declaration { node, layout }))
        .collect();
    if decls.is_empty() {
        return None;
    }
    Some(FilteredFile {
        index,
        source: &file.source,
        decls,
    })
}

/// Narrow a unit to functions with an `error` result. Files left without
/// declarations drop out of the rewrite set; nothing is removed from disk.
pub fn filter_unit(unit: &CompileUnit) -> FilteredUnit<'_> {
    let files = unit
        .files
        .iter()
        .enumerate()
        .filter_map(|(index, file)| filter_file(index, file))
        .collect();
    FilteredUnit { unit, files }
}
