//! Syntax checks on a parsed Python tree
//!
//! tree-sitter marks unparsable input with error nodes, but its Python grammar
//! also accepts a number of programs CPython rejects without producing one:
//! Python 2 `print`/`exec` statements and backtick strings, a missing indented
//! block (parsed as an empty block), an unexpected indent (parsed as an
//! ordinary statement), and `return`, `yield`, `await`, `break` or `continue`
//! outside the scope that allows them. Those are checked here on the finished
//! tree, so a file either passes every rule or yields no definitions at all.

use tree_sitter::Node;

use super::symbols::preorder;
use crate::error::{NavigatorError, Result};

/// Clauses that must line up with the statement that owns them
const CLAUSES: &[&str] = &[
    "elif_clause",
    "else_clause",
    "except_clause",
    "except_group_clause",
    "finally_clause",
];

type Violation<'t> = (Node<'t>, &'static str);

/// Fails with `Parse` on the first syntax violation in source order
pub fn check(root: Node<'_>, source: &str) -> Result<()> {
    if root.has_error() {
        return Err(NavigatorError::Parse(describe_error_node(root)));
    }

    let source = source.as_bytes();
    match preorder(root).into_iter().find_map(|node| violation(node, source)) {
        Some((node, message)) => Err(NavigatorError::Parse(format!(
            "{} at line {}, column {}",
            message,
            node.start_position().row + 1,
            node.start_position().column + 1
        ))),
        None => Ok(()),
    }
}

fn violation<'t>(node: Node<'t>, source: &[u8]) -> Option<Violation<'t>> {
    let message = match node.kind() {
        "module" => return misindented_module(node, source),
        "block" => return misindented_block(node, source),
        kind if CLAUSES.contains(&kind) => return misaligned_clause(node, source),
        "print_statement" if !is_python3_print(node) => {
            "Missing parentheses in call to 'print'"
        }
        "exec_statement" => "Missing parentheses in call to 'exec'",
        "string_start" if is_backtick(node, source) => "backtick strings are not supported",
        "return_statement" if !in_function(node) => "'return' outside function",
        "yield" if !in_function(node) => "'yield' outside function",
        "await" if !in_async_function(node) => "'await' outside async function",
        "break_statement" if !in_loop(node) => "'break' outside loop",
        "continue_statement" if !in_loop(node) => "'continue' not properly in loop",
        _ => return None,
    };
    Some((node, message))
}

/// Statements of a module or block, comments and line continuations excluded
fn statements(node: Node<'_>) -> Vec<Node<'_>> {
    let mut cursor = node.walk();
    node.named_children(&mut cursor)
        .filter(|child| !child.is_extra())
        .collect()
}

fn line_start(node: Node<'_>, source: &[u8]) -> usize {
    let start = node.start_byte();
    source[..start]
        .iter()
        .rposition(|&byte| byte == b'\n')
        .map_or(0, |newline| newline + 1)
}

fn is_indent_byte(byte: u8) -> bool {
    matches!(byte, b' ' | b'\t' | b'\x0c')
}

/// Whether only indentation precedes `node` on its line
fn starts_line(node: Node<'_>, source: &[u8]) -> bool {
    source[line_start(node, source)..node.start_byte()]
        .iter()
        .all(|&byte| is_indent_byte(byte))
}

/// Indentation width, in bytes, of the line `node` starts on
fn indent_of(node: Node<'_>, source: &[u8]) -> usize {
    source[line_start(node, source)..]
        .iter()
        .take_while(|&&byte| is_indent_byte(byte))
        .count()
}

/// Indentation of the closest preceding line holding code
fn previous_code_indent(node: Node<'_>, source: &[u8]) -> Option<usize> {
    source[..line_start(node, source)]
        .split(|&byte| byte == b'\n')
        .rev()
        .map(|line| {
            let indent = line.iter().take_while(|&&byte| is_indent_byte(byte)).count();
            (indent, &line[indent..])
        })
        .find(|(_, code)| !code.is_empty() && code[0] != b'#' && code != b"\r")
        .map(|(indent, _)| indent)
}

fn misindented_module<'t>(module: Node<'t>, source: &[u8]) -> Option<Violation<'t>> {
    let statement = statements(module).into_iter().find(|statement| {
        starts_line(*statement, source) && indent_of(*statement, source) > 0
    })?;

    let indent = indent_of(statement, source);
    let message = match previous_code_indent(statement, source) {
        Some(previous) if previous > indent => {
            "unindent does not match any outer indentation level"
        }
        _ => "unexpected indent",
    };
    Some((statement, message))
}

fn misindented_block<'t>(block: Node<'t>, source: &[u8]) -> Option<Violation<'t>> {
    let owner = block.parent().unwrap_or(block);
    let statements = statements(block);
    if statements.is_empty() {
        return Some((owner, "expected an indented block"));
    }

    let mut level = None;
    for statement in statements.into_iter().filter(|s| starts_line(*s, source)) {
        let indent = indent_of(statement, source);
        match level {
            None if indent <= indent_of(owner, source) => {
                return Some((statement, "expected an indented block"))
            }
            None => level = Some(indent),
            Some(expected) if indent > expected => return Some((statement, "unexpected indent")),
            Some(expected) if indent < expected => {
                return Some((statement, "unindent does not match any outer indentation level"))
            }
            Some(_) => {}
        }
    }
    None
}

fn misaligned_clause<'t>(clause: Node<'t>, source: &[u8]) -> Option<Violation<'t>> {
    let owner = clause.parent()?;
    let aligned =
        !starts_line(clause, source) || indent_of(clause, source) == indent_of(owner, source);
    (!aligned).then_some((clause, "unindent does not match any outer indentation level"))
}

/// `print (x)` is a call and `print >>f, x` a shift expression in Python 3
fn is_python3_print(node: Node<'_>) -> bool {
    let mut cursor = node.walk();
    let arguments: Vec<Node<'_>> = node
        .children_by_field_name("argument", &mut cursor)
        .collect();
    let mut cursor = node.walk();
    let has_chevron = node.named_children(&mut cursor).any(|child| child.kind() == "chevron");

    has_chevron
        || matches!(
            arguments.as_slice(),
            [only] if matches!(only.kind(), "parenthesized_expression" | "tuple")
        )
}

fn is_backtick(node: Node<'_>, source: &[u8]) -> bool {
    node.utf8_text(source).is_ok_and(|text| text.contains('`'))
}

fn ancestors(node: Node<'_>) -> impl Iterator<Item = Node<'_>> {
    std::iter::successors(node.parent(), |current| current.parent())
}

fn in_function(node: Node<'_>) -> bool {
    ancestors(node)
        .find(|n| matches!(n.kind(), "function_definition" | "lambda" | "class_definition"))
        .is_some_and(|scope| scope.kind() != "class_definition")
}

fn is_async(function: Node<'_>) -> bool {
    function.child(0).is_some_and(|keyword| keyword.kind() == "async")
}

fn in_async_function(node: Node<'_>) -> bool {
    ancestors(node)
        .find(|n| matches!(n.kind(), "function_definition" | "lambda" | "class_definition"))
        .is_some_and(|scope| scope.kind() == "function_definition" && is_async(scope))
}

/// A loop's `else` clause does not count as being inside that loop
fn in_loop(node: Node<'_>) -> bool {
    let mut child = node;
    for parent in ancestors(node) {
        match parent.kind() {
            "for_statement" | "while_statement" if child.kind() != "else_clause" => return true,
            "function_definition" | "lambda" | "class_definition" => return false,
            _ => child = parent,
        }
    }
    false
}

/// Describes the first error or missing node in source order
fn describe_error_node(root: Node<'_>) -> String {
    let culprit = preorder(root)
        .into_iter()
        .find(|node| node.is_error() || node.is_missing());

    match culprit {
        Some(node) if node.is_missing() => format!(
            "invalid syntax: missing {:?} at line {}, column {}",
            node.kind(),
            node.start_position().row + 1,
            node.start_position().column + 1
        ),
        Some(node) => format!(
            "invalid syntax at line {}, column {}",
            node.start_position().row + 1,
            node.start_position().column + 1
        ),
        None => "invalid syntax".to_string(),
    }
}
