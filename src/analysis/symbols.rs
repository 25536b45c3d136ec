//! Function and class definitions of a Python module
//!
//! The whole file is parsed with tree-sitter and every `function_definition`
//! and `class_definition` node is reported, nested ones included, in pre-order
//! depth-first order. Decorated definitions report the line of the `def` or
//! `class` keyword. A file that fails the syntax checks yields no definitions
//! at all.

use serde::{Deserialize, Serialize};
use tree_sitter::{Node, Parser, Tree};

use super::syntax;
use crate::error::{NavigatorError, Result};

/// Kind of a definition
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum DefinitionKind {
    /// `def` or `async def`
    Function,
    /// `class`
    Class,
}

/// A named definition and the 1-based line it starts on
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Definition {
    /// Declared name
    pub name: String,
    /// Function or class
    #[serde(rename = "type")]
    pub kind: DefinitionKind,
    /// 1-based line of the defining keyword
    pub line: usize,
}

/// Extracts every function and class definition from Python source
pub fn extract_definitions(source: &str) -> Result<Vec<Definition>> {
    let tree = parse(source)?;
    let root = tree.root_node();
    syntax::check(root, source)?;

    let bytes = source.as_bytes();
    let mut definitions = Vec::new();
    for node in preorder(root) {
        let kind = match node.kind() {
            "function_definition" => DefinitionKind::Function,
            "class_definition" => DefinitionKind::Class,
            _ => continue,
        };
        let Some(name) = node.child_by_field_name("name") else {
            continue;
        };
        let name = name.utf8_text(bytes).map_err(|e| {
            NavigatorError::Parse(format!("definition name is not valid UTF-8: {}", e))
        })?;

        definitions.push(Definition {
            name: name.to_string(),
            kind,
            line: node.start_position().row + 1,
        });
    }

    Ok(definitions)
}

fn parse(source: &str) -> Result<Tree> {
    let mut parser = Parser::new();
    parser
        .set_language(&tree_sitter_python::LANGUAGE.into())
        .map_err(|e| NavigatorError::Internal(format!("Failed to load Python grammar: {}", e)))?;
    parser
        .parse(source, None)
        .ok_or_else(|| NavigatorError::Parse("parser produced no syntax tree".into()))
}

/// All nodes under `root` in pre-order, walked with a cursor
pub(super) fn preorder(root: Node<'_>) -> Vec<Node<'_>> {
    let mut nodes = Vec::new();
    let mut cursor = root.walk();

    loop {
        nodes.push(cursor.node());
        if cursor.goto_first_child() {
            continue;
        }
        loop {
            if cursor.goto_next_sibling() {
                break;
            }
            if !cursor.goto_parent() {
                return nodes;
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;
    use test_case::test_case;

    fn def(name: &str, kind: DefinitionKind, line: usize) -> Definition {
        Definition {
            name: name.to_string(),
            kind,
            line,
        }
    }

    #[test]
    fn test_nested_class_inside_function() {
        let source = "import os\n\
                      \n\
                      def foo():\n\
                      \x20   x = 1\n\
                      \x20   y = 2\n\
                      \n\
                      \x20   class Bar:\n\
                      \x20       pass\n\
                      \x20   return Bar\n";

        let definitions = extract_definitions(source).unwrap();
        assert_eq!(
            definitions,
            vec![
                def("foo", DefinitionKind::Function, 3),
                def("Bar", DefinitionKind::Class, 7),
            ]
        );
    }

    #[test]
    fn test_methods_follow_their_class() {
        let source = r#"class Service:
    def start(self):
        pass

    async def stop(self):
        pass

def helper():
    pass
"#;
        let definitions = extract_definitions(source).unwrap();
        assert_eq!(
            definitions,
            vec![
                def("Service", DefinitionKind::Class, 1),
                def("start", DefinitionKind::Function, 2),
                def("stop", DefinitionKind::Function, 5),
                def("helper", DefinitionKind::Function, 8),
            ]
        );
    }

    #[test]
    fn test_decorated_definition_reports_def_line() {
        let source = "@app.get('/')\n@cached\ndef index():\n    return 1\n";
        let definitions = extract_definitions(source).unwrap();
        assert_eq!(definitions, vec![def("index", DefinitionKind::Function, 3)]);
    }

    #[test]
    fn test_duplicates_are_kept() {
        let source = "def run():\n    pass\n\ndef run():\n    pass\n";
        let definitions = extract_definitions(source).unwrap();
        assert_eq!(
            definitions,
            vec![
                def("run", DefinitionKind::Function, 1),
                def("run", DefinitionKind::Function, 4),
            ]
        );
    }

    #[test]
    fn test_unbalanced_parentheses_fail() {
        let source = "def foo():\n    return bar(1, 2\n\ndef baz():\n    pass\n";
        let result = extract_definitions(source);
        assert!(matches!(result, Err(NavigatorError::Parse(_))));
    }

    #[test_case("def f():\npass\n" ; "body not indented")]
    #[test_case("x = 1\n    y = 2\n" ; "unexpected indent")]
    #[test_case("print \"hi\"\n" ; "python 2 print")]
    #[test_case("def f():\n    pass\n\nreturn f\n" ; "return outside function")]
    fn test_recovered_syntax_errors_fail(source: &str) {
        let result = extract_definitions(source);
        assert!(matches!(result, Err(NavigatorError::Parse(_))), "{:?}", result);
    }

    #[test]
    fn test_empty_source() {
        assert!(extract_definitions("").unwrap().is_empty());
        assert!(extract_definitions("# only a comment\n").unwrap().is_empty());
    }

    #[test]
    fn test_serialized_shape() {
        let value = serde_json::to_value(def("Bar", DefinitionKind::Class, 7)).unwrap();
        assert_eq!(value, serde_json::json!({"name": "Bar", "type": "class", "line": 7}));
    }
}
