//! Grep-style identifier search
//!
//! A line matches when it contains the symbol as a plain, case-sensitive
//! substring. There is no tokenization: searching for `io` matches `Bio`.

use serde::{Deserialize, Serialize};

/// A line containing the searched symbol
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Reference {
    /// 1-based line number
    pub line: usize,
    /// The line with surrounding whitespace removed
    pub snippet: String,
}

/// Returns one reference per line of `source` containing `symbol`
pub fn find_references(source: &str, symbol: &str) -> Vec<Reference> {
    source
        .lines()
        .enumerate()
        .filter(|(_, line)| line.contains(symbol))
        .map(|(index, line)| Reference {
            line: index + 1,
            snippet: line.trim().to_string(),
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    fn reference(line: usize, snippet: &str) -> Reference {
        Reference {
            line,
            snippet: snippet.to_string(),
        }
    }

    #[test]
    fn test_substring_matching() {
        let source = "foo()\n  bar(foo)\nnofoothing";
        assert_eq!(
            find_references(source, "foo"),
            vec![
                reference(1, "foo()"),
                reference(2, "bar(foo)"),
                reference(3, "nofoothing"),
            ]
        );
    }

    #[test]
    fn test_no_token_boundaries() {
        let source = "import io\nfrom Bio import SeqIO\nprint('x')\n";
        let lines: Vec<usize> = find_references(source, "io").iter().map(|r| r.line).collect();
        assert_eq!(lines, vec![1, 2]);
    }

    #[test]
    fn test_case_sensitive_and_one_record_per_line() {
        let source = "Foo = foo + foo\nFOO = 1\n";
        assert_eq!(find_references(source, "foo"), vec![reference(1, "Foo = foo + foo")]);
    }

    #[test]
    fn test_crlf_and_missing_symbol() {
        let source = "\tvalue = compute()\r\nreturn value\r\n";
        assert_eq!(
            find_references(source, "value"),
            vec![reference(1, "value = compute()"), reference(2, "return value")]
        );
        assert!(find_references(source, "missing").is_empty());
    }
}
