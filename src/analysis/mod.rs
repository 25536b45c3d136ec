//! Python source analysis: definition extraction and textual reference search

use std::path::Path;

use crate::error::{NavigatorError, Result};

pub mod references;
pub mod symbols;
mod syntax;

pub use references::{find_references, Reference};
pub use symbols::{extract_definitions, Definition, DefinitionKind};

/// File extension the analyzers accept
pub const PYTHON_EXTENSION: &str = "py";

/// Fails with `UnsupportedFileType` unless `path` ends in `.py`
pub fn ensure_python_path(path: &str) -> Result<()> {
    match Path::new(path).extension().and_then(|ext| ext.to_str()) {
        Some(PYTHON_EXTENSION) => Ok(()),
        _ => Err(NavigatorError::UnsupportedFileType(format!(
            "{} (only .{} files can be analyzed)",
            path, PYTHON_EXTENSION
        ))),
    }
}

/// Decodes provider bytes, replacing invalid UTF-8 sequences
pub fn decode_source(bytes: &[u8]) -> String {
    String::from_utf8_lossy(bytes).into_owned()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_extension_check() {
        assert!(ensure_python_path("app/main.py").is_ok());
        assert!(ensure_python_path("setup.py").is_ok());
        assert!(matches!(
            ensure_python_path("README.md"),
            Err(NavigatorError::UnsupportedFileType(_))
        ));
        assert!(ensure_python_path("script.pyc").is_err());
        assert!(ensure_python_path("Makefile").is_err());
        assert!(ensure_python_path("main.PY").is_err());
    }

    #[test]
    fn test_lossy_decode() {
        let decoded = decode_source(b"x = '\xff'\n");
        assert_eq!(decoded, "x = '\u{fffd}'\n");
    }
}
