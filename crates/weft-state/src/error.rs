//! Error types for data model patch application.

use crate::Path;
use thiserror::Error;

/// Result alias for patch operations.
pub type PatchResult<T> = Result<T, PatchError>;

/// Errors produced while applying a patch operation.
///
/// All variants are recoverable: the offending operation is rejected and the
/// document is left untouched.
#[derive(Debug, Clone, Error, PartialEq)]
pub enum PatchError {
    /// The path does not exist in the document.
    #[error("path not found: {path}")]
    PathNotFound {
        /// The path that was not found.
        path: Path,
    },

    /// An array index is out of bounds.
    #[error("index {index} out of bounds (len {len}) at {path}")]
    IndexOutOfBounds {
        /// Path to the array.
        path: Path,
        /// The offending index.
        index: usize,
        /// Actual array length.
        len: usize,
    },

    /// Traversal hit a value of the wrong kind.
    #[error("type mismatch at {path}: expected {expected}, found {found}")]
    TypeMismatch {
        /// Where the mismatch occurred.
        path: Path,
        /// Expected value kind.
        expected: &'static str,
        /// Actual value kind.
        found: &'static str,
    },

    /// Append targeted an existing non-array value.
    #[error("append requires an array at {path}")]
    AppendRequiresArray {
        /// Path to the non-array value.
        path: Path,
    },
}

impl PatchError {
    /// Create a path-not-found error.
    #[inline]
    pub fn path_not_found(path: Path) -> Self {
        PatchError::PathNotFound { path }
    }

    /// Create an index-out-of-bounds error.
    #[inline]
    pub fn index_out_of_bounds(path: Path, index: usize, len: usize) -> Self {
        PatchError::IndexOutOfBounds { path, index, len }
    }

    /// Create a type-mismatch error.
    #[inline]
    pub fn type_mismatch(path: Path, expected: &'static str, found: &'static str) -> Self {
        PatchError::TypeMismatch {
            path,
            expected,
            found,
        }
    }

    /// Create an append-requires-array error.
    #[inline]
    pub fn append_requires_array(path: Path) -> Self {
        PatchError::AppendRequiresArray { path }
    }
}

/// Human-readable kind name of a JSON value, for error messages.
#[inline]
pub fn value_type_name(v: &serde_json::Value) -> &'static str {
    match v {
        serde_json::Value::Null => "null",
        serde_json::Value::Bool(_) => "boolean",
        serde_json::Value::Number(_) => "number",
        serde_json::Value::String(_) => "string",
        serde_json::Value::Array(_) => "array",
        serde_json::Value::Object(_) => "object",
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn error_display_carries_path() {
        let err = PatchError::path_not_found(Path::parse("/a/b"));
        assert_eq!(err.to_string(), "path not found: /a/b");

        let err = PatchError::index_out_of_bounds(Path::parse("/items"), 5, 2);
        assert!(err.to_string().contains("index 5"));
        assert!(err.to_string().contains("/items"));
    }

    #[test]
    fn value_type_names() {
        assert_eq!(value_type_name(&json!(null)), "null");
        assert_eq!(value_type_name(&json!(true)), "boolean");
        assert_eq!(value_type_name(&json!(1)), "number");
        assert_eq!(value_type_name(&json!("s")), "string");
        assert_eq!(value_type_name(&json!([])), "array");
        assert_eq!(value_type_name(&json!({})), "object");
    }
}
