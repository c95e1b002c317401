//! Patch operations over the data model document.
//!
//! Three operation kinds cover every mutation the protocol can express:
//! `replace` (set, creating missing object intermediates), `append` (array
//! push) and `remove` (delete a key or array element).

use crate::Path;
use serde::{Deserialize, Serialize};
use serde_json::Value;

/// A single atomic mutation of the data model.
///
/// Serializes with the wire field names: `{"op": "replace", "path": "/a",
/// "value": ...}`.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(tag = "op", rename_all = "camelCase")]
pub enum PatchOp {
    /// Set the value at `path`, creating intermediate objects for missing
    /// key segments. Fails when traversal passes through a scalar or an
    /// out-of-bounds array index.
    Replace {
        /// Target path.
        path: Path,
        /// Value to set.
        value: Value,
    },

    /// Push a value onto the array at `path`. The array is created when the
    /// target is absent or null; an existing non-array value is an error.
    Append {
        /// Target path (array or absent).
        path: Path,
        /// Value to append.
        value: Value,
    },

    /// Delete the value at `path`. A missing path is an error.
    Remove {
        /// Target path.
        path: Path,
    },
}

impl PatchOp {
    /// Create a replace operation.
    #[inline]
    pub fn replace(path: Path, value: impl Into<Value>) -> Self {
        PatchOp::Replace {
            path,
            value: value.into(),
        }
    }

    /// Create an append operation.
    #[inline]
    pub fn append(path: Path, value: impl Into<Value>) -> Self {
        PatchOp::Append {
            path,
            value: value.into(),
        }
    }

    /// Create a remove operation.
    #[inline]
    pub fn remove(path: Path) -> Self {
        PatchOp::Remove { path }
    }

    /// The path this operation targets.
    #[inline]
    pub fn path(&self) -> &Path {
        match self {
            PatchOp::Replace { path, .. } => path,
            PatchOp::Append { path, .. } => path,
            PatchOp::Remove { path } => path,
        }
    }

    /// The value carried by this operation, if any.
    #[inline]
    pub fn value(&self) -> Option<&Value> {
        match self {
            PatchOp::Replace { value, .. } | PatchOp::Append { value, .. } => Some(value),
            PatchOp::Remove { .. } => None,
        }
    }

    /// The wire name of this operation.
    #[inline]
    pub fn name(&self) -> &'static str {
        match self {
            PatchOp::Replace { .. } => "replace",
            PatchOp::Append { .. } => "append",
            PatchOp::Remove { .. } => "remove",
        }
    }
}

/// An ordered list of operations, applied in receipt order.
#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
pub struct Patch {
    ops: Vec<PatchOp>,
}

impl Patch {
    /// Create an empty patch.
    #[inline]
    pub fn new() -> Self {
        Self::default()
    }

    /// Create a patch from a list of operations.
    #[inline]
    pub fn with_ops(ops: Vec<PatchOp>) -> Self {
        Self { ops }
    }

    /// Append an operation (builder).
    #[inline]
    pub fn with_op(mut self, op: PatchOp) -> Self {
        self.ops.push(op);
        self
    }

    /// Push an operation.
    #[inline]
    pub fn push(&mut self, op: PatchOp) {
        self.ops.push(op);
    }

    /// The operations in order.
    #[inline]
    pub fn ops(&self) -> &[PatchOp] {
        &self.ops
    }

    /// Number of operations.
    #[inline]
    pub fn len(&self) -> usize {
        self.ops.len()
    }

    /// True when the patch carries no operations.
    #[inline]
    pub fn is_empty(&self) -> bool {
        self.ops.is_empty()
    }
}

impl IntoIterator for Patch {
    type Item = PatchOp;
    type IntoIter = std::vec::IntoIter<PatchOp>;

    fn into_iter(self) -> Self::IntoIter {
        self.ops.into_iter()
    }
}

impl FromIterator<PatchOp> for Patch {
    fn from_iter<I: IntoIterator<Item = PatchOp>>(iter: I) -> Self {
        Patch {
            ops: iter.into_iter().collect(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::path;
    use serde_json::json;

    #[test]
    fn op_constructors() {
        let op = PatchOp::replace(path!("a"), json!(1));
        assert_eq!(op.name(), "replace");
        assert_eq!(op.path(), &path!("a"));
        assert_eq!(op.value(), Some(&json!(1)));

        let op = PatchOp::remove(path!("b"));
        assert_eq!(op.name(), "remove");
        assert_eq!(op.value(), None);
    }

    #[test]
    fn op_wire_shape() {
        let op = PatchOp::replace(path!("ui", "cb", "value"), json!(false));
        let wire = serde_json::to_value(&op).unwrap();
        assert_eq!(
            wire,
            json!({"op": "replace", "path": "/ui/cb/value", "value": false})
        );

        let back: PatchOp = serde_json::from_value(wire).unwrap();
        assert_eq!(back, op);
    }

    #[test]
    fn remove_wire_shape_has_no_value() {
        let wire = serde_json::to_value(PatchOp::remove(path!("x"))).unwrap();
        assert_eq!(wire, json!({"op": "remove", "path": "/x"}));
    }

    #[test]
    fn patch_builder() {
        let patch = Patch::new()
            .with_op(PatchOp::replace(path!("a"), json!(1)))
            .with_op(PatchOp::remove(path!("b")));
        assert_eq!(patch.len(), 2);
        assert!(!patch.is_empty());
    }
}
