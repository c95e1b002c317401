//! The per-surface data model store.

use crate::apply::{apply_op, get_at_path};
use crate::{Patch, PatchError, PatchOp, PatchResult, Path};
use serde_json::{Map, Value};

/// Path-addressed document backing one surface's two-way-bound fields.
///
/// The store owns a single JSON document and accepts mutations only through
/// [`PatchOp`]s, applied in receipt order. Each operation is fully atomic:
/// on failure the document is untouched. Scalars keep their native JSON
/// types — `"true"` and `true` are distinct values and never coerced.
#[derive(Clone, Debug, PartialEq)]
pub struct DataModelStore {
    doc: Value,
}

impl DataModelStore {
    /// Create a store around an existing document.
    pub fn new(doc: Value) -> Self {
        Self { doc }
    }

    /// Read the value at `path`. Missing paths and paths descending past a
    /// leaf resolve to `None`; reads never error.
    pub fn get(&self, path: &Path) -> Option<&Value> {
        get_at_path(&self.doc, path)
    }

    /// Apply one operation. The working copy is committed only on success,
    /// so a failing operation leaves the document byte-for-byte unchanged.
    pub fn apply(&mut self, op: &PatchOp) -> PatchResult<()> {
        self.doc = apply_op(&self.doc, op)?;
        Ok(())
    }

    /// Apply a patch's operations in order, committing each as it succeeds.
    ///
    /// Returns the first error together with the index of the failing
    /// operation; operations before it remain applied (receipt-order
    /// semantics — a bad op rejects itself, not the ops already landed).
    pub fn apply_patch(&mut self, patch: &Patch) -> Result<(), (usize, PatchError)> {
        for (i, op) in patch.ops().iter().enumerate() {
            self.apply(op).map_err(|e| (i, e))?;
        }
        Ok(())
    }

    /// Clone the current document — the shape shipped to clients as their
    /// local working copy.
    pub fn snapshot(&self) -> Value {
        self.doc.clone()
    }

    /// Borrow the underlying document.
    pub fn document(&self) -> &Value {
        &self.doc
    }

    /// Consume the store and return the document.
    pub fn into_inner(self) -> Value {
        self.doc
    }
}

impl Default for DataModelStore {
    fn default() -> Self {
        Self::new(Value::Object(Map::new()))
    }
}
