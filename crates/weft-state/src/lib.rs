//! Path-addressed JSON data model with atomic ordered patches.
//!
//! `weft-state` backs every surface's two-way-bound fields: a JSON document
//! addressed by `/`-delimited paths and mutated only through ordered
//! [`PatchOp`]s. Application is atomic per operation: an op that fails
//! mid-traversal leaves the document exactly as it was.
//!
//! ```
//! use weft_state::{DataModelStore, PatchOp, Path};
//! use serde_json::json;
//!
//! let mut store = DataModelStore::default();
//! store.apply(&PatchOp::replace(Path::parse("/form/agreed"), json!(false))).unwrap();
//! assert_eq!(store.get(&Path::parse("/form/agreed")), Some(&json!(false)));
//! ```

mod apply;
mod error;
mod op;
mod path;
mod store;

pub use apply::{apply_op, get_at_path};
pub use error::{value_type_name, PatchError, PatchResult};
pub use op::{Patch, PatchOp};
pub use path::{Path, Seg};
pub use store::DataModelStore;
