//! Patch application.
//!
//! `apply_op` is a pure function: it never mutates its input, returning a new
//! document on success. Atomicity falls out of that shape — a failing
//! operation simply discards the working copy.

use crate::error::{value_type_name, PatchError, PatchResult};
use crate::{Path, PatchOp, Seg};
use serde_json::{Map, Value};

/// Apply one operation to a document, returning the new document.
///
/// The input document is never modified. Deterministic: the same document
/// and operation always produce the same result.
pub fn apply_op(doc: &Value, op: &PatchOp) -> PatchResult<Value> {
    let mut out = doc.clone();
    match op {
        PatchOp::Replace { path, value } => apply_replace(&mut out, path, value.clone())?,
        PatchOp::Append { path, value } => apply_append(&mut out, path, value.clone())?,
        PatchOp::Remove { path } => apply_remove(&mut out, path)?,
    }
    Ok(out)
}

/// Read the value at a path. Paths beyond an existing leaf resolve to
/// `None`; reads never error.
pub fn get_at_path<'a>(doc: &'a Value, path: &Path) -> Option<&'a Value> {
    let mut current = doc;
    for seg in path.segments() {
        current = match (current, seg) {
            (Value::Object(obj), Seg::Key(k)) => obj.get(k)?,
            // Numeric-looking segments still address object keys.
            (Value::Object(obj), Seg::Index(i)) => obj.get(&i.to_string())?,
            (Value::Array(arr), Seg::Index(i)) => arr.get(*i)?,
            _ => return None,
        };
    }
    Some(current)
}

fn apply_replace(doc: &mut Value, path: &Path, value: Value) -> PatchResult<()> {
    if path.is_empty() {
        *doc = value;
        return Ok(());
    }
    set_at(doc, path, 0, value)
}

/// Recursive set. Missing or null intermediates become objects for key
/// segments; an existing scalar intermediate is a type mismatch rather than
/// being clobbered.
fn set_at(current: &mut Value, full: &Path, depth: usize, value: Value) -> PatchResult<()> {
    let seg = &full.segments()[depth];
    let last = depth == full.len() - 1;

    match seg {
        Seg::Key(key) => {
            if current.is_null() {
                *current = Value::Object(Map::new());
            }
            let type_err =
                PatchError::type_mismatch(prefix(full, depth), "object", value_type_name(current));
            let obj = current.as_object_mut().ok_or(type_err)?;
            if last {
                obj.insert(key.clone(), value);
                Ok(())
            } else {
                let entry = obj.entry(key.clone()).or_insert(Value::Null);
                set_at(entry, full, depth + 1, value)
            }
        }
        Seg::Index(idx) => {
            if current.is_null() {
                *current = Value::Object(Map::new());
            }
            // Check the kind before taking the mutable borrow.
            if current.is_object() {
                // Objects with numeric keys are addressed by the string form.
                let obj = current.as_object_mut().unwrap();
                let key = idx.to_string();
                if last {
                    obj.insert(key, value);
                    Ok(())
                } else {
                    let entry = obj.entry(key).or_insert(Value::Null);
                    set_at(entry, full, depth + 1, value)
                }
            } else if current.is_array() {
                let arr = current.as_array_mut().unwrap();
                if *idx >= arr.len() {
                    return Err(PatchError::index_out_of_bounds(
                        prefix(full, depth + 1),
                        *idx,
                        arr.len(),
                    ));
                }
                if last {
                    arr[*idx] = value;
                    Ok(())
                } else {
                    set_at(&mut arr[*idx], full, depth + 1, value)
                }
            } else {
                Err(PatchError::type_mismatch(
                    prefix(full, depth),
                    "array",
                    value_type_name(current),
                ))
            }
        }
    }
}

fn apply_append(doc: &mut Value, path: &Path, value: Value) -> PatchResult<()> {
    let target = get_or_create(doc, path, 0)?;
    if target.is_null() {
        *target = Value::Array(Vec::new());
    }
    match target {
        Value::Array(arr) => {
            arr.push(value);
            Ok(())
        }
        _ => Err(PatchError::append_requires_array(path.clone())),
    }
}

fn apply_remove(doc: &mut Value, path: &Path) -> PatchResult<()> {
    if path.is_empty() {
        *doc = Value::Object(Map::new());
        return Ok(());
    }
    let parent_path = path.parent().unwrap_or_else(Path::root);
    let parent = get_at_path_mut(doc, &parent_path)
        .ok_or_else(|| PatchError::path_not_found(path.clone()))?;
    let last = &path.segments()[path.len() - 1];

    match (parent, last) {
        (Value::Object(obj), Seg::Key(k)) => obj
            .remove(k)
            .map(|_| ())
            .ok_or_else(|| PatchError::path_not_found(path.clone())),
        (Value::Object(obj), Seg::Index(i)) => obj
            .remove(&i.to_string())
            .map(|_| ())
            .ok_or_else(|| PatchError::path_not_found(path.clone())),
        (Value::Array(arr), Seg::Index(i)) => {
            if *i < arr.len() {
                arr.remove(*i);
                Ok(())
            } else {
                Err(PatchError::index_out_of_bounds(
                    path.clone(),
                    *i,
                    arr.len(),
                ))
            }
        }
        (other, Seg::Key(_)) => Err(PatchError::type_mismatch(
            parent_path,
            "object",
            value_type_name(other),
        )),
        (other, Seg::Index(_)) => Err(PatchError::type_mismatch(
            parent_path,
            "array",
            value_type_name(other),
        )),
    }
}

fn get_at_path_mut<'a>(doc: &'a mut Value, path: &Path) -> Option<&'a mut Value> {
    path.segments()
        .iter()
        .try_fold(doc, |current, seg| match (current, seg) {
            (Value::Object(obj), Seg::Key(k)) => obj.get_mut(k),
            (Value::Object(obj), Seg::Index(i)) => obj.get_mut(&i.to_string()),
            (Value::Array(arr), Seg::Index(i)) => arr.get_mut(*i),
            _ => None,
        })
}

/// Walk to `path`, creating missing object intermediates, and return the
/// (possibly null) slot at the end. Scalar intermediates are a type
/// mismatch; array segments must be in bounds.
fn get_or_create<'a>(
    current: &'a mut Value,
    full: &Path,
    depth: usize,
) -> PatchResult<&'a mut Value> {
    if depth == full.len() {
        return Ok(current);
    }
    let seg = &full.segments()[depth];
    match seg {
        Seg::Key(key) => {
            if current.is_null() {
                *current = Value::Object(Map::new());
            }
            let err = PatchError::type_mismatch(
                prefix(full, depth),
                "object",
                value_type_name(current),
            );
            let obj = current.as_object_mut().ok_or(err)?;
            let entry = obj.entry(key.clone()).or_insert(Value::Null);
            get_or_create(entry, full, depth + 1)
        }
        Seg::Index(idx) => {
            if current.is_null() {
                *current = Value::Object(Map::new());
            }
            if current.is_object() {
                let obj = current.as_object_mut().unwrap();
                let entry = obj.entry(idx.to_string()).or_insert(Value::Null);
                return get_or_create(entry, full, depth + 1);
            }
            let type_err =
                PatchError::type_mismatch(prefix(full, depth), "array", value_type_name(current));
            let arr = current.as_array_mut().ok_or(type_err)?;
            if *idx >= arr.len() {
                return Err(PatchError::index_out_of_bounds(
                    prefix(full, depth + 1),
                    *idx,
                    arr.len(),
                ));
            }
            get_or_create(&mut arr[*idx], full, depth + 1)
        }
    }
}

/// The first `depth` segments of `full`, for error reporting.
fn prefix(full: &Path, depth: usize) -> Path {
    Path::from_segments(full.segments()[..depth].to_vec())
}
