//! Compile-time value stringifier.
//!
//! Turns a [`Value`] into JS source text that rebuilds an equivalent value
//! when evaluated. The runtime prelude carries `stringifier`, a JS copy of
//! these functions; both produce identical text for identical input.
//!
//! Rules:
//! - strings are quoted with [`quote_string_literal`]
//! - numbers use JS number formatting; `NaN` and infinities fail
//! - `undefined` and `null` both become `null`
//! - mapping keys whose value is `undefined` are omitted, not emitted as `null`
//! - dates become `new Date(<epoch ms>)`; instants outside the JS time
//!   range fail like the runtime's `NaN` timestamp
//! - a container that contains itself fails with `CyclicStructure`

use std::cell::RefCell;
use std::rc::Rc;

use indexmap::IndexMap;

use crate::utils::quote_string_literal;
use crate::value::{number_to_text, Value};
use crate::StringifyError;

/// Containers currently on the serialization path, by address.
type Path = Vec<*const ()>;

/// Stringify any supported value.
pub fn any(value: &Value) -> Result<String, StringifyError> {
    let mut path = Path::new();
    any_inner(value, &mut path)
}

/// Stringify a string.
pub fn str_literal(s: &str) -> String {
    quote_string_literal(s)
}

/// Largest `|epoch ms|` a JS `Date` can hold.
pub const MAX_DATE_MS: u64 = 8_640_000_000_000_000;

/// Stringify a date given as epoch milliseconds.
///
/// An instant outside `±MAX_DATE_MS` is an Invalid Date in JS, whose
/// timestamp is `NaN`, so it fails as a non-finite number.
pub fn date(epoch_ms: i64) -> Result<String, StringifyError> {
    if epoch_ms.unsigned_abs() > MAX_DATE_MS {
        return Err(StringifyError::NonFiniteNumber(f64::NAN));
    }
    Ok(format!("new Date({})", epoch_ms))
}

/// Stringify a finite number.
pub fn number(n: f64) -> Result<String, StringifyError> {
    if !n.is_finite() {
        return Err(StringifyError::NonFiniteNumber(n));
    }
    Ok(number_to_text(n))
}

/// Stringify an array.
pub fn arr(items: &Rc<RefCell<Vec<Value>>>) -> Result<String, StringifyError> {
    let mut path = Path::new();
    arr_inner(items, &mut path)
}

/// Stringify a mapping, skipping `undefined` values.
pub fn obj(map: &Rc<RefCell<IndexMap<String, Value>>>) -> Result<String, StringifyError> {
    let mut path = Path::new();
    obj_inner(map, &mut path)
}

fn any_inner(value: &Value, path: &mut Path) -> Result<String, StringifyError> {
    match value {
        Value::String(s) => Ok(str_literal(s)),
        Value::Number(n) => number(*n),
        Value::Bool(b) => Ok(if *b { "true" } else { "false" }.to_string()),
        Value::Undefined | Value::Null => Ok("null".to_string()),
        Value::Date(ms) => date(*ms),
        Value::Array(items) => arr_inner(items, path),
        Value::Object(map) => obj_inner(map, path),
        Value::Function(_) | Value::Symbol(_) => Err(StringifyError::UnsupportedValueKind {
            kind: value.kind_name(),
            value: value.to_text(),
        }),
    }
}

fn enter<T>(container: &Rc<T>, path: &mut Path) -> Result<(), StringifyError> {
    let ptr = Rc::as_ptr(container) as *const ();
    if path.contains(&ptr) {
        return Err(StringifyError::CyclicStructure);
    }
    path.push(ptr);
    Ok(())
}

fn arr_inner(items: &Rc<RefCell<Vec<Value>>>, path: &mut Path) -> Result<String, StringifyError> {
    enter(items, path)?;

    let mut out = String::from("[");
    for (i, item) in items.borrow().iter().enumerate() {
        if i > 0 {
            out.push(',');
        }
        out.push_str(&any_inner(item, path)?);
    }
    out.push(']');

    path.pop();
    Ok(out)
}

fn obj_inner(
    map: &Rc<RefCell<IndexMap<String, Value>>>,
    path: &mut Path,
) -> Result<String, StringifyError> {
    enter(map, path)?;

    let mut out = String::from("{");
    let mut first = true;
    for (key, item) in map.borrow().iter() {
        if matches!(item, Value::Undefined) {
            continue;
        }
        if !first {
            out.push(',');
        }
        first = false;

        out.push_str(&str_literal(key));
        out.push(':');
        out.push_str(&any_inner(item, path)?);
    }
    out.push('}');

    path.pop();
    Ok(out)
}
