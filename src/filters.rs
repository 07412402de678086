//! HTML escaping and attribute filters.
//!
//! Compile-time copies of the helpers the runtime prelude defines as
//! `escapeHTML`, `DEFAULT_FILTERS` (`url`, `_class`, `_style`, `_sep`),
//! `attrFilter` and `boolAttrFilter`. Coercion to text follows JS `String()`
//! (see [`Value::to_text`]), except that a date coerces to its epoch
//! milliseconds rather than the host-local date text JS would print.

use crate::utils::encode_uri_component;
use crate::value::Value;

/// Escape `& < > " '` as HTML entities. Nullish values become empty text.
pub fn escape_html(value: &Value) -> String {
    if value.is_nullish() {
        return String::new();
    }
    escape_html_text(&value.to_text())
}

/// [`escape_html`] for text that is already a string.
pub fn escape_html_text(s: &str) -> String {
    let mut out = String::with_capacity(s.len());
    for c in s.chars() {
        match c {
            '&' => out.push_str("&amp;"),
            '<' => out.push_str("&lt;"),
            '>' => out.push_str("&gt;"),
            '"' => out.push_str("&quot;"),
            '\'' => out.push_str("&#39;"),
            c => out.push(c),
        }
    }
    out
}

/// `url` filter: URI component encoding of the value's text.
pub fn url(value: &Value) -> String {
    encode_uri_component(&value.to_text())
}

/// `_class` filter: arrays join with a single space, anything else passes
/// through unchanged.
pub fn class_list(value: &Value) -> Value {
    match value {
        Value::Array(items) => {
            let parts: Vec<String> = items
                .borrow()
                .iter()
                .map(|item| if item.is_nullish() { String::new() } else { item.to_text() })
                .collect();
            Value::String(parts.join(" "))
        }
        other => other.clone(),
    }
}

/// `_style` filter: a mapping becomes `key:value;` pairs with no separator.
///
/// `null` yields empty text. Arrays and dates are objects at runtime and
/// serialize their own enumerable keys (indices for arrays, none for dates).
/// Other truthy values pass through; falsy ones become empty text.
pub fn style_map(value: &Value) -> Value {
    match value {
        Value::Null => Value::String(String::new()),
        Value::Object(map) => {
            let mut out = String::new();
            for (key, item) in map.borrow().iter() {
                out.push_str(key);
                out.push(':');
                out.push_str(&item.to_text());
                out.push(';');
            }
            Value::String(out)
        }
        Value::Array(items) => {
            let mut out = String::new();
            for (index, item) in items.borrow().iter().enumerate() {
                out.push_str(&format!("{}:{};", index, item.to_text()));
            }
            Value::String(out)
        }
        Value::Date(_) => Value::String(String::new()),
        other if other.is_truthy() => other.clone(),
        _ => Value::String(String::new()),
    }
}

/// `_sep` filter: `prefix + value` when the value is truthy, else empty.
pub fn prefix_if_present(value: &Value, prefix: &str) -> String {
    if value.is_truthy() {
        format!("{}{}", prefix, value.to_text())
    } else {
        String::new()
    }
}

/// ` name="value"` when the value is truthy; no attribute at all otherwise.
///
/// The value is not escaped here. Escaping is the producer's job.
pub fn attribute(name: &str, value: &Value) -> String {
    if value.is_truthy() {
        format!(" {}=\"{}\"", name, value.to_text())
    } else {
        String::new()
    }
}

/// ` name` when the value is truthy and not the string `"false"` or `"0"`.
pub fn boolean_attribute(name: &str, value: &Value) -> String {
    let disabled = matches!(value.as_str(), Some("false") | Some("0"));
    if value.is_truthy() && !disabled {
        format!(" {}", name)
    } else {
        String::new()
    }
}
