use std::cell::RefCell;
use std::rc::Rc;

use indexmap::IndexMap;

/// A runtime value as seen by the renderer.
///
/// Arrays and mappings are shared (`Rc<RefCell<..>>`) the same way runtime
/// objects are, so a container can hold a reference to itself. The
/// stringifier detects that and fails instead of recursing forever.
///
/// `Function` and `Symbol` exist so callers can hand over data they do not
/// control; neither has a literal form.
#[derive(Debug, Clone, PartialEq)]
pub enum Value {
    Undefined,
    Null,
    Bool(bool),
    Number(f64),
    String(String),
    /// Milliseconds since the Unix epoch.
    Date(i64),
    Array(Rc<RefCell<Vec<Value>>>),
    Object(Rc<RefCell<IndexMap<String, Value>>>),
    /// Source text or name of a function.
    Function(String),
    /// Symbol description.
    Symbol(String),
}

impl Value {
    pub fn array(items: Vec<Value>) -> Self {
        Value::Array(Rc::new(RefCell::new(items)))
    }

    pub fn object<K, I>(entries: I) -> Self
    where
        K: Into<String>,
        I: IntoIterator<Item = (K, Value)>,
    {
        let map = entries.into_iter().map(|(k, v)| (k.into(), v)).collect();
        Value::Object(Rc::new(RefCell::new(map)))
    }

    /// Append to an array value. Returns `false` for any other kind.
    pub fn push(&self, item: Value) -> bool {
        match self {
            Value::Array(items) => {
                items.borrow_mut().push(item);
                true
            }
            _ => false,
        }
    }

    /// Insert into a mapping value. Returns `false` for any other kind.
    pub fn set(&self, key: impl Into<String>, item: Value) -> bool {
        match self {
            Value::Object(map) => {
                map.borrow_mut().insert(key.into(), item);
                true
            }
            _ => false,
        }
    }

    /// The JS `typeof`-style name of this value's kind, used in diagnostics.
    pub fn kind_name(&self) -> &'static str {
        match self {
            Value::Undefined => "undefined",
            Value::Null => "null",
            Value::Bool(_) => "boolean",
            Value::Number(_) => "number",
            Value::String(_) => "string",
            Value::Date(_) => "date",
            Value::Array(_) => "array",
            Value::Object(_) => "object",
            Value::Function(_) => "function",
            Value::Symbol(_) => "symbol",
        }
    }

    #[inline]
    pub fn is_nullish(&self) -> bool {
        matches!(self, Value::Undefined | Value::Null)
    }

    /// JS truthiness.
    pub fn is_truthy(&self) -> bool {
        match self {
            Value::Undefined | Value::Null => false,
            Value::Bool(b) => *b,
            Value::Number(n) => *n != 0.0 && !n.is_nan(),
            Value::String(s) => !s.is_empty(),
            Value::Date(_)
            | Value::Array(_)
            | Value::Object(_)
            | Value::Function(_)
            | Value::Symbol(_) => true,
        }
    }

    #[inline]
    pub fn as_str(&self) -> Option<&str> {
        match self {
            Value::String(s) => Some(s.as_str()),
            _ => None,
        }
    }

    /// Text coercion as done by JS `String(value)`.
    ///
    /// Arrays join their elements with `,`, rendering nullish elements and
    /// cyclic back-references as empty text. Dates render their epoch
    /// milliseconds; the runtime's `Date.prototype.toString` depends on the
    /// host time zone and has no portable equivalent.
    pub fn to_text(&self) -> String {
        let mut stack = Vec::new();
        self.to_text_inner(&mut stack)
    }

    fn to_text_inner(&self, stack: &mut Vec<*const ()>) -> String {
        match self {
            Value::Undefined => "undefined".to_string(),
            Value::Null => "null".to_string(),
            Value::Bool(b) => b.to_string(),
            Value::Number(n) => number_to_text(*n),
            Value::String(s) => s.clone(),
            Value::Date(ms) => ms.to_string(),
            Value::Array(items) => {
                let ptr = Rc::as_ptr(items) as *const ();
                if stack.contains(&ptr) {
                    return String::new();
                }
                stack.push(ptr);
                let parts: Vec<String> = items
                    .borrow()
                    .iter()
                    .map(|item| {
                        if item.is_nullish() {
                            String::new()
                        } else {
                            item.to_text_inner(stack)
                        }
                    })
                    .collect();
                stack.pop();
                parts.join(",")
            }
            Value::Object(_) => "[object Object]".to_string(),
            Value::Function(source) => source.clone(),
            Value::Symbol(desc) => format!("Symbol({})", desc),
        }
    }
}

/// Format a number the way JS `Number.prototype.toString()` does.
///
/// Uses the shortest digit string that round-trips, in plain notation when
/// the decimal exponent is in `-7..21` and in `d.ddde±x` notation otherwise.
pub fn number_to_text(n: f64) -> String {
    if n.is_nan() {
        return "NaN".to_string();
    }
    if n.is_infinite() {
        return if n > 0.0 { "Infinity" } else { "-Infinity" }.to_string();
    }
    if n == 0.0 {
        return "0".to_string();
    }

    // `{:e}` yields the shortest round-trip mantissa, e.g. "1.2345e-7".
    let sci = format!("{:e}", n.abs());
    let (mantissa, exp) = match sci.split_once('e') {
        Some(parts) => parts,
        None => (sci.as_str(), "0"),
    };
    let digits: String = mantissa.chars().filter(|c| *c != '.').collect();
    let exp: i32 = exp.parse().unwrap_or(0);
    let k = digits.len() as i32;
    let n_pos = exp + 1;

    let mut out = String::new();
    if n < 0.0 {
        out.push('-');
    }

    if k <= n_pos && n_pos <= 21 {
        out.push_str(&digits);
        out.extend(std::iter::repeat('0').take((n_pos - k) as usize));
    } else if 0 < n_pos && n_pos <= 21 {
        out.push_str(&digits[..n_pos as usize]);
        out.push('.');
        out.push_str(&digits[n_pos as usize..]);
    } else if -6 < n_pos && n_pos <= 0 {
        out.push_str("0.");
        out.extend(std::iter::repeat('0').take((-n_pos) as usize));
        out.push_str(&digits);
    } else {
        let e = n_pos - 1;
        out.push_str(&digits[..1]);
        if k > 1 {
            out.push('.');
            out.push_str(&digits[1..]);
        }
        out.push('e');
        out.push(if e < 0 { '-' } else { '+' });
        out.push_str(&e.abs().to_string());
    }
    out
}

impl From<&str> for Value {
    fn from(s: &str) -> Self {
        Value::String(s.to_string())
    }
}

impl From<String> for Value {
    fn from(s: String) -> Self {
        Value::String(s)
    }
}

impl From<bool> for Value {
    fn from(b: bool) -> Self {
        Value::Bool(b)
    }
}

impl From<f64> for Value {
    fn from(n: f64) -> Self {
        Value::Number(n)
    }
}

impl From<i64> for Value {
    fn from(n: i64) -> Self {
        Value::Number(n as f64)
    }
}

impl From<Vec<Value>> for Value {
    fn from(items: Vec<Value>) -> Self {
        Value::array(items)
    }
}

impl<T: Into<Value>> From<Option<T>> for Value {
    fn from(opt: Option<T>) -> Self {
        opt.map(Into::into).unwrap_or(Value::Undefined)
    }
}

impl From<serde_json::Value> for Value {
    fn from(v: serde_json::Value) -> Self {
        match v {
            serde_json::Value::Null => Value::Null,
            serde_json::Value::Bool(b) => Value::Bool(b),
            serde_json::Value::Number(n) => Value::Number(n.as_f64().unwrap_or(f64::NAN)),
            serde_json::Value::String(s) => Value::String(s),
            serde_json::Value::Array(items) => {
                Value::array(items.into_iter().map(Value::from).collect())
            }
            serde_json::Value::Object(map) => {
                Value::object(map.into_iter().map(|(k, v)| (k, Value::from(v))))
            }
        }
    }
}
