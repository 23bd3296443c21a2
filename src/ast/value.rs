use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::fmt::{self, Write};

/// A mapping from names to values, used for form submissions and nested variables.
pub type ValueMap = BTreeMap<String, Value>;

/// Runtime value held by the variable store and produced during condition evaluation.
///
/// Serializes to and from plain JSON: `Absent` maps to `null`. JSON integers that fit an
/// `i64` become `Integer` and keep their exact value; larger unsigned integers and every
/// number written with a fraction or exponent become `Number` and may lose precision.
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
#[serde(from = "serde_json::Value", into = "serde_json::Value")]
pub enum Value {
    #[default]
    Absent,
    Text(String),
    Integer(i64),
    /// A floating point number. Integers beyond `i64` land here too, rounded to the
    /// nearest `f64`.
    Number(f64),
    Bool(bool),
    Map(ValueMap),
    List(Vec<Value>),
}

impl Value {
    pub fn type_name(&self) -> &'static str {
        match self {
            Value::Absent => "Absent",
            Value::Text(_) => "Text",
            Value::Integer(_) => "Integer",
            Value::Number(_) => "Number",
            Value::Bool(_) => "Bool",
            Value::Map(_) => "Map",
            Value::List(_) => "List",
        }
    }

    pub fn is_absent(&self) -> bool {
        matches!(self, Value::Absent)
    }

    /// Truthiness used by `and`, `or`, `not` and the final condition outcome.
    pub fn is_truthy(&self) -> bool {
        match self {
            Value::Absent => false,
            Value::Text(s) => !s.is_empty(),
            Value::Integer(n) => *n != 0,
            Value::Number(n) => *n != 0.0 && !n.is_nan(),
            Value::Bool(b) => *b,
            Value::Map(m) => !m.is_empty(),
            Value::List(l) => !l.is_empty(),
        }
    }

    pub fn is_numeric(&self) -> bool {
        matches!(self, Value::Integer(_) | Value::Number(_))
    }

    pub fn as_str(&self) -> Option<&str> {
        match self {
            Value::Text(s) => Some(s),
            _ => None,
        }
    }

    pub fn as_i64(&self) -> Option<i64> {
        match self {
            Value::Integer(n) => Some(*n),
            _ => None,
        }
    }

    /// Numeric value of either number variant.
    pub fn as_f64(&self) -> Option<f64> {
        match self {
            Value::Integer(n) => Some(*n as f64),
            Value::Number(n) => Some(*n),
            _ => None,
        }
    }

    pub fn as_list(&self) -> Option<&[Value]> {
        match self {
            Value::List(items) => Some(items),
            _ => None,
        }
    }

    pub fn as_map(&self) -> Option<&ValueMap> {
        match self {
            Value::Map(map) => Some(map),
            _ => None,
        }
    }

    /// Looks up a key when this value is a map.
    pub fn get(&self, key: &str) -> Option<&Value> {
        self.as_map().and_then(|m| m.get(key))
    }

    /// Equality used by conditions: like `==`, except that an `Integer` and a `Number`
    /// with the same numeric value are equal.
    pub fn loosely_equals(&self, other: &Value) -> bool {
        match (self, other) {
            (Value::Integer(i), Value::Number(n)) | (Value::Number(n), Value::Integer(i)) => {
                *i as f64 == *n
            }
            _ => self == other,
        }
    }

    /// Renders the value the way it would be written inside an expression:
    /// text is quoted, everything else uses its display form.
    pub fn literal(&self) -> String {
        match self {
            Value::Absent => "null".to_string(),
            Value::Text(s) => format!("{:?}", s),
            Value::Bool(b) => b.to_string(),
            other => other.to_string(),
        }
    }

    /// The form a value takes inside a rendered map or list: text is quoted and
    /// `Absent` is `None`.
    fn write_nested(&self, out: &mut String) {
        match self {
            Value::Absent => out.push_str("None"),
            Value::Text(s) => write_quoted(out, s),
            Value::Map(map) => {
                out.push('{');
                for (i, (key, value)) in map.iter().enumerate() {
                    if i > 0 {
                        out.push_str(", ");
                    }
                    write_quoted(out, key);
                    out.push_str(": ");
                    value.write_nested(out);
                }
                out.push('}');
            }
            Value::List(items) => {
                out.push('[');
                for (i, item) in items.iter().enumerate() {
                    if i > 0 {
                        out.push_str(", ");
                    }
                    item.write_nested(out);
                }
                out.push(']');
            }
            scalar => {
                let _ = write!(out, "{}", scalar);
            }
        }
    }
}

/// Single quotes unless the text contains a single quote and no double quote.
fn write_quoted(out: &mut String, text: &str) {
    let quote = if text.contains('\'') && !text.contains('"') {
        '"'
    } else {
        '\''
    };
    out.push(quote);
    for c in text.chars() {
        match c {
            '\\' => out.push_str("\\\\"),
            '\n' => out.push_str("\\n"),
            '\t' => out.push_str("\\t"),
            '\r' => out.push_str("\\r"),
            c if c == quote => {
                out.push('\\');
                out.push(c);
            }
            c => out.push(c),
        }
    }
    out.push(quote);
}

/// Floats always show a fractional part (`10.0`) and switch to exponent form
/// (`1e+16`, `1e-05`) outside `[1e-4, 1e16)`.
fn format_float(n: f64) -> String {
    if n.is_nan() {
        return "nan".to_string();
    }
    if n.is_infinite() {
        return if n > 0.0 { "inf" } else { "-inf" }.to_string();
    }
    let magnitude = n.abs();
    if magnitude != 0.0 && !(1e-4..1e16).contains(&magnitude) {
        let formatted = format!("{:e}", n);
        return match formatted.split_once('e') {
            Some((mantissa, exponent)) => {
                let (sign, digits) = match exponent.strip_prefix('-') {
                    Some(digits) => ('-', digits),
                    None => ('+', exponent),
                };
                format!("{}e{}{:0>2}", mantissa, sign, digits)
            }
            None => formatted,
        };
    }
    if n.fract() == 0.0 {
        format!("{:.1}", n)
    } else {
        format!("{}", n)
    }
}

/// The display form is the "string form" a value takes when it is substituted into a
/// condition or a message template. Booleans are `True`/`False`, floats keep their
/// decimal point, and maps and lists use literal notation: `{'k': 'v'}`, `['a', 1]`.
/// Map keys appear in sorted order.
impl fmt::Display for Value {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Value::Absent => Ok(()),
            Value::Text(s) => write!(f, "{}", s),
            Value::Integer(n) => write!(f, "{}", n),
            Value::Number(n) => write!(f, "{}", format_float(*n)),
            Value::Bool(true) => write!(f, "True"),
            Value::Bool(false) => write!(f, "False"),
            Value::Map(_) | Value::List(_) => {
                let mut out = String::new();
                self.write_nested(&mut out);
                write!(f, "{}", out)
            }
        }
    }
}

impl From<serde_json::Value> for Value {
    fn from(value: serde_json::Value) -> Self {
        match value {
            serde_json::Value::Null => Value::Absent,
            serde_json::Value::Bool(b) => Value::Bool(b),
            serde_json::Value::Number(n) => match n.as_i64() {
                Some(i) => Value::Integer(i),
                None => n.as_f64().map_or(Value::Absent, Value::Number),
            },
            serde_json::Value::String(s) => Value::Text(s),
            serde_json::Value::Array(items) => {
                Value::List(items.into_iter().map(Value::from).collect())
            }
            serde_json::Value::Object(map) => {
                Value::Map(map.into_iter().map(|(k, v)| (k, Value::from(v))).collect())
            }
        }
    }
}

impl From<Value> for serde_json::Value {
    fn from(value: Value) -> Self {
        match value {
            Value::Absent => serde_json::Value::Null,
            Value::Text(s) => serde_json::Value::String(s),
            Value::Integer(n) => serde_json::Value::from(n),
            // JSON has no NaN or infinity.
            Value::Number(n) => serde_json::Number::from_f64(n)
                .map_or(serde_json::Value::Null, serde_json::Value::Number),
            Value::Bool(b) => serde_json::Value::Bool(b),
            Value::Map(map) => serde_json::Value::Object(
                map.into_iter()
                    .map(|(k, v)| (k, serde_json::Value::from(v)))
                    .collect(),
            ),
            Value::List(items) => {
                serde_json::Value::Array(items.into_iter().map(serde_json::Value::from).collect())
            }
        }
    }
}

impl From<&str> for Value {
    fn from(s: &str) -> Self {
        Value::Text(s.to_string())
    }
}

impl From<String> for Value {
    fn from(s: String) -> Self {
        Value::Text(s)
    }
}

impl From<f64> for Value {
    fn from(n: f64) -> Self {
        Value::Number(n)
    }
}

impl From<i64> for Value {
    fn from(n: i64) -> Self {
        Value::Integer(n)
    }
}

impl From<bool> for Value {
    fn from(b: bool) -> Self {
        Value::Bool(b)
    }
}

impl From<Vec<Value>> for Value {
    fn from(items: Vec<Value>) -> Self {
        Value::List(items)
    }
}

impl From<ValueMap> for Value {
    fn from(map: ValueMap) -> Self {
        Value::Map(map)
    }
}

/// A `{{a.b.c}}` reference to a workflow variable, split into its dotted segments.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct VariablePath {
    segments: Vec<String>,
}

impl VariablePath {
    /// Parses a dotted path. Returns `None` if the path or any segment is empty.
    pub fn parse(path: &str) -> Option<Self> {
        let segments: Vec<String> = path.trim().split('.').map(|s| s.trim().to_string()).collect();
        if segments.iter().any(|s| s.is_empty()) {
            return None;
        }
        Some(Self { segments })
    }

    /// The variable name the path starts from.
    pub fn root(&self) -> &str {
        &self.segments[0]
    }

    /// Segments after the root, used to descend into nested maps.
    pub fn rest(&self) -> &[String] {
        &self.segments[1..]
    }

    pub fn segments(&self) -> &[String] {
        &self.segments
    }

    pub fn dotted(&self) -> String {
        self.segments.join(".")
    }
}

impl fmt::Display for VariablePath {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{{{{{}}}}}", self.dotted())
    }
}
