use crate::ast::{Value, VariablePath};
use crate::store::{PathLookup, VariableStore};

/// Resolves a `{{path}}` operand to the value a condition compares against.
///
/// Lists keep their structure so `contains` can test membership. Every other value,
/// numbers and booleans included, is seen by its string form (see `Value`'s `Display`):
/// with `n = 10`, the condition `{{n}} > 5` compares the text `"10"` with the number
/// `5`, which is a type mismatch and evaluates false. Graph authors rely on this, so
/// compare numbers and flags as strings (`{{n}} == "10"`, `{{flag}} == "True"`).
///
/// Unset roots, `Absent` values and failed descents all resolve to the empty string.
pub(crate) fn resolve_operand(variables: &VariableStore, path: &VariablePath) -> Value {
    match variables.lookup(path) {
        PathLookup::Found(Value::List(items)) => Value::List(items.clone()),
        PathLookup::Found(Value::Absent) | PathLookup::Unset | PathLookup::Unknown => {
            Value::Text(String::new())
        }
        PathLookup::Found(other) => Value::Text(other.to_string()),
    }
}
