use crate::ast::{Value, ValueMap, VariablePath};
use ahash::{AHashMap, AHashSet};

static ABSENT: Value = Value::Absent;

/// Outcome of resolving a dotted path against the store.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum PathLookup<'a> {
    /// The path resolved to a value (which may itself be `Value::Absent`).
    Found(&'a Value),
    /// The root variable is unset.
    Unset,
    /// Descent failed: a segment was missing or a non-map value was traversed.
    Unknown,
}

/// Session-scoped variables of one workflow run.
///
/// Declared names start out `Absent`. Names that were never declared can still be
/// bound with `set`, which is how hosts attach extra context to a session.
#[derive(Debug, Clone, Default)]
pub struct VariableStore {
    values: AHashMap<String, Value>,
    declared: AHashSet<String>,
    declaration_order: Vec<String>,
}

impl VariableStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Creates a store with every given name declared and unset.
    pub fn with_declarations<I, S>(names: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        let mut store = Self::new();
        for name in names {
            store.declare(name);
        }
        store
    }

    /// Declares a variable, resetting it to `Absent`.
    pub fn declare(&mut self, name: impl Into<String>) {
        let name = name.into();
        if self.declared.insert(name.clone()) {
            self.declaration_order.push(name.clone());
        }
        self.values.insert(name, Value::Absent);
    }

    pub fn is_declared(&self, name: &str) -> bool {
        self.declared.contains(name)
    }

    /// Declared names, in declaration order.
    pub fn declared(&self) -> &[String] {
        &self.declaration_order
    }

    /// Returns the value bound to `name`, or `Value::Absent` when unset.
    pub fn get(&self, name: &str) -> &Value {
        self.values.get(name).unwrap_or(&ABSENT)
    }

    pub fn set(&mut self, name: impl Into<String>, value: impl Into<Value>) {
        self.values.insert(name.into(), value.into());
    }

    /// Copies the entries of `input` whose keys are declared variables.
    /// Returns how many variables were updated.
    pub fn merge_declared(&mut self, input: &ValueMap) -> usize {
        let mut updated = 0;
        for (key, value) in input {
            if self.is_declared(key) {
                self.values.insert(key.clone(), value.clone());
                updated += 1;
            }
        }
        updated
    }

    /// Resolves `a.b.c` by looking up `a` and descending through nested maps.
    pub fn lookup(&self, path: &VariablePath) -> PathLookup<'_> {
        let root = self.get(path.root());
        if root.is_absent() {
            return PathLookup::Unset;
        }
        let mut current = root;
        for segment in path.rest() {
            match current.get(segment) {
                Some(next) => current = next,
                None => return PathLookup::Unknown,
            }
        }
        PathLookup::Found(current)
    }

    pub fn len(&self) -> usize {
        self.values.len()
    }

    pub fn is_empty(&self) -> bool {
        self.values.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = (&String, &Value)> {
        self.values.iter()
    }

    /// An ordered copy of every binding, including unset declared names.
    pub fn to_map(&self) -> ValueMap {
        self.values
            .iter()
            .map(|(k, v)| (k.clone(), v.clone()))
            .collect()
    }
}
