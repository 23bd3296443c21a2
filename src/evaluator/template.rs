use crate::ast::VariablePath;
use crate::store::{PathLookup, VariableStore};

/// Substitutes `{{path}}` references in an interaction message.
///
/// A resolved value is written in its display form. An unset variable renders as
/// `{unset: path}` and a path that cannot be followed renders as
/// `{unknown variable: path}`, so authors can see the gap in the rendered text.
/// A `{{` with no closing `}}` is copied as-is.
pub fn render_template(template: &str, variables: &VariableStore) -> String {
    let mut output = String::with_capacity(template.len());
    let mut rest = template;

    while let Some(open) = rest.find("{{") {
        output.push_str(&rest[..open]);
        let after_open = &rest[open + 2..];
        let Some(close) = after_open.find("}}") else {
            output.push_str(&rest[open..]);
            return output;
        };

        let raw = &after_open[..close];
        if raw.is_empty() || raw.contains('}') {
            output.push_str("{{");
            rest = after_open;
            continue;
        }

        output.push_str(&substitute(raw.trim(), variables));
        rest = &after_open[close + 2..];
    }

    output.push_str(rest);
    output
}

fn substitute(path: &str, variables: &VariableStore) -> String {
    let Some(parsed) = VariablePath::parse(path) else {
        return format!("{{unknown variable: {}}}", path);
    };
    match variables.lookup(&parsed) {
        PathLookup::Found(value) if !value.is_absent() => value.to_string(),
        PathLookup::Found(_) | PathLookup::Unset => format!("{{unset: {}}}", path),
        PathLookup::Unknown => format!("{{unknown variable: {}}}", path),
    }
}
