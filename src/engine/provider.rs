use crate::ast::ValueMap;
use crate::error::ProviderError;
use crate::graph::FieldSpec;

/// The host side of a workflow run: shows messages and collects form input.
///
/// The engine calls `display_form` once per interaction attempt and blocks until it
/// returns, so exactly one interaction is outstanding at a time. Implementations decide
/// how the form is rendered (terminal prompts, an HTTP round trip, a test script).
pub trait InteractionProvider {
    fn display_message(&mut self, message: &str);

    fn display_error(&mut self, message: &str);

    /// Renders a form and returns the submitted values keyed by field key.
    ///
    /// Returning an error aborts the run.
    fn display_form(&mut self, title: &str, fields: &[FieldSpec]) -> Result<ValueMap, ProviderError>;
}
