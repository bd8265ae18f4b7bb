//! View rendering capability.

use serde_json::{Map, Value};

use crate::error::TemplateRenderError;

/// Parameters passed to a view.
pub type ViewParams = Map<String, Value>;

/// Renders a named view to an HTML fragment.
pub trait TemplateRenderer: Send + Sync {
    /// Renders `view` with `params`.
    ///
    /// # Errors
    ///
    /// Returns a [`TemplateRenderError`] when the view is missing or fails to
    /// render.
    fn render(&self, view: &str, params: &ViewParams) -> Result<String, TemplateRenderError>;
}

impl<F> TemplateRenderer for F
where
    F: Fn(&str, &ViewParams) -> Result<String, TemplateRenderError> + Send + Sync,
{
    fn render(&self, view: &str, params: &ViewParams) -> Result<String, TemplateRenderError> {
        self(view, params)
    }
}
