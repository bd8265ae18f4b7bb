//! # mailcraft-view
//!
//! Renders message bodies from template files with `minijinja`.
//!
//! Views are addressed with dotted names: `emails.welcome` resolves to
//! `<dir>/emails/welcome.html`. Parameters given to
//! `MessageBuilder::with_view` become the template context, and output is
//! HTML-escaped by default.
//!
//! ## Quick Start
//!
//! ```ignore
//! use mailcraft_view::ViewRenderer;
//!
//! let transport = mailcraft_smtp::localhost().with_renderer(ViewRenderer::new("views"));
//!
//! let mut params = mailcraft::ViewParams::new();
//! params.insert("name".into(), "Ada".into());
//!
//! let message = transport
//!     .create_message()
//!     .with_view("emails.welcome", Some(&params))?;
//! ```

#![warn(missing_docs)]
#![warn(clippy::all)]
#![warn(clippy::pedantic)]
#![forbid(unsafe_code)]

use std::fmt;
use std::path::{Path, PathBuf};

use mailcraft::{TemplateRenderError, TemplateRenderer, ViewParams};
use minijinja::{Environment, ErrorKind, UndefinedBehavior, path_loader};
use tracing::{debug, warn};

/// File extension appended to every view path.
pub const VIEW_EXTENSION: &str = "html";

/// Template renderer backed by a directory of `.html` views.
///
/// Templates are loaded on first use and cached for the renderer's lifetime.
pub struct ViewRenderer {
    dir: PathBuf,
    env: Environment<'static>,
}

impl ViewRenderer {
    /// Creates a renderer reading views from `dir`.
    ///
    /// The directory is not checked until a view is rendered.
    #[must_use]
    pub fn new(dir: impl Into<PathBuf>) -> Self {
        let dir = dir.into();
        let mut env = Environment::new();
        env.set_loader(path_loader(&dir));
        Self { dir, env }
    }

    /// Fails rendering when a template uses a variable that was not passed.
    #[must_use]
    pub fn with_strict_variables(mut self) -> Self {
        self.env.set_undefined_behavior(UndefinedBehavior::Strict);
        self
    }

    /// Directory views are read from.
    #[must_use]
    pub fn dir(&self) -> &Path {
        &self.dir
    }

    /// Maps a dotted view name to its path relative to the view directory.
    ///
    /// # Errors
    ///
    /// Rejects empty names, empty segments and segments containing path
    /// separators.
    pub fn template_name(view: &str) -> Result<String, TemplateRenderError> {
        let segments: Vec<&str> = view.split('.').collect();
        let valid = segments
            .iter()
            .all(|s| !s.is_empty() && !s.contains(['/', '\\']));
        if !valid {
            return Err(TemplateRenderError::new(view, "invalid view name"));
        }
        Ok(format!("{}.{VIEW_EXTENSION}", segments.join("/")))
    }
}

impl TemplateRenderer for ViewRenderer {
    fn render(&self, view: &str, params: &ViewParams) -> Result<String, TemplateRenderError> {
        let name = Self::template_name(view)?;
        debug!(view, template = %name, "Rendering view");

        let template = self.env.get_template(&name).map_err(|e| {
            let message = if matches!(e.kind(), ErrorKind::TemplateNotFound) {
                format!("view not found at {}", self.dir.join(&name).display())
            } else {
                e.to_string()
            };
            warn!(view, error = %message, "View could not be loaded");
            TemplateRenderError::new(view, message)
        })?;

        template.render(params).map_err(|e| {
            warn!(view, error = %e, "View failed to render");
            TemplateRenderError::new(view, e.to_string())
        })
    }
}

impl fmt::Debug for ViewRenderer {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ViewRenderer")
            .field("dir", &self.dir)
            .finish_non_exhaustive()
    }
}
