//! Template resolution and concurrent three-slot rendering.

use std::collections::HashMap;
use std::sync::Arc;

use crate::error::PageError;
use crate::logging::PageLogger;
use crate::vars::TemplateVars;

/// A compiled template: a pure function from variables to markup.
///
/// Shared and reentrant; one resolved function serves every request.
pub type TemplateFn = Arc<dyn Fn(&TemplateVars) -> Result<String, PageError> + Send + Sync>;

/// Resolves compiled templates by logical name.
///
/// Loading and caching strategy belongs to the store; the pipeline only asks
/// for a function, optionally bypassing whatever cache the store keeps.
pub trait TemplateStore: Send + Sync {
    /// Resolve a template by name.
    fn resolve(&self, name: &str, bypass_cache: bool) -> Result<TemplateFn, PageError>;
}

/// Template store backed by an in-process map.
#[derive(Default)]
pub struct InMemoryTemplates {
    templates: HashMap<String, TemplateFn>,
}

impl InMemoryTemplates {
    /// Create an empty store.
    pub fn new() -> Self {
        Self::default()
    }

    /// Register a template function under a name.
    pub fn register<F>(mut self, name: impl Into<String>, template: F) -> Self
    where
        F: Fn(&TemplateVars) -> Result<String, PageError> + Send + Sync + 'static,
    {
        self.templates.insert(name.into(), Arc::new(template));
        self
    }
}

impl TemplateStore for InMemoryTemplates {
    fn resolve(&self, name: &str, _bypass_cache: bool) -> Result<TemplateFn, PageError> {
        self.templates
            .get(name)
            .cloned()
            .ok_or_else(|| PageError::TemplateMissing(name.to_string()))
    }
}

/// The template slots of a page, resolved once at construction.
#[derive(Default)]
pub struct PageTemplates {
    /// Head slot, shared with error pages.
    pub head: Option<TemplateFn>,
    /// Default content slot.
    pub content: Option<TemplateFn>,
    /// Footer slot, shared with error pages.
    pub footer: Option<TemplateFn>,
    /// Error content slots keyed by response status.
    pub errors: HashMap<u16, TemplateFn>,
}

impl PageTemplates {
    /// The error template registered for a status code, if any.
    pub fn error_for(&self, status: u16) -> Option<&TemplateFn> {
        self.errors.get(&status)
    }
}

/// Renders the head, content, and footer slots and concatenates them.
pub struct TemplateRenderer {
    templates: PageTemplates,
    logger: PageLogger,
}

impl TemplateRenderer {
    /// Create a renderer over resolved page templates.
    pub fn new(templates: PageTemplates, logger: PageLogger) -> Self {
        Self { templates, logger }
    }

    /// Borrow the resolved template slots.
    pub fn templates(&self) -> &PageTemplates {
        &self.templates
    }

    /// Render all three slots concurrently against the same variable set and
    /// concatenate head + content + footer in that fixed order.
    ///
    /// `content_override` substitutes the content slot (used for error
    /// pages); head and footer always come from the page's own slots. An
    /// unconfigured slot contributes an empty string; an error raised by a
    /// present template fails the whole render.
    pub async fn render(
        &self,
        vars: &TemplateVars,
        content_override: Option<&TemplateFn>,
    ) -> Result<String, PageError> {
        let head = async {
            match &self.templates.head {
                Some(template) => template(vars),
                None => Ok(String::new()),
            }
        };
        let content = async {
            match content_override.or(self.templates.content.as_ref()) {
                Some(template) => template(vars),
                None => {
                    self.logger.info("empty content template");
                    Ok(String::new())
                }
            }
        };
        let footer = async {
            match &self.templates.footer {
                Some(template) => template(vars),
                None => Ok(String::new()),
            }
        };

        let (head, content, footer) = futures::try_join!(head, content, footer)?;
        Ok(format!("{head}{content}{footer}"))
    }
}
