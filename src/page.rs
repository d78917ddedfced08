//! The page lifecycle orchestrator.
//!
//! Drives a request through user resolution, data fetch, concurrent locale
//! and variable resolution, merge, content negotiation, and rendering, with
//! a single error boundary feeding the recovery path. Exactly one response
//! is produced per request.

use std::collections::HashMap;
use std::sync::Arc;

use serde_json::{json, Map, Value};

use crate::config::PageFlags;
use crate::data::DataSource;
use crate::error::PageError;
use crate::lifecycle::{Phase, Timings};
use crate::locale::LocaleResolver;
use crate::logging::PageLogger;
use crate::request::PageRequest;
use crate::response::{PageResponse, ResponseWriter};
use crate::template::{PageTemplates, TemplateRenderer, TemplateStore};
use crate::user::{UserContext, UserResolver};
use crate::vars::{TemplateVars, VarsBuilder};

/// Composition-based page configuration.
///
/// Names the page's template slots and carries its behavior flags; template
/// names are resolved through a [`TemplateStore`] when the page is built.
#[derive(Debug, Clone)]
pub struct PageDefinition {
    /// Page name, used as the log prefix.
    pub name: String,
    /// Head template name, shared with error pages.
    pub template_head: Option<String>,
    /// Content template name.
    pub template_content: Option<String>,
    /// Footer template name, shared with error pages.
    pub template_footer: Option<String>,
    /// Error content template names keyed by response status.
    pub template_errors: HashMap<u16, String>,
    /// Behavior flags.
    pub flags: PageFlags,
    /// Ask the store to skip its cache when resolving templates.
    pub bypass_template_cache: bool,
}

impl PageDefinition {
    /// Create a definition with no templates and default flags.
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            template_head: None,
            template_content: None,
            template_footer: None,
            template_errors: HashMap::new(),
            flags: PageFlags::default(),
            bypass_template_cache: false,
        }
    }

    /// Set the head template name.
    pub fn with_head(mut self, name: impl Into<String>) -> Self {
        self.template_head = Some(name.into());
        self
    }

    /// Set the content template name.
    pub fn with_content(mut self, name: impl Into<String>) -> Self {
        self.template_content = Some(name.into());
        self
    }

    /// Set the footer template name.
    pub fn with_footer(mut self, name: impl Into<String>) -> Self {
        self.template_footer = Some(name.into());
        self
    }

    /// Register an error template for a status code.
    pub fn with_error_template(mut self, status: u16, name: impl Into<String>) -> Self {
        self.template_errors.insert(status, name.into());
        self
    }

    /// Set the behavior flags.
    pub fn with_flags(mut self, flags: PageFlags) -> Self {
        self.flags = flags;
        self
    }

    /// Bypass the template store's cache at build time.
    pub fn with_cache_bypass(mut self, bypass: bool) -> Self {
        self.bypass_template_cache = bypass;
        self
    }
}

/// The page lifecycle orchestrator.
///
/// Built once per page type; template functions are resolved at construction
/// and shared, read-only, across requests. Each call to [`run`](Page::run)
/// owns its request state exclusively.
pub struct Page {
    definition: PageDefinition,
    renderer: TemplateRenderer,
    user_resolver: Arc<dyn UserResolver>,
    data_source: Arc<dyn DataSource>,
    locales: Arc<dyn LocaleResolver>,
    vars_builder: Arc<dyn VarsBuilder>,
    logger: PageLogger,
}

impl Page {
    /// Build a page, resolving its configured templates through the store.
    ///
    /// Fails if any named template cannot be resolved; callers convert a
    /// build failure into a response with [`bare_failure`].
    pub fn build(
        definition: PageDefinition,
        store: &dyn TemplateStore,
        user_resolver: Arc<dyn UserResolver>,
        data_source: Arc<dyn DataSource>,
        locales: Arc<dyn LocaleResolver>,
        vars_builder: Arc<dyn VarsBuilder>,
    ) -> Result<Self, PageError> {
        let bypass = definition.bypass_template_cache;
        let mut templates = PageTemplates::default();

        if let Some(name) = &definition.template_head {
            templates.head = Some(store.resolve(name, bypass)?);
        }
        if let Some(name) = &definition.template_content {
            templates.content = Some(store.resolve(name, bypass)?);
        }
        if let Some(name) = &definition.template_footer {
            templates.footer = Some(store.resolve(name, bypass)?);
        }
        for (status, name) in &definition.template_errors {
            templates.errors.insert(*status, store.resolve(name, bypass)?);
        }

        let logger = PageLogger::new().with_page(definition.name.clone());
        let renderer = TemplateRenderer::new(templates, logger.clone());

        Ok(Self {
            definition,
            renderer,
            user_resolver,
            data_source,
            locales,
            vars_builder,
            logger,
        })
    }

    /// The page name.
    pub fn name(&self) -> &str {
        &self.definition.name
    }

    /// Run the page lifecycle for a request.
    ///
    /// Never fails: any stage rejection is caught here and converted by the
    /// recovery path, so exactly one response comes out either way.
    pub async fn run(&self, request: PageRequest) -> PageResponse {
        let logger = self
            .logger
            .clone()
            .with_request(request.request_id.to_string());
        let mut timings = Timings::new();
        let mut user = UserContext::guest();

        match self.pipeline(&request, &mut user, &mut timings).await {
            Ok(response) => {
                for phase in [
                    Phase::UserResolution,
                    Phase::DataFetch,
                    Phase::LocaleResolution,
                    Phase::TemplateVars,
                    Phase::Render,
                ] {
                    if let Some(duration) = timings.phase_duration(phase) {
                        logger.debug(&format!("{phase}: {}us", duration.as_micros()));
                    }
                }
                logger.info(&format!(
                    "page sent in {}ms",
                    timings.elapsed().as_millis()
                ));
                response
            }
            Err(err) => self.recover(&request, &user, err, &logger).await,
        }
    }

    /// The happy-path pipeline. Any `Err` hands off to [`recover`](Self::recover).
    async fn pipeline(
        &self,
        request: &PageRequest,
        user: &mut UserContext,
        timings: &mut Timings,
    ) -> Result<PageResponse, PageError> {
        // Data fetch is gated on user resolution; when the page does not
        // need a user, the fetch starts immediately against a guest context.
        if self.definition.flags.need_active_user {
            timings.begin(Phase::UserResolution);
            *user = self.user_resolver.resolve(request).await?;
            timings.end(Phase::UserResolution);
        }

        timings.begin(Phase::DataFetch);
        let data = self.data_source.fetch(request, user).await?;
        timings.end(Phase::DataFetch);

        // Locale and page vars resolve concurrently; either rejection
        // short-circuits the join without acting on the other's result.
        timings.begin(Phase::LocaleResolution);
        timings.begin(Phase::TemplateVars);
        let (locale_vars, page_vars) = futures::try_join!(
            self.locales.resolve(request),
            self.vars_builder.build(request),
        )?;
        timings.end(Phase::LocaleResolution);
        timings.end(Phase::TemplateVars);

        let vars = merge_vars(data, locale_vars, page_vars, user);

        if request.accepts_json() {
            let body = vars.to_json_string()?;
            return Ok(ResponseWriter::new().send(body));
        }

        timings.begin(Phase::Render);
        let html = self.renderer.render(&vars, None).await?;
        timings.end(Phase::Render);

        Ok(ResponseWriter::new().send(html))
    }

    /// Convert a pipeline failure into a best-effort response.
    ///
    /// Never raises; every exit produces exactly one response.
    async fn recover(
        &self,
        request: &PageRequest,
        user: &UserContext,
        err: PageError,
        logger: &PageLogger,
    ) -> PageResponse {
        let status = err.status_code();
        logger.error(&err.to_string());

        if self.definition.flags.test_server {
            return diagnostic_response(status, &err);
        }

        if self.definition.flags.show_error_page {
            return self.render_error_page(request, user, status, logger).await;
        }

        ResponseWriter::new().with_status(status).send("")
    }

    /// Render the error template registered for a status, starting locale
    /// and variable resolution afresh; no state from the abandoned pipeline
    /// is reused. A failure here degrades to an empty body instead of
    /// recursing into recovery again.
    async fn render_error_page(
        &self,
        request: &PageRequest,
        user: &UserContext,
        status: u16,
        logger: &PageLogger,
    ) -> PageResponse {
        let writer = ResponseWriter::new().with_status(status);

        let Some(template) = self.renderer.templates().error_for(status) else {
            return writer.send("");
        };
        let template = template.clone();

        let attempt: Result<String, PageError> = async {
            let (locale_vars, page_vars) = futures::try_join!(
                self.locales.resolve(request),
                self.vars_builder.build(request),
            )?;

            let mut vars = TemplateVars::new();
            vars.merge_object(page_vars);
            vars.merge_object(locale_vars);
            vars.insert("statusCode", json!(status));
            vars.merge_user(user.to_value());

            self.renderer.render(&vars, Some(&template)).await
        }
        .await;

        match attempt {
            Ok(html) => writer.send(html),
            Err(secondary) => {
                logger.error(&secondary.to_string());
                writer.send("")
            }
        }
    }
}

/// Build the request's variable set: data payload, then locale variables,
/// then page variables, with the serialized user context merged last.
fn merge_vars(
    data: Value,
    locale_vars: Map<String, Value>,
    page_vars: Map<String, Value>,
    user: &UserContext,
) -> TemplateVars {
    let mut vars = TemplateVars::new();
    if let Value::Object(payload) = data {
        vars.merge_object(payload);
    }
    vars.merge_object(locale_vars);
    vars.merge_object(page_vars);
    vars.merge_user(user.to_value());
    vars
}

/// Recovery for faults raised before a page exists (a failed
/// [`Page::build`], typically a missing template): same status and
/// diagnostic rules, no error-page rendering since no templates resolved.
pub fn bare_failure(err: &PageError, test_server: bool) -> PageResponse {
    let status = err.status_code();
    if test_server {
        diagnostic_response(status, err)
    } else {
        ResponseWriter::new().with_status(status).send("")
    }
}

/// Raw diagnostic body: error message plus trace, newlines made displayable.
fn diagnostic_response(status: u16, err: &PageError) -> PageResponse {
    let mut body = err.to_string();
    if let Some(trace) = err.trace() {
        body.push_str("<br/>");
        body.push_str(&trace.replace('\n', "<br/>"));
    }
    ResponseWriter::new().with_status(status).send(body)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::data::EmptyData;
    use crate::locale::StaticLocales;
    use crate::template::InMemoryTemplates;
    use crate::user::GuestResolver;
    use crate::vars::DefaultVarsBuilder;

    fn build_page(definition: PageDefinition, store: &InMemoryTemplates) -> Result<Page, PageError> {
        Page::build(
            definition,
            store,
            Arc::new(GuestResolver),
            Arc::new(EmptyData),
            Arc::new(StaticLocales::new()),
            Arc::new(DefaultVarsBuilder::default()),
        )
    }

    #[test]
    fn test_build_resolves_configured_templates() {
        let store = InMemoryTemplates::new()
            .register("layout/head", |_| Ok("<head/>".to_string()))
            .register("pages/home", |_| Ok("<main/>".to_string()));
        let definition = PageDefinition::new("home")
            .with_head("layout/head")
            .with_content("pages/home");
        assert!(build_page(definition, &store).is_ok());
    }

    #[test]
    fn test_build_fails_on_missing_template() {
        let store = InMemoryTemplates::new();
        let definition = PageDefinition::new("home").with_content("pages/home");
        let err = build_page(definition, &store).err().unwrap();
        assert!(matches!(err, PageError::TemplateMissing(_)));
    }

    #[test]
    fn test_bare_failure_plain() {
        let err = PageError::TemplateMissing("pages/home".to_string());
        let resp = bare_failure(&err, false);
        assert_eq!(resp.status, 500);
        assert!(resp.body.is_empty());
    }

    #[test]
    fn test_bare_failure_diagnostic() {
        let err = PageError::with_status(500, "boom").with_trace("a\nb");
        let resp = bare_failure(&err, true);
        assert_eq!(resp.status, 500);
        assert_eq!(resp.body, "boom<br/>a<br/>b");
    }
}
