//! Page lifecycle orchestration for server-rendered HTML responses.
//!
//! This crate coordinates rendering a single HTTP page response: resolving
//! per-request user state, fetching page data, resolving localized strings,
//! assembling template variables, rendering a three-part template
//! (head/content/footer), and producing the final response, with a fallback
//! error-page path when any step fails.
//!
//! The main types and traits:
//! - [`Page`] / [`PageDefinition`] - The orchestrator and its configuration
//! - [`UserResolver`], [`DataSource`], [`LocaleResolver`], [`VarsBuilder`] -
//!   Collaborator seams
//! - [`TemplateStore`] / [`TemplateRenderer`] - Template resolution and
//!   concurrent rendering
//! - [`PageRequest`] / [`PageResponse`] - The request/response boundary

mod assets;
mod config;
mod data;
mod error;
mod lifecycle;
mod locale;
mod logging;
mod page;
mod request;
mod response;
mod template;
mod user;
mod vars;

pub use assets::AssetSettings;
pub use config::PageFlags;
pub use data::{DataSource, EmptyData};
pub use error::PageError;
pub use lifecycle::{Phase, Timings};
pub use locale::{LocaleResolver, StaticLocales};
pub use logging::{LogFormat, LogLevel, PageLogger};
pub use page::{bare_failure, Page, PageDefinition};
pub use request::{Headers, PageRequest, QueryParams, RequestId, RouteParams};
pub use response::{PageResponse, ResponseWriter};
pub use template::{InMemoryTemplates, PageTemplates, TemplateFn, TemplateRenderer, TemplateStore};
pub use user::{GuestResolver, UserContext, UserResolver};
pub use vars::{DefaultVarsBuilder, TemplateVars, VarsBuilder, ACTIVE_USER_KEY};

/// Prelude for convenient imports.
pub mod prelude {
    pub use crate::{
        AssetSettings, DataSource, LocaleResolver, Page, PageDefinition, PageError, PageFlags,
        PageRequest, PageResponse, TemplateStore, UserContext, UserResolver, VarsBuilder,
    };
}
