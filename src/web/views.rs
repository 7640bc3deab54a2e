//! View engines.
//!
//! The web service resolves its engine by name once, at construction; the
//! name stays queryable for the life of the service.

use std::sync::Arc;

use axum::http::StatusCode;
use maud::{html, Markup, DOCTYPE};

/// Engines that can be named in `web.view_engine`.
pub const REGISTERED_ENGINES: &[&str] = &[MaudEngine::NAME];

/// A page the web service can render.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum View<'a> {
    /// Landing page showing the API's status time.
    Index { title: &'a str, time: &'a str },
    /// Error page for unmatched routes and failed renders.
    Error {
        title: &'a str,
        status: StatusCode,
        message: &'a str,
    },
}

/// Renders views to HTML.
pub trait ViewEngine: Send + Sync {
    /// Registered name of the engine.
    fn name(&self) -> &'static str;

    /// Render `view`. Rendering cannot fail.
    fn render(&self, view: &View<'_>) -> String;
}

/// Returns true if `name` can be resolved by [`engine_for`].
pub fn is_registered(name: &str) -> bool {
    REGISTERED_ENGINES.contains(&name)
}

/// Resolve a registered engine by name.
pub fn engine_for(name: &str) -> Option<Arc<dyn ViewEngine>> {
    match name {
        MaudEngine::NAME => Some(Arc::new(MaudEngine)),
        _ => None,
    }
}

/// Compile-time templates via `maud`.
#[derive(Debug, Clone, Copy, Default)]
pub struct MaudEngine;

impl MaudEngine {
    pub const NAME: &'static str = "maud";
}

impl ViewEngine for MaudEngine {
    fn name(&self) -> &'static str {
        Self::NAME
    }

    fn render(&self, view: &View<'_>) -> String {
        let markup = match view {
            View::Index { title, time } => layout(
                title,
                html! {
                    h1 { (title) }
                    p { "Welcome to " (title) }
                    p.time { "Database time: " (time) }
                },
            ),
            View::Error {
                title,
                status,
                message,
            } => layout(
                title,
                html! {
                    h1 { (message) }
                    h2 { (status.as_u16()) }
                },
            ),
        };
        markup.into_string()
    }
}

fn layout(title: &str, body: Markup) -> Markup {
    html! {
        (DOCTYPE)
        html {
            head {
                meta charset="utf-8";
                title { (title) }
            }
            body { (body) }
        }
    }
}
