//! Per-view request timing.
//!
//! [`request_timing_middleware`] installs an empty [`ViewTiming`] slot on each request.
//! Handlers wrapped with [`timed`] fill the slot with their identity and a start instant
//! when the router dispatches to them. Once the response (or a panic) comes back, the
//! elapsed milliseconds are sent as three timers:
//!
//! ```text
//! view.<module>.<name>.<METHOD>
//! view.<module>.<METHOD>
//! view.<METHOD>
//! ```
//!
//! Requests that never reach a timed handler (404 fallback, untimed routes) emit nothing.

use axum::{
    extract::{Request, State},
    handler::Handler,
    http::Method,
    middleware::Next,
    response::Response,
};
use futures::FutureExt;
use std::panic::{resume_unwind, AssertUnwindSafe};
use std::sync::{Arc, OnceLock};
use std::time::Instant;

use crate::metrics::{Stats, StatsClient};

/// Dotted module path and name of a view, e.g. `blog.views` / `show`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ViewInfo {
    module: String,
    name: String,
}

impl ViewInfo {
    pub fn new(module: impl Into<String>, name: impl Into<String>) -> Self {
        Self { module: module.into(), name: name.into() }
    }

    /// Derives the identity of the handler type `H`.
    ///
    /// Function items report their module and function name. Handler structs report their
    /// type, without generic arguments. Closures report the item they are defined in.
    pub fn of<H>() -> Self {
        Self::from_type_name(std::any::type_name::<H>())
    }

    fn from_type_name(raw: &str) -> Self {
        let path = strip_generics(raw.trim_start_matches('&'));
        let mut segments: Vec<&str> =
            path.split("::").filter(|s| !s.is_empty() && !s.starts_with("{{")).collect();
        let name = segments.pop().unwrap_or("unknown").to_string();
        let module = if segments.is_empty() { "root".to_string() } else { segments.join(".") };
        Self { module, name }
    }

    pub fn module(&self) -> &str {
        &self.module
    }

    pub fn name(&self) -> &str {
        &self.name
    }
}

fn strip_generics(path: &str) -> String {
    let mut out = String::with_capacity(path.len());
    let mut depth = 0usize;
    for c in path.chars() {
        match c {
            '<' => depth += 1,
            '>' => depth = depth.saturating_sub(1),
            _ if depth == 0 => out.push(c),
            _ => {}
        }
    }
    out
}

#[derive(Debug)]
struct StartedView {
    info: Arc<ViewInfo>,
    start: Instant,
}

/// Per-request timing slot. Filled at most once.
#[derive(Debug, Clone, Default)]
pub struct ViewTiming(Arc<OnceLock<StartedView>>);

impl ViewTiming {
    /// Returns `false` when the slot was already started.
    fn start(&self, info: Arc<ViewInfo>) -> bool {
        self.0.set(StartedView { info, start: Instant::now() }).is_ok()
    }

    fn record(&self, stats: &dyn StatsClient, method: &Method) {
        let Some(started) = self.0.get() else {
            return;
        };
        let ms = u64::try_from(started.start.elapsed().as_millis()).unwrap_or(u64::MAX);
        let (module, name, method) = (started.info.module(), started.info.name(), method.as_str());
        stats.timing(&format!("view.{}.{}.{}", module, name, method), ms);
        stats.timing(&format!("view.{}.{}", module, method), ms);
        stats.timing(&format!("view.{}", method), ms);
    }
}

/// A handler that marks the start of its view in the request's [`ViewTiming`] slot.
#[derive(Debug, Clone)]
pub struct TimedView<H> {
    handler: H,
    info: Arc<ViewInfo>,
}

impl<H> TimedView<H> {
    pub fn info(&self) -> &ViewInfo {
        &self.info
    }
}

/// Wraps `handler`, naming it after its own type.
pub fn timed<H>(handler: H) -> TimedView<H> {
    TimedView { info: Arc::new(ViewInfo::of::<H>()), handler }
}

/// Wraps `handler` under an explicit module and name.
pub fn timed_as<H>(module: &str, name: &str, handler: H) -> TimedView<H> {
    TimedView { info: Arc::new(ViewInfo::new(module, name)), handler }
}

impl<H, T, S> Handler<T, S> for TimedView<H>
where
    H: Handler<T, S>,
{
    type Future = H::Future;

    fn call(self, req: Request, state: S) -> Self::Future {
        // No slot means the timing middleware is not installed; nothing to record into.
        if let Some(slot) = req.extensions().get::<ViewTiming>() {
            if !slot.start(self.info.clone()) {
                tracing::trace!("view timing already started, ignoring {:?}", self.info);
            }
        }
        self.handler.call(req, state)
    }
}

/// Installs a [`ViewTiming`] slot and records its timers once the response is back.
///
/// Also records when the view panics, then re-raises the panic.
pub async fn request_timing_middleware(
    State(stats): State<Stats>,
    mut req: Request,
    next: Next,
) -> Response {
    let method = req.method().clone();
    let slot = ViewTiming::default();
    req.extensions_mut().insert(slot.clone());

    match AssertUnwindSafe(next.run(req)).catch_unwind().await {
        Ok(res) => {
            slot.record(stats.as_ref(), &method);
            res
        }
        Err(panic) => {
            slot.record(stats.as_ref(), &method);
            resume_unwind(panic)
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::tests::SpyStats;

    #[test]
    fn test_function_path() {
        let info = ViewInfo::from_type_name("blog::views::show");
        assert_eq!(info, ViewInfo::new("blog.views", "show"));
    }

    #[test]
    fn test_generic_struct_path() {
        let info = ViewInfo::from_type_name("blog::views::Detail<alloc::string::String, blog::Post>");
        assert_eq!(info, ViewInfo::new("blog.views", "Detail"));
    }

    #[test]
    fn test_closure_reports_enclosing_item() {
        let info = ViewInfo::from_type_name("blog::views::routes::{{closure}}");
        assert_eq!(info, ViewInfo::new("blog.views", "routes"));
    }

    #[test]
    fn test_bare_name() {
        assert_eq!(ViewInfo::from_type_name("show"), ViewInfo::new("root", "show"));
    }

    async fn show() -> &'static str {
        "ok"
    }

    #[test]
    fn test_timed_names_function_item() {
        let wrapped = timed(show);
        assert_eq!(wrapped.info(), &ViewInfo::new("headwind.middleware.timing.tests", "show"));
    }

    #[test]
    fn test_unstarted_slot_records_nothing() {
        let stats = SpyStats::new();
        ViewTiming::default().record(&stats, &Method::GET);
        assert!(stats.lines().is_empty());
    }

    #[test]
    fn test_started_slot_records_three_timers() {
        let stats = SpyStats::new();
        let slot = ViewTiming::default();
        assert!(slot.start(Arc::new(ViewInfo::new("blog.views", "show"))));
        assert!(!slot.start(Arc::new(ViewInfo::new("other", "view"))));
        slot.record(&stats, &Method::POST);

        let names: Vec<String> = stats.timings().into_iter().map(|(n, _)| n).collect();
        assert_eq!(names, vec!["view.blog.views.show.POST", "view.blog.views.POST", "view.POST"]);
    }
}
