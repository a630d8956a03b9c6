//! Route groups: scoped middleware over a set of routes.
//!
//! # Composition rules
//!
//! - A group's middleware wraps every route the group owns, whether the route
//!   was registered before or after the middleware was attached.
//! - Middleware order is registration order, first outermost.
//! - A subgroup is composed *before* it is added: its routes arrive already
//!   wrapped in its own middleware, and that middleware never touches anything
//!   else. The parent's middleware then wraps them like any other route.
//!
//! ```text
//! Group::new()                      // root:  [trace]
//!     .wrap(trace())                //
//!     .handle(public)               // /      → trace(public)
//!     .handle(                      //
//!         Group::new()              // admin: [auth]
//!             .wrap(auth)           //
//!             .handle(dashboard))   // /admin → trace(auth(dashboard))
//! ```
//!
//! # Failure
//!
//! The first malformed input is handed to the group's
//! [`Reporter`](crate::report::Reporter) along with the caller's source
//! location. By default that ends the process. If the reporter returns, the
//! group is poisoned: later registrations are ignored and
//! [`compose`](Group::compose) returns the recorded error, so a partially
//! built group can never be installed.

use std::fmt;
use std::panic::Location;
use std::sync::Arc;

use tracing::debug;

use crate::error::BuildError;
use crate::handler::{BoxedHandler, Handler};
use crate::middleware::Middleware;
use crate::report::{Exit, Reporter};
use crate::route::Route;
use crate::router::Router;
use crate::table::{DispatchTable, Mux};

// ── Entry ─────────────────────────────────────────────────────────────────────

/// Everything [`Group::handle`] accepts.
///
/// Most callers never name this type: routes, groups, tables and
/// `(path, handler)` tuples all convert into it.
#[derive(Debug)]
pub enum Entry {
    Route(Route),
    /// Composed on registration; its routes arrive already wrapped.
    Group(Group),
    /// Appended untouched.
    Table(DispatchTable),
    /// A path/handler pairing whose handler may be absent.
    Pair {
        path: String,
        handler: Option<BoxedHandler>,
    },
    /// A value of a type that cannot be registered. Always rejected.
    Unrecognized {
        type_name: &'static str,
        contents: String,
    },
}

impl Entry {
    pub fn pair(path: &str, handler: Option<BoxedHandler>) -> Self {
        Self::Pair { path: path.to_owned(), handler }
    }

    /// Captures `value`'s type name and `Debug` output for the error report.
    pub fn unrecognized<T: fmt::Debug + ?Sized>(value: &T) -> Self {
        Self::Unrecognized {
            type_name: std::any::type_name::<T>(),
            contents: format!("{value:?}"),
        }
    }
}

impl From<Route> for Entry {
    fn from(route: Route) -> Self { Self::Route(route) }
}

impl From<Group> for Entry {
    fn from(group: Group) -> Self { Self::Group(group) }
}

impl From<DispatchTable> for Entry {
    fn from(table: DispatchTable) -> Self { Self::Table(table) }
}

impl<H: Handler> From<(&str, H)> for Entry {
    fn from((path, handler): (&str, H)) -> Self {
        Self::Route(Route::define(path, handler))
    }
}

// ── Group ─────────────────────────────────────────────────────────────────────

/// A builder of routes sharing a middleware stack.
///
/// Each method takes and returns `self`, so registrations chain. Finish with
/// [`compose`](Group::compose), [`compile`](Group::compile) or
/// [`compile_into`](Group::compile_into); all three consume the group, so its
/// middleware can never be applied twice.
///
/// ```rust
/// use grove::{middleware, Group, Request};
///
/// async fn hello(_req: Request) -> &'static str { "hello" }
///
/// let router = Group::new()
///     .wrap(middleware::trace())
///     .handle(("/hello", hello))
///     .compile()
///     .unwrap();
/// ```
///
/// Composing a group twice does not compile:
///
/// ```rust,compile_fail
/// let group = grove::Group::new();
/// let _ = group.compose();
/// let _ = group.compose();
/// ```
pub struct Group {
    middleware: Vec<Middleware>,
    routes: Vec<Route>,
    reporter: Arc<dyn Reporter>,
    failure: Option<BuildError>,
}

impl Group {
    /// An empty group that exits the process on malformed input.
    pub fn new() -> Self {
        Self::with_reporter(Exit)
    }

    pub fn with_reporter(reporter: impl Reporter) -> Self {
        Self {
            middleware: Vec::new(),
            routes: Vec::new(),
            reporter: Arc::new(reporter),
            failure: None,
        }
    }

    /// Registers a route, a subgroup, a composed table, or a
    /// `(path, handler)` pair.
    #[track_caller]
    pub fn handle(mut self, entry: impl Into<Entry>) -> Self {
        self.register(entry.into());
        self
    }

    /// [`handle`](Group::handle) for each entry, in order. Stops at the first
    /// malformed one.
    #[track_caller]
    pub fn handle_all<I>(mut self, entries: I) -> Self
    where
        I: IntoIterator,
        I::Item: Into<Entry>,
    {
        for entry in entries {
            if self.failure.is_some() {
                break;
            }
            self.register(entry.into());
        }
        self
    }

    /// Attaches one middleware. `None` is an
    /// [`InvalidMiddleware`](BuildError::InvalidMiddleware) error.
    #[track_caller]
    pub fn wrap(self, middleware: impl Into<Option<Middleware>>) -> Self {
        self.wrap_all([middleware])
    }

    /// Attaches a batch of middleware in order. The batch is checked as a
    /// whole: one `None` and none of it is attached.
    #[track_caller]
    pub fn wrap_all<I>(mut self, middleware: I) -> Self
    where
        I: IntoIterator,
        I::Item: Into<Option<Middleware>>,
    {
        if self.failure.is_some() {
            return self;
        }

        let mut batch = Vec::new();
        for (index, mw) in middleware.into_iter().enumerate() {
            match mw.into() {
                Some(mw) => batch.push(mw),
                None => {
                    self.fail(BuildError::InvalidMiddleware { index });
                    return self;
                }
            }
        }

        debug!(count = batch.len(), total = self.middleware.len() + batch.len(), "middleware attached");
        self.middleware.extend(batch);
        self
    }

    /// Wraps every route in this group's middleware and returns them flat, in
    /// registration order.
    #[track_caller]
    pub fn compose(mut self) -> Result<DispatchTable, BuildError> {
        if let Some(err) = self.failure.take() {
            return Err(err);
        }

        let routes = std::mem::take(&mut self.routes);
        let mut wrapped = Vec::with_capacity(routes.len());
        for route in routes {
            match route.wrap(&self.middleware) {
                Ok(route) => wrapped.push(route),
                Err(err) => {
                    self.report(&err);
                    return Err(err);
                }
            }
        }

        debug!(routes = wrapped.len(), middleware = self.middleware.len(), "group composed");
        Ok(DispatchTable::new(wrapped))
    }

    /// Composes into a fresh [`Router`].
    #[track_caller]
    pub fn compile(self) -> Result<Router, BuildError> {
        self.compile_into(Router::new())
    }

    /// Composes and installs into an existing collaborator.
    ///
    /// A path the collaborator refuses is reported like any other build
    /// error, and no partially installed collaborator is returned.
    #[track_caller]
    pub fn compile_into<M: Mux>(self, mux: M) -> Result<M, BuildError> {
        let caller = Location::caller();
        let reporter = Arc::clone(&self.reporter);
        self.compose()?.install(mux).inspect_err(|err| reporter.report(err, caller))
    }

    #[track_caller]
    fn register(&mut self, entry: Entry) {
        if self.failure.is_some() {
            debug!("group already failed, registration ignored");
            return;
        }

        match entry {
            Entry::Route(route) => self.push(route),
            Entry::Group(group) => match group.compose() {
                Ok(table) => {
                    debug!(routes = table.len(), "subgroup flattened");
                    self.routes.extend(table);
                }
                // Already reported by the subgroup's own reporter.
                Err(err) => self.failure = Some(err),
            },
            Entry::Table(table) => {
                debug!(routes = table.len(), "table appended");
                self.routes.extend(table);
            }
            Entry::Pair { path, handler } => match Route::try_define(&path, handler) {
                Ok(route) => self.push(route),
                Err(err) => self.fail(err),
            },
            Entry::Unrecognized { type_name, contents } => {
                self.fail(BuildError::UnrecognizedRegistrationType { type_name, contents });
            }
        }
    }

    fn push(&mut self, route: Route) {
        debug!(path = route.path(), "route registered");
        self.routes.push(route);
    }

    #[track_caller]
    fn fail(&mut self, err: BuildError) {
        self.report(&err);
        self.failure = Some(err);
    }

    #[track_caller]
    fn report(&self, err: &BuildError) {
        self.reporter.report(err, Location::caller());
    }
}

impl Default for Group {
    fn default() -> Self { Self::new() }
}

impl fmt::Debug for Group {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Group")
            .field("routes", &self.routes.iter().map(Route::path).collect::<Vec<_>>())
            .field("middleware", &self.middleware.len())
            .field("failure", &self.failure)
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::report::Collect;
    use crate::{Request, Response};

    async fn ok(_req: Request) -> Response {
        Response::text("ok")
    }

    fn tag(value: &'static str) -> Middleware {
        Middleware::new(move |next| {
            BoxedHandler::new(move |req: Request| {
                let next = next.clone();
                async move {
                    let mut res = next.call(req).await;
                    res.body_mut().extend_from_slice(value.as_bytes());
                    res
                }
            })
        })
    }

    fn collecting() -> (Arc<Collect>, Group) {
        let errors = Arc::new(Collect::default());
        (Arc::clone(&errors), Group::with_reporter(Arc::clone(&errors)))
    }

    async fn body(table: &DispatchTable, path: &str) -> String {
        let res = table.handler(path).unwrap().call(Request::new("GET", path)).await;
        String::from_utf8(res.body().to_vec()).unwrap()
    }

    #[test]
    fn routes_keep_registration_order() {
        let table = Group::new()
            .handle(("/b", ok))
            .handle(Group::new().handle(("/c", ok)).handle(("/a", ok)))
            .handle(Route::define("/d", ok))
            .compose()
            .unwrap();

        assert_eq!(table.paths().collect::<Vec<_>>(), ["/b", "/c", "/a", "/d"]);
    }

    #[test]
    fn no_middleware_leaves_handler_untouched() {
        let handler = BoxedHandler::new(ok);
        let table = Group::new().handle(("/hello", handler.clone())).compose().unwrap();
        assert!(BoxedHandler::ptr_eq(table.handler("/hello").unwrap(), &handler));
    }

    #[tokio::test]
    async fn middleware_applies_regardless_of_registration_order() {
        let table = Group::new()
            .handle(("/before", ok))
            .wrap(tag("1"))
            .handle(("/between", ok))
            .wrap(tag("2"))
            .handle(("/after", ok))
            .compose()
            .unwrap();

        for path in ["/before", "/between", "/after"] {
            // 2 is innermost, so it appends first.
            assert_eq!(body(&table, path).await, "ok21");
        }
    }

    #[tokio::test]
    async fn subgroup_middleware_stays_in_the_subgroup() {
        let table = Group::new()
            .wrap(tag("p"))
            .handle(("/direct", ok))
            .handle(Group::new().wrap(tag("a")).handle(("/a", ok)))
            .handle(Group::new().wrap(tag("b")).handle(("/b", ok)))
            .compose()
            .unwrap();

        assert_eq!(body(&table, "/direct").await, "okp");
        assert_eq!(body(&table, "/a").await, "okap");
        assert_eq!(body(&table, "/b").await, "okbp");
    }

    #[tokio::test]
    async fn registered_table_is_not_wrapped_again() {
        let inner = Group::new().wrap(tag("x")).handle(("/t", ok)).compose().unwrap();
        let table = Group::new().wrap(tag("y")).handle(inner).compose().unwrap();

        assert_eq!(body(&table, "/t").await, "okxy");
    }

    #[test]
    fn unset_middleware_rejects_the_whole_batch() {
        let (errors, group) = collecting();
        let group = group.wrap_all([Some(tag("a")), None, Some(tag("c"))]);

        assert_eq!(group.middleware.len(), 0);
        assert_eq!(errors.errors(), [BuildError::InvalidMiddleware { index: 1 }]);
        assert_eq!(group.compose().unwrap_err(), BuildError::InvalidMiddleware { index: 1 });
    }

    #[test]
    fn unset_handler_is_reported_once() {
        let (errors, group) = collecting();
        let result = group
            .handle(Entry::pair("/missing", None))
            .handle(Entry::pair("/also-missing", None))
            .handle(("/fine", ok))
            .compose();

        let expected = BuildError::InvalidHandler { path: "/missing".into() };
        assert_eq!(errors.errors(), [expected.clone()]);
        assert_eq!(result.unwrap_err(), expected);
    }

    #[test]
    fn unrecognized_entry_names_type_and_contents() {
        let (errors, group) = collecting();
        let _ = group.handle(Entry::unrecognized(&42u32)).compose();

        assert_eq!(
            errors.errors(),
            [BuildError::UnrecognizedRegistrationType { type_name: "u32", contents: "42".into() }],
        );
    }

    #[test]
    fn handle_all_stops_at_first_bad_entry() {
        let (errors, group) = collecting();
        let group = group.handle_all([
            Entry::from(("/one", ok)),
            Entry::unrecognized("oops"),
            Entry::from(("/two", ok)),
        ]);

        assert_eq!(group.routes.len(), 1);
        assert_eq!(errors.errors().len(), 1);
    }

    #[test]
    fn declining_middleware_fails_compose() {
        let (errors, group) = collecting();
        let result = group
            .wrap(tag("a"))
            .wrap(Middleware::try_new(|_| None))
            .handle(("/x", ok))
            .compose();

        let expected = BuildError::MiddlewareProducedNil { path: "/x".into(), index: 1, layer: None };
        assert_eq!(result.unwrap_err(), expected);
        assert_eq!(errors.errors(), [expected]);
    }

    #[test]
    fn failed_subgroup_poisons_parent_without_second_report() {
        let (sub_errors, sub) = collecting();
        let (parent_errors, parent) = collecting();

        let result = parent
            .handle(sub.wrap(Middleware::try_new(|_| None)).handle(("/x", ok)))
            .handle(("/y", ok))
            .compose();

        assert!(matches!(result, Err(BuildError::MiddlewareProducedNil { index: 0, .. })));
        assert_eq!(sub_errors.errors().len(), 1);
        assert!(parent_errors.errors().is_empty());
    }

    #[test]
    fn refused_path_fails_compile_instead_of_shortening_the_router() {
        let (errors, group) = collecting();
        let result = group
            .handle(("/ok", ok))
            .handle(("/bad/{", ok))
            .handle(("/users/{id}", ok))
            .handle(("/users/{name}", ok))
            .compile();

        let Err(BuildError::RouteRejected { path, .. }) = result else {
            panic!("compile should fail on a malformed path");
        };
        assert_eq!(path, "/bad/{");
        assert_eq!(errors.errors().len(), 1);
    }

    #[test]
    fn conflicting_path_fails_compile() {
        let (errors, group) = collecting();
        let result = group
            .handle(("/users/{id}", ok))
            .handle(("/users/{name}", ok))
            .compile();

        let Err(BuildError::RouteRejected { path, .. }) = result else {
            panic!("compile should fail on a conflicting path");
        };
        assert_eq!(path, "/users/{name}");
        assert_eq!(errors.errors().len(), 1);
    }

    #[test]
    fn report_points_at_the_caller() {
        let (errors, group) = collecting();
        let missing: Option<Middleware> = None;
        let line = line!() + 1;
        let _ = group.wrap(missing);

        let reports = errors.reports();
        assert_eq!(reports[0].1.file(), file!());
        assert_eq!(reports[0].1.line(), line);
    }

    #[test]
    #[should_panic(expected = "middleware #0 in batch is unset")]
    fn panic_reporter_halts_the_build() {
        let missing: Option<Middleware> = None;
        let _ = Group::with_reporter(crate::report::Panic).wrap(missing);
    }
}
