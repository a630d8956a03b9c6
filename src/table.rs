//! The flat output of composition and how it reaches a server.

use std::fmt;

use tracing::{error, info};

use crate::error::BuildError;
use crate::handler::BoxedHandler;
use crate::route::Route;

/// Anything that can bind a path to a handler.
///
/// Which paths are acceptable, and what a duplicate means, is the
/// implementor's policy. A refusal stops the install: the built-in
/// [`Router`](crate::Router) refuses malformed patterns and paths that
/// conflict with an earlier binding.
pub trait Mux {
    type Error: fmt::Display;

    fn bind(&mut self, path: &str, handler: BoxedHandler) -> Result<(), Self::Error>;
}

/// Fully wrapped routes in registration order, produced by
/// [`Group::compose`](crate::Group::compose).
///
/// Every handler in here already carries all of its middleware. Registering a
/// table into another group appends these routes untouched; only the new
/// group's own middleware is added on top.
#[derive(Clone, Debug, Default)]
pub struct DispatchTable {
    routes: Vec<Route>,
}

impl DispatchTable {
    pub(crate) fn new(routes: Vec<Route>) -> Self {
        Self { routes }
    }

    pub fn len(&self) -> usize { self.routes.len() }
    pub fn is_empty(&self) -> bool { self.routes.is_empty() }
    pub fn iter(&self) -> std::slice::Iter<'_, Route> { self.routes.iter() }

    pub fn paths(&self) -> impl Iterator<Item = &str> {
        self.routes.iter().map(Route::path)
    }

    /// First handler registered for `path`, compared exactly.
    pub fn handler(&self, path: &str) -> Option<&BoxedHandler> {
        self.routes.iter().find(|r| r.path() == path).map(Route::handler)
    }

    /// Binds every route into `mux`, in order, and hands the mux back.
    pub fn install<M: Mux>(self, mux: M) -> Result<M, BuildError> {
        install(self, mux)
    }
}

impl IntoIterator for DispatchTable {
    type Item = Route;
    type IntoIter = std::vec::IntoIter<Route>;

    fn into_iter(self) -> Self::IntoIter {
        self.routes.into_iter()
    }
}

/// Binds every route of `table` into `mux`, in order, and hands the mux back.
///
/// The first refused path fails the whole install and the mux is dropped, so
/// a caller never holds a mux missing some of the table.
pub fn install<M: Mux>(table: DispatchTable, mut mux: M) -> Result<M, BuildError> {
    let routes = table.len();
    for route in table {
        let (path, handler) = route.into_parts();
        if let Err(e) = mux.bind(&path, handler) {
            error!(path, "route rejected: {e}");
            return Err(BuildError::RouteRejected { path, reason: e.to_string() });
        }
    }
    info!(routes, "dispatch table installed");
    Ok(mux)
}
