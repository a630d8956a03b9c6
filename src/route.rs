//! A single `(path, handler)` registration.

use crate::compose;
use crate::error::BuildError;
use crate::handler::{BoxedHandler, Handler};
use crate::middleware::Middleware;

/// A path bound to a handler. Immutable once built.
///
/// A route can never hold an unset handler: [`Route::define`] takes one by
/// type, and [`Route::try_define`] rejects `None`.
#[derive(Clone, Debug)]
pub struct Route {
    path: String,
    handler: BoxedHandler,
}

impl Route {
    pub fn define(path: &str, handler: impl Handler) -> Self {
        Self { path: path.to_owned(), handler: handler.into_boxed_handler() }
    }

    /// For handlers resolved at runtime, where absence is possible.
    ///
    /// ```rust
    /// use grove::{BuildError, Route};
    ///
    /// let err = Route::try_define("/missing", None).unwrap_err();
    /// assert_eq!(err, BuildError::InvalidHandler { path: "/missing".into() });
    /// ```
    pub fn try_define(path: &str, handler: Option<BoxedHandler>) -> Result<Self, BuildError> {
        match handler {
            Some(handler) => Ok(Self { path: path.to_owned(), handler }),
            None => Err(BuildError::InvalidHandler { path: path.to_owned() }),
        }
    }

    pub fn path(&self) -> &str { &self.path }
    pub fn handler(&self) -> &BoxedHandler { &self.handler }

    /// Wraps this one route, first middleware outermost.
    pub fn wrap(self, middleware: &[Middleware]) -> Result<Self, BuildError> {
        let handler = compose::wrap(&self.path, self.handler, middleware)?;
        Ok(Self { path: self.path, handler })
    }

    pub(crate) fn into_parts(self) -> (String, BoxedHandler) {
        (self.path, self.handler)
    }
}
