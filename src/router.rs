//! Radix-tree request router.
//!
//! The server-side collaborator a [`DispatchTable`](crate::DispatchTable) is
//! installed into. One tree, O(path-length) lookup. It knows nothing about
//! middleware: every handler it holds is already fully wrapped.

use http::StatusCode;
use matchit::{InsertError, Router as MatchitRouter};

use crate::handler::BoxedHandler;
use crate::request::Request;
use crate::response::Response;
use crate::table::Mux;

/// The application router.
///
/// Paths follow [`matchit`] syntax, so `/users/{id}` matches `/users/42`.
/// Binding a malformed pattern, or one that conflicts with an earlier binding
/// (`/users/{name}` after `/users/{id}`, or the same path twice), is refused.
pub struct Router {
    tree: MatchitRouter<BoxedHandler>,
    len: usize,
}

impl Router {
    pub fn new() -> Self {
        Self { tree: MatchitRouter::new(), len: 0 }
    }

    pub fn len(&self) -> usize { self.len }
    pub fn is_empty(&self) -> bool { self.len == 0 }

    pub(crate) fn lookup(&self, path: &str) -> Option<BoxedHandler> {
        self.tree.at(path).ok().map(|matched| matched.value.clone())
    }

    /// Routes one request. A path with no handler gets `404 Not Found`.
    pub async fn dispatch(&self, req: Request) -> Response {
        match self.lookup(req.path()) {
            Some(handler) => handler.call(req).await,
            None => Response::status(StatusCode::NOT_FOUND),
        }
    }
}

impl Mux for Router {
    type Error = InsertError;

    fn bind(&mut self, path: &str, handler: BoxedHandler) -> Result<(), Self::Error> {
        self.tree.insert(path, handler)?;
        self.len += 1;
        Ok(())
    }
}

impl Default for Router {
    fn default() -> Self { Self::new() }
}
