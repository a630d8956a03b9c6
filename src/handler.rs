//! Handler trait and type erasure.
//!
//! # How handlers are stored
//!
//! A group holds handlers of *different* concrete types side by side, and a
//! middleware must be able to take any of them and hand back another. Both
//! need one uniform type, so every handler is erased behind
//! [`BoxedHandler`], a cloneable `Arc<dyn …>`.
//!
//! ```text
//! async fn hello(req: Request) -> Response { … }   ← user writes this
//!        ↓ Route::define("/", hello)
//! hello.into_boxed_handler()                       ← Handler blanket impl
//!        ↓
//! BoxedHandler(Arc::new(FnHandler(hello)))         ← stored in the route
//!        ↓ middleware wraps it, possibly many times
//! handler.call(req)  at request time               ← one vtable dispatch per layer
//! ```
//!
//! Wrapping never copies the inner handler: a middleware captures a clone of
//! the `BoxedHandler` it was given, which is one atomic increment.

use std::fmt;
use std::future::Future;
use std::pin::Pin;
use std::sync::Arc;

use crate::request::Request;
use crate::response::{IntoResponse, Response};

// ── Internal types ────────────────────────────────────────────────────────────

/// A heap-allocated, type-erased future that resolves to a [`Response`].
///
/// `Send + 'static` lets tokio move the future across worker threads.
pub type BoxFuture = Pin<Box<dyn Future<Output = Response> + Send + 'static>>;

/// Internal dispatch interface.
trait ErasedHandler {
    fn call(&self, req: Request) -> BoxFuture;
}

// ── BoxedHandler ──────────────────────────────────────────────────────────────

/// A type-erased handler shared between routes, middleware layers and
/// concurrent requests.
///
/// This is the value a [`Middleware`](crate::Middleware) receives and
/// returns. Build one from any [`Handler`] with [`BoxedHandler::new`], and
/// call the wrapped handler with [`BoxedHandler::call`]:
///
/// ```rust
/// use grove::{BoxedHandler, Request, Response};
///
/// fn shout(next: BoxedHandler) -> BoxedHandler {
///     BoxedHandler::new(move |req: Request| {
///         let next = next.clone();
///         async move {
///             let mut res = next.call(req).await;
///             res.body_mut().make_ascii_uppercase();
///             res
///         }
///     })
/// }
/// # let _ = shout(BoxedHandler::new(|_req: Request| async { Response::text("hi") }));
/// ```
#[derive(Clone)]
pub struct BoxedHandler(Arc<dyn ErasedHandler + Send + Sync + 'static>);

impl BoxedHandler {
    pub fn new(handler: impl Handler) -> Self {
        handler.into_boxed_handler()
    }

    /// Runs the handler. The returned future owns everything it needs.
    pub fn call(&self, req: Request) -> BoxFuture {
        self.0.call(req)
    }

    /// `true` when both values point at the same underlying handler.
    pub fn ptr_eq(a: &Self, b: &Self) -> bool {
        std::ptr::addr_eq(Arc::as_ptr(&a.0), Arc::as_ptr(&b.0))
    }
}

impl fmt::Debug for BoxedHandler {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str("BoxedHandler { .. }")
    }
}

// ── Public Handler trait ──────────────────────────────────────────────────────

/// Implemented for every valid route handler.
///
/// You never implement this yourself. It is satisfied by any `async fn` (or
/// closure returning a future) with the signature:
///
/// ```text
/// async fn name(req: Request) -> impl IntoResponse
/// ```
///
/// and by [`BoxedHandler`] itself, so an already erased handler can be
/// registered again without another layer of boxing.
///
/// The trait is **sealed** (via the private `Sealed` supertrait).
pub trait Handler: private::Sealed + Send + Sync + 'static {
    #[doc(hidden)]
    fn into_boxed_handler(self) -> BoxedHandler;
}

mod private {
    pub trait Sealed {}
}

// ── Blanket implementations ───────────────────────────────────────────────────

impl<F, Fut, R> private::Sealed for F
where
    F: Fn(Request) -> Fut + Send + Sync + 'static,
    Fut: Future<Output = R> + Send + 'static,
    R: IntoResponse + Send + 'static,
{
}

impl<F, Fut, R> Handler for F
where
    F: Fn(Request) -> Fut + Send + Sync + 'static,
    Fut: Future<Output = R> + Send + 'static,
    R: IntoResponse + Send + 'static,
{
    fn into_boxed_handler(self) -> BoxedHandler {
        BoxedHandler(Arc::new(FnHandler(self)))
    }
}

impl private::Sealed for BoxedHandler {}

impl Handler for BoxedHandler {
    fn into_boxed_handler(self) -> BoxedHandler {
        self
    }
}

// ── Concrete wrapper ──────────────────────────────────────────────────────────

/// Holds a concrete handler `F` and bridges it to [`ErasedHandler`].
struct FnHandler<F>(F);

impl<F, Fut, R> ErasedHandler for FnHandler<F>
where
    F: Fn(Request) -> Fut + Send + Sync,
    Fut: Future<Output = R> + Send + 'static,
    R: IntoResponse + Send + 'static,
{
    fn call(&self, req: Request) -> BoxFuture {
        let fut = (self.0)(req);
        Box::pin(async move { fut.await.into_response() })
    }
}
