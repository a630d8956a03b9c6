//! Middleware layer.
//!
//! A [`Middleware`] takes the handler it wraps and returns a new one. It is
//! the right place for cross-cutting concerns: tracing, headers, auth checks.
//! Attach it to a [`Group`](crate::Group) and it wraps every route in that
//! group, and only that group.
//!
//! Built-in middleware:
//! - [`trace()`]: per-request span with method, path, status, latency
//! - [`set_header()`]: sets a fixed header on every response

use std::fmt;
use std::sync::Arc;

use crate::handler::BoxedHandler;

mod header;
mod trace;

pub use header::set_header;
pub use trace::trace;

type WrapFn = dyn Fn(BoxedHandler) -> Option<BoxedHandler> + Send + Sync + 'static;

/// A handler transformer.
///
/// Cloning is cheap; identity is irrelevant. A middleware built with
/// [`Middleware::try_new`] may decline to produce a handler, which is a
/// [`MiddlewareProducedNil`](crate::BuildError::MiddlewareProducedNil) error
/// when the group composes.
#[derive(Clone)]
pub struct Middleware {
    /// Outermost first. More than one only for a chain.
    layers: Arc<[Arc<WrapFn>]>,
    chained: bool,
}

impl Middleware {
    pub fn new<F>(f: F) -> Self
    where
        F: Fn(BoxedHandler) -> BoxedHandler + Send + Sync + 'static,
    {
        Self::try_new(move |next| Some(f(next)))
    }

    /// Middleware whose construction can fail per route, e.g. a layer built
    /// from optional settings.
    pub fn try_new<F>(f: F) -> Self
    where
        F: Fn(BoxedHandler) -> Option<BoxedHandler> + Send + Sync + 'static,
    {
        let layer: Arc<WrapFn> = Arc::new(f);
        Self { layers: Arc::from(vec![layer]), chained: false }
    }

    pub fn apply(&self, next: BoxedHandler) -> Option<BoxedHandler> {
        self.apply_layers(next).ok()
    }

    /// Collapses a list into one middleware with the same ordering: the first
    /// element ends up outermost. Nested chains are flattened, so a declining
    /// layer is always reported by its position in the flat list.
    pub fn chain(middleware: impl IntoIterator<Item = Middleware>) -> Self {
        let layers: Vec<Arc<WrapFn>> = middleware
            .into_iter()
            .flat_map(|mw| mw.layers.iter().cloned().collect::<Vec<_>>())
            .collect();
        Self { layers: layers.into(), chained: true }
    }

    /// Wraps `next` in every layer, innermost first. On failure returns the
    /// declining layer's position.
    pub(crate) fn apply_layers(&self, next: BoxedHandler) -> Result<BoxedHandler, usize> {
        self.layers
            .iter()
            .enumerate()
            .rev()
            .try_fold(next, |next, (layer, wrap)| wrap(next).ok_or(layer))
    }

    pub(crate) fn is_chain(&self) -> bool {
        self.chained
    }
}

impl fmt::Debug for Middleware {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Middleware")
            .field("layers", &self.layers.len())
            .field("chained", &self.chained)
            .finish()
    }
}
