//! What happens when a group turns out to be malformed.
//!
//! A broken middleware chain must never serve traffic: a route that silently
//! lost its auth layer is worse than a process that refuses to start. Each
//! [`Group`](crate::Group) therefore carries a [`Reporter`] and calls it the
//! moment it detects a [`BuildError`], with the source location of the
//! offending call.
//!
//! The default, [`Exit`], logs and terminates the process. Tests swap in
//! [`Collect`] to observe errors, or [`Panic`] to use `#[should_panic]`.

use std::panic::Location;
use std::sync::{Arc, Mutex};

use tracing::error;

use crate::error::BuildError;

/// Receives each build error exactly once.
pub trait Reporter: Send + Sync + 'static {
    fn report(&self, err: &BuildError, at: &'static Location<'static>);
}

impl<R: Reporter> Reporter for Arc<R> {
    fn report(&self, err: &BuildError, at: &'static Location<'static>) {
        (**self).report(err, at);
    }
}

/// Logs the error and exits the process with status 1.
#[derive(Clone, Copy, Debug, Default)]
pub struct Exit;

impl Reporter for Exit {
    fn report(&self, err: &BuildError, at: &'static Location<'static>) {
        error!(error = %err, location = %at, "malformed route group, exiting");
        std::process::exit(1);
    }
}

/// Panics with the error and its location.
#[derive(Clone, Copy, Debug, Default)]
pub struct Panic;

impl Reporter for Panic {
    fn report(&self, err: &BuildError, at: &'static Location<'static>) {
        panic!("{at}: {err}");
    }
}

/// Records every error it receives.
///
/// Share it through an `Arc` to inspect it after building:
///
/// ```rust
/// use std::sync::Arc;
/// use grove::{BuildError, Group, Middleware, report::Collect};
///
/// let auth: Option<Middleware> = None; // e.g. not configured
/// let errors = Arc::new(Collect::default());
/// let result = Group::with_reporter(Arc::clone(&errors))
///     .wrap(auth)
///     .compose();
///
/// assert!(result.is_err());
/// assert_eq!(errors.errors(), [BuildError::InvalidMiddleware { index: 0 }]);
/// ```
#[derive(Debug, Default)]
pub struct Collect {
    errors: Mutex<Vec<(BuildError, &'static Location<'static>)>>,
}

impl Collect {
    pub fn errors(&self) -> Vec<BuildError> {
        self.lock().iter().map(|(err, _)| err.clone()).collect()
    }

    /// Errors together with the call site that triggered them.
    pub fn reports(&self) -> Vec<(BuildError, &'static Location<'static>)> {
        self.lock().clone()
    }

    fn lock(&self) -> std::sync::MutexGuard<'_, Vec<(BuildError, &'static Location<'static>)>> {
        // Entries are pushed whole, so a poisoned lock still holds valid data.
        self.errors.lock().unwrap_or_else(|e| e.into_inner())
    }
}

impl Reporter for Collect {
    fn report(&self, err: &BuildError, at: &'static Location<'static>) {
        self.lock().push((err.clone(), at));
    }
}
