//! Error types.
//!
//! Two families live here. [`BuildError`] is the composition taxonomy: every
//! way a group can be malformed. [`Error`] is what fallible runtime
//! operations return: binding a port, or a build error surfacing through `?`.

use thiserror::Error;

/// A malformed route group, detected before any request is served.
///
/// These are never recoverable. The group's [`Reporter`](crate::report::Reporter)
/// sees each one the moment it happens, and the group refuses to compose
/// afterwards.
#[derive(Clone, Debug, Eq, Error, PartialEq)]
pub enum BuildError {
    /// A route was given no handler.
    #[error("route `{path}` has no handler")]
    InvalidHandler { path: String },

    /// An unset middleware was attached. `index` is its position in the batch.
    #[error("middleware #{index} in batch is unset")]
    InvalidMiddleware { index: usize },

    /// A middleware returned no handler when applied to a route. When the
    /// middleware is a [`chain`](crate::Middleware::chain), `layer` is the
    /// position of the declining layer inside it.
    #[error(
        "middleware #{index}{} produced no handler for route `{path}`",
        .layer.map(|l| format!(" (chained layer #{l})")).unwrap_or_default()
    )]
    MiddlewareProducedNil {
        path: String,
        index: usize,
        layer: Option<usize>,
    },

    /// A registration entry is neither a route, a group, nor a path/handler pair.
    #[error("unrecognized registration type `{type_name}`: {contents}")]
    UnrecognizedRegistrationType {
        type_name: &'static str,
        contents: String,
    },

    /// The collaborator a table was installed into refused a path.
    #[error("route `{path}` rejected on install: {reason}")]
    RouteRejected { path: String, reason: String },
}

/// The error type returned by grove's fallible runtime operations.
#[derive(Debug, Error)]
pub enum Error {
    /// Binding to a port or accepting a connection failed.
    #[error("io: {0}")]
    Io(#[from] std::io::Error),

    /// A group failed to compose.
    #[error("build: {0}")]
    Build(#[from] BuildError),
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn messages_name_the_offender() {
        let err = BuildError::MiddlewareProducedNil { path: "/admin".into(), index: 2, layer: None };
        assert_eq!(err.to_string(), "middleware #2 produced no handler for route `/admin`");

        let err = BuildError::MiddlewareProducedNil { path: "/admin".into(), index: 2, layer: Some(1) };
        assert_eq!(
            err.to_string(),
            "middleware #2 (chained layer #1) produced no handler for route `/admin`",
        );

        let err = BuildError::RouteRejected { path: "/bad/{".into(), reason: "invalid".into() };
        assert_eq!(err.to_string(), "route `/bad/{` rejected on install: invalid");

        let err = BuildError::UnrecognizedRegistrationType {
            type_name: "u32",
            contents: "7".into(),
        };
        assert_eq!(err.to_string(), "unrecognized registration type `u32`: 7");
    }

    #[test]
    fn build_errors_convert_into_error() {
        let err: Error = BuildError::InvalidMiddleware { index: 0 }.into();
        assert!(matches!(err, Error::Build(BuildError::InvalidMiddleware { index: 0 })));
    }
}
