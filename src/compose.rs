//! The wrapping rule shared by routes and groups.
//!
//! Middleware `[m0, m1, …, mk]` applied to handler `h` yields
//! `m0(m1(…mk(h)))`: the first middleware registered is the outermost layer.
//! It sees the request first and the response last.

use crate::error::BuildError;
use crate::handler::BoxedHandler;
use crate::middleware::Middleware;

/// Folds `middleware` onto `handler` right to left.
///
/// Fails on the first layer that declines to produce a handler; `index` in the
/// error is that middleware's position in `middleware`, and `layer` its
/// position inside a chain.
pub(crate) fn wrap(
    path: &str,
    handler: BoxedHandler,
    middleware: &[Middleware],
) -> Result<BoxedHandler, BuildError> {
    middleware
        .iter()
        .enumerate()
        .rev()
        .try_fold(handler, |next, (index, mw)| {
            mw.apply_layers(next).map_err(|layer| BuildError::MiddlewareProducedNil {
                path: path.to_owned(),
                index,
                layer: mw.is_chain().then_some(layer),
            })
        })
}

#[cfg(test)]
mod tests {
    use std::sync::{Arc, Mutex};

    use super::*;
    use crate::request::Request;
    use crate::response::Response;

    type Log = Arc<Mutex<Vec<String>>>;

    /// Records `name>` on the way in and `<name` on the way out.
    fn recording(name: &'static str, log: &Log) -> Middleware {
        let log = Arc::clone(log);
        Middleware::new(move |next| {
            let log = Arc::clone(&log);
            BoxedHandler::new(move |req: Request| {
                let next = next.clone();
                let log = Arc::clone(&log);
                async move {
                    log.lock().unwrap().push(format!("{name}>"));
                    let res = next.call(req).await;
                    log.lock().unwrap().push(format!("<{name}"));
                    res
                }
            })
        })
    }

    fn base(log: &Log) -> BoxedHandler {
        let log = Arc::clone(log);
        BoxedHandler::new(move |_req: Request| {
            let log = Arc::clone(&log);
            async move {
                log.lock().unwrap().push("handler".to_owned());
                Response::text("ok")
            }
        })
    }

    #[test]
    fn no_middleware_returns_the_same_handler() {
        let log = Log::default();
        let h = base(&log);
        let wrapped = wrap("/", h.clone(), &[]).unwrap();
        assert!(BoxedHandler::ptr_eq(&h, &wrapped));
    }

    #[tokio::test]
    async fn first_registered_is_outermost() {
        let log = Log::default();
        let mws = [recording("m0", &log), recording("m1", &log), recording("m2", &log)];
        let wrapped = wrap("/", base(&log), &mws).unwrap();

        wrapped.call(Request::new("GET", "/")).await;

        assert_eq!(
            *log.lock().unwrap(),
            ["m0>", "m1>", "m2>", "handler", "<m2", "<m1", "<m0"],
        );
    }

    #[test]
    fn declining_layer_is_named_by_index() {
        let log = Log::default();
        let mws = [
            recording("m0", &log),
            Middleware::try_new(|_next| None),
            recording("m2", &log),
        ];
        let err = wrap("/admin", base(&log), &mws).unwrap_err();
        assert_eq!(
            err,
            BuildError::MiddlewareProducedNil { path: "/admin".into(), index: 1, layer: None },
        );
    }

    #[test]
    fn declining_layer_inside_a_chain_is_named() {
        let log = Log::default();
        let chained = Middleware::chain([
            recording("c0", &log),
            recording("c1", &log),
            Middleware::try_new(|_next| None),
        ]);
        let mws = [recording("m0", &log), chained];

        let err = wrap("/x", base(&log), &mws).unwrap_err();

        assert_eq!(
            err,
            BuildError::MiddlewareProducedNil { path: "/x".into(), index: 1, layer: Some(2) },
        );
    }
}
