use std::time::Instant;

use tracing::{Instrument, info, info_span};

use crate::handler::BoxedHandler;
use crate::middleware::Middleware;
use crate::request::Request;

/// Opens an `http.request` span around the inner handler and logs one line
/// per request with its status and latency.
///
/// Attach it first so it is the outermost layer and times everything the
/// group does.
pub fn trace() -> Middleware {
    Middleware::new(|next| {
        BoxedHandler::new(move |req: Request| {
            let next = next.clone();
            let span = info_span!("http.request", method = %req.method(), path = %req.path());
            async move {
                let start = Instant::now();
                let res = next.call(req).await;
                info!(
                    status = res.status_code().as_u16(),
                    latency_us = start.elapsed().as_micros() as u64,
                    "request completed"
                );
                res
            }
            .instrument(span)
        })
    })
}
