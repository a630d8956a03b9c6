use crate::handler::BoxedHandler;
use crate::middleware::Middleware;
use crate::request::Request;

/// Sets `name: value` on every response, replacing whatever the inner
/// handler set.
///
/// ```rust
/// use grove::{middleware, Group, Request};
///
/// let api = Group::new()
///     .wrap(middleware::set_header("cache-control", "no-store"))
///     .handle(("/me", |_req: Request| async { "me" }));
/// ```
pub fn set_header(name: &str, value: &str) -> Middleware {
    let name = name.to_owned();
    let value = value.to_owned();
    Middleware::new(move |next| {
        let name = name.clone();
        let value = value.clone();
        BoxedHandler::new(move |req: Request| {
            let next = next.clone();
            let name = name.clone();
            let value = value.clone();
            async move {
                let mut res = next.call(req).await;
                res.set_header(&name, &value);
                res
            }
        })
    })
}
