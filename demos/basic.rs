//! Minimal grove example: a public group, a token-guarded admin subgroup,
//! and request tracing over both.
//!
//! Run with:
//!   cargo run --example basic
//!
//! Try:
//!   curl -i http://localhost:3000/hello
//!   curl -i http://localhost:3000/admin/stats
//!   curl -i -H 'authorization: Bearer x' http://localhost:3000/admin/stats

use grove::{middleware, BoxedHandler, Group, Middleware, Request, Response, Server};
use http::StatusCode;

#[tokio::main]
async fn main() -> Result<(), grove::Error> {
    tracing_subscriber::fmt::init();

    // Only routes in this group need a token.
    let admin = Group::new()
        .wrap(require_token())
        .wrap(middleware::set_header("cache-control", "no-store"))
        .handle(("/admin/stats", stats));

    let app = Group::new()
        .wrap(middleware::trace())
        .handle(("/hello", hello))
        .handle(admin)
        .compile()?;

    Server::bind("0.0.0.0:3000").serve(app).await
}

// GET /hello
async fn hello(_req: Request) -> &'static str {
    "hello"
}

// GET /admin/stats
async fn stats(_req: Request) -> Response {
    Response::json(br#"{"users":3,"groups":2}"#.to_vec())
}

// 401 unless an authorization header is present. Real apps verify it.
fn require_token() -> Middleware {
    Middleware::new(|next| {
        BoxedHandler::new(move |req: Request| {
            let next = next.clone();
            async move {
                if req.header("authorization").is_none() {
                    return Response::status(StatusCode::UNAUTHORIZED);
                }
                next.call(req).await
            }
        })
    })
}
