//! # grove
//!
//! Route groups with scoped middleware, flattened into one dispatch table.
//!
//! ## The contract
//!
//! You declare routes and middleware in independent [`Group`]s and nest
//! groups inside each other. grove flattens the tree into a single
//! [`DispatchTable`] before the first request is served, with three
//! guarantees:
//!
//! - **Ordering**: a group's middleware wraps in registration order: the
//!   first one attached is the outermost layer.
//! - **Isolation**: a subgroup's middleware wraps the subgroup's routes and
//!   nothing else. The parent's middleware wraps everything the parent owns,
//!   subgroup routes included.
//! - **Fail fast**: an unset handler, an unset middleware, or an entry that
//!   cannot be registered is reported the moment it is seen, and the group
//!   refuses to compose. See [`report`].
//!
//! What grove leaves to collaborators: path matching and duplicate policy
//! ([`Router`], or anything implementing [`Mux`]) and the transport
//! ([`Server`]).
//!
//! ## Quick start
//!
//! ```rust,no_run
//! use grove::{middleware, Group, Middleware, Request, Response, Server};
//! use http::StatusCode;
//!
//! #[tokio::main]
//! async fn main() -> Result<(), grove::Error> {
//!     let admin = Group::new()
//!         .wrap(require_token())
//!         .handle(("/admin/stats", stats));
//!
//!     let app = Group::new()
//!         .wrap(middleware::trace())
//!         .handle(("/hello", hello))
//!         .handle(admin)
//!         .compile()?;
//!
//!     Server::bind("0.0.0.0:3000").serve(app).await
//! }
//!
//! async fn hello(_req: Request) -> &'static str {
//!     "hello"
//! }
//!
//! async fn stats(_req: Request) -> Response {
//!     Response::json(br#"{"users":3}"#.to_vec())
//! }
//!
//! fn require_token() -> Middleware {
//!     Middleware::new(|next| {
//!         grove::BoxedHandler::new(move |req: Request| {
//!             let next = next.clone();
//!             async move {
//!                 match req.header("authorization") {
//!                     Some(_) => next.call(req).await,
//!                     None => Response::status(StatusCode::UNAUTHORIZED),
//!                 }
//!             }
//!         })
//!     })
//! }
//! ```

mod compose;
mod error;
mod group;
mod handler;
mod request;
mod response;
mod route;
mod router;
mod server;
mod table;

pub mod middleware;
pub mod report;

pub use error::{BuildError, Error};
pub use group::{Entry, Group};
pub use handler::{BoxFuture, BoxedHandler, Handler};
pub use middleware::Middleware;
pub use request::Request;
pub use response::{ContentType, IntoResponse, Response, ResponseBuilder};
pub use route::Route;
pub use router::Router;
pub use server::Server;
pub use table::{DispatchTable, Mux, install};
