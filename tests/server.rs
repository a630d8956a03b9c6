//! End-to-end: a composed group served over a real socket.

use grove::{middleware, Group, Request, Server};
use tokio::io::{AsyncReadExt, AsyncWriteExt};
use tokio::net::{TcpListener, TcpStream};
use tokio::sync::oneshot;

async fn raw_get(addr: std::net::SocketAddr, path: &str) -> String {
    let mut stream = TcpStream::connect(addr).await.unwrap();
    let request = format!("GET {path} HTTP/1.1\r\nhost: localhost\r\nconnection: close\r\n\r\n");
    stream.write_all(request.as_bytes()).await.unwrap();

    let mut response = String::new();
    stream.read_to_string(&mut response).await.unwrap();
    response
}

#[tokio::test]
async fn serves_composed_routes_and_shuts_down() {
    let _ = tracing_subscriber::fmt().with_test_writer().try_init();

    let router = Group::new()
        .wrap(middleware::trace())
        .handle(("/hello", |_req: Request| async { "hello" }))
        .handle(
            Group::new()
                .wrap(middleware::set_header("x-subgroup", "Applied"))
                .handle(("/sub", |_req: Request| async { "sub" })),
        )
        .compile()
        .unwrap();

    let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
    let addr = listener.local_addr().unwrap();
    let (stop, stopped) = oneshot::channel::<()>();

    let server = tokio::spawn(
        Server::from_listener(listener).serve_with_shutdown(router, async {
            let _ = stopped.await;
        }),
    );

    let hello = raw_get(addr, "/hello").await;
    assert!(hello.starts_with("HTTP/1.1 200 OK"), "{hello}");
    assert!(hello.ends_with("hello"), "{hello}");
    assert!(!hello.contains("x-subgroup"), "{hello}");

    let sub = raw_get(addr, "/sub").await;
    assert!(sub.contains("x-subgroup: Applied"), "{sub}");
    assert!(sub.ends_with("sub"), "{sub}");

    let missing = raw_get(addr, "/missing").await;
    assert!(missing.starts_with("HTTP/1.1 404 Not Found"), "{missing}");

    stop.send(()).unwrap();
    server.await.unwrap().unwrap();
}
