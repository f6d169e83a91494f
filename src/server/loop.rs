// Server loop module
// Accepts connections until the shutdown future resolves

use std::future::Future;
use std::sync::atomic::AtomicUsize;
use std::sync::Arc;
use tokio::net::TcpListener;

use super::connection::accept_connection;
use crate::config::AppState;
use crate::logger;

/// Accept loop for the catalog server
///
/// Returns once `shutdown` completes. Connections already being served keep
/// running on their own tasks until they finish or time out.
pub async fn start_server_loop<F>(
    listener: TcpListener,
    state: Arc<AppState>,
    shutdown: F,
) -> std::io::Result<()>
where
    F: Future<Output = ()>,
{
    let active_connections = Arc::new(AtomicUsize::new(0));
    tokio::pin!(shutdown);

    loop {
        tokio::select! {
            accept_result = listener.accept() => {
                match accept_result {
                    Ok((stream, peer_addr)) => {
                        accept_connection(stream, peer_addr, &state, &active_connections);
                    }
                    Err(e) => {
                        logger::log_error(&format!("Failed to accept connection: {e}"));
                    }
                }
            }

            () = &mut shutdown => {
                logger::log_info(&format!(
                    "Accept loop stopped on {}",
                    listener.local_addr()?
                ));
                return Ok(());
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::catalog::fixture::TempCatalog;
    use crate::catalog::ProductCatalog;
    use crate::config::Config;
    use crate::server::create_reusable_listener;
    use http_body_util::{BodyExt, Empty};
    use hyper::body::Bytes;
    use hyper::{Request, StatusCode};
    use hyper_util::rt::TokioIo;
    use std::time::Duration;
    use tokio::io::{AsyncReadExt, AsyncWriteExt};
    use tokio::net::TcpStream;
    use tokio::sync::oneshot;

    fn get_request(addr: std::net::SocketAddr, path: &str) -> Request<Empty<Bytes>> {
        Request::builder()
            .uri(path)
            .header("Host", addr.to_string())
            .body(Empty::<Bytes>::new())
            .unwrap()
    }

    /// One request on a fresh connection; `None` if the server hung up
    async fn try_get(addr: std::net::SocketAddr, path: &str) -> Option<(StatusCode, Bytes)> {
        let stream = TcpStream::connect(addr).await.ok()?;
        let (mut sender, conn) = hyper::client::conn::http1::handshake(TokioIo::new(stream))
            .await
            .ok()?;
        tokio::spawn(conn);

        let response = sender.send_request(get_request(addr, path)).await.ok()?;
        let status = response.status();
        let body = response.into_body().collect().await.ok()?.to_bytes();
        Some((status, body))
    }

    async fn get(addr: std::net::SocketAddr, path: &str) -> (StatusCode, Bytes) {
        try_get(addr, path).await.unwrap()
    }

    fn test_state(fixture: &TempCatalog, max_connections: Option<u64>) -> Arc<AppState> {
        let mut config = Config::load_from("does/not/exist/catalog-config").unwrap();
        config.logging.access_log = false;
        config.performance.max_connections = max_connections;
        Arc::new(AppState {
            config,
            catalog: ProductCatalog::new(fixture.path()),
        })
    }

    #[tokio::test]
    async fn test_serves_catalog_over_tcp() {
        let fixture = TempCatalog::new("server-e2e");
        fixture.write(r#"[{"id":"p-1","名称":"茉莉花茶"}]"#);

        let state = test_state(&fixture, None);

        let listener = create_reusable_listener("127.0.0.1:0".parse().unwrap()).unwrap();
        let addr = listener.local_addr().unwrap();
        let (stop_tx, stop_rx) = oneshot::channel::<()>();
        let server = tokio::spawn(start_server_loop(listener, state, async {
            let _ = stop_rx.await;
        }));

        let (status, body) = get(addr, "/api/products").await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(
            String::from_utf8(body.to_vec()).unwrap(),
            r#"{"success":true,"total":1,"products":[{"id":"p-1","名称":"茉莉花茶"}]}"#
        );

        let (status, _) = get(addr, "/nope").await;
        assert_eq!(status, StatusCode::NOT_FOUND);

        std::fs::remove_file(fixture.path()).unwrap();
        let (status, body) = get(addr, "/api/products").await;
        assert_eq!(status, StatusCode::NOT_FOUND);
        assert_eq!(&body[..], br#"{"success":false,"error":"File not found"}"#);

        stop_tx.send(()).unwrap();
        server.await.unwrap().unwrap();
    }

    #[tokio::test]
    async fn test_connection_limit_frees_slot_on_close() {
        let fixture = TempCatalog::new("server-limit");
        fixture.write("[]");
        let state = test_state(&fixture, Some(1));

        let listener = create_reusable_listener("127.0.0.1:0".parse().unwrap()).unwrap();
        let addr = listener.local_addr().unwrap();
        let (stop_tx, stop_rx) = oneshot::channel::<()>();
        let server = tokio::spawn(start_server_loop(listener, state, async {
            let _ = stop_rx.await;
        }));

        // Keep-alive connection occupying the only slot
        let stream = TcpStream::connect(addr).await.unwrap();
        let (mut held, conn) = hyper::client::conn::http1::handshake(TokioIo::new(stream))
            .await
            .unwrap();
        let held_conn = tokio::spawn(conn);
        let response = held.send_request(get_request(addr, "/api/products")).await.unwrap();
        assert_eq!(response.status(), StatusCode::OK);
        response.into_body().collect().await.unwrap();

        // Over the limit: closed without a response
        let mut extra = TcpStream::connect(addr).await.unwrap();
        let _ = extra
            .write_all(b"GET /api/products HTTP/1.1\r\nHost: localhost\r\n\r\n")
            .await;
        let mut buf = Vec::new();
        let _ = extra.read_to_end(&mut buf).await;
        assert!(buf.is_empty(), "unexpected response: {}", String::from_utf8_lossy(&buf));

        // Closing the held connection releases its slot
        drop(held);
        let _ = held_conn.await;

        let mut served = None;
        for _ in 0..50 {
            if let Some(result) = try_get(addr, "/api/products").await {
                served = Some(result);
                break;
            }
            tokio::time::sleep(Duration::from_millis(20)).await;
        }
        let (status, body) = served.expect("slot was never released");
        assert_eq!(status, StatusCode::OK);
        assert_eq!(&body[..], br#"{"success":true,"total":0,"products":[]}"#);

        stop_tx.send(()).unwrap();
        server.await.unwrap().unwrap();
    }
}
