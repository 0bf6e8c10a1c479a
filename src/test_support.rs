//! In-process HTTP fixture server for download tests.

use std::sync::Arc;
use std::time::Duration;

use tokio::io::{AsyncReadExt, AsyncWriteExt};
use tokio::net::TcpListener;

pub struct Route {
    path: &'static str,
    status: u16,
    body: Vec<u8>,
    content_length: bool,
    byte_delay: Option<Duration>,
    cut_after: Option<usize>,
}

impl Route {
    pub fn ok(path: &'static str, body: Vec<u8>) -> Self {
        Self::status(path, 200, body)
    }

    pub fn status(path: &'static str, status: u16, body: Vec<u8>) -> Self {
        Self {
            path,
            status,
            body,
            content_length: true,
            byte_delay: None,
            cut_after: None,
        }
    }

    /// Omit `Content-Length`; the body ends when the connection closes.
    pub fn without_length(mut self) -> Self {
        self.content_length = false;
        self
    }

    /// Send the body one byte at a time, sleeping `delay` before each byte.
    pub fn trickle(mut self, delay: Duration) -> Self {
        self.byte_delay = Some(delay);
        self
    }

    /// Close the connection after `n` body bytes, short of the declared length.
    pub fn cut_after(mut self, n: usize) -> Self {
        self.cut_after = Some(n);
        self
    }
}

/// Client that ignores proxy settings from the environment.
pub fn client() -> reqwest::Client {
    reqwest::Client::builder().no_proxy().build().unwrap()
}

/// Like [`client`], with the production timeout policy.
pub fn client_with_timeout(timeout: Duration) -> reqwest::Client {
    crate::fetch::client_builder(Some(timeout))
        .no_proxy()
        .build()
        .unwrap()
}

/// Start serving `routes` on a random local port. Unknown paths get 404.
/// Returns the base URL, e.g. `http://127.0.0.1:40123`.
pub async fn serve(routes: Vec<Route>) -> String {
    let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
    let addr = listener.local_addr().unwrap();
    let routes = Arc::new(routes);

    tokio::spawn(async move {
        while let Ok((mut sock, _)) = listener.accept().await {
            let routes = Arc::clone(&routes);
            tokio::spawn(async move {
                let mut req = Vec::new();
                let mut buf = [0u8; 1024];
                loop {
                    let n = sock.read(&mut buf).await.unwrap();
                    if n == 0 {
                        break;
                    }
                    req.extend_from_slice(&buf[..n]);
                    if req.windows(4).any(|w| w == b"\r\n\r\n") {
                        break;
                    }
                }
                let req = String::from_utf8_lossy(&req);
                let path = req.split_whitespace().nth(1).unwrap_or("/");

                let not_found = Route::status("", 404, b"not found".to_vec());
                let route = routes.iter().find(|r| r.path == path).unwrap_or(&not_found);
                let reason = match route.status {
                    200 => "OK",
                    404 => "Not Found",
                    500 => "Internal Server Error",
                    _ => "Status",
                };

                let mut head = format!(
                    "HTTP/1.1 {} {}\r\nConnection: close\r\nContent-Type: application/octet-stream\r\n",
                    route.status, reason
                );
                if route.content_length {
                    head.push_str(&format!("Content-Length: {}\r\n", route.body.len()));
                }
                head.push_str("\r\n");

                sock.write_all(head.as_bytes()).await.unwrap();
                let body = match route.cut_after {
                    Some(n) => &route.body[..n.min(route.body.len())],
                    None => &route.body[..],
                };
                match route.byte_delay {
                    Some(delay) => {
                        for byte in body {
                            tokio::time::sleep(delay).await;
                            sock.write_all(&[*byte]).await.unwrap();
                            sock.flush().await.unwrap();
                        }
                    }
                    None => sock.write_all(body).await.unwrap(),
                }
                sock.shutdown().await.unwrap();
            });
        }
    });

    format!("http://{addr}")
}
