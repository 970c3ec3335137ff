//! In-process HTTP server for provider tests.

use tokio::io::{AsyncReadExt, AsyncWriteExt};
use tokio::net::TcpListener;

/// A canned response for requests whose path starts with `prefix`.
#[derive(Clone)]
pub(crate) struct Route {
    prefix: String,
    status: u16,
    content_type: String,
    body: Vec<u8>,
    stall: bool,
}

impl Route {
    pub(crate) fn ok(prefix: &str, content_type: &str, body: &[u8]) -> Self {
        Self {
            prefix: prefix.to_string(),
            status: 200,
            content_type: content_type.to_string(),
            body: body.to_vec(),
            stall: false,
        }
    }

    pub(crate) fn json(prefix: &str, body: &str) -> Self {
        Self::ok(prefix, "application/json", body.as_bytes())
    }

    pub(crate) fn status(prefix: &str, status: u16) -> Self {
        Self {
            status,
            ..Self::ok(prefix, "text/plain", b"error")
        }
    }

    /// Accepts the request and never answers.
    pub(crate) fn stall(prefix: &str) -> Self {
        Self {
            stall: true,
            ..Self::ok(prefix, "text/plain", b"")
        }
    }
}

pub(crate) struct MockServer {
    base: String,
    listener: Option<TcpListener>,
    handle: Option<tokio::task::JoinHandle<()>>,
}

impl MockServer {
    /// Serves `routes` until dropped; unmatched paths get a 404.
    pub(crate) async fn start(routes: Vec<Route>) -> Self {
        Self::bind().await.serve(routes)
    }

    /// Reserves the address without serving yet, so routes can embed URLs
    /// pointing back at this server.
    pub(crate) async fn bind() -> Self {
        let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
        let port = listener.local_addr().unwrap().port();
        Self {
            base: format!("http://127.0.0.1:{port}"),
            listener: Some(listener),
            handle: None,
        }
    }

    pub(crate) fn serve(mut self, routes: Vec<Route>) -> Self {
        let listener = self.listener.take().expect("mock server already serving");
        let handle = tokio::spawn(async move {
            while let Ok((mut stream, _)) = listener.accept().await {
                let routes = routes.clone();
                tokio::spawn(async move {
                    let mut buf = vec![0u8; 8192];
                    let n = stream.read(&mut buf).await.unwrap_or(0);
                    let request = String::from_utf8_lossy(&buf[..n]);
                    let path = request.split_whitespace().nth(1).unwrap_or("/").to_string();

                    let route = routes.iter().find(|r| path.starts_with(&r.prefix));
                    let Some(route) = route else {
                        let resp = "HTTP/1.1 404 Not Found\r\nContent-Length: 0\r\nConnection: close\r\n\r\n";
                        let _ = stream.write_all(resp.as_bytes()).await;
                        let _ = stream.shutdown().await;
                        return;
                    };

                    if route.stall {
                        tokio::time::sleep(std::time::Duration::from_secs(3600)).await;
                        return;
                    }

                    let head = format!(
                        "HTTP/1.1 {} Mock\r\nContent-Type: {}\r\nContent-Length: {}\r\nConnection: close\r\n\r\n",
                        route.status,
                        route.content_type,
                        route.body.len()
                    );
                    let _ = stream.write_all(head.as_bytes()).await;
                    let _ = stream.write_all(&route.body).await;
                    let _ = stream.shutdown().await;
                });
            }
        });

        self.handle = Some(handle);
        self
    }

    pub(crate) fn base_url(&self) -> String {
        self.base.clone()
    }

    pub(crate) fn url(&self, path: &str) -> String {
        format!("{}{}", self.base, path)
    }
}

impl Drop for MockServer {
    fn drop(&mut self) {
        if let Some(handle) = &self.handle {
            handle.abort();
        }
    }
}
