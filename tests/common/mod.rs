//! Shared utilities for integration testing.

use std::future::Future;
use std::net::SocketAddr;
use std::sync::{Arc, Mutex};
use std::time::Duration;

use games_gateway::config::{ApiKey, GatewayConfig};
use games_gateway::http::GatewayServer;
use tokio::io::{AsyncBufReadExt, AsyncWriteExt, BufReader};
use tokio::net::TcpListener;

pub const TEST_API_KEY: &str = "test-api-key-3f9a";

/// Request targets (path + query) seen by a stub upstream, in arrival order.
#[derive(Clone, Default)]
pub struct RequestLog {
    targets: Arc<Mutex<Vec<String>>>,
    content_types: Arc<Mutex<Vec<Option<String>>>>,
}

#[allow(dead_code)]
impl RequestLog {
    pub fn count(&self) -> usize {
        self.targets.lock().unwrap().len()
    }

    pub fn targets(&self) -> Vec<String> {
        self.targets.lock().unwrap().clone()
    }

    pub fn last_query_pairs(&self) -> Vec<(String, String)> {
        let target = self.targets().pop().expect("no upstream request recorded");
        let url = url::Url::parse(&format!("http://stub{}", target)).unwrap();
        url.query_pairs()
            .map(|(k, v)| (k.into_owned(), v.into_owned()))
            .collect()
    }

    pub fn content_types(&self) -> Vec<Option<String>> {
        self.content_types.lock().unwrap().clone()
    }
}

/// Start a programmable stub upstream with async support.
///
/// `f` receives the request target and returns `(status, body)`.
pub async fn start_programmable_backend<F, Fut>(f: F) -> (SocketAddr, RequestLog)
where
    F: Fn(String) -> Fut + Send + Sync + 'static,
    Fut: Future<Output = (u16, String)> + Send + 'static,
{
    let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
    let addr = listener.local_addr().unwrap();
    let log = RequestLog::default();
    let f = Arc::new(f);

    let task_log = log.clone();
    tokio::spawn(async move {
        loop {
            match listener.accept().await {
                Ok((socket, _)) => {
                    let f = f.clone();
                    let log = task_log.clone();
                    tokio::spawn(async move {
                        let (read_half, mut write_half) = socket.into_split();
                        let mut reader = BufReader::new(read_half);

                        let mut request_line = String::new();
                        if reader.read_line(&mut request_line).await.is_err() {
                            return;
                        }
                        let target = request_line
                            .split_whitespace()
                            .nth(1)
                            .unwrap_or_default()
                            .to_string();

                        let mut content_type = None;
                        loop {
                            let mut line = String::new();
                            match reader.read_line(&mut line).await {
                                Ok(0) | Err(_) => break,
                                Ok(_) if line == "\r\n" => break,
                                Ok(_) => {
                                    if let Some((name, value)) = line.split_once(':') {
                                        if name.eq_ignore_ascii_case("content-type") {
                                            content_type = Some(value.trim().to_string());
                                        }
                                    }
                                }
                            }
                        }

                        log.targets.lock().unwrap().push(target.clone());
                        log.content_types.lock().unwrap().push(content_type);

                        let (status, body) = f(target).await;
                        let status_text = match status {
                            200 => "200 OK",
                            401 => "401 Unauthorized",
                            404 => "404 Not Found",
                            429 => "429 Too Many Requests",
                            500 => "500 Internal Server Error",
                            502 => "502 Bad Gateway",
                            503 => "503 Service Unavailable",
                            _ => "200 OK",
                        };

                        let response_str = format!(
                            "HTTP/1.1 {}\r\nContent-Type: application/json\r\nContent-Length: {}\r\nConnection: close\r\n\r\n{}",
                            status_text,
                            body.len(),
                            body
                        );
                        let _ = write_half.write_all(response_str.as_bytes()).await;
                        let _ = write_half.shutdown().await;
                        tokio::time::sleep(Duration::from_millis(10)).await;
                    });
                }
                Err(_) => break,
            }
        }
    });

    (addr, log)
}

/// Start a stub upstream that always returns the same status and body.
#[allow(dead_code)]
pub async fn start_fixed_backend(status: u16, body: &'static str) -> (SocketAddr, RequestLog) {
    start_programmable_backend(move |_| async move { (status, body.to_string()) }).await
}

/// An address where nothing is listening.
#[allow(dead_code)]
pub async fn unreachable_addr() -> SocketAddr {
    let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
    let addr = listener.local_addr().unwrap();
    drop(listener);
    addr
}

/// Gateway config pointing at `upstream`.
pub fn gateway_config(upstream: SocketAddr) -> GatewayConfig {
    let mut config = GatewayConfig::default();
    config.listener.host = "127.0.0.1".to_string();
    config.listener.port = 0;
    config.upstream.base_url = format!("http://{}/api", upstream);
    config.upstream.api_key = ApiKey::new(TEST_API_KEY);
    config
}

/// Start the gateway on an ephemeral port and return its address.
pub async fn start_gateway(config: GatewayConfig) -> SocketAddr {
    let server = GatewayServer::new(config).unwrap();
    let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
    let addr = listener.local_addr().unwrap();

    tokio::spawn(async move {
        let _ = server.run(listener, std::future::pending()).await;
    });

    addr
}

pub fn client() -> reqwest::Client {
    reqwest::Client::builder().no_proxy().build().unwrap()
}
