//! Scripted stub providers for exercising the outbound HTTP clients.
//!
//! Each stub is a real axum server on an ephemeral port; tests point a
//! service's configured base URL at it and assert on the recorded calls.

use axum::body::Body;
use axum::extract::Request;
use axum::http::header;
use axum::response::Response;
use axum::Router;
use std::collections::VecDeque;
use std::net::SocketAddr;
use std::sync::{Arc, Mutex};

#[derive(Debug, Clone)]
pub struct RecordedCall {
    pub method: String,
    pub uri: String,
    pub authorization: Option<String>,
    pub body: String,
}

pub struct StubProvider {
    addr: SocketAddr,
    calls: Arc<Mutex<Vec<RecordedCall>>>,
}

impl StubProvider {
    pub fn url(&self, path: &str) -> String {
        format!("http://{}{}", self.addr, path)
    }

    pub fn calls(&self) -> Vec<RecordedCall> {
        self.calls.lock().unwrap().clone()
    }
}

/// Spawn a stub that answers requests in order from `responses`
/// (status, JSON body). Requests past the end of the script get a 500.
pub async fn spawn_stub(responses: Vec<(u16, String)>) -> StubProvider {
    let script = Arc::new(Mutex::new(VecDeque::from(responses)));
    let calls: Arc<Mutex<Vec<RecordedCall>>> = Arc::new(Mutex::new(Vec::new()));

    let handler_calls = calls.clone();
    let app = Router::new().fallback(move |req: Request| {
        let script = script.clone();
        let calls = handler_calls.clone();
        async move {
            let method = req.method().to_string();
            let uri = req.uri().to_string();
            let authorization = req
                .headers()
                .get(header::AUTHORIZATION)
                .and_then(|v| v.to_str().ok())
                .map(|v| v.to_string());

            let body = axum::body::to_bytes(req.into_body(), usize::MAX)
                .await
                .unwrap_or_default();
            calls.lock().unwrap().push(RecordedCall {
                method,
                uri,
                authorization,
                body: String::from_utf8_lossy(&body).to_string(),
            });

            let (status, body) = script
                .lock()
                .unwrap()
                .pop_front()
                .unwrap_or((500, r#"{"error":"stub script exhausted"}"#.to_string()));

            Response::builder()
                .status(status)
                .header(header::CONTENT_TYPE, "application/json")
                .body(Body::from(body))
                .unwrap()
        }
    });

    let listener = tokio::net::TcpListener::bind("127.0.0.1:0")
        .await
        .expect("bind stub listener");
    let addr = listener.local_addr().expect("stub local addr");
    tokio::spawn(async move {
        axum::serve(listener, app).await.expect("serve stub");
    });

    StubProvider { addr, calls }
}
