//! In-process axum server for exercising the REST client.
//!
//! The stub answers requests in order from a fixed list of canned
//! replies and records every request it sees. It runs on its own thread
//! with a current-thread tokio runtime, so the blocking client under test
//! can call it from a plain `#[test]`.

#![allow(dead_code)]

use std::collections::VecDeque;
use std::sync::{Arc, Mutex};
use std::thread;

use axum::Router;
use axum::body::Bytes;
use axum::extract::State;
use axum::http::{HeaderMap, Method, StatusCode, Uri, header};
use axum::response::{IntoResponse, Response};

#[derive(Debug, Clone)]
pub struct Reply {
    pub status: u16,
    pub body: String,
}

impl Reply {
    pub fn json(status: u16, body: &str) -> Self {
        Reply {
            status,
            body: body.to_string(),
        }
    }

    pub fn ok(body: &str) -> Self {
        Reply::json(200, body)
    }

    pub fn empty() -> Self {
        Reply::json(204, "")
    }
}

#[derive(Debug, Clone)]
pub struct Recorded {
    pub method: String,
    pub path: String,
    /// Header names are lowercased
    pub headers: Vec<(String, String)>,
    pub body: String,
}

impl Recorded {
    pub fn header(&self, name: &str) -> Option<&str> {
        self.headers
            .iter()
            .find(|(k, _)| k == &name.to_ascii_lowercase())
            .map(|(_, v)| v.as_str())
    }

    pub fn json(&self) -> serde_json::Value {
        serde_json::from_str(&self.body).unwrap()
    }
}

#[derive(Default)]
struct Stub {
    replies: Mutex<VecDeque<Reply>>,
    requests: Mutex<Vec<Recorded>>,
}

pub struct StubServer {
    pub url: String,
    stub: Arc<Stub>,
}

impl StubServer {
    /// Serve `replies` in order; any request beyond them gets a 500.
    pub fn start(replies: Vec<Reply>) -> Self {
        let stub = Arc::new(Stub {
            replies: Mutex::new(replies.into()),
            ..Default::default()
        });

        // Bound before returning so the first request cannot race the server
        let listener = std::net::TcpListener::bind("127.0.0.1:0").unwrap();
        listener.set_nonblocking(true).unwrap();
        let url = format!("http://{}", listener.local_addr().unwrap());

        let state = Arc::clone(&stub);
        thread::spawn(move || {
            let runtime = tokio::runtime::Builder::new_current_thread()
                .enable_all()
                .build()
                .unwrap();
            runtime.block_on(async move {
                let listener = tokio::net::TcpListener::from_std(listener).unwrap();
                let app = Router::new().fallback(record_and_reply).with_state(state);
                axum::serve(listener, app).await.unwrap();
            });
        });

        StubServer { url, stub }
    }

    pub fn requests(&self) -> Vec<Recorded> {
        self.stub.requests.lock().unwrap().clone()
    }
}

/// Record the request, then answer with the next canned reply. The record
/// exists before the client sees the response.
async fn record_and_reply(
    State(stub): State<Arc<Stub>>,
    method: Method,
    uri: Uri,
    headers: HeaderMap,
    body: Bytes,
) -> Response {
    stub.requests.lock().unwrap().push(Recorded {
        method: method.to_string(),
        path: uri.path().to_string(),
        headers: headers
            .iter()
            .map(|(k, v)| (k.as_str().to_string(), v.to_str().unwrap_or_default().to_string()))
            .collect(),
        body: String::from_utf8_lossy(&body).to_string(),
    });

    let reply = stub
        .replies
        .lock()
        .unwrap()
        .pop_front()
        .unwrap_or_else(|| Reply::json(500, r#"{"error":"unexpected request"}"#));
    let status = StatusCode::from_u16(reply.status).unwrap();
    (status, [(header::CONTENT_TYPE, "application/json")], reply.body).into_response()
}
