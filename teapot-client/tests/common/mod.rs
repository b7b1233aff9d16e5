//! Fake TeapotNet node for integration tests
//!
//! Serves scripted responses on `127.0.0.1:0` and records what it saw.

#![allow(dead_code)]

use axum::{
    extract::State,
    http::{header::COOKIE, HeaderMap, StatusCode},
    routing::get,
    Router,
};
use std::collections::VecDeque;
use std::sync::{Arc, Mutex};
use std::time::Duration;
use teapot_client::config::ServerConfig;
use teapot_client::TeapotClient;
use tokio::net::TcpListener;

pub const SESSION_COOKIE: &str = "name=alice; auth_alice=s3cr3t";

#[derive(Default)]
pub struct FakeNode {
    contacts: Mutex<VecDeque<(StatusCode, String)>>,
    files: Mutex<(StatusCode, String)>,
    cookies: Mutex<Vec<Option<String>>>,
}

impl FakeNode {
    /// Queue a response for the contacts endpoint. Once the queue is drained
    /// the last response is repeated.
    pub fn push_contacts(&self, status: StatusCode, body: &str) {
        self.contacts
            .lock()
            .unwrap()
            .push_back((status, body.to_string()));
    }

    pub fn set_files(&self, status: StatusCode, body: &str) {
        *self.files.lock().unwrap() = (status, body.to_string());
    }

    /// `Cookie` header of every contacts request, in arrival order
    pub fn cookies(&self) -> Vec<Option<String>> {
        self.cookies.lock().unwrap().clone()
    }

    pub fn contacts_requests(&self) -> usize {
        self.cookies.lock().unwrap().len()
    }
}

async fn contacts(State(node): State<Arc<FakeNode>>, headers: HeaderMap) -> (StatusCode, String) {
    node.cookies.lock().unwrap().push(
        headers
            .get(COOKIE)
            .and_then(|v| v.to_str().ok())
            .map(str::to_string),
    );

    let mut queue = node.contacts.lock().unwrap();
    if queue.len() > 1 {
        queue.pop_front().unwrap()
    } else {
        queue
            .front()
            .cloned()
            .unwrap_or((StatusCode::OK, "null".to_string()))
    }
}

async fn files(State(node): State<Arc<FakeNode>>) -> (StatusCode, String) {
    node.files.lock().unwrap().clone()
}

pub async fn spawn_node() -> (Arc<FakeNode>, String) {
    let node = Arc::new(FakeNode::default());
    node.set_files(StatusCode::OK, "[]");

    let app = Router::new()
        .route("/alice/contacts/", get(contacts))
        .route("/alice/myself/files/", get(files))
        .with_state(Arc::clone(&node));

    let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
    let base_url = format!("http://{}", listener.local_addr().unwrap());

    tokio::spawn(async move {
        axum::serve(listener, app).await.unwrap();
    });

    (node, base_url)
}

pub fn client(base_url: &str) -> Arc<TeapotClient> {
    let config = ServerConfig {
        base_url: base_url.to_string(),
        cookie: Some(SESSION_COOKIE.to_string()),
        connect_timeout: Duration::from_secs(2),
        ..Default::default()
    };
    Arc::new(TeapotClient::new(&config).unwrap())
}
