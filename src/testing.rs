//! Test doubles shared by the unit tests

use async_trait::async_trait;
use std::collections::{HashMap, VecDeque};
use std::sync::Mutex;
use std::time::Duration;

use crate::client::{ApiRequest, ApiResponse, ClientError, ClientResult, Method, Transport};
use crate::view::Surface;

#[derive(Clone)]
enum Reply {
    Respond {
        status: u16,
        body: Vec<u8>,
        delay: Option<Duration>,
    },
    Fail,
}

/// Scripted transport that records every request
///
/// Replies queue per (method, path); the last queued reply repeats.
/// Unscripted paths answer 404.
#[derive(Default)]
pub struct MockTransport {
    replies: Mutex<HashMap<(Method, String), VecDeque<Reply>>>,
    requests: Mutex<Vec<ApiRequest>>,
}

impl MockTransport {
    pub fn new() -> Self {
        Self::default()
    }

    fn push(&self, method: Method, path: &str, reply: Reply) {
        self.replies
            .lock()
            .unwrap()
            .entry((method, path.to_string()))
            .or_default()
            .push_back(reply);
    }

    pub fn reply_json(&self, method: Method, path: &str, status: u16, body: serde_json::Value) {
        self.push(
            method,
            path,
            Reply::Respond {
                status,
                body: body.to_string().into_bytes(),
                delay: None,
            },
        );
    }

    pub fn reply_json_delayed(
        &self,
        method: Method,
        path: &str,
        status: u16,
        body: serde_json::Value,
        delay: Duration,
    ) {
        self.push(
            method,
            path,
            Reply::Respond {
                status,
                body: body.to_string().into_bytes(),
                delay: Some(delay),
            },
        );
    }

    /// Answer with a connection failure
    pub fn reply_fail(&self, method: Method, path: &str) {
        self.push(method, path, Reply::Fail);
    }

    pub fn requests(&self) -> Vec<ApiRequest> {
        self.requests.lock().unwrap().clone()
    }

    pub fn requests_to(&self, method: Method, path: &str) -> Vec<ApiRequest> {
        self.requests()
            .into_iter()
            .filter(|r| r.method == method && r.path == path)
            .collect()
    }

    pub fn count(&self, method: Method, path: &str) -> usize {
        self.requests_to(method, path).len()
    }

    /// Requests other than the CSRF bootstrap
    pub fn api_requests(&self) -> Vec<ApiRequest> {
        self.requests()
            .into_iter()
            .filter(|r| r.path != "/api/csrf-token")
            .collect()
    }
}

#[async_trait]
impl Transport for MockTransport {
    async fn send(&self, request: ApiRequest) -> ClientResult<ApiResponse> {
        let key = (request.method, request.path.clone());
        self.requests.lock().unwrap().push(request);

        let reply = {
            let mut replies = self.replies.lock().unwrap();
            match replies.get_mut(&key) {
                Some(queue) if queue.len() > 1 => queue.pop_front(),
                Some(queue) => queue.front().cloned(),
                None => None,
            }
        };

        match reply {
            Some(Reply::Respond {
                status,
                body,
                delay,
            }) => {
                if let Some(delay) = delay {
                    tokio::time::sleep(delay).await;
                }
                Ok(ApiResponse::new(status, body))
            }
            Some(Reply::Fail) => Err(ClientError::Unavailable),
            None => Ok(ApiResponse::new(404, r#"{"error":"Not Found"}"#)),
        }
    }
}

/// Surface that remembers every alert and navigation
#[derive(Default)]
pub struct RecordingSurface {
    alerts: Mutex<Vec<String>>,
    navigations: Mutex<Vec<String>>,
}

impl RecordingSurface {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn alerts(&self) -> Vec<String> {
        self.alerts.lock().unwrap().clone()
    }

    pub fn navigations(&self) -> Vec<String> {
        self.navigations.lock().unwrap().clone()
    }
}

impl Surface for RecordingSurface {
    fn alert(&self, message: &str) {
        self.alerts.lock().unwrap().push(message.to_string());
    }

    fn navigate(&self, route: &str) {
        self.navigations.lock().unwrap().push(route.to_string());
    }
}
