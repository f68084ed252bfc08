//! In-memory [`Transport`] and [`Pacer`] for tests.
//!
//! Responses are queued per URL. Each request pops the front of its queue
//! until one response remains, which then answers every later request.
//! Unknown URLs answer `404`.

use super::client::{Pacer, RawResponse, Transport};
use crate::error::{DataError, Result};
use reqwest::Url;
use std::collections::{HashMap, VecDeque};
use std::sync::Mutex;
use std::time::Duration;

#[derive(Debug, Clone)]
enum Canned {
    Response(RawResponse),
    Failure(String),
}

/// Transport serving canned responses keyed by URL.
#[derive(Debug, Default)]
pub struct StaticTransport {
    routes: Mutex<HashMap<String, VecDeque<Canned>>>,
    calls: Mutex<Vec<String>>,
}

impl StaticTransport {
    /// Create a transport with no routes.
    pub fn new() -> Self {
        Self::default()
    }

    fn push(self, url: &str, canned: Canned) -> Self {
        self.routes
            .lock()
            .expect("routes lock poisoned")
            .entry(url.to_string())
            .or_default()
            .push_back(canned);
        self
    }

    /// Queue a `200` response with the given body.
    pub fn with_text(self, url: &str, body: impl Into<String>) -> Self {
        self.push(
            url,
            Canned::Response(RawResponse {
                status: 200,
                body: body.into(),
            }),
        )
    }

    /// Queue a `200` response carrying `value` as JSON.
    pub fn with_json(self, url: &str, value: &serde_json::Value) -> Self {
        self.with_text(url, value.to_string())
    }

    /// Queue an empty response with the given status.
    pub fn with_status(self, url: &str, status: u16) -> Self {
        self.push(
            url,
            Canned::Response(RawResponse {
                status,
                body: String::new(),
            }),
        )
    }

    /// Queue a transport-level failure, surfaced as
    /// [`DataError::UpstreamUnavailable`] for that single request.
    pub fn with_failure(self, url: &str, message: impl Into<String>) -> Self {
        self.push(url, Canned::Failure(message.into()))
    }

    /// Every URL requested so far, in order.
    pub fn calls(&self) -> Vec<String> {
        self.calls.lock().expect("calls lock poisoned").clone()
    }

    /// Number of requests made to exactly `url`.
    pub fn call_count(&self, url: &str) -> usize {
        self.calls
            .lock()
            .expect("calls lock poisoned")
            .iter()
            .filter(|c| c.as_str() == url)
            .count()
    }

    fn next(&self, url: &str) -> Option<Canned> {
        let mut routes = self.routes.lock().expect("routes lock poisoned");
        let queue = routes.get_mut(url)?;
        if queue.len() > 1 {
            queue.pop_front()
        } else {
            queue.front().cloned()
        }
    }
}

impl Transport for StaticTransport {
    async fn get(&self, url: &Url) -> Result<RawResponse> {
        let key = url.as_str().to_string();
        self.calls
            .lock()
            .expect("calls lock poisoned")
            .push(key.clone());

        match self.next(&key) {
            Some(Canned::Response(response)) => Ok(response),
            Some(Canned::Failure(reason)) => Err(DataError::UpstreamUnavailable {
                attempts: 1,
                reason,
            }),
            None => Ok(RawResponse {
                status: 404,
                body: String::new(),
            }),
        }
    }
}

/// Pacer that records requested delays without sleeping.
#[derive(Debug, Default)]
pub struct RecordingPacer {
    delays: Mutex<Vec<Duration>>,
}

impl RecordingPacer {
    /// Delays requested so far, in order.
    pub fn delays(&self) -> Vec<Duration> {
        self.delays.lock().expect("delays lock poisoned").clone()
    }
}

impl Pacer for RecordingPacer {
    async fn pause(&self, delay: Duration) {
        self.delays
            .lock()
            .expect("delays lock poisoned")
            .push(delay);
    }
}
