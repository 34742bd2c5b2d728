use async_trait::async_trait;
use std::time::Duration;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Method {
    Get,
    Post,
    Put,
    Delete,
}

impl Method {
    pub fn as_str(&self) -> &'static str {
        match self {
            Method::Get => "GET",
            Method::Post => "POST",
            Method::Put => "PUT",
            Method::Delete => "DELETE",
        }
    }
}

/// A fully resolved outbound request.
#[derive(Debug, Clone, PartialEq)]
pub struct Request {
    pub method: Method,
    pub url: String,
    /// JSON body, serialized by the caller.
    pub body: Option<Vec<u8>>,
    pub bearer: Option<String>,
}

/// Raw response: status plus undecoded body bytes.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Response {
    pub status: u16,
    pub body: Vec<u8>,
}

impl Response {
    pub fn is_success(&self) -> bool {
        (200..300).contains(&self.status)
    }
}

/// Moves a request over the wire. `Err` means no response was received.
#[async_trait]
pub trait Transport: Send + Sync {
    async fn send(&self, request: Request) -> Result<Response, String>;
}

/// `reqwest`-backed transport with one shared connection pool.
pub struct HttpTransport {
    client: reqwest::Client,
}

impl HttpTransport {
    pub fn new(timeout: Duration) -> Result<Self, String> {
        let client = reqwest::Client::builder()
            .timeout(timeout)
            .user_agent(concat!("mobilis/", env!("CARGO_PKG_VERSION")))
            .build()
            .map_err(|e| format!("failed to build HTTP client: {e}"))?;
        Ok(Self { client })
    }
}

#[async_trait]
impl Transport for HttpTransport {
    async fn send(&self, request: Request) -> Result<Response, String> {
        let method = match request.method {
            Method::Get => reqwest::Method::GET,
            Method::Post => reqwest::Method::POST,
            Method::Put => reqwest::Method::PUT,
            Method::Delete => reqwest::Method::DELETE,
        };
        let mut req = self
            .client
            .request(method, &request.url)
            .header(reqwest::header::ACCEPT, "application/json");
        if let Some(token) = &request.bearer {
            req = req.bearer_auth(token);
        }
        if let Some(body) = request.body {
            req = req
                .header(reqwest::header::CONTENT_TYPE, "application/json")
                .body(body);
        }

        let resp = req.send().await.map_err(|e| classify(&e))?;
        let status = resp.status().as_u16();
        let body = resp.bytes().await.map_err(|e| classify(&e))?;
        Ok(Response { status, body: body.to_vec() })
    }
}

fn classify(err: &reqwest::Error) -> String {
    if err.is_timeout() {
        format!("request timed out: {err}")
    } else if err.is_connect() {
        format!("connection failed: {err}")
    } else {
        err.to_string()
    }
}

/// Scripted transport for tests: replays queued responses and records every request.
#[cfg(test)]
pub mod fake {
    use super::*;
    use std::collections::VecDeque;
    use std::sync::Mutex;

    #[derive(Default)]
    pub struct FakeTransport {
        replies: Mutex<VecDeque<Result<Response, String>>>,
        seen: Mutex<Vec<Request>>,
    }

    impl FakeTransport {
        pub fn new() -> Self {
            Self::default()
        }

        pub fn reply_json(self, status: u16, body: serde_json::Value) -> Self {
            self.reply_raw(status, body.to_string().into_bytes())
        }

        pub fn reply_raw(self, status: u16, body: impl Into<Vec<u8>>) -> Self {
            self.replies
                .lock()
                .unwrap()
                .push_back(Ok(Response { status, body: body.into() }));
            self
        }

        pub fn fail(self, reason: &str) -> Self {
            self.replies.lock().unwrap().push_back(Err(reason.to_string()));
            self
        }

        pub fn requests(&self) -> Vec<Request> {
            self.seen.lock().unwrap().clone()
        }

        pub fn call_count(&self) -> usize {
            self.seen.lock().unwrap().len()
        }
    }

    #[async_trait]
    impl Transport for FakeTransport {
        async fn send(&self, request: Request) -> Result<Response, String> {
            self.seen.lock().unwrap().push(request);
            self.replies
                .lock()
                .unwrap()
                .pop_front()
                .unwrap_or_else(|| Err("no scripted reply".to_string()))
        }
    }
}
