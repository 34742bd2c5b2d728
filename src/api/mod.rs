//! Generic REST access with uniform failure handling.
//!
//! Every call is a single attempt. A failure is normalized into [`ApiError`],
//! logged, surfaced once through the [`Notifier`], and then returned to the caller.

mod endpoints;
pub mod transport;

use serde::de::DeserializeOwned;
use serde::Serialize;
use std::sync::Arc;

use crate::error::{ApiError, ApiResult};
use crate::notify::{Notice, Notifier};
use crate::store::{LocalStore, ACCESS_TOKEN_KEY};
use transport::{Method, Request, Response, Transport};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Auth {
    /// Attach the stored access token when one exists.
    Bearer,
    /// Never attach a token (token endpoints reject stale ones).
    Anonymous,
}

/// Cheap to clone; clones share transport, notifier and credential store.
#[derive(Clone)]
pub struct ApiClient {
    base_url: Arc<str>,
    transport: Arc<dyn Transport>,
    notifier: Arc<dyn Notifier>,
    store: Arc<dyn LocalStore>,
}

impl ApiClient {
    pub fn new(
        base_url: &str,
        transport: Arc<dyn Transport>,
        notifier: Arc<dyn Notifier>,
        store: Arc<dyn LocalStore>,
    ) -> Self {
        Self {
            base_url: Arc::from(base_url.trim_end_matches('/')),
            transport,
            notifier,
            store,
        }
    }

    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    pub async fn fetch_data<R: DeserializeOwned>(&self, endpoint: &str) -> ApiResult<R> {
        self.call(Method::Get, endpoint, None, Auth::Bearer).await
    }

    pub async fn post_data<B, R>(&self, endpoint: &str, body: &B) -> ApiResult<R>
    where
        B: Serialize + Sync + ?Sized,
        R: DeserializeOwned,
    {
        let body = self.encode(endpoint, body)?;
        self.call(Method::Post, endpoint, Some(body), Auth::Bearer).await
    }

    pub async fn put_data<B, R>(&self, endpoint: &str, body: &B) -> ApiResult<R>
    where
        B: Serialize + Sync + ?Sized,
        R: DeserializeOwned,
    {
        let body = self.encode(endpoint, body)?;
        self.call(Method::Put, endpoint, Some(body), Auth::Bearer).await
    }

    pub async fn delete_data<R: DeserializeOwned>(&self, endpoint: &str) -> ApiResult<R> {
        self.call(Method::Delete, endpoint, None, Auth::Bearer).await
    }

    /// POST without the stored access token.
    async fn post_anonymous<B, R>(&self, endpoint: &str, body: &B) -> ApiResult<R>
    where
        B: Serialize + Sync + ?Sized,
        R: DeserializeOwned,
    {
        let body = self.encode(endpoint, body)?;
        self.call(Method::Post, endpoint, Some(body), Auth::Anonymous).await
    }

    fn encode<B: Serialize + ?Sized>(&self, endpoint: &str, body: &B) -> ApiResult<Vec<u8>> {
        serde_json::to_vec(body).map_err(|e| {
            let err = ApiError::Parse(format!("could not encode request body: {e}"));
            self.report(endpoint, &err);
            err
        })
    }

    async fn call<R: DeserializeOwned>(
        &self,
        method: Method,
        endpoint: &str,
        body: Option<Vec<u8>>,
        auth: Auth,
    ) -> ApiResult<R> {
        let result = self.execute(method, endpoint, body, auth).await;
        if let Err(err) = &result {
            self.report(endpoint, err);
        }
        result
    }

    async fn execute<R: DeserializeOwned>(
        &self,
        method: Method,
        endpoint: &str,
        body: Option<Vec<u8>>,
        auth: Auth,
    ) -> ApiResult<R> {
        let url = format!("{}{}", self.base_url, endpoint);
        let bearer = match auth {
            Auth::Bearer => self.store.get(ACCESS_TOKEN_KEY),
            Auth::Anonymous => None,
        };
        tracing::debug!(method = method.as_str(), %url, authenticated = bearer.is_some(), "API request");

        let response = self
            .transport
            .send(Request { method, url, body, bearer })
            .await
            .map_err(ApiError::Network)?;

        if !response.is_success() {
            return Err(http_error(&response));
        }
        decode(&response.body)
    }

    fn report(&self, endpoint: &str, err: &ApiError) {
        tracing::warn!(endpoint, error = %err, "API Error");
        self.notifier.notify(Notice::error(
            "API Error",
            format!("Failed to fetch data from {endpoint}: {err}"),
        ));
    }
}

/// Error for a non-success response. The body is optional JSON carrying
/// `message` (generic endpoints) or `detail` (token endpoints).
fn http_error(response: &Response) -> ApiError {
    let parsed: serde_json::Value =
        serde_json::from_slice(&response.body).unwrap_or(serde_json::Value::Null);
    let server_message = ["message", "detail"]
        .iter()
        .find_map(|field| parsed.get(field).and_then(|v| v.as_str()))
        .filter(|m| !m.is_empty());
    let message = match server_message {
        Some(m) => m.to_string(),
        None => format!("API request failed with status {}", response.status),
    };
    ApiError::Http { status: response.status, message }
}

/// Decode a success body. An empty body reads as JSON `null`.
fn decode<R: DeserializeOwned>(body: &[u8]) -> ApiResult<R> {
    let body: &[u8] = if body.iter().all(u8::is_ascii_whitespace) {
        b"null"
    } else {
        body
    };
    serde_json::from_slice(body).map_err(|e| ApiError::Parse(e.to_string()))
}

#[cfg(test)]
pub(crate) mod tests {
    use super::endpoints::REFRESH_ENDPOINT;
    use super::transport::fake::FakeTransport;
    use super::*;
    use crate::notify::{ToastCenter, ToastKind};
    use crate::store::MemoryStore;
    use serde_json::json;

    pub(crate) fn client_with(
        transport: FakeTransport,
        store: MemoryStore,
    ) -> (ApiClient, Arc<FakeTransport>, ToastCenter, Arc<MemoryStore>) {
        let transport = Arc::new(transport);
        let toasts = ToastCenter::new();
        let store = Arc::new(store);
        let client = ApiClient::new(
            "https://api.test/",
            transport.clone(),
            Arc::new(toasts.clone()),
            store.clone(),
        );
        (client, transport, toasts, store)
    }

    #[tokio::test]
    async fn test_fetch_decodes_success_body() {
        let (client, transport, toasts, _) = client_with(
            FakeTransport::new().reply_json(200, json!([{"name": "Cell A", "charge": 85.0}])),
            MemoryStore::new(),
        );
        let cells: Vec<crate::models::CellCharge> = client.fetch_data("/energy/rbcells").await.unwrap();
        assert_eq!(cells.len(), 1);
        assert_eq!(toasts.len(), 0);

        let req = &transport.requests()[0];
        assert_eq!(req.method, Method::Get);
        assert_eq!(req.url, "https://api.test/energy/rbcells");
        assert!(req.body.is_none());
    }

    #[tokio::test]
    async fn test_server_error_uses_server_message_and_notifies_once() {
        let (client, _, toasts, _) = client_with(
            FakeTransport::new().reply_json(500, json!({"message": "database offline"})),
            MemoryStore::new(),
        );
        let err = client.fetch_data::<serde_json::Value>("/security/alerts").await.unwrap_err();
        assert_eq!(err, ApiError::Http { status: 500, message: "database offline".into() });
        assert_eq!(toasts.count_of(ToastKind::Error), 1);
        let toast = &toasts.history()[0];
        assert_eq!(toast.notice.title, "API Error");
        assert_eq!(
            toast.notice.body,
            "Failed to fetch data from /security/alerts: database offline"
        );
    }

    #[tokio::test]
    async fn test_error_body_that_is_not_json_gets_generic_message() {
        let (client, _, toasts, _) = client_with(
            FakeTransport::new().reply_raw(502, "<html>Bad Gateway</html>"),
            MemoryStore::new(),
        );
        let err = client.fetch_data::<serde_json::Value>("/energy/solar").await.unwrap_err();
        assert_eq!(
            err,
            ApiError::Http { status: 502, message: "API request failed with status 502".into() }
        );
        assert_eq!(toasts.len(), 1);
    }

    #[tokio::test]
    async fn test_detail_field_is_used_for_token_errors() {
        let (client, _, _, _) = client_with(
            FakeTransport::new().reply_json(401, json!({"detail": "Token is invalid or expired"})),
            MemoryStore::new(),
        );
        let err = client.refresh_access("stale").await.unwrap_err();
        assert_eq!(err.status(), Some(401));
        assert_eq!(err.to_string(), "Token is invalid or expired");
    }

    #[tokio::test]
    async fn test_network_failure_is_reported() {
        let (client, _, toasts, _) = client_with(
            FakeTransport::new().fail("connection refused"),
            MemoryStore::new(),
        );
        let err = client.fetch_data::<serde_json::Value>("/users").await.unwrap_err();
        assert_eq!(err, ApiError::Network("connection refused".into()));
        assert_eq!(toasts.len(), 1);
    }

    #[tokio::test]
    async fn test_malformed_success_body_is_parse_error() {
        let (client, _, toasts, _) = client_with(
            FakeTransport::new().reply_raw(200, "{oops"),
            MemoryStore::new(),
        );
        let err = client.fetch_data::<Vec<u32>>("/material/inventory").await.unwrap_err();
        assert!(matches!(err, ApiError::Parse(_)));
        assert_eq!(toasts.len(), 1);
    }

    #[tokio::test]
    async fn test_empty_success_body_decodes_as_unit() {
        let (client, transport, toasts, _) = client_with(
            FakeTransport::new().reply_raw(204, ""),
            MemoryStore::new(),
        );
        client.delete_data::<()>("/users/3").await.unwrap();
        assert_eq!(transport.requests()[0].method, Method::Delete);
        assert_eq!(toasts.len(), 0);
    }

    #[tokio::test]
    async fn test_post_and_put_send_json_body_with_bearer() {
        let store = MemoryStore::with_entries(&[(ACCESS_TOKEN_KEY, "acc-1")]);
        let (client, transport, _, _) = client_with(
            FakeTransport::new()
                .reply_json(201, json!({"ok": true}))
                .reply_json(200, json!({"ok": true})),
            store,
        );
        let _: serde_json::Value = client.post_data("/users", &json!({"email": "x@y.z"})).await.unwrap();
        let _: serde_json::Value = client.put_data("/users/1", &json!({"is_active": false})).await.unwrap();

        let reqs = transport.requests();
        assert_eq!(reqs[0].method, Method::Post);
        assert_eq!(reqs[1].method, Method::Put);
        assert_eq!(reqs[0].bearer.as_deref(), Some("acc-1"));
        let body: serde_json::Value = serde_json::from_slice(reqs[0].body.as_ref().unwrap()).unwrap();
        assert_eq!(body["email"], "x@y.z");
    }

    #[tokio::test]
    async fn test_token_endpoints_never_send_bearer() {
        let store = MemoryStore::with_entries(&[(ACCESS_TOKEN_KEY, "stale-access")]);
        let (client, transport, _, _) = client_with(
            FakeTransport::new().reply_json(200, json!({"access": "fresh"})),
            store,
        );
        let token = client.refresh_access("refresh-1").await.unwrap();
        assert_eq!(token.access, "fresh");
        let req = &transport.requests()[0];
        assert!(req.bearer.is_none());
        assert_eq!(req.url, format!("https://api.test{REFRESH_ENDPOINT}"));
    }
}
