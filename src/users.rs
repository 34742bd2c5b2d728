//! User management: the service seam and the displayed directory.

use async_trait::async_trait;
use std::sync::{Arc, Mutex};
use std::time::Duration;
use tracing::{debug, info, warn};

use crate::api::ApiClient;
use crate::error::{ApiError, ApiResult};
use crate::fetch::Dataset;
use crate::i18n::Translator;
use crate::models::{NewUser, User, UserPatch};
use crate::notify::{Notice, Notifier};

#[async_trait]
pub trait UserService: Send + Sync {
    async fn list(&self) -> ApiResult<Vec<User>>;
    async fn get(&self, id: u64) -> ApiResult<User>;
    async fn create(&self, user: NewUser) -> ApiResult<User>;
    async fn update(&self, id: u64, patch: UserPatch) -> ApiResult<User>;
    async fn delete(&self, id: u64) -> ApiResult<()>;
}

/// Users served by the backend under a configurable collection path.
pub struct HttpUserService {
    client: ApiClient,
    path: String,
}

impl HttpUserService {
    pub fn new(client: ApiClient, path: &str) -> Self {
        Self { client, path: path.trim_end_matches('/').to_string() }
    }

    fn item(&self, id: u64) -> String {
        format!("{}/{id}", self.path)
    }
}

#[async_trait]
impl UserService for HttpUserService {
    async fn list(&self) -> ApiResult<Vec<User>> {
        self.client.fetch_data(&self.path).await
    }

    async fn get(&self, id: u64) -> ApiResult<User> {
        self.client.fetch_data(&self.item(id)).await
    }

    async fn create(&self, user: NewUser) -> ApiResult<User> {
        self.client.post_data(&self.path, &user).await
    }

    async fn update(&self, id: u64, patch: UserPatch) -> ApiResult<User> {
        self.client.put_data(&self.item(id), &patch).await
    }

    async fn delete(&self, id: u64) -> ApiResult<()> {
        self.client.delete_data(&self.item(id)).await
    }
}

/// In-memory accounts with a simulated round trip.
pub struct MockUserService {
    users: Mutex<Vec<User>>,
    latency: Duration,
}

impl MockUserService {
    pub fn new(seed: Vec<User>, latency: Duration) -> Self {
        Self { users: Mutex::new(seed), latency }
    }

    async fn round_trip(&self) {
        if !self.latency.is_zero() {
            tokio::time::sleep(self.latency).await;
        }
    }

    fn with_users<R>(&self, f: impl FnOnce(&mut Vec<User>) -> ApiResult<R>) -> ApiResult<R> {
        let mut users = self
            .users
            .lock()
            .map_err(|_| ApiError::Storage("user list lock poisoned".into()))?;
        f(&mut users)
    }
}

#[async_trait]
impl UserService for MockUserService {
    async fn list(&self) -> ApiResult<Vec<User>> {
        self.round_trip().await;
        self.with_users(|users| Ok(users.clone()))
    }

    async fn get(&self, id: u64) -> ApiResult<User> {
        self.round_trip().await;
        self.with_users(|users| {
            users
                .iter()
                .find(|u| u.id == id)
                .cloned()
                .ok_or(ApiError::NotFoundLocal { id })
        })
    }

    async fn create(&self, user: NewUser) -> ApiResult<User> {
        self.round_trip().await;
        self.with_users(|users| {
            let id = users.iter().map(|u| u.id).max().unwrap_or(0) + 1;
            let created = user.with_id(id);
            users.push(created.clone());
            debug!(id, "mock user created");
            Ok(created)
        })
    }

    async fn update(&self, id: u64, patch: UserPatch) -> ApiResult<User> {
        self.round_trip().await;
        self.with_users(|users| {
            let user = users
                .iter_mut()
                .find(|u| u.id == id)
                .ok_or(ApiError::NotFoundLocal { id })?;
            patch.apply(user);
            Ok(user.clone())
        })
    }

    async fn delete(&self, id: u64) -> ApiResult<()> {
        self.round_trip().await;
        self.with_users(|users| {
            let index = users
                .iter()
                .position(|u| u.id == id)
                .ok_or(ApiError::NotFoundLocal { id })?;
            users.remove(index);
            Ok(())
        })
    }
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct UserCounts {
    pub total: usize,
    pub superusers: usize,
    pub active: usize,
    pub inactive: usize,
}

/// The list shown on the users page. Changes land only after the service confirms them;
/// a confirmation arriving while the list is still loading is covered by that load.
pub struct UserDirectory {
    users: Dataset<Vec<User>>,
    notifier: Arc<dyn Notifier>,
}

impl UserDirectory {
    pub fn new(notifier: Arc<dyn Notifier>) -> Self {
        Self { users: Dataset::Loading, notifier }
    }

    pub fn dataset(&self) -> &Dataset<Vec<User>> {
        &self.users
    }

    pub fn users(&self) -> &[User] {
        self.users.data().map(Vec::as_slice).unwrap_or(&[])
    }

    pub fn set_loading(&mut self) {
        self.users = Dataset::Loading;
    }

    pub fn load(&mut self, result: ApiResult<Vec<User>>, fallback: impl FnOnce() -> Vec<User>) {
        self.users = Dataset::resolve(result, fallback);
    }

    pub fn counts(&self) -> UserCounts {
        let users = self.users();
        let active = users.iter().filter(|u| u.is_active).count();
        UserCounts {
            total: users.len(),
            superusers: users.iter().filter(|u| u.is_superuser).count(),
            active,
            inactive: users.len() - active,
        }
    }

    pub fn created(&mut self, result: ApiResult<User>, t: &Translator) {
        match result {
            Ok(user) => {
                info!(id = user.id, "user created");
                if let Some(list) = self.users.data_mut() {
                    list.push(user);
                }
                self.succeed(t, "user_created");
            }
            Err(err) => self.fail(t, "user_create_failed", &err),
        }
    }

    pub fn updated(&mut self, result: ApiResult<User>, t: &Translator) {
        match result {
            Ok(user) => {
                info!(id = user.id, "user updated");
                // A row deleted while the update was in flight stays deleted.
                match self.users.data_mut().and_then(|list| list.iter_mut().find(|u| u.id == user.id)) {
                    Some(slot) => *slot = user,
                    None => debug!(id = user.id, "updated user no longer listed, ignored"),
                }
                self.succeed(t, "user_updated");
            }
            Err(err) => self.fail(t, "user_update_failed", &err),
        }
    }

    pub fn deleted(&mut self, id: u64, result: ApiResult<()>, t: &Translator) {
        match result {
            Ok(()) => {
                info!(id, "user deleted");
                if let Some(list) = self.users.data_mut() {
                    list.retain(|u| u.id != id);
                }
                self.succeed(t, "user_deleted");
            }
            Err(err) => self.fail(t, "user_delete_failed", &err),
        }
    }

    fn succeed(&self, t: &Translator, key: &str) {
        self.notifier.notify(Notice::success(t.t("success"), t.t(key)));
    }

    fn fail(&self, t: &Translator, key: &str, err: &ApiError) {
        warn!(error = %err, "{key}");
        self.notifier
            .notify(Notice::error(t.t("error"), format!("{}: {err}", t.t(key))));
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::api::tests::client_with;
    use crate::api::transport::fake::FakeTransport;
    use crate::i18n::Language;
    use crate::notify::{ToastCenter, ToastKind};
    use crate::samples;
    use crate::store::MemoryStore;
    use serde_json::json;

    fn mock() -> MockUserService {
        MockUserService::new(samples::users(), Duration::ZERO)
    }

    fn new_user(email: &str) -> NewUser {
        NewUser {
            email: email.into(),
            first_name: "Nadia".into(),
            last_name: "Benali".into(),
            is_active: true,
            is_superuser: false,
        }
    }

    fn directory() -> (UserDirectory, ToastCenter) {
        let toasts = ToastCenter::new();
        let mut dir = UserDirectory::new(Arc::new(toasts.clone()));
        dir.load(Ok(samples::users()), Vec::new);
        (dir, toasts)
    }

    #[tokio::test]
    async fn test_mock_create_assigns_next_id() {
        let service = mock();
        let created = service.create(new_user("nadia@mobilis.com")).await.unwrap();
        assert_eq!(created.id, 5);
        assert_eq!(service.list().await.unwrap().len(), 5);
        assert_eq!(service.get(5).await.unwrap().email, "nadia@mobilis.com");
    }

    #[tokio::test]
    async fn test_mock_update_merges_patch() {
        let service = mock();
        let patch = UserPatch { is_active: Some(true), ..Default::default() };
        let user = service.update(4, patch).await.unwrap();
        assert!(user.is_active);
        assert_eq!(user.email, "inactive@example.com");
    }

    #[tokio::test]
    async fn test_mock_missing_id_is_not_found() {
        let service = mock();
        let before = service.list().await.unwrap();

        let err = service.delete(99).await.unwrap_err();
        assert_eq!(err, ApiError::NotFoundLocal { id: 99 });
        assert_eq!(err.to_string(), "User not found: 99");
        assert_eq!(service.list().await.unwrap(), before);

        let err = service.update(99, UserPatch::default()).await.unwrap_err();
        assert_eq!(err, ApiError::NotFoundLocal { id: 99 });
    }

    #[tokio::test]
    async fn test_create_appends_one_record_and_notifies() {
        let (mut dir, toasts) = directory();
        let t = Translator::new(Language::En);
        let result = mock().create(new_user("nadia@mobilis.com")).await;

        dir.created(result, &t);
        assert_eq!(dir.users().len(), 5);
        assert_eq!(toasts.count_of(ToastKind::Success), 1);
        assert_eq!(toasts.count_of(ToastKind::Error), 0);
    }

    #[tokio::test]
    async fn test_failed_create_leaves_list_unchanged() {
        let (client, _, toasts, _) = client_with(
            FakeTransport::new().reply_json(400, json!({"message": "email already used"})),
            MemoryStore::new(),
        );
        let service = HttpUserService::new(client, "/users");
        let mut dir = UserDirectory::new(Arc::new(toasts.clone()));
        dir.load(Ok(samples::users()), Vec::new);
        let t = Translator::new(Language::En);

        let result = service.create(new_user("admin@example.com")).await;
        dir.created(result, &t);

        assert_eq!(dir.users(), samples::users().as_slice());
        assert_eq!(toasts.count_of(ToastKind::Success), 0);
        // one from the client, one from the page
        assert_eq!(toasts.count_of(ToastKind::Error), 2);
        assert!(toasts.history()[0].notice.body.contains("email already used"));
    }

    #[tokio::test]
    async fn test_delete_missing_id_keeps_directory() {
        let (mut dir, toasts) = directory();
        let t = Translator::new(Language::Fr);
        let result = mock().delete(42).await;
        dir.deleted(42, result, &t);
        assert_eq!(dir.users().len(), 4);
        assert_eq!(toasts.count_of(ToastKind::Error), 1);
    }

    #[tokio::test]
    async fn test_update_replaces_record_in_place() {
        let (mut dir, _) = directory();
        let t = Translator::new(Language::En);
        let patch = UserPatch { is_superuser: Some(true), ..Default::default() };
        dir.updated(mock().update(3, patch).await, &t);
        assert_eq!(dir.users().len(), 4);
        assert!(dir.users()[2].is_superuser);
        assert_eq!(dir.counts().superusers, 2);
    }

    #[tokio::test]
    async fn test_late_update_does_not_restore_deleted_user() {
        let (mut dir, toasts) = directory();
        let t = Translator::new(Language::En);
        let service = mock();
        let patch = UserPatch { is_active: Some(false), ..Default::default() };
        let update = service.update(2, patch).await;

        dir.deleted(2, service.delete(2).await, &t);
        dir.updated(update, &t);

        let ids: Vec<u64> = dir.users().iter().map(|u| u.id).collect();
        assert_eq!(ids, vec![1, 3, 4]);
        assert_eq!(dir.counts().total, 3);
        assert_eq!(toasts.count_of(ToastKind::Error), 0);
    }

    #[test]
    fn test_counts() {
        let (dir, _) = directory();
        assert_eq!(
            dir.counts(),
            UserCounts { total: 4, superusers: 1, active: 3, inactive: 1 }
        );
    }

    #[tokio::test]
    async fn test_http_service_paths() {
        let (client, transport, _, _) = client_with(
            FakeTransport::new()
                .reply_json(200, json!([]))
                .reply_raw(204, ""),
            MemoryStore::new(),
        );
        let service = HttpUserService::new(client, "/admin/users/");
        assert!(service.list().await.unwrap().is_empty());
        service.delete(7).await.unwrap();

        let reqs = transport.requests();
        assert_eq!(reqs[0].url, "https://api.test/admin/users");
        assert_eq!(reqs[1].url, "https://api.test/admin/users/7");
    }
}
