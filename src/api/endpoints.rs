//! Typed wrappers over the backend's endpoint catalogue.

use super::ApiClient;
use crate::error::ApiResult;
use crate::models::*;

pub const LOGIN_ENDPOINT: &str = "/user/token/";
pub const REFRESH_ENDPOINT: &str = "/user/token/refresh/";

impl ApiClient {
    // ─── TOKENS ─────────────────────────────────────────────────

    pub async fn obtain_tokens(&self, credentials: &Credentials) -> ApiResult<TokenPair> {
        self.post_anonymous(LOGIN_ENDPOINT, credentials).await
    }

    pub async fn refresh_access(&self, refresh: &str) -> ApiResult<AccessToken> {
        let body = RefreshRequest { refresh: refresh.to_string() };
        self.post_anonymous(REFRESH_ENDPOINT, &body).await
    }

    // ─── DASHBOARD ──────────────────────────────────────────────

    pub async fn dashboard_energy(&self) -> ApiResult<Vec<MonthlyEnergy>> {
        self.fetch_data("/dashboard/energy").await
    }

    pub async fn dashboard_temperature(&self) -> ApiResult<Vec<TemperatureReading>> {
        self.fetch_data("/dashboard/temperature").await
    }

    pub async fn dashboard_security(&self) -> ApiResult<Vec<DailyAlerts>> {
        self.fetch_data("/dashboard/security").await
    }

    // ─── ENERGY ─────────────────────────────────────────────────

    pub async fn solar_output(&self) -> ApiResult<Vec<SolarReading>> {
        self.fetch_data("/energy/solar").await
    }

    pub async fn panel_temperature(&self) -> ApiResult<Vec<TemperatureReading>> {
        self.fetch_data("/energy/temperature").await
    }

    pub async fn rb_cells(&self) -> ApiResult<Vec<CellCharge>> {
        self.fetch_data("/energy/rbcells").await
    }

    pub async fn grid_frequency(&self) -> ApiResult<Vec<FrequencyReading>> {
        self.fetch_data("/energy/frequency").await
    }

    // ─── SECURITY ───────────────────────────────────────────────

    pub async fn rfid_users(&self) -> ApiResult<Vec<RfidUser>> {
        self.fetch_data("/security/rfid-users").await
    }

    pub async fn add_rfid_user(&self, user: &RfidUser) -> ApiResult<RfidUser> {
        self.post_data("/security/rfid-users", user).await
    }

    pub async fn update_rfid_user(&self, user: &RfidUser) -> ApiResult<RfidUser> {
        self.put_data(&format!("/security/rfid-users/{}", user.id), user).await
    }

    pub async fn delete_rfid_user(&self, id: &str) -> ApiResult<()> {
        self.delete_data(&format!("/security/rfid-users/{id}")).await
    }

    pub async fn security_alerts(&self) -> ApiResult<Vec<SecurityAlert>> {
        self.fetch_data("/security/alerts").await
    }

    pub async fn access_stats(&self) -> ApiResult<Vec<AccessStats>> {
        self.fetch_data("/security/stats").await
    }

    // ─── MATERIAL ───────────────────────────────────────────────

    pub async fn maintenance(&self) -> ApiResult<Vec<MaintenanceItem>> {
        self.fetch_data("/material/maintenance").await
    }

    pub async fn update_maintenance(&self, item: &MaintenanceItem) -> ApiResult<MaintenanceItem> {
        self.put_data(&format!("/material/maintenance/{}", item.id), item).await
    }

    pub async fn inventory(&self) -> ApiResult<Vec<InventoryItem>> {
        self.fetch_data("/material/inventory").await
    }

    pub async fn update_inventory(&self, item: &InventoryItem) -> ApiResult<InventoryItem> {
        self.put_data(&format!("/material/inventory/{}", item.id), item).await
    }
}

#[cfg(test)]
mod tests {
    use super::super::tests::client_with;
    use super::super::transport::fake::FakeTransport;
    use super::super::transport::Method;
    use super::*;
    use crate::store::MemoryStore;
    use serde_json::json;

    #[tokio::test]
    async fn test_login_posts_credentials() {
        let (client, transport, _, _) = client_with(
            FakeTransport::new().reply_json(200, json!({"access": "a1", "refresh": "r1"})),
            MemoryStore::new(),
        );
        let creds = Credentials { email: "op@mobilis.com".into(), password: "pw".into() };
        let pair = client.obtain_tokens(&creds).await.unwrap();
        assert_eq!(pair, TokenPair { access: "a1".into(), refresh: "r1".into() });

        let req = &transport.requests()[0];
        assert_eq!(req.method, Method::Post);
        assert!(req.url.ends_with(LOGIN_ENDPOINT));
        let body: serde_json::Value = serde_json::from_slice(req.body.as_ref().unwrap()).unwrap();
        assert_eq!(body, json!({"email": "op@mobilis.com", "password": "pw"}));
    }

    #[tokio::test]
    async fn test_item_updates_target_item_path() {
        let (client, transport, _, _) = client_with(
            FakeTransport::new()
                .reply_json(200, serde_json::to_value(&crate::samples::inventory()[1]).unwrap())
                .reply_raw(204, ""),
            MemoryStore::new(),
        );
        let item = crate::samples::inventory()[1].clone();
        client.update_inventory(&item).await.unwrap();
        client.delete_rfid_user("RFID-005").await.unwrap();

        let reqs = transport.requests();
        assert!(reqs[0].url.ends_with("/material/inventory/INV-002"));
        assert_eq!(reqs[0].method, Method::Put);
        assert!(reqs[1].url.ends_with("/security/rfid-users/RFID-005"));
        assert_eq!(reqs[1].method, Method::Delete);
    }

    #[tokio::test]
    async fn test_alerts_decode_from_backend_shape() {
        let (client, _, _, _) = client_with(
            FakeTransport::new().reply_json(
                200,
                json!([{"id": "ALT-9", "type": "Door Forced", "zone": "Zone C", "time": "now", "status": "critical"}]),
            ),
            MemoryStore::new(),
        );
        let alerts = client.security_alerts().await.unwrap();
        assert_eq!(alerts[0].kind, "Door Forced");
    }
}
