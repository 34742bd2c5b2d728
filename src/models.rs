//! Wire records exchanged with the backend.
//!
//! Field names follow the backend's JSON; camelCase fields are renamed explicitly.

use serde::{Deserialize, Serialize};

// ─── USERS ──────────────────────────────────────────────────────

/// Account record served by the user endpoints.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct User {
    pub id: u64,
    pub email: String,
    pub first_name: String,
    pub last_name: String,
    pub is_active: bool,
    pub is_superuser: bool,
}

impl User {
    pub fn full_name(&self) -> String {
        format!("{} {}", self.first_name, self.last_name).trim().to_string()
    }
}

/// Payload for creating an account; the server (or mock store) assigns the id.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct NewUser {
    pub email: String,
    pub first_name: String,
    pub last_name: String,
    pub is_active: bool,
    pub is_superuser: bool,
}

impl NewUser {
    pub fn with_id(self, id: u64) -> User {
        User {
            id,
            email: self.email,
            first_name: self.first_name,
            last_name: self.last_name,
            is_active: self.is_active,
            is_superuser: self.is_superuser,
        }
    }
}

/// Partial update; absent fields are left untouched.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct UserPatch {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub email: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub first_name: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub last_name: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub is_active: Option<bool>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub is_superuser: Option<bool>,
}

impl UserPatch {
    pub fn apply(&self, user: &mut User) {
        if let Some(email) = &self.email {
            user.email = email.clone();
        }
        if let Some(first) = &self.first_name {
            user.first_name = first.clone();
        }
        if let Some(last) = &self.last_name {
            user.last_name = last.clone();
        }
        if let Some(active) = self.is_active {
            user.is_active = active;
        }
        if let Some(superuser) = self.is_superuser {
            user.is_superuser = superuser;
        }
    }
}

// ─── SESSION ────────────────────────────────────────────────────

/// Display role picked on the login form. Unrelated to [`User::is_superuser`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Role {
    Admin,
    Manager,
    #[default]
    User,
}

impl Role {
    pub const ALL: &[Role] = &[Role::Admin, Role::Manager, Role::User];

    /// Translation key of the role label.
    pub fn key(&self) -> &'static str {
        match self {
            Role::Admin => "admin",
            Role::Manager => "manager",
            Role::User => "user",
        }
    }
}

/// Identity of the signed-in operator, for display only.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SessionUser {
    pub name: String,
    pub email: String,
    pub role: Role,
}

impl SessionUser {
    /// Name shown in the header: the local part of the email address.
    pub fn from_login(email: &str, role: Role) -> Self {
        let name = email.split('@').next().unwrap_or(email).to_string();
        Self { name, email: email.to_string(), role }
    }
}

#[derive(Debug, Clone, Serialize)]
pub struct Credentials {
    pub email: String,
    pub password: String,
}

/// Response of the login endpoint.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct TokenPair {
    pub access: String,
    pub refresh: String,
}

#[derive(Debug, Clone, Serialize)]
pub struct RefreshRequest {
    pub refresh: String,
}

/// Response of the refresh endpoint. Rotating backends also return a new refresh token.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct AccessToken {
    pub access: String,
    #[serde(default)]
    pub refresh: Option<String>,
}

// ─── ENERGY ─────────────────────────────────────────────────────

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MonthlyEnergy {
    pub name: String,
    pub consumption: f32,
    pub production: f32,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TemperatureReading {
    pub name: String,
    pub temp: f32,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SolarReading {
    pub time: String,
    pub output: f32,
    pub temp: f32,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CellCharge {
    pub name: String,
    pub charge: f32,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FrequencyReading {
    pub time: String,
    pub value: f32,
}

// ─── SECURITY ───────────────────────────────────────────────────

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RfidUser {
    pub id: String,
    pub name: String,
    pub role: String,
    #[serde(rename = "lastAccess")]
    pub last_access: String,
    pub status: String,
}

impl RfidUser {
    pub fn is_active(&self) -> bool {
        self.status == "active"
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SecurityAlert {
    pub id: String,
    #[serde(rename = "type")]
    pub kind: String,
    pub zone: String,
    pub time: String,
    pub status: String,
}

impl SecurityAlert {
    pub fn is_critical(&self) -> bool {
        self.status == "critical"
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AccessStats {
    pub day: String,
    pub authorized: f32,
    pub unauthorized: f32,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DailyAlerts {
    pub name: String,
    pub alerts: f32,
}

// ─── MATERIAL ───────────────────────────────────────────────────

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct MaintenanceItem {
    pub id: String,
    pub name: String,
    #[serde(rename = "lastMaintenance")]
    pub last_maintenance: String,
    #[serde(rename = "nextMaintenance")]
    pub next_maintenance: String,
    /// `good`, `attention` or `urgent`.
    pub status: String,
    /// Remaining service interval, percent.
    pub progress: u8,
}

impl MaintenanceItem {
    /// The record after a service on `date`: full interval ahead, status good.
    pub fn serviced(&self, date: &str) -> Self {
        Self {
            last_maintenance: date.to_string(),
            status: "good".to_string(),
            progress: 100,
            ..self.clone()
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct InventoryItem {
    pub id: String,
    pub name: String,
    pub stock: u32,
    #[serde(rename = "minStock")]
    pub min_stock: u32,
    /// `good` or `low`.
    pub status: String,
}

impl InventoryItem {
    pub fn is_low(&self) -> bool {
        self.stock < self.min_stock
    }

    /// The record after a restock to twice the minimum. Stock is never lowered.
    pub fn restocked(&self) -> Self {
        let target = self.min_stock.saturating_mul(2).max(1);
        Self {
            stock: self.stock.max(target),
            status: "good".to_string(),
            ..self.clone()
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_patch_applies_only_present_fields() {
        let mut user = NewUser {
            email: "a@b.c".into(),
            first_name: "Ada".into(),
            last_name: "Lovelace".into(),
            is_active: true,
            is_superuser: false,
        }
        .with_id(7);
        let patch = UserPatch { is_active: Some(false), ..Default::default() };
        patch.apply(&mut user);
        assert!(!user.is_active);
        assert_eq!(user.first_name, "Ada");
        assert_eq!(user.id, 7);
    }

    #[test]
    fn test_patch_serializes_sparse() {
        let patch = UserPatch { is_superuser: Some(true), ..Default::default() };
        let json = serde_json::to_string(&patch).unwrap();
        assert_eq!(json, r#"{"is_superuser":true}"#);
    }

    #[test]
    fn test_camel_case_fields_decode() {
        let json = r#"{"id":"RFID-9","name":"N","role":"Admin","lastAccess":"today","status":"inactive"}"#;
        let rfid: RfidUser = serde_json::from_str(json).unwrap();
        assert_eq!(rfid.last_access, "today");
        assert!(!rfid.is_active());

        let json = r#"{"id":"ALT-1","type":"Door Forced","zone":"A","time":"t","status":"critical"}"#;
        let alert: SecurityAlert = serde_json::from_str(json).unwrap();
        assert_eq!(alert.kind, "Door Forced");
        assert!(alert.is_critical());
    }

    #[test]
    fn test_refresh_response_without_rotation() {
        let token: AccessToken = serde_json::from_str(r#"{"access":"new"}"#).unwrap();
        assert_eq!(token.access, "new");
        assert!(token.refresh.is_none());
    }

    #[test]
    fn test_session_user_from_login() {
        let who = SessionUser::from_login("jean.dupont@mobilis.com", Role::Manager);
        assert_eq!(who.name, "jean.dupont");
        assert_eq!(who.role.key(), "manager");
    }

    #[test]
    fn test_inventory_low_stock() {
        let item = InventoryItem {
            id: "INV-2".into(),
            name: "Battery Cells".into(),
            stock: 8,
            min_stock: 10,
            status: "low".into(),
        };
        assert!(item.is_low());

        let restocked = item.restocked();
        assert_eq!(restocked.stock, 20);
        assert_eq!(restocked.status, "good");
        assert!(!restocked.is_low());

        let plenty = InventoryItem { stock: 50, min_stock: 20, ..item };
        assert_eq!(plenty.restocked().stock, 50);
    }

    #[test]
    fn test_serviced_equipment_is_reset() {
        let item = MaintenanceItem {
            id: "EQ-005".into(),
            name: "RFID Security System".into(),
            last_maintenance: "05 Jan 2025".into(),
            next_maintenance: "05 Apr 2025".into(),
            status: "urgent".into(),
            progress: 5,
        };
        let done = item.serviced("18 Oct 2026");
        assert_eq!(done.last_maintenance, "18 Oct 2026");
        assert_eq!(done.next_maintenance, "05 Apr 2025");
        assert_eq!(done.status, "good");
        assert_eq!(done.progress, 100);
        assert_eq!(done.id, item.id);
    }
}
