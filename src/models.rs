//! Frontend Models
//!
//! Data structures matching backend entities.

use chrono::{DateTime, NaiveDate, Utc};
use serde::{Deserialize, Deserializer, Serialize};

// ========================
// Enumerations
// ========================

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "UPPERCASE")]
pub enum Role {
    Admin,
    Manager,
    #[default]
    Rep,
}

impl Role {
    pub fn as_str(&self) -> &'static str {
        match self {
            Role::Admin => "ADMIN",
            Role::Manager => "MANAGER",
            Role::Rep => "REP",
        }
    }

    pub fn label(&self) -> &'static str {
        match self {
            Role::Admin => "Administrator",
            Role::Manager => "Sales Manager",
            Role::Rep => "Sales Rep",
        }
    }

    /// Managers and admins pass the backend's manager-or-admin permission.
    pub fn can_manage(&self) -> bool {
        matches!(self, Role::Admin | Role::Manager)
    }

    pub fn parse(value: &str) -> Option<Role> {
        match value {
            "ADMIN" => Some(Role::Admin),
            "MANAGER" => Some(Role::Manager),
            "REP" => Some(Role::Rep),
            _ => None,
        }
    }
}

/// Outcome of a deal; also the `type` of a pipeline stage
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "UPPERCASE")]
pub enum DealStatus {
    #[default]
    Open,
    Won,
    Lost,
}

impl DealStatus {
    pub fn as_str(&self) -> &'static str {
        match self {
            DealStatus::Open => "OPEN",
            DealStatus::Won => "WON",
            DealStatus::Lost => "LOST",
        }
    }

    pub fn parse(value: &str) -> Option<DealStatus> {
        match value {
            "OPEN" => Some(DealStatus::Open),
            "WON" => Some(DealStatus::Won),
            "LOST" => Some(DealStatus::Lost),
            _ => None,
        }
    }

    /// CSS modifier used by tags and card borders
    pub fn css(&self) -> &'static str {
        match self {
            DealStatus::Open => "status-open",
            DealStatus::Won => "status-won",
            DealStatus::Lost => "status-lost",
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "UPPERCASE")]
pub enum Priority {
    Low,
    #[default]
    Medium,
    High,
}

impl Priority {
    pub fn as_str(&self) -> &'static str {
        match self {
            Priority::Low => "LOW",
            Priority::Medium => "MEDIUM",
            Priority::High => "HIGH",
        }
    }

    pub fn label(&self) -> &'static str {
        match self {
            Priority::Low => "Low",
            Priority::Medium => "Normal",
            Priority::High => "Urgent",
        }
    }

    pub fn parse(value: &str) -> Option<Priority> {
        match value {
            "LOW" => Some(Priority::Low),
            "MEDIUM" => Some(Priority::Medium),
            "HIGH" => Some(Priority::High),
            _ => None,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "UPPERCASE")]
pub enum ActivityType {
    #[default]
    Call,
    Email,
    Meeting,
    Note,
}

impl ActivityType {
    pub const ALL: [ActivityType; 4] = [
        ActivityType::Call,
        ActivityType::Email,
        ActivityType::Meeting,
        ActivityType::Note,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            ActivityType::Call => "CALL",
            ActivityType::Email => "EMAIL",
            ActivityType::Meeting => "MEETING",
            ActivityType::Note => "NOTE",
        }
    }

    pub fn label(&self) -> &'static str {
        match self {
            ActivityType::Call => "Call",
            ActivityType::Email => "Email",
            ActivityType::Meeting => "Meeting",
            ActivityType::Note => "Note",
        }
    }
}

// ========================
// Entities
// ========================

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct User {
    pub id: u32,
    pub username: String,
    #[serde(default, deserialize_with = "null_as_default")]
    pub email: String,
    #[serde(default)]
    pub role: Role,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Customer {
    pub id: u32,
    pub name: String,
    #[serde(default)]
    pub email: Option<String>,
    #[serde(default)]
    pub phone: Option<String>,
    #[serde(default)]
    pub created_at: Option<DateTime<Utc>>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PipelineStage {
    pub id: u32,
    pub name: String,
    #[serde(default)]
    pub order: i32,
    #[serde(rename = "type", default)]
    pub kind: DealStatus,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Opportunity {
    pub id: u32,
    pub title: String,
    #[serde(default, deserialize_with = "decimal")]
    pub value: f64,
    #[serde(default)]
    pub expected_close_date: Option<NaiveDate>,
    #[serde(default)]
    pub status: DealStatus,
    pub stage: u32,
    #[serde(default, deserialize_with = "null_as_default")]
    pub stage_name: String,
    pub customer: u32,
    #[serde(default, deserialize_with = "null_as_default")]
    pub customer_name: String,
    #[serde(default)]
    pub owner: Option<u32>,
    #[serde(default, deserialize_with = "null_as_default")]
    pub owner_name: String,
    #[serde(default)]
    pub created_at: Option<DateTime<Utc>>,
    #[serde(default)]
    pub updated_at: Option<DateTime<Utc>>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Product {
    pub id: u32,
    pub name: String,
    #[serde(default)]
    pub code: Option<String>,
    #[serde(default, deserialize_with = "decimal")]
    pub price: f64,
    #[serde(default)]
    pub description: Option<String>,
}

/// Product line attached to an opportunity
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct OpportunityItem {
    pub id: u32,
    pub opportunity: u32,
    pub product: u32,
    #[serde(default, deserialize_with = "null_as_default")]
    pub product_name: String,
    #[serde(default = "one")]
    pub quantity: u32,
    #[serde(default, deserialize_with = "decimal")]
    pub unit_price: f64,
}

impl OpportunityItem {
    pub fn line_total(&self) -> f64 {
        self.quantity as f64 * self.unit_price
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Task {
    pub id: u32,
    #[serde(default)]
    pub opportunity: Option<u32>,
    #[serde(default)]
    pub opportunity_name: Option<String>,
    pub title: String,
    #[serde(default)]
    pub due_date: Option<DateTime<Utc>>,
    #[serde(default)]
    pub is_completed: bool,
    #[serde(default)]
    pub priority: Priority,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Activity {
    pub id: u32,
    pub opportunity: u32,
    #[serde(default, deserialize_with = "null_as_default")]
    pub user_name: String,
    #[serde(rename = "type", default)]
    pub kind: ActivityType,
    pub summary: String,
    #[serde(default)]
    pub created_at: Option<DateTime<Utc>>,
}

// ========================
// Serde helpers
// ========================

fn one() -> u32 {
    1
}

fn null_as_default<'de, D, T>(deserializer: D) -> Result<T, D::Error>
where
    D: Deserializer<'de>,
    T: Default + Deserialize<'de>,
{
    Ok(Option::<T>::deserialize(deserializer)?.unwrap_or_default())
}

/// Decimal columns arrive as strings ("1500000.00"), aggregates as numbers.
pub(crate) fn decimal<'de, D>(deserializer: D) -> Result<f64, D::Error>
where
    D: Deserializer<'de>,
{
    #[derive(Deserialize)]
    #[serde(untagged)]
    enum Raw {
        Number(f64),
        Text(String),
    }

    match Option::<Raw>::deserialize(deserializer)? {
        None => Ok(0.0),
        Some(Raw::Number(n)) => Ok(n),
        Some(Raw::Text(s)) if s.trim().is_empty() => Ok(0.0),
        Some(Raw::Text(s)) => s.trim().parse::<f64>().map_err(serde::de::Error::custom),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_opportunity_from_backend_payload() {
        let opp: Opportunity = serde_json::from_value(json!({
            "id": 7,
            "title": "ERP rollout",
            "value": "150000000.00",
            "expected_close_date": "2025-03-31",
            "status": "OPEN",
            "stage": 2,
            "stage_name": "Proposal",
            "customer": 4,
            "customer_name": "ACME",
            "owner": 1,
            "owner_name": "alice",
            "stage_id": 2,
            "customer_id": 4,
            "created_at": "2025-01-10T08:00:00Z",
            "updated_at": "2025-01-11T09:30:00.123456Z"
        }))
        .unwrap();

        assert_eq!(opp.value, 150_000_000.0);
        assert_eq!(opp.expected_close_date, NaiveDate::from_ymd_opt(2025, 3, 31));
        assert_eq!(opp.stage, 2);
        assert_eq!(opp.owner_name, "alice");
    }

    #[test]
    fn test_decimal_accepts_numbers_and_nulls() {
        let opp: Opportunity = serde_json::from_value(json!({
            "id": 1, "title": "t", "value": 12.5, "stage": 1, "customer": 1, "owner_name": null
        }))
        .unwrap();
        assert_eq!(opp.value, 12.5);
        assert_eq!(opp.owner_name, "");

        let product: Product = serde_json::from_value(json!({
            "id": 1, "name": "Seat", "price": null
        }))
        .unwrap();
        assert_eq!(product.price, 0.0);
    }

    #[test]
    fn test_product_code_field() {
        let product: Product = serde_json::from_value(json!({
            "id": 1, "name": "Goi Basic", "code": "SP1", "price": "5000000.00"
        }))
        .unwrap();
        assert_eq!(product.code.as_deref(), Some("SP1"));
        assert_eq!(product.price, 5_000_000.0);

        let echoed = serde_json::to_value(&product).unwrap();
        assert_eq!(echoed["code"], "SP1");
        assert!(echoed.get("sku").is_none());
    }

    #[test]
    fn test_stage_type_field() {
        let stage: PipelineStage =
            serde_json::from_value(json!({"id": 3, "name": "Closed won", "order": 5, "type": "WON"})).unwrap();
        assert_eq!(stage.kind, DealStatus::Won);
    }

    #[test]
    fn test_role_permissions() {
        assert!(Role::Admin.can_manage());
        assert!(Role::Manager.can_manage());
        assert!(!Role::Rep.can_manage());
        assert_eq!(Role::parse("MANAGER"), Some(Role::Manager));
    }
}
