//! Dashboard Data
//!
//! Precomputed aggregates from `dashboard/stats/`; the page only formats them.

use chrono::NaiveDate;
use serde::Deserialize;
use serde_json::json;

use crate::api::{ApiClient, ApiError, TASKS};
use crate::models::{decimal, Task};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum MonthsRange {
    Three,
    #[default]
    Six,
    Nine,
    Twelve,
}

impl MonthsRange {
    pub const ALL: [MonthsRange; 4] = [
        MonthsRange::Three,
        MonthsRange::Six,
        MonthsRange::Nine,
        MonthsRange::Twelve,
    ];

    pub fn months(&self) -> u32 {
        match self {
            MonthsRange::Three => 3,
            MonthsRange::Six => 6,
            MonthsRange::Nine => 9,
            MonthsRange::Twelve => 12,
        }
    }

    pub fn from_months(months: u32) -> Option<Self> {
        Self::ALL.into_iter().find(|r| r.months() == months)
    }

    pub fn label(&self) -> String {
        format!("Last {} months", self.months())
    }
}

/// Named value for a bar
#[derive(Debug, Clone, PartialEq, Deserialize)]
pub struct ChartPoint {
    #[serde(default)]
    pub name: String,
    #[serde(default, deserialize_with = "decimal")]
    pub value: f64,
    #[serde(default)]
    pub full_name: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Deserialize)]
pub struct UpcomingDeal {
    pub id: u32,
    pub title: String,
    #[serde(default)]
    pub expected_close_date: Option<NaiveDate>,
    #[serde(default, deserialize_with = "decimal")]
    pub value: f64,
}

#[derive(Debug, Clone, PartialEq, Deserialize)]
pub struct MonthlySales {
    /// `MM/YYYY`
    pub month: String,
    #[serde(default, deserialize_with = "decimal")]
    pub sales: f64,
}

#[derive(Debug, Clone, Default, PartialEq, Deserialize)]
pub struct DashboardStats {
    #[serde(default, deserialize_with = "decimal")]
    pub expected_revenue: f64,
    #[serde(default)]
    pub open_deals_count: u32,
    #[serde(default)]
    pub new_customers_count: u32,
    /// Percent, one decimal
    #[serde(default, deserialize_with = "decimal")]
    pub win_rate: f64,
    #[serde(default)]
    pub revenue_by_stage: Vec<ChartPoint>,
    #[serde(default)]
    pub upcoming_deals: Vec<UpcomingDeal>,
    #[serde(default)]
    pub my_tasks: Vec<Task>,
    #[serde(default)]
    pub rep_performance: Vec<MonthlySales>,
    #[serde(default)]
    pub lost_reason_data: Vec<ChartPoint>,
}

pub async fn fetch_stats(client: &ApiClient, range: MonthsRange) -> Result<DashboardStats, ApiError> {
    client
        .get("dashboard/stats/", &[("months", range.months().to_string())])
        .await
}

/// Flip a task's completion flag; the caller refetches the aggregate.
pub async fn toggle_task(client: &ApiClient, task: &Task) -> Result<(), ApiError> {
    TASKS
        .update(client, task.id, &json!({ "is_completed": !task.is_completed }))
        .await
}

/// Bar length as a percentage of the largest value in the series
pub fn bar_percent(value: f64, max: f64) -> f64 {
    if max <= 0.0 || value <= 0.0 {
        0.0
    } else {
        (value / max * 100.0).clamp(0.0, 100.0)
    }
}

pub fn series_max(values: impl IntoIterator<Item = f64>) -> f64 {
    values.into_iter().fold(0.0, f64::max)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::api::mock::{empty_response, json_response, path_of, MockTransport};
    use crate::api::{Method, RequestBody};

    #[tokio::test]
    async fn test_range_parameterizes_request() {
        let mock = MockTransport::new(|_| json_response(200, json!({"expected_revenue": 0})));
        let client = mock.default_client();

        fetch_stats(&client, MonthsRange::default()).await.unwrap();
        fetch_stats(&client, MonthsRange::Twelve).await.unwrap();

        let paths: Vec<String> = mock.requests().iter().map(|r| path_of(r).to_string()).collect();
        assert_eq!(paths, vec!["dashboard/stats/?months=6", "dashboard/stats/?months=12"]);
    }

    #[test]
    fn test_stats_payload() {
        let stats: DashboardStats = serde_json::from_value(json!({
            "expected_revenue": "250000000.00",
            "open_deals_count": 4,
            "new_customers_count": 2,
            "win_rate": 66.7,
            "revenue_by_stage": [{"name": "Proposal", "value": "120000000.00"}],
            "upcoming_deals": [{"id": 3, "title": "ERP", "expected_close_date": "2025-07-01", "value": "5.00"}],
            "my_tasks": [{"id": 1, "title": "Call", "is_completed": false, "priority": "HIGH",
                          "due_date": "2025-06-01T03:00:00Z", "opportunity": 3, "opportunity_name": "ERP"}],
            "rep_performance": [{"month": "05/2025", "sales": 1000}]
        }))
        .unwrap();

        assert_eq!(stats.expected_revenue, 250_000_000.0);
        assert_eq!(stats.revenue_by_stage[0].value, 120_000_000.0);
        assert_eq!(stats.rep_performance[0].sales, 1000.0);
        assert!(stats.lost_reason_data.is_empty());
    }

    #[tokio::test]
    async fn test_toggle_task_inverts_flag() {
        let mock = MockTransport::new(|_| empty_response(200));
        let client = mock.default_client();
        let task: Task = serde_json::from_value(json!({"id": 8, "title": "Call", "is_completed": true})).unwrap();

        toggle_task(&client, &task).await.unwrap();

        let request = &mock.requests()[0];
        assert_eq!((request.method, path_of(request)), (Method::Patch, "tasks/8/"));
        assert_eq!(request.body, RequestBody::Json(json!({"is_completed": false})));
    }

    #[test]
    fn test_bar_scaling() {
        let max = series_max([10.0, 40.0, 20.0]);
        assert_eq!(max, 40.0);
        assert_eq!(bar_percent(20.0, max), 50.0);
        assert_eq!(bar_percent(5.0, 0.0), 0.0);
        assert_eq!(MonthsRange::from_months(9), Some(MonthsRange::Nine));
        assert_eq!(MonthsRange::from_months(7), None);
    }
}
