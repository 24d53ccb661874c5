//! Opportunity Endpoints
//!
//! Filters, CSV export, stage transitions and the detail page's child records.

use chrono::NaiveDate;
use serde::Serialize;
use serde_json::{json, Value};

use super::{ApiClient, ApiError, ACTIVITIES, OPPORTUNITIES, OPPORTUNITY_ITEMS, TASKS};
use crate::config::DEFAULT_PAGE_SIZE;
use crate::listing::ListQuery;
use crate::models::{Activity, ActivityType, DealStatus, Opportunity, OpportunityItem, PipelineStage, Priority, Task};

/// Opportunity list filters as the select boxes hold them; empty means "any".
#[derive(Debug, Clone, Default, PartialEq)]
pub struct OpportunityFilter {
    pub search: String,
    pub status: String,
    pub stage: String,
    pub owner: String,
}

impl OpportunityFilter {
    pub fn query(&self, page: u32) -> ListQuery {
        ListQuery {
            page,
            page_size: Some(DEFAULT_PAGE_SIZE),
            search: self.search.clone(),
            filters: vec![
                ("status", self.status.clone()),
                ("stage", self.stage.clone()),
                ("owner", self.owner.clone()),
            ],
        }
    }
}

pub fn export_file_name(date: NaiveDate) -> String {
    format!("opportunities_{}.csv", date.format("%Y-%m-%d"))
}

/// Raw CSV bytes as the backend renders them
pub async fn export_opportunities(client: &ApiClient) -> Result<Vec<u8>, ApiError> {
    Ok(client.get_raw("opportunities/export/", &[]).await?.body)
}

// ========================
// Stage transitions
// ========================

/// Stages a deal can progress through, in pipeline order
pub fn open_stages(stages: &[PipelineStage]) -> Vec<PipelineStage> {
    let mut open: Vec<PipelineStage> = stages
        .iter()
        .filter(|s| s.kind == DealStatus::Open)
        .cloned()
        .collect();
    open.sort_by_key(|s| s.order);
    open
}

pub fn progress_payload(stage: u32) -> Value {
    json!({ "stage": stage, "status": DealStatus::Open })
}

/// Closing moves the deal into the first stage of the matching type, if any.
pub fn close_payload(stages: &[PipelineStage], outcome: DealStatus) -> Value {
    let target = stages
        .iter()
        .filter(|s| s.kind == outcome)
        .min_by_key(|s| s.order);
    match target {
        Some(stage) => json!({ "status": outcome, "stage": stage.id }),
        None => json!({ "status": outcome }),
    }
}

pub async fn change_stage(client: &ApiClient, id: u32, stage: u32) -> Result<(), ApiError> {
    OPPORTUNITIES.update(client, id, &progress_payload(stage)).await
}

pub async fn close_deal(
    client: &ApiClient,
    id: u32,
    stages: &[PipelineStage],
    outcome: DealStatus,
) -> Result<(), ApiError> {
    log::info!("[API] closing opportunity {} as {}", id, outcome.as_str());
    OPPORTUNITIES.update(client, id, &close_payload(stages, outcome)).await
}

// ========================
// Child records
// ========================

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct NewActivity {
    pub opportunity: u32,
    #[serde(rename = "type")]
    pub kind: ActivityType,
    pub summary: String,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct NewTask {
    pub opportunity: u32,
    pub title: String,
    pub priority: Priority,
    /// RFC 3339
    #[serde(skip_serializing_if = "Option::is_none")]
    pub due_date: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct NewLineItem {
    pub opportunity: u32,
    pub product: u32,
    pub quantity: u32,
    /// Left out to let the backend use the product's list price.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub unit_price: Option<f64>,
}

/// Everything the detail page shows besides the stage list
#[derive(Debug, Clone, PartialEq)]
pub struct OpportunityDetail {
    pub opportunity: Opportunity,
    pub activities: Vec<Activity>,
    pub tasks: Vec<Task>,
    pub items: Vec<OpportunityItem>,
}

impl OpportunityDetail {
    pub fn open_tasks(&self) -> impl Iterator<Item = &Task> {
        self.tasks.iter().filter(|t| !t.is_completed)
    }

    pub fn items_total(&self) -> f64 {
        self.items.iter().map(OpportunityItem::line_total).sum()
    }
}

pub async fn fetch_detail(client: &ApiClient, id: u32) -> Result<OpportunityDetail, ApiError> {
    let by_opportunity = [("opportunity", id.to_string())];
    let opportunity = OPPORTUNITIES.get(client, id).await?;
    let activities = ACTIVITIES.all(client, &by_opportunity).await?;
    let tasks = TASKS.all(client, &by_opportunity).await?;
    let items = OPPORTUNITY_ITEMS.all(client, &by_opportunity).await?;
    Ok(OpportunityDetail {
        opportunity,
        activities,
        tasks,
        items,
    })
}

#[cfg(test)]
mod tests {
    use super::super::mock::{json_response, MockTransport};
    use super::super::{Method, RequestBody};
    use super::*;

    fn stage(id: u32, order: i32, kind: DealStatus) -> PipelineStage {
        PipelineStage { id, name: format!("S{}", id), order, kind }
    }

    #[test]
    fn test_filter_query_skips_empty_values() {
        let filter = OpportunityFilter {
            search: "erp".into(),
            status: "WON".into(),
            ..Default::default()
        };
        assert_eq!(
            filter.query(2).to_pairs(),
            vec![
                ("page", "2".to_string()),
                ("page_size", "10".to_string()),
                ("search", "erp".to_string()),
                ("status", "WON".to_string()),
            ]
        );
    }

    #[test]
    fn test_export_file_name() {
        let date = NaiveDate::from_ymd_opt(2025, 2, 7).unwrap();
        assert_eq!(export_file_name(date), "opportunities_2025-02-07.csv");
    }

    #[test]
    fn test_close_payload_picks_first_matching_stage() {
        let stages = vec![
            stage(1, 1, DealStatus::Open),
            stage(9, 6, DealStatus::Lost),
            stage(7, 5, DealStatus::Won),
            stage(8, 4, DealStatus::Lost),
        ];
        assert_eq!(close_payload(&stages, DealStatus::Lost), json!({"status": "LOST", "stage": 8}));
        assert_eq!(close_payload(&stages[..1], DealStatus::Won), json!({"status": "WON"}));
        assert_eq!(open_stages(&stages).len(), 1);
    }

    #[tokio::test]
    async fn test_change_stage_reopens_deal() {
        let mock = MockTransport::new(|_| json_response(200, json!({})));
        let client = mock.default_client();

        change_stage(&client, 4, 2).await.unwrap();

        let request = &mock.requests()[0];
        assert_eq!(request.method, Method::Patch);
        assert_eq!(request.body, RequestBody::Json(json!({"stage": 2, "status": "OPEN"})));
    }

    #[tokio::test]
    async fn test_fetch_detail_filters_children_by_opportunity() {
        let mock = MockTransport::new(|req| {
            if req.url.ends_with("opportunities/3/") {
                json_response(200, json!({"id": 3, "title": "Deal", "value": "100.00", "stage": 1, "customer": 1}))
            } else if req.url.contains("opportunity-items") {
                json_response(200, json!([
                    {"id": 1, "opportunity": 3, "product": 2, "quantity": 2, "unit_price": "25.00"}
                ]))
            } else if req.url.contains("tasks") {
                json_response(200, json!([
                    {"id": 1, "title": "Call back", "is_completed": false},
                    {"id": 2, "title": "Send quote", "is_completed": true}
                ]))
            } else {
                json_response(200, json!([]))
            }
        });
        let client = mock.default_client();

        let detail = fetch_detail(&client, 3).await.unwrap();
        assert_eq!(detail.items_total(), 50.0);
        assert_eq!(detail.open_tasks().count(), 1);

        let calls = mock.calls();
        assert_eq!(calls.len(), 4);
        assert!(calls[1..].iter().all(|(_, path)| path.ends_with("?opportunity=3")));
    }
}
