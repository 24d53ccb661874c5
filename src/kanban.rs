//! Kanban Board State
//!
//! Opportunities grouped by stage, with optimistic stage moves that are either
//! committed by the server or rolled back by a full refetch.

use reactive_stores::Store;
use serde_json::json;

use crate::api::{ApiClient, ApiError, OPPORTUNITIES, STAGES};
use crate::config::KANBAN_PAGE_SIZE;
use crate::models::{Opportunity, PipelineStage};

/// One optimistic move awaiting the server
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct StageMove {
    pub op: u64,
    pub opportunity: u32,
    pub from: u32,
    pub to: u32,
}

#[derive(Debug, Clone, Default, PartialEq, Store)]
pub struct Board {
    /// Sorted by `order`
    pub stages: Vec<PipelineStage>,
    pub opportunities: Vec<Opportunity>,
    pub pending: Vec<StageMove>,
    /// Last issued operation id
    pub next_op: u64,
}

impl Board {
    pub fn from_server(mut stages: Vec<PipelineStage>, opportunities: Vec<Opportunity>) -> Self {
        stages.sort_by_key(|s| s.order);
        Self {
            stages,
            opportunities,
            pending: Vec::new(),
            next_op: 0,
        }
    }

    pub fn column(&self, stage: u32) -> Vec<Opportunity> {
        self.opportunities
            .iter()
            .filter(|o| o.stage == stage)
            .cloned()
            .collect()
    }

    pub fn column_count(&self, stage: u32) -> usize {
        self.opportunities.iter().filter(|o| o.stage == stage).count()
    }

    pub fn column_total(&self, stage: u32) -> f64 {
        self.opportunities
            .iter()
            .filter(|o| o.stage == stage)
            .map(|o| o.value)
            .sum()
    }

    pub fn stage_of(&self, opportunity: u32) -> Option<u32> {
        self.opportunities
            .iter()
            .find(|o| o.id == opportunity)
            .map(|o| o.stage)
    }

    /// Move a card locally. None when the drop changes nothing.
    pub fn apply_move(&mut self, opportunity: u32, target_stage: u32) -> Option<StageMove> {
        let stage_name = self
            .stages
            .iter()
            .find(|s| s.id == target_stage)?
            .name
            .clone();
        let card = self.opportunities.iter_mut().find(|o| o.id == opportunity)?;
        if card.stage == target_stage {
            return None;
        }

        let from = card.stage;
        card.stage = target_stage;
        card.stage_name = stage_name;

        self.next_op += 1;
        let mv = StageMove {
            op: self.next_op,
            opportunity,
            from,
            to: target_stage,
        };
        self.pending.push(mv);
        Some(mv)
    }

    pub fn commit(&mut self, op: u64) {
        self.pending.retain(|m| m.op != op);
    }

    pub fn is_pending(&self, opportunity: u32) -> bool {
        self.pending.iter().any(|m| m.opportunity == opportunity)
    }

    /// Server state wins; any other pending moves are superseded.
    pub fn replace(&mut self, server: Board) {
        let next_op = self.next_op;
        *self = server;
        self.next_op = next_op;
    }

    pub fn apply_settlement(&mut self, settlement: Settlement) {
        match settlement {
            Settlement::Committed(op) => self.commit(op),
            Settlement::Reverted { board, .. } => self.replace(board),
            Settlement::Diverged { op, .. } => self.commit(op),
        }
    }
}

// ========================
// Server round-trips
// ========================

#[derive(Debug, Clone, PartialEq)]
pub enum Settlement {
    Committed(u64),
    /// The move failed and the board was reloaded from the server.
    Reverted { board: Board, cause: ApiError },
    /// The move failed and so did the reload; local state is left as is.
    Diverged { op: u64, cause: ApiError },
}

pub async fn fetch_board(client: &ApiClient) -> Result<Board, ApiError> {
    let stages = STAGES.all(client, &[]).await?;
    let opportunities = OPPORTUNITIES
        .all(client, &[("page_size", KANBAN_PAGE_SIZE.to_string())])
        .await?;
    log::info!("[KANBAN] loaded {} stages, {} opportunities", stages.len(), opportunities.len());
    Ok(Board::from_server(stages, opportunities))
}

pub async fn push_move(client: &ApiClient, mv: &StageMove) -> Result<(), ApiError> {
    OPPORTUNITIES
        .update(client, mv.opportunity, &json!({ "stage": mv.to }))
        .await
}

pub async fn settle(client: &ApiClient, mv: StageMove) -> Settlement {
    let cause = match push_move(client, &mv).await {
        Ok(()) => {
            log::info!("[KANBAN] opportunity {} moved {} -> {}", mv.opportunity, mv.from, mv.to);
            return Settlement::Committed(mv.op);
        }
        Err(err) => err,
    };

    log::warn!("[KANBAN] move of {} failed: {}; reloading board", mv.opportunity, cause);
    match fetch_board(client).await {
        Ok(board) => Settlement::Reverted { board, cause },
        Err(reload) => {
            log::error!("[KANBAN] reload after failed move also failed: {}", reload);
            Settlement::Diverged { op: mv.op, cause }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::api::mock::{json_response, path_of, MockTransport};
    use crate::api::Method;
    use crate::models::DealStatus;
    use serde_json::Value;

    fn stages_json() -> Value {
        json!([
            {"id": 2, "name": "Proposal", "order": 2, "type": "OPEN"},
            {"id": 1, "name": "Lead", "order": 1, "type": "OPEN"},
            {"id": 3, "name": "Won", "order": 3, "type": "WON"}
        ])
    }

    fn opportunities_json() -> Value {
        json!({
            "count": 2, "next": null, "previous": null,
            "results": [
                {"id": 10, "title": "ERP", "value": "1000.00", "stage": 1, "stage_name": "Lead", "customer": 1},
                {"id": 11, "title": "CRM", "value": "500.00", "stage": 2, "stage_name": "Proposal", "customer": 2}
            ]
        })
    }

    fn server(patch_status: u16) -> MockTransport {
        MockTransport::new(move |req| match (req.method, path_of(req)) {
            (Method::Get, "stages/") => json_response(200, stages_json()),
            (Method::Get, "opportunities/?page_size=1000") => json_response(200, opportunities_json()),
            (Method::Patch, _) => json_response(patch_status, json!({"detail": "nope"})),
            _ => json_response(404, json!({})),
        })
    }

    #[tokio::test]
    async fn test_fetch_sorts_stages_and_groups_cards() {
        let mock = server(200);
        let board = fetch_board(&mock.default_client()).await.unwrap();

        let order: Vec<u32> = board.stages.iter().map(|s| s.id).collect();
        assert_eq!(order, vec![1, 2, 3]);
        assert_eq!(board.stages[2].kind, DealStatus::Won);
        assert_eq!(board.column_count(1), 1);
        assert_eq!(board.column_total(2), 500.0);
    }

    #[tokio::test]
    async fn test_drop_moves_card_immediately_and_commits() {
        let mock = server(200);
        let client = mock.default_client();
        let mut board = fetch_board(&client).await.unwrap();

        let mv = board.apply_move(10, 2).unwrap();
        assert_eq!(board.stage_of(10), Some(2));
        assert_eq!(board.column(2)[0].stage_name, "Proposal");
        assert!(board.is_pending(10));

        let settlement = settle(&client, mv).await;
        assert_eq!(settlement, Settlement::Committed(mv.op));
        board.apply_settlement(settlement);
        assert!(board.pending.is_empty());
        assert_eq!(board.stage_of(10), Some(2));

        let patch = mock.requests().into_iter().find(|r| r.method == Method::Patch).unwrap();
        assert_eq!(path_of(&patch), "opportunities/10/");
        assert_eq!(patch.body, crate::api::RequestBody::Json(json!({"stage": 2})));
    }

    #[tokio::test]
    async fn test_failed_move_reverts_to_server_arrangement() {
        let mock = server(500);
        let client = mock.default_client();
        let mut board = fetch_board(&client).await.unwrap();
        let server_board = board.clone();

        let mv = board.apply_move(10, 3).unwrap();
        assert_eq!(board.stage_of(10), Some(3));

        let settlement = settle(&client, mv).await;
        assert!(matches!(settlement, Settlement::Reverted { ref cause, .. } if cause.status() == Some(500)));
        board.apply_settlement(settlement);

        assert_eq!(board.stage_of(10), Some(1));
        assert_eq!(board.opportunities, server_board.opportunities);
        assert!(board.pending.is_empty());
    }

    #[tokio::test]
    async fn test_failed_move_with_failed_reload_keeps_local_board() {
        let mock = MockTransport::new(|req| match req.method {
            Method::Patch => json_response(500, json!({"detail": "nope"})),
            _ => json_response(503, json!({"detail": "down"})),
        });
        let client = mock.default_client();
        let stages: Vec<PipelineStage> = serde_json::from_value(stages_json()).unwrap();
        let page: crate::listing::Page<Opportunity> = serde_json::from_value(opportunities_json()).unwrap();
        let mut board = Board::from_server(stages, page.into_items());

        let mv = board.apply_move(10, 3).unwrap();
        let settlement = settle(&client, mv).await;
        assert!(matches!(
            settlement,
            Settlement::Diverged { op, ref cause } if op == mv.op && cause.status() == Some(500)
        ));

        board.apply_settlement(settlement);
        assert_eq!(board.stage_of(10), Some(3));
        assert!(!board.is_pending(10));
        assert_eq!(
            mock.calls(),
            vec![
                (Method::Patch, "opportunities/10/".to_string()),
                (Method::Get, "stages/".to_string()),
            ]
        );
    }

    #[tokio::test]
    async fn test_unreachable_board_reports_backend_message() {
        let mock = MockTransport::new(|_| json_response(503, json!({"detail": "Service unavailable"})));
        let err = fetch_board(&mock.default_client()).await.unwrap_err();
        assert_eq!(err.status(), Some(503));
        assert_eq!(err.message(), "Service unavailable");
        assert_eq!(mock.requests().len(), 1);
    }

    #[test]
    fn test_drop_on_same_or_unknown_column_is_noop() {
        let stages: Vec<PipelineStage> = serde_json::from_value(stages_json()).unwrap();
        let page: crate::listing::Page<Opportunity> = serde_json::from_value(opportunities_json()).unwrap();
        let mut board = Board::from_server(stages, page.into_items());

        assert_eq!(board.apply_move(10, 1), None);
        assert_eq!(board.apply_move(10, 99), None);
        assert_eq!(board.apply_move(99, 2), None);
        assert!(board.pending.is_empty());
    }

    #[test]
    fn test_operation_ids_increase_across_replace() {
        let stages: Vec<PipelineStage> = serde_json::from_value(stages_json()).unwrap();
        let page: crate::listing::Page<Opportunity> = serde_json::from_value(opportunities_json()).unwrap();
        let mut board = Board::from_server(stages, page.into_items());
        let fresh = board.clone();

        let first = board.apply_move(10, 2).unwrap();
        board.replace(fresh);
        let second = board.apply_move(10, 3).unwrap();
        assert!(second.op > first.op);
    }
}
