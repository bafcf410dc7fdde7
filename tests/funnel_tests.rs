use std::time::Duration;

use chrono::Utc;
use opsboard::feedback::LoadState;
use opsboard::funnel::{
    BoardState, ColumnDraft, ColumnPatch, DragOutcome, DragResult, DraggableLocation,
    FunnelBoard, KanbanColumn, Lead, LeadDraft, LeadPatch, LeadStatus,
};
use opsboard::ids::RecordId;
use opsboard::Opsboard;
use serde_json::json;
use wiremock::matchers::{body_json, body_partial_json, header, method, path};
use wiremock::{Mock, MockServer, ResponseTemplate};

const L1: &str = "6f1c2a9e-0b4d-4f3a-9c1e-2d7b8a6e5f40";
const L2: &str = "0d6a3c62-5d2f-4c1e-9a51-0f3c2e1b7a90";
const C1: &str = "a3c1e0f2-7b64-4f1d-8a0e-5c9d2b7e1f33";
const C2: &str = "b8e2d4c6-1a3f-4e5b-9c7d-0f2e4a6c8b11";

fn client(server: &MockServer) -> Opsboard {
    Opsboard::new(&format!("{}/api", server.uri()), Some("test-token".to_string())).unwrap()
}

fn lead(id: &str, column: Option<&str>) -> Lead {
    Lead {
        id: RecordId::parse(id),
        nome: format!("Lead {}", id),
        email: None,
        telefone: None,
        status: LeadStatus::Free,
        tags: vec![],
        data_cadastro: Utc::now(),
        column_id: column.map(RecordId::parse),
        observacoes: None,
    }
}

fn column(id: &str, order: i64, leads: &[&str]) -> KanbanColumn {
    KanbanColumn {
        id: RecordId::parse(id),
        title: format!("Column {}", id),
        order,
        color: None,
        leads: leads.iter().map(|l| lead(l, Some(id))).collect(),
    }
}

/// col-1 holds L1, col-2 holds L2, mock lead "7" sits in the backlog.
fn seeded(opsboard: &Opsboard) -> FunnelBoard {
    FunnelBoard::with_state(
        opsboard.api().clone(),
        BoardState::new(
            vec![column("col-1", 0, &[L1]), column("col-2", 1, &[L2])],
            vec![lead("7", None)],
        ),
    )
}

fn drag(id: &str, from: (&str, usize), to: Option<(&str, usize)>) -> DragResult {
    DragResult {
        draggable_id: id.to_string(),
        source: DraggableLocation::new(from.0, from.1),
        destination: to.map(|(d, i)| DraggableLocation::new(d, i)),
    }
}

fn ids(leads: &[Lead]) -> Vec<String> {
    leads.iter().map(|l| l.id.to_string()).collect()
}

#[tokio::test]
async fn move_persisted_lead_success() {
    let server = MockServer::start().await;
    let opsboard = client(&server);
    let funnel = seeded(&opsboard);

    Mock::given(method("PATCH"))
        .and(path(format!("/api/v1/leads/{}/move", L1)))
        .and(header("Authorization", "Bearer test-token"))
        .and(header("Content-Type", "application/json"))
        .and(body_json(json!({"column_id": "col-2", "new_index": 1})))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({"id": L1})))
        .expect(1)
        .mount(&server)
        .await;

    let outcome = funnel
        .handle_drag_end(&drag(L1, ("col-1", 0), Some(("col-2", 1))))
        .await;

    assert_eq!(outcome, DragOutcome::Moved);
    let state = funnel.snapshot().await;
    assert!(state.columns[0].leads.is_empty());
    assert_eq!(ids(&state.columns[1].leads), [L2, L1]);
    assert_eq!(
        state.columns[1].leads[1].column_id,
        Some(RecordId::parse("col-2"))
    );
    assert!(funnel.take_toasts().await.is_empty());
}

#[tokio::test]
async fn move_rejected_by_server_is_undone() {
    let server = MockServer::start().await;
    let opsboard = client(&server);
    let funnel = seeded(&opsboard);
    let before = funnel.snapshot().await;

    Mock::given(method("PATCH"))
        .and(path(format!("/api/v1/leads/{}/move", L1)))
        .respond_with(
            ResponseTemplate::new(500).set_body_json(json!({"detail": "Falha ao mover"})),
        )
        .expect(1)
        .mount(&server)
        .await;

    let outcome = funnel
        .handle_drag_end(&drag(L1, ("col-1", 0), Some(("col-2", 1))))
        .await;

    assert_eq!(outcome, DragOutcome::Reverted("Falha ao mover".to_string()));
    assert_eq!(funnel.snapshot().await, before);

    let toasts = funnel.take_toasts().await;
    assert_eq!(toasts.len(), 1);
    assert_eq!(toasts[0].title, "Erro ao mover lead");
    assert_eq!(toasts[0].description, "Falha ao mover");
}

#[tokio::test]
async fn mock_lead_moves_without_network() {
    let server = MockServer::start().await;
    let opsboard = client(&server);
    let funnel = seeded(&opsboard);

    Mock::given(method("PATCH"))
        .respond_with(ResponseTemplate::new(200))
        .expect(0)
        .mount(&server)
        .await;

    let outcome = funnel
        .handle_drag_end(&drag("7", ("backlog", 0), Some(("col-2", 0))))
        .await;

    assert_eq!(outcome, DragOutcome::MovedLocally);
    let state = funnel.snapshot().await;
    assert!(state.backlog.is_empty());
    assert_eq!(ids(&state.columns[1].leads), ["7", L2]);
}

#[tokio::test]
async fn drops_that_change_nothing_make_no_requests() {
    let server = MockServer::start().await;
    let opsboard = client(&server);
    let funnel = seeded(&opsboard);
    let before = funnel.snapshot().await;

    Mock::given(method("PATCH"))
        .respond_with(ResponseTemplate::new(200))
        .expect(0)
        .mount(&server)
        .await;

    let outside = funnel.handle_drag_end(&drag(L1, ("col-1", 0), None)).await;
    let same_slot = funnel
        .handle_drag_end(&drag(L1, ("col-1", 0), Some(("col-1", 0))))
        .await;
    // The card says it came from col-2, but L1 lives in col-1.
    let stale_source = funnel
        .handle_drag_end(&drag(L1, ("col-2", 0), Some(("backlog", 0))))
        .await;

    assert_eq!(outside, DragOutcome::Ignored);
    assert_eq!(same_slot, DragOutcome::Ignored);
    assert_eq!(stale_source, DragOutcome::Ignored);
    assert_eq!(funnel.snapshot().await, before);
}

#[tokio::test]
async fn trash_deletes_persisted_lead() {
    let server = MockServer::start().await;
    let opsboard = client(&server);
    let funnel = seeded(&opsboard);

    Mock::given(method("DELETE"))
        .and(path(format!("/api/v1/leads/{}", L2)))
        .respond_with(ResponseTemplate::new(204))
        .expect(1)
        .mount(&server)
        .await;

    let outcome = funnel
        .handle_drag_end(&drag(L2, ("col-2", 0), Some(("trash", 0))))
        .await;

    assert_eq!(outcome, DragOutcome::Deleted);
    let state = funnel.snapshot().await;
    assert!(state.lead(&RecordId::parse(L2)).is_none());
    assert_eq!(state.lead_count(), 2);
}

#[tokio::test]
async fn trash_removes_mock_lead_locally() {
    let server = MockServer::start().await;
    let opsboard = client(&server);
    let funnel = seeded(&opsboard);

    Mock::given(method("DELETE"))
        .respond_with(ResponseTemplate::new(204))
        .expect(0)
        .mount(&server)
        .await;

    let outcome = funnel
        .handle_drag_end(&drag("7", ("backlog", 0), Some(("trash", 0))))
        .await;

    assert_eq!(outcome, DragOutcome::Deleted);
    assert!(funnel.snapshot().await.backlog.is_empty());
}

#[tokio::test]
async fn refused_delete_puts_lead_back() {
    let server = MockServer::start().await;
    let opsboard = client(&server);
    let funnel = seeded(&opsboard);
    let before = funnel.snapshot().await;

    Mock::given(method("DELETE"))
        .and(path(format!("/api/v1/leads/{}", L1)))
        .respond_with(
            ResponseTemplate::new(404).set_body_json(json!({"detail": "Lead não encontrado"})),
        )
        .expect(1)
        .mount(&server)
        .await;

    let outcome = funnel
        .handle_drag_end(&drag(L1, ("col-1", 0), Some(("trash", 0))))
        .await;

    assert_eq!(
        outcome,
        DragOutcome::DeleteFailed("Lead não encontrado".to_string())
    );
    assert_eq!(funnel.snapshot().await, before);
    assert_eq!(funnel.take_toasts().await[0].title, "Erro ao excluir lead");
}

#[tokio::test]
async fn load_distributes_leads_over_columns() {
    let server = MockServer::start().await;
    let opsboard = client(&server);
    let funnel = opsboard.funnel();

    Mock::given(method("GET"))
        .and(path("/api/v1/kanban-columns"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!([
            {"id": C2, "title": "Proposta", "order": 1, "color": "#ff0000"},
            {"id": C1, "title": "Novos", "order": 0}
        ])))
        .expect(1)
        .mount(&server)
        .await;
    Mock::given(method("GET"))
        .and(path("/api/v1/leads"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!([
            {"id": L1, "nome": "Ana", "status": "FREE", "column_id": C1,
             "data_cadastro": "2024-01-10T08:00:00"},
            {"id": L2, "nome": "Bruno", "status": "CLOSED", "column_id": null,
             "created_at": "2024-01-11T08:00:00Z"},
            {"id": "8a1f3c5e-2b4d-4e6f-8a0c-1e3f5a7c9b2d", "nome": "Carla",
             "column_id": "ffffffff-0000-4000-8000-000000000000",
             "created_at": "2024-01-12T08:00:00Z"}
        ])))
        .expect(1)
        .mount(&server)
        .await;

    funnel.load().await.unwrap();

    assert_eq!(funnel.load_state().await, LoadState::Ready);
    let state = funnel.snapshot().await;
    assert_eq!(state.columns.len(), 2);
    assert_eq!(state.columns[0].title, "Novos");
    assert_eq!(ids(&state.columns[0].leads), [L1]);
    assert!(state.columns[1].leads.is_empty());
    assert_eq!(state.backlog.len(), 2);
    assert!(state.backlog.iter().all(|l| l.column_id.is_none()));
    assert_eq!(state.backlog[0].status, LeadStatus::Closed);
}

#[tokio::test]
async fn load_keeps_backlog_when_columns_fail() {
    let server = MockServer::start().await;
    let opsboard = client(&server);
    let funnel = opsboard.funnel();

    Mock::given(method("GET"))
        .and(path("/api/v1/kanban-columns"))
        .respond_with(ResponseTemplate::new(503))
        .mount(&server)
        .await;
    Mock::given(method("GET"))
        .and(path("/api/v1/leads"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!([
            {"id": L1, "nome": "Ana", "column_id": C1, "created_at": "2024-01-10"},
            {"id": L2, "nome": "Bruno", "created_at": "2024-01-11"}
        ])))
        .mount(&server)
        .await;

    funnel.load().await.unwrap();

    let state = funnel.snapshot().await;
    assert!(state.columns.is_empty());
    assert_eq!(ids(&state.backlog), [L2]);
    let toasts = funnel.take_toasts().await;
    assert_eq!(toasts[0].description, "503: Service Unavailable");
}

#[tokio::test]
async fn failed_load_can_be_retried() {
    let server = MockServer::start().await;
    let opsboard = client(&server);
    let funnel = opsboard.funnel();

    Mock::given(method("GET"))
        .and(path("/api/v1/kanban-columns"))
        .respond_with(ResponseTemplate::new(500).set_body_json(json!({"message": "db down"})))
        .up_to_n_times(1)
        .mount(&server)
        .await;
    Mock::given(method("GET"))
        .and(path("/api/v1/leads"))
        .respond_with(ResponseTemplate::new(500).set_body_json(json!({"message": "db down"})))
        .up_to_n_times(1)
        .mount(&server)
        .await;

    assert!(funnel.load().await.is_err());
    assert_eq!(funnel.load_state().await.error(), Some("db down"));

    Mock::given(method("GET"))
        .and(path("/api/v1/kanban-columns"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!([
            {"id": C1, "title": "Novos", "order": 0}
        ])))
        .mount(&server)
        .await;
    Mock::given(method("GET"))
        .and(path("/api/v1/leads"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!([])))
        .mount(&server)
        .await;

    funnel.retry().await.unwrap();
    assert_eq!(funnel.load_state().await, LoadState::Ready);
    assert_eq!(funnel.snapshot().await.columns.len(), 1);
}

#[tokio::test]
async fn created_lead_gets_the_server_id() {
    let server = MockServer::start().await;
    let opsboard = client(&server);
    let funnel = seeded(&opsboard);

    Mock::given(method("POST"))
        .and(path("/api/v1/leads"))
        .respond_with(ResponseTemplate::new(201).set_body_json(json!({
            "id": "8a1f3c5e-2b4d-4e6f-8a0c-1e3f5a7c9b2d",
            "nome": "Nova Loja",
            "status": "FREE",
            "column_id": "col-2",
            "data_cadastro": "2024-06-01T12:00:00"
        })))
        .expect(1)
        .mount(&server)
        .await;

    let id = funnel
        .create_lead(LeadDraft::new("Nova Loja"), Some(RecordId::parse("col-2")))
        .await
        .unwrap();

    assert!(id.is_persisted());
    let state = funnel.snapshot().await;
    let column = state.column(&RecordId::parse("col-2")).unwrap();
    assert_eq!(ids(&column.leads), [L2.to_string(), id.to_string()]);
    assert!(column.leads.iter().all(|l| l.id.is_persisted()));
}

#[tokio::test]
async fn failed_create_drops_the_placeholder() {
    let server = MockServer::start().await;
    let opsboard = client(&server);
    let funnel = seeded(&opsboard);
    let before = funnel.snapshot().await;

    Mock::given(method("POST"))
        .and(path("/api/v1/leads"))
        .respond_with(ResponseTemplate::new(422).set_body_json(json!({"detail": "nome inválido"})))
        .expect(1)
        .mount(&server)
        .await;

    let result = funnel.create_lead(LeadDraft::new(""), None).await;

    assert!(result.is_err());
    assert_eq!(funnel.snapshot().await, before);
    assert_eq!(funnel.take_toasts().await[0].description, "nome inválido");
}

#[tokio::test]
async fn deleting_a_column_moves_its_leads_to_the_backlog() {
    let server = MockServer::start().await;
    let opsboard = client(&server);
    let funnel = FunnelBoard::with_state(
        opsboard.api().clone(),
        BoardState::new(vec![column(C1, 0, &[L1]), column(C2, 1, &[])], vec![]),
    );

    Mock::given(method("DELETE"))
        .and(path(format!("/api/v1/kanban-columns/{}", C1)))
        .respond_with(ResponseTemplate::new(200))
        .expect(1)
        .mount(&server)
        .await;

    funnel.delete_column(&RecordId::parse(C1)).await.unwrap();

    let state = funnel.snapshot().await;
    assert_eq!(state.columns.len(), 1);
    assert_eq!(ids(&state.backlog), [L1]);
    assert_eq!(state.backlog[0].column_id, None);
}

#[tokio::test]
async fn refused_column_delete_restores_column_and_leads() {
    let server = MockServer::start().await;
    let opsboard = client(&server);
    let funnel = FunnelBoard::with_state(
        opsboard.api().clone(),
        BoardState::new(vec![column(C1, 0, &[L1]), column(C2, 1, &[L2])], vec![]),
    );
    let before = funnel.snapshot().await;

    Mock::given(method("DELETE"))
        .and(path(format!("/api/v1/kanban-columns/{}", C2)))
        .respond_with(ResponseTemplate::new(409).set_body_string("column in use"))
        .expect(1)
        .mount(&server)
        .await;

    let err = funnel.delete_column(&RecordId::parse(C2)).await.unwrap_err();

    assert_eq!(err.status(), Some(409));
    assert_eq!(funnel.snapshot().await, before);
    assert_eq!(funnel.take_toasts().await[0].title, "Erro ao excluir coluna");
}

#[tokio::test]
async fn new_column_goes_to_the_far_right() {
    let server = MockServer::start().await;
    let opsboard = client(&server);
    let funnel = seeded(&opsboard);

    Mock::given(method("POST"))
        .and(path("/api/v1/kanban-columns"))
        .and(body_json(json!({"title": "Fechamento", "order": 2, "color": null})))
        .respond_with(ResponseTemplate::new(201).set_body_json(json!({
            "id": C1, "title": "Fechamento", "order": 2
        })))
        .expect(1)
        .mount(&server)
        .await;

    let id = funnel
        .create_column(ColumnDraft {
            title: "Fechamento".into(),
            ..ColumnDraft::default()
        })
        .await
        .unwrap();

    let state = funnel.snapshot().await;
    assert_eq!(id, RecordId::parse(C1));
    assert_eq!(state.columns.last().map(|c| c.id.clone()), Some(id));
}

#[tokio::test]
async fn reorder_sends_every_persisted_column() {
    let server = MockServer::start().await;
    let opsboard = client(&server);
    let funnel = FunnelBoard::with_state(
        opsboard.api().clone(),
        BoardState::new(vec![column(C1, 0, &[]), column(C2, 5, &[])], vec![]),
    );

    Mock::given(method("POST"))
        .and(path("/api/v1/kanban-columns/reorder"))
        .and(body_json(json!({"columns": [
            {"id": C2, "order": 0},
            {"id": C1, "order": 1}
        ]})))
        .respond_with(ResponseTemplate::new(200))
        .expect(1)
        .mount(&server)
        .await;

    funnel
        .reorder_columns(vec![RecordId::parse(C2), RecordId::parse(C1)])
        .await
        .unwrap();

    let state = funnel.snapshot().await;
    assert_eq!(state.columns[0].id, RecordId::parse(C2));
}

/// Two persisted columns: C1 holds L1, C2 holds L2.
fn persisted(opsboard: &Opsboard) -> FunnelBoard {
    FunnelBoard::with_state(
        opsboard.api().clone(),
        BoardState::new(
            vec![column(C1, 0, &[L1]), column(C2, 1, &[L2])],
            Vec::new(),
        ),
    )
}

fn column_ids(state: &BoardState) -> Vec<String> {
    state.columns.iter().map(|c| c.id.to_string()).collect()
}

fn rename_and_close() -> LeadPatch {
    LeadPatch {
        nome: Some("Padaria Nova".to_string()),
        email: Some(Some("contato@padaria.com".to_string())),
        status: Some(LeadStatus::Closed),
        tags: Some(vec!["vip".to_string()]),
        observacoes: Some(Some("ligar segunda".to_string())),
        ..LeadPatch::default()
    }
}

#[tokio::test]
async fn lead_edit_is_saved_with_every_field() {
    let server = MockServer::start().await;
    let opsboard = client(&server);
    let funnel = persisted(&opsboard);

    Mock::given(method("PUT"))
        .and(path(format!("/api/v1/leads/{}", L1)))
        .and(body_partial_json(json!({
            "nome": "Padaria Nova",
            "email": "contato@padaria.com",
            "status": "CLOSED",
            "tags": ["vip"],
            "column_id": C1
        })))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "id": L1,
            "nome": "Padaria Nova",
            "status": "CLOSED",
            "column_id": C1,
            "data_cadastro": "2024-03-01T12:00:00"
        })))
        .expect(1)
        .mount(&server)
        .await;

    funnel
        .update_lead(&RecordId::parse(L1), rename_and_close())
        .await
        .unwrap();

    let state = funnel.snapshot().await;
    let lead = state.lead(&RecordId::parse(L1)).unwrap();
    assert_eq!(lead.nome, "Padaria Nova");
    assert_eq!(lead.status, LeadStatus::Closed);
    assert_eq!(lead.observacoes.as_deref(), Some("ligar segunda"));
    assert_eq!(lead.data_cadastro.to_rfc3339(), "2024-03-01T12:00:00+00:00");
    assert!(funnel.take_toasts().await.is_empty());
}

#[tokio::test]
async fn refused_lead_edit_restores_every_field() {
    let server = MockServer::start().await;
    let opsboard = client(&server);
    let funnel = persisted(&opsboard);
    let before = funnel.snapshot().await;

    Mock::given(method("PUT"))
        .and(path(format!("/api/v1/leads/{}", L1)))
        .respond_with(
            ResponseTemplate::new(500).set_body_json(json!({"detail": "Erro interno"})),
        )
        .expect(1)
        .mount(&server)
        .await;

    let err = funnel
        .update_lead(&RecordId::parse(L1), rename_and_close())
        .await
        .unwrap_err();

    assert_eq!(err.to_string(), "Erro interno");
    assert_eq!(funnel.snapshot().await, before);
    let toasts = funnel.take_toasts().await;
    assert_eq!(toasts.len(), 1);
    assert_eq!(toasts[0].title, "Erro ao salvar lead");
    assert_eq!(toasts[0].description, "Erro interno");
}

#[tokio::test]
async fn column_edit_resorts_and_is_saved() {
    let server = MockServer::start().await;
    let opsboard = client(&server);
    let funnel = persisted(&opsboard);

    Mock::given(method("PUT"))
        .and(path(format!("/api/v1/kanban-columns/{}", C1)))
        .and(body_json(json!({"title": "Fechamento", "order": 5, "color": "#22c55e"})))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "id": C1,
            "title": "Fechamento",
            "order": 5,
            "color": "#22c55e"
        })))
        .expect(1)
        .mount(&server)
        .await;

    let patch = ColumnPatch {
        title: Some("Fechamento".to_string()),
        order: Some(5),
        color: Some(Some("#22c55e".to_string())),
        ..ColumnPatch::default()
    };
    funnel.update_column(&RecordId::parse(C1), patch).await.unwrap();

    let state = funnel.snapshot().await;
    assert_eq!(column_ids(&state), [C2, C1]);
    assert_eq!(state.columns[1].title, "Fechamento");
    assert!(funnel.take_toasts().await.is_empty());
}

#[tokio::test]
async fn refused_column_edit_is_undone_and_unsorted() {
    let server = MockServer::start().await;
    let opsboard = client(&server);
    let funnel = persisted(&opsboard);
    let before = funnel.snapshot().await;

    Mock::given(method("PUT"))
        .and(path(format!("/api/v1/kanban-columns/{}", C1)))
        .respond_with(
            ResponseTemplate::new(500)
                .set_body_json(json!({"detail": "Coluna bloqueada"}))
                .set_delay(Duration::from_millis(300)),
        )
        .expect(1)
        .mount(&server)
        .await;

    let pending = {
        let funnel = funnel.clone();
        tokio::spawn(async move {
            let patch = ColumnPatch {
                title: Some("Fechamento".to_string()),
                order: Some(5),
                ..ColumnPatch::default()
            };
            funnel.update_column(&RecordId::parse(C1), patch).await
        })
    };

    tokio::time::sleep(Duration::from_millis(100)).await;
    let during = funnel.snapshot().await;
    assert_eq!(column_ids(&during), [C2, C1]);
    assert_eq!(during.columns[1].title, "Fechamento");

    let result = pending.await.unwrap();
    assert!(result.is_err());
    let after = funnel.snapshot().await;
    assert_eq!(column_ids(&after), [C1, C2]);
    assert_eq!(after, before);

    let toasts = funnel.take_toasts().await;
    assert_eq!(toasts.len(), 1);
    assert_eq!(toasts[0].title, "Erro ao salvar coluna");
    assert_eq!(toasts[0].description, "Coluna bloqueada");
}

#[tokio::test]
async fn requests_use_the_id_spelling_the_server_issued() {
    let server = MockServer::start().await;
    let opsboard = client(&server);
    let upper = L1.to_uppercase();
    let funnel = FunnelBoard::with_state(
        opsboard.api().clone(),
        BoardState::new(vec![column(C1, 0, &[upper.as_str()])], Vec::new()),
    );

    Mock::given(method("DELETE"))
        .and(path(format!("/api/v1/leads/{}", upper)))
        .respond_with(ResponseTemplate::new(204))
        .expect(1)
        .mount(&server)
        .await;

    let outcome = funnel
        .handle_drag_end(&drag(&upper, (C1, 0), Some(("trash", 0))))
        .await;

    assert_eq!(outcome, DragOutcome::Deleted);
    assert_eq!(funnel.snapshot().await.lead_count(), 0);
}

#[tokio::test]
async fn load_skips_a_malformed_lead() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/api/v1/kanban-columns"))
        .respond_with(
            ResponseTemplate::new(200).set_body_json(json!([{"id": C1, "title": "Contato", "order": 0}])),
        )
        .mount(&server)
        .await;
    Mock::given(method("GET"))
        .and(path("/api/v1/leads"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!([
            {"id": L1, "nome": "Ana", "status": "FREE", "column_id": C1},
            {"id": L2, "nome": "Bia", "status": "ARCHIVED", "column_id": C1}
        ])))
        .mount(&server)
        .await;

    let funnel = client(&server).funnel();
    funnel.load().await.unwrap();

    let state = funnel.snapshot().await;
    assert_eq!(funnel.load_state().await, LoadState::Ready);
    assert_eq!(ids(&state.columns[0].leads), [L1]);
    assert!(funnel.take_toasts().await.is_empty());
}
