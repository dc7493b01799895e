#![allow(clippy::unwrap_used)]
// End-to-end tests: controllers driving a real `ApiClient` against wiremock.

use std::sync::Arc;
use std::time::Duration;

use serde_json::json;
use tokio::sync::mpsc::UnboundedReceiver;
use url::Url;
use wiremock::matchers::{body_json, method, path, query_param};
use wiremock::{Mock, MockServer, ResponseTemplate};

use mobierp_api::ApiClient;
use mobierp_core::{
    AutoConfirm, ChannelNotifier, ConfirmGate, Confirmer, Decision, DetailController,
    DetailState, EntityId, EntityKind, FocusBus, FormController, ListController, LoadPhase,
    NavEntry, Navigator, Notice, NoticeLevel, Outcome, PurchaseReceive, Route, ScreenContext,
    ScreenSubscription, Staff,
};

// ── Helpers ─────────────────────────────────────────────────────────

async fn setup(confirmer: Arc<dyn Confirmer>) -> (MockServer, ScreenContext, UnboundedReceiver<Notice>) {
    let server = MockServer::start().await;
    let base_url = Url::parse(&server.uri()).unwrap();
    let client = ApiClient::with_client(reqwest::Client::new(), base_url);
    let (notifier, rx) = ChannelNotifier::new();
    let ctx = ScreenContext::new(Arc::new(client), confirmer, Arc::new(notifier));
    (server, ctx, rx)
}

fn yes() -> Arc<dyn Confirmer> {
    Arc::new(AutoConfirm(Decision::Confirmed))
}

async fn mount_receives(server: &MockServer, body: serde_json::Value) {
    Mock::given(method("GET"))
        .and(path("/api/purchase-receives"))
        .respond_with(ResponseTemplate::new(200).set_body_json(body))
        .mount(server)
        .await;
}

/// Serve `body` for `GET /api/purchase-receives/<id>`, optionally slowly
/// and only for the next `times` requests.
async fn mount_receive(
    server: &MockServer,
    id: u64,
    body: serde_json::Value,
    delay_ms: u64,
    times: Option<u64>,
) {
    let mock = Mock::given(method("GET"))
        .and(path(format!("/api/purchase-receives/{id}")))
        .respond_with(
            ResponseTemplate::new(200)
                .set_body_json(body)
                .set_delay(Duration::from_millis(delay_ms)),
        );
    let mock = match times {
        Some(n) => mock.up_to_n_times(n),
        None => mock,
    };
    mock.mount(server).await;
}

async fn wait_for_requests(server: &MockServer, count: usize) {
    while server.received_requests().await.unwrap_or_default().len() < count {
        tokio::time::sleep(Duration::from_millis(5)).await;
    }
}

// ── List ────────────────────────────────────────────────────────────

#[tokio::test]
async fn list_load_sends_includes_and_order() {
    let (server, ctx, _rx) = setup(yes()).await;

    Mock::given(method("GET"))
        .and(path("/api/purchase-receives"))
        .and(query_param("orderBy", r#"[{"createdAt":"desc"}]"#))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "data": [
                { "id": 1, "code": "PO-001", "status": "draft",
                  "supplier": { "id": 3, "name": "Acme Corp" } }
            ]
        })))
        .expect(1)
        .mount(&server)
        .await;

    let list = ListController::<PurchaseReceive>::new(ctx);
    assert_eq!(list.load().await, Outcome::Applied);

    let items = list.derived_items();
    assert_eq!(items.len(), 1);
    assert_eq!(items[0].supplier.as_ref().unwrap().name, "Acme Corp");
}

#[tokio::test]
async fn failed_delete_keeps_record_and_notifies() {
    let (server, ctx, mut rx) = setup(yes()).await;
    mount_receives(
        &server,
        json!([
            { "id": 5, "code": "PO-005", "status": "draft" },
            { "id": 6, "code": "PO-006", "status": "draft" }
        ]),
    )
    .await;
    Mock::given(method("DELETE"))
        .and(path("/api/purchase-receives/5"))
        .respond_with(
            ResponseTemplate::new(500).set_body_json(json!({ "message": "database unavailable" })),
        )
        .expect(1)
        .mount(&server)
        .await;

    let list = ListController::<PurchaseReceive>::new(ctx);
    list.load().await;

    let outcome = list.remove(&EntityId::Number(5)).await;

    assert_eq!(outcome, Outcome::Failed);
    let view = list.snapshot();
    assert!(view.raw_items().iter().any(|r| r.id == EntityId::Number(5)));

    let notice = rx.recv().await.unwrap();
    assert_eq!(notice.level, NoticeLevel::Error);
    assert_eq!(notice.title, "Delete failed");
    assert!(notice.message.contains("database unavailable"));
}

#[tokio::test]
async fn confirmed_delete_reloads() {
    let (server, ctx, _rx) = setup(yes()).await;
    Mock::given(method("GET"))
        .and(path("/api/purchase-receives"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!([
            { "id": 5, "code": "PO-005", "status": "draft" }
        ])))
        .up_to_n_times(1)
        .mount(&server)
        .await;
    Mock::given(method("DELETE"))
        .and(path("/api/purchase-receives/5"))
        .respond_with(ResponseTemplate::new(204))
        .expect(1)
        .mount(&server)
        .await;

    let list = ListController::<PurchaseReceive>::new(ctx);
    list.load().await;
    mount_receives(&server, json!([])).await;

    assert_eq!(list.remove(&EntityId::Number(5)).await, Outcome::Applied);
    assert!(list.snapshot().raw_items().is_empty());
}

#[tokio::test]
async fn declined_prompt_sends_nothing() {
    let gate = Arc::new(ConfirmGate::new());
    let (server, ctx, _rx) = setup(gate.clone()).await;
    mount_receives(&server, json!([{ "id": 5, "code": "PO-005", "status": "draft" }])).await;
    Mock::given(method("DELETE"))
        .respond_with(ResponseTemplate::new(204))
        .expect(0)
        .mount(&server)
        .await;

    let list = ListController::<PurchaseReceive>::new(ctx);
    list.load().await;

    let (outcome, ()) = tokio::join!(list.remove(&EntityId::Number(5)), async {
        let mut visible = gate.subscribe();
        visible.wait_for(Option::is_some).await.unwrap();
        assert!(gate.pending().unwrap().prompt.message.contains("PO-005"));
        gate.dismiss();
    });

    assert_eq!(outcome, Outcome::Cancelled);
    assert_eq!(list.snapshot().raw_items().len(), 1);
}

#[tokio::test]
async fn transition_puts_status_then_reloads() {
    let (server, ctx, _rx) = setup(yes()).await;
    Mock::given(method("GET"))
        .and(path("/api/purchase-receives"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!([
            { "id": 8, "code": "PO-008", "status": "draft" }
        ])))
        .up_to_n_times(1)
        .mount(&server)
        .await;
    Mock::given(method("PUT"))
        .and(path("/api/purchase-receives/8"))
        .and(body_json(json!({ "status": "pending" })))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({ "id": 8 })))
        .expect(1)
        .mount(&server)
        .await;

    let list = ListController::<PurchaseReceive>::new(ctx);
    list.load().await;
    mount_receives(&server, json!([{ "id": 8, "code": "PO-008", "status": "pending" }])).await;

    let outcome = list.transition_status(&EntityId::Number(8), "pending").await;
    assert_eq!(outcome, Outcome::Applied);
    assert_eq!(list.snapshot().raw_items()[0].status.as_str(), "pending");
}

#[tokio::test]
async fn illegal_transition_never_reaches_backend() {
    let (server, ctx, mut rx) = setup(yes()).await;
    mount_receives(&server, json!([{ "id": 4, "code": "PO-004", "status": "completed" }])).await;
    Mock::given(method("PUT"))
        .respond_with(ResponseTemplate::new(200))
        .expect(0)
        .mount(&server)
        .await;

    let list = ListController::<PurchaseReceive>::new(ctx);
    list.load().await;

    let outcome = list.transition_status(&EntityId::Number(4), "cancelled").await;
    assert_eq!(outcome, Outcome::Rejected);
    let notice = rx.recv().await.unwrap();
    assert!(notice.message.contains("status is 'completed'"));
}

// ── Detail ──────────────────────────────────────────────────────────

#[tokio::test]
async fn detail_flattens_plural_relations() {
    let (server, ctx, _rx) = setup(yes()).await;
    Mock::given(method("GET"))
        .and(path("/api/staff/7"))
        .and(query_param("include", r#"{"positions":true,"teams":true}"#))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "data": {
                "id": 7,
                "code": "NV-007",
                "fullName": "Lan Tran",
                "positions": [{ "id": 2, "name": "Buyer" }],
                "teams": []
            }
        })))
        .mount(&server)
        .await;

    let detail = DetailController::<Staff>::new(ctx, EntityId::Number(7));
    assert_eq!(detail.load().await, Outcome::Applied);

    let staff = detail.record().unwrap();
    assert_eq!(staff.position.unwrap().name, "Buyer");
    assert!(staff.team.is_none());
}

#[tokio::test]
async fn detail_error_notifies_and_goes_back() {
    let (server, ctx, mut rx) = setup(yes()).await;
    Mock::given(method("GET"))
        .and(path("/api/staff/99"))
        .respond_with(ResponseTemplate::new(404))
        .mount(&server)
        .await;

    let nav = Navigator::new();
    nav.navigate(NavEntry::new(Route::list(EntityKind::Staff)));
    nav.navigate(NavEntry::new(Route::detail(EntityKind::Staff)).param("id", "99"));

    let detail = DetailController::<Staff>::new(ctx, EntityId::Number(99)).with_navigator(nav.clone());
    assert_eq!(detail.load().await, Outcome::Failed);

    assert!(matches!(detail.state(), DetailState::Error(_)));
    assert_eq!(nav.current().route, Route::list(EntityKind::Staff));
    assert_eq!(rx.recv().await.unwrap().title, "Could not load staff member");
}

#[tokio::test]
async fn detail_refocus_keeps_record_actionable() {
    let (server, ctx, _rx) = setup(yes()).await;
    mount_receive(
        &server,
        5,
        json!({ "data": { "id": 5, "code": "PO-005", "status": "draft" } }),
        0,
        Some(1),
    )
    .await;
    mount_receive(
        &server,
        5,
        json!({ "data": { "id": 5, "code": "PO-005", "status": "draft", "note": "rechecked" } }),
        300,
        None,
    )
    .await;
    Mock::given(method("DELETE"))
        .and(path("/api/purchase-receives/5"))
        .respond_with(ResponseTemplate::new(204))
        .expect(1)
        .mount(&server)
        .await;

    let detail = Arc::new(DetailController::<PurchaseReceive>::new(ctx, EntityId::Number(5)));
    assert_eq!(detail.load().await, Outcome::Applied);

    let bus = FocusBus::new();
    let sub = ScreenSubscription::attach(detail.clone(), &bus);
    let mut states = detail.subscribe();
    bus.gained();

    // ready -> loading: the last record stays available to act on.
    states.wait_for(|s| s.is_loading()).await.unwrap();
    assert_eq!(detail.record().unwrap().code, "PO-005");
    assert_eq!(detail.remove().await, Outcome::Applied);

    // loading -> ready with the refreshed record.
    let note = states
        .wait_for(|s| matches!(s, DetailState::Ready(_)))
        .await
        .unwrap()
        .record()
        .and_then(|r| r.note.clone());
    assert_eq!(note.as_deref(), Some("rechecked"));
    sub.close().await;
}

#[tokio::test]
async fn detail_discards_slow_earlier_response() {
    let (server, ctx, _rx) = setup(yes()).await;
    mount_receive(
        &server,
        7,
        json!({ "id": 7, "code": "PO-OLD", "status": "draft" }),
        300,
        Some(1),
    )
    .await;
    mount_receive(&server, 7, json!({ "id": 7, "code": "PO-NEW", "status": "draft" }), 0, None)
        .await;

    let detail = DetailController::<PurchaseReceive>::new(ctx, EntityId::Number(7));
    let (first, second) = tokio::join!(detail.load(), async {
        wait_for_requests(&server, 1).await;
        detail.load().await
    });

    assert_eq!(first, Outcome::Stale);
    assert_eq!(second, Outcome::Applied);
    assert_eq!(detail.record().unwrap().code, "PO-NEW");
    assert!(!detail.state().is_loading());
}

#[tokio::test]
async fn detail_close_mid_reload_keeps_record() {
    let (server, ctx, _rx) = setup(yes()).await;
    mount_receive(
        &server,
        3,
        json!({ "id": 3, "code": "PO-003", "status": "draft" }),
        0,
        Some(1),
    )
    .await;
    mount_receive(&server, 3, json!({ "id": 3, "code": "PO-003" }), 5_000, None).await;

    let detail = DetailController::<PurchaseReceive>::new(ctx, EntityId::Number(3));
    detail.load().await;
    let mut states = detail.subscribe();

    let (outcome, ()) = tokio::join!(detail.load(), async {
        states.wait_for(|s| s.is_loading()).await.unwrap();
        detail.close();
    });

    assert_eq!(outcome, Outcome::Cancelled);
    assert!(matches!(detail.state(), DetailState::Ready(_)));
}

#[tokio::test]
async fn actions_before_load_notify() {
    let (_server, ctx, mut rx) = setup(yes()).await;
    let detail = DetailController::<PurchaseReceive>::new(ctx, EntityId::Number(1));

    assert_eq!(detail.remove().await, Outcome::Rejected);
    assert_eq!(rx.recv().await.unwrap().title, "Not loaded");
}

// ── Focus ───────────────────────────────────────────────────────────

#[tokio::test]
async fn focus_gained_reloads_list() {
    let (server, ctx, _rx) = setup(yes()).await;
    mount_receives(&server, json!([{ "id": 1, "code": "PO-001", "status": "draft" }])).await;

    let list = Arc::new(ListController::<PurchaseReceive>::new(ctx));
    let bus = FocusBus::new();
    let sub = ScreenSubscription::attach(list.clone(), &bus);
    let mut views = list.subscribe();

    assert_eq!(bus.gained(), 1);
    views.wait_for(|v| !v.raw_items().is_empty()).await.unwrap();

    sub.close().await;
    assert_eq!(bus.gained(), 0);
}

#[tokio::test]
async fn closing_subscription_mid_fetch_clears_loading() {
    let (server, ctx, _rx) = setup(yes()).await;
    Mock::given(method("GET"))
        .and(path("/api/purchase-receives"))
        .respond_with(
            ResponseTemplate::new(200)
                .set_body_json(json!([]))
                .set_delay(Duration::from_secs(5)),
        )
        .mount(&server)
        .await;

    let list = Arc::new(ListController::<PurchaseReceive>::new(ctx));
    let bus = FocusBus::new();
    let sub = ScreenSubscription::attach(list.clone(), &bus);
    let mut views = list.subscribe();

    bus.gained();
    views.wait_for(|v| v.is_loading()).await.unwrap();
    sub.close().await;

    let view = list.snapshot();
    assert_eq!(view.phase(), LoadPhase::Idle);
    assert!(!view.is_loading());
}

// ── Form ────────────────────────────────────────────────────────────

#[tokio::test]
async fn form_create_posts_fields() {
    let (server, ctx, _rx) = setup(yes()).await;
    Mock::given(method("POST"))
        .and(path("/api/purchase-receives"))
        .and(body_json(json!({ "code": "PO-010", "supplierId": 3, "warehouseId": 1 })))
        .respond_with(ResponseTemplate::new(201).set_body_json(json!({
            "data": { "id": 10, "code": "PO-010", "status": "draft" }
        })))
        .expect(1)
        .mount(&server)
        .await;

    let draft: PurchaseReceive =
        serde_json::from_value(json!({ "id": 9, "code": "PO-009", "status": "draft" })).unwrap();
    let edit = FormController::edit(ctx.clone(), draft).unwrap();
    assert_eq!(edit.title(), "Edit purchase receive");

    let mut form = FormController::<PurchaseReceive>::create(ctx);
    assert_eq!(form.title(), "New purchase receive");
    form.set_field("code", "PO-010");
    assert_eq!(form.missing_fields(), vec!["supplierId", "warehouseId"]);

    form.set_field("supplierId", 3);
    form.set_field("warehouseId", 1);
    assert_eq!(form.submit().await, Outcome::Applied);
    assert_eq!(form.saved().unwrap().id, EntityId::Number(10));
}

#[tokio::test]
async fn form_refuses_to_edit_locked_record() {
    let (_server, ctx, mut rx) = setup(yes()).await;
    let locked: PurchaseReceive =
        serde_json::from_value(json!({ "id": 1, "code": "PO-001", "status": "approved" })).unwrap();

    assert!(FormController::edit(ctx, locked).is_none());
    assert_eq!(rx.recv().await.unwrap().title, "Not allowed");
}

#[tokio::test]
async fn incomplete_form_is_rejected_locally() {
    let (server, ctx, _rx) = setup(yes()).await;
    Mock::given(method("POST"))
        .respond_with(ResponseTemplate::new(201))
        .expect(0)
        .mount(&server)
        .await;

    let mut form = FormController::<PurchaseReceive>::create(ctx);
    form.set_field("code", "  ");
    assert_eq!(form.submit().await, Outcome::Rejected);
}
