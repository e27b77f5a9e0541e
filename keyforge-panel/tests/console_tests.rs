mod common;

use common::{login, panel, password};
use keyforge_panel::console::{self, Response, status_code};
use keyforge_panel::{Panel, PanelError};
use keyforge_types::Role;
use pretty_assertions::assert_eq;
use serde_json::json;

fn send(panel: &Panel, request: serde_json::Value) -> Response {
    console::handle_line(panel, &request.to_string())
}

fn bearer(token: &str) -> String {
    format!("Bearer {token}")
}

fn error_kind(response: &Response) -> &str {
    response.error.as_ref().map(|e| e.kind.as_str()).unwrap_or("")
}

// ── Status mapping ───────────────────────────────────────────────

#[test]
fn status_codes() {
    assert_eq!(status_code(&PanelError::InvalidInput("x".into())), 400);
    assert_eq!(status_code(&PanelError::InsufficientFunds { required: 2, available: 1 }), 400);
    assert_eq!(status_code(&PanelError::Unauthenticated), 401);
    assert_eq!(status_code(&PanelError::Forbidden("x".into())), 403);
    assert_eq!(status_code(&PanelError::NotFound("x".into())), 404);
    assert_eq!(status_code(&PanelError::ServiceUnavailable), 503);
    assert_eq!(status_code(&PanelError::Internal("x".into())), 500);
}

// ── Requests ─────────────────────────────────────────────────────

#[test]
fn login_then_issue() {
    let panel = panel(100);
    let login = send(
        &panel,
        json!({"op": "login", "username": "admin", "password": password(Role::Admin)}),
    );
    assert_eq!(login.status, 200);
    let body = login.body.unwrap();
    assert_eq!(body["role"], "admin");
    assert_eq!(body["balance"], 100);
    let token = body["token"].as_str().unwrap().to_string();

    let issued = send(
        &panel,
        json!({
            "op": "issue_key",
            "authorization": bearer(&token),
            "class": "vip",
            "duration": "7days",
            "device_slots": 2
        }),
    );
    assert_eq!(issued.status, 200);
    let body = issued.body.unwrap();
    assert_eq!(body["balance"], 70);
    assert_eq!(body["cost"], 30);
    assert_eq!(body["key"]["id"], 1);
    assert_eq!(body["key"]["class"], "VIP");
    assert_eq!(body["key"]["duration"], "7 Days");
    assert_eq!(body["key"]["device_slots"], 2);
    assert_eq!(body["key"]["status"], "active");
}

#[test]
fn device_slots_default_to_one() {
    let panel = panel(100);
    let token = login(&panel, Role::Admin);
    let issued = send(
        &panel,
        json!({"op": "issue_key", "authorization": bearer(&token), "class": "Free", "duration": "1 Day"}),
    );
    assert_eq!(issued.body.unwrap()["key"]["device_slots"], 1);
}

#[test]
fn panel_and_revoke() {
    let panel = panel(100);
    let token = login(&panel, Role::SuperAdmin);
    send(
        &panel,
        json!({"op": "issue_key", "authorization": bearer(&token), "class": "Free", "duration": "2 Days"}),
    );

    let revoked = send(&panel, json!({"op": "revoke_key", "authorization": bearer(&token), "key_id": 1}));
    assert_eq!(revoked.status, 200);
    assert_eq!(revoked.body.unwrap()["status"], "revoked");

    let snapshot = send(&panel, json!({"op": "panel", "authorization": bearer(&token)}));
    let body = snapshot.body.unwrap();
    assert_eq!(body["balance"], 95);
    assert_eq!(body["maintenance"], false);
    assert_eq!(body["keys"], json!([]));

    let again = send(&panel, json!({"op": "revoke_key", "authorization": bearer(&token), "key_id": 1}));
    assert_eq!(again.status, 404);
    assert_eq!(error_kind(&again), "not_found");
}

#[test]
fn provision_and_inspect() {
    let panel = panel(0);
    let token = login(&panel, Role::Admin);

    let created = send(
        &panel,
        json!({
            "op": "provision_operator",
            "authorization": bearer(&token),
            "username": "shop",
            "password": "pw",
            "role": "reseller",
            "initial_balance": 20
        }),
    );
    assert_eq!(created.status, 200);
    let owner = created.body.unwrap()["operator_id"].as_u64().unwrap();

    let listing = send(&panel, json!({"op": "operators", "authorization": bearer(&token)}));
    let rows = listing.body.unwrap();
    let shop = rows.as_array().unwrap().iter().find(|row| row["username"] == "shop").unwrap();
    assert_eq!(shop["balance"], 20);

    let keys = send(
        &panel,
        json!({"op": "operator_keys", "authorization": bearer(&token), "owner": owner}),
    );
    assert_eq!(keys.status, 200);
    assert_eq!(keys.body.unwrap(), json!([]));
}

#[test]
fn toggle_maintenance_over_console() {
    let panel = panel(0);
    let token = login(&panel, Role::Admin);

    let toggled = send(&panel, json!({"op": "toggle_maintenance", "authorization": bearer(&token)}));
    assert_eq!(toggled.body.unwrap(), json!({"active": true}));

    let refused = send(
        &panel,
        json!({"op": "login", "username": "moderator", "password": password(Role::Moderator)}),
    );
    assert_eq!(refused.status, 503);
    assert_eq!(error_kind(&refused), "service_unavailable");
}

// ── Failures ─────────────────────────────────────────────────────

#[test]
fn malformed_line_is_bad_request() {
    let panel = panel(0);
    for line in ["not json", "{}", r#"{"op":"fly"}"#, r#"{"op":"login","username":"a"}"#] {
        let response = console::handle_line(&panel, line);
        assert_eq!(response.status, 400, "line {line}");
        assert_eq!(error_kind(&response), "invalid_input");
        assert!(response.body.is_none());
    }
}

#[test]
fn unknown_labels_are_bad_request() {
    let panel = panel(100);
    let token = login(&panel, Role::Admin);

    let bad_class = send(
        &panel,
        json!({"op": "issue_key", "authorization": bearer(&token), "class": "Gold", "duration": "1 Day"}),
    );
    assert_eq!(bad_class.status, 400);

    let bad_duration = send(
        &panel,
        json!({"op": "issue_key", "authorization": bearer(&token), "class": "VIP", "duration": "3 Days"}),
    );
    assert_eq!(bad_duration.status, 400);

    let bad_role = send(
        &panel,
        json!({"op": "provision_operator", "authorization": bearer(&token),
               "username": "x", "password": "y", "role": "owner"}),
    );
    assert_eq!(bad_role.status, 400);
}

#[test]
fn authorization_header_must_be_bearer() {
    let panel = panel(0);
    let token = login(&panel, Role::Admin);

    let missing = send(&panel, json!({"op": "panel"}));
    assert_eq!(missing.status, 401);
    assert_eq!(error_kind(&missing), "unauthenticated");

    let wrong_scheme = send(&panel, json!({"op": "panel", "authorization": format!("Basic {token}")}));
    assert_eq!(wrong_scheme.status, 401);

    let bare = send(&panel, json!({"op": "panel", "authorization": token}));
    assert_eq!(bare.status, 401);

    let lowercase = send(&panel, json!({"op": "panel", "authorization": format!("bearer {token}")}));
    assert_eq!(lowercase.status, 200);
}

#[test]
fn forbidden_and_insufficient_funds() {
    let panel = panel(5);
    let user = login(&panel, Role::User);
    let moderator = login(&panel, Role::Moderator);

    let forbidden = send(&panel, json!({"op": "panel", "authorization": bearer(&user)}));
    assert_eq!(forbidden.status, 403);
    assert_eq!(error_kind(&forbidden), "forbidden");

    let broke = send(
        &panel,
        json!({"op": "issue_key", "authorization": bearer(&moderator), "class": "VIP", "duration": "1 Day"}),
    );
    assert_eq!(broke.status, 400);
    assert_eq!(error_kind(&broke), "insufficient_funds");
}

// ── Loop ─────────────────────────────────────────────────────────

#[tokio::test]
async fn run_answers_each_line() {
    let panel = panel(100);
    let token = login(&panel, Role::Admin);
    let input = format!(
        "{}\n\n{}\nnot json\n",
        json!({"op": "panel", "authorization": bearer(&token)}),
        json!({"op": "issue_key", "authorization": bearer(&token), "class": "VIP", "duration": "1 Day"}),
    );

    let mut output = Vec::new();
    let handled = console::run(&panel, input.as_bytes(), &mut output).await.unwrap();
    assert_eq!(handled, 3);

    let responses: Vec<Response> = String::from_utf8(output)
        .unwrap()
        .lines()
        .map(|line| serde_json::from_str(line).unwrap())
        .collect();
    let statuses: Vec<u16> = responses.iter().map(|r| r.status).collect();
    assert_eq!(statuses, vec![200, 200, 400]);
    assert_eq!(responses[1].body.as_ref().unwrap()["balance"], 94);
}

#[tokio::test]
async fn run_on_empty_input() {
    let panel = panel(0);
    let mut output = Vec::new();
    let handled = console::run(&panel, &b""[..], &mut output).await.unwrap();
    assert_eq!(handled, 0);
    assert!(output.is_empty());
}
