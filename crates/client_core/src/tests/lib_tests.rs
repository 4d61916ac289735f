use super::*;
use axum::{
    extract::State,
    http::StatusCode,
    response::{IntoResponse, Response},
    routing::post,
    Json, Router,
};
use serde_json::{json, Value};
use shared::domain::{Metal, PollutionIndex};
use std::sync::Arc;
use tokio::{net::TcpListener, sync::Mutex};

#[derive(Clone)]
enum Reply {
    Json(StatusCode, Value),
    Text(StatusCode, &'static str),
}

#[derive(Clone)]
struct ServerState {
    received: Arc<Mutex<Vec<Value>>>,
    reply: Reply,
}

async fn handle_calculate(State(state): State<ServerState>, Json(body): Json<Value>) -> Response {
    state.received.lock().await.push(body);
    match state.reply {
        Reply::Json(status, value) => (status, Json(value)).into_response(),
        Reply::Text(status, text) => (status, text).into_response(),
    }
}

async fn spawn_scoring_server(reply: Reply) -> (HttpScoringClient, Arc<Mutex<Vec<Value>>>) {
    std::env::set_var("NO_PROXY", "127.0.0.1,localhost");
    let listener = TcpListener::bind("127.0.0.1:0").await.expect("bind");
    let addr = listener.local_addr().expect("addr");
    let received = Arc::new(Mutex::new(Vec::new()));
    let state = ServerState {
        received: received.clone(),
        reply,
    };
    let app = Router::new()
        .route("/api/hmpi/calculate", post(handle_calculate))
        .with_state(state);
    tokio::spawn(async move {
        let _ = axum::serve(listener, app).await;
    });

    let endpoint = ClientSettings {
        scoring_url: format!("http://{addr}"),
    }
    .calculate_endpoint()
    .expect("endpoint");
    (HttpScoringClient::new(endpoint), received)
}

fn reference_response() -> Value {
    json!({
        "HPI": 45.678, "HEI": 12, "MI": 3.333, "Cd": 0.1, "Nemerow": 2,
        "classification": "Safe"
    })
}

#[tokio::test]
async fn posts_payload_and_returns_report_verbatim() {
    let (client, received) =
        spawn_scoring_server(Reply::Json(StatusCode::OK, reference_response())).await;

    let mut controller = SubmissionController::new();
    controller.edit(Metal::Arsenic, "0.5").expect("valid");
    controller.edit(Metal::Cadmium, "1.2").expect("valid");
    let ticket = controller.submit().expect("accepted");

    let report = execute_ticket(&client, &ticket).await.expect("report");

    assert_eq!(
        received.lock().await.as_slice(),
        &[json!({ "heavyMetalConcentrations": { "arsenic": 0.5, "cadmium": 1.2 } })]
    );
    assert_eq!(report.as_value(), &reference_response());
    assert_eq!(report.index(PollutionIndex::Hpi), Some(45.678));
}

#[tokio::test]
async fn error_status_with_json_body_replaces_previous_result() {
    let (good, _received) =
        spawn_scoring_server(Reply::Json(StatusCode::OK, reference_response())).await;
    let (rejecting, _received) = spawn_scoring_server(Reply::Json(
        StatusCode::BAD_REQUEST,
        json!({ "error": "Invalid input: heavyMetalConcentrations is required" }),
    ))
    .await;

    let mut controller = SubmissionController::new();
    controller.edit(Metal::Lead, "0.3").expect("valid");
    let first = controller.submit().expect("accepted");
    let outcome = execute_ticket(&good, &first).await;
    assert!(controller.settle(first.id, outcome).is_some());

    controller.edit(Metal::Lead, "").expect("empty is valid");
    let second = controller.submit().expect("accepted");
    let outcome = execute_ticket(&rejecting, &second).await;
    let report = outcome.clone().expect("json body is a result even on 400");
    assert_eq!(
        report.as_value(),
        &json!({ "error": "Invalid input: heavyMetalConcentrations is required" })
    );

    let reveal = controller.settle(second.id, outcome);
    assert_eq!(
        reveal,
        Some(RevealResult {
            delay: RESULT_REVEAL_DELAY
        })
    );
    let view = controller.view();
    let result = view.result.expect("result replaced");
    assert_eq!(result.value(PollutionIndex::Hpi), Some("N/A"));
    assert_eq!(result.classification.label, "N/A");
}

#[tokio::test]
async fn error_status_without_json_body_is_a_failure() {
    let (client, _received) = spawn_scoring_server(Reply::Text(
        StatusCode::INTERNAL_SERVER_ERROR,
        "worker crashed",
    ))
    .await;

    let err = client
        .calculate(&Default::default())
        .await
        .expect_err("500 is a failure");

    assert_eq!(
        err,
        ScoringError::Status {
            status: 500,
            message: "worker crashed".into(),
        }
    );
}

#[tokio::test]
async fn non_json_success_body_is_decode_error() {
    let (client, _received) =
        spawn_scoring_server(Reply::Text(StatusCode::OK, "<html>maintenance</html>")).await;

    let err = client
        .calculate(&Default::default())
        .await
        .expect_err("not json");

    assert!(matches!(err, ScoringError::Decode(_)), "got {err:?}");
}

#[tokio::test]
async fn shape_mismatched_success_body_is_still_a_report() {
    let (client, _received) =
        spawn_scoring_server(Reply::Json(StatusCode::OK, json!({ "HPI": "high" }))).await;

    let report = client
        .calculate(&Default::default())
        .await
        .expect("json body is accepted verbatim");

    let view = ResultView::from_report(&report);
    assert_eq!(view.value(PollutionIndex::Hpi), Some("N/A"));
    assert_eq!(view.classification.label, "N/A");
}

#[tokio::test]
async fn unreachable_service_is_transport_error() {
    std::env::set_var("NO_PROXY", "127.0.0.1,localhost");
    let listener = TcpListener::bind("127.0.0.1:0").await.expect("bind");
    let addr = listener.local_addr().expect("addr");
    drop(listener);

    let endpoint = ClientSettings {
        scoring_url: format!("http://{addr}"),
    }
    .calculate_endpoint()
    .expect("endpoint");
    let client = HttpScoringClient::new(endpoint);

    let err = client
        .calculate(&Default::default())
        .await
        .expect_err("nothing listening");

    assert!(matches!(err, ScoringError::Transport(_)), "got {err:?}");
    assert_eq!(err.code(), shared::error::ErrorCode::Transport);
}
