//! Stream session tests against a real HTTP server using wiremock.
//!
//! These exercise the reqwest transport end to end: status handling, body
//! text fallbacks, streamed frames and cancellation.

mod common;

use std::sync::Arc;
use std::time::Duration;

use agent_stream::adapters::ReqwestHttpClient;
use agent_stream::agent::{QueryRequest, TurnOutcome, QUERY_STREAM_ENDPOINT};
use agent_stream::cli::Conversation;
use agent_stream::config::ClientConfig;
use agent_stream::error::StreamError;
use agent_stream::session::{SessionOutcome, SessionRequest};
use agent_stream::sse::Payload;
use common::{agent_transcript, agent_transcript_kinds, collect_events, kinds, sse_frame};
use serde_json::json;
use tokio_util::sync::CancellationToken;
use wiremock::matchers::{body_json, header, method, path};
use wiremock::{Mock, MockServer, ResponseTemplate};

fn sse_response(body: String) -> ResponseTemplate {
    ResponseTemplate::new(200).set_body_raw(body, "text/event-stream")
}

fn config_for(server: &MockServer) -> ClientConfig {
    ClientConfig::default().with_base_url(server.uri())
}

fn query_request(query: &str) -> SessionRequest {
    SessionRequest::new(QUERY_STREAM_ENDPOINT)
        .with_json(&QueryRequest::new(query))
        .unwrap()
}

#[tokio::test]
async fn test_streams_all_events() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path("/query/stream"))
        .and(header("Accept", "text/event-stream"))
        .and(body_json(json!({"query": "what is tokio?", "session_id": null})))
        .respond_with(sse_response(agent_transcript()))
        .mount(&server)
        .await;

    let (result, events) = collect_events(
        ReqwestHttpClient::new(),
        config_for(&server),
        query_request("what is tokio?"),
    )
    .await;

    assert_eq!(result, Ok(SessionOutcome::Completed { events: 4 }));
    assert_eq!(kinds(&events), agent_transcript_kinds());
    assert_eq!(
        events[3].payload,
        Payload::Json(json!({"session_id": "sess-1"}))
    );
}

#[tokio::test]
async fn test_raw_text_payloads_and_default_kind() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path("/query/stream"))
        .respond_with(sse_response(
            "data: hello\r\ndata: world\r\n\r\n: comment\n\nevent: status\ndata: {bad json\n\n"
                .to_string(),
        ))
        .mount(&server)
        .await;

    let (result, events) =
        collect_events(ReqwestHttpClient::new(), config_for(&server), query_request("hi")).await;

    assert!(result.is_ok());
    assert_eq!(kinds(&events), vec!["message", "status"]);
    assert_eq!(events[0].payload, Payload::Text("hello\nworld".to_string()));
    assert_eq!(events[1].payload, Payload::Text("{bad json".to_string()));
}

#[tokio::test]
async fn test_error_status_uses_body_text() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .respond_with(ResponseTemplate::new(500).set_body_string("agent crashed"))
        .mount(&server)
        .await;

    let (result, events) =
        collect_events(ReqwestHttpClient::new(), config_for(&server), query_request("hi")).await;

    assert_eq!(
        result,
        Err(StreamError::OpenFailed {
            status: 500,
            message: "agent crashed".to_string()
        })
    );
    assert!(events.is_empty());
}

#[tokio::test]
async fn test_error_status_without_body() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .respond_with(ResponseTemplate::new(503))
        .mount(&server)
        .await;

    let (result, _) =
        collect_events(ReqwestHttpClient::new(), config_for(&server), query_request("hi")).await;

    let error = result.unwrap_err();
    assert_eq!(error.user_message(), "Stream error: 503");
    assert!(error.is_retryable());
}

#[tokio::test]
async fn test_no_content_is_streaming_unsupported() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .respond_with(ResponseTemplate::new(204))
        .mount(&server)
        .await;

    let (result, _) =
        collect_events(ReqwestHttpClient::new(), config_for(&server), query_request("hi")).await;

    assert_eq!(result, Err(StreamError::StreamingUnsupported));
}

#[tokio::test]
async fn test_connection_refused_is_transport_error() {
    let config = ClientConfig::default().with_base_url("http://127.0.0.1:1");

    let (result, events) =
        collect_events(ReqwestHttpClient::new(), config, query_request("hi")).await;

    let error = result.unwrap_err();
    assert!(matches!(error, StreamError::Transport { .. }));
    assert_eq!(error.user_message(), "Error: Could not reach agent.");
    assert!(events.is_empty());
}

#[tokio::test]
async fn test_cancel_while_waiting_for_response() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .respond_with(sse_response(agent_transcript()).set_delay(Duration::from_secs(10)))
        .mount(&server)
        .await;

    let token = CancellationToken::new();
    let canceller = token.clone();
    tokio::spawn(async move {
        tokio::time::sleep(Duration::from_millis(100)).await;
        canceller.cancel();
    });

    let started = std::time::Instant::now();
    let (result, events) = collect_events(
        ReqwestHttpClient::new(),
        config_for(&server),
        query_request("hi").with_cancel(token),
    )
    .await;

    assert_eq!(result, Ok(SessionOutcome::Cancelled { events: 0 }));
    assert!(events.is_empty());
    assert!(started.elapsed() < Duration::from_secs(5));
}

#[tokio::test]
async fn test_turn_completes_and_carries_session() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path("/query/stream"))
        .and(body_json(json!({"query": "follow up", "session_id": "sess-1"})))
        .respond_with(sse_response(sse_frame("done", &json!({"session_id": "sess-2"}))))
        .mount(&server)
        .await;
    Mock::given(method("POST"))
        .and(path("/query/stream"))
        .and(body_json(json!({"query": "what is tokio?", "session_id": null})))
        .respond_with(sse_response(agent_transcript()))
        .mount(&server)
        .await;

    let client = Arc::new(ReqwestHttpClient::new());
    let mut conversation = Conversation::new(client, config_for(&server), QUERY_STREAM_ENDPOINT);
    let mut out = Vec::new();

    let first = conversation
        .ask("what is tokio?", CancellationToken::new(), &mut out)
        .await
        .unwrap();
    assert_eq!(
        first,
        TurnOutcome::Completed {
            answer: Some("Tokio is an async runtime. ✓ café".to_string()),
            session_id: Some("sess-1".to_string())
        }
    );

    let second = conversation
        .ask("follow up", CancellationToken::new(), &mut out)
        .await
        .unwrap();
    assert_eq!(second.session_id(), Some("sess-2"));

    let text = String::from_utf8(out).unwrap();
    assert!(text.contains("Searching the graph"));
    assert!(text.contains("Action: look up tokio"));
}

#[tokio::test]
async fn test_turn_without_terminal_event_is_connection_lost() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .respond_with(sse_response(sse_frame("status", &json!({"stage": "plan"}))))
        .mount(&server)
        .await;

    let client = Arc::new(ReqwestHttpClient::new());
    let mut conversation = Conversation::new(client, config_for(&server), QUERY_STREAM_ENDPOINT);

    let outcome = conversation
        .ask("hi", CancellationToken::new(), &mut Vec::new())
        .await
        .unwrap();
    assert_eq!(outcome, TurnOutcome::ConnectionLost);
    assert_eq!(outcome.to_error(), Some(StreamError::ConnectionLost));
}

#[tokio::test]
async fn test_backend_error_event_fails_turn() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .respond_with(sse_response(sse_frame(
            "error",
            &json!({"message": "model overloaded"}),
        )))
        .mount(&server)
        .await;

    let client = Arc::new(ReqwestHttpClient::new());
    let mut conversation = Conversation::new(client, config_for(&server), QUERY_STREAM_ENDPOINT);

    let outcome = conversation
        .ask("hi", CancellationToken::new(), &mut Vec::new())
        .await
        .unwrap();
    assert_eq!(
        outcome,
        TurnOutcome::Failed {
            message: "model overloaded".to_string()
        }
    );
}
