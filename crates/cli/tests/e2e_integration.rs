//! End-to-end integration tests for the Herald command engine.
//!
//! These tests drive the public API from submitted text to the assembled
//! result, audit log and conversation, including a real Gemini dispatcher
//! talking to a local backend.

use std::sync::{Arc, Mutex};

use axum::Router;
use axum::routing::post;
use herald_config::AppConfig;
use herald_core::error::DispatchError;
use herald_core::{
    ContactChannel, Dispatcher, KnowledgeBase, KnowledgeEntry, ResultKind, TurnRole,
};
use herald_engine::{APOLOGY_TEXT, CONFIGURATION_GAP_TEXT, Engine, MemorySink, classify};
use herald_providers::GeminiDispatcher;

// ── Mock Dispatcher ─────────────────────────────────────────────────────

/// A mock dispatcher that records every call and replies with a fixed outcome.
struct RecordingDispatcher {
    reply: Result<String, DispatchError>,
    calls: Mutex<Vec<String>>,
}

impl RecordingDispatcher {
    fn ok(reply: &str) -> Arc<Self> {
        Self::with(Ok(reply.into()))
    }

    fn failing() -> Arc<Self> {
        Self::with(Err(DispatchError::Transport("connection refused".into())))
    }

    fn with(reply: Result<String, DispatchError>) -> Arc<Self> {
        Arc::new(Self {
            reply,
            calls: Mutex::new(Vec::new()),
        })
    }

    fn calls(&self) -> usize {
        self.calls.lock().unwrap().len()
    }
}

#[async_trait::async_trait]
impl Dispatcher for RecordingDispatcher {
    fn name(&self) -> &str {
        "e2e_mock"
    }

    async fn dispatch(&self, text: &str, _credential: &str) -> Result<String, DispatchError> {
        self.calls.lock().unwrap().push(text.to_string());
        self.reply.clone()
    }
}

fn knowledge(with_seavon: bool) -> KnowledgeBase {
    let entries = if with_seavon {
        vec![KnowledgeEntry::new(
            "seavon",
            "SEAVON PIERCE (#F-13921). Case 5:10-00310(VAP)CW.",
        )]
    } else {
        vec![]
    };
    KnowledgeBase::new(entries, vec![ContactChannel::voice("323-364-0769")], vec![])
}

fn engine(with_seavon: bool, dispatcher: Arc<RecordingDispatcher>) -> (Engine, Arc<MemorySink>) {
    let sink = Arc::new(MemorySink::new());
    let engine = Engine::builder()
        .knowledge(knowledge(with_seavon))
        .protect("seavon", 1)
        .social_targets(vec!["Facebook".into(), "X".into(), "Instagram".into()])
        .greeting("Online.")
        .dispatcher(dispatcher)
        .sink(sink.clone())
        .build();
    (engine, sink)
}

// ── Scenarios ───────────────────────────────────────────────────────────

#[tokio::test]
async fn e2e_scenario_a_donate_opens_payment_flow() {
    let mock = RecordingDispatcher::ok("unused");
    let (engine, _) = engine(true, mock.clone());

    let result = engine.submit("please donate money", None).await;
    assert_eq!(result.kind, ResultKind::PaymentPrompt);
    assert!(result.text.to_lowercase().contains("opening"));
    assert!(result.text.to_lowercase().contains("payment"));
    assert_eq!(mock.calls(), 0);
}

#[tokio::test]
async fn e2e_scenario_b_call_connects_voice_channel() {
    let mock = RecordingDispatcher::ok("unused");
    let (engine, _) = engine(true, mock.clone());

    let result = engine.submit("call me now", Some("key")).await;
    assert_eq!(result.kind, ResultKind::Text);
    assert!(result.text.contains("323-364-0769"));
    assert!(result.text.contains("Connected"));
    assert_eq!(mock.calls(), 0);
}

#[tokio::test]
async fn e2e_scenario_c_corroborated_subject_falls_through() {
    // No credential: configuration gap
    let mock = RecordingDispatcher::ok("Seavon's case is 5:10-00310.");
    let (engine, _) = engine(true, mock.clone());
    let result = engine.submit("tell me about seavon", None).await;
    assert_eq!(result.text, CONFIGURATION_GAP_TEXT);
    assert_eq!(mock.calls(), 0);

    // Credential: fallback
    let result = engine.submit("tell me about seavon", Some("key")).await;
    assert_eq!(result.text, "Seavon's case is 5:10-00310.");
    assert_eq!(mock.calls(), 1);
}

#[tokio::test]
async fn e2e_scenario_d_transport_failure_apologises() {
    let mock = RecordingDispatcher::failing();
    let (engine, sink) = engine(true, mock.clone());

    let result = engine.submit("xyz123", Some("key")).await;
    assert_eq!(result.text, APOLOGY_TEXT);
    assert_eq!(mock.calls(), 1);

    let lines = sink.lines();
    assert_eq!(lines.len(), 1);
    assert!(lines[0].starts_with("[ENGINE] Fallback.failed("));
}

#[tokio::test]
async fn e2e_scenario_e_empty_input_is_idle() {
    let mock = RecordingDispatcher::ok("unused");
    let (engine, _) = engine(false, mock.clone());

    for input in ["", "   "] {
        let result = engine.submit(input, Some("key")).await;
        assert_eq!(result.text, CONFIGURATION_GAP_TEXT);
        assert_eq!(result.audit_line, "[ENGINE] Processor.idle();");
    }
    assert_eq!(mock.calls(), 0);
    assert_eq!(engine.stats().hallucinations_blocked, 0);
}

// ── Properties ──────────────────────────────────────────────────────────

#[tokio::test]
async fn e2e_guard_blocks_uncorroborated_subject_on_every_path() {
    let mock = RecordingDispatcher::ok("unused");
    let (engine, _) = engine(false, mock.clone());

    for input in [
        "donate to seavon",
        "call seavon",
        "post about Seavon",
        "seavon status",
        "who is SEAVON",
    ] {
        let result = engine.submit(input, Some("key")).await;
        assert_eq!(result.kind, ResultKind::Error, "input: {input}");
        assert_eq!(result.audit_line, "[ENGINE] Guard.reject(\"seavon\");");
    }
    assert_eq!(mock.calls(), 0);
    assert_eq!(engine.stats().hallucinations_blocked, 5);
}

#[tokio::test]
async fn e2e_fallback_only_for_unknown_with_credential() {
    let mock = RecordingDispatcher::ok("generated");
    let (engine, _) = engine(true, mock.clone());

    engine.submit("donate", Some("key")).await;
    engine.submit("voice", Some("key")).await;
    engine.submit("social", Some("key")).await;
    engine.submit("status", Some("key")).await;
    engine.submit("hello there", None).await;
    engine.submit("hello there", Some("")).await;
    assert_eq!(mock.calls(), 0);

    engine.submit("hello there", Some("key")).await;
    assert_eq!(mock.calls(), 1);
    assert_eq!(mock.calls.lock().unwrap()[0], "hello there");
}

#[tokio::test]
async fn e2e_repeated_requests_without_credential_are_identical() {
    let mock = RecordingDispatcher::ok("unused");
    let (engine, _) = engine(true, mock);

    for input in ["please donate money", "call me now", "post it", "xyz123"] {
        let first = engine.submit(input, None).await;
        let second = engine.submit(input, None).await;
        assert_eq!(first.text, second.text, "input: {input}");
        assert_eq!(first.kind, second.kind);
        assert_eq!(classify(input), classify(input));
    }
}

#[tokio::test]
async fn e2e_audit_log_grows_one_line_per_request_in_order() {
    let mock = RecordingDispatcher::failing();
    let (engine, sink) = engine(false, mock);

    let inputs = ["donate", "", "seavon", "call", "xyz123", "status"];
    for input in inputs {
        engine.submit(input, Some("key")).await;
    }

    let lines = engine.audit_lines();
    assert_eq!(lines.len(), inputs.len());
    assert_eq!(lines, sink.lines());
    assert!(lines[0].starts_with("[ENGINE] Payments.openPortal"));
    assert_eq!(lines[1], "[ENGINE] Processor.idle();");
    assert!(lines[2].starts_with("[ENGINE] Guard.reject"));
    assert!(lines[3].starts_with("[ENGINE] Voice.dial"));
    assert!(lines[4].starts_with("[ENGINE] Fallback.failed"));
    assert!(lines[5].starts_with("[ENGINE] Status.report"));

    let conv = engine.conversation();
    assert_eq!(conv.count_role(TurnRole::Agent), inputs.len() + 1);
    assert_eq!(conv.count_role(TurnRole::User), inputs.len() - 1);
}

#[tokio::test(flavor = "multi_thread", worker_threads = 4)]
async fn e2e_concurrent_requests_are_all_recorded() {
    let mock = RecordingDispatcher::ok("generated");
    let (engine, _) = engine(true, mock.clone());
    let engine = Arc::new(engine);

    let mut handles = Vec::new();
    for i in 0..20 {
        let engine = engine.clone();
        handles.push(tokio::spawn(async move {
            engine.submit(&format!("request {i}"), Some("key")).await
        }));
    }
    for handle in handles {
        assert_eq!(handle.await.unwrap().text, "generated");
    }

    assert_eq!(engine.stats().requests_processed, 20);
    assert_eq!(engine.audit_lines().len(), 20);
    assert_eq!(mock.calls(), 20);
}

// ── Full stack ──────────────────────────────────────────────────────────

#[tokio::test]
async fn e2e_gemini_fallback_through_local_backend() {
    let app = Router::new().route(
        "/v1beta/models/{call}",
        post(|axum::Json(body): axum::Json<serde_json::Value>| async move {
            let prompt = body["contents"][0]["parts"][0]["text"]
                .as_str()
                .unwrap_or_default()
                .to_string();
            axum::Json(serde_json::json!({
                "candidates": [{"content": {"parts": [{"text": format!("heard: {prompt}")}]}}]
            }))
        }),
    );
    let listener = tokio::net::TcpListener::bind("127.0.0.1:0").await.unwrap();
    let addr = listener.local_addr().unwrap();
    tokio::spawn(async move {
        axum::serve(listener, app).await.unwrap();
    });

    let dispatcher = Arc::new(GeminiDispatcher::new(
        format!("http://{addr}/v1beta"),
        "gemini-pro",
        "Persona. Reply to: ",
    ));
    let engine = Engine::builder()
        .knowledge(knowledge(true))
        .dispatcher(dispatcher)
        .build();

    let result = engine.submit("xyz123", Some("key")).await;
    assert_eq!(result.text, "heard: Persona. Reply to: xyz123");
    assert_eq!(result.audit_line, "[ENGINE] Fallback.dispatch(\"gemini\");");
}

#[tokio::test]
async fn e2e_failed_gemini_call_keeps_credential_out_of_audit() {
    // Nothing listens on port 9 locally
    let dispatcher = Arc::new(
        GeminiDispatcher::new("http://127.0.0.1:9/v1beta", "gemini-pro", "Persona: ")
            .with_http_timeout(std::time::Duration::from_secs(2)),
    );
    let sink = Arc::new(MemorySink::new());
    let engine = Engine::builder()
        .knowledge(knowledge(true))
        .dispatcher(dispatcher)
        .sink(sink.clone())
        .build();

    let result = engine.submit("xyz123", Some("SUPER-SECRET-KEY")).await;
    assert_eq!(result.text, APOLOGY_TEXT);
    assert!(result.audit_line.starts_with("[ENGINE] Fallback.failed("));
    assert!(!result.audit_line.contains("SUPER-SECRET-KEY"));
    for line in sink.lines() {
        assert!(!line.contains("SUPER-SECRET-KEY"));
    }
    for turn in engine.conversation().turns() {
        assert!(!turn.text.contains("SUPER-SECRET-KEY"));
    }
}

#[tokio::test]
async fn e2e_engine_from_default_config() {
    let engine = Engine::from_config(&AppConfig::default()).unwrap();

    let greeting = engine.conversation();
    assert!(greeting.turns()[0].text.contains("Online"));

    let result = engine.submit("please donate money", None).await;
    assert_eq!(result.kind, ResultKind::PaymentPrompt);
    assert_eq!(engine.knowledge().donation_links().len(), 2);

    let result = engine.submit("call me now", None).await;
    assert!(result.text.contains("323-364-0769"));
}
