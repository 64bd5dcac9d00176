use modelmux_foundation::candidates::Provider;
use modelmux_foundation::config::RouterConfig;
use modelmux_foundation::credentials::StaticCredentialStore;
use modelmux_foundation::metrics::RouterMetrics;
use modelmux_foundation::provider::AdapterRegistry;
use modelmux_foundation::reply::{ErrorEnvelope, Response};
use modelmux_foundation::service::{RouterService, ServiceHandle};
use modelmux_kernel::bus::{BusMessage, InMemoryBus, MessageBus};
use modelmux_testing::{MockAdapter, init_tracing};
use serde_json::json;
use std::sync::Arc;
use std::time::Duration;

async fn start_router(
    adapters: Vec<MockAdapter>,
    providers: &[Provider],
    config: RouterConfig,
) -> (Arc<InMemoryBus>, ServiceHandle, Arc<RouterMetrics>) {
    init_tracing();
    let bus = Arc::new(InMemoryBus::new());
    let registry = Arc::new(AdapterRegistry::new());
    for adapter in adapters {
        registry.register(Arc::new(adapter)).await;
    }
    let service = RouterService::new(bus.clone(), registry, config).with_credentials(Arc::new(
        StaticCredentialStore::with_providers(providers),
    ));
    let metrics = service.metrics();
    let handle = service.start().await.unwrap();
    (bus, handle, metrics)
}

/// Publish a request payload and wait for the single reply on `reply_topic`.
async fn roundtrip(
    bus: &Arc<InMemoryBus>,
    reply_topic: &str,
    payload: serde_json::Value,
) -> BusMessage {
    let mut replies = bus.subscribe(reply_topic).await.unwrap();
    let message = BusMessage::json("llm.request", &payload)
        .unwrap()
        .with_reply_to(reply_topic);
    bus.publish("llm.request", message).await.unwrap();
    replies.next().await.unwrap()
}

#[tokio::test]
async fn test_auto_selection_picks_first_credentialed_candidate() {
    let adapter = MockAdapter::new(Provider::Claude)
        .with_response("hello there")
        .with_tokens_used(12);
    let (bus, handle, _metrics) = start_router(
        vec![adapter.clone()],
        &[Provider::Claude],
        RouterConfig::default(),
    )
    .await;

    let reply = roundtrip(
        &bus,
        "replies.auto",
        json!({
            "messages": [{"role": "user", "content": "hi"}],
            "correlation_id": "auto-1",
        }),
    )
    .await;

    let response: Response = reply.decode().unwrap();
    // Short chat with no task lands in the general simple tier.
    assert_eq!(response.model, "claude:claude-3-5-haiku");
    assert_eq!(response.text, "hello there");
    assert_eq!(response.tokens_used, Some(12));
    assert_eq!(response.correlation_id.as_deref(), Some("auto-1"));
    modelmux_testing::assert_adapter_called!(adapter, 1);

    handle.shutdown().await;
}

#[tokio::test]
async fn test_explicit_model_is_dispatched_verbatim() {
    let adapter = MockAdapter::new(Provider::Claude).with_response("done");
    let (bus, handle, _metrics) = start_router(
        vec![adapter.clone()],
        &[Provider::Claude],
        RouterConfig::default(),
    )
    .await;

    let reply = roundtrip(
        &bus,
        "replies.explicit",
        json!({
            "model": "claude-sonnet-4",
            "messages": [{"role": "user", "content": "summarize"}],
        }),
    )
    .await;

    let response: Response = reply.decode().unwrap();
    assert_eq!(response.model, "claude:claude-sonnet-4");
    assert!(response.timestamp <= chrono::Utc::now());

    let history = adapter.history().await;
    assert_eq!(history[0].model, "claude-sonnet-4");

    handle.shutdown().await;
}

#[tokio::test]
async fn test_auto_selection_skips_uncredentialed_providers() {
    let claude = MockAdapter::new(Provider::Claude);
    let gemini = MockAdapter::new(Provider::Gemini).with_response("from gemini");
    let (bus, handle, _metrics) = start_router(
        vec![claude.clone(), gemini.clone()],
        &[Provider::Gemini],
        RouterConfig::default(),
    )
    .await;

    let reply = roundtrip(
        &bus,
        "replies.skip",
        json!({"messages": [{"role": "user", "content": "hi"}]}),
    )
    .await;

    let response: Response = reply.decode().unwrap();
    assert_eq!(response.model, "gemini:gemini-2.5-flash");
    modelmux_testing::assert_adapter_called!(claude, 0);
    modelmux_testing::assert_adapter_called!(gemini, 1);

    handle.shutdown().await;
}

#[tokio::test]
async fn test_provider_hint_steers_auto_selection() {
    let claude = MockAdapter::new(Provider::Claude);
    let gemini = MockAdapter::new(Provider::Gemini);
    let (bus, handle, _metrics) = start_router(
        vec![claude.clone(), gemini.clone()],
        &[Provider::Claude, Provider::Gemini],
        RouterConfig::default(),
    )
    .await;

    let reply = roundtrip(
        &bus,
        "replies.hint",
        json!({
            "provider": "gemini",
            "messages": [{"role": "user", "content": "hi"}],
        }),
    )
    .await;

    let response: Response = reply.decode().unwrap();
    assert_eq!(response.model, "gemini:gemini-2.5-flash");
    modelmux_testing::assert_adapter_called!(claude, 0);

    handle.shutdown().await;
}

#[tokio::test]
async fn test_explicit_model_without_credentials_names_the_missing_vars() {
    let (bus, handle, _metrics) = start_router(Vec::new(), &[], RouterConfig::default()).await;

    let reply = roundtrip(
        &bus,
        "replies.nocreds",
        json!({
            "model": "claude-sonnet-4",
            "messages": [{"role": "user", "content": "hi"}],
            "correlation_id": "nocreds-1",
        }),
    )
    .await;

    let envelope: ErrorEnvelope = reply.decode().unwrap();
    assert_eq!(envelope.error_code, "PROVIDER_ERROR");
    assert!(envelope.error.contains("ANTHROPIC_API_KEY"));
    assert_eq!(envelope.correlation_id.as_deref(), Some("nocreds-1"));

    handle.shutdown().await;
}

#[tokio::test]
async fn test_auto_selection_with_nothing_available_reports_task_and_tier() {
    let (bus, handle, _metrics) = start_router(Vec::new(), &[], RouterConfig::default()).await;

    let reply = roundtrip(
        &bus,
        "replies.exhausted",
        json!({
            "task_type": "coder",
            "messages": [{"role": "user", "content": "write a parser"}],
        }),
    )
    .await;

    let envelope: ErrorEnvelope = reply.decode().unwrap();
    assert_eq!(envelope.error_code, "PROVIDER_ERROR");
    assert!(envelope.error.contains("auto_select"));
    assert!(envelope.error.contains("coder"));

    handle.shutdown().await;
}

#[tokio::test]
async fn test_invalid_role_is_rejected_with_the_offending_index() {
    let (bus, handle, _metrics) = start_router(
        vec![MockAdapter::new(Provider::Claude)],
        &[Provider::Claude],
        RouterConfig::default(),
    )
    .await;

    let reply = roundtrip(
        &bus,
        "replies.badrole",
        json!({
            "messages": [
                {"role": "user", "content": "hi"},
                {"role": "robot", "content": "beep"}
            ],
        }),
    )
    .await;

    let envelope: ErrorEnvelope = reply.decode().unwrap();
    assert_eq!(envelope.error_code, "VALIDATION_ERROR");
    assert!(envelope.error.contains("message 1"));
    assert!(envelope.error.contains("robot"));

    handle.shutdown().await;
}

#[tokio::test]
async fn test_streaming_requests_are_refused() {
    let adapter = MockAdapter::new(Provider::Claude);
    let (bus, handle, _metrics) = start_router(
        vec![adapter.clone()],
        &[Provider::Claude],
        RouterConfig::default(),
    )
    .await;

    let reply = roundtrip(
        &bus,
        "replies.stream",
        json!({
            "model": "claude-sonnet-4",
            "stream": true,
            "messages": [{"role": "user", "content": "hi"}],
        }),
    )
    .await;

    let envelope: ErrorEnvelope = reply.decode().unwrap();
    assert_eq!(envelope.error_code, "INTERNAL_ERROR");
    assert!(envelope.error.contains("streaming is not implemented"));
    modelmux_testing::assert_adapter_called!(adapter, 0);

    handle.shutdown().await;
}

#[tokio::test]
async fn test_provider_failure_reaches_the_requester() {
    let adapter = MockAdapter::new(Provider::Claude).failing("upstream returned 500");
    let (bus, handle, _metrics) =
        start_router(vec![adapter], &[Provider::Claude], RouterConfig::default()).await;

    let reply = roundtrip(
        &bus,
        "replies.fail",
        json!({
            "model": "claude-sonnet-4",
            "messages": [{"role": "user", "content": "hi"}],
            "correlation_id": "fail-1",
        }),
    )
    .await;

    let envelope: ErrorEnvelope = reply.decode().unwrap();
    assert_eq!(envelope.error_code, "PROVIDER_ERROR");
    assert!(envelope.error.contains("upstream returned 500"));
    assert_eq!(envelope.correlation_id.as_deref(), Some("fail-1"));

    handle.shutdown().await;
}

#[tokio::test(start_paused = true)]
async fn test_slow_provider_call_times_out() {
    let adapter = MockAdapter::new(Provider::Claude).with_delay(Duration::from_secs(60));
    let config = RouterConfig::new().with_request_timeout_ms(1_000);
    let (bus, handle, metrics) = start_router(vec![adapter], &[Provider::Claude], config).await;

    let reply = roundtrip(
        &bus,
        "replies.timeout",
        json!({
            "model": "claude-sonnet-4",
            "messages": [{"role": "user", "content": "hi"}],
        }),
    )
    .await;

    let envelope: ErrorEnvelope = reply.decode().unwrap();
    assert_eq!(envelope.error_code, "TIMEOUT");
    assert!(envelope.error.contains("1000"));
    assert_eq!(metrics.snapshot().await.timed_out, 1);

    handle.shutdown().await;
}

#[tokio::test(start_paused = true)]
async fn test_requests_beyond_capacity_are_skipped_without_a_reply() {
    let adapter = MockAdapter::new(Provider::Claude).with_delay(Duration::from_secs(1));
    let config = RouterConfig::new().with_max_concurrent(1);
    let (bus, handle, metrics) =
        start_router(vec![adapter.clone()], &[Provider::Claude], config).await;

    let mut replies = bus.subscribe("replies.capacity").await.unwrap();
    for correlation in ["cap-1", "cap-2"] {
        let message = BusMessage::json(
            "llm.request",
            &json!({
                "model": "claude-sonnet-4",
                "messages": [{"role": "user", "content": "hi"}],
                "correlation_id": correlation,
            }),
        )
        .unwrap()
        .with_reply_to("replies.capacity");
        bus.publish("llm.request", message).await.unwrap();
    }

    let reply = replies.next().await.unwrap();
    let response: Response = reply.decode().unwrap();
    assert_eq!(response.correlation_id.as_deref(), Some("cap-1"));

    handle.shutdown().await;
    modelmux_testing::assert_adapter_called!(adapter, 1);

    // The shed request never gets any reply.
    let nothing = tokio::time::timeout(Duration::from_secs(5), replies.next()).await;
    assert!(nothing.is_err());

    let snapshot = metrics.snapshot().await;
    assert_eq!(snapshot.received, 2);
    assert_eq!(snapshot.skipped, 1);
    assert_eq!(snapshot.completed, 1);
}

#[tokio::test]
async fn test_tools_are_translated_into_the_adapter_call() {
    let adapter = MockAdapter::new(Provider::Claude);
    let (bus, handle, _metrics) = start_router(
        vec![adapter.clone()],
        &[Provider::Claude],
        RouterConfig::default(),
    )
    .await;

    let reply = roundtrip(
        &bus,
        "replies.tools",
        json!({
            "model": "claude-sonnet-4",
            "messages": [{"role": "user", "content": "what is 1+2?"}],
            "tools": [{
                "type": "function",
                "function": {
                    "name": "calculator",
                    "description": "Adds two numbers",
                    "parameters": {"type": "object"}
                }
            }],
        }),
    )
    .await;

    let _: Response = reply.decode().unwrap();
    let history = adapter.history().await;
    assert_eq!(history[0].tools.len(), 1);
    assert_eq!(history[0].tools[0].name, "calculator");
    assert_eq!(
        history[0].tools[0].description.as_deref(),
        Some("Adds two numbers")
    );

    handle.shutdown().await;
}
