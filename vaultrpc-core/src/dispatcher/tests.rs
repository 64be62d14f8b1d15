use super::*;
use crate::error::{TransportError, TransportErrorKind};
use crate::retry_strategy::{RetryConfig, RetryStrategyType};
use crate::rpc::{CallSemantics, RawResponse};
use async_trait::async_trait;
use futures::future::join_all;
use serde_json::json;
use std::collections::VecDeque;
use std::sync::Mutex;
use std::sync::atomic::AtomicUsize;
use std::time::Duration;

#[derive(Debug, Clone)]
enum Step {
    Result(Value),
    Error(i64, &'static str),
    Fail(TransportErrorKind),
    Raw(RawResponse),
}

/// Replays a script of responses, then repeats `fallback`.
#[derive(Debug)]
struct ScriptedTransport {
    script: Mutex<VecDeque<Step>>,
    fallback: Step,
    delay: Duration,
    sent: AtomicUsize,
    in_flight: AtomicUsize,
    max_in_flight: AtomicUsize,
    timeouts: Mutex<Vec<Option<Duration>>>,
}

impl ScriptedTransport {
    fn new(script: Vec<Step>, fallback: Step) -> Arc<Self> {
        Self::with_delay(script, fallback, Duration::ZERO)
    }

    fn with_delay(script: Vec<Step>, fallback: Step, delay: Duration) -> Arc<Self> {
        Arc::new(Self {
            script: Mutex::new(script.into()),
            fallback,
            delay,
            sent: AtomicUsize::new(0),
            in_flight: AtomicUsize::new(0),
            max_in_flight: AtomicUsize::new(0),
            timeouts: Mutex::new(Vec::new()),
        })
    }

    fn sent(&self) -> usize {
        self.sent.load(Ordering::SeqCst)
    }

    /// Per-attempt timeouts handed over by the dispatcher, in send order.
    fn timeouts(&self) -> Vec<Option<Duration>> {
        self.timeouts.lock().unwrap().clone()
    }
}

#[async_trait]
impl Transport for ScriptedTransport {
    async fn send(&self, call: &RpcCall, timeout: Option<Duration>) -> RawResponse {
        self.sent.fetch_add(1, Ordering::SeqCst);
        self.timeouts.lock().unwrap().push(timeout);
        let current = self.in_flight.fetch_add(1, Ordering::SeqCst) + 1;
        self.max_in_flight.fetch_max(current, Ordering::SeqCst);

        if !self.delay.is_zero() {
            tokio::time::sleep(self.delay).await;
        }

        let step = self
            .script
            .lock()
            .unwrap()
            .pop_front()
            .unwrap_or_else(|| self.fallback.clone());
        self.in_flight.fetch_sub(1, Ordering::SeqCst);

        match step {
            Step::Result(result) => RawResponse::json(
                200,
                &json!({"jsonrpc": "2.0", "id": call.id(), "result": result}),
            ),
            Step::Error(code, message) => RawResponse::json(
                200,
                &json!({
                    "jsonrpc": "2.0",
                    "id": call.id(),
                    "error": {"code": code, "message": message}
                }),
            ),
            Step::Fail(kind) => RawResponse::Failed(TransportError::new(kind, "scripted failure")),
            Step::Raw(raw) => raw,
        }
    }

    fn endpoint(&self) -> &str {
        "scripted://node"
    }
}

fn fast_retries() -> RpcConfig {
    RpcConfig::new("http://127.0.0.1:9000").with_retry_config(RetryConfig {
        strategy_type: RetryStrategyType::Exponential,
        base_delay_ms: 10,
        max_delay_ms: 100,
        jitter_factor: 0.0,
        ..Default::default()
    })
}

fn dispatcher(config: &RpcConfig, transport: Arc<ScriptedTransport>) -> Dispatcher {
    Dispatcher::with_transport(config, transport).unwrap()
}

fn options(max_retries: u32) -> DispatchOptions {
    DispatchOptions::new(Duration::from_secs(30), max_retries)
}

fn unavailable() -> Step {
    Step::Fail(TransportErrorKind::Status(503))
}

#[tokio::test(start_paused = true)]
async fn test_success_on_first_attempt() {
    let transport = ScriptedTransport::new(vec![], Step::Result(json!("1000")));
    let dispatcher = dispatcher(&fast_retries(), transport.clone());

    let call = dispatcher.call("suix_getReferenceGasPrice", vec![]);
    let outcome = dispatcher.dispatch(call, options(3)).await;

    assert_eq!(outcome, Outcome::Success(json!("1000")));
    assert_eq!(transport.sent(), 1);
}

#[tokio::test(start_paused = true)]
async fn test_retries_until_success() {
    for max_retries in 0..=4 {
        let script = vec![unavailable(); max_retries as usize];
        let transport = ScriptedTransport::new(script, Step::Result(json!(42)));
        let dispatcher = dispatcher(&fast_retries(), transport.clone());

        let call = dispatcher.call("sui_getObject", vec![json!("0x1")]);
        let outcome = dispatcher.dispatch(call, options(max_retries)).await;

        assert_eq!(outcome, Outcome::Success(json!(42)), "max_retries={max_retries}");
        assert_eq!(transport.sent(), max_retries as usize + 1);
    }
}

#[tokio::test(start_paused = true)]
async fn test_retry_budget_exhausted() {
    let transport = ScriptedTransport::new(vec![], Step::Fail(TransportErrorKind::Connect));
    let dispatcher = dispatcher(&fast_retries(), transport.clone());

    let call = dispatcher.call("sui_getObject", vec![]);
    let outcome = dispatcher.dispatch(call, options(3)).await;

    match outcome {
        Outcome::TransportError(err) => assert_eq!(err.kind, TransportErrorKind::Connect),
        other => panic!("expected transport error, got {other:?}"),
    }
    assert_eq!(transport.sent(), 4);
}

#[tokio::test(start_paused = true)]
async fn test_mutating_call_without_key_is_sent_once() {
    let transport = ScriptedTransport::new(vec![unavailable()], Step::Result(json!("ok")));
    let dispatcher = dispatcher(&fast_retries(), transport.clone());

    let call = dispatcher.call("sui_executeTransactionBlock", vec![]);
    assert!(!call.is_retry_safe());
    let outcome = dispatcher.dispatch(call, options(3)).await;

    assert!(matches!(outcome, Outcome::TransportError(_)));
    assert_eq!(transport.sent(), 1);
}

#[tokio::test(start_paused = true)]
async fn test_mutating_call_with_key_is_retried() {
    let transport = ScriptedTransport::new(vec![unavailable()], Step::Result(json!("ok")));
    let dispatcher = dispatcher(&fast_retries(), transport.clone());

    let call = dispatcher
        .call("sui_executeTransactionBlock", vec![])
        .with_idempotency_key("deposit-1");
    let outcome = dispatcher.dispatch(call, options(3)).await;

    assert!(outcome.is_success());
    assert_eq!(transport.sent(), 2);
}

#[tokio::test(start_paused = true)]
async fn test_read_only_override_to_mutating_is_not_retried() {
    let transport = ScriptedTransport::new(vec![unavailable()], Step::Result(json!("ok")));
    let dispatcher = dispatcher(&fast_retries(), transport.clone());

    let call = dispatcher
        .call("sui_getObject", vec![])
        .with_semantics(CallSemantics::Mutating {
            idempotency_key: None,
        });
    let outcome = dispatcher.dispatch(call, options(3)).await;

    assert!(matches!(outcome, Outcome::TransportError(_)));
    assert_eq!(transport.sent(), 1);
}

#[tokio::test(start_paused = true)]
async fn test_protocol_error_is_terminal() {
    let transport = ScriptedTransport::new(vec![], Step::Error(-32602, "Invalid params"));
    let dispatcher = dispatcher(&fast_retries(), transport.clone());

    let call = dispatcher.call("sui_getObject", vec![]);
    let outcome = dispatcher.dispatch(call, options(3)).await;

    assert_eq!(
        outcome,
        Outcome::ProtocolError {
            code: -32602,
            message: "Invalid params".into(),
            data: None,
        }
    );
    assert_eq!(transport.sent(), 1);
}

#[tokio::test(start_paused = true)]
async fn test_malformed_body_is_not_retried() {
    let raw = RawResponse::Http {
        status: 200,
        body: b"<html>".to_vec(),
    };
    let transport = ScriptedTransport::new(vec![], Step::Raw(raw));
    let dispatcher = dispatcher(&fast_retries(), transport.clone());

    let call = dispatcher.call("sui_getObject", vec![]);
    let outcome = dispatcher.dispatch(call, options(3)).await;

    match outcome {
        Outcome::TransportError(err) => assert_eq!(err.kind, TransportErrorKind::MalformedBody),
        other => panic!("unexpected {other:?}"),
    }
    assert_eq!(transport.sent(), 1);
}

#[tokio::test(start_paused = true)]
async fn test_transport_timeout_is_terminal() {
    let transport = ScriptedTransport::new(vec![], Step::Raw(RawResponse::TimedOut));
    let dispatcher = dispatcher(&fast_retries(), transport.clone());

    let call = dispatcher.call("sui_getObject", vec![]);
    assert_eq!(dispatcher.dispatch(call, options(3)).await, Outcome::Timeout);
    assert_eq!(transport.sent(), 1);
}

#[tokio::test(start_paused = true)]
async fn test_slow_response_times_out() {
    let transport =
        ScriptedTransport::with_delay(vec![], Step::Result(json!(1)), Duration::from_secs(10));
    let dispatcher = dispatcher(&fast_retries(), transport.clone());

    let call = dispatcher.call("sui_getObject", vec![]);
    let started = Instant::now();
    let outcome = dispatcher
        .dispatch(call, DispatchOptions::new(Duration::from_secs(1), 3))
        .await;

    assert_eq!(outcome, Outcome::Timeout);
    assert!(started.elapsed() < Duration::from_secs(2));
    assert_eq!(transport.sent(), 1);
    assert_eq!(dispatcher.pool().available(), dispatcher.pool().size());
}

#[tokio::test(start_paused = true)]
async fn test_no_retry_past_deadline() {
    let config = RpcConfig::new("http://127.0.0.1:9000").with_retry_config(RetryConfig {
        strategy_type: RetryStrategyType::Fixed,
        base_delay_ms: 1000,
        max_delay_ms: 1000,
        jitter_factor: 0.0,
        ..Default::default()
    });
    let transport = ScriptedTransport::new(vec![], unavailable());
    let dispatcher = dispatcher(&config, transport.clone());

    let call = dispatcher.call("sui_getObject", vec![]);
    let outcome = dispatcher
        .dispatch(call, DispatchOptions::new(Duration::from_millis(1500), 5))
        .await;

    // t=0 fails, t=1000 fails, the next backoff would end at t=2000.
    assert!(matches!(outcome, Outcome::TransportError(_)));
    assert_eq!(transport.sent(), 2);
}

#[tokio::test(start_paused = true)]
async fn test_cancellation_releases_slot() {
    let transport =
        ScriptedTransport::with_delay(vec![], Step::Result(json!(1)), Duration::from_secs(10));
    let dispatcher = Arc::new(dispatcher(&fast_retries(), transport.clone()));
    let cancel = CancellationToken::new();

    let task = {
        let dispatcher = Arc::clone(&dispatcher);
        let cancel = cancel.clone();
        tokio::spawn(async move {
            let call = dispatcher.call("sui_getObject", vec![]);
            dispatcher.dispatch_with_cancel(call, options(3), cancel).await
        })
    };

    tokio::time::sleep(Duration::from_millis(100)).await;
    assert_eq!(dispatcher.pool().available(), dispatcher.pool().size() - 1);
    cancel.cancel();

    assert_eq!(task.await.unwrap(), Outcome::Cancelled);
    assert_eq!(dispatcher.pool().available(), dispatcher.pool().size());
}

#[tokio::test(start_paused = true)]
async fn test_cancelled_before_dispatch() {
    let transport = ScriptedTransport::new(vec![], Step::Result(json!(1)));
    let dispatcher = dispatcher(&fast_retries(), transport.clone());
    let cancel = CancellationToken::new();
    cancel.cancel();

    let call = dispatcher.call("sui_getObject", vec![]);
    let outcome = dispatcher.dispatch_with_cancel(call, options(3), cancel).await;

    assert_eq!(outcome, Outcome::Cancelled);
    assert_eq!(transport.sent(), 0);
}

#[tokio::test(start_paused = true)]
async fn test_closed_pool() {
    let transport = ScriptedTransport::new(vec![], Step::Result(json!(1)));
    let dispatcher = dispatcher(&fast_retries(), transport.clone());
    dispatcher.pool().close();

    let call = dispatcher.call("sui_getObject", vec![]);
    match dispatcher.dispatch(call, options(3)).await {
        Outcome::TransportError(err) => assert_eq!(err.kind, TransportErrorKind::PoolClosed),
        other => panic!("unexpected {other:?}"),
    }
    assert_eq!(transport.sent(), 0);
}

#[tokio::test(start_paused = true)]
async fn test_mismatched_response_id() {
    let raw = RawResponse::json(200, &json!({"jsonrpc": "2.0", "id": 999, "result": 1}));
    let transport = ScriptedTransport::new(vec![], Step::Raw(raw));
    let dispatcher = dispatcher(&fast_retries(), transport.clone());

    let call = dispatcher.call("sui_getObject", vec![]);
    match dispatcher.dispatch(call, options(3)).await {
        Outcome::TransportError(err) => assert_eq!(err.kind, TransportErrorKind::MalformedBody),
        other => panic!("unexpected {other:?}"),
    }
}

#[tokio::test(start_paused = true)]
async fn test_concurrent_dispatches_are_independent() {
    let transport =
        ScriptedTransport::with_delay(vec![], Step::Result(json!("ok")), Duration::from_millis(50));
    let config = fast_retries().with_pool_size(3);
    let dispatcher = Arc::new(dispatcher(&config, transport.clone()));

    let outcomes = join_all((0..10).map(|_| {
        let dispatcher = Arc::clone(&dispatcher);
        async move {
            let call = dispatcher.call("sui_getLatestCheckpointSequenceNumber", vec![]);
            dispatcher.dispatch(call, options(3)).await
        }
    }))
    .await;

    assert_eq!(outcomes.len(), 10);
    assert!(outcomes.iter().all(Outcome::is_success));
    assert_eq!(transport.sent(), 10);
    assert!(transport.max_in_flight.load(Ordering::SeqCst) <= 3);
    assert_eq!(dispatcher.pool().available(), 3);
}

#[tokio::test(start_paused = true)]
async fn test_disabled_retries_make_one_attempt() {
    let transport = ScriptedTransport::new(vec![], unavailable());
    let config = RpcConfig::new("http://127.0.0.1:9000").with_retry_config(RetryConfig::disabled());
    let dispatcher = dispatcher(&config, transport.clone());
    assert_eq!(dispatcher.default_options().max_retries, 0);

    let outcome = dispatcher.request("sui_getObject", vec![json!("0x1")]).await;

    assert!(matches!(outcome, Outcome::TransportError(_)));
    assert_eq!(transport.sent(), 1);
}

#[tokio::test(start_paused = true)]
async fn test_each_attempt_gets_time_left_until_deadline() {
    let transport = ScriptedTransport::new(vec![unavailable()], Step::Result(json!(1)));
    let dispatcher = dispatcher(&fast_retries(), transport.clone());

    let call = dispatcher.call("sui_getObject", vec![]);
    let outcome = dispatcher.dispatch(call, options(3)).await;
    assert!(outcome.is_success());

    let timeouts = transport.timeouts();
    assert_eq!(timeouts.len(), 2);
    let first = timeouts[0].unwrap();
    let second = timeouts[1].unwrap();
    assert!(first <= Duration::from_secs(30));
    assert!(first > Duration::from_secs(29));
    // The 10ms backoff comes out of the same budget.
    assert!(second <= first - Duration::from_millis(10));
}

#[tokio::test(start_paused = true)]
async fn test_unrepresentable_timeout_means_no_deadline() {
    let transport =
        ScriptedTransport::new(vec![unavailable(), unavailable()], Step::Result(json!(7)));
    let dispatcher = dispatcher(&fast_retries(), transport.clone());

    let call = dispatcher.call("sui_getObject", vec![]);
    let outcome = dispatcher
        .dispatch(call, DispatchOptions::new(Duration::MAX, 2))
        .await;

    assert_eq!(outcome, Outcome::Success(json!(7)));
    assert_eq!(transport.sent(), 3);
    assert_eq!(transport.timeouts(), vec![None, None, None]);
}

#[tokio::test(start_paused = true)]
async fn test_unrepresentable_timeout_still_cancellable() {
    let transport =
        ScriptedTransport::with_delay(vec![], Step::Result(json!(1)), Duration::from_secs(3600));
    let dispatcher = dispatcher(&fast_retries(), transport.clone());
    let cancel = CancellationToken::new();

    let call = dispatcher.call("sui_getObject", vec![]);
    let unbounded = DispatchOptions::new(Duration::MAX, 0);
    let dispatch = dispatcher.dispatch_with_cancel(call, unbounded, cancel.clone());
    let (outcome, ()) = tokio::join!(dispatch, async {
        tokio::time::sleep(Duration::from_secs(5)).await;
        cancel.cancel();
    });

    assert_eq!(outcome, Outcome::Cancelled);
    assert_eq!(dispatcher.pool().available(), dispatcher.pool().size());
}

#[tokio::test(start_paused = true)]
async fn test_dispatches_are_counted() {
    let transport = ScriptedTransport::new(
        vec![Step::Result(json!(1)), Step::Error(-32602, "Invalid params")],
        Step::Raw(RawResponse::TimedOut),
    );
    let dispatcher = dispatcher(&fast_retries(), transport);

    for _ in 0..3 {
        let call = dispatcher.call("sui_getObject", vec![]);
        dispatcher.dispatch(call, options(0)).await;
    }

    let metrics = dispatcher.metrics();
    assert_eq!(metrics.dispatch_count("success"), 1);
    assert_eq!(metrics.dispatch_count("protocol_error"), 1);
    assert_eq!(metrics.dispatch_count("timeout"), 1);
    assert_eq!(metrics.dispatch_latency_samples(), 3);
}

#[tokio::test(start_paused = true)]
async fn test_shared_metrics_across_dispatchers() {
    let shared = Arc::new(Metrics::new().unwrap());
    let first = dispatcher(&fast_retries(), ScriptedTransport::new(vec![], Step::Result(json!(1))))
        .with_metrics(Arc::clone(&shared));
    let second = dispatcher(&fast_retries(), ScriptedTransport::new(vec![], Step::Result(json!(2))))
        .with_metrics(Arc::clone(&shared));

    first.request("sui_getObject", vec![]).await;
    second.request("sui_getObject", vec![]).await;

    assert_eq!(shared.dispatch_count("success"), 2);
}

#[test]
fn test_call_ids_are_unique() {
    let transport = ScriptedTransport::new(vec![], Step::Result(json!(1)));
    let dispatcher = dispatcher(&fast_retries(), transport);

    let a = dispatcher.call("sui_getObject", vec![]);
    let b = dispatcher.call("sui_getObject", vec![]);
    assert_ne!(a.id(), b.id());
    assert_eq!(dispatcher.endpoint(), "scripted://node");
}

#[test]
fn test_invalid_config_rejected() {
    let transport = ScriptedTransport::new(vec![], Step::Result(json!(1)));
    let config = fast_retries().with_max_retries(50);
    let err = Dispatcher::with_transport(&config, transport).unwrap_err();
    assert!(matches!(err, crate::error::Error::Config(_)));
}

#[test]
fn test_default_options_follow_config() {
    let transport = ScriptedTransport::new(vec![], Step::Result(json!(1)));
    let config = fast_retries()
        .with_timeout(Duration::from_secs(5))
        .with_max_retries(1);
    let dispatcher = dispatcher(&config, transport);
    assert_eq!(
        dispatcher.default_options(),
        DispatchOptions::new(Duration::from_secs(5), 1)
    );
}
