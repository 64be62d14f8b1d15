use super::*;

#[test]
fn test_error_size_stays_small() {
    assert!(std::mem::size_of::<Error>() <= 56);
}

#[test]
fn test_error_is_send_sync() {
    fn assert_send_sync<T: Send + Sync + 'static>() {}
    assert_send_sync::<Error>();
    assert_send_sync::<TransportError>();
    assert_send_sync::<ValidationError>();
}

#[test]
fn test_validation_error_converts() {
    let err: Error = ValidationError::ArityMismatch {
        expected: 3,
        actual: 2,
    }
    .into();
    assert_eq!(
        err.as_validation(),
        Some(&ValidationError::ArityMismatch {
            expected: 3,
            actual: 2
        })
    );
    assert!(err.to_string().contains("expected 3 arguments, got 2"));
}

#[test]
fn test_context_penetrating_helpers() {
    let err = Error::protocol(-32601, "Method not found", None)
        .context("fetching gas price")
        .context("preparing deposit");

    assert_eq!(err.as_protocol(), Some((-32601, "Method not found")));
    assert!(matches!(err.root_cause(), Error::Protocol { .. }));
    assert_eq!(err.to_string(), "preparing deposit");
}

#[test]
fn test_report_lists_chain() {
    let err = Error::transport(TransportErrorKind::Dns, "no such host")
        .context("Failed to fetch checkpoint");
    let report = err.report();

    assert!(report.starts_with("Failed to fetch checkpoint"));
    assert!(report.contains("Caused by: Transport error: DNS resolution failed: no such host"));
}

#[test]
fn test_is_retryable_only_for_transient_transport() {
    assert!(Error::transport(TransportErrorKind::ConnectionReset, "reset").is_retryable());
    assert!(Error::transport(TransportErrorKind::Status(503), "busy").is_retryable());
    assert!(
        Error::transport(TransportErrorKind::Connect, "refused")
            .context("wrapped")
            .is_retryable()
    );

    assert!(!Error::transport(TransportErrorKind::MalformedBody, "junk").is_retryable());
    assert!(!Error::transport(TransportErrorKind::Status(404), "missing").is_retryable());
    assert!(!Error::protocol(-32000, "rejected", None).is_retryable());
    assert!(!Error::timeout("deadline").is_retryable());
}

#[test]
fn test_not_configured_through_context() {
    let err = Error::not_configured("signer").context("executing deposit");
    assert!(err.is_not_configured());
    assert!(!Error::signing("hsm offline").is_not_configured());
}

#[test]
fn test_option_context_becomes_missing_field() {
    let value = serde_json::json!({"data": {}});
    let err = value
        .get("digest")
        .context("digest")
        .expect_err("digest is absent");
    assert!(matches!(err, Error::Parse(ref p) if matches!(**p, ParseError::MissingField(_))));
}

#[test]
fn test_serde_json_error_converts_to_parse() {
    let json_err = serde_json::from_str::<serde_json::Value>("{").unwrap_err();
    let err: Error = json_err.into();
    assert!(matches!(err, Error::Parse(_)));
}

#[test]
fn test_transport_error_message_truncated() {
    let long = "x".repeat(TransportError::MAX_MESSAGE_LEN * 2);
    let err = TransportError::new(TransportErrorKind::Other, long);
    assert!(err.message.ends_with("... (truncated)"));
    assert!(err.message.len() < TransportError::MAX_MESSAGE_LEN * 2);
}

#[test]
fn test_prometheus_error_converts_to_metrics() {
    let err: Error = prometheus::Error::Msg("duplicate collector".into()).into();
    assert!(matches!(err, Error::Metrics(_)));
    assert!(err.to_string().contains("duplicate collector"));
}
