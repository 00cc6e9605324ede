//! Tests for the probe endpoints and server lifecycle

use super::*;
use crate::shutdown::shutdown_channel;
use std::time::Duration;

/// Wait for the server to answer /health, with retry and backoff.
///
/// More reliable than a fixed sleep in loaded test environments.
async fn wait_for_server(port: u16, max_retries: u32) -> reqwest::Client {
    let client = reqwest::Client::new();
    let mut delay = Duration::from_millis(10);

    for attempt in 1..=max_retries {
        match client
            .get(format!("http://127.0.0.1:{}/health", port))
            .timeout(Duration::from_millis(100))
            .send()
            .await
        {
            Ok(_) => return client,
            Err(_) if attempt < max_retries => {
                tokio::time::sleep(delay).await;
                delay = std::cmp::min(delay * 2, Duration::from_millis(200));
            }
            Err(e) => panic!("server not ready after {} attempts: {}", max_retries, e),
        }
    }
    client
}

/// Start a probe server on `port`, keeping the cancellation controller
/// alive for the duration of the test.
fn spawn_server(
    port: u16,
) -> (
    ProbeServer,
    crate::shutdown::ShutdownController,
    tokio::task::JoinHandle<std::io::Result<()>>,
) {
    let probe = ProbeServer::new(port);
    let (controller, signal) = shutdown_channel();
    let server = probe.clone();
    let handle = tokio::spawn(async move { server.start(signal).await });
    (probe, controller, handle)
}

#[tokio::test]
async fn test_health_returns_200_ok() {
    let (_probe, _controller, handle) = spawn_server(18090);
    let client = wait_for_server(18090, 10).await;

    let response = client
        .get("http://127.0.0.1:18090/health")
        .send()
        .await
        .expect("request should succeed");

    assert_eq!(response.status(), 200);
    let content_type = response
        .headers()
        .get("content-type")
        .and_then(|v| v.to_str().ok())
        .unwrap_or_default()
        .to_string();
    assert!(
        content_type.starts_with("text/plain"),
        "unexpected content type {content_type:?}"
    );
    assert_eq!(response.text().await.expect("body"), "ok");

    handle.abort();
}

#[tokio::test]
async fn test_health_head_is_bodyless_200() {
    let (_probe, _controller, handle) = spawn_server(18091);
    let client = wait_for_server(18091, 10).await;

    let response = client
        .head("http://127.0.0.1:18091/health")
        .send()
        .await
        .expect("request should succeed");

    assert_eq!(response.status(), 200);
    assert_eq!(response.text().await.expect("body"), "");

    handle.abort();
}

#[tokio::test]
async fn test_health_rejects_other_methods() {
    let (_probe, _controller, handle) = spawn_server(18092);
    let client = wait_for_server(18092, 10).await;

    for builder in [
        client.post("http://127.0.0.1:18092/health"),
        client.put("http://127.0.0.1:18092/health"),
        client.delete("http://127.0.0.1:18092/health"),
        client.post("http://127.0.0.1:18092/ready"),
    ] {
        let response = builder.send().await.expect("request should succeed");
        assert_eq!(response.status(), 405, "non-GET/HEAD must be rejected");
    }

    handle.abort();
}

/// Default ready, 503 after set_ready(false), 200 again after set_ready(true).
#[tokio::test]
async fn test_ready_follows_the_flag() {
    let (probe, _controller, handle) = spawn_server(18093);
    let client = wait_for_server(18093, 10).await;
    let url = "http://127.0.0.1:18093/ready";

    let response = client.get(url).send().await.expect("request");
    assert_eq!(response.status(), 200, "readiness defaults to ready");
    assert_eq!(response.text().await.expect("body"), "ready");

    probe.set_ready(false);
    let response = client.get(url).send().await.expect("request");
    assert_eq!(response.status(), 503);
    assert_eq!(response.text().await.expect("body"), "not ready");

    probe.set_ready(true);
    let response = client.get(url).send().await.expect("request");
    assert_eq!(response.status(), 200);
    assert_eq!(response.text().await.expect("body"), "ready");

    handle.abort();
}

#[tokio::test]
async fn test_ready_head_carries_status_only() {
    let (probe, _controller, handle) = spawn_server(18094);
    let client = wait_for_server(18094, 10).await;
    let url = "http://127.0.0.1:18094/ready";

    let response = client.head(url).send().await.expect("request");
    assert_eq!(response.status(), 200);
    assert_eq!(response.text().await.expect("body"), "");

    probe.set_ready(false);
    let response = client.head(url).send().await.expect("request");
    assert_eq!(response.status(), 503);
    assert_eq!(response.text().await.expect("body"), "");

    handle.abort();
}

#[tokio::test]
async fn test_shutdown_before_start_is_a_noop() {
    let probe = ProbeServer::new(18095);

    let result = probe.shutdown(Duration::from_secs(1)).await;

    assert!(result.is_ok(), "shutdown on a never-started server succeeds");
    assert!(!probe.is_ready(), "shutdown still marks the process not ready");
}

/// A started server drains within the window and the serve task finishes
/// cleanly; the port stops answering afterwards.
#[tokio::test]
async fn test_shutdown_drains_and_stops_serving() {
    let (probe, _controller, handle) = spawn_server(18096);
    let client = wait_for_server(18096, 10).await;

    let result = probe.shutdown(Duration::from_secs(5)).await;
    assert!(result.is_ok(), "drain should complete within the window");
    assert!(!probe.is_ready());

    let served = tokio::time::timeout(Duration::from_secs(1), handle)
        .await
        .expect("serve task should finish after drain")
        .expect("serve task should not panic");
    assert!(served.is_ok(), "serve loop should exit cleanly: {served:?}");

    let after = client
        .get("http://127.0.0.1:18096/health")
        .timeout(Duration::from_millis(200))
        .send()
        .await;
    assert!(after.is_err(), "listener should be closed after shutdown");
}

/// Cancellation through the shared signal stops the server too.
#[tokio::test]
async fn test_cancel_signal_stops_server() {
    let (_probe, controller, handle) = spawn_server(18097);
    wait_for_server(18097, 10).await;

    controller.shutdown();

    let served = tokio::time::timeout(Duration::from_secs(1), handle)
        .await
        .expect("serve task should finish after cancellation")
        .expect("serve task should not panic");
    assert!(served.is_ok());
}

#[tokio::test]
async fn test_bind_conflict_is_reported() {
    let (_probe, _controller, handle) = spawn_server(18098);
    wait_for_server(18098, 10).await;

    // Same port again: bind must fail and surface the error
    let second = ProbeServer::new(18098);
    let (_c2, signal2) = shutdown_channel();
    let result = second.start(signal2).await;

    assert!(result.is_err(), "second bind on one port should fail");

    handle.abort();
}

#[test]
fn test_readiness_state_defaults_ready_and_toggles() {
    let state = ReadinessState::new();

    assert!(state.is_ready(), "readiness defaults to ready");

    state.set_not_ready();
    assert!(!state.is_ready());

    state.set_ready();
    assert!(state.is_ready());

    // Clones share the flag
    let cloned = state.clone();
    cloned.set_not_ready();
    assert!(!state.is_ready());
}
