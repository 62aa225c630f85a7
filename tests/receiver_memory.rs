// tests/receiver_memory.rs

use serde_json::json;
use tokio::time::{timeout, Duration};

use sub_client::{
    // ---
    create_memory_receiver,
    Error,
    ModuleConfig,
    RawDataPackage,
    RawEvent,
    Receiver as _,
    Teardown as _,
};

#[tokio::test]
async fn memory_connect_then_emit_delivers_in_order() {
    // ---
    // Arrange
    // ---
    let (receiver, script) = create_memory_receiver();

    let request = json!({ "uri": "sub://host" });
    let module = ModuleConfig::default();

    let mut connection = receiver
        .connect(&request, &module)
        .await
        .expect("connect failed");

    // ---
    // Act
    // ---
    assert!(script.emit(RawEvent::Heartbeat).await);
    assert!(
        script
            .emit(RawEvent::Data(RawDataPackage {
                channel: "ch1".into(),
                data: json!("payload"),
                name: None,
            }))
            .await
    );

    // ---
    // Assert
    // ---
    let first = timeout(Duration::from_millis(100), connection.events.recv())
        .await
        .expect("timed out waiting for event")
        .expect("event channel closed unexpectedly");
    assert!(matches!(first, RawEvent::Heartbeat));

    let second = timeout(Duration::from_millis(100), connection.events.recv())
        .await
        .expect("timed out waiting for event")
        .expect("event channel closed unexpectedly");
    match second {
        RawEvent::Data(package) => {
            assert_eq!(package.channel, "ch1");
            assert_eq!(package.data, json!("payload"));
        }
        other => panic!("expected data event, got {other:?}"),
    }

    let record = script.last_connect().expect("connect recorded");
    assert_eq!(record.request, request);
}

#[tokio::test]
async fn scripted_failure_is_consumed_and_not_recorded() {
    // ---
    let (receiver, script) = create_memory_receiver();
    script.fail_next_connect("broker down");

    let err = receiver
        .connect(&json!({}), &ModuleConfig::default())
        .await
        .err()
        .expect("connect should fail");

    match err {
        Error::Connection(reason) => assert_eq!(reason, "broker down"),
        other => panic!("expected connection failure, got {other:?}"),
    }
    assert_eq!(script.connect_count(), 0);

    // Failure is one-shot; the next attempt succeeds.
    receiver
        .connect(&json!({}), &ModuleConfig::default())
        .await
        .expect("second connect failed");
    assert_eq!(script.connect_count(), 1);
}

#[tokio::test]
async fn teardown_invocations_are_counted() {
    // ---
    let (receiver, script) = create_memory_receiver();

    let connection = receiver
        .connect(&json!({}), &ModuleConfig::default())
        .await
        .expect("connect failed");

    connection.teardown.disconnect().await.expect("disconnect");
    connection.teardown.disconnect().await.expect("disconnect");

    assert_eq!(script.disconnect_count(), 2);
}

#[tokio::test]
async fn emit_without_connection_reports_undelivered() {
    // ---
    let (_receiver, script) = create_memory_receiver();

    assert!(!script.emit(RawEvent::Heartbeat).await);
}
