use huddle_core::{PeerId, PresenceEvent, PresenceMeta};
use huddle_session::rendezvous::ChannelEvent;

use crate::integration::{init_tracing, spawn_session};

/// The higher-ordered side of a pair never initiates: it waits for the
/// inbound offer, so at most one offer exists per pair and glare is
/// structurally impossible.
#[tokio::test]
async fn test_responder_waits_for_offer() {
    init_tracing();

    // "bob" > "alice": bob is the responder toward alice
    let session = spawn_session("bob");

    session.inject(ChannelEvent::Presence(PresenceEvent::Join {
        peer: PeerId::from("alice"),
        meta: PresenceMeta::default(),
    }));

    tokio::time::sleep(std::time::Duration::from_millis(300)).await;
    assert_eq!(session.factory.transport_count().await, 0);
    assert!(session.channel.broadcasts().await.is_empty());

    session.leave().await;
}

/// A duplicate join observation for a peer that is already being negotiated
/// must not tear down or replace the existing connection.
#[tokio::test]
async fn test_duplicate_join_is_idempotent() {
    init_tracing();

    let session = spawn_session("alice");
    let bob = PeerId::from("bob");

    for _ in 0..2 {
        session.inject(ChannelEvent::Presence(PresenceEvent::Join {
            peer: bob.clone(),
            meta: PresenceMeta::default(),
        }));
    }

    session.factory.wait_for_transport(&bob, 5000).await.unwrap();
    tokio::time::sleep(std::time::Duration::from_millis(200)).await;
    assert_eq!(session.factory.transport_count().await, 1);

    session.leave().await;
}
