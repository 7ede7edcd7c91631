use huddle_core::{PeerId, PresenceEvent, PresenceMeta, SessionDescription, SignalMessage};
use huddle_session::rendezvous::ChannelEvent;

use crate::integration::{init_tracing, spawn_session};
use crate::utils::SessionEvent;

/// Presence events naming the local participant never create or destroy a
/// self-connection.
#[tokio::test]
async fn test_self_events_never_touch_the_roster() {
    init_tracing();

    let session = spawn_session("alice");

    // own join: no self-connection, even though "alice" < nothing else
    session.inject(ChannelEvent::Presence(PresenceEvent::Join {
        peer: session.local_id.clone(),
        meta: PresenceMeta::default(),
    }));

    // seed a real peer
    let bob = PeerId::from("bob");
    session.inject_signal(SignalMessage::Offer {
        offer: SessionDescription::offer("offer:bob->alice"),
        to: session.local_id.clone(),
        from: bob.clone(),
    });
    session.factory.wait_for_transport(&bob, 5000).await.unwrap();

    // a sync omitting self must not close anything of ours
    session.inject(ChannelEvent::Presence(PresenceEvent::Sync {
        peers: vec![bob.clone()],
    }));
    // own leave is ignored too
    session.inject(ChannelEvent::Presence(PresenceEvent::Leave {
        peer: session.local_id.clone(),
    }));

    tokio::time::sleep(std::time::Duration::from_millis(300)).await;

    assert_eq!(session.factory.transport_count().await, 1);
    assert!(session.factory.transport(&session.local_id).await.is_none());
    assert!(
        !session
            .observer
            .events()
            .await
            .iter()
            .any(|e| matches!(e, SessionEvent::PeerLeft(_)))
    );

    session.leave().await;
}
