use huddle_core::{PeerId, PresenceEvent};
use huddle_session::rendezvous::ChannelEvent;

use crate::integration::{init_tracing, seed_responder_peer, spawn_session};
use crate::utils::{SessionEvent, TransportCall};

/// A sync snapshot that differs from the roster only by removals closes
/// exactly the missing peers. Peers present in the report but never known
/// are not added: additions are join's job.
#[tokio::test]
async fn test_sync_closes_exactly_the_missing_peers() -> anyhow::Result<()> {
    init_tracing();

    let session = spawn_session("alice");
    let bob_transport = seed_responder_peer(&session, "bob").await?;
    let carol_transport = seed_responder_peer(&session, "carol").await?;

    // carol vanished from presence; "dave" appears but was never known
    session.inject(ChannelEvent::Presence(PresenceEvent::Sync {
        peers: vec![
            session.local_id.clone(),
            PeerId::from("bob"),
            PeerId::from("dave"),
        ],
    }));

    let carol = PeerId::from("carol");
    assert!(
        session
            .observer
            .wait_for(|e| matches!(e, SessionEvent::PeerLeft(p) if p == &carol), 5000)
            .await
    );
    assert!(
        carol_transport
            .wait_for_call(|c| matches!(c, TransportCall::Closed), 5000)
            .await
    );

    // bob untouched, dave never created
    assert!(
        !bob_transport
            .calls()
            .await
            .iter()
            .any(|c| matches!(c, TransportCall::Closed))
    );
    assert!(session.factory.transport(&PeerId::from("dave")).await.is_none());

    session.leave().await;
    Ok(())
}
