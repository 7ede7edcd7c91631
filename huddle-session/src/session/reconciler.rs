use huddle_core::PeerId;
use std::collections::HashSet;

/// Peers to close and evict given a fresh full-roster snapshot.
///
/// A `sync` only ever removes: every currently known peer absent from the
/// reported set (self excluded) gets closed. Additions happen exclusively
/// through `join` events, which also decide the initiator role. Kept pure so
/// roster arithmetic is testable without a running session.
pub fn sync_removals(known: &[PeerId], reported: &[PeerId], local: &PeerId) -> Vec<PeerId> {
    let reported: HashSet<&PeerId> = reported.iter().collect();
    known
        .iter()
        .filter(|p| *p != local && !reported.contains(p))
        .cloned()
        .collect()
}

/// Deterministic initiator tie-break: of any pair, the lexicographically
/// lower id sends the offer, the higher one waits for it. Replaces the timed
/// join debounce; both sides observe each other's join and exactly one
/// initiates.
pub fn initiates_toward(local: &PeerId, remote: &PeerId) -> bool {
    local < remote
}
