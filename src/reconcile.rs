use std::collections::HashMap;

use crate::model::{GroupRole, GroupSnapshot, PollGroup, VotingRight};

/// Merges authoritative upstream group membership with previously edited
/// voting rights.
///
/// Groups whose stored version already matches upstream pass through
/// structurally unchanged, so callers can detect no-ops with `==`. Groups
/// absent upstream are dropped; output order follows the upstream snapshots.
/// Inputs are never mutated.
pub fn reconcile(existing: &[PollGroup], upstream: &[GroupSnapshot]) -> Vec<PollGroup> {
    let existing_by_id: HashMap<&str, &PollGroup> =
        existing.iter().map(|g| (g.id.as_str(), g)).collect();

    let mut groups = Vec::with_capacity(upstream.len());

    for snapshot in upstream {
        match existing_by_id.get(snapshot.id.as_str()) {
            Some(group) if group.event_id == snapshot.event_id => groups.push((*group).clone()),
            Some(group) => groups.push(rebuild(group, snapshot)),
            None => groups.push(fresh(snapshot)),
        }
    }

    groups
}

/// A group seen for the first time: every current delegate votes personally.
fn fresh(snapshot: &GroupSnapshot) -> PollGroup {
    let voting_rights = snapshot
        .members
        .iter()
        .filter(|m| m.role == GroupRole::Delegate)
        .map(|m| (m.user_id.clone(), VotingRight::Active))
        .collect();

    PollGroup {
        id: snapshot.id.clone(),
        event_id: snapshot.event_id.clone(),
        abbreviation: snapshot.abbreviation.clone(),
        color: snapshot.color.clone(),
        voting_rights,
    }
}

/// The upstream definition moved on: rebuild from its membership, carrying
/// over each surviving delegate's recorded right. A right delegated to
/// someone who is no longer a representative is downgraded to invalid rather
/// than kept dangling.
fn rebuild(prior: &PollGroup, snapshot: &GroupSnapshot) -> PollGroup {
    let mut voting_rights = HashMap::new();

    for member in &snapshot.members {
        if member.role != GroupRole::Delegate {
            continue;
        }

        let right = match prior.voting_rights.get(&member.user_id) {
            Some(VotingRight::Represented { represented_by })
                if !snapshot.has_representative(represented_by) =>
            {
                VotingRight::Invalid
            }
            Some(right) => right.clone(),
            None => VotingRight::Active,
        };

        voting_rights.insert(member.user_id.clone(), right);
    }

    PollGroup {
        id: snapshot.id.clone(),
        event_id: snapshot.event_id.clone(),
        abbreviation: snapshot.abbreviation.clone(),
        color: snapshot.color.clone(),
        voting_rights,
    }
}
