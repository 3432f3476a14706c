use crate::model::{PollGroup, UserId, VotingRight, VOTE_EVENT_TYPE};

/// Host-platform power-level check, consumed as an opaque capability.
pub trait PowerLevelEvaluator {
    fn can_perform(&self, user_id: &str, event_type: &str) -> bool;
}

/// The user whose power level must cover the vote for this delegate entry.
pub fn responsible_voter<'a>(delegate: &'a UserId, right: &'a VotingRight) -> &'a str {
    match right {
        VotingRight::Represented { represented_by } => represented_by.as_str(),
        VotingRight::Active | VotingRight::Invalid => delegate.as_str(),
    }
}

/// True if any responsible voter across the given groups currently lacks
/// permission to send the vote event. Callers wanting to know *which* user
/// failed run [`responsible_voter`] per entry themselves.
pub fn has_voting_permission_issue(
    groups: &[PollGroup],
    power_levels: &dyn PowerLevelEvaluator,
) -> bool {
    groups.iter().any(|group| {
        group.voting_rights.iter().any(|(delegate, right)| {
            !power_levels.can_perform(responsible_voter(delegate, right), VOTE_EVENT_TYPE)
        })
    })
}

#[cfg(test)]
mod tests {
    use std::collections::HashSet;

    use crate::model::PollGroup;

    use super::*;

    struct AllowList(HashSet<String>);

    impl AllowList {
        fn of(users: &[&str]) -> Self {
            Self(users.iter().map(|u| (*u).to_owned()).collect())
        }
    }

    impl PowerLevelEvaluator for AllowList {
        fn can_perform(&self, user_id: &str, event_type: &str) -> bool {
            assert_eq!(event_type, VOTE_EVENT_TYPE);
            self.0.contains(user_id)
        }
    }

    fn group(rights: Vec<(&str, VotingRight)>) -> PollGroup {
        PollGroup {
            id: "g-1".to_owned(),
            event_id: "e-1".to_owned(),
            abbreviation: "G1".to_owned(),
            color: "#336699".to_owned(),
            voting_rights: rights
                .into_iter()
                .map(|(user, right)| (user.to_owned(), right))
                .collect(),
        }
    }

    #[test]
    fn no_issue_when_every_voter_is_permitted() {
        let groups = vec![group(vec![
            ("alice", VotingRight::Active),
            ("bob", VotingRight::Represented { represented_by: "carol".to_owned() }),
        ])];

        let allowed = AllowList::of(&["alice", "carol"]);
        assert!(!has_voting_permission_issue(&groups, &allowed));
    }

    #[test]
    fn active_delegate_without_permission_is_an_issue() {
        let groups = vec![group(vec![("alice", VotingRight::Active)])];

        let allowed = AllowList::of(&[]);
        assert!(has_voting_permission_issue(&groups, &allowed));
    }

    #[test]
    fn represented_entry_checks_the_representative() {
        let groups = vec![group(vec![
            ("bob", VotingRight::Represented { represented_by: "carol".to_owned() }),
        ])];

        // bob may vote but carol, who carries his vote, may not.
        let allowed = AllowList::of(&["bob"]);
        assert!(has_voting_permission_issue(&groups, &allowed));
    }

    #[test]
    fn invalid_entry_still_checks_the_delegate() {
        let groups = vec![group(vec![("alice", VotingRight::Invalid)])];

        let allowed = AllowList::of(&[]);
        assert!(has_voting_permission_issue(&groups, &allowed));
    }

    #[test]
    fn empty_groups_have_no_issue() {
        let allowed = AllowList::of(&[]);
        assert!(!has_voting_permission_issue(&[], &allowed));
    }

    #[test]
    fn responsible_voter_resolution() {
        let alice = "alice".to_owned();

        assert_eq!(responsible_voter(&alice, &VotingRight::Active), "alice");
        assert_eq!(responsible_voter(&alice, &VotingRight::Invalid), "alice");
        assert_eq!(
            responsible_voter(
                &alice,
                &VotingRight::Represented { represented_by: "carol".to_owned() },
            ),
            "carol",
        );
    }
}
