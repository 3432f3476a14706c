use std::collections::HashMap;

use chrono::{DateTime, Duration, Utc};
use serde::{Deserialize, Serialize};

pub type PollId = String;
pub type UserId = String;
pub type GroupId = String;
pub type EventId = String;

/// Event type a user must be allowed to send in order to cast a vote.
pub const VOTE_EVENT_TYPE: &str = "poll.vote";

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum PollType {
    Open,
    Secret,
    ByName,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum ResultType {
    Visible,
    Invisible,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PollAnswer {
    pub id: String,
    pub label: String,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Poll {
    pub id: PollId,
    pub title: String,
    pub question: String,
    pub description: String,
    pub poll_type: PollType,
    pub answers: Vec<PollAnswer>,
    pub duration_minutes: i64,
    pub result_type: ResultType,
    pub start_time: Option<DateTime<Utc>>,
    pub end_time: Option<DateTime<Utc>>,
    pub start_event_id: Option<EventId>,
    pub groups: Option<Vec<PollGroup>>,
}

impl Poll {
    /// The stored end time, or one derived from `start_time + duration_minutes`
    /// for polls written before the end time was persisted.
    pub fn resolved_end_time(&self) -> Option<DateTime<Utc>> {
        if let Some(end) = self.end_time {
            return Some(end);
        }

        match self.start_time {
            Some(start) if self.duration_minutes > 0 => {
                Some(start + Duration::minutes(self.duration_minutes))
            }
            _ => None,
        }
    }

    /// One-way migration: returns a copy with `end_time` filled in where it can
    /// be derived. Never mutates in place.
    pub fn with_derived_end_time(&self) -> Poll {
        let mut poll = self.clone();
        poll.end_time = self.resolved_end_time();
        poll
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PollGroup {
    pub id: GroupId,
    pub event_id: EventId,
    pub abbreviation: String,
    pub color: String,
    pub voting_rights: HashMap<UserId, VotingRight>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "state", rename_all = "camelCase")]
pub enum VotingRight {
    /// Member is present and votes personally.
    Active,
    /// Member is absent and casts no vote.
    Invalid,
    /// Member is absent and has delegated their vote.
    #[serde(rename_all = "camelCase")]
    Represented { represented_by: UserId },
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum GroupRole {
    Delegate,
    Representative,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct GroupMember {
    pub user_id: UserId,
    pub role: GroupRole,
}

/// Authoritative upstream membership of one voting bloc, versioned by the
/// event that last changed it.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct GroupSnapshot {
    pub id: GroupId,
    pub event_id: EventId,
    pub abbreviation: String,
    pub color: String,
    pub members: Vec<GroupMember>,
}

impl GroupSnapshot {
    pub fn has_representative(&self, user_id: &str) -> bool {
        self.members
            .iter()
            .any(|m| m.role == GroupRole::Representative && m.user_id == user_id)
    }
}
