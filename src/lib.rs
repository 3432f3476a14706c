pub mod lifecycle;
pub mod model;
pub mod permissions;
pub mod reconcile;
pub mod runtime;
pub mod scheduler;
pub mod support;

pub use lifecycle::{classify, ClassifiedPolls};
pub use model::{
    GroupMember, GroupRole, GroupSnapshot, Poll, PollAnswer, PollGroup, PollType, ResultType,
    VotingRight, VOTE_EVENT_TYPE,
};
pub use permissions::{has_voting_permission_issue, responsible_voter, PowerLevelEvaluator};
pub use reconcile::reconcile;
pub use scheduler::{
    Clock, EnglishFormatter, MessageFormatter, NotificationKind, NotificationScheduler,
    NotificationSink, PollSource, PollStatus, SystemClock, MAX_TIMER_DELAY,
};
pub use support::duration::{
    english_units, normalize, normalize_capped, DurationUnit, NormalizedDuration,
};
