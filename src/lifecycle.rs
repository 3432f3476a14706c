use chrono::{DateTime, Utc};

use crate::model::Poll;

/// Polls partitioned by lifecycle position relative to a fixed "now". Polls in
/// the output carry a derived end time where the stored one was missing.
#[derive(Debug, Default)]
pub struct ClassifiedPolls {
    pub upcoming: Vec<Poll>,
    pub ongoing: Vec<Poll>,
    pub finished: Vec<Poll>,
}

pub fn classify(now: DateTime<Utc>, polls: &[Poll]) -> ClassifiedPolls {
    let mut classified = ClassifiedPolls::default();

    for poll in polls {
        let poll = poll.with_derived_end_time();

        match (poll.start_time, poll.end_time) {
            (None, _) => classified.upcoming.push(poll),
            (Some(start), Some(end)) => {
                if end <= now {
                    classified.finished.push(poll);
                } else if start <= now {
                    classified.ongoing.push(poll);
                }
                // start in the future: scheduled, not yet in any bucket
            }
            // started but end unresolvable; the scheduler logs these
            (Some(_), None) => {}
        }
    }

    classified
}

#[cfg(test)]
mod tests {
    use chrono::TimeZone;

    use crate::model::{PollAnswer, PollType, ResultType};

    use super::*;

    fn poll(id: &str, start: Option<DateTime<Utc>>, end: Option<DateTime<Utc>>, minutes: i64) -> Poll {
        Poll {
            id: id.to_owned(),
            title: id.to_owned(),
            question: "?".to_owned(),
            description: String::new(),
            poll_type: PollType::Open,
            answers: vec![PollAnswer { id: "1".to_owned(), label: "Yes".to_owned() }],
            duration_minutes: minutes,
            result_type: ResultType::Visible,
            start_time: start,
            end_time: end,
            start_event_id: None,
            groups: None,
        }
    }

    fn at(h: u32, m: u32, s: u32) -> DateTime<Utc> {
        Utc.with_ymd_and_hms(2022, 3, 1, h, m, s).unwrap()
    }

    #[test]
    fn partitions_by_lifecycle() {
        let polls = vec![
            poll("upcoming", None, None, 10),
            poll("ongoing", Some(at(9, 0, 0)), Some(at(10, 0, 0)), 60),
            poll("finished", Some(at(7, 0, 0)), Some(at(8, 0, 0)), 60),
        ];

        let classified = classify(at(9, 30, 0), &polls);

        assert_eq!(classified.upcoming.len(), 1);
        assert_eq!(classified.upcoming[0].id, "upcoming");
        assert_eq!(classified.ongoing.len(), 1);
        assert_eq!(classified.ongoing[0].id, "ongoing");
        assert_eq!(classified.finished.len(), 1);
        assert_eq!(classified.finished[0].id, "finished");
    }

    #[test]
    fn derives_missing_end_time_before_bucketing() {
        let polls = vec![poll("p", Some(at(9, 0, 0)), None, 30)];

        let classified = classify(at(9, 10, 0), &polls);

        assert_eq!(classified.ongoing.len(), 1);
        assert_eq!(classified.ongoing[0].end_time, Some(at(9, 30, 0)));
    }

    #[test]
    fn poll_ending_exactly_now_is_finished() {
        let polls = vec![poll("p", Some(at(9, 0, 0)), Some(at(9, 30, 0)), 30)];

        let classified = classify(at(9, 30, 0), &polls);

        assert!(classified.ongoing.is_empty());
        assert_eq!(classified.finished.len(), 1);
    }

    #[test]
    fn poll_starting_exactly_now_is_ongoing() {
        let polls = vec![poll("p", Some(at(9, 0, 0)), Some(at(9, 30, 0)), 30)];

        let classified = classify(at(9, 0, 0), &polls);

        assert_eq!(classified.ongoing.len(), 1);
    }

    #[test]
    fn future_start_lands_in_no_bucket() {
        let polls = vec![poll("p", Some(at(10, 0, 0)), Some(at(11, 0, 0)), 60)];

        let classified = classify(at(9, 0, 0), &polls);

        assert!(classified.upcoming.is_empty());
        assert!(classified.ongoing.is_empty());
        assert!(classified.finished.is_empty());
    }

    #[test]
    fn unresolvable_end_is_skipped() {
        let polls = vec![poll("p", Some(at(9, 0, 0)), None, 0)];

        let classified = classify(at(9, 10, 0), &polls);

        assert!(classified.upcoming.is_empty());
        assert!(classified.ongoing.is_empty());
        assert!(classified.finished.is_empty());
    }

    #[test]
    fn never_mutates_input() {
        let polls = vec![poll("p", Some(at(9, 0, 0)), None, 30)];

        classify(at(9, 10, 0), &polls);

        assert_eq!(polls[0].end_time, None);
    }
}
