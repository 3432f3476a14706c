use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;

use chrono::{DateTime, Utc};
use dashmap::mapref::entry::Entry;
use dashmap::DashMap;
use evlog::meta;
use once_cell::sync::OnceCell;
use tokio::task::JoinHandle;

use crate::lifecycle::classify;
use crate::model::{Poll, PollId};
use crate::runtime::get_logger;
use crate::support::duration::{english_units, normalize, NormalizedDuration};

/// Longest delay a single armed timer may carry. Longer waits fire early and
/// re-arm with the remainder on the resulting refresh pass, so polls running
/// past this horizon still notify, just via repeated short waits.
pub const MAX_TIMER_DELAY: std::time::Duration =
    std::time::Duration::from_millis(i32::MAX as u64);

#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum PollStatus {
    Created,
    Started,
    ReachedHalf,
    ReachedLastQuarter,
    Finished,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum NotificationKind {
    Info,
}

pub trait PollSource: Send + Sync {
    /// Fire-and-forget request to (re)load the poll collection. The scheduler
    /// calls this exactly once, on first use.
    fn request_load(&self);

    /// Latest available snapshot of all polls.
    fn polls(&self) -> anyhow::Result<Vec<Poll>>;
}

pub trait NotificationSink: Send + Sync {
    fn emit(&self, kind: NotificationKind, message: &str);
}

/// Injected formatting capability. Messages handed to the sink are fully
/// formatted; the scheduler itself never renders text.
pub trait MessageFormatter: Send + Sync {
    fn poll_started(&self, title: &str, remaining: &NormalizedDuration) -> String;
    fn poll_ends_in(&self, title: &str, remaining: &NormalizedDuration) -> String;
    fn poll_ended(&self, title: &str) -> String;
}

pub trait Clock: Send + Sync {
    fn now(&self) -> DateTime<Utc>;
}

pub struct SystemClock;

impl Clock for SystemClock {
    fn now(&self) -> DateTime<Utc> {
        Utc::now()
    }
}

pub struct EnglishFormatter;

impl MessageFormatter for EnglishFormatter {
    fn poll_started(&self, title: &str, remaining: &NormalizedDuration) -> String {
        format!("Poll '{}' started, ends in {}.", title, english_units(remaining))
    }

    fn poll_ends_in(&self, title: &str, remaining: &NormalizedDuration) -> String {
        format!("Poll '{}' ends in {}.", title, english_units(remaining))
    }

    fn poll_ended(&self, title: &str) -> String {
        format!("Poll '{}' ended.", title)
    }
}

/// Watches the poll collection and emits one notification per lifecycle
/// transition per poll: started, half-time, last quarter, ended.
///
/// One status entry and at most one pending wake-up timer exist per poll. A
/// refresh pass is safe to run redundantly; with unchanged inputs and an
/// unchanged clock it emits nothing. Must be used from within a tokio runtime.
pub struct NotificationScheduler {
    inner: Arc<Inner>,
}

struct Inner {
    source: Arc<dyn PollSource>,
    sink: Arc<dyn NotificationSink>,
    formatter: Arc<dyn MessageFormatter>,
    clock: Arc<dyn Clock>,

    statuses: DashMap<PollId, PollStatus>,
    timers: DashMap<PollId, JoinHandle<()>>,

    load_requested: OnceCell<()>,
    localization_ready: AtomicBool,
    disposed: AtomicBool,
}

impl NotificationScheduler {
    pub fn new(
        source: Arc<dyn PollSource>,
        sink: Arc<dyn NotificationSink>,
        formatter: Arc<dyn MessageFormatter>,
        clock: Arc<dyn Clock>,
    ) -> Self {
        Self {
            inner: Arc::new(Inner {
                source,
                sink,
                formatter,
                clock,
                statuses: DashMap::new(),
                timers: DashMap::new(),
                load_requested: OnceCell::new(),
                localization_ready: AtomicBool::new(false),
                disposed: AtomicBool::new(false),
            }),
        }
    }

    /// Run one refresh pass. Call after any state-affecting event; timer
    /// wake-ups call it internally.
    pub fn refresh(&self) {
        Inner::refresh(&self.inner);
    }

    /// Marks localized message formatting as available and runs the pass that
    /// was held back until now.
    pub fn set_localization_ready(&self) {
        self.inner.localization_ready.store(true, Ordering::SeqCst);
        Inner::refresh(&self.inner);
    }

    /// Cancels every pending timer and makes all further passes no-ops.
    pub fn dispose(&self) {
        self.inner.disposed.store(true, Ordering::SeqCst);

        for entry in self.inner.timers.iter() {
            entry.value().abort();
        }
        self.inner.timers.clear();
    }

    pub fn status_of(&self, poll_id: &str) -> Option<PollStatus> {
        self.inner.statuses.get(poll_id).map(|v| *v.value())
    }

    pub fn has_pending_timer(&self, poll_id: &str) -> bool {
        self.inner.timers.contains_key(poll_id)
    }
}

impl Inner {
    fn refresh(this: &Arc<Inner>) {
        if this.disposed.load(Ordering::SeqCst) {
            return;
        }

        this.load_requested.get_or_init(|| this.source.request_load());

        // Notifications must never carry unlocalized placeholder text; hold
        // every pass back until the formatter is usable.
        if !this.localization_ready.load(Ordering::SeqCst) {
            return;
        }

        let polls = match this.source.polls() {
            Ok(v) => v,
            Err(e) => {
                get_logger().error_with_err("Failed to read poll snapshot; skipping refresh pass.", &*e, None);
                return;
            }
        };

        for poll in &polls {
            if poll.start_time.is_some() && poll.resolved_end_time().is_none() {
                // Log once per poll, on first observation; the Created entry
                // marks it as seen across later passes and timer wake-ups.
                if let Entry::Vacant(entry) = this.statuses.entry(poll.id.clone()) {
                    get_logger().debug("Poll has no resolvable end time; skipped.", meta! {
                        "PollID" => poll.id.clone(),
                    });
                    entry.insert(PollStatus::Created);
                }
            }
        }

        let now = this.clock.now();
        let classified = classify(now, &polls);

        for poll in &classified.upcoming {
            this.statuses.entry(poll.id.clone()).or_insert(PollStatus::Created);
        }

        for poll in &classified.ongoing {
            Inner::advance_ongoing(this, poll, now);
        }

        for poll in &classified.finished {
            this.finish(poll);
        }
    }

    fn advance_ongoing(this: &Arc<Inner>, poll: &Poll, now: DateTime<Utc>) {
        // Classification guarantees both bounds are present for ongoing polls.
        let (start, end) = match (poll.start_time, poll.end_time) {
            (Some(start), Some(end)) => (start, end),
            _ => return,
        };

        let span = end - start;
        let half = start + span / 2;
        let three_quarter = start + (span * 3) / 4;

        let previous = this
            .statuses
            .get(&poll.id)
            .map(|v| *v.value())
            .unwrap_or(PollStatus::Created);

        let target = if now >= three_quarter {
            PollStatus::ReachedLastQuarter
        } else if now >= half {
            PollStatus::ReachedHalf
        } else {
            PollStatus::Started
        };

        // Only the most advanced transition observed in this pass emits;
        // states skipped over are recorded silently.
        if target > previous {
            this.statuses.insert(poll.id.clone(), target);

            let remaining = normalize((end - now).num_milliseconds() as f64);
            let message = match target {
                PollStatus::Started => this.formatter.poll_started(&poll.title, &remaining),
                _ => this.formatter.poll_ends_in(&poll.title, &remaining),
            };
            this.sink.emit(NotificationKind::Info, &message);
        }

        let status = previous.max(target);
        let next_deadline = match status {
            PollStatus::Created | PollStatus::Started => half,
            PollStatus::ReachedHalf => three_quarter,
            PollStatus::ReachedLastQuarter => end,
            PollStatus::Finished => {
                this.cancel_timer(&poll.id);
                return;
            }
        };

        Inner::arm_timer(this, &poll.id, next_deadline, now);
    }

    fn finish(&self, poll: &Poll) {
        let previous = self
            .statuses
            .get(&poll.id)
            .map(|v| *v.value())
            .unwrap_or(PollStatus::Created);

        if previous < PollStatus::Finished {
            self.statuses.insert(poll.id.clone(), PollStatus::Finished);
            let message = self.formatter.poll_ended(&poll.title);
            self.sink.emit(NotificationKind::Info, &message);
        }

        self.cancel_timer(&poll.id);
    }

    fn arm_timer(this: &Arc<Inner>, poll_id: &PollId, deadline: DateTime<Utc>, now: DateTime<Utc>) {
        this.cancel_timer(poll_id);

        if this.disposed.load(Ordering::SeqCst) {
            return;
        }

        let delay = timer_delay(now, deadline);
        let weak = Arc::downgrade(this);

        let handle = tokio::spawn(async move {
            tokio::time::sleep(delay).await;

            if let Some(inner) = weak.upgrade() {
                Inner::refresh(&inner);
            }
        });

        this.timers.insert(poll_id.clone(), handle);
    }

    fn cancel_timer(&self, poll_id: &str) {
        if let Some((_, handle)) = self.timers.remove(poll_id) {
            handle.abort();
        }
    }
}

/// Wake-up delay until `deadline`, clamped to `[0, MAX_TIMER_DELAY]`.
pub fn timer_delay(now: DateTime<Utc>, deadline: DateTime<Utc>) -> std::time::Duration {
    let ms = (deadline - now).num_milliseconds();
    let ms = ms.clamp(0, MAX_TIMER_DELAY.as_millis() as i64);
    std::time::Duration::from_millis(ms as u64)
}
