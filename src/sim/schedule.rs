//! Logical-clock scheduler
//!
//! Every periodic activity of a session is an [`IntervalTimer`] that can be
//! started and stopped on its own; delayed one-shot work is a [`Deadline`]
//! carrying the id of the entity it acts on. The session pulls due work in
//! chronological order with [`Scheduler::pop_due`] and runs each handler to
//! completion before asking for the next one.

use serde::{Deserialize, Serialize};

/// Periodic activities, in dispatch order for items due at the same instant
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum TimerKind {
    /// Countdown, once per second
    Clock,
    /// Progress accrual
    Progress,
    /// Enemy spawner (period shrinks over the session)
    Spawn,
    /// Enemy movement
    Movement,
    /// Boss spawn roll
    BossCheck,
    /// Taunt rotation for the scolding boss
    Taunt,
}

impl TimerKind {
    pub const ALL: [TimerKind; 6] = [
        TimerKind::Clock,
        TimerKind::Progress,
        TimerKind::Spawn,
        TimerKind::Movement,
        TimerKind::BossCheck,
        TimerKind::Taunt,
    ];

    fn index(self) -> usize {
        self as usize
    }
}

/// A repeating timer on the logical clock
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct IntervalTimer {
    period_ms: u64,
    next_due_ms: Option<u64>,
    /// Entity the timer belongs to, if any
    owner: Option<u32>,
}

impl IntervalTimer {
    /// Start (or restart) so the first firing is one period from `now_ms`
    pub fn start(&mut self, now_ms: u64, period_ms: u64, owner: Option<u32>) {
        let period_ms = period_ms.max(1);
        self.period_ms = period_ms;
        self.next_due_ms = Some(now_ms + period_ms);
        self.owner = owner;
    }

    pub fn stop(&mut self) {
        self.next_due_ms = None;
        self.owner = None;
    }

    pub fn is_running(&self) -> bool {
        self.next_due_ms.is_some()
    }

    pub fn next_due_ms(&self) -> Option<u64> {
        self.next_due_ms
    }

    pub fn period_ms(&self) -> u64 {
        self.period_ms
    }

    pub fn owner(&self) -> Option<u32> {
        self.owner
    }

    /// Consume the current firing and schedule the next one
    fn fire(&mut self) {
        if let Some(due) = self.next_due_ms {
            self.next_due_ms = Some(due + self.period_ms);
        }
    }
}

/// Delayed one-shot work, keyed on the entity it touches
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum Deferred {
    /// Drop a swatted enemy after its hit animation
    RemoveEnemy(u32),
    /// Boss grace period is over
    BossScoldBegins(u32),
    /// Boss scold window is over
    BossScoldEnds(u32),
    /// Boss exit animation is over, free the slot
    ClearBoss(u32),
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct Deadline {
    pub due_ms: u64,
    pub action: Deferred,
    /// Insertion order, breaks ties between equal due times
    seq: u64,
}

/// Work that came due
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Due {
    Timer(TimerKind),
    Deadline(Deferred),
}

/// All pending timed work of one session
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct Scheduler {
    timers: [IntervalTimer; 6],
    deadlines: Vec<Deadline>,
    next_seq: u64,
}

impl Scheduler {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn timer(&self, kind: TimerKind) -> &IntervalTimer {
        &self.timers[kind.index()]
    }

    pub fn start(&mut self, kind: TimerKind, now_ms: u64, period_ms: u64) {
        self.timers[kind.index()].start(now_ms, period_ms, None);
    }

    /// Start a timer that belongs to one entity
    pub fn start_owned(&mut self, kind: TimerKind, now_ms: u64, period_ms: u64, owner: u32) {
        self.timers[kind.index()].start(now_ms, period_ms, Some(owner));
    }

    pub fn stop(&mut self, kind: TimerKind) {
        self.timers[kind.index()].stop();
    }

    /// Stop `kind` only if it still belongs to `owner`
    pub fn stop_owned(&mut self, kind: TimerKind, owner: u32) {
        let timer = &mut self.timers[kind.index()];
        if timer.owner == Some(owner) {
            timer.stop();
        }
    }

    /// Schedule one-shot work at `due_ms`
    pub fn defer(&mut self, due_ms: u64, action: Deferred) {
        let seq = self.next_seq;
        self.next_seq += 1;
        self.deadlines.push(Deadline {
            due_ms,
            action,
            seq,
        });
    }

    /// Stop every timer and drop every deadline
    pub fn clear(&mut self) {
        for timer in &mut self.timers {
            timer.stop();
        }
        self.deadlines.clear();
    }

    pub fn is_idle(&self) -> bool {
        self.deadlines.is_empty() && self.timers.iter().all(|t| !t.is_running())
    }

    /// Earliest work due at or before `until_ms`
    ///
    /// Deadlines win ties against timers so expiries are visible to periodic
    /// work firing at the same instant. A returned timer is already
    /// rescheduled for its next period.
    pub fn pop_due(&mut self, until_ms: u64) -> Option<(u64, Due)> {
        let deadline = self
            .deadlines
            .iter()
            .enumerate()
            .filter(|(_, d)| d.due_ms <= until_ms)
            .min_by_key(|(_, d)| (d.due_ms, d.seq))
            .map(|(index, d)| (index, d.due_ms));

        let timer = TimerKind::ALL
            .iter()
            .filter_map(|&kind| {
                self.timers[kind.index()]
                    .next_due_ms
                    .filter(|&due| due <= until_ms)
                    .map(|due| (kind, due))
            })
            // min_by_key keeps the first of equal keys, i.e. dispatch order
            .min_by_key(|&(_, due)| due);

        match (deadline, timer) {
            (Some((index, dl_due)), Some((_, timer_due))) if dl_due <= timer_due => {
                let deadline = self.deadlines.remove(index);
                Some((deadline.due_ms, Due::Deadline(deadline.action)))
            }
            (Some((index, _)), None) => {
                let deadline = self.deadlines.remove(index);
                Some((deadline.due_ms, Due::Deadline(deadline.action)))
            }
            (_, Some((kind, due))) => {
                self.timers[kind.index()].fire();
                Some((due, Due::Timer(kind)))
            }
            (None, None) => None,
        }
    }
}
