//! Virtual timer service
//!
//! A deterministic stand-in for browser `setInterval`/`setTimeout`. Time only
//! moves when the host advances it, so every run is reproducible.
//!
//! Each timer carries a [`TimerTag`] naming its owner and the phase
//! generation it was armed for. Owners must compare the tag against their
//! current generation before acting on a firing.

use serde::{Deserialize, Serialize};

/// Handle to an armed timer
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct TimerId(u64);

/// What a timer drives
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum TimerPurpose {
    /// The single once-per-second phase countdown
    PhaseSecond,
    /// Game-specific sub-timer (balloon motion, guard patrols, question clock)
    SubTick,
    /// One-shot delay owned by a sequencer
    Delay,
}

/// Context a timer was armed in
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct TimerTag {
    pub owner: u32,
    pub generation: u64,
    pub purpose: TimerPurpose,
}

/// A timer firing
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Fired {
    pub id: TimerId,
    pub tag: TimerTag,
    /// Virtual time of the firing
    pub at_ms: u64,
}

#[derive(Debug, Clone)]
struct Timer {
    id: TimerId,
    tag: TimerTag,
    due_ms: u64,
    /// `Some` for repeating timers
    interval_ms: Option<u64>,
}

/// Cancelable repeating and one-shot timers over virtual time
#[derive(Debug, Clone, Default)]
pub struct Scheduler {
    now_ms: u64,
    next_id: u64,
    next_owner: u32,
    timers: Vec<Timer>,
}

impl Scheduler {
    pub fn new() -> Self {
        Self::default()
    }

    /// Current virtual time
    pub fn now_ms(&self) -> u64 {
        self.now_ms
    }

    /// Number of armed timers
    pub fn active(&self) -> usize {
        self.timers.len()
    }

    /// Number of armed timers belonging to `owner`
    pub fn active_for(&self, owner: u32) -> usize {
        self.timers.iter().filter(|t| t.tag.owner == owner).count()
    }

    /// Allocate a fresh owner id for a component that arms timers
    pub fn allocate_owner(&mut self) -> u32 {
        self.next_owner += 1;
        self.next_owner
    }

    /// Arm a repeating timer
    pub fn every(&mut self, interval_ms: u64, tag: TimerTag) -> TimerId {
        let interval_ms = interval_ms.max(1);
        self.arm(interval_ms, Some(interval_ms), tag)
    }

    /// Arm a one-shot timer
    pub fn after(&mut self, delay_ms: u64, tag: TimerTag) -> TimerId {
        self.arm(delay_ms, None, tag)
    }

    fn arm(&mut self, delay_ms: u64, interval_ms: Option<u64>, tag: TimerTag) -> TimerId {
        self.next_id += 1;
        let id = TimerId(self.next_id);
        self.timers.push(Timer {
            id,
            tag,
            due_ms: self.now_ms + delay_ms,
            interval_ms,
        });
        id
    }

    /// Cancel a timer. Returns false if it was not armed.
    pub fn cancel(&mut self, id: TimerId) -> bool {
        let before = self.timers.len();
        self.timers.retain(|t| t.id != id);
        self.timers.len() != before
    }

    /// Cancel every timer belonging to `owner`
    pub fn cancel_owner(&mut self, owner: u32) -> usize {
        let before = self.timers.len();
        self.timers.retain(|t| t.tag.owner != owner);
        before - self.timers.len()
    }

    pub fn is_armed(&self, id: TimerId) -> bool {
        self.timers.iter().any(|t| t.id == id)
    }

    /// Pop the earliest firing due at or before `until_ms`.
    ///
    /// Virtual time jumps to the firing's due time so that timers armed while
    /// handling it are scheduled relative to that instant.
    pub fn pop_due(&mut self, until_ms: u64) -> Option<Fired> {
        let idx = self
            .timers
            .iter()
            .enumerate()
            .filter(|(_, t)| t.due_ms <= until_ms)
            .min_by_key(|(_, t)| (t.due_ms, t.id))
            .map(|(i, _)| i)?;

        let timer = &mut self.timers[idx];
        let fired = Fired {
            id: timer.id,
            tag: timer.tag,
            at_ms: timer.due_ms,
        };
        self.now_ms = self.now_ms.max(timer.due_ms);

        match timer.interval_ms {
            Some(interval) => timer.due_ms += interval,
            None => {
                self.timers.swap_remove(idx);
            }
        }

        Some(fired)
    }

    /// Advance virtual time, handing each firing to `dispatch` in due order
    pub fn run_for(&mut self, elapsed_ms: u64, mut dispatch: impl FnMut(&mut Scheduler, Fired)) {
        let until = self.now_ms + elapsed_ms;
        while let Some(fired) = self.pop_due(until) {
            dispatch(self, fired);
        }
        self.now_ms = until;
    }

    /// Advance virtual time and collect every firing
    pub fn advance(&mut self, elapsed_ms: u64) -> Vec<Fired> {
        let mut fired = Vec::new();
        self.run_for(elapsed_ms, |_, f| fired.push(f));
        fired
    }
}
