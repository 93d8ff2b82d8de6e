//! Priority queue of `(fire_time, handle)` entries with cancel-by-handle.
//!
//! Отмена ленивая: `cancel` удаляет запись из `live`, а устаревшие элементы
//! heap'а выбрасываются при `drain_due`. Handles никогда не переиспользуются,
//! поэтому stale entry не может "воскресить" чужой таймер.

use bevy::prelude::*;
use std::cmp::Reverse;
use std::collections::{BinaryHeap, HashMap};
use std::time::Duration;

/// Cancellation handle returned by [`TimerQueue::schedule`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Reflect)]
pub struct TimerHandle(u64);

#[derive(Debug)]
struct TimerEntry<T> {
    fire_at: Duration,
    repeat: Option<Duration>,
    payload: T,
}

/// Timer queue for one payload type (`TimerQueue<AttackTick>`, `TimerQueue<RespawnTick>`).
#[derive(Resource, Debug)]
pub struct TimerQueue<T: Send + Sync + 'static> {
    next_handle: u64,
    heap: BinaryHeap<Reverse<(Duration, TimerHandle)>>,
    live: HashMap<TimerHandle, TimerEntry<T>>,
}

impl<T: Send + Sync + 'static> Default for TimerQueue<T> {
    fn default() -> Self {
        Self {
            next_handle: 0,
            heap: BinaryHeap::new(),
            live: HashMap::new(),
        }
    }
}

impl<T: Clone + Send + Sync + 'static> TimerQueue<T> {
    /// One-shot timer: fires once at `now + delay`.
    pub fn schedule(&mut self, now: Duration, delay: Duration, payload: T) -> TimerHandle {
        self.insert(now + delay, None, payload)
    }

    /// Repeating timer: first fire at `now + delay`, then every `interval`.
    ///
    /// A zero interval degrades to a one-shot timer.
    pub fn schedule_repeating(
        &mut self,
        now: Duration,
        delay: Duration,
        interval: Duration,
        payload: T,
    ) -> TimerHandle {
        let repeat = (!interval.is_zero()).then_some(interval);
        self.insert(now + delay, repeat, payload)
    }

    /// Removes the timer. Returns `false` if it already fired (one-shot) or was cancelled.
    pub fn cancel(&mut self, handle: TimerHandle) -> bool {
        self.live.remove(&handle).is_some()
    }

    pub fn is_scheduled(&self, handle: TimerHandle) -> bool {
        self.live.contains_key(&handle)
    }

    /// Next fire time of a live timer.
    pub fn fire_time(&self, handle: TimerHandle) -> Option<Duration> {
        self.live.get(&handle).map(|entry| entry.fire_at)
    }

    pub fn len(&self) -> usize {
        self.live.len()
    }

    pub fn is_empty(&self) -> bool {
        self.live.is_empty()
    }

    /// Pops every entry due at `now` in fire-time order.
    ///
    /// Repeating entries are re-armed at `fire_at + interval` (no drift from tick jitter).
    pub fn drain_due(&mut self, now: Duration) -> Vec<(TimerHandle, T)> {
        let mut due = Vec::new();

        while let Some(Reverse((fire_at, handle))) = self.heap.peek().copied() {
            if fire_at > now {
                break;
            }
            self.heap.pop();

            let Some(entry) = self.live.get_mut(&handle) else {
                continue; // cancelled
            };
            if entry.fire_at != fire_at {
                continue; // stale
            }

            match entry.repeat {
                Some(interval) => {
                    entry.fire_at = fire_at + interval;
                    due.push((handle, entry.payload.clone()));
                    self.heap.push(Reverse((entry.fire_at, handle)));
                }
                None => {
                    if let Some(entry) = self.live.remove(&handle) {
                        due.push((handle, entry.payload));
                    }
                }
            }
        }

        due
    }

    fn insert(&mut self, fire_at: Duration, repeat: Option<Duration>, payload: T) -> TimerHandle {
        let handle = TimerHandle(self.next_handle);
        self.next_handle += 1;

        self.live.insert(
            handle,
            TimerEntry {
                fire_at,
                repeat,
                payload,
            },
        );
        self.heap.push(Reverse((fire_at, handle)));
        handle
    }
}
