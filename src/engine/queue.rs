//! Unbounded FIFO job queue shared by the walker (sole producer) and the
//! worker pool (consumers).
//!
//! `pop` blocks until a job arrives or the queue is finished and drained.
//! `finish` is the "no more jobs" signal; `abort` additionally drops whatever
//! is still pending so workers wind down after their current job.

use parking_lot::{Condvar, Mutex};
use std::collections::VecDeque;

#[derive(Debug)]
struct State<T> {
    items: VecDeque<T>,
    done: bool,
}

#[derive(Debug)]
pub struct JobQueue<T> {
    state: Mutex<State<T>>,
    ready: Condvar,
}

impl<T> Default for JobQueue<T> {
    fn default() -> Self {
        Self::new()
    }
}

impl<T> JobQueue<T> {
    pub fn new() -> Self {
        Self {
            state: Mutex::new(State {
                items: VecDeque::new(),
                done: false,
            }),
            ready: Condvar::new(),
        }
    }

    /// Enqueue a job and wake one waiter. Returns false (job dropped) once the
    /// queue has been finished or aborted.
    pub fn push(&self, item: T) -> bool {
        let mut st = self.state.lock();
        if st.done {
            return false;
        }
        st.items.push_back(item);
        drop(st);
        self.ready.notify_one();
        true
    }

    /// Next job in FIFO order, or `None` once finished and empty.
    pub fn pop(&self) -> Option<T> {
        let mut st = self.state.lock();
        loop {
            if let Some(item) = st.items.pop_front() {
                return Some(item);
            }
            if st.done {
                return None;
            }
            self.ready.wait(&mut st);
        }
    }

    /// No more pushes. Idempotent.
    pub fn finish(&self) {
        self.state.lock().done = true;
        self.ready.notify_all();
    }

    /// Finish and discard pending jobs; returns how many were dropped.
    pub fn abort(&self) -> usize {
        let dropped = {
            let mut st = self.state.lock();
            st.done = true;
            let n = st.items.len();
            st.items.clear();
            n
        };
        self.ready.notify_all();
        dropped
    }

    #[cfg(test)]
    pub(super) fn is_finished(&self) -> bool {
        self.state.lock().done
    }

    #[cfg(test)]
    pub(super) fn is_empty(&self) -> bool {
        self.state.lock().items.is_empty()
    }
}
