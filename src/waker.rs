//! The wake-token: a capability to re-enqueue a specific task on a specific executor.

use std::cell::RefCell;
use std::rc::Rc;

use crate::executor::ExecutorInner;

/// A capability to schedule one specific task on one specific executor.
///
/// Logically the pair (executor, task) described by the data model. Cheap to clone — cloning
/// just bumps a reference count — and not owned by the reactor across `poll` boundaries; the
/// reactor stores a clone per registration and reconstructs nothing, since the clone already
/// is a full capability.
pub struct Waker {
    inner: Rc<RefCell<ExecutorInner>>,
    task_id: usize,
}

impl Waker {
    pub(crate) fn new(inner: Rc<RefCell<ExecutorInner>>, task_id: usize) -> Self {
        Self { inner, task_id }
    }

    /// Re-enqueues the associated task at the tail of its executor's run queue.
    ///
    /// Waking a task that is already queued, or that has already settled, is benign: the
    /// former is deduped against the queue, the latter is silently dropped the next time the
    /// executor would have dequeued it.
    pub fn wake(&self) {
        self.inner.borrow_mut().enqueue(self.task_id);
    }
}

impl Clone for Waker {
    fn clone(&self) -> Self {
        Self {
            inner: Rc::clone(&self.inner),
            task_id: self.task_id,
        }
    }
}

#[cfg(test)]
pub(crate) fn detached() -> Waker {
    // A waker not wired to any real executor run loop, for unit tests that only care about the
    // `Progress` a `Task::progress` call returns, not about actual rescheduling.
    Waker::new(Rc::new(RefCell::new(ExecutorInner::new(8))), 0)
}
