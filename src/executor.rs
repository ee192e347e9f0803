//! The run-queue-driven cooperative scheduler.

use std::cell::RefCell;
use std::collections::{HashMap, HashSet};
use std::fmt;
use std::rc::Rc;

use crate::error::ReactorError;
use crate::queue::RunQueue;
use crate::reactor::Reactor;
use crate::task::{Progress, Task};
use crate::waker::Waker;

/// Run queue capacity used when a caller builds an executor without specifying one.
pub const DEFAULT_CAPACITY: usize = 256;

/// Type-erased settlement outcome used internally once a task's own `Ok`/`Err` types have
/// served their purpose (reporting which branch of `progress` a top-level task took).
enum TaskState {
    Pending,
    Settled,
}

/// Object-safe facade over [`Task`] so the executor's task table can hold tasks of unrelated
/// `Ok`/`Err` types side by side. Only needed for top-level tasks; combinators compose `Task`
/// generically and never need this erasure.
trait Advance {
    fn advance(&mut self, reactor: &Reactor, waker: Waker) -> TaskState;
}

impl<T> Advance for T
where
    T: Task,
    T::Err: fmt::Debug,
{
    fn advance(&mut self, reactor: &Reactor, waker: Waker) -> TaskState {
        match self.progress(reactor, waker) {
            Progress::Pending => TaskState::Pending,
            Progress::Completed(_) => TaskState::Settled,
            Progress::Failure(err) => {
                log::warn!("top-level task settled with an error: {err:?}");
                TaskState::Settled
            }
        }
    }
}

/// Executor-internal state shared between [`Executor`] and every [`Waker`] it has handed out.
pub(crate) struct ExecutorInner {
    tasks: HashMap<usize, Box<dyn Advance>>,
    queue: RunQueue,
    queued: HashSet<usize>,
    next_id: usize,
}

impl ExecutorInner {
    pub(crate) fn new(capacity: usize) -> Self {
        Self {
            tasks: HashMap::new(),
            queue: RunQueue::new(capacity),
            queued: HashSet::new(),
            next_id: 0,
        }
    }

    fn alloc_id(&mut self) -> usize {
        let id = self.next_id;
        self.next_id += 1;
        id
    }

    /// Enqueues `id` at the tail of the run queue, deduping against a wake for a task that is
    /// already queued. Pushing past capacity is a contract violation on the caller's part (they
    /// are required to keep the live-pending count within the stated capacity) — it is logged
    /// and the wake is dropped rather than corrupting the ring buffer.
    pub(crate) fn enqueue(&mut self, id: usize) {
        if !self.queued.insert(id) {
            return;
        }
        if !self.queue.push(id) {
            self.queued.remove(&id);
            log::warn!(
                "run queue at capacity ({}); dropping wake for task {id}",
                self.queue.capacity()
            );
        }
    }

    fn dequeue(&mut self) -> Option<usize> {
        let id = self.queue.pop()?;
        self.queued.remove(&id);
        Some(id)
    }
}

/// Configures and builds an [`Executor`].
///
/// Run-queue capacity is the only knob today; the builder shape leaves room to grow without
/// breaking callers, matching the builder-with-defaults pattern this corpus uses for its own
/// runtime constructors.
pub struct ExecutorBuilder {
    capacity: usize,
}

impl ExecutorBuilder {
    pub fn new() -> Self {
        Self {
            capacity: DEFAULT_CAPACITY,
        }
    }

    /// Sets the run queue's fixed capacity. Callers must ensure the number of simultaneously
    /// pending tasks never exceeds this value.
    pub fn capacity(mut self, capacity: usize) -> Self {
        self.capacity = capacity;
        self
    }

    pub fn build(self) -> Result<Executor, ReactorError> {
        Executor::new(self.capacity)
    }
}

impl Default for ExecutorBuilder {
    fn default() -> Self {
        Self::new()
    }
}

/// The cooperative scheduler: a bounded FIFO run queue paired with a single reactor instance.
pub struct Executor {
    inner: Rc<RefCell<ExecutorInner>>,
    reactor: Reactor,
}

impl Executor {
    /// Creates an executor whose run queue holds up to `capacity` pending tasks and which owns
    /// a fresh reactor.
    pub fn new(capacity: usize) -> Result<Self, ReactorError> {
        Ok(Self {
            inner: Rc::new(RefCell::new(ExecutorInner::new(capacity))),
            reactor: Reactor::new()?,
        })
    }

    /// Marks `task` active and enqueues it. Safe to call both before and during [`run`](Self::run).
    pub fn spawn<T>(&self, task: T)
    where
        T: Task + 'static,
        T::Err: fmt::Debug,
    {
        let mut inner = self.inner.borrow_mut();
        let id = inner.alloc_id();
        log::trace!("spawning task {id}");
        inner.tasks.insert(id, Box::new(task));
        inner.enqueue(id);
    }

    /// Drains the run queue and the reactor to quiescence.
    ///
    /// Returns once the run queue is empty and the reactor has no remaining registrations —
    /// never before. A reactor failure while blocked in `poll` is fatal.
    pub fn run(&mut self) {
        loop {
            loop {
                let Some(id) = self.inner.borrow_mut().dequeue() else {
                    break;
                };
                let Some(mut task) = self.inner.borrow_mut().tasks.remove(&id) else {
                    // Settled already, or a duplicate/spurious wake raced its removal.
                    continue;
                };

                log::trace!("polling task {id}");
                let waker = Waker::new(Rc::clone(&self.inner), id);
                match task.advance(&self.reactor, waker) {
                    TaskState::Pending => {
                        self.inner.borrow_mut().tasks.insert(id, task);
                    }
                    TaskState::Settled => {
                        log::trace!("task {id} settled");
                    }
                }
            }

            if !self.reactor.has_registrations() {
                break;
            }

            log::debug!("run queue empty; blocking on reactor");
            self.reactor
                .poll()
                .expect("reactor poll failed; the event loop cannot continue");
        }
    }

    /// Releases the reactor and the run queue storage. Must only be called after `run` returns.
    ///
    /// Rust's ownership already guarantees this on drop; `destroy` exists so the operation this
    /// runtime's external interface names has a visible, explicit call site.
    pub fn destroy(self) {
        log::trace!("destroying executor");
    }
}
