//! The cooperative computation contract every future in this runtime implements.

use crate::reactor::Reactor;
use crate::waker::Waker;

/// The outcome of one non-blocking step of a [`Task`].
///
/// This is the Rust-native rendering of the three-valued settlement described by the task
/// data model: `Pending`, `Completed`, `Failure`. Rather than a bare state tag plus separate
/// `ok`/`errcode` fields a caller must remember to treat as "valid iff settled that way", the
/// settled variants carry their payload directly, so the validity rule is enforced by the type
/// checker instead of by convention.
pub enum Progress<Ok, Err> {
    /// No further progress could be made this step. The task has, by contract, either
    /// registered a wake-up source with the reactor or arranged to call its own waker.
    Pending,
    /// The task has settled successfully and must not be progressed again by its owner.
    Completed(Ok),
    /// The task has settled with a failure and must not be progressed again by its owner.
    Failure(Err),
}

/// A reusable cooperative computation.
///
/// A `Task` is progressed by its owner (the executor, for a top-level task, or a combinator,
/// for an inner one) until it settles. `is_active` from the data model is not a field here —
/// a task is active exactly while its owner still holds it, which in this crate means: present
/// in the executor's task table, or owned by a still-racing combinator state. There is no
/// separate boolean that could fall out of sync with that fact.
pub trait Task {
    /// Opaque input seeded by a parent combinator before the task's first progression.
    /// Leaf tasks that take no externally supplied input use `()`.
    type Arg;
    /// The value produced on successful settlement.
    type Ok;
    /// The value produced on failed settlement.
    type Err;

    /// Seeds this task's input. Called by a parent combinator (namely [`crate::combinators::Then`])
    /// at most once, before the first call to [`progress`](Task::progress). Leaf tasks that
    /// ignore their argument, or take none, can rely on the default no-op implementation.
    fn set_arg(&mut self, _arg: Self::Arg) {}

    /// Advances this task by one non-blocking step.
    ///
    /// `reactor` is the owning executor's reactor, through which a task that needs to suspend
    /// registers a descriptor and interest. `waker` is this task's capability to re-enqueue
    /// itself; it is cheap to clone and may be handed to inner futures or stored for later use,
    /// but must not be invoked after the task has settled.
    ///
    /// A compliant implementation must never be called again by its owner once it has returned
    /// [`Progress::Completed`] or [`Progress::Failure`].
    fn progress(&mut self, reactor: &Reactor, waker: Waker) -> Progress<Self::Ok, Self::Err>;
}
