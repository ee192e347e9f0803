use super::Either;
use crate::reactor::Reactor;
use crate::task::{Progress, Task};
use crate::waker::Waker;

/// Concurrent disjunction: runs `fut1` and `fut2` side by side, completing as soon as either
/// succeeds. The loser is abandoned — once a side has failed or lost the race, it is never
/// progressed again, and its resources are whatever it has already registered (the combinator
/// does not explicitly cancel it; see the crate's resource model notes).
///
/// On total failure the composite reports `fut1`'s error, a deterministic (if arbitrary) choice
/// the data model leaves open to the implementer.
pub struct Select<F1: Task, F2: Task> {
    state: State<F1, F2>,
}

enum State<F1: Task, F2: Task> {
    /// Neither side has failed yet (the data model's `NONE` discriminator).
    BothRacing(F1, F2),
    /// `fut1` failed; `fut2` is still racing (data model: `FUT1_FAILED`).
    Fut1Failed(F2, F1::Err),
    /// `fut2` failed; `fut1` is still racing (data model: `FUT2_FAILED`).
    Fut2Failed(F1, F2::Err),
    /// Both sides have failed; the failure is reported on the *next* call, per the data
    /// model's note that a simultaneous second failure transitions to `BOTH_FAILED` and
    /// reports on the following cycle rather than the one that observed it. This combinator
    /// wakes itself when entering this state so that next cycle happens without an external
    /// stimulus.
    BothFailed(F1::Err),
    /// Settled and reported; a compliant owner never polls this again.
    Settled,
}

impl<F1: Task, F2: Task> Select<F1, F2> {
    pub(crate) fn new(fut1: F1, fut2: F2) -> Self {
        Self {
            state: State::BothRacing(fut1, fut2),
        }
    }
}

impl<F1: Task, F2: Task> Task for Select<F1, F2> {
    type Arg = ();
    type Ok = Either<F1::Ok, F2::Ok>;
    type Err = F1::Err;

    fn progress(&mut self, reactor: &Reactor, waker: Waker) -> Progress<Self::Ok, Self::Err> {
        match std::mem::replace(&mut self.state, State::Settled) {
            State::BothRacing(mut fut1, mut fut2) => match fut1.progress(reactor, waker.clone()) {
                Progress::Completed(ok) => Progress::Completed(Either::Left(ok)),
                Progress::Failure(e1) => match fut2.progress(reactor, waker.clone()) {
                    Progress::Completed(ok) => Progress::Completed(Either::Right(ok)),
                    Progress::Failure(_e2) => {
                        self.state = State::BothFailed(e1);
                        waker.wake();
                        Progress::Pending
                    }
                    Progress::Pending => {
                        self.state = State::Fut1Failed(fut2, e1);
                        Progress::Pending
                    }
                },
                Progress::Pending => match fut2.progress(reactor, waker) {
                    Progress::Completed(ok) => Progress::Completed(Either::Right(ok)),
                    Progress::Failure(e2) => {
                        self.state = State::Fut2Failed(fut1, e2);
                        Progress::Pending
                    }
                    Progress::Pending => {
                        self.state = State::BothRacing(fut1, fut2);
                        Progress::Pending
                    }
                },
            },
            State::Fut1Failed(mut fut2, e1) => match fut2.progress(reactor, waker.clone()) {
                Progress::Completed(ok) => Progress::Completed(Either::Right(ok)),
                Progress::Failure(_e2) => {
                    self.state = State::BothFailed(e1);
                    waker.wake();
                    Progress::Pending
                }
                Progress::Pending => {
                    self.state = State::Fut1Failed(fut2, e1);
                    Progress::Pending
                }
            },
            State::Fut2Failed(mut fut1, e2) => match fut1.progress(reactor, waker.clone()) {
                Progress::Completed(ok) => Progress::Completed(Either::Left(ok)),
                Progress::Failure(e1) => {
                    self.state = State::BothFailed(e1);
                    waker.wake();
                    Progress::Pending
                }
                Progress::Pending => {
                    self.state = State::Fut2Failed(fut1, e2);
                    Progress::Pending
                }
            },
            State::BothFailed(e1) => Progress::Failure(e1),
            State::Settled => panic!("select polled after settlement"),
        }
    }
}
