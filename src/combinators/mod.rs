//! The future algebra: sequential composition, concurrent conjunction, concurrent disjunction.
//!
//! All three combinators are themselves [`Task`](crate::task::Task) implementations built over
//! two owned inner tasks, advanced through the same polling protocol as any leaf task.

mod either;
mod join;
mod select;
mod then;

pub use either::Either;
pub use join::{Join, JoinError};
pub use select::Select;
pub use then::{Then, ThenError};

use crate::task::Task;

/// Builds a [`Then`] combinator: runs `fut1` to completion, seeds `fut2`'s argument from its
/// output, then runs `fut2`.
pub fn then<F1, F2>(fut1: F1, fut2: F2) -> Then<F1, F2>
where
    F1: Task,
    F2: Task<Arg = F1::Ok>,
{
    Then::new(fut1, fut2)
}

/// Builds a [`Join`] combinator: runs `fut1` and `fut2` concurrently, completing once both
/// have settled.
pub fn join<F1, F2>(fut1: F1, fut2: F2) -> Join<F1, F2>
where
    F1: Task,
    F2: Task,
{
    Join::new(fut1, fut2)
}

/// Builds a [`Select`] combinator: runs `fut1` and `fut2` concurrently, completing as soon as
/// either one succeeds and abandoning the other.
pub fn select<F1, F2>(fut1: F1, fut2: F2) -> Select<F1, F2>
where
    F1: Task,
    F2: Task,
{
    Select::new(fut1, fut2)
}
