/// The settled value of a [`Select`](super::Select): which side won, and what it produced.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Either<A, B> {
    Left(A),
    Right(B),
}
