//! System-level error types.
//!
//! Task-level and composition-level failures travel through [`crate::task::Progress::Failure`]
//! instead; this module only covers the reactor's own fallible operations.

use thiserror::Error;

/// A failure in the reactor's interaction with the OS readiness multiplexer.
///
/// Per the reactor's failure contract, a [`ReactorError::Poll`] is fatal to the executor —
/// there is no recovery path for a broken multiplexer. Registration failures
/// ([`ReactorError::Register`] / [`ReactorError::Unregister`]) are returned to the caller for
/// local handling and do not mutate reactor state.
#[derive(Debug, Error)]
pub enum ReactorError {
    #[error("failed to create reactor: {0}")]
    Create(#[source] std::io::Error),

    #[error("failed to register interest: {0}")]
    Register(#[source] std::io::Error),

    #[error("failed to unregister interest: {0}")]
    Unregister(#[source] std::io::Error),

    #[error("reactor poll failed: {0}")]
    Poll(#[source] std::io::Error),
}
