//! World-adapter error type.

use thiserror::Error;

use ha_core::{HostApiVersion, ParticipantId};

/// Why a world operation did not happen.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum WorldError {
    /// The world refused the operation.  The reason is suitable for relaying
    /// to the participant who asked for it.
    #[error("{0}")]
    Rejected(String),

    /// The selected host API generation cannot perform this operation.
    #[error("operation {0:?} is not supported by this host version")]
    Unsupported(&'static str),

    #[error("participant {0} is not connected")]
    UnknownParticipant(ParticipantId),

    #[error("no world adapter registered for host API {0:?}")]
    NoAdapter(HostApiVersion),
}

impl WorldError {
    pub fn rejected(reason: impl Into<String>) -> Self {
        WorldError::Rejected(reason.into())
    }

    #[inline]
    pub fn is_unsupported(&self) -> bool {
        matches!(self, WorldError::Unsupported(_))
    }
}

pub type WorldResult<T> = Result<T, WorldError>;
