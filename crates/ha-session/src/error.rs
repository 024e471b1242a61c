use ha_core::HaError;
use ha_world::WorldError;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum SessionError {
    #[error("session configuration error: {0}")]
    Config(#[from] HaError),

    #[error("world adapter error: {0}")]
    World(#[from] WorldError),

    #[error("no world adapter supplied and no adapter registry to select one from")]
    NoWorld,
}

pub type SessionResult<T> = Result<T, SessionError>;
