use super::object::ObjectKind;
use super::world::ObjectId;

pub type SimResult<T> = Result<T, SimError>;

/// Invariant violations and configuration failures.
///
/// Invariant violations abort the operation that hit them (a commit, a tick's
/// dispatch, a behavior call). They indicate a programming error, never user
/// input.
#[derive(Debug, thiserror::Error)]
pub enum SimError {
    #[error("unknown object type: {0}")]
    UnknownObjectType(String),

    #[error("object {0} is not live (already removed?)")]
    ObjectNotFound(ObjectId),

    #[error("object {id} ({kind:?}) carries parameters of the wrong shape")]
    InvalidParams { id: ObjectId, kind: ObjectKind },

    #[error("invalid configuration: {0}")]
    Config(String),
}
