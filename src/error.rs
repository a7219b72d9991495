use thiserror::Error;

use crate::model::orrery::BodyID;

/// Everything that can go wrong while building a planetary system. These are
/// all contract violations on the inputs; once a system is built, advancing it
/// cannot fail.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum GenerationError {
    #[error("body count must be at least 1 (got {0})")]
    InvalidBodyCount(usize),
    #[error("at most {max} bodies are supported (got {count})")]
    TooManyBodies { count: usize, max: usize },
    #[error("orbit axis must be non-zero (got [{0}, {1}, {2}])")]
    ZeroOrbitAxis(f64, f64, f64),
    #[error("orbital parameter `{0}` is not finite")]
    NonFiniteParameter(&'static str),
    #[error("orbit radius must be non-negative (got {0})")]
    NegativeOrbitRadius(f64),
    #[error("diameter must be positive (got {0})")]
    NonPositiveDiameter(f64),
    #[error("a root body cannot orbit anything (orbit radius {0})")]
    RootHasOrbit(f64),
    #[error("the system already has a root body ({0:?})")]
    RootAlreadySet(BodyID),
    #[error("no body with id {0:?}")]
    UnknownParent(BodyID),
}
